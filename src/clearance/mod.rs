//! Clearance application and administrator persistence.
//!
//! The [`ClearanceStore`] trait is the seam the portal's request handlers
//! program against. [`MySqlStore`] is the production backend; [`MemoryStore`]
//! backs the test suites. Both enforce the same lifecycle: submissions start
//! in `submitted`, attaching documents forces `under_review`, and the first
//! reviewer decision stamps the review date for good.

pub mod domain;
pub mod memory;
pub mod mysql;
pub mod repository;

#[cfg(test)]
mod tests;

pub use domain::{
    generate_reference_number, Admin, Application, ApplicationStatus, NewAdmin, NewApplication,
    StatusSummary, StatusUpdate,
};
pub use memory::MemoryStore;
pub use mysql::MySqlStore;
pub use repository::{
    ensure_default_admin, ClearanceStore, StoreError, DEFAULT_ADMIN_USERNAME,
};
