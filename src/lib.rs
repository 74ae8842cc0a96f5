//! Persistence core for a municipal rates clearance certificate portal.
//!
//! Citizens apply for a certificate confirming no outstanding rates on a
//! property ahead of a sale; administrators review the applications, request
//! supporting documents, and approve or reject them. This crate owns the
//! durable records and the status lifecycle. The portal's HTTP handlers,
//! authentication, and upload plumbing live in a separate service and
//! consume the [`clearance::ClearanceStore`] trait.

pub mod clearance;
pub mod config;
pub mod telemetry;

pub use clearance::{
    ensure_default_admin, Admin, Application, ApplicationStatus, ClearanceStore, MemoryStore,
    MySqlStore, NewAdmin, NewApplication, StatusSummary, StatusUpdate, StoreError,
};
pub use config::{AppConfig, ConfigError, DatabaseConfig, TelemetryConfig};
