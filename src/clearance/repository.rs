use async_trait::async_trait;

use super::domain::{
    Admin, Application, NewAdmin, NewApplication, StatusSummary, StatusUpdate,
};

/// Username of the administrator account seeded at initialization.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_ADMIN_FULL_NAME: &str = "System Administrator";

/// Storage abstraction for the clearance portal.
///
/// Point lookups answer "not found" with `None` rather than an error, so
/// callers must check before use. Datastore failures bubble up unmodified
/// inside [`StoreError`]; in particular, a duplicate `reference_number` or
/// `username` surfaces as the raw driver error.
#[async_trait]
pub trait ClearanceStore: Send + Sync {
    /// Persist a new submission. Generates the id and reference number,
    /// stamps the submission date, and starts the record in `submitted`.
    async fn create_application(&self, input: NewApplication)
        -> Result<Application, StoreError>;

    async fn fetch_application(&self, id: &str) -> Result<Option<Application>, StoreError>;

    async fn fetch_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Application>, StoreError>;

    /// All applications, newest submission first.
    async fn list_applications(&self) -> Result<Vec<Application>, StoreError>;

    /// Apply a reviewer decision to the identified application. Returns
    /// `None` without side effects when the id is unknown.
    async fn update_status(
        &self,
        id: &str,
        update: StatusUpdate,
    ) -> Result<Option<Application>, StoreError>;

    /// Append document references to both document lists and force the
    /// application into `under_review`. Returns `None` when the id is
    /// unknown.
    async fn attach_documents(
        &self,
        id: &str,
        documents: Vec<String>,
    ) -> Result<Option<Application>, StoreError>;

    async fn fetch_admin(&self, id: &str) -> Result<Option<Admin>, StoreError>;

    async fn fetch_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Admin>, StoreError>;

    async fn create_admin(&self, input: NewAdmin) -> Result<Admin, StoreError>;

    /// Per-status counts across the whole store.
    async fn status_summary(&self) -> Result<StatusSummary, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to connect to the clearance database")]
    Connection(#[source] sqlx::Error),
    #[error("failed to initialize the clearance schema")]
    Initialization(#[source] sqlx::Error),
    #[error("stored row carries unknown application status '{0}'")]
    UnknownStatus(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Create the fallback administrator account if it is absent. Safe to run
/// on every initialization.
pub async fn ensure_default_admin<S>(store: &S) -> Result<(), StoreError>
where
    S: ClearanceStore + ?Sized,
{
    if store
        .fetch_admin_by_username(DEFAULT_ADMIN_USERNAME)
        .await?
        .is_none()
    {
        store
            .create_admin(NewAdmin {
                username: DEFAULT_ADMIN_USERNAME.to_string(),
                password: DEFAULT_ADMIN_PASSWORD.to_string(),
                full_name: DEFAULT_ADMIN_FULL_NAME.to_string(),
            })
            .await?;
    }
    Ok(())
}
