use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

use super::domain::{
    generate_reference_number, Admin, Application, ApplicationStatus, NewAdmin, NewApplication,
    StatusSummary, StatusUpdate,
};
use super::repository::{ensure_default_admin, ClearanceStore, StoreError};

const CREATE_APPLICATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS applications (
    id VARCHAR(36) PRIMARY KEY,
    reference_number VARCHAR(32) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    id_number VARCHAR(64) NOT NULL,
    phone_number VARCHAR(32) NOT NULL,
    email VARCHAR(255) NULL,
    property_address VARCHAR(512) NOT NULL,
    stand_number VARCHAR(64) NOT NULL,
    property_type VARCHAR(64) NOT NULL,
    reason TEXT NOT NULL,
    documents JSON NOT NULL,
    uploaded_documents JSON NOT NULL,
    status VARCHAR(32) NOT NULL,
    submitted_date DATETIME(6) NOT NULL,
    review_date DATETIME(6) NULL,
    completed_date DATETIME(6) NULL,
    admin_notes TEXT NULL,
    reviewed_by VARCHAR(255) NULL
)
"#;

const CREATE_ADMINS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS admins (
    id VARCHAR(36) PRIMARY KEY,
    username VARCHAR(64) NOT NULL UNIQUE,
    password VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    created_at DATETIME(6) NOT NULL
)
"#;

const APPLICATION_COLUMNS: &str = "id, reference_number, full_name, id_number, phone_number, \
     email, property_address, stand_number, property_type, reason, documents, \
     uploaded_documents, status, submitted_date, review_date, completed_date, admin_notes, \
     reviewed_by";

const INSERT_APPLICATION: &str = "INSERT INTO applications (id, reference_number, full_name, \
     id_number, phone_number, email, property_address, stand_number, property_type, reason, \
     documents, uploaded_documents, status, submitted_date, review_date, completed_date, \
     admin_notes, reviewed_by) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

/// MySQL-backed clearance store.
///
/// [`MySqlStore::connect`] is the only way to obtain one: it connects,
/// creates the schema, and seeds the default administrator, and any failure
/// in that sequence aborts construction so the store never serves requests
/// over a partially initialized schema.
pub struct MySqlStore {
    pool: MySqlPool,
    reference_year: i32,
}

impl MySqlStore {
    pub async fn connect(
        config: &DatabaseConfig,
        reference_year: i32,
    ) -> Result<Self, StoreError> {
        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "connecting to clearance database"
        );

        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        // One shared connection, reused across all operations.
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(StoreError::Connection)?;

        let store = Self {
            pool,
            reference_year,
        };
        store.initialize_schema().await?;
        ensure_default_admin(&store).await?;
        info!("clearance store ready");
        Ok(store)
    }

    async fn initialize_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_APPLICATIONS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Initialization)?;
        sqlx::query(CREATE_ADMINS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Initialization)?;
        debug!("clearance schema ready");
        Ok(())
    }

    async fn fetch_one_application(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<Application>, StoreError> {
        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE {column} = ?");
        let row: Option<ApplicationRow> = sqlx::query_as(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Application::try_from).transpose()
    }
}

/// Raw row shape. Column types are validated during decode, so a malformed
/// row fails here with a typed error instead of leaking into the domain.
#[derive(FromRow)]
struct ApplicationRow {
    id: String,
    reference_number: String,
    full_name: String,
    id_number: String,
    phone_number: String,
    email: Option<String>,
    property_address: String,
    stand_number: String,
    property_type: String,
    reason: String,
    documents: Json<Vec<String>>,
    uploaded_documents: Json<Vec<String>>,
    status: String,
    submitted_date: DateTime<Utc>,
    review_date: Option<DateTime<Utc>>,
    completed_date: Option<DateTime<Utc>>,
    admin_notes: Option<String>,
    reviewed_by: Option<String>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = StoreError;

    fn try_from(row: ApplicationRow) -> Result<Self, StoreError> {
        let status = ApplicationStatus::from_label(&row.status)
            .ok_or_else(|| StoreError::UnknownStatus(row.status.clone()))?;
        Ok(Application {
            id: row.id,
            reference_number: row.reference_number,
            full_name: row.full_name,
            id_number: row.id_number,
            phone_number: row.phone_number,
            email: row.email,
            property_address: row.property_address,
            stand_number: row.stand_number,
            property_type: row.property_type,
            reason: row.reason,
            documents: row.documents.0,
            uploaded_documents: row.uploaded_documents.0,
            status,
            submitted_date: row.submitted_date,
            review_date: row.review_date,
            completed_date: row.completed_date,
            admin_notes: row.admin_notes,
            reviewed_by: row.reviewed_by,
        })
    }
}

#[async_trait]
impl ClearanceStore for MySqlStore {
    async fn create_application(
        &self,
        input: NewApplication,
    ) -> Result<Application, StoreError> {
        let reference = generate_reference_number(self.reference_year);
        let application = Application::submitted(input, reference, Utc::now());

        sqlx::query(INSERT_APPLICATION)
            .bind(&application.id)
            .bind(&application.reference_number)
            .bind(&application.full_name)
            .bind(&application.id_number)
            .bind(&application.phone_number)
            .bind(&application.email)
            .bind(&application.property_address)
            .bind(&application.stand_number)
            .bind(&application.property_type)
            .bind(&application.reason)
            .bind(Json(&application.documents))
            .bind(Json(&application.uploaded_documents))
            .bind(application.status.label())
            .bind(application.submitted_date)
            .bind(application.review_date)
            .bind(application.completed_date)
            .bind(&application.admin_notes)
            .bind(&application.reviewed_by)
            .execute(&self.pool)
            .await?;

        info!(
            id = %application.id,
            reference = %application.reference_number,
            "clearance application recorded"
        );
        Ok(application)
    }

    async fn fetch_application(&self, id: &str) -> Result<Option<Application>, StoreError> {
        self.fetch_one_application("id", id).await
    }

    async fn fetch_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Application>, StoreError> {
        self.fetch_one_application("reference_number", reference).await
    }

    async fn list_applications(&self) -> Result<Vec<Application>, StoreError> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications ORDER BY submitted_date DESC"
        );
        let rows: Vec<ApplicationRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Application::try_from).collect()
    }

    async fn update_status(
        &self,
        id: &str,
        update: StatusUpdate,
    ) -> Result<Option<Application>, StoreError> {
        // Single-row transaction; the row lock closes the read-then-write
        // race between concurrent reviewers.
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = ? FOR UPDATE");
        let row: Option<ApplicationRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut application = Application::try_from(row)?;
        application.apply_status_update(update, Utc::now());

        sqlx::query(
            "UPDATE applications SET status = ?, review_date = ?, completed_date = ?, \
             reviewed_by = ?, admin_notes = ?, reason = ? WHERE id = ?",
        )
        .bind(application.status.label())
        .bind(application.review_date)
        .bind(application.completed_date)
        .bind(&application.reviewed_by)
        .bind(&application.admin_notes)
        .bind(&application.reason)
        .bind(&application.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(
            id = %application.id,
            status = application.status.label(),
            "application status updated"
        );
        Ok(Some(application))
    }

    async fn attach_documents(
        &self,
        id: &str,
        documents: Vec<String>,
    ) -> Result<Option<Application>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = ? FOR UPDATE");
        let row: Option<ApplicationRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut application = Application::try_from(row)?;
        application.attach_documents(&documents, Utc::now());

        sqlx::query(
            "UPDATE applications SET documents = ?, uploaded_documents = ?, status = ?, \
             review_date = ? WHERE id = ?",
        )
        .bind(Json(&application.documents))
        .bind(Json(&application.uploaded_documents))
        .bind(application.status.label())
        .bind(application.review_date)
        .bind(&application.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(
            id = %application.id,
            attached = documents.len(),
            "documents attached to application"
        );
        Ok(Some(application))
    }

    async fn fetch_admin(&self, id: &str) -> Result<Option<Admin>, StoreError> {
        let admin: Option<Admin> = sqlx::query_as(
            "SELECT id, username, password, full_name, created_at FROM admins WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn fetch_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Admin>, StoreError> {
        let admin: Option<Admin> = sqlx::query_as(
            "SELECT id, username, password, full_name, created_at FROM admins WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn create_admin(&self, input: NewAdmin) -> Result<Admin, StoreError> {
        let admin = Admin::created(input, Utc::now());
        sqlx::query(
            "INSERT INTO admins (id, username, password, full_name, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&admin.id)
        .bind(&admin.username)
        .bind(&admin.password)
        .bind(&admin.full_name)
        .bind(admin.created_at)
        .execute(&self.pool)
        .await?;

        info!(username = %admin.username, "administrator account created");
        Ok(admin)
    }

    async fn status_summary(&self) -> Result<StatusSummary, StoreError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM applications GROUP BY status")
                .fetch_all(&self.pool)
                .await?;

        let mut summary = StatusSummary::default();
        for (label, count) in rows {
            let status = ApplicationStatus::from_label(&label)
                .ok_or(StoreError::UnknownStatus(label))?;
            summary.add(status, count as u64);
        }
        Ok(summary)
    }
}
