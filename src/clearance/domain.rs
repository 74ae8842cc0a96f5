use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states of a clearance application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Parse a stored column label. Rows carrying anything else are malformed.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "submitted" => Some(ApplicationStatus::Submitted),
            "under_review" => Some(ApplicationStatus::UnderReview),
            "approved" => Some(ApplicationStatus::Approved),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }

    /// Approval and rejection close out the review process.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved | ApplicationStatus::Rejected
        )
    }
}

/// A stored rates-clearance application.
///
/// Serializes to the camelCase JSON shape the portal's request handlers
/// return to the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub reference_number: String,
    pub full_name: String,
    pub id_number: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub property_address: String,
    pub stand_number: String,
    pub property_type: String,
    pub reason: String,
    pub documents: Vec<String>,
    pub uploaded_documents: Vec<String>,
    pub status: ApplicationStatus,
    pub submitted_date: DateTime<Utc>,
    pub review_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<String>,
}

/// Applicant-supplied payload for a new submission. Document lists default
/// to empty when the payload omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub full_name: String,
    pub id_number: String,
    pub phone_number: String,
    #[serde(default)]
    pub email: Option<String>,
    pub property_address: String,
    pub stand_number: String,
    pub property_type: String,
    pub reason: String,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub uploaded_documents: Vec<String>,
}

/// Reviewer-supplied status change. `None` fields keep the stored value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Administrator account. Password is stored verbatim; credential hashing
/// belongs to the (external) authentication layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for registering an administrator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdmin {
    pub username: String,
    pub password: String,
    pub full_name: String,
}

/// Per-status application counts for the administrator dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub submitted: u64,
    pub under_review: u64,
    pub approved: u64,
    pub rejected: u64,
    pub total: u64,
}

impl StatusSummary {
    pub fn add(&mut self, status: ApplicationStatus, count: u64) {
        match status {
            ApplicationStatus::Submitted => self.submitted += count,
            ApplicationStatus::UnderReview => self.under_review += count,
            ApplicationStatus::Approved => self.approved += count,
            ApplicationStatus::Rejected => self.rejected += count,
        }
        self.total += count;
    }

    pub fn record(&mut self, status: ApplicationStatus) {
        self.add(status, 1);
    }
}

/// Generate a human-facing tracking code, `RCC-<year>-<6 digits>`.
///
/// The six-digit suffix is random and the caller does not retry on the
/// (theoretical) collision; the datastore's UNIQUE constraint is the last
/// line of defense.
pub fn generate_reference_number(year: i32) -> String {
    let suffix = rand::rng().random_range(0..1_000_000u32);
    format!("RCC-{year}-{suffix:06}")
}

impl Application {
    /// Build the freshly submitted record for an applicant payload.
    pub fn submitted(input: NewApplication, reference_number: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            reference_number,
            full_name: input.full_name,
            id_number: input.id_number,
            phone_number: input.phone_number,
            email: input.email,
            property_address: input.property_address,
            stand_number: input.stand_number,
            property_type: input.property_type,
            reason: input.reason,
            documents: input.documents,
            uploaded_documents: input.uploaded_documents,
            status: ApplicationStatus::Submitted,
            submitted_date: now,
            review_date: None,
            completed_date: None,
            admin_notes: None,
            reviewed_by: None,
        }
    }

    /// Apply a reviewer decision.
    ///
    /// The review date is stamped on the first update only; the completion
    /// date is stamped whenever the new status is terminal and preserved
    /// otherwise. The three text fields fall back to their stored values
    /// when the update omits them.
    pub fn apply_status_update(&mut self, update: StatusUpdate, now: DateTime<Utc>) {
        self.status = update.status;
        if self.review_date.is_none() {
            self.review_date = Some(now);
        }
        if update.status.is_terminal() {
            self.completed_date = Some(now);
        }
        if let Some(reviewed_by) = update.reviewed_by {
            self.reviewed_by = Some(reviewed_by);
        }
        if let Some(admin_notes) = update.admin_notes {
            self.admin_notes = Some(admin_notes);
        }
        if let Some(reason) = update.reason {
            self.reason = reason;
        }
    }

    /// Append uploaded document references and move the application into
    /// review. The review date is overwritten unconditionally here, unlike
    /// in [`Application::apply_status_update`].
    pub fn attach_documents(&mut self, documents: &[String], now: DateTime<Utc>) {
        self.documents.extend_from_slice(documents);
        self.uploaded_documents.extend_from_slice(documents);
        self.status = ApplicationStatus::UnderReview;
        self.review_date = Some(now);
    }
}

impl Admin {
    pub fn created(input: NewAdmin, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: input.username,
            password: input.password,
            full_name: input.full_name,
            created_at: now,
        }
    }
}
