use crate::clearance::domain::{ApplicationStatus, NewApplication, StatusUpdate};
use crate::clearance::memory::MemoryStore;

pub(super) const REFERENCE_YEAR: i32 = 2025;

pub(super) fn store() -> MemoryStore {
    MemoryStore::new(REFERENCE_YEAR)
}

pub(super) fn submission() -> NewApplication {
    named_submission("Jane Doe")
}

pub(super) fn named_submission(full_name: &str) -> NewApplication {
    NewApplication {
        full_name: full_name.to_string(),
        id_number: "63-123456A70".to_string(),
        phone_number: "+263771234567".to_string(),
        email: Some("applicant@example.com".to_string()),
        property_address: "12 Josiah Tongogara Street, Masvingo".to_string(),
        stand_number: "1024".to_string(),
        property_type: "residential".to_string(),
        reason: "sale".to_string(),
        documents: Vec::new(),
        uploaded_documents: Vec::new(),
    }
}

pub(super) fn status_update(status: ApplicationStatus) -> StatusUpdate {
    StatusUpdate {
        status,
        reviewed_by: None,
        admin_notes: None,
        reason: None,
    }
}
