//! Exercises the MySQL backend against a live server.
//!
//! These tests stay out of the default run; execute them with
//! `cargo test -- --ignored` once a MySQL instance matching the `DB_*`
//! environment (or its defaults) is reachable.

use rates_clearance::{
    AppConfig, ApplicationStatus, ClearanceStore, MySqlStore, NewApplication, StatusUpdate,
};

async fn connect() -> MySqlStore {
    let config = AppConfig::load().expect("config loads");
    MySqlStore::connect(&config.database, config.reference_year)
        .await
        .expect("store connects and initializes")
}

fn submission() -> NewApplication {
    NewApplication {
        full_name: "Jane Doe".to_string(),
        id_number: "63-123456A70".to_string(),
        phone_number: "+263771234567".to_string(),
        email: Some("jane@example.com".to_string()),
        property_address: "12 Josiah Tongogara Street, Masvingo".to_string(),
        stand_number: "1024".to_string(),
        property_type: "residential".to_string(),
        reason: "sale".to_string(),
        documents: Vec::new(),
        uploaded_documents: Vec::new(),
    }
}

#[tokio::test]
#[ignore = "requires a reachable MySQL server"]
async fn initialization_is_idempotent() {
    let first = connect().await;
    drop(first);

    // A second construction must tolerate the existing schema and the
    // already-seeded administrator.
    let second = connect().await;
    let admin = second
        .fetch_admin_by_username("admin")
        .await
        .expect("lookup succeeds")
        .expect("default admin exists");
    assert_eq!(admin.username, "admin");
}

#[tokio::test]
#[ignore = "requires a reachable MySQL server"]
async fn lifecycle_round_trips_through_mysql() {
    let store = connect().await;

    let created = store
        .create_application(submission())
        .await
        .expect("application persists");
    assert_eq!(created.status, ApplicationStatus::Submitted);
    assert!(created.reference_number.starts_with("RCC-"));

    let stored = store
        .fetch_application(&created.id)
        .await
        .expect("lookup succeeds")
        .expect("application exists");
    assert_eq!(stored.id, created.id);
    assert_eq!(stored.reference_number, created.reference_number);
    assert_eq!(stored.full_name, "Jane Doe");
    assert!(stored.review_date.is_none());

    let in_review = store
        .attach_documents(&created.id, vec!["title-deed.pdf".to_string()])
        .await
        .expect("attach succeeds")
        .expect("application exists");
    assert_eq!(in_review.status, ApplicationStatus::UnderReview);
    assert_eq!(in_review.documents, vec!["title-deed.pdf"]);
    assert_eq!(in_review.uploaded_documents, vec!["title-deed.pdf"]);

    let rejected = store
        .update_status(
            &created.id,
            StatusUpdate {
                status: ApplicationStatus::Rejected,
                reviewed_by: Some("admin".to_string()),
                admin_notes: None,
                reason: Some("rates outstanding".to_string()),
            },
        )
        .await
        .expect("update succeeds")
        .expect("application exists");
    assert!(rejected.completed_date.is_some());
    assert_eq!(rejected.reason, "rates outstanding");

    let by_reference = store
        .fetch_by_reference(&created.reference_number)
        .await
        .expect("lookup succeeds")
        .expect("application exists");
    assert_eq!(by_reference.status, ApplicationStatus::Rejected);
}
