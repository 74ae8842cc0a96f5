use super::common::store;
use crate::clearance::domain::NewAdmin;
use crate::clearance::repository::{
    ensure_default_admin, ClearanceStore, DEFAULT_ADMIN_USERNAME,
};

#[tokio::test]
async fn default_admin_seeding_is_idempotent() {
    let store = store();

    ensure_default_admin(&store).await.expect("first seed");
    ensure_default_admin(&store).await.expect("second seed");

    assert_eq!(store.admin_count(), 1);
    let admin = store
        .fetch_admin_by_username(DEFAULT_ADMIN_USERNAME)
        .await
        .expect("lookup succeeds")
        .expect("default admin exists");
    assert_eq!(admin.username, "admin");
    assert_eq!(admin.full_name, "System Administrator");
}

#[tokio::test]
async fn created_admins_are_fetchable_by_id_and_username() {
    let store = store();
    let admin = store
        .create_admin(NewAdmin {
            username: "tmoyo".to_string(),
            password: "s3cret".to_string(),
            full_name: "Tendai Moyo".to_string(),
        })
        .await
        .expect("admin persists");

    let by_id = store
        .fetch_admin(&admin.id)
        .await
        .expect("lookup succeeds")
        .expect("admin exists");
    assert_eq!(by_id, admin);

    let by_username = store
        .fetch_admin_by_username("tmoyo")
        .await
        .expect("lookup succeeds")
        .expect("admin exists");
    assert_eq!(by_username.id, admin.id);

    assert!(store
        .fetch_admin("missing")
        .await
        .expect("lookup succeeds")
        .is_none());
    assert!(store
        .fetch_admin_by_username("nobody")
        .await
        .expect("lookup succeeds")
        .is_none());
}
