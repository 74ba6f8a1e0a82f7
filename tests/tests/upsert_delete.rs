//! Upsert branching and delete pre-fetch semantics.

use tests::*;

use serde_json::json;

#[tokio::test]
async fn upsert_creates_when_the_row_is_missing() {
    let client = setup().await;

    let user = client
        .table("User")
        .unwrap()
        .upsert(json!({
            "where": { "id": 1 },
            "create": { "id": 1, "name": "A" },
            "update": { "name": "B" }
        }))
        .await
        .unwrap();

    assert_eq!(int(&user, "id"), 1);
    assert_eq!(text(&user, "name"), "A");
}

#[tokio::test]
async fn upsert_updates_when_the_row_exists() {
    let client = setup().await;
    let users = client.table("User").unwrap();

    users
        .create(json!({ "data": { "id": 1, "name": "A" } }))
        .await
        .unwrap();

    let user = users
        .upsert(json!({
            "where": { "id": 1 },
            "create": { "id": 1, "name": "A" },
            "update": { "name": "B" }
        }))
        .await
        .unwrap();

    assert_eq!(text(&user, "name"), "B");

    let all = users.find_many(json!(null)).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn delete_returns_the_full_pre_image() {
    let client = setup().await;
    let authors = client.table("Author").unwrap();

    let created = authors
        .create(json!({ "data": { "name": "doomed" } }))
        .await
        .unwrap();
    let author_id = int(&created, "id");

    let deleted = authors
        .delete(json!({ "where": { "id": author_id } }))
        .await
        .unwrap();
    assert_eq!(deleted, created);

    let found = authors
        .find_unique(json!({ "where": { "id": author_id } }))
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn delete_of_a_missing_record_is_record_not_found() {
    let client = setup().await;

    let err = client
        .table("Author")
        .unwrap()
        .delete(json!({ "where": { "id": 404 } }))
        .await
        .unwrap_err();

    assert!(err.is_record_not_found());
    assert_eq!(err.record_not_found_operation(), Some("Delete"));
}
