//! Validator and transformer behavior observable at the public surface.

use tests::*;

use serde_json::json;

#[tokio::test]
async fn unknown_fields_fail_with_a_path() {
    let client = setup().await;

    let err = client
        .table("Author")
        .unwrap()
        .create(json!({ "data": { "name": "A", "nickname": "Al" } }))
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("data.nickname"), "got: {err}");
}

#[tokio::test]
async fn nested_paths_show_up_in_errors() {
    let client = setup().await;

    let err = client
        .table("Author")
        .unwrap()
        .create(json!({
            "data": { "name": "A", "posts": { "create": [ { "headline": "x" } ] } }
        }))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("data.posts.create[0].headline"), "got: {err}");
}

#[tokio::test]
async fn unique_where_must_cover_a_unique_field() {
    let client = setup().await;

    let err = client
        .table("Author")
        .unwrap()
        .find_unique(json!({ "where": { "name": "A" } }))
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("unique"), "got: {err}");
}

#[tokio::test]
async fn unexpected_top_level_arguments_are_rejected() {
    let client = setup().await;

    let err = client
        .table("Author")
        .unwrap()
        .find_many(json!({ "filter": { "name": "A" } }))
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("filter"));
}

#[tokio::test]
async fn count_aggregation_is_unsupported_on_reads_but_stripped_on_writes() {
    let client = setup().await;
    let authors = client.table("Author").unwrap();

    let err = authors
        .find_many(json!({ "include": { "_count": true } }))
        .await
        .unwrap_err();
    assert!(err.is_unsupported());

    // On create the aggregator is silently dropped before planning.
    authors
        .create(json!({
            "data": { "name": "A" },
            "include": { "_count": true }
        }))
        .await
        .unwrap();
}

#[tokio::test]
async fn booleans_round_trip_as_integers() {
    let client = setup().await;
    let users = client.table("User").unwrap();

    let user = users
        .create(json!({ "data": { "id": 1, "active": true } }))
        .await
        .unwrap();
    assert_eq!(user.get("active"), Some(&Value::I64(1)));

    let found = users
        .find_many(json!({ "where": { "active": true } }))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn timestamps_are_validated_and_normalized() {
    let client = setup().await;
    let users = client.table("User").unwrap();

    let user = users
        .create(json!({
            "data": { "id": 1, "created_at": "2024-01-02T03:04:05Z" }
        }))
        .await
        .unwrap();
    assert_eq!(
        user.get("created_at"),
        Some(&Value::String("2024-01-02T03:04:05Z".to_string()))
    );

    let err = users
        .create(json!({ "data": { "id": 2, "created_at": "yesterday" } }))
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("data.created_at"));
}

#[tokio::test]
async fn negative_take_is_rejected() {
    let client = setup().await;

    let err = client
        .table("Post")
        .unwrap()
        .find_many(json!({ "take": -1 }))
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("take"));
}

#[tokio::test]
async fn unknown_tables_fail_with_unknown_entity() {
    let client = setup().await;

    let err = client.table("Reader").unwrap_err();
    assert!(err.is_unknown_entity());
}

#[tokio::test]
async fn to_many_nested_update_requires_a_where() {
    let client = setup().await;

    let author = client
        .table("Author")
        .unwrap()
        .create(json!({ "data": { "name": "A" } }))
        .await
        .unwrap();

    let err = client
        .table("Author")
        .unwrap()
        .update(json!({
            "where": { "id": int(&author, "id") },
            "data": { "posts": { "update": { "data": { "title": "x" } } } }
        }))
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("where"), "got: {err}");
}
