//! The single-statement batch mutations: counts, no nested traversal.

use tests::*;

use serde_json::json;

#[tokio::test]
async fn create_many_counts_inserted_rows() {
    let client = setup().await;
    let posts = client.table("Post").unwrap();

    let result = posts
        .create_many(json!({
            "data": [ { "title": "a" }, { "title": "b" }, { "title": "c" } ]
        }))
        .await
        .unwrap();
    assert_eq!(result.count, 3);

    let all = posts.find_many(json!(null)).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn create_many_rejects_nested_relations() {
    let client = setup().await;

    let err = client
        .table("Author")
        .unwrap()
        .create_many(json!({
            "data": [ { "name": "A", "posts": { "create": { "title": "p" } } } ]
        }))
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("data[0].posts"));
}

#[tokio::test]
async fn update_many_applies_the_filter() {
    let client = setup().await;
    let posts = client.table("Post").unwrap();

    posts
        .create_many(json!({
            "data": [ { "title": "keep" }, { "title": "change me" }, { "title": "change me too" } ]
        }))
        .await
        .unwrap();

    let result = posts
        .update_many(json!({
            "where": { "title": { "startsWith": "change" } },
            "data": { "title": "changed" }
        }))
        .await
        .unwrap();
    assert_eq!(result.count, 2);

    let kept = posts
        .find_many(json!({ "where": { "title": "keep" } }))
        .await
        .unwrap();
    assert_eq!(kept.len(), 1);
}

#[tokio::test]
async fn delete_many_without_a_filter_clears_the_table() {
    let client = setup().await;
    let posts = client.table("Post").unwrap();

    posts
        .create_many(json!({ "data": [ { "title": "a" }, { "title": "b" } ] }))
        .await
        .unwrap();

    let result = posts.delete_many(json!(null)).await.unwrap();
    assert_eq!(result.count, 2);
    assert!(posts.find_many(json!(null)).await.unwrap().is_empty());
}

#[tokio::test]
async fn filters_compose_with_boolean_combinators() {
    let client = setup().await;
    let posts = client.table("Post").unwrap();

    posts
        .create_many(json!({
            "data": [ { "title": "alpha" }, { "title": "beta" }, { "title": "gamma" } ]
        }))
        .await
        .unwrap();

    let rows = posts
        .find_many(json!({
            "where": {
                "OR": [
                    { "title": "alpha" },
                    { "title": { "endsWith": "mma" } }
                ]
            }
        }))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let rows = posts
        .find_many(json!({
            "where": { "NOT": { "title": { "contains": "a" } } }
        }))
        .await
        .unwrap();
    // Every seeded title contains an "a".
    assert!(rows.is_empty());
}
