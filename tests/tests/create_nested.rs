//! Nested create planning: outgoing relations insert before the base row,
//! incoming relations after it, re-fetch resolves generated columns.

use tests::*;

use serde_json::json;

#[tokio::test]
async fn outgoing_create_inserts_the_related_row_first() {
    let client = setup().await;
    let posts = client.table("Post").unwrap();

    let post = posts
        .create(json!({
            "data": { "title": "T", "author": { "create": { "name": "A" } } }
        }))
        .await
        .unwrap();

    assert_eq!(text(&post, "title"), "T");
    // No include was requested, so no relation field comes back.
    assert!(post.get("author").is_none());

    let authors = client
        .table("Author")
        .unwrap()
        .find_many(json!(null))
        .await
        .unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(int(&post, "author_id"), int(&authors[0], "id"));
}

#[tokio::test]
async fn incoming_create_attaches_children_to_the_generated_key() {
    let client = setup().await;

    let author = client
        .table("Author")
        .unwrap()
        .create(json!({
            "data": {
                "name": "A",
                "posts": { "create": [ { "title": "p1" }, { "title": "p2" } ] }
            },
            "include": { "posts": true }
        }))
        .await
        .unwrap();

    let author_id = int(&author, "id");
    let posts = related(&author, "posts");
    assert_eq!(posts.len(), 2);
    for post in &posts {
        assert_eq!(int(post, "author_id"), author_id);
    }
}

#[tokio::test]
async fn connect_forms_are_rejected_with_a_fixed_message() {
    let client = setup().await;
    let posts = client.table("Post").unwrap();

    for nested in [
        json!({ "connect": { "id": 1 } }),
        json!({ "connectOrCreate": { "where": { "id": 1 }, "create": { "name": "A" } } }),
    ] {
        let err = posts
            .create(json!({ "data": { "title": "T", "author": nested } }))
            .await
            .unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(
            err.to_string().contains("only a nested `create` is supported"),
            "unexpected message: {err}"
        );
    }
}

#[tokio::test]
async fn generated_columns_come_back_from_the_refetch() {
    let client = setup().await;

    let author = client
        .table("Author")
        .unwrap()
        .create(json!({ "data": { "name": "gen" } }))
        .await
        .unwrap();

    // The id was never supplied; the re-fetch resolved it.
    assert!(int(&author, "id") > 0);
}

#[tokio::test]
async fn ambiguous_refetch_fails_not_unique_and_rolls_back() {
    let client = setup().await;
    let authors = client.table("Author").unwrap();

    authors
        .create(json!({ "data": { "name": "dup" } }))
        .await
        .unwrap();

    // The second insert succeeds, but the re-fetch keyed on the supplied
    // scalars now matches two rows.
    let err = authors
        .create(json!({ "data": { "name": "dup" } }))
        .await
        .unwrap_err();
    assert!(err.is_not_unique(), "expected NotUnique, got {err}");

    // The failed create never committed.
    let all = authors.find_many(json!(null)).await.unwrap();
    assert_eq!(all.len(), 1);
}
