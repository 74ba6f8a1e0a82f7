//! Reads: uniqueness probes, include expansion, in-memory join, arity
//! enforcement.

use tests::*;

use serde_json::json;

async fn seed(client: &Client) -> i64 {
    let author = client
        .table("Author")
        .unwrap()
        .create(json!({
            "data": {
                "name": "A",
                "posts": { "create": [ { "title": "keep one" }, { "title": "drop one" } ] },
                "profile": { "create": { "bio": "hi" } }
            }
        }))
        .await
        .unwrap();
    int(&author, "id")
}

#[tokio::test]
async fn find_unique_misses_cleanly() {
    let client = setup().await;

    let found = client
        .table("Author")
        .unwrap()
        .find_unique(json!({ "where": { "id": 42 } }))
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn include_attaches_one_and_many() {
    let client = setup().await;
    let author_id = seed(&client).await;

    let author = client
        .table("Author")
        .unwrap()
        .find_unique(json!({
            "where": { "id": author_id },
            "include": { "posts": true, "profile": true }
        }))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(related(&author, "posts").len(), 2);
    let profile = author
        .get("profile")
        .and_then(|v| v.as_record())
        .expect("profile attached as a single row");
    assert_eq!(text(profile, "bio"), "hi");
}

#[tokio::test]
async fn includes_nest_recursively() {
    let client = setup().await;
    seed(&client).await;

    let post = client
        .table("Post")
        .unwrap()
        .find_first(json!({
            "where": { "title": { "startsWith": "keep" } },
            "include": { "author": { "include": { "posts": true } } }
        }))
        .await
        .unwrap()
        .unwrap();

    let author = post
        .get("author")
        .and_then(|v| v.as_record())
        .expect("author attached");
    assert_eq!(related(author, "posts").len(), 2);
}

#[tokio::test]
async fn include_where_ands_with_the_key_filter() {
    let client = setup().await;
    let author_id = seed(&client).await;

    let author = client
        .table("Author")
        .unwrap()
        .find_unique(json!({
            "where": { "id": author_id },
            "include": { "posts": { "where": { "title": { "startsWith": "keep" } } } }
        }))
        .await
        .unwrap()
        .unwrap();

    let posts = related(&author, "posts");
    assert_eq!(posts.len(), 1);
    assert_eq!(text(&posts[0], "title"), "keep one");
}

#[tokio::test]
async fn one_to_one_arity_is_enforced_on_read() {
    let client = setup().await;
    let author_id = seed(&client).await;

    // A second profile for the same author violates the declared arity.
    client
        .table("Profile")
        .unwrap()
        .create(json!({ "data": { "bio": "dup", "author_id": author_id } }))
        .await
        .unwrap();

    let err = client
        .table("Author")
        .unwrap()
        .find_unique(json!({
            "where": { "id": author_id },
            "include": { "profile": true }
        }))
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(
        err.to_string()
            .contains("one-to-one but found several related objects"),
        "unexpected message: {err}"
    );
}

#[tokio::test]
async fn select_retains_the_join_key() {
    let client = setup().await;
    let author_id = seed(&client).await;

    let author = client
        .table("Author")
        .unwrap()
        .find_unique(json!({
            "where": { "id": author_id },
            "select": { "name": true },
            "include": { "posts": true }
        }))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(text(&author, "name"), "A");
    // `id` is the join key for `posts`; it stays in the projection.
    assert_eq!(int(&author, "id"), author_id);
    assert_eq!(related(&author, "posts").len(), 2);
}

#[tokio::test]
async fn find_many_orders_and_paginates() {
    let client = setup().await;
    let posts = client.table("Post").unwrap();

    for title in ["c", "a", "b"] {
        posts
            .create(json!({ "data": { "title": title } }))
            .await
            .unwrap();
    }

    let rows = posts
        .find_many(json!({ "orderBy": { "title": "asc" }, "take": 2, "skip": 1 }))
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(text(&rows[0], "title"), "b");
    assert_eq!(text(&rows[1], "title"), "c");
}

#[tokio::test]
async fn find_unique_on_a_duplicated_key_fails_not_unique() {
    let client = setup().await;
    let users = client.table("User").unwrap();

    // The registry says `email` is unique; the store does not enforce it.
    users
        .create(json!({ "data": { "id": 1, "email": "a@b.c" } }))
        .await
        .unwrap();
    users
        .create(json!({ "data": { "id": 2, "email": "a@b.c" } }))
        .await
        .unwrap();

    let err = users
        .find_unique(json!({ "where": { "email": "a@b.c" } }))
        .await
        .unwrap_err();
    assert!(err.is_not_unique(), "expected NotUnique, got {err}");
}

#[tokio::test]
async fn unknown_include_field_is_invalid() {
    let client = setup().await;

    let err = client
        .table("Author")
        .unwrap()
        .find_many(json!({ "include": { "reviews": true } }))
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("include.reviews"));
}
