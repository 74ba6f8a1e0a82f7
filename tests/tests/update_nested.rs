//! Update planning: pre/post images, FK rewrite, nested relation updates,
//! re-fetch through the merged key.

use tests::*;

use serde_json::json;

async fn seed_author_with_post(client: &Client, name: &str) -> (i64, i64) {
    let author = client
        .table("Author")
        .unwrap()
        .create(json!({
            "data": { "name": name, "posts": { "create": { "title": "p" } } },
            "include": { "posts": true }
        }))
        .await
        .unwrap();

    let posts = related(&author, "posts");
    (int(&author, "id"), int(&posts[0], "id"))
}

#[tokio::test]
async fn update_returns_the_post_image() {
    let client = setup().await;
    let (author_id, _) = seed_author_with_post(&client, "A").await;

    let updated = client
        .table("Author")
        .unwrap()
        .update(json!({ "where": { "id": author_id }, "data": { "name": "B" } }))
        .await
        .unwrap();

    assert_eq!(text(&updated, "name"), "B");

    // The returned row is exactly what a re-fetch sees.
    let fetched = client
        .table("Author")
        .unwrap()
        .find_unique(json!({ "where": { "id": author_id } }))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated, fetched);
}

#[tokio::test]
async fn changing_a_referenced_key_rewrites_dependent_fks() {
    let client = setup().await;
    let (author_id, post_id) = seed_author_with_post(&client, "A").await;

    client
        .table("Profile")
        .unwrap()
        .create(json!({ "data": { "bio": "b", "author_id": author_id } }))
        .await
        .unwrap();

    let updated = client
        .table("Author")
        .unwrap()
        .update(json!({ "where": { "id": author_id }, "data": { "id": 777 } }))
        .await
        .unwrap();
    assert_eq!(int(&updated, "id"), 777);

    // Every dependent row followed the key.
    let post = client
        .table("Post")
        .unwrap()
        .find_unique(json!({ "where": { "id": post_id } }))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(int(&post, "author_id"), 777);

    let profile = client
        .table("Profile")
        .unwrap()
        .find_first(json!({ "where": { "author_id": 777 } }))
        .await
        .unwrap();
    assert!(profile.is_some());
}

#[tokio::test]
async fn nested_incoming_update_reaches_the_child() {
    let client = setup().await;
    let (author_id, post_id) = seed_author_with_post(&client, "A").await;

    client
        .table("Author")
        .unwrap()
        .update(json!({
            "where": { "id": author_id },
            "data": {
                "posts": { "update": { "where": { "id": post_id }, "data": { "title": "renamed" } } }
            }
        }))
        .await
        .unwrap();

    let post = client
        .table("Post")
        .unwrap()
        .find_unique(json!({ "where": { "id": post_id } }))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(text(&post, "title"), "renamed");
}

#[tokio::test]
async fn nested_update_of_an_unrelated_child_fails_and_rolls_back() {
    let client = setup().await;
    let (author_id, _) = seed_author_with_post(&client, "A").await;
    let (_, other_post) = seed_author_with_post(&client, "B").await;

    let err = client
        .table("Author")
        .unwrap()
        .update(json!({
            "where": { "id": author_id },
            "data": {
                "posts": {
                    "update": { "where": { "id": other_post }, "data": { "title": "stolen" } }
                }
            }
        }))
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(
        err.to_string()
            .contains("Nested update cannot update an unrelated object"),
        "unexpected message: {err}"
    );

    // The child update inside the aborted transaction never committed.
    let post = client
        .table("Post")
        .unwrap()
        .find_unique(json!({ "where": { "id": other_post } }))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(text(&post, "title"), "p");
}

#[tokio::test]
async fn nested_outgoing_update_follows_a_moved_key() {
    let client = setup().await;
    let (_, post_id) = seed_author_with_post(&client, "A").await;

    // The nested update moves the referenced key; the FK rewrite inside the
    // child update plus the merged re-fetch keep the parent consistent.
    let post = client
        .table("Post")
        .unwrap()
        .update(json!({
            "where": { "id": post_id },
            "data": { "author": { "update": { "name": "renamed", "id": 555 } } }
        }))
        .await
        .unwrap();

    assert_eq!(int(&post, "author_id"), 555);

    let author = client
        .table("Author")
        .unwrap()
        .find_unique(json!({ "where": { "id": 555 } }))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(text(&author, "name"), "renamed");
}

#[tokio::test]
async fn nested_update_many_stays_inside_the_parent() {
    let client = setup().await;
    let (author_id, _) = seed_author_with_post(&client, "A").await;
    let (_, other_post) = seed_author_with_post(&client, "B").await;

    client
        .table("Author")
        .unwrap()
        .update(json!({
            "where": { "id": author_id },
            "data": {
                "posts": { "updateMany": { "where": {}, "data": { "title": "mine" } } }
            }
        }))
        .await
        .unwrap();

    // Only the first author's post was renamed.
    let renamed = client
        .table("Post")
        .unwrap()
        .find_many(json!({ "where": { "title": "mine" } }))
        .await
        .unwrap();
    assert_eq!(renamed.len(), 1);

    let untouched = client
        .table("Post")
        .unwrap()
        .find_unique(json!({ "where": { "id": other_post } }))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(text(&untouched, "title"), "p");
}

#[tokio::test]
async fn update_of_a_missing_record_is_record_not_found() {
    let client = setup().await;

    let err = client
        .table("Author")
        .unwrap()
        .update(json!({ "where": { "id": 404 }, "data": { "name": "x" } }))
        .await
        .unwrap_err();

    assert!(err.is_record_not_found());
    assert_eq!(err.record_not_found_operation(), Some("Update"));
}
