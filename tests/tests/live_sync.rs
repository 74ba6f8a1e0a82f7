//! Live queries, change notification, shape sync, and the raw escape hatch.

use tests::*;

use lagoon::{NoopReplicationTransformManager, Shape, ShapeManager};

use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[tokio::test]
async fn live_query_tracks_the_include_closure() {
    let client = setup().await;

    let live = client
        .table("Author")
        .unwrap()
        .live_many(json!({
            "include": {
                "posts": { "include": { "author": true } },
                "profile": true
            }
        }))
        .unwrap();

    // Root plus the transitive closure of included relations, deduplicated.
    assert_eq!(live.tracked_tables(), ["Author", "Post", "Profile"]);
}

#[tokio::test]
async fn live_query_reruns_and_sees_committed_changes() {
    let client = setup().await;
    let authors = client.table("Author").unwrap();

    let live = authors.live_many(json!(null)).unwrap();
    assert!(live.run().await.unwrap().rows.is_empty());

    authors
        .create(json!({ "data": { "name": "A" } }))
        .await
        .unwrap();

    let result = live.run().await.unwrap();
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.tracked_tables, ["Author"]);
}

#[tokio::test]
async fn subscriptions_fire_after_commit_on_tracked_tables() {
    let client = setup().await;

    let live = client.table("Post").unwrap().live_many(json!(null)).unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let handle = live.subscribe(move || {
        let _ = tx.send(());
    });

    // A write to an untracked table stays silent.
    client
        .table("User")
        .unwrap()
        .create(json!({ "data": { "id": 1 } }))
        .await
        .unwrap();

    // A nested create touches Post through the incoming relation.
    client
        .table("Author")
        .unwrap()
        .create(json!({ "data": { "name": "A", "posts": { "create": { "title": "p" } } } }))
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("change notification within a second")
        .expect("channel open");

    handle.abort();
}

#[derive(Debug, Default)]
struct RecordingShapes {
    subscribed: Mutex<Vec<(Vec<Shape>, Option<String>)>>,
}

impl ShapeManager for RecordingShapes {
    fn subscribe(&self, shapes: &[Shape], key: Option<&str>) -> lagoon::Result<()> {
        self.subscribed
            .lock()
            .unwrap()
            .push((shapes.to_vec(), key.map(str::to_string)));
        Ok(())
    }
}

fn sync_client(shapes: Arc<RecordingShapes>) -> Client {
    Client::builder()
        .schema(blog_schema())
        .adapter(lagoon_sqlite::Sqlite::in_memory())
        .shape_manager(shapes)
        .replication_transform_manager(NoopReplicationTransformManager)
        .build()
        .unwrap()
}

#[tokio::test]
async fn sync_compiles_the_where_and_subscribes_the_shape() {
    let shapes = Arc::new(RecordingShapes::default());
    let client = sync_client(shapes.clone());

    let shape = client
        .table("Author")
        .unwrap()
        .sync(json!({
            "where": { "name": "O'Brien", "id": { "in": [1, 2] } },
            "include": { "posts": true },
            "key": "authors"
        }))
        .await
        .unwrap();

    assert_eq!(
        shape.where_clause.as_deref(),
        Some("(\"name\" = 'O''Brien') AND (\"id\" IN (1, 2))")
    );
    assert_eq!(shape.tables(), ["Author", "Post"]);

    let recorded = shapes.subscribed.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].0, vec![shape]);
    assert_eq!(recorded[0].1.as_deref(), Some("authors"));
}

#[tokio::test]
async fn sync_passes_a_string_where_through_verbatim() {
    let shapes = Arc::new(RecordingShapes::default());
    let client = sync_client(shapes);

    let shape = client
        .table("Post")
        .unwrap()
        .sync(json!({ "where": "\"title\" LIKE 'a%'" }))
        .await
        .unwrap();

    assert_eq!(shape.where_clause.as_deref(), Some("\"title\" LIKE 'a%'"));
}

#[tokio::test]
async fn sync_rejects_relation_filters() {
    let client = setup().await;

    let err = client
        .table("Author")
        .unwrap()
        .sync(json!({ "where": { "posts": { "title": "x" } } }))
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("relation filters"));
}

#[tokio::test]
async fn raw_query_screens_mutating_statements() {
    let client = setup().await;

    let rows = client
        .raw_query(Statement::raw("SELECT 1 AS one"))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);

    let err = client
        .raw_query(Statement::raw("DROP TABLE \"Post\""))
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());

    // The bypass runs anything.
    client
        .unsafe_exec(Statement::raw("CREATE TABLE scratch (x INTEGER)"))
        .await
        .unwrap();
}
