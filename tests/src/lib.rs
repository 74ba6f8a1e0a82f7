//! Shared fixtures for the integration suites.

pub use lagoon::{BatchResult, Client, Error, FieldType, Row, Schema, Statement, Value};

/// Blog-shaped schema exercising every relation direction and arity:
/// `Post.author` outgoing one, `Author.posts` incoming many,
/// `Author.profile` incoming one, plus a standalone `User` table.
///
/// `User.email` is unique in the registry but deliberately unconstrained in
/// the DDL so uniqueness-violation paths can be driven from tests.
pub fn blog_schema() -> Schema {
    Schema::builder()
        .table("Author", |t| {
            t.field("id", FieldType::Integer).primary_key().auto_generated();
            t.field("name", FieldType::Text);
            t.has_many("posts", "AuthorPosts", "Post");
            t.has_one("profile", "AuthorProfile", "Profile");
        })
        .table("Post", |t| {
            t.field("id", FieldType::Integer).primary_key().auto_generated();
            t.field("title", FieldType::Text);
            t.field("author_id", FieldType::Integer).nullable();
            t.belongs_to("author", "AuthorPosts", "Author", "author_id", "id");
        })
        .table("Profile", |t| {
            t.field("id", FieldType::Integer).primary_key().auto_generated();
            t.field("bio", FieldType::Text).nullable();
            t.field("author_id", FieldType::Integer).nullable();
            t.belongs_to("author", "AuthorProfile", "Author", "author_id", "id");
        })
        .table("User", |t| {
            t.field("id", FieldType::Integer).primary_key();
            t.field("email", FieldType::Text).unique().nullable();
            t.field("name", FieldType::Text).nullable();
            t.field("active", FieldType::Boolean).nullable();
            t.field("created_at", FieldType::Timestamp).nullable();
        })
        .build()
        .unwrap()
}

const DDL: &[&str] = &[
    "CREATE TABLE \"Author\" (id INTEGER PRIMARY KEY, name TEXT)",
    "CREATE TABLE \"Post\" (id INTEGER PRIMARY KEY, title TEXT, author_id INTEGER)",
    "CREATE TABLE \"Profile\" (id INTEGER PRIMARY KEY, bio TEXT, author_id INTEGER)",
    "CREATE TABLE \"User\" (id INTEGER PRIMARY KEY, email TEXT, name TEXT, active INTEGER, created_at TEXT)",
];

pub async fn setup() -> Client {
    let client = Client::builder()
        .schema(blog_schema())
        .adapter(lagoon_sqlite::Sqlite::in_memory())
        .build()
        .unwrap();

    for ddl in DDL {
        client.unsafe_exec(Statement::raw(*ddl)).await.unwrap();
    }

    client
}

pub fn text(row: &Row, column: &str) -> String {
    row.get(column)
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| panic!("`{column}` is not text in {row:?}"))
        .to_string()
}

pub fn int(row: &Row, column: &str) -> i64 {
    row.get(column)
        .and_then(|v| v.as_i64())
        .unwrap_or_else(|| panic!("`{column}` is not an integer in {row:?}"))
}

/// The rows attached under a to-many relation field.
pub fn related(row: &Row, field: &str) -> Vec<Row> {
    row.get(field)
        .and_then(|v| v.as_list())
        .unwrap_or_else(|| panic!("`{field}` is not a list in {row:?}"))
        .iter()
        .map(|v| v.as_record().expect("list of rows").clone())
        .collect()
}
