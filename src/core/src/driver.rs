use crate::stmt::{Row, Statement};
use crate::{async_trait, Result};

use std::fmt::Debug;

/// The raw database adapter the engine executes against.
///
/// One logical connection. The executor serializes operations, so a
/// transaction opened with [`Adapter::begin`] owns the connection until the
/// matching `commit` or `rollback`.
#[async_trait]
pub trait Adapter: Debug + Send + Sync + 'static {
    /// The dialect's default schema namespace (`main` for SQLite, `public`
    /// for Postgres).
    fn default_namespace(&self) -> &str;

    /// Execute a statement and decode every result row.
    async fn query(&self, stmt: &Statement) -> Result<Vec<Row>>;

    /// Execute a statement, returning the number of rows affected.
    async fn run(&self, stmt: &Statement) -> Result<u64>;

    async fn begin(&self) -> Result<()>;

    async fn commit(&self) -> Result<()>;

    async fn rollback(&self) -> Result<()>;
}
