//! The public client surface.

use crate::engine::is_potentially_dangerous;
use crate::exec::Executor;
use crate::live::LiveQuery;
use crate::notify::Notifier;
use crate::ops::{Operation, Response};
use crate::sync::{
    build_shape, NoopReplicationTransformManager, NoopShapeManager, ReplicationTransformManager,
    RowTransform, Shape, ShapeManager,
};
use crate::{validate, Error, Result, Row, Schema, Statement};

use lagoon_core::schema::QualifiedTable;
use lagoon_core::Adapter;

use serde_json::Value as Json;
use std::sync::Arc;

struct Shared {
    schema: Arc<Schema>,
    executor: Executor,
    notifier: Notifier,
    shapes: Arc<dyn ShapeManager>,
    replication: Arc<dyn ReplicationTransformManager>,
    namespace: String,
}

/// A schema-aware data-access client over one adapter. Cheap to clone;
/// clones share the connection, schema, and notifier.
#[derive(Clone)]
pub struct Client {
    shared: Arc<Shared>,
}

pub struct Builder {
    schema: Option<Schema>,
    adapter: Option<Arc<dyn Adapter>>,
    shapes: Arc<dyn ShapeManager>,
    replication: Arc<dyn ReplicationTransformManager>,
}

impl Client {
    pub fn builder() -> Builder {
        Builder {
            schema: None,
            adapter: None,
            shapes: Arc::new(NoopShapeManager),
            replication: Arc::new(NoopReplicationTransformManager),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.shared.schema
    }

    pub fn notifier(&self) -> &Notifier {
        &self.shared.notifier
    }

    /// Handle to one table's operations.
    pub fn table(&self, name: &str) -> Result<Table> {
        self.shared.schema.table(name)?;
        Ok(Table {
            client: self.clone(),
            name: name.to_string(),
        })
    }

    /// Read-only raw SQL. Statements the keyword sniffer flags as
    /// potentially mutating are rejected.
    pub async fn raw_query(&self, stmt: Statement) -> Result<Vec<Row>> {
        if is_potentially_dangerous(&stmt.text) {
            return Err(Error::invalid_argument(
                "statement may mutate the store; use `unsafe_exec` to run it",
            ));
        }
        self.shared.executor.query_raw(&stmt).await
    }

    /// Raw SQL with the sniffer bypassed.
    pub async fn unsafe_exec(&self, stmt: Statement) -> Result<Vec<Row>> {
        self.shared.executor.query_raw(&stmt).await
    }

    pub(crate) async fn execute(&self, op: Operation) -> Result<Response> {
        self.shared
            .executor
            .execute(&self.shared.schema, &self.shared.notifier, op)
            .await
    }
}

impl Builder {
    pub fn schema(mut self, schema: Schema) -> Builder {
        self.schema = Some(schema);
        self
    }

    pub fn adapter(mut self, adapter: impl Adapter) -> Builder {
        self.adapter = Some(Arc::new(adapter));
        self
    }

    pub fn shape_manager(mut self, manager: impl ShapeManager) -> Builder {
        self.shapes = Arc::new(manager);
        self
    }

    pub fn replication_transform_manager(
        mut self,
        manager: impl ReplicationTransformManager,
    ) -> Builder {
        self.replication = Arc::new(manager);
        self
    }

    pub fn build(self) -> Result<Client> {
        let schema = self
            .schema
            .ok_or_else(|| Error::invalid_argument("a schema is required"))?;
        let adapter = self
            .adapter
            .ok_or_else(|| Error::invalid_argument("an adapter is required"))?;
        let namespace = adapter.default_namespace().to_string();

        Ok(Client {
            shared: Arc::new(Shared {
                schema: Arc::new(schema),
                executor: Executor::new(adapter),
                notifier: Notifier::new(),
                shapes: self.shapes,
                replication: self.replication,
                namespace,
            }),
        })
    }
}

/// Count returned by the batch mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchResult {
    pub count: u64,
}

/// Per-table operation surface.
pub struct Table {
    client: Client,
    name: String,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table").field("name", &self.name).finish()
    }
}

impl Table {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn create(&self, input: Json) -> Result<Row> {
        let op = validate::create(self.schema(), &self.name, &input)?;
        let rows = self.client.execute(Operation::Create(op)).await?.into_rows();
        Ok(one(rows))
    }

    pub async fn create_many(&self, input: Json) -> Result<BatchResult> {
        let op = validate::create_many(self.schema(), &self.name, &input)?;
        let count = self
            .client
            .execute(Operation::CreateMany(op))
            .await?
            .into_count();
        Ok(BatchResult { count })
    }

    pub async fn find_unique(&self, input: Json) -> Result<Option<Row>> {
        let op = validate::find_unique(self.schema(), &self.name, &input)?;
        let mut rows = self
            .client
            .execute(Operation::FindUnique(op))
            .await?
            .into_rows();
        Ok(rows.pop())
    }

    pub async fn find_first(&self, input: Json) -> Result<Option<Row>> {
        let op = validate::find_non_unique(self.schema(), &self.name, &input)?;
        let mut rows = self
            .client
            .execute(Operation::FindFirst(op))
            .await?
            .into_rows();
        Ok(rows.pop())
    }

    pub async fn find_many(&self, input: Json) -> Result<Vec<Row>> {
        let op = validate::find_non_unique(self.schema(), &self.name, &input)?;
        Ok(self.client.execute(Operation::FindMany(op)).await?.into_rows())
    }

    pub async fn update(&self, input: Json) -> Result<Row> {
        let op = validate::update(self.schema(), &self.name, &input)?;
        let rows = self.client.execute(Operation::Update(op)).await?.into_rows();
        Ok(one(rows))
    }

    pub async fn update_many(&self, input: Json) -> Result<BatchResult> {
        let op = validate::update_many(self.schema(), &self.name, &input)?;
        let count = self
            .client
            .execute(Operation::UpdateMany(op))
            .await?
            .into_count();
        Ok(BatchResult { count })
    }

    pub async fn upsert(&self, input: Json) -> Result<Row> {
        let op = validate::upsert(self.schema(), &self.name, &input)?;
        let rows = self.client.execute(Operation::Upsert(op)).await?.into_rows();
        Ok(one(rows))
    }

    pub async fn delete(&self, input: Json) -> Result<Row> {
        let op = validate::delete(self.schema(), &self.name, &input)?;
        let rows = self.client.execute(Operation::Delete(op)).await?.into_rows();
        Ok(one(rows))
    }

    pub async fn delete_many(&self, input: Json) -> Result<BatchResult> {
        let op = validate::delete_many(self.schema(), &self.name, &input)?;
        let count = self
            .client
            .execute(Operation::DeleteMany(op))
            .await?
            .into_count();
        Ok(BatchResult { count })
    }

    /// Subscribe this table (and its included relations) as a replication
    /// shape. Returns the computed shape.
    pub async fn sync(&self, input: Json) -> Result<Shape> {
        let op = validate::sync(self.schema(), &self.name, &input)?;
        let shape = build_shape(self.schema(), &op)?;
        self.client
            .shared
            .shapes
            .subscribe(std::slice::from_ref(&shape), op.key.as_deref())?;
        Ok(shape)
    }

    pub fn live_unique(&self, input: Json) -> Result<LiveQuery> {
        let op = validate::find_unique(self.schema(), &self.name, &input)?;
        LiveQuery::unique(self.client.clone(), op)
    }

    pub fn live_first(&self, input: Json) -> Result<LiveQuery> {
        let op = validate::find_non_unique(self.schema(), &self.name, &input)?;
        LiveQuery::first(self.client.clone(), op)
    }

    pub fn live_many(&self, input: Json) -> Result<LiveQuery> {
        let op = validate::find_non_unique(self.schema(), &self.name, &input)?;
        LiveQuery::many(self.client.clone(), op)
    }

    pub fn set_replication_transform(&self, transform: RowTransform) -> Result<()> {
        self.client
            .shared
            .replication
            .set_table_transform(self.qualified(), transform)
    }

    pub fn clear_replication_transform(&self) -> Result<()> {
        self.client
            .shared
            .replication
            .clear_table_transform(&self.qualified())
    }

    fn qualified(&self) -> QualifiedTable {
        QualifiedTable::new(&self.client.shared.namespace, &self.name)
    }

    fn schema(&self) -> &Schema {
        self.client.schema()
    }
}

fn one(mut rows: Vec<Row>) -> Row {
    rows.pop().expect("planner returns exactly one row")
}
