//! The relational query engine.
//!
//! Planners run inside one transaction, strictly sequentially: at any instant
//! exactly one statement is in flight on the handle. Each planner is a
//! sequential `async fn`; the `Result` it returns is its single terminal
//! outcome.

mod create;
mod delete;
mod raw;
mod read;
mod update;

pub(crate) use raw::is_potentially_dangerous;

use crate::ops::{Include, IncludeArg, Operation, Response, Select};
use crate::{Result, Schema};

use lagoon_core::Adapter;

use indexmap::IndexSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub(crate) struct Engine<'a> {
    schema: &'a Schema,
    db: &'a dyn Adapter,

    /// Tables written by this operation, in first-touch order. Published to
    /// the notifier after commit.
    touched: Mutex<IndexSet<String>>,
}

impl<'a> Engine<'a> {
    pub(crate) fn new(schema: &'a Schema, db: &'a dyn Adapter) -> Engine<'a> {
        Engine {
            schema,
            db,
            touched: Mutex::new(IndexSet::new()),
        }
    }

    pub(crate) async fn run(&self, op: Operation) -> Result<Response> {
        match op {
            Operation::Create(op) => self.create(op).await.map(Response::one),
            Operation::CreateMany(op) => self.create_many(op).await.map(Response::Count),
            Operation::FindUnique(op) => self.find_unique(&op).await.map(Response::maybe),
            Operation::FindFirst(op) => self.find_first(op).await.map(Response::maybe),
            Operation::FindMany(op) => self.find_many(op).await.map(Response::Rows),
            Operation::Update(op) => self.update(op).await.map(Response::one),
            Operation::UpdateMany(op) => self.update_many(op).await.map(Response::Count),
            Operation::Upsert(op) => self.upsert(op).await.map(Response::one),
            Operation::Delete(op) => self.delete(op).await.map(Response::one),
            Operation::DeleteMany(op) => self.delete_many(op).await.map(Response::Count),
        }
    }

    fn touch(&self, table: &str) {
        self.touched.lock().unwrap().insert(table.to_string());
    }

    pub(crate) fn touched_tables(&self) -> Vec<String> {
        self.touched.lock().unwrap().iter().cloned().collect()
    }

    /// Output columns for a `select`, widened with the key columns include
    /// assembly joins on.
    fn projection(
        &self,
        table: &str,
        select: Option<&Select>,
        include: Option<&Include>,
    ) -> Result<Option<Vec<String>>> {
        let Some(select) = select else { return Ok(None) };

        let mut columns: IndexSet<String> = select.fields.iter().cloned().collect();
        if let Some(include) = include {
            for (field, arg) in &include.entries {
                if matches!(arg, IncludeArg::Skip) {
                    continue;
                }
                let relation = self.schema.relation_for_field(table, field)?;
                let fk = self.schema.fk_fields(relation)?;
                columns.insert(if relation.is_outgoing() {
                    fk.from_field
                } else {
                    fk.to_field
                });
            }
        }

        Ok(Some(columns.into_iter().collect()))
    }
}
