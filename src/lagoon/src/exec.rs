//! The transaction executor.
//!
//! Wraps the adapter and drives one validated operation at a time. Mutations
//! run inside a transaction: the engine's first error rolls everything back
//! and surfaces verbatim; on commit, one change event per touched table goes
//! out to the notifier.

use crate::engine::Engine;
use crate::notify::Notifier;
use crate::ops::{Operation, Response};
use crate::{Result, Row, Schema, Statement};

use lagoon_core::Adapter;

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

pub(crate) struct Executor {
    adapter: Arc<dyn Adapter>,

    /// One top-level operation owns the adapter handle at a time.
    gate: Mutex<()>,
}

impl Executor {
    pub(crate) fn new(adapter: Arc<dyn Adapter>) -> Executor {
        Executor {
            adapter,
            gate: Mutex::new(()),
        }
    }

    pub(crate) async fn execute(
        &self,
        schema: &Schema,
        notifier: &Notifier,
        op: Operation,
    ) -> Result<Response> {
        let _guard = self.gate.lock().await;
        let engine = Engine::new(schema, &*self.adapter);

        if !op.is_mutating() {
            return engine.run(op).await;
        }

        self.adapter.begin().await?;
        match engine.run(op).await {
            Ok(response) => {
                self.adapter.commit().await?;
                for table in engine.touched_tables() {
                    notifier.table_changed(&table);
                }
                Ok(response)
            }
            Err(err) => {
                debug!(error = %err, "rolling back");
                let _ = self.adapter.rollback().await;
                Err(err)
            }
        }
    }

    /// Single raw statement on the shared handle, outside any transaction.
    pub(crate) async fn query_raw(&self, stmt: &Statement) -> Result<Vec<Row>> {
        let _guard = self.gate.lock().await;
        self.adapter.query(stmt).await
    }
}
