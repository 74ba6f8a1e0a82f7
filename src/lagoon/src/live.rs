//! Live query wrappers.
//!
//! A live query is a re-runnable read plus the set of tables it spans. The
//! notifier drives refreshes: whenever a tracked table changes, subscribed
//! callbacks fire and the caller re-runs the query.

use crate::client::Client;
use crate::ops::{FindManyOp, FindUniqueOp, Include, IncludeArg, Operation};
use crate::{Result, Row, Schema};

use indexmap::IndexSet;
use tokio::task::JoinHandle;

/// One execution of a live read.
#[derive(Debug)]
pub struct LiveResult {
    pub rows: Vec<Row>,
    pub tracked_tables: Vec<String>,
}

enum LiveRead {
    Unique(FindUniqueOp),
    First(FindManyOp),
    Many(FindManyOp),
}

pub struct LiveQuery {
    client: Client,
    read: LiveRead,
    tracked: Vec<String>,
}

impl LiveQuery {
    pub(crate) fn unique(client: Client, op: FindUniqueOp) -> Result<LiveQuery> {
        let tracked = tracked_tables(client.schema(), &op.table, op.include.as_ref())?;
        Ok(LiveQuery {
            client,
            read: LiveRead::Unique(op),
            tracked,
        })
    }

    pub(crate) fn first(client: Client, op: FindManyOp) -> Result<LiveQuery> {
        let tracked = tracked_tables(client.schema(), &op.table, op.include.as_ref())?;
        Ok(LiveQuery {
            client,
            read: LiveRead::First(op),
            tracked,
        })
    }

    pub(crate) fn many(client: Client, op: FindManyOp) -> Result<LiveQuery> {
        let tracked = tracked_tables(client.schema(), &op.table, op.include.as_ref())?;
        Ok(LiveQuery {
            client,
            read: LiveRead::Many(op),
            tracked,
        })
    }

    pub fn tracked_tables(&self) -> &[String] {
        &self.tracked
    }

    /// Run the underlying read. Unique and first reads yield at most one
    /// row.
    pub async fn run(&self) -> Result<LiveResult> {
        let op = match &self.read {
            LiveRead::Unique(op) => Operation::FindUnique(op.clone()),
            LiveRead::First(op) => Operation::FindFirst(op.clone()),
            LiveRead::Many(op) => Operation::FindMany(op.clone()),
        };

        let rows = self.client.execute(op).await?.into_rows();
        Ok(LiveResult {
            rows,
            tracked_tables: self.tracked.clone(),
        })
    }

    /// Invoke `callback` after any tracked table changes. Abort the returned
    /// handle to unsubscribe.
    pub fn subscribe(&self, callback: impl Fn() + Send + 'static) -> JoinHandle<()> {
        use tokio::sync::broadcast::error::RecvError;

        let mut events = self.client.notifier().subscribe();
        let tracked = self.tracked.clone();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if tracked.iter().any(|table| *table == event.table) {
                            callback();
                        }
                    }
                    Err(RecvError::Lagged(_)) => callback(),
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

/// The transitive closure of the include tree's tables, root first.
pub(crate) fn tracked_tables(
    schema: &Schema,
    table: &str,
    include: Option<&Include>,
) -> Result<Vec<String>> {
    let mut tables = IndexSet::new();
    collect(schema, table, include, &mut tables)?;
    Ok(tables.into_iter().collect())
}

fn collect(
    schema: &Schema,
    table: &str,
    include: Option<&Include>,
    out: &mut IndexSet<String>,
) -> Result<()> {
    out.insert(table.to_string());

    let Some(include) = include else {
        return Ok(());
    };

    for (field, arg) in &include.entries {
        let nested = match arg {
            IncludeArg::Skip => continue,
            IncludeArg::All => None,
            IncludeArg::Nested(op) => Some(op.as_ref()),
        };

        let relation = schema.relation_for_field(table, field)?;
        collect(
            schema,
            &relation.related_table,
            nested.and_then(|op| op.include.as_ref()),
            out,
        )?;
    }

    Ok(())
}
