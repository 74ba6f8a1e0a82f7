//! Shape subscriptions and replication hooks.
//!
//! The core computes shapes (root table, compiled `where`, included tables)
//! and hands them to the external shape manager; everything past that
//! boundary is opaque. The `where` compilation here is the server-side form:
//! fully materialized literals, no placeholders.

use crate::ops::{Filter, Include, IncludeArg, SyncOp, SyncWhere};
use crate::sql::{self, Inline};
use crate::{Result, Row, Schema};

use lagoon_core::schema::QualifiedTable;

use indexmap::IndexSet;
use std::sync::Arc;

/// An opaque descriptor consumed by the shape manager to initiate a
/// replication subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub table: String,

    /// Fully materialized SQL fragment, or `None` for the whole table.
    pub where_clause: Option<String>,

    pub include: Vec<Shape>,
}

impl Shape {
    /// Every table the shape spans: the root plus the transitive closure of
    /// its includes.
    pub fn tables(&self) -> Vec<String> {
        let mut tables = IndexSet::new();
        self.collect_tables(&mut tables);
        tables.into_iter().collect()
    }

    fn collect_tables(&self, out: &mut IndexSet<String>) {
        out.insert(self.table.clone());
        for nested in &self.include {
            nested.collect_tables(out);
        }
    }
}

pub trait ShapeManager: Send + Sync + 'static {
    fn subscribe(&self, shapes: &[Shape], key: Option<&str>) -> Result<()>;
}

impl<T: ShapeManager> ShapeManager for Arc<T> {
    fn subscribe(&self, shapes: &[Shape], key: Option<&str>) -> Result<()> {
        (**self).subscribe(shapes, key)
    }
}

/// Applied to rows crossing the replication boundary for one table.
pub type RowTransform = Arc<dyn Fn(Row) -> Row + Send + Sync>;

pub trait ReplicationTransformManager: Send + Sync + 'static {
    fn set_table_transform(&self, table: QualifiedTable, transform: RowTransform) -> Result<()>;

    fn clear_table_transform(&self, table: &QualifiedTable) -> Result<()>;
}

/// Stand-in for deployments without a replication backend.
#[derive(Debug, Default)]
pub struct NoopShapeManager;

impl ShapeManager for NoopShapeManager {
    fn subscribe(&self, _shapes: &[Shape], _key: Option<&str>) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NoopReplicationTransformManager;

impl ReplicationTransformManager for NoopReplicationTransformManager {
    fn set_table_transform(&self, _table: QualifiedTable, _transform: RowTransform) -> Result<()> {
        Ok(())
    }

    fn clear_table_transform(&self, _table: &QualifiedTable) -> Result<()> {
        Ok(())
    }
}

pub(crate) fn build_shape(schema: &Schema, op: &SyncOp) -> Result<Shape> {
    let where_clause = match &op.r#where {
        None => None,
        // A string `where` passes through verbatim.
        Some(SyncWhere::Raw(raw)) => Some(raw.clone()),
        Some(SyncWhere::Object(filter)) => Some(compile_where(filter)?),
    };

    Ok(Shape {
        table: op.table.clone(),
        where_clause,
        include: include_shapes(schema, &op.table, op.include.as_ref())?,
    })
}

fn include_shapes(
    schema: &Schema,
    table: &str,
    include: Option<&Include>,
) -> Result<Vec<Shape>> {
    let Some(include) = include else {
        return Ok(vec![]);
    };

    let mut shapes = vec![];
    for (field, arg) in &include.entries {
        let nested = match arg {
            IncludeArg::Skip => continue,
            IncludeArg::All => None,
            IncludeArg::Nested(op) => Some(op.as_ref()),
        };

        let relation = schema.relation_for_field(table, field)?;
        let (where_clause, nested_include) = match nested {
            Some(op) => (
                op.r#where.as_ref().map(compile_where).transpose()?,
                op.include.as_ref(),
            ),
            None => (None, None),
        };

        shapes.push(Shape {
            table: relation.related_table.clone(),
            where_clause,
            include: include_shapes(schema, &relation.related_table, nested_include)?,
        });
    }

    Ok(shapes)
}

/// Compile an object `where` to a materialized SQL fragment: each entry
/// parenthesized, joined with `AND`, values quoted per Postgres rules.
pub(crate) fn compile_where(filter: &Filter) -> Result<String> {
    let mut out = String::new();
    sql::push_filter(filter, &mut out, &mut Inline)?;
    Ok(out)
}
