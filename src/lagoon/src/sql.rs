//! The SQL-string builder.
//!
//! Pure functions from parsed operation payloads to [`Statement`]s. Filter
//! fragments go through [`filter::make_filter`], which writes through a
//! [`Params`] sink: `Bind` emits `?` placeholders and collects arguments,
//! `Inline` materializes Postgres-quoted literals for shape subscriptions.

pub(crate) mod filter;
pub(crate) use filter::push_filter;

use crate::ops::{Filter, FindManyOp, UniqueWhere};
use crate::{Error, Result, Statement, Value};

use indexmap::{IndexMap, IndexSet};
use std::fmt::Write;

/// Where interpolated values end up: as bound placeholders or as quoted
/// literals in the SQL text itself.
pub(crate) trait Params {
    fn push(&mut self, value: &Value, dst: &mut String) -> Result<()>;
}

/// Collects arguments and writes `?` placeholders.
#[derive(Default)]
pub(crate) struct Bind {
    pub args: Vec<Value>,
}

impl Params for Bind {
    fn push(&mut self, value: &Value, dst: &mut String) -> Result<()> {
        match value {
            Value::List(items) => {
                dst.push('(');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        dst.push_str(", ");
                    }
                    self.push(item, dst)?;
                }
                dst.push(')');
            }
            _ => {
                dst.push('?');
                self.args.push(value.clone());
            }
        }
        Ok(())
    }
}

/// Materializes every value as a quoted literal, per Postgres quoting rules.
pub(crate) struct Inline;

impl Params for Inline {
    fn push(&mut self, value: &Value, dst: &mut String) -> Result<()> {
        match value {
            Value::Null => dst.push_str("NULL"),
            Value::Bool(b) => {
                let _ = write!(dst, "{b}");
            }
            Value::I64(v) => {
                let _ = write!(dst, "{v}");
            }
            Value::F64(v) => {
                let _ = write!(dst, "{v}");
            }
            Value::String(s) => {
                let _ = write!(dst, "'{}'", s.replace('\'', "''"));
            }
            Value::List(items) => {
                dst.push('(');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        dst.push_str(", ");
                    }
                    self.push(item, dst)?;
                }
                dst.push(')');
            }
            Value::Bytes(_) | Value::Record(_) => {
                return Err(Error::unsupported(
                    "value of this type cannot be interpolated into a where clause",
                ));
            }
        }
        Ok(())
    }
}

pub(crate) fn ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn projection_list(projection: Option<&[String]>) -> String {
    match projection {
        Some(cols) => cols.iter().map(|c| ident(c)).collect::<Vec<_>>().join(", "),
        None => "*".to_string(),
    }
}

/// `WHERE` clause for an equality-only unique key. Null values compare with
/// `IS NULL` so an explicit null never silently filters the row out. An
/// empty key (an all-defaults create being re-fetched) constrains nothing.
fn push_unique_where(where_clause: &UniqueWhere, dst: &mut String, bind: &mut Bind) {
    if where_clause.is_empty() {
        return;
    }

    dst.push_str(" WHERE ");
    for (i, (field, value)) in where_clause.iter().enumerate() {
        if i > 0 {
            dst.push_str(" AND ");
        }
        if value.is_null() {
            let _ = write!(dst, "{} IS NULL", ident(field));
        } else {
            let _ = write!(dst, "{} = ", ident(field));
            let _ = bind.push(value, dst);
        }
    }
}

pub(crate) fn create(table: &str, scalars: &IndexMap<String, Value>) -> Statement {
    let mut bind = Bind::default();
    let mut sql = String::new();

    if scalars.is_empty() {
        let _ = write!(sql, "INSERT INTO {} DEFAULT VALUES RETURNING *", ident(table));
        return Statement::new(sql, bind.args);
    }

    let cols = scalars.keys().map(|c| ident(c)).collect::<Vec<_>>().join(", ");
    let _ = write!(sql, "INSERT INTO {} ({}) VALUES (", ident(table), cols);
    for (i, value) in scalars.values().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        let _ = bind.push(value, &mut sql);
    }
    sql.push_str(") RETURNING *");

    Statement::new(sql, bind.args)
}

pub(crate) fn create_many(table: &str, rows: &[IndexMap<String, Value>]) -> Statement {
    let mut columns: IndexSet<&str> = IndexSet::new();
    for row in rows {
        for column in row.keys() {
            columns.insert(column);
        }
    }

    let mut bind = Bind::default();
    let mut sql = String::new();
    let cols = columns.iter().map(|c| ident(c)).collect::<Vec<_>>().join(", ");
    let _ = write!(sql, "INSERT INTO {} ({}) VALUES ", ident(table), cols);

    for (r, row) in rows.iter().enumerate() {
        if r > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            let value = row.get(*column).cloned().unwrap_or(Value::Null);
            let _ = bind.push(&value, &mut sql);
        }
        sql.push(')');
    }

    Statement::new(sql, bind.args)
}

pub(crate) fn find_unique(
    table: &str,
    where_clause: &UniqueWhere,
    projection: Option<&[String]>,
) -> Statement {
    let mut bind = Bind::default();
    let mut sql = String::new();

    let _ = write!(sql, "SELECT {} FROM {}", projection_list(projection), ident(table));
    push_unique_where(where_clause, &mut sql, &mut bind);
    // One extra row so uniqueness violations are observable.
    sql.push_str(" LIMIT 2");

    Statement::new(sql, bind.args)
}

pub(crate) fn find_without_auto_select(table: &str, where_clause: &UniqueWhere) -> Statement {
    find_unique(table, where_clause, None)
}

pub(crate) fn find_many(op: &FindManyOp, projection: Option<&[String]>) -> Result<Statement> {
    let mut bind = Bind::default();
    let mut sql = String::new();

    let _ = write!(
        sql,
        "SELECT {} FROM {}",
        projection_list(projection),
        ident(&op.table)
    );

    if let Some(filter) = &op.r#where {
        sql.push_str(" WHERE ");
        push_filter(filter, &mut sql, &mut bind)?;
    }

    if !op.order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        for (i, order) in op.order_by.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            let _ = write!(
                sql,
                "{} {}",
                ident(&order.field),
                if order.descending { "DESC" } else { "ASC" }
            );
        }
    }

    match (op.take, op.skip) {
        (Some(take), Some(skip)) => {
            let _ = write!(sql, " LIMIT {take} OFFSET {skip}");
        }
        (Some(take), None) => {
            let _ = write!(sql, " LIMIT {take}");
        }
        // SQLite needs a LIMIT before OFFSET; -1 means unbounded.
        (None, Some(skip)) => {
            let _ = write!(sql, " LIMIT -1 OFFSET {skip}");
        }
        (None, None) => {}
    }

    Ok(Statement::new(sql, bind.args))
}

pub(crate) fn update(
    table: &str,
    set: &IndexMap<String, Value>,
    where_clause: &UniqueWhere,
) -> Statement {
    let mut bind = Bind::default();
    let mut sql = String::new();

    let _ = write!(sql, "UPDATE {} SET ", ident(table));
    for (i, (field, value)) in set.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        let _ = write!(sql, "{} = ", ident(field));
        let _ = bind.push(value, &mut sql);
    }
    push_unique_where(where_clause, &mut sql, &mut bind);
    sql.push_str(" RETURNING *");

    Statement::new(sql, bind.args)
}

pub(crate) fn update_many(
    table: &str,
    set: &IndexMap<String, Value>,
    filter: Option<&Filter>,
) -> Result<Statement> {
    let mut bind = Bind::default();
    let mut sql = String::new();

    let _ = write!(sql, "UPDATE {} SET ", ident(table));
    for (i, (field, value)) in set.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        let _ = write!(sql, "{} = ", ident(field));
        let _ = bind.push(value, &mut sql);
    }
    if let Some(filter) = filter {
        sql.push_str(" WHERE ");
        push_filter(filter, &mut sql, &mut bind)?;
    }

    Ok(Statement::new(sql, bind.args))
}

pub(crate) fn delete(table: &str, where_clause: &UniqueWhere) -> Statement {
    let mut bind = Bind::default();
    let mut sql = String::new();

    let _ = write!(sql, "DELETE FROM {}", ident(table));
    push_unique_where(where_clause, &mut sql, &mut bind);

    Statement::new(sql, bind.args)
}

pub(crate) fn delete_many(table: &str, filter: Option<&Filter>) -> Result<Statement> {
    let mut bind = Bind::default();
    let mut sql = String::new();

    let _ = write!(sql, "DELETE FROM {}", ident(table));
    if let Some(filter) = filter {
        sql.push_str(" WHERE ");
        push_filter(filter, &mut sql, &mut bind)?;
    }

    Ok(Statement::new(sql, bind.args))
}
