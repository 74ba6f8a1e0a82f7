//! Where-clause fragments.

use super::{ident, Params};
use crate::ops::{Cond, Filter};
use crate::{Result, Value};

use std::fmt::Write;

/// Write a filter tree as a SQL fragment. Groups are parenthesized; empty
/// groups degrade to constants so the surrounding clause stays well formed.
pub(crate) fn push_filter(
    filter: &Filter,
    dst: &mut String,
    params: &mut impl Params,
) -> Result<()> {
    match filter {
        Filter::And(items) => push_group(items, " AND ", "1 = 1", dst, params),
        Filter::Or(items) => push_group(items, " OR ", "1 = 0", dst, params),
        Filter::Not(items) => {
            if items.is_empty() {
                dst.push_str("1 = 1");
                return Ok(());
            }
            dst.push_str("NOT (");
            push_group(items, " AND ", "1 = 1", dst, params)?;
            dst.push(')');
            Ok(())
        }
        Filter::Cond(field, cond) => make_filter(cond, field, None, dst, params),
    }
}

fn push_group(
    items: &[Filter],
    joiner: &str,
    empty: &str,
    dst: &mut String,
    params: &mut impl Params,
) -> Result<()> {
    if items.is_empty() {
        dst.push_str(empty);
        return Ok(());
    }

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            dst.push_str(joiner);
        }
        dst.push('(');
        push_filter(item, dst, params)?;
        dst.push(')');
    }
    Ok(())
}

/// One condition on one column, optionally alias-qualified.
pub(crate) fn make_filter(
    cond: &Cond,
    key: &str,
    alias_prefix: Option<&str>,
    dst: &mut String,
    params: &mut impl Params,
) -> Result<()> {
    let column = match alias_prefix {
        Some(alias) => format!("{}.{}", ident(alias), ident(key)),
        None => ident(key),
    };

    match cond {
        Cond::Eq(Value::Null) => {
            let _ = write!(dst, "{column} IS NULL");
        }
        Cond::Eq(value) => {
            let _ = write!(dst, "{column} = ");
            params.push(value, dst)?;
        }
        Cond::Ne(Value::Null) => {
            let _ = write!(dst, "{column} IS NOT NULL");
        }
        Cond::Ne(value) => {
            let _ = write!(dst, "{column} <> ");
            params.push(value, dst)?;
        }
        Cond::In(items) => push_in(&column, "IN", items, "1 = 0", dst, params)?,
        Cond::NotIn(items) => push_in(&column, "NOT IN", items, "1 = 1", dst, params)?,
        Cond::Lt(value) => {
            let _ = write!(dst, "{column} < ");
            params.push(value, dst)?;
        }
        Cond::Lte(value) => {
            let _ = write!(dst, "{column} <= ");
            params.push(value, dst)?;
        }
        Cond::Gt(value) => {
            let _ = write!(dst, "{column} > ");
            params.push(value, dst)?;
        }
        Cond::Gte(value) => {
            let _ = write!(dst, "{column} >= ");
            params.push(value, dst)?;
        }
        Cond::StartsWith(prefix) => {
            let _ = write!(dst, "{column} LIKE ");
            params.push(&Value::String(format!("{prefix}%")), dst)?;
        }
        Cond::EndsWith(suffix) => {
            let _ = write!(dst, "{column} LIKE ");
            params.push(&Value::String(format!("%{suffix}")), dst)?;
        }
        Cond::Contains(infix) => {
            let _ = write!(dst, "{column} LIKE ");
            params.push(&Value::String(format!("%{infix}%")), dst)?;
        }
    }
    Ok(())
}

fn push_in(
    column: &str,
    op: &str,
    items: &[Value],
    empty: &str,
    dst: &mut String,
    params: &mut impl Params,
) -> Result<()> {
    // `IN ()` is not valid SQL.
    if items.is_empty() {
        dst.push_str(empty);
        return Ok(());
    }

    let _ = write!(dst, "{column} {op} ");
    params.push(&Value::List(items.to_vec()), dst)
}
