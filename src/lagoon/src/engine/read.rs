use super::{BoxFuture, Engine};
use crate::ops::{Cond, Filter, FindManyOp, FindUniqueOp, Include, IncludeArg, UniqueWhere};
use crate::{sql, Error, Result, Row, Value};

use lagoon_core::schema::Arity;

impl Engine<'_> {
    pub(super) async fn find_unique(&self, op: &FindUniqueOp) -> Result<Option<Row>> {
        let projection = self.projection(&op.table, op.select.as_ref(), op.include.as_ref())?;
        let row = self
            .find_unique_row(&op.table, &op.r#where, projection.as_deref())
            .await?;

        match row {
            Some(row) => {
                let rows = self
                    .fetch_includes(&op.table, vec![row], op.include.as_ref())
                    .await?;
                Ok(rows.into_iter().next())
            }
            None => Ok(None),
        }
    }

    /// The uniqueness probe behind every unique read: `LIMIT 2`, so a
    /// violated uniqueness expectation is observed rather than masked.
    pub(super) async fn find_unique_row(
        &self,
        table: &str,
        where_clause: &UniqueWhere,
        projection: Option<&[String]>,
    ) -> Result<Option<Row>> {
        let stmt = sql::find_unique(table, where_clause, projection);
        let mut rows = self.db.query(&stmt).await?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            _ => Err(Error::not_unique(format!(
                "query on `{table}` matched more than one row"
            ))),
        }
    }

    /// Pre-fetch for delete: the full row, ignoring any `select`.
    pub(super) async fn find_unique_without_auto_select(
        &self,
        table: &str,
        where_clause: &UniqueWhere,
    ) -> Result<Option<Row>> {
        let stmt = sql::find_without_auto_select(table, where_clause);
        let mut rows = self.db.query(&stmt).await?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            _ => Err(Error::not_unique(format!(
                "query on `{table}` matched more than one row"
            ))),
        }
    }

    pub(super) async fn find_first(&self, op: FindManyOp) -> Result<Option<Row>> {
        let rows = self.find_many(op).await?;
        Ok(rows.into_iter().next())
    }

    pub(super) fn find_many(&self, op: FindManyOp) -> BoxFuture<'_, Result<Vec<Row>>> {
        Box::pin(async move {
            let projection = self.projection(&op.table, op.select.as_ref(), op.include.as_ref())?;
            let stmt = sql::find_many(&op, projection.as_deref())?;
            let rows = self.db.query(&stmt).await?;
            self.fetch_includes(&op.table, rows, op.include.as_ref())
                .await
        })
    }

    /// Include expansion: one follow-up `find_many` per included relation,
    /// joined to the parents in memory. Relations are processed strictly one
    /// at a time, each attached before the next begins.
    pub(super) fn fetch_includes<'e>(
        &'e self,
        table: &'e str,
        rows: Vec<Row>,
        include: Option<&'e Include>,
    ) -> BoxFuture<'e, Result<Vec<Row>>> {
        Box::pin(async move {
            let Some(include) = include else {
                return Ok(rows);
            };

            let mut rows = rows;
            for (field, arg) in &include.entries {
                let nested = match arg {
                    IncludeArg::Skip => continue,
                    IncludeArg::All => None,
                    IncludeArg::Nested(op) => Some(op.as_ref()),
                };

                let relation = self
                    .schema
                    .relation_for_field(table, field)
                    .map_err(|_| {
                        Error::invalid_argument(format!(
                            "`{field}` does not name a relation on `{table}`"
                        ))
                    })?;
                let fk = self.schema.fk_fields(relation)?;
                let (parent_key, child_key) = if relation.is_outgoing() {
                    (&fk.from_field, &fk.to_field)
                } else {
                    (&fk.to_field, &fk.from_field)
                };

                // Parent-side key values, nulls excluded.
                let mut keys: Vec<Value> = vec![];
                for row in &rows {
                    if let Some(value) = row.get(parent_key) {
                        if !value.is_null() && !keys.contains(value) {
                            keys.push(value.clone());
                        }
                    }
                }

                let related = if keys.is_empty() {
                    vec![]
                } else {
                    let mut child = match nested {
                        Some(op) => op.clone(),
                        None => FindManyOp::default(),
                    };
                    child.table = relation.related_table.clone();
                    // User filter AND key filter.
                    child.r#where = Some(Filter::merge(
                        child.r#where.take(),
                        Filter::Cond(child_key.clone(), Cond::In(keys)),
                    ));
                    // The join column must come back even under a `select`.
                    if let Some(select) = &mut child.select {
                        if !select.fields.contains(child_key) {
                            select.fields.push(child_key.clone());
                        }
                    }
                    self.find_many(child).await?
                };

                for row in &mut rows {
                    let parent_value = match row.get(parent_key) {
                        Some(value) if !value.is_null() => value.clone(),
                        _ => {
                            if relation.arity == Arity::Many {
                                row.insert(field.clone(), Value::List(vec![]));
                            }
                            continue;
                        }
                    };

                    let matches: Vec<Row> = related
                        .iter()
                        .filter(|child| child.get(child_key) == Some(&parent_value))
                        .cloned()
                        .collect();

                    match relation.arity {
                        Arity::One => match matches.len() {
                            0 => {}
                            1 => {
                                let related_row = matches.into_iter().next().expect("one match");
                                row.insert(field.clone(), related_row);
                            }
                            _ => {
                                return Err(Error::invalid_argument(format!(
                                    "Relation `{}` is one-to-one but found several related objects",
                                    relation.name
                                )))
                            }
                        },
                        Arity::Many => {
                            row.insert(
                                field.clone(),
                                Value::List(matches.into_iter().map(Value::Record).collect()),
                            );
                        }
                    }
                }
            }

            Ok(rows)
        })
    }
}
