use super::{BoxFuture, Engine};
use crate::ops::{Cond, CreateOp, Filter, UniqueWhere, UpdateManyOp, UpdateOp, UpsertOp};
use crate::{sql, Error, Result, Row, Value};

use indexmap::IndexMap;
use tracing::debug;

impl Engine<'_> {
    /// Nested update. Steps run strictly in order: pre-image fetch, scalar
    /// update, FK rewrite, nested relation updates, re-fetch.
    pub(super) fn update(&self, op: UpdateOp) -> BoxFuture<'_, Result<Row>> {
        Box::pin(async move {
            let UpdateOp {
                table,
                r#where,
                mut data,
                select,
                include,
            } = op;

            self.touch(&table);
            debug!(table = %table, "planning update");

            let og = self
                .find_unique_row(&table, &r#where, None)
                .await?
                .ok_or_else(|| Error::record_not_found("Update"))?;

            let upd = if data.scalars.is_empty() {
                og.clone()
            } else {
                let stmt = sql::update(&table, &data.scalars, &r#where);
                let mut rows = self.db.query(&stmt).await?;
                match rows.len() {
                    1 => rows.pop().expect("length checked above"),
                    0 => return Err(Error::record_not_found("Update")),
                    _ => {
                        return Err(Error::not_unique(format!(
                            "update on `{table}` matched more than one row"
                        )))
                    }
                }
            };

            self.rewrite_foreign_keys(&table, &og, &upd).await?;

            // Scalars already written plus any FK changed by an outgoing
            // nested update; merged into the re-fetch key below.
            let mut non_relational = data.scalars.clone();

            let nested_fields: Vec<String> = data.relations.keys().cloned().collect();
            for field in &nested_fields {
                let relation = self.schema.relation_for_field(&table, field)?;
                let fk = self.schema.fk_fields(relation)?;
                let nested = data
                    .relations
                    .shift_remove(field)
                    .expect("relation key collected above");

                if relation.is_outgoing() {
                    for item in nested.update {
                        let mut child_where = UniqueWhere::new();
                        child_where.insert(
                            fk.to_field.clone(),
                            og.get(&fk.from_field).cloned().unwrap_or(Value::Null),
                        );

                        let updated = self
                            .update(UpdateOp {
                                table: relation.related_table.clone(),
                                r#where: child_where,
                                data: item.data,
                                select: None,
                                include: None,
                            })
                            .await?;

                        // The child update may have moved the referenced key.
                        non_relational.insert(
                            fk.from_field.clone(),
                            updated.get(&fk.to_field).cloned().unwrap_or(Value::Null),
                        );
                    }
                } else {
                    let parent_key = og.get(&fk.to_field).cloned().unwrap_or(Value::Null);

                    for item in nested.update {
                        if relation.is_many() {
                            // The nested `where` alone identifies the child;
                            // relatedness is verified after the fact.
                            let child_where = item.r#where.ok_or_else(|| {
                                Error::invalid_argument(format!(
                                    "data.{field}: `where` is required for a to-many nested update"
                                ))
                            })?;

                            let updated = self
                                .update(UpdateOp {
                                    table: relation.related_table.clone(),
                                    r#where: child_where,
                                    data: item.data,
                                    select: None,
                                    include: None,
                                })
                                .await?;

                            if updated.get(&fk.from_field) != og.get(&fk.to_field) {
                                return Err(Error::invalid_argument(
                                    "Nested update cannot update an unrelated object",
                                ));
                            }
                        } else {
                            let mut child_where = UniqueWhere::new();
                            child_where.insert(fk.from_field.clone(), parent_key.clone());

                            self.update(UpdateOp {
                                table: relation.related_table.clone(),
                                r#where: child_where,
                                data: item.data,
                                select: None,
                                include: None,
                            })
                            .await?;
                        }
                    }

                    for item in nested.update_many {
                        // Restricted to this parent's children.
                        let filter = Filter::merge(
                            item.r#where,
                            Filter::Cond(fk.from_field.clone(), Cond::Eq(parent_key.clone())),
                        );
                        self.update_many(UpdateManyOp {
                            table: relation.related_table.clone(),
                            r#where: Some(filter),
                            data: item.data,
                        })
                        .await?;
                    }
                }
            }

            let mut refetch = r#where.clone();
            for (field, value) in &non_relational {
                refetch.insert(field.clone(), value.clone());
            }

            let projection = self.projection(&table, select.as_ref(), include.as_ref())?;
            let row = self
                .find_unique_row(&table, &refetch, projection.as_deref())
                .await?
                .ok_or_else(|| Error::record_not_found("Update"))?;

            let mut rows = self
                .fetch_includes(&table, vec![row], include.as_ref())
                .await?;
            Ok(rows.pop().expect("one row in, one row out"))
        })
    }

    /// Propagate a changed referenced column into every dependent FK column,
    /// one relation at a time.
    async fn rewrite_foreign_keys(&self, table: &str, og: &Row, upd: &Row) -> Result<()> {
        for (field, old_value) in og.iter() {
            let Some(new_value) = upd.get(field) else {
                continue;
            };
            if new_value == old_value {
                continue;
            }

            for relation in self.schema.relations_pointing_at_field(table, field)? {
                let fk = self.schema.fk_fields(relation)?;
                self.touch(&relation.related_table);
                debug!(
                    table = %relation.related_table,
                    column = %fk.from_field,
                    "rewriting foreign keys"
                );

                let mut set = IndexMap::new();
                set.insert(fk.from_field.clone(), new_value.clone());
                let filter = Filter::Cond(fk.from_field.clone(), Cond::Eq(old_value.clone()));

                let stmt = sql::update_many(&relation.related_table, &set, Some(&filter))?;
                self.db.run(&stmt).await?;
            }
        }
        Ok(())
    }

    /// Single-statement batch update; no nested traversal.
    pub(super) async fn update_many(&self, op: UpdateManyOp) -> Result<u64> {
        self.touch(&op.table);
        let stmt = sql::update_many(&op.table, &op.data, op.r#where.as_ref())?;
        self.db.run(&stmt).await
    }

    pub(super) async fn upsert(&self, op: UpsertOp) -> Result<Row> {
        let UpsertOp {
            table,
            r#where,
            create,
            update,
            select,
            include,
        } = op;

        match self.find_unique_row(&table, &r#where, None).await? {
            None => {
                self.create(CreateOp {
                    table,
                    data: create,
                    select,
                    include,
                })
                .await
            }
            Some(_) => {
                self.update(UpdateOp {
                    table,
                    r#where,
                    data: update,
                    select,
                    include,
                })
                .await
            }
        }
    }
}
