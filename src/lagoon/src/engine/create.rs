use super::{BoxFuture, Engine};
use crate::ops::{CreateData, CreateManyOp, CreateOp, NestedCreate, UniqueWhere};
use crate::{sql, Error, Result, Row, Value};

use tracing::debug;

impl Engine<'_> {
    /// Nested create. Ordering is load-bearing: outgoing relations insert
    /// first (their key lands on this row), then the base insert, then
    /// incoming relations in declaration order (their FK is this row's key),
    /// then the re-fetch.
    pub(super) fn create(&self, op: CreateOp) -> BoxFuture<'_, Result<Row>> {
        Box::pin(async move {
            let CreateOp {
                table,
                mut data,
                select,
                include,
            } = op;

            self.touch(&table);
            debug!(table = %table, "planning create");

            let relation_fields: Vec<String> = data.relations.keys().cloned().collect();
            for field in &relation_fields {
                let relation = self.schema.relation_for_field(&table, field)?;
                if !relation.is_outgoing() {
                    continue;
                }

                let nested = data
                    .relations
                    .shift_remove(field)
                    .expect("relation key collected above");
                let mut items = expect_nested_create(nested, field)?;
                if items.len() != 1 {
                    return Err(Error::invalid_argument(format!(
                        "data.{field}: expected exactly one nested object"
                    )));
                }

                let fk = self.schema.fk_fields(relation)?;
                let created = self
                    .create(CreateOp {
                        table: relation.related_table.clone(),
                        data: items.pop().expect("length checked above"),
                        select: None,
                        include: None,
                    })
                    .await?;

                let key = created.get(&fk.to_field).cloned().unwrap_or(Value::Null);
                data.scalars.insert(fk.from_field.clone(), key);
            }

            let stmt = sql::create(&table, &data.scalars);
            let mut inserted = self.db.query(&stmt).await?;
            if inserted.len() != 1 {
                return Err(Error::invalid_argument(
                    "Wrong amount of objects were created",
                ));
            }
            let inserted = inserted.pop().expect("length checked above");

            let remaining: Vec<String> = data.relations.keys().cloned().collect();
            for field in &remaining {
                let relation = self.schema.relation_for_field(&table, field)?;
                let nested = data
                    .relations
                    .shift_remove(field)
                    .expect("relation key collected above");
                let items = expect_nested_create(nested, field)?;

                let fk = self.schema.fk_fields(relation)?;
                // The inserted row, not the input, carries generated keys.
                let parent_key = inserted.get(&fk.to_field).cloned().unwrap_or(Value::Null);

                for mut child in items {
                    child.scalars.insert(fk.from_field.clone(), parent_key.clone());
                    self.create(CreateOp {
                        table: relation.related_table.clone(),
                        data: child,
                        select: None,
                        include: None,
                    })
                    .await?;
                }
            }

            // Re-fetch through every scalar actually supplied (outgoing FK
            // assignments included, incoming children not). A two-row match
            // here is a NotUnique failure, deliberately.
            let where_clause: UniqueWhere = data.scalars;
            let projection = self.projection(&table, select.as_ref(), include.as_ref())?;
            let row = self
                .find_unique_row(&table, &where_clause, projection.as_deref())
                .await?
                .ok_or_else(|| Error::record_not_found("Create"))?;

            let mut rows = self
                .fetch_includes(&table, vec![row], include.as_ref())
                .await?;
            Ok(rows.pop().expect("one row in, one row out"))
        })
    }

    /// Single-statement batch insert; no nested traversal.
    pub(super) async fn create_many(&self, op: CreateManyOp) -> Result<u64> {
        self.touch(&op.table);

        if op.rows.is_empty() {
            return Ok(0);
        }

        let stmt = sql::create_many(&op.table, &op.rows);
        self.db.run(&stmt).await
    }
}

fn expect_nested_create(nested: NestedCreate, field: &str) -> Result<Vec<CreateData>> {
    match nested {
        NestedCreate::Create(items) => Ok(items),
        NestedCreate::Connect | NestedCreate::ConnectOrCreate | NestedCreate::CreateMany => {
            Err(Error::invalid_argument(format!(
                "data.{field}: only a nested `create` is supported on a create"
            )))
        }
    }
}
