use super::{Arity, Direction, Field, FieldType, Relation, Schema, Table};
use crate::{Error, Result};

use indexmap::IndexMap;

/// Assembles a [`Schema`] and verifies relation linkage before handing it
/// out.
#[derive(Default)]
pub struct Builder {
    tables: IndexMap<String, Table>,
    duplicate: Option<String>,
}

pub struct TableBuilder {
    fields: IndexMap<String, Field>,
    relations: Vec<Relation>,
}

impl Builder {
    pub fn table(mut self, name: &str, build: impl FnOnce(&mut TableBuilder)) -> Builder {
        if self.tables.contains_key(name) {
            self.duplicate = Some(name.to_string());
            return self;
        }

        let mut table = TableBuilder {
            fields: IndexMap::new(),
            relations: vec![],
        };
        build(&mut table);

        self.tables.insert(
            name.to_string(),
            Table {
                name: name.to_string(),
                fields: table.fields,
                relations: table.relations,
            },
        );
        self
    }

    /// Verify every relation is registered on both sides with dual
    /// directions and that FK columns exist, then freeze the schema.
    pub fn build(self) -> Result<Schema> {
        if let Some(name) = &self.duplicate {
            return Err(Error::invalid_schema(format!("duplicate table `{name}`")));
        }

        let schema = Schema {
            tables: self.tables,
        };

        for table in schema.tables.values() {
            for relation in &table.relations {
                if table.fields.contains_key(&relation.field) {
                    return Err(Error::invalid_schema(format!(
                        "relation field `{}` on `{}` collides with a scalar field",
                        relation.field, table.name
                    )));
                }

                let related = schema.tables.get(&relation.related_table).ok_or_else(|| {
                    Error::invalid_schema(format!(
                        "relation `{}` on `{}` references unknown table `{}`",
                        relation.name, table.name, relation.related_table
                    ))
                })?;

                let dual = related
                    .relations
                    .iter()
                    .find(|r| r.name == relation.name)
                    .ok_or_else(|| {
                        Error::invalid_schema(format!(
                            "relation `{}` has no dual on `{}`",
                            relation.name, related.name
                        ))
                    })?;

                if dual.direction == relation.direction {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}` must be outgoing on one side and incoming on the other",
                        relation.name
                    )));
                }

                if relation.is_outgoing() {
                    let (from_field, to_field) = match (&relation.from_field, &relation.to_field) {
                        (Some(from), Some(to)) => (from, to),
                        _ => {
                            return Err(Error::invalid_schema(format!(
                                "outgoing relation `{}` on `{}` is missing FK columns",
                                relation.name, table.name
                            )))
                        }
                    };

                    if !table.fields.contains_key(from_field) {
                        return Err(Error::invalid_schema(format!(
                            "FK column `{}` of relation `{}` does not exist on `{}`",
                            from_field, relation.name, table.name
                        )));
                    }
                    if !related.fields.contains_key(to_field) {
                        return Err(Error::invalid_schema(format!(
                            "referenced column `{}` of relation `{}` does not exist on `{}`",
                            to_field, relation.name, related.name
                        )));
                    }
                }
            }
        }

        Ok(schema)
    }
}

impl TableBuilder {
    /// Declare a scalar field. The returned handle sets flags
    /// (`nullable`, `primary_key`, ...).
    pub fn field(&mut self, name: &str, ty: FieldType) -> &mut Field {
        self.fields
            .entry(name.to_string())
            .or_insert_with(|| Field::new(name, ty))
    }

    /// Declare an outgoing relation: the FK column `from_field` lives on this
    /// table and references `to_field` on `related_table`. Arity is always
    /// one, since an FK identifies at most one record.
    pub fn belongs_to(
        &mut self,
        field: &str,
        name: &str,
        related_table: &str,
        from_field: &str,
        to_field: &str,
    ) -> &mut TableBuilder {
        self.relations.push(Relation {
            field: field.to_string(),
            name: name.to_string(),
            related_table: related_table.to_string(),
            direction: Direction::Outgoing,
            arity: Arity::One,
            from_field: Some(from_field.to_string()),
            to_field: Some(to_field.to_string()),
        });
        self
    }

    /// Declare an incoming to-many relation; the FK lives on `related_table`
    /// and is described by the dual `belongs_to`.
    pub fn has_many(&mut self, field: &str, name: &str, related_table: &str) -> &mut TableBuilder {
        self.incoming(field, name, related_table, Arity::Many)
    }

    /// Declare an incoming to-one relation.
    pub fn has_one(&mut self, field: &str, name: &str, related_table: &str) -> &mut TableBuilder {
        self.incoming(field, name, related_table, Arity::One)
    }

    fn incoming(
        &mut self,
        field: &str,
        name: &str,
        related_table: &str,
        arity: Arity,
    ) -> &mut TableBuilder {
        self.relations.push(Relation {
            field: field.to_string(),
            name: name.to_string(),
            related_table: related_table.to_string(),
            direction: Direction::Incoming,
            arity,
            from_field: None,
            to_field: None,
        });
        self
    }
}
