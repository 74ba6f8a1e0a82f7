mod builder;
pub use builder::{Builder, TableBuilder};

mod relation;
pub use relation::{Arity, Direction, FkFields, Relation};

mod table;
pub use table::{Field, FieldType, Table};

use crate::{Error, Result};

use indexmap::IndexMap;
use std::fmt;

/// The schema registry.
///
/// Holds the declarative description of every table and answers lookups by
/// table name, field name, and relation name. Immutable after
/// [`Builder::build`]; shared freely between operations.
#[derive(Debug)]
pub struct Schema {
    pub(crate) tables: IndexMap<String, Table>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::unknown_entity(format!("table `{name}`")))
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn fields(&self, table: &str) -> Result<&IndexMap<String, Field>> {
        Ok(&self.table(table)?.fields)
    }

    pub fn field_names(&self, table: &str) -> Result<Vec<&str>> {
        Ok(self.table(table)?.fields.keys().map(|k| k.as_str()).collect())
    }

    pub fn field(&self, table: &str, field: &str) -> Result<&Field> {
        self.table(table)?
            .fields
            .get(field)
            .ok_or_else(|| Error::unknown_entity(format!("field `{field}` on table `{table}`")))
    }

    pub fn relation(&self, table: &str, relation_name: &str) -> Result<&Relation> {
        self.table(table)?
            .relations
            .iter()
            .find(|r| r.name == relation_name)
            .ok_or_else(|| {
                Error::unknown_entity(format!("relation `{relation_name}` on table `{table}`"))
            })
    }

    pub fn relations(&self, table: &str) -> Result<&[Relation]> {
        Ok(&self.table(table)?.relations)
    }

    pub fn incoming_relations(&self, table: &str) -> Result<Vec<&Relation>> {
        Ok(self
            .relations(table)?
            .iter()
            .filter(|r| r.is_incoming())
            .collect())
    }

    pub fn has_relation_for_field(&self, table: &str, field: &str) -> Result<bool> {
        Ok(self.table(table)?.relations.iter().any(|r| r.field == field))
    }

    /// The relation exposed by the given virtual field.
    pub fn relation_for_field(&self, table: &str, field: &str) -> Result<&Relation> {
        self.table(table)?
            .relations
            .iter()
            .find(|r| r.field == field)
            .ok_or_else(|| {
                Error::unknown_entity(format!(
                    "relation field `{field}` on table `{table}`"
                ))
            })
    }

    pub fn relation_name(&self, table: &str, field: &str) -> Result<&str> {
        Ok(&self.relation_for_field(table, field)?.name)
    }

    pub fn related_table(&self, table: &str, field: &str) -> Result<&Table> {
        let relation = self.relation_for_field(table, field)?;
        self.table(&relation.related_table)
    }

    /// Incoming relations on `table` whose referenced key is `field`.
    ///
    /// Drives the FK-rewrite step: when `field` changes on a row of `table`,
    /// every relation returned here names a dependent table whose FK column
    /// must be rewritten.
    pub fn relations_pointing_at_field(&self, table: &str, field: &str) -> Result<Vec<&Relation>> {
        let mut pointing = vec![];

        for relation in self.incoming_relations(table)? {
            if self.fk_fields(relation)?.to_field == field {
                pointing.push(relation);
            }
        }

        Ok(pointing)
    }

    /// Resolve the FK column pair for a relation.
    ///
    /// `from_field`/`to_field` are defined canonically on the outgoing side;
    /// an incoming relation recovers them from its dual on the related table.
    pub fn fk_fields(&self, relation: &Relation) -> Result<FkFields> {
        match relation.direction {
            Direction::Outgoing => Ok(FkFields {
                from_field: relation
                    .from_field
                    .clone()
                    .expect("outgoing relation without FK fields"),
                to_field: relation
                    .to_field
                    .clone()
                    .expect("outgoing relation without FK fields"),
            }),
            Direction::Incoming => {
                let dual = self.relation(&relation.related_table, &relation.name)?;
                debug_assert!(dual.is_outgoing());
                self.fk_fields(dual)
            }
        }
    }
}

/// A table name qualified by the adapter's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedTable {
    pub namespace: String,
    pub table: String,
}

impl QualifiedTable {
    pub fn new(namespace: impl Into<String>, table: impl Into<String>) -> QualifiedTable {
        QualifiedTable {
            namespace: namespace.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for QualifiedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\".\"{}\"", self.namespace, self.table)
    }
}
