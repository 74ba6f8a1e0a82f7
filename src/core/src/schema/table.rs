use super::Relation;

use indexmap::IndexMap;

/// Scalar column types understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Boolean,
    Bytes,
    Integer,
    Real,
    Text,
    /// Stored as an ISO-8601 text column.
    Timestamp,
}

/// A scalar column.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
    pub nullable: bool,
    pub has_default: bool,
    pub auto_generated: bool,
    pub primary_key: bool,
    pub unique: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Field {
        Field {
            name: name.into(),
            ty,
            nullable: false,
            has_default: false,
            auto_generated: false,
            primary_key: false,
            unique: false,
        }
    }

    pub fn nullable(&mut self) -> &mut Field {
        self.nullable = true;
        self
    }

    pub fn has_default(&mut self) -> &mut Field {
        self.has_default = true;
        self
    }

    /// Generated by the database on insert (implies a default).
    pub fn auto_generated(&mut self) -> &mut Field {
        self.auto_generated = true;
        self.has_default = true;
        self
    }

    pub fn primary_key(&mut self) -> &mut Field {
        self.primary_key = true;
        self.unique = true;
        self
    }

    pub fn unique(&mut self) -> &mut Field {
        self.unique = true;
        self
    }
}

/// The descriptor of one table: scalar fields in declaration order plus the
/// relations registered on it.
#[derive(Debug)]
pub struct Table {
    pub name: String,
    pub fields: IndexMap<String, Field>,
    pub relations: Vec<Relation>,
}

impl Table {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn relation_for_field(&self, field: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.field == field)
    }

    pub fn primary_key(&self) -> impl Iterator<Item = &Field> {
        self.fields.values().filter(|f| f.primary_key)
    }

    /// Fields that may appear in a unique `where`.
    pub fn unique_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values().filter(|f| f.unique)
    }
}
