/// Which side of the edge carries the foreign-key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The FK column lives on the table declaring this relation.
    Outgoing,

    /// The FK column lives on the related table.
    Incoming,
}

/// How many related records the relation field can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    One,
    Many,
}

/// A typed edge from one table to another.
///
/// Registered on both tables; the two registrations share a `name` and carry
/// dual directions. FK columns are stored on the outgoing side only; the
/// incoming side resolves them through [`crate::Schema::fk_fields`].
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// Virtual field exposing the related record(s).
    pub field: String,

    /// Globally unique label identifying the two-sided edge.
    pub name: String,

    pub related_table: String,

    pub direction: Direction,

    pub arity: Arity,

    pub(crate) from_field: Option<String>,
    pub(crate) to_field: Option<String>,
}

/// The resolved FK column pair of a relation, named as defined on the
/// outgoing side: `from_field` is the FK column, `to_field` the referenced
/// key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FkFields {
    pub from_field: String,
    pub to_field: String,
}

impl Relation {
    pub fn is_outgoing(&self) -> bool {
        self.direction == Direction::Outgoing
    }

    pub fn is_incoming(&self) -> bool {
        self.direction == Direction::Incoming
    }

    pub fn is_many(&self) -> bool {
        self.arity == Arity::Many
    }
}
