//! Canonical operation records produced by the validator.
//!
//! These are the engine's input: shapes are normalized, scalar values are
//! already converted to their database representation, and nested mutation
//! arguments are tagged per nesting position.

use lagoon_core::stmt::{Row, Value};

use indexmap::IndexMap;

/// A validated top-level operation, ready to plan.
#[derive(Debug, Clone)]
pub(crate) enum Operation {
    Create(CreateOp),
    CreateMany(CreateManyOp),
    FindUnique(FindUniqueOp),
    FindFirst(FindManyOp),
    FindMany(FindManyOp),
    Update(UpdateOp),
    UpdateMany(UpdateManyOp),
    Upsert(UpsertOp),
    Delete(DeleteOp),
    DeleteMany(DeleteManyOp),
}

impl Operation {
    pub(crate) fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Operation::FindUnique(_) | Operation::FindFirst(_) | Operation::FindMany(_)
        )
    }
}

/// What an executed operation hands back: result rows or an affected-row
/// count.
#[derive(Debug)]
pub(crate) enum Response {
    Rows(Vec<Row>),
    Count(u64),
}

impl Response {
    pub(crate) fn one(row: Row) -> Response {
        Response::Rows(vec![row])
    }

    pub(crate) fn maybe(row: Option<Row>) -> Response {
        Response::Rows(row.into_iter().collect())
    }

    pub(crate) fn into_rows(self) -> Vec<Row> {
        match self {
            Response::Rows(rows) => rows,
            Response::Count(_) => vec![],
        }
    }

    pub(crate) fn into_count(self) -> u64 {
        match self {
            Response::Count(count) => count,
            Response::Rows(_) => 0,
        }
    }
}

/// Equality-only `where` identifying at most one row.
pub(crate) type UniqueWhere = IndexMap<String, Value>;

/// A rich `where` tree for non-unique reads and `*Many` mutations.
#[derive(Debug, Clone)]
pub(crate) enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Vec<Filter>),
    Cond(String, Cond),
}

#[derive(Debug, Clone)]
pub(crate) enum Cond {
    Eq(Value),
    Ne(Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    Lt(Value),
    Lte(Value),
    Gt(Value),
    Gte(Value),
    StartsWith(String),
    EndsWith(String),
    Contains(String),
}

impl Filter {
    /// AND two optional filters together.
    pub(crate) fn merge(user: Option<Filter>, key: Filter) -> Filter {
        match user {
            Some(user) => Filter::And(vec![user, key]),
            None => key,
        }
    }
}

/// Requested output columns. Key fields needed by include assembly are added
/// back by the engine before the statement is built.
#[derive(Debug, Clone, Default)]
pub(crate) struct Select {
    pub fields: Vec<String>,
}

/// The include tree: relation field name to argument, in input order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Include {
    pub entries: IndexMap<String, IncludeArg>,
}

#[derive(Debug, Clone)]
pub(crate) enum IncludeArg {
    /// `true`: fetch related rows with no extra arguments.
    All,

    /// `false`: named but skipped.
    Skip,

    /// A nested find input against the related table.
    Nested(Box<FindManyOp>),
}

#[derive(Debug, Clone)]
pub(crate) struct OrderBy {
    pub field: String,
    pub descending: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct FindUniqueOp {
    pub table: String,
    pub r#where: UniqueWhere,
    pub select: Option<Select>,
    pub include: Option<Include>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FindManyOp {
    pub table: String,
    pub r#where: Option<Filter>,
    pub select: Option<Select>,
    pub include: Option<Include>,
    pub order_by: Vec<OrderBy>,
    pub take: Option<u64>,
    pub skip: Option<u64>,
}

/// Create `data`: scalars split from nested relation arguments, both in
/// input order.
#[derive(Debug, Clone, Default)]
pub(crate) struct CreateData {
    pub scalars: IndexMap<String, Value>,
    pub relations: IndexMap<String, NestedCreate>,
}

/// Nested argument under a relation field of a create.
///
/// `Connect`, `ConnectOrCreate`, and `CreateMany` are recognized shapes the
/// create planner rejects; only `Create` is plannable.
#[derive(Debug, Clone)]
pub(crate) enum NestedCreate {
    Create(Vec<CreateData>),
    Connect,
    ConnectOrCreate,
    CreateMany,
}

#[derive(Debug, Clone)]
pub(crate) struct CreateOp {
    pub table: String,
    pub data: CreateData,
    pub select: Option<Select>,
    pub include: Option<Include>,
}

#[derive(Debug, Clone)]
pub(crate) struct CreateManyOp {
    pub table: String,
    pub rows: Vec<IndexMap<String, Value>>,
}

/// Update `data`: scalar assignments split from nested relation arguments.
#[derive(Debug, Clone, Default)]
pub(crate) struct UpdateData {
    pub scalars: IndexMap<String, Value>,
    pub relations: IndexMap<String, NestedUpdate>,
}

/// Nested `{update, updateMany}` arguments under a relation field of an
/// update.
#[derive(Debug, Clone, Default)]
pub(crate) struct NestedUpdate {
    pub update: Vec<NestedUpdateItem>,
    pub update_many: Vec<NestedUpdateManyItem>,
}

#[derive(Debug, Clone)]
pub(crate) struct NestedUpdateItem {
    /// Present for incoming to-many nesting; absent for outgoing and
    /// incoming to-one nesting, where the parent's key identifies the child.
    pub r#where: Option<UniqueWhere>,
    pub data: UpdateData,
}

#[derive(Debug, Clone)]
pub(crate) struct NestedUpdateManyItem {
    pub r#where: Option<Filter>,
    pub data: IndexMap<String, Value>,
}

#[derive(Debug, Clone)]
pub(crate) struct UpdateOp {
    pub table: String,
    pub r#where: UniqueWhere,
    pub data: UpdateData,
    pub select: Option<Select>,
    pub include: Option<Include>,
}

#[derive(Debug, Clone)]
pub(crate) struct UpdateManyOp {
    pub table: String,
    pub r#where: Option<Filter>,
    pub data: IndexMap<String, Value>,
}

#[derive(Debug, Clone)]
pub(crate) struct UpsertOp {
    pub table: String,
    pub r#where: UniqueWhere,
    pub create: CreateData,
    pub update: UpdateData,
    pub select: Option<Select>,
    pub include: Option<Include>,
}

/// A shape subscription request.
#[derive(Debug, Clone)]
pub(crate) struct SyncOp {
    pub table: String,
    pub r#where: Option<SyncWhere>,
    pub include: Option<Include>,
    pub key: Option<String>,
}

/// The `where` of a sync call: a raw SQL fragment passed through verbatim,
/// or a scalar-only filter compiled server-side.
#[derive(Debug, Clone)]
pub(crate) enum SyncWhere {
    Raw(String),
    Object(Filter),
}

#[derive(Debug, Clone)]
pub(crate) struct DeleteOp {
    pub table: String,
    pub r#where: UniqueWhere,
}

#[derive(Debug, Clone)]
pub(crate) struct DeleteManyOp {
    pub table: String,
    pub r#where: Option<Filter>,
}
