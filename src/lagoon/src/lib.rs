mod client;
pub use client::{BatchResult, Builder, Client, Table};

mod engine;

mod exec;

mod live;
pub use live::{LiveQuery, LiveResult};

mod notify;
pub use notify::{ChangeEvent, Notifier};

mod ops;

mod sql;

mod sync;
pub use sync::{
    NoopReplicationTransformManager, NoopShapeManager, ReplicationTransformManager, RowTransform,
    Shape, ShapeManager,
};

mod transform;

mod validate;

pub use lagoon_core::{
    schema::{self, FieldType, QualifiedTable, Schema},
    stmt::{Row, Statement, Value},
    Adapter, Error, Result,
};
