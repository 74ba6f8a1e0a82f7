use lagoon_core::{
    stmt::{Row, Statement, Value},
    Adapter, Error, Result,
};

use rusqlite::Connection;
use std::{
    path::Path,
    sync::Mutex,
};
use tracing::debug;

/// SQLite adapter over a single connection. The executor serializes
/// operations, so the connection mutex is uncontended in practice.
#[derive(Debug)]
pub struct Sqlite {
    connection: Mutex<Connection>,
}

impl Sqlite {
    pub fn in_memory() -> Sqlite {
        let connection = Connection::open_in_memory().unwrap();

        Sqlite {
            connection: Mutex::new(connection),
        }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Sqlite> {
        let connection = Connection::open(path).map_err(Error::adapter)?;
        Ok(Sqlite {
            connection: Mutex::new(connection),
        })
    }

    fn execute_batch(&self, sql: &str) -> Result<()> {
        let connection = self.connection.lock().unwrap();
        connection.execute_batch(sql).map_err(Error::adapter)
    }
}

#[lagoon_core::async_trait]
impl Adapter for Sqlite {
    fn default_namespace(&self) -> &str {
        "main"
    }

    async fn query(&self, stmt: &Statement) -> Result<Vec<Row>> {
        let connection = self.connection.lock().unwrap();
        debug!(sql = %stmt.text, "query");

        let mut prepared = connection.prepare(&stmt.text).map_err(Error::adapter)?;
        let columns: Vec<String> = prepared
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = prepared
            .query(rusqlite::params_from_iter(
                stmt.args.iter().map(value_from_param),
            ))
            .map_err(Error::adapter)?;

        let mut ret = vec![];
        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut decoded = Row::new();
                    for (index, column) in columns.iter().enumerate() {
                        decoded.insert(column.clone(), load(row, index)?);
                    }
                    ret.push(decoded);
                }
                Ok(None) => break,
                Err(err) => return Err(Error::adapter(err)),
            }
        }

        Ok(ret)
    }

    async fn run(&self, stmt: &Statement) -> Result<u64> {
        let connection = self.connection.lock().unwrap();
        debug!(sql = %stmt.text, "run");

        let mut prepared = connection.prepare(&stmt.text).map_err(Error::adapter)?;
        let count = prepared
            .execute(rusqlite::params_from_iter(
                stmt.args.iter().map(value_from_param),
            ))
            .map_err(Error::adapter)?;

        Ok(count as u64)
    }

    async fn begin(&self) -> Result<()> {
        self.execute_batch("BEGIN")
    }

    async fn commit(&self) -> Result<()> {
        self.execute_batch("COMMIT")
    }

    async fn rollback(&self) -> Result<()> {
        self.execute_batch("ROLLBACK")
    }
}

fn value_from_param(value: &Value) -> rusqlite::types::ToSqlOutput<'_> {
    use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};

    match value {
        Value::Bool(true) => ToSqlOutput::Owned(SqlValue::Integer(1)),
        Value::Bool(false) => ToSqlOutput::Owned(SqlValue::Integer(0)),
        Value::I64(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
        Value::F64(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
        Value::String(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
        Value::Bytes(v) => ToSqlOutput::Borrowed(ValueRef::Blob(v)),
        // Composite values never reach the adapter; statements bind scalars.
        Value::Null | Value::Record(_) | Value::List(_) => {
            ToSqlOutput::Owned(SqlValue::Null)
        }
    }
}

fn load(row: &rusqlite::Row, index: usize) -> Result<Value> {
    use rusqlite::types::Value as SqlValue;

    let value: SqlValue = row.get(index).map_err(Error::adapter)?;

    Ok(match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(value) => Value::I64(value),
        SqlValue::Real(value) => Value::F64(value),
        SqlValue::Text(value) => Value::String(value),
        SqlValue::Blob(value) => Value::Bytes(value),
    })
}
