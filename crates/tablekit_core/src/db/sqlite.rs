//! `SqlConnection` over `rusqlite`.
//!
//! # Invariants
//! - Booleans are stored as 0/1 integers.
//! - Decimals, dates and date-times are stored as text so they round-trip
//!   exactly through `TEXT` columns.

use super::{DbError, DbResult, Dialect, SqlConnection, SqlRow};
use crate::model::value::{SqlValue, DATE_FORMAT, DATE_TIME_FORMAT};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection};

impl SqlConnection for Connection {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        let mut stmt = self.prepare(sql)?;
        let changed = stmt.execute(params_from_iter(params.iter().map(to_sqlite_value)))?;
        Ok(changed)
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<SqlRow>> {
        let mut stmt = self.prepare(sql)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = stmt.query(params_from_iter(params.iter().map(to_sqlite_value)))?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next()? {
            let mut columns = Vec::with_capacity(names.len());
            for (index, name) in names.iter().enumerate() {
                let value = from_sqlite_value(name, row.get_ref(index)?)?;
                columns.push((name.clone(), value));
            }
            collected.push(SqlRow::new(columns));
        }

        Ok(collected)
    }
}

fn to_sqlite_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Bool(value) => Value::Integer(i64::from(*value)),
        SqlValue::TinyInt(value) => Value::Integer(i64::from(*value)),
        SqlValue::SmallInt(value) => Value::Integer(i64::from(*value)),
        SqlValue::Int(value) => Value::Integer(i64::from(*value)),
        SqlValue::BigInt(value) => Value::Integer(*value),
        SqlValue::Float(value) => Value::Real(f64::from(*value)),
        SqlValue::Double(value) => Value::Real(*value),
        SqlValue::Text(value) => Value::Text(value.clone()),
        SqlValue::Decimal(value) => Value::Text(value.to_string()),
        SqlValue::Date(value) => Value::Text(value.format(DATE_FORMAT).to_string()),
        SqlValue::DateTime(value) => Value::Text(value.format(DATE_TIME_FORMAT).to_string()),
        SqlValue::Bytes(value) => Value::Blob(value.clone()),
    }
}

fn from_sqlite_value(column: &str, value: ValueRef<'_>) -> DbResult<SqlValue> {
    let value = match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(value) => SqlValue::BigInt(value),
        ValueRef::Real(value) => SqlValue::Double(value),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|err| DbError::InvalidData {
                column: column.to_string(),
                message: err.to_string(),
            })?;
            SqlValue::Text(text.to_string())
        }
        ValueRef::Blob(bytes) => SqlValue::Bytes(bytes.to_vec()),
    };
    Ok(value)
}
