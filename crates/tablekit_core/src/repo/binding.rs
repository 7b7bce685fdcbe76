//! Per-kind value coercion.
//!
//! # Responsibility
//! - Turn a caller or driver value into the shape a column kind expects.
//! - Resolve the coercion function once per column instead of per call.
//!
//! # Invariants
//! - Null coerces to null for every kind.
//! - Integer narrowing never truncates; out-of-range values are errors.

use crate::db::{DbError, DbResult};
use crate::model::column::ColumnKind;
use crate::model::value::{parse_date, parse_date_time, SqlValue};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Coerces one value for the named column.
pub(crate) type Coercer = fn(&str, SqlValue) -> DbResult<SqlValue>;

pub(crate) fn coercer_for(kind: ColumnKind) -> Coercer {
    match kind {
        ColumnKind::BigInt => coerce_big_int,
        ColumnKind::Int => coerce_int,
        ColumnKind::SmallInt => coerce_small_int,
        ColumnKind::TinyInt => coerce_tiny_int,
        ColumnKind::Bool => coerce_bool,
        ColumnKind::Float => coerce_float,
        ColumnKind::Double => coerce_double,
        ColumnKind::Char | ColumnKind::Text | ColumnKind::Enum => coerce_text,
        ColumnKind::Date => coerce_date,
        ColumnKind::DateTime => coerce_date_time,
        ColumnKind::Decimal => coerce_decimal,
        ColumnKind::Other(_) => coerce_passthrough,
    }
}

fn mismatch(column: &str, expected: &str, value: &SqlValue) -> DbError {
    DbError::Coercion {
        column: column.to_string(),
        expected: expected.to_string(),
        found: value.type_label().to_string(),
    }
}

fn narrow<T: TryFrom<i64>>(
    column: &str,
    expected: &str,
    value: SqlValue,
    wrap: fn(T) -> SqlValue,
) -> DbResult<SqlValue> {
    if value.is_null() {
        return Ok(SqlValue::Null);
    }
    let Some(raw) = value.as_integer() else {
        return Err(mismatch(column, expected, &value));
    };
    T::try_from(raw).map(wrap).map_err(|_| DbError::Coercion {
        column: column.to_string(),
        expected: expected.to_string(),
        found: format!("out-of-range integer {raw}"),
    })
}

fn coerce_big_int(column: &str, value: SqlValue) -> DbResult<SqlValue> {
    narrow::<i64>(column, "bigint", value, SqlValue::BigInt)
}

fn coerce_int(column: &str, value: SqlValue) -> DbResult<SqlValue> {
    narrow::<i32>(column, "int", value, SqlValue::Int)
}

fn coerce_small_int(column: &str, value: SqlValue) -> DbResult<SqlValue> {
    narrow::<i16>(column, "smallint", value, SqlValue::SmallInt)
}

fn coerce_tiny_int(column: &str, value: SqlValue) -> DbResult<SqlValue> {
    narrow::<i8>(column, "tinyint", value, SqlValue::TinyInt)
}

fn coerce_bool(column: &str, value: SqlValue) -> DbResult<SqlValue> {
    match value {
        SqlValue::Null | SqlValue::Bool(_) => Ok(value),
        other => match other.as_integer() {
            Some(0) => Ok(SqlValue::Bool(false)),
            Some(1) => Ok(SqlValue::Bool(true)),
            _ => Err(mismatch(column, "bool", &other)),
        },
    }
}

fn coerce_float(column: &str, value: SqlValue) -> DbResult<SqlValue> {
    match value {
        SqlValue::Null | SqlValue::Float(_) => Ok(value),
        SqlValue::Double(raw) => Ok(SqlValue::Float(raw as f32)),
        other => match other.as_integer() {
            Some(raw) => Ok(SqlValue::Float(raw as f32)),
            None => Err(mismatch(column, "float", &other)),
        },
    }
}

fn coerce_double(column: &str, value: SqlValue) -> DbResult<SqlValue> {
    match value {
        SqlValue::Null | SqlValue::Double(_) => Ok(value),
        SqlValue::Float(raw) => Ok(SqlValue::Double(f64::from(raw))),
        other => match other.as_integer() {
            Some(raw) => Ok(SqlValue::Double(raw as f64)),
            None => Err(mismatch(column, "double", &other)),
        },
    }
}

fn coerce_text(column: &str, value: SqlValue) -> DbResult<SqlValue> {
    match value {
        SqlValue::Null | SqlValue::Text(_) => Ok(value),
        other => Err(mismatch(column, "text", &other)),
    }
}

fn coerce_date(column: &str, value: SqlValue) -> DbResult<SqlValue> {
    match value {
        SqlValue::Null | SqlValue::Date(_) => Ok(value),
        SqlValue::Text(ref text) => parse_date(text)
            .map(SqlValue::Date)
            .ok_or_else(|| mismatch(column, "date", &value)),
        other => Err(mismatch(column, "date", &other)),
    }
}

fn coerce_date_time(column: &str, value: SqlValue) -> DbResult<SqlValue> {
    match value {
        SqlValue::Null | SqlValue::DateTime(_) => Ok(value),
        SqlValue::Text(ref text) => parse_date_time(text)
            .map(SqlValue::DateTime)
            .ok_or_else(|| mismatch(column, "datetime", &value)),
        other => Err(mismatch(column, "datetime", &other)),
    }
}

fn coerce_decimal(column: &str, value: SqlValue) -> DbResult<SqlValue> {
    let decimal = match &value {
        SqlValue::Null => return Ok(SqlValue::Null),
        SqlValue::Decimal(raw) => Some(*raw),
        SqlValue::Double(raw) => Decimal::try_from(*raw).ok(),
        SqlValue::Float(raw) => Decimal::try_from(*raw).ok(),
        SqlValue::Text(text) => Decimal::from_str(text.trim()).ok(),
        other => other.as_integer().map(Decimal::from),
    };
    decimal
        .map(SqlValue::Decimal)
        .ok_or_else(|| mismatch(column, "decimal", &value))
}

fn coerce_passthrough(_column: &str, value: SqlValue) -> DbResult<SqlValue> {
    Ok(value)
}
