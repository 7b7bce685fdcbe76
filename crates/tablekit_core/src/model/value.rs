//! Dynamically typed SQL values.
//!
//! # Responsibility
//! - Carry bind parameters from entities to connections.
//! - Carry result columns from connections back to entities.
//!
//! # Invariants
//! - `SqlValue::Null` is the only representation of SQL null.
//! - Text encodings of dates and date-times are ISO-8601 without zone.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::fmt::{Display, Formatter};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATE_TIME_FORMAT_T: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// One SQL value, either a bind parameter or a result column.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    Text(String),
    Decimal(Decimal),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Bytes(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short label used in coercion error messages.
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::TinyInt(_) => "tinyint",
            Self::SmallInt(_) => "smallint",
            Self::Int(_) => "int",
            Self::BigInt(_) => "bigint",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Text(_) => "text",
            Self::Decimal(_) => "decimal",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Bytes(_) => "bytes",
        }
    }

    /// Returns the value widened to `i64` when it is any integer variant.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::TinyInt(value) => Some(i64::from(*value)),
            Self::SmallInt(value) => Some(i64::from(*value)),
            Self::Int(value) => Some(i64::from(*value)),
            Self::BigInt(value) => Some(*value),
            _ => None,
        }
    }
}

impl Display for SqlValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::TinyInt(value) => write!(f, "{value}"),
            Self::SmallInt(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::BigInt(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Double(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
            Self::Decimal(value) => write!(f, "{value}"),
            Self::Date(value) => write!(f, "{}", value.format(DATE_FORMAT)),
            Self::DateTime(value) => write!(f, "{}", value.format(DATE_TIME_FORMAT)),
            Self::Bytes(value) => write!(f, "<{} bytes>", value.len()),
        }
    }
}

pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

pub(crate) fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT_T))
        .ok()
}

macro_rules! impl_from_for_sql_value {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for SqlValue {
                fn from(value: $source) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_sql_value! {
    bool => Bool,
    i8 => TinyInt,
    i16 => SmallInt,
    i32 => Int,
    i64 => BigInt,
    f32 => Float,
    f64 => Double,
    String => Text,
    Decimal => Decimal,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    Vec<u8> => Bytes,
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<char> for SqlValue {
    fn from(value: char) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Conversion from a mapped column value into a Rust field type.
///
/// Values handed to entities have already been coerced to the column kind,
/// so implementations only need to accept the matching variant. Integer
/// targets still accept every integer width that fits.
pub trait FromSqlValue: Sized {
    /// Human readable name of the expected SQL shape.
    const EXPECTED: &'static str;

    fn from_sql_value(value: SqlValue) -> Option<Self>;
}

macro_rules! impl_from_sql_value_integer {
    ($($target:ty => $label:literal),* $(,)?) => {
        $(
            impl FromSqlValue for $target {
                const EXPECTED: &'static str = $label;

                fn from_sql_value(value: SqlValue) -> Option<Self> {
                    value.as_integer().and_then(|raw| <$target>::try_from(raw).ok())
                }
            }
        )*
    };
}

impl_from_sql_value_integer! {
    i8 => "tinyint",
    i16 => "smallint",
    i32 => "int",
    i64 => "bigint",
}

impl FromSqlValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_sql_value(value: SqlValue) -> Option<Self> {
        match value {
            SqlValue::Bool(value) => Some(value),
            other => match other.as_integer() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
        }
    }
}

impl FromSqlValue for f32 {
    const EXPECTED: &'static str = "float";

    fn from_sql_value(value: SqlValue) -> Option<Self> {
        match value {
            SqlValue::Float(value) => Some(value),
            SqlValue::Double(value) => Some(value as f32),
            _ => None,
        }
    }
}

impl FromSqlValue for f64 {
    const EXPECTED: &'static str = "double";

    fn from_sql_value(value: SqlValue) -> Option<Self> {
        match value {
            SqlValue::Double(value) => Some(value),
            SqlValue::Float(value) => Some(f64::from(value)),
            _ => None,
        }
    }
}

impl FromSqlValue for String {
    const EXPECTED: &'static str = "text";

    fn from_sql_value(value: SqlValue) -> Option<Self> {
        match value {
            SqlValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl FromSqlValue for char {
    const EXPECTED: &'static str = "single character";

    fn from_sql_value(value: SqlValue) -> Option<Self> {
        let SqlValue::Text(text) = value else {
            return None;
        };
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(value), None) => Some(value),
            _ => None,
        }
    }
}

impl FromSqlValue for Decimal {
    const EXPECTED: &'static str = "decimal";

    fn from_sql_value(value: SqlValue) -> Option<Self> {
        match value {
            SqlValue::Decimal(value) => Some(value),
            _ => None,
        }
    }
}

impl FromSqlValue for NaiveDate {
    const EXPECTED: &'static str = "date";

    fn from_sql_value(value: SqlValue) -> Option<Self> {
        match value {
            SqlValue::Date(value) => Some(value),
            _ => None,
        }
    }
}

impl FromSqlValue for NaiveDateTime {
    const EXPECTED: &'static str = "datetime";

    fn from_sql_value(value: SqlValue) -> Option<Self> {
        match value {
            SqlValue::DateTime(value) => Some(value),
            _ => None,
        }
    }
}

impl FromSqlValue for Vec<u8> {
    const EXPECTED: &'static str = "bytes";

    fn from_sql_value(value: SqlValue) -> Option<Self> {
        match value {
            SqlValue::Bytes(value) => Some(value),
            _ => None,
        }
    }
}

impl FromSqlValue for SqlValue {
    const EXPECTED: &'static str = "any";

    fn from_sql_value(value: SqlValue) -> Option<Self> {
        Some(value)
    }
}

/// Null maps to `None`; every other value must convert to `T`.
impl<T: FromSqlValue> FromSqlValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_sql_value(value: SqlValue) -> Option<Self> {
        if value.is_null() {
            return Some(None);
        }
        T::from_sql_value(value).map(Some)
    }
}
