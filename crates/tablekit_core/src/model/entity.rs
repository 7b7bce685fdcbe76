//! Field-to-column bindings for mapped entity types.
//!
//! # Responsibility
//! - Let an entity expose its field values by SQL column name.
//! - Let an entity rebuild itself from a row already coerced to column kinds.
//!
//! # Invariants
//! - `column_value` answers for every column of the registered descriptor.
//! - `from_row` only sees columns of the registered descriptor.

use crate::db::DbError;
use crate::error::OrmResult;
use crate::model::value::{FromSqlValue, SqlValue};

/// A plain data type stored as one table row.
///
/// Table metadata is registered separately through
/// [`SchemaRegistry::register`](crate::schema::SchemaRegistry::register).
///
/// # Example
///
/// ```
/// use tablekit_core::{Entity, MappedRow, OrmResult, SqlValue};
///
/// struct Tag {
///     id: i64,
///     label: String,
/// }
///
/// impl Entity for Tag {
///     fn column_value(&self, column: &str) -> Option<SqlValue> {
///         match column {
///             "id" => Some(self.id.into()),
///             "label" => Some(self.label.clone().into()),
///             _ => None,
///         }
///     }
///
///     fn from_row(row: &MappedRow) -> OrmResult<Self> {
///         Ok(Self {
///             id: row.get("id")?,
///             label: row.get("label")?,
///         })
///     }
/// }
/// ```
pub trait Entity: Sized + 'static {
    /// Current value of the field bound to `column`, `None` if unbound.
    fn column_value(&self, column: &str) -> Option<SqlValue>;

    fn from_row(row: &MappedRow) -> OrmResult<Self>;
}

/// Result row after every column was coerced to its declared kind.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    values: Vec<(String, SqlValue)>,
}

impl MappedRow {
    pub(crate) fn new(values: Vec<(String, SqlValue)>) -> Self {
        Self { values }
    }

    /// Reads `column` as `T`.
    ///
    /// # Errors
    /// - `DbError::MissingColumn` when the row has no such column.
    /// - `DbError::Coercion` when the value does not fit `T`.
    pub fn get<T: FromSqlValue>(&self, column: &str) -> OrmResult<T> {
        let value = self
            .values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| DbError::MissingColumn(column.to_string()))?;

        let found = value.type_label();
        T::from_sql_value(value).ok_or_else(|| {
            DbError::Coercion {
                column: column.to_string(),
                expected: T::EXPECTED.to_string(),
                found: found.to_string(),
            }
            .into()
        })
    }

    /// Reads a text column and parses it with `parse`; used for enums.
    pub fn get_parsed<T>(&self, column: &str, parse: impl FnOnce(&str) -> Option<T>) -> OrmResult<T> {
        let text: String = self.get(column)?;
        parse(&text).ok_or_else(|| {
            DbError::InvalidData {
                column: column.to_string(),
                message: format!("unrecognized value `{text}`"),
            }
            .into()
        })
    }
}
