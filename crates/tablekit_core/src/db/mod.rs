//! Connection contract consumed by the repository.
//!
//! # Responsibility
//! - Define the minimal statement API a backing connection must offer.
//! - Provide the SQLite implementation and connection bootstrap helpers.
//!
//! # Invariants
//! - Statements and result sets never outlive one `execute`/`query` call.
//! - Placeholders are positional `?` in every dialect.

use crate::model::value::SqlValue;
use thiserror::Error;

mod open;
mod sqlite;

pub use open::{open_sqlite, open_sqlite_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("driver error: {0}")]
    Driver(Box<dyn std::error::Error + Send + Sync>),
    #[error("cannot coerce {found} into {expected} for column `{column}`")]
    Coercion {
        column: String,
        expected: String,
        found: String,
    },
    #[error("result set has no column `{0}`")]
    MissingColumn(String),
    #[error("invalid data in column `{column}`: {message}")]
    InvalidData { column: String, message: String },
}

/// SQL flavor spoken by a connection.
///
/// Only the upsert conflict clause differs between dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MariaDb,
    Sqlite,
}

/// One result row with values addressable by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlRow {
    columns: Vec<(String, SqlValue)>,
}

impl SqlRow {
    pub fn new(columns: Vec<(String, SqlValue)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Moves a value out, leaving null behind.
    pub fn take(&mut self, column: &str) -> Option<SqlValue> {
        self.columns
            .iter_mut()
            .find(|(name, _)| name == column)
            .map(|(_, value)| std::mem::replace(value, SqlValue::Null))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A live connection able to run parameterized statements.
///
/// The repository borrows the connection and never opens, pools or closes
/// it. Implementations decide their own thread-safety.
pub trait SqlConnection {
    fn dialect(&self) -> Dialect;

    /// Runs a statement that returns no rows; returns the affected row count.
    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize>;

    /// Runs a query and collects every row.
    fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<SqlRow>>;
}
