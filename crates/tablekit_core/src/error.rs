//! Error taxonomy shared by the schema deriver and the repository.
//!
//! # Invariants
//! - Configuration and lookup errors are raised before any SQL is issued.
//! - Every driver, mapping or coercion failure surfaces as `Execution`.

use crate::db::DbError;
use thiserror::Error;

pub type OrmResult<T> = Result<T, OrmError>;

/// Coarse category of an [`OrmError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Lookup,
    Execution,
}

/// Mistakes in entity metadata or crate configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("entity `{entity}` has no registered table descriptor")]
    MissingTable { entity: &'static str },
    #[error("type `{kind}` of column `{column}` in `{entity}` is not supported")]
    UnsupportedType {
        entity: &'static str,
        column: String,
        kind: String,
    },
    #[error("column `{column}` is not present in `{entity}`")]
    DanglingColumn { entity: &'static str, column: String },
    #[error("`{0}` is not a valid SQL identifier")]
    InvalidIdentifier(String),
    #[error("entity `{entity}` exposes no value for column `{column}`")]
    UnboundColumn { entity: &'static str, column: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Single failure type returned by every public operation.
#[derive(Debug, Error)]
pub enum OrmError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("column `{column}` is not present in `{entity}`")]
    UnknownColumn { entity: &'static str, column: String },
    #[error(transparent)]
    Execution(#[from] DbError),
}

impl OrmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Configuration,
            Self::UnknownColumn { .. } => ErrorKind::Lookup,
            Self::Execution(_) => ErrorKind::Execution,
        }
    }

    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::UnknownColumn { .. } => "unknown_column",
            Self::Execution(_) => "execution_failed",
        }
    }
}

impl From<rusqlite::Error> for OrmError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Execution(DbError::Sqlite(value))
    }
}
