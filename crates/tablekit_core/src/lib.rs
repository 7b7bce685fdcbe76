//! Minimal object-relational mapping core for MariaDB-style SQL.
//!
//! Entity types register a table descriptor once; the crate then derives
//! `create table` statements from it and runs generic CRUD statements over a
//! caller supplied connection.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;

pub use config::{LoggingConfig, SchemaConfig, TablekitConfig};
pub use db::{open_sqlite, open_sqlite_in_memory, DbError, DbResult, Dialect, SqlConnection, SqlRow};
pub use error::{ConfigError, ErrorKind, OrmError, OrmResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::column::{ColumnDescriptor, ColumnKind};
pub use model::entity::{Entity, MappedRow};
pub use model::table::{Check, EntityRef, ForeignKey, TableDescriptor, UniqueKey};
pub use model::value::{FromSqlValue, SqlValue};
pub use repo::repository::{CrudRepository, Repository};
pub use schema::{global_registry, is_identifier, SchemaRegistry};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
