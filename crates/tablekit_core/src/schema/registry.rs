//! Table-descriptor registry.
//!
//! # Responsibility
//! - Bind each entity type to exactly one table descriptor.
//! - Validate identifiers and apply table-option defaults at registration.
//! - Serve descriptors to repositories and the DDL deriver.
//!
//! # Invariants
//! - Registration order is preserved; re-registering a type replaces its
//!   descriptor in place.
//! - Registered descriptors are immutable and shared through `Arc`.

use super::{ddl, is_identifier};
use crate::config::SchemaConfig;
use crate::error::ConfigError;
use crate::model::entity::Entity;
use crate::model::table::{EntityRef, TableDescriptor};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::sync::{Arc, PoisonError, RwLock};

static GLOBAL_REGISTRY: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::default);

/// Process-wide registry used by [`Repository::try_new`](crate::Repository::try_new).
pub fn global_registry() -> &'static SchemaRegistry {
    &GLOBAL_REGISTRY
}

struct RegisteredTable {
    type_id: TypeId,
    descriptor: Arc<TableDescriptor>,
}

pub struct SchemaRegistry {
    config: SchemaConfig,
    tables: RwLock<Vec<RegisteredTable>>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new(SchemaConfig::default())
    }
}

impl SchemaRegistry {
    pub fn new(config: SchemaConfig) -> Self {
        Self {
            config,
            tables: RwLock::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Registers `descriptor` as the table of entity type `E`.
    ///
    /// # Errors
    /// - `ConfigError::InvalidIdentifier` when the table name, a column name
    ///   or a constraint column is not a plain SQL identifier.
    pub fn register<E: Entity>(
        &self,
        mut descriptor: TableDescriptor,
    ) -> Result<Arc<TableDescriptor>, ConfigError> {
        validate_identifiers(&descriptor)?;

        let entity = EntityRef::of::<E>();
        descriptor.entity = entity.type_name;
        descriptor
            .engine
            .get_or_insert_with(|| self.config.default_engine.clone());
        descriptor
            .charset
            .get_or_insert_with(|| self.config.default_charset.clone());
        descriptor
            .collate
            .get_or_insert_with(|| self.config.default_collate.clone());

        let descriptor = Arc::new(descriptor);
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        match tables.iter_mut().find(|table| table.type_id == entity.type_id) {
            Some(existing) => {
                warn!(
                    "event=entity_register module=schema status=replaced entity={} table={}",
                    entity.type_name, descriptor.name
                );
                existing.descriptor = Arc::clone(&descriptor);
            }
            None => {
                info!(
                    "event=entity_register module=schema status=ok entity={} table={} columns={}",
                    entity.type_name,
                    descriptor.name,
                    descriptor.columns.len()
                );
                tables.push(RegisteredTable {
                    type_id: entity.type_id,
                    descriptor: Arc::clone(&descriptor),
                });
            }
        }

        Ok(descriptor)
    }

    /// Returns the descriptor registered for `E`.
    pub fn lookup<E: 'static>(&self) -> Result<Arc<TableDescriptor>, ConfigError> {
        self.lookup_ref(EntityRef::of::<E>())
    }

    pub fn is_registered<E: 'static>(&self) -> bool {
        self.lookup::<E>().is_ok()
    }

    pub(crate) fn lookup_ref(&self, entity: EntityRef) -> Result<Arc<TableDescriptor>, ConfigError> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables
            .iter()
            .find(|table| table.type_id == entity.type_id)
            .map(|table| Arc::clone(&table.descriptor))
            .ok_or(ConfigError::MissingTable {
                entity: entity.type_name,
            })
    }

    /// All registered descriptors in registration order.
    pub fn tables(&self) -> Vec<Arc<TableDescriptor>> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables
            .iter()
            .map(|table| Arc::clone(&table.descriptor))
            .collect()
    }

    /// Derives the `create table` statement for `E`.
    pub fn ddl_of_create_table<E: 'static>(&self, or_replace: bool) -> Result<String, ConfigError> {
        let table = self.lookup::<E>()?;
        ddl::create_table(self, &table, or_replace)
    }

    /// Same as `ddl_of_create_table` with the configured `or_replace`.
    pub fn ddl_of_create_table_default<E: 'static>(&self) -> Result<String, ConfigError> {
        self.ddl_of_create_table::<E>(self.config.or_replace)
    }

    /// Derives every registered table in registration order, separated by
    /// a blank line. Fails on the first table that cannot be derived.
    pub fn dump_schema(&self, or_replace: bool) -> Result<String, ConfigError> {
        let tables = self.tables();
        let statements = tables
            .iter()
            .map(|table| ddl::create_table(self, table, or_replace))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            "event=schema_dump module=schema status=ok tables={}",
            statements.len()
        );

        let separator = self.config.line_separator.repeat(2);
        Ok(statements.join(&separator))
    }
}

fn validate_identifiers(descriptor: &TableDescriptor) -> Result<(), ConfigError> {
    let column_names = descriptor.columns.iter().map(|column| &column.name);
    let foreign_key_names = descriptor
        .foreign_keys
        .iter()
        .flat_map(|key| key.columns.iter().chain(&key.reference_columns));
    let unique_key_names = descriptor
        .unique_keys
        .iter()
        .flat_map(|key| key.columns.iter());
    let options = [&descriptor.engine, &descriptor.charset, &descriptor.collate]
        .into_iter()
        .flatten();

    std::iter::once(&descriptor.name)
        .chain(column_names)
        .chain(foreign_key_names)
        .chain(unique_key_names)
        .chain(options)
        .find(|name| !is_identifier(name))
        .map_or(Ok(()), |name| Err(ConfigError::InvalidIdentifier(name.clone())))
}
