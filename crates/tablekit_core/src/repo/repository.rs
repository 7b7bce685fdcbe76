//! Generic CRUD repository over one entity type.
//!
//! # Responsibility
//! - Resolve the entity's table descriptor once, at construction.
//! - Translate each operation into one parameterized statement.
//! - Map result rows back into entity values.
//!
//! # Invariants
//! - Lookup errors are raised before any statement reaches the connection.
//! - Every bound parameter passes through its column's coercer.
//! - `save` never reads back database-assigned keys.

use super::binding::{coercer_for, Coercer};
use super::statement;
use crate::db::{DbError, SqlConnection, SqlRow};
use crate::error::{ConfigError, OrmError, OrmResult};
use crate::model::column::ColumnDescriptor;
use crate::model::entity::{Entity, MappedRow};
use crate::model::table::TableDescriptor;
use crate::model::value::SqlValue;
use crate::schema::{global_registry, SchemaRegistry};
use log::{debug, error};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;

/// CRUD contract over entity type `E`.
pub trait CrudRepository<E: Entity> {
    /// Every row of the table, in database order.
    fn find_all(&self) -> OrmResult<Vec<E>>;

    /// Rows whose `column` equals `value`.
    fn find_by<V: Into<SqlValue>>(&self, column: &str, value: V) -> OrmResult<Vec<E>>;

    /// Inserts `row`, or overwrites its non-key columns when the key exists.
    ///
    /// Returns `row` unchanged: an auto-increment key assigned by the
    /// database is not read back.
    fn save<'r>(&self, row: &'r E) -> OrmResult<&'r E>;

    /// Deletes every row; returns the affected row count.
    fn delete_all(&self) -> OrmResult<usize>;

    /// Deletes rows whose `column` equals `value`; returns the affected row count.
    fn delete_by<V: Into<SqlValue>>(&self, column: &str, value: V) -> OrmResult<usize>;
}

/// Repository for entity `E` over a borrowed connection.
pub struct Repository<'conn, E, C: ?Sized> {
    conn: &'conn C,
    table: Arc<TableDescriptor>,
    coercers: Vec<Coercer>,
    _entity: PhantomData<fn() -> E>,
}

impl<'conn, E: Entity, C: SqlConnection + ?Sized> Repository<'conn, E, C> {
    /// Binds `E` through the global registry.
    ///
    /// # Errors
    /// - `ConfigError::MissingTable` when `E` was never registered.
    pub fn try_new(conn: &'conn C) -> OrmResult<Self> {
        Self::with_registry(conn, global_registry())
    }

    /// Binds `E` through an explicit registry.
    pub fn with_registry(conn: &'conn C, registry: &SchemaRegistry) -> OrmResult<Self> {
        let table = registry.lookup::<E>()?;
        let coercers = table
            .columns
            .iter()
            .map(|column| coercer_for(column.kind))
            .collect();

        debug!(
            "event=repo_init module=repo status=ok entity={} table={}",
            table.entity, table.name
        );
        Ok(Self {
            conn,
            table,
            coercers,
            _entity: PhantomData,
        })
    }

    pub fn table(&self) -> &TableDescriptor {
        &self.table
    }

    pub fn table_name(&self) -> &str {
        &self.table.name
    }

    fn columns(&self) -> impl Iterator<Item = (&ColumnDescriptor, &Coercer)> {
        self.table.columns.iter().zip(&self.coercers)
    }

    /// Resolves a filter column and coerces its value.
    fn filter_param(&self, column: &str, value: SqlValue) -> OrmResult<SqlValue> {
        let (index, descriptor) =
            self.table
                .find_column(column)
                .ok_or_else(|| OrmError::UnknownColumn {
                    entity: self.table.entity,
                    column: column.to_string(),
                })?;
        let coerce = self.coercers[index];
        Ok(coerce(&descriptor.name, value)?)
    }

    fn fetch(&self, sql: &str, params: &[SqlValue]) -> OrmResult<Vec<E>> {
        let rows = self.conn.query(sql, params)?;
        rows.into_iter().map(|row| self.map_row(row)).collect()
    }

    fn map_row(&self, mut row: SqlRow) -> OrmResult<E> {
        let mut values = Vec::with_capacity(self.table.columns.len());
        for (column, coerce) in self.columns() {
            let raw = row
                .take(&column.name)
                .ok_or_else(|| DbError::MissingColumn(column.name.clone()))?;
            values.push((column.name.clone(), coerce(&column.name, raw)?));
        }
        E::from_row(&MappedRow::new(values))
    }

    fn observe<T>(&self, operation: &str, run: impl FnOnce() -> OrmResult<T>) -> OrmResult<T> {
        let started_at = Instant::now();
        debug!(
            "event=repo_{operation} module=repo status=start table={}",
            self.table.name
        );

        match run() {
            Ok(value) => {
                debug!(
                    "event=repo_{operation} module=repo status=ok table={} duration_ms={}",
                    self.table.name,
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                error!(
                    "event=repo_{operation} module=repo status=error table={} duration_ms={} error_code={} error={}",
                    self.table.name,
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }
}

impl<E: Entity, C: SqlConnection + ?Sized> CrudRepository<E> for Repository<'_, E, C> {
    fn find_all(&self) -> OrmResult<Vec<E>> {
        self.observe("find_all", || {
            self.fetch(&statement::select_all(&self.table.name), &[])
        })
    }

    fn find_by<V: Into<SqlValue>>(&self, column: &str, value: V) -> OrmResult<Vec<E>> {
        let value = value.into();
        self.observe("find_by", || {
            let param = self.filter_param(column, value)?;
            self.fetch(&statement::select_by(&self.table.name, column), &[param])
        })
    }

    fn save<'r>(&self, row: &'r E) -> OrmResult<&'r E> {
        self.observe("save", || {
            let mut insert_columns = Vec::with_capacity(self.table.columns.len());
            let mut update_columns = Vec::with_capacity(self.table.columns.len());
            let mut params = Vec::with_capacity(self.table.columns.len() * 2);
            let mut update_params = Vec::with_capacity(self.table.columns.len());

            for (column, coerce) in self.columns() {
                let value =
                    row.column_value(&column.name)
                        .ok_or_else(|| ConfigError::UnboundColumn {
                            entity: self.table.entity,
                            column: column.name.clone(),
                        })?;
                if column.is_auto_increment() && value.is_null() {
                    continue;
                }

                let bound = coerce(&column.name, value)?;
                insert_columns.push(column.name.as_str());
                if !column.primary_key {
                    update_columns.push(column.name.as_str());
                    update_params.push(bound.clone());
                }
                params.push(bound);
            }
            params.extend(update_params);

            let sql = statement::upsert(
                self.conn.dialect(),
                &self.table.name,
                &insert_columns,
                &update_columns,
            );
            self.conn.execute(&sql, &params)?;
            Ok(row)
        })
    }

    fn delete_all(&self) -> OrmResult<usize> {
        self.observe("delete_all", || {
            Ok(self
                .conn
                .execute(&statement::delete_all(&self.table.name), &[])?)
        })
    }

    fn delete_by<V: Into<SqlValue>>(&self, column: &str, value: V) -> OrmResult<usize> {
        let value = value.into();
        self.observe("delete_by", || {
            let param = self.filter_param(column, value)?;
            Ok(self
                .conn
                .execute(&statement::delete_by(&self.table.name, column), &[param])?)
        })
    }
}
