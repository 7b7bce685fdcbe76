//! Table descriptors and table-level constraints.
//!
//! # Responsibility
//! - Hold table name, storage options and column list for one entity type.
//! - Declare foreign keys, unique keys and check constraints.
//!
//! # Invariants
//! - Column order is declaration order and drives DDL and bind order.
//! - Constraint order is declaration order and drives constraint ordinals.

use super::column::ColumnDescriptor;
use serde::Serialize;
use std::any::TypeId;

/// Reference to another entity type, resolved through the schema registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityRef {
    #[serde(skip)]
    pub type_id: TypeId,
    #[serde(rename = "entity")]
    pub type_name: &'static str,
}

impl EntityRef {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub references: EntityRef,
    pub reference_columns: Vec<String>,
}

impl ForeignKey {
    /// Declares `columns` of this table referencing `reference_columns` of `T`.
    pub fn to<T: 'static, C, R>(columns: C, reference_columns: R) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            references: EntityRef::of::<T>(),
            reference_columns: reference_columns.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniqueKey {
    pub columns: Vec<String>,
}

impl UniqueKey {
    pub fn new<C>(columns: C) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Raw boolean SQL expression; emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    pub expression: String,
}

/// Table-level metadata for one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDescriptor {
    pub name: String,
    /// Rust type name of the bound entity; filled in at registration.
    pub entity: &'static str,
    pub engine: Option<String>,
    pub charset: Option<String>,
    pub collate: Option<String>,
    pub columns: Vec<ColumnDescriptor>,
    pub foreign_keys: Vec<ForeignKey>,
    pub unique_keys: Vec<UniqueKey>,
    pub checks: Vec<Check>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity: "<unregistered>",
            engine: None,
            charset: None,
            collate: None,
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            unique_keys: Vec::new(),
            checks: Vec::new(),
        }
    }

    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn collate(mut self, collate: impl Into<String>) -> Self {
        self.collate = Some(collate.into());
        self
    }

    pub fn column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    pub fn foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    pub fn unique_key(mut self, unique_key: UniqueKey) -> Self {
        self.unique_keys.push(unique_key);
        self
    }

    pub fn check(mut self, expression: impl Into<String>) -> Self {
        self.checks.push(Check {
            expression: expression.into(),
        });
        self
    }

    /// Finds a column by its SQL name.
    pub fn find_column(&self, name: &str) -> Option<(usize, &ColumnDescriptor)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, column)| column.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.find_column(name).is_some()
    }

    /// Primary-key column names in declaration order.
    pub fn primary_key_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|column| column.primary_key)
            .map(|column| column.name.as_str())
            .collect()
    }
}
