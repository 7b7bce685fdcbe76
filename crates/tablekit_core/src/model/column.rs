//! Column descriptors and the column-kind catalog.
//!
//! # Responsibility
//! - Describe one mapped field: name, kind, length, nullability, key role.
//! - Map column kinds to MariaDB column types.
//!
//! # Invariants
//! - Auto-increment only applies to integer primary keys; the flag is
//!   ignored everywhere else.
//! - `Enum` and `Other` kinds bind values but have no DDL type.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Length used by `char(N)` and `varchar(N)` when none is declared.
pub const DEFAULT_COLUMN_LENGTH: u32 = 255;

/// Semantic type of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// 64-bit integer.
    BigInt,
    /// 32-bit integer.
    Int,
    /// 16-bit integer.
    SmallInt,
    /// 8-bit integer.
    TinyInt,
    Bool,
    /// Single precision float.
    Float,
    /// Double precision float.
    Double,
    /// Fixed-length character column.
    Char,
    /// Variable-length string column.
    Text,
    Date,
    DateTime,
    Decimal,
    /// Enumeration bound as its text form.
    Enum,
    /// Any other field type; values are bound as given.
    Other(&'static str),
}

impl ColumnKind {
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::BigInt | Self::Int | Self::SmallInt | Self::TinyInt
        )
    }

    /// Returns the MariaDB column type, or `None` for kinds with no DDL form.
    pub fn sql_type(self, length: u32) -> Option<String> {
        let sql_type = match self {
            Self::BigInt => "bigint".to_string(),
            Self::Int => "int".to_string(),
            Self::SmallInt => "smallint".to_string(),
            Self::TinyInt => "tinyint".to_string(),
            Self::Bool => "bit".to_string(),
            Self::Float => "float".to_string(),
            Self::Double => "double".to_string(),
            Self::Char => format!("char({length})"),
            Self::Text => format!("varchar({length})"),
            Self::Date => "date".to_string(),
            Self::DateTime => "datetime".to_string(),
            Self::Decimal => "decimal(38, 2)".to_string(),
            Self::Enum | Self::Other(_) => return None,
        };
        Some(sql_type)
    }
}

impl Display for ColumnKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BigInt => write!(f, "bigint"),
            Self::Int => write!(f, "int"),
            Self::SmallInt => write!(f, "smallint"),
            Self::TinyInt => write!(f, "tinyint"),
            Self::Bool => write!(f, "bool"),
            Self::Float => write!(f, "float"),
            Self::Double => write!(f, "double"),
            Self::Char => write!(f, "char"),
            Self::Text => write!(f, "text"),
            Self::Date => write!(f, "date"),
            Self::DateTime => write!(f, "datetime"),
            Self::Decimal => write!(f, "decimal"),
            Self::Enum => write!(f, "enum"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Metadata for one mapped field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub kind: ColumnKind,
    pub length: u32,
    pub nullable: bool,
    pub primary_key: bool,
    /// Declared flag; see [`ColumnDescriptor::is_auto_increment`].
    pub auto_increment: bool,
}

impl ColumnDescriptor {
    /// Creates a nullable, non-key column with the default length.
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            length: DEFAULT_COLUMN_LENGTH,
            nullable: true,
            primary_key: false,
            auto_increment: false,
        }
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column auto-increment. Also marks it primary key.
    pub fn auto_increment(mut self) -> Self {
        self.primary_key = true;
        self.auto_increment = true;
        self
    }

    /// Whether the database assigns this column's value.
    ///
    /// Every integer kind qualifies, so an `Int`, `SmallInt` or `TinyInt`
    /// key also derives `auto_increment`, not only `BigInt` keys. DDL for
    /// narrower keys therefore differs from generators that restrict the
    /// flag to 64-bit keys.
    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment && self.primary_key && self.kind.is_integer()
    }

    /// Primary keys are never nullable, whatever was declared.
    pub fn is_nullable(&self) -> bool {
        self.nullable && !self.primary_key
    }

    pub fn sql_type(&self) -> Option<String> {
        self.kind.sql_type(self.length)
    }
}
