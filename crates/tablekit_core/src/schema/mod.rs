//! Entity registration and DDL derivation.
//!
//! # Responsibility
//! - Keep the table descriptor registered for each entity type.
//! - Derive MariaDB `create table` statements from descriptors.
//!
//! # Invariants
//! - A descriptor is reachable only through the registry it was registered in.
//! - Derivation is read-only and deterministic.

mod ddl;
mod registry;

pub use registry::{global_registry, SchemaRegistry};

use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Whether `name` is a plain, unquoted SQL identifier.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}
