//! Entity metadata and value model.
//!
//! # Responsibility
//! - Describe tables, columns and constraints as plain structs.
//! - Define the dynamic SQL value used at the connection boundary.
//!
//! # Invariants
//! - Descriptors are data only; nothing here talks to a database.

pub mod column;
pub mod entity;
pub mod table;
pub mod value;
