//! Repository layer.
//!
//! # Responsibility
//! - Expose generic CRUD over any registered entity type.
//! - Keep SQL text and value coercion details behind the repository API.
//!
//! # Invariants
//! - Each operation issues at most one statement.
//! - No operation retries, caches or opens transactions.

mod binding;
pub mod repository;
mod statement;
