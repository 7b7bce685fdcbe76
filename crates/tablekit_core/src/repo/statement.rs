//! SQL text for repository operations.
//!
//! # Invariants
//! - Placeholders are positional `?`.
//! - Upsert text lists update assignments in the same order the caller
//!   binds their second-pass parameters.

use crate::db::Dialect;

const UPSERT_LINE_SEPARATOR: &str = "\n";

pub(crate) fn select_all(table: &str) -> String {
    format!("select * from {table}")
}

pub(crate) fn select_by(table: &str, column: &str) -> String {
    format!("select * from {table} where {column} = ?")
}

pub(crate) fn delete_all(table: &str) -> String {
    format!("delete from {table}")
}

pub(crate) fn delete_by(table: &str, column: &str) -> String {
    format!("delete from {table} where {column} = ?")
}

/// Insert that overwrites `update_columns` when the key already exists.
///
/// The update line is omitted when `update_columns` is empty, so a
/// duplicate key then fails like a plain insert.
pub(crate) fn upsert(
    dialect: Dialect,
    table: &str,
    insert_columns: &[&str],
    update_columns: &[&str],
) -> String {
    let mut lines = Vec::with_capacity(3);

    if insert_columns.is_empty() {
        match dialect {
            Dialect::MariaDb => lines.push(format!("insert into {table} () values ()")),
            Dialect::Sqlite => lines.push(format!("insert into {table} default values")),
        }
    } else {
        let placeholders = vec!["?"; insert_columns.len()].join(", ");
        lines.push(format!(
            "insert into {table} ({})",
            insert_columns.join(", ")
        ));
        lines.push(format!("values ({placeholders})"));
    }

    if !update_columns.is_empty() {
        let assignments = update_columns
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        match dialect {
            Dialect::MariaDb => lines.push(format!("on duplicate key update {assignments}")),
            Dialect::Sqlite => lines.push(format!("on conflict do update set {assignments}")),
        }
    }

    lines.join(UPSERT_LINE_SEPARATOR)
}
