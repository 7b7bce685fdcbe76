//! `create table` derivation.
//!
//! # Invariants
//! - Output is byte-identical for identical registry contents.
//! - Body order: columns, checks, foreign keys, unique keys, primary key.
//! - Every body line but the last ends with a comma.
//! - Column names and types are padded to the widest of the table.

use super::registry::SchemaRegistry;
use crate::config::{DEFAULT_CHARSET, DEFAULT_COLLATE, DEFAULT_ENGINE};
use crate::error::ConfigError;
use crate::model::table::TableDescriptor;
use log::debug;

pub(super) fn create_table(
    registry: &SchemaRegistry,
    table: &TableDescriptor,
    or_replace: bool,
) -> Result<String, ConfigError> {
    let primary_key = primary_key_lines(table);
    let foreign_keys = foreign_key_lines(registry, table)?;
    let unique_keys = unique_key_lines(table)?;
    let checks = check_lines(table);
    let columns = column_lines(table)?;

    let body: Vec<String> = columns
        .into_iter()
        .chain(checks)
        .chain(foreign_keys)
        .chain(unique_keys)
        .chain(primary_key)
        .collect();
    let last = body.len().saturating_sub(1);

    let mut lines = Vec::with_capacity(body.len() + 4);
    lines.push(format!(
        "create {}table {} (",
        if or_replace { "or replace " } else { "" },
        table.name
    ));
    for (index, line) in body.into_iter().enumerate() {
        let comma = if index < last { "," } else { "" };
        lines.push(format!("\t{line}{comma}"));
    }
    lines.push(format!(
        ") engine = {}",
        table.engine.as_deref().unwrap_or(DEFAULT_ENGINE)
    ));
    lines.push(format!(
        "  charset = {}",
        table.charset.as_deref().unwrap_or(DEFAULT_CHARSET)
    ));
    lines.push(format!(
        "  collate = {};",
        table.collate.as_deref().unwrap_or(DEFAULT_COLLATE)
    ));

    debug!(
        "event=ddl_derive module=schema status=ok table={} lines={}",
        table.name,
        lines.len()
    );
    Ok(lines.join(&registry.config().line_separator))
}

fn constraint_name(prefix: &str, table: &str, ordinal: usize) -> String {
    format!("{prefix}_{table}_{ordinal:02}")
}

fn primary_key_lines(table: &TableDescriptor) -> Option<String> {
    let columns = table.primary_key_columns();
    if columns.is_empty() {
        return None;
    }
    Some(format!("primary key ({})", columns.join(", ")))
}

fn ensure_columns<'a>(
    table: &TableDescriptor,
    columns: &'a [String],
) -> Result<&'a [String], ConfigError> {
    match columns.iter().find(|column| !table.has_column(column)) {
        Some(column) => Err(ConfigError::DanglingColumn {
            entity: table.entity,
            column: column.clone(),
        }),
        None => Ok(columns),
    }
}

fn foreign_key_lines(
    registry: &SchemaRegistry,
    table: &TableDescriptor,
) -> Result<Vec<String>, ConfigError> {
    let mut lines = Vec::with_capacity(table.foreign_keys.len());
    for (index, foreign_key) in table.foreign_keys.iter().enumerate() {
        let columns = ensure_columns(table, &foreign_key.columns)?;
        let target = registry.lookup_ref(foreign_key.references)?;
        let reference_columns = ensure_columns(&target, &foreign_key.reference_columns)?;

        lines.push(format!(
            "constraint {} foreign key ({}) references {} ({})",
            constraint_name("fk", &table.name, index + 1),
            columns.join(", "),
            target.name,
            reference_columns.join(", ")
        ));
    }
    Ok(lines)
}

fn unique_key_lines(table: &TableDescriptor) -> Result<Vec<String>, ConfigError> {
    table
        .unique_keys
        .iter()
        .enumerate()
        .map(|(index, unique_key)| {
            let columns = ensure_columns(table, &unique_key.columns)?;
            Ok(format!(
                "constraint {} unique ({})",
                constraint_name("uk", &table.name, index + 1),
                columns.join(", ")
            ))
        })
        .collect()
}

fn check_lines(table: &TableDescriptor) -> Vec<String> {
    table
        .checks
        .iter()
        .enumerate()
        .map(|(index, check)| {
            format!(
                "constraint {} check ({})",
                constraint_name("ck", &table.name, index + 1),
                check.expression
            )
        })
        .collect()
}

fn column_lines(table: &TableDescriptor) -> Result<Vec<String>, ConfigError> {
    let typed = table
        .columns
        .iter()
        .map(|column| {
            column
                .sql_type()
                .map(|sql_type| (column, sql_type))
                .ok_or_else(|| ConfigError::UnsupportedType {
                    entity: table.entity,
                    column: column.name.clone(),
                    kind: column.kind.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let name_width = typed
        .iter()
        .map(|(column, _)| column.name.len())
        .max()
        .unwrap_or(0);
    let type_width = typed
        .iter()
        .map(|(_, sql_type)| sql_type.len())
        .max()
        .unwrap_or(0);

    Ok(typed
        .into_iter()
        .map(|(column, sql_type)| {
            // One space, the padding, one space: the widest name gets two.
            let mut line = format!(
                "{} {} {} {} {}",
                column.name,
                " ".repeat(name_width - column.name.len()),
                sql_type,
                " ".repeat(type_width - sql_type.len()),
                if column.is_nullable() { "null" } else { "not null" }
            );
            if column.is_auto_increment() {
                line.push_str(" auto_increment");
            }
            line
        })
        .collect())
}
