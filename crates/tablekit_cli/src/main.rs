//! CLI entry point.
//!
//! # Responsibility
//! - Print the core version and the DDL of a small demo schema.
//! - Keep output deterministic so it can be diffed against a live database.
//!
//! Usage: `tablekit_cli [--no-replace] [--describe] [--config <PATH>]`

mod demo;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tablekit_core::{init_logging, SchemaRegistry, TableDescriptor, TablekitConfig};

/// Prints the core version and the demo schema DDL.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Emit `create table` instead of `create or replace table`.
    #[arg(long)]
    no_replace: bool,
    /// Print the registered table descriptors as JSON instead of DDL.
    #[arg(long)]
    describe: bool,
    /// JSON configuration file with `logging` and `schema` sections.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => TablekitConfig::from_file(path).map_err(|err| err.to_string())?,
        None => TablekitConfig::default(),
    };
    init_logging(&config.logging)?;

    let registry = SchemaRegistry::new(config.schema.clone());
    demo::register(&registry).map_err(|err| err.to_string())?;

    println!("tablekit_core version={}", tablekit_core::core_version());
    if args.describe {
        let tables = registry.tables();
        let descriptors: Vec<&TableDescriptor> = tables.iter().map(|table| &**table).collect();
        let json = serde_json::to_string_pretty(&descriptors).map_err(|err| err.to_string())?;
        println!("{json}");
        return Ok(());
    }

    let or_replace = config.schema.or_replace && !args.no_replace;
    let schema = registry
        .dump_schema(or_replace)
        .map_err(|err| err.to_string())?;
    println!("{schema}");
    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("tablekit_cli: {message}");
            ExitCode::FAILURE
        }
    }
}
