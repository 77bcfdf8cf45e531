use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use tracing::info;

use csvload_cli::config::{ConfigOverrides, LoaderConfig};
use csvload_core::{RunSummary, run};
use csvload_ingest::Delimiter;
use csvload_sink::{FileSink, Sink, fetch_schema, is_reserved};

use crate::cli::{ConfigArgs, RunArgs, SchemaArgs};
use crate::summary::{apply_table_style, dim_cell, header_cell};

fn load_config(args: &ConfigArgs) -> Result<LoaderConfig> {
    LoaderConfig::load(&args.config)
        .with_context(|| format!("load config {}", args.config.display()))
}

pub fn run_load(args: &RunArgs) -> Result<RunSummary> {
    let mut config = load_config(&args.config)?;
    let delimiter = args
        .delimiter
        .as_deref()
        .map(str::parse::<Delimiter>)
        .transpose()
        .context("parse --delimiter")?;
    config.apply(ConfigOverrides {
        input_dir: args.input_dir.clone(),
        sink_dir: args.sink_dir.clone(),
        delimiter,
        tolerant: args.tolerant,
        batch_size: args.batch_size,
    });
    config.validate().context("validate config")?;

    let request = config.run_request().context("build run request")?;
    let mut sink = FileSink::open(&config.sink_dir)
        .with_context(|| format!("open sink {}", config.sink_dir.display()))?;
    info!(
        input_dir = %config.input_dir.display(),
        tables = config.tables.len(),
        mode = ?config.mode,
        "starting run"
    );
    let summary = run(&mut sink, &request).context("run loader")?;
    Ok(summary)
}

pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let table = config.parse_table_name(&args.table);
    let sink = FileSink::open(&config.sink_dir)
        .with_context(|| format!("open sink {}", config.sink_dir.display()))?;
    let schema = fetch_schema(&sink, &table).with_context(|| format!("fetch schema {table}"))?;

    let mut output = Table::new();
    output.set_header(vec![
        header_cell("#"),
        header_cell("Column"),
        header_cell("Declared"),
        header_cell("Loads as"),
    ]);
    apply_table_style(&mut output);
    for column in schema.columns() {
        output.add_row(vec![
            Cell::new(column.ordinal),
            Cell::new(&column.name),
            Cell::new(column.declared_type()),
            Cell::new(column.semantic_type),
        ]);
    }
    println!("Table: {table}");
    println!("{output}");
    let reserved: Vec<String> = sink
        .query_columns(&table)?
        .into_iter()
        .map(|column| column.name)
        .filter(|name| is_reserved(name))
        .collect();
    if !reserved.is_empty() {
        println!("System-managed (not loaded): {}", reserved.join(", "));
    }
    Ok(())
}

pub fn run_tables(args: &ConfigArgs) -> Result<()> {
    let config = load_config(args)?;
    let mut output = Table::new();
    output.set_header(vec![header_cell("Table"), header_cell("Matches")]);
    apply_table_style(&mut output);
    for entry in &config.tables {
        let table = config.table_ref(entry);
        let matches = match &entry.pattern {
            Some(pattern) => Cell::new(pattern),
            None => dim_cell(format!("{}.csv", table.name)),
        };
        output.add_row(vec![Cell::new(table), matches]);
    }
    println!("{output}");
    Ok(())
}
