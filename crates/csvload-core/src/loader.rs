//! Single-file load.

use std::path::Path;
use std::time::Instant;

use csvload_coerce::{Coercer, reconcile};
use csvload_ingest::read_rows;
use csvload_model::{TableRef, TypedRow};
use csvload_sink::{BulkInsert, BulkOptions, Sink};
use tracing::{debug, error, info, info_span, warn};

use crate::context::RunContext;
use crate::error::{LoadError, Result};
use crate::options::{LoadOptions, effective_batch_size};
use crate::report::{FileReport, FileStage};

/// Loads one CSV file into `table`.
///
/// Every row is parsed and coerced before the sink is written to, so a bad
/// row fails the file with nothing inserted. The table is truncated the first
/// time it is loaded in the run, even when the file turns out to have no rows.
/// Errors are captured in the report, never propagated.
pub fn load_file(
    sink: &mut dyn Sink,
    path: &Path,
    table: &TableRef,
    context: &mut RunContext,
    options: &LoadOptions,
) -> FileReport {
    let span = info_span!("file", file = %path.display(), table = %table);
    let _guard = span.enter();
    let started = Instant::now();

    let mut report = FileReport::new(path, Some(table.clone()));
    match load_stages(sink, path, table, context, options, &mut report.stage) {
        Ok(rows) => {
            report.rows_loaded = rows;
            info!(
                rows,
                duration_ms = started.elapsed().as_millis() as u64,
                "file loaded"
            );
        }
        Err(err) => {
            log_failure(&err, report.stage);
            report.error = Some(err);
        }
    }
    report.duration = started.elapsed();
    report
}

fn load_stages(
    sink: &mut dyn Sink,
    path: &Path,
    table: &TableRef,
    context: &mut RunContext,
    options: &LoadOptions,
    stage: &mut FileStage,
) -> Result<u64> {
    let schema = context.schemas.get_or_fetch(&*sink, table)?;
    *stage = FileStage::SchemaFetched;

    let rows = read_rows(path, &options.csv)?;
    let plan = reconcile(rows.columns().names(), &schema)?;
    let coercer = Coercer::new(options.locale.clone());
    let mut typed: Vec<TypedRow> = Vec::new();
    for raw in rows {
        let raw = raw?;
        typed.push(coercer.coerce_row(&raw, &plan, &schema)?);
    }
    *stage = FileStage::Parsed;
    debug!(rows = typed.len(), "parsed file");

    if !context.truncated.contains(table) {
        sink.truncate(table)?;
        context.truncated.insert(table);
        info!("truncated table");
    }
    *stage = FileStage::Truncated;

    if typed.is_empty() {
        warn!("file has no data rows");
        *stage = FileStage::Loaded;
        return Ok(0);
    }

    let columns: Vec<String> = schema
        .columns()
        .iter()
        .map(|column| column.name.clone())
        .collect();
    let insert = BulkInsert {
        table,
        columns: &columns,
        rows: &typed,
        options: BulkOptions {
            batch_size: effective_batch_size(typed.len(), options.max_batch_size),
            timeout: options.timeout,
            table_lock: options.table_lock,
        },
    };
    let written = sink.bulk_insert(&insert)?;
    *stage = FileStage::Loaded;
    Ok(written)
}

fn log_failure(err: &LoadError, stage: FileStage) {
    match err.conversion() {
        Some(conversion) => error!(
            stage = %stage,
            kind = %err.kind(),
            column = %conversion.column,
            raw_value = %conversion.raw_value,
            line = conversion.line,
            "file failed: {err}"
        ),
        None => error!(stage = %stage, kind = %err.kind(), "file failed: {err}"),
    }
}
