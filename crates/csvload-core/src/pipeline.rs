//! Directory run: discovery, extraction, resolution and sequential loading.

use std::path::{Path, PathBuf};
use std::time::Instant;

use csvload_ingest::{InputKind, TableResolver, discover_inputs, extract_csv_entries};
use csvload_sink::Sink;
use tempfile::TempDir;
use tracing::{error, info, info_span, warn};

use crate::context::RunContext;
use crate::error::{LoadError, Result};
use crate::loader::load_file;
use crate::options::LoadOptions;
use crate::report::{FileReport, RunSummary, file_name};

/// Inputs of one run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub input_dir: PathBuf,
    /// Extraction folder for archives; a temporary folder when `None`.
    pub work_dir: Option<PathBuf>,
    pub resolver: TableResolver,
    pub options: LoadOptions,
}

/// Staging location, owning the temp dir when there is one.
enum Staging {
    Fixed(PathBuf),
    Temp(TempDir),
}

impl Staging {
    fn prepare(work_dir: Option<&Path>) -> Result<Self> {
        match work_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|source| LoadError::Staging {
                    path: dir.to_path_buf(),
                    source,
                })?;
                Ok(Self::Fixed(dir.to_path_buf()))
            }
            None => TempDir::new()
                .map(Self::Temp)
                .map_err(|source| LoadError::Staging {
                    path: std::env::temp_dir(),
                    source,
                }),
        }
    }

    fn path(&self) -> &Path {
        match self {
            Self::Fixed(path) => path,
            Self::Temp(dir) => dir.path(),
        }
    }
}

/// Loads every resolvable CSV file under `request.input_dir`.
///
/// Only a missing or unreadable input directory (or staging folder) fails the
/// run. Archive and file failures are recorded in the summary and the run
/// moves on. Files are loaded one at a time, sorted by file name.
pub fn run(sink: &mut dyn Sink, request: &RunRequest) -> Result<RunSummary> {
    let span = info_span!("run", input_dir = %request.input_dir.display());
    let _guard = span.enter();
    let started = Instant::now();

    let inputs = discover_inputs(&request.input_dir).map_err(LoadError::Input)?;
    let staging = Staging::prepare(request.work_dir.as_deref())?;

    let mut summary = RunSummary::default();
    let mut csv_files: Vec<PathBuf> = Vec::new();
    for input in inputs {
        match input.kind {
            InputKind::Csv => csv_files.push(input.path),
            InputKind::Archive => match extract_csv_entries(&input.path, staging.path()) {
                Ok(entries) => {
                    info!(archive = %input.file_name(), entries = entries.len(), "extracted archive");
                    csv_files.extend(entries);
                }
                Err(err) => {
                    error!(archive = %input.file_name(), "archive extraction failed: {err}");
                    let mut report = FileReport::new(&input.path, None);
                    report.error = Some(LoadError::Archive(err));
                    summary.files.push(report);
                }
            },
        }
    }
    csv_files.sort_by(|a, b| file_name(a).cmp(&file_name(b)).then_with(|| a.cmp(b)));
    info!(files = csv_files.len(), "discovered CSV files");

    let mut context = RunContext::new();
    for path in csv_files {
        let Some(table) = request.resolver.resolve(&path) else {
            warn!(file = %path.display(), "no table matches file, skipping");
            summary.skipped.push(path);
            continue;
        };
        let report = load_file(sink, &path, table, &mut context, &request.options);
        summary.files.push(report);
    }

    summary.duration = started.elapsed();
    info!(
        loaded = summary.loaded().count(),
        failed = summary.failed().count(),
        skipped = summary.skipped.len(),
        rows = summary.total_rows(),
        duration_ms = summary.duration.as_millis() as u64,
        "run finished"
    );
    Ok(summary)
}
