//! Logging setup on top of `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `error`: failed files and archives
//! - `warn`: skipped files, ignored columns, tolerated CSV defects
//! - `info`: run and file progress, row counts
//! - `debug`: schema fetches, batches, extracted entries

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const CRATES: [&str; 6] = [
    "csvload",
    "csvload_cli",
    "csvload_coerce",
    "csvload_core",
    "csvload_ingest",
    "csvload_sink",
];

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace the level filter when it is set.
    pub use_env_filter: bool,
    pub with_timestamps: bool,
    pub with_target: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Write to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            init_logging_with_writer(config, SharedWriter::new(file));
        }
        None => init_logging_with_writer(config, io::stderr),
    }
    Ok(())
}

/// Installs the global subscriber writing to `writer`.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    build_subscriber(config, writer).init();
}

/// Builds the subscriber without installing it.
pub fn build_subscriber<W>(config: &LogConfig, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = format_layer(config, writer).with_filter(build_env_filter(config));
    tracing_subscriber::registry().with(layer)
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn format_layer<W>(config: &LogConfig, writer: W) -> BoxedLayer
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target);
    match (config.format, config.with_timestamps) {
        // JSON lines always carry a timestamp and report file span timings.
        (LogFormat::Json, _) => base.json().with_span_events(FmtSpan::CLOSE).boxed(),
        (LogFormat::Compact, true) => base.compact().with_ansi(config.with_ansi).boxed(),
        (LogFormat::Compact, false) => base
            .compact()
            .with_ansi(config.with_ansi)
            .without_time()
            .boxed(),
        (LogFormat::Pretty, true) => base.with_ansi(config.with_ansi).boxed(),
        (LogFormat::Pretty, false) => base.with_ansi(config.with_ansi).without_time().boxed(),
    }
}

/// Cloneable writer handle; every clone appends to the same sink.
#[derive(Debug)]
pub struct SharedWriter<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for SharedWriter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Write> SharedWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    fn with_inner<R>(&self, f: impl FnOnce(&mut T) -> io::Result<R>) -> io::Result<R> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;
        f(&mut guard)
    }
}

impl SharedWriter<Vec<u8>> {
    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        self.inner
            .lock()
            .map(|buffer| String::from_utf8_lossy(&buffer).into_owned())
            .unwrap_or_default()
    }
}

impl<T: Write> Write for SharedWriter<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_inner(|inner| inner.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_inner(T::flush)
    }
}

impl<'a, T: Write + Send + 'static> MakeWriter<'a> for SharedWriter<T> {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Level directives for the csvload crates; other crates stay at `warn`.
pub fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|krate| format!("{krate}={level}")));
    directives.join(",")
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let fallback = || EnvFilter::new(default_directives(config.level_filter));
    if config.use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, info, warn};

    fn json_config(level: LevelFilter) -> LogConfig {
        LogConfig {
            level_filter: level,
            use_env_filter: false,
            format: LogFormat::Json,
            with_ansi: false,
            ..LogConfig::default()
        }
    }

    #[test]
    fn test_default_directives() {
        let directives = default_directives(LevelFilter::DEBUG);
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("csvload_core=debug"));
        assert!(directives.contains("csvload_sink=debug"));
    }

    #[test]
    fn test_json_lines_carry_fields_and_respect_level() {
        let buffer = SharedWriter::new(Vec::new());
        let subscriber = build_subscriber(&json_config(LevelFilter::INFO), buffer.clone());

        tracing::subscriber::with_default(subscriber, || {
            info!(target: "csvload_core::loader", rows = 3, "file loaded");
            debug!(target: "csvload_core::loader", "parsed file");
            info!(target: "other_crate", "chatter");
            warn!(target: "other_crate", "disk almost full");
        });

        let output = buffer.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2, "{output}");
        assert!(lines[0].contains("\"rows\":3"));
        assert!(lines[0].contains("file loaded"));
        assert!(lines[1].contains("disk almost full"));
    }

    #[test]
    fn test_compact_without_timestamps_is_plain_text() {
        let buffer = SharedWriter::new(Vec::new());
        let config = LogConfig {
            level_filter: LevelFilter::WARN,
            use_env_filter: false,
            format: LogFormat::Compact,
            with_ansi: false,
            ..LogConfig::default()
        };
        let subscriber = build_subscriber(&config, buffer.clone());

        tracing::subscriber::with_default(subscriber, || {
            warn!(target: "csvload_ingest", file = "orders.csv", "no table matches file");
        });

        let output = buffer.contents();
        assert!(output.starts_with(" WARN") || output.starts_with("WARN"), "{output}");
        assert!(output.contains("no table matches file"));
        assert!(output.contains("file=\"orders.csv\""));
        assert!(!output.contains('\u{1b}'));
    }
}
