use std::time::Duration;

use csvload_coerce::NumberLocale;
use csvload_ingest::CsvOptions;

/// Upper bound on rows per bulk insert batch.
pub const DEFAULT_BATCH_SIZE: usize = 5000;

/// Per-run load settings.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub csv: CsvOptions,
    pub max_batch_size: usize,
    /// Bounds the bulk insert only.
    pub timeout: Duration,
    pub table_lock: bool,
    /// Convention for the first decimal parsing pass.
    pub locale: NumberLocale,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            csv: CsvOptions::default(),
            max_batch_size: DEFAULT_BATCH_SIZE,
            timeout: Duration::from_secs(600),
            table_lock: true,
            locale: NumberLocale::regional(),
        }
    }
}

/// Batch size for `row_count` rows: `clamp(row_count, 1, max)`.
pub fn effective_batch_size(row_count: usize, max: usize) -> usize {
    row_count.clamp(1, max.max(1))
}
