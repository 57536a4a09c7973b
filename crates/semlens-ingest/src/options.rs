//! Configuration options for ingestion.

use serde::{Deserialize, Serialize};

/// Maximum file size accepted by `load_path` (100 MB default).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Options controlling how files are parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Field delimiter for CSV input.
    pub delimiter: u8,
    /// Convert numeric and boolean text into typed values.
    pub infer_types: bool,
    /// Trim surrounding whitespace from CSV cells.
    pub trim: bool,
    /// Keep the original text on `DataSource::raw_data`.
    pub keep_raw: bool,
    /// Upper bound for file size in bytes.
    pub max_file_size: u64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            infer_types: true,
            trim: true,
            keep_raw: true,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl IngestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_infer_types(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }

    #[must_use]
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    #[must_use]
    pub fn with_keep_raw(mut self, keep_raw: bool) -> Self {
        self.keep_raw = keep_raw;
        self
    }

    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }
}
