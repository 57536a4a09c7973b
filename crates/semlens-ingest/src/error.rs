//! Error types for data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a file into a data source.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("file {path} is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File uses an encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    /// Extension is neither `.csv` nor `.json`.
    #[error("unsupported file type '{extension}' for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    // === CSV Errors ===
    /// CSV has no header row.
    #[error("CSV file is empty: {file_name}")]
    EmptyCsv { file_name: String },

    /// A header cell is blank.
    #[error("column {index} has an empty name in {file_name}")]
    EmptyColumnName { file_name: String, index: usize },

    /// The CSV reader rejected the input.
    #[error("failed to parse CSV {file_name}: {source}")]
    CsvParse {
        file_name: String,
        #[source]
        source: csv::Error,
    },

    // === JSON Errors ===
    /// Input is not valid JSON.
    #[error("failed to parse JSON {file_name}: {source}")]
    JsonParse {
        file_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON, but not an array of records.
    #[error("unexpected JSON layout in {file_name}: {reason}")]
    JsonShape { file_name: String, reason: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
