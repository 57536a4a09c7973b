//! Data ingestion for semlens.
//!
//! Turns CSV and JSON text into a [`DataSource`](semlens_model::DataSource)
//! with dynamically typed cells. The transform, join and lineage crates
//! only ever see the parsed rows.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use semlens_ingest::{IngestOptions, load_path};
//!
//! let source = load_path(Path::new("data/orders.csv"), &IngestOptions::default())?;
//! println!("{} rows", source.row_count());
//! ```

mod cell;
mod delimited;
mod error;
mod json;
mod loader;
mod options;

// === Error Types ===
pub use error::{IngestError, Result};

// === Parsing ===
pub use cell::infer_value;
pub use delimited::parse_csv;
pub use json::parse_json;

// === File Loading ===
pub use loader::{check_file_size, load_path};
pub use options::{DEFAULT_MAX_FILE_SIZE, IngestOptions};
