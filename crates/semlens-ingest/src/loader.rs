//! File loading with size and encoding checks.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use semlens_model::DataSource;

use crate::delimited::parse_csv;
use crate::error::{IngestError, Result};
use crate::json::parse_json;
use crate::options::IngestOptions;

fn open_error(path: &Path, error: std::io::Error) -> IngestError {
    if error.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: error,
        }
    }
}

/// Check file size against a limit before reading.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Reject UTF-16 input by its byte order mark. A UTF-8 BOM is accepted.
fn check_encoding(path: &Path, bytes: &[u8]) -> Result<()> {
    let encoding = match bytes {
        [0xFF, 0xFE, ..] => "UTF-16 LE",
        [0xFE, 0xFF, ..] => "UTF-16 BE",
        _ => return Ok(()),
    };
    Err(IngestError::UnsupportedEncoding {
        path: path.to_path_buf(),
        encoding,
    })
}

/// Load a `.csv` or `.json` file into a data source.
pub fn load_path(path: &Path, options: &IngestOptions) -> Result<DataSource> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if extension != "csv" && extension != "json" {
        return Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        });
    }

    check_file_size(path, options.max_file_size)?;

    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut bytes))
        .map_err(|e| open_error(path, e))?;
    check_encoding(path, &bytes)?;
    let text = String::from_utf8(bytes).map_err(|_| IngestError::UnsupportedEncoding {
        path: path.to_path_buf(),
        encoding: "non-UTF-8",
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let source = if extension == "csv" {
        parse_csv(&file_name, &text, options)?
    } else {
        parse_json(&file_name, &text, options)?
    };
    tracing::info!(
        path = %path.display(),
        rows = source.row_count(),
        columns = source.column_count(),
        "loaded data source"
    );
    Ok(source)
}
