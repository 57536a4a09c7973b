//! CSV parsing into a data source.

use std::collections::{HashMap, HashSet};

use semlens_model::{DataSource, Row, SourceType, Value};

use crate::cell::infer_value;
use crate::error::{IngestError, Result};
use crate::options::IngestOptions;

/// Parse CSV text with a header row.
///
/// Short rows are padded with `Null`; cells beyond the header are dropped.
/// Repeated header names get a numeric suffix (`name_2`, `name_3`).
pub fn parse_csv(file_name: &str, text: &str, options: &IngestOptions) -> Result<DataSource> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(options.delimiter)
        .trim(if options.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .from_reader(text.as_bytes());

    let csv_error = |source| IngestError::CsvParse {
        file_name: file_name.to_string(),
        source,
    };

    let headers = reader.headers().map_err(csv_error)?.clone();
    if headers.is_empty() {
        return Err(IngestError::EmptyCsv {
            file_name: file_name.to_string(),
        });
    }
    let columns = unique_columns(file_name, headers.iter())?;

    let mut rows: Vec<Row> = Vec::new();
    let mut ragged = 0usize;
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) && columns.len() > 1 {
            continue;
        }
        if record.len() != columns.len() {
            ragged += 1;
        }
        let row = columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let value = match record.get(index) {
                    None => Value::Null,
                    Some(cell) if options.infer_types => infer_value(cell),
                    Some("") => Value::Null,
                    Some(cell) => Value::String(cell.to_string()),
                };
                (column.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    if ragged > 0 {
        tracing::warn!(
            file_name,
            ragged_rows = ragged,
            "CSV rows with a different field count than the header"
        );
    }
    if columns.len() > 500 {
        tracing::warn!(
            file_name,
            columns = columns.len(),
            "Dataset has more than 500 columns - may impact performance"
        );
    }

    let mut source = DataSource::new(SourceType::Csv, file_name, columns, rows);
    if options.keep_raw {
        source.raw_data = text.to_string();
    }
    Ok(source)
}

fn unique_columns<'a>(
    file_name: &str,
    headers: impl Iterator<Item = &'a str>,
) -> Result<Vec<String>> {
    let mut used: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut columns = Vec::new();
    for (index, header) in headers.enumerate() {
        let name = header.trim();
        if name.is_empty() {
            return Err(IngestError::EmptyColumnName {
                file_name: file_name.to_string(),
                index: index + 1,
            });
        }
        if used.insert(name.to_string()) {
            columns.push(name.to_string());
            continue;
        }
        // The suffixed name may itself be a later or earlier header.
        let suffix = next_suffix.entry(name.to_string()).or_insert(1);
        let renamed = loop {
            *suffix += 1;
            let candidate = format!("{name}_{suffix}");
            if !used.contains(&candidate) {
                break candidate;
            }
        };
        tracing::warn!(
            file_name,
            column = name,
            renamed = %renamed,
            "duplicate CSV header renamed"
        );
        used.insert(renamed.clone());
        columns.push(renamed);
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_rows_and_types_cells() {
        let text = "a,b,c\n1,x\n2,,true\n";
        let source = parse_csv("t.csv", text, &IngestOptions::default()).unwrap();
        assert_eq!(source.columns, vec!["a", "b", "c"]);
        assert_eq!(source.row_count(), 2);
        assert_eq!(source.parsed_data[0]["a"], Value::Number(1.0));
        assert_eq!(source.parsed_data[0]["c"], Value::Null);
        assert_eq!(source.parsed_data[1]["b"], Value::Null);
        assert_eq!(source.parsed_data[1]["c"], Value::Bool(true));
    }

    #[test]
    fn renames_duplicate_headers() {
        let source = parse_csv("t.csv", "id,id,id\n1,2,3\n", &IngestOptions::default()).unwrap();
        assert_eq!(source.columns, vec!["id", "id_2", "id_3"]);

        let source = parse_csv("t.csv", "a,a,a_2\n1,2,3\n", &IngestOptions::default()).unwrap();
        assert_eq!(source.columns, vec!["a", "a_2", "a_2_2"]);
        let row = &source.parsed_data[0];
        assert_eq!(row.len(), 3);
        assert_eq!(row["a_2"], Value::Number(2.0));
        assert_eq!(row["a_2_2"], Value::Number(3.0));
    }

    #[test]
    fn rejects_blank_header() {
        let err = parse_csv("t.csv", "a,,c\n1,2,3\n", &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::EmptyColumnName { index: 2, .. }));
    }

    #[test]
    fn untyped_mode_keeps_text() {
        let options = IngestOptions::default().with_infer_types(false);
        let source = parse_csv("t.csv", "n\n42\n", &options).unwrap();
        assert_eq!(source.parsed_data[0]["n"], Value::from("42"));
    }
}
