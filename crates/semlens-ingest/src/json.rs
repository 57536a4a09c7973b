//! JSON record parsing into a data source.

use serde_json::{Map, Value as Json};

use semlens_model::{DataSource, Row, SourceType, Value};

use crate::error::{IngestError, Result};
use crate::options::IngestOptions;

/// Parse a JSON array of objects, or an object whose `data` field is one.
///
/// Columns are the union of keys in first-seen order. Nested arrays and
/// objects are kept as their JSON text.
pub fn parse_json(file_name: &str, text: &str, options: &IngestOptions) -> Result<DataSource> {
    let document: Json = serde_json::from_str(text).map_err(|source| IngestError::JsonParse {
        file_name: file_name.to_string(),
        source,
    })?;
    let shape_error = |reason: &str| IngestError::JsonShape {
        file_name: file_name.to_string(),
        reason: reason.to_string(),
    };

    let records = match document {
        Json::Array(items) => items,
        Json::Object(mut object) => match object.remove("data") {
            Some(Json::Array(items)) => items,
            _ => return Err(shape_error("expected an array or an object with a `data` array")),
        },
        _ => return Err(shape_error("expected an array of records")),
    };

    let mut columns: Vec<String> = Vec::new();
    let mut objects: Vec<Map<String, Json>> = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let Json::Object(object) = record else {
            return Err(shape_error(&format!("record {} is not an object", index + 1)));
        };
        for key in object.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
        objects.push(object);
    }

    let rows: Vec<Row> = objects
        .into_iter()
        .map(|mut object| {
            columns
                .iter()
                .map(|column| {
                    let value = object.remove(column).map_or(Value::Null, scalar);
                    (column.clone(), value)
                })
                .collect()
        })
        .collect();

    let mut source = DataSource::new(SourceType::Json, file_name, columns, rows);
    if options.keep_raw {
        source.raw_data = text.to_string();
    }
    Ok(source)
}

fn scalar(value: Json) -> Value {
    match value {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
        Json::String(s) => Value::String(s),
        nested @ (Json::Array(_) | Json::Object(_)) => Value::String(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unions_keys_in_first_seen_order() {
        let text = r#"[{"b": 1, "a": "x"}, {"c": true, "a": null}]"#;
        let source = parse_json("t.json", text, &IngestOptions::default()).unwrap();
        assert_eq!(source.columns.len(), 3);
        assert!(source.has_column("c"));
        assert_eq!(source.parsed_data[0]["c"], Value::Null);
        assert_eq!(source.parsed_data[1]["c"], Value::Bool(true));
    }

    #[test]
    fn accepts_data_wrapper_and_stringifies_nested() {
        let text = r#"{"data": [{"tags": [1, 2]}]}"#;
        let source = parse_json("t.json", text, &IngestOptions::default()).unwrap();
        assert_eq!(source.parsed_data[0]["tags"], Value::from("[1,2]"));
    }

    #[test]
    fn rejects_non_record_layouts() {
        for text in ["42", r#"{"rows": []}"#, "[1, 2]"] {
            let err = parse_json("t.json", text, &IngestOptions::default()).unwrap_err();
            assert!(matches!(err, IngestError::JsonShape { .. }), "{text}");
        }
    }
}
