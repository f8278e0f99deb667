//! Uniform row-set parsing for CSV/TSV, JSON, and XLSX files

use crate::error::TabularError;
use crate::xlsx;
use serde_json::Value;
use std::collections::HashMap;

/// A parsed table: ordered column names plus stringified rows
///
/// Every cell is stringified at parse time. A column absent from a row's map
/// is treated as a null cell downstream.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    /// Column names in header order
    pub columns: Vec<String>,

    /// Row cells keyed by column name
    pub rows: Vec<HashMap<String, String>>,
}

impl RowSet {
    /// Number of rows in the set
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the set has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse raw bytes into a [`RowSet`], dispatching on the filename extension
///
/// - `.csv` / `.tsv`: delimiter-aware parsing with the header row as keys
/// - `.json`: a top-level array, or an object with a `rows` or `data` array
/// - `.xlsx` / `.xls`: first worksheet, sheet-to-row conversion
pub fn parse_rows(bytes: &[u8], filename: &str) -> Result<RowSet, TabularError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => parse_delimited(bytes, b','),
        "tsv" => parse_delimited(bytes, b'\t'),
        "json" => parse_json(bytes),
        "xlsx" | "xls" => xlsx::read_workbook(bytes),
        other => Err(TabularError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a delimiter-separated file with the first record as the header
fn parse_delimited(bytes: &[u8], delimiter: u8) -> Result<RowSet, TabularError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if columns.iter().all(|c| c.is_empty()) {
        return Err(TabularError::InvalidStructure(
            "header row is empty".to_string(),
        ));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            if let Some(cell) = record.get(i) {
                row.insert(column.clone(), cell.to_string());
            }
        }
        rows.push(row);
    }

    Ok(RowSet { columns, rows })
}

/// Parse a JSON file holding an array of row objects
///
/// Accepts either a top-level array or an object carrying the array under a
/// `rows` or `data` field.
fn parse_json(bytes: &[u8]) -> Result<RowSet, TabularError> {
    let value: Value = serde_json::from_slice(bytes)?;

    let items = match &value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => map
            .get("rows")
            .or_else(|| map.get("data"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                TabularError::InvalidStructure(
                    "expected a top-level array or a 'rows'/'data' field".to_string(),
                )
            })?,
        _ => {
            return Err(TabularError::InvalidStructure(
                "expected a JSON array of row objects".to_string(),
            ))
        }
    };

    let mut columns = Vec::new();
    let mut rows = Vec::with_capacity(items.len());

    for item in items {
        let object = item.as_object().ok_or_else(|| {
            TabularError::InvalidStructure("row is not a JSON object".to_string())
        })?;

        // Header order comes from the first row's keys
        if columns.is_empty() {
            columns = object.keys().cloned().collect();
        }

        let mut row = HashMap::with_capacity(object.len());
        for (key, cell) in object {
            row.insert(key.clone(), stringify_cell(cell));
        }
        rows.push(row);
    }

    Ok(RowSet { columns, rows })
}

/// Stringify a JSON cell value; nulls become empty strings
fn stringify_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_with_header() {
        let data = b"name,amount\nwidget,100\ngadget,250\n";
        let rows = parse_rows(data, "items.csv").unwrap();

        assert_eq!(rows.columns, vec!["name", "amount"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows[0]["amount"], "100");
        assert_eq!(rows.rows[1]["name"], "gadget");
    }

    #[test]
    fn test_parse_tsv() {
        let data = b"a\tb\n1\t2\n";
        let rows = parse_rows(data, "table.tsv").unwrap();
        assert_eq!(rows.columns, vec!["a", "b"]);
        assert_eq!(rows.rows[0]["b"], "2");
    }

    #[test]
    fn test_csv_short_record_leaves_cell_absent() {
        let data = b"a,b,c\n1,2\n";
        let rows = parse_rows(data, "short.csv").unwrap();
        assert_eq!(rows.rows[0].get("c"), None);
    }

    #[test]
    fn test_parse_json_top_level_array() {
        let data = br#"[{"name":"widget","amount":100},{"name":"gadget","amount":null}]"#;
        let rows = parse_rows(data, "items.json").unwrap();

        assert_eq!(rows.columns, vec!["name", "amount"]);
        assert_eq!(rows.rows[0]["amount"], "100");
        assert_eq!(rows.rows[1]["amount"], "");
    }

    #[test]
    fn test_parse_json_rows_field() {
        let data = br#"{"rows":[{"x":1}],"meta":"ignored"}"#;
        let rows = parse_rows(data, "wrapped.json").unwrap();
        assert_eq!(rows.columns, vec!["x"]);
        assert_eq!(rows.rows[0]["x"], "1");
    }

    #[test]
    fn test_parse_json_data_field() {
        let data = br#"{"data":[{"x":"a"}]}"#;
        let rows = parse_rows(data, "wrapped.json").unwrap();
        assert_eq!(rows.rows[0]["x"], "a");
    }

    #[test]
    fn test_parse_json_scalar_is_invalid() {
        let data = br#""just a string""#;
        assert!(matches!(
            parse_rows(data, "bad.json"),
            Err(TabularError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_parse_json_malformed_is_error() {
        let data = b"{not json";
        assert!(matches!(
            parse_rows(data, "bad.json"),
            Err(TabularError::Json(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            parse_rows(b"", "notes.txt"),
            Err(TabularError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_empty_csv_body_gives_empty_rows() {
        let data = b"a,b\n";
        let rows = parse_rows(data, "empty.csv").unwrap();
        assert!(rows.is_empty());
        assert_eq!(rows.columns.len(), 2);
    }
}
