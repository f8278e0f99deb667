//! Minimal XLSX sheet reader
//!
//! Reads the first worksheet of an XLSX container into a [`RowSet`]. Only the
//! pieces the profiler needs are implemented: shared strings, inline strings,
//! and raw cell values. Styles, formulas, and additional sheets are ignored.

use crate::error::TabularError;
use crate::rows::RowSet;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read};

/// Read the first worksheet of an XLSX file into a row set
///
/// The first sheet row is used as the header; later rows become data rows
/// keyed by header name.
pub fn read_workbook(bytes: &[u8]) -> Result<RowSet, TabularError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| TabularError::Spreadsheet(format!("not a valid XLSX container: {}", e)))?;

    let shared_strings = match read_archive_file(&mut archive, "xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let sheet_path = first_sheet_path(&mut archive)?;
    let sheet_xml = read_archive_file(&mut archive, &sheet_path)?
        .ok_or_else(|| TabularError::Spreadsheet(format!("missing worksheet {}", sheet_path)))?;

    let raw_rows = parse_sheet(&sheet_xml, &shared_strings)?;
    rows_from_grid(raw_rows)
}

/// Find the first worksheet entry in the archive
///
/// Prefers the conventional `sheet1.xml`; otherwise takes the
/// lexicographically first worksheet entry.
fn first_sheet_path(archive: &mut zip::ZipArchive<Cursor<&[u8]>>) -> Result<String, TabularError> {
    let mut candidates: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with("xl/worksheets/") && name.ends_with(".xml"))
        .map(|name| name.to_string())
        .collect();

    if candidates.iter().any(|n| n == "xl/worksheets/sheet1.xml") {
        return Ok("xl/worksheets/sheet1.xml".to_string());
    }

    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| TabularError::Spreadsheet("workbook has no worksheets".to_string()))
}

/// Read one file out of the archive as UTF-8 text, if present
fn read_archive_file(
    archive: &mut zip::ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Option<String>, TabularError> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .map_err(|e| TabularError::Spreadsheet(format!("failed to read {}: {}", name, e)))?;
            Ok(Some(contents))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(TabularError::Spreadsheet(format!(
            "failed to open {}: {}",
            name, e
        ))),
    }
}

/// Parse `xl/sharedStrings.xml` into the shared string table
fn parse_shared_strings(xml: &str) -> Result<Vec<String>, TabularError> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => in_t = true,
                _ => {}
            },
            Ok(Event::Text(ref t)) if in_t => {
                let text = t
                    .unescape()
                    .map_err(|e| TabularError::Spreadsheet(format!("shared strings: {}", e)))?;
                current.push_str(&text);
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_t = false,
                b"si" => {
                    in_si = false;
                    strings.push(current.clone());
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(TabularError::Spreadsheet(format!("shared strings: {}", e)));
            }
            _ => {}
        }
    }

    Ok(strings)
}

/// Parse a worksheet XML body into a sparse grid of (column index, value)
fn parse_sheet(
    xml: &str,
    shared_strings: &[String],
) -> Result<Vec<Vec<(usize, String)>>, TabularError> {
    let mut reader = Reader::from_str(xml);
    let mut grid: Vec<Vec<(usize, String)>> = Vec::new();
    let mut current_row: Vec<(usize, String)> = Vec::new();
    let mut cell_column: Option<usize> = None;
    let mut cell_type = String::new();
    let mut in_value = false;
    let mut in_inline_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"row" => current_row.clear(),
                b"c" => {
                    cell_column = None;
                    cell_type.clear();
                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value).to_string();
                        match attr.key.local_name().as_ref() {
                            b"r" => cell_column = Some(column_index(&value)),
                            b"t" => cell_type = value,
                            _ => {}
                        }
                    }
                    // Cells without a reference fall after the previous one
                    if cell_column.is_none() {
                        cell_column = Some(
                            current_row.last().map(|(i, _)| i + 1).unwrap_or(0),
                        );
                    }
                }
                b"v" => in_value = true,
                b"t" if cell_type == "inlineStr" => in_inline_text = true,
                _ => {}
            },
            Ok(Event::Text(ref t)) if in_value || in_inline_text => {
                let text = t
                    .unescape()
                    .map_err(|e| TabularError::Spreadsheet(format!("worksheet: {}", e)))?
                    .to_string();
                let column = cell_column.unwrap_or(0);
                let value = if in_value && cell_type == "s" {
                    let index: usize = text.trim().parse().map_err(|_| {
                        TabularError::Spreadsheet(format!("bad shared string index: {}", text))
                    })?;
                    shared_strings.get(index).cloned().unwrap_or_default()
                } else {
                    text
                };
                current_row.push((column, value));
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"v" => in_value = false,
                b"t" => in_inline_text = false,
                b"row" => grid.push(std::mem::take(&mut current_row)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(TabularError::Spreadsheet(format!("worksheet: {}", e))),
            _ => {}
        }
    }

    Ok(grid)
}

/// Convert the sparse grid into a header-keyed row set
fn rows_from_grid(grid: Vec<Vec<(usize, String)>>) -> Result<RowSet, TabularError> {
    let mut iter = grid.into_iter();
    let header = match iter.next() {
        Some(header) => header,
        None => return Ok(RowSet::default()),
    };

    let width = header.iter().map(|(i, _)| i + 1).max().unwrap_or(0);
    let mut columns = vec![String::new(); width];
    for (index, name) in header {
        columns[index] = name.trim().to_string();
    }
    for (index, name) in columns.iter_mut().enumerate() {
        if name.is_empty() {
            *name = format!("column_{}", index + 1);
        }
    }

    let mut rows = Vec::new();
    for raw in iter {
        let mut row = HashMap::with_capacity(raw.len());
        for (index, value) in raw {
            if let Some(column) = columns.get(index) {
                row.insert(column.clone(), value);
            }
        }
        rows.push(row);
    }

    Ok(RowSet { columns, rows })
}

/// Convert a cell reference like `B2` to a zero-based column index
fn column_index(cell_ref: &str) -> usize {
    let mut index = 0usize;
    for c in cell_ref.chars().take_while(|c| c.is_ascii_alphabetic()) {
        index = index * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    index.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="3">
<si><t>name</t></si><si><t>amount</t></si><si><t>widget</t></si>
</sst>"#;

    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
<row r="2"><c r="A2" t="s"><v>2</v></c><c r="B2"><v>100</v></c></row>
<row r="3"><c r="A3" t="inlineStr"><is><t>gadget</t></is></c><c r="B3"><v>250</v></c></row>
</sheetData>
</worksheet>"#;

    fn build_xlsx() -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            let options = SimpleFileOptions::default();
            writer
                .start_file("xl/sharedStrings.xml", options)
                .unwrap();
            writer.write_all(SHARED_STRINGS.as_bytes()).unwrap();
            writer
                .start_file("xl/worksheets/sheet1.xml", options)
                .unwrap();
            writer.write_all(SHEET.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_read_workbook() {
        let bytes = build_xlsx();
        let rows = read_workbook(&bytes).unwrap();

        assert_eq!(rows.columns, vec!["name", "amount"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows[0]["name"], "widget");
        assert_eq!(rows.rows[0]["amount"], "100");
        assert_eq!(rows.rows[1]["name"], "gadget");
        assert_eq!(rows.rows[1]["amount"], "250");
    }

    #[test]
    fn test_not_a_zip_is_error() {
        assert!(matches!(
            read_workbook(b"definitely not a zip"),
            Err(TabularError::Spreadsheet(_))
        ));
    }

    #[test]
    fn test_missing_worksheet_is_error() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file("xl/other.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"<x/>").unwrap();
            writer.finish().unwrap();
        }
        let bytes = buffer.into_inner();
        assert!(matches!(
            read_workbook(&bytes),
            Err(TabularError::Spreadsheet(_))
        ));
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A1"), 0);
        assert_eq!(column_index("B7"), 1);
        assert_eq!(column_index("Z3"), 25);
        assert_eq!(column_index("AA1"), 26);
    }
}
