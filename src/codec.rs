//! Workbook bytes in and out.
//!
//! Decoding goes through calamine, which sniffs xlsx, xlsm, xlsb, xls and ods.
//! Encoding writes a minimal xlsx package by hand: one worksheet per export
//! table, inline strings only, so no shared string table or styles part.

use crate::data::{Cell, ExportRow, ExportTable, Grid, Sheet, Workbook};
use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use log::{debug, warn};
use quick_xml::escape::escape;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const EXPORT_FILE_NAME: &str = "Distribution.xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Excel's hard limit on sheet tab names.
const MAX_SHEET_NAME_CHARS: usize = 31;
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Unreadable workbook: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook has no readable sheets")]
    NoSheets,
}

/// Decodes workbook bytes into sheets of cells, in tab order.
///
/// Sheets that fail to read are skipped with a warning. Every grid is anchored
/// at A1, even when the sheet's used range starts further in: calamine ranges
/// begin at the first used cell, and the extractor's column B and row 3 are
/// sheet-absolute positions, so leading empty rows and columns are padded back.
pub fn decode(bytes: &[u8]) -> Result<Workbook, CodecError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let rows = to_grid(&range);
                debug!("Decoded sheet '{}' with {} row(s).", name, rows.len());
                sheets.push(Sheet { name, rows });
            }
            Err(e) => warn!("Skipping sheet '{}': {}", name, e),
        }
    }

    if sheets.is_empty() {
        return Err(CodecError::NoSheets);
    }
    Ok(Workbook::new(sheets))
}

fn to_grid(range: &Range<Data>) -> Grid {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };

    let mut grid: Grid = vec![Vec::new(); first_row as usize];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; first_col as usize];
        cells.extend(row.iter().map(to_cell));
        grid.push(cells);
    }
    grid
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Writes the tables as an xlsx workbook, one sheet per table.
///
/// Each sheet starts with a `Name | Group` header row. Sheet names are made
/// Excel-safe and unique.
pub fn encode(tables: &[ExportTable]) -> Result<Vec<u8>, CodecError> {
    let names = sheet_names(tables.iter().map(|t| t.name.as_str()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(content_types_xml(tables.len()).as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(PACKAGE_RELS_XML.as_bytes())?;

    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(workbook_xml(&names).as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(workbook_rels_xml(tables.len()).as_bytes())?;

    for (i, table) in tables.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)?;
        zip.write_all(worksheet_xml(&table.rows).as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Excel-safe, case-insensitively unique tab names, in input order.
pub fn sheet_names<'a>(requested: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for raw in requested {
        let cleaned: String = raw
            .trim()
            .chars()
            .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
            .collect();
        let base = if cleaned.is_empty() { "Sheet".to_string() } else { cleaned };

        let mut candidate = truncate_chars(&base, MAX_SHEET_NAME_CHARS);
        let mut n = 2;
        while taken.contains(&candidate.to_lowercase()) {
            let suffix = format!(" ({})", n);
            let room = MAX_SHEET_NAME_CHARS.saturating_sub(suffix.chars().count());
            candidate = format!("{}{}", truncate_chars(&base, room), suffix);
            n += 1;
        }
        taken.insert(candidate.to_lowercase());
        out.push(candidate);
    }
    out
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Zero-based column index to its letter form (0 -> A, 26 -> AA).
fn col_letter(mut col: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'A' + (col % 26) as u8));
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters.iter().rev().collect()
}

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const PACKAGE_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#
);

fn content_types_xml(sheet_count: usize) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    out.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    out.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    out.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    for i in 1..=sheet_count {
        out.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            i
        ));
    }
    out.push_str("</Types>");
    out
}

fn workbook_xml(names: &[String]) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#);
    out.push_str(r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
    out.push_str("<sheets>");
    for (i, name) in names.iter().enumerate() {
        out.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(name.as_str()),
            i + 1,
            i + 1
        ));
    }
    out.push_str("</sheets></workbook>");
    out
}

fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for i in 1..=sheet_count {
        out.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i, i
        ));
    }
    out.push_str("</Relationships>");
    out
}

fn worksheet_xml(rows: &[ExportRow]) -> String {
    let mut out = String::with_capacity(256 + rows.len() * 128);
    out.push_str(XML_DECL);
    out.push_str(r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#);
    out.push_str("<sheetData>");
    push_row(&mut out, 1, &ExportRow::HEADERS);
    for (i, row) in rows.iter().enumerate() {
        push_row(&mut out, i + 2, &row.fields());
    }
    out.push_str("</sheetData></worksheet>");
    out
}

fn push_row(out: &mut String, row_number: usize, values: &[&str]) {
    out.push_str(&format!(r#"<row r="{}">"#, row_number));
    for (col, value) in values.iter().enumerate() {
        out.push_str(&format!(
            r#"<c r="{}{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            col_letter(col),
            row_number,
            escape(*value)
        ));
    }
    out.push_str("</row>");
}
