use crate::data::{Cell, Sheet, SheetName, Student, Workbook};
use itertools::Itertools;
use log::{debug, info};

/// Header marker labelling the class column.
const GROUP_MARKER: &str = "PROVA";
/// Student names always sit in column B.
const NAME_COLUMN: usize = 1;
/// Rows 0-2 are header and metadata.
const FIRST_DATA_ROW: usize = 3;

/// Reads students from the selected sheets, in selection order.
///
/// Unknown sheet names and sheets shorter than four rows are skipped. Rows
/// without a usable name (or group, when the sheet has a group column) are
/// dropped without error.
pub fn extract_students(workbook: &Workbook, selected: &[SheetName]) -> Vec<Student> {
    let mut students = Vec::new();

    for sheet_name in selected.iter().unique() {
        let Some(sheet) = workbook.sheet(sheet_name) else {
            debug!("Sheet '{}' is not in the workbook, skipping.", sheet_name);
            continue;
        };
        let before = students.len();
        extract_sheet(sheet, &mut students);
        debug!(
            "Sheet '{}' yielded {} student(s).",
            sheet_name,
            students.len() - before
        );
    }

    info!(
        "Extracted {} student(s) from {} selected sheet(s).",
        students.len(),
        selected.len()
    );
    students
}

/// Number of students `extract_students` would return.
pub fn count_students(workbook: &Workbook, selected: &[SheetName]) -> usize {
    extract_students(workbook, selected).len()
}

fn extract_sheet(sheet: &Sheet, out: &mut Vec<Student>) {
    if sheet.rows.len() <= FIRST_DATA_ROW {
        debug!(
            "Sheet '{}' has only {} row(s), no data rows to read.",
            sheet.name,
            sheet.rows.len()
        );
        return;
    }

    let group_column = sheet.rows.first().and_then(|header| find_group_column(header));
    let data_rows = sheet.rows.iter().skip(FIRST_DATA_ROW);

    match group_column {
        None => {
            debug!(
                "Sheet '{}' has no '{}' column, using the sheet name as group.",
                sheet.name, GROUP_MARKER
            );
            out.extend(
                data_rows
                    .filter_map(|row| name_of(row))
                    .map(|name| Student::new(name, sheet.name.as_str())),
            );
        }
        Some(col) => {
            debug!("Sheet '{}' reads groups from column {}.", sheet.name, col);
            out.extend(data_rows.filter_map(|row| {
                let name = name_of(row)?;
                let group = group_of(row.get(col)?)?;
                Some(Student::new(name, group))
            }));
        }
    }
}

/// First header text cell containing the marker, case-insensitively.
fn find_group_column(header: &[Cell]) -> Option<usize> {
    header.iter().position(|cell| {
        cell.as_text()
            .is_some_and(|text| text.to_uppercase().contains(GROUP_MARKER))
    })
}

/// The trimmed name in column B, when it is non-empty text.
fn name_of(row: &[Cell]) -> Option<&str> {
    let name = row.get(NAME_COLUMN)?.as_text()?.trim();
    (!name.is_empty()).then_some(name)
}

/// Any non-empty cell, stringified and trimmed, so numeric class labels count.
/// Zero, NaN and `false` cells count as blank; the text "0" is still a group.
fn group_of(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Empty | Cell::Int(0) | Cell::Bool(false) => return None,
        Cell::Float(x) if *x == 0.0 || x.is_nan() => return None,
        _ => {}
    }
    let group = cell.to_string();
    let group = group.trim();
    (!group.is_empty()).then(|| group.to_string())
}
