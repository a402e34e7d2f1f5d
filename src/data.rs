use serde::{Deserialize, Serialize};
use std::fmt;

// Type aliases for clarity
pub type SheetName = String;
pub type Grid = Vec<Vec<Cell>>;

/// A single decoded spreadsheet value.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    /// Text content, only for text cells.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Int(i) => write!(f, "{}", i),
            // f64 Display already drops the fraction of integral values (6.0 -> "6")
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// One decoded sheet: its tab name and its rows, anchored at A1.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Sheet {
    pub name: SheetName,
    pub rows: Grid,
}

/// Sheets in workbook tab order.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }
}

/// A student read from a sheet. Identity is positional; duplicates are distinct people.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Student {
    pub name: String,
    pub group: String,
}

impl Student {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }
}

/// Room settings as the operator typed them, before validation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoomConfig {
    pub name: String,
    pub seats: i64,
}

/// A validated physical room: non-empty name and at least one seat.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Room {
    pub name: String,
    pub capacity: u32,
}

/// The students seated in one room, in the order they were consumed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoomAssignment {
    pub room: Room,
    pub occupants: Vec<Student>,
}

/// The output of a distribution run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionResult {
    pub assignments: Vec<RoomAssignment>,
    pub total_students: usize,
}

impl DistributionResult {
    pub fn allocated(&self) -> usize {
        self.assignments.iter().map(|a| a.occupants.len()).sum()
    }

    pub fn unallocated(&self) -> usize {
        self.total_students.saturating_sub(self.allocated())
    }

    pub fn summary(&self) -> DistributionSummary {
        DistributionSummary {
            total_students: self.total_students,
            rooms: self.assignments.len(),
            allocated: self.allocated(),
            unallocated: self.unallocated(),
        }
    }
}

/// Headline numbers shown next to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    pub total_students: usize,
    pub rooms: usize,
    pub allocated: usize,
    pub unallocated: usize,
}

impl fmt::Display for DistributionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} students in {} room(s), {} allocated, {} unallocated",
            self.total_students, self.rooms, self.allocated, self.unallocated
        )
    }
}

/// Students versus seats, before any distribution runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSummary {
    pub total_students: usize,
    pub total_seats: u64,
    pub missing_seats: u64,
}

/// One exported row. Field order is the column order of the exported sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Group")]
    pub group: String,
}

impl ExportRow {
    pub const HEADERS: [&'static str; 2] = ["Name", "Group"];

    pub fn fields(&self) -> [&str; 2] {
        [self.name.as_str(), self.group.as_str()]
    }
}

/// A named table handed to the workbook encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTable {
    pub name: String,
    pub rows: Vec<ExportRow>,
}

/// What the operator submits: decoded sheets, the selection and the rooms.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionInput {
    pub sheets: Workbook,
    #[serde(default)]
    pub selected_sheets: Vec<SheetName>,
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
}

/// A successful run, as returned to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionOutput {
    pub result: DistributionResult,
    pub summary: DistributionSummary,
}
