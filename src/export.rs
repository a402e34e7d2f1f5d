use crate::data::{DistributionResult, ExportRow, ExportTable, RoomAssignment};

/// One table per room, empty rooms included, rows in seating order.
pub fn to_tables(result: &DistributionResult) -> Vec<ExportTable> {
    result.assignments.iter().map(room_table).collect()
}

pub fn table_name(room_name: &str) -> String {
    format!("Room {}", room_name)
}

fn room_table(assignment: &RoomAssignment) -> ExportTable {
    ExportTable {
        name: table_name(&assignment.room.name),
        rows: assignment
            .occupants
            .iter()
            .map(|s| ExportRow {
                name: s.name.clone(),
                group: s.group.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Room, Student};

    fn assignment(name: &str, capacity: u32, occupants: Vec<Student>) -> RoomAssignment {
        RoomAssignment {
            room: Room {
                name: name.to_string(),
                capacity,
            },
            occupants,
        }
    }

    #[test]
    fn one_table_per_room_including_empty_ones() {
        let result = DistributionResult {
            assignments: vec![
                assignment(
                    "12",
                    2,
                    vec![Student::new("Ana", "6A"), Student::new("Bruno", "6B")],
                ),
                assignment("Lab", 30, vec![]),
            ],
            total_students: 2,
        };

        let tables = to_tables(&result);

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "Room 12");
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[0].rows[1].fields(), ["Bruno", "6B"]);
        assert_eq!(tables[1].name, "Room Lab");
        assert!(tables[1].rows.is_empty());
    }

    #[test]
    fn rows_serialize_name_then_group() {
        let row = ExportRow {
            name: "Ana".to_string(),
            group: "6A".to_string(),
        };

        let json = serde_json::to_string(&row).unwrap();

        assert_eq!(json, r#"{"Name":"Ana","Group":"6A"}"#);
        assert_eq!(ExportRow::HEADERS, ["Name", "Group"]);
    }
}
