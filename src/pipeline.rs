use crate::allocator::allocate;
use crate::data::{DistributionInput, DistributionResult, Room, RoomConfig, SeatSummary};
use crate::extractor::extract_students;
use crate::mixer::mix_with;
use log::{debug, info};
use rand::Rng;
use serde::Serialize;

/// How a distribution request ended. Only `Distributed` carries a result;
/// the other two are input states the operator can fix.
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionOutcome {
    Distributed(DistributionResult),
    NoStudents,
    NoValidRooms,
}

impl DistributionOutcome {
    pub fn status(&self) -> OutcomeStatus {
        match self {
            DistributionOutcome::Distributed(_) => OutcomeStatus::Distributed,
            DistributionOutcome::NoStudents => OutcomeStatus::NoStudents,
            DistributionOutcome::NoValidRooms => OutcomeStatus::NoValidRooms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeStatus {
    Distributed,
    NoStudents,
    NoValidRooms,
}

impl OutcomeStatus {
    pub fn message(self) -> &'static str {
        match self {
            OutcomeStatus::Distributed => "Students distributed.",
            OutcomeStatus::NoStudents => "No students found in the selected sheets.",
            OutcomeStatus::NoValidRooms => "Configure at least one room with a name and seats.",
        }
    }
}

/// Keeps rooms that have a name and at least one seat, in configured order.
///
/// Names are trimmed before the check and when stored, so a whitespace-only
/// name counts as unnamed and exported tables carry the trimmed name.
pub fn valid_rooms(configs: &[RoomConfig]) -> Vec<Room> {
    configs
        .iter()
        .filter_map(|config| {
            let name = config.name.trim();
            let capacity = u32::try_from(config.seats).ok().filter(|c| *c > 0)?;
            if name.is_empty() {
                return None;
            }
            Some(Room {
                name: name.to_string(),
                capacity,
            })
        })
        .collect()
}

/// Students against the seats of the valid rooms.
///
/// Unnamed or seatless rooms add nothing to `total_seats`, since they never
/// receive students; `missing_seats` therefore matches what `distribute` leaves
/// unallocated.
pub fn seat_summary(input: &DistributionInput) -> SeatSummary {
    let total_students = extract_students(&input.sheets, &input.selected_sheets).len();
    let total_seats: u64 = valid_rooms(&input.rooms)
        .iter()
        .map(|r| u64::from(r.capacity))
        .sum();

    SeatSummary {
        total_students,
        total_seats,
        missing_seats: (total_students as u64).saturating_sub(total_seats),
    }
}

/// Runs extract, mix and allocate for one request.
///
/// Mixing and allocation never run when there are no students or no valid rooms.
pub fn distribute_with<R: Rng + ?Sized>(
    input: &DistributionInput,
    rng: &mut R,
) -> DistributionOutcome {
    let students = extract_students(&input.sheets, &input.selected_sheets);
    if students.is_empty() {
        debug!("Nothing to distribute: no students extracted.");
        return DistributionOutcome::NoStudents;
    }

    let rooms = valid_rooms(&input.rooms);
    if rooms.is_empty() {
        debug!(
            "Nothing to distribute: none of the {} configured room(s) is valid.",
            input.rooms.len()
        );
        return DistributionOutcome::NoValidRooms;
    }

    info!(
        "Distributing {} student(s) into {} room(s).",
        students.len(),
        rooms.len()
    );
    let mixed = mix_with(&students, rng);
    DistributionOutcome::Distributed(allocate(&mixed, &rooms))
}

pub fn distribute(input: &DistributionInput) -> DistributionOutcome {
    distribute_with(input, &mut rand::rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Cell, Sheet, Workbook};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn room(name: &str, seats: i64) -> RoomConfig {
        RoomConfig {
            name: name.to_string(),
            seats,
        }
    }

    /// A sheet with a "PROVA" column holding `students` as (name, group).
    fn class_sheet(name: &str, students: &[(&str, &str)]) -> Sheet {
        let mut rows = vec![
            vec![Cell::Empty, text("NOME"), text("PROVA P6")],
            vec![],
            vec![],
        ];
        rows.extend(
            students
                .iter()
                .map(|(n, g)| vec![Cell::Empty, text(n), text(g)]),
        );
        Sheet {
            name: name.to_string(),
            rows,
        }
    }

    fn input(sheets: Vec<Sheet>, selected: &[&str], rooms: Vec<RoomConfig>) -> DistributionInput {
        DistributionInput {
            sheets: Workbook::new(sheets),
            selected_sheets: selected.iter().map(|s| s.to_string()).collect(),
            rooms,
        }
    }

    #[test]
    fn drops_unnamed_and_seatless_rooms() {
        let rooms = valid_rooms(&[
            room("", 10),
            room("  ", 10),
            room("A", 0),
            room("B", -3),
            room(" C ", 12),
            room("D", 1),
        ]);

        assert_eq!(
            rooms,
            vec![
                Room {
                    name: "C".to_string(),
                    capacity: 12
                },
                Room {
                    name: "D".to_string(),
                    capacity: 1
                },
            ]
        );
    }

    #[test]
    fn five_students_fill_three_then_two() {
        let sheet = class_sheet(
            "S",
            &[("s1", "X"), ("s2", "X"), ("s3", "X"), ("s4", "Y"), ("s5", "Y")],
        );
        let input = input(vec![sheet], &["S"], vec![room("R1", 3), room("R2", 3)]);

        let DistributionOutcome::Distributed(result) =
            distribute_with(&input, &mut StdRng::seed_from_u64(3))
        else {
            panic!("expected a distribution");
        };

        assert_eq!(result.total_students, 5);
        assert_eq!(result.assignments[0].room.name, "R1");
        assert_eq!(result.assignments[0].occupants.len(), 3);
        assert_eq!(result.assignments[1].occupants.len(), 2);
        assert_eq!(result.unallocated(), 0);

        let mut seated: Vec<String> = result
            .assignments
            .iter()
            .flat_map(|a| a.occupants.iter().map(|s| s.name.clone()))
            .collect();
        seated.sort();
        assert_eq!(seated, vec!["s1", "s2", "s3", "s4", "s5"]);
    }

    #[test]
    fn ten_students_four_seats_leaves_six() {
        let names: Vec<String> = (1..=10).map(|i| format!("s{i}")).collect();
        let students: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "G")).collect();
        let input = input(
            vec![class_sheet("S", &students)],
            &["S"],
            vec![room("Only", 4)],
        );

        let DistributionOutcome::Distributed(result) = distribute(&input) else {
            panic!("expected a distribution");
        };

        assert_eq!(result.assignments[0].occupants.len(), 4);
        assert_eq!(result.unallocated(), 6);
        assert_eq!(seat_summary(&input).missing_seats, 6);
    }

    #[test]
    fn empty_selection_stops_before_mixing() {
        let input = input(
            vec![class_sheet("S", &[("s1", "X")])],
            &[],
            vec![room("R1", 3)],
        );

        assert_eq!(distribute(&input), DistributionOutcome::NoStudents);
        assert_eq!(distribute(&input).status(), OutcomeStatus::NoStudents);
    }

    #[test]
    fn no_valid_room_is_a_status_not_an_error() {
        let input = input(
            vec![class_sheet("S", &[("s1", "X")])],
            &["S"],
            vec![room("", 3), room("R2", 0)],
        );

        assert_eq!(distribute(&input), DistributionOutcome::NoValidRooms);
    }

    #[test]
    fn seat_summary_counts_only_valid_rooms() {
        let input = input(
            vec![
                class_sheet("A", &[("a1", "1"), ("a2", "1")]),
                class_sheet("B", &[("b1", "2")]),
            ],
            &["A", "B"],
            vec![room("R1", 2), room("", 50), room("R3", 5)],
        );

        let summary = seat_summary(&input);

        assert_eq!(summary.total_students, 3);
        assert_eq!(summary.total_seats, 7);
        assert_eq!(summary.missing_seats, 0);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let sheet = class_sheet(
            "S",
            &[("a", "1"), ("b", "1"), ("c", "2"), ("d", "2"), ("e", "3")],
        );
        let input = input(vec![sheet], &["S"], vec![room("R", 2), room("Q", 2)]);

        let first = distribute_with(&input, &mut StdRng::seed_from_u64(11));
        let second = distribute_with(&input, &mut StdRng::seed_from_u64(11));

        assert_eq!(first, second);
        let DistributionOutcome::Distributed(result) = first else {
            panic!("expected a distribution");
        };
        assert_eq!(result.assignments[0].occupants.len(), 2);
        assert_eq!(result.unallocated(), 1);
    }
}
