use crate::data::{DistributionResult, Room, RoomAssignment, Student};
use log::{info, trace, warn};

/// Fills rooms strictly in order, each with the next `capacity` students.
///
/// Rooms left over once the students run out get no occupants. Students past
/// the total capacity stay unallocated; see [`DistributionResult::unallocated`].
pub fn allocate(students: &[Student], rooms: &[Room]) -> DistributionResult {
    let mut remaining = students;

    let assignments: Vec<RoomAssignment> = rooms
        .iter()
        .map(|room| {
            let take = remaining.len().min(room.capacity as usize);
            let (seated, rest) = remaining.split_at(take);
            remaining = rest;
            trace!("Room '{}': {}/{} seats filled.", room.name, take, room.capacity);
            RoomAssignment {
                room: room.clone(),
                occupants: seated.to_vec(),
            }
        })
        .collect();

    let result = DistributionResult {
        assignments,
        total_students: students.len(),
    };

    info!("{}", result.summary());
    if result.unallocated() > 0 {
        warn!(
            "{} student(s) could not be seated: not enough seats.",
            result.unallocated()
        );
    }

    result
}
