use crate::data::Student;
use log::trace;
use rand::Rng;
use std::collections::{HashMap, VecDeque};

/// Mixes students with the thread-local system RNG.
pub fn mix(students: &[Student]) -> Vec<Student> {
    mix_with(students, &mut rand::rng())
}

/// Round-robins students across their groups, then shuffles the result with `rng`.
///
/// The output is always a permutation of the input.
pub fn mix_with<R: Rng + ?Sized>(students: &[Student], rng: &mut R) -> Vec<Student> {
    let mut mixed = interleave(students);
    shuffle(&mut mixed, rng);
    mixed
}

/// Takes one student from each group per round, with groups in the order they
/// first appear. Groups that run out drop from the rotation; the rest keep going.
pub fn interleave(students: &[Student]) -> Vec<Student> {
    let mut queues: Vec<VecDeque<&Student>> = Vec::new();
    let mut index_of: HashMap<&str, usize> = HashMap::new();

    for student in students {
        let idx = *index_of.entry(student.group.as_str()).or_insert_with(|| {
            queues.push(VecDeque::new());
            queues.len() - 1
        });
        queues[idx].push_back(student);
    }
    trace!(
        "Interleaving {} student(s) across {} group(s).",
        students.len(),
        queues.len()
    );

    let mut out = Vec::with_capacity(students.len());
    while out.len() < students.len() {
        for queue in queues.iter_mut() {
            if let Some(student) = queue.pop_front() {
                out.push(student.clone());
            }
        }
    }
    out
}

/// Fisher-Yates: for each index from the end down to 1, swap with a uniform index in `[0, i]`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
