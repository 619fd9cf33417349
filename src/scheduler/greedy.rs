//! Randomized first-fit timetable heuristic.
//!
//! # Algorithm
//!
//! 1. Shuffle the 40 weekly slots once with the supplied RNG.
//! 2. For each course in input order, walk the shuffled slots and place
//!    a session wherever the faculty member is available and free, using
//!    the first eligible room not yet taken at that slot.
//! 3. Stop a course once it has its sessions or the slots run out.
//! 4. Sort the entries by day, then time.
//!
//! Courses that cannot be fully placed keep the sessions they got and are
//! reported as unscheduled; nothing fails. The shuffle diversifies which
//! slots fill first across runs; pass a seeded RNG for reproducible output.
//!
//! # Complexity
//! O(c · s · r) where c = courses, s = 40 slots, r = eligible rooms.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use super::{SchedulerOutput, SchedulingContext};
use crate::models::{Course, Schedule, Slot, UnscheduledCourse};

/// Randomized first-fit scheduler.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_timetable::models::{Course, Faculty, Room};
/// use u_timetable::scheduler::{GreedyScheduler, SchedulingContext};
///
/// let courses = vec![Course::new("C1").with_credits(2).with_faculty("F1")];
/// let faculty = vec![Faculty::new("F1")];
/// let rooms = vec![Room::classroom("R1", 30)];
/// let ctx = SchedulingContext::new(&faculty, &rooms, &[]);
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let selected: Vec<&Course> = courses.iter().collect();
/// let output = GreedyScheduler::new().schedule(&selected, &ctx, &mut rng);
/// assert_eq!(output.schedule.len(), 2);
/// assert!(output.unscheduled.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyScheduler;

impl GreedyScheduler {
    /// Creates a scheduler.
    pub fn new() -> Self {
        Self
    }

    /// Places sessions for the given courses.
    pub fn schedule<R: Rng + ?Sized>(
        &self,
        courses: &[&Course],
        ctx: &SchedulingContext<'_>,
        rng: &mut R,
    ) -> SchedulerOutput {
        let mut schedule = Schedule::new();
        let mut unscheduled = Vec::new();
        let mut used_rooms: HashSet<(Slot, &str)> = HashSet::new();
        let mut faculty_busy: HashSet<(&str, Slot)> = HashSet::new();

        let mut slot_order = Slot::all();
        slot_order.shuffle(rng);

        for &course in courses {
            let needed = course.sessions_needed();
            let faculty_id = course.faculty_id.as_deref();
            let rooms = ctx.eligible_rooms(course);

            let mut placed = 0;
            for &slot in &slot_order {
                if placed >= needed {
                    break;
                }
                if !ctx.faculty_available(faculty_id, slot) {
                    continue;
                }
                if faculty_id.is_some_and(|f| faculty_busy.contains(&(f, slot))) {
                    continue;
                }

                let Some(room) = rooms
                    .iter()
                    .copied()
                    .find(|r| !used_rooms.contains(&(slot, r.id.as_str())))
                else {
                    continue;
                };

                used_rooms.insert((slot, room.id.as_str()));
                if let Some(f) = faculty_id {
                    faculty_busy.insert((f, slot));
                }
                schedule.add_entry(ctx.make_entry(course, room, slot));
                placed += 1;
            }

            if placed < needed {
                warn!(
                    course = %course.id,
                    placed,
                    needed,
                    "course only partially scheduled"
                );
                unscheduled.push(UnscheduledCourse {
                    course_id: course.id.clone(),
                    course_name: course.name.clone(),
                    sessions_required: needed,
                    sessions_missing: needed - placed,
                });
            } else {
                debug!(course = %course.id, sessions = placed, "course scheduled");
            }
        }

        schedule.sort();

        SchedulerOutput {
            schedule,
            unscheduled,
            search_nodes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Availability, Day, Faculty, Room, SessionType, Student, TimeSlot};
    use crate::validation::validate_schedule;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn at(day: Day, hour: usize) -> Slot {
        Slot::new(day, TimeSlot::ALL[hour])
    }

    fn run(
        courses: &[Course],
        faculty: &[Faculty],
        rooms: &[Room],
        students: &[Student],
        seed: u64,
    ) -> SchedulerOutput {
        let ctx = SchedulingContext::new(faculty, rooms, students);
        let selected: Vec<&Course> = courses.iter().collect();
        let mut rng = StdRng::seed_from_u64(seed);
        GreedyScheduler::new().schedule(&selected, &ctx, &mut rng)
    }

    #[test]
    fn test_single_course_two_sessions() {
        let courses = vec![Course::new("C1").with_name("Algebra").with_credits(2).with_faculty("F1")];
        let faculty = vec![Faculty::new("F1")];
        let rooms = vec![Room::classroom("R1", 30)];

        let out = run(&courses, &faculty, &rooms, &[], 1);
        assert_eq!(out.schedule.len(), 2);
        assert!(out.schedule.entries.iter().all(|e| e.course_id == "C1"));
        assert_ne!(out.schedule.entries[0].slot(), out.schedule.entries[1].slot());
        assert!(validate_schedule(&out.schedule.entries).is_valid);
        assert!(out.unscheduled.is_empty());
    }

    #[test]
    fn test_shared_faculty_single_slot_no_double_booking() {
        let only = at(Day::Wednesday, 4);
        let courses = vec![
            Course::new("C1").with_credits(1).with_faculty("F1"),
            Course::new("C2").with_credits(1).with_faculty("F1"),
        ];
        let faculty = vec![Faculty::new("F1").with_availability(Availability::within([only]))];
        let rooms = vec![Room::classroom("R1", 30), Room::classroom("R2", 30)];

        let out = run(&courses, &faculty, &rooms, &[], 3);
        assert_eq!(out.schedule.len(), 1);
        assert_eq!(out.schedule.entries[0].course_id, "C1");
        assert_eq!(out.schedule.entries[0].slot(), only);
        assert_eq!(out.unscheduled.len(), 1);
        assert_eq!(out.unscheduled[0].course_id, "C2");
        assert_eq!(out.unscheduled[0].sessions_missing, 1);
    }

    #[test]
    fn test_roomy_input_is_conflict_free() {
        let courses: Vec<Course> = (0..8)
            .map(|i| Course::new(format!("C{i}")).with_credits(3).with_faculty(format!("F{}", i % 3)))
            .collect();
        let faculty: Vec<Faculty> = (0..3).map(|i| Faculty::new(format!("F{i}"))).collect();
        let rooms = vec![Room::classroom("R1", 50), Room::classroom("R2", 50)];

        for seed in 0..10 {
            let out = run(&courses, &faculty, &rooms, &[], seed);
            assert_eq!(out.schedule.len(), 24);
            assert!(validate_schedule(&out.schedule.entries).is_valid);
        }
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let courses = vec![
            Course::new("C1").with_credits(3).with_faculty("F1"),
            Course::new("C2").with_credits(2).with_faculty("F2"),
        ];
        let faculty = vec![Faculty::new("F1"), Faculty::new("F2")];
        let rooms = vec![Room::classroom("R1", 10)];

        let a = run(&courses, &faculty, &rooms, &[], 42);
        let b = run(&courses, &faculty, &rooms, &[], 42);
        assert_eq!(a.schedule, b.schedule);
    }

    #[test]
    fn test_more_sessions_than_slots() {
        let slots = [at(Day::Monday, 0), at(Day::Tuesday, 1), at(Day::Friday, 6)];
        let courses = vec![Course::new("C1").with_credits(5).with_faculty("F1")];
        let faculty = vec![Faculty::new("F1").with_availability(Availability::within(slots))];
        let rooms = vec![Room::classroom("R1", 10), Room::classroom("R2", 10)];

        let out = run(&courses, &faculty, &rooms, &[], 9);
        assert_eq!(out.schedule.len(), 3);
        assert_eq!(out.unscheduled[0].sessions_missing, 2);
        assert!(validate_schedule(&out.schedule.entries).is_valid);
    }

    #[test]
    fn test_course_without_faculty_is_skipped() {
        let courses = vec![Course::new("C1").with_credits(1)];
        let rooms = vec![Room::classroom("R1", 10)];

        let out = run(&courses, &[], &rooms, &[], 0);
        assert!(out.schedule.is_empty());
        assert_eq!(out.unscheduled[0].sessions_missing, 1);
    }

    #[test]
    fn test_room_preference_and_fallback() {
        let courses = vec![
            Course::new("LAB").with_credits(2).with_faculty("F1").with_session_type(SessionType::lab()),
            Course::new("BIG").with_credits(1).with_faculty("F2"),
        ];
        let faculty = vec![Faculty::new("F1"), Faculty::new("F2")];
        let rooms = vec![Room::classroom("R1", 1), Room::lab("L1", 40)];
        let students: Vec<Student> = (0..5)
            .map(|i| Student::new(format!("S{i}")).with_courses(["BIG"]))
            .collect();

        let out = run(&courses, &faculty, &rooms, &students, 5);
        for e in out.schedule.entries_for_course("LAB") {
            assert_eq!(e.room_number, "L1");
        }
        // no classroom seats 5: BIG falls back to the first room in input order
        assert_eq!(out.schedule.entries_for_course("BIG")[0].room_number, "R1");
    }

    #[test]
    fn test_entries_on_valid_grid() {
        let courses: Vec<Course> = (0..5)
            .map(|i| Course::new(format!("C{i}")).with_credits(i).with_faculty("F1"))
            .collect();
        let faculty = vec![Faculty::new("F1")];
        let rooms = vec![Room::classroom("R1", 10)];

        let out = run(&courses, &faculty, &rooms, &[], 11);
        let mut per_course: HashMap<&str, usize> = HashMap::new();
        for e in &out.schedule.entries {
            *per_course.entry(e.course_id.as_str()).or_insert(0) += 1;
            assert!(e.slot().index() < crate::models::SLOTS_PER_WEEK);
            assert_eq!(e.room_number, "R1");
        }
        for c in &courses {
            assert!(per_course.get(c.id.as_str()).copied().unwrap_or(0) <= c.sessions_needed());
        }
        let slots: Vec<Slot> = out.schedule.entries.iter().map(|e| e.slot()).collect();
        let mut sorted = slots.clone();
        sorted.sort();
        assert_eq!(slots, sorted);
    }
}
