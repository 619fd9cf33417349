//! Timetable (solution) model.
//!
//! A schedule is an ordered list of session entries, each placing one
//! session of a course in a room at a (day, time) slot. Entries are kept
//! day-major, then time-minor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coerce;
use super::slot::{Day, Slot, TimeSlot};

/// Faculty name shown when a course's faculty cannot be resolved.
pub const UNASSIGNED_FACULTY: &str = "TBA";

/// One scheduled session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Course identifier.
    pub course_id: String,
    /// Course name (denormalized for display and conflict reports).
    #[serde(default)]
    pub course_name: String,
    /// Course catalogue code.
    #[serde(default)]
    pub course_code: String,
    /// Faculty identifier, if the course has one.
    #[serde(default, deserialize_with = "coerce::opt_id")]
    pub faculty_id: Option<String>,
    /// Faculty display name, or `"TBA"`.
    #[serde(default = "unassigned")]
    pub faculty_name: String,
    /// Room display number.
    pub room_number: String,
    /// Room type label.
    #[serde(default)]
    pub room_type: String,
    /// Teaching day.
    pub day: Day,
    /// Teaching period.
    pub time: TimeSlot,
    /// Session type label of the course.
    #[serde(rename = "type", default)]
    pub session_type: String,
    /// Course credits.
    #[serde(default)]
    pub credits: i64,
}

fn unassigned() -> String {
    UNASSIGNED_FACULTY.to_string()
}

impl ScheduleEntry {
    /// Creates an entry for a course session in a room at a slot.
    pub fn new(course_id: impl Into<String>, room_number: impl Into<String>, slot: Slot) -> Self {
        Self {
            course_id: course_id.into(),
            course_name: String::new(),
            course_code: String::new(),
            faculty_id: None,
            faculty_name: unassigned(),
            room_number: room_number.into(),
            room_type: String::new(),
            day: slot.day,
            time: slot.time,
            session_type: String::new(),
            credits: 0,
        }
    }

    /// Sets the course name.
    pub fn with_course_name(mut self, name: impl Into<String>) -> Self {
        self.course_name = name.into();
        self
    }

    /// Sets the faculty id and name.
    pub fn with_faculty(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.faculty_id = Some(id.into());
        self.faculty_name = name.into();
        self
    }

    /// The slot this session occupies.
    #[inline]
    pub fn slot(&self) -> Slot {
        Slot::new(self.day, self.time)
    }
}

/// An ordered weekly timetable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    /// Session entries, day-major then time-minor once sorted.
    pub entries: Vec<ScheduleEntry>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps entries and sorts them by slot.
    pub fn from_entries(entries: Vec<ScheduleEntry>) -> Self {
        let mut schedule = Self { entries };
        schedule.sort();
        schedule
    }

    /// Appends an entry (call [`Schedule::sort`] afterwards).
    pub fn add_entry(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    /// Sorts entries by day, then time. Stable: entries sharing a slot
    /// keep their insertion order.
    pub fn sort(&mut self) {
        self.entries.sort_by_key(|e| (e.day, e.time));
    }

    /// Number of scheduled sessions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sessions are scheduled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sessions of a course.
    pub fn entries_for_course(&self, course_id: &str) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.course_id == course_id)
            .collect()
    }

    /// Sessions held in a room (by display number).
    pub fn entries_for_room(&self, room_number: &str) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.room_number == room_number)
            .collect()
    }

    /// Sessions taught by a faculty member.
    pub fn entries_for_faculty(&self, faculty_id: &str) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.faculty_id.as_deref() == Some(faculty_id))
            .collect()
    }

    /// Sessions scheduled at a slot.
    pub fn entries_at(&self, slot: Slot) -> Vec<&ScheduleEntry> {
        self.entries.iter().filter(|e| e.slot() == slot).collect()
    }
}

/// Search algorithm used to build a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Randomized first-fit heuristic; degrades gracefully.
    Greedy,
    /// Constraint-satisfaction search; fails explicitly when infeasible.
    #[default]
    Csp,
}

impl Algorithm {
    /// Label as reported in metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Greedy => "greedy",
            Algorithm::Csp => "csp",
        }
    }
}

/// Descriptive data attached to a generated schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetadata {
    /// Number of courses considered.
    pub total_courses: usize,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// Algorithm that produced the schedule.
    pub algorithm: Algorithm,
    /// Program name.
    pub program: String,
    /// Semester label.
    pub semester: String,
    /// Search nodes expanded (CSP only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_nodes: Option<u64>,
}

/// A course that received fewer sessions than it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnscheduledCourse {
    /// Course identifier.
    pub course_id: String,
    /// Course name.
    pub course_name: String,
    /// Sessions the course needs per week.
    pub sessions_required: usize,
    /// Sessions that could not be placed.
    pub sessions_missing: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: Day, hour: usize) -> Slot {
        Slot::new(day, TimeSlot::ALL[hour])
    }

    fn sample_schedule() -> Schedule {
        Schedule::from_entries(vec![
            ScheduleEntry::new("C2", "101", at(Day::Wednesday, 0)).with_faculty("F1", "Ada"),
            ScheduleEntry::new("C1", "101", at(Day::Monday, 5)).with_faculty("F1", "Ada"),
            ScheduleEntry::new("C1", "102", at(Day::Monday, 1)).with_faculty("F2", "Bob"),
        ])
    }

    #[test]
    fn test_sorted_day_major() {
        let s = sample_schedule();
        let order: Vec<Slot> = s.entries.iter().map(|e| e.slot()).collect();
        assert_eq!(
            order,
            vec![at(Day::Monday, 1), at(Day::Monday, 5), at(Day::Wednesday, 0)]
        );
    }

    #[test]
    fn test_sort_is_stable_within_slot() {
        let s = Schedule::from_entries(vec![
            ScheduleEntry::new("B", "1", at(Day::Friday, 0)),
            ScheduleEntry::new("A", "2", at(Day::Friday, 0)),
        ]);
        assert_eq!(s.entries[0].course_id, "B");
        assert_eq!(s.entries[1].course_id, "A");
    }

    #[test]
    fn test_queries() {
        let s = sample_schedule();
        assert_eq!(s.len(), 3);
        assert_eq!(s.entries_for_course("C1").len(), 2);
        assert_eq!(s.entries_for_room("101").len(), 2);
        assert_eq!(s.entries_for_faculty("F1").len(), 2);
        assert_eq!(s.entries_at(at(Day::Monday, 1)).len(), 1);
        assert!(s.entries_for_faculty("F9").is_empty());
    }

    #[test]
    fn test_entry_wire_format() {
        let e = ScheduleEntry::new("C1", "101", at(Day::Tuesday, 1));
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["day"], "Tuesday");
        assert_eq!(json["time"], "10:00-11:00");
        assert_eq!(json["faculty_name"], "TBA");
        assert!(json.get("type").is_some());
    }

    #[test]
    fn test_algorithm_labels() {
        assert_eq!(Algorithm::default(), Algorithm::Csp);
        assert_eq!(serde_json::to_string(&Algorithm::Greedy).unwrap(), r#""greedy""#);
        assert_eq!(Algorithm::Csp.as_str(), "csp");
    }
}
