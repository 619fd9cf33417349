//! Double-booking detection over a produced timetable.
//!
//! Two independent single-pass scans:
//! 1. keyed by `(faculty id, day, time)`, reporting `faculty_conflict`;
//! 2. keyed by `(room number, day, time)`, reporting `room_conflict`.
//!
//! On a key hit the scan records the course name currently held for the
//! key and the incoming one, then stores the incoming name. A third
//! entry on the same key is therefore reported against the second, not
//! the first. Reordering entries can change which course names are cited
//! but never whether a conflict exists. Nothing is deduplicated.
//!
//! Entries without a faculty id share one `(none, day, time)` key.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Day, ScheduleEntry, TimeSlot};

/// A pair of entries illegally sharing a faculty member or a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Conflict {
    /// Same faculty member at the same slot.
    FacultyConflict {
        /// Faculty display name of the later entry.
        faculty: String,
        day: Day,
        time: TimeSlot,
        /// `[previously held, incoming]` course names.
        courses: [String; 2],
    },
    /// Same room at the same slot.
    RoomConflict {
        /// Room number.
        room: String,
        day: Day,
        time: TimeSlot,
        /// `[previously held, incoming]` course names.
        courses: [String; 2],
    },
}

impl Conflict {
    /// Whether this is a faculty double-booking.
    pub fn is_faculty(&self) -> bool {
        matches!(self, Conflict::FacultyConflict { .. })
    }

    /// Whether this is a room double-booking.
    pub fn is_room(&self) -> bool {
        matches!(self, Conflict::RoomConflict { .. })
    }

    /// The two course names involved.
    pub fn courses(&self) -> &[String; 2] {
        match self {
            Conflict::FacultyConflict { courses, .. } | Conflict::RoomConflict { courses, .. } => {
                courses
            }
        }
    }
}

/// Outcome of validating a timetable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// `true` iff no conflicts were found.
    pub is_valid: bool,
    /// Conflicts in detection order: faculty scan first, then room scan.
    pub conflicts: Vec<Conflict>,
}

impl ValidationReport {
    /// Number of faculty conflicts.
    pub fn faculty_conflict_count(&self) -> usize {
        self.conflicts.iter().filter(|c| c.is_faculty()).count()
    }

    /// Number of room conflicts.
    pub fn room_conflict_count(&self) -> usize {
        self.conflicts.iter().filter(|c| c.is_room()).count()
    }
}

/// Checks a timetable for faculty and room double-booking.
///
/// Never fails; an empty timetable is valid.
pub fn validate_schedule(entries: &[ScheduleEntry]) -> ValidationReport {
    let mut conflicts = Vec::new();

    let mut faculty_slots: HashMap<(Option<&str>, Day, TimeSlot), &str> = HashMap::new();
    for entry in entries {
        let key = (entry.faculty_id.as_deref(), entry.day, entry.time);
        if let Some(previous) = faculty_slots.insert(key, &entry.course_name) {
            conflicts.push(Conflict::FacultyConflict {
                faculty: entry.faculty_name.clone(),
                day: entry.day,
                time: entry.time,
                courses: [previous.to_string(), entry.course_name.clone()],
            });
        }
    }

    let mut room_slots: HashMap<(&str, Day, TimeSlot), &str> = HashMap::new();
    for entry in entries {
        let key = (entry.room_number.as_str(), entry.day, entry.time);
        if let Some(previous) = room_slots.insert(key, &entry.course_name) {
            conflicts.push(Conflict::RoomConflict {
                room: entry.room_number.clone(),
                day: entry.day,
                time: entry.time,
                courses: [previous.to_string(), entry.course_name.clone()],
            });
        }
    }

    ValidationReport {
        is_valid: conflicts.is_empty(),
        conflicts,
    }
}
