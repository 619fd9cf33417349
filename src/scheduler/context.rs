//! Entity lookups and capability checks shared by both schedulers.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{Course, Faculty, Room, ScheduleEntry, Slot, Student, UNASSIGNED_FACULTY};

/// Read-only view over the entity collections of one scheduling call.
///
/// Every check is total: unknown identifiers answer `false` instead of
/// failing. When identifiers repeat, the first record wins.
#[derive(Debug, Clone)]
pub struct SchedulingContext<'a> {
    faculty: HashMap<&'a str, &'a Faculty>,
    rooms: &'a [Room],
    room_index: HashMap<&'a str, &'a Room>,
    students: &'a [Student],
}

impl<'a> SchedulingContext<'a> {
    /// Indexes the given collections.
    pub fn new(faculty: &'a [Faculty], rooms: &'a [Room], students: &'a [Student]) -> Self {
        let mut faculty_index = HashMap::with_capacity(faculty.len());
        for f in faculty {
            faculty_index.entry(f.id.as_str()).or_insert(f);
        }
        let mut room_index = HashMap::with_capacity(rooms.len());
        for r in rooms {
            room_index.entry(r.id.as_str()).or_insert(r);
        }
        Self {
            faculty: faculty_index,
            rooms,
            room_index,
            students,
        }
    }

    /// All rooms, in input order.
    pub fn rooms(&self) -> &'a [Room] {
        self.rooms
    }

    /// Looks up a faculty member.
    pub fn faculty(&self, faculty_id: &str) -> Option<&'a Faculty> {
        self.faculty.get(faculty_id).copied()
    }

    /// Looks up a room.
    pub fn room(&self, room_id: &str) -> Option<&'a Room> {
        self.room_index.get(room_id).copied()
    }

    /// Whether the faculty member may teach at the slot.
    ///
    /// A missing or unknown faculty id is never available; a known member
    /// without availability data always is.
    pub fn faculty_available(&self, faculty_id: Option<&str>, slot: Slot) -> bool {
        faculty_id
            .and_then(|id| self.faculty(id))
            .is_some_and(|f| f.availability.permits(slot))
    }

    /// Whether the room seats `required` occupants.
    pub fn room_capacity_ok(&self, room_id: &str, required: i64) -> bool {
        self.room(room_id).is_some_and(|r| r.fits(required))
    }

    /// Whether the room has the required type (case-insensitive; empty
    /// means `classroom`).
    pub fn room_type_matches(&self, room_id: &str, required_type: &str) -> bool {
        self.room(room_id).is_some_and(|r| r.is_type(required_type))
    }

    /// Students enrolled in the course, floored at 1.
    pub fn enrolled_count(&self, course_id: &str) -> usize {
        self.students
            .iter()
            .filter(|s| s.is_enrolled(course_id))
            .count()
            .max(1)
    }

    /// Rooms suitable for a course by type and capacity.
    ///
    /// Falls back to every room when none qualifies, so type and capacity
    /// act as preferences rather than hard requirements.
    pub fn eligible_rooms(&self, course: &Course) -> Vec<&'a Room> {
        self.eligible_room_indices(course)
            .into_iter()
            .map(|i| &self.rooms[i])
            .collect()
    }

    /// Positions in [`SchedulingContext::rooms`] of the rooms matching the
    /// course's type and enrollment, without fallback.
    pub fn suitable_room_indices(&self, course: &Course) -> Vec<usize> {
        let required = i64::try_from(self.enrolled_count(&course.id)).unwrap_or(i64::MAX);
        let room_type = course.session_type.required_room_type();

        self.rooms
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_type(room_type) && r.fits(required))
            .map(|(i, _)| i)
            .collect()
    }

    /// Positions in [`SchedulingContext::rooms`] of the eligible rooms.
    pub fn eligible_room_indices(&self, course: &Course) -> Vec<usize> {
        let suitable = self.suitable_room_indices(course);

        if suitable.is_empty() {
            debug!(
                course = %course.id,
                room_type = course.session_type.required_room_type(),
                enrolled = self.enrolled_count(&course.id),
                "no suitable room; falling back to all rooms"
            );
            (0..self.rooms.len()).collect()
        } else {
            suitable
        }
    }

    /// Builds the timetable entry for one session.
    pub fn make_entry(&self, course: &Course, room: &Room, slot: Slot) -> ScheduleEntry {
        let faculty_name = course
            .faculty_id
            .as_deref()
            .and_then(|id| self.faculty(id))
            .map(|f| f.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNASSIGNED_FACULTY)
            .to_string();

        ScheduleEntry {
            course_id: course.id.clone(),
            course_name: course.name.clone(),
            course_code: course.code.clone(),
            faculty_id: course.faculty_id.clone(),
            faculty_name,
            room_number: room.display_number().to_string(),
            room_type: room.room_type.clone(),
            day: slot.day,
            time: slot.time,
            session_type: course.session_type.to_string(),
            credits: course.credits,
        }
    }
}
