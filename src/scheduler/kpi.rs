//! Timetable quality metrics (KPIs).
//!
//! Computes coverage and load indicators from a timetable and the
//! courses it was generated for.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Sessions Requested | Sum of sessions needed over the courses |
//! | Sessions Scheduled | Entries belonging to those courses |
//! | Fill Rate | Scheduled / requested |
//! | Room Utilization | Sessions in a room / 40 weekly slots |
//! | Faculty Load | Sessions taught per faculty member |
//! | Incomplete Courses | Courses with fewer sessions than needed |
//!
//! # Reference
//! McCollum et al. (2010), "Setting the research agenda in automated timetabling"

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::{Course, Schedule, SLOTS_PER_WEEK};

/// Timetable performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableKpi {
    /// Sessions the courses need per week.
    pub sessions_requested: usize,
    /// Sessions placed for those courses.
    pub sessions_scheduled: usize,
    /// Fraction of requested sessions placed (0.0..1.0).
    pub fill_rate: f64,
    /// Average room utilization over rooms in use (0.0..1.0).
    pub avg_room_utilization: f64,
    /// Per-room utilization keyed by room number.
    pub utilization_by_room: BTreeMap<String, f64>,
    /// Sessions per faculty id.
    pub faculty_load: BTreeMap<String, usize>,
    /// Courses that received fewer sessions than needed.
    pub incomplete_courses: usize,
}

impl TimetableKpi {
    /// Computes KPIs from a timetable and its input courses.
    ///
    /// # Arguments
    /// * `schedule` - The generated timetable.
    /// * `courses` - The courses it was generated for.
    pub fn calculate(schedule: &Schedule, courses: &[Course]) -> Self {
        let mut per_course: HashMap<&str, usize> = HashMap::new();
        let mut room_sessions: BTreeMap<String, usize> = BTreeMap::new();
        let mut faculty_load: BTreeMap<String, usize> = BTreeMap::new();

        for entry in &schedule.entries {
            *per_course.entry(entry.course_id.as_str()).or_insert(0) += 1;
            *room_sessions.entry(entry.room_number.clone()).or_insert(0) += 1;
            if let Some(fid) = &entry.faculty_id {
                *faculty_load.entry(fid.clone()).or_insert(0) += 1;
            }
        }

        let mut sessions_requested: usize = 0;
        let mut sessions_scheduled = 0;
        let mut incomplete_courses = 0;
        for course in courses {
            let needed = course.sessions_needed();
            let placed = per_course.get(course.id.as_str()).copied().unwrap_or(0);
            sessions_requested = sessions_requested.saturating_add(needed);
            sessions_scheduled += placed.min(needed);
            if placed < needed {
                incomplete_courses += 1;
            }
        }

        let fill_rate = if sessions_requested == 0 {
            1.0
        } else {
            sessions_scheduled as f64 / sessions_requested as f64
        };

        let utilization_by_room: BTreeMap<String, f64> = room_sessions
            .into_iter()
            .map(|(room, n)| (room, n as f64 / SLOTS_PER_WEEK as f64))
            .collect();
        let avg_room_utilization = if utilization_by_room.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_room.values().sum();
            sum / utilization_by_room.len() as f64
        };

        Self {
            sessions_requested,
            sessions_scheduled,
            fill_rate,
            avg_room_utilization,
            utilization_by_room,
            faculty_load,
            incomplete_courses,
        }
    }

    /// Whether every requested session was placed.
    pub fn is_complete(&self) -> bool {
        self.incomplete_courses == 0
    }

    /// Whether the timetable meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_fill_rate: f64, max_faculty_load: usize) -> bool {
        self.fill_rate >= min_fill_rate
            && self.faculty_load.values().all(|&n| n <= max_faculty_load)
    }
}
