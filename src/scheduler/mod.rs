//! Timetable construction and KPI evaluation.
//!
//! Provides the randomized greedy scheduler, the shared capability checks
//! both schedulers consult, the request-level entry point, and timetable
//! quality metrics.
//!
//! # Algorithm
//!
//! `GreedyScheduler` places sessions first-fit over a shuffled slot order.
//! It is not complete: it may leave sessions unplaced on inputs the CSP
//! scheduler (`crate::cp`) would solve, but it never fails.
//!
//! # KPI
//!
//! `TimetableKpi` computes fill rate, room utilization, and faculty load.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

mod context;
mod generate;
mod greedy;
mod kpi;

pub use context::SchedulingContext;
pub use generate::{build_schedule, GeneratedTimetable, GenerationResponse, ScheduleRequest};
pub use greedy::GreedyScheduler;
pub use kpi::TimetableKpi;

use crate::models::{Schedule, UnscheduledCourse};

/// What a scheduler produced for a course selection.
#[derive(Debug, Clone, Default)]
pub struct SchedulerOutput {
    /// Placed sessions, sorted by day then time.
    pub schedule: Schedule,
    /// Courses that received fewer sessions than they need.
    pub unscheduled: Vec<UnscheduledCourse>,
    /// Search nodes expanded, when the scheduler searches.
    pub search_nodes: Option<u64>,
}
