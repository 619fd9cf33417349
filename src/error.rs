//! Error types for timetable generation.

use thiserror::Error;

/// Failure to produce a timetable.
///
/// Partial greedy scheduling and missing optional record fields are not
/// errors; they surface as `unscheduled` courses and field defaults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimetableError {
    /// No courses were selected for the requested program.
    #[error("No courses found for program: {program}")]
    NoCourses { program: String },

    /// The constraint model has no feasible assignment.
    #[error("No feasible timetable exists: {reason}")]
    Unsatisfiable { reason: String },

    /// The search gave up after expanding its node budget.
    #[error("No timetable found within the search budget of {nodes} nodes")]
    SearchLimit { nodes: u64 },

    /// The caller's deadline passed before a solution was found.
    #[error("Timetable search exceeded its deadline after {nodes} nodes")]
    DeadlineExceeded { nodes: u64 },
}

impl TimetableError {
    /// Whether the failure comes from the constraints rather than the input
    /// selection.
    pub fn is_infeasible(&self) -> bool {
        !matches!(self, TimetableError::NoCourses { .. })
    }

    /// Whether the search stopped on a resource bound without proving
    /// infeasibility.
    pub fn is_search_bounded(&self) -> bool {
        matches!(
            self,
            TimetableError::SearchLimit { .. } | TimetableError::DeadlineExceeded { .. }
        )
    }
}
