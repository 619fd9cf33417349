//! Constraint-satisfaction timetabling.
//!
//! Builds a [`CspModel`] from the selected courses and the scheduling
//! context, searches it with a bounded [`CspSolver`], and decodes the
//! assignment into a [`Schedule`].
//!
//! Unlike the greedy path, this path never returns a partial timetable:
//! either every required session is placed without a faculty or room
//! clash, or the call fails with a [`TimetableError`].
//!
//! # Reference
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6
//! - Schaerf (1999), "A Survey of Automated Timetabling"

mod config;
mod model;
mod solver;

pub use config::{CspConfig, DEFAULT_MAX_NODES};
pub use model::{CspModel, Placement, SessionVar, VarId};
pub use solver::{CspSolution, CspSolver};

use tracing::{info, warn};

use crate::error::TimetableError;
use crate::models::{Course, Schedule};
use crate::scheduler::{SchedulerOutput, SchedulingContext};

/// Schedules courses by constraint-satisfaction search.
///
/// # Example
/// ```
/// use u_timetable::cp::{CspConfig, CspScheduler};
/// use u_timetable::models::{Course, Faculty, Room};
/// use u_timetable::scheduler::SchedulingContext;
///
/// let courses = vec![Course::new("C1").with_credits(2).with_faculty("F1")];
/// let faculty = vec![Faculty::new("F1")];
/// let rooms = vec![Room::classroom("R1", 30)];
/// let ctx = SchedulingContext::new(&faculty, &rooms, &[]);
///
/// let selected: Vec<&Course> = courses.iter().collect();
/// let output = CspScheduler::new(CspConfig::default())
///     .schedule(&selected, &ctx)
///     .unwrap();
/// assert_eq!(output.schedule.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CspScheduler {
    solver: CspSolver,
}

impl CspScheduler {
    /// Creates a scheduler with the given search bounds.
    pub fn new(config: CspConfig) -> Self {
        Self {
            solver: CspSolver::new(config),
        }
    }

    /// Places every required session or fails.
    pub fn schedule(
        &self,
        courses: &[&Course],
        ctx: &SchedulingContext<'_>,
    ) -> Result<SchedulerOutput, TimetableError> {
        let model = CspModel::build(courses, ctx).inspect_err(|e| {
            warn!(error = %e, "timetable model rejected");
        })?;
        info!(
            sessions = model.variable_count(),
            max_nodes = self.solver.config().max_nodes,
            "starting timetable search"
        );

        let solution = self.solver.solve(&model).inspect_err(|e| {
            warn!(error = %e, "timetable search failed");
        })?;

        Ok(SchedulerOutput {
            schedule: decode_solution(courses, ctx, &model, &solution),
            unscheduled: Vec::new(),
            search_nodes: Some(solution.nodes),
        })
    }
}

/// Decodes an assignment into timetable entries.
fn decode_solution(
    courses: &[&Course],
    ctx: &SchedulingContext<'_>,
    model: &CspModel,
    solution: &CspSolution,
) -> Schedule {
    let rooms = ctx.rooms();
    let entries = model
        .variables()
        .iter()
        .zip(&solution.placements)
        .map(|(var, placement)| {
            ctx.make_entry(courses[var.course], &rooms[placement.room], placement.slot)
        })
        .collect();
    Schedule::from_entries(entries)
}
