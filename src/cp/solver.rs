//! Bounded backtracking search with forward checking.
//!
//! # Algorithm
//!
//! 1. Reject models that [`CspModel::check_feasibility`] proves infeasible.
//! 2. Pick the unassigned session with the fewest remaining placements
//!    (MRV), breaking ties by input order.
//! 3. Try its placements in domain order. After each assignment, remove
//!    incompatible placements from every interacting unassigned session
//!    (forward checking); a wiped-out domain rejects the assignment.
//! 4. Undo removals through a trail and backtrack chronologically.
//!
//! Every tried assignment counts as one node. The search stops with an
//! error when the node budget or the deadline is exhausted.
//!
//! # Reference
//! Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach",
//! Ch. 6.3 (Backtracking Search for CSPs)

use std::time::Instant;

use tracing::{debug, trace};

use super::{CspConfig, CspModel, Placement, VarId};
use crate::error::TimetableError;

/// How often (in nodes) the deadline is polled.
const DEADLINE_POLL_INTERVAL: u64 = 256;

/// A complete, consistent assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CspSolution {
    /// Placement of each session variable, indexed by [`VarId`].
    pub placements: Vec<Placement>,
    /// Nodes expanded to find it.
    pub nodes: u64,
}

/// Backtracking solver for [`CspModel`].
#[derive(Debug, Clone, Default)]
pub struct CspSolver {
    config: CspConfig,
}

impl CspSolver {
    /// Creates a solver with the given bounds.
    pub fn new(config: CspConfig) -> Self {
        Self { config }
    }

    /// Search bounds.
    pub fn config(&self) -> &CspConfig {
        &self.config
    }

    /// Finds one assignment satisfying every constraint.
    ///
    /// # Errors
    /// - [`TimetableError::Unsatisfiable`] when no assignment exists.
    /// - [`TimetableError::SearchLimit`] when the node budget runs out.
    /// - [`TimetableError::DeadlineExceeded`] when the deadline passes.
    pub fn solve(&self, model: &CspModel) -> Result<CspSolution, TimetableError> {
        model.check_feasibility()?;

        let start = Instant::now();
        let mut search = Search::new(model, &self.config, self.config.deadline_from(start));

        let found = search.run()?;
        debug!(
            nodes = search.nodes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            found,
            "timetable search finished"
        );

        if !found {
            return Err(TimetableError::Unsatisfiable {
                reason: format!(
                    "exhaustive search over {} sessions found no conflict-free placement",
                    model.variable_count()
                ),
            });
        }

        let placements = search
            .assigned
            .iter()
            .enumerate()
            .map(|(var, value)| value.map(|v| model.domain(var)[v]))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| TimetableError::Unsatisfiable {
                reason: "search ended with unassigned sessions".to_string(),
            })?;

        Ok(CspSolution {
            placements,
            nodes: search.nodes,
        })
    }
}

struct Search<'m> {
    model: &'m CspModel,
    neighbors: Vec<Vec<VarId>>,
    alive: Vec<Vec<bool>>,
    live: Vec<usize>,
    assigned: Vec<Option<usize>>,
    /// Removed (variable, value index) pairs, in removal order.
    trail: Vec<(VarId, usize)>,
    nodes: u64,
    max_nodes: u64,
    deadline: Option<Instant>,
}

impl<'m> Search<'m> {
    fn new(model: &'m CspModel, config: &CspConfig, deadline: Option<Instant>) -> Self {
        let n = model.variable_count();
        let mut neighbors = vec![Vec::new(); n];
        for a in 0..n {
            for b in (a + 1)..n {
                if model.interacts(a, b) {
                    neighbors[a].push(b);
                    neighbors[b].push(a);
                }
            }
        }

        Self {
            model,
            neighbors,
            alive: (0..n).map(|v| vec![true; model.domain(v).len()]).collect(),
            live: (0..n).map(|v| model.domain(v).len()).collect(),
            assigned: vec![None; n],
            trail: Vec::new(),
            nodes: 0,
            max_nodes: config.max_nodes,
            deadline,
        }
    }

    /// Returns `Ok(true)` once every variable is assigned, `Ok(false)` when
    /// the subtree is exhausted.
    fn run(&mut self) -> Result<bool, TimetableError> {
        let Some(var) = self.select_variable() else {
            return Ok(true);
        };

        for value in 0..self.alive[var].len() {
            if !self.alive[var][value] {
                continue;
            }
            self.tick()?;

            let mark = self.trail.len();
            self.assigned[var] = Some(value);
            if self.forward_check(var, value) && self.run()? {
                return Ok(true);
            }
            self.assigned[var] = None;
            self.undo(mark);
        }

        Ok(false)
    }

    fn tick(&mut self) -> Result<(), TimetableError> {
        if self.nodes >= self.max_nodes {
            return Err(TimetableError::SearchLimit {
                nodes: self.max_nodes,
            });
        }
        self.nodes += 1;

        if self.nodes % DEADLINE_POLL_INTERVAL == 0 {
            trace!(nodes = self.nodes, trail = self.trail.len(), "search progress");
            if self.deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(TimetableError::DeadlineExceeded { nodes: self.nodes });
            }
        }
        Ok(())
    }

    /// Smallest remaining domain first; ties go to the lowest index.
    fn select_variable(&self) -> Option<VarId> {
        (0..self.assigned.len())
            .filter(|&v| self.assigned[v].is_none())
            .min_by_key(|&v| self.live[v])
    }

    fn forward_check(&mut self, var: VarId, value: usize) -> bool {
        let model = self.model;
        let placed = model.domain(var)[value];

        for i in 0..self.neighbors[var].len() {
            let other = self.neighbors[var][i];
            if self.assigned[other].is_some() {
                continue;
            }

            let domain = model.domain(other);
            for (idx, &candidate) in domain.iter().enumerate() {
                if self.alive[other][idx] && !model.compatible(var, placed, other, candidate) {
                    self.alive[other][idx] = false;
                    self.live[other] -= 1;
                    self.trail.push((other, idx));
                }
            }

            if self.live[other] == 0 {
                return false;
            }
        }
        true
    }

    fn undo(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some((var, idx)) = self.trail.pop() {
                self.alive[var][idx] = true;
                self.live[var] += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Availability, Course, Day, Faculty, Room, Slot, TimeSlot};
    use crate::scheduler::SchedulingContext;
    use std::collections::HashSet;
    use std::time::Duration;

    fn at(day: Day, hour: usize) -> Slot {
        Slot::new(day, TimeSlot::ALL[hour])
    }

    fn model_for(courses: &[Course], faculty: &[Faculty], rooms: &[Room]) -> CspModel {
        let ctx = SchedulingContext::new(faculty, rooms, &[]);
        let selected: Vec<&Course> = courses.iter().collect();
        CspModel::build(&selected, &ctx).unwrap()
    }

    fn assert_consistent(model: &CspModel, solution: &CspSolution) {
        let n = model.variable_count();
        assert_eq!(solution.placements.len(), n);
        for a in 0..n {
            assert!(model.domain(a).contains(&solution.placements[a]));
            for b in (a + 1)..n {
                assert!(
                    model.compatible(a, solution.placements[a], b, solution.placements[b]),
                    "vars {a} and {b} clash"
                );
            }
        }
    }

    #[test]
    fn test_solves_simple_model() {
        let courses = vec![
            Course::new("C1").with_credits(3).with_faculty("F1"),
            Course::new("C2").with_credits(2).with_faculty("F1"),
            Course::new("C3").with_credits(2).with_faculty("F2"),
        ];
        let faculty = vec![Faculty::new("F1"), Faculty::new("F2")];
        let rooms = vec![Room::classroom("R1", 10)];
        let model = model_for(&courses, &faculty, &rooms);

        let solution = CspSolver::default().solve(&model).unwrap();
        assert_consistent(&model, &solution);
        assert!(solution.nodes >= 7);
    }

    #[test]
    fn test_tight_availability_needs_backtracking() {
        // F1 and F2 share one room; F1 can teach Monday 09:00 or 10:00,
        // F2 only Monday 09:00.
        let s0 = at(Day::Monday, 0);
        let s1 = at(Day::Monday, 1);
        let courses = vec![
            Course::new("C1").with_credits(1).with_faculty("F1"),
            Course::new("C2").with_credits(1).with_faculty("F2"),
        ];
        let faculty = vec![
            Faculty::new("F1").with_availability(Availability::within([s0, s1])),
            Faculty::new("F2").with_availability(Availability::within([s0])),
        ];
        let rooms = vec![Room::classroom("R1", 10)];
        let model = model_for(&courses, &faculty, &rooms);

        let solution = CspSolver::default().solve(&model).unwrap();
        assert_consistent(&model, &solution);
        assert_eq!(solution.placements[0].slot, s1);
        assert_eq!(solution.placements[1].slot, s0);
    }

    #[test]
    fn test_exhaustive_failure_is_unsatisfiable() {
        // Three one-session courses with distinct faculty all restricted to
        // the same two slots, one room: passes the counting checks but has
        // no solution.
        let slots = [at(Day::Tuesday, 0), at(Day::Tuesday, 1)];
        let courses: Vec<Course> = (0..3)
            .map(|i| Course::new(format!("C{i}")).with_credits(1).with_faculty(format!("F{i}")))
            .collect();
        let faculty: Vec<Faculty> = (0..3)
            .map(|i| Faculty::new(format!("F{i}")).with_availability(Availability::within(slots)))
            .collect();
        let rooms = vec![Room::classroom("R1", 10)];
        let model = model_for(&courses, &faculty, &rooms);

        let err = CspSolver::default().solve(&model).unwrap_err();
        assert!(matches!(err, TimetableError::Unsatisfiable { .. }));
        assert!(!err.is_search_bounded());
    }

    #[test]
    fn test_node_budget() {
        let slots = [at(Day::Tuesday, 0), at(Day::Tuesday, 1)];
        let courses: Vec<Course> = (0..3)
            .map(|i| Course::new(format!("C{i}")).with_credits(1).with_faculty(format!("F{i}")))
            .collect();
        let faculty: Vec<Faculty> = (0..3)
            .map(|i| Faculty::new(format!("F{i}")).with_availability(Availability::within(slots)))
            .collect();
        let rooms = vec![Room::classroom("R1", 10)];
        let model = model_for(&courses, &faculty, &rooms);

        let solver = CspSolver::new(CspConfig::new().with_max_nodes(1));
        let err = solver.solve(&model).unwrap_err();
        assert_eq!(err, TimetableError::SearchLimit { nodes: 1 });
    }

    #[test]
    fn test_past_deadline_aborts() {
        let courses: Vec<Course> = (0..20)
            .map(|i| Course::new(format!("C{i}")).with_credits(4).with_faculty(format!("F{}", i % 4)))
            .collect();
        let faculty: Vec<Faculty> = (0..4).map(|i| Faculty::new(format!("F{i}"))).collect();
        let rooms = vec![Room::classroom("R1", 10), Room::classroom("R2", 10)];
        let model = model_for(&courses, &faculty, &rooms);

        let past = Instant::now()
            .checked_sub(Duration::from_secs(1))
            .unwrap_or_else(Instant::now);
        let solver = CspSolver::new(CspConfig::new().with_deadline(past));
        match solver.solve(&model) {
            Err(TimetableError::DeadlineExceeded { nodes }) => {
                assert_eq!(nodes, DEADLINE_POLL_INTERVAL)
            }
            // 80 sessions may be placed before the first poll
            Ok(solution) => assert!(solution.nodes < DEADLINE_POLL_INTERVAL),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_full_grid_is_filled_without_clashes() {
        // 40 one-hour sessions for 40 slots in a single room.
        let courses: Vec<Course> = (0..10)
            .map(|i| Course::new(format!("C{i}")).with_credits(4).with_faculty(format!("F{}", i % 5)))
            .collect();
        let faculty: Vec<Faculty> = (0..5).map(|i| Faculty::new(format!("F{i}"))).collect();
        let rooms = vec![Room::classroom("R1", 10)];
        let model = model_for(&courses, &faculty, &rooms);

        let solution = CspSolver::default().solve(&model).unwrap();
        assert_consistent(&model, &solution);
        let used: HashSet<Slot> = solution.placements.iter().map(|p| p.slot).collect();
        assert_eq!(used.len(), 40);
    }
}
