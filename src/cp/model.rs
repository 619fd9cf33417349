//! Constraint model of the weekly timetable.
//!
//! # Formulation
//!
//! - **Variables**: one per required session of each course.
//! - **Domains**: `{slot} × {eligible room}`, where eligible rooms follow
//!   the same type/capacity filter (and fallback) as the greedy path, and
//!   slots are pre-filtered by faculty availability (unary constraint).
//! - **Constraints** (binary, checked pairwise):
//!   - all-different on (room, slot) across every session;
//!   - all-different on (faculty, slot) across sessions sharing a faculty;
//!   - sessions of one course take strictly increasing slots, which keeps
//!     them on distinct slots and removes permutations of equal sessions.
//!
//! Rooms are identified by display number and faculty by id, the same
//! keys the conflict validator uses.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::error::TimetableError;
use crate::models::{Course, Slot, SLOTS_PER_WEEK};
use crate::scheduler::SchedulingContext;

/// Index of a session variable.
pub type VarId = usize;

/// A candidate value: a room at a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Weekly slot.
    pub slot: Slot,
    /// Position of the room in the context's room list.
    pub room: usize,
}

/// One required session of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionVar {
    /// Position of the course in the model's course list.
    pub course: usize,
    /// Session number within the course (0-based).
    pub session: usize,
    /// Interned faculty key.
    pub faculty: Option<usize>,
}

/// Timetable CSP over a fixed course selection.
///
/// Sessions of one course share a single domain.
#[derive(Debug, Clone)]
pub struct CspModel {
    vars: Vec<SessionVar>,
    /// Course position → candidate placements, slot-major.
    domains: Vec<Vec<Placement>>,
    /// Course position → interned room keys appearing in its domain.
    domain_rooms: Vec<BTreeSet<usize>>,
    /// Room position → interned display-number key.
    room_keys: Vec<usize>,
    course_labels: Vec<String>,
}

impl CspModel {
    /// Builds the model for the selected courses.
    ///
    /// # Errors
    /// [`TimetableError::Unsatisfiable`] when a course needs more sessions
    /// than the week has slots, or total demand exceeds the room-slot grid.
    /// Both are checked before any variable is allocated.
    pub fn build(courses: &[&Course], ctx: &SchedulingContext<'_>) -> Result<Self, TimetableError> {
        let mut room_key_of: HashMap<&str, usize> = HashMap::new();
        let room_keys: Vec<usize> = ctx
            .rooms()
            .iter()
            .map(|r| {
                let next = room_key_of.len();
                *room_key_of.entry(r.display_number()).or_insert(next)
            })
            .collect();
        let room_key_count = room_key_of.len();

        check_demand(courses, room_key_count)?;

        let slots = Slot::all();
        let mut faculty_keys: HashMap<&str, usize> = HashMap::new();
        let mut vars = Vec::new();
        let mut domains = Vec::with_capacity(courses.len());
        let mut domain_rooms = Vec::with_capacity(courses.len());

        for (course_idx, course) in courses.iter().enumerate() {
            let faculty_id = course.faculty_id.as_deref();
            let faculty = faculty_id.map(|id| {
                let next = faculty_keys.len();
                *faculty_keys.entry(id).or_insert(next)
            });

            let rooms = ctx.eligible_room_indices(course);
            let domain: Vec<Placement> = slots
                .iter()
                .filter(|&&slot| ctx.faculty_available(faculty_id, slot))
                .flat_map(|&slot| rooms.iter().map(move |&room| Placement { slot, room }))
                .collect();
            domain_rooms.push(domain.iter().map(|p| room_keys[p.room]).collect());
            domains.push(domain);

            vars.extend((0..course.sessions_needed()).map(|session| SessionVar {
                course: course_idx,
                session,
                faculty,
            }));
        }

        debug!(
            variables = vars.len(),
            faculty = faculty_keys.len(),
            rooms = room_key_count,
            "built timetable constraint model"
        );

        Ok(Self {
            vars,
            domains,
            domain_rooms,
            room_keys,
            course_labels: courses.iter().map(|c| describe(c)).collect(),
        })
    }

    /// Session variables.
    pub fn variables(&self) -> &[SessionVar] {
        &self.vars
    }

    /// Number of session variables.
    pub fn variable_count(&self) -> usize {
        self.vars.len()
    }

    /// Candidate placements of a variable, slot-major.
    pub fn domain(&self, var: VarId) -> &[Placement] {
        &self.domains[self.vars[var].course]
    }

    /// Whether two placements can coexist.
    pub fn compatible(&self, a: VarId, pa: Placement, b: VarId, pb: Placement) -> bool {
        let (va, vb) = (&self.vars[a], &self.vars[b]);

        if pa.slot == pb.slot {
            if self.room_keys[pa.room] == self.room_keys[pb.room] {
                return false;
            }
            if va.faculty.is_some() && va.faculty == vb.faculty {
                return false;
            }
        }

        if va.course == vb.course {
            return if va.session < vb.session {
                pa.slot < pb.slot
            } else {
                pb.slot < pa.slot
            };
        }

        true
    }

    /// Whether two variables constrain each other at all.
    pub(crate) fn interacts(&self, a: VarId, b: VarId) -> bool {
        let (va, vb) = (&self.vars[a], &self.vars[b]);
        if va.course == vb.course || (va.faculty.is_some() && va.faculty == vb.faculty) {
            return true;
        }
        !self.domain_rooms[va.course].is_disjoint(&self.domain_rooms[vb.course])
    }

    /// Cheap infeasibility proofs run before search.
    ///
    /// Detects empty domains and a course or faculty member needing more
    /// sessions than it has distinct slots.
    pub fn check_feasibility(&self) -> Result<(), TimetableError> {
        let mut course_sessions: HashMap<usize, usize> = HashMap::new();
        let mut faculty_slots: HashMap<usize, (usize, BTreeSet<Slot>)> = HashMap::new();

        for var in &self.vars {
            let domain = &self.domains[var.course];
            if domain.is_empty() {
                return Err(TimetableError::Unsatisfiable {
                    reason: format!(
                        "{} has no slot where its faculty is available and a room exists",
                        self.course_labels[var.course]
                    ),
                });
            }
            *course_sessions.entry(var.course).or_insert(0) += 1;

            if let Some(f) = var.faculty {
                let entry = faculty_slots.entry(f).or_default();
                entry.0 += 1;
                entry.1.extend(domain.iter().map(|p| p.slot));
            }
        }

        for (&course, &sessions) in &course_sessions {
            let slots: BTreeSet<Slot> = self.domains[course].iter().map(|p| p.slot).collect();
            if sessions > slots.len() {
                return Err(TimetableError::Unsatisfiable {
                    reason: format!(
                        "{} needs {} sessions but only {} slots are available",
                        self.course_labels[course],
                        sessions,
                        slots.len()
                    ),
                });
            }
        }

        for (sessions, slots) in faculty_slots.values() {
            if *sessions > slots.len() {
                return Err(TimetableError::Unsatisfiable {
                    reason: format!(
                        "a faculty member must teach {} sessions but is available in only {} slots",
                        sessions,
                        slots.len()
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Rejects demand no grid could hold, using saturating sums.
fn check_demand(courses: &[&Course], room_key_count: usize) -> Result<(), TimetableError> {
    if let Some(course) = courses.iter().find(|c| c.sessions_needed() > SLOTS_PER_WEEK) {
        return Err(TimetableError::Unsatisfiable {
            reason: format!(
                "{} needs {} sessions but the week has only {} slots",
                describe(course),
                course.sessions_needed(),
                SLOTS_PER_WEEK
            ),
        });
    }

    let demand = courses
        .iter()
        .fold(0usize, |acc, c| acc.saturating_add(c.sessions_needed()));
    let grid = SLOTS_PER_WEEK.saturating_mul(room_key_count);
    if demand > grid {
        return Err(TimetableError::Unsatisfiable {
            reason: format!("{demand} sessions requested but only {grid} room-slots exist"),
        });
    }
    Ok(())
}

fn describe(course: &Course) -> String {
    if course.name.is_empty() {
        format!("course '{}'", course.id)
    } else {
        format!("course '{}' ({})", course.id, course.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Availability, Day, Faculty, Room, TimeSlot};

    fn at(day: Day, hour: usize) -> Slot {
        Slot::new(day, TimeSlot::ALL[hour])
    }

    #[test]
    fn test_domains_respect_availability() {
        let courses = vec![Course::new("C1").with_credits(2).with_faculty("F1")];
        let faculty = vec![Faculty::new("F1")
            .with_availability(Availability::within([at(Day::Monday, 0), at(Day::Friday, 3)]))];
        let rooms = vec![Room::classroom("R1", 10), Room::classroom("R2", 10)];
        let ctx = SchedulingContext::new(&faculty, &rooms, &[]);
        let selected: Vec<&Course> = courses.iter().collect();

        let model = CspModel::build(&selected, &ctx).unwrap();
        assert_eq!(model.variable_count(), 2);
        for var in 0..model.variable_count() {
            let domain = model.domain(var);
            assert_eq!(domain.len(), 4);
            assert!(domain
                .iter()
                .all(|p| p.slot == at(Day::Monday, 0) || p.slot == at(Day::Friday, 3)));
        }
        assert!(model.check_feasibility().is_ok());
    }

    #[test]
    fn test_compatibility_rules() {
        let courses = vec![
            Course::new("C1").with_credits(2).with_faculty("F1"),
            Course::new("C2").with_credits(1).with_faculty("F1"),
            Course::new("C3").with_credits(1).with_faculty("F2"),
        ];
        let faculty = vec![Faculty::new("F1"), Faculty::new("F2")];
        let rooms = vec![Room::classroom("R1", 10), Room::classroom("R2", 10)];
        let ctx = SchedulingContext::new(&faculty, &rooms, &[]);
        let selected: Vec<&Course> = courses.iter().collect();
        let model = CspModel::build(&selected, &ctx).unwrap();

        let mon = |room| Placement { slot: at(Day::Monday, 0), room };
        let tue = |room| Placement { slot: at(Day::Tuesday, 0), room };

        // vars: 0,1 = C1 sessions; 2 = C2; 3 = C3
        assert!(!model.compatible(0, mon(0), 3, mon(0)), "room clash");
        assert!(!model.compatible(0, mon(0), 2, mon(1)), "faculty clash");
        assert!(model.compatible(0, mon(0), 3, mon(1)));
        assert!(model.compatible(0, mon(0), 1, tue(0)), "increasing slots");
        assert!(!model.compatible(0, tue(0), 1, mon(1)), "decreasing slots");
        assert!(!model.compatible(1, mon(0), 0, tue(1)));
    }

    #[test]
    fn test_shared_display_number_is_one_room() {
        let courses = vec![
            Course::new("C1").with_credits(1).with_faculty("F1"),
            Course::new("C2").with_credits(1).with_faculty("F2"),
        ];
        let faculty = vec![Faculty::new("F1"), Faculty::new("F2")];
        let rooms = vec![
            Room::classroom("R1", 10).with_number("101"),
            Room::classroom("R2", 10).with_number("101"),
        ];
        let ctx = SchedulingContext::new(&faculty, &rooms, &[]);
        let selected: Vec<&Course> = courses.iter().collect();
        let model = CspModel::build(&selected, &ctx).unwrap();

        let p0 = Placement { slot: at(Day::Monday, 0), room: 0 };
        let p1 = Placement { slot: at(Day::Monday, 0), room: 1 };
        assert!(!model.compatible(0, p0, 1, p1));
    }

    #[test]
    fn test_empty_domain_is_unsatisfiable() {
        let courses = vec![Course::new("C1").with_name("Orphan").with_credits(1)];
        let rooms = vec![Room::classroom("R1", 10)];
        let ctx = SchedulingContext::new(&[], &rooms, &[]);
        let selected: Vec<&Course> = courses.iter().collect();

        let err = CspModel::build(&selected, &ctx).unwrap().check_feasibility().unwrap_err();
        assert!(matches!(err, TimetableError::Unsatisfiable { .. }));
        assert!(err.to_string().contains("Orphan"));
    }

    #[test]
    fn test_faculty_pigeonhole() {
        let only = at(Day::Thursday, 2);
        let courses = vec![
            Course::new("C1").with_credits(1).with_faculty("F1"),
            Course::new("C2").with_credits(1).with_faculty("F1"),
        ];
        let faculty = vec![Faculty::new("F1").with_availability(Availability::within([only]))];
        let rooms = vec![Room::classroom("R1", 10), Room::classroom("R2", 10)];
        let ctx = SchedulingContext::new(&faculty, &rooms, &[]);
        let selected: Vec<&Course> = courses.iter().collect();

        let err = CspModel::build(&selected, &ctx).unwrap().check_feasibility().unwrap_err();
        assert!(err.to_string().contains("faculty"));
    }

    #[test]
    fn test_grid_overflow() {
        let courses: Vec<Course> = (0..41)
            .map(|i| Course::new(format!("C{i}")).with_credits(1).with_faculty(format!("F{i}")))
            .collect();
        let faculty: Vec<Faculty> = (0..41).map(|i| Faculty::new(format!("F{i}"))).collect();
        let rooms = vec![Room::classroom("R1", 10)];
        let ctx = SchedulingContext::new(&faculty, &rooms, &[]);
        let selected: Vec<&Course> = courses.iter().collect();

        let err = CspModel::build(&selected, &ctx).unwrap_err();
        assert!(err.to_string().contains("room-slots"));
    }

    #[test]
    fn test_huge_credit_count_rejected_before_allocation() {
        let courses = vec![
            Course::new("C1").with_credits(2_000_000).with_faculty("F1"),
            Course::new("C2").with_credits(i64::MAX).with_faculty("F1"),
        ];
        let faculty = vec![Faculty::new("F1")];
        let rooms: Vec<Room> = (0..10).map(|i| Room::classroom(format!("R{i}"), 10)).collect();
        let ctx = SchedulingContext::new(&faculty, &rooms, &[]);
        let selected: Vec<&Course> = courses.iter().collect();

        let err = CspModel::build(&selected, &ctx).unwrap_err();
        assert!(matches!(err, TimetableError::Unsatisfiable { .. }));
        assert!(err.to_string().contains("2000000 sessions"));
    }

    #[test]
    fn test_saturated_demand_overflows_grid() {
        // Each course fits the week, but together they exceed one room
        let courses: Vec<Course> = (0..3)
            .map(|i| Course::new(format!("C{i}")).with_credits(20).with_faculty(format!("F{i}")))
            .collect();
        let faculty: Vec<Faculty> = (0..3).map(|i| Faculty::new(format!("F{i}"))).collect();
        let rooms = vec![Room::classroom("R1", 10)];
        let ctx = SchedulingContext::new(&faculty, &rooms, &[]);
        let selected: Vec<&Course> = courses.iter().collect();

        let err = CspModel::build(&selected, &ctx).unwrap_err();
        assert!(err.to_string().contains("60 sessions requested but only 40 room-slots"));
    }

    #[test]
    fn test_sessions_share_course_domain() {
        let courses = vec![Course::new("C1").with_credits(3).with_faculty("F1")];
        let faculty = vec![Faculty::new("F1")];
        let rooms = vec![Room::classroom("R1", 10)];
        let ctx = SchedulingContext::new(&faculty, &rooms, &[]);
        let selected: Vec<&Course> = courses.iter().collect();

        let model = CspModel::build(&selected, &ctx).unwrap();
        assert_eq!(model.variable_count(), 3);
        assert!(std::ptr::eq(model.domain(0), model.domain(2)));
        assert_eq!(model.domain(1).len(), SLOTS_PER_WEEK);
    }
}
