//! Pre-flight checks on the entity collections.
//!
//! Run before generation to surface data problems early. Detects:
//! - Empty course, faculty or room collections (errors)
//! - Duplicate course, faculty or room IDs (errors)
//! - Courses without an assigned faculty member (warning)
//! - Courses referencing an unknown faculty member (warning)
//! - Faculty members carrying a high course load (warning)
//! - Courses with no room of the right type and size (warning)
//!
//! Warnings never block generation; they flag inputs the schedulers will
//! either skip (greedy) or reject (CSP), or satisfy only by falling back
//! to an unsuitable room.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::models::{Course, Faculty, Room, Student};
use crate::scheduler::SchedulingContext;

/// Course count above which a faculty member's load is flagged.
pub const HIGH_WORKLOAD_COURSES: usize = 5;

/// A single input finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Finding category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of input findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// A required collection is empty.
    MissingData,
    /// Two entities share the same ID.
    DuplicateId,
    /// A course has no faculty member.
    UnassignedFaculty,
    /// A course references a faculty member that doesn't exist.
    InvalidFacultyReference,
    /// A faculty member teaches many courses.
    HighWorkload,
    /// No room matches a course's type and enrollment.
    NoSuitableRoom,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Errors and warnings found in the input collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputReport {
    /// Problems that make generation pointless.
    pub errors: Vec<ValidationError>,
    /// Problems generation works around.
    pub warnings: Vec<ValidationError>,
}

impl InputReport {
    /// Whether there are no errors (warnings allowed).
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates the entity collections before scheduling.
pub fn validate_input(
    courses: &[Course],
    faculty: &[Faculty],
    rooms: &[Room],
    students: &[Student],
) -> InputReport {
    let mut report = InputReport::default();

    if courses.is_empty() {
        report.errors.push(ValidationError::new(
            ValidationErrorKind::MissingData,
            "No courses found. Please add courses first.",
        ));
    }
    if faculty.is_empty() {
        report.errors.push(ValidationError::new(
            ValidationErrorKind::MissingData,
            "No faculty found. Please add faculty members first.",
        ));
    }
    if rooms.is_empty() {
        report.errors.push(ValidationError::new(
            ValidationErrorKind::MissingData,
            "No rooms found. Please add rooms first.",
        ));
    }

    check_duplicates("course", courses.iter().map(|c| c.id.as_str()), &mut report);
    check_duplicates("faculty", faculty.iter().map(|f| f.id.as_str()), &mut report);
    check_duplicates("room", rooms.iter().map(|r| r.id.as_str()), &mut report);

    // Faculty references and load
    let faculty_ids: HashSet<&str> = faculty.iter().map(|f| f.id.as_str()).collect();
    let mut load: HashMap<&str, usize> = HashMap::new();

    for course in courses {
        match course.faculty_id.as_deref() {
            None => report.warnings.push(ValidationError::new(
                ValidationErrorKind::UnassignedFaculty,
                format!("Course '{}' has no assigned faculty", course.name),
            )),
            Some(fid) => {
                if !faculty_ids.contains(fid) {
                    report.warnings.push(ValidationError::new(
                        ValidationErrorKind::InvalidFacultyReference,
                        format!(
                            "Course '{}' references unknown faculty '{}'",
                            course.name, fid
                        ),
                    ));
                }
                *load.entry(fid).or_insert(0) += 1;
            }
        }
    }

    // Report in faculty input order, unknown ids last in first-seen order
    let mut flagged: HashSet<&str> = HashSet::new();
    let ordered_ids = faculty
        .iter()
        .map(|f| f.id.as_str())
        .chain(courses.iter().filter_map(|c| c.faculty_id.as_deref()));
    for fid in ordered_ids {
        let count = load.get(fid).copied().unwrap_or(0);
        if count > HIGH_WORKLOAD_COURSES && flagged.insert(fid) {
            let name = faculty
                .iter()
                .find(|f| f.id == fid)
                .map_or("Unknown", |f| f.name.as_str());
            report.warnings.push(ValidationError::new(
                ValidationErrorKind::HighWorkload,
                format!("Faculty '{name}' is assigned {count} courses (high workload)"),
            ));
        }
    }

    // Room suitability
    if !rooms.is_empty() {
        let ctx = SchedulingContext::new(faculty, rooms, students);
        for course in courses {
            if ctx.suitable_room_indices(course).is_empty() {
                report.warnings.push(ValidationError::new(
                    ValidationErrorKind::NoSuitableRoom,
                    format!(
                        "Course '{}' has no {} room for {} students; any room will be used",
                        course.name,
                        course.session_type.required_room_type(),
                        ctx.enrolled_count(&course.id)
                    ),
                ));
            }
        }
    }

    report
}

fn check_duplicates<'a>(
    entity: &str,
    ids: impl Iterator<Item = &'a str>,
    report: &mut InputReport,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            report.errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {entity} ID: {id}"),
            ));
        }
    }
}
