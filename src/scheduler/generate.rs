//! Request-level timetable generation.
//!
//! # Algorithm
//!
//! 1. Select the courses of the requested program (`"General"` keeps all).
//! 2. Run the requested algorithm over the selection.
//! 3. Validate the result for residual double-booking.
//! 4. Attach metadata and the validation report.
//!
//! An empty selection fails with [`TimetableError::NoCourses`]. The greedy
//! path never fails past that point; the CSP path fails when the model is
//! infeasible or its search bounds are hit.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{GreedyScheduler, SchedulerOutput, SchedulingContext};
use crate::cp::{CspConfig, CspScheduler};
use crate::error::TimetableError;
use crate::models::{
    Algorithm, Course, Faculty, ProgramConfig, Room, Schedule, ScheduleMetadata, Student,
    UnscheduledCourse,
};
use crate::validation::{validate_schedule, ValidationReport};

/// Input container for timetable generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Candidate courses, filtered by program.
    #[serde(default)]
    pub courses: Vec<Course>,
    /// Faculty members.
    #[serde(default)]
    pub faculty: Vec<Faculty>,
    /// Rooms.
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// Students, used for enrollment counts.
    #[serde(default)]
    pub students: Vec<Student>,
    /// Program and semester.
    #[serde(default)]
    pub program: ProgramConfig,
    /// Algorithm to run.
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Seed for the greedy slot shuffle; OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Search bounds for the CSP algorithm.
    #[serde(default)]
    pub csp: CspConfig,
}

impl ScheduleRequest {
    /// Creates a request over the given entities.
    pub fn new(
        courses: Vec<Course>,
        faculty: Vec<Faculty>,
        rooms: Vec<Room>,
        students: Vec<Student>,
    ) -> Self {
        Self {
            courses,
            faculty,
            rooms,
            students,
            ..Self::default()
        }
    }

    /// Sets the algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the greedy RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the program and semester.
    pub fn with_program(mut self, program: ProgramConfig) -> Self {
        self.program = program;
        self
    }

    /// Sets the CSP search bounds.
    pub fn with_csp_config(mut self, config: CspConfig) -> Self {
        self.csp = config;
        self
    }
}

/// A generated timetable with its metadata and validation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedTimetable {
    /// Placed sessions.
    pub schedule: Schedule,
    /// Generation metadata.
    pub metadata: ScheduleMetadata,
    /// Courses the greedy path could not fully place.
    pub unscheduled: Vec<UnscheduledCourse>,
    /// Residual conflicts in `schedule`.
    pub validation: ValidationReport,
}

/// Builds a timetable for the request.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Algorithm, Course, Faculty, Room};
/// use u_timetable::scheduler::{build_schedule, ScheduleRequest};
///
/// let request = ScheduleRequest::new(
///     vec![Course::new("C1").with_credits(2).with_faculty("F1")],
///     vec![Faculty::new("F1")],
///     vec![Room::classroom("R1", 30)],
///     vec![],
/// )
/// .with_algorithm(Algorithm::Greedy)
/// .with_seed(42);
///
/// let generated = build_schedule(&request).unwrap();
/// assert_eq!(generated.schedule.len(), 2);
/// assert!(generated.validation.is_valid);
/// ```
pub fn build_schedule(request: &ScheduleRequest) -> Result<GeneratedTimetable, TimetableError> {
    let selected = request.program.select_courses(&request.courses);
    if selected.is_empty() {
        return Err(TimetableError::NoCourses {
            program: request.program.name.clone(),
        });
    }

    info!(
        courses = selected.len(),
        faculty = request.faculty.len(),
        rooms = request.rooms.len(),
        algorithm = request.algorithm.as_str(),
        program = %request.program.name,
        "generating timetable"
    );

    let ctx = SchedulingContext::new(&request.faculty, &request.rooms, &request.students);
    let output = run_algorithm(request, &selected, &ctx)?;
    let validation = validate_schedule(&output.schedule.entries);

    if validation.is_valid {
        info!(
            sessions = output.schedule.len(),
            unscheduled = output.unscheduled.len(),
            "timetable generated"
        );
    } else {
        warn!(
            sessions = output.schedule.len(),
            conflicts = validation.conflicts.len(),
            "timetable generated with conflicts"
        );
    }

    let metadata = ScheduleMetadata {
        total_courses: selected.len(),
        generated_at: Utc::now(),
        algorithm: request.algorithm,
        program: request.program.name.clone(),
        semester: request.program.semester.clone(),
        search_nodes: output.search_nodes,
    };

    Ok(GeneratedTimetable {
        schedule: output.schedule,
        metadata,
        unscheduled: output.unscheduled,
        validation,
    })
}

fn run_algorithm(
    request: &ScheduleRequest,
    selected: &[&Course],
    ctx: &SchedulingContext<'_>,
) -> Result<SchedulerOutput, TimetableError> {
    match request.algorithm {
        Algorithm::Greedy => {
            let mut rng = match request.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            Ok(GreedyScheduler::new().schedule(selected, ctx, &mut rng))
        }
        Algorithm::Csp => CspScheduler::new(request.csp.clone()).schedule(selected, ctx),
    }
}

/// Serializable outcome of a generation call.
///
/// On success carries `timetable`, `metadata`, `validation` and
/// `unscheduled`; on failure only `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Whether a timetable was produced.
    pub success: bool,
    /// Timetable entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timetable: Option<Schedule>,
    /// Generation metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ScheduleMetadata>,
    /// Validation report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
    /// Courses not fully placed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unscheduled: Option<Vec<UnscheduledCourse>>,
    /// Failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Result<GeneratedTimetable, TimetableError>> for GenerationResponse {
    fn from(result: Result<GeneratedTimetable, TimetableError>) -> Self {
        match result {
            Ok(generated) => Self {
                success: true,
                timetable: Some(generated.schedule),
                metadata: Some(generated.metadata),
                validation: Some(generated.validation),
                unscheduled: Some(generated.unscheduled),
                message: None,
            },
            Err(e) => Self {
                success: false,
                timetable: None,
                metadata: None,
                validation: None,
                unscheduled: None,
                message: Some(e.to_string()),
            },
        }
    }
}
