//! Course model.
//!
//! A course is the unit of demand: it needs `max(1, credits)` distinct
//! weekly sessions, taught by its assigned faculty member in a room that
//! suits its session type.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::coerce;

/// Room type required by theory sessions.
pub const CLASSROOM: &str = "classroom";

/// A course offering to be timetabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    #[serde(deserialize_with = "coerce::id")]
    pub id: String,
    /// Catalogue code (e.g., "CS101").
    #[serde(default)]
    pub code: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Credit count; also the number of weekly sessions (at least one).
    #[serde(
        default = "coerce::default_credits",
        deserialize_with = "coerce::credits"
    )]
    pub credits: i64,
    /// Program affiliation (e.g., "B.Ed.").
    #[serde(default)]
    pub program: String,
    /// Session type.
    #[serde(rename = "type", default)]
    pub session_type: SessionType,
    /// Assigned faculty member.
    #[serde(default, deserialize_with = "coerce::opt_id")]
    pub faculty_id: Option<String>,
}

/// Kind of teaching session, recognized case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionKind {
    /// Lecture in an ordinary classroom.
    #[default]
    Theory,
    /// Practical session in a lab.
    Lab,
    /// Any other label.
    Other,
}

/// Session type of a course: the label as written plus its kind.
///
/// Scheduling looks at the kind; timetable entries echo the label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SessionType {
    kind: SessionKind,
    label: String,
}

impl Default for SessionType {
    fn default() -> Self {
        Self::theory()
    }
}

impl SessionType {
    /// Classifies a raw label; empty means theory.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let kind = match label.trim().to_lowercase().as_str() {
            "" | "theory" => SessionKind::Theory,
            "lab" => SessionKind::Lab,
            _ => SessionKind::Other,
        };
        Self { kind, label }
    }

    /// A theory session.
    pub fn theory() -> Self {
        Self::new("theory")
    }

    /// A lab session.
    pub fn lab() -> Self {
        Self::new("lab")
    }

    /// Recognized kind.
    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    /// Label as stored in records.
    pub fn as_str(&self) -> &str {
        &self.label
    }

    /// Room type a session of this kind needs.
    ///
    /// Theory maps to `classroom`, lab to `lab`; other labels name the
    /// room type directly.
    pub fn required_room_type(&self) -> &str {
        match self.kind {
            SessionKind::Theory => CLASSROOM,
            SessionKind::Lab => "lab",
            SessionKind::Other => self.label.trim(),
        }
    }
}

impl From<String> for SessionType {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

impl From<SessionType> for String {
    fn from(t: SessionType) -> Self {
        t.label
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Course {
    /// Creates a three-credit theory course.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: String::new(),
            name: String::new(),
            credits: coerce::DEFAULT_CREDITS,
            program: String::new(),
            session_type: SessionType::theory(),
            faculty_id: None,
        }
    }

    /// Sets the course name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the catalogue code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the credit count.
    pub fn with_credits(mut self, credits: i64) -> Self {
        self.credits = credits;
        self
    }

    /// Sets the program affiliation.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets the session type.
    pub fn with_session_type(mut self, session_type: SessionType) -> Self {
        self.session_type = session_type;
        self
    }

    /// Assigns a faculty member.
    pub fn with_faculty(mut self, faculty_id: impl Into<String>) -> Self {
        self.faculty_id = Some(faculty_id.into());
        self
    }

    /// Weekly sessions this course needs.
    #[inline]
    pub fn sessions_needed(&self) -> usize {
        usize::try_from(self.credits.max(1)).unwrap_or(1)
    }
}
