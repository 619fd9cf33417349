//! Program configuration.

use serde::{Deserialize, Serialize};

use super::Course;

/// Program name meaning "every program".
pub const GENERAL_PROGRAM: &str = "General";

/// Program and semester a timetable is generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// Program name; `"General"` selects every course.
    #[serde(default = "general")]
    pub name: String,
    /// Semester label.
    #[serde(default = "current")]
    pub semester: String,
}

fn general() -> String {
    GENERAL_PROGRAM.to_string()
}

fn current() -> String {
    "Current".to_string()
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            name: general(),
            semester: current(),
        }
    }
}

impl ProgramConfig {
    /// Creates a configuration for a program and semester.
    pub fn new(name: impl Into<String>, semester: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            semester: semester.into(),
        }
    }

    /// Whether every program is selected.
    pub fn is_general(&self) -> bool {
        self.name == GENERAL_PROGRAM
    }

    /// Courses belonging to this program, in input order.
    pub fn select_courses<'a>(&self, courses: &'a [Course]) -> Vec<&'a Course> {
        courses
            .iter()
            .filter(|c| self.is_general() || c.program == self.name)
            .collect()
    }
}
