//! Student enrollment model.
//!
//! Enrollment arrives either as a native list of course ids or as a
//! comma-delimited string. Both normalize to the same ordered set.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::coerce::{self, LooseId};

/// A student and the courses they are enrolled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier.
    #[serde(default, deserialize_with = "coerce::id")]
    pub id: String,
    /// Enrolled course identifiers.
    #[serde(default, deserialize_with = "enrollment")]
    pub enrolled_courses: BTreeSet<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Enrollment {
    List(Vec<LooseId>),
    Delimited(String),
    Unrecognized(IgnoredAny),
}

fn enrollment<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeSet<String>, D::Error> {
    let ids = match Enrollment::deserialize(deserializer)? {
        Enrollment::List(ids) => ids.into_iter().map(String::from).collect(),
        Enrollment::Delimited(s) => parse_delimited(&s),
        Enrollment::Unrecognized(_) => BTreeSet::new(),
    };
    Ok(ids)
}

fn parse_delimited(s: &str) -> BTreeSet<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

impl Student {
    /// Creates a student with no enrollments.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enrolled_courses: BTreeSet::new(),
        }
    }

    /// Enrolls in the given courses.
    pub fn with_courses<I, S>(mut self, course_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enrolled_courses
            .extend(course_ids.into_iter().map(Into::into));
        self
    }

    /// Enrolls from a comma-delimited course list.
    pub fn with_delimited(mut self, course_ids: &str) -> Self {
        self.enrolled_courses.extend(parse_delimited(course_ids));
        self
    }

    /// Whether the student takes the course.
    #[inline]
    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.enrolled_courses.contains(course_id)
    }
}
