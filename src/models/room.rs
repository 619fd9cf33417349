//! Room model.
//!
//! Rooms are the spatial resource of the timetable. Each has a seating
//! capacity and a type label (`classroom`, `lab`, ...) matched against
//! the session type of a course.

use serde::{Deserialize, Serialize};

use super::coerce;
use super::course::CLASSROOM;

/// A teaching room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    #[serde(deserialize_with = "coerce::id")]
    pub id: String,
    /// Display number (falls back to `id` when absent).
    #[serde(default, deserialize_with = "coerce::opt_label")]
    pub number: Option<String>,
    /// Seating capacity.
    #[serde(default, deserialize_with = "coerce::capacity")]
    pub capacity: i64,
    /// Type label; compared case-insensitively.
    #[serde(rename = "type", default = "default_room_type")]
    pub room_type: String,
}

fn default_room_type() -> String {
    CLASSROOM.to_string()
}

impl Room {
    /// Creates an empty classroom.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            number: None,
            capacity: 0,
            room_type: default_room_type(),
        }
    }

    /// Creates a classroom with the given capacity.
    pub fn classroom(id: impl Into<String>, capacity: i64) -> Self {
        Self::new(id).with_capacity(capacity)
    }

    /// Creates a lab with the given capacity.
    pub fn lab(id: impl Into<String>, capacity: i64) -> Self {
        Self::new(id).with_capacity(capacity).with_type("lab")
    }

    /// Sets the display number.
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: i64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the type label.
    pub fn with_type(mut self, room_type: impl Into<String>) -> Self {
        self.room_type = room_type.into();
        self
    }

    /// Number shown on timetables.
    pub fn display_number(&self) -> &str {
        self.number.as_deref().unwrap_or(&self.id)
    }

    /// Whether the room seats at least `required` occupants.
    #[inline]
    pub fn fits(&self, required: i64) -> bool {
        self.capacity >= required
    }

    /// Whether the room has the given type (empty means `classroom`).
    pub fn is_type(&self, required_type: &str) -> bool {
        let required = if required_type.is_empty() {
            CLASSROOM
        } else {
            required_type
        };
        self.room_type.to_lowercase() == required.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builder() {
        let r = Room::lab("R1", 24).with_number("L-204");
        assert_eq!(r.display_number(), "L-204");
        assert!(r.fits(24));
        assert!(!r.fits(25));
        assert!(r.is_type("LAB"));
        assert!(!r.is_type("classroom"));
    }

    #[test]
    fn test_display_number_falls_back_to_id() {
        assert_eq!(Room::classroom("R7", 10).display_number(), "R7");
    }

    #[test]
    fn test_empty_type_means_classroom() {
        assert!(Room::classroom("R1", 10).is_type(""));
        assert!(!Room::lab("R2", 10).is_type(""));
    }

    #[test]
    fn test_deserialize_defaults() {
        let r: Room = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(r.id, "3");
        assert_eq!(r.capacity, 0);
        assert_eq!(r.room_type, "classroom");
        assert_eq!(r.display_number(), "3");

        let r: Room =
            serde_json::from_str(r#"{"id": "R2", "number": 101, "capacity": "40", "type": "Lab"}"#)
                .unwrap();
        assert_eq!(r.display_number(), "101");
        assert_eq!(r.capacity, 40);
        assert!(r.is_type("lab"));
    }
}
