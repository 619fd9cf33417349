//! Weekly slot grid.
//!
//! The timetable domain is a fixed grid of 5 week-days × 8 one-hour
//! time ranges between 09:00 and 17:00 (40 slots per week).
//!
//! # Ordering
//! Slots order day-major, then time-minor. Because time labels are
//! zero-padded `HH:MM-HH:MM` strings, lexical label order and
//! chronological order coincide.
//!
//! # Labels
//! Days and times serialize as their display labels (`"Monday"`,
//! `"09:00-10:00"`). The token form used by delimited availability
//! lists is `"<Day>_<time>"`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of slots in the weekly grid.
pub const SLOTS_PER_WEEK: usize = Day::ALL.len() * TimeSlot::ALL.len();

/// A teaching day (Monday..Friday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// All teaching days in week order.
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Position within the week (Monday = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Day {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|d| d.label() == s)
            .ok_or_else(|| ParseSlotError(s.to_string()))
    }
}

/// A one-hour teaching period, identified by its starting hour.
///
/// Only the eight periods from 09:00 to 16:00 exist; construct via
/// [`TimeSlot::ALL`] or by parsing a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot(u8);

impl TimeSlot {
    /// First starting hour of the teaching day.
    pub const FIRST_HOUR: u8 = 9;

    /// All periods in chronological order.
    pub const ALL: [TimeSlot; 8] = [
        TimeSlot(9),
        TimeSlot(10),
        TimeSlot(11),
        TimeSlot(12),
        TimeSlot(13),
        TimeSlot(14),
        TimeSlot(15),
        TimeSlot(16),
    ];

    /// Starting hour (9..=16).
    #[inline]
    pub fn start_hour(self) -> u8 {
        self.0
    }

    /// Position within the day (09:00 = 0).
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0 - Self::FIRST_HOUR)
    }

    /// Display label, e.g. `"09:00-10:00"`.
    pub fn label(self) -> String {
        format!("{:02}:00-{:02}:00", self.0, self.0 + 1)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.0, self.0 + 1)
    }
}

impl FromStr for TimeSlot {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeSlot::ALL
            .into_iter()
            .find(|t| t.label() == s)
            .ok_or_else(|| ParseSlotError(s.to_string()))
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// A (day, time) cell of the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    /// Teaching day.
    pub day: Day,
    /// Teaching period.
    pub time: TimeSlot,
}

impl Slot {
    /// Creates a slot.
    pub fn new(day: Day, time: TimeSlot) -> Self {
        Self { day, time }
    }

    /// Every slot of the week, day-major.
    pub fn all() -> Vec<Slot> {
        Day::ALL
            .into_iter()
            .flat_map(|day| TimeSlot::ALL.into_iter().map(move |time| Slot::new(day, time)))
            .collect()
    }

    /// Dense index in `0..SLOTS_PER_WEEK`, day-major.
    #[inline]
    pub fn index(self) -> usize {
        self.day.index() * TimeSlot::ALL.len() + self.time.index()
    }

    /// Token form `"<Day>_<time>"`.
    pub fn token(self) -> String {
        format!("{}_{}", self.day, self.time)
    }

    /// Parses the token form `"<Day>_<time>"`.
    pub fn parse_token(token: &str) -> Result<Self, ParseSlotError> {
        let (day, time) = token
            .split_once('_')
            .ok_or_else(|| ParseSlotError(token.to_string()))?;
        Ok(Slot::new(day.parse()?, time.parse()?))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.time)
    }
}

/// A day, time or slot label outside the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a slot of the weekly grid: '{0}'")]
pub struct ParseSlotError(pub String);
