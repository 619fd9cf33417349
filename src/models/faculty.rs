//! Faculty and availability model.
//!
//! Availability arrives in one of two shapes:
//! - a per-day map: `{"Monday": ["09:00-10:00", "10:00-11:00"]}`
//! - a delimited token list: `"Monday_09:00-10:00, Tuesday_14:00-15:00"`
//!
//! Both normalize at ingestion into [`Availability`], so checks never
//! dispatch on representation. Absent, `null` or empty availability
//! means the faculty member is always available; so does any other
//! unrecognized shape.
//!
//! Entries naming a day or time outside the weekly grid are dropped:
//! they could never match a slot anyway.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::coerce;
use super::slot::{Day, Slot};

/// A faculty member who teaches courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faculty {
    /// Unique faculty identifier.
    #[serde(deserialize_with = "coerce::id")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Weekly availability.
    #[serde(default)]
    pub availability: Availability,
}

/// Normalized weekly availability.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<AvailabilitySpec>", into = "Option<PerDayMap>")]
pub enum Availability {
    /// No availability data: available in every slot.
    #[default]
    Always,
    /// Available only in the listed slots.
    Within(BTreeSet<Slot>),
}

type PerDayMap = BTreeMap<String, Vec<String>>;

/// Raw availability as stored in records.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AvailabilitySpec {
    /// Day label → permitted time labels.
    PerDay(PerDayMap),
    /// Comma-delimited `"<Day>_<time>"` tokens.
    TokenList(String),
    /// Any other shape; treated as unconstrained.
    Unrecognized(IgnoredAny),
}

impl From<Option<AvailabilitySpec>> for Availability {
    fn from(raw: Option<AvailabilitySpec>) -> Self {
        match raw {
            None | Some(AvailabilitySpec::Unrecognized(_)) => Availability::Always,
            Some(AvailabilitySpec::PerDay(map)) if map.is_empty() => Availability::Always,
            Some(AvailabilitySpec::TokenList(s)) if s.is_empty() => Availability::Always,
            Some(AvailabilitySpec::PerDay(map)) => Availability::from_per_day(&map),
            Some(AvailabilitySpec::TokenList(s)) => Availability::from_tokens(&s),
        }
    }
}

impl From<Availability> for Option<PerDayMap> {
    /// Restricted availability serializes as a map listing every day,
    /// so an all-empty restriction stays distinguishable from `Always`.
    fn from(availability: Availability) -> Self {
        match availability {
            Availability::Always => None,
            Availability::Within(slots) => {
                let mut map: PerDayMap = Day::ALL
                    .iter()
                    .map(|d| (d.label().to_string(), Vec::new()))
                    .collect();
                for slot in slots {
                    map.entry(slot.day.label().to_string())
                        .or_default()
                        .push(slot.time.label());
                }
                Some(map)
            }
        }
    }
}

impl Availability {
    /// Builds availability from a per-day map of time labels.
    pub fn from_per_day(map: &PerDayMap) -> Self {
        let slots = map
            .iter()
            .filter_map(|(day, times)| Some((day.parse::<Day>().ok()?, times)))
            .flat_map(|(day, times)| {
                times
                    .iter()
                    .filter_map(move |t| Some(Slot::new(day, t.parse().ok()?)))
            })
            .collect();
        Availability::Within(slots)
    }

    /// Builds availability from a comma-delimited token list.
    pub fn from_tokens(tokens: &str) -> Self {
        let slots = tokens
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .filter_map(|t| Slot::parse_token(t).ok())
            .collect();
        Availability::Within(slots)
    }

    /// Restricts availability to the given slots.
    pub fn within(slots: impl IntoIterator<Item = Slot>) -> Self {
        Availability::Within(slots.into_iter().collect())
    }

    /// Whether the slot is permitted.
    pub fn permits(&self, slot: Slot) -> bool {
        match self {
            Availability::Always => true,
            Availability::Within(slots) => slots.contains(&slot),
        }
    }

    /// Number of permitted slots in the week.
    pub fn slot_count(&self) -> usize {
        match self {
            Availability::Always => super::SLOTS_PER_WEEK,
            Availability::Within(slots) => slots.len(),
        }
    }
}

impl Faculty {
    /// Creates an always-available faculty member.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            availability: Availability::Always,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the availability.
    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }
}
