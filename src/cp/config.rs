//! Search bounds for the constraint solver.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default node budget.
pub const DEFAULT_MAX_NODES: u64 = 200_000;

/// Bounds on a single CSP search.
///
/// The search stops with an explicit error when it expands `max_nodes`
/// assignments, or when the deadline passes. The deadline is either the
/// absolute instant set with [`CspConfig::with_deadline`] or `timeout`
/// measured from the start of the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CspConfig {
    /// Maximum number of value assignments tried.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: u64,
    /// Wall-clock budget in milliseconds.
    #[serde(default, rename = "timeout_ms", with = "millis")]
    pub timeout: Option<Duration>,
    /// Absolute deadline supplied by the caller.
    #[serde(skip)]
    pub deadline: Option<Instant>,
}

fn default_max_nodes() -> u64 {
    DEFAULT_MAX_NODES
}

impl Default for CspConfig {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            timeout: None,
            deadline: None,
        }
    }
}

impl CspConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the node budget.
    pub fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Sets a wall-clock budget measured from search start.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Effective deadline for a search starting at `start`: the earlier of
    /// the absolute deadline and `start + timeout`.
    pub fn deadline_from(&self, start: Instant) -> Option<Instant> {
        let relative = self.timeout.and_then(|t| start.checked_add(t));
        match (self.deadline, relative) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = CspConfig::default();
        assert_eq!(c.max_nodes, DEFAULT_MAX_NODES);
        assert_eq!(c.deadline_from(Instant::now()), None);

        let c: CspConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(c, CspConfig::default());
    }

    #[test]
    fn test_serde_timeout_millis() {
        let c: CspConfig = serde_json::from_str(r#"{"max_nodes": 50, "timeout_ms": 1500}"#).unwrap();
        assert_eq!(c.max_nodes, 50);
        assert_eq!(c.timeout, Some(Duration::from_millis(1500)));

        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["timeout_ms"], 1500);
    }

    #[test]
    fn test_deadline_takes_earliest() {
        let start = Instant::now();
        let soon = start + Duration::from_millis(10);

        let c = CspConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_deadline(soon);
        assert_eq!(c.deadline_from(start), Some(soon));

        let c = CspConfig::new().with_timeout(Duration::from_millis(5));
        assert_eq!(c.deadline_from(start), Some(start + Duration::from_millis(5)));
    }
}
