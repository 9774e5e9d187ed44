//! Strongly-typed identifiers for devices and maintenance schedules.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a monitored device.
///
/// Device ids come from the ingestion side and are opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Unique identifier for a maintenance schedule entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId(Uuid);

impl ScheduleId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sched:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_is_transparent_in_json() {
        let id = DeviceId::from("pump-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"pump-7\"");
        let parsed: DeviceId = serde_json::from_str("\"pump-7\"").unwrap();
        assert_eq!(parsed, id);
        assert_eq!(id.to_string(), "pump-7");
    }

    #[test]
    fn schedule_ids_are_unique() {
        let a = ScheduleId::generate();
        let b = ScheduleId::generate();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("sched:"));
    }
}
