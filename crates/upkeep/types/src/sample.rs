//! Telemetry input types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::DeviceId;

/// Metric name → observed value.
pub type MetricReadings = BTreeMap<String, f64>;

/// Metric name → healthy reference value, supplied by the caller per call.
pub type Baselines = BTreeMap<String, f64>;

/// One telemetry sample from one device.
///
/// Immutable once received; this is the unit the engine is invoked with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub device_id: DeviceId,
    pub timestamp: DateTime<Utc>,
    pub metrics: MetricReadings,
}

impl TelemetrySample {
    pub fn new(
        device_id: impl Into<DeviceId>,
        timestamp: DateTime<Utc>,
        metrics: MetricReadings,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            timestamp,
            metrics,
        }
    }

    /// Build a sample from `(name, value)` pairs.
    pub fn from_pairs<'a>(
        device_id: impl Into<DeviceId>,
        timestamp: DateTime<Utc>,
        pairs: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Self {
        let metrics = pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        Self::new(device_id, timestamp, metrics)
    }

    /// Value of a single metric, if present.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}
