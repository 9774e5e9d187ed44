//! Degradation tracker: per-device, per-metric series of normalized
//! degradation ratios `(baseline - value) / baseline`.
//!
//! Series are bounded with the same ring buffer as the metric history, so a
//! long-running device keeps only its most recent ratios.

use std::collections::BTreeMap;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use upkeep_types::DeviceId;

use crate::config::DEFAULT_WINDOW_CAPACITY;
use crate::error::{check_baseline, EngineError, EngineResult};
use crate::window::RingBuffer;

/// Read-only summary of one series, as consumed by the predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationSnapshot {
    pub metric: String,
    pub first: f64,
    pub last: f64,
    pub len: usize,
}

/// Tracks degradation ratios over time for every device.
pub struct DegradationTracker {
    capacity: usize,
    devices: DashMap<DeviceId, BTreeMap<String, RingBuffer<f64>>>,
}

impl DegradationTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            devices: DashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }

    /// Normalized degradation of `value` relative to `baseline`.
    pub fn ratio(metric: &str, value: f64, baseline: f64) -> EngineResult<f64> {
        check_baseline(metric, baseline)?;
        Ok((baseline - value) / baseline)
    }

    /// Append the degradation ratio for one reading and return it.
    ///
    /// Nothing is recorded when the baseline is zero or non-finite, or the
    /// value is non-finite.
    pub fn update(
        &self,
        device: &DeviceId,
        metric: &str,
        value: f64,
        baseline: f64,
    ) -> EngineResult<f64> {
        if !value.is_finite() {
            return Err(EngineError::InvalidMetricValue {
                device: device.to_string(),
                metric: metric.to_string(),
                value,
            });
        }
        let ratio = Self::ratio(metric, value, baseline)?;

        let mut series = self.devices.entry(device.clone()).or_default();
        series
            .entry(metric.to_string())
            .or_insert_with(|| RingBuffer::new(self.capacity))
            .push(ratio);
        Ok(ratio)
    }

    /// Summaries of every series for a device, in metric-name order.
    pub fn snapshot(&self, device: &DeviceId) -> Vec<DegradationSnapshot> {
        let Some(series) = self.devices.get(device) else {
            return Vec::new();
        };
        let snapshots = series
            .iter()
            .filter_map(|(metric, values)| {
                Some(DegradationSnapshot {
                    metric: metric.clone(),
                    first: *values.oldest()?,
                    last: *values.latest()?,
                    len: values.len(),
                })
            })
            .collect();
        snapshots
    }

    /// Ordered copy of one series, oldest first.
    pub fn series(&self, device: &DeviceId, metric: &str) -> Option<Vec<f64>> {
        self.devices
            .get(device)
            .and_then(|s| s.get(metric).map(RingBuffer::to_vec))
    }

    pub fn series_len(&self, device: &DeviceId, metric: &str) -> usize {
        self.devices
            .get(device)
            .and_then(|s| s.get(metric).map(RingBuffer::len))
            .unwrap_or(0)
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for DegradationTracker {
    fn default() -> Self {
        Self::with_defaults()
    }
}
