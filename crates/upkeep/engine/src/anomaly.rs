//! Z-score anomaly detection against each device's own history.
//!
//! ## Rules
//!
//! - A device with no history yields a normal result described as `"No data"`.
//! - A metric is judged only once its window holds `min_history` values.
//! - `z = |value - mean| / std_dev`, with a zero standard deviation floored to 1.
//! - A metric is affected when `z > z_threshold`.
//! - Score and severity both derive from `max(z) / z_threshold` over affected
//!   metrics; the score is clamped to 1, severity uses the unclamped ratio.

use std::collections::BTreeSet;

use tracing::trace;
use upkeep_types::{AnomalyResult, Severity, TelemetrySample};

use crate::config::AnomalyConfig;
use crate::history::HistoryStore;

/// Description used when the device has never been seen.
pub const NO_DATA: &str = "No data";

/// Stateless z-score detector; all state lives in the [`HistoryStore`].
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
}

impl AnomalyDetector {
    pub fn new(config: AnomalyConfig) -> Self {
        Self { config }
    }

    /// Judge a sample against the device's current history windows.
    pub fn detect(&self, sample: &TelemetrySample, history: &HistoryStore) -> AnomalyResult {
        let device = &sample.device_id;
        if !history.contains_device(device) {
            return AnomalyResult::normal(device.clone(), sample.timestamp, NO_DATA);
        }

        let mut affected = BTreeSet::new();
        let mut max_ratio = 0.0f64;
        let mut max_z = 0.0f64;

        for (metric, &value) in &sample.metrics {
            let stats = match history.window_stats(device, metric) {
                Some(s) if s.count >= self.config.min_history => s,
                other => {
                    trace!(
                        device = %device,
                        metric = %metric,
                        samples = other.map(|s| s.count).unwrap_or(0),
                        "insufficient history, skipping metric"
                    );
                    continue;
                }
            };

            let std_dev = if stats.std_dev < f64::EPSILON {
                1.0
            } else {
                stats.std_dev
            };
            let z = (value - stats.mean).abs() / std_dev;
            if z > self.config.z_threshold {
                affected.insert(metric.clone());
                let ratio = z / self.config.z_threshold;
                if ratio > max_ratio {
                    max_ratio = ratio;
                    max_z = z;
                }
            }
        }

        if affected.is_empty() {
            return AnomalyResult::normal(
                device.clone(),
                sample.timestamp,
                "No anomalies detected",
            );
        }

        let description = format!(
            "Anomalous readings in {} (max z-score {:.2})",
            affected.iter().cloned().collect::<Vec<_>>().join(", "),
            max_z
        );

        AnomalyResult {
            device_id: device.clone(),
            timestamp: sample.timestamp,
            is_anomaly: true,
            anomaly_score: max_ratio.min(1.0),
            affected_metrics: affected,
            severity: self.severity_for(max_ratio),
            description,
        }
    }

    /// Map an unclamped `max(z) / threshold` ratio to a severity.
    pub fn severity_for(&self, ratio: f64) -> Severity {
        if ratio > self.config.critical_ratio {
            Severity::Critical
        } else if ratio > self.config.high_ratio {
            Severity::High
        } else if ratio > self.config.medium_ratio {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }
}
