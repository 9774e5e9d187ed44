//! Failure prediction by linear extrapolation of degradation.
//!
//! The critical metric is the one with the largest latest degradation among
//! series long enough to trust. Its average rate of change
//! `(last - first) / len` is extrapolated to the failure threshold:
//!
//! ```text
//!   days = round((failure_threshold - degradation) / rate), at least 1
//! ```
//!
//! This is a two-point extrapolation, not a regression fit; it keeps every
//! prediction explainable from three numbers.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use upkeep_types::{DeviceId, FailurePrediction, RiskLevel};

use crate::config::PredictionConfig;
use crate::degradation::{DegradationSnapshot, DegradationTracker};

pub const IMMEDIATE_ACTION: &str = "Immediate maintenance";
pub const PLANNED_ACTION: &str = "Plan maintenance";

#[derive(Debug, Clone, Default)]
pub struct FailurePredictor {
    config: PredictionConfig,
}

impl FailurePredictor {
    pub fn new(config: PredictionConfig) -> Self {
        Self { config }
    }

    /// Predict failure for a device from its current degradation series.
    pub fn predict(
        &self,
        device: &DeviceId,
        tracker: &DegradationTracker,
        now: DateTime<Utc>,
    ) -> Option<FailurePrediction> {
        self.predict_from_snapshots(device, &tracker.snapshot(device), now)
    }

    /// Predict failure from already-captured series summaries.
    pub fn predict_from_snapshots(
        &self,
        device: &DeviceId,
        series: &[DegradationSnapshot],
        now: DateTime<Utc>,
    ) -> Option<FailurePrediction> {
        let critical = self.critical_series(series)?;
        let degradation = critical.last;
        let rate = (critical.last - critical.first) / critical.len as f64;

        if degradation < self.config.degradation_floor || rate <= 0.0 {
            debug!(
                device = %device,
                metric = %critical.metric,
                degradation,
                rate,
                "device not meaningfully degrading"
            );
            return None;
        }

        let days = self.days_to_failure(degradation, rate);
        let risk_level = self.risk_for(days);
        let recommended_action = if days < self.config.high_risk_days {
            IMMEDIATE_ACTION
        } else {
            PLANNED_ACTION
        };

        Some(FailurePrediction {
            device_id: device.clone(),
            predicted_failure_date: Duration::try_days(days)
                .and_then(|offset| now.checked_add_signed(offset))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            confidence: (self.config.confidence_base + degradation).min(self.config.confidence_cap),
            failure_type: format!("{} degradation", critical.metric),
            recommended_action: recommended_action.to_string(),
            risk_level,
            critical_metric: critical.metric.clone(),
            degradation,
            degradation_rate: rate,
            days_to_failure: days,
        })
    }

    /// Risk level for a number of days until failure.
    pub fn risk_for(&self, days: i64) -> RiskLevel {
        if days < self.config.high_risk_days {
            RiskLevel::High
        } else if days < self.config.medium_risk_days {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    /// Largest latest degradation among series of sufficient length; the
    /// first metric in name order wins ties.
    fn critical_series<'a>(
        &self,
        series: &'a [DegradationSnapshot],
    ) -> Option<&'a DegradationSnapshot> {
        let mut best: Option<&DegradationSnapshot> = None;
        for s in series.iter().filter(|s| s.len >= self.config.min_series_len) {
            match best {
                Some(b) if s.last <= b.last => {}
                _ => best = Some(s),
            }
        }
        best
    }

    fn days_to_failure(&self, degradation: f64, rate: f64) -> i64 {
        let raw = ((self.config.failure_threshold - degradation) / rate).round();
        // `as` saturates; the failure date itself saturates at chrono's range
        (raw as i64).min(self.config.max_horizon_days).max(1)
    }
}
