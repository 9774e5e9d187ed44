//! Per-sample analysis results: anomalies, failure predictions, health scores.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::DeviceId;

// ── Anomalies ───────────────────────────────────────────────────────────

/// Severity of an anomaly, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// Outcome of z-score anomaly detection for one sample.
///
/// `is_anomaly` is true exactly when `affected_metrics` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    pub device_id: DeviceId,
    pub timestamp: DateTime<Utc>,
    pub is_anomaly: bool,
    /// Max z-score over affected metrics, normalized by the threshold and clamped to `[0, 1]`.
    pub anomaly_score: f64,
    pub affected_metrics: BTreeSet<String>,
    pub severity: Severity,
    pub description: String,
}

impl AnomalyResult {
    /// A non-anomalous result with score 0.
    pub fn normal(
        device_id: DeviceId,
        timestamp: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            device_id,
            timestamp,
            is_anomaly: false,
            anomaly_score: 0.0,
            affected_metrics: BTreeSet::new(),
            severity: Severity::Low,
            description: description.into(),
        }
    }
}

// ── Failure prediction ──────────────────────────────────────────────────

/// Risk attached to a failure prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

/// Extrapolated failure date for a degrading device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailurePrediction {
    pub device_id: DeviceId,
    pub predicted_failure_date: DateTime<Utc>,
    /// In `[0, 0.95]`.
    pub confidence: f64,
    pub failure_type: String,
    pub recommended_action: String,
    pub risk_level: RiskLevel,
    /// Metric whose degradation drove the prediction.
    pub critical_metric: String,
    /// Latest degradation ratio of the critical metric.
    pub degradation: f64,
    /// Average change in degradation per sample.
    pub degradation_rate: f64,
    pub days_to_failure: i64,
}

// ── Health ──────────────────────────────────────────────────────────────

/// Direction a device's health is heading, derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthTrend {
    Improving,
    Stable,
    Degrading,
}

/// Composite 0–100 health score for a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceHealthScore {
    pub device_id: DeviceId,
    pub overall_score: u8,
    pub component_scores: BTreeMap<String, f64>,
    pub trend: HealthTrend,
    pub last_updated: DateTime<Utc>,
}

// ── Combined ────────────────────────────────────────────────────────────

/// Everything `process` returns for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessOutcome {
    pub anomaly: AnomalyResult,
    pub health: DeviceHealthScore,
    pub prediction: Option<FailurePrediction>,
}
