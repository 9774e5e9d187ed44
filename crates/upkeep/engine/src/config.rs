//! Engine configuration.
//!
//! Defaults carry the standard detection and prediction thresholds; every section
//! is `#[serde(default)]` so partial config files only override what they name.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Default capacity of a per-metric history window.
pub const DEFAULT_WINDOW_CAPACITY: usize = 1000;

/// Default minimum prior samples before a metric is z-scored.
pub const DEFAULT_MIN_HISTORY: usize = 10;

/// Default z-score threshold.
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Days of lead time between a scheduled window and the predicted failure.
pub const DEFAULT_LEAD_DAYS: i64 = 7;

/// Largest day offset accepted for the prediction horizon and the lead time.
pub const MAX_DAY_SPAN: i64 = 36_500;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub anomaly: AnomalyConfig,

    #[serde(default)]
    pub degradation: DegradationConfig,

    #[serde(default)]
    pub prediction: PredictionConfig,

    #[serde(default)]
    pub health: HealthConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Whether detection sees the window before or after the current sample is recorded.
    #[serde(default)]
    pub detection_order: DetectionOrder,
}

impl EngineConfig {
    /// Check that every section is internally consistent.
    pub fn validate(&self) -> EngineResult<()> {
        if self.history.capacity == 0 {
            return Err(invalid("history.capacity must be at least 1"));
        }
        if self.degradation.capacity == 0 {
            return Err(invalid("degradation.capacity must be at least 1"));
        }
        if self.anomaly.min_history == 0 {
            return Err(invalid("anomaly.min_history must be at least 1"));
        }
        if !(self.anomaly.z_threshold.is_finite() && self.anomaly.z_threshold > 0.0) {
            return Err(invalid("anomaly.z_threshold must be positive"));
        }
        if !(self.anomaly.medium_ratio <= self.anomaly.high_ratio
            && self.anomaly.high_ratio <= self.anomaly.critical_ratio)
        {
            return Err(invalid(
                "anomaly severity ratios must satisfy medium <= high <= critical",
            ));
        }
        let p = &self.prediction;
        if p.min_series_len < 2 {
            return Err(invalid("prediction.min_series_len must be at least 2"));
        }
        if !(p.confidence_cap > 0.0 && p.confidence_cap <= 1.0) {
            return Err(invalid("prediction.confidence_cap must be in (0, 1]"));
        }
        if p.high_risk_days > p.medium_risk_days {
            return Err(invalid(
                "prediction.high_risk_days must not exceed prediction.medium_risk_days",
            ));
        }
        if !(1..=MAX_DAY_SPAN).contains(&p.max_horizon_days) {
            return Err(invalid("prediction.max_horizon_days must be in 1..=36500"));
        }
        if self.health.neutral_score > 100 {
            return Err(invalid("health.neutral_score must be in 0..=100"));
        }
        if !(0..=MAX_DAY_SPAN).contains(&self.scheduler.lead_days) {
            return Err(invalid("scheduler.lead_days must be in 0..=36500"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> EngineError {
    EngineError::InvalidConfig(msg.to_string())
}

/// Order of history recording and anomaly detection within `process`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionOrder {
    /// Detect against prior history, then record the sample.
    #[default]
    DetectThenRecord,
    /// Record the sample first so it is part of its own baseline.
    RecordThenDetect,
}

/// History store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Values retained per (device, metric).
    #[serde(default = "default_window_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_WINDOW_CAPACITY,
        }
    }
}

/// Anomaly detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyConfig {
    /// Minimum window length before a metric is judged.
    #[serde(default = "default_min_history")]
    pub min_history: usize,

    /// A metric is affected when its z-score exceeds this.
    #[serde(default = "default_z_threshold")]
    pub z_threshold: f64,

    /// `max(z) / threshold` above which severity is critical.
    #[serde(default = "default_critical_ratio")]
    pub critical_ratio: f64,

    /// `max(z) / threshold` above which severity is high.
    #[serde(default = "default_high_ratio")]
    pub high_ratio: f64,

    /// `max(z) / threshold` above which severity is medium.
    #[serde(default = "default_medium_ratio")]
    pub medium_ratio: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            min_history: DEFAULT_MIN_HISTORY,
            z_threshold: DEFAULT_Z_THRESHOLD,
            critical_ratio: 2.0,
            high_ratio: 1.5,
            medium_ratio: 1.0,
        }
    }
}

/// Degradation tracker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationConfig {
    /// Ratios retained per (device, metric).
    #[serde(default = "default_window_capacity")]
    pub capacity: usize,
}

impl Default for DegradationConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_WINDOW_CAPACITY,
        }
    }
}

/// Failure predictor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionConfig {
    #[serde(default = "default_min_series_len")]
    pub min_series_len: usize,

    /// Current degradation must reach this before anything is predicted.
    #[serde(default = "default_degradation_floor")]
    pub degradation_floor: f64,

    /// Degradation ratio treated as failure.
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: f64,

    #[serde(default = "default_confidence_base")]
    pub confidence_base: f64,

    #[serde(default = "default_confidence_cap")]
    pub confidence_cap: f64,

    /// Fewer days to failure than this is high risk.
    #[serde(default = "default_high_risk_days")]
    pub high_risk_days: i64,

    /// Fewer days to failure than this is medium risk.
    #[serde(default = "default_medium_risk_days")]
    pub medium_risk_days: i64,

    /// Extrapolations further out are clamped to this many days.
    #[serde(default = "default_max_horizon_days")]
    pub max_horizon_days: i64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            min_series_len: default_min_series_len(),
            degradation_floor: default_degradation_floor(),
            failure_threshold: default_failure_threshold(),
            confidence_base: default_confidence_base(),
            confidence_cap: default_confidence_cap(),
            high_risk_days: default_high_risk_days(),
            medium_risk_days: default_medium_risk_days(),
            max_horizon_days: default_max_horizon_days(),
        }
    }
}

/// Health scorer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    #[serde(default = "default_improving_above")]
    pub improving_above: f64,

    #[serde(default = "default_stable_above")]
    pub stable_above: f64,

    /// Score reported when no metric has a baseline.
    #[serde(default = "default_neutral_score")]
    pub neutral_score: u8,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            improving_above: default_improving_above(),
            stable_above: default_stable_above(),
            neutral_score: default_neutral_score(),
        }
    }
}

/// Maintenance scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Days between the scheduled window and the predicted failure.
    #[serde(default = "default_lead_days")]
    pub lead_days: i64,

    /// Horizon used by `upcoming` queries that don't name one.
    #[serde(default = "default_horizon_days")]
    pub default_horizon_days: u32,

    #[serde(default = "default_high_risk_duration")]
    pub high_risk_duration_hours: u32,

    #[serde(default = "default_duration")]
    pub default_duration_hours: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lead_days: default_lead_days(),
            default_horizon_days: default_horizon_days(),
            high_risk_duration_hours: default_high_risk_duration(),
            default_duration_hours: default_duration(),
        }
    }
}

// Default value helpers
fn default_window_capacity() -> usize {
    DEFAULT_WINDOW_CAPACITY
}

fn default_min_history() -> usize {
    DEFAULT_MIN_HISTORY
}

fn default_z_threshold() -> f64 {
    DEFAULT_Z_THRESHOLD
}

fn default_critical_ratio() -> f64 {
    2.0
}

fn default_high_ratio() -> f64 {
    1.5
}

fn default_medium_ratio() -> f64 {
    1.0
}

fn default_min_series_len() -> usize {
    5
}

fn default_degradation_floor() -> f64 {
    0.1
}

fn default_failure_threshold() -> f64 {
    0.3
}

fn default_confidence_base() -> f64 {
    0.5
}

fn default_confidence_cap() -> f64 {
    0.95
}

fn default_high_risk_days() -> i64 {
    7
}

fn default_medium_risk_days() -> i64 {
    30
}

fn default_max_horizon_days() -> i64 {
    MAX_DAY_SPAN
}

fn default_improving_above() -> f64 {
    80.0
}

fn default_stable_above() -> f64 {
    60.0
}

fn default_neutral_score() -> u8 {
    50
}

fn default_lead_days() -> i64 {
    DEFAULT_LEAD_DAYS
}

fn default_horizon_days() -> u32 {
    30
}

fn default_high_risk_duration() -> u32 {
    4
}

fn default_duration() -> u32 {
    2
}
