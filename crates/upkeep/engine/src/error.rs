use thiserror::Error;

/// Errors from the maintenance engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid baseline for metric {metric}: {value} (must be finite and non-zero)")]
    InvalidBaseline { metric: String, value: f64 },

    #[error("invalid value for metric {metric} on device {device}: {value} (must be finite)")]
    InvalidMetricValue {
        device: String,
        metric: String,
        value: f64,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("event sink error: {0}")]
    Sink(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Serialization(e.to_string())
    }
}

/// Convenience type alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;

/// Reject baselines that would make a ratio meaningless.
pub(crate) fn check_baseline(metric: &str, baseline: f64) -> EngineResult<()> {
    if !baseline.is_finite() || baseline == 0.0 {
        return Err(EngineError::InvalidBaseline {
            metric: metric.to_string(),
            value: baseline,
        });
    }
    Ok(())
}
