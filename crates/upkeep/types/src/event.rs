//! Structured events the engine publishes for notification and storage
//! collaborators.

use serde::{Deserialize, Serialize};

use crate::analysis::{AnomalyResult, FailurePrediction};
use crate::ids::DeviceId;
use crate::schedule::MaintenanceSchedule;

/// An engine output worth telling the outside world about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    AnomalyDetected(AnomalyResult),
    FailurePredicted(FailurePrediction),
    MaintenanceScheduled(MaintenanceSchedule),
}

impl EngineEvent {
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::AnomalyDetected(a) => &a.device_id,
            Self::FailurePredicted(p) => &p.device_id,
            Self::MaintenanceScheduled(s) => &s.device_id,
        }
    }

    /// Stable name of the event kind (matches the serialized `type` tag).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AnomalyDetected(_) => "anomaly_detected",
            Self::FailurePredicted(_) => "failure_predicted",
            Self::MaintenanceScheduled(_) => "maintenance_scheduled",
        }
    }
}
