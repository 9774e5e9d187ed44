//! Maintenance schedule entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::RiskLevel;
use crate::ids::{DeviceId, ScheduleId};

/// Kind of maintenance work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceType {
    Preventive,
    Corrective,
    Predictive,
}

impl fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Preventive => "preventive",
            Self::Corrective => "corrective",
            Self::Predictive => "predictive",
        };
        f.write_str(s)
    }
}

/// A planned maintenance window.
///
/// Created only by the scheduler from a failure prediction and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    pub id: ScheduleId,
    pub device_id: DeviceId,
    pub scheduled_date: DateTime<Utc>,
    pub maintenance_type: MaintenanceType,
    /// 1 is the highest priority.
    pub priority: u8,
    pub estimated_duration_hours: u32,
    /// Risk of the prediction this entry was derived from.
    pub risk_level: RiskLevel,
    pub created_at: DateTime<Utc>,
}
