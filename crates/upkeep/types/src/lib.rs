//! # upkeep-types
//!
//! Data model shared by the Upkeep predictive-maintenance engine and its
//! ingestion/notification collaborators.
//!
//! - [`TelemetrySample`]: what the engine consumes
//! - [`AnomalyResult`], [`DeviceHealthScore`], [`FailurePrediction`]: what `process` returns
//! - [`MaintenanceSchedule`]: what the scheduler keeps
//! - [`EngineEvent`]: what sinks receive

#![deny(unsafe_code)]

pub mod analysis;
pub mod event;
pub mod ids;
pub mod sample;
pub mod schedule;

pub use analysis::{
    AnomalyResult, DeviceHealthScore, FailurePrediction, HealthTrend, ProcessOutcome, RiskLevel,
    Severity,
};
pub use event::EngineEvent;
pub use ids::{DeviceId, ScheduleId};
pub use sample::{Baselines, MetricReadings, TelemetrySample};
pub use schedule::{MaintenanceSchedule, MaintenanceType};
