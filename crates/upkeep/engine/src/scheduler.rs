//! Maintenance scheduler: an append-only list of maintenance windows derived
//! from failure predictions.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::info;
use upkeep_types::{FailurePrediction, MaintenanceSchedule, MaintenanceType, RiskLevel, ScheduleId};

use crate::config::SchedulerConfig;

#[derive(Debug, Default)]
pub struct MaintenanceScheduler {
    config: SchedulerConfig,
    entries: RwLock<Vec<MaintenanceSchedule>>,
}

impl MaintenanceScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Create and append a schedule entry `lead_days` ahead of the predicted
    /// failure. Every call appends, including repeats for the same device.
    pub fn add_from_prediction(&self, prediction: &FailurePrediction) -> MaintenanceSchedule {
        let high = prediction.risk_level == RiskLevel::High;
        let schedule = MaintenanceSchedule {
            id: ScheduleId::generate(),
            device_id: prediction.device_id.clone(),
            scheduled_date: Duration::try_days(self.config.lead_days)
                .and_then(|lead| prediction.predicted_failure_date.checked_sub_signed(lead))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            maintenance_type: MaintenanceType::Predictive,
            priority: if high { 1 } else { 2 },
            estimated_duration_hours: if high {
                self.config.high_risk_duration_hours
            } else {
                self.config.default_duration_hours
            },
            risk_level: prediction.risk_level,
            created_at: Utc::now(),
        };

        info!(
            device = %schedule.device_id,
            schedule_id = %schedule.id,
            scheduled_date = %schedule.scheduled_date,
            priority = schedule.priority,
            risk = %schedule.risk_level,
            "maintenance scheduled"
        );

        self.entries.write().push(schedule.clone());
        schedule
    }

    /// Entries due within `days` of `now`, highest priority first.
    ///
    /// Overdue entries are included. Entries of equal priority keep their
    /// insertion order.
    pub fn upcoming(&self, days: u32, now: DateTime<Utc>) -> Vec<MaintenanceSchedule> {
        let cutoff = now
            .checked_add_signed(Duration::days(i64::from(days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut due: Vec<_> = self
            .entries
            .read()
            .iter()
            .filter(|s| s.scheduled_date <= cutoff)
            .cloned()
            .collect();
        due.sort_by_key(|s| s.priority);
        due
    }

    /// Copy of every entry, in insertion order.
    pub fn entries(&self) -> Vec<MaintenanceSchedule> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}
