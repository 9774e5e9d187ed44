//! Composite health scoring against baselines.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use upkeep_types::{Baselines, DeviceHealthScore, DeviceId, HealthTrend, MetricReadings};

use crate::config::HealthConfig;
use crate::error::{check_baseline, EngineResult};

/// Stateless 0-100 scorer.
#[derive(Debug, Clone, Default)]
pub struct HealthScorer {
    config: HealthConfig,
}

impl HealthScorer {
    pub fn new(config: HealthConfig) -> Self {
        Self { config }
    }

    /// Score every metric that has a baseline and average them.
    ///
    /// A metric scores `min(100, value / baseline * 100)`. Readings above
    /// baseline cap at 100; readings of the opposite sign pull the average
    /// down and the overall score is clamped into `0..=100`.
    pub fn calculate(
        &self,
        device: &DeviceId,
        metrics: &MetricReadings,
        baselines: &Baselines,
        now: DateTime<Utc>,
    ) -> EngineResult<DeviceHealthScore> {
        let mut component_scores = BTreeMap::new();
        for (metric, &value) in metrics {
            let Some(&baseline) = baselines.get(metric) else {
                continue;
            };
            check_baseline(metric, baseline)?;
            component_scores.insert(metric.clone(), (value / baseline * 100.0).min(100.0));
        }

        let overall_score = if component_scores.is_empty() {
            self.config.neutral_score
        } else {
            let mean = component_scores.values().sum::<f64>() / component_scores.len() as f64;
            mean.round().clamp(0.0, 100.0) as u8
        };

        Ok(DeviceHealthScore {
            device_id: device.clone(),
            overall_score,
            component_scores,
            trend: self.trend_for(overall_score),
            last_updated: now,
        })
    }

    pub fn trend_for(&self, overall: u8) -> HealthTrend {
        let overall = f64::from(overall);
        if overall > self.config.improving_above {
            HealthTrend::Improving
        } else if overall > self.config.stable_above {
            HealthTrend::Stable
        } else {
            HealthTrend::Degrading
        }
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }
}
