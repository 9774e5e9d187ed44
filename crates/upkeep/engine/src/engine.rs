//! The maintenance engine: wires history, detection, degradation,
//! prediction, health scoring and scheduling together per sample.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use upkeep_types::{
    Baselines, EngineEvent, MaintenanceSchedule, ProcessOutcome, RiskLevel, TelemetrySample,
};

use crate::anomaly::AnomalyDetector;
use crate::config::{DetectionOrder, EngineConfig};
use crate::degradation::DegradationTracker;
use crate::error::{check_baseline, EngineError, EngineResult};
use crate::health::HealthScorer;
use crate::history::HistoryStore;
use crate::predictor::FailurePredictor;
use crate::scheduler::MaintenanceScheduler;
use crate::sink::EventSink;

/// Point-in-time counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub devices_tracked: usize,
    pub samples_processed: u64,
    pub samples_rejected: u64,
    pub anomalies_detected: u64,
    pub predictions_emitted: u64,
    pub schedules_created: u64,
}

#[derive(Default)]
struct Counters {
    processed: AtomicU64,
    rejected: AtomicU64,
    anomalies: AtomicU64,
    predictions: AtomicU64,
    schedules: AtomicU64,
}

/// Predictive-maintenance engine.
///
/// All operations take `&self`; share it across threads as
/// `Arc<MaintenanceEngine>`. Samples for one device must be fed in order by a
/// single logical stream, different devices may be processed in parallel.
pub struct MaintenanceEngine {
    config: EngineConfig,
    history: HistoryStore,
    detector: AnomalyDetector,
    degradation: DegradationTracker,
    predictor: FailurePredictor,
    scorer: HealthScorer,
    scheduler: MaintenanceScheduler,
    sink: Option<Arc<dyn EventSink>>,
    counters: Counters,
}

impl MaintenanceEngine {
    /// Build an engine from a validated configuration.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            history: HistoryStore::new(config.history.capacity),
            detector: AnomalyDetector::new(config.anomaly.clone()),
            degradation: DegradationTracker::new(config.degradation.capacity),
            predictor: FailurePredictor::new(config.prediction.clone()),
            scorer: HealthScorer::new(config.health.clone()),
            scheduler: MaintenanceScheduler::new(config.scheduler.clone()),
            sink: None,
            counters: Counters::default(),
            config,
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            history: HistoryStore::with_defaults(),
            detector: AnomalyDetector::default(),
            degradation: DegradationTracker::with_defaults(),
            predictor: FailurePredictor::default(),
            scorer: HealthScorer::default(),
            scheduler: MaintenanceScheduler::default(),
            sink: None,
            counters: Counters::default(),
            config: EngineConfig::default(),
        }
    }

    /// Attach a sink that receives every anomaly, prediction and schedule.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Run one sample through every component.
    ///
    /// Invalid input is rejected before any state changes. The returned
    /// outcome does not include a schedule entry; query
    /// [`upcoming_maintenance`](Self::upcoming_maintenance) for those.
    pub fn process(
        &self,
        sample: &TelemetrySample,
        baselines: &Baselines,
    ) -> EngineResult<ProcessOutcome> {
        if let Err(e) = validate(sample, baselines) {
            self.counters.rejected.fetch_add(1, Ordering::Relaxed);
            warn!(device = %sample.device_id, error = %e, "sample rejected");
            return Err(e);
        }

        let device = &sample.device_id;

        let anomaly = match self.config.detection_order {
            DetectionOrder::DetectThenRecord => {
                let anomaly = self.detector.detect(sample, &self.history);
                self.history.add_data_point(sample);
                anomaly
            }
            DetectionOrder::RecordThenDetect => {
                self.history.add_data_point(sample);
                self.detector.detect(sample, &self.history)
            }
        };

        let health = self
            .scorer
            .calculate(device, &sample.metrics, baselines, sample.timestamp)?;

        for (metric, &value) in &sample.metrics {
            if let Some(&baseline) = baselines.get(metric) {
                self.degradation.update(device, metric, value, baseline)?;
            }
        }

        let prediction = self
            .predictor
            .predict(device, &self.degradation, sample.timestamp);

        let schedule = prediction
            .as_ref()
            .filter(|p| p.risk_level != RiskLevel::Low)
            .map(|p| self.scheduler.add_from_prediction(p));

        self.counters.processed.fetch_add(1, Ordering::Relaxed);
        if anomaly.is_anomaly {
            self.counters.anomalies.fetch_add(1, Ordering::Relaxed);
        }
        if prediction.is_some() {
            self.counters.predictions.fetch_add(1, Ordering::Relaxed);
        }
        if schedule.is_some() {
            self.counters.schedules.fetch_add(1, Ordering::Relaxed);
        }

        debug!(
            device = %device,
            metrics = sample.metrics.len(),
            anomaly = anomaly.is_anomaly,
            anomaly_score = anomaly.anomaly_score,
            health = health.overall_score,
            risk = ?prediction.as_ref().map(|p| p.risk_level),
            "sample processed"
        );

        let outcome = ProcessOutcome {
            anomaly,
            health,
            prediction,
        };
        self.publish(&outcome, schedule);
        Ok(outcome)
    }

    /// Schedule entries due within `days` of the wall clock.
    pub fn upcoming_maintenance(&self, days: u32) -> Vec<MaintenanceSchedule> {
        self.upcoming_maintenance_at(days, Utc::now())
    }

    /// Schedule entries due within `days` of `now`, highest priority first.
    pub fn upcoming_maintenance_at(&self, days: u32, now: DateTime<Utc>) -> Vec<MaintenanceSchedule> {
        self.scheduler.upcoming(days, now)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            devices_tracked: self.history.device_count(),
            samples_processed: self.counters.processed.load(Ordering::Relaxed),
            samples_rejected: self.counters.rejected.load(Ordering::Relaxed),
            anomalies_detected: self.counters.anomalies.load(Ordering::Relaxed),
            predictions_emitted: self.counters.predictions.load(Ordering::Relaxed),
            schedules_created: self.counters.schedules.load(Ordering::Relaxed),
        }
    }

    /// Flush the attached sink, if any.
    pub fn flush(&self) -> EngineResult<()> {
        match &self.sink {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn degradation(&self) -> &DegradationTracker {
        &self.degradation
    }

    pub fn scheduler(&self) -> &MaintenanceScheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn publish(&self, outcome: &ProcessOutcome, schedule: Option<MaintenanceSchedule>) {
        let Some(sink) = &self.sink else {
            return;
        };

        let mut events = Vec::with_capacity(3);
        if outcome.anomaly.is_anomaly {
            events.push(EngineEvent::AnomalyDetected(outcome.anomaly.clone()));
        }
        if let Some(p) = &outcome.prediction {
            events.push(EngineEvent::FailurePredicted(p.clone()));
        }
        if let Some(s) = schedule {
            events.push(EngineEvent::MaintenanceScheduled(s));
        }

        for event in &events {
            if let Err(e) = sink.publish(event) {
                warn!(
                    device = %event.device_id(),
                    kind = event.kind(),
                    error = %e,
                    "failed to publish event"
                );
            }
        }
    }
}

impl Default for MaintenanceEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Reject non-finite readings and unusable baselines for the sample's metrics.
fn validate(sample: &TelemetrySample, baselines: &Baselines) -> EngineResult<()> {
    for (metric, &value) in &sample.metrics {
        if !value.is_finite() {
            return Err(EngineError::InvalidMetricValue {
                device: sample.device_id.to_string(),
                metric: metric.clone(),
                value,
            });
        }
        if let Some(&baseline) = baselines.get(metric) {
            check_baseline(metric, baseline)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::InMemoryEventSink;
    use chrono::{Duration, TimeZone};
    use std::collections::BTreeMap;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()
    }

    fn temp_sample(device: &str, hour: i64, temp: f64) -> TelemetrySample {
        TelemetrySample::from_pairs(device, t0() + Duration::hours(hour), [("temp", temp)])
    }

    fn baselines(temp: f64) -> Baselines {
        BTreeMap::from([("temp".to_string(), temp)])
    }

    #[test]
    fn first_sample_reports_no_data() {
        let engine = MaintenanceEngine::with_defaults();
        let outcome = engine.process(&temp_sample("d1", 0, 100.0), &baselines(100.0)).unwrap();
        assert_eq!(outcome.anomaly.description, crate::anomaly::NO_DATA);
        assert_eq!(outcome.health.overall_score, 100);
        assert!(outcome.prediction.is_none());
    }

    #[test]
    fn record_then_detect_sees_its_own_sample() {
        let config = EngineConfig {
            detection_order: DetectionOrder::RecordThenDetect,
            ..EngineConfig::default()
        };
        let engine = MaintenanceEngine::new(config).unwrap();
        let outcome = engine.process(&temp_sample("d1", 0, 100.0), &baselines(100.0)).unwrap();
        assert_ne!(outcome.anomaly.description, crate::anomaly::NO_DATA);
        assert!(!outcome.anomaly.is_anomaly);
    }

    #[test]
    fn invalid_input_is_rejected_before_mutation() {
        let engine = MaintenanceEngine::with_defaults();

        let err = engine
            .process(&temp_sample("d1", 0, 90.0), &baselines(0.0))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidBaseline { .. }));

        let err = engine
            .process(&temp_sample("d1", 0, f64::NAN), &baselines(100.0))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidMetricValue { .. }));

        assert!(!engine.history().contains_device(&"d1".into()));
        assert_eq!(engine.degradation().device_count(), 0);
        let stats = engine.stats();
        assert_eq!(stats.samples_rejected, 2);
        assert_eq!(stats.samples_processed, 0);
    }

    #[test]
    fn baselines_for_absent_metrics_are_ignored() {
        let engine = MaintenanceEngine::with_defaults();
        let mut b = baselines(100.0);
        b.insert("rpm".to_string(), 0.0);
        assert!(engine.process(&temp_sample("d1", 0, 100.0), &b).is_ok());
    }

    #[test]
    fn schedules_and_publishes_for_degrading_device() {
        let sink = Arc::new(InMemoryEventSink::new());
        let engine = MaintenanceEngine::with_defaults().with_sink(sink.clone());

        for (i, temp) in [100.0, 98.0, 95.0, 90.0, 85.0, 80.0].into_iter().enumerate() {
            engine
                .process(&temp_sample("d1", i as i64, temp), &baselines(100.0))
                .unwrap();
        }

        let stats = engine.stats();
        assert_eq!(stats.samples_processed, 6);
        assert_eq!(stats.devices_tracked, 1);
        assert_eq!(stats.predictions_emitted, 2);
        assert_eq!(stats.schedules_created, 2);
        assert_eq!(sink.events_of("failure_predicted").len(), 2);
        assert_eq!(sink.events_of("maintenance_scheduled").len(), 2);
        assert_eq!(engine.upcoming_maintenance_at(30, t0()).len(), 2);
        assert!(engine.flush().is_ok());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.degradation.capacity = 0;
        assert!(matches!(
            MaintenanceEngine::new(config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MaintenanceEngine>();
    }
}
