//! End-to-end scenarios through `MaintenanceEngine::process`.

use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Duration, TimeZone, Utc};
use upkeep_engine::{EngineConfig, EngineError, InMemoryEventSink, MaintenanceEngine};
use upkeep_types::{
    Baselines, DeviceId, EngineEvent, HealthTrend, MaintenanceType, ProcessOutcome, RiskLevel,
    Severity, TelemetrySample,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 10, 8, 0, 0).unwrap()
}

fn sample(device: &str, hour: i64, metrics: &[(&str, f64)]) -> TelemetrySample {
    TelemetrySample::from_pairs(device, t0() + Duration::hours(hour), metrics.iter().copied())
}

fn baselines(pairs: &[(&str, f64)]) -> Baselines {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn degrading_temperature_predicts_failure() {
    let engine = MaintenanceEngine::with_defaults();
    let b = baselines(&[("temp", 100.0)]);
    let temps = [100.0, 98.0, 95.0, 90.0, 85.0, 80.0];

    let mut outcomes = Vec::new();
    for (i, temp) in temps.iter().enumerate() {
        outcomes.push(engine.process(&sample("d1", i as i64, &[("temp", *temp)]), &b).unwrap());
    }

    let series = engine.degradation().series(&"d1".into(), "temp").unwrap();
    for (got, want) in series.iter().zip([0.0, 0.02, 0.05, 0.10, 0.15, 0.20]) {
        assert!((got - want).abs() < 1e-9);
    }

    // Fewer than five ratios: nothing to extrapolate
    assert!(outcomes[..4].iter().all(|o| o.prediction.is_none()));

    let fifth = outcomes[4].prediction.as_ref().unwrap();
    assert_eq!(fifth.days_to_failure, 5);
    assert_eq!(fifth.risk_level, RiskLevel::High);

    let sixth = outcomes[5].prediction.as_ref().unwrap();
    assert_eq!(sixth.days_to_failure, 3);
    assert_eq!(sixth.risk_level, RiskLevel::High);
    assert_eq!(sixth.recommended_action, "Immediate maintenance");
    assert!((sixth.confidence - 0.7).abs() < 1e-9);
    assert_eq!(
        sixth.predicted_failure_date,
        t0() + Duration::hours(5) + Duration::days(3)
    );

    assert_eq!(outcomes[5].health.overall_score, 80);
    assert_eq!(outcomes[5].health.trend, HealthTrend::Stable);

    let upcoming = engine.upcoming_maintenance_at(30, t0());
    assert_eq!(upcoming.len(), 2);
    assert!(upcoming.iter().all(|s| s.priority == 1));
    assert!(upcoming
        .iter()
        .all(|s| s.maintenance_type == MaintenanceType::Predictive));
    assert_eq!(
        upcoming[1].scheduled_date,
        sixth.predicted_failure_date - Duration::days(7)
    );
}

#[test]
fn spike_after_stable_history_is_critical() {
    let engine = MaintenanceEngine::with_defaults();
    let b = Baselines::new();
    for hour in 0..10 {
        let outcome = engine.process(&sample("fan", hour, &[("rpm", 5.0)]), &b).unwrap();
        assert!(!outcome.anomaly.is_anomaly);
    }

    let outcome = engine.process(&sample("fan", 10, &[("rpm", 50.0)]), &b).unwrap();
    assert!(outcome.anomaly.is_anomaly);
    assert_eq!(outcome.anomaly.severity, Severity::Critical);
    assert!(outcome.anomaly.affected_metrics.contains("rpm"));
    // No baselines: neutral health
    assert_eq!(outcome.health.overall_score, 50);
    assert!(outcome.health.component_scores.is_empty());
    assert_eq!(engine.stats().anomalies_detected, 1);
}

#[test]
fn events_follow_state_changes() {
    let sink = Arc::new(InMemoryEventSink::new());
    let engine = MaintenanceEngine::with_defaults().with_sink(sink.clone());
    let b = baselines(&[("temp", 100.0)]);

    for hour in 0..10 {
        engine.process(&sample("d1", hour, &[("temp", 100.0)]), &b).unwrap();
    }
    assert!(sink.is_empty());

    // A collapse is both an anomaly and a degradation
    engine.process(&sample("d1", 10, &[("temp", 60.0)]), &b).unwrap();

    let kinds: Vec<_> = sink.events().iter().map(EngineEvent::kind).collect();
    assert_eq!(
        kinds,
        vec!["anomaly_detected", "failure_predicted", "maintenance_scheduled"]
    );
    for event in sink.events() {
        assert_eq!(event.device_id().as_str(), "d1");
    }
}

#[test]
fn rejected_sample_leaves_state_untouched() {
    let engine = MaintenanceEngine::with_defaults();
    let b = baselines(&[("temp", 100.0), ("pressure", 0.0)]);

    engine.process(&sample("d1", 0, &[("temp", 99.0)]), &b).unwrap();

    let err = engine
        .process(&sample("d1", 1, &[("temp", 98.0), ("pressure", 3.0)]), &b)
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidBaseline { ref metric, .. } if metric == "pressure"));

    let d1 = DeviceId::from("d1");
    assert_eq!(engine.history().window_len(&d1, "temp"), 1);
    assert_eq!(engine.degradation().series_len(&d1, "temp"), 1);

    let err = engine
        .process(&sample("d1", 2, &[("temp", f64::INFINITY)]), &b)
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidMetricValue { .. }));
    assert_eq!(engine.history().window_len(&d1, "temp"), 1);

    let stats = engine.stats();
    assert_eq!(stats.samples_processed, 1);
    assert_eq!(stats.samples_rejected, 2);
}

#[test]
fn only_medium_and_high_risk_are_scheduled() {
    let engine = MaintenanceEngine::with_defaults();
    let b = baselines(&[("temp", 100.0)]);

    // ratios 0, .025, .05, .075, .1: rate 0.02, 10 days out
    for (i, temp) in [100.0, 97.5, 95.0, 92.5, 90.0].iter().enumerate() {
        engine.process(&sample("d1", i as i64, &[("temp", *temp)]), &b).unwrap();
    }
    assert_eq!(engine.scheduler().len(), 1);
    assert_eq!(engine.scheduler().entries()[0].risk_level, RiskLevel::Medium);

    // Same end state spread over 43 samples: rate 0.1 / 43, 86 days out
    let engine = MaintenanceEngine::with_defaults();
    let b = baselines(&[("temp", 1000.0)]);
    let mut temps = vec![1000.0; 40];
    temps.extend([960.0, 930.0, 900.0]);
    let mut last = None;
    for (i, temp) in temps.iter().enumerate() {
        last = Some(engine.process(&sample("d3", i as i64, &[("temp", *temp)]), &b).unwrap());
    }
    let prediction = last.and_then(|o| o.prediction).unwrap();
    assert_eq!(prediction.risk_level, RiskLevel::Low);
    assert_eq!(prediction.days_to_failure, 86);
    assert_eq!(prediction.recommended_action, "Plan maintenance");
    assert!(engine.scheduler().is_empty());
    assert_eq!(engine.stats().schedules_created, 0);
    assert_eq!(engine.stats().predictions_emitted, 1);
}

#[test]
fn upcoming_orders_high_before_medium() {
    let engine = MaintenanceEngine::with_defaults();
    let b = baselines(&[("temp", 100.0)]);

    // "slow" degrades to a medium-risk prediction
    for (i, temp) in [100.0, 97.5, 95.0, 92.5, 90.0].iter().enumerate() {
        engine.process(&sample("slow", i as i64, &[("temp", *temp)]), &b).unwrap();
    }
    // "fast" degrades to a high-risk prediction
    for (i, temp) in [100.0, 98.0, 95.0, 90.0, 85.0].iter().enumerate() {
        engine.process(&sample("fast", i as i64, &[("temp", *temp)]), &b).unwrap();
    }

    let upcoming = engine.upcoming_maintenance_at(30, t0());
    assert_eq!(upcoming.len(), 2);
    assert_eq!(upcoming[0].device_id.as_str(), "fast");
    assert_eq!(upcoming[0].risk_level, RiskLevel::High);
    assert_eq!(upcoming[1].device_id.as_str(), "slow");
    assert_eq!(upcoming[1].risk_level, RiskLevel::Medium);
}

#[test]
fn distinct_devices_process_concurrently() {
    let engine = Arc::new(MaintenanceEngine::with_defaults());
    let b = Arc::new(baselines(&[("temp", 100.0), ("rpm", 1000.0)]));

    let handles: Vec<_> = (0..8)
        .map(|d| {
            let engine = Arc::clone(&engine);
            let b = Arc::clone(&b);
            thread::spawn(move || {
                let device = format!("dev-{d}");
                for i in 0..200 {
                    let s = sample(&device, i, &[("temp", 100.0 - (i % 5) as f64), ("rpm", 1000.0)]);
                    engine.process(&s, &b).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let stats = engine.stats();
    assert_eq!(stats.devices_tracked, 8);
    assert_eq!(stats.samples_processed, 1600);
    for d in 0..8 {
        let id = DeviceId::new(format!("dev-{d}"));
        assert_eq!(engine.history().window_len(&id, "temp"), 200);
        assert_eq!(engine.degradation().series_len(&id, "rpm"), 200);
        let values = engine.history().window_values(&id, "temp").unwrap();
        let expected: Vec<f64> = (0..200).map(|i| 100.0 - (i % 5) as f64).collect();
        assert_eq!(values, expected);
    }
}

#[test]
fn record_then_detect_includes_sample_in_its_own_window() {
    let config: EngineConfig =
        serde_json::from_str(r#"{"detection_order":"record_then_detect"}"#).unwrap();
    let engine = MaintenanceEngine::new(config).unwrap();
    let b = Baselines::new();

    for hour in 0..9 {
        engine.process(&sample("fan", hour, &[("rpm", 5.0)]), &b).unwrap();
    }
    // The spike is part of its own window: one outlier among ten values
    // reaches z = 3 at most, which is not above the threshold
    let outcome = engine.process(&sample("fan", 9, &[("rpm", 50.0)]), &b).unwrap();
    assert!(!outcome.anomaly.is_anomaly);

    let engine = MaintenanceEngine::with_defaults();
    for hour in 0..9 {
        engine.process(&sample("fan", hour, &[("rpm", 5.0)]), &b).unwrap();
    }
    let outcome = engine.process(&sample("fan", 9, &[("rpm", 50.0)]), &b).unwrap();
    // Only nine prior values: not enough history yet
    assert!(!outcome.anomaly.is_anomaly);
    assert_eq!(engine.history().window_len(&"fan".into(), "rpm"), 10);
}

fn degrade_from(engine: &MaintenanceEngine, start: DateTime<Utc>) -> Vec<ProcessOutcome> {
    let b = baselines(&[("temp", 100.0)]);
    [100.0, 98.0, 95.0, 90.0, 85.0, 80.0]
        .iter()
        .enumerate()
        .map(|(i, temp)| {
            let at = start + Duration::hours(i as i64);
            engine
                .process(&TelemetrySample::from_pairs("d1", at, [("temp", *temp)]), &b)
                .unwrap()
        })
        .collect()
}

#[test]
fn failure_dates_past_the_calendar_end_saturate() {
    let engine = MaintenanceEngine::with_defaults();
    let start = DateTime::<Utc>::MAX_UTC - Duration::days(1);
    let outcomes = degrade_from(&engine, start);

    for outcome in &outcomes[4..] {
        let p = outcome.prediction.as_ref().unwrap();
        assert_eq!(p.predicted_failure_date, DateTime::<Utc>::MAX_UTC);
        assert_eq!(p.risk_level, RiskLevel::High);
    }
    assert_eq!(engine.scheduler().len(), 2);
    assert_eq!(engine.stats().samples_processed, 6);
}

#[test]
fn schedules_before_the_calendar_start_saturate() {
    let engine = MaintenanceEngine::with_defaults();
    let start = DateTime::<Utc>::MIN_UTC + Duration::days(1);
    let outcomes = degrade_from(&engine, start);

    assert_eq!(outcomes[5].prediction.as_ref().unwrap().days_to_failure, 3);
    let entries = engine.scheduler().entries();
    assert_eq!(entries.len(), 2);
    assert!(entries
        .iter()
        .all(|s| s.scheduled_date == DateTime::<Utc>::MIN_UTC));
    assert_eq!(engine.upcoming_maintenance_at(30, start).len(), 2);
}
