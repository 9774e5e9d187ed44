//! # upkeep-engine
//!
//! Predictive maintenance over device telemetry: each sample is scored
//! against the device's own recent history and its caller-supplied
//! baselines, and degrading devices get maintenance windows planned ahead of
//! their extrapolated failure date.
//!
//! ## Architecture
//!
//! ```text
//!   TelemetrySample + Baselines
//!              │
//!              ▼
//!   ┌──────────────────────┐
//!   │  MaintenanceEngine   │
//!   │  ┌────────────────┐  │
//!   │  │ HistoryStore   │◄─┼── AnomalyDetector (z-score)
//!   │  └────────────────┘  │
//!   │  ┌────────────────┐  │
//!   │  │ Degradation    │◄─┼── FailurePredictor ──► MaintenanceScheduler
//!   │  └────────────────┘  │
//!   │  HealthScorer        │
//!   └──────────┬───────────┘
//!              │ ProcessOutcome        EngineEvent
//!              ▼                  ──────────────────► EventSink
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use chrono::Utc;
//! use upkeep_engine::MaintenanceEngine;
//! use upkeep_types::TelemetrySample;
//!
//! let engine = MaintenanceEngine::with_defaults();
//! let baselines = BTreeMap::from([("temp".to_string(), 100.0)]);
//! let sample = TelemetrySample::from_pairs("pump-1", Utc::now(), [("temp", 97.0)]);
//!
//! let outcome = engine.process(&sample, &baselines).unwrap();
//! assert_eq!(outcome.health.overall_score, 97);
//! assert!(outcome.prediction.is_none());
//! ```

#![deny(unsafe_code)]

pub mod anomaly;
pub mod config;
pub mod degradation;
pub mod engine;
pub mod error;
pub mod health;
pub mod history;
pub mod predictor;
pub mod scheduler;
pub mod sink;
pub mod window;

pub use anomaly::AnomalyDetector;
pub use config::{
    AnomalyConfig, DegradationConfig, DetectionOrder, EngineConfig, HealthConfig, HistoryConfig,
    PredictionConfig, SchedulerConfig,
};
pub use degradation::{DegradationSnapshot, DegradationTracker};
pub use engine::{EngineStats, MaintenanceEngine};
pub use error::{EngineError, EngineResult};
pub use health::HealthScorer;
pub use history::HistoryStore;
pub use predictor::FailurePredictor;
pub use scheduler::MaintenanceScheduler;
pub use sink::{EventSink, InMemoryEventSink, JsonLinesEventSink};
pub use window::{RingBuffer, WindowStats};
