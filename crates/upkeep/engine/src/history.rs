//! History store: per-device, per-metric sliding windows of recent values.

use std::collections::HashMap;

use dashmap::DashMap;
use upkeep_types::{DeviceId, TelemetrySample};

use crate::config::DEFAULT_WINDOW_CAPACITY;
use crate::window::{RingBuffer, WindowStats};

/// Windows of one device, keyed by metric name.
pub type DeviceWindows = HashMap<String, RingBuffer<f64>>;

/// Bounded history of recent metric values for every device.
///
/// Each device's windows sit behind their own map entry, so concurrent
/// writers to different devices don't contend and a window is never
/// observed half-updated.
pub struct HistoryStore {
    capacity: usize,
    devices: DashMap<DeviceId, DeviceWindows>,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            devices: DashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }

    /// Append every metric in the sample to its window, evicting the oldest
    /// value once the window is full.
    pub fn add_data_point(&self, sample: &TelemetrySample) {
        let mut windows = self.devices.entry(sample.device_id.clone()).or_default();
        for (metric, &value) in &sample.metrics {
            windows
                .entry(metric.clone())
                .or_insert_with(|| RingBuffer::new(self.capacity))
                .push(value);
        }
    }

    /// Whether any sample has been recorded for the device.
    pub fn contains_device(&self, device: &DeviceId) -> bool {
        self.devices.contains_key(device)
    }

    /// Number of values currently held for a metric (0 when unknown).
    pub fn window_len(&self, device: &DeviceId, metric: &str) -> usize {
        self.devices
            .get(device)
            .and_then(|w| w.get(metric).map(RingBuffer::len))
            .unwrap_or(0)
    }

    /// Ordered copy of a metric's window, oldest first.
    pub fn window_values(&self, device: &DeviceId, metric: &str) -> Option<Vec<f64>> {
        self.devices
            .get(device)
            .and_then(|w| w.get(metric).map(RingBuffer::to_vec))
    }

    /// Mean and standard deviation of a metric's window.
    pub fn window_stats(&self, device: &DeviceId, metric: &str) -> Option<WindowStats> {
        let windows = self.devices.get(device)?;
        let window = windows.get(metric)?;
        WindowStats::from_values(window.iter())
    }

    /// Metric names tracked for a device, sorted.
    pub fn metrics(&self, device: &DeviceId) -> Vec<String> {
        let mut names: Vec<String> = self
            .devices
            .get(device)
            .map(|w| w.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}
