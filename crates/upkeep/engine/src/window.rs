//! Fixed-capacity sliding windows.
//!
//! [`RingBuffer`] backs both the per-metric history windows and the
//! degradation series. [`WindowStats`] summarizes a window for z-scoring.

use std::collections::vec_deque::{self, VecDeque};

/// A sliding window holding at most `limit` values.
///
/// Pushing into a full window evicts the oldest value; iteration is
/// oldest-first.
#[derive(Clone, Debug)]
pub struct RingBuffer<T> {
    values: VecDeque<T>,
    limit: usize,
}

impl<T> RingBuffer<T> {
    /// A window of at most `limit` values (floored to 1).
    pub fn new(limit: usize) -> Self {
        Self {
            values: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn push(&mut self, item: T) {
        if self.values.len() == self.limit {
            self.values.pop_front();
        }
        self.values.push_back(item);
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.values.iter()
    }

    pub fn oldest(&self) -> Option<&T> {
        self.values.front()
    }

    pub fn latest(&self) -> Option<&T> {
        self.values.back()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Copy of the contents, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.values.iter().cloned().collect()
    }
}

/// Population statistics over a window of values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation (divides by `count`, not `count - 1`).
    pub std_dev: f64,
}

impl WindowStats {
    /// Compute statistics in two passes. Returns `None` for an empty input.
    pub fn from_values<'a>(values: impl Iterator<Item = &'a f64> + Clone) -> Option<Self> {
        let (count, sum) = values
            .clone()
            .fold((0usize, 0.0f64), |(n, s), v| (n + 1, s + v));
        if count == 0 {
            return None;
        }
        let mean = sum / count as f64;
        let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
        })
    }
}
