//! Event sinks: where engine events go once state has been updated.
//!
//! Provides the `EventSink` trait, a `JsonLinesEventSink` that appends one
//! JSON object per line to a file, and an `InMemoryEventSink` for tests and
//! inspection.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use upkeep_types::EngineEvent;

use crate::error::{EngineError, EngineResult};

/// Receiver of engine events.
///
/// Called after the engine has finished mutating state for a sample, never
/// while an engine lock is held.
pub trait EventSink: Send + Sync {
    /// Deliver a single event.
    fn publish(&self, event: &EngineEvent) -> EngineResult<()>;

    /// Flush anything buffered. The default does nothing.
    fn flush(&self) -> EngineResult<()> {
        Ok(())
    }
}

/// Appends events as newline-delimited JSON.
pub struct JsonLinesEventSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesEventSink {
    /// Open (or create) the file for appending.
    pub fn open(path: impl Into<PathBuf>) -> EngineResult<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for JsonLinesEventSink {
    fn publish(&self, event: &EngineEvent) -> EngineResult<()> {
        let line = serde_json::to_string(event)?;
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&self) -> EngineResult<()> {
        self.writer
            .lock()
            .flush()
            .map_err(|e| EngineError::Sink(format!("flush {} failed: {}", self.path.display(), e)))
    }
}

/// Keeps every published event in memory.
#[derive(Default)]
pub struct InMemoryEventSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything published so far.
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().clone()
    }

    /// Events of one kind (see [`EngineEvent::kind`]).
    pub fn events_of(&self, kind: &str) -> Vec<EngineEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Remove and return everything published so far.
    pub fn drain(&self) -> Vec<EngineEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventSink for InMemoryEventSink {
    fn publish(&self, event: &EngineEvent) -> EngineResult<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}
