//! Load notifications.
//!
//! The gate publishes exactly one [`LoadEvent`] per intercepted load, after
//! the verdict is final. Observers subscribe explicitly on the gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;
use std::sync::{Mutex, PoisonError};

/// Outcome of one intercepted load attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadEvent {
    pub path: String,
    pub success: bool,
    pub at: DateTime<Utc>,
}

impl LoadEvent {
    pub fn new(path: impl Into<String>, success: bool) -> Self {
        Self {
            path: path.into(),
            success,
            at: Utc::now(),
        }
    }
}

/// Receiver of load notifications. Called on the loading thread.
pub trait LoadObserver: Send + Sync {
    fn on_load(&self, event: &LoadEvent);
}

impl<F> LoadObserver for F
where
    F: Fn(&LoadEvent) + Send + Sync,
{
    fn on_load(&self, event: &LoadEvent) {
        self(event)
    }
}

/// Forwards events into an `mpsc` channel. A dropped receiver is ignored.
pub struct ChannelObserver {
    tx: Mutex<Sender<LoadEvent>>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<LoadEvent>) -> Self {
        Self { tx: Mutex::new(tx) }
    }
}

impl LoadObserver for ChannelObserver {
    fn on_load(&self, event: &LoadEvent) {
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = tx.send(event.clone());
    }
}

/// Keeps every event it sees, in arrival order.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<LoadEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LoadEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<LoadEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl LoadObserver for RecordingObserver {
    fn on_load(&self, event: &LoadEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
