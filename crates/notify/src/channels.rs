//! Built-in notifier implementations.

use std::sync::Mutex;

use crate::traits::{CellRange, ChangeNotifier};

/// Logs every change at debug level.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl ChangeNotifier for TracingNotifier {
    fn cells_changed(&self, range: &CellRange) {
        tracing::debug!(
            rows = ?range.rows,
            columns = ?range.columns,
            "cells changed"
        );
    }

    fn channel_name(&self) -> &str {
        "tracing"
    }
}

/// Keeps every change in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<CellRange>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far.
    pub fn events(&self) -> Vec<CellRange> {
        self.events.lock().expect("recording lock poisoned").clone()
    }

    /// Drain and return everything received so far.
    pub fn take(&self) -> Vec<CellRange> {
        std::mem::take(&mut *self.events.lock().expect("recording lock poisoned"))
    }
}

impl ChangeNotifier for RecordingNotifier {
    fn cells_changed(&self, range: &CellRange) {
        self.events
            .lock()
            .expect("recording lock poisoned")
            .push(range.clone());
    }

    fn channel_name(&self) -> &str {
        "recording"
    }
}
