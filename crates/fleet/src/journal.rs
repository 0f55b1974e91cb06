//! In-memory per-vehicle journal of schedule edits.
//!
//! Stores per-vehicle entries capped at a configurable maximum (default 200)
//! with FIFO eviction. Uses `std::sync::RwLock` so the parallel refresh sweep
//! can append from worker threads.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use depot_core::{Tier, VehicleId};

/// What happened to a vehicle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JournalAction {
    VehicleAdded,
    ServiceRecorded,
    TierCleared,
    DerivedRefreshed,
    NotesChanged,
    /// An edit that failed validation or storage; nothing was applied.
    Rejected,
}

#[derive(Debug, Clone, Serialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub vehicle: VehicleId,
    pub action: JournalAction,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub touched_tiers: Vec<Tier>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Filters for [`ServiceJournal::query`].
#[derive(Debug, Default, Deserialize)]
pub struct JournalQuery {
    pub action: Option<JournalAction>,
    /// Maximum number of entries to return (default 100).
    pub limit: Option<usize>,
    /// Only entries at or after this instant.
    pub since: Option<DateTime<Utc>>,
}

pub struct ServiceJournal {
    entries: RwLock<HashMap<VehicleId, VecDeque<JournalEntry>>>,
    max_entries_per_vehicle: usize,
}

impl ServiceJournal {
    pub fn new() -> Self {
        Self::with_max_entries(200)
    }

    pub fn with_max_entries(max: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries_per_vehicle: max.max(1),
        }
    }

    pub fn record(
        &self,
        vehicle: &VehicleId,
        action: JournalAction,
        touched_tiers: Vec<Tier>,
        message: impl Into<String>,
        details: Option<serde_json::Value>,
    ) -> Uuid {
        let entry = JournalEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            vehicle: vehicle.clone(),
            action,
            touched_tiers,
            message: message.into(),
            details,
        };
        let id = entry.id;

        let mut guard = self.entries.write().expect("journal lock poisoned");
        let deque = guard.entry(vehicle.clone()).or_default();
        deque.push_back(entry);
        while deque.len() > self.max_entries_per_vehicle {
            deque.pop_front();
        }
        id
    }

    /// Entries for one vehicle, newest first.
    pub fn query(&self, vehicle: &VehicleId, params: &JournalQuery) -> Vec<JournalEntry> {
        let guard = self.entries.read().expect("journal lock poisoned");
        let Some(deque) = guard.get(vehicle) else {
            return Vec::new();
        };

        let limit = params.limit.unwrap_or(100);

        deque
            .iter()
            .rev()
            .filter(|e| params.action.map_or(true, |a| e.action == a))
            .filter(|e| params.since.map_or(true, |s| e.timestamp >= s))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Drop a vehicle's history entirely.
    pub fn clear(&self, vehicle: &VehicleId) {
        self.entries
            .write()
            .expect("journal lock poisoned")
            .remove(vehicle);
    }
}

impl Default for ServiceJournal {
    fn default() -> Self {
        Self::new()
    }
}
