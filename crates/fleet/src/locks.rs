//! One mutex per vehicle, created on first use.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use depot_core::VehicleId;

#[derive(Default)]
pub struct VehicleLocks {
    slots: Mutex<HashMap<VehicleId, Arc<Mutex<()>>>>,
}

impl VehicleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock for `id`. Hold its guard for the whole
    /// read, compute, write, notify sequence.
    pub fn slot(&self, id: &VehicleId) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().expect("vehicle locks poisoned");
        slots.entry(id.clone()).or_default().clone()
    }

    pub fn forget(&self, id: &VehicleId) {
        self.slots.lock().expect("vehicle locks poisoned").remove(id);
    }
}
