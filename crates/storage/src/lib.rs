pub mod backend;
pub mod catalog;
pub mod data;
pub mod error;
pub mod store;

use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use depot_core::{DerivedState, IntervalProfile, ServiceRecord, Tier, TierUpdate, Vehicle, VehicleId};

pub use backend::{JsonFileBackend, StorageBackend};
pub use catalog::{ModelCatalog, ModelEntry};
pub use data::FleetData;
pub use error::{Result, StorageError};
pub use store::{RecordStore, RemovedVehicle};

/// Lock-guarded fleet state with a pluggable persistence backend.
///
/// Mutations run against a copy of the current state; the copy is persisted
/// and only then swapped in, so a failed validation or a failed write leaves
/// both memory and disk untouched.
pub struct FleetStore {
    data: RwLock<FleetData>,
    backend: StorageBackend,
}

impl FleetStore {
    /// An empty store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::with_data(FleetData::default())
    }

    /// A memory-only store seeded with `data`.
    pub fn with_data(data: FleetData) -> Self {
        Self {
            data: RwLock::new(data),
            backend: StorageBackend::Memory,
        }
    }

    /// Open (or start) a JSON fleet file. The file is rewritten after every
    /// successful mutation.
    pub fn open_json(path: impl Into<PathBuf>) -> Result<Self> {
        let file = JsonFileBackend::new(path);
        let data = file.load()?;
        Ok(Self {
            data: RwLock::new(data),
            backend: StorageBackend::JsonFile(file),
        })
    }

    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    fn read<T>(&self, f: impl FnOnce(&FleetData) -> Result<T>) -> Result<T> {
        let guard = self.data.read().expect("fleet lock poisoned");
        f(&guard)
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut FleetData) -> Result<T>) -> Result<T> {
        let mut guard = self.data.write().expect("fleet lock poisoned");
        let mut candidate = guard.clone();
        let out = f(&mut candidate)?;
        self.backend.persist(&candidate)?;
        *guard = candidate;
        Ok(out)
    }
}

impl RecordStore for FleetStore {
    fn get_record(&self, id: &VehicleId) -> Result<ServiceRecord> {
        self.read(|d| Ok(d.vehicle(id)?.record.clone()))
    }

    fn get_interval_profile(&self, model: &str) -> Result<IntervalProfile> {
        self.read(|d| d.profile(model).cloned())
    }

    fn write_tier_dates(
        &self,
        id: &VehicleId,
        tier: Tier,
        last_performed: Option<NaiveDate>,
        next_due: Option<NaiveDate>,
    ) -> Result<()> {
        self.mutate(|d| d.write_tier_dates(id, tier, last_performed, next_due))
    }

    fn write_tier_batch(&self, id: &VehicleId, updates: &[TierUpdate]) -> Result<()> {
        self.mutate(|d| d.write_tier_batch(id, updates))
    }

    fn write_derived(&self, id: &VehicleId, derived: &DerivedState) -> Result<()> {
        self.mutate(|d| d.write_derived(id, derived))
    }

    fn write_record(&self, id: &VehicleId, record: &ServiceRecord) -> Result<()> {
        self.mutate(|d| d.write_record(id, record))
    }

    fn register_model(&self, name: &str, profile: IntervalProfile) -> Result<()> {
        self.mutate(|d| d.register_model(name, profile))
    }

    fn update_model(&self, name: &str, profile: IntervalProfile) -> Result<()> {
        self.mutate(|d| d.update_model(name, profile))
    }

    fn remove_model(&self, name: &str) -> Result<()> {
        self.mutate(|d| d.remove_model(name))
    }

    fn list_models(&self) -> Result<Vec<(String, IntervalProfile)>> {
        self.read(|d| {
            Ok(d.models
                .iter()
                .map(|(name, profile)| (name.clone(), profile.clone()))
                .collect())
        })
    }

    fn add_vehicle(&self, vehicle: Vehicle) -> Result<()> {
        self.mutate(|d| d.add_vehicle(vehicle))
    }

    fn remove_vehicle(&self, id: &VehicleId) -> Result<RemovedVehicle> {
        self.mutate(|d| d.remove_vehicle(id))
    }

    fn get_vehicle(&self, id: &VehicleId) -> Result<Vehicle> {
        self.read(|d| d.vehicle(id).cloned())
    }

    fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        self.read(|d| Ok(d.vehicles.values().cloned().collect()))
    }

    fn set_notes(&self, id: &VehicleId, notes: &str) -> Result<()> {
        self.mutate(|d| d.set_notes(id, notes))
    }

    fn row_of(&self, id: &VehicleId) -> Result<usize> {
        self.read(|d| d.row_of(id))
    }
}
