//! Edits against a store that fails part-way through a write.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;

use depot_core::{DerivedState, IntervalProfile, ServiceRecord, Tier, TierUpdate, Vehicle, VehicleId};
use depot_fleet::{Fleet, FleetError, JournalAction, JournalQuery};
use depot_notify::RecordingNotifier;
use depot_storage::{FleetStore, RecordStore, RemovedVehicle, Result, StorageError};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Delegates to an in-memory store; derived writes and, when `fail_records`
/// is set, whole-record writes fail.
struct FlakyStore {
    inner: FleetStore,
    fail_records: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: FleetStore::in_memory(),
            fail_records: AtomicBool::new(false),
        }
    }

    fn disk_full() -> StorageError {
        StorageError::Validation("disk full".to_string())
    }
}

impl RecordStore for FlakyStore {
    fn get_record(&self, id: &VehicleId) -> Result<ServiceRecord> {
        self.inner.get_record(id)
    }

    fn get_interval_profile(&self, model: &str) -> Result<IntervalProfile> {
        self.inner.get_interval_profile(model)
    }

    fn write_tier_dates(
        &self,
        id: &VehicleId,
        tier: Tier,
        last_performed: Option<NaiveDate>,
        next_due: Option<NaiveDate>,
    ) -> Result<()> {
        self.inner.write_tier_dates(id, tier, last_performed, next_due)
    }

    fn write_tier_batch(&self, id: &VehicleId, updates: &[TierUpdate]) -> Result<()> {
        self.inner.write_tier_batch(id, updates)
    }

    fn write_derived(&self, _id: &VehicleId, _derived: &DerivedState) -> Result<()> {
        Err(Self::disk_full())
    }

    fn write_record(&self, id: &VehicleId, record: &ServiceRecord) -> Result<()> {
        if self.fail_records.load(Ordering::SeqCst) {
            return Err(Self::disk_full());
        }
        self.inner.write_record(id, record)
    }

    fn register_model(&self, name: &str, profile: IntervalProfile) -> Result<()> {
        self.inner.register_model(name, profile)
    }

    fn update_model(&self, name: &str, profile: IntervalProfile) -> Result<()> {
        self.inner.update_model(name, profile)
    }

    fn remove_model(&self, name: &str) -> Result<()> {
        self.inner.remove_model(name)
    }

    fn list_models(&self) -> Result<Vec<(String, IntervalProfile)>> {
        self.inner.list_models()
    }

    fn add_vehicle(&self, vehicle: Vehicle) -> Result<()> {
        self.inner.add_vehicle(vehicle)
    }

    fn remove_vehicle(&self, id: &VehicleId) -> Result<RemovedVehicle> {
        self.inner.remove_vehicle(id)
    }

    fn get_vehicle(&self, id: &VehicleId) -> Result<Vehicle> {
        self.inner.get_vehicle(id)
    }

    fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        self.inner.list_vehicles()
    }

    fn set_notes(&self, id: &VehicleId, notes: &str) -> Result<()> {
        self.inner.set_notes(id, notes)
    }

    fn row_of(&self, id: &VehicleId) -> Result<usize> {
        self.inner.row_of(id)
    }
}

fn setup() -> (Fleet, Arc<FlakyStore>, Arc<RecordingNotifier>) {
    let store = Arc::new(FlakyStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let fleet = Fleet::new(store.clone(), notifier.clone());
    fleet
        .register_model("TEM2", IntervalProfile::new(&[30, 225, 450, 900, 2160, 4320]).unwrap())
        .unwrap();
    fleet.add_vehicle("TEM2-0417".into(), "TEM2", None).unwrap();
    notifier.take();
    (fleet, store, notifier)
}

#[test]
fn service_dates_and_derived_fields_land_in_one_write() {
    let (fleet, store, _) = setup();
    let id = VehicleId::new("TEM2-0417");

    // Derived-only writes fail, yet the edit goes through with its derived
    // fields in place.
    fleet
        .record_service(&id, Tier::CurrentRepair1, d(1980, 1, 1), d(1980, 1, 2))
        .unwrap();

    let record = store.get_record(&id).unwrap();
    assert_eq!(record.next_due(Tier::CurrentRepair1), Some(d(1980, 8, 13)));
    assert_eq!(
        record.derived.last_service.map(|l| l.tier),
        Some(Tier::CurrentRepair1)
    );
    assert_eq!(
        record.derived.required.map(|r| r.date),
        Some(d(1980, 1, 31))
    );
}

#[test]
fn failed_commit_leaves_record_untouched() {
    let (fleet, store, notifier) = setup();
    let id = VehicleId::new("TEM2-0417");
    store.fail_records.store(true, Ordering::SeqCst);

    let err = fleet
        .record_service(&id, Tier::CurrentRepair1, d(1980, 1, 1), d(1980, 1, 2))
        .unwrap_err();
    assert!(matches!(err, FleetError::Storage(StorageError::Validation(_))));

    assert_eq!(store.get_record(&id).unwrap(), ServiceRecord::new());
    assert!(notifier.events().is_empty());

    let rejected = fleet.history(
        &id,
        &JournalQuery {
            action: Some(JournalAction::Rejected),
            ..Default::default()
        },
    );
    assert_eq!(rejected.len(), 1);
    assert!(rejected[0].message.contains("disk full"));
}

#[test]
fn failed_clear_keeps_both_dates() {
    let (fleet, store, notifier) = setup();
    let id = VehicleId::new("TEM2-0417");
    fleet
        .record_service(&id, Tier::CurrentRepair1, d(1980, 1, 1), d(1980, 1, 2))
        .unwrap();
    let before = store.get_record(&id).unwrap();
    notifier.take();

    store.fail_records.store(true, Ordering::SeqCst);
    assert!(fleet.clear_tier(&id, Tier::CurrentRepair1, d(1980, 1, 2)).is_err());

    assert_eq!(store.get_record(&id).unwrap(), before);
    assert!(notifier.events().is_empty());
}
