//! The read/write contract between the scheduling engine's callers and
//! whatever owns the persisted fleet state.

use chrono::NaiveDate;

use depot_core::{DerivedState, IntervalProfile, ServiceRecord, Tier, TierUpdate, Vehicle, VehicleId};

use crate::error::Result;

/// A removed vehicle and where it sat in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedVehicle {
    pub vehicle: Vehicle,
    pub row: usize,
    /// Number of rows before the removal.
    pub previous_len: usize,
}

/// Sole owner of persisted vehicle records and model interval profiles.
///
/// Every write is idempotent: the same inputs always produce the same
/// resulting state. A failed write leaves the stored state unchanged.
pub trait RecordStore: Send + Sync {
    // ── Engine contract ─────────────────────────────────────────

    fn get_record(&self, id: &VehicleId) -> Result<ServiceRecord>;

    fn get_interval_profile(&self, model: &str) -> Result<IntervalProfile>;

    /// Replace one tier's two dates. Both must be set or both cleared.
    fn write_tier_dates(
        &self,
        id: &VehicleId,
        tier: Tier,
        last_performed: Option<NaiveDate>,
        next_due: Option<NaiveDate>,
    ) -> Result<()>;

    /// Apply several tier updates as one unit.
    ///
    /// The default applies them one by one; implementations that can, apply
    /// all or none.
    fn write_tier_batch(&self, id: &VehicleId, updates: &[TierUpdate]) -> Result<()> {
        for update in updates {
            self.write_tier_dates(id, update.tier, update.last_performed, update.next_due)?;
        }
        Ok(())
    }

    fn write_derived(&self, id: &VehicleId, derived: &DerivedState) -> Result<()>;

    /// Replace tier dates and derived fields together, all or nothing.
    fn write_record(&self, id: &VehicleId, record: &ServiceRecord) -> Result<()>;

    // ── Model registry ──────────────────────────────────────────

    fn register_model(&self, name: &str, profile: IntervalProfile) -> Result<()>;

    fn update_model(&self, name: &str, profile: IntervalProfile) -> Result<()>;

    /// Refused while any vehicle still references the model.
    fn remove_model(&self, name: &str) -> Result<()>;

    /// All models, sorted by name.
    fn list_models(&self) -> Result<Vec<(String, IntervalProfile)>>;

    // ── Vehicle registry ────────────────────────────────────────

    /// The vehicle's model must already be registered.
    fn add_vehicle(&self, vehicle: Vehicle) -> Result<()>;

    /// Later rows shift up by one.
    fn remove_vehicle(&self, id: &VehicleId) -> Result<RemovedVehicle>;

    fn get_vehicle(&self, id: &VehicleId) -> Result<Vehicle>;

    /// All vehicles in table row order.
    fn list_vehicles(&self) -> Result<Vec<Vehicle>>;

    fn set_notes(&self, id: &VehicleId, notes: &str) -> Result<()>;

    /// Table row of a vehicle.
    fn row_of(&self, id: &VehicleId) -> Result<usize>;
}
