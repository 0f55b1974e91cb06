//! Plain fleet state and the operations on it.
//!
//! [`FleetData`] knows nothing about locking or files; [`crate::FleetStore`]
//! wraps it with both.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use depot_core::{
    DepotError, DerivedState, IntervalProfile, ServiceRecord, Tier, TierUpdate, Vehicle, VehicleId,
};

use crate::error::{Result, StorageError};
use crate::store::RemovedVehicle;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetData {
    #[serde(default)]
    pub models: BTreeMap<String, IntervalProfile>,
    /// Insertion order is table row order.
    #[serde(default)]
    pub vehicles: IndexMap<VehicleId, Vehicle>,
}

impl FleetData {
    pub fn vehicle(&self, id: &VehicleId) -> Result<&Vehicle> {
        self.vehicles
            .get(id)
            .ok_or_else(|| StorageError::VehicleNotFound(id.clone()))
    }

    fn vehicle_mut(&mut self, id: &VehicleId) -> Result<&mut Vehicle> {
        self.vehicles
            .get_mut(id)
            .ok_or_else(|| StorageError::VehicleNotFound(id.clone()))
    }

    pub fn profile(&self, model: &str) -> Result<&IntervalProfile> {
        self.models
            .get(model)
            .ok_or_else(|| StorageError::ModelNotFound(model.to_string()))
    }

    pub fn row_of(&self, id: &VehicleId) -> Result<usize> {
        self.vehicles
            .get_index_of(id)
            .ok_or_else(|| StorageError::VehicleNotFound(id.clone()))
    }

    pub fn write_tier_dates(
        &mut self,
        id: &VehicleId,
        tier: Tier,
        last_performed: Option<NaiveDate>,
        next_due: Option<NaiveDate>,
    ) -> Result<()> {
        self.write_tier_batch(
            id,
            &[TierUpdate {
                tier,
                last_performed,
                next_due,
            }],
        )
    }

    /// Apply every update to a copy of the record, validate it, then commit.
    pub fn write_tier_batch(&mut self, id: &VehicleId, updates: &[TierUpdate]) -> Result<()> {
        let vehicle = self.vehicle_mut(id)?;
        let mut record: ServiceRecord = vehicle.record.clone();
        for update in updates {
            if update.last_performed.is_some() != update.next_due.is_some() {
                return Err(DepotError::IncompleteRecord { tier: update.tier }.into());
            }
            update.apply_to(&mut record);
        }
        record.validate()?;
        vehicle.record = record;
        Ok(())
    }

    pub fn write_record(&mut self, id: &VehicleId, record: &ServiceRecord) -> Result<()> {
        let vehicle = self.vehicle_mut(id)?;
        record.validate()?;
        vehicle.record = record.clone();
        Ok(())
    }

    pub fn write_derived(&mut self, id: &VehicleId, derived: &DerivedState) -> Result<()> {
        self.vehicle_mut(id)?.record.derived = *derived;
        Ok(())
    }

    pub fn register_model(&mut self, name: &str, profile: IntervalProfile) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::Validation("model name must not be empty".to_string()));
        }
        if self.models.contains_key(name) {
            return Err(StorageError::ModelExists(name.to_string()));
        }
        self.models.insert(name.to_string(), profile);
        Ok(())
    }

    pub fn update_model(&mut self, name: &str, profile: IntervalProfile) -> Result<()> {
        let slot = self
            .models
            .get_mut(name)
            .ok_or_else(|| StorageError::ModelNotFound(name.to_string()))?;
        *slot = profile;
        Ok(())
    }

    pub fn remove_model(&mut self, name: &str) -> Result<()> {
        if !self.models.contains_key(name) {
            return Err(StorageError::ModelNotFound(name.to_string()));
        }
        let users = self.vehicles.values().filter(|v| v.model == name).count();
        if users > 0 {
            return Err(StorageError::ModelInUse {
                model: name.to_string(),
                vehicles: users,
            });
        }
        self.models.remove(name);
        Ok(())
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> Result<()> {
        if vehicle.id.as_str().trim().is_empty() {
            return Err(StorageError::Validation("vehicle id must not be empty".to_string()));
        }
        if self.vehicles.contains_key(&vehicle.id) {
            return Err(StorageError::VehicleExists(vehicle.id));
        }
        self.profile(&vehicle.model)?;
        vehicle.record.validate()?;
        self.vehicles.insert(vehicle.id.clone(), vehicle);
        Ok(())
    }

    /// Later rows shift up by one.
    pub fn remove_vehicle(&mut self, id: &VehicleId) -> Result<RemovedVehicle> {
        let previous_len = self.vehicles.len();
        let (row, _, vehicle) = self
            .vehicles
            .shift_remove_full(id)
            .ok_or_else(|| StorageError::VehicleNotFound(id.clone()))?;
        Ok(RemovedVehicle {
            vehicle,
            row,
            previous_len,
        })
    }

    pub fn set_notes(&mut self, id: &VehicleId, notes: &str) -> Result<()> {
        self.vehicle_mut(id)?.notes = notes.to_string();
        Ok(())
    }
}
