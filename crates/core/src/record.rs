//! Per-vehicle service state: tier dates plus the derived summary fields.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DepotError, Result};
use crate::tier::{Tier, TIER_COUNT};

/// Fleet number of a vehicle (e.g. "TEM2-0417").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub String);

impl VehicleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Last-performed / next-due pair for one tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_performed: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due: Option<NaiveDate>,
}

impl TierDates {
    pub fn is_paired(&self) -> bool {
        self.last_performed.is_some() == self.next_due.is_some()
    }

    /// Next-due strictly after last-performed, when both are set.
    pub fn is_ordered(&self) -> bool {
        match (self.last_performed, self.next_due) {
            (Some(last), Some(next)) => next > last,
            _ => true,
        }
    }
}

/// Replacement values for one tier's two dates. `None` clears the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierUpdate {
    pub tier: Tier,
    pub last_performed: Option<NaiveDate>,
    pub next_due: Option<NaiveDate>,
}

impl TierUpdate {
    pub fn apply_to(&self, record: &mut ServiceRecord) {
        let dates = record.tier_mut(self.tier);
        dates.last_performed = self.last_performed;
        dates.next_due = self.next_due;
    }
}

/// Most recent service actually performed, across all tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastService {
    pub date: NaiveDate,
    pub tier: Tier,
}

/// The single next action the operator must take for a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredRepair {
    pub date: NaiveDate,
    pub tier: Tier,
    pub overdue: bool,
}

/// Derived summary fields of a [`ServiceRecord`].
///
/// A pure function of the tier dates and the reference date; stores keep a
/// copy so views do not have to recompute it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_service: Option<LastService>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<RequiredRepair>,
}

impl DerivedState {
    pub fn is_overdue(&self) -> bool {
        self.required.map_or(false, |r| r.overdue)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub tiers: [TierDates; TIER_COUNT],
    #[serde(default)]
    pub derived: DerivedState,
}

impl ServiceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tier(&self, tier: Tier) -> &TierDates {
        &self.tiers[tier.index()]
    }

    pub fn tier_mut(&mut self, tier: Tier) -> &mut TierDates {
        &mut self.tiers[tier.index()]
    }

    pub fn last_performed(&self, tier: Tier) -> Option<NaiveDate> {
        self.tier(tier).last_performed
    }

    pub fn next_due(&self, tier: Tier) -> Option<NaiveDate> {
        self.tier(tier).next_due
    }

    pub fn is_overdue(&self) -> bool {
        self.derived.is_overdue()
    }

    /// Reject records where a tier has one of its two dates but not the other.
    pub fn check_pairing(&self) -> Result<()> {
        match Tier::ALL.into_iter().find(|t| !self.tier(*t).is_paired()) {
            Some(tier) => Err(DepotError::IncompleteRecord { tier }),
            None => Ok(()),
        }
    }

    /// Pairing plus date order for every tier. Stores run this before
    /// accepting a record.
    pub fn validate(&self) -> Result<()> {
        self.check_pairing()?;
        match Tier::ALL.into_iter().find(|t| !self.tier(*t).is_ordered()) {
            Some(tier) => Err(DepotError::DueNotAfterPerformed { tier }),
            None => Ok(()),
        }
    }
}

/// A fleet vehicle: identity, model, service record and free-text notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub model: String,
    #[serde(default)]
    pub record: ServiceRecord,
    #[serde(default)]
    pub notes: String,
}

impl Vehicle {
    pub fn new(id: VehicleId, model: impl Into<String>) -> Self {
        Self {
            id,
            model: model.into(),
            record: ServiceRecord::new(),
            notes: String::new(),
        }
    }
}
