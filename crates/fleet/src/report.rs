//! Result types returned by the coordinator.

use std::cmp::Ordering;

use serde::Serialize;

use depot_core::{DerivedState, RequiredRepair, Tier, VehicleId};
use depot_schedule::CascadePlan;

/// What one accepted edit did to a vehicle.
#[derive(Debug, Clone, Serialize)]
pub struct EditOutcome {
    pub vehicle: VehicleId,
    pub row: usize,
    /// Present for service events; clears do not cascade.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<CascadePlan>,
    pub touched_tiers: Vec<Tier>,
    pub derived: DerivedState,
    pub derived_changed: bool,
}

/// Outcome of a fleet-wide derived-state refresh.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub checked: usize,
    /// Vehicles whose derived fields were rewritten, in row order.
    pub changed: Vec<VehicleId>,
    pub failed: Vec<SweepFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepFailure {
    pub vehicle: VehicleId,
    pub error: String,
}

/// Models added and updated by a catalog import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub added: Vec<String>,
    pub updated: Vec<String>,
}

/// One line of the required-repairs report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueEntry {
    pub vehicle: VehicleId,
    pub model: String,
    pub row: usize,
    pub required: RequiredRepair,
}

/// Overdue entries first, heaviest tier first among them; everything else by
/// date. Remaining ties keep table order.
pub(crate) fn due_order(a: &DueEntry, b: &DueEntry) -> Ordering {
    let (ra, rb) = (&a.required, &b.required);
    rb.overdue
        .cmp(&ra.overdue)
        .then_with(|| {
            if ra.overdue && rb.overdue {
                rb.tier.cmp(&ra.tier)
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| ra.date.cmp(&rb.date))
        .then_with(|| rb.tier.cmp(&ra.tier))
        .then_with(|| a.row.cmp(&b.row))
}
