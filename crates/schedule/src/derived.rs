//! Derived summary fields and the write-back decision.

use chrono::NaiveDate;

use depot_core::{DerivedState, Result, ServiceRecord};

use crate::last_service::recompute_last_service;
use crate::required::resolve_required;

/// Recompute both derived fields of `record` for the given reference date.
pub fn derive(record: &ServiceRecord, today: NaiveDate) -> Result<DerivedState> {
    Ok(DerivedState {
        last_service: recompute_last_service(record)?,
        required: resolve_required(record, today)?,
    })
}

/// Stored derived state next to a freshly computed one.
///
/// Any difference in the last-service pair or in the (date, tier, overdue)
/// triple counts as a change; an unchanged result means no write and no
/// notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedChange {
    pub before: DerivedState,
    pub after: DerivedState,
}

impl DerivedChange {
    pub fn compute(record: &ServiceRecord, today: NaiveDate) -> Result<Self> {
        Ok(Self {
            before: record.derived,
            after: derive(record, today)?,
        })
    }

    pub fn is_changed(&self) -> bool {
        self.before != self.after
    }

    pub fn last_service_changed(&self) -> bool {
        self.before.last_service != self.after.last_service
    }

    pub fn required_changed(&self) -> bool {
        self.before.required != self.after.required
    }
}
