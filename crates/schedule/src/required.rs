//! Resolution of the single next required action for a vehicle.
//!
//! Two passes with different priority rules:
//!
//! 1. **Overdue**: any tier with a next-due date strictly before `today`.
//!    Caliber decides: the highest overdue tier is reported, since performing
//!    it satisfies the lower ones too.
//! 2. **Upcoming**: otherwise the earliest next-due date picks a target
//!    calendar month, and the highest tier due within that month is reported.

use chrono::{Datelike, NaiveDate};

use depot_core::{RequiredRepair, Result, ServiceRecord, Tier};

pub fn resolve_required(record: &ServiceRecord, today: NaiveDate) -> Result<Option<RequiredRepair>> {
    record.check_pairing()?;

    if let Some(overdue) = highest_overdue(record, today) {
        return Ok(Some(overdue));
    }
    Ok(nearest_upcoming(record))
}

fn highest_overdue(record: &ServiceRecord, today: NaiveDate) -> Option<RequiredRepair> {
    Tier::ALL.into_iter().rev().find_map(|tier| {
        record
            .next_due(tier)
            .filter(|due| *due < today)
            .map(|date| RequiredRepair {
                date,
                tier,
                overdue: true,
            })
    })
}

fn nearest_upcoming(record: &ServiceRecord) -> Option<RequiredRepair> {
    let earliest = Tier::ALL
        .into_iter()
        .filter_map(|tier| record.next_due(tier))
        .min()?;
    let target = month_of(earliest);

    Tier::ALL.into_iter().rev().find_map(|tier| {
        record
            .next_due(tier)
            .filter(|due| month_of(*due) == target)
            .map(|date| RequiredRepair {
                date,
                tier,
                overdue: false,
            })
    })
}

fn month_of(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}
