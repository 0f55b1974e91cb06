//! Tests for the scheduling engine.

use chrono::NaiveDate;

use depot_core::{DepotError, LastService, RequiredRepair, ServiceRecord, Tier};

use super::*;

const PROFILE: [u32; 6] = [30, 225, 450, 900, 2160, 4320];

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Record where `tier` was performed on `last` and is next due on `next`.
fn with_tier(mut record: ServiceRecord, tier: Tier, last: NaiveDate, next: NaiveDate) -> ServiceRecord {
    let dates = record.tier_mut(tier);
    dates.last_performed = Some(last);
    dates.next_due = Some(next);
    record
}

fn assert_invariants(record: &ServiceRecord) {
    record.check_pairing().unwrap();
    for tier in Tier::ALL {
        if let (Some(last), Some(next)) = (record.last_performed(tier), record.next_due(tier)) {
            assert!(next > last, "{tier}: next-due {next} not after {last}");
        }
    }
}

// -- cascade -------------------------------------------------------------

#[test]
fn cascade_sets_edited_tier_and_fills_empty_lower_tiers() {
    let plan = cascade(Tier::CurrentRepair1, d(1980, 1, 1), &PROFILE, &ServiceRecord::new()).unwrap();

    assert_eq!(plan.next_due(Tier::CurrentRepair1), Some(d(1980, 8, 13)));
    assert_eq!(plan.next_due(Tier::MinorInspection), Some(d(1980, 1, 31)));
    assert_eq!(
        plan.touched_tiers,
        vec![Tier::CurrentRepair1, Tier::MinorInspection]
    );
}

#[test]
fn cascade_keeps_later_lower_tier_schedule() {
    let current = with_tier(
        ServiceRecord::new(),
        Tier::MinorInspection,
        d(1980, 1, 20),
        d(1980, 2, 19),
    );

    let plan = cascade(Tier::CurrentRepair1, d(1980, 1, 1), &PROFILE, &current).unwrap();

    assert_eq!(plan.next_due(Tier::CurrentRepair1), Some(d(1980, 8, 13)));
    assert_eq!(plan.next_due(Tier::MinorInspection), None);
    assert_eq!(plan.touched_tiers, vec![Tier::CurrentRepair1]);
}

#[test]
fn cascade_equal_candidate_is_not_written() {
    let current = with_tier(
        ServiceRecord::new(),
        Tier::MinorInspection,
        d(1980, 1, 1),
        d(1980, 1, 31),
    );

    let plan = cascade(Tier::CurrentRepair2, d(1980, 1, 1), &PROFILE, &current).unwrap();

    assert_eq!(plan.next_due(Tier::MinorInspection), None);
    assert_eq!(
        plan.touched_tiers,
        vec![Tier::CurrentRepair2, Tier::CurrentRepair1]
    );
}

#[test]
fn cascade_moves_earlier_lower_tier_forward() {
    let current = with_tier(
        ServiceRecord::new(),
        Tier::MinorInspection,
        d(1979, 12, 1),
        d(1979, 12, 31),
    );

    let plan = cascade(Tier::CurrentRepair1, d(1980, 1, 1), &PROFILE, &current).unwrap();

    assert_eq!(plan.next_due(Tier::MinorInspection), Some(d(1980, 1, 31)));
}

#[test]
fn cascade_edited_tier_is_unconditional() {
    // An earlier date for the edited tier itself is a correction, not a
    // cascade, and always lands.
    let current = with_tier(
        ServiceRecord::new(),
        Tier::CurrentRepair1,
        d(1981, 1, 1),
        d(1981, 8, 14),
    );

    let plan = cascade(Tier::CurrentRepair1, d(1980, 1, 1), &PROFILE, &current).unwrap();

    assert_eq!(plan.next_due(Tier::CurrentRepair1), Some(d(1980, 8, 13)));
}

#[test]
fn cascade_tier_zero_touches_only_itself() {
    let plan = cascade(Tier::MinorInspection, d(2022, 3, 1), &PROFILE, &ServiceRecord::new()).unwrap();

    assert_eq!(plan.touched_tiers, vec![Tier::MinorInspection]);
    assert_eq!(plan.writes.len(), 2);
    assert_eq!(plan.lowest_touched(), Tier::MinorInspection);
}

#[test]
fn cascade_writes_descend_from_edited_tier() {
    let plan = cascade(Tier::CurrentRepair3, d(2020, 6, 1), &PROFILE, &ServiceRecord::new()).unwrap();

    let order: Vec<(Tier, DateField)> = plan.writes.iter().map(|w| (w.tier, w.field)).collect();
    assert_eq!(
        order,
        vec![
            (Tier::CurrentRepair3, DateField::LastPerformed),
            (Tier::CurrentRepair3, DateField::NextDue),
            (Tier::CurrentRepair2, DateField::LastPerformed),
            (Tier::CurrentRepair2, DateField::NextDue),
            (Tier::CurrentRepair1, DateField::LastPerformed),
            (Tier::CurrentRepair1, DateField::NextDue),
            (Tier::MinorInspection, DateField::LastPerformed),
            (Tier::MinorInspection, DateField::NextDue),
        ]
    );
    assert!(plan
        .writes
        .iter()
        .filter(|w| w.field == DateField::LastPerformed)
        .all(|w| w.date == d(2020, 6, 1)));
}

#[test]
fn cascade_forward_only_against_many_stored_dates() {
    let performed = d(2021, 5, 10);
    let candidate = d(2021, 6, 9); // performed + 30

    for offset in [-60i64, -1, 0, 1, 60] {
        let stored_next = candidate + chrono::Duration::days(offset);
        let stored_last = stored_next - chrono::Duration::days(30);
        let current = with_tier(ServiceRecord::new(), Tier::MinorInspection, stored_last, stored_next);

        let plan = cascade(Tier::MediumOverhaul, performed, &PROFILE, &current).unwrap();
        let mut after = current.clone();
        plan.apply_to(&mut after);

        assert_eq!(
            after.next_due(Tier::MinorInspection),
            Some(stored_next.max(candidate)),
            "offset {offset}"
        );
        assert_invariants(&after);
    }
}

#[test]
fn cascade_updates_collapse_per_tier() {
    let plan = cascade(Tier::CurrentRepair1, d(1980, 1, 1), &PROFILE, &ServiceRecord::new()).unwrap();
    let updates = plan.updates();

    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].tier, Tier::CurrentRepair1);
    assert_eq!(updates[0].last_performed, Some(d(1980, 1, 1)));
    assert_eq!(updates[0].next_due, Some(d(1980, 8, 13)));
    assert_eq!(updates[1].tier, Tier::MinorInspection);
    assert_eq!(updates[1].next_due, Some(d(1980, 1, 31)));
}

#[test]
fn cascade_rejects_short_profile() {
    let err = cascade(Tier::CurrentRepair1, d(1980, 1, 1), &PROFILE[..5], &ServiceRecord::new())
        .unwrap_err();
    assert_eq!(err, DepotError::MissingInterval(5));
}

#[test]
fn cascade_rejects_zero_interval() {
    let profile = [30, 225, 0, 900, 2160, 4320];
    let err = cascade(Tier::MinorInspection, d(1980, 1, 1), &profile, &ServiceRecord::new())
        .unwrap_err();
    assert_eq!(
        err,
        DepotError::InvalidInterval {
            tier: Tier::CurrentRepair2
        }
    );
}

#[test]
fn cascade_index_rejects_unknown_tier() {
    let err = cascade_index(6, d(1980, 1, 1), &PROFILE, &ServiceRecord::new()).unwrap_err();
    assert_eq!(err, DepotError::InvalidTier(6));

    let plan = cascade_index(1, d(1980, 1, 1), &PROFILE, &ServiceRecord::new()).unwrap();
    assert_eq!(plan.edited, Tier::CurrentRepair1);
}

#[test]
fn cascade_rejects_incomplete_record() {
    let mut current = ServiceRecord::new();
    current.tier_mut(Tier::CurrentRepair2).next_due = Some(d(1980, 5, 1));

    let err = cascade(Tier::CurrentRepair3, d(1980, 1, 1), &PROFILE, &current).unwrap_err();
    assert_eq!(
        err,
        DepotError::IncompleteRecord {
            tier: Tier::CurrentRepair2
        }
    );
}

#[test]
fn cascade_reports_calendar_overflow() {
    let err = cascade(Tier::FullOverhaul, NaiveDate::MAX, &PROFILE, &ServiceRecord::new()).unwrap_err();
    assert!(matches!(err, DepotError::DateOverflow { .. }));
}

#[test]
fn cascade_accepts_future_dates() {
    let plan = cascade(Tier::MinorInspection, d(2099, 1, 1), &PROFILE, &ServiceRecord::new()).unwrap();
    assert_eq!(plan.next_due(Tier::MinorInspection), Some(d(2099, 1, 31)));
}

// -- last service ----------------------------------------------------------

#[test]
fn last_service_absent_without_dates() {
    assert_eq!(recompute_last_service(&ServiceRecord::new()).unwrap(), None);
}

#[test]
fn last_service_picks_latest_date() {
    let record = with_tier(ServiceRecord::new(), Tier::FullOverhaul, d(2019, 1, 1), d(2030, 10, 30));
    let record = with_tier(record, Tier::MinorInspection, d(2022, 2, 1), d(2022, 3, 3));

    assert_eq!(
        recompute_last_service(&record).unwrap(),
        Some(LastService {
            date: d(2022, 2, 1),
            tier: Tier::MinorInspection
        })
    );
}

#[test]
fn last_service_tie_goes_to_higher_tier() {
    let same_day = d(2022, 5, 5);
    let forward = with_tier(ServiceRecord::new(), Tier::CurrentRepair1, same_day, d(2022, 12, 16));
    let forward = with_tier(forward, Tier::MediumOverhaul, same_day, d(2028, 4, 3));
    let forward = with_tier(forward, Tier::MinorInspection, d(2022, 5, 1), d(2022, 5, 31));

    let backward = with_tier(ServiceRecord::new(), Tier::MinorInspection, d(2022, 5, 1), d(2022, 5, 31));
    let backward = with_tier(backward, Tier::MediumOverhaul, same_day, d(2028, 4, 3));
    let backward = with_tier(backward, Tier::CurrentRepair1, same_day, d(2022, 12, 16));

    let expected = Some(LastService {
        date: same_day,
        tier: Tier::MediumOverhaul,
    });
    assert_eq!(recompute_last_service(&forward).unwrap(), expected);
    assert_eq!(recompute_last_service(&backward).unwrap(), expected);
}

#[test]
fn last_service_rejects_incomplete_record() {
    let mut record = ServiceRecord::new();
    record.tier_mut(Tier::MinorInspection).last_performed = Some(d(2022, 1, 1));
    assert!(matches!(
        recompute_last_service(&record),
        Err(DepotError::IncompleteRecord { .. })
    ));
}

// -- required repair -----------------------------------------------------

#[test]
fn required_prefers_highest_overdue_tier() {
    let record = with_tier(ServiceRecord::new(), Tier::MinorInspection, d(2021, 12, 1), d(2021, 12, 31));
    let record = with_tier(record, Tier::CurrentRepair2, d(2020, 9, 14), d(2021, 12, 28));

    assert_eq!(
        resolve_required(&record, d(2022, 1, 1)).unwrap(),
        Some(RequiredRepair {
            date: d(2021, 12, 28),
            tier: Tier::CurrentRepair2,
            overdue: true
        })
    );
}

#[test]
fn required_overdue_ignores_later_upcoming_higher_tier() {
    let record = with_tier(ServiceRecord::new(), Tier::MinorInspection, d(2021, 12, 1), d(2021, 12, 31));
    let record = with_tier(record, Tier::FullOverhaul, d(2015, 1, 1), d(2026, 10, 30));

    let required = resolve_required(&record, d(2022, 1, 1)).unwrap().unwrap();
    assert_eq!(required.tier, Tier::MinorInspection);
    assert!(required.overdue);
}

#[test]
fn required_due_today_is_not_overdue() {
    let record = with_tier(ServiceRecord::new(), Tier::MinorInspection, d(2021, 12, 2), d(2022, 1, 1));

    let required = resolve_required(&record, d(2022, 1, 1)).unwrap().unwrap();
    assert!(!required.overdue);
    assert_eq!(required.date, d(2022, 1, 1));
}

#[test]
fn required_same_month_goes_to_higher_tier() {
    let record = with_tier(ServiceRecord::new(), Tier::MinorInspection, d(2021, 12, 9), d(2022, 1, 8));
    let record = with_tier(record, Tier::CurrentRepair1, d(2021, 5, 29), d(2022, 1, 9));

    assert_eq!(
        resolve_required(&record, d(2022, 1, 1)).unwrap(),
        Some(RequiredRepair {
            date: d(2022, 1, 9),
            tier: Tier::CurrentRepair1,
            overdue: false
        })
    );
}

#[test]
fn required_month_window_is_calendar_month() {
    // 31 Jan and 1 Feb are a day apart but in different months.
    let record = with_tier(ServiceRecord::new(), Tier::MinorInspection, d(2022, 1, 1), d(2022, 1, 31));
    let record = with_tier(record, Tier::CurrentRepair1, d(2021, 6, 21), d(2022, 2, 1));

    let required = resolve_required(&record, d(2022, 1, 10)).unwrap().unwrap();
    assert_eq!(required.tier, Tier::MinorInspection);
}

#[test]
fn required_month_window_includes_year() {
    let record = with_tier(ServiceRecord::new(), Tier::MinorInspection, d(2021, 12, 9), d(2022, 1, 8));
    let record = with_tier(record, Tier::CurrentRepair3, d(2020, 7, 19), d(2023, 1, 5));

    let required = resolve_required(&record, d(2022, 1, 1)).unwrap().unwrap();
    assert_eq!(required.tier, Tier::MinorInspection);
}

#[test]
fn required_absent_without_dates() {
    let record = ServiceRecord::new();
    assert_eq!(resolve_required(&record, d(2022, 1, 1)).unwrap(), None);

    let derived = derive(&record, d(2022, 1, 1)).unwrap();
    assert!(derived.required.is_none());
    assert!(!derived.is_overdue());
}

#[test]
fn resolution_is_idempotent() {
    let record = with_tier(ServiceRecord::new(), Tier::MinorInspection, d(2021, 12, 9), d(2022, 1, 8));
    let record = with_tier(record, Tier::CurrentRepair1, d(2021, 5, 29), d(2022, 1, 9));
    let today = d(2022, 1, 3);

    assert_eq!(
        resolve_required(&record, today).unwrap(),
        resolve_required(&record, today).unwrap()
    );
    assert_eq!(
        recompute_last_service(&record).unwrap(),
        recompute_last_service(&record).unwrap()
    );
}

// -- derived state -------------------------------------------------------

#[test]
fn derived_change_detects_overdue_flip_without_date_change() {
    let record = with_tier(ServiceRecord::new(), Tier::MinorInspection, d(2021, 12, 2), d(2022, 1, 1));
    let mut stored = record.clone();
    stored.derived = derive(&record, d(2021, 12, 20)).unwrap();

    let change = DerivedChange::compute(&stored, d(2022, 1, 5)).unwrap();
    assert!(change.is_changed());
    assert!(change.required_changed());
    assert!(!change.last_service_changed());
    assert_eq!(change.before.required.unwrap().date, change.after.required.unwrap().date);
}

#[test]
fn applied_cascade_round_trips_through_resolution() {
    let today = d(2022, 1, 1);
    let current = with_tier(ServiceRecord::new(), Tier::MinorInspection, d(2021, 12, 1), d(2021, 12, 31));

    let plan = cascade(Tier::CurrentRepair2, d(2021, 12, 20), &PROFILE, &current).unwrap();
    let mut after = current.clone();
    plan.apply_to(&mut after);
    after.derived = derive(&after, today).unwrap();
    assert_invariants(&after);

    // Reading the stored record back and resolving again reproduces it.
    let reread: ServiceRecord = serde_json::from_str(&serde_json::to_string(&after).unwrap()).unwrap();
    let change = DerivedChange::compute(&reread, today).unwrap();
    assert!(!change.is_changed());
    assert_eq!(
        reread.derived.required,
        Some(RequiredRepair {
            date: d(2022, 1, 19),
            tier: Tier::MinorInspection,
            overdue: false
        })
    );
    assert_eq!(
        reread.derived.last_service,
        Some(LastService {
            date: d(2021, 12, 20),
            tier: Tier::CurrentRepair2
        })
    );
}
