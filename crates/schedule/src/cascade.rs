//! Forward-only cascade of a service event into lower tiers.
//!
//! Performing a tier implicitly re-services every tier below it. Each lower
//! tier is moved to `performed + interval` only when that lands strictly
//! after what is already on record; an existing later schedule already
//! accounts for more recent work and is left alone.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use depot_core::{add_days, DepotError, Result, ServiceRecord, Tier, TierUpdate, TIER_COUNT};

/// Which of a tier's two dates a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    LastPerformed,
    NextDue,
}

/// A single proposed date write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierWrite {
    pub tier: Tier,
    pub field: DateField,
    pub date: NaiveDate,
}

/// Every write a cascade proposes, computed before anything is applied.
///
/// Writes run from the edited tier down to tier 0; within a tier the
/// last-performed write precedes the next-due write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadePlan {
    pub edited: Tier,
    pub performed: NaiveDate,
    pub writes: Vec<TierWrite>,
    /// Tiers with at least one write, highest first.
    pub touched_tiers: Vec<Tier>,
}

impl CascadePlan {
    /// New next-due date for `tier`, if the plan moves it.
    pub fn next_due(&self, tier: Tier) -> Option<NaiveDate> {
        self.writes
            .iter()
            .find(|w| w.tier == tier && w.field == DateField::NextDue)
            .map(|w| w.date)
    }

    /// Collapse the writes into one update per touched tier.
    pub fn updates(&self) -> Vec<TierUpdate> {
        self.touched_tiers
            .iter()
            .map(|&tier| {
                let mut update = TierUpdate {
                    tier,
                    last_performed: None,
                    next_due: None,
                };
                for w in self.writes.iter().filter(|w| w.tier == tier) {
                    match w.field {
                        DateField::LastPerformed => update.last_performed = Some(w.date),
                        DateField::NextDue => update.next_due = Some(w.date),
                    }
                }
                update
            })
            .collect()
    }

    pub fn apply_to(&self, record: &mut ServiceRecord) {
        for w in &self.writes {
            let dates = record.tier_mut(w.tier);
            match w.field {
                DateField::LastPerformed => dates.last_performed = Some(w.date),
                DateField::NextDue => dates.next_due = Some(w.date),
            }
        }
    }

    /// Lowest tier the plan touches. The edited tier when nothing cascaded.
    pub fn lowest_touched(&self) -> Tier {
        self.touched_tiers.last().copied().unwrap_or(self.edited)
    }
}

/// Plan the writes for "tier `edited` was performed on `performed`".
///
/// `intervals` is the model's profile (one day count per tier) and `current`
/// the vehicle's record as stored; only its next-due dates are consulted.
pub fn cascade(
    edited: Tier,
    performed: NaiveDate,
    intervals: &[u32],
    current: &ServiceRecord,
) -> Result<CascadePlan> {
    if intervals.len() != TIER_COUNT {
        return Err(DepotError::MissingInterval(intervals.len()));
    }
    if let Some(tier) = Tier::ALL.into_iter().find(|t| intervals[t.index()] == 0) {
        return Err(DepotError::InvalidInterval { tier });
    }
    current.check_pairing()?;

    let mut writes = Vec::with_capacity(2 * (edited.index() + 1));
    let mut touched_tiers = Vec::with_capacity(edited.index() + 1);

    let next_due = add_days(performed, intervals[edited.index()])?;
    writes.push(TierWrite {
        tier: edited,
        field: DateField::LastPerformed,
        date: performed,
    });
    writes.push(TierWrite {
        tier: edited,
        field: DateField::NextDue,
        date: next_due,
    });
    touched_tiers.push(edited);

    for tier in edited.lower() {
        let candidate = add_days(performed, intervals[tier.index()])?;
        match current.next_due(tier) {
            Some(stored) if candidate <= stored => {
                debug!(
                    tier = tier.code(),
                    %candidate,
                    %stored,
                    "keeping later schedule"
                );
                continue;
            }
            _ => {}
        }
        writes.push(TierWrite {
            tier,
            field: DateField::LastPerformed,
            date: performed,
        });
        writes.push(TierWrite {
            tier,
            field: DateField::NextDue,
            date: candidate,
        });
        touched_tiers.push(tier);
    }

    debug!(
        edited = edited.code(),
        %performed,
        touched = touched_tiers.len(),
        "cascade planned"
    );

    Ok(CascadePlan {
        edited,
        performed,
        writes,
        touched_tiers,
    })
}

/// [`cascade`] for callers holding a raw tier index.
pub fn cascade_index(
    edited: usize,
    performed: NaiveDate,
    intervals: &[u32],
    current: &ServiceRecord,
) -> Result<CascadePlan> {
    cascade(Tier::from_index(edited)?, performed, intervals, current)
}
