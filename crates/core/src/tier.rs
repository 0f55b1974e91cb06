//! The six service tiers and the per-model interval profile.
//!
//! Tiers are ordered by caliber: a higher tier covers everything a lower one
//! does, so performing it re-services every tier below it.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DepotError, Result};

/// Number of service tiers. Fixed; tiers are never created at runtime.
pub const TIER_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Tier {
    MinorInspection = 0,
    CurrentRepair1 = 1,
    CurrentRepair2 = 2,
    CurrentRepair3 = 3,
    MediumOverhaul = 4,
    FullOverhaul = 5,
}

impl Tier {
    /// All tiers, lowest caliber first.
    pub const ALL: [Tier; TIER_COUNT] = [
        Tier::MinorInspection,
        Tier::CurrentRepair1,
        Tier::CurrentRepair2,
        Tier::CurrentRepair3,
        Tier::MediumOverhaul,
        Tier::FullOverhaul,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(DepotError::InvalidTier(index))
    }

    /// Tiers strictly below this one, highest first.
    pub fn lower(self) -> impl Iterator<Item = Tier> {
        (0..self.index()).rev().map(|i| Self::ALL[i])
    }

    /// Short code used on the command line and in files.
    pub fn code(self) -> &'static str {
        match self {
            Tier::MinorInspection => "minor",
            Tier::CurrentRepair1 => "repair1",
            Tier::CurrentRepair2 => "repair2",
            Tier::CurrentRepair3 => "repair3",
            Tier::MediumOverhaul => "medium",
            Tier::FullOverhaul => "full",
        }
    }

    /// Display name. Not used by any scheduling logic.
    pub fn name(self) -> &'static str {
        match self {
            Tier::MinorInspection => "minor inspection",
            Tier::CurrentRepair1 => "current repair, grade 1",
            Tier::CurrentRepair2 => "current repair, grade 2",
            Tier::CurrentRepair3 => "current repair, grade 3",
            Tier::MediumOverhaul => "medium overhaul",
            Tier::FullOverhaul => "full overhaul",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<usize> for Tier {
    type Error = DepotError;

    fn try_from(index: usize) -> Result<Self> {
        Self::from_index(index)
    }
}

impl FromStr for Tier {
    type Err = DepotError;

    /// Accepts a short code (`repair2`) or a bare index (`2`).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Self::from_index(index);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| DepotError::UnknownTierName(s.to_string()))
    }
}

// ── Interval profile ────────────────────────────────────────────────

/// Days until each tier is next due, measured from when it was last performed.
///
/// Owned by a vehicle model, not by an individual vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct IntervalProfile {
    days: [u32; TIER_COUNT],
}

impl IntervalProfile {
    /// Validate arity and positivity.
    pub fn new(days: &[u32]) -> Result<Self> {
        let days: [u32; TIER_COUNT] = days
            .try_into()
            .map_err(|_| DepotError::MissingInterval(days.len()))?;
        for tier in Tier::ALL {
            if days[tier.index()] == 0 {
                return Err(DepotError::InvalidInterval { tier });
            }
        }
        Ok(Self { days })
    }

    pub fn days(&self, tier: Tier) -> u32 {
        self.days[tier.index()]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.days
    }
}

impl TryFrom<Vec<u32>> for IntervalProfile {
    type Error = DepotError;

    fn try_from(days: Vec<u32>) -> Result<Self> {
        Self::new(&days)
    }
}

impl From<IntervalProfile> for Vec<u32> {
    fn from(profile: IntervalProfile) -> Self {
        profile.days.to_vec()
    }
}

/// `date + days`, failing instead of panicking at the end of the calendar.
pub fn add_days(date: NaiveDate, days: u32) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(days)))
        .ok_or(DepotError::DateOverflow { date, days })
}
