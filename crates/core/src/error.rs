use chrono::NaiveDate;
use thiserror::Error;

use crate::tier::Tier;

/// Programmer/data errors raised by the scheduling engine.
///
/// None of these are recoverable inside the engine; the caller aborts the
/// edit and leaves persisted state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepotError {
    #[error("invalid tier index {0} (expected 0..=5)")]
    InvalidTier(usize),

    #[error("interval profile has {0} entries, expected 6")]
    MissingInterval(usize),

    #[error("interval for {tier} must be a positive number of days")]
    InvalidInterval { tier: Tier },

    #[error("incomplete record at {tier}: last-performed and next-due must be set together")]
    IncompleteRecord { tier: Tier },

    #[error("next-due date at {tier} must fall after its last-performed date")]
    DueNotAfterPerformed { tier: Tier },

    #[error("adding {days} days to {date} leaves the calendar range")]
    DateOverflow { date: NaiveDate, days: u32 },

    #[error("unknown tier '{0}'")]
    UnknownTierName(String),
}

pub type Result<T> = std::result::Result<T, DepotError>;
