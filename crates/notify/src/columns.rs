//! Column layout of the fleet table.
//!
//! ```text
//! 0        vehicle
//! 1        model
//! 2 + 2t   last performed, tier t
//! 3 + 2t   next due, tier t
//! 14..=18  last-service date, last-service tier, required date,
//!          required tier, overdue
//! 19       notes
//! ```

use depot_core::{Tier, TIER_COUNT};

const TIER_BASE: usize = 2;
const DERIVED_BASE: usize = TIER_BASE + 2 * TIER_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Vehicle,
    Model,
    LastPerformed(Tier),
    NextDue(Tier),
    LastServiceDate,
    LastServiceTier,
    RequiredDate,
    RequiredTier,
    Overdue,
    Notes,
}

impl Column {
    pub const DERIVED_FIRST: Column = Column::LastServiceDate;
    pub const DERIVED_LAST: Column = Column::Overdue;
    pub const COUNT: usize = DERIVED_BASE + 6;

    pub fn index(self) -> usize {
        match self {
            Column::Vehicle => 0,
            Column::Model => 1,
            Column::LastPerformed(t) => TIER_BASE + 2 * t.index(),
            Column::NextDue(t) => TIER_BASE + 2 * t.index() + 1,
            Column::LastServiceDate => DERIVED_BASE,
            Column::LastServiceTier => DERIVED_BASE + 1,
            Column::RequiredDate => DERIVED_BASE + 2,
            Column::RequiredTier => DERIVED_BASE + 3,
            Column::Overdue => DERIVED_BASE + 4,
            Column::Notes => DERIVED_BASE + 5,
        }
    }

    /// Header text.
    pub fn title(self) -> String {
        match self {
            Column::Vehicle => "vehicle".to_string(),
            Column::Model => "model".to_string(),
            Column::LastPerformed(t) => format!("{} last", t.code()),
            Column::NextDue(t) => format!("{} next", t.code()),
            Column::LastServiceDate => "last service".to_string(),
            Column::LastServiceTier => "last tier".to_string(),
            Column::RequiredDate => "required".to_string(),
            Column::RequiredTier => "required tier".to_string(),
            Column::Overdue => "overdue".to_string(),
            Column::Notes => "notes".to_string(),
        }
    }
}
