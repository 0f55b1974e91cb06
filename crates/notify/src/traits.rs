//! Notifier trait definition and the changed-cell range it receives.

use std::ops::RangeInclusive;

use depot_core::Tier;

use crate::columns::Column;

/// A rectangular block of changed cells in the fleet table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub rows: RangeInclusive<usize>,
    pub columns: RangeInclusive<usize>,
}

impl CellRange {
    pub fn new(rows: RangeInclusive<usize>, columns: RangeInclusive<usize>) -> Self {
        Self { rows, columns }
    }

    /// Date cells of one row, from `low`'s last-performed column up to
    /// `high`'s next-due column.
    pub fn tier_dates(row: usize, high: Tier, low: Tier) -> Self {
        let first = Column::LastPerformed(low.min(high)).index();
        let last = Column::NextDue(high.max(low)).index();
        Self::new(row..=row, first..=last)
    }

    /// The derived-field cells of one row.
    pub fn derived(row: usize) -> Self {
        Self::new(row..=row, Column::DERIVED_FIRST.index()..=Column::DERIVED_LAST.index())
    }
}

/// Receives changed-cell ranges for view invalidation.
///
/// Purely informational: nothing is returned and a notifier cannot veto or
/// fail a change that has already been written.
pub trait ChangeNotifier: Send + Sync {
    fn cells_changed(&self, range: &CellRange);

    /// Human-readable name for this notifier (e.g., "tracing").
    fn channel_name(&self) -> &str;
}
