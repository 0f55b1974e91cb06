//! Fleet coordination layer.
//!
//! Wires the schedule engine to a [`RecordStore`](depot_storage::RecordStore)
//! and a [`ChangeNotifier`](depot_notify::ChangeNotifier):
//! - per-vehicle serialization of edits
//! - derived-state refresh after every accepted edit, and fleet-wide sweeps
//! - the required-repairs report
//! - an in-memory edit journal

pub mod coordinator;
pub mod error;
pub mod journal;
pub mod locks;
pub mod report;

pub use coordinator::Fleet;
pub use error::{FleetError, Result};
pub use journal::{JournalAction, JournalEntry, JournalQuery, ServiceJournal};
pub use report::{DueEntry, EditOutcome, ImportReport, SweepFailure, SweepReport};
