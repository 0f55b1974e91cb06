//! Change notification for fleet table views.
//!
//! This crate provides:
//! - `ChangeNotifier` trait receiving (row range, column range) pairs
//! - `Column` layout of the fleet table
//! - Tracing and recording notifier implementations
//! - Dispatcher that fans one change out to several notifiers

pub mod channels;
pub mod columns;
pub mod dispatcher;
pub mod traits;

pub use channels::{RecordingNotifier, TracingNotifier};
pub use columns::Column;
pub use dispatcher::Dispatcher;
pub use traits::{CellRange, ChangeNotifier};
