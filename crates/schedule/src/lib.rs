//! Repair-schedule computation engine.
//!
//! This crate provides three pure operations over a vehicle's
//! [`ServiceRecord`](depot_core::ServiceRecord):
//! - [`cascade`]: recompute an edited tier's next-due date and propagate it
//!   forward-only into every lower tier
//! - [`recompute_last_service`]: the most recent service across all tiers
//! - [`resolve_required`]: the single next action, overdue-aware
//!
//! Nothing here performs I/O or keeps state between calls. Applying a
//! [`CascadePlan`] and refreshing derived fields afterwards is the caller's job.

pub mod cascade;
pub mod derived;
pub mod last_service;
pub mod required;

pub use cascade::{cascade, cascade_index, CascadePlan, DateField, TierWrite};
pub use derived::{derive, DerivedChange};
pub use last_service::recompute_last_service;
pub use required::resolve_required;

#[cfg(test)]
mod tests;
