//! Fleet coordinator: applies edits through the engine and the record store.
//!
//! Per vehicle, every edit runs read, compute, one store commit, notify, all
//! under that vehicle's lock. Tier dates and derived fields are computed in
//! memory and committed together; a failed commit leaves the stored record
//! as it was. Different vehicles never wait on each other.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde_json::json;
use tracing::{debug, info, warn};

use depot_core::config::JournalConfig;
use depot_core::{IntervalProfile, ServiceRecord, Tier, TierDates, Vehicle, VehicleId};
use depot_notify::{CellRange, ChangeNotifier, Column};
use depot_schedule::{cascade, resolve_required, DerivedChange};
use depot_storage::{ModelCatalog, RecordStore, StorageError};

use crate::error::{FleetError, Result};
use crate::journal::{JournalAction, JournalEntry, JournalQuery, ServiceJournal};
use crate::locks::VehicleLocks;
use crate::report::{due_order, DueEntry, EditOutcome, ImportReport, SweepFailure, SweepReport};

pub struct Fleet {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn ChangeNotifier>,
    locks: VehicleLocks,
    journal: ServiceJournal,
}

impl Fleet {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self::with_journal_config(store, notifier, &JournalConfig::default())
    }

    pub fn with_journal_config(
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn ChangeNotifier>,
        journal: &JournalConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            locks: VehicleLocks::new(),
            journal: ServiceJournal::with_max_entries(journal.max_entries),
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn history(&self, id: &VehicleId, query: &JournalQuery) -> Vec<JournalEntry> {
        self.journal.query(id, query)
    }

    // ── Service events ──────────────────────────────────────────

    /// Record that `tier` was performed on `performed`, cascade into lower
    /// tiers and refresh the derived fields against `today`.
    pub fn record_service(
        &self,
        id: &VehicleId,
        tier: Tier,
        performed: NaiveDate,
        today: NaiveDate,
    ) -> Result<EditOutcome> {
        let slot = self.locks.slot(id);
        let _guard = slot.lock().expect("vehicle lock poisoned");

        match self.apply_service(id, tier, performed, today) {
            Ok(outcome) => {
                info!(
                    vehicle = %id,
                    tier = tier.code(),
                    %performed,
                    touched = outcome.touched_tiers.len(),
                    derived_changed = outcome.derived_changed,
                    "service recorded"
                );
                self.journal.record(
                    id,
                    JournalAction::ServiceRecorded,
                    outcome.touched_tiers.clone(),
                    format!("{} performed on {}", tier.name(), performed),
                    outcome.plan.as_ref().map(|plan| json!({ "writes": plan.writes })),
                );
                Ok(outcome)
            }
            Err(e) => {
                warn!(vehicle = %id, tier = tier.code(), %performed, error = %e, "service edit rejected");
                self.reject(
                    id,
                    &e,
                    vec![tier],
                    format!("{} on {} rejected: {}", tier.name(), performed, e),
                );
                Err(e)
            }
        }
    }

    /// [`Fleet::record_service`] for callers holding a raw tier index.
    pub fn record_service_index(
        &self,
        id: &VehicleId,
        tier: usize,
        performed: NaiveDate,
        today: NaiveDate,
    ) -> Result<EditOutcome> {
        let tier = Tier::from_index(tier).map_err(|e| {
            warn!(vehicle = %id, error = %e, "service edit rejected");
            let e = FleetError::from(e);
            if self.store.row_of(id).is_ok() {
                self.reject(id, &e, vec![], e.to_string());
            }
            e
        })?;
        self.record_service(id, tier, performed, today)
    }

    fn apply_service(
        &self,
        id: &VehicleId,
        tier: Tier,
        performed: NaiveDate,
        today: NaiveDate,
    ) -> Result<EditOutcome> {
        let vehicle = self.store.get_vehicle(id)?;
        let profile = self.store.get_interval_profile(&vehicle.model)?;
        let plan = cascade(tier, performed, profile.as_slice(), &vehicle.record)?;

        let mut record = vehicle.record;
        plan.apply_to(&mut record);
        let change = self.commit(id, record, today)?;

        let row = self.store.row_of(id)?;
        self.notifier
            .cells_changed(&CellRange::tier_dates(row, plan.edited, plan.lowest_touched()));
        if change.is_changed() {
            self.notifier.cells_changed(&CellRange::derived(row));
        }

        Ok(EditOutcome {
            vehicle: id.clone(),
            row,
            touched_tiers: plan.touched_tiers.clone(),
            plan: Some(plan),
            derived: change.after,
            derived_changed: change.is_changed(),
        })
    }

    /// Remove a tier's dates. Lower tiers are left as they are.
    pub fn clear_tier(&self, id: &VehicleId, tier: Tier, today: NaiveDate) -> Result<EditOutcome> {
        let slot = self.locks.slot(id);
        let _guard = slot.lock().expect("vehicle lock poisoned");

        match self.apply_clear(id, tier, today) {
            Ok(outcome) => {
                info!(vehicle = %id, tier = tier.code(), "tier cleared");
                self.journal.record(
                    id,
                    JournalAction::TierCleared,
                    outcome.touched_tiers.clone(),
                    format!("{} cleared", tier.name()),
                    None,
                );
                Ok(outcome)
            }
            Err(e) => {
                warn!(vehicle = %id, tier = tier.code(), error = %e, "clear rejected");
                self.reject(
                    id,
                    &e,
                    vec![tier],
                    format!("clearing {} rejected: {}", tier.name(), e),
                );
                Err(e)
            }
        }
    }

    fn apply_clear(&self, id: &VehicleId, tier: Tier, today: NaiveDate) -> Result<EditOutcome> {
        let mut record = self.store.get_record(id)?;
        let had_dates = *record.tier(tier) != TierDates::default();

        *record.tier_mut(tier) = TierDates::default();
        let change = if had_dates {
            self.commit(id, record, today)?
        } else {
            self.settle_derived(id, today)?
        };

        let row = self.store.row_of(id)?;
        if had_dates {
            self.notifier
                .cells_changed(&CellRange::tier_dates(row, tier, tier));
        }
        if change.is_changed() {
            self.notifier.cells_changed(&CellRange::derived(row));
        }

        Ok(EditOutcome {
            vehicle: id.clone(),
            row,
            plan: None,
            touched_tiers: if had_dates { vec![tier] } else { Vec::new() },
            derived: change.after,
            derived_changed: change.is_changed(),
        })
    }

    /// Journal a rejected edit. Unknown vehicles get no entry and no lock slot.
    fn reject(&self, id: &VehicleId, error: &FleetError, tiers: Vec<Tier>, message: String) {
        if matches!(error, FleetError::Storage(StorageError::VehicleNotFound(_))) {
            self.locks.forget(id);
            return;
        }
        self.journal
            .record(id, JournalAction::Rejected, tiers, message, None);
    }

    // ── Derived state ───────────────────────────────────────────

    /// Derive fields for an edited record and store dates and derived fields
    /// in one write.
    fn commit(&self, id: &VehicleId, mut record: ServiceRecord, today: NaiveDate) -> Result<DerivedChange> {
        let change = DerivedChange::compute(&record, today)?;
        record.derived = change.after;
        self.store.write_record(id, &record)?;
        Ok(change)
    }

    /// Recompute a vehicle's derived fields and write them back if they moved.
    fn settle_derived(&self, id: &VehicleId, today: NaiveDate) -> Result<DerivedChange> {
        let record = self.store.get_record(id)?;
        let change = DerivedChange::compute(&record, today)?;
        if change.is_changed() {
            self.store.write_derived(id, &change.after)?;
            debug!(
                vehicle = %id,
                last_service = change.last_service_changed(),
                required = change.required_changed(),
                "derived fields updated"
            );
        }
        Ok(change)
    }

    /// Re-resolve one vehicle against `today`. Writes and notifies only
    /// when the derived fields changed.
    pub fn refresh_vehicle(&self, id: &VehicleId, today: NaiveDate) -> Result<DerivedChange> {
        let slot = self.locks.slot(id);
        let _guard = slot.lock().expect("vehicle lock poisoned");

        let change = self.settle_derived(id, today)?;
        if change.is_changed() {
            let row = self.store.row_of(id)?;
            self.notifier.cells_changed(&CellRange::derived(row));
            self.journal.record(
                id,
                JournalAction::DerivedRefreshed,
                vec![],
                format!("derived fields refreshed for {}", today),
                Some(json!({ "before": change.before, "after": change.after })),
            );
        }
        Ok(change)
    }

    /// Refresh every vehicle in parallel. Per-vehicle failures are collected,
    /// not propagated.
    pub fn refresh_all(&self, today: NaiveDate) -> Result<SweepReport> {
        let ids: Vec<VehicleId> = self
            .store
            .list_vehicles()?
            .into_iter()
            .map(|v| v.id)
            .collect();

        let results: Vec<(VehicleId, Result<DerivedChange>)> = ids
            .par_iter()
            .map(|id| (id.clone(), self.refresh_vehicle(id, today)))
            .collect();

        let mut report = SweepReport {
            checked: results.len(),
            ..Default::default()
        };
        for (vehicle, result) in results {
            match result {
                Ok(change) if change.is_changed() => report.changed.push(vehicle),
                Ok(_) => {}
                Err(e) => {
                    warn!(vehicle = %vehicle, error = %e, "refresh failed");
                    report.failed.push(SweepFailure {
                        vehicle,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            %today,
            checked = report.checked,
            changed = report.changed.len(),
            failed = report.failed.len(),
            "fleet refresh complete"
        );
        Ok(report)
    }

    /// Every vehicle with a required action, most urgent first.
    pub fn required_report(&self, today: NaiveDate) -> Result<Vec<DueEntry>> {
        let mut entries = Vec::new();
        for (row, vehicle) in self.store.list_vehicles()?.into_iter().enumerate() {
            if let Some(required) = resolve_required(&vehicle.record, today)? {
                entries.push(DueEntry {
                    vehicle: vehicle.id,
                    model: vehicle.model,
                    row,
                    required,
                });
            }
        }
        entries.sort_by(due_order);
        Ok(entries)
    }

    // ── Model registry ──────────────────────────────────────────

    pub fn register_model(&self, name: &str, profile: IntervalProfile) -> Result<()> {
        self.store.register_model(name, profile)?;
        info!(model = name, "model registered");
        Ok(())
    }

    /// Applies to future cascades only; stored dates are not recomputed.
    pub fn update_model(&self, name: &str, profile: IntervalProfile) -> Result<()> {
        self.store.update_model(name, profile)?;
        info!(model = name, "model profile updated");
        Ok(())
    }

    pub fn remove_model(&self, name: &str) -> Result<()> {
        self.store.remove_model(name)?;
        info!(model = name, "model removed");
        Ok(())
    }

    pub fn list_models(&self) -> Result<Vec<(String, IntervalProfile)>> {
        Ok(self.store.list_models()?)
    }

    /// Upsert every catalog entry, in file order.
    pub fn import_models(&self, catalog: &ModelCatalog) -> Result<ImportReport> {
        let known: HashSet<String> = self
            .store
            .list_models()?
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        let mut report = ImportReport::default();
        for entry in &catalog.models {
            let name = entry.name.trim();
            if known.contains(name) {
                self.store.update_model(name, entry.intervals.clone())?;
                report.updated.push(name.to_string());
            } else {
                self.store.register_model(name, entry.intervals.clone())?;
                report.added.push(name.to_string());
            }
        }

        info!(
            added = report.added.len(),
            updated = report.updated.len(),
            "model catalog imported"
        );
        Ok(report)
    }

    // ── Vehicle registry ────────────────────────────────────────

    pub fn add_vehicle(&self, id: VehicleId, model: &str, notes: Option<&str>) -> Result<usize> {
        let mut vehicle = Vehicle::new(id.clone(), model);
        if let Some(notes) = notes {
            vehicle.notes = notes.to_string();
        }
        self.store.add_vehicle(vehicle)?;

        let row = self.store.row_of(&id)?;
        self.notifier.cells_changed(&CellRange::new(row..=row, 0..=Column::COUNT - 1));
        self.journal.record(
            &id,
            JournalAction::VehicleAdded,
            vec![],
            format!("added as {} at row {}", model, row),
            None,
        );
        info!(vehicle = %id, model, row, "vehicle added");
        Ok(row)
    }

    /// Rows below the removed one shift up, so every row from it to the old
    /// last row is reported as changed.
    pub fn remove_vehicle(&self, id: &VehicleId) -> Result<Vehicle> {
        let slot = self.locks.slot(id);
        let _guard = slot.lock().expect("vehicle lock poisoned");

        let removed = self.store.remove_vehicle(id)?;
        let row = removed.row;
        let last_row = removed.previous_len.saturating_sub(1);

        self.notifier
            .cells_changed(&CellRange::new(row..=last_row, 0..=Column::COUNT - 1));
        self.journal.clear(id);
        self.locks.forget(id);
        info!(vehicle = %id, row, "vehicle removed");
        Ok(removed.vehicle)
    }

    pub fn vehicle(&self, id: &VehicleId) -> Result<Vehicle> {
        Ok(self.store.get_vehicle(id)?)
    }

    pub fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        Ok(self.store.list_vehicles()?)
    }

    pub fn set_notes(&self, id: &VehicleId, notes: &str) -> Result<()> {
        let slot = self.locks.slot(id);
        let _guard = slot.lock().expect("vehicle lock poisoned");

        self.store.set_notes(id, notes)?;
        let row = self.store.row_of(id)?;
        let notes_col = Column::Notes.index();
        self.notifier
            .cells_changed(&CellRange::new(row..=row, notes_col..=notes_col));
        self.journal
            .record(id, JournalAction::NotesChanged, vec![], "notes changed", None);
        Ok(())
    }
}
