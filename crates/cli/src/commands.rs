use anyhow::{Context, Result};
use chrono::NaiveDate;

use depot_core::IntervalProfile;
use depot_fleet::Fleet;
use depot_storage::ModelCatalog;

use crate::cli::{Command, ModelCommand, ServiceCommand, VehicleCommand};
use crate::terminal::Terminal;

pub fn run(fleet: &Fleet, command: Command, today: NaiveDate, terminal: &Terminal) -> Result<()> {
    match command {
        Command::Model { action } => run_model(fleet, action, terminal),
        Command::Vehicle { action } => run_vehicle(fleet, action, terminal),
        Command::Service { action } => run_service(fleet, action, today, terminal),
        Command::Refresh => {
            let report = fleet.refresh_all(today).context("fleet refresh failed")?;
            terminal.print_sweep(&report, today)
        }
        Command::Due => {
            let entries = fleet
                .required_report(today)
                .context("failed to build required-repairs report")?;
            terminal.print_due(&entries)
        }
    }
}

fn run_model(fleet: &Fleet, action: ModelCommand, terminal: &Terminal) -> Result<()> {
    match action {
        ModelCommand::Add { name, intervals } => {
            let profile = IntervalProfile::new(&intervals)?;
            fleet
                .register_model(&name, profile)
                .with_context(|| format!("failed to register model '{}'", name))?;
            terminal.print_ok(&format!("model {} registered", name))
        }
        ModelCommand::Set { name, intervals } => {
            let profile = IntervalProfile::new(&intervals)?;
            fleet
                .update_model(&name, profile)
                .with_context(|| format!("failed to update model '{}'", name))?;
            terminal.print_ok(&format!("model {} updated", name))
        }
        ModelCommand::Remove { name } => {
            fleet
                .remove_model(&name)
                .with_context(|| format!("failed to remove model '{}'", name))?;
            terminal.print_ok(&format!("model {} removed", name))
        }
        ModelCommand::List => terminal.print_models(&fleet.list_models()?),
        ModelCommand::Import { file } => {
            let catalog = ModelCatalog::load(&file)
                .with_context(|| format!("failed to read model catalog {}", file.display()))?;
            let report = fleet.import_models(&catalog)?;
            terminal.print_import(&report)
        }
    }
}

fn run_vehicle(fleet: &Fleet, action: VehicleCommand, terminal: &Terminal) -> Result<()> {
    match action {
        VehicleCommand::Add { id, model, notes } => {
            let row = fleet
                .add_vehicle(id.clone(), &model, notes.as_deref())
                .with_context(|| format!("failed to add vehicle {}", id))?;
            terminal.print_ok(&format!("vehicle {} added at row {}", id, row))
        }
        VehicleCommand::Remove { id } => {
            fleet
                .remove_vehicle(&id)
                .with_context(|| format!("failed to remove vehicle {}", id))?;
            terminal.print_ok(&format!("vehicle {} removed", id))
        }
        VehicleCommand::List => terminal.print_vehicles(&fleet.list_vehicles()?),
        VehicleCommand::Show { id } => {
            let vehicle = fleet
                .vehicle(&id)
                .with_context(|| format!("failed to load vehicle {}", id))?;
            terminal.print_vehicle(&vehicle)
        }
        VehicleCommand::Notes { id, text } => {
            fleet
                .set_notes(&id, &text)
                .with_context(|| format!("failed to update notes of {}", id))?;
            terminal.print_ok(&format!("notes of {} updated", id))
        }
    }
}

fn run_service(
    fleet: &Fleet,
    action: ServiceCommand,
    today: NaiveDate,
    terminal: &Terminal,
) -> Result<()> {
    match action {
        ServiceCommand::Record { id, tier, date } => {
            let outcome = fleet
                .record_service(&id, tier, date, today)
                .with_context(|| format!("failed to record {} for {}", tier.name(), id))?;
            terminal.print_outcome(&outcome)
        }
        ServiceCommand::Clear { id, tier } => {
            let outcome = fleet
                .clear_tier(&id, tier, today)
                .with_context(|| format!("failed to clear {} for {}", tier.name(), id))?;
            terminal.print_outcome(&outcome)
        }
    }
}
