use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use serde::Serialize;
use std::io::{self, Write};

use depot_core::{IntervalProfile, RequiredRepair, Tier, Vehicle};
use depot_fleet::{DueEntry, EditOutcome, ImportReport, SweepReport};
use depot_notify::Column;

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const OVERDUE: Color = Color::Red;
    const DUE: Color = Color::Yellow;
    const OK: Color = Color::Green;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
}

/// Writes command results to stdout, as colored text or as JSON.
pub struct Terminal {
    json: bool,
}

impl Terminal {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let mut stdout = io::stdout();
        serde_json::to_writer_pretty(&mut stdout, value)?;
        writeln!(stdout)?;
        Ok(())
    }

    fn header(&self, text: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print(text),
            Print("\n"),
            ResetColor,
        )?;
        Ok(())
    }

    fn dim(&self, text: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(text),
            Print("\n"),
            ResetColor,
        )?;
        Ok(())
    }

    pub fn print_ok(&self, message: &str) -> Result<()> {
        if self.json {
            return self.print_json(&serde_json::json!({ "ok": true, "message": message }));
        }
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::OK),
            Print("ok "),
            ResetColor,
            Print(message),
            Print("\n"),
        )?;
        Ok(())
    }

    pub fn print_models(&self, models: &[(String, IntervalProfile)]) -> Result<()> {
        if self.json {
            let rows: Vec<_> = models
                .iter()
                .map(|(name, profile)| serde_json::json!({ "name": name, "intervals": profile }))
                .collect();
            return self.print_json(&rows);
        }
        if models.is_empty() {
            return self.dim("no models registered");
        }
        let codes: Vec<String> = Tier::ALL.iter().map(|t| format!("{:>8}", t.code())).collect();
        self.header(&format!("{:<12}{}", Column::Model.title(), codes.join("")))?;
        let mut stdout = io::stdout();
        for (name, profile) in models {
            let days: Vec<String> = profile.as_slice().iter().map(|d| format!("{:>8}", d)).collect();
            writeln!(stdout, "{:<12}{}", name, days.join(""))?;
        }
        Ok(())
    }

    pub fn print_vehicles(&self, vehicles: &[Vehicle]) -> Result<()> {
        if self.json {
            return self.print_json(vehicles);
        }
        if vehicles.is_empty() {
            return self.dim("no vehicles registered");
        }
        self.header(&format!(
            "{:<4}{:<14}{:<10}{:<24}{}",
            "row",
            Column::Vehicle.title(),
            Column::Model.title(),
            Column::LastServiceDate.title(),
            Column::RequiredDate.title()
        ))?;
        for (row, vehicle) in vehicles.iter().enumerate() {
            let last = vehicle
                .record
                .derived
                .last_service
                .map(|l| format!("{} {}", l.date, l.tier.code()))
                .unwrap_or_else(|| "-".to_string());
            let mut stdout = io::stdout();
            write!(
                stdout,
                "{:<4}{:<14}{:<10}{:<24}",
                row, vehicle.id, vehicle.model, last
            )?;
            self.required_cell(vehicle.record.derived.required)?;
        }
        Ok(())
    }

    fn required_cell(&self, required: Option<RequiredRepair>) -> Result<()> {
        let mut stdout = io::stdout();
        match required {
            Some(r) => {
                let (color, label) = if r.overdue {
                    (Colors::OVERDUE, " OVERDUE")
                } else {
                    (Colors::DUE, "")
                };
                execute!(
                    stdout,
                    SetForegroundColor(color),
                    Print(format!("{} {}{}", r.date, r.tier.code(), label)),
                    ResetColor,
                    Print("\n"),
                )?;
            }
            None => {
                execute!(stdout, Print("-\n"))?;
            }
        }
        Ok(())
    }

    pub fn print_vehicle(&self, vehicle: &Vehicle) -> Result<()> {
        if self.json {
            return self.print_json(vehicle);
        }
        self.header(&format!("{} ({})", vehicle.id, vehicle.model))?;
        let mut stdout = io::stdout();
        for tier in Tier::ALL {
            let dates = vehicle.record.tier(tier);
            writeln!(
                stdout,
                "  {:<24}{:<12}{}",
                tier.name(),
                fmt_date(dates.last_performed),
                fmt_date(dates.next_due)
            )?;
        }
        match vehicle.record.derived.last_service {
            Some(l) => writeln!(stdout, "  last service: {} ({})", l.date, l.tier.name())?,
            None => writeln!(stdout, "  last service: -")?,
        }
        write!(stdout, "  required:     ")?;
        self.required_cell(vehicle.record.derived.required)?;
        if !vehicle.notes.is_empty() {
            writeln!(stdout, "  notes:        {}", vehicle.notes)?;
        }
        Ok(())
    }

    pub fn print_outcome(&self, outcome: &EditOutcome) -> Result<()> {
        if self.json {
            return self.print_json(outcome);
        }
        let mut stdout = io::stdout();
        if let Some(plan) = &outcome.plan {
            for update in plan.updates() {
                writeln!(
                    stdout,
                    "  {:<24}{:<12}{}",
                    update.tier.name(),
                    fmt_date(update.last_performed),
                    fmt_date(update.next_due)
                )?;
            }
        } else if outcome.touched_tiers.is_empty() {
            self.dim("  nothing to clear")?;
        }
        write!(stdout, "  required:     ")?;
        self.required_cell(outcome.derived.required)
    }

    pub fn print_sweep(&self, report: &SweepReport, today: NaiveDate) -> Result<()> {
        if self.json {
            return self.print_json(report);
        }
        self.print_ok(&format!(
            "refreshed {} vehicles for {}, {} changed",
            report.checked,
            today,
            report.changed.len()
        ))?;
        let mut stdout = io::stdout();
        for failure in &report.failed {
            execute!(
                stdout,
                SetForegroundColor(Colors::OVERDUE),
                Print(format!("  {}: {}\n", failure.vehicle, failure.error)),
                ResetColor,
            )?;
        }
        Ok(())
    }

    pub fn print_due(&self, entries: &[DueEntry]) -> Result<()> {
        if self.json {
            return self.print_json(entries);
        }
        if entries.is_empty() {
            return self.dim("nothing scheduled");
        }
        self.header(&format!(
            "{:<14}{:<10}{}",
            Column::Vehicle.title(),
            Column::Model.title(),
            Column::RequiredDate.title()
        ))?;
        for entry in entries {
            let mut stdout = io::stdout();
            write!(stdout, "{:<14}{:<10}", entry.vehicle, entry.model)?;
            self.required_cell(Some(entry.required))?;
        }
        Ok(())
    }

    pub fn print_import(&self, report: &ImportReport) -> Result<()> {
        if self.json {
            return self.print_json(report);
        }
        self.print_ok(&format!(
            "imported {} new, {} updated",
            report.added.len(),
            report.updated.len()
        ))
    }
}

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}
