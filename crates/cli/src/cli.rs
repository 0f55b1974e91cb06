use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use depot_core::{Tier, VehicleId};

use crate::dates::parse_date;

/// Repair scheduling for a locomotive fleet.
///
/// Records service events, cascades them through the six maintenance tiers
/// and reports what each vehicle needs next.
#[derive(Parser, Debug)]
#[command(name = "depot", about = "Fleet repair scheduling")]
pub struct CliArgs {
    /// Fleet data file (default: DEPOT_DATA_FILE or data/fleet.json)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Reference date for overdue checks, YYYY-MM-DD or DD.MM.YYYY
    #[arg(long, global = true, value_parser = parse_date)]
    pub today: Option<NaiveDate>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage vehicle models and their interval profiles
    Model {
        #[command(subcommand)]
        action: ModelCommand,
    },
    /// Manage vehicles
    Vehicle {
        #[command(subcommand)]
        action: VehicleCommand,
    },
    /// Record or clear service events
    Service {
        #[command(subcommand)]
        action: ServiceCommand,
    },
    /// Recompute derived fields for every vehicle
    Refresh,
    /// List required repairs, most urgent first
    Due,
}

#[derive(Subcommand, Debug)]
pub enum ModelCommand {
    /// Register a model: NAME followed by six interval day counts
    Add {
        name: String,
        #[arg(num_args = 6, required = true)]
        intervals: Vec<u32>,
    },
    /// Replace a model's intervals (future cascades only)
    Set {
        name: String,
        #[arg(num_args = 6, required = true)]
        intervals: Vec<u32>,
    },
    Remove {
        name: String,
    },
    List,
    /// Upsert models from a YAML catalog
    Import {
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum VehicleCommand {
    Add {
        id: VehicleId,
        model: String,
        #[arg(long)]
        notes: Option<String>,
    },
    Remove {
        id: VehicleId,
    },
    List,
    Show {
        id: VehicleId,
    },
    /// Replace a vehicle's notes
    Notes {
        id: VehicleId,
        text: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ServiceCommand {
    /// Record that TIER was performed on DATE
    Record {
        id: VehicleId,
        /// Tier index 0-5 or code (minor, repair1, repair2, repair3, medium, full)
        tier: Tier,
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Remove a tier's dates
    Clear {
        id: VehicleId,
        tier: Tier,
    },
}
