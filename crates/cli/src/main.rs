mod cli;
mod commands;
mod dates;
mod terminal;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use depot_core::config::load_dotenv;
use depot_core::{Clock, Config, FixedClock, SystemClock};
use depot_fleet::Fleet;
use depot_notify::{Dispatcher, TracingNotifier};
use depot_storage::FleetStore;

use crate::cli::CliArgs;
use crate::terminal::Terminal;

fn main() -> Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let config = Config::from_env();
    config.log_summary();

    let clock: Box<dyn Clock> = match args.today.or(config.today) {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    };
    let today = clock.today();

    let data_file = args
        .data
        .clone()
        .unwrap_or_else(|| config.storage.data_file.clone());
    let store = FleetStore::open_json(&data_file)
        .with_context(|| format!("failed to open fleet data {}", data_file.display()))?;
    if let Some(path) = store.backend().path() {
        info!(path = %path.display(), %today, "fleet data opened");
    }

    let mut notifier = Dispatcher::empty();
    notifier.add_channel(Box::new(TracingNotifier));
    let fleet = Fleet::with_journal_config(Arc::new(store), Arc::new(notifier), &config.journal);

    let terminal = Terminal::new(args.json);
    commands::run(&fleet, args.command, today, &terminal)
}
