use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub storage: StorageConfig,
    pub journal: JournalConfig,
    /// Pinned reference date; `None` means the host's local date.
    pub today: Option<NaiveDate>,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `DEPOT_PROFILE`. When set (e.g. `YARD2`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("DEPOT_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();

        let today = profiled_env_opt(p, "DEPOT_TODAY").and_then(|raw| {
            match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(e) => {
                    tracing::warn!(value = %raw, error = %e, "ignoring unparseable DEPOT_TODAY");
                    None
                }
            }
        });

        Self {
            profile: p.to_string(),
            storage: StorageConfig::from_env_profiled(p),
            journal: JournalConfig::from_env_profiled(p),
            today,
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  storage:  data_file={}", self.storage.data_file.display());
        tracing::info!("  journal:  max_entries={}", self.journal.max_entries);
        match self.today {
            Some(date) => tracing::info!("  clock:    pinned to {}", date),
            None => tracing::info!("  clock:    system"),
        }
    }
}

// ── Storage ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_file: PathBuf,
}

impl StorageConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            data_file: PathBuf::from(profiled_env_or(p, "DEPOT_DATA_FILE", "data/fleet.json")),
        }
    }
}

// ── Journal ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Per-vehicle cap; oldest entries are evicted first.
    pub max_entries: usize,
}

impl JournalConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            max_entries: profiled_env_usize(p, "DEPOT_JOURNAL_MAX_ENTRIES", 200),
        }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self { max_entries: 200 }
    }
}
