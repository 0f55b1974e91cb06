use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::data::FleetData;
use crate::error::Result;

/// Where committed fleet state goes.
#[derive(Debug)]
pub enum StorageBackend {
    /// Nothing outside the process; state is lost on exit.
    Memory,
    /// A single pretty-printed JSON document.
    JsonFile(JsonFileBackend),
}

impl StorageBackend {
    /// Persist a candidate state. Called before the state is committed in
    /// memory, so a failure here leaves the store unchanged.
    pub fn persist(&self, data: &FleetData) -> Result<()> {
        match self {
            StorageBackend::Memory => Ok(()),
            StorageBackend::JsonFile(file) => file.save(data),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            StorageBackend::Memory => None,
            StorageBackend::JsonFile(file) => Some(&file.path),
        }
    }
}

#[derive(Debug)]
pub struct JsonFileBackend {
    pub path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the fleet document, or an empty fleet if the file does not exist.
    pub fn load(&self) -> Result<FleetData> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no fleet file yet, starting empty");
            return Ok(FleetData::default());
        }
        let json = fs::read_to_string(&self.path)?;
        let data: FleetData = serde_json::from_str(&json)?;
        info!(
            path = %self.path.display(),
            models = data.models.len(),
            vehicles = data.vehicles.len(),
            "loaded fleet file"
        );
        Ok(data)
    }

    /// Write to a sibling temp file, then rename over the target.
    pub fn save(&self, data: &FleetData) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(data)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
