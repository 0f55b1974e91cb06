use thiserror::Error;

use depot_core::{DepotError, VehicleId};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("vehicle not found: {0}")]
    VehicleNotFound(VehicleId),

    #[error("vehicle already registered: {0}")]
    VehicleExists(VehicleId),

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("model already registered: {0}")]
    ModelExists(String),

    #[error("model {model} is still used by {vehicles} vehicle(s)")]
    ModelInUse { model: String, vehicles: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Domain(#[from] DepotError),

    #[error("validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;
