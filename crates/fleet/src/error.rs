use thiserror::Error;

use depot_core::DepotError;
use depot_storage::StorageError;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error(transparent)]
    Domain(#[from] DepotError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, FleetError>;
