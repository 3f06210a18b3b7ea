use serde::{Deserialize, Serialize};
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, Deserialize, Serialize)]
pub enum RegistryError {
    #[error("Artifact not found: {0}")]
    NotFound(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Failures from the session store. Callers that persist opportunistically
/// downgrade these to warnings rather than surfacing them.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session store io failure: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
