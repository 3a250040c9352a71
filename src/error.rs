use thiserror::Error;

/// Errors surfaced while building the simulation.
///
/// Nothing inside a tick is fallible; both variants are raised at
/// construction time and are fatal to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type SimResult<T> = Result<T, SimError>;
