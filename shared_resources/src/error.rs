use thiserror::Error;

/// Errors returned by fleet commands and queries. None of them leave a
/// partially applied change behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FleetError {
    #[error("Elevator with id {0} not found.")]
    NotFound(u8),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    PreconditionFailed(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl FleetError {
    /// HTTP-like status code reported to clients.
    pub fn status_code(&self) -> u16 {
        match self {
            FleetError::NotFound(_) => 404,
            FleetError::InvalidArgument(_) => 400,
            FleetError::PreconditionFailed(_) => 412,
            FleetError::Internal(_) => 500,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FleetError::NotFound(_) => "not-found",
            FleetError::InvalidArgument(_) => "invalid-argument",
            FleetError::PreconditionFailed(_) => "precondition-failed",
            FleetError::Internal(_) => "internal",
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read configuration file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
