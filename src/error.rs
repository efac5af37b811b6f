use crate::domain::models::{DeployEvent, DeployState};

#[derive(thiserror::Error, Debug)]
pub enum ShipError {
    #[error("invalid repository path: {0} (expected a relative path without '..')")]
    InvalidPath(String),
    #[error("refusing to publish excluded file: {path} ({reason})")]
    ExcludedFile { path: String, reason: String },
    #[error("cannot apply {event} in state {state}")]
    InvalidTransition {
        state: DeployState,
        event: DeployEvent,
    },
    #[error("missing platform environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),
    #[error("invalid environment variable name: {0}")]
    InvalidEnvName(String),
    #[error("invalid policy: {0}")]
    PolicyInvalid(String),
    #[error("manifest partition broken: {0}")]
    PartitionBroken(String),
    #[error("destination {0} is inside the repository root")]
    InvalidDestination(String),
}

impl ShipError {
    pub fn code(&self) -> &'static str {
        match self {
            ShipError::InvalidPath(_) => "INVALID_PATH",
            ShipError::ExcludedFile { .. } => "EXCLUDED_FILE",
            ShipError::InvalidTransition { .. } => "INVALID_TRANSITION",
            ShipError::MissingEnv(_) => "MISSING_ENV",
            ShipError::InvalidEnvName(_) => "INVALID_ENV_NAME",
            ShipError::PolicyInvalid(_) => "POLICY_INVALID",
            ShipError::PartitionBroken(_) => "PARTITION_BROKEN",
            ShipError::InvalidDestination(_) => "INVALID_DESTINATION",
        }
    }
}

/// Stable error code for the JSON error envelope.
pub fn error_code(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|e| e.downcast_ref::<ShipError>())
        .map(ShipError::code)
        .unwrap_or("INTERNAL")
}
