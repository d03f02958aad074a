use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum DragError {
    /// A required collaborator or event field is missing.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
