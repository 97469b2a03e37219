use thiserror::Error;

use crate::{
    ERR_ALREADY_ADMIN, ERR_ALREADY_INITIALIZED, ERR_FORBIDDEN, ERR_LAST_ADMIN, ERR_NOT_ADMIN,
};

/// Rejections returned by registry operations.
///
/// Every variant is a recoverable, caller-facing outcome. An operation that
/// returns one of these has not touched the store.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    #[error("caller is not an admin")]
    Forbidden,
    #[error("target is not an admin")]
    NotAdmin,
    #[error("target is already an admin")]
    AlreadyAdmin,
    #[error("registry is already initialized")]
    AlreadyInitialized,
    #[error("cannot remove the last admin")]
    LastAdmin,
}

impl RegistryError {
    /// Stable numeric code for this rejection
    pub fn code(&self) -> u16 {
        match self {
            RegistryError::Forbidden => ERR_FORBIDDEN,
            RegistryError::NotAdmin => ERR_NOT_ADMIN,
            RegistryError::AlreadyAdmin => ERR_ALREADY_ADMIN,
            RegistryError::AlreadyInitialized => ERR_ALREADY_INITIALIZED,
            RegistryError::LastAdmin => ERR_LAST_ADMIN,
        }
    }
}

/// Result type shared by the mutating registry operations
pub type RegistryResult = Result<bool, RegistryError>;
