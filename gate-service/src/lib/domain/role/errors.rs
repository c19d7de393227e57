use thiserror::Error;

/// Errors raised while reading roles or resolving the role registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Role '{0}' is not present in the role store")]
    Missing(String),

    #[error("Role store unavailable: {0}")]
    StoreUnavailable(String),
}
