//! Error types for the authorization engine

use thiserror::Error;

/// Authorization engine errors
///
/// Query operations are total by design: unknown roles and permissions
/// simply yield `false`. The variants here cover the two places a caller
/// can actually observe a failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthzError {
    /// The principal holds no roles, so no maximum role exists
    #[error("Principal holds no roles")]
    EmptyRoleSet,

    /// Circular inheritance detected in the role hierarchy
    #[error("Circular role inheritance: {0}")]
    CycleDetected(String),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
