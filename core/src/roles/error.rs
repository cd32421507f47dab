//! Role management errors.

use thiserror::Error;

/// Errors surfaced by role creation and override updates.
///
/// Dropping an unavailable permission from a batch is deliberately NOT
/// an error: the rest of the batch still applies and the response shows
/// what took effect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoleError {
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("role already exists")]
    DuplicateRole,

    #[error("role not found")]
    RoleNotFound,

    #[error("account not found")]
    AccountNotFound,

    #[error("account hierarchy is malformed")]
    BrokenHierarchy,

    /// Caller may not manage roles at this account. Carries no detail
    /// about existing roles or overrides.
    #[error("not authorized to manage roles for this account")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),
}
