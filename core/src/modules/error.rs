//! Progression engine errors.

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by course configuration and progress evaluation.
///
/// Being locked or incomplete is never an error; those are ordinary
/// progress states. The prerequisite variants are configuration faults:
/// the module graph itself is malformed and evaluation refuses to guess.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModuleError {
    #[error("prerequisite references unknown module {0}")]
    UnknownPrerequisite(Uuid),

    #[error("prerequisite {prerequisite} does not precede module {module}")]
    PrerequisiteOrder { prerequisite: Uuid, module: Uuid },

    #[error("module not found")]
    NotFound,

    #[error("module item not found")]
    ItemNotFound,
}

impl ModuleError {
    /// Whether this error is a server-side configuration fault rather
    /// than a bad lookup from the caller.
    #[must_use]
    pub const fn is_configuration_fault(&self) -> bool {
        matches!(
            self,
            Self::UnknownPrerequisite(_) | Self::PrerequisiteOrder { .. }
        )
    }
}
