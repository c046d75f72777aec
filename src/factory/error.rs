//=========================================================================
// Factory Errors
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::injection::{ResolveError, TypeKey};

//=== FactoryError ========================================================

/// Failure of a [`crate::ScopedFactory`] call.
///
/// `InvalidArgument` and `TypeMismatch` are raised before any scope is
/// created. `Resolution` wraps the host's error unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    /// A required argument was absent.
    #[error("{argument} must not be null")]
    InvalidArgument { argument: &'static str },

    /// A parameter's target cannot be bound under its declared type.
    #[error("parameter {index} is declared as `{declared}` but its target is of type `{actual}`")]
    TypeMismatch {
        index: usize,
        declared: TypeKey,
        actual: TypeKey,
    },

    /// The host failed to satisfy a dependency during construction.
    #[error("could not resolve `{missing}` while instantiating `{template}`")]
    Resolution {
        template: String,
        missing: TypeKey,
        #[source]
        source: ResolveError,
    },
}

impl FactoryError {
    pub(crate) fn resolution(template: &str, source: ResolveError) -> Self {
        Self::Resolution {
            template: template.to_string(),
            missing: source.missing(),
            source,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
