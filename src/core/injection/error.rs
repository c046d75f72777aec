//=========================================================================
// Resolution Errors
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::TypeKey;

//=== ResolveError ========================================================

/// Failure to satisfy a dependency while constructing an object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No scope in the chain holds a binding for the requested type.
    #[error("no binding for `{missing}` in the scope chain")]
    Unbound { missing: TypeKey },

    /// A component prefab was instantiated from a root that lacks the
    /// requested component.
    #[error("template `{template}` has no `{component}` component on its root")]
    MissingComponent { component: TypeKey, template: String },
}

impl ResolveError {
    /// Returns the type that could not be resolved.
    pub fn missing(&self) -> TypeKey {
        match self {
            Self::Unbound { missing } => *missing,
            Self::MissingComponent { component, .. } => *component,
        }
    }
}
