//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use prefab_factory::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Factory
pub use crate::{FactoryBuilder, FactoryError, Parameter, ScopedFactory};

// Injection
pub use crate::core::injection::{Inject, ResolveError, Scope, TypeHierarchy, TypeKey};

// Scene system
pub use crate::core::scene::{
    Component, ComponentBlueprint, ComponentHandle, Instance, Instantiator, NodeId,
    NodeTemplate, Prefab, PrefabKind, World,
};
