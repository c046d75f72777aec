//=========================================================================
// Scene System
//=========================================================================
//
// Minimal scene graph that prefabs are instantiated into.
//
// Architecture:
//   World
//     └─ nodes: Vec<Node>
//          ├─ components: Vec<(TypeKey, Box<dyn Any>)>
//          └─ children:   Vec<NodeId>
//
// Flow:
//   Prefab → Instantiator::instantiate_prefab*() → stage → commit → World
//
//=========================================================================

//=== Module Declarations =================================================

mod prefab;
mod world;

//=== Public API ==========================================================

pub use prefab::{ComponentBlueprint, NodeTemplate, Prefab, PrefabKind};
pub use world::{ComponentHandle, NodeId, World};

//=== Internal Dependencies ===============================================

use crate::core::injection::{ResolveError, Scope, TypeKey};

//=== Component Trait =====================================================

/// Marker trait for values that can be attached to nodes.
///
/// Automatically implemented for all `'static` types.
pub trait Component: 'static {}

// Blanket implementation
impl<T: 'static> Component for T {}

//=== Instance ============================================================

/// Result of instantiating a prefab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instance {
    /// Root node of a freshly instantiated hierarchy.
    Node(NodeId),

    /// Requested component on the root of a fresh hierarchy.
    Component(ComponentHandle),
}

impl Instance {
    /// Returns the root node of the instantiated hierarchy.
    pub fn node(&self) -> NodeId {
        match self {
            Self::Node(node) => *node,
            Self::Component(handle) => handle.node(),
        }
    }

    /// Returns the component handle for component instances.
    pub fn component(&self) -> Option<ComponentHandle> {
        match self {
            Self::Node(_) => None,
            Self::Component(handle) => Some(*handle),
        }
    }
}

//=== Instantiator Trait ==================================================

/// Host operations that build objects from templates.
///
/// Both entry points resolve every component dependency through `scope`.
/// Implementations must not leave partial results behind on failure.
pub trait Instantiator {
    /// Instantiates the whole hierarchy and returns its root node.
    fn instantiate_prefab(
        &mut self,
        template: &NodeTemplate,
        scope: &Scope,
    ) -> Result<NodeId, ResolveError>;

    /// Instantiates the hierarchy and returns its root's `component`.
    fn instantiate_prefab_for_component(
        &mut self,
        template: &NodeTemplate,
        component: TypeKey,
        scope: &Scope,
    ) -> Result<ComponentHandle, ResolveError>;
}
