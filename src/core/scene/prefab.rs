//=========================================================================
// Prefabs
//=========================================================================
//
// Read-only blueprints from which node hierarchies are instantiated.
//
// Architecture:
//   Prefab
//     ├─ root: Rc<NodeTemplate>
//     │    ├─ components: Vec<ComponentBlueprint>
//     │    └─ children:   Vec<NodeTemplate>
//     └─ kind: PrefabKind { Component(TypeKey) | Hierarchy }
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::fmt;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use super::Component;
use crate::core::injection::{Inject, ResolveError, Scope, TypeKey};

//=== Types ===============================================================

type BuildFn = Rc<dyn Fn(&Scope) -> Result<Box<dyn Any>, ResolveError>>;

//=== ComponentBlueprint ==================================================

/// Recipe for one component, run once per instantiation.
#[derive(Clone)]
pub struct ComponentBlueprint {
    key: TypeKey,
    build: BuildFn,
}

impl ComponentBlueprint {
    /// Builds a `T` through its [`Inject`] implementation.
    pub fn injected<T: Component + Inject>() -> Self {
        Self::from_fn(T::inject)
    }

    /// Attaches a copy of `value` to every instance.
    pub fn cloned<T: Component + Clone>(value: T) -> Self {
        Self::from_fn(move |_| Ok(value.clone()))
    }

    /// Builds a `T` with a custom function.
    pub fn from_fn<T, F>(build: F) -> Self
    where
        T: Component,
        F: Fn(&Scope) -> Result<T, ResolveError> + 'static,
    {
        Self {
            key: TypeKey::of::<T>(),
            build: Rc::new(move |scope: &Scope| build(scope).map(|c| Box::new(c) as Box<dyn Any>)),
        }
    }

    /// Returns the type of component this blueprint produces.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub(crate) fn build(&self, scope: &Scope) -> Result<Box<dyn Any>, ResolveError> {
        (self.build)(scope)
    }
}

impl fmt::Debug for ComponentBlueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentBlueprint").field(&self.key.name()).finish()
    }
}

//=== NodeTemplate ========================================================

/// Blueprint of one node and its subtree.
#[derive(Debug, Clone)]
pub struct NodeTemplate {
    name: String,
    components: Vec<ComponentBlueprint>,
    children: Vec<NodeTemplate>,
}

impl NodeTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_component(mut self, blueprint: ComponentBlueprint) -> Self {
        self.components.push(blueprint);
        self
    }

    pub fn with_child(mut self, child: NodeTemplate) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> &[ComponentBlueprint] {
        &self.components
    }

    pub fn children(&self) -> &[NodeTemplate] {
        &self.children
    }

    /// Returns true if this node itself carries a `key` component.
    pub fn has_component(&self, key: TypeKey) -> bool {
        self.components.iter().any(|c| c.key() == key)
    }

    /// Total number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeTemplate::node_count).sum::<usize>()
    }
}

//=== PrefabKind ==========================================================

/// Construction path of a prefab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefabKind {
    /// Instantiated for one of its root components; yields that component.
    Component(TypeKey),

    /// Instantiated as a whole; yields the new root node.
    Hierarchy,
}

//=== Prefab ==============================================================

/// Shared handle to a prefab.
///
/// Cloning is cheap; all clones refer to the same template.
#[derive(Debug, Clone)]
pub struct Prefab {
    root: Rc<NodeTemplate>,
    kind: PrefabKind,
}

impl Prefab {
    /// Creates a prefab that instantiates to its root node.
    pub fn hierarchy(root: NodeTemplate) -> Self {
        Self {
            root: Rc::new(root),
            kind: PrefabKind::Hierarchy,
        }
    }

    /// Creates a prefab that instantiates to its root's `T` component.
    ///
    /// Returns `None` if the root has no `T` blueprint.
    pub fn for_component<T: Component>(root: NodeTemplate) -> Option<Self> {
        let key = TypeKey::of::<T>();
        if !root.has_component(key) {
            return None;
        }

        Some(Self {
            root: Rc::new(root),
            kind: PrefabKind::Component(key),
        })
    }

    pub fn name(&self) -> &str {
        self.root.name()
    }

    pub fn kind(&self) -> PrefabKind {
        self.kind
    }

    pub fn root(&self) -> &NodeTemplate {
        &self.root
    }
}

//=========================================================================
// Tests
//=========================================================================
