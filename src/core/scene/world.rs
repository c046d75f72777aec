//=========================================================================
// World
//=========================================================================
//
// Node arena holding instantiated hierarchies and their components.
//
// Instantiation is two-phase: every component of the template tree is
// built against the scope into a detached staging tree first, and nodes
// are committed to the arena only once the whole tree succeeded. A
// failed resolution therefore leaves the world untouched.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{Component, Instantiator, NodeTemplate};
use crate::core::injection::{ResolveError, Scope, TypeKey};

//=== Identifiers =========================================================

/// Index of a node in a [`World`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Reference to a typed component on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentHandle {
    node: NodeId,
    key: TypeKey,
}

impl ComponentHandle {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }
}

//=== Internal Types ======================================================

struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    components: Vec<(TypeKey, Box<dyn Any>)>,
}

impl Node {
    fn new(name: String, components: Vec<(TypeKey, Box<dyn Any>)>) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            components,
        }
    }
}

// Detached result of building a template tree.
struct StagedNode {
    name: String,
    components: Vec<(TypeKey, Box<dyn Any>)>,
    children: Vec<StagedNode>,
}

//=== World ===============================================================

/// Scene graph of named nodes carrying typed components.
pub struct World {
    nodes: Vec<Node>,
}

impl World {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    //--- Node Operations --------------------------------------------------

    /// Creates an empty root node.
    pub fn spawn(&mut self, name: impl Into<String>) -> NodeId {
        self.push_node(Node::new(name.into(), Vec::new()))
    }

    /// Moves `child` under `parent`, detaching it from any previous parent.
    ///
    /// Ignored with a warning if either node is unknown or the move would
    /// create a cycle.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            warn!("Cannot attach {:?} to {:?}: unknown node", child, parent);
            return;
        }

        if self.is_ancestor_or_self(child, parent) {
            warn!("Cannot attach {:?} to {:?}: would create a cycle", child, parent);
            return;
        }

        if let Some(old_parent) = self.nodes[child.0].parent.take() {
            self.nodes[old_parent.0].children.retain(|&c| c != child);
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Attaches `component` to `node`.
    ///
    /// Returns `None` if the node does not exist.
    pub fn add_component<T: Component>(&mut self, node: NodeId, component: T) -> Option<ComponentHandle> {
        let key = TypeKey::of::<T>();
        let entry = self.nodes.get_mut(node.0)?;
        entry.components.push((key, Box::new(component) as Box<dyn Any>));
        Some(ComponentHandle { node, key })
    }

    //--- Queries ----------------------------------------------------------

    /// Returns the first `T` component on `node`.
    pub fn component<T: Component>(&self, node: NodeId) -> Option<&T> {
        let key = TypeKey::of::<T>();
        self.nodes
            .get(node.0)?
            .components
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, c)| c.downcast_ref::<T>())
    }

    pub fn component_mut<T: Component>(&mut self, node: NodeId) -> Option<&mut T> {
        let key = TypeKey::of::<T>();
        self.nodes
            .get_mut(node.0)?
            .components
            .iter_mut()
            .find(|(k, _)| *k == key)
            .and_then(|(_, c)| c.downcast_mut::<T>())
    }

    /// Returns the component behind `handle` if it is a `T`.
    pub fn resolve_component<T: Component>(&self, handle: ComponentHandle) -> Option<&T> {
        if !handle.key.is::<T>() {
            return None;
        }
        self.component::<T>(handle.node)
    }

    /// Returns the keys of all components on `node`, in attachment order.
    pub fn component_keys(&self, node: NodeId) -> Vec<TypeKey> {
        self.nodes
            .get(node.0)
            .map(|n| n.components.iter().map(|(k, _)| *k).collect())
            .unwrap_or_default()
    }

    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|n| n.name.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the first direct child of `node` named `name`.
    pub fn find_child(&self, node: NodeId, name: &str) -> Option<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .find(|&child| self.name(child) == Some(name))
    }

    /// Returns all nodes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(i, _)| NodeId(i))
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    //--- Internal Helpers -------------------------------------------------

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn stage(template: &NodeTemplate, scope: &Scope) -> Result<StagedNode, ResolveError> {
        let components = template
            .components()
            .iter()
            .map(|blueprint| blueprint.build(scope).map(|c| (blueprint.key(), c)))
            .collect::<Result<Vec<_>, ResolveError>>()?;

        let children = template
            .children()
            .iter()
            .map(|child| Self::stage(child, scope))
            .collect::<Result<Vec<_>, ResolveError>>()?;

        Ok(StagedNode {
            name: template.name().to_string(),
            components,
            children,
        })
    }

    fn commit(&mut self, staged: StagedNode, parent: Option<NodeId>) -> NodeId {
        let mut node = Node::new(staged.name, staged.components);
        node.parent = parent;
        let id = self.push_node(node);

        for child in staged.children {
            let child_id = self.commit(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }

        id
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

//=== Instantiator ========================================================

impl Instantiator for World {
    fn instantiate_prefab(
        &mut self,
        template: &NodeTemplate,
        scope: &Scope,
    ) -> Result<NodeId, ResolveError> {
        let staged = Self::stage(template, scope)?;
        let root = self.commit(staged, None);

        debug!(
            "Instantiated '{}' as {:?} ({} node(s))",
            template.name(),
            root,
            template.node_count()
        );

        Ok(root)
    }

    fn instantiate_prefab_for_component(
        &mut self,
        template: &NodeTemplate,
        component: TypeKey,
        scope: &Scope,
    ) -> Result<ComponentHandle, ResolveError> {
        if !template.has_component(component) {
            return Err(ResolveError::MissingComponent {
                component,
                template: template.name().to_string(),
            });
        }

        let node = self.instantiate_prefab(template, scope)?;
        Ok(ComponentHandle {
            node,
            key: component,
        })
    }
}

//=========================================================================
// Tests
//=========================================================================
