//=========================================================================
// Injection Scope
//=========================================================================
//
// Type-keyed container of singleton bindings with an optional parent.
//
// Architecture:
//   Scope (root)
//     └─ Scope (child) ── bindings: HashMap<TypeKey, ErasedValue>
//                          parent:   Rc<Scope>
//
// Lookups check local bindings first and then walk the parent chain.
// Children never write to their parents, so overrides stay local.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use log::trace;

//=== Internal Dependencies ===============================================

use super::{ErasedValue, ResolveError, TypeKey};

//=== Scope ===============================================================

/// Container of type-to-value bindings used to resolve dependencies.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use prefab_factory::core::injection::Scope;
///
/// let mut root = Scope::named("app");
/// root.bind(String::from("from root"));
/// let root = Rc::new(root);
///
/// let mut child = Scope::child_of(&root);
/// child.bind(42_i32);
///
/// assert_eq!(*child.resolve::<i32>().unwrap(), 42);
/// assert_eq!(*child.resolve::<String>().unwrap(), "from root");
/// assert!(root.resolve::<i32>().is_err());
/// ```
pub struct Scope {
    name: String,
    bindings: HashMap<TypeKey, ErasedValue>,
    parent: Option<Rc<Scope>>,
    children_created: Cell<usize>,
}

impl Scope {
    //--- Construction -----------------------------------------------------

    /// Creates an empty root scope.
    pub fn new() -> Self {
        Self::named("root")
    }

    /// Creates an empty root scope with a name used in log output.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindings: HashMap::new(),
            parent: None,
            children_created: Cell::new(0),
        }
    }

    /// Creates a child that inherits every binding of `parent`.
    ///
    /// The parent is only read, never written. Each call is counted in
    /// the parent's [`Scope::children_created`].
    pub fn child_of(parent: &Rc<Scope>) -> Self {
        parent.children_created.set(parent.children_created.get() + 1);
        trace!("Creating child of scope '{}'", parent.name);

        Self {
            name: format!("{}/child", parent.name),
            bindings: HashMap::new(),
            parent: Some(Rc::clone(parent)),
            children_created: Cell::new(0),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Binds `value` as a singleton under its own type.
    pub fn bind<T: 'static>(&mut self, value: T) -> &mut Self {
        self.bind_shared(Rc::new(value))
    }

    /// Binds an already shared value as a singleton under `T`.
    ///
    /// `T` may be a trait object, e.g. `Rc<dyn Service>`.
    pub fn bind_shared<T: ?Sized + 'static>(&mut self, value: Rc<T>) -> &mut Self {
        self.register_singleton(ErasedValue::new(value));
        self
    }

    /// Registers an erased value under its own key.
    ///
    /// Returns the local binding it replaced, if any. Bindings of the
    /// parent chain are shadowed, not replaced.
    pub fn register_singleton(&mut self, value: ErasedValue) -> Option<ErasedValue> {
        self.bindings.insert(value.key(), value)
    }

    //--- Resolution -------------------------------------------------------

    /// Resolves the binding for `T`, searching the parent chain.
    pub fn resolve<T: ?Sized + 'static>(&self) -> Result<Rc<T>, ResolveError> {
        self.try_resolve::<T>().ok_or(ResolveError::Unbound {
            missing: TypeKey::of::<T>(),
        })
    }

    /// Like [`Scope::resolve`], but returns `None` when unbound.
    pub fn try_resolve<T: ?Sized + 'static>(&self) -> Option<Rc<T>> {
        self.lookup(TypeKey::of::<T>())
            .and_then(|value| value.downcast::<T>())
    }

    /// Returns the nearest binding for `key`.
    pub fn lookup(&self, key: TypeKey) -> Option<&ErasedValue> {
        let mut scope = Some(self);

        while let Some(current) = scope {
            if let Some(value) = current.bindings.get(&key) {
                return Some(value);
            }
            scope = current.parent.as_deref();
        }

        None
    }

    /// Returns true if `key` is bound here or in any ancestor.
    pub fn contains(&self, key: TypeKey) -> bool {
        self.lookup(key).is_some()
    }

    /// Returns true if `key` is bound in this scope itself.
    pub fn contains_local(&self, key: TypeKey) -> bool {
        self.bindings.contains_key(&key)
    }

    //--- Query API --------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Rc<Scope>> {
        self.parent.as_ref()
    }

    /// Number of ancestors; zero for a root scope.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.parent.as_deref();

        while let Some(current) = scope {
            depth += 1;
            scope = current.parent.as_deref();
        }

        depth
    }

    /// Number of children created from this scope so far.
    pub fn children_created(&self) -> usize {
        self.children_created.get()
    }

    /// Number of local bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Config {
        level: u8,
    }

    trait Clock {
        fn now(&self) -> u64;
    }

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now(&self) -> u64 {
            self.0
        }
    }

    //--- Registration Tests -----------------------------------------------

    #[test]
    fn new_scope_is_empty() {
        let scope = Scope::new();
        assert!(scope.is_empty());
        assert_eq!(scope.depth(), 0);
        assert!(scope.parent().is_none());
        assert_eq!(scope.name(), "root");
    }

    #[test]
    fn bind_and_resolve() {
        let mut scope = Scope::new();
        scope.bind(Config { level: 3 }).bind(5_i32);

        assert_eq!(scope.len(), 2);
        assert_eq!(*scope.resolve::<Config>().unwrap(), Config { level: 3 });
        assert_eq!(*scope.resolve::<i32>().unwrap(), 5);
    }

    #[test]
    fn resolve_returns_shared_instance() {
        let mut scope = Scope::new();
        scope.bind(Config { level: 1 });

        let first = scope.resolve::<Config>().unwrap();
        let second = scope.resolve::<Config>().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn register_singleton_replaces_local_binding() {
        let mut scope = Scope::new();
        assert!(scope.register_singleton(ErasedValue::new(Rc::new(1_i32))).is_none());

        let replaced = scope.register_singleton(ErasedValue::new(Rc::new(2_i32)));
        assert_eq!(*replaced.unwrap().downcast::<i32>().unwrap(), 1);
        assert_eq!(*scope.resolve::<i32>().unwrap(), 2);
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn trait_object_bindings_resolve() {
        let mut scope = Scope::new();
        let clock: Rc<dyn Clock> = Rc::new(FixedClock(99));
        scope.bind_shared(clock);

        assert_eq!(scope.resolve::<dyn Clock>().unwrap().now(), 99);
        assert!(scope.resolve::<FixedClock>().is_err());
    }

    //--- Resolution Tests -------------------------------------------------

    #[test]
    fn unbound_type_reports_missing_key() {
        let scope = Scope::new();
        let err = scope.resolve::<Config>().unwrap_err();
        assert_eq!(err, ResolveError::Unbound { missing: TypeKey::of::<Config>() });
        assert_eq!(err.missing(), TypeKey::of::<Config>());
    }

    #[test]
    fn child_inherits_parent_bindings() {
        let mut root = Scope::new();
        root.bind(Config { level: 7 });
        let root = Rc::new(root);

        let child = Scope::child_of(&root);
        assert_eq!(child.resolve::<Config>().unwrap().level, 7);
        assert!(child.contains(TypeKey::of::<Config>()));
        assert!(!child.contains_local(TypeKey::of::<Config>()));
    }

    #[test]
    fn child_override_does_not_touch_parent() {
        let mut root = Scope::new();
        root.bind(1_i32);
        let root = Rc::new(root);

        let mut child = Scope::child_of(&root);
        child.bind(2_i32);

        assert_eq!(*child.resolve::<i32>().unwrap(), 2);
        assert_eq!(*root.resolve::<i32>().unwrap(), 1);
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn lookup_walks_whole_chain() {
        let mut root = Scope::new();
        root.bind(Config { level: 2 });
        let root = Rc::new(root);
        let middle = Rc::new(Scope::child_of(&root));
        let leaf = Scope::child_of(&middle);

        assert_eq!(leaf.depth(), 2);
        assert_eq!(leaf.resolve::<Config>().unwrap().level, 2);
        assert_eq!(leaf.name(), "root/child/child");
    }

    //--- Bookkeeping Tests ------------------------------------------------

    #[test]
    fn child_creation_is_counted_on_parent() {
        let root = Rc::new(Scope::named("ambient"));
        assert_eq!(root.children_created(), 0);

        let _a = Scope::child_of(&root);
        let _b = Scope::child_of(&root);
        assert_eq!(root.children_created(), 2);
    }

    #[test]
    fn dropping_child_releases_parent_handle() {
        let root = Rc::new(Scope::new());
        {
            let _child = Scope::child_of(&root);
            assert_eq!(Rc::strong_count(&root), 2);
        }
        assert_eq!(Rc::strong_count(&root), 1);
    }
}
