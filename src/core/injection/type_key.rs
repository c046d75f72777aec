//=========================================================================
// Type Keys
//=========================================================================
//
// Stable identifiers for Rust types used as binding keys.
//
// Equality and hashing use the TypeId only. The type name is carried
// along for error messages and log output.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

//=== TypeKey =============================================================

/// Identifier of a bindable type.
///
/// Works for unsized types as well, so `TypeKey::of::<dyn Trait>()` is a
/// valid key for bindings that expose a trait object.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if this key identifies `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

//=== ErasedValue =========================================================

/// Type-erased shared handle to a bound value.
///
/// Holds an `Rc<T>` behind `dyn Any` together with the key of `T`. The
/// extra `Rc` layer lets unsized targets such as `Rc<dyn Trait>` be
/// erased, since only sized values can be coerced to `dyn Any`.
#[derive(Clone)]
pub struct ErasedValue {
    handle: Rc<dyn Any>,
    key: TypeKey,
}

impl ErasedValue {
    /// Erases a shared value, keyed by `T`.
    pub fn new<T: ?Sized + 'static>(value: Rc<T>) -> Self {
        Self {
            handle: Rc::new(value),
            key: TypeKey::of::<T>(),
        }
    }

    /// Returns the key of the type this value was erased from.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Recovers the shared value if it was erased from `T`.
    pub fn downcast<T: ?Sized + 'static>(&self) -> Option<Rc<T>> {
        self.handle.downcast_ref::<Rc<T>>().cloned()
    }
}

impl fmt::Debug for ErasedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedValue")
            .field("key", &self.key.name)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    trait Greeter {
        fn greet(&self) -> &'static str;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> &'static str {
            "hello"
        }
    }

    //--- TypeKey Tests ----------------------------------------------------

    #[test]
    fn keys_of_same_type_are_equal() {
        assert_eq!(TypeKey::of::<i32>(), TypeKey::of::<i32>());
        assert_ne!(TypeKey::of::<i32>(), TypeKey::of::<i64>());
    }

    #[test]
    fn keys_hash_by_type() {
        let mut set = HashSet::new();
        set.insert(TypeKey::of::<String>());
        set.insert(TypeKey::of::<String>());
        set.insert(TypeKey::of::<dyn Greeter>());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_uses_type_name() {
        assert_eq!(TypeKey::of::<u8>().to_string(), "u8");
        assert!(TypeKey::of::<English>().name().ends_with("English"));
    }

    #[test]
    fn is_checks_identity() {
        let key = TypeKey::of::<dyn Greeter>();
        assert!(key.is::<dyn Greeter>());
        assert!(!key.is::<English>());
    }

    //--- ErasedValue Tests ------------------------------------------------

    #[test]
    fn downcast_returns_same_allocation() {
        let value = Rc::new(String::from("shared"));
        let erased = ErasedValue::new(value.clone());

        let recovered = erased.downcast::<String>().unwrap();
        assert!(Rc::ptr_eq(&value, &recovered));
        assert_eq!(erased.key(), TypeKey::of::<String>());
    }

    #[test]
    fn downcast_to_other_type_fails() {
        let erased = ErasedValue::new(Rc::new(7_u32));
        assert!(erased.downcast::<u64>().is_none());
    }

    #[test]
    fn trait_objects_can_be_erased() {
        let greeter: Rc<dyn Greeter> = Rc::new(English);
        let erased = ErasedValue::new(greeter);

        assert_eq!(erased.key(), TypeKey::of::<dyn Greeter>());
        assert_eq!(erased.downcast::<dyn Greeter>().unwrap().greet(), "hello");
        assert!(erased.downcast::<English>().is_none());
    }
}
