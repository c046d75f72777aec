//=========================================================================
// Parameter
//=========================================================================
//
// Caller-supplied value bound into the child scope of one factory call.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::injection::{ErasedValue, TypeKey};

//=== Parameter ===========================================================

/// A (target value, declared type) pair for per-call injection.
///
/// The declared type is the key the value will be resolvable under. It
/// may differ from the target's own type only if the factory's type
/// hierarchy declares the target type as a subtype of it.
#[derive(Debug, Clone)]
pub struct Parameter {
    target: ErasedValue,
    declared: TypeKey,
}

impl Parameter {
    /// Declares `target` under its own type.
    pub fn new<T: 'static>(target: T) -> Self {
        Self::shared(Rc::new(target))
    }

    /// Declares an already shared value under its own type.
    ///
    /// Lets callers keep a handle and later compare with `Rc::ptr_eq`.
    pub fn shared<T: ?Sized + 'static>(target: Rc<T>) -> Self {
        let declared = TypeKey::of::<T>();
        Self::with_type(target, declared)
    }

    /// Declares `target` under an explicit type.
    pub fn with_type<T: ?Sized + 'static>(target: Rc<T>, declared: TypeKey) -> Self {
        Self {
            target: ErasedValue::new(target),
            declared,
        }
    }

    pub fn target(&self) -> &ErasedValue {
        &self.target
    }

    pub fn declared(&self) -> TypeKey {
        self.declared
    }

    /// Runtime type of the target value.
    pub fn actual(&self) -> TypeKey {
        self.target.key()
    }
}

//=========================================================================
// Tests
//=========================================================================
