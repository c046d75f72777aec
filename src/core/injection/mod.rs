//=========================================================================
// Injection
//=========================================================================
//
// Type-keyed dependency resolution used while constructing prefabs.
//
// Architecture:
//   TypeKey ──────── identifies a bindable type (TypeId + name)
//   ErasedValue ──── Rc<T> behind dyn Any, tagged with its TypeKey
//   Scope ────────── HashMap<TypeKey, ErasedValue> + parent chain
//   TypeHierarchy ── declared "A may be bound as B" relations
//
// Flow:
//   Scope::bind() → Scope::resolve::<T>() → Inject::inject(scope)
//
//=========================================================================

//=== Module Declarations =================================================

mod error;
mod hierarchy;
mod scope;
mod type_key;

//=== Public API ==========================================================

pub use error::ResolveError;
pub use hierarchy::TypeHierarchy;
pub use scope::Scope;
pub use type_key::{ErasedValue, TypeKey};

//=== Inject Trait ========================================================

/// Construction of a value whose dependencies come from a [`Scope`].
///
/// Implementors resolve each dependency and propagate the first failure
/// with `?`, so a missing binding never turns into a default value.
///
/// ```rust
/// use std::rc::Rc;
/// use prefab_factory::core::injection::{Inject, ResolveError, Scope};
///
/// struct Health(u32);
///
/// struct Player {
///     health: Rc<Health>,
///     level: u8,
/// }
///
/// impl Inject for Player {
///     fn inject(scope: &Scope) -> Result<Self, ResolveError> {
///         Ok(Self {
///             health: scope.resolve()?,
///             level: *scope.resolve::<u8>()?,
///         })
///     }
/// }
///
/// let mut scope = Scope::new();
/// scope.bind(Health(100)).bind(3_u8);
///
/// let player = Player::inject(&scope).unwrap();
/// assert_eq!(player.health.0, 100);
/// assert_eq!(player.level, 3);
/// ```
pub trait Inject: Sized {
    fn inject(scope: &Scope) -> Result<Self, ResolveError>;
}
