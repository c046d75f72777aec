//=========================================================================
// Prefab Factory — Library Root
//
// Instantiates prefabs while injecting extra, per-call dependencies
// through a transient child scope.
//
// Responsibilities:
// - Expose the factory facade (`ScopedFactory`) and its parameters
// - Provide the injection scope and type keys that parameters bind into
// - Provide the minimal scene host prefabs are instantiated into
//
// Typical usage:
// ```
// use std::rc::Rc;
// use prefab_factory::prelude::*;
//
// struct Door {
//     code: Rc<u32>,
// }
//
// impl Inject for Door {
//     fn inject(scope: &Scope) -> Result<Self, ResolveError> {
//         Ok(Self { code: scope.resolve()? })
//     }
// }
//
// let prefab = Prefab::for_component::<Door>(
//     NodeTemplate::new("door").with_component(ComponentBlueprint::injected::<Door>()),
// )
// .unwrap();
//
// let factory = ScopedFactory::new(Rc::new(Scope::new()));
// let mut world = World::new();
//
// let door = factory
//     .create_with(&mut world, Some(&prefab), Some(&[Parameter::new(1234_u32)]), None)
//     .unwrap();
//
// let door = world.resolve_component::<Door>(door.component().unwrap()).unwrap();
// assert_eq!(*door.code, 1234);
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the injection container and the scene host. It is
// public so hosts can implement `Instantiator` or bind their own
// services, but most callers only need the `ScopedFactory` facade.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `factory` implements validation, child-scope setup and dispatch to the
// host. Its public types are re-exported below.
//
mod factory;

//--- Public Exports ------------------------------------------------------

pub use factory::{FactoryBuilder, FactoryError, Parameter, ScopedFactory};
