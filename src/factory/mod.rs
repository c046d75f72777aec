//=========================================================================
// Scoped Factory
//=========================================================================
//
// Instantiates prefabs with extra per-call dependencies.
//
// Flow:
//   create_with(prefab, parameters, scope)
//     1. validate prefab, parameters, parameter types
//     2. child = Scope::child_of(scope or ambient)
//     3. child.register_singleton(parameter) for each parameter
//     4. match prefab.kind() → Instantiator entry point
//     5. drop child, return Instance
//
// Nothing is allocated before validation passes. The ambient and caller
// scopes are only read.
//
//=========================================================================

//=== Module Declarations =================================================

mod error;
mod parameter;

//=== Public API ==========================================================

pub use error::FactoryError;
pub use parameter::Parameter;

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::injection::{Scope, TypeHierarchy};
use crate::core::scene::{Instance, Instantiator, Prefab, PrefabKind};

//=== FactoryBuilder ======================================================

/// Builder for configuring a [`ScopedFactory`].
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use prefab_factory::core::injection::Scope;
/// use prefab_factory::ScopedFactory;
///
/// trait Weapon {}
/// struct Sword;
/// impl Weapon for Sword {}
///
/// let factory = ScopedFactory::builder(Rc::new(Scope::named("game")))
///     .declare_subtype::<Sword, dyn Weapon>(|sword| sword)
///     .build();
///
/// assert_eq!(factory.hierarchy().len(), 1);
/// ```
pub struct FactoryBuilder {
    ambient: Rc<Scope>,
    hierarchy: TypeHierarchy,
}

impl FactoryBuilder {
    /// Creates a builder around the given ambient scope.
    pub fn new(ambient: Rc<Scope>) -> Self {
        Self {
            ambient,
            hierarchy: TypeHierarchy::new(),
        }
    }

    /// Allows values of type `Sub` to be passed as parameters declared as
    /// `Super`.
    pub fn declare_subtype<Sub, Super>(
        mut self,
        upcast: impl Fn(Rc<Sub>) -> Rc<Super> + 'static,
    ) -> Self
    where
        Sub: ?Sized + 'static,
        Super: ?Sized + 'static,
    {
        self.hierarchy.declare::<Sub, Super>(upcast);
        self
    }

    /// Replaces the type hierarchy used for parameter validation.
    pub fn with_hierarchy(mut self, hierarchy: TypeHierarchy) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    pub fn build(self) -> ScopedFactory {
        ScopedFactory {
            ambient: self.ambient,
            hierarchy: self.hierarchy,
        }
    }
}

//=== ScopedFactory =======================================================

/// Creates prefab instances whose dependencies are resolved from a fresh
/// child scope holding the caller's parameters.
///
/// The ambient scope is handed in by whoever composes the application and
/// is used whenever a call does not supply its own scope.
pub struct ScopedFactory {
    ambient: Rc<Scope>,
    hierarchy: TypeHierarchy,
}

impl ScopedFactory {
    //--- Construction -----------------------------------------------------

    /// Creates a factory with no declared subtype relations.
    pub fn new(ambient: Rc<Scope>) -> Self {
        FactoryBuilder::new(ambient).build()
    }

    pub fn builder(ambient: Rc<Scope>) -> FactoryBuilder {
        FactoryBuilder::new(ambient)
    }

    //--- Accessors --------------------------------------------------------

    pub fn ambient_scope(&self) -> &Rc<Scope> {
        &self.ambient
    }

    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    //--- Creation ---------------------------------------------------------

    /// Instantiates `prefab` without extra parameters.
    ///
    /// Same as [`ScopedFactory::create_with`] with an empty parameter list.
    pub fn create<I: Instantiator>(
        &self,
        host: &mut I,
        prefab: Option<&Prefab>,
        scope: Option<&Rc<Scope>>,
    ) -> Result<Instance, FactoryError> {
        self.create_with(host, prefab, Some(&[]), scope)
    }

    /// Instantiates `prefab`, injecting `parameters` on top of `scope`.
    ///
    /// `None` for `prefab` or `parameters` stands for an absent argument
    /// and is rejected; an empty slice is valid. Without `scope` the
    /// ambient scope is used.
    ///
    /// # Errors
    ///
    /// - [`FactoryError::InvalidArgument`] for an absent prefab or
    ///   parameter list
    /// - [`FactoryError::TypeMismatch`] if a parameter's target is not
    ///   assignable to its declared type
    /// - [`FactoryError::Resolution`] if the host cannot resolve a
    ///   dependency of the prefab
    pub fn create_with<I: Instantiator>(
        &self,
        host: &mut I,
        prefab: Option<&Prefab>,
        parameters: Option<&[Parameter]>,
        scope: Option<&Rc<Scope>>,
    ) -> Result<Instance, FactoryError> {
        let (prefab, parameters) = self.validate(prefab, parameters)?;

        let parent = scope.unwrap_or(&self.ambient);
        let child = self.child_scope(parent, parameters);

        debug!(
            "Instantiating '{}' ({:?}) with {} parameter(s) in scope '{}'",
            prefab.name(),
            prefab.kind(),
            parameters.len(),
            child.name()
        );

        let instance = match prefab.kind() {
            PrefabKind::Component(key) => host
                .instantiate_prefab_for_component(prefab.root(), key, &child)
                .map(Instance::Component),
            PrefabKind::Hierarchy => host
                .instantiate_prefab(prefab.root(), &child)
                .map(Instance::Node),
        };

        instance.map_err(|source| FactoryError::resolution(prefab.name(), source))
    }

    //--- Internal Helpers -------------------------------------------------

    fn validate<'a>(
        &self,
        prefab: Option<&'a Prefab>,
        parameters: Option<&'a [Parameter]>,
    ) -> Result<(&'a Prefab, &'a [Parameter]), FactoryError> {
        let prefab = prefab.ok_or(FactoryError::InvalidArgument { argument: "template" })?;
        let parameters = parameters.ok_or(FactoryError::InvalidArgument { argument: "parameters" })?;

        for (index, parameter) in parameters.iter().enumerate() {
            if !self.hierarchy.is_assignable(parameter.actual(), parameter.declared()) {
                return Err(FactoryError::TypeMismatch {
                    index,
                    declared: parameter.declared(),
                    actual: parameter.actual(),
                });
            }
        }

        Ok((prefab, parameters))
    }

    // Parameters must already be validated.
    fn child_scope(&self, parent: &Rc<Scope>, parameters: &[Parameter]) -> Scope {
        let mut child = Scope::child_of(parent);

        for parameter in parameters {
            let Some(value) = self.hierarchy.upcast(parameter.target(), parameter.declared()) else {
                continue;
            };

            trace!("Binding parameter as `{}`", parameter.declared());
            if child.register_singleton(value).is_some() {
                warn!(
                    "Parameter of type `{}` supplied more than once; the last one wins",
                    parameter.declared()
                );
            }
        }

        child
    }
}

//=========================================================================
// Tests
//=========================================================================
