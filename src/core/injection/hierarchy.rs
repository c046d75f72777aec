//=========================================================================
// Type Hierarchy
//=========================================================================
//
// Explicitly declared subtype relations between bindable types.
//
// Rust has no class inheritance, so "value of type A may be bound as B"
// is recorded as an edge A → B carrying the conversion that turns an
// Rc<A> into an Rc<B> (usually the unsizing coercion to a trait object).
// Relations are transitive: A → B → C makes A assignable to C.
//
// Types without a declared edge are only assignable to themselves.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use super::{ErasedValue, TypeKey};

//=== Types ===============================================================

type Upcast = Rc<dyn Fn(&ErasedValue) -> Option<ErasedValue>>;

//=== TypeHierarchy =======================================================

/// Registry of declared subtype relations.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use prefab_factory::core::injection::{ErasedValue, TypeHierarchy, TypeKey};
///
/// trait Weapon {}
/// struct Sword;
/// impl Weapon for Sword {}
///
/// let mut hierarchy = TypeHierarchy::new();
/// hierarchy.declare::<Sword, dyn Weapon>(|sword| sword);
///
/// let sword = ErasedValue::new(Rc::new(Sword));
/// let weapon = hierarchy.upcast(&sword, TypeKey::of::<dyn Weapon>()).unwrap();
/// assert_eq!(weapon.key(), TypeKey::of::<dyn Weapon>());
/// ```
#[derive(Default, Clone)]
pub struct TypeHierarchy {
    supertypes: HashMap<TypeKey, Vec<(TypeKey, Upcast)>>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Declaration ------------------------------------------------------

    /// Declares `Sub` as a subtype of `Super`.
    ///
    /// Declaring the same pair again replaces the earlier conversion.
    pub fn declare<Sub, Super>(
        &mut self,
        upcast: impl Fn(Rc<Sub>) -> Rc<Super> + 'static,
    ) -> &mut Self
    where
        Sub: ?Sized + 'static,
        Super: ?Sized + 'static,
    {
        let convert: Upcast = Rc::new(move |value: &ErasedValue| {
            value
                .downcast::<Sub>()
                .map(|sub| ErasedValue::new(upcast(sub)))
        });

        let super_key = TypeKey::of::<Super>();
        let edges = self.supertypes.entry(TypeKey::of::<Sub>()).or_default();
        edges.retain(|(key, _)| *key != super_key);
        edges.push((super_key, convert));
        self
    }

    //--- Queries ----------------------------------------------------------

    /// Returns true if a value of type `actual` may be bound as `declared`.
    pub fn is_assignable(&self, actual: TypeKey, declared: TypeKey) -> bool {
        self.path(actual, declared).is_some()
    }

    /// Converts `value` to the `declared` type.
    ///
    /// Returns a clone of `value` when the types are equal and `None`
    /// when no declared chain leads from the value's type to `declared`.
    pub fn upcast(&self, value: &ErasedValue, declared: TypeKey) -> Option<ErasedValue> {
        let steps = self.path(value.key(), declared)?;
        steps
            .iter()
            .try_fold(value.clone(), |current, step| step(&current))
    }

    /// Number of declared relations.
    pub fn len(&self) -> usize {
        self.supertypes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    //--- Internal Helpers -------------------------------------------------

    // Breadth-first search over declared edges. Returns the conversions
    // to apply in order; empty when `from == to`.
    fn path(&self, from: TypeKey, to: TypeKey) -> Option<Vec<Upcast>> {
        if from == to {
            return Some(Vec::new());
        }

        let mut previous: HashMap<TypeKey, (TypeKey, Upcast)> = HashMap::new();
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            for (next, upcast) in self.supertypes.get(&current).into_iter().flatten() {
                if *next == from || previous.contains_key(next) {
                    continue;
                }
                previous.insert(*next, (current, Rc::clone(upcast)));

                if *next == to {
                    let mut steps = Vec::new();
                    let mut key = to;
                    while key != from {
                        let (prev, step) = previous.remove(&key)?;
                        steps.push(step);
                        key = prev;
                    }
                    steps.reverse();
                    return Some(steps);
                }

                queue.push_back(*next);
            }
        }

        None
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter {
        fn greet(&self) -> String;
    }

    trait Speaker {
        fn speak(&self) -> String;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    // Adapts any greeter into a speaker.
    struct GreeterSpeaker(Rc<dyn Greeter>);

    impl Speaker for GreeterSpeaker {
        fn speak(&self) -> String {
            format!("{}!", self.0.greet())
        }
    }

    fn greeter_hierarchy() -> TypeHierarchy {
        let mut hierarchy = TypeHierarchy::new();
        hierarchy.declare::<English, dyn Greeter>(|english| english);
        hierarchy
    }

    //--- Assignability Tests ----------------------------------------------

    #[test]
    fn every_type_is_assignable_to_itself() {
        let hierarchy = TypeHierarchy::new();
        assert!(hierarchy.is_assignable(TypeKey::of::<i32>(), TypeKey::of::<i32>()));
        assert!(hierarchy.is_empty());
    }

    #[test]
    fn value_types_are_strict() {
        let hierarchy = TypeHierarchy::new();
        assert!(!hierarchy.is_assignable(TypeKey::of::<i32>(), TypeKey::of::<i64>()));
        assert!(!hierarchy.is_assignable(TypeKey::of::<i32>(), TypeKey::of::<String>()));
    }

    #[test]
    fn declared_relation_is_directional() {
        let hierarchy = greeter_hierarchy();
        assert!(hierarchy.is_assignable(TypeKey::of::<English>(), TypeKey::of::<dyn Greeter>()));
        assert!(!hierarchy.is_assignable(TypeKey::of::<dyn Greeter>(), TypeKey::of::<English>()));
        assert_eq!(hierarchy.len(), 1);
    }

    #[test]
    fn relations_are_transitive() {
        let mut hierarchy = greeter_hierarchy();
        hierarchy.declare::<dyn Greeter, dyn Speaker>(|greeter| {
            Rc::new(GreeterSpeaker(greeter)) as Rc<dyn Speaker>
        });

        assert!(hierarchy.is_assignable(TypeKey::of::<English>(), TypeKey::of::<dyn Speaker>()));

        let english = ErasedValue::new(Rc::new(English));
        let speaker = hierarchy
            .upcast(&english, TypeKey::of::<dyn Speaker>())
            .unwrap();
        assert_eq!(speaker.downcast::<dyn Speaker>().unwrap().speak(), "hello!");
    }

    #[test]
    fn redeclaring_pair_replaces_edge() {
        let mut hierarchy = greeter_hierarchy();
        hierarchy.declare::<English, dyn Greeter>(|english| english);
        assert_eq!(hierarchy.len(), 1);
    }

    //--- Upcast Tests -----------------------------------------------------

    #[test]
    fn upcast_to_same_type_keeps_allocation() {
        let hierarchy = TypeHierarchy::new();
        let value = Rc::new(5_u16);
        let erased = ErasedValue::new(value.clone());

        let same = hierarchy.upcast(&erased, TypeKey::of::<u16>()).unwrap();
        assert!(Rc::ptr_eq(&value, &same.downcast::<u16>().unwrap()));
    }

    #[test]
    fn upcast_to_trait_object() {
        let hierarchy = greeter_hierarchy();
        let erased = ErasedValue::new(Rc::new(English));

        let greeter = hierarchy
            .upcast(&erased, TypeKey::of::<dyn Greeter>())
            .unwrap();
        assert_eq!(greeter.key(), TypeKey::of::<dyn Greeter>());
        assert_eq!(greeter.downcast::<dyn Greeter>().unwrap().greet(), "hello");
    }

    #[test]
    fn upcast_to_unrelated_type_fails() {
        let hierarchy = greeter_hierarchy();
        let erased = ErasedValue::new(Rc::new(3_i32));
        assert!(hierarchy.upcast(&erased, TypeKey::of::<dyn Greeter>()).is_none());
    }
}
