//! First-class identity types for type-system entities.
//!
//! These types provide type-safe identifiers for classes, members, keys and
//! substitutions, preventing mix-ups between different entity kinds.

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis struct $name(u32);

        impl $name {
            pub fn new(index: u32) -> Self {
                Self(index)
            }

            pub fn index(self) -> u32 {
                self.0
            }
        }
    };
}

define_entity_id! {
    /// Identity for a declared class or interface
    pub struct ClassId;
}

define_entity_id! {
    /// Identity for a method declaration (always has a defining class)
    pub struct MethodId;
}

define_entity_id! {
    /// Identity for a field declaration (always has a defining class)
    pub struct FieldId;
}

define_entity_id! {
    /// Identity for a constructor declaration
    pub struct ConstructorId;
}

define_entity_id! {
    /// Identity for a capability key (parameter, instance or unresolved)
    pub struct KeyId;
}

define_entity_id! {
    /// Identity for a type variable (e.g., T in `class List<T>`)
    pub struct TypeVarId;
}

define_entity_id! {
    /// Identity for a parametric class (a class paired with its formals)
    pub struct PClassId;
}

define_entity_id! {
    /// Identity for one substitution map and its instantiation cache
    pub struct SubstId;
}

define_entity_id! {
    /// Identity for one substituted view of a class
    pub struct SubstClassId;
}
