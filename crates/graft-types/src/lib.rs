// src/lib.rs
//
// Base type system and the parametric substitution core.
//
// - `type_arena`: interned types addressed by `TypeId`
// - `class_table`: declared classes and members, plus builders
// - `dialect`: the capability table a language extension implements
// - `param`: parametric classes, substitutions and substituted class views
// - `type_system`: equality, subtyping, canonical form and display

pub mod class_table;
pub mod dialect;
pub mod errors;
pub mod param;
#[cfg(test)]
pub(crate) mod testing;
pub mod type_arena;
pub mod type_system;

pub use class_table::{
    ClassBuilder, ClassDef, ClassKind, ConstructorBuilder, ConstructorInstance, FieldBuilder,
    FieldInstance, Flags, MethodBuilder, MethodInstance, ProcedureInstance,
};
pub use dialect::{Dialect, SubstMap};
pub use errors::{Diagnostics, InternalError, SemanticError};
pub use param::{CacheStats, PClass, PClassBuilder, ParamTypeSystem, Subst, SubstClassData, SubstCx};
pub use type_arena::{PrimitiveType, TypeArena, TypeId, TypeIdVec, TypeKind, WildcardBound};
pub use type_system::{PRELUDE_PACKAGE, Prelude, TypeVarDef};
