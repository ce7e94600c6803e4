// src/lib.rs
//
// Shared identities for the graft crates.
// Defines Symbol, Span, Interner and the entity ids as foundational primitives.

mod entities;
mod intern;
mod span;
mod symbol;

pub use entities::{
    ClassId, ConstructorId, FieldId, KeyId, MethodId, PClassId, SubstClassId, SubstId, TypeVarId,
};
pub use intern::Interner;
pub use span::Span;
pub use symbol::Symbol;
