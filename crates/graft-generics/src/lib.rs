// src/lib.rs
//
// Generics dialect.
//
// Classes and methods are parametric over type variables. Views of generic
// classes come from the shared substitution core; this crate adds generic
// supertype lookup, lub/glb and inference of a call's type arguments.

mod dialect;
pub mod inference;
mod lub;

pub use dialect::{GenericSignature, GenericTs, GenericTypeSystemExt, GenericsDialect};
pub use inference::{
    Constraint, ConstraintKind, InferenceFailure, InferenceOptions, InferenceSolver, Solution,
};
pub use lub::{glb, lub};
