// inference/mod.rs
//
// Type-argument inference for calls to generic methods and constructors.

mod constraint;
mod solver;
#[cfg(test)]
mod tests;

pub use constraint::{Constraint, ConstraintKind};
pub use solver::{InferenceFailure, InferenceOptions, InferenceSolver, Solution};
