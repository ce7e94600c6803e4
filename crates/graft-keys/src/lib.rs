// src/lib.rs
//
// Capability-key dialect.
//
// Classes are parametric over keys; a tracked class carries one of its keys
// on every instance. Methods and constructors declare the keys held on
// entry, on return and per thrown type, and overriding is checked against
// those sets.

mod dialect;
mod key;
mod key_set;
mod override_check;
mod procedure;
#[cfg(test)]
mod tests;
mod throw_constraint;

pub use dialect::{KeyDialect, KeyTs, KeyTypeSystemExt, KeyedSignature};
pub use key::{KeyDef, KeyKind, KeyTable};
pub use key_set::KeySet;
pub use override_check::{can_override, check_override, overridden_methods};
pub use procedure::{KeyAnnotations, KeyedProcedure, ProcState, ProcTarget};
pub use throw_constraint::{ThrowConstraint, set_keyed_throw_types};
