// type_system/mod.rs
//
// Base type-system queries: built-in classes, type variables, equality,
// subtyping, canonical form and display.

mod display;
mod prelude;
mod query;
mod subtype;
mod type_vars;

pub use prelude::{PRELUDE_PACKAGE, Prelude};
pub use type_vars::TypeVarDef;
