// type_arena/mod.rs
//
// Interned type system using TypeId handles for O(1) equality and minimal allocations.
//
// - TypeId: u32 handle to a type (Copy, trivial Eq/Hash)
// - TypeArena: per-type-system storage with automatic deduplication
// - TypeKind: the canonical type representation using TypeId for child types

mod arena;
#[cfg(test)]
mod tests;
pub mod type_id;
pub mod type_kind;

pub use arena::*;
pub use type_id::*;
pub use type_kind::*;
