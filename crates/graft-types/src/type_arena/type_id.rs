// type_arena/type_id.rs
//
// TypeId handle and reserved indices.

use smallvec::SmallVec;

/// Handle to a type stored in the `TypeArena`.
///
/// Structural types are interned, so two handles for the same structure are
/// equal. Substituted class views are allocated once per `Subst` cache entry;
/// their handle identity is what the substitution core relies on when it
/// short-circuits recursive substitution.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    // ========================================================================
    // Reserved TypeIds for primitives and special types
    // These are guaranteed to be interned at these indices by TypeArena::new()
    // ========================================================================

    pub const VOID: TypeId = TypeId(0);
    pub const BOOLEAN: TypeId = TypeId(1);
    pub const BYTE: TypeId = TypeId(2);
    pub const SHORT: TypeId = TypeId(3);
    pub const CHAR: TypeId = TypeId(4);
    pub const INT: TypeId = TypeId(5);
    pub const LONG: TypeId = TypeId(6);
    pub const FLOAT: TypeId = TypeId(7);
    pub const DOUBLE: TypeId = TypeId(8);
    pub const NULL: TypeId = TypeId(9);

    /// First non-reserved TypeId index (for dynamic types)
    pub const FIRST_DYNAMIC: u32 = 10;

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the raw index (for debugging)
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_void(self) -> bool {
        self == Self::VOID
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self == Self::NULL
    }

    /// Check if this is a primitive type, void included (no arena needed)
    #[inline]
    pub fn is_primitive(self) -> bool {
        self.0 <= Self::DOUBLE.0
    }
}

/// SmallVec for type children - inline up to 4 (covers most signatures)
pub type TypeIdVec = SmallVec<[TypeId; 4]>;
