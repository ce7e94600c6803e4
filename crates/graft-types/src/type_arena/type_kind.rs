// type_arena/type_kind.rs
//
// The canonical type representation stored in the arena.

use graft_identity::{ClassId, SubstClassId, Symbol, TypeVarId};

use super::type_id::{TypeId, TypeIdVec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Void,
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 9] = [
        PrimitiveType::Void,
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Void => "void",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Bound of a wildcard type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    /// `?`
    Unbounded,
    /// `? extends T`
    Extends(TypeId),
    /// `? super T`
    Super(TypeId),
}

/// The canonical type representation.
///
/// This is stored in the TypeArena. Use TypeId handles for O(1) equality
/// and pass-by-copy. Access the TypeKind via `arena.get(id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive(PrimitiveType),
    /// The type of the `null` literal.
    Null,
    Array(TypeId),
    /// A declared class, viewed on its own formals.
    Class(ClassId),
    /// A class viewed through a substitution (see `param::subst_class`).
    Subst(SubstClassId),
    TypeVar(TypeVarId),
    Wildcard(WildcardBound),
    /// Members are sorted and deduplicated; never fewer than two.
    Intersection(TypeIdVec),
    /// A name that has not been resolved yet. Never canonical.
    Unresolved(Symbol),
}

impl TypeKind {
    /// Reference types: everything a type variable may range over.
    pub fn is_reference(&self) -> bool {
        !matches!(self, TypeKind::Primitive(_))
    }
}
