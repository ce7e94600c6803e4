// type_arena/arena.rs
//
// Per-type-system storage with automatic deduplication.

use rustc_hash::FxHashMap;

use graft_identity::{ClassId, SubstClassId, Symbol, TypeVarId};

use super::type_id::{TypeId, TypeIdVec};
use super::type_kind::{PrimitiveType, TypeKind, WildcardBound};

/// Type arena with automatic interning/deduplication.
#[derive(Clone)]
pub struct TypeArena {
    /// Interned types, indexed by TypeId
    types: Vec<TypeKind>,
    /// Deduplication map
    intern_map: FxHashMap<TypeKind, TypeId>,
}

impl std::fmt::Debug for TypeArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeArena")
            .field("types_count", &self.types.len())
            .finish_non_exhaustive()
    }
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeArena {
    /// Create a new TypeArena with pre-interned primitive types
    pub fn new() -> Self {
        let mut arena = Self {
            types: Vec::new(),
            intern_map: FxHashMap::default(),
        };

        // Pre-intern all primitive types in the order defined by TypeId constants.
        for prim in PrimitiveType::ALL {
            arena.intern(TypeKind::Primitive(prim));
        }
        debug_assert_eq!(
            arena.intern(TypeKind::Primitive(PrimitiveType::Double)),
            TypeId::DOUBLE
        );
        let null = arena.intern(TypeKind::Null);
        debug_assert_eq!(null, TypeId::NULL);
        debug_assert_eq!(arena.types.len() as u32, TypeId::FIRST_DYNAMIC);

        arena
    }

    /// Intern a type, returning existing TypeId if already interned
    fn intern(&mut self, ty: TypeKind) -> TypeId {
        let next_id = TypeId::from_index(self.types.len());
        *self.intern_map.entry(ty.clone()).or_insert_with(|| {
            self.types.push(ty);
            next_id
        })
    }

    /// Get the TypeKind for a TypeId
    pub fn get(&self, id: TypeId) -> &TypeKind {
        &self.types[id.index() as usize]
    }

    /// Number of types stored (reserved types included).
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    pub fn primitive(&self, prim: PrimitiveType) -> TypeId {
        match prim {
            PrimitiveType::Void => TypeId::VOID,
            PrimitiveType::Boolean => TypeId::BOOLEAN,
            PrimitiveType::Byte => TypeId::BYTE,
            PrimitiveType::Short => TypeId::SHORT,
            PrimitiveType::Char => TypeId::CHAR,
            PrimitiveType::Int => TypeId::INT,
            PrimitiveType::Long => TypeId::LONG,
            PrimitiveType::Float => TypeId::FLOAT,
            PrimitiveType::Double => TypeId::DOUBLE,
        }
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeKind::Array(element))
    }

    pub fn class(&mut self, class: ClassId) -> TypeId {
        self.intern(TypeKind::Class(class))
    }

    pub(crate) fn subst_class(&mut self, view: SubstClassId) -> TypeId {
        self.intern(TypeKind::Subst(view))
    }

    pub fn type_var(&mut self, var: TypeVarId) -> TypeId {
        self.intern(TypeKind::TypeVar(var))
    }

    pub fn wildcard(&mut self, bound: WildcardBound) -> TypeId {
        self.intern(TypeKind::Wildcard(bound))
    }

    pub fn unresolved(&mut self, name: Symbol) -> TypeId {
        self.intern(TypeKind::Unresolved(name))
    }

    /// Intersection of `members`. Sorts and deduplicates; a single member is
    /// returned as-is.
    pub fn intersection(&mut self, members: impl IntoIterator<Item = TypeId>) -> TypeId {
        let mut members: TypeIdVec = members.into_iter().collect();
        members.sort();
        members.dedup();
        match members.len() {
            0 => panic!("internal compiler error: empty intersection type"),
            1 => members[0],
            _ => self.intern(TypeKind::Intersection(members)),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn unwrap_array(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            TypeKind::Array(elem) => Some(*elem),
            _ => None,
        }
    }

    pub fn unwrap_class(&self, id: TypeId) -> Option<ClassId> {
        match self.get(id) {
            TypeKind::Class(class) => Some(*class),
            _ => None,
        }
    }

    pub fn unwrap_subst(&self, id: TypeId) -> Option<SubstClassId> {
        match self.get(id) {
            TypeKind::Subst(view) => Some(*view),
            _ => None,
        }
    }

    pub fn unwrap_type_var(&self, id: TypeId) -> Option<TypeVarId> {
        match self.get(id) {
            TypeKind::TypeVar(var) => Some(*var),
            _ => None,
        }
    }

    pub fn unwrap_wildcard(&self, id: TypeId) -> Option<WildcardBound> {
        match self.get(id) {
            TypeKind::Wildcard(bound) => Some(*bound),
            _ => None,
        }
    }

    pub fn unwrap_primitive(&self, id: TypeId) -> Option<PrimitiveType> {
        match self.get(id) {
            TypeKind::Primitive(prim) => Some(*prim),
            _ => None,
        }
    }

    pub fn is_array(&self, id: TypeId) -> bool {
        matches!(self.get(id), TypeKind::Array(_))
    }

    pub fn is_reference(&self, id: TypeId) -> bool {
        self.get(id).is_reference()
    }

    /// Class or substituted class.
    pub fn is_class_like(&self, id: TypeId) -> bool {
        matches!(self.get(id), TypeKind::Class(_) | TypeKind::Subst(_))
    }
}
