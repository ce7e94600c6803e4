// type_arena/tests.rs

use graft_identity::{ClassId, TypeVarId};

use super::*;

#[test]
fn primitives_are_reserved() {
    let arena = TypeArena::new();
    assert_eq!(arena.primitive(PrimitiveType::Int), TypeId::INT);
    assert_eq!(arena.get(TypeId::BOOLEAN), &TypeKind::Primitive(PrimitiveType::Boolean));
    assert_eq!(arena.get(TypeId::NULL), &TypeKind::Null);
    assert_eq!(arena.len() as u32, TypeId::FIRST_DYNAMIC);
    assert!(TypeId::DOUBLE.is_primitive());
    assert!(!TypeId::NULL.is_primitive());
}

#[test]
fn arrays_are_interned() {
    let mut arena = TypeArena::new();
    let a = arena.array(TypeId::INT);
    let b = arena.array(TypeId::INT);
    assert_eq!(a, b);
    assert_eq!(arena.unwrap_array(a), Some(TypeId::INT));
    assert!(arena.is_reference(a));
    assert!(!arena.is_reference(TypeId::INT));
}

#[test]
fn intersection_normalizes_members() {
    let mut arena = TypeArena::new();
    let a = arena.class(ClassId::new(3));
    let b = arena.class(ClassId::new(1));
    let ab = arena.intersection([a, b, a]);
    let ba = arena.intersection([b, a]);
    assert_eq!(ab, ba);
    assert_eq!(arena.intersection([a]), a);
}

#[test]
fn type_vars_and_wildcards() {
    let mut arena = TypeArena::new();
    let t = arena.type_var(TypeVarId::new(0));
    let ext = arena.wildcard(WildcardBound::Extends(t));
    assert_eq!(arena.unwrap_type_var(t), Some(TypeVarId::new(0)));
    assert_eq!(arena.unwrap_wildcard(ext), Some(WildcardBound::Extends(t)));
    assert_ne!(ext, arena.wildcard(WildcardBound::Super(t)));
}

#[test]
fn primitive_names_round_trip() {
    for prim in PrimitiveType::ALL {
        assert_eq!(PrimitiveType::from_name(prim.name()), Some(prim));
    }
    assert_eq!(PrimitiveType::from_name("string"), None);
}
