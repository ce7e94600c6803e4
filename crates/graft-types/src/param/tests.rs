// param/tests.rs

use std::rc::Rc;

use graft_identity::Span;

use crate::class_table::{ClassBuilder, FieldBuilder};
use crate::dialect::SubstMap;
use crate::errors::SemanticError;
use crate::testing::{TestDialect, TestTs, declare_box};
use crate::type_arena::{TypeId, TypeKind};

fn span() -> Span {
    Span::compiler_generated()
}

#[test]
fn instantiate_substitutes_members() {
    let mut ts = TestTs::new();
    let boxed = declare_box(&mut ts);
    let string = ts.string();

    let box_string = ts.instantiate(span(), boxed.pclass, &[string]).unwrap();
    assert!(matches!(ts.arena().get(box_string), TypeKind::Subst(_)));
    assert_eq!(ts.display_type(box_string), "Box{X -> String}");

    let value = ts.field_named(box_string, "value").unwrap();
    assert_eq!(value.ty, string);
    assert_eq!(value.container, box_string);

    let get = ts.methods_named(box_string, "get").pop().unwrap();
    assert_eq!(get.return_type, string);
    let put = ts.methods_named(box_string, "put").pop().unwrap();
    assert_eq!(put.formal_types.as_slice(), &[string]);
    assert_eq!(put.return_type, TypeId::VOID);
}

#[test]
fn arity_mismatch_is_reported() {
    let mut ts = TestTs::new();
    let boxed = declare_box(&mut ts);
    let string = ts.string();

    let err = ts
        .instantiate(span(), boxed.pclass, &[string, string])
        .unwrap_err();
    match err {
        SemanticError::ArityMismatch {
            expected, found, ..
        } => {
            assert_eq!(expected, 1);
            assert_eq!(found, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(ts.instantiate(span(), boxed.pclass, &[]).is_err());
}

#[test]
#[should_panic(expected = "internal compiler error")]
fn unchecked_instantiate_rejects_wrong_arity() {
    let mut ts = TestTs::new();
    let boxed = declare_box(&mut ts);
    ts.unchecked_instantiate(span(), boxed.pclass, &[]);
}

#[test]
fn types_without_formals_are_returned_unchanged() {
    let mut ts = TestTs::new();
    let boxed = declare_box(&mut ts);
    let plain = ClassBuilder::new("Plain").register(&mut ts);
    let plain_ty = ts.class(plain).ty;
    let string = ts.string();
    let plain_array = ts.arena_mut().array(plain_ty);

    let map = SubstMap::<TestDialect>::from([(boxed.x, string)]);
    let subst = ts.subst(map);
    assert_eq!(ts.subst_type(subst, plain_ty), plain_ty);
    assert_eq!(ts.subst_type(subst, plain_array), plain_array);
    assert_eq!(ts.subst_type(subst, TypeId::INT), TypeId::INT);
    assert_eq!(ts.subst_type(subst, string), string);
}

#[test]
fn repeated_substitution_hits_the_cache() {
    let mut ts = TestTs::new();
    let boxed = declare_box(&mut ts);
    let string = ts.string();
    let subst = ts.subst(SubstMap::<TestDialect>::from([(boxed.x, string)]));

    let first = ts.subst_type(subst, boxed.ty);
    let second = ts.subst_type(subst, boxed.ty);
    assert_eq!(first, second);

    let stats = ts.substitution(subst).cache_stats();
    assert!(stats.hits >= 1);
}

#[test]
fn distinct_roots_do_not_share_views() {
    let mut ts = TestTs::new();
    let boxed = declare_box(&mut ts);
    let string = ts.string();

    let a = ts.instantiate(span(), boxed.pclass, &[string]).unwrap();
    let b = ts.instantiate(span(), boxed.pclass, &[string]).unwrap();
    assert_ne!(a, b);
    assert!(ts.type_equals(a, b));

    let integer = ts.prelude().integer;
    let c = ts.instantiate(span(), boxed.pclass, &[integer]).unwrap();
    assert!(!ts.type_equals(a, c));
}

#[test]
fn member_instances_are_cached_per_view() {
    let mut ts = TestTs::new();
    let boxed = declare_box(&mut ts);
    let string = ts.string();
    let box_string = ts.instantiate(span(), boxed.pclass, &[string]).unwrap();

    let first = ts.methods(box_string);
    let second = ts.methods(box_string);
    assert_eq!(first.len(), 2);
    for (a, b) in first.iter().zip(second.iter()) {
        assert!(Rc::ptr_eq(a, b));
    }
}

#[test]
fn composition_collapses_chained_substitutions() {
    let mut ts = TestTs::new();
    let boxed = declare_box(&mut ts);
    let y = ts.declare_type_var("Y", span());
    let z = ts.declare_type_var("Z", span());
    let y_ty = ts.arena_mut().type_var(y);
    let z_ty = ts.arena_mut().type_var(z);

    let box_y = ts.instantiate(span(), boxed.pclass, &[y_ty]).unwrap();
    let box_z = ts.instantiate(span(), boxed.pclass, &[z_ty]).unwrap();
    let chained = ts.subst_type_with(box_y, SubstMap::<TestDialect>::from([(y, z_ty)]));

    assert!(ts.type_equals(chained, box_z));
    assert_eq!(ts.base_of(chained), boxed.ty);
    let value = ts.field_named(chained, "value").unwrap();
    assert_eq!(value.ty, z_ty);
}

#[test]
fn substituting_unrelated_formals_keeps_the_view() {
    let mut ts = TestTs::new();
    let boxed = declare_box(&mut ts);
    let y = ts.declare_type_var("Y", span());
    let string = ts.string();

    let box_string = ts.instantiate(span(), boxed.pclass, &[string]).unwrap();
    let integer = ts.prelude().integer;
    let same = ts.subst_type_with(box_string, SubstMap::<TestDialect>::from([(y, integer)]));
    assert_eq!(same, box_string);
}

#[test]
fn composed_paths_share_one_view() {
    let mut ts = TestTs::new();
    let boxed = declare_box(&mut ts);
    let y = ts.declare_type_var("Y", span());
    let y_ty = ts.arena_mut().type_var(y);
    let string = ts.string();

    // Two separately instantiated Box<Y> both become Box<String> under one root.
    let first = ts.instantiate(span(), boxed.pclass, &[y_ty]).unwrap();
    let second = ts.instantiate(span(), boxed.pclass, &[y_ty]).unwrap();
    assert_ne!(first, second);
    let subst = ts.subst(SubstMap::<TestDialect>::from([(y, string)]));
    let a = ts.subst_type(subst, first);
    let b = ts.subst_type(subst, second);
    assert_eq!(a, b);

    let array = ts.arena_mut().array(first);
    let via_array = ts.subst_type(subst, array);
    assert_eq!(ts.arena().unwrap_array(via_array), Some(a));
}

#[test]
fn null_instantiate_uses_identity_map() {
    let mut ts = TestTs::new();
    let boxed = declare_box(&mut ts);
    let generic = ts.null_instantiate(span(), boxed.pclass);
    assert_eq!(ts.display_type(generic), "Box{X -> X}");

    let x_ty = ts.arena_mut().type_var(boxed.x);
    let value = ts.field_named(generic, "value").unwrap();
    assert_eq!(value.ty, x_ty);
}

#[test]
fn supertypes_are_substituted() {
    let mut ts = TestTs::new();
    let boxed = declare_box(&mut ts);
    let y = ts.declare_type_var("Y", span());
    let y_ty = ts.arena_mut().type_var(y);

    // class Sub<Y> extends Box<Y>
    let box_y = ts.instantiate(span(), boxed.pclass, &[y_ty]).unwrap();
    let sub = ClassBuilder::new("Sub").extends(box_y).register(&mut ts);
    let sub_ty = ts.class(sub).ty;
    let sub_pclass = ts.mutable_pclass(sub_ty, span()).formal(y).seal(&mut ts);

    let integer = ts.prelude().integer;
    let sub_integer = ts.instantiate(span(), sub_pclass, &[integer]).unwrap();
    let super_type = ts.super_type(sub_integer).unwrap();
    let box_integer = ts.instantiate(span(), boxed.pclass, &[integer]).unwrap();
    assert!(ts.type_equals(super_type, box_integer));
    assert!(ts.is_subtype(sub_integer, box_integer));

    let string = ts.string();
    let box_string = ts.instantiate(span(), boxed.pclass, &[string]).unwrap();
    assert!(!ts.is_subtype(sub_integer, box_string));
}

#[test]
fn member_classes_see_outer_formals() {
    let mut ts = TestTs::new();
    let boxed = declare_box(&mut ts);
    let x_ty = ts.arena_mut().type_var(boxed.x);

    // class Box<X> { class Node { X item; Box owner; } }
    let node = ClassBuilder::new("Node").outer(boxed.ty).register(&mut ts);
    FieldBuilder::new("item", x_ty).register(&mut ts, node);
    FieldBuilder::new("owner", boxed.ty).register(&mut ts, node);
    assert_eq!(ts.class(node).full_name, "demo.Box.Node");

    let string = ts.string();
    let box_string = ts.instantiate(span(), boxed.pclass, &[string]).unwrap();
    let node_string = ts.member_class_named(box_string, "Node").unwrap();
    assert!(matches!(ts.arena().get(node_string), TypeKind::Subst(_)));

    let item = ts.field_named(node_string, "item").unwrap();
    assert_eq!(item.ty, string);

    let owner = ts.field_named(node_string, "owner").unwrap();
    assert!(ts.type_equals(owner.ty, box_string));
    let outer = ts.outer(node_string).unwrap();
    assert!(ts.type_equals(outer, box_string));
}

#[test]
fn subst_pclass_keeps_formals() {
    let mut ts = TestTs::new();
    let boxed = declare_box(&mut ts);
    let string = ts.string();
    let subst = ts.subst(SubstMap::<TestDialect>::from([(boxed.x, string)]));
    let pclass = ts.subst_pclass(subst, boxed.pclass);
    assert_eq!(pclass.formals, vec![boxed.x]);
    assert_eq!(ts.view_map(pclass.clazz).map(|m| m.len()), Some(1));
}

#[test]
fn equal_maps_make_equal_substitutions() {
    let mut ts = TestTs::new();
    let boxed = declare_box(&mut ts);
    let string = ts.string();
    let a = ts.subst(SubstMap::<TestDialect>::from([(boxed.x, string)]));
    let b = ts.subst(SubstMap::<TestDialect>::from([(boxed.x, string)]));
    assert_ne!(a, b);
    assert_eq!(ts.substitution(a), ts.substitution(b));
}
