// inference/tests.rs

use graft_identity::{ClassId, Span, TypeVarId};
use graft_types::{ClassBuilder, Flags, TypeId, WildcardBound};

use super::{Constraint, ConstraintKind, InferenceSolver};
use crate::dialect::{GenericTs, GenericTypeSystemExt};
use crate::lub::{glb, lub};

fn span() -> Span {
    Span::compiler_generated()
}

/// ```text
/// interface Coll<E> {}
/// class List<E> implements Coll<E> {}
/// ```
struct Fixture {
    ts: GenericTs,
    coll: ClassId,
    list: ClassId,
    t: TypeVarId,
    t_ty: TypeId,
}

fn fixture() -> Fixture {
    let mut ts = GenericTs::new();
    let coll = ClassBuilder::new("Coll")
        .package("util")
        .flags(Flags::PUBLIC | Flags::INTERFACE)
        .register(&mut ts);
    ts.declare_generic(coll, &["E"], span());

    let e = ts.declare_type_var("E", span());
    let e_ty = ts.arena_mut().type_var(e);
    let coll_e = ts.parameterize(span(), coll, &[e_ty]).unwrap();
    let list = ClassBuilder::new("List")
        .package("util")
        .implements(coll_e)
        .register(&mut ts);
    ts.make_generic(list, &[e], span());

    let t = ts.declare_type_var("T", span());
    let t_ty = ts.arena_mut().type_var(t);
    Fixture {
        ts,
        coll,
        list,
        t,
        t_ty,
    }
}

fn solver_for(f: &Fixture) -> InferenceSolver {
    InferenceSolver::new(vec![f.t], [f.t_ty], None, false)
}

#[test]
fn primitives_box_before_binding() {
    let mut f = fixture();
    let solver = solver_for(&f);
    let integer = f.ts.prelude().integer;

    let step = Constraint::sub_conversion(TypeId::INT, f.t_ty).simplify(&mut f.ts, &solver);
    assert_eq!(step, vec![Constraint::sub_conversion(integer, f.t_ty)]);
    let step = step[0].simplify(&mut f.ts, &solver);
    assert_eq!(step, vec![Constraint::new(ConstraintKind::SubType, integer, f.t_ty)]);
    assert!(!step[0].can_simplify(&f.ts, &solver));
}

#[test]
fn null_implies_nothing() {
    let mut f = fixture();
    let solver = solver_for(&f);
    for c in [
        Constraint::sub_conversion(TypeId::NULL, f.t_ty),
        Constraint::super_conversion(TypeId::NULL, f.t_ty),
        Constraint::equal(TypeId::NULL, f.t_ty),
    ] {
        if c.can_simplify(&f.ts, &solver) {
            assert!(c.simplify(&mut f.ts, &solver).is_empty());
        }
    }
}

#[test]
fn generic_supertype_arguments_are_equated() {
    let mut f = fixture();
    let solver = solver_for(&f);
    let string = f.ts.string();
    let list_string = f.ts.parameterize(span(), f.list, &[string]).unwrap();
    let coll_t = f.ts.parameterize(span(), f.coll, &[f.t_ty]).unwrap();

    let step = Constraint::sub_conversion(list_string, coll_t).simplify(&mut f.ts, &solver);
    assert_eq!(step, vec![Constraint::equal(string, f.t_ty)]);
    assert!(!step[0].can_simplify(&f.ts, &solver));
}

#[test]
fn wildcard_formals_bound_in_their_direction() {
    let mut f = fixture();
    let solver = solver_for(&f);
    let p = *f.ts.prelude();
    let extends_t = f.ts.arena_mut().wildcard(WildcardBound::Extends(f.t_ty));
    let super_t = f.ts.arena_mut().wildcard(WildcardBound::Super(f.t_ty));
    let coll_extends = f.ts.parameterize(span(), f.coll, &[extends_t]).unwrap();
    let coll_super = f.ts.parameterize(span(), f.coll, &[super_t]).unwrap();
    let list_integer = f.ts.parameterize(span(), f.list, &[p.integer]).unwrap();

    let step = Constraint::sub_conversion(list_integer, coll_extends).simplify(&mut f.ts, &solver);
    assert_eq!(step, vec![Constraint::sub_conversion(p.integer, f.t_ty)]);
    let step = Constraint::sub_conversion(list_integer, coll_super).simplify(&mut f.ts, &solver);
    assert_eq!(step, vec![Constraint::super_conversion(p.integer, f.t_ty)]);
}

#[test]
fn arrays_recurse_into_reference_elements() {
    let mut f = fixture();
    let solver = solver_for(&f);
    let string = f.ts.string();
    let strings = f.ts.arena_mut().array(string);
    let ints = f.ts.arena_mut().array(TypeId::INT);
    let ts_array = f.ts.arena_mut().array(f.t_ty);

    let step = Constraint::sub_conversion(strings, ts_array).simplify(&mut f.ts, &solver);
    assert_eq!(step, vec![Constraint::sub_conversion(string, f.t_ty)]);
    assert!(
        Constraint::sub_conversion(ints, ts_array)
            .simplify(&mut f.ts, &solver)
            .is_empty()
    );
}

#[test]
fn super_conversion_walks_the_formal_hierarchy() {
    let mut f = fixture();
    let solver = solver_for(&f);
    let string = f.ts.string();
    let coll_string = f.ts.parameterize(span(), f.coll, &[string]).unwrap();
    let list_t = f.ts.parameterize(span(), f.list, &[f.t_ty]).unwrap();
    let coll_t = f.ts.parameterize(span(), f.coll, &[f.t_ty]).unwrap();

    let step = Constraint::super_conversion(coll_string, list_t).simplify(&mut f.ts, &solver);
    assert_eq!(step.len(), 1);
    assert_eq!(step[0].kind, ConstraintKind::SuperConversion);
    assert!(f.ts.type_equals(step[0].formal, coll_t));
    let step = step[0].simplify(&mut f.ts, &solver);
    assert_eq!(step, vec![Constraint::equal(string, f.t_ty)]);
}

#[test]
fn constraints_display_with_their_relation() {
    let f = fixture();
    let string = f.ts.string();
    assert_eq!(Constraint::sub_conversion(string, f.t_ty).display(&f.ts), "String << T");
    assert_eq!(Constraint::equal(string, f.t_ty).display(&f.ts), "String = T");
}

#[test]
fn lub_of_numbers_is_number() {
    let mut f = fixture();
    let p = *f.ts.prelude();
    assert_eq!(lub(&mut f.ts, &[p.integer, p.long]), p.number);
    assert_eq!(lub(&mut f.ts, &[p.integer, p.string]), p.object);
    assert_eq!(lub(&mut f.ts, &[p.integer]), p.integer);
    assert_eq!(lub(&mut f.ts, &[]), p.object);
}

#[test]
fn lub_of_invocations_uses_a_wildcard() {
    let mut f = fixture();
    let p = *f.ts.prelude();
    let list_integer = f.ts.parameterize(span(), f.list, &[p.integer]).unwrap();
    let list_long = f.ts.parameterize(span(), f.list, &[p.long]).unwrap();
    let list_integer_again = f.ts.parameterize(span(), f.list, &[p.integer]).unwrap();

    let result = lub(&mut f.ts, &[list_integer, list_long]);
    assert_eq!(f.ts.display_type(result), "List<? extends Number>");
    let same = lub(&mut f.ts, &[list_integer, list_integer_again]);
    assert!(f.ts.type_equals(same, list_integer));
}

#[test]
fn glb_keeps_minimal_elements() {
    let mut f = fixture();
    let p = *f.ts.prelude();
    assert_eq!(glb(&mut f.ts, &[p.number, p.integer]), p.integer);
    let both = glb(&mut f.ts, &[p.string, p.integer]);
    assert_eq!(f.ts.display_type(both), "String & Integer");
    assert_eq!(glb(&mut f.ts, &[]), p.object);
}

#[test]
fn initial_constraints_spread_varargs() {
    let mut f = fixture();
    let p = *f.ts.prelude();
    let ts_array = f.ts.arena_mut().array(f.t_ty);
    let solver = InferenceSolver::new(vec![f.t], [ts_array], None, true);

    let spread = solver.initial_constraints(&f.ts, &[p.integer, p.long]);
    assert_eq!(
        spread,
        vec![
            Constraint::sub_conversion(p.integer, f.t_ty),
            Constraint::sub_conversion(p.long, f.t_ty),
        ]
    );

    let strings = f.ts.arena_mut().array(p.string);
    let direct = solver.initial_constraints(&f.ts, &[strings]);
    assert_eq!(direct, vec![Constraint::sub_conversion(strings, ts_array)]);
    assert!(solver.initial_constraints(&f.ts, &[]).is_empty());
}
