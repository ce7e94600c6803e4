// tests.rs

use graft_identity::{ClassId, KeyId, Span};
use graft_types::{
    ClassBuilder, ConstructorBuilder, MethodBuilder, MethodInstance, SemanticError, SubstMap,
    TypeId, TypeIdVec,
};

use crate::*;

fn span() -> Span {
    Span::compiler_generated()
}

fn keys(ids: &[KeyId]) -> KeySet {
    ids.iter().copied().collect()
}

/// `tracked(I) class Item[I]`
fn tracked_item(ts: &mut KeyTs) -> (ClassId, KeyId) {
    let item = ClassBuilder::new("Item").register(ts);
    let (_, key) = ts.declare_tracked(item, "I", span());
    (item, key)
}

fn method(
    ts: &mut KeyTs,
    class: ClassId,
    name: &str,
    annotations: KeyAnnotations,
) -> (graft_identity::MethodId, KeyedProcedure) {
    let id = MethodBuilder::<KeyedSignature>::new(name, TypeId::VOID).register(ts, class);
    let procedure = KeyedProcedure::new(ProcTarget::Method(id), annotations, span());
    (id, procedure)
}

#[test]
fn constructor_defaults_to_holding_the_class_key() {
    let mut ts = KeyTs::new();
    let (item, key) = tracked_item(&mut ts);
    let ctor = ConstructorBuilder::<KeyedSignature>::new().register(&mut ts, item);
    let mut procedure = KeyedProcedure::new(ProcTarget::Constructor(ctor), KeyAnnotations::default(), span());

    assert_eq!(procedure.state(), ProcState::Unbuilt);
    procedure.build_types(&mut ts);
    assert_eq!(procedure.state(), ProcState::TypesBuilt);
    assert!(procedure.disambiguate(&mut ts).unwrap());
    assert_eq!(procedure.state(), ProcState::Disambiguated);

    let sig = &ts.table().constructor(ctor).ext;
    assert_eq!(sig.return_keys, Some(KeySet::singleton(key)));
    assert!(sig.entry_keys.is_empty());
}

#[test]
fn constructor_must_hold_the_class_key() {
    let mut ts = KeyTs::new();
    let (item, _) = tracked_item(&mut ts);
    let ctor = ConstructorBuilder::<KeyedSignature>::new().register(&mut ts, item);
    let annotations = KeyAnnotations {
        returns: Some(KeySet::empty()),
        ..KeyAnnotations::default()
    };
    let mut procedure = KeyedProcedure::new(ProcTarget::Constructor(ctor), annotations, span());
    procedure.build_types(&mut ts);
    let err = procedure.disambiguate(&mut ts).unwrap_err();
    assert!(matches!(err, SemanticError::ConstructorMissingKey { ref key, .. } if key == "I"));
}

#[test]
fn constructor_cannot_hold_the_class_key_on_entry() {
    let mut ts = KeyTs::new();
    let (item, key) = tracked_item(&mut ts);
    let ctor = ConstructorBuilder::<KeyedSignature>::new().register(&mut ts, item);
    let annotations = KeyAnnotations {
        entry: Some(KeySet::singleton(key)),
        ..KeyAnnotations::default()
    };
    let mut procedure = KeyedProcedure::new(ProcTarget::Constructor(ctor), annotations, span());
    procedure.build_types(&mut ts);
    assert!(procedure.disambiguate(&mut ts).unwrap());
    let err = procedure.check(&ts).unwrap_err();
    assert!(matches!(err, SemanticError::ConstructorHoldsKeyOnEntry { ref key, .. } if key == "I"));
}

#[test]
fn method_cannot_acquire_the_class_key() {
    let mut ts = KeyTs::new();
    let (item, key) = tracked_item(&mut ts);

    let (_, mut adds) = method(
        &mut ts,
        item,
        "grab",
        KeyAnnotations {
            returns: Some(KeySet::singleton(key)),
            ..KeyAnnotations::default()
        },
    );
    adds.build_types(&mut ts);
    adds.disambiguate(&mut ts).unwrap();
    assert!(matches!(adds.check(&ts), Err(SemanticError::CannotAddKey { .. })));

    let (_, mut keeps) = method(
        &mut ts,
        item,
        "touch",
        KeyAnnotations {
            entry: Some(KeySet::singleton(key)),
            returns: Some(KeySet::singleton(key)),
            ..KeyAnnotations::default()
        },
    );
    keeps.build_types(&mut ts);
    keeps.disambiguate(&mut ts).unwrap();
    assert!(keeps.check(&ts).is_ok());
}

#[test]
fn throw_keys_default_to_entry_keys() {
    let mut ts = KeyTs::new();
    let (item, _) = tracked_item(&mut ts);
    let k = ts.instance_key("k", span());
    let exception = ts.prelude().exception;

    let (id, mut procedure) = method(
        &mut ts,
        item,
        "risky",
        KeyAnnotations {
            entry: Some(KeySet::singleton(k)),
            returns: Some(KeySet::singleton(k)),
            throws: vec![ThrowConstraint::new(exception, None, span())],
        },
    );
    procedure.build_types(&mut ts);
    procedure.disambiguate(&mut ts).unwrap();

    let m = ts.table().method(id).clone();
    assert_eq!(m.throw_types.as_slice(), &[exception]);
    assert_eq!(m.ext.throw_constraints[0].keys, Some(KeySet::singleton(k)));
    assert!(m.ext.is_canonical(&ts));
}

#[test]
fn unknown_keys_defer_disambiguation() {
    let mut ts = KeyTs::new();
    let (item, _) = tracked_item(&mut ts);
    let late = ts.unknown_key("late", span());

    let (id, mut procedure) = method(
        &mut ts,
        item,
        "later",
        KeyAnnotations {
            entry: Some(KeySet::singleton(late)),
            returns: Some(KeySet::singleton(late)),
            ..KeyAnnotations::default()
        },
    );
    procedure.build_types(&mut ts);
    assert!(!procedure.disambiguate(&mut ts).unwrap());
    assert_eq!(procedure.state(), ProcState::TypesBuilt);
    assert_eq!(procedure.unresolved_keys(&ts), vec!["late".to_string()]);

    let declared = ts.instance_key("late", span());
    assert!(procedure.disambiguate(&mut ts).unwrap());
    assert_eq!(procedure.state(), ProcState::Disambiguated);
    assert!(procedure.unresolved_keys(&ts).is_empty());
    assert_eq!(ts.table().method(id).ext.entry_keys, KeySet::singleton(declared));
}

#[test]
#[should_panic(expected = "internal compiler error")]
fn building_twice_is_an_internal_error() {
    let mut ts = KeyTs::new();
    let (item, _) = tracked_item(&mut ts);
    let (_, mut procedure) = method(&mut ts, item, "m", KeyAnnotations::default());
    procedure.build_types(&mut ts);
    procedure.build_types(&mut ts);
}

struct OverrideFixture {
    ts: KeyTs,
    base: ClassId,
    derived: ClassId,
    a: KeyId,
    b: KeyId,
}

fn override_fixture() -> OverrideFixture {
    let mut ts = KeyTs::new();
    let base = ClassBuilder::new("Base").register(&mut ts);
    let base_ty = ts.class(base).ty;
    let derived = ClassBuilder::new("Derived").extends(base_ty).register(&mut ts);
    let a = ts.instance_key("A", span());
    let b = ts.instance_key("B", span());
    OverrideFixture {
        ts,
        base,
        derived,
        a,
        b,
    }
}

fn keyed_method(
    ts: &mut KeyTs,
    class: ClassId,
    sig: KeyedSignature,
) -> std::rc::Rc<MethodInstance<KeyedSignature>> {
    let id = MethodBuilder::new("m", TypeId::VOID).ext(sig).register(ts, class);
    ts.table().method(id).clone()
}

#[test]
fn override_may_pass_through_new_entry_keys() {
    let mut f = override_fixture();
    let sup = keyed_method(
        &mut f.ts,
        f.base,
        KeyedSignature {
            entry_keys: KeySet::empty(),
            return_keys: Some(keys(&[f.a])),
            throw_constraints: Vec::new(),
        },
    );
    let sub = keyed_method(
        &mut f.ts,
        f.derived,
        KeyedSignature {
            entry_keys: keys(&[f.b]),
            return_keys: Some(keys(&[f.a, f.b])),
            throw_constraints: Vec::new(),
        },
    );
    assert!(check_override(&f.ts, &sub, &sup).is_ok());

    let overridden = overridden_methods(&mut f.ts, &sub);
    assert_eq!(overridden.len(), 1);
    assert_eq!(overridden[0].id, sup.id);
}

#[test]
fn override_must_return_the_new_keys() {
    let mut f = override_fixture();
    let sup = keyed_method(
        &mut f.ts,
        f.base,
        KeyedSignature {
            entry_keys: KeySet::empty(),
            return_keys: Some(keys(&[f.a])),
            throw_constraints: Vec::new(),
        },
    );
    let sub = keyed_method(
        &mut f.ts,
        f.derived,
        KeyedSignature {
            entry_keys: keys(&[f.b]),
            return_keys: Some(keys(&[f.a])),
            throw_constraints: Vec::new(),
        },
    );
    let err = check_override(&f.ts, &sub, &sup).unwrap_err();
    assert!(matches!(err, SemanticError::OverrideViolation { .. }));
    assert!(err.to_string().contains("cannot override"));

    // Holding B on return without holding it on entry is just as wrong.
    let adds = keyed_method(
        &mut f.ts,
        f.derived,
        KeyedSignature {
            entry_keys: KeySet::empty(),
            return_keys: Some(keys(&[f.a, f.b])),
            throw_constraints: Vec::new(),
        },
    );
    assert!(!can_override(&f.ts, &adds, &sup));
}

#[test]
fn override_throw_constraints() {
    let mut f = override_fixture();
    let exception = f.ts.prelude().exception;
    let error = f.ts.prelude().error;
    let sup = keyed_method(
        &mut f.ts,
        f.base,
        KeyedSignature {
            entry_keys: KeySet::empty(),
            return_keys: Some(KeySet::empty()),
            throw_constraints: vec![ThrowConstraint::new(exception, Some(keys(&[f.a])), span())],
        },
    );
    let sub_sig = |throws: Vec<ThrowConstraint>| KeyedSignature {
        entry_keys: keys(&[f.b]),
        return_keys: Some(keys(&[f.b])),
        throw_constraints: throws,
    };

    let matching_ok = keyed_method(
        &mut f.ts,
        f.derived,
        sub_sig(vec![ThrowConstraint::new(exception, Some(keys(&[f.a, f.b])), span())]),
    );
    assert!(can_override(&f.ts, &matching_ok, &sup));

    let matching_bad = keyed_method(
        &mut f.ts,
        f.derived,
        sub_sig(vec![ThrowConstraint::new(exception, Some(keys(&[f.a])), span())]),
    );
    assert!(!can_override(&f.ts, &matching_bad, &sup));

    let fresh_ok = keyed_method(
        &mut f.ts,
        f.derived,
        sub_sig(vec![ThrowConstraint::new(error, Some(keys(&[f.b])), span())]),
    );
    assert!(can_override(&f.ts, &fresh_ok, &sup));

    let fresh_bad = keyed_method(
        &mut f.ts,
        f.derived,
        sub_sig(vec![ThrowConstraint::new(error, Some(KeySet::empty()), span())]),
    );
    assert!(!can_override(&f.ts, &fresh_bad, &sup));
}

#[test]
fn unchanged_key_sets_are_shared_after_substitution() {
    let mut ts = KeyTs::new();
    let box_class = ClassBuilder::new("Box").register(&mut ts);
    let (_, params) = ts.declare_key_params(box_class, &["K"], span());
    let k1 = ts.instance_key("k1", span());
    let other = ts.instance_key("other", span());

    let subst = ts.subst(SubstMap::<KeyDialect>::from([(params[0], k1)]));
    let untouched = KeySet::singleton(other);
    assert!(KeySet::ptr_eq(&untouched, &ts.subst_key_set(subst, &untouched)));

    let mentions = keys(&[params[0], other]);
    assert_eq!(ts.subst_key_set(subst, &mentions), keys(&[k1, other]));
}

#[test]
fn tracked_requires_a_parametric_class() {
    let mut ts = KeyTs::new();
    let plain = ClassBuilder::new("Plain").register(&mut ts);
    let k = ts.instance_key("k", span());
    assert!(matches!(
        ts.tracked(span(), plain, k),
        Err(SemanticError::ArityMismatch { expected: 0, found: 1, .. })
    ));
}

#[test]
#[should_panic(expected = "internal compiler error")]
fn throw_types_must_line_up_with_constraints() {
    let mut ts = KeyTs::new();
    let exception = ts.prelude().exception;
    let class = ClassBuilder::new("C").register(&mut ts);
    let sig = KeyedSignature {
        throw_constraints: vec![ThrowConstraint::new(exception, None, span())],
        ..KeyedSignature::default()
    };
    let id = MethodBuilder::new("m", TypeId::VOID).ext(sig).register(&mut ts, class);
    let method = ts.table_mut().method_mut(id);
    set_keyed_throw_types(method, TypeIdVec::new());
}

#[test]
fn built_in_classes_are_never_wrapped() {
    let mut ts = KeyTs::new();
    let k = ts.instance_key("k", span());
    let string = ts.string();
    let subst = ts.subst(SubstMap::<KeyDialect>::from([(k, k)]));
    assert_eq!(ts.subst_type(subst, string), string);
}
