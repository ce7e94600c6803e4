// Integration tests: inferring type arguments of generic static methods.

use graft_identity::{ClassId, MethodId, Span, TypeVarId};
use graft_generics::{
    GenericSignature, GenericTs, GenericTypeSystemExt, InferenceFailure, InferenceOptions,
    InferenceSolver,
};
use graft_types::{ClassBuilder, Flags, MethodBuilder, TypeId, WildcardBound};

fn span() -> Span {
    Span::compiler_generated()
}

struct Library {
    ts: GenericTs,
    list: ClassId,
    util: ClassId,
}

/// ```text
/// class List<E> { E get(); }
/// class Util {}
/// ```
fn library() -> Library {
    let mut ts = GenericTs::new();
    let list = ClassBuilder::new("List").package("util").register(&mut ts);
    let (_, params) = ts.declare_generic(list, &["E"], span());
    let e = ts.arena_mut().type_var(params[0]);
    MethodBuilder::<GenericSignature>::new("get", e).register(&mut ts, list);
    let util = ClassBuilder::new("Util").package("util").register(&mut ts);
    Library { ts, list, util }
}

impl Library {
    fn var(&mut self, name: &str) -> (TypeVarId, TypeId) {
        let var = self.ts.declare_type_var(name, span());
        (var, self.ts.arena_mut().type_var(var))
    }

    fn list_of(&mut self, elem: TypeId) -> TypeId {
        self.ts.parameterize(span(), self.list, &[elem]).unwrap()
    }

    fn method(
        &mut self,
        name: &str,
        vars: &[TypeVarId],
        ret: TypeId,
        formals: &[TypeId],
        flags: Flags,
    ) -> MethodId {
        MethodBuilder::new(name, ret)
            .flags(Flags::PUBLIC | Flags::STATIC | flags)
            .formals(formals.iter().copied())
            .ext(GenericSignature::new(vars.iter().copied()))
            .register(&mut self.ts, self.util)
    }

    fn solver(&self, method: MethodId) -> InferenceSolver {
        InferenceSolver::for_method(self.ts.table().method(method))
    }
}

#[test]
fn single_argument_binds_the_variable() {
    // <T> T id(T x); id("a")
    let mut lib = library();
    let (t, t_ty) = lib.var("T");
    let id = lib.method("id", &[t], t_ty, &[t_ty], Flags::NONE);
    let string = lib.ts.string();

    let solution = lib.solver(id).infer(&mut lib.ts, &[string], None).unwrap();
    assert_eq!(solution.get(t), Some(string));
    assert_eq!(solution.display(&lib.ts), "{T -> String}");
}

#[test]
fn conflicting_equalities_have_no_solution() {
    // <T> void both(List<T> a, List<T> b); both(List<String>, List<Integer>)
    let mut lib = library();
    let (t, t_ty) = lib.var("T");
    let list_t = lib.list_of(t_ty);
    let both = lib.method("both", &[t], TypeId::VOID, &[list_t, list_t], Flags::NONE);
    let p = *lib.ts.prelude();
    let list_string = lib.list_of(p.string);
    let list_integer = lib.list_of(p.integer);

    let mut solver = lib.solver(both);
    assert_eq!(solver.infer(&mut lib.ts, &[list_string, list_integer], None), None);
    assert!(matches!(
        solver.failure(),
        Some(InferenceFailure::IncompatibleEquality { var, .. }) if var == "T"
    ));
}

#[test]
fn several_lower_bounds_join_at_their_lub() {
    // <T> T pick(T a, T b); pick(1, 2L)
    let mut lib = library();
    let (t, t_ty) = lib.var("T");
    let pick = lib.method("pick", &[t], t_ty, &[t_ty, t_ty], Flags::NONE);
    let p = *lib.ts.prelude();

    let solution = lib
        .solver(pick)
        .infer(&mut lib.ts, &[TypeId::INT, TypeId::LONG], None)
        .unwrap();
    assert_eq!(solution.get(t), Some(p.number));
}

#[test]
fn lub_outside_the_bound_fails() {
    // <T extends Number> T max(T a, T b); max(1, "x")
    let mut lib = library();
    let (t, t_ty) = lib.var("T");
    let number = lib.ts.prelude().number;
    lib.ts.set_upper_bound(t, number);
    let max = lib.method("max", &[t], t_ty, &[t_ty, t_ty], Flags::NONE);
    let string = lib.ts.string();

    let mut solver = lib.solver(max);
    assert_eq!(solver.infer(&mut lib.ts, &[TypeId::INT, string], None), None);
    assert!(matches!(
        solver.failure(),
        Some(InferenceFailure::BoundViolation { .. })
    ));
}

#[test]
fn varargs_spread_or_pass_an_array() {
    // <T> List<T> of(T... xs)
    let mut lib = library();
    let (t, t_ty) = lib.var("T");
    let list_t = lib.list_of(t_ty);
    let t_array = lib.ts.arena_mut().array(t_ty);
    let of = lib.method("of", &[t], list_t, &[t_array], Flags::VARARGS);
    let p = *lib.ts.prelude();

    let spread = lib
        .solver(of)
        .infer(&mut lib.ts, &[p.integer, p.integer, p.integer], None)
        .unwrap();
    assert_eq!(spread.get(t), Some(p.integer));

    let strings = lib.ts.arena_mut().array(p.string);
    let direct = lib.solver(of).infer(&mut lib.ts, &[strings], None).unwrap();
    assert_eq!(direct.get(t), Some(p.string));

    let empty = lib.solver(of).infer(&mut lib.ts, &[], None).unwrap();
    assert_eq!(empty.get(t), Some(p.object));
}

#[test]
fn expected_return_type_resolves_open_variables() {
    // <T> List<T> empty(); List<String> xs = empty();
    let mut lib = library();
    let (t, t_ty) = lib.var("T");
    let list_t = lib.list_of(t_ty);
    let empty = lib.method("empty", &[t], list_t, &[], Flags::NONE);
    let string = lib.ts.string();
    let list_string = lib.list_of(string);

    let with_context = lib
        .solver(empty)
        .infer(&mut lib.ts, &[], Some(list_string))
        .unwrap();
    assert_eq!(with_context.get(t), Some(string));

    let object = lib.ts.object();
    let without = lib.solver(empty).infer(&mut lib.ts, &[], None).unwrap();
    assert_eq!(without.get(t), Some(object));
}

#[test]
fn more_permissive_pass_prefers_the_context() {
    // <T> List<T> wrap(T x); List<Number> xs = wrap(1);
    let mut lib = library();
    let (t, t_ty) = lib.var("T");
    let list_t = lib.list_of(t_ty);
    let wrap = lib.method("wrap", &[t], list_t, &[t_ty], Flags::NONE);
    let p = *lib.ts.prelude();
    let list_number = lib.list_of(p.number);

    let strict = lib
        .solver(wrap)
        .infer(&mut lib.ts, &[TypeId::INT], Some(list_number))
        .unwrap();
    assert_eq!(strict.get(t), Some(p.integer));

    let options = InferenceOptions {
        more_permissive_inference: true,
    };
    let permissive = lib
        .solver(wrap)
        .with_options(options)
        .infer(&mut lib.ts, &[TypeId::INT], Some(list_number))
        .unwrap();
    assert_eq!(permissive.get(t), Some(p.number));
}

#[test]
fn super_wildcards_use_the_lower_bound() {
    // <T> void fill(List<? super T> dst, T v); fill(List<Number>, 1)
    let mut lib = library();
    let (t, t_ty) = lib.var("T");
    let super_t = lib.ts.arena_mut().wildcard(WildcardBound::Super(t_ty));
    let list_super_t = lib.list_of(super_t);
    let fill = lib.method("fill", &[t], TypeId::VOID, &[list_super_t, t_ty], Flags::NONE);
    let p = *lib.ts.prelude();
    let list_number = lib.list_of(p.number);

    let solution = lib
        .solver(fill)
        .infer(&mut lib.ts, &[list_number, TypeId::INT], None)
        .unwrap();
    assert_eq!(solution.get(t), Some(p.integer));
}

#[test]
fn wrong_argument_count_is_reported() {
    let mut lib = library();
    let (t, t_ty) = lib.var("T");
    let id = lib.method("id", &[t], t_ty, &[t_ty], Flags::NONE);

    let mut solver = lib.solver(id);
    assert_eq!(solver.infer(&mut lib.ts, &[], None), None);
    assert_eq!(
        solver.failure(),
        Some(&InferenceFailure::ArgumentCount {
            expected: 1,
            found: 0
        })
    );
}

#[test]
fn instantiated_methods_drop_bound_parameters() {
    let mut lib = library();
    let (t, t_ty) = lib.var("T");
    let id = lib.method("id", &[t], t_ty, &[t_ty], Flags::NONE);
    let string = lib.ts.string();
    let solution = lib.solver(id).infer(&mut lib.ts, &[string], None).unwrap();

    let subst = lib.ts.subst(solution.to_subst_map());
    let declared = lib.ts.table().method(id).clone();
    let instance = lib.ts.subst_method(subst, &declared);
    assert_eq!(instance.return_type, string);
    assert_eq!(instance.formal_types.as_slice(), &[string]);
    assert!(!instance.ext.is_generic());

    let list_string = lib.list_of(string);
    let get = lib.ts.methods_named(list_string, "get").pop().unwrap();
    assert_eq!(get.return_type, string);
    assert_eq!(lib.ts.display_type(list_string), "List<String>");
}

#[test]
fn own_class_with_other_arguments_keeps_them() {
    // class List<E> { <R> List<R> map(); }  List<String>.map(): List<R>
    let mut lib = library();
    let (r, r_ty) = lib.var("R");
    let list_r = lib.list_of(r_ty);
    MethodBuilder::new("map", list_r)
        .ext(GenericSignature::new([r]))
        .register(&mut lib.ts, lib.list);
    let string = lib.ts.string();
    let list_string = lib.list_of(string);

    let map = lib.ts.methods_named(list_string, "map").pop().unwrap();
    assert_eq!(lib.ts.display_type(map.return_type), "List<R>");
    assert_eq!(map.ext.type_params, vec![r]);
}

impl Library {
    /// `class <name><E> implements List<E>`
    fn list_impl(&mut self, name: &str) -> ClassId {
        let (e, e_ty) = self.var("E");
        let list_e = self.list_of(e_ty);
        let class = ClassBuilder::new(name)
            .package("util")
            .implements(list_e)
            .register(&mut self.ts);
        self.ts.make_generic(class, &[e], span());
        class
    }
}

#[test]
fn wildcard_arguments_contain_their_bounds() {
    let mut lib = library();
    let p = *lib.ts.prelude();
    let list_integer = lib.list_of(p.integer);
    let extends_number = lib.ts.arena_mut().wildcard(WildcardBound::Extends(p.number));
    let super_integer = lib.ts.arena_mut().wildcard(WildcardBound::Super(p.integer));
    let unbounded = lib.ts.arena_mut().wildcard(WildcardBound::Unbounded);
    let list_extends_number = lib.list_of(extends_number);
    let list_super_integer = lib.list_of(super_integer);
    let list_any = lib.list_of(unbounded);
    let list_number = lib.list_of(p.number);
    let list_string = lib.list_of(p.string);

    assert!(lib.ts.is_subtype(list_integer, list_extends_number));
    assert!(!lib.ts.is_subtype(list_string, list_extends_number));
    assert!(lib.ts.is_subtype(list_number, list_super_integer));
    assert!(!lib.ts.is_subtype(list_string, list_super_integer));
    assert!(lib.ts.is_subtype(list_string, list_any));
    assert!(lib.ts.is_subtype(list_extends_number, list_any));
    // Invariant without a wildcard.
    assert!(!lib.ts.is_subtype(list_integer, list_number));
}

#[test]
fn wildcard_bounds_accept_their_subclasses() {
    // <T extends List<? extends Number>> T pick(T a, T b);
    // pick(ArrayList<Integer>, LinkedList<Integer>)
    let mut lib = library();
    let array_list = lib.list_impl("ArrayList");
    let linked_list = lib.list_impl("LinkedList");
    let p = *lib.ts.prelude();
    let (t, t_ty) = lib.var("T");
    let extends_number = lib.ts.arena_mut().wildcard(WildcardBound::Extends(p.number));
    let bound = lib.list_of(extends_number);
    lib.ts.set_upper_bound(t, bound);
    let pick = lib.method("pick", &[t], t_ty, &[t_ty, t_ty], Flags::NONE);
    let array_of_integer = lib.ts.parameterize(span(), array_list, &[p.integer]).unwrap();
    let linked_of_integer = lib.ts.parameterize(span(), linked_list, &[p.integer]).unwrap();

    let mut solver = lib.solver(pick);
    let solution = solver
        .infer(&mut lib.ts, &[array_of_integer, linked_of_integer], None)
        .unwrap();
    assert_eq!(solver.failure(), None);
    assert_eq!(solution.display(&lib.ts), "{T -> List<Integer>}");
}
