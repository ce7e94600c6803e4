// testing.rs
//
// A minimal dialect for exercising the core: formals are type variables,
// actuals are types.

use graft_identity::{ClassId, PClassId, Span, TypeVarId};

use crate::class_table::{ClassBuilder, FieldBuilder, MethodBuilder};
use crate::dialect::Dialect;
use crate::param::{ParamTypeSystem, SubstCx};
use crate::type_arena::TypeId;

#[derive(Debug)]
pub(crate) struct TestDialect;

pub(crate) type TestTs = ParamTypeSystem<TestDialect>;

impl Dialect for TestDialect {
    type Formal = TypeVarId;
    type Actual = TypeId;
    type ProcExt = ();
    type State = ();

    const NAME: &'static str = "test";

    fn formal_as_actual(ts: &mut TestTs, formal: TypeVarId) -> TypeId {
        ts.arena_mut().type_var(formal)
    }

    fn subst_actual(cx: &mut SubstCx<'_, Self>, actual: TypeId) -> TypeId {
        cx.subst_type(actual)
    }

    fn subst_leaf(cx: &mut SubstCx<'_, Self>, ty: TypeId) -> Option<TypeId> {
        let var = cx.ts().arena().unwrap_type_var(ty)?;
        cx.lookup(var)
    }

    fn actuals_equal(ts: &TestTs, a: TypeId, b: TypeId) -> bool {
        ts.type_equals(a, b)
    }

    fn actual_is_canonical(ts: &TestTs, actual: TypeId) -> bool {
        ts.is_canonical(actual)
    }

    fn display_formal(ts: &TestTs, formal: TypeVarId) -> String {
        ts.resolve(ts.type_var(formal).name).to_string()
    }

    fn display_actual(ts: &TestTs, actual: TypeId) -> String {
        ts.display_type(actual)
    }
}

/// `class Box<X> { X value; X get(); void put(X) }`
pub(crate) struct BoxFixture {
    pub class: ClassId,
    pub ty: TypeId,
    pub x: TypeVarId,
    pub pclass: PClassId,
}

pub(crate) fn declare_box(ts: &mut TestTs) -> BoxFixture {
    let class = ClassBuilder::new("Box").package("demo").register(ts);
    let ty = ts.class(class).ty;
    let x = ts.declare_type_var("X", Span::compiler_generated());
    let x_ty = ts.arena_mut().type_var(x);
    FieldBuilder::new("value", x_ty).register(ts, class);
    MethodBuilder::<()>::new("get", x_ty).register(ts, class);
    MethodBuilder::<()>::new("put", TypeId::VOID)
        .formals([x_ty])
        .register(ts, class);
    let pclass = ts
        .mutable_pclass(ty, Span::compiler_generated())
        .formal(x)
        .seal(ts);
    BoxFixture {
        class,
        ty,
        x,
        pclass,
    }
}
