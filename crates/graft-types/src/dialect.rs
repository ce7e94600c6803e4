// dialect.rs
//
// Capability table through which a language extension plugs into the
// parametric core.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use graft_identity::ClassId;

use crate::class_table::{ConstructorInstance, FieldInstance, MethodInstance};
use crate::param::{ParamTypeSystem, SubstCx};
use crate::type_arena::TypeId;

/// Formal-to-actual mapping of a substitution. Ordered, so equal maps compare
/// and hash equal regardless of insertion order.
pub type SubstMap<D> = BTreeMap<<D as Dialect>::Formal, <D as Dialect>::Actual>;

/// A language extension of the base type system.
///
/// The dialect fixes what a formal parameter is, what may be bound to it, and
/// which extra data procedures carry. Every hook has a base behaviour; an
/// extension that overrides a member hook should call the `base_*` helper on
/// [`SubstCx`] first and then layer its own fields on the result.
pub trait Dialect: Sized + 'static {
    type Formal: Copy + Eq + Ord + Hash + Debug;
    type Actual: Copy + Eq + Ord + Hash + Debug;
    /// Extra signature data carried by methods and constructors.
    type ProcExt: Clone + Debug + Default;
    /// Dialect-owned tables living alongside the type system.
    type State: Debug + Default;

    const NAME: &'static str;

    /// When composing a view's map with an outer map, whether the outer
    /// map's entries replace those the view already binds. When `false` the
    /// outer map only fills formals the view leaves open.
    const OUTER_ENTRIES_WIN: bool = true;

    /// The actual that stands for `formal` itself (identity instantiation).
    fn formal_as_actual(ts: &mut ParamTypeSystem<Self>, formal: Self::Formal) -> Self::Actual;

    /// Re-substitute an actual stored in an earlier map when composing it
    /// with the map of `cx`.
    fn subst_actual(cx: &mut SubstCx<'_, Self>, actual: Self::Actual) -> Self::Actual;

    /// Substitution of types the base system treats as leaves (type
    /// variables, primitives). `None` leaves the type unchanged.
    fn subst_leaf(cx: &mut SubstCx<'_, Self>, ty: TypeId) -> Option<TypeId> {
        let _ = (cx, ty);
        None
    }

    /// Whether `class` may be viewed through a substitution at all.
    fn wraps_class(ts: &ParamTypeSystem<Self>, class: ClassId) -> bool {
        let _ = (ts, class);
        true
    }

    fn actuals_equal(ts: &ParamTypeSystem<Self>, a: Self::Actual, b: Self::Actual) -> bool {
        let _ = ts;
        a == b
    }

    /// Whether an argument `contained` of one view is admitted where another
    /// view of the same class has `container`. Equality by default.
    fn actual_contains(ts: &mut ParamTypeSystem<Self>, container: Self::Actual, contained: Self::Actual) -> bool {
        Self::actuals_equal(ts, container, contained)
    }

    fn actual_is_canonical(ts: &ParamTypeSystem<Self>, actual: Self::Actual) -> bool {
        let _ = (ts, actual);
        true
    }

    fn subst_field(cx: &mut SubstCx<'_, Self>, field: &FieldInstance) -> FieldInstance {
        cx.base_subst_field(field)
    }

    fn subst_method(
        cx: &mut SubstCx<'_, Self>,
        method: &MethodInstance<Self::ProcExt>,
    ) -> MethodInstance<Self::ProcExt> {
        cx.base_subst_method(method)
    }

    fn subst_constructor(
        cx: &mut SubstCx<'_, Self>,
        ctor: &ConstructorInstance<Self::ProcExt>,
    ) -> ConstructorInstance<Self::ProcExt> {
        cx.base_subst_constructor(ctor)
    }

    fn display_formal(ts: &ParamTypeSystem<Self>, formal: Self::Formal) -> String;

    fn display_actual(ts: &ParamTypeSystem<Self>, actual: Self::Actual) -> String;

    /// Display of `class` viewed through `map`.
    fn display_instance(ts: &ParamTypeSystem<Self>, class: ClassId, map: &SubstMap<Self>) -> String {
        let entries: Vec<String> = map
            .iter()
            .map(|(f, a)| {
                format!(
                    "{} -> {}",
                    Self::display_formal(ts, *f),
                    Self::display_actual(ts, *a)
                )
            })
            .collect();
        format!("{}{{{}}}", ts.resolve(ts.class(class).name), entries.join(", "))
    }
}
