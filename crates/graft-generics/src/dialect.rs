// dialect.rs
//
// The generics dialect: formals are type variables, actuals are types.

use graft_identity::{ClassId, PClassId, Span, TypeVarId};
use graft_types::{
    Dialect, MethodInstance, ParamTypeSystem, SemanticError, SubstCx, SubstMap, TypeId, TypeKind,
};

#[derive(Debug)]
pub struct GenericsDialect;

pub type GenericTs = ParamTypeSystem<GenericsDialect>;

/// Type parameters a generic method or constructor declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericSignature {
    pub type_params: Vec<TypeVarId>,
}

impl GenericSignature {
    pub fn new(type_params: impl IntoIterator<Item = TypeVarId>) -> Self {
        Self {
            type_params: type_params.into_iter().collect(),
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}

impl Dialect for GenericsDialect {
    type Formal = TypeVarId;
    type Actual = TypeId;
    type ProcExt = GenericSignature;
    type State = ();

    const NAME: &'static str = "generics";

    /// A view's type arguments already cover its class's formals.
    const OUTER_ENTRIES_WIN: bool = false;

    fn formal_as_actual(ts: &mut GenericTs, formal: TypeVarId) -> TypeId {
        ts.arena_mut().type_var(formal)
    }

    fn subst_actual(cx: &mut SubstCx<'_, Self>, actual: TypeId) -> TypeId {
        cx.subst_type(actual)
    }

    fn subst_leaf(cx: &mut SubstCx<'_, Self>, ty: TypeId) -> Option<TypeId> {
        let var = cx.ts().arena().unwrap_type_var(ty)?;
        cx.lookup(var)
    }

    fn actuals_equal(ts: &GenericTs, a: TypeId, b: TypeId) -> bool {
        ts.type_equals(a, b)
    }

    fn actual_contains(ts: &mut GenericTs, container: TypeId, contained: TypeId) -> bool {
        ts.contains_type_arg(container, contained)
    }

    fn actual_is_canonical(ts: &GenericTs, actual: TypeId) -> bool {
        ts.is_canonical(actual)
    }

    /// Type parameters bound by the map are instantiated and drop out of the
    /// signature.
    fn subst_method(
        cx: &mut SubstCx<'_, Self>,
        method: &MethodInstance<GenericSignature>,
    ) -> MethodInstance<GenericSignature> {
        let mut result = cx.base_subst_method(method);
        result.ext.type_params.retain(|&var| cx.lookup(var).is_none());
        result
    }

    fn display_formal(ts: &GenericTs, formal: TypeVarId) -> String {
        ts.resolve(ts.type_var(formal).name).to_string()
    }

    fn display_actual(ts: &GenericTs, actual: TypeId) -> String {
        ts.display_type(actual)
    }

    /// `Outer<A>.Inner<B>`; formals the map leaves unbound print as themselves.
    fn display_instance(ts: &GenericTs, class: ClassId, map: &SubstMap<Self>) -> String {
        let def = ts.class(class);
        let mut out = String::new();
        if let Some(outer) = def.outer.and_then(|o| ts.class_of(o))
            && !ts.formals_in_scope(outer).is_empty()
        {
            out.push_str(&Self::display_instance(ts, outer, map));
            out.push('.');
        }
        out.push_str(ts.resolve(def.name));
        if let Some(pclass) = def.pclass {
            let args: Vec<String> = ts
                .pclass(pclass)
                .formals
                .iter()
                .map(|formal| match map.get(formal) {
                    Some(&actual) => ts.display_type(actual),
                    None => Self::display_formal(ts, *formal),
                })
                .collect();
            out.push_str(&format!("<{}>", args.join(", ")));
        }
        out
    }
}

/// Generic-type operations on a generics-dialect type system.
pub trait GenericTypeSystemExt {
    /// Make `class` generic over `params`, in declaration order.
    fn make_generic(&mut self, class: ClassId, params: &[TypeVarId], span: Span) -> PClassId;

    /// Declare fresh type variables named `names` and make `class` generic
    /// over them.
    fn declare_generic(&mut self, class: ClassId, names: &[&str], span: Span) -> (PClassId, Vec<TypeVarId>);

    /// `class<args>`. A class without type parameters accepts no arguments.
    fn parameterize(&mut self, span: Span, class: ClassId, args: &[TypeId]) -> Result<TypeId, SemanticError>;

    /// Type arguments of `ty` for every formal in scope of its class, own
    /// formals first and then each enclosing class's. Unbound formals are
    /// reported as themselves.
    fn type_args(&mut self, ty: TypeId) -> Vec<(TypeVarId, TypeId)>;

    /// The supertype of `actual` (itself included) whose class is `base`.
    /// A raw use of a generic `base` has no generic supertype.
    fn find_generic_supertype(&mut self, base: ClassId, actual: TypeId) -> Option<TypeId>;

    /// Erasure: views lose their map, type variables become their bound.
    fn erasure(&mut self, ty: TypeId) -> TypeId;

    /// Wrapper class of a primitive type; other types unchanged.
    fn boxed(&self, ty: TypeId) -> TypeId;
}

impl GenericTypeSystemExt for GenericTs {
    fn make_generic(&mut self, class: ClassId, params: &[TypeVarId], span: Span) -> PClassId {
        let clazz = self.class(class).ty;
        let mut builder = self.mutable_pclass(clazz, span);
        for &param in params {
            builder.push_formal(param);
        }
        let pclass = builder.seal(self);
        tracing::debug!(class = %self.class(class).full_name, arity = params.len(), "generic class");
        pclass
    }

    fn declare_generic(&mut self, class: ClassId, names: &[&str], span: Span) -> (PClassId, Vec<TypeVarId>) {
        let vars: Vec<TypeVarId> = names
            .iter()
            .map(|name| self.declare_type_var(name, span))
            .collect();
        (self.make_generic(class, &vars, span), vars)
    }

    fn parameterize(&mut self, span: Span, class: ClassId, args: &[TypeId]) -> Result<TypeId, SemanticError> {
        match self.pclass_of(class) {
            Some(pclass) => self.instantiate(span, pclass, args),
            None if args.is_empty() => Ok(self.class(class).ty),
            None => Err(SemanticError::ArityMismatch {
                class: self.class(class).full_name.clone(),
                expected: 0,
                found: args.len(),
                span: span.into(),
            }),
        }
    }

    fn type_args(&mut self, ty: TypeId) -> Vec<(TypeVarId, TypeId)> {
        let Some(class) = self.class_of(ty) else {
            return Vec::new();
        };
        let view = self.view_of(ty);
        self.formals_in_scope(class)
            .into_iter()
            .map(|var| {
                let var_ty = self.arena_mut().type_var(var);
                let arg = match view {
                    Some(view) => self.subst_type(view.subst, var_ty),
                    None => var_ty,
                };
                (var, arg)
            })
            .collect()
    }

    fn find_generic_supertype(&mut self, base: ClassId, actual: TypeId) -> Option<TypeId> {
        let generic = !self.formals_in_scope(base).is_empty();
        self.ancestors(actual).into_iter().find(|&ancestor| {
            self.class_of(ancestor) == Some(base) && (!generic || self.view_of(ancestor).is_some())
        })
    }

    fn erasure(&mut self, ty: TypeId) -> TypeId {
        match self.arena().get(ty).clone() {
            TypeKind::Subst(_) => self.base_of(ty),
            TypeKind::TypeVar(var) => {
                let bound = self.upper_bound(var);
                self.erasure(bound)
            }
            TypeKind::Array(elem) => {
                let elem = self.erasure(elem);
                self.arena_mut().array(elem)
            }
            TypeKind::Intersection(members) => self.erasure(members[0]),
            _ => ty,
        }
    }

    fn boxed(&self, ty: TypeId) -> TypeId {
        self.arena()
            .unwrap_primitive(ty)
            .and_then(|prim| self.prelude().wrapper_of(prim))
            .unwrap_or(ty)
    }
}
