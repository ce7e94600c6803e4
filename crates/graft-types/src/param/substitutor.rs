// param/substitutor.rs
//
// Applying a substitution to types and members.

use std::rc::Rc;

use graft_identity::{ClassId, SubstClassId, SubstId};

use super::{ParamTypeSystem, SubstClassData};
use crate::class_table::{ConstructorInstance, FieldInstance, MethodInstance};
use crate::dialect::{Dialect, SubstMap};
use crate::type_arena::{TypeId, TypeIdVec, TypeKind, WildcardBound};

/// A substitution being applied. Dialect hooks receive this so they can
/// recurse through the same caches.
pub struct SubstCx<'a, D: Dialect> {
    ts: &'a mut ParamTypeSystem<D>,
    subst: SubstId,
}

impl<'a, D: Dialect> SubstCx<'a, D> {
    pub(crate) fn new(ts: &'a mut ParamTypeSystem<D>, subst: SubstId) -> Self {
        Self { ts, subst }
    }

    pub fn ts(&self) -> &ParamTypeSystem<D> {
        self.ts
    }

    pub fn ts_mut(&mut self) -> &mut ParamTypeSystem<D> {
        self.ts
    }

    pub fn subst_id(&self) -> SubstId {
        self.subst
    }

    pub fn map(&self) -> &SubstMap<D> {
        self.ts.substitution(self.subst).substitutions()
    }

    pub fn lookup(&self, formal: D::Formal) -> Option<D::Actual> {
        self.ts.substitution(self.subst).get(formal)
    }

    // ========================================================================
    // Types
    // ========================================================================

    pub fn subst_type(&mut self, ty: TypeId) -> TypeId {
        if let Some(&cached) = self.ts.substitution(self.subst).types.get(&ty) {
            return cached;
        }
        let result = self.uncached_subst_type(ty);
        // Stored even when unchanged so repeated queries stay O(1).
        self.ts
            .substitution_mut(self.subst)
            .types
            .insert(ty, result);
        tracing::trace!(subst = ?self.subst, ?ty, ?result, "subst type");
        result
    }

    pub fn subst_type_list(&mut self, types: &[TypeId]) -> TypeIdVec {
        types.iter().map(|&ty| self.subst_type(ty)).collect()
    }

    fn uncached_subst_type(&mut self, ty: TypeId) -> TypeId {
        match self.ts.arena.get(ty).clone() {
            TypeKind::Array(elem) => {
                let new_elem = self.subst_type(elem);
                if new_elem == elem {
                    ty
                } else {
                    self.ts.arena.array(new_elem)
                }
            }
            TypeKind::Subst(view) => self.resubst_view(ty, view),
            TypeKind::Class(class) => self.wrap_class(ty, class),
            TypeKind::Wildcard(bound) => {
                let bound = match bound {
                    WildcardBound::Unbounded => WildcardBound::Unbounded,
                    WildcardBound::Extends(upper) => WildcardBound::Extends(self.subst_type(upper)),
                    WildcardBound::Super(lower) => WildcardBound::Super(self.subst_type(lower)),
                };
                self.ts.arena.wildcard(bound)
            }
            TypeKind::Intersection(members) => {
                let new_members = self.subst_type_list(&members);
                if new_members == members {
                    ty
                } else {
                    self.ts.arena.intersection(new_members)
                }
            }
            TypeKind::Primitive(_)
            | TypeKind::Null
            | TypeKind::TypeVar(_)
            | TypeKind::Unresolved(_) => D::subst_leaf(self, ty).unwrap_or(ty),
        }
    }

    /// Entries of this map restricted to the formals visible in `class`.
    fn restrict(&self, map: &SubstMap<D>, class: ClassId) -> SubstMap<D> {
        let scope = self.ts.formals_in_scope(class);
        map.iter()
            .filter(|(formal, _)| scope.contains(formal))
            .map(|(f, a)| (*f, *a))
            .collect()
    }

    /// View `ty` (the plain class `class`) through this substitution.
    fn wrap_class(&mut self, ty: TypeId, class: ClassId) -> TypeId {
        if !D::wraps_class(self.ts, class) {
            return ty;
        }
        let restricted = self.restrict(self.map(), class);
        if restricted.is_empty() {
            // No formal of this map is in scope.
            return ty;
        }
        if restricted != *self.map() {
            let target = self.ts.derive_subst(self.subst, restricted);
            return SubstCx::new(self.ts, target).subst_type(ty);
        }

        let view = SubstClassId::new(self.ts.subst_classes.len() as u32);
        self.ts.subst_classes.push(SubstClassData {
            base: ty,
            subst: self.subst,
        });
        let wrapped = self.ts.arena.subst_class(view);
        tracing::trace!(
            class = %self.ts.table.class(class).full_name,
            subst = ?self.subst,
            ?wrapped,
            "new substituted class"
        );
        wrapped
    }

    /// Substitute an already-substituted view by composing maps and
    /// re-substituting the original base.
    fn resubst_view(&mut self, ty: TypeId, view: SubstClassId) -> TypeId {
        let SubstClassData { base, subst: inner } = *self.ts.subst_class(view);
        let Some(class) = self.ts.class_of(base) else {
            return ty;
        };

        let composed = self.compose(inner);
        let restricted = self.restrict(&composed, class);
        if restricted == *self.ts.substitution(inner).substitutions() {
            return ty;
        }
        let target = self.ts.derive_subst(self.subst, restricted);
        SubstCx::new(self.ts, target).subst_type(base)
    }

    /// `inner`'s entries with actuals re-substituted by this map, overlaid
    /// with this map's entries. See [`Dialect::OUTER_ENTRIES_WIN`] for
    /// conflicts.
    fn compose(&mut self, inner: SubstId) -> SubstMap<D> {
        let inner_map = self.ts.substitution(inner).substitutions().clone();
        let mut composed = SubstMap::<D>::new();
        for (formal, actual) in inner_map {
            let actual = D::subst_actual(self, actual);
            composed.insert(formal, actual);
        }
        for (&formal, &actual) in self.map() {
            if D::OUTER_ENTRIES_WIN || !composed.contains_key(&formal) {
                composed.insert(formal, actual);
            }
        }
        composed
    }

    // ========================================================================
    // Members
    // ========================================================================

    pub fn subst_field(&mut self, field: &FieldInstance) -> Rc<FieldInstance> {
        let key = (field.id, field.container);
        if let Some(cached) = self.ts.substitution(self.subst).fields.get(&key) {
            return cached.clone();
        }
        let result = Rc::new(D::subst_field(self, field));
        self.ts
            .substitution_mut(self.subst)
            .fields
            .insert(key, result.clone());
        result
    }

    pub fn subst_method(&mut self, method: &MethodInstance<D::ProcExt>) -> Rc<MethodInstance<D::ProcExt>> {
        let key = (method.id, method.container);
        if let Some(cached) = self.ts.substitution(self.subst).methods.get(&key) {
            return cached.clone();
        }
        let result = Rc::new(D::subst_method(self, method));
        self.ts
            .substitution_mut(self.subst)
            .methods
            .insert(key, result.clone());
        result
    }

    pub fn subst_constructor(
        &mut self,
        ctor: &ConstructorInstance<D::ProcExt>,
    ) -> Rc<ConstructorInstance<D::ProcExt>> {
        let key = (ctor.id, ctor.container);
        if let Some(cached) = self.ts.substitution(self.subst).constructors.get(&key) {
            return cached.clone();
        }
        let result = Rc::new(D::subst_constructor(self, ctor));
        self.ts
            .substitution_mut(self.subst)
            .constructors
            .insert(key, result.clone());
        result
    }

    /// Base field substitution: container and declared type.
    pub fn base_subst_field(&mut self, field: &FieldInstance) -> FieldInstance {
        FieldInstance {
            container: self.subst_type(field.container),
            ty: self.subst_type(field.ty),
            ..field.clone()
        }
    }

    /// Base method substitution: container, return, formal and throw types.
    /// Extension data is copied unchanged.
    pub fn base_subst_method(&mut self, method: &MethodInstance<D::ProcExt>) -> MethodInstance<D::ProcExt> {
        MethodInstance {
            container: self.subst_type(method.container),
            return_type: self.subst_type(method.return_type),
            formal_types: self.subst_type_list(&method.formal_types),
            throw_types: self.subst_type_list(&method.throw_types),
            ..method.clone()
        }
    }

    pub fn base_subst_constructor(
        &mut self,
        ctor: &ConstructorInstance<D::ProcExt>,
    ) -> ConstructorInstance<D::ProcExt> {
        ConstructorInstance {
            container: self.subst_type(ctor.container),
            formal_types: self.subst_type_list(&ctor.formal_types),
            throw_types: self.subst_type_list(&ctor.throw_types),
            ..ctor.clone()
        }
    }
}
