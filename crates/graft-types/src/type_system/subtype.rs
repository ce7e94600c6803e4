// type_system/subtype.rs

use crate::dialect::Dialect;
use crate::param::ParamTypeSystem;
use crate::type_arena::{TypeId, TypeKind, WildcardBound};

impl<D: Dialect> ParamTypeSystem<D> {
    /// Reflexive subtyping. Type arguments of two views of the same class
    /// are compared by the dialect's containment, so wildcard arguments admit
    /// what their bounds admit.
    pub fn is_subtype(&mut self, sub: TypeId, sup: TypeId) -> bool {
        if self.type_equals(sub, sup) {
            return true;
        }
        let sub_kind = self.arena.get(sub).clone();
        let sup_kind = self.arena.get(sup).clone();
        match (sub_kind, sup_kind) {
            (_, TypeKind::Intersection(members)) => {
                members.iter().all(|&member| self.is_subtype(sub, member))
            }
            (_, TypeKind::Wildcard(bound)) => match bound {
                WildcardBound::Unbounded => self.arena.is_reference(sub),
                WildcardBound::Extends(upper) => self.is_subtype(sub, upper),
                WildcardBound::Super(lower) => self.is_subtype(lower, sub),
            },
            (TypeKind::Primitive(_), _) | (_, TypeKind::Primitive(_)) => false,
            (TypeKind::Unresolved(_), _) | (_, TypeKind::Unresolved(_)) => false,
            (TypeKind::Null, _) => true,
            (TypeKind::Array(x), TypeKind::Array(y)) => {
                if self.arena.is_reference(x) && self.arena.is_reference(y) {
                    self.is_subtype(x, y)
                } else {
                    x == y
                }
            }
            (TypeKind::Array(_), _) => sup == self.object(),
            (TypeKind::Intersection(members), _) => {
                members.iter().any(|&member| self.is_subtype(member, sup))
            }
            (TypeKind::TypeVar(var), _) => {
                let bound = self.upper_bound(var);
                self.is_subtype(bound, sup)
            }
            (TypeKind::Wildcard(WildcardBound::Extends(upper)), _) => self.is_subtype(upper, sup),
            (TypeKind::Wildcard(_), _) => sup == self.object(),
            (TypeKind::Class(_) | TypeKind::Subst(_), TypeKind::Class(_) | TypeKind::Subst(_)) => {
                if sup == self.object() {
                    return true;
                }
                self.ancestors(sub).into_iter().any(|ancestor| {
                    self.type_equals(ancestor, sup) || self.view_args_contained(ancestor, sup)
                })
            }
            _ => false,
        }
    }

    /// Both types are views of one base class and every argument of `sub`
    /// is contained in the matching argument of `sup`.
    fn view_args_contained(&mut self, sub: TypeId, sup: TypeId) -> bool {
        let (TypeKind::Subst(x), TypeKind::Subst(y)) = (self.arena.get(sub), self.arena.get(sup)) else {
            return false;
        };
        let (x, y) = (*self.subst_class(*x), *self.subst_class(*y));
        if x.base != y.base {
            return false;
        }
        let xm = self.substitution(x.subst).substitutions().clone();
        let ym = self.substitution(y.subst).substitutions().clone();
        xm.len() == ym.len()
            && xm.iter().zip(ym.iter()).all(|((xf, xa), (yf, ya))| {
                xf == yf && D::actual_contains(self, *ya, *xa)
            })
    }

    /// Whether type argument `contained` lies within `container`. A
    /// non-wildcard container holds only an equal type.
    pub fn contains_type_arg(&mut self, container: TypeId, contained: TypeId) -> bool {
        if self.type_equals(container, contained) {
            return true;
        }
        let &TypeKind::Wildcard(bound) = self.arena.get(container) else {
            return false;
        };
        let inner = match self.arena.get(contained) {
            TypeKind::Wildcard(inner) => Some(*inner),
            _ => None,
        };
        match (bound, inner) {
            (WildcardBound::Unbounded, None) => self.arena.is_reference(contained),
            (WildcardBound::Unbounded, Some(_)) => true,
            (WildcardBound::Extends(upper), None) => self.is_subtype(contained, upper),
            (WildcardBound::Extends(upper), Some(WildcardBound::Extends(x))) => self.is_subtype(x, upper),
            (WildcardBound::Extends(upper), Some(_)) => upper == self.object(),
            (WildcardBound::Super(lower), None) => self.is_subtype(lower, contained),
            (WildcardBound::Super(lower), Some(WildcardBound::Super(x))) => self.is_subtype(lower, x),
            (WildcardBound::Super(_), Some(_)) => false,
        }
    }

    /// Whether `ty` inherits from `ancestor` through at least one
    /// `extends`/`implements` step.
    pub fn descends_from(&mut self, ty: TypeId, ancestor: TypeId) -> bool {
        self.ancestors(ty)
            .into_iter()
            .skip(1)
            .any(|a| self.type_equals(a, ancestor))
    }

    /// Proper subtype: subtype but not equal.
    pub fn is_proper_subtype(&mut self, sub: TypeId, sup: TypeId) -> bool {
        !self.type_equals(sub, sup) && self.is_subtype(sub, sup)
    }
}
