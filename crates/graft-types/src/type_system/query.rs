// type_system/query.rs

use graft_identity::ClassId;

use crate::dialect::Dialect;
use crate::param::ParamTypeSystem;
use crate::type_arena::{TypeId, TypeKind, WildcardBound};

impl<D: Dialect> ParamTypeSystem<D> {
    pub fn object(&self) -> TypeId {
        self.prelude.object
    }

    pub fn string(&self) -> TypeId {
        self.prelude.string
    }

    pub fn is_prelude_class(&self, class: ClassId) -> bool {
        self.prelude.is_prelude_class(class)
    }

    /// Structural equality. Substituted views are equal when they share a
    /// base and their maps bind the same formals to equal actuals.
    pub fn type_equals(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        match (self.arena.get(a), self.arena.get(b)) {
            (TypeKind::Subst(x), TypeKind::Subst(y)) => {
                let (x, y) = (self.subst_class(*x), self.subst_class(*y));
                if x.base != y.base {
                    return false;
                }
                let xm = self.substitution(x.subst).substitutions();
                let ym = self.substitution(y.subst).substitutions();
                xm.len() == ym.len()
                    && xm
                        .iter()
                        .zip(ym.iter())
                        .all(|((xf, xa), (yf, ya))| xf == yf && D::actuals_equal(self, *xa, *ya))
            }
            (TypeKind::Array(x), TypeKind::Array(y)) => self.type_equals(*x, *y),
            (TypeKind::Wildcard(x), TypeKind::Wildcard(y)) => match (x, y) {
                (WildcardBound::Unbounded, WildcardBound::Unbounded) => true,
                (WildcardBound::Extends(x), WildcardBound::Extends(y))
                | (WildcardBound::Super(x), WildcardBound::Super(y)) => self.type_equals(*x, *y),
                _ => false,
            },
            (TypeKind::Intersection(xs), TypeKind::Intersection(ys)) => {
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .all(|&x| ys.iter().any(|&y| self.type_equals(x, y)))
            }
            _ => false,
        }
    }

    /// A type is canonical once every name in it is resolved and every
    /// actual it is instantiated with is canonical.
    pub fn is_canonical(&self, ty: TypeId) -> bool {
        match self.arena.get(ty) {
            TypeKind::Unresolved(_) => false,
            TypeKind::Array(elem) => self.is_canonical(*elem),
            TypeKind::Subst(view) => {
                let subst = self.subst_class(*view).subst;
                self.substitution(subst)
                    .entries()
                    .all(|(_, actual)| D::actual_is_canonical(self, actual))
            }
            TypeKind::Wildcard(WildcardBound::Extends(t) | WildcardBound::Super(t)) => {
                self.is_canonical(*t)
            }
            TypeKind::Intersection(members) => members.iter().all(|&m| self.is_canonical(m)),
            _ => true,
        }
    }

    /// `ty` and every supertype reachable from it, nearest first, each once.
    /// Reference types always end with `Object`.
    pub fn ancestors(&mut self, ty: TypeId) -> Vec<TypeId> {
        let mut result: Vec<TypeId> = Vec::new();
        let mut queue = std::collections::VecDeque::from([ty]);
        while let Some(current) = queue.pop_front() {
            if result.iter().any(|&seen| self.type_equals(seen, current)) {
                continue;
            }
            result.push(current);
            match self.arena.get(current).clone() {
                TypeKind::Class(_) | TypeKind::Subst(_) => {
                    if let Some(super_type) = self.super_type(current) {
                        queue.push_back(super_type);
                    }
                    queue.extend(self.interfaces(current));
                }
                TypeKind::TypeVar(var) => queue.push_back(self.upper_bound(var)),
                TypeKind::Intersection(members) => queue.extend(members),
                _ => {}
            }
        }
        let object = self.object();
        if self.arena.is_reference(ty)
            && !ty.is_null()
            && !result.contains(&object)
        {
            result.push(object);
        }
        result
    }
}
