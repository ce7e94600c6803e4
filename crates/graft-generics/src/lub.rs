// lub.rs
//
// Least upper bound and greatest lower bound of reference types.
//
// lub(U1..Uk): collect every supertype of every Ui, keep the erased
// candidates (generic views reduced to their class) common to all of them,
// reduce those to the minimal ones, and for each minimal candidate compute
// the least containing invocation of the generic supertypes that erase to it. One candidate is the answer; several
// form an intersection.

use graft_types::{TypeId, WildcardBound};

use crate::dialect::{GenericTs, GenericTypeSystemExt};

/// Nesting of type-argument lubs before arguments degrade to `?`.
const MAX_LUB_DEPTH: u32 = 3;

pub fn lub(ts: &mut GenericTs, types: &[TypeId]) -> TypeId {
    Lub { ts, depth: 0 }.lub(types)
}

/// Minimal elements of `types`. `Object` when empty.
pub fn glb(ts: &mut GenericTs, types: &[TypeId]) -> TypeId {
    let mut unique: Vec<TypeId> = Vec::new();
    for &ty in types {
        if !unique.iter().any(|&u| ts.type_equals(u, ty)) {
            unique.push(ty);
        }
    }
    let mut minimal = Vec::new();
    for &candidate in &unique {
        let has_smaller = unique
            .iter()
            .any(|&other| other != candidate && ts.is_proper_subtype(other, candidate));
        if !has_smaller {
            minimal.push(candidate);
        }
    }
    match minimal.as_slice() {
        [] => ts.object(),
        [single] => *single,
        _ => ts.arena_mut().intersection(minimal),
    }
}

struct Lub<'a> {
    ts: &'a mut GenericTs,
    depth: u32,
}

impl Lub<'_> {
    fn lub(&mut self, types: &[TypeId]) -> TypeId {
        match types {
            [] => return self.ts.object(),
            [single] => return *single,
            _ => {}
        }

        let mut supertypes: Vec<TypeId> = Vec::new();
        let mut erased_common: Option<Vec<TypeId>> = None;
        for &ty in types {
            let ancestors = self.ts.ancestors(ty);
            let mut erased: Vec<TypeId> = Vec::new();
            for &ancestor in &ancestors {
                if !supertypes.iter().any(|&s| self.ts.type_equals(s, ancestor)) {
                    supertypes.push(ancestor);
                }
                let e = self.ts.base_of(ancestor);
                if !erased.contains(&e) {
                    erased.push(e);
                }
            }
            erased_common = Some(match erased_common {
                None => erased,
                Some(mut common) => {
                    common.retain(|e| erased.contains(e));
                    common
                }
            });
        }
        let erased_common = erased_common.unwrap_or_default();

        let mut minimal = Vec::new();
        for &e1 in &erased_common {
            let shadowed = erased_common
                .iter()
                .any(|&e2| e1 != e2 && self.erased_subtype(e2, e1));
            if !shadowed {
                minimal.push(e1);
            }
        }

        let mut candidates = Vec::new();
        for &m in &minimal {
            let mut invocations = Vec::new();
            for &s in &supertypes {
                if self.ts.base_of(s) == m {
                    invocations.push(s);
                }
            }
            candidates.push(self.least_containing_invocation(&invocations));
        }
        tracing::trace!(?types, ?candidates, "lub");
        match candidates.as_slice() {
            [] => self.ts.object(),
            [single] => *single,
            _ => self.ts.arena_mut().intersection(candidates),
        }
    }

    fn least_containing_invocation(&mut self, invocations: &[TypeId]) -> TypeId {
        let first = invocations[0];
        if invocations.len() == 1 || self.ts.view_of(first).is_none() {
            return first;
        }
        let mut result = first;
        for &next in &invocations[1..] {
            if self.ts.view_of(next).is_none() {
                return next;
            }
            let left = self.ts.type_args(result);
            let right = self.ts.type_args(next);
            let map = left
                .iter()
                .zip(&right)
                .map(|(&(var, a), &(_, b))| (var, self.least_containing_arg(a, b)))
                .collect();
            let base = self.ts.base_of(result);
            result = self.ts.subst_type_with(base, map);
        }
        result
    }

    fn least_containing_arg(&mut self, a: TypeId, b: TypeId) -> TypeId {
        let wa = self.ts.arena().unwrap_wildcard(a);
        let wb = self.ts.arena().unwrap_wildcard(b);
        let bound = match (wa, wb) {
            (None, None) if self.ts.type_equals(a, b) => return a,
            (None, None) => self.extends_lub(a, b),
            (Some(WildcardBound::Super(x)), Some(WildcardBound::Super(y))) => {
                WildcardBound::Super(glb(self.ts, &[x, y]))
            }
            (Some(WildcardBound::Super(lower)), Some(other))
            | (Some(other), Some(WildcardBound::Super(lower))) => {
                let upper = self.upper_of(other);
                if self.ts.type_equals(lower, upper) {
                    return lower;
                }
                WildcardBound::Unbounded
            }
            (Some(x), Some(y)) => {
                let (x, y) = (self.upper_of(x), self.upper_of(y));
                self.extends_lub(x, y)
            }
            (Some(WildcardBound::Super(lower)), None) | (None, Some(WildcardBound::Super(lower))) => {
                let plain = if wa.is_none() { a } else { b };
                WildcardBound::Super(glb(self.ts, &[lower, plain]))
            }
            (Some(w), None) | (None, Some(w)) => {
                let plain = if wa.is_none() { a } else { b };
                let upper = self.upper_of(w);
                self.extends_lub(upper, plain)
            }
        };
        self.ts.arena_mut().wildcard(bound)
    }

    fn extends_lub(&mut self, a: TypeId, b: TypeId) -> WildcardBound {
        if self.depth >= MAX_LUB_DEPTH {
            return WildcardBound::Unbounded;
        }
        self.depth += 1;
        let upper = self.lub(&[a, b]);
        self.depth -= 1;
        WildcardBound::Extends(upper)
    }

    /// Subtyping between erased classes, ignoring type arguments.
    fn erased_subtype(&mut self, sub: TypeId, sup: TypeId) -> bool {
        self.ts
            .ancestors(sub)
            .into_iter()
            .any(|ancestor| self.ts.base_of(ancestor) == sup)
    }

    fn upper_of(&self, bound: WildcardBound) -> TypeId {
        match bound {
            WildcardBound::Extends(upper) => upper,
            WildcardBound::Unbounded | WildcardBound::Super(_) => self.ts.object(),
        }
    }
}
