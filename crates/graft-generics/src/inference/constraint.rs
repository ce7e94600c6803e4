// inference/constraint.rs
//
// Relational facts between an actual type and a formal type mentioning the
// variables being solved. Conversion and equality constraints simplify
// structurally until only bounds on the variables themselves remain.

use std::fmt;

use graft_types::{TypeId, TypeKind, WildcardBound};

use super::InferenceSolver;
use crate::dialect::{GenericTs, GenericTypeSystemExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// `A = F`
    Equal,
    /// `A << F`: A converts to F by method invocation conversion.
    SubConversion,
    /// `A >> F`: F converts to A.
    SuperConversion,
    /// `A <: F` with F a target variable.
    SubType,
    /// `A :> F` with F a target variable.
    SuperType,
}

impl ConstraintKind {
    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintKind::Equal => "=",
            ConstraintKind::SubConversion => "<<",
            ConstraintKind::SuperConversion => ">>",
            ConstraintKind::SubType => "<:",
            ConstraintKind::SuperType => ":>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub actual: TypeId,
    pub formal: TypeId,
}

/// Upper bound of a wildcard, `?` counting as `? extends Object`.
fn upper(ts: &GenericTs, bound: WildcardBound) -> Option<TypeId> {
    match bound {
        WildcardBound::Unbounded => Some(ts.object()),
        WildcardBound::Extends(upper) => Some(upper),
        WildcardBound::Super(_) => None,
    }
}

fn lower(bound: WildcardBound) -> Option<TypeId> {
    match bound {
        WildcardBound::Super(lower) => Some(lower),
        _ => None,
    }
}

impl Constraint {
    pub fn new(kind: ConstraintKind, actual: TypeId, formal: TypeId) -> Self {
        Self { kind, actual, formal }
    }

    pub fn equal(actual: TypeId, formal: TypeId) -> Self {
        Self::new(ConstraintKind::Equal, actual, formal)
    }

    pub fn sub_conversion(actual: TypeId, formal: TypeId) -> Self {
        Self::new(ConstraintKind::SubConversion, actual, formal)
    }

    pub fn super_conversion(actual: TypeId, formal: TypeId) -> Self {
        Self::new(ConstraintKind::SuperConversion, actual, formal)
    }

    /// Irreducible constraints are bucketed by the solver.
    pub fn can_simplify(&self, ts: &GenericTs, solver: &InferenceSolver) -> bool {
        match self.kind {
            ConstraintKind::Equal => !solver.is_target(ts, self.formal),
            ConstraintKind::SubConversion | ConstraintKind::SuperConversion => true,
            ConstraintKind::SubType | ConstraintKind::SuperType => false,
        }
    }

    /// Constraints implied by this one. Facts that say nothing about the
    /// target variables simplify to nothing.
    pub fn simplify(&self, ts: &mut GenericTs, solver: &InferenceSolver) -> Vec<Constraint> {
        match self.kind {
            ConstraintKind::Equal => self.simplify_equal(ts),
            ConstraintKind::SubConversion => self.simplify_sub_conversion(ts, solver),
            ConstraintKind::SuperConversion => self.simplify_super_conversion(ts, solver),
            ConstraintKind::SubType | ConstraintKind::SuperType => vec![*self],
        }
    }

    pub fn display(&self, ts: &GenericTs) -> String {
        format!(
            "{} {} {}",
            ts.display_type(self.actual),
            self.kind.symbol(),
            ts.display_type(self.formal)
        )
    }

    fn simplify_sub_conversion(&self, ts: &mut GenericTs, solver: &InferenceSolver) -> Vec<Constraint> {
        let (actual, formal) = (self.actual, self.formal);
        if ts.arena().unwrap_primitive(actual).is_some() {
            let boxed = ts.boxed(actual);
            if boxed == actual {
                return Vec::new();
            }
            return vec![Constraint::sub_conversion(boxed, formal)];
        }
        if actual.is_null() {
            return Vec::new();
        }
        if solver.is_target(ts, formal) {
            return vec![Constraint::new(ConstraintKind::SubType, actual, formal)];
        }
        if let Some(formal_elem) = ts.arena().unwrap_array(formal) {
            return match array_element(ts, actual) {
                Some(actual_elem) => vec![Constraint::sub_conversion(actual_elem, formal_elem)],
                None => Vec::new(),
            };
        }
        let Some(class) = ts.view_of(formal).and_then(|view| ts.class_of(view.base)) else {
            return Vec::new();
        };
        let Some(supertype) = ts.find_generic_supertype(class, actual) else {
            return Vec::new();
        };

        let mut result = Vec::new();
        for (actual_arg, formal_arg) in arg_pairs(ts, supertype, formal) {
            let formal_wc = ts.arena().unwrap_wildcard(formal_arg);
            let actual_wc = ts.arena().unwrap_wildcard(actual_arg);
            match formal_wc {
                None => result.push(Constraint::equal(actual_arg, formal_arg)),
                Some(fw) => {
                    if let Some(formal_upper) = upper(ts, fw) {
                        match actual_wc {
                            None => result.push(Constraint::sub_conversion(actual_arg, formal_upper)),
                            Some(aw) => {
                                if let Some(actual_upper) = upper(ts, aw) {
                                    result.push(Constraint::sub_conversion(actual_upper, formal_upper));
                                }
                            }
                        }
                    } else if let Some(formal_lower) = lower(fw) {
                        match actual_wc {
                            None => result.push(Constraint::super_conversion(actual_arg, formal_lower)),
                            Some(aw) => {
                                if let Some(actual_lower) = lower(aw) {
                                    result.push(Constraint::super_conversion(actual_lower, formal_lower));
                                }
                            }
                        }
                    }
                }
            }
        }
        result
    }

    fn simplify_equal(&self, ts: &mut GenericTs) -> Vec<Constraint> {
        let (actual, formal) = (self.actual, self.formal);
        if actual.is_null() {
            return Vec::new();
        }
        if let Some(formal_elem) = ts.arena().unwrap_array(formal) {
            return match ts.arena().unwrap_array(actual) {
                Some(actual_elem) if ts.arena().is_reference(actual_elem) => {
                    vec![Constraint::equal(actual_elem, formal_elem)]
                }
                _ => Vec::new(),
            };
        }
        if !same_generic_class(ts, actual, formal) {
            return Vec::new();
        }

        let mut result = Vec::new();
        for (actual_arg, formal_arg) in arg_pairs(ts, actual, formal) {
            let actual_wc = ts.arena().unwrap_wildcard(actual_arg);
            let formal_wc = ts.arena().unwrap_wildcard(formal_arg);
            match (actual_wc, formal_wc) {
                (None, None) => result.push(Constraint::equal(actual_arg, formal_arg)),
                (Some(aw), Some(fw)) => {
                    if let (Some(a), Some(f)) = (lower(aw), lower(fw)) {
                        result.push(Constraint::equal(a, f));
                    } else if let (Some(a), Some(f)) = (upper(ts, aw), upper(ts, fw)) {
                        result.push(Constraint::equal(a, f));
                    }
                }
                _ => {}
            }
        }
        result
    }

    fn simplify_super_conversion(&self, ts: &mut GenericTs, solver: &InferenceSolver) -> Vec<Constraint> {
        let (actual, formal) = (self.actual, self.formal);
        if actual.is_null() {
            return Vec::new();
        }
        if solver.is_target(ts, formal) {
            return vec![Constraint::new(ConstraintKind::SuperType, actual, formal)];
        }
        if let Some(formal_elem) = ts.arena().unwrap_array(formal) {
            return match ts.arena().unwrap_array(actual) {
                Some(actual_elem) if ts.arena().is_reference(actual_elem) => {
                    vec![Constraint::super_conversion(actual_elem, formal_elem)]
                }
                _ => Vec::new(),
            };
        }
        if ts.view_of(actual).is_none() || ts.view_of(formal).is_none() {
            return Vec::new();
        }
        if !same_generic_class(ts, actual, formal) {
            let Some(actual_class) = ts.class_of(actual) else {
                return Vec::new();
            };
            return match ts.find_generic_supertype(actual_class, formal) {
                Some(supertype) => vec![Constraint::super_conversion(actual, supertype)],
                None => Vec::new(),
            };
        }

        let mut result = Vec::new();
        for (actual_arg, formal_arg) in arg_pairs(ts, actual, formal) {
            let actual_wc = ts.arena().unwrap_wildcard(actual_arg);
            let formal_wc = ts.arena().unwrap_wildcard(formal_arg);
            match (actual_wc, formal_wc) {
                (None, None) => result.push(Constraint::equal(actual_arg, formal_arg)),
                (Some(aw), None) => {
                    if let Some(a) = lower(aw) {
                        result.push(Constraint::sub_conversion(a, formal_arg));
                    } else if let Some(a) = upper(ts, aw) {
                        result.push(Constraint::super_conversion(a, formal_arg));
                    }
                }
                (Some(aw), Some(fw)) => {
                    if let (Some(a), Some(f)) = (lower(aw), lower(fw)) {
                        result.push(Constraint::sub_conversion(a, f));
                    } else if let (Some(a), Some(f)) = (upper(ts, aw), upper(ts, fw)) {
                        result.push(Constraint::super_conversion(a, f));
                    }
                }
                (None, Some(_)) => {}
            }
        }
        result
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Element type of a reference array, looking through a type variable
/// bounded by one.
fn array_element(ts: &GenericTs, ty: TypeId) -> Option<TypeId> {
    let elem = match ts.arena().get(ty) {
        TypeKind::Array(elem) => *elem,
        TypeKind::TypeVar(var) => ts.arena().unwrap_array(ts.upper_bound(*var))?,
        _ => return None,
    };
    ts.arena().is_reference(elem).then_some(elem)
}

fn same_generic_class(ts: &GenericTs, a: TypeId, b: TypeId) -> bool {
    match (ts.view_of(a), ts.view_of(b)) {
        (Some(x), Some(y)) => x.base == y.base,
        _ => false,
    }
}

/// Type arguments of two views of one class, paired by formal.
fn arg_pairs(ts: &mut GenericTs, actual: TypeId, formal: TypeId) -> Vec<(TypeId, TypeId)> {
    let actual_args = ts.type_args(actual);
    let formal_args = ts.type_args(formal);
    actual_args
        .into_iter()
        .zip(formal_args)
        .map(|((_, a), (_, f))| (a, f))
        .collect()
}
