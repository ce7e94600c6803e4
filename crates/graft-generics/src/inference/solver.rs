// inference/solver.rs

use std::collections::VecDeque;

use graft_identity::TypeVarId;
use graft_types::{ConstructorInstance, MethodInstance, SubstMap, TypeId, TypeIdVec};
use thiserror::Error;

use super::constraint::{Constraint, ConstraintKind};
use crate::dialect::{GenericSignature, GenericTs, GenericsDialect};
use crate::lub::{glb, lub};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferenceOptions {
    /// Re-solve with the expected return type even when the argument types
    /// already determine every variable. Matches what mainstream compilers
    /// do rather than the documented algorithm.
    pub more_permissive_inference: bool,
}

/// Why the last inference produced no solution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceFailure {
    #[error("type variable {var} is required to equal both {first} and {second}")]
    IncompatibleEquality {
        var: String,
        first: String,
        second: String,
    },

    #[error("inferred {found} for {var}, which is outside its bound {bound}")]
    BoundViolation {
        var: String,
        found: String,
        bound: String,
    },

    #[error("expected {expected} argument(s), found {found}")]
    ArgumentCount { expected: usize, found: usize },
}

/// Inferred type arguments, one per variable in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pairs: Vec<(TypeVarId, TypeId)>,
}

impl Solution {
    pub fn get(&self, var: TypeVarId) -> Option<TypeId> {
        self.pairs.iter().find(|(v, _)| *v == var).map(|(_, t)| *t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeVarId, TypeId)> + '_ {
        self.pairs.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn types(&self) -> TypeIdVec {
        self.pairs.iter().map(|(_, t)| *t).collect()
    }

    pub fn to_subst_map(&self) -> SubstMap<GenericsDialect> {
        self.pairs.iter().copied().collect()
    }

    pub fn display(&self, ts: &GenericTs) -> String {
        let entries: Vec<String> = self
            .pairs
            .iter()
            .map(|&(var, ty)| {
                format!("{} -> {}", ts.resolve(ts.type_var(var).name), ts.display_type(ty))
            })
            .collect();
        format!("{{{}}}", entries.join(", "))
    }
}

/// Per-variable results of one solving pass; `None` is unsolved.
type Partial = Vec<Option<TypeId>>;

/// Solves the type parameters of one procedure for one call.
#[derive(Debug, Clone)]
pub struct InferenceSolver {
    type_vars: Vec<TypeVarId>,
    formal_types: TypeIdVec,
    return_type: Option<TypeId>,
    varargs: bool,
    options: InferenceOptions,
    failure: Option<InferenceFailure>,
}

impl InferenceSolver {
    pub fn new(
        type_vars: Vec<TypeVarId>,
        formal_types: impl IntoIterator<Item = TypeId>,
        return_type: Option<TypeId>,
        varargs: bool,
    ) -> Self {
        Self {
            type_vars,
            formal_types: formal_types.into_iter().collect(),
            return_type,
            varargs,
            options: InferenceOptions::default(),
            failure: None,
        }
    }

    pub fn for_method(method: &MethodInstance<GenericSignature>) -> Self {
        Self::new(
            method.ext.type_params.clone(),
            method.formal_types.iter().copied(),
            Some(method.return_type),
            method.flags.is_varargs(),
        )
    }

    /// Constructors have no return type to draw on.
    pub fn for_constructor(ctor: &ConstructorInstance<GenericSignature>) -> Self {
        Self::new(
            ctor.ext.type_params.clone(),
            ctor.formal_types.iter().copied(),
            None,
            ctor.flags.is_varargs(),
        )
    }

    pub fn with_options(mut self, options: InferenceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn type_vars(&self) -> &[TypeVarId] {
        &self.type_vars
    }

    pub fn is_target(&self, ts: &GenericTs, ty: TypeId) -> bool {
        ts.arena()
            .unwrap_type_var(ty)
            .is_some_and(|var| self.type_vars.contains(&var))
    }

    /// Reason the last call to [`infer`](Self::infer) returned `None`.
    pub fn failure(&self) -> Option<&InferenceFailure> {
        self.failure.as_ref()
    }

    /// One conversion per argument. A variadic trailing parameter takes an
    /// array argument as-is when the counts match, otherwise each remaining
    /// argument converts to its element type.
    pub fn initial_constraints(&self, ts: &GenericTs, actuals: &[TypeId]) -> Vec<Constraint> {
        let n = self.formal_types.len();
        let mut constraints = Vec::new();
        let Some(last) = n.checked_sub(1) else {
            return constraints;
        };
        for (&actual, &formal) in actuals.iter().zip(&self.formal_types[..last]) {
            constraints.push(Constraint::sub_conversion(actual, formal));
        }
        let last_formal = self.formal_types[last];
        if self.varargs {
            let last_is_array = actuals.len() == n && ts.arena().is_array(actuals[last]);
            match ts.arena().unwrap_array(last_formal) {
                Some(elem) if !last_is_array => {
                    for &actual in actuals.iter().skip(last) {
                        constraints.push(Constraint::sub_conversion(actual, elem));
                    }
                }
                _ => {
                    if let Some(&actual) = actuals.get(last) {
                        constraints.push(Constraint::sub_conversion(actual, last_formal));
                    }
                }
            }
        } else if actuals.len() == n {
            constraints.push(Constraint::sub_conversion(actuals[last], last_formal));
        }
        constraints
    }

    /// Infer type arguments for a call with argument types `actuals` in a
    /// context expecting `expected` (if known). Variables no constraint
    /// determines default to `Object`.
    #[tracing::instrument(skip(self, ts, actuals), fields(vars = self.type_vars.len()))]
    pub fn infer(&mut self, ts: &mut GenericTs, actuals: &[TypeId], expected: Option<TypeId>) -> Option<Solution> {
        self.failure = None;
        let n = self.formal_types.len();
        let count_ok = if self.varargs {
            actuals.len() + 1 >= n
        } else {
            actuals.len() == n
        };
        if !count_ok {
            self.failure = Some(InferenceFailure::ArgumentCount {
                expected: n,
                found: actuals.len(),
            });
            return None;
        }

        let initial = self.initial_constraints(ts, actuals);
        let mut solution = self.solve(ts, initial.clone(), true)?;

        if solution.iter().any(Option::is_none) {
            self.resolve_remaining(ts, &initial, &mut solution, expected);
        } else if self.options.more_permissive_inference
            && let Some(expected) = expected
            && let Some(return_type) = self.reference_return_type(ts)
        {
            let mut constraints = initial;
            constraints.push(Constraint::super_conversion(expected, return_type));
            match self.solve(ts, constraints, true) {
                Some(better) => {
                    tracing::debug!("more permissive pass replaced the solution");
                    solution = better;
                }
                None => self.failure = None,
            }
        }

        let object = ts.object();
        let pairs: Vec<(TypeVarId, TypeId)> = self
            .type_vars
            .iter()
            .zip(solution)
            .map(|(&var, ty)| (var, ty.unwrap_or(object)))
            .collect();
        let solution = Solution { pairs };
        tracing::debug!(solution = %solution.display(ts), "inferred");
        Some(solution)
    }

    /// Second pass for variables the arguments leave open: the expected
    /// return type (or `Object`) must accept the partially solved return
    /// type, and every variable must stay within its substituted bound.
    fn resolve_remaining(
        &mut self,
        ts: &mut GenericTs,
        initial: &[Constraint],
        solution: &mut Partial,
        expected: Option<TypeId>,
    ) {
        let mut map = SubstMap::<GenericsDialect>::new();
        for (&var, solved) in self.type_vars.iter().zip(solution.iter()) {
            let ty = match solved {
                Some(ty) => *ty,
                None => ts.arena_mut().type_var(var),
            };
            map.insert(var, ty);
        }
        let subst = ts.subst(map);

        let mut constraints = initial.to_vec();
        if let Some(return_type) = self.reference_return_type(ts) {
            let expected = expected.unwrap_or_else(|| ts.object());
            let partial_return = ts.subst_type(subst, return_type);
            constraints.push(Constraint::super_conversion(expected, partial_return));
        }
        for &var in &self.type_vars {
            let bound = ts.upper_bound(var);
            let bound = ts.subst_type(subst, bound);
            let var_ty = ts.arena_mut().type_var(var);
            constraints.push(Constraint::super_conversion(bound, var_ty));
        }

        // A conflict here leaves the open variables to the Object default.
        let Some(remaining) = self.solve(ts, constraints, false) else {
            self.failure = None;
            return;
        };
        for (slot, found) in solution.iter_mut().zip(remaining) {
            if slot.is_none() {
                *slot = found;
            }
        }
    }

    fn reference_return_type(&self, ts: &GenericTs) -> Option<TypeId> {
        self.return_type
            .filter(|&ty| ts.arena().is_reference(ty) && !ty.is_null())
    }

    fn index_of(&self, ts: &GenericTs, ty: TypeId) -> usize {
        ts.arena()
            .unwrap_type_var(ty)
            .and_then(|var| self.type_vars.iter().position(|&v| v == var))
            .unwrap_or(usize::MAX)
    }

    /// Simplify `constraints` to bounds on the target variables and solve
    /// them, using subtype bounds (lub) or supertype bounds (glb).
    fn solve(&mut self, ts: &mut GenericTs, constraints: Vec<Constraint>, use_subs: bool) -> Option<Partial> {
        let mut worklist: VecDeque<Constraint> = constraints.into();
        let mut equals = Vec::new();
        let mut subs = Vec::new();
        let mut supers = Vec::new();
        while let Some(head) = worklist.pop_front() {
            if head.can_simplify(ts, self) {
                let simplified = head.simplify(ts, self);
                tracing::trace!(
                    from = %head.display(ts),
                    into = simplified.len(),
                    "simplify"
                );
                for constraint in simplified.into_iter().rev() {
                    worklist.push_front(constraint);
                }
                continue;
            }
            match head.kind {
                ConstraintKind::Equal => equals.push(head),
                ConstraintKind::SubType => subs.push(head),
                ConstraintKind::SuperType => supers.push(head),
                ConstraintKind::SubConversion | ConstraintKind::SuperConversion => {}
            }
        }
        // Stable, so constraints on one variable keep their discovery order.
        equals.sort_by_key(|c: &Constraint| self.index_of(ts, c.formal));
        subs.sort_by_key(|c: &Constraint| self.index_of(ts, c.formal));
        supers.sort_by_key(|c: &Constraint| self.index_of(ts, c.formal));

        let mut solution: Partial = vec![None; self.type_vars.len()];
        for eq in &equals {
            let i = self.index_of(ts, eq.formal);
            let Some(slot) = solution.get_mut(i) else {
                continue;
            };
            match *slot {
                Some(previous) if !ts.type_equals(previous, eq.actual) => {
                    let failure = InferenceFailure::IncompatibleEquality {
                        var: ts.display_type(eq.formal),
                        first: ts.display_type(previous),
                        second: ts.display_type(eq.actual),
                    };
                    tracing::debug!(%failure, "no solution");
                    self.failure = Some(failure);
                    return None;
                }
                _ => *slot = Some(eq.actual),
            }
        }

        let bounds_of = if use_subs { &subs } else { &supers };
        for (i, &var) in self.type_vars.iter().enumerate() {
            if solution[i].is_some() {
                continue;
            }
            let mut bounds: Vec<TypeId> = Vec::new();
            for c in bounds_of.iter() {
                if ts.arena().unwrap_type_var(c.formal) == Some(var)
                    && ts.arena().is_reference(c.actual)
                    && !bounds.iter().any(|&b| ts.type_equals(b, c.actual))
                {
                    bounds.push(c.actual);
                }
            }
            solution[i] = match bounds.as_slice() {
                [] => None,
                [single] => Some(*single),
                _ if use_subs => {
                    let found = lub(ts, &bounds);
                    let bound = ts.upper_bound(var);
                    if !ts.is_subtype(found, bound) {
                        let failure = InferenceFailure::BoundViolation {
                            var: ts.resolve(ts.type_var(var).name).to_string(),
                            found: ts.display_type(found),
                            bound: ts.display_type(bound),
                        };
                        tracing::debug!(%failure, "no solution");
                        self.failure = Some(failure);
                        return None;
                    }
                    Some(found)
                }
                _ => Some(glb(ts, &bounds)),
            };
        }
        Some(solution)
    }
}
