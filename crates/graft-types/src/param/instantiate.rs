// param/instantiate.rs
//
// Turning a parametric class plus actuals into a class type.

use graft_identity::{PClassId, Span};

use super::{PClass, ParamTypeSystem};
use crate::dialect::{Dialect, SubstMap};
use crate::errors::{InternalError, SemanticError};
use crate::type_arena::TypeId;

impl<D: Dialect> ParamTypeSystem<D> {
    /// Instantiate `pclass` with `actuals`, reporting an arity mismatch as a
    /// semantic error at `span`.
    #[tracing::instrument(skip(self, actuals), fields(arity = actuals.len()))]
    pub fn instantiate(
        &mut self,
        span: Span,
        pclass: PClassId,
        actuals: &[D::Actual],
    ) -> Result<TypeId, SemanticError> {
        let expected = self.pclass(pclass).arity();
        if expected != actuals.len() {
            let clazz = self.pclass(pclass).clazz;
            return Err(SemanticError::ArityMismatch {
                class: self.display_type(clazz),
                expected,
                found: actuals.len(),
                span: span.into(),
            });
        }
        Ok(self.unchecked_instantiate(span, pclass, actuals))
    }

    /// Instantiate without arity validation. A mismatch here is a caller bug.
    pub fn unchecked_instantiate(
        &mut self,
        span: Span,
        pclass: PClassId,
        actuals: &[D::Actual],
    ) -> TypeId {
        let PClass { formals, clazz, .. } = self.pclass(pclass).clone();
        if formals.len() != actuals.len() {
            InternalError::LengthMismatch {
                what: "instantiation actuals",
                expected: formals.len(),
                found: actuals.len(),
            }
            .raise()
        }

        let map: SubstMap<D> = formals.iter().copied().zip(actuals.iter().copied()).collect();
        let subst = self.subst(map);
        let result = self.subst_type(subst, clazz);
        if !self.arena.is_class_like(result) {
            InternalError::NotAClassInstantiation {
                pclass: self.display_type(clazz),
                found: self.display_type(result),
            }
            .raise()
        }
        tracing::debug!(%span, result = %self.display_type(result), "instantiated");
        result
    }

    /// Instantiate `pclass` with its own formals.
    pub fn null_instantiate(&mut self, span: Span, pclass: PClassId) -> TypeId {
        let formals = self.pclass(pclass).formals.clone();
        let actuals: Vec<D::Actual> = formals
            .into_iter()
            .map(|formal| D::formal_as_actual(self, formal))
            .collect();
        self.unchecked_instantiate(span, pclass, &actuals)
    }
}
