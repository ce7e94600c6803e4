// param/pclass.rs
//
// Parametric classes: a class plus the ordered formals it abstracts over.

use std::fmt;

use graft_identity::{PClassId, Span};

use super::ParamTypeSystem;
use crate::dialect::Dialect;
use crate::type_arena::TypeId;

/// A class abstracted over an ordered list of formals. Immutable once sealed.
pub struct PClass<D: Dialect> {
    pub id: PClassId,
    pub formals: Vec<D::Formal>,
    /// The underlying class type (`TypeKind::Class`).
    pub clazz: TypeId,
    pub span: Span,
}

impl<D: Dialect> PClass<D> {
    pub fn arity(&self) -> usize {
        self.formals.len()
    }
}

impl<D: Dialect> Clone for PClass<D> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            formals: self.formals.clone(),
            clazz: self.clazz,
            span: self.span,
        }
    }
}

impl<D: Dialect> fmt::Debug for PClass<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PClass")
            .field("id", &self.id)
            .field("formals", &self.formals)
            .field("clazz", &self.clazz)
            .finish()
    }
}

/// Mutable form of a parametric class, used while the declaration is being
/// built. Formals are unique and keep declaration order.
pub struct PClassBuilder<D: Dialect> {
    clazz: TypeId,
    formals: Vec<D::Formal>,
    span: Span,
}

impl<D: Dialect> PClassBuilder<D> {
    pub fn new(clazz: TypeId, span: Span) -> Self {
        Self {
            clazz,
            formals: Vec::new(),
            span,
        }
    }

    /// Append a formal. Returns false if it is already present.
    pub fn push_formal(&mut self, formal: D::Formal) -> bool {
        if self.formals.contains(&formal) {
            return false;
        }
        self.formals.push(formal);
        true
    }

    pub fn formal(mut self, formal: D::Formal) -> Self {
        self.push_formal(formal);
        self
    }

    pub fn formals(&self) -> &[D::Formal] {
        &self.formals
    }

    /// Freeze the formals and register the parametric class.
    pub fn seal(self, ts: &mut ParamTypeSystem<D>) -> PClassId {
        ts.register_pclass(self.clazz, self.formals, self.span)
    }
}
