// type_system/type_vars.rs

use graft_identity::{Span, Symbol, TypeVarId};

use crate::dialect::Dialect;
use crate::param::ParamTypeSystem;
use crate::type_arena::TypeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeVarDef {
    pub id: TypeVarId,
    pub name: Symbol,
    /// `Object` unless declared otherwise.
    pub upper_bound: TypeId,
    pub span: Span,
}

impl<D: Dialect> ParamTypeSystem<D> {
    /// Declare a type variable. The handle is returned so bounds that mention
    /// the variable itself can be set afterwards.
    pub fn declare_type_var(&mut self, name: &str, span: Span) -> TypeVarId {
        let id = TypeVarId::new(self.type_vars.len() as u32);
        let name = self.interner.intern(name);
        self.type_vars.push(TypeVarDef {
            id,
            name,
            upper_bound: self.prelude.object,
            span,
        });
        id
    }

    pub fn set_upper_bound(&mut self, var: TypeVarId, bound: TypeId) {
        self.type_vars[var.index() as usize].upper_bound = bound;
    }

    pub fn type_var(&self, var: TypeVarId) -> &TypeVarDef {
        &self.type_vars[var.index() as usize]
    }

    pub fn upper_bound(&self, var: TypeVarId) -> TypeId {
        self.type_var(var).upper_bound
    }
}
