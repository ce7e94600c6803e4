// class_table/members.rs
//
// Declared and substituted member instances.

use graft_identity::{ConstructorId, FieldId, MethodId, Span, Symbol};

use super::Flags;
use crate::type_arena::{TypeId, TypeIdVec};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInstance {
    pub id: FieldId,
    pub name: Symbol,
    pub flags: Flags,
    pub container: TypeId,
    pub ty: TypeId,
    pub span: Span,
}

/// A method, either as declared or as seen through a substitution.
/// `ext` carries the dialect's extra signature data.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInstance<X> {
    pub id: MethodId,
    pub name: Symbol,
    pub flags: Flags,
    pub container: TypeId,
    pub return_type: TypeId,
    pub formal_types: TypeIdVec,
    pub throw_types: TypeIdVec,
    pub ext: X,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorInstance<X> {
    pub id: ConstructorId,
    pub flags: Flags,
    pub container: TypeId,
    pub formal_types: TypeIdVec,
    pub throw_types: TypeIdVec,
    pub ext: X,
    pub span: Span,
}

/// Shared view of methods and constructors.
pub trait ProcedureInstance {
    type Ext;

    fn container(&self) -> TypeId;
    fn flags(&self) -> Flags;
    fn formal_types(&self) -> &[TypeId];
    fn throw_types(&self) -> &[TypeId];
    fn set_throw_types(&mut self, throw_types: TypeIdVec);
    fn ext(&self) -> &Self::Ext;
    fn ext_mut(&mut self) -> &mut Self::Ext;
    fn span(&self) -> Span;
}

macro_rules! impl_procedure_instance {
    ($ty:ident) => {
        impl<X> ProcedureInstance for $ty<X> {
            type Ext = X;

            fn container(&self) -> TypeId {
                self.container
            }

            fn flags(&self) -> Flags {
                self.flags
            }

            fn formal_types(&self) -> &[TypeId] {
                &self.formal_types
            }

            fn throw_types(&self) -> &[TypeId] {
                &self.throw_types
            }

            fn set_throw_types(&mut self, throw_types: TypeIdVec) {
                self.throw_types = throw_types;
            }

            fn ext(&self) -> &X {
                &self.ext
            }

            fn ext_mut(&mut self) -> &mut X {
                &mut self.ext
            }

            fn span(&self) -> Span {
                self.span
            }
        }
    };
}

impl_procedure_instance!(MethodInstance);
impl_procedure_instance!(ConstructorInstance);
