// param/subst_class.rs
//
// Substituted class views and the class queries that see through them.
//
// A view answers structural queries by asking its base class and
// substituting the answer; everything else (name, flags, package, kind)
// passes straight through to the base.

use std::rc::Rc;

use graft_identity::{ClassId, SubstId, Symbol};

use super::ParamTypeSystem;
use crate::class_table::{ClassKind, ConstructorInstance, FieldInstance, Flags, MethodInstance};
use crate::dialect::{Dialect, SubstMap};
use crate::type_arena::{TypeId, TypeKind};

/// A class viewed through a substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstClassData {
    /// Always a `TypeKind::Class`.
    pub base: TypeId,
    pub subst: SubstId,
}

impl<D: Dialect> ParamTypeSystem<D> {
    /// The declared class behind a class or substituted class type.
    pub fn class_of(&self, ty: TypeId) -> Option<ClassId> {
        match self.arena.get(ty) {
            TypeKind::Class(class) => Some(*class),
            TypeKind::Subst(view) => self.class_of(self.subst_class(*view).base),
            _ => None,
        }
    }

    /// Base type and substitution of a substituted class view.
    pub fn view_of(&self, ty: TypeId) -> Option<SubstClassData> {
        self.arena
            .unwrap_subst(ty)
            .map(|view| *self.subst_class(view))
    }

    /// The map a substituted class view was built with.
    pub fn view_map(&self, ty: TypeId) -> Option<&SubstMap<D>> {
        self.view_of(ty)
            .map(|view| self.substitution(view.subst).substitutions())
    }

    pub fn base_of(&self, ty: TypeId) -> TypeId {
        self.view_of(ty).map_or(ty, |view| view.base)
    }

    // ========================================================================
    // Pass-through queries
    // ========================================================================

    pub fn class_name(&self, ty: TypeId) -> Option<Symbol> {
        self.class_of(ty).map(|c| self.table.class(c).name)
    }

    pub fn full_name(&self, ty: TypeId) -> Option<&str> {
        self.class_of(ty)
            .map(|c| self.table.class(c).full_name.as_str())
    }

    pub fn package(&self, ty: TypeId) -> Option<Symbol> {
        self.class_of(ty).and_then(|c| self.table.class(c).package)
    }

    pub fn class_flags(&self, ty: TypeId) -> Flags {
        self.class_of(ty)
            .map_or(Flags::NONE, |c| self.table.class(c).flags)
    }

    pub fn class_kind(&self, ty: TypeId) -> Option<ClassKind> {
        self.class_of(ty).map(|c| self.table.class(c).kind)
    }

    // ========================================================================
    // Substituted queries
    // ========================================================================

    pub fn super_type(&mut self, ty: TypeId) -> Option<TypeId> {
        match self.arena.get(ty).clone() {
            TypeKind::Class(class) => self.table.class(class).super_type,
            TypeKind::Subst(view) => {
                let SubstClassData { base, subst } = *self.subst_class(view);
                let super_type = self.super_type(base)?;
                Some(self.subst_type(subst, super_type))
            }
            _ => None,
        }
    }

    pub fn interfaces(&mut self, ty: TypeId) -> Vec<TypeId> {
        match self.arena.get(ty).clone() {
            TypeKind::Class(class) => self.table.class(class).interfaces.clone(),
            TypeKind::Subst(view) => {
                let SubstClassData { base, subst } = *self.subst_class(view);
                let interfaces = self.interfaces(base);
                self.subst_type_list(subst, &interfaces).into_vec()
            }
            _ => Vec::new(),
        }
    }

    /// Enclosing class, substituted like any other structural answer.
    pub fn outer(&mut self, ty: TypeId) -> Option<TypeId> {
        match self.arena.get(ty).clone() {
            TypeKind::Class(class) => self.table.class(class).outer,
            TypeKind::Subst(view) => {
                let SubstClassData { base, subst } = *self.subst_class(view);
                let outer = self.outer(base)?;
                Some(self.subst_type(subst, outer))
            }
            _ => None,
        }
    }

    pub fn member_classes(&mut self, ty: TypeId) -> Vec<TypeId> {
        match self.arena.get(ty).clone() {
            TypeKind::Class(class) => self.table.class(class).member_classes.clone(),
            TypeKind::Subst(view) => {
                let SubstClassData { base, subst } = *self.subst_class(view);
                let members = self.member_classes(base);
                self.subst_type_list(subst, &members).into_vec()
            }
            _ => Vec::new(),
        }
    }

    pub fn fields(&mut self, ty: TypeId) -> Vec<Rc<FieldInstance>> {
        match self.arena.get(ty).clone() {
            TypeKind::Class(class) => {
                let def = self.table.class(class);
                def.fields.iter().map(|&id| self.table.field(id).clone()).collect()
            }
            TypeKind::Subst(view) => {
                let SubstClassData { base, subst } = *self.subst_class(view);
                self.fields(base)
                    .iter()
                    .map(|field| self.subst_field(subst, field))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn methods(&mut self, ty: TypeId) -> Vec<Rc<MethodInstance<D::ProcExt>>> {
        match self.arena.get(ty).clone() {
            TypeKind::Class(class) => {
                let def = self.table.class(class);
                def.methods.iter().map(|&id| self.table.method(id).clone()).collect()
            }
            TypeKind::Subst(view) => {
                let SubstClassData { base, subst } = *self.subst_class(view);
                self.methods(base)
                    .iter()
                    .map(|method| self.subst_method(subst, method))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn constructors(&mut self, ty: TypeId) -> Vec<Rc<ConstructorInstance<D::ProcExt>>> {
        match self.arena.get(ty).clone() {
            TypeKind::Class(class) => {
                let def = self.table.class(class);
                def.constructors
                    .iter()
                    .map(|&id| self.table.constructor(id).clone())
                    .collect()
            }
            TypeKind::Subst(view) => {
                let SubstClassData { base, subst } = *self.subst_class(view);
                self.constructors(base)
                    .iter()
                    .map(|ctor| self.subst_constructor(subst, ctor))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn field_named(&mut self, ty: TypeId, name: &str) -> Option<Rc<FieldInstance>> {
        let name = self.interner.lookup(name)?;
        self.fields(ty).into_iter().find(|f| f.name == name)
    }

    pub fn methods_named(&mut self, ty: TypeId, name: &str) -> Vec<Rc<MethodInstance<D::ProcExt>>> {
        let Some(name) = self.interner.lookup(name) else {
            return Vec::new();
        };
        self.methods(ty)
            .into_iter()
            .filter(|m| m.name == name)
            .collect()
    }

    pub fn member_class_named(&mut self, ty: TypeId, name: &str) -> Option<TypeId> {
        let name = self.interner.lookup(name)?;
        self.member_classes(ty)
            .into_iter()
            .find(|&member| self.class_name(member) == Some(name))
    }
}
