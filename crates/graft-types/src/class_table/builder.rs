//! Builders for registering classes and members.
//!
//! Classes are registered first; members are registered against the class
//! afterwards so their container type already exists.
//!
//! # Example
//! ```ignore
//! let list = ClassBuilder::new("List").package("util").register(&mut ts);
//! let get = MethodBuilder::new("get", elem)
//!     .formals([TypeId::INT])
//!     .register(&mut ts, list);
//! ```

use graft_identity::{ClassId, ConstructorId, FieldId, MethodId, Span};

use super::{ClassDef, ClassKind, ConstructorInstance, FieldInstance, Flags, MethodInstance};
use crate::dialect::Dialect;
use crate::param::ParamTypeSystem;
use crate::type_arena::{TypeId, TypeIdVec};

#[derive(Debug, Clone, Copy)]
enum SuperSpec {
    /// `Object`, unless the class is an interface.
    Default,
    /// No superclass at all. Only the root of the hierarchy uses this.
    Root,
    Explicit(TypeId),
}

/// Builder for registering a class.
///
/// Defaults: no package, no flags, top-level (member when `outer` is set),
/// superclass `Object`, no interfaces.
pub struct ClassBuilder {
    name: String,
    package: Option<String>,
    flags: Flags,
    kind: Option<ClassKind>,
    outer: Option<TypeId>,
    super_type: SuperSpec,
    interfaces: Vec<TypeId>,
    span: Span,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: None,
            flags: Flags::NONE,
            kind: None,
            outer: None,
            super_type: SuperSpec::Default,
            interfaces: Vec::new(),
            span: Span::compiler_generated(),
        }
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub fn kind(mut self, kind: ClassKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Enclosing class type. Makes this a member class unless `kind` says otherwise.
    pub fn outer(mut self, outer: TypeId) -> Self {
        self.outer = Some(outer);
        self
    }

    pub fn extends(mut self, super_type: TypeId) -> Self {
        self.super_type = SuperSpec::Explicit(super_type);
        self
    }

    pub(crate) fn root(mut self) -> Self {
        self.super_type = SuperSpec::Root;
        self
    }

    pub fn implements(mut self, interface: TypeId) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn register<D: Dialect>(self, ts: &mut ParamTypeSystem<D>) -> ClassId {
        let id = ts.table.next_class_id();
        let ty = ts.arena.class(id);
        let name = ts.interner.intern(&self.name);
        let package = self.package.as_deref().map(|p| ts.interner.intern(p));

        let full_name = match (self.outer.and_then(|o| ts.class_of(o)), &self.package) {
            (Some(outer), _) => format!("{}.{}", ts.table.class(outer).full_name, self.name),
            (None, Some(package)) => format!("{package}.{}", self.name),
            (None, None) => self.name.clone(),
        };

        let kind = self.kind.unwrap_or(if self.outer.is_some() {
            ClassKind::Member
        } else {
            ClassKind::TopLevel
        });

        let super_type = match self.super_type {
            SuperSpec::Explicit(ty) => Some(ty),
            SuperSpec::Root => None,
            SuperSpec::Default if self.flags.is_interface() => None,
            SuperSpec::Default => Some(ts.object()),
        };

        tracing::trace!(%full_name, ?id, ?kind, "register class");
        ts.table.push_class(ClassDef {
            id,
            ty,
            name,
            full_name,
            package,
            flags: self.flags,
            kind,
            outer: self.outer,
            super_type,
            interfaces: self.interfaces,
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            member_classes: Vec::new(),
            pclass: None,
            span: self.span,
        });

        if kind == ClassKind::Member
            && let Some(outer) = self.outer.and_then(|o| ts.class_of(o))
        {
            ts.table.class_mut(outer).member_classes.push(ty);
        }
        id
    }
}

/// Builder for registering a method on a class.
///
/// Defaults: no formals, no throw types, no flags, default extension data.
pub struct MethodBuilder<X> {
    name: String,
    return_type: TypeId,
    flags: Flags,
    formal_types: TypeIdVec,
    throw_types: TypeIdVec,
    ext: X,
    span: Span,
}

impl<X: Default> MethodBuilder<X> {
    pub fn new(name: impl Into<String>, return_type: TypeId) -> Self {
        Self {
            name: name.into(),
            return_type,
            flags: Flags::NONE,
            formal_types: TypeIdVec::new(),
            throw_types: TypeIdVec::new(),
            ext: X::default(),
            span: Span::compiler_generated(),
        }
    }
}

impl<X: Clone> MethodBuilder<X> {
    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub fn formals(mut self, formals: impl IntoIterator<Item = TypeId>) -> Self {
        self.formal_types = formals.into_iter().collect();
        self
    }

    pub fn throws(mut self, throws: impl IntoIterator<Item = TypeId>) -> Self {
        self.throw_types = throws.into_iter().collect();
        self
    }

    /// Dialect-specific signature data.
    pub fn ext(mut self, ext: X) -> Self {
        self.ext = ext;
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn register<D: Dialect<ProcExt = X>>(
        self,
        ts: &mut ParamTypeSystem<D>,
        class: ClassId,
    ) -> MethodId {
        let name = ts.interner.intern(&self.name);
        let container = ts.table.class(class).ty;
        tracing::trace!(method = %self.name, ?class, "register method");
        ts.table.push_method(class, |id| MethodInstance {
            id,
            name,
            flags: self.flags,
            container,
            return_type: self.return_type,
            formal_types: self.formal_types,
            throw_types: self.throw_types,
            ext: self.ext,
            span: self.span,
        })
    }
}

/// Builder for registering a constructor on a class.
pub struct ConstructorBuilder<X> {
    flags: Flags,
    formal_types: TypeIdVec,
    throw_types: TypeIdVec,
    ext: X,
    span: Span,
}

impl<X: Default> Default for ConstructorBuilder<X> {
    fn default() -> Self {
        Self::new()
    }
}

impl<X: Default> ConstructorBuilder<X> {
    pub fn new() -> Self {
        Self {
            flags: Flags::NONE,
            formal_types: TypeIdVec::new(),
            throw_types: TypeIdVec::new(),
            ext: X::default(),
            span: Span::compiler_generated(),
        }
    }
}

impl<X: Clone> ConstructorBuilder<X> {
    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub fn formals(mut self, formals: impl IntoIterator<Item = TypeId>) -> Self {
        self.formal_types = formals.into_iter().collect();
        self
    }

    pub fn throws(mut self, throws: impl IntoIterator<Item = TypeId>) -> Self {
        self.throw_types = throws.into_iter().collect();
        self
    }

    pub fn ext(mut self, ext: X) -> Self {
        self.ext = ext;
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn register<D: Dialect<ProcExt = X>>(
        self,
        ts: &mut ParamTypeSystem<D>,
        class: ClassId,
    ) -> ConstructorId {
        let container = ts.table.class(class).ty;
        ts.table.push_constructor(class, |id| ConstructorInstance {
            id,
            flags: self.flags,
            container,
            formal_types: self.formal_types,
            throw_types: self.throw_types,
            ext: self.ext,
            span: self.span,
        })
    }
}

/// Builder for registering a field on a class.
pub struct FieldBuilder {
    name: String,
    ty: TypeId,
    flags: Flags,
    span: Span,
}

impl FieldBuilder {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            flags: Flags::NONE,
            span: Span::compiler_generated(),
        }
    }

    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn register<D: Dialect>(self, ts: &mut ParamTypeSystem<D>, class: ClassId) -> FieldId {
        let name = ts.interner.intern(&self.name);
        let container = ts.table.class(class).ty;
        ts.table.push_field(class, |id| FieldInstance {
            id,
            name,
            flags: self.flags,
            container,
            ty: self.ty,
            span: self.span,
        })
    }
}
