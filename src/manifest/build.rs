// src/manifest/build.rs
//! Building a type system from a manifest.
//!
//! Classes are registered in manifest order, so a class header (outer class,
//! superclass, interfaces, parameter bounds) may only mention classes declared
//! before it. Members are registered in a second pass and may mention any
//! class.

use rustc_hash::FxHashMap;

use graft_identity::{ClassId, ConstructorId, MethodId, Span};
use graft_types::{
    ClassBuilder, ConstructorBuilder, Diagnostics, Dialect, FieldBuilder, MethodBuilder,
    PRELUDE_PACKAGE, ParamTypeSystem, PrimitiveType, SemanticError, TypeId,
};

use super::type_expr::{BoundKind, NamedType, TypeExpr, parse_type};
use super::{ClassDecl, DialectKind, Manifest, MethodDecl, ProcDecl, parse_flags};
use crate::errors::DriverError;

/// Manifests carry no source positions.
pub(super) fn span() -> Span {
    Span::compiler_generated()
}

/// Formals visible by name: a class's own, its enclosing classes', and a
/// method's type parameters. Later bindings shadow earlier ones.
#[derive(Debug, Clone)]
pub struct Scope<F> {
    bindings: Vec<(String, F)>,
}

impl<F> Default for Scope<F> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }
}

impl<F: Copy> Scope<F> {
    pub fn bind(&mut self, name: &str, formal: F) {
        self.bindings.push((name.to_string(), formal));
    }

    pub fn lookup(&self, name: &str) -> Option<F> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound == name)
            .map(|(_, formal)| *formal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcRef {
    Method(MethodId),
    Constructor(ConstructorId),
}

/// How a dialect reads the parts of a manifest that mention its formals.
pub trait ManifestDialect: Dialect {
    const KIND: DialectKind;

    /// Data gathered while members are registered, consumed by `finish`.
    type Pending: Default;

    /// Declarations that precede every class.
    fn prepare(decls: &mut Declarations<Self>, manifest: &Manifest) -> Result<(), DriverError>;

    /// Create the formals `decl` declares and bind them in `scope`. Runs
    /// before the class is registered, so its header can mention them.
    fn declare_formals(
        decls: &mut Declarations<Self>,
        decl: &ClassDecl,
        scope: &mut Scope<Self::Formal>,
    ) -> Result<Vec<Self::Formal>, DriverError>;

    /// Make the registered `class` parametric over `formals`.
    fn seal_formals(
        decls: &mut Declarations<Self>,
        class: ClassId,
        decl: &ClassDecl,
        formals: &[Self::Formal],
        scope: &Scope<Self::Formal>,
    ) -> Result<(), DriverError>;

    /// The type a formal denotes when written in type position, if any.
    fn formal_type(ts: &mut ParamTypeSystem<Self>, formal: Self::Formal) -> Option<TypeId>;

    /// `named` applied to `class`; called only when `named` is not plain.
    fn instantiate_named(
        decls: &mut Declarations<Self>,
        class: ClassId,
        named: &NamedType,
        scope: &Scope<Self::Formal>,
    ) -> Result<TypeId, DriverError>;

    fn wildcard(
        decls: &mut Declarations<Self>,
        bound: Option<(BoundKind, TypeId)>,
    ) -> Result<TypeId, DriverError>;

    /// Extension data of a method. May bind method formals in `scope`.
    fn method_ext(
        decls: &mut Declarations<Self>,
        decl: &MethodDecl,
        scope: &mut Scope<Self::Formal>,
    ) -> Result<Self::ProcExt, DriverError>;

    fn procedure_registered(
        decls: &mut Declarations<Self>,
        target: ProcRef,
        decl: &ProcDecl,
        throws: &[TypeId],
        scope: &Scope<Self::Formal>,
    ) -> Result<(), DriverError>;

    /// Checks that need every declaration in place.
    fn finish(decls: &mut Declarations<Self>) -> Result<(), DriverError>;

    /// `class` applied to actuals written on the command line or in an
    /// `instantiate` entry.
    fn instance_expr(
        decls: &mut Declarations<Self>,
        class: &str,
        actuals: &[String],
    ) -> Result<NamedType, DriverError>;

    /// Text printed before and after a procedure's signature.
    fn describe_ext(ts: &ParamTypeSystem<Self>, ext: &Self::ProcExt) -> (String, String);
}

/// A type system built from one manifest.
pub struct Declarations<D: ManifestDialect> {
    pub ts: ParamTypeSystem<D>,
    names: FxHashMap<String, ClassId>,
    declared: Vec<ClassId>,
    scopes: FxHashMap<ClassId, Scope<D::Formal>>,
    pub pending: D::Pending,
    pub diagnostics: Diagnostics,
    /// Results of the manifest's `instantiate` entries, in order.
    pub instances: Vec<TypeId>,
}

impl<D: ManifestDialect> Default for Declarations<D> {
    fn default() -> Self {
        Self {
            ts: ParamTypeSystem::new(),
            names: FxHashMap::default(),
            declared: Vec::new(),
            scopes: FxHashMap::default(),
            pending: D::Pending::default(),
            diagnostics: Diagnostics::new(),
            instances: Vec::new(),
        }
    }
}

impl<D: ManifestDialect> Declarations<D> {
    /// Register every declaration, run the dialect's checks and the
    /// requested instantiations. Semantic errors are collected in
    /// `diagnostics`; anything else aborts.
    pub fn build(manifest: &Manifest) -> Result<Self, DriverError> {
        if manifest.dialect != D::KIND {
            return Err(DriverError::WrongDialect {
                expected: D::KIND.name(),
                found: manifest.dialect.name(),
            });
        }
        let mut decls = Self::default();
        D::prepare(&mut decls, manifest)?;

        let mut classes = Vec::with_capacity(manifest.classes.len());
        for decl in &manifest.classes {
            classes.push(decls.declare_class(decl)?);
        }
        for (decl, &class) in manifest.classes.iter().zip(&classes) {
            decls.declare_members(class, decl)?;
        }
        D::finish(&mut decls)?;

        for entry in &manifest.instantiate {
            let result = decls.instantiate(&entry.class, &entry.args);
            if let Some(ty) = decls.recover(result)? {
                decls.instances.push(ty);
            }
        }
        tracing::debug!(
            dialect = D::NAME,
            classes = classes.len(),
            errors = decls.diagnostics.len(),
            "built declarations"
        );
        Ok(decls)
    }

    /// Classes declared by the manifest, in order.
    pub fn declared(&self) -> &[ClassId] {
        &self.declared
    }

    pub fn class_named(&self, name: &str) -> Result<ClassId, DriverError> {
        self.names
            .get(name)
            .copied()
            .or_else(|| self.ts.lookup_class(&format!("{PRELUDE_PACKAGE}.{name}")))
            .or_else(|| self.ts.lookup_class(name))
            .ok_or_else(|| DriverError::UnknownClass {
                name: name.to_string(),
            })
    }

    /// `class` applied to `actuals` as the dialect reads them.
    pub fn instantiate(&mut self, class: &str, actuals: &[String]) -> Result<TypeId, DriverError> {
        let named = D::instance_expr(self, class, actuals)?;
        self.resolve_named(&named, &Scope::default())
    }

    pub fn resolve_text(&mut self, text: &str, scope: &Scope<D::Formal>) -> Result<TypeId, DriverError> {
        let expr = parse_type(text)?;
        self.resolve(&expr, scope)
    }

    pub fn resolve(&mut self, expr: &TypeExpr, scope: &Scope<D::Formal>) -> Result<TypeId, DriverError> {
        match expr {
            TypeExpr::Array(elem) => {
                let elem = self.resolve(elem, scope)?;
                Ok(self.ts.arena_mut().array(elem))
            }
            TypeExpr::Wildcard(bound) => {
                let bound = match bound {
                    Some((kind, ty)) => Some((*kind, self.resolve(ty, scope)?)),
                    None => None,
                };
                D::wildcard(self, bound)
            }
            TypeExpr::Named(named) => self.resolve_named(named, scope),
        }
    }

    fn resolve_named(&mut self, named: &NamedType, scope: &Scope<D::Formal>) -> Result<TypeId, DriverError> {
        if named.is_plain() {
            if let Some(prim) = PrimitiveType::from_name(&named.name) {
                return Ok(self.ts.arena().primitive(prim));
            }
            if let Some(formal) = scope.lookup(&named.name)
                && let Some(ty) = D::formal_type(&mut self.ts, formal)
            {
                return Ok(ty);
            }
        }
        let class = self
            .class_named(&named.name)
            .map_err(|_| DriverError::UnknownType {
                name: named.name.clone(),
            })?;
        if named.is_plain() {
            Ok(self.ts.class(class).ty)
        } else {
            D::instantiate_named(self, class, named, scope)
        }
    }

    fn resolve_all(&mut self, texts: &[String], scope: &Scope<D::Formal>) -> Result<Vec<TypeId>, DriverError> {
        texts.iter().map(|text| self.resolve_text(text, scope)).collect()
    }

    /// Keep a semantic error and carry on; anything else aborts.
    pub fn recover<T>(&mut self, result: Result<T, DriverError>) -> Result<Option<T>, DriverError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(DriverError::Semantic(error)) => {
                self.diagnostics.push(error);
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    pub fn push_error(&mut self, error: SemanticError) {
        self.diagnostics.push(error);
    }

    fn declare_class(&mut self, decl: &ClassDecl) -> Result<ClassId, DriverError> {
        let outer = decl
            .outer
            .as_deref()
            .map(|name| self.class_named(name))
            .transpose()?;
        let mut scope = outer
            .and_then(|outer| self.scopes.get(&outer).cloned())
            .unwrap_or_default();
        let formals = D::declare_formals(self, decl, &mut scope)?;

        let mut builder = ClassBuilder::new(&decl.name).flags(parse_flags(&decl.flags)?);
        if let Some(package) = &decl.package {
            builder = builder.package(package);
        }
        if let Some(outer) = outer {
            builder = builder.outer(self.ts.class(outer).ty);
        }
        // A supertype with a semantic error is dropped; the class still registers.
        if let Some(super_type) = &decl.extends {
            let resolved = self.resolve_text(super_type, &scope);
            if let Some(ty) = self.recover(resolved)? {
                builder = builder.extends(ty);
            }
        }
        for interface in &decl.implements {
            let resolved = self.resolve_text(interface, &scope);
            if let Some(ty) = self.recover(resolved)? {
                builder = builder.implements(ty);
            }
        }
        let class = builder.register(&mut self.ts);
        let sealed = D::seal_formals(self, class, decl, &formals, &scope);
        self.recover(sealed)?;

        let full_name = self.ts.class(class).full_name.clone();
        self.names.insert(decl.name.clone(), class);
        self.names.insert(full_name, class);
        self.scopes.insert(class, scope);
        self.declared.push(class);
        Ok(class)
    }

    fn declare_members(&mut self, class: ClassId, decl: &ClassDecl) -> Result<(), DriverError> {
        let scope = self.scopes.get(&class).cloned().unwrap_or_default();
        for field in &decl.fields {
            let ty = self.resolve_text(&field.ty, &scope);
            let Some(ty) = self.recover(ty)? else {
                continue;
            };
            FieldBuilder::new(&field.name, ty)
                .flags(parse_flags(&field.flags)?)
                .register(&mut self.ts, class);
        }
        for method in &decl.methods {
            let result = self.declare_method(class, method, &scope);
            self.recover(result)?;
        }
        for ctor in &decl.constructors {
            let result = self.declare_constructor(class, ctor, &scope);
            self.recover(result)?;
        }
        Ok(())
    }

    fn declare_method(
        &mut self,
        class: ClassId,
        decl: &MethodDecl,
        class_scope: &Scope<D::Formal>,
    ) -> Result<(), DriverError> {
        let mut scope = class_scope.clone();
        let ext = D::method_ext(self, decl, &mut scope)?;
        let return_type = self.resolve_text(&decl.returns, &scope)?;
        let formals = self.resolve_all(&decl.proc.params, &scope)?;
        let throws = self.resolve_throws(&decl.proc, &scope)?;
        let id = MethodBuilder::new(&decl.name, return_type)
            .flags(parse_flags(&decl.proc.flags)?)
            .formals(formals)
            .throws(throws.iter().copied())
            .ext(ext)
            .register(&mut self.ts, class);
        D::procedure_registered(self, ProcRef::Method(id), &decl.proc, &throws, &scope)
    }

    fn declare_constructor(
        &mut self,
        class: ClassId,
        decl: &ProcDecl,
        scope: &Scope<D::Formal>,
    ) -> Result<(), DriverError> {
        let formals = self.resolve_all(&decl.params, scope)?;
        let throws = self.resolve_throws(decl, scope)?;
        let id = ConstructorBuilder::<D::ProcExt>::new()
            .flags(parse_flags(&decl.flags)?)
            .formals(formals)
            .throws(throws.iter().copied())
            .register(&mut self.ts, class);
        D::procedure_registered(self, ProcRef::Constructor(id), decl, &throws, scope)
    }

    fn resolve_throws(&mut self, decl: &ProcDecl, scope: &Scope<D::Formal>) -> Result<Vec<TypeId>, DriverError> {
        decl.throws
            .iter()
            .map(|throw| self.resolve_text(&throw.ty, scope))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_shadow_outer_bindings() {
        let mut scope = Scope::default();
        scope.bind("T", 1u32);
        scope.bind("U", 2);
        assert_eq!(scope.lookup("T"), Some(1));
        let mut inner = scope.clone();
        inner.bind("T", 3);
        assert_eq!(inner.lookup("T"), Some(3));
        assert_eq!(inner.lookup("U"), Some(2));
        assert_eq!(scope.lookup("T"), Some(1));
        assert_eq!(scope.lookup("V"), None);
    }
}
