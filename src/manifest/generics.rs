// src/manifest/generics.rs
//! Generics dialect manifests.
//!
//! Classes and methods declare type parameters as `T` or `T extends Bound`.
//! Types use `C<A, B>` and wildcards.

use graft_generics::{GenericSignature, GenericTs, GenericTypeSystemExt, GenericsDialect};
use graft_identity::{ClassId, TypeVarId};
use graft_types::{Dialect, TypeId, WildcardBound};

use super::build::{Declarations, ManifestDialect, ProcRef, Scope, span};
use super::type_expr::{BoundKind, NamedType, parse_type, parse_type_param};
use super::{ClassDecl, DialectKind, Manifest, MethodDecl, ProcDecl};
use crate::errors::DriverError;

/// Declare a type variable per parameter and bind it in `scope`.
fn declare_params(
    decls: &mut Declarations<GenericsDialect>,
    params: &[String],
    scope: &mut Scope<TypeVarId>,
) -> Result<Vec<TypeVarId>, DriverError> {
    let mut vars = Vec::with_capacity(params.len());
    for param in params {
        let (name, _) = parse_type_param(param)?;
        let var = decls.ts.declare_type_var(&name, span());
        scope.bind(&name, var);
        vars.push(var);
    }
    Ok(vars)
}

/// Bounds are resolved once every parameter is in scope, so they may be
/// recursive (`T extends Comparable<T>`).
fn set_bounds(
    decls: &mut Declarations<GenericsDialect>,
    params: &[String],
    vars: &[TypeVarId],
    scope: &Scope<TypeVarId>,
) -> Result<(), DriverError> {
    for (param, &var) in params.iter().zip(vars) {
        if let (_, Some(bound)) = parse_type_param(param)? {
            let bound = decls.resolve(&bound, scope)?;
            decls.ts.set_upper_bound(var, bound);
        }
    }
    Ok(())
}

impl ManifestDialect for GenericsDialect {
    const KIND: DialectKind = DialectKind::Generics;

    type Pending = ();

    fn prepare(_decls: &mut Declarations<Self>, manifest: &Manifest) -> Result<(), DriverError> {
        if !manifest.keys.is_empty() {
            return Err(DriverError::unsupported("instance keys", Self::NAME));
        }
        Ok(())
    }

    fn declare_formals(
        decls: &mut Declarations<Self>,
        decl: &ClassDecl,
        scope: &mut Scope<TypeVarId>,
    ) -> Result<Vec<TypeVarId>, DriverError> {
        if decl.tracked.is_some() {
            return Err(DriverError::unsupported("tracked classes", Self::NAME));
        }
        declare_params(decls, &decl.params, scope)
    }

    fn seal_formals(
        decls: &mut Declarations<Self>,
        class: ClassId,
        decl: &ClassDecl,
        formals: &[TypeVarId],
        scope: &Scope<TypeVarId>,
    ) -> Result<(), DriverError> {
        if formals.is_empty() {
            return Ok(());
        }
        decls.ts.make_generic(class, formals, span());
        set_bounds(decls, &decl.params, formals, scope)
    }

    fn formal_type(ts: &mut GenericTs, formal: TypeVarId) -> Option<TypeId> {
        Some(ts.arena_mut().type_var(formal))
    }

    fn instantiate_named(
        decls: &mut Declarations<Self>,
        class: ClassId,
        named: &NamedType,
        scope: &Scope<TypeVarId>,
    ) -> Result<TypeId, DriverError> {
        if named.tracked.is_some() || !named.keys.is_empty() {
            return Err(DriverError::unsupported("keys", Self::NAME));
        }
        let mut args = Vec::with_capacity(named.args.len());
        for arg in &named.args {
            args.push(decls.resolve(arg, scope)?);
        }
        Ok(decls.ts.parameterize(span(), class, &args)?)
    }

    fn wildcard(decls: &mut Declarations<Self>, bound: Option<(BoundKind, TypeId)>) -> Result<TypeId, DriverError> {
        let bound = match bound {
            None => WildcardBound::Unbounded,
            Some((BoundKind::Extends, ty)) => WildcardBound::Extends(ty),
            Some((BoundKind::Super, ty)) => WildcardBound::Super(ty),
        };
        Ok(decls.ts.arena_mut().wildcard(bound))
    }

    fn method_ext(
        decls: &mut Declarations<Self>,
        decl: &MethodDecl,
        scope: &mut Scope<TypeVarId>,
    ) -> Result<GenericSignature, DriverError> {
        if decl.proc.entry.is_some() || decl.proc.exit.is_some() {
            return Err(DriverError::unsupported("key annotations", Self::NAME));
        }
        let vars = declare_params(decls, &decl.type_params, scope)?;
        set_bounds(decls, &decl.type_params, &vars, scope)?;
        Ok(GenericSignature::new(vars))
    }

    fn procedure_registered(
        _decls: &mut Declarations<Self>,
        _target: ProcRef,
        _decl: &ProcDecl,
        _throws: &[TypeId],
        _scope: &Scope<TypeVarId>,
    ) -> Result<(), DriverError> {
        Ok(())
    }

    fn finish(_decls: &mut Declarations<Self>) -> Result<(), DriverError> {
        Ok(())
    }

    /// Actuals are type expressions.
    fn instance_expr(
        _decls: &mut Declarations<Self>,
        class: &str,
        actuals: &[String],
    ) -> Result<NamedType, DriverError> {
        let args = actuals
            .iter()
            .map(|text| parse_type(text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NamedType {
            args,
            ..NamedType::plain(class)
        })
    }

    fn describe_ext(ts: &GenericTs, ext: &GenericSignature) -> (String, String) {
        if !ext.is_generic() {
            return (String::new(), String::new());
        }
        let names: Vec<String> = ext
            .type_params
            .iter()
            .map(|&var| Self::display_formal(ts, var))
            .collect();
        (format!("<{}> ", names.join(", ")), String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::describe_instance;
    use graft_types::SemanticError;
    use std::path::Path;

    fn build(text: &str) -> Declarations<GenericsDialect> {
        let manifest = Manifest::parse(text, Path::new("generics.json")).unwrap();
        Declarations::build(&manifest).unwrap()
    }

    const COLLECTIONS: &str = r#"{
        "dialect": "generics",
        "classes": [
            { "name": "Coll", "flags": ["interface"], "params": ["E"],
              "methods": [{ "name": "add", "returns": "boolean", "params": ["E"] }] },
            { "name": "List", "params": ["E"], "implements": ["Coll<E>"],
              "methods": [
                { "name": "get", "returns": "E", "params": ["int"] },
                { "name": "map", "type_params": ["R"], "returns": "List<R>", "params": ["R[]"] }
              ] },
            { "name": "Sorted", "params": ["T extends Comparable<T>"] },
            { "name": "Comparable", "params": ["T"] }
        ],
        "instantiate": [{ "class": "List", "args": ["String"] }]
    }"#;

    #[test]
    fn forward_reference_in_a_header_is_an_error() {
        let manifest = Manifest::parse(COLLECTIONS, Path::new("generics.json")).unwrap();
        assert!(matches!(
            Declarations::<GenericsDialect>::build(&manifest),
            Err(DriverError::UnknownType { name }) if name == "Comparable"
        ));
    }

    fn collections() -> Declarations<GenericsDialect> {
        // Same declarations with Comparable first.
        let reordered = COLLECTIONS.replace(
            r#"{ "name": "Sorted", "params": ["T extends Comparable<T>"] },
            { "name": "Comparable", "params": ["T"] }"#,
            r#"{ "name": "Comparable", "params": ["T"] },
            { "name": "Sorted", "params": ["T extends Comparable<T>"] }"#,
        );
        build(&reordered)
    }

    #[test]
    fn instantiation_substitutes_members_and_supertypes() {
        let mut decls = collections();
        assert!(decls.diagnostics.is_empty());
        let list_string = decls.instances[0];
        let lines = describe_instance(&mut decls.ts, list_string);
        assert_eq!(lines[0], "type List<String>");
        assert!(lines.contains(&"implements Coll<String>".to_string()), "{lines:?}");
        assert!(lines.contains(&"method get(int): String".to_string()), "{lines:?}");
        assert!(lines.contains(&"method <R> map(R[]): List<R>".to_string()), "{lines:?}");
    }

    #[test]
    fn recursive_bounds_resolve() {
        let mut decls = collections();
        let sorted = decls.class_named("Sorted").unwrap();
        let pclass = decls.ts.pclass_of(sorted).unwrap();
        let var = decls.ts.pclass(pclass).formals[0];
        let bound = decls.ts.upper_bound(var);
        assert_eq!(decls.ts.display_type(bound), "Comparable<T>");
    }

    #[test]
    fn wrong_argument_count_is_collected() {
        let decls = build(
            r#"{
            "dialect": "generics",
            "classes": [{ "name": "Box", "params": ["T"] }],
            "instantiate": [{ "class": "Box", "args": ["String", "Integer"] }]
        }"#,
        );
        assert!(matches!(
            decls.diagnostics.iter().next(),
            Some(SemanticError::ArityMismatch { expected: 1, found: 2, .. })
        ));
    }

    #[test]
    fn header_errors_are_collected_and_the_class_kept() {
        let mut decls = build(
            r#"{
            "dialect": "generics",
            "classes": [
                { "name": "Box", "params": ["T"] },
                { "name": "Crate", "extends": "Box<String, Integer>",
                  "methods": [{ "name": "size", "returns": "int" }] },
                { "name": "Shelf", "implements": ["Box<String>"] }
            ]
        }"#,
        );
        assert_eq!(decls.diagnostics.len(), 1);
        assert!(matches!(
            decls.diagnostics.iter().next(),
            Some(SemanticError::ArityMismatch { expected: 1, found: 2, .. })
        ));
        assert_eq!(decls.declared().len(), 3);
        let crate_class = decls.class_named("Crate").unwrap();
        let crate_ty = decls.ts.class(crate_class).ty;
        let lines = describe_instance(&mut decls.ts, crate_ty);
        assert!(lines.contains(&"method size(): int".to_string()), "{lines:?}");
        assert!(!lines.iter().any(|l| l.starts_with("extends Box")), "{lines:?}");
    }

    #[test]
    fn keys_are_rejected() {
        let manifest = Manifest::parse(r#"{ "dialect": "generics", "keys": ["k"] }"#, Path::new("g.json")).unwrap();
        assert!(matches!(
            Declarations::<GenericsDialect>::build(&manifest),
            Err(DriverError::Unsupported { dialect: "generics", .. })
        ));
    }
}
