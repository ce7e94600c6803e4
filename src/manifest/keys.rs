// src/manifest/keys.rs
//! Key dialect manifests.
//!
//! A class lists its key parameters in `params`; `tracked` names the one its
//! instances carry, which always comes first among the formals. In types,
//! `tracked(k) C` and `C[k, ...]` bind those formals in order; a key named
//! there that is neither in scope nor declared becomes an instance key.
//! Procedures annotate `entry`, `exit` and per-throw `keys`.

use graft_identity::{ClassId, KeyId};
use graft_keys::{
    KeyAnnotations, KeyDialect, KeyKind, KeySet, KeyTs, KeyTypeSystemExt, KeyedProcedure,
    KeyedSignature, ProcState, ProcTarget, ThrowConstraint, check_override, overridden_methods,
};
use graft_types::{Dialect, SemanticError, TypeId};

use super::build::{Declarations, ManifestDialect, ProcRef, Scope, span};
use super::type_expr::{BoundKind, NamedType};
use super::{ClassDecl, DialectKind, Manifest, MethodDecl, ProcDecl};
use crate::errors::DriverError;

/// Scope first, then any canonical key of that name, else a key of kind
/// `missing`.
fn resolve_key(decls: &mut Declarations<KeyDialect>, scope: &Scope<KeyId>, name: &str, missing: KeyKind) -> KeyId {
    if let Some(key) = scope.lookup(name) {
        return key;
    }
    let sym = decls.ts.intern(name);
    match decls.ts.keys().lookup(sym) {
        Some(key) => key,
        None => decls.ts.declare_key(name, missing, span()),
    }
}

fn key_set(decls: &mut Declarations<KeyDialect>, scope: &Scope<KeyId>, names: &[String]) -> KeySet {
    let mut keys = Vec::with_capacity(names.len());
    for name in names {
        keys.push(resolve_key(decls, scope, name, KeyKind::Unknown));
    }
    keys.into_iter().collect()
}

impl ManifestDialect for KeyDialect {
    const KIND: DialectKind = DialectKind::Keys;

    type Pending = Vec<KeyedProcedure>;

    fn prepare(decls: &mut Declarations<Self>, manifest: &Manifest) -> Result<(), DriverError> {
        for name in &manifest.keys {
            decls.ts.instance_key(name, span());
        }
        Ok(())
    }

    fn declare_formals(
        decls: &mut Declarations<Self>,
        decl: &ClassDecl,
        scope: &mut Scope<KeyId>,
    ) -> Result<Vec<KeyId>, DriverError> {
        let tracked = decl.tracked.as_deref();
        let names = tracked
            .into_iter()
            .chain(decl.params.iter().map(String::as_str).filter(|&p| Some(p) != tracked));
        let mut keys = Vec::new();
        for name in names {
            let key = decls.ts.declare_key(name, KeyKind::Param, span());
            scope.bind(name, key);
            keys.push(key);
        }
        Ok(keys)
    }

    fn seal_formals(
        decls: &mut Declarations<Self>,
        class: ClassId,
        decl: &ClassDecl,
        formals: &[KeyId],
        _scope: &Scope<KeyId>,
    ) -> Result<(), DriverError> {
        if formals.is_empty() {
            return Ok(());
        }
        decls.ts.seal_key_params(class, formals, span());
        if decl.tracked.is_some() {
            decls.ts.mark_tracked(class, formals[0]);
        }
        Ok(())
    }

    fn formal_type(_ts: &mut KeyTs, _formal: KeyId) -> Option<TypeId> {
        None
    }

    fn instantiate_named(
        decls: &mut Declarations<Self>,
        class: ClassId,
        named: &NamedType,
        scope: &Scope<KeyId>,
    ) -> Result<TypeId, DriverError> {
        if !named.args.is_empty() {
            return Err(DriverError::unsupported("type arguments", Self::NAME));
        }
        let mut actuals = Vec::with_capacity(named.keys.len() + 1);
        for name in named.tracked.iter().chain(&named.keys) {
            actuals.push(resolve_key(decls, scope, name, KeyKind::Instance));
        }
        let Some(pclass) = decls.ts.pclass_of(class) else {
            return Err(SemanticError::ArityMismatch {
                class: decls.ts.class(class).full_name.clone(),
                expected: 0,
                found: actuals.len(),
                span: span().into(),
            }
            .into());
        };
        Ok(decls.ts.instantiate(span(), pclass, &actuals)?)
    }

    fn wildcard(_decls: &mut Declarations<Self>, _bound: Option<(BoundKind, TypeId)>) -> Result<TypeId, DriverError> {
        Err(DriverError::unsupported("wildcards", Self::NAME))
    }

    fn method_ext(
        _decls: &mut Declarations<Self>,
        decl: &MethodDecl,
        _scope: &mut Scope<KeyId>,
    ) -> Result<KeyedSignature, DriverError> {
        if !decl.type_params.is_empty() {
            return Err(DriverError::unsupported("generic methods", Self::NAME));
        }
        Ok(KeyedSignature::default())
    }

    fn procedure_registered(
        decls: &mut Declarations<Self>,
        target: ProcRef,
        decl: &ProcDecl,
        throws: &[TypeId],
        scope: &Scope<KeyId>,
    ) -> Result<(), DriverError> {
        let entry = decl.entry.as_deref().map(|names| key_set(decls, scope, names));
        let returns = decl.exit.as_deref().map(|names| key_set(decls, scope, names));
        let mut constraints = Vec::with_capacity(throws.len());
        for (throw, &ty) in decl.throws.iter().zip(throws) {
            let keys = throw.keys.as_deref().map(|names| key_set(decls, scope, names));
            constraints.push(ThrowConstraint::new(ty, keys, span()));
        }
        let target = match target {
            ProcRef::Method(id) => ProcTarget::Method(id),
            ProcRef::Constructor(id) => ProcTarget::Constructor(id),
        };
        let annotations = KeyAnnotations {
            entry,
            returns,
            throws: constraints,
        };
        decls.pending.push(KeyedProcedure::new(target, annotations, span()));
        Ok(())
    }

    /// Build every procedure, retry disambiguation while it makes progress,
    /// then run the per-procedure and override checks.
    fn finish(decls: &mut Declarations<Self>) -> Result<(), DriverError> {
        let mut procs = std::mem::take(&mut decls.pending);
        for proc in &mut procs {
            proc.build_types(&mut decls.ts);
        }

        let mut waiting: Vec<usize> = (0..procs.len()).collect();
        loop {
            let before = waiting.len();
            let mut retry = Vec::new();
            for index in waiting {
                match procs[index].disambiguate(&mut decls.ts) {
                    Ok(true) => {}
                    Ok(false) => retry.push(index),
                    Err(error) => decls.push_error(error),
                }
            }
            waiting = retry;
            if waiting.is_empty() || waiting.len() == before {
                break;
            }
            tracing::debug!(remaining = waiting.len(), "retrying key disambiguation");
        }
        for &index in &waiting {
            for name in procs[index].unresolved_keys(&decls.ts) {
                decls.push_error(SemanticError::UnresolvedKey {
                    name,
                    span: span().into(),
                });
            }
        }

        for proc in &procs {
            if proc.state() != ProcState::Disambiguated {
                continue;
            }
            if let Err(error) = proc.check(&decls.ts) {
                decls.push_error(error);
            }
            let ProcTarget::Method(id) = proc.target() else {
                continue;
            };
            let method = decls.ts.table().method(id).clone();
            for overridden in overridden_methods(&mut decls.ts, &method) {
                if let Err(error) = check_override(&decls.ts, &method, &overridden) {
                    decls.push_error(error);
                }
            }
        }
        decls.pending = procs;
        Ok(())
    }

    /// Actuals are key names; names not yet declared become instance keys.
    /// Actuals are key names; unknown ones become instance keys when the
    /// type is resolved.
    fn instance_expr(
        _decls: &mut Declarations<Self>,
        class: &str,
        actuals: &[String],
    ) -> Result<NamedType, DriverError> {
        Ok(NamedType {
            keys: actuals.to_vec(),
            ..NamedType::plain(class)
        })
    }

    fn describe_ext(ts: &KeyTs, ext: &KeyedSignature) -> (String, String) {
        let mut suffix = format!(
            "  entry {} return {}",
            ts.display_key_set(&ext.entry_keys),
            ts.display_key_set(&ext.return_keys_or_empty())
        );
        for constraint in &ext.throw_constraints {
            suffix.push_str(&format!(
                " on {} {}",
                ts.display_type(constraint.throw_type),
                ts.display_key_set(&constraint.keys_or_empty())
            ));
        }
        (String::new(), suffix)
    }
}
