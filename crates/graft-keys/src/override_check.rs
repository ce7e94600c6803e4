// override_check.rs
//
// Keyed overriding. An overriding method may hold extra keys on entry, and
// every exit path must pass exactly those extra keys through.

use std::rc::Rc;

use graft_types::{MethodInstance, SemanticError};

use crate::dialect::{KeyTs, KeyTypeSystemExt, KeyedSignature};

type KeyedMethod = MethodInstance<KeyedSignature>;

fn signature(ts: &KeyTs, method: &KeyedMethod) -> String {
    format!(
        "{}({})",
        ts.resolve(method.name),
        ts.display_types(&method.formal_types)
    )
}

fn violation(ts: &KeyTs, sub: &KeyedMethod, sup: &KeyedMethod, reason: String) -> SemanticError {
    SemanticError::OverrideViolation {
        method: signature(ts, sub),
        container: ts.display_type(sub.container),
        overridden: signature(ts, sup),
        overridden_container: ts.display_type(sup.container),
        reason,
        span: sub.span.into(),
    }
}

/// Check that `sub` may override `sup`.
///
/// With `new_keys` the keys `sub` holds on entry beyond those of `sup`:
/// - `sub`'s return keys must equal `sup`'s return keys plus `new_keys`;
/// - a throw constraint whose type `sup` also constrains must hold that
///   constraint's keys plus `new_keys`;
/// - any other throw constraint must hold exactly `new_keys`.
pub fn check_override(ts: &KeyTs, sub: &KeyedMethod, sup: &KeyedMethod) -> Result<(), SemanticError> {
    let sub_sig = &sub.ext;
    let sup_sig = &sup.ext;

    let new_keys = sub_sig.entry_keys.remove_all(&sup_sig.entry_keys);
    let expected_return = sup_sig.return_keys_or_empty().add_all(&new_keys);
    if sub_sig.return_keys_or_empty() != expected_return {
        return Err(violation(
            ts,
            sub,
            sup,
            format!(
                "returns holding {}, expected {}",
                ts.display_key_set(&sub_sig.return_keys_or_empty()),
                ts.display_key_set(&expected_return)
            ),
        ));
    }

    for constraint in &sub_sig.throw_constraints {
        let matching = sup_sig
            .throw_constraints
            .iter()
            .find(|c| ts.type_equals(c.throw_type, constraint.throw_type));
        let expected = match matching {
            Some(super_constraint) => super_constraint.keys_or_empty().add_all(&new_keys),
            None => new_keys.clone(),
        };
        if constraint.keys_or_empty() != expected {
            return Err(violation(
                ts,
                sub,
                sup,
                format!(
                    "throws {} holding {}, expected {}",
                    ts.display_type(constraint.throw_type),
                    ts.display_key_set(&constraint.keys_or_empty()),
                    ts.display_key_set(&expected)
                ),
            ));
        }
    }

    tracing::trace!(
        method = %signature(ts, sub),
        overridden = %signature(ts, sup),
        "override ok"
    );
    Ok(())
}

pub fn can_override(ts: &KeyTs, sub: &KeyedMethod, sup: &KeyedMethod) -> bool {
    check_override(ts, sub, sup).is_ok()
}

/// Methods of proper supertypes of `method`'s container with the same name
/// and formal types, nearest first.
pub fn overridden_methods(ts: &mut KeyTs, method: &KeyedMethod) -> Vec<Rc<KeyedMethod>> {
    let ancestors = ts.ancestors(method.container);
    let mut result = Vec::new();
    for ancestor in ancestors.into_iter().skip(1) {
        for candidate in ts.methods(ancestor) {
            let same_formals = candidate.formal_types.len() == method.formal_types.len()
                && candidate
                    .formal_types
                    .iter()
                    .zip(method.formal_types.iter())
                    .all(|(&a, &b)| ts.type_equals(a, b));
            if candidate.name == method.name && same_formals {
                result.push(candidate);
            }
        }
    }
    result
}
