// src/manifest/describe.rs
//! Text listing of a class type's members, as seen through its substitution.

use graft_types::{ParamTypeSystem, TypeId};

use super::build::ManifestDialect;

fn throws_clause<D: ManifestDialect>(ts: &ParamTypeSystem<D>, throw_types: &[TypeId]) -> String {
    if throw_types.is_empty() {
        String::new()
    } else {
        format!(" throws {}", ts.display_types(throw_types))
    }
}

/// One line per fact: the type, its supertypes, then fields, methods and
/// constructors in declaration order.
pub fn describe_instance<D: ManifestDialect>(ts: &mut ParamTypeSystem<D>, ty: TypeId) -> Vec<String> {
    let mut lines = vec![format!("type {}", ts.display_type(ty))];
    if let Some(outer) = ts.outer(ty) {
        lines.push(format!("outer {}", ts.display_type(outer)));
    }
    if let Some(super_type) = ts.super_type(ty) {
        lines.push(format!("extends {}", ts.display_type(super_type)));
    }
    for interface in ts.interfaces(ty) {
        lines.push(format!("implements {}", ts.display_type(interface)));
    }
    for field in ts.fields(ty) {
        lines.push(format!(
            "field {}: {}",
            ts.resolve(field.name),
            ts.display_type(field.ty)
        ));
    }
    for method in ts.methods(ty) {
        let (prefix, suffix) = D::describe_ext(ts, &method.ext);
        lines.push(format!(
            "method {prefix}{}({}): {}{}{suffix}",
            ts.resolve(method.name),
            ts.display_types(&method.formal_types),
            ts.display_type(method.return_type),
            throws_clause(ts, &method.throw_types),
        ));
    }
    for ctor in ts.constructors(ty) {
        let (prefix, suffix) = D::describe_ext(ts, &ctor.ext);
        lines.push(format!(
            "constructor {prefix}({}){}{suffix}",
            ts.display_types(&ctor.formal_types),
            throws_clause(ts, &ctor.throw_types),
        ));
    }
    lines
}
