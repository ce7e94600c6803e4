// throw_constraint.rs

use graft_identity::Span;
use graft_types::{InternalError, ProcedureInstance, TypeId, TypeIdVec};

use crate::dialect::{KeyTs, KeyedSignature};
use crate::key_set::KeySet;

/// The keys held when a procedure exits by throwing `throw_type`.
/// `keys` is `None` until it defaults to the procedure's entry keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowConstraint {
    pub throw_type: TypeId,
    pub keys: Option<KeySet>,
    pub span: Span,
}

impl ThrowConstraint {
    pub fn new(throw_type: TypeId, keys: Option<KeySet>, span: Span) -> Self {
        Self {
            throw_type,
            keys,
            span,
        }
    }

    pub fn keys_or_empty(&self) -> KeySet {
        self.keys.clone().unwrap_or_default()
    }

    pub fn is_canonical(&self, ts: &KeyTs) -> bool {
        ts.is_canonical(self.throw_type)
            && self
                .keys
                .as_ref()
                .is_some_and(|keys| keys.is_canonical(ts.state()))
    }
}

/// Replace the throw types of a keyed procedure, keeping each constraint's
/// keys. The new list must line up with the existing constraints.
pub fn set_keyed_throw_types<P>(procedure: &mut P, throw_types: TypeIdVec)
where
    P: ProcedureInstance<Ext = KeyedSignature>,
{
    let constraints = &mut procedure.ext_mut().throw_constraints;
    if constraints.len() != throw_types.len() {
        InternalError::LengthMismatch {
            what: "throw types of keyed procedure",
            expected: constraints.len(),
            found: throw_types.len(),
        }
        .raise()
    }
    for (constraint, &ty) in constraints.iter_mut().zip(throw_types.iter()) {
        constraint.throw_type = ty;
    }
    procedure.set_throw_types(throw_types);
}
