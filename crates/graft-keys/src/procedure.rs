// procedure.rs
//
// Key checking for method and constructor declarations.
//
// A declaration moves Unbuilt -> TypesBuilt -> Disambiguated. Building
// fills in default key sets; disambiguation resolves keys that were named
// before they were declared and may be retried until that succeeds.

use graft_identity::{ClassId, ConstructorId, MethodId, Span};
use graft_types::{InternalError, ProcedureInstance, SemanticError, TypeIdVec};

use crate::dialect::{KeyTs, KeyTypeSystemExt, KeyedSignature};
use crate::key_set::KeySet;
use crate::throw_constraint::ThrowConstraint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcTarget {
    Method(MethodId),
    Constructor(ConstructorId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcState {
    Unbuilt,
    TypesBuilt,
    Disambiguated,
}

impl ProcState {
    pub fn name(self) -> &'static str {
        match self {
            ProcState::Unbuilt => "unbuilt",
            ProcState::TypesBuilt => "types-built",
            ProcState::Disambiguated => "disambiguated",
        }
    }
}

/// Key sets as written on a declaration. Absent sets take defaults.
#[derive(Debug, Clone, Default)]
pub struct KeyAnnotations {
    pub entry: Option<KeySet>,
    pub returns: Option<KeySet>,
    pub throws: Vec<ThrowConstraint>,
}

#[derive(Debug, Clone)]
pub struct KeyedProcedure {
    target: ProcTarget,
    annotations: KeyAnnotations,
    state: ProcState,
    span: Span,
}

impl KeyedProcedure {
    pub fn new(target: ProcTarget, annotations: KeyAnnotations, span: Span) -> Self {
        Self {
            target,
            annotations,
            state: ProcState::Unbuilt,
            span,
        }
    }

    pub fn target(&self) -> ProcTarget {
        self.target
    }

    pub fn state(&self) -> ProcState {
        self.state
    }

    fn expect_state(&self, expected: ProcState) {
        if self.state != expected {
            InternalError::InvalidState {
                what: format!("{:?}", self.target),
                expected: expected.name(),
                found: self.state.name(),
            }
            .raise()
        }
    }

    fn declaring_class(&self, ts: &KeyTs) -> ClassId {
        let container = match self.target {
            ProcTarget::Method(id) => ts.table().method(id).container,
            ProcTarget::Constructor(id) => ts.table().constructor(id).container,
        };
        match ts.class_of(container) {
            Some(class) => class,
            None => InternalError::InvalidState {
                what: format!("container of {:?}", self.target),
                expected: "class",
                found: "non-class",
            }
            .raise(),
        }
    }

    fn signature<'a>(&self, ts: &'a KeyTs) -> &'a KeyedSignature {
        match self.target {
            ProcTarget::Method(id) => &ts.table().method(id).ext,
            ProcTarget::Constructor(id) => &ts.table().constructor(id).ext,
        }
    }

    fn store(&self, ts: &mut KeyTs, sig: KeyedSignature) {
        let throw_types: TypeIdVec = sig.throw_constraints.iter().map(|c| c.throw_type).collect();
        match self.target {
            ProcTarget::Method(id) => {
                let method = ts.table_mut().method_mut(id);
                method.ext = sig;
                method.set_throw_types(throw_types);
            }
            ProcTarget::Constructor(id) => {
                let ctor = ts.table_mut().constructor_mut(id);
                ctor.ext = sig;
                ctor.set_throw_types(throw_types);
            }
        }
    }

    /// Fill in default key sets: entry keys default to empty, return keys to
    /// empty (the class key for constructors of tracked classes) and each
    /// throw constraint's keys to the entry keys.
    #[tracing::instrument(skip(self, ts), fields(target = ?self.target))]
    pub fn build_types(&mut self, ts: &mut KeyTs) {
        self.expect_state(ProcState::Unbuilt);
        let class_key = ts.class_key(self.declaring_class(ts));

        let entry = self.annotations.entry.clone().unwrap_or_default();
        let returns = match (&self.annotations.returns, self.target, class_key) {
            (Some(keys), _, _) => keys.clone(),
            (None, ProcTarget::Constructor(_), Some(key)) => KeySet::singleton(key),
            (None, _, _) => KeySet::empty(),
        };
        let throw_constraints = self
            .annotations
            .throws
            .iter()
            .map(|c| ThrowConstraint {
                keys: Some(c.keys.clone().unwrap_or_else(|| entry.clone())),
                ..c.clone()
            })
            .collect();

        self.store(
            ts,
            KeyedSignature {
                entry_keys: entry,
                return_keys: Some(returns),
                throw_constraints,
            },
        );
        self.state = ProcState::TypesBuilt;
    }

    /// Resolve keys named before their declaration. Returns `Ok(false)` when
    /// some key is still unknown; the caller retries on a later pass.
    #[tracing::instrument(skip(self, ts), fields(target = ?self.target))]
    pub fn disambiguate(&mut self, ts: &mut KeyTs) -> Result<bool, SemanticError> {
        if self.state == ProcState::Disambiguated {
            return Ok(true);
        }
        self.expect_state(ProcState::TypesBuilt);

        let sig = self.signature(ts).clone();
        let resolve = |keys: &KeySet| -> Option<KeySet> {
            if keys.iter().all(|k| ts.keys().resolve(k).is_some()) {
                Some(keys.map(|k| ts.keys().resolve(k).unwrap_or(k)))
            } else {
                None
            }
        };

        let Some(entry_keys) = resolve(&sig.entry_keys) else {
            tracing::debug!("entry keys not yet resolved");
            return Ok(false);
        };
        let return_keys = match &sig.return_keys {
            Some(keys) => match resolve(keys) {
                Some(keys) => Some(keys),
                None => return Ok(false),
            },
            None => None,
        };
        let mut throw_constraints = Vec::with_capacity(sig.throw_constraints.len());
        for c in &sig.throw_constraints {
            if !ts.is_canonical(c.throw_type) {
                return Ok(false);
            }
            let keys = match &c.keys {
                Some(keys) => match resolve(keys) {
                    Some(keys) => keys,
                    None => return Ok(false),
                },
                None => entry_keys.clone(),
            };
            throw_constraints.push(ThrowConstraint {
                keys: Some(keys),
                ..c.clone()
            });
        }

        let class = self.declaring_class(ts);
        let resolved = KeyedSignature {
            entry_keys,
            return_keys,
            throw_constraints,
        };
        let missing = match (self.target, ts.class_key(class)) {
            (ProcTarget::Constructor(_), Some(key))
                if !resolved.return_keys_or_empty().contains(key) =>
            {
                Some(key)
            }
            _ => None,
        };

        self.store(ts, resolved);
        self.state = ProcState::Disambiguated;

        if let Some(key) = missing {
            return Err(SemanticError::ConstructorMissingKey {
                class: ts.class(class).full_name.clone(),
                key: ts.key_name(key).to_string(),
                span: self.span.into(),
            });
        }
        Ok(true)
    }

    /// Keys still unresolved, for reporting once no further pass can help.
    pub fn unresolved_keys(&self, ts: &KeyTs) -> Vec<String> {
        let sig = self.signature(ts);
        let throw_keys = sig.throw_constraints.iter().filter_map(|c| c.keys.as_ref());
        let mut names: Vec<String> = std::iter::once(&sig.entry_keys)
            .chain(sig.return_keys.as_ref())
            .chain(throw_keys)
            .flat_map(|keys| keys.iter())
            .filter(|&k| ts.keys().resolve(k).is_none())
            .map(|k| ts.key_name(k).to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// A method may not acquire the key of its own class, and a constructor
    /// may not hold it on entry.
    pub fn check(&self, ts: &KeyTs) -> Result<(), SemanticError> {
        self.expect_state(ProcState::Disambiguated);
        let Some(key) = ts.class_key(self.declaring_class(ts)) else {
            return Ok(());
        };
        let sig = self.signature(ts);
        if let ProcTarget::Constructor(_) = self.target {
            if sig.entry_keys.contains(key) {
                return Err(SemanticError::ConstructorHoldsKeyOnEntry {
                    key: ts.key_name(key).to_string(),
                    span: self.span.into(),
                });
            }
            return Ok(());
        }
        if !sig.entry_keys.contains(key) && sig.return_keys_or_empty().contains(key) {
            return Err(SemanticError::CannotAddKey {
                key: ts.key_name(key).to_string(),
                span: self.span.into(),
            });
        }
        Ok(())
    }
}
