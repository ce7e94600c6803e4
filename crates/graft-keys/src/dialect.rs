// dialect.rs
//
// The key dialect: formals and actuals are keys, procedures carry key sets.

use graft_identity::{ClassId, KeyId, PClassId, Span, SubstId};
use graft_types::{
    ConstructorInstance, Dialect, MethodInstance, ParamTypeSystem, SemanticError, SubstCx,
    SubstMap, TypeId,
};

use crate::key::{KeyKind, KeyTable};
use crate::key_set::KeySet;
use crate::throw_constraint::ThrowConstraint;

#[derive(Debug)]
pub struct KeyDialect;

pub type KeyTs = ParamTypeSystem<KeyDialect>;

/// Key sets a procedure holds on entry, on normal return and per thrown type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedSignature {
    pub entry_keys: KeySet,
    /// `None` until types are built.
    pub return_keys: Option<KeySet>,
    pub throw_constraints: Vec<ThrowConstraint>,
}

impl KeyedSignature {
    pub fn return_keys_or_empty(&self) -> KeySet {
        self.return_keys.clone().unwrap_or_default()
    }

    pub fn is_canonical(&self, ts: &KeyTs) -> bool {
        self.entry_keys.is_canonical(ts.state())
            && self
                .return_keys
                .as_ref()
                .is_none_or(|keys| keys.is_canonical(ts.state()))
            && self.throw_constraints.iter().all(|c| c.is_canonical(ts))
    }
}

fn subst_key(cx: &SubstCx<'_, KeyDialect>, key: KeyId) -> KeyId {
    cx.lookup(key).unwrap_or(key)
}

fn subst_key_set(cx: &SubstCx<'_, KeyDialect>, keys: &KeySet) -> KeySet {
    keys.map(|key| subst_key(cx, key))
}

fn subst_signature(cx: &mut SubstCx<'_, KeyDialect>, sig: &KeyedSignature) -> KeyedSignature {
    KeyedSignature {
        entry_keys: subst_key_set(cx, &sig.entry_keys),
        return_keys: sig.return_keys.as_ref().map(|keys| subst_key_set(cx, keys)),
        throw_constraints: sig
            .throw_constraints
            .iter()
            .map(|c| ThrowConstraint {
                throw_type: cx.subst_type(c.throw_type),
                keys: c.keys.as_ref().map(|keys| subst_key_set(cx, keys)),
                span: c.span,
            })
            .collect(),
    }
}

impl Dialect for KeyDialect {
    type Formal = KeyId;
    type Actual = KeyId;
    type ProcExt = KeyedSignature;
    type State = KeyTable;

    const NAME: &'static str = "keys";

    fn formal_as_actual(_ts: &mut KeyTs, formal: KeyId) -> KeyId {
        formal
    }

    fn subst_actual(cx: &mut SubstCx<'_, Self>, actual: KeyId) -> KeyId {
        subst_key(cx, actual)
    }

    /// Built-in classes carry no keys.
    fn wraps_class(ts: &KeyTs, class: ClassId) -> bool {
        !ts.is_prelude_class(class)
    }

    fn actual_is_canonical(ts: &KeyTs, actual: KeyId) -> bool {
        ts.state().is_canonical(actual)
    }

    fn subst_method(
        cx: &mut SubstCx<'_, Self>,
        method: &MethodInstance<KeyedSignature>,
    ) -> MethodInstance<KeyedSignature> {
        let mut result = cx.base_subst_method(method);
        result.ext = subst_signature(cx, &method.ext);
        result
    }

    fn subst_constructor(
        cx: &mut SubstCx<'_, Self>,
        ctor: &ConstructorInstance<KeyedSignature>,
    ) -> ConstructorInstance<KeyedSignature> {
        let mut result = cx.base_subst_constructor(ctor);
        result.ext = subst_signature(cx, &ctor.ext);
        result
    }

    fn display_formal(ts: &KeyTs, formal: KeyId) -> String {
        ts.key_name(formal).to_string()
    }

    fn display_actual(ts: &KeyTs, actual: KeyId) -> String {
        ts.key_name(actual).to_string()
    }

    /// `tracked(k) Name[other actuals]`
    fn display_instance(ts: &KeyTs, class: ClassId, map: &SubstMap<Self>) -> String {
        let class_key = ts.state().class_key(class);
        let mut out = String::new();
        if let Some(key) = class_key.and_then(|k| map.get(&k)) {
            out.push_str(&format!("tracked({}) ", ts.key_name(*key)));
        }
        out.push_str(ts.resolve(ts.class(class).name));
        let others: Vec<&str> = map
            .iter()
            .filter(|(formal, _)| Some(**formal) != class_key)
            .map(|(_, actual)| ts.key_name(*actual))
            .collect();
        if !others.is_empty() {
            out.push_str(&format!("[{}]", others.join(", ")));
        }
        out
    }
}

/// Key operations on a key-dialect type system.
pub trait KeyTypeSystemExt {
    fn keys(&self) -> &KeyTable;

    fn declare_key(&mut self, name: &str, kind: KeyKind, span: Span) -> KeyId;

    fn instance_key(&mut self, name: &str, span: Span) -> KeyId {
        self.declare_key(name, KeyKind::Instance, span)
    }

    /// A key named before its declaration has been seen.
    fn unknown_key(&mut self, name: &str, span: Span) -> KeyId {
        self.declare_key(name, KeyKind::Unknown, span)
    }

    fn key_name(&self, key: KeyId) -> &str;

    fn display_key_set(&self, keys: &KeySet) -> String;

    /// Make `class` parametric over the already declared parameter `keys`.
    fn seal_key_params(&mut self, class: ClassId, keys: &[KeyId], span: Span) -> PClassId;

    /// Make `class` parametric over fresh parameter keys named `names`.
    fn declare_key_params(&mut self, class: ClassId, names: &[&str], span: Span) -> (PClassId, Vec<KeyId>) {
        let keys: Vec<KeyId> = names
            .iter()
            .map(|name| self.declare_key(name, KeyKind::Param, span))
            .collect();
        (self.seal_key_params(class, &keys, span), keys)
    }

    /// Instances of `class` carry `key`, one of its parameter keys.
    fn mark_tracked(&mut self, class: ClassId, key: KeyId);

    /// Make `class` tracked: parametric over one key that its instances carry.
    fn declare_tracked(&mut self, class: ClassId, key_name: &str, span: Span) -> (PClassId, KeyId) {
        let (pclass, keys) = self.declare_key_params(class, &[key_name], span);
        self.mark_tracked(class, keys[0]);
        (pclass, keys[0])
    }

    fn class_key(&self, class: ClassId) -> Option<KeyId>;

    /// `tracked(key) class`
    fn tracked(&mut self, span: Span, class: ClassId, key: KeyId) -> Result<TypeId, SemanticError>;

    fn subst_key_set(&mut self, subst: SubstId, keys: &KeySet) -> KeySet;
}

impl KeyTypeSystemExt for KeyTs {
    fn keys(&self) -> &KeyTable {
        self.state()
    }

    fn declare_key(&mut self, name: &str, kind: KeyKind, span: Span) -> KeyId {
        let sym = self.intern(name);
        let key = self.state_mut().declare(sym, kind, span);
        tracing::trace!(name, kind = kind.name(), ?key, "declare key");
        key
    }

    fn key_name(&self, key: KeyId) -> &str {
        self.resolve(self.state().get(key).name)
    }

    fn display_key_set(&self, keys: &KeySet) -> String {
        let names: Vec<&str> = keys.iter().map(|k| self.key_name(k)).collect();
        format!("{{{}}}", names.join(", "))
    }

    fn seal_key_params(&mut self, class: ClassId, keys: &[KeyId], span: Span) -> PClassId {
        let clazz = self.class(class).ty;
        let mut builder = self.mutable_pclass(clazz, span);
        for &key in keys {
            builder.push_formal(key);
        }
        builder.seal(self)
    }

    fn mark_tracked(&mut self, class: ClassId, key: KeyId) {
        self.state_mut().set_class_key(class, key);
    }

    fn class_key(&self, class: ClassId) -> Option<KeyId> {
        self.state().class_key(class)
    }

    fn tracked(&mut self, span: Span, class: ClassId, key: KeyId) -> Result<TypeId, SemanticError> {
        let Some(pclass) = self.pclass_of(class) else {
            return Err(SemanticError::ArityMismatch {
                class: self.class(class).full_name.clone(),
                expected: 0,
                found: 1,
                span: span.into(),
            });
        };
        self.instantiate(span, pclass, &[key])
    }

    fn subst_key_set(&mut self, subst: SubstId, keys: &KeySet) -> KeySet {
        let map = self.substitution(subst).substitutions();
        keys.map(|key| map.get(&key).copied().unwrap_or(key))
    }
}
