// key.rs
//
// Capability keys and the table that owns them.

use rustc_hash::FxHashMap;

use graft_identity::{ClassId, KeyId, Span, Symbol};

/// What a key stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// A formal key of a parametric class.
    Param,
    /// A concrete key bound to one object.
    Instance,
    /// A name not yet resolved to either of the above. Never canonical.
    Unknown,
}

impl KeyKind {
    pub fn name(self) -> &'static str {
        match self {
            KeyKind::Param => "parameter",
            KeyKind::Instance => "instance",
            KeyKind::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDef {
    pub id: KeyId,
    pub name: Symbol,
    pub kind: KeyKind,
    pub span: Span,
}

impl KeyDef {
    pub fn is_canonical(&self) -> bool {
        self.kind != KeyKind::Unknown
    }
}

/// Keys of a type system, and the key each tracked class carries.
#[derive(Debug, Default)]
pub struct KeyTable {
    keys: Vec<KeyDef>,
    /// Keys by name, canonical kinds only. Later declarations shadow earlier ones.
    by_name: FxHashMap<Symbol, KeyId>,
    class_keys: FxHashMap<ClassId, KeyId>,
}

impl KeyTable {
    pub(crate) fn declare(&mut self, name: Symbol, kind: KeyKind, span: Span) -> KeyId {
        let id = KeyId::new(self.keys.len() as u32);
        self.keys.push(KeyDef {
            id,
            name,
            kind,
            span,
        });
        if kind != KeyKind::Unknown {
            self.by_name.insert(name, id);
        }
        id
    }

    pub fn get(&self, id: KeyId) -> &KeyDef {
        &self.keys[id.index() as usize]
    }

    pub fn kind(&self, id: KeyId) -> KeyKind {
        self.get(id).kind
    }

    pub fn is_canonical(&self, id: KeyId) -> bool {
        self.get(id).is_canonical()
    }

    /// The canonical key an unknown key now names, if one has been declared.
    /// Canonical keys resolve to themselves.
    pub fn resolve(&self, id: KeyId) -> Option<KeyId> {
        let def = self.get(id);
        match def.kind {
            KeyKind::Unknown => self.by_name.get(&def.name).copied(),
            _ => Some(id),
        }
    }

    pub fn lookup(&self, name: Symbol) -> Option<KeyId> {
        self.by_name.get(&name).copied()
    }

    pub(crate) fn set_class_key(&mut self, class: ClassId, key: KeyId) {
        self.class_keys.insert(class, key);
    }

    pub fn class_key(&self, class: ClassId) -> Option<KeyId> {
        self.class_keys.get(&class).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
