// key_set.rs
//
// Immutable sets of keys. Updates return a new set, or the same shared set
// when nothing changes.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use graft_identity::KeyId;

use crate::key::KeyTable;

#[derive(Clone, Default)]
pub struct KeySet {
    keys: Rc<BTreeSet<KeyId>>,
}

impl KeySet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn singleton(key: KeyId) -> Self {
        Self::from_set(BTreeSet::from([key]))
    }

    fn from_set(keys: BTreeSet<KeyId>) -> Self {
        Self {
            keys: Rc::new(keys),
        }
    }

    /// Same underlying set object, not just equal contents.
    pub fn ptr_eq(a: &KeySet, b: &KeySet) -> bool {
        Rc::ptr_eq(&a.keys, &b.keys)
    }

    pub fn contains(&self, key: KeyId) -> bool {
        self.keys.contains(&key)
    }

    pub fn contains_all(&self, other: &KeySet) -> bool {
        other.keys.is_subset(&self.keys)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = KeyId> + '_ {
        self.keys.iter().copied()
    }

    pub fn add(&self, key: KeyId) -> KeySet {
        if self.contains(key) {
            return self.clone();
        }
        let mut keys = (*self.keys).clone();
        keys.insert(key);
        Self::from_set(keys)
    }

    pub fn remove(&self, key: KeyId) -> KeySet {
        if !self.contains(key) {
            return self.clone();
        }
        let mut keys = (*self.keys).clone();
        keys.remove(&key);
        Self::from_set(keys)
    }

    pub fn add_all(&self, other: &KeySet) -> KeySet {
        if self.contains_all(other) {
            return self.clone();
        }
        Self::from_set(self.keys.union(&other.keys).copied().collect())
    }

    pub fn remove_all(&self, other: &KeySet) -> KeySet {
        if self.keys.is_disjoint(&other.keys) {
            return self.clone();
        }
        Self::from_set(self.keys.difference(&other.keys).copied().collect())
    }

    pub fn retain_all(&self, other: &KeySet) -> KeySet {
        if other.contains_all(self) {
            return self.clone();
        }
        Self::from_set(self.keys.intersection(&other.keys).copied().collect())
    }

    /// Apply `f` to every key. Returns this set when no key changes.
    pub fn map(&self, mut f: impl FnMut(KeyId) -> KeyId) -> KeySet {
        let mapped: BTreeSet<KeyId> = self.keys.iter().map(|&k| f(k)).collect();
        if mapped == *self.keys {
            self.clone()
        } else {
            Self::from_set(mapped)
        }
    }

    pub fn is_canonical(&self, table: &KeyTable) -> bool {
        self.iter().all(|key| table.is_canonical(key))
    }
}

impl FromIterator<KeyId> for KeySet {
    fn from_iter<I: IntoIterator<Item = KeyId>>(iter: I) -> Self {
        Self::from_set(iter.into_iter().collect())
    }
}

impl PartialEq for KeySet {
    fn eq(&self, other: &Self) -> bool {
        KeySet::ptr_eq(self, other) || self.keys == other.keys
    }
}

impl Eq for KeySet {}

impl Hash for KeySet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.keys.hash(state);
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys.iter()).finish()
    }
}
