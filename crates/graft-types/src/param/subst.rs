// param/subst.rs
//
// A substitution: formal-to-actual map plus its memo tables.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use graft_identity::{ConstructorId, FieldId, MethodId, SubstId};

use super::cache::{CacheStats, SubstCache};
use crate::class_table::{ConstructorInstance, FieldInstance, MethodInstance};
use crate::dialect::{Dialect, SubstMap};
use crate::type_arena::TypeId;

/// Members are cached by declaration id and the container they were read
/// from, since one substitution may see the same declaration through
/// several views.
pub(crate) type MemberKey<Id> = (Id, TypeId);

/// A substitution.
///
/// Substitutions created by callers are *roots*. Substitutions derived from a
/// root while composing or restricting maps are memoized on the root by map,
/// so every path through one root that reaches the same map shares one cache
/// and therefore one substituted view per type.
pub struct Subst<D: Dialect> {
    id: SubstId,
    root: SubstId,
    map: SubstMap<D>,
    pub(crate) types: SubstCache<TypeId, TypeId>,
    pub(crate) fields: SubstCache<MemberKey<FieldId>, Rc<FieldInstance>>,
    pub(crate) methods: SubstCache<MemberKey<MethodId>, Rc<MethodInstance<D::ProcExt>>>,
    pub(crate) constructors:
        SubstCache<MemberKey<ConstructorId>, Rc<ConstructorInstance<D::ProcExt>>>,
    /// Only populated on roots.
    pub(crate) derived: FxHashMap<SubstMap<D>, SubstId>,
}

impl<D: Dialect> Subst<D> {
    pub(crate) fn new(id: SubstId, root: SubstId, map: SubstMap<D>) -> Self {
        Self {
            id,
            root,
            map,
            types: SubstCache::new(),
            fields: SubstCache::new(),
            methods: SubstCache::new(),
            constructors: SubstCache::new(),
            derived: FxHashMap::default(),
        }
    }

    pub fn id(&self) -> SubstId {
        self.id
    }

    pub fn root(&self) -> SubstId {
        self.root
    }

    pub fn is_root(&self) -> bool {
        self.id == self.root
    }

    pub fn substitutions(&self) -> &SubstMap<D> {
        &self.map
    }

    pub fn get(&self, formal: D::Formal) -> Option<D::Actual> {
        self.map.get(&formal).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (D::Formal, D::Actual)> + '_ {
        self.map.iter().map(|(f, a)| (*f, *a))
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.types
            .stats()
            .merge(self.fields.stats())
            .merge(self.methods.stats())
            .merge(self.constructors.stats())
    }
}

/// Substitutions are equal when their maps are; caches never take part.
impl<D: Dialect> PartialEq for Subst<D> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<D: Dialect> Eq for Subst<D> {}

impl<D: Dialect> fmt::Debug for Subst<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subst")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("map", &self.map)
            .finish_non_exhaustive()
    }
}
