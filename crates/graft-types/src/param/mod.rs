// param/mod.rs
//
// The parametric type system: parametric classes, substitutions and the
// substituted class views they produce.

mod cache;
mod instantiate;
mod pclass;
mod subst;
mod subst_class;
mod substitutor;
#[cfg(test)]
mod tests;

pub use cache::{CacheStats, SubstCache};
pub use pclass::{PClass, PClassBuilder};
pub use subst::Subst;
pub use subst_class::SubstClassData;
pub use substitutor::SubstCx;

use std::rc::Rc;

use graft_identity::{ClassId, Interner, PClassId, Span, SubstClassId, SubstId, Symbol};

use crate::class_table::{ClassDef, ClassTable, ConstructorInstance, FieldInstance, MethodInstance};
use crate::dialect::{Dialect, SubstMap};
use crate::type_arena::{TypeArena, TypeId, TypeIdVec};
use crate::type_system::{Prelude, TypeVarDef};

/// A type system extended by the dialect `D`.
///
/// Owns every type, class, parametric class and substitution. All
/// substitution goes through `&mut self` since caches fill lazily.
pub struct ParamTypeSystem<D: Dialect> {
    pub(crate) interner: Interner,
    pub(crate) arena: TypeArena,
    pub(crate) table: ClassTable<D::ProcExt>,
    pub(crate) type_vars: Vec<TypeVarDef>,
    pub(crate) pclasses: Vec<PClass<D>>,
    pub(crate) substs: Vec<Subst<D>>,
    pub(crate) subst_classes: Vec<SubstClassData>,
    pub(crate) prelude: Prelude,
    state: D::State,
}

impl<D: Dialect> Default for ParamTypeSystem<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Dialect> ParamTypeSystem<D> {
    pub fn new() -> Self {
        let mut ts = Self {
            interner: Interner::new(),
            arena: TypeArena::new(),
            table: ClassTable::default(),
            type_vars: Vec::new(),
            pclasses: Vec::new(),
            substs: Vec::new(),
            subst_classes: Vec::new(),
            prelude: Prelude::default(),
            state: D::State::default(),
        };
        ts.prelude = Prelude::install(&mut ts);
        tracing::debug!(dialect = D::NAME, classes = ts.table.class_count(), "type system ready");
        ts
    }

    // ========================================================================
    // Component access
    // ========================================================================

    pub fn arena(&self) -> &TypeArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut TypeArena {
        &mut self.arena
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn intern(&mut self, name: &str) -> Symbol {
        self.interner.intern(name)
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    pub fn table(&self) -> &ClassTable<D::ProcExt> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ClassTable<D::ProcExt> {
        &mut self.table
    }

    pub fn class(&self, id: ClassId) -> &ClassDef {
        self.table.class(id)
    }

    pub fn lookup_class(&self, full_name: &str) -> Option<ClassId> {
        self.table.lookup(full_name)
    }

    pub fn prelude(&self) -> &Prelude {
        &self.prelude
    }

    pub fn state(&self) -> &D::State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut D::State {
        &mut self.state
    }

    // ========================================================================
    // Parametric classes
    // ========================================================================

    pub fn mutable_pclass(&self, clazz: TypeId, span: Span) -> PClassBuilder<D> {
        PClassBuilder::new(clazz, span)
    }

    pub(crate) fn register_pclass(&mut self, clazz: TypeId, formals: Vec<D::Formal>, span: Span) -> PClassId {
        let id = PClassId::new(self.pclasses.len() as u32);
        let Some(class) = self.arena.unwrap_class(clazz) else {
            crate::errors::InternalError::NotAClassInstantiation {
                pclass: format!("{id:?}"),
                found: self.display_type(clazz),
            }
            .raise()
        };
        tracing::debug!(class = %self.table.class(class).full_name, ?formals, "seal parametric class");
        self.table.class_mut(class).pclass = Some(id);
        self.pclasses.push(PClass {
            id,
            formals,
            clazz,
            span,
        });
        id
    }

    pub fn pclass(&self, id: PClassId) -> &PClass<D> {
        &self.pclasses[id.index() as usize]
    }

    pub fn pclass_of(&self, class: ClassId) -> Option<PClassId> {
        self.table.class(class).pclass
    }

    pub fn pclasses(&self) -> impl Iterator<Item = &PClass<D>> {
        self.pclasses.iter()
    }

    /// Formals of `class` and every class lexically enclosing it, innermost
    /// first.
    pub fn formals_in_scope(&self, class: ClassId) -> Vec<D::Formal> {
        let mut formals = Vec::new();
        let mut current = Some(class);
        while let Some(c) = current {
            let def = self.table.class(c);
            if let Some(pclass) = def.pclass {
                formals.extend(self.pclass(pclass).formals.iter().copied());
            }
            current = def.outer.and_then(|o| self.class_of(o));
        }
        formals
    }

    // ========================================================================
    // Substitutions
    // ========================================================================

    /// Create a fresh root substitution. Its caches are shared with no other
    /// root, even one with an equal map.
    pub fn subst(&mut self, map: SubstMap<D>) -> SubstId {
        let id = SubstId::new(self.substs.len() as u32);
        tracing::trace!(?id, ?map, "new substitution");
        self.substs.push(Subst::new(id, id, map));
        id
    }

    /// Substitution derived from `from`'s root with `map`; memoized per root.
    pub(crate) fn derive_subst(&mut self, from: SubstId, map: SubstMap<D>) -> SubstId {
        let root = self.substitution(from).root();
        if *self.substitution(root).substitutions() == map {
            return root;
        }
        if let Some(&id) = self.substs[root.index() as usize].derived.get(&map) {
            return id;
        }
        let id = SubstId::new(self.substs.len() as u32);
        tracing::trace!(?id, ?root, ?map, "derived substitution");
        self.substs.push(Subst::new(id, root, map.clone()));
        self.substs[root.index() as usize].derived.insert(map, id);
        id
    }

    pub fn substitution(&self, id: SubstId) -> &Subst<D> {
        &self.substs[id.index() as usize]
    }

    pub(crate) fn substitution_mut(&mut self, id: SubstId) -> &mut Subst<D> {
        &mut self.substs[id.index() as usize]
    }

    pub fn subst_class(&self, id: SubstClassId) -> &SubstClassData {
        &self.subst_classes[id.index() as usize]
    }

    pub fn subst_type(&mut self, subst: SubstId, ty: TypeId) -> TypeId {
        SubstCx::new(self, subst).subst_type(ty)
    }

    /// Substitute through a fresh substitution built from `map`.
    pub fn subst_type_with(&mut self, ty: TypeId, map: SubstMap<D>) -> TypeId {
        let subst = self.subst(map);
        self.subst_type(subst, ty)
    }

    pub fn subst_type_list(&mut self, subst: SubstId, types: &[TypeId]) -> TypeIdVec {
        SubstCx::new(self, subst).subst_type_list(types)
    }

    pub fn subst_field(&mut self, subst: SubstId, field: &FieldInstance) -> Rc<FieldInstance> {
        SubstCx::new(self, subst).subst_field(field)
    }

    pub fn subst_method(
        &mut self,
        subst: SubstId,
        method: &MethodInstance<D::ProcExt>,
    ) -> Rc<MethodInstance<D::ProcExt>> {
        SubstCx::new(self, subst).subst_method(method)
    }

    pub fn subst_constructor(
        &mut self,
        subst: SubstId,
        ctor: &ConstructorInstance<D::ProcExt>,
    ) -> Rc<ConstructorInstance<D::ProcExt>> {
        SubstCx::new(self, subst).subst_constructor(ctor)
    }

    /// The parametric class with its underlying class substituted. Formals
    /// are unchanged.
    pub fn subst_pclass(&mut self, subst: SubstId, pclass: PClassId) -> PClass<D> {
        let mut result = self.pclass(pclass).clone();
        result.clazz = self.subst_type(subst, result.clazz);
        result
    }

    /// Metrics summed over every substitution.
    pub fn cache_stats(&self) -> CacheStats {
        self.substs
            .iter()
            .map(Subst::cache_stats)
            .fold(CacheStats::default(), CacheStats::merge)
    }

    /// Dump cache metrics to stderr.
    pub fn print_stats(&self) {
        eprintln!("[{} substitutions] {}", D::NAME, self.cache_stats());
    }

    pub fn substitution_count(&self) -> usize {
        self.substs.len()
    }
}
