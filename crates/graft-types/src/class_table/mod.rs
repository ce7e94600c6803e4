// class_table/mod.rs
//
// Declared classes and their members. IDs are indices into the storage vectors.

mod builder;
mod flags;
mod members;

pub use builder::{ClassBuilder, ConstructorBuilder, FieldBuilder, MethodBuilder};
pub use flags::Flags;
pub use members::{ConstructorInstance, FieldInstance, MethodInstance, ProcedureInstance};

use std::rc::Rc;

use rustc_hash::FxHashMap;

use graft_identity::{ClassId, ConstructorId, FieldId, MethodId, PClassId, Span, Symbol};

use crate::type_arena::TypeId;

/// How a class is nested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClassKind {
    #[default]
    TopLevel,
    Member,
    Local,
    Anonymous,
}

impl ClassKind {
    pub fn is_nested(self) -> bool {
        self != ClassKind::TopLevel
    }
}

#[derive(Debug, Clone)]
pub struct ClassDef {
    pub id: ClassId,
    /// The `TypeKind::Class` handle for this class.
    pub ty: TypeId,
    pub name: Symbol,
    pub full_name: String,
    pub package: Option<Symbol>,
    pub flags: Flags,
    pub kind: ClassKind,
    pub outer: Option<TypeId>,
    pub super_type: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    pub fields: Vec<FieldId>,
    pub methods: Vec<MethodId>,
    pub constructors: Vec<ConstructorId>,
    pub member_classes: Vec<TypeId>,
    /// Set once a parametric class is sealed over this class.
    pub pclass: Option<PClassId>,
    pub span: Span,
}

/// Storage for declared classes and members.
#[derive(Debug, Clone)]
pub struct ClassTable<X> {
    classes: Vec<ClassDef>,
    fields: Vec<Rc<FieldInstance>>,
    methods: Vec<Rc<MethodInstance<X>>>,
    constructors: Vec<Rc<ConstructorInstance<X>>>,
    by_full_name: FxHashMap<String, ClassId>,
}

impl<X> Default for ClassTable<X> {
    fn default() -> Self {
        Self {
            classes: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            by_full_name: FxHashMap::default(),
        }
    }
}

impl<X: Clone> ClassTable<X> {
    pub fn next_class_id(&self) -> ClassId {
        ClassId::new(self.classes.len() as u32)
    }

    pub(crate) fn push_class(&mut self, def: ClassDef) -> ClassId {
        let id = def.id;
        debug_assert_eq!(id, self.next_class_id());
        self.by_full_name.insert(def.full_name.clone(), id);
        self.classes.push(def);
        id
    }

    pub fn class(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.index() as usize]
    }

    pub(crate) fn class_mut(&mut self, id: ClassId) -> &mut ClassDef {
        &mut self.classes[id.index() as usize]
    }

    pub fn lookup(&self, full_name: &str) -> Option<ClassId> {
        self.by_full_name.get(full_name).copied()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.iter()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub(crate) fn push_field(&mut self, class: ClassId, build: impl FnOnce(FieldId) -> FieldInstance) -> FieldId {
        let id = FieldId::new(self.fields.len() as u32);
        self.fields.push(Rc::new(build(id)));
        self.class_mut(class).fields.push(id);
        id
    }

    pub(crate) fn push_method(
        &mut self,
        class: ClassId,
        build: impl FnOnce(MethodId) -> MethodInstance<X>,
    ) -> MethodId {
        let id = MethodId::new(self.methods.len() as u32);
        self.methods.push(Rc::new(build(id)));
        self.class_mut(class).methods.push(id);
        id
    }

    pub(crate) fn push_constructor(
        &mut self,
        class: ClassId,
        build: impl FnOnce(ConstructorId) -> ConstructorInstance<X>,
    ) -> ConstructorId {
        let id = ConstructorId::new(self.constructors.len() as u32);
        self.constructors.push(Rc::new(build(id)));
        self.class_mut(class).constructors.push(id);
        id
    }

    pub fn field(&self, id: FieldId) -> &Rc<FieldInstance> {
        &self.fields[id.index() as usize]
    }

    pub fn method(&self, id: MethodId) -> &Rc<MethodInstance<X>> {
        &self.methods[id.index() as usize]
    }

    pub fn constructor(&self, id: ConstructorId) -> &Rc<ConstructorInstance<X>> {
        &self.constructors[id.index() as usize]
    }

    /// Mutable access to a declared method, for passes that fill in signature
    /// data after registration. Substituted copies made earlier are unaffected.
    pub fn method_mut(&mut self, id: MethodId) -> &mut MethodInstance<X> {
        Rc::make_mut(&mut self.methods[id.index() as usize])
    }

    pub fn constructor_mut(&mut self, id: ConstructorId) -> &mut ConstructorInstance<X> {
        Rc::make_mut(&mut self.constructors[id.index() as usize])
    }
}
