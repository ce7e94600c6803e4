// type_system/prelude.rs
//
// Classes every type system starts with.

use crate::class_table::{ClassBuilder, Flags};
use crate::dialect::Dialect;
use crate::param::ParamTypeSystem;
use crate::type_arena::{PrimitiveType, TypeId};

pub const PRELUDE_PACKAGE: &str = "lang";

/// Handles of the built-in classes.
#[derive(Debug, Clone, Copy)]
pub struct Prelude {
    pub object: TypeId,
    pub string: TypeId,
    pub number: TypeId,
    pub boolean: TypeId,
    pub character: TypeId,
    pub byte: TypeId,
    pub short: TypeId,
    pub integer: TypeId,
    pub long: TypeId,
    pub float: TypeId,
    pub double: TypeId,
    pub throwable: TypeId,
    pub exception: TypeId,
    pub runtime_exception: TypeId,
    pub error: TypeId,
    /// Classes with a lower index belong to the prelude.
    class_count: u32,
}

impl Default for Prelude {
    fn default() -> Self {
        let unset = TypeId::NULL;
        Self {
            object: unset,
            string: unset,
            number: unset,
            boolean: unset,
            character: unset,
            byte: unset,
            short: unset,
            integer: unset,
            long: unset,
            float: unset,
            double: unset,
            throwable: unset,
            exception: unset,
            runtime_exception: unset,
            error: unset,
            class_count: 0,
        }
    }
}

impl Prelude {
    pub(crate) fn install<D: Dialect>(ts: &mut ParamTypeSystem<D>) -> Prelude {
        fn class<D: Dialect>(ts: &mut ParamTypeSystem<D>, name: &str, super_type: TypeId) -> TypeId {
            let id = ClassBuilder::new(name)
                .package(PRELUDE_PACKAGE)
                .flags(Flags::PUBLIC)
                .extends(super_type)
                .register(ts);
            ts.class(id).ty
        }

        let object_id = ClassBuilder::new("Object")
            .package(PRELUDE_PACKAGE)
            .flags(Flags::PUBLIC)
            .root()
            .register(ts);
        let object = ts.class(object_id).ty;
        let string = class(ts, "String", object);
        let number = class(ts, "Number", object);
        let boolean = class(ts, "Boolean", object);
        let character = class(ts, "Character", object);
        let byte = class(ts, "Byte", number);
        let short = class(ts, "Short", number);
        let integer = class(ts, "Integer", number);
        let long = class(ts, "Long", number);
        let float = class(ts, "Float", number);
        let double = class(ts, "Double", number);
        let throwable = class(ts, "Throwable", object);
        let exception = class(ts, "Exception", throwable);
        let runtime_exception = class(ts, "RuntimeException", exception);
        let error = class(ts, "Error", throwable);

        Prelude {
            object,
            string,
            number,
            boolean,
            character,
            byte,
            short,
            integer,
            long,
            float,
            double,
            throwable,
            exception,
            runtime_exception,
            error,
            class_count: ts.table().class_count() as u32,
        }
    }

    /// Wrapper class of a primitive; `None` for void.
    pub fn wrapper_of(&self, prim: PrimitiveType) -> Option<TypeId> {
        Some(match prim {
            PrimitiveType::Void => return None,
            PrimitiveType::Boolean => self.boolean,
            PrimitiveType::Byte => self.byte,
            PrimitiveType::Short => self.short,
            PrimitiveType::Char => self.character,
            PrimitiveType::Int => self.integer,
            PrimitiveType::Long => self.long,
            PrimitiveType::Float => self.float,
            PrimitiveType::Double => self.double,
        })
    }

    pub fn is_prelude_class(&self, class: graft_identity::ClassId) -> bool {
        class.index() < self.class_count
    }
}
