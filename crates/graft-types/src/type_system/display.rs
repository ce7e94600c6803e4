// type_system/display.rs

use crate::dialect::Dialect;
use crate::param::ParamTypeSystem;
use crate::type_arena::{TypeId, TypeKind, WildcardBound};

impl<D: Dialect> ParamTypeSystem<D> {
    pub fn display_type(&self, ty: TypeId) -> String {
        match self.arena.get(ty) {
            TypeKind::Primitive(prim) => prim.name().to_string(),
            TypeKind::Null => "null".to_string(),
            TypeKind::Array(elem) => format!("{}[]", self.display_type(*elem)),
            TypeKind::Class(class) => self.resolve(self.class(*class).name).to_string(),
            TypeKind::Subst(view) => {
                let data = self.subst_class(*view);
                match self.class_of(data.base) {
                    Some(class) => {
                        D::display_instance(self, class, self.substitution(data.subst).substitutions())
                    }
                    None => self.display_type(data.base),
                }
            }
            TypeKind::TypeVar(var) => self.resolve(self.type_var(*var).name).to_string(),
            TypeKind::Wildcard(WildcardBound::Unbounded) => "?".to_string(),
            TypeKind::Wildcard(WildcardBound::Extends(upper)) => {
                format!("? extends {}", self.display_type(*upper))
            }
            TypeKind::Wildcard(WildcardBound::Super(lower)) => {
                format!("? super {}", self.display_type(*lower))
            }
            TypeKind::Intersection(members) => members
                .iter()
                .map(|&m| self.display_type(m))
                .collect::<Vec<_>>()
                .join(" & "),
            TypeKind::Unresolved(name) => self.resolve(*name).to_string(),
        }
    }

    pub fn display_types(&self, types: &[TypeId]) -> String {
        types
            .iter()
            .map(|&t| self.display_type(t))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
