// src/manifest/mod.rs
//! Declaration manifests.
//!
//! A manifest is a JSON document listing classes and their members for one
//! dialect, plus the instantiations and calls to check. Types inside it are
//! written as [`type_expr`] strings.
//!
//! ```json
//! {
//!   "dialect": "generics",
//!   "classes": [
//!     { "name": "List", "params": ["E"],
//!       "methods": [{ "name": "get", "returns": "E", "params": ["int"] }] }
//!   ],
//!   "instantiate": [{ "class": "List", "args": ["String"] }]
//! }
//! ```

mod build;
mod describe;
mod generics;
mod keys;
pub mod type_expr;

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use graft_types::Flags;

use crate::errors::DriverError;

pub use build::{Declarations, ManifestDialect, ProcRef, Scope};
pub use describe::describe_instance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    Keys,
    Generics,
}

impl DialectKind {
    pub fn name(self) -> &'static str {
        match self {
            DialectKind::Keys => "keys",
            DialectKind::Generics => "generics",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub dialect: DialectKind,
    /// Instance keys declared before any class.
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    #[serde(default)]
    pub instantiate: Vec<InstantiateDecl>,
    #[serde(default)]
    pub calls: Vec<CallDecl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassDecl {
    pub name: String,
    pub package: Option<String>,
    pub flags: Vec<String>,
    /// Enclosing class; must be declared earlier in the manifest.
    pub outer: Option<String>,
    /// Key parameters, or type parameters (`T`, `T extends Bound`).
    pub params: Vec<String>,
    /// Key parameter carried by every instance (keys dialect).
    pub tracked: Option<String>,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub constructors: Vec<ProcDecl>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default = "void")]
    pub returns: String,
    #[serde(default)]
    pub type_params: Vec<String>,
    #[serde(flatten)]
    pub proc: ProcDecl,
}

fn void() -> String {
    "void".to_string()
}

/// The parts methods and constructors share.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProcDecl {
    pub params: Vec<String>,
    pub flags: Vec<String>,
    pub throws: Vec<ThrowDecl>,
    /// Keys held on entry; empty when omitted.
    pub entry: Option<Vec<String>>,
    /// Keys held on normal return; defaulted when omitted.
    pub exit: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThrowDecl {
    #[serde(rename = "type")]
    pub ty: String,
    /// Keys held when this type is thrown; the entry keys when omitted.
    #[serde(default)]
    pub keys: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstantiateDecl {
    pub class: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// A call of a generic method to run through inference.
#[derive(Debug, Clone, Deserialize)]
pub struct CallDecl {
    pub class: String,
    pub method: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Type the call's result is assigned to, if any.
    #[serde(default)]
    pub expected: Option<String>,
}

impl Manifest {
    pub fn parse(text: &str, path: &Path) -> Result<Self, DriverError> {
        serde_json::from_str(text).map_err(|source| DriverError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, DriverError> {
        let text = std::fs::read_to_string(path).map_err(|source| DriverError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::parse(&text, path)?;
        tracing::debug!(
            path = %path.display(),
            dialect = %manifest.dialect,
            classes = manifest.classes.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }
}

/// Combine modifier names into `Flags`.
pub fn parse_flags(names: &[String]) -> Result<Flags, DriverError> {
    names.iter().try_fold(Flags::NONE, |flags, name| {
        Flags::from_name(name)
            .map(|flag| flags | flag)
            .ok_or_else(|| DriverError::UnknownFlag { name: name.clone() })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_take_defaults() {
        let text = r#"{
            "dialect": "keys",
            "keys": ["k1"],
            "classes": [{
                "name": "Box",
                "tracked": "K",
                "methods": [{ "name": "get", "exit": ["K"] }],
                "constructors": [{}]
            }]
        }"#;
        let manifest = Manifest::parse(text, Path::new("box.json")).unwrap();
        assert_eq!(manifest.dialect, DialectKind::Keys);
        let class = &manifest.classes[0];
        assert_eq!(class.tracked.as_deref(), Some("K"));
        let get = &class.methods[0];
        assert_eq!(get.returns, "void");
        assert!(get.proc.entry.is_none());
        assert_eq!(get.proc.exit, Some(vec!["K".to_string()]));
        assert!(class.constructors[0].params.is_empty());
        assert!(manifest.calls.is_empty());
    }

    #[test]
    fn unknown_dialect_is_rejected() {
        let err = Manifest::parse(r#"{ "dialect": "java9" }"#, Path::new("x.json")).unwrap_err();
        assert!(matches!(err, DriverError::Manifest { .. }));
    }

    #[test]
    fn flags_combine() {
        let flags = parse_flags(&["public".to_string(), "static".to_string()]).unwrap();
        assert!(flags.contains(Flags::PUBLIC | Flags::STATIC));
        assert!(matches!(
            parse_flags(&["sealed".to_string()]),
            Err(DriverError::UnknownFlag { name }) if name == "sealed"
        ));
    }
}
