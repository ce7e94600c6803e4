// src/errors/mod.rs
//! Driver errors (E5xxx) and diagnostic rendering.

#![allow(unused_assignments)] // False positives from thiserror derive

pub mod report;

use std::path::PathBuf;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

pub use graft_types::SemanticError;
pub use report::{render_to_stderr, render_to_string};

#[derive(Error, Debug, Diagnostic)]
pub enum DriverError {
    #[error("could not read '{}'", path.display())]
    #[diagnostic(code(E5001))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest '{}'", path.display())]
    #[diagnostic(code(E5002), help("manifests are JSON objects with a \"dialect\" of \"keys\" or \"generics\""))]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration '{}'", path.display())]
    #[diagnostic(code(E5003))]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{reason} in type `{text}`")]
    #[diagnostic(code(E5004))]
    TypeSyntax {
        text: String,
        reason: &'static str,
        #[source_code]
        source_code: String,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("unknown type \"{name}\"")]
    #[diagnostic(code(E5005))]
    UnknownType { name: String },

    #[error("unknown class \"{name}\"")]
    #[diagnostic(code(E5006))]
    UnknownClass { name: String },

    #[error("class \"{class}\" has no method \"{method}\"")]
    #[diagnostic(code(E5007))]
    UnknownMethod { class: String, method: String },

    #[error("unknown modifier \"{name}\"")]
    #[diagnostic(code(E5008), help("modifiers are public, protected, private, static, final, abstract, interface and varargs"))]
    UnknownFlag { name: String },

    #[error("{what} is not supported by the {dialect} dialect")]
    #[diagnostic(code(E5009))]
    Unsupported { what: String, dialect: &'static str },

    #[error("command needs a {expected} manifest, found {found}")]
    #[diagnostic(code(E5010))]
    WrongDialect {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Semantic(#[from] SemanticError),
}

impl DriverError {
    pub fn unsupported(what: impl Into<String>, dialect: &'static str) -> Self {
        DriverError::Unsupported {
            what: what.into(),
            dialect,
        }
    }
}
