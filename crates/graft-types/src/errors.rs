// errors.rs
//! Semantic errors (E4xxx) and internal-consistency errors.

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum SemanticError {
    #[error(
        "wrong number of actual parameters for instantiation of \"{class}\": expected {expected}, found {found}"
    )]
    #[diagnostic(code(E4001))]
    ArityMismatch {
        class: String,
        expected: usize,
        found: usize,
        #[label("instantiated here")]
        span: SourceSpan,
    },

    #[error("{method} in {container} cannot override {overridden} in {overridden_container}")]
    #[diagnostic(
        code(E4002),
        help("the overriding method's key sets must extend the overridden method's by exactly the keys it newly holds on entry")
    )]
    OverrideViolation {
        method: String,
        container: String,
        overridden: String,
        overridden_container: String,
        reason: String,
        #[label("{reason}")]
        span: SourceSpan,
    },

    #[error("constructor of \"{class}\" must hold key \"{key}\" on exit")]
    #[diagnostic(code(E4003))]
    ConstructorMissingKey {
        class: String,
        key: String,
        #[label("missing key in return set")]
        span: SourceSpan,
    },

    #[error("method cannot add key \"{key}\" (associated with this)")]
    #[diagnostic(code(E4004))]
    CannotAddKey {
        key: String,
        #[label("key added here")]
        span: SourceSpan,
    },

    #[error("cannot resolve key \"{name}\"")]
    #[diagnostic(code(E4005), help("declare the key as a class parameter or key declaration"))]
    UnresolvedKey {
        name: String,
        #[label("not found in scope")]
        span: SourceSpan,
    },

    #[error("constructor cannot hold key \"{key}\" (associated with this) on entry")]
    #[diagnostic(code(E4007))]
    ConstructorHoldsKeyOnEntry {
        key: String,
        #[label("held on entry")]
        span: SourceSpan,
    },

    #[error("\"{name}\" is not a class type")]
    #[diagnostic(code(E4006))]
    NotAClass {
        name: String,
        #[label("expected a class")]
        span: SourceSpan,
    },
}

/// Broken invariants inside the type system. These indicate a bug in a
/// caller (or in the engine), never a problem with user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    #[error("{what}: expected {expected} entries, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("instantiating {pclass} produced {found}, which is not a class type")]
    NotAClassInstantiation { pclass: String, found: String },

    #[error("{what} is in state {found}, expected {expected}")]
    InvalidState {
        what: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl InternalError {
    /// Report and abort. Internal errors are never recoverable.
    #[track_caller]
    pub fn raise(self) -> ! {
        tracing::error!(error = %self, "internal compiler error");
        panic!("internal compiler error: {self}")
    }
}

/// Collected semantic errors, in report order.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    errors: Vec<SemanticError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: SemanticError) {
        tracing::debug!(%error, "semantic error");
        self.errors.push(error);
    }

    /// Record the error of `result`, if any, and return its value.
    pub fn record<T>(&mut self, result: Result<T, SemanticError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(error);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SemanticError> {
        self.errors.iter()
    }

    pub fn into_vec(self) -> Vec<SemanticError> {
        self.errors
    }
}
