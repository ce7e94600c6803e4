// src/commands/common.rs
//! Shared utilities for CLI commands.

use std::path::{Path, PathBuf};

use graft_types::{Diagnostics, Dialect, ParamTypeSystem};

use crate::cli::ColorMode;
use crate::config::Config;
use crate::errors::{DriverError, render_to_stderr};
use crate::manifest::Manifest;

/// Flags every command accepts.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    pub color: ColorMode,
    pub cache_stats: bool,
    pub config: Option<PathBuf>,
}

/// A manifest with the configuration that applies to it.
pub struct Loaded {
    pub manifest: Manifest,
    pub config: Config,
}

pub fn load(path: &Path, options: &CommandOptions) -> Result<Loaded, DriverError> {
    let manifest = Manifest::load(path)?;
    let config = Config::discover(path, options.config.as_deref())?;
    Ok(Loaded { manifest, config })
}

pub fn report_error(error: &DriverError, color: ColorMode) {
    render_to_stderr(error, color);
}

pub fn report_diagnostics(diagnostics: &Diagnostics, color: ColorMode) {
    for error in diagnostics.iter() {
        render_to_stderr(error, color);
    }
}

/// Print cache metrics when the flag or the configuration asks for them.
pub fn maybe_print_stats<D: Dialect>(ts: &ParamTypeSystem<D>, config: &Config, options: &CommandOptions) {
    if options.cache_stats || config.diagnostics.cache_stats {
        ts.print_stats();
    }
}
