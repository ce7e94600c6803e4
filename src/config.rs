// src/config.rs
//! Driver configuration.
//!
//! Read from `graft.toml` next to the manifest (or `--config PATH`). Every
//! field is optional; omitted ones take the `Default` values. Command-line
//! flags override what the file says.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use graft_generics::InferenceOptions;

use crate::errors::DriverError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub inference: InferenceConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Re-solve with the expected return type even when the arguments
    /// already determine every type variable.
    pub more_permissive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Print substitution cache metrics after each command.
    pub cache_stats: bool,
}

impl Config {
    pub const FILE_NAME: &'static str = "graft.toml";

    pub fn parse(text: &str, path: &Path) -> Result<Self, DriverError> {
        toml::from_str(text).map_err(|source| DriverError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, DriverError> {
        let text = std::fs::read_to_string(path).map_err(|source| DriverError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// `explicit` if given, else `graft.toml` beside `manifest` if present,
    /// else defaults.
    pub fn discover(manifest: &Path, explicit: Option<&Path>) -> Result<Self, DriverError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let beside: PathBuf = manifest
            .parent()
            .map_or_else(|| PathBuf::from(Self::FILE_NAME), |dir| dir.join(Self::FILE_NAME));
        if beside.is_file() {
            tracing::debug!(path = %beside.display(), "loading configuration");
            Self::load(&beside)
        } else {
            Ok(Self::default())
        }
    }

    pub fn inference_options(&self) -> InferenceOptions {
        InferenceOptions {
            more_permissive_inference: self.inference.more_permissive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_take_defaults() {
        let config = Config::parse("[diagnostics]\ncache_stats = true\n", Path::new("graft.toml")).unwrap();
        assert!(config.diagnostics.cache_stats);
        assert!(!config.inference.more_permissive);
        assert_eq!(Config::parse("", Path::new("graft.toml")).unwrap(), Config::default());
    }

    #[test]
    fn inference_section_maps_to_options() {
        let config = Config::parse("[inference]\nmore_permissive = true\n", Path::new("graft.toml")).unwrap();
        assert!(config.inference_options().more_permissive_inference);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let err = Config::parse("[inference\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, DriverError::Config { .. }));
    }

    #[test]
    fn discovery_reads_the_file_beside_the_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("decls.json");
        assert_eq!(Config::discover(&manifest, None).unwrap(), Config::default());

        std::fs::write(dir.path().join(Config::FILE_NAME), "[inference]\nmore_permissive = true\n").unwrap();
        let config = Config::discover(&manifest, None).unwrap();
        assert!(config.inference.more_permissive);
    }
}
