// src/cli/args.rs

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::version::version_string;

/// Color output mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect based on terminal
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorMode {
    pub fn stderr_colors(self) -> bool {
        match self {
            ColorMode::Auto => std::io::stderr().is_terminal(),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Parametric class instantiation and type-argument inference
#[derive(Parser)]
#[command(name = "graft")]
#[command(version = version_string())]
#[command(about = "Check and instantiate parametric class declarations", long_about = None)]
pub struct Cli {
    /// Color output: auto, always, never
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Print substitution cache metrics after the command
    #[arg(long, global = true)]
    pub cache_stats: bool,

    /// Configuration file (default: graft.toml next to the manifest)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build declarations and report semantic errors
    #[command(visible_alias = "c")]
    Check {
        /// Manifest files to check
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
    },
    /// Instantiate a class and list its members
    #[command(visible_alias = "i")]
    Instantiate {
        /// Manifest declaring the class
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Class to instantiate
        #[arg(value_name = "CLASS")]
        class: String,

        /// Actual parameters: key names or type expressions
        #[arg(value_name = "ACTUALS")]
        actuals: Vec<String>,
    },
    /// Infer type arguments for the calls a generics manifest lists
    Infer {
        /// Manifest listing the calls
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Re-solve with the expected type even when arguments suffice
        #[arg(long)]
        more_permissive: bool,
    },
    /// Print version and build information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["graft", "infer", "calls.json", "--more-permissive", "--color", "never"])
            .unwrap();
        assert_eq!(cli.color, ColorMode::Never);
        assert!(matches!(
            cli.command,
            Commands::Infer { more_permissive: true, .. }
        ));
    }

    #[test]
    fn check_needs_a_file() {
        assert!(Cli::try_parse_from(["graft", "check"]).is_err());
    }
}
