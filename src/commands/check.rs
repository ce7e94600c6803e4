// src/commands/check.rs

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use graft_generics::GenericsDialect;
use graft_keys::KeyDialect;

use super::common::{CommandOptions, Loaded, load, maybe_print_stats, report_diagnostics, report_error};
use crate::errors::DriverError;
use crate::manifest::{Declarations, DialectKind, ManifestDialect};

/// Check each manifest. Fails if any manifest has an error.
pub fn check_files(files: &[PathBuf], options: &CommandOptions) -> ExitCode {
    let mut failed = false;
    for file in files {
        match check_file(file, options) {
            Ok(true) => {}
            Ok(false) => failed = true,
            Err(error) => {
                report_error(&error, options.color);
                failed = true;
            }
        }
    }
    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

/// Returns whether the manifest is free of semantic errors.
pub fn check_file(path: &Path, options: &CommandOptions) -> Result<bool, DriverError> {
    let loaded = load(path, options)?;
    match loaded.manifest.dialect {
        DialectKind::Keys => check_with::<KeyDialect>(path, &loaded, options),
        DialectKind::Generics => check_with::<GenericsDialect>(path, &loaded, options),
    }
}

fn check_with<D: ManifestDialect>(path: &Path, loaded: &Loaded, options: &CommandOptions) -> Result<bool, DriverError> {
    let decls = Declarations::<D>::build(&loaded.manifest)?;
    for &ty in &decls.instances {
        println!("instance {}", decls.ts.display_type(ty));
    }
    report_diagnostics(&decls.diagnostics, options.color);
    maybe_print_stats(&decls.ts, &loaded.config, options);

    let errors = decls.diagnostics.len();
    println!(
        "{}: {} classes, {} instances, {} error{}",
        path.display(),
        decls.declared().len(),
        decls.instances.len(),
        errors,
        if errors == 1 { "" } else { "s" }
    );
    Ok(errors == 0)
}
