// src/commands/instantiate.rs

use std::path::Path;
use std::process::ExitCode;

use graft_generics::GenericsDialect;
use graft_keys::KeyDialect;

use super::common::{CommandOptions, Loaded, load, maybe_print_stats, report_diagnostics, report_error};
use crate::errors::DriverError;
use crate::manifest::{Declarations, DialectKind, ManifestDialect, describe_instance};

/// Instantiate `class` with `actuals` and print its members.
pub fn instantiate_class(file: &Path, class: &str, actuals: &[String], options: &CommandOptions) -> ExitCode {
    let result = load(file, options).and_then(|loaded| match loaded.manifest.dialect {
        DialectKind::Keys => instantiate_with::<KeyDialect>(&loaded, class, actuals, options),
        DialectKind::Generics => instantiate_with::<GenericsDialect>(&loaded, class, actuals, options),
    });
    match result {
        Ok(code) => code,
        Err(error) => {
            report_error(&error, options.color);
            ExitCode::FAILURE
        }
    }
}

fn instantiate_with<D: ManifestDialect>(
    loaded: &Loaded,
    class: &str,
    actuals: &[String],
    options: &CommandOptions,
) -> Result<ExitCode, DriverError> {
    let mut decls = Declarations::<D>::build(&loaded.manifest)?;
    if !decls.diagnostics.is_empty() {
        report_diagnostics(&decls.diagnostics, options.color);
        return Ok(ExitCode::FAILURE);
    }
    let ty = decls.instantiate(class, actuals)?;
    for line in describe_instance(&mut decls.ts, ty) {
        println!("{line}");
    }
    maybe_print_stats(&decls.ts, &loaded.config, options);
    Ok(ExitCode::SUCCESS)
}
