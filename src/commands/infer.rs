// src/commands/infer.rs

use std::path::Path;
use std::process::ExitCode;

use graft_generics::{GenericsDialect, InferenceOptions, InferenceSolver};

use super::common::{CommandOptions, load, maybe_print_stats, report_diagnostics, report_error};
use crate::errors::DriverError;
use crate::manifest::{CallDecl, Declarations, DialectKind, Scope};

/// Run every call of a generics manifest through inference. Fails if a call
/// has no solution.
pub fn infer_calls(file: &Path, more_permissive: bool, options: &CommandOptions) -> ExitCode {
    match run(file, more_permissive, options) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            report_error(&error, options.color);
            ExitCode::FAILURE
        }
    }
}

fn run(file: &Path, more_permissive: bool, options: &CommandOptions) -> Result<bool, DriverError> {
    let loaded = load(file, options)?;
    if loaded.manifest.dialect != DialectKind::Generics {
        return Err(DriverError::WrongDialect {
            expected: DialectKind::Generics.name(),
            found: loaded.manifest.dialect.name(),
        });
    }
    let mut decls = Declarations::<GenericsDialect>::build(&loaded.manifest)?;
    if !decls.diagnostics.is_empty() {
        report_diagnostics(&decls.diagnostics, options.color);
        return Ok(false);
    }

    let mut inference = loaded.config.inference_options();
    inference.more_permissive_inference |= more_permissive;

    let mut all_solved = true;
    for call in &loaded.manifest.calls {
        let (line, solved) = infer_call(&mut decls, call, inference)?;
        println!("{line}");
        all_solved &= solved;
    }
    maybe_print_stats(&decls.ts, &loaded.config, options);
    Ok(all_solved)
}

/// The printed outcome of one call and whether it was solved.
pub fn infer_call(
    decls: &mut Declarations<GenericsDialect>,
    call: &CallDecl,
    options: InferenceOptions,
) -> Result<(String, bool), DriverError> {
    let class = decls.class_named(&call.class)?;
    let scope = Scope::default();
    let actuals = call
        .args
        .iter()
        .map(|arg| decls.resolve_text(arg, &scope))
        .collect::<Result<Vec<_>, _>>()?;
    let expected = call
        .expected
        .as_deref()
        .map(|text| decls.resolve_text(text, &scope))
        .transpose()?;

    // Prefer an overload whose arity fits; varargs methods take any count
    // from one less than their formals upwards.
    let class_ty = decls.ts.class(class).ty;
    let candidates = decls.ts.methods_named(class_ty, &call.method);
    let fits = |formals: usize, varargs: bool| {
        formals == actuals.len() || (varargs && actuals.len() + 1 >= formals)
    };
    let method = candidates
        .iter()
        .find(|m| fits(m.formal_types.len(), m.flags.is_varargs()))
        .or_else(|| candidates.first())
        .cloned()
        .ok_or_else(|| DriverError::UnknownMethod {
            class: call.class.clone(),
            method: call.method.clone(),
        })?;

    let label = format!(
        "{}.{}({})",
        call.class,
        call.method,
        decls.ts.display_types(&actuals)
    );
    let mut solver = InferenceSolver::for_method(&method).with_options(options);
    match solver.infer(&mut decls.ts, &actuals, expected) {
        Some(solution) => Ok((format!("{label}: {}", solution.display(&decls.ts)), true)),
        None => {
            let reason = solver
                .failure()
                .map_or_else(|| "no applicable bounds".to_string(), ToString::to_string);
            Ok((format!("{label}: no solution ({reason})"), false))
        }
    }
}
