// src/commands/version.rs

use std::process::ExitCode;
use std::sync::OnceLock;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEBUG: &str = env!("VERGEN_CARGO_DEBUG");
const TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");
const BUILD_DATE: &str = env!("VERGEN_BUILD_DATE");

fn simplify_target(target: &str) -> String {
    target
        .replace("unknown-", "")
        .replace("-gnu", "")
        .replace("-musl", "")
}

fn is_release() -> bool {
    DEBUG != "true"
}

fn make_version_string() -> String {
    // 0.4.0 (release linux-x86_64, built 2026-02-16)
    let profile = if is_release() { "release" } else { "debug" };
    let target = simplify_target(TARGET_TRIPLE);
    format!("{VERSION} ({profile} {target}, built {BUILD_DATE})")
}

pub fn version_string() -> &'static str {
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(make_version_string)
}

pub fn print_version() -> ExitCode {
    println!("graft {}", version_string());
    println!(
        "dialects: {}, {}",
        <graft_keys::KeyDialect as graft_types::Dialect>::NAME,
        <graft_generics::GenericsDialect as graft_types::Dialect>::NAME
    );
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_drop_vendor_and_abi() {
        assert_eq!(simplify_target("x86_64-unknown-linux-gnu"), "x86_64-linux");
        assert_eq!(simplify_target("aarch64-apple-darwin"), "aarch64-apple-darwin");
    }

    #[test]
    fn version_string_starts_with_the_package_version() {
        assert!(version_string().starts_with(VERSION));
    }
}
