// src/errors/report.rs
//! Rendering utilities for miette diagnostics.

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, ThemeCharacters, ThemeStyles};

use crate::cli::ColorMode;

/// Handler for terminal output (unicode + colors).
fn terminal_handler() -> GraphicalReportHandler {
    let theme = GraphicalTheme {
        characters: ThemeCharacters::unicode(),
        styles: ThemeStyles::ansi(),
    };
    GraphicalReportHandler::new_themed(theme)
}

/// Handler for plain output (ascii + no colors).
fn plain_handler() -> GraphicalReportHandler {
    let theme = GraphicalTheme {
        characters: ThemeCharacters::ascii(),
        styles: ThemeStyles::none(),
    };
    GraphicalReportHandler::new_themed(theme)
}

/// Render to stderr, with colors as `color` decides.
pub fn render_to_stderr(report: &dyn Diagnostic, color: ColorMode) {
    let handler = if color.stderr_colors() {
        terminal_handler()
    } else {
        plain_handler()
    };
    let mut output = String::new();
    if handler.render_report(&mut output, report).is_ok() {
        eprint!("{}", output);
    }
}

/// Render to a string without colors.
pub fn render_to_string(report: &dyn Diagnostic) -> String {
    let mut output = String::new();
    let _ = plain_handler().render_report(&mut output, report);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{DriverError, SemanticError};

    #[test]
    fn renders_code_and_message() {
        let err = DriverError::UnknownClass {
            name: "Missing".to_string(),
        };
        let output = render_to_string(&err);
        assert!(output.contains("E5006"), "should contain error code: {output}");
        assert!(output.contains("unknown class \"Missing\""));
    }

    #[test]
    fn semantic_errors_keep_their_code() {
        let err = DriverError::from(SemanticError::ArityMismatch {
            class: "Box".to_string(),
            expected: 1,
            found: 2,
            span: (0, 0).into(),
        });
        let output = render_to_string(&err);
        assert!(output.contains("E4001"), "should contain error code: {output}");
        assert!(output.contains("expected 1, found 2"));
    }

    #[test]
    fn type_syntax_points_into_the_text() {
        let err = DriverError::TypeSyntax {
            text: "List<".to_string(),
            reason: "unexpected end",
            source_code: "List<".to_string(),
            span: (5, 0).into(),
        };
        let output = render_to_string(&err);
        assert!(output.contains("unexpected end in type `List<`"));
        assert!(output.contains("List<"));
    }
}
