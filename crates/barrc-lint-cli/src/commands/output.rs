//! Shared output formatting for lint results.

use anyhow::Result;
use barrc_lint_core::{FileError, LintResult, Severity, Violation};
use serde::Serialize;

use crate::OutputFormat;

/// JSON document printed by `--format json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    violations: &'a [Violation],
    errors: &'a [FileError],
    summary: Summary,
}

#[derive(Serialize)]
struct Summary {
    files_checked: usize,
    errors: usize,
    warnings: usize,
    infos: usize,
    file_errors: usize,
}

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  {}: {}", severity_indicator, violation.message);
        if let Some(suggestion) = &violation.suggestion {
            let fixable = if suggestion.replacement.is_some() {
                " (fixable)"
            } else {
                ""
            };
            println!("  = help: {}{fixable}", suggestion.message);
        }
        if let Some(doc_ref) = &violation.doc_ref {
            println!("  = see: {doc_ref}");
        }
        println!();
    }

    let summary_color = if errors > 0 || result.has_file_errors() {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );
    if result.has_file_errors() {
        println!(
            "\x1b[31m{} file(s) could not be analyzed\x1b[0m",
            result.errors.len()
        );
    }
}

fn print_json(result: &LintResult) -> Result<()> {
    let (errors, warnings, infos) = result.count_by_severity();
    let report = JsonReport {
        violations: &result.violations,
        errors: &result.errors,
        summary: Summary {
            files_checked: result.files_checked,
            errors,
            warnings,
            infos,
            file_errors: result.errors.len(),
        },
    };
    let json = serde_json::to_string_pretty(&report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
    for error in &result.errors {
        println!("{error}");
    }
}
