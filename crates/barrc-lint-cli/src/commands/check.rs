//! Check command implementation.

use anyhow::{bail, Context, Result};
use barrc_lint_core::{fix, Analyzer, Config, FileError, LintResult, RuleBox, Violation};
use barrc_lint_rules::{find_rule, Preset};
use miette::NamedSource;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Command-line options of `check`.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule codes or names.
    pub rules: Option<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// Apply automatic fixes before reporting.
    pub fix: bool,
}

/// Totals of a `--fix` pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct FixSummary {
    files: usize,
    applied: usize,
    skipped: usize,
}

/// Runs the check command.
///
/// Returns `false` when an error-severity violation or an unreadable file
/// remains.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<bool> {
    let config = load_config(source)?;
    let rules = select_rules(&config, options.rules.as_deref())?;

    let analyzer = Analyzer::builder()
        .root(path)
        .config(config)
        .excludes(options.exclude.iter().cloned())
        .rules(rules)
        .build()
        .context("Failed to build analyzer")?;

    info!(
        "Analyzing {} with {} rules",
        path.display(),
        analyzer.engine().enabled_count()
    );

    let mut result = analyzer.analyze().context("Analysis failed")?;

    if options.fix {
        let summary = apply_fixes(&analyzer, &result)?;
        info!(
            "Applied {} fix(es) in {} file(s), {} skipped",
            summary.applied, summary.files, summary.skipped
        );
        if summary.files > 0 {
            result = analyzer.analyze().context("Analysis after fixing failed")?;
        }
    }

    if options.format == OutputFormat::Text {
        for error in &result.errors {
            render_file_error(analyzer.base_dir(), error);
        }
    }
    super::output::print(&result, options.format)?;

    Ok(!(result.has_errors() || result.has_file_errors()))
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        info!("Using global config: {}", path.display());
    }
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Rules named by `--rules`, or the configured preset.
fn select_rules(config: &Config, filter: Option<&str>) -> Result<Vec<RuleBox>> {
    if let Some(filter) = filter {
        let mut rules = Vec::new();
        for id in filter.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match find_rule(id) {
                Some(rule) => rules.push(rule),
                None => warn!("Unknown rule: {}", id),
            }
        }
        if rules.is_empty() {
            bail!("--rules matched no known rule (see `barrc-lint list-rules`)");
        }
        return Ok(rules);
    }

    let preset = match config.preset.as_deref() {
        None => Preset::default(),
        Some(name) => Preset::from_name(name).with_context(|| {
            format!("Unknown preset '{name}' (expected recommended, strict or minimal)")
        })?,
    };
    Ok(preset.rules())
}

fn apply_fixes(analyzer: &Analyzer, result: &LintResult) -> Result<FixSummary> {
    let mut by_file: BTreeMap<&Path, Vec<Violation>> = BTreeMap::new();
    for violation in &result.violations {
        if violation
            .suggestion
            .as_ref()
            .is_some_and(|s| s.replacement.is_some())
        {
            by_file
                .entry(violation.location.file.as_path())
                .or_default()
                .push(violation.clone());
        }
    }

    let mut summary = FixSummary::default();
    for (file, violations) in by_file {
        let path = analyzer.base_dir().join(file);
        let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let Ok(content) = String::from_utf8(bytes) else {
            warn!("Not fixing {}: not valid UTF-8", file.display());
            summary.skipped += violations.len();
            continue;
        };
        let outcome = fix::apply_fixes(&content, &violations)
            .with_context(|| format!("Failed to fix {}", path.display()))?;

        summary.skipped += outcome.skipped;
        if outcome.changed() {
            std::fs::write(&path, &outcome.source)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Fixed {} issue(s) in {}", outcome.applied, file.display());
            summary.files += 1;
            summary.applied += outcome.applied;
        }
    }
    Ok(summary)
}

/// Prints a lexer failure with the offending source excerpt.
fn render_file_error(base: &Path, error: &FileError) {
    let Some(lex) = error.error.clone() else {
        eprintln!("{error}");
        return;
    };
    match std::fs::read_to_string(base.join(&error.file)) {
        Ok(content) => {
            let report = miette::Report::new(lex).with_source_code(NamedSource::new(
                error.file.display().to_string(),
                content,
            ));
            eprintln!("{report:?}");
        }
        Err(_) => eprintln!("{error}"),
    }
}
