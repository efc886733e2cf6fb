//! Rule reporting unnamed numeric literals inside function bodies.
//!
//! # Rationale
//!
//! A bare `250` in an expression says nothing about what it measures. Giving
//! it a name (a `#define` or a `const` object) documents the intent and keeps
//! every use in sync.
//!
//! Literals equal to `0` or `1`, initializers and array sizes of local
//! declarations, and `case` labels are not reported.

use std::ops::Range;

use barrc_lint_core::{
    Category, DeclKind, FileContext, LiteralKind, Rule, Severity, Suggestion, TokenKind,
    TranslationUnit, Violation,
};

/// Rule code for barrc-safety-magic-numbers.
pub const CODE: &str = "MAGIC_NUMBER";

/// Rule name for barrc-safety-magic-numbers.
pub const NAME: &str = "barrc-safety-magic-numbers";

/// Value of a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LiteralValue {
    Int(u64),
    Float(f64),
}

/// Parses a C numeric literal. Returns `None` for forms it does not
/// understand, which are then treated as magic.
fn literal_value(text: &str) -> Option<LiteralValue> {
    let lower = text.to_ascii_lowercase();
    let is_hex = lower.starts_with("0x");
    let trimmed = lower.trim_end_matches(['u', 'l']);
    let trimmed = if is_hex {
        trimmed
    } else {
        trimmed.trim_end_matches('f')
    };

    let int = if let Some(hex) = trimmed.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = trimmed.strip_prefix("0b") {
        u64::from_str_radix(bin, 2).ok()
    } else if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        if trimmed.len() > 1 && trimmed.starts_with('0') {
            u64::from_str_radix(&trimmed[1..], 8).ok()
        } else {
            trimmed.parse::<u64>().ok()
        }
    } else {
        return trimmed.parse::<f64>().ok().map(LiteralValue::Float);
    };
    int.map(LiteralValue::Int)
}

/// Whether a literal is one of the values that never need a name.
fn is_trivial(text: &str) -> bool {
    match literal_value(text) {
        Some(LiteralValue::Int(v)) => v <= 1,
        Some(LiteralValue::Float(v)) => v.abs() < f64::EPSILON || (v - 1.0).abs() < f64::EPSILON,
        None => false,
    }
}

/// Reports numeric literals other than `0` and `1` in function bodies.
#[derive(Debug, Clone)]
pub struct MagicNumbers {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for MagicNumbers {
    fn default() -> Self {
        Self::new()
    }
}

impl MagicNumbers {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for MagicNumbers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Numeric literals other than 0 and 1 in function bodies should be named constants"
    }

    fn category(&self) -> Category {
        Category::Safety
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, unit: &TranslationUnit) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (id, function) in unit.functions() {
            let Some(body) = function.body.clone() else {
                continue;
            };
            let declared: Vec<Range<usize>> = unit
                .declarations
                .iter()
                .filter(|d| d.enclosing_function == Some(id))
                .filter(|d| matches!(d.kind, DeclKind::Variable | DeclKind::Constant))
                .map(|d| d.extent.clone())
                .collect();

            let mut in_case = false;
            for index in body {
                let token = &unit.tokens[index];
                if token.is_keyword("case") {
                    in_case = true;
                    continue;
                }
                if in_case {
                    if token.is_punct(":") {
                        in_case = false;
                    }
                    continue;
                }
                if token.kind != TokenKind::Literal(LiteralKind::Number)
                    || is_trivial(&token.text)
                    || declared.iter().any(|r| r.contains(&index))
                {
                    continue;
                }

                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        ctx.token_location(token),
                        format!("magic number '{}' in '{}'", token.text, function.name),
                    )
                    .with_suggestion(Suggestion::new(
                        "replace with a named constant (#define or const object)",
                    )),
                );
            }
        }

        violations
    }
}
