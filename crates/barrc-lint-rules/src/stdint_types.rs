//! Rule requiring fixed-width integer types from `<stdint.h>`.
//!
//! # Rationale
//!
//! The width of `int`, `short` and `long` depends on the compiler and target.
//! Embedded code that stores register values, protocol fields or counters
//! needs to know exactly how many bits it has.
//!
//! Plain `char` is only reported when it is initialized with a number, since
//! that is when it is being used for numeric storage rather than text.

use barrc_lint_core::{
    Category, DeclKind, Declaration, FileContext, LiteralKind, Replacement, Rule, Severity,
    Suggestion, TokenKind, TranslationUnit, Violation,
};

/// Rule code for barrc-types-stdint.
pub const CODE: &str = "TYPE_PRIMITIVE";

/// Rule name for barrc-types-stdint.
pub const NAME: &str = "barrc-types-stdint";

/// Replacement advice for a banned primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Advice {
    /// One exact fixed-width equivalent.
    Exact(&'static str),
    /// No single equivalent; the text explains the choice.
    Choice(&'static str),
}

impl Advice {
    fn text(&self) -> &'static str {
        match self {
            Self::Exact(t) | Self::Choice(t) => t,
        }
    }
}

/// Classifies a base type. Returns `None` when it is not a banned primitive.
fn classify(base_type: &str, numeric_char: bool) -> Option<Advice> {
    let mut unsigned = false;
    let mut signed = false;
    let mut chars = 0;
    let mut shorts = 0;
    let mut longs = 0;
    let mut ints = 0;

    for word in base_type.split_whitespace() {
        match word {
            "unsigned" => unsigned = true,
            "signed" => signed = true,
            "char" => chars += 1,
            "short" => shorts += 1,
            "long" => longs += 1,
            "int" => ints += 1,
            _ => return None,
        }
    }

    let advice = match (chars, shorts, longs) {
        (1, 0, 0) if ints == 0 => {
            if unsigned {
                Advice::Exact("uint8_t")
            } else if signed {
                Advice::Exact("int8_t")
            } else if numeric_char {
                Advice::Choice("uint8_t or int8_t (plain char signedness is implementation-defined)")
            } else {
                return None;
            }
        }
        (0, 1, 0) if ints <= 1 => {
            if unsigned {
                Advice::Exact("uint16_t")
            } else {
                Advice::Exact("int16_t")
            }
        }
        (0, 0, 1) if ints <= 1 => {
            if unsigned {
                Advice::Choice("uint32_t or uint64_t (depends on platform)")
            } else {
                Advice::Choice("int32_t or int64_t (depends on platform)")
            }
        }
        (0, 0, 2) if ints <= 1 => {
            if unsigned {
                Advice::Exact("uint64_t")
            } else {
                Advice::Exact("int64_t")
            }
        }
        (0, 0, 0) if ints <= 1 && (ints == 1 || unsigned || signed) => {
            if unsigned {
                Advice::Exact("uint32_t")
            } else {
                Advice::Exact("int32_t")
            }
        }
        _ => return None,
    };
    Some(advice)
}

/// Whether a declaration's initializer is a (possibly negated) number.
fn has_numeric_initializer(unit: &TranslationUnit, decl: &Declaration) -> bool {
    let Some(range) = decl.initializer.clone() else {
        return false;
    };
    let tokens = unit.tokens.get(range).unwrap_or(&[]);
    let tokens = match tokens.first() {
        Some(t) if t.is_punct("-") || t.is_punct("+") => &tokens[1..],
        _ => tokens,
    };
    matches!(
        tokens,
        [t] if t.kind == TokenKind::Literal(LiteralKind::Number)
    )
}

/// Requires fixed-width integer types instead of `int`, `short`, `long`
/// and `char` used as numbers.
#[derive(Debug, Clone)]
pub struct StdintTypes {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for StdintTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl StdintTypes {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for StdintTypes {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Use fixed-width integer types (uint8_t, int16_t, ...) instead of primitives"
    }

    fn category(&self) -> Category {
        Category::Types
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, unit: &TranslationUnit) -> Vec<Violation> {
        let mut violations = Vec::new();

        for decl in &unit.declarations {
            if !matches!(
                decl.kind,
                DeclKind::Variable | DeclKind::Parameter | DeclKind::Constant
            ) {
                continue;
            }
            let numeric_char = !decl.is_pointer && has_numeric_initializer(unit, decl);
            let Some(advice) = classify(&decl.base_type, numeric_char) else {
                continue;
            };

            let message = format!(
                "{} '{}' uses '{}'; use fixed-width {}",
                decl.kind,
                decl.name,
                decl.base_type,
                advice.text()
            );
            let suggestion = match (&advice, decl.type_span) {
                (Advice::Exact(fixed), Some((offset, length))) => {
                    let at = unit
                        .tokens
                        .iter()
                        .find(|t| t.offset == offset)
                        .map_or_else(
                            || ctx.decl_location(decl),
                            |t| ctx.token_location(t),
                        )
                        .with_span(offset, length);
                    Suggestion::with_fix(
                        format!("replace '{}' with '{fixed}'", decl.base_type),
                        Replacement::new(at, *fixed),
                    )
                }
                _ => Suggestion::new(format!(
                    "replace '{}' with {}",
                    decl.base_type,
                    advice.text()
                )),
            };

            violations.push(
                Violation::new(CODE, NAME, self.severity, ctx.decl_location(decl), message)
                    .with_suggestion(suggestion)
                    .with_doc_ref("BARR-C:2018 Rule 5.2"),
            );
        }

        violations
    }
}
