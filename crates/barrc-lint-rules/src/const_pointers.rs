//! Rule requiring `const` on pointer parameters.
//!
//! # Rationale
//!
//! A pointer parameter that is not `const` tells the reader the function may
//! modify the caller's data. When it does not, the missing qualifier hides
//! the real contract and lets accidental writes compile.
//!
//! # Configuration
//!
//! - `analyze_writes`: skip parameters that the function body visibly writes
//!   through or passes on (default: false, every mutable pointer parameter
//!   is reported)

use barrc_lint_core::{
    Category, DeclKind, Declaration, FileContext, Rule, RuleConfig, Severity, Suggestion, Token,
    TokenKind, TranslationUnit, Violation,
};
use tracing::debug;

/// Rule code for barrc-safety-const-pointers.
pub const CODE: &str = "POINTER_CONST";

/// Rule name for barrc-safety-const-pointers.
pub const NAME: &str = "barrc-safety-const-pointers";

const ASSIGN_OPS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=",
];

fn is_assign_or_step(t: Option<&Token>) -> bool {
    t.is_some_and(|t| {
        t.kind == TokenKind::Punct
            && (ASSIGN_OPS.contains(&t.text.as_str()) || t.text == "++" || t.text == "--")
    })
}

fn is_step(t: Option<&Token>) -> bool {
    t.is_some_and(|t| t.is_punct("++") || t.is_punct("--"))
}

/// Index just past the bracket group opened at `open`.
fn skip_group(tokens: &[Token], open: usize) -> usize {
    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate().skip(open) {
        if t.is_punct("(") || t.is_punct("[") {
            depth += 1;
        } else if t.is_punct(")") || t.is_punct("]") {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return i + 1;
            }
        }
    }
    tokens.len()
}

/// Whether `body` writes through `name` or lets it escape.
///
/// Recognized writes: `*name = ...`, `name[i] = ...`, `name->field = ...`
/// and the `++`/`--` forms of each. Recognized escapes: `name` passed as a
/// call argument, assigned to another object, or returned.
fn writes_through(body: &[Token], name: &str) -> bool {
    for (i, t) in body.iter().enumerate() {
        if t.text != name || t.kind == TokenKind::Punct {
            continue;
        }
        let prev = i.checked_sub(1).and_then(|p| body.get(p));
        let next = body.get(i + 1);

        if prev.is_some_and(|p| p.is_punct("*")) {
            let before_star = i.checked_sub(2).and_then(|p| body.get(p));
            let unary = before_star.map_or(true, |b| {
                b.kind == TokenKind::Punct && !b.is_punct(")") && !b.is_punct("]")
            });
            if unary && (is_assign_or_step(next) || is_step(before_star)) {
                return true;
            }
        }

        match next {
            Some(n) if n.is_punct("[") => {
                if is_assign_or_step(body.get(skip_group(body, i + 1))) {
                    return true;
                }
            }
            Some(n) if n.is_punct("->") => {
                if is_assign_or_step(body.get(i + 3)) {
                    return true;
                }
            }
            _ => {}
        }

        // escapes
        let is_argument = prev.is_some_and(|p| p.is_punct("(") || p.is_punct(","))
            && next.is_some_and(|n| n.is_punct(")") || n.is_punct(","));
        let is_assigned =
            prev.is_some_and(|p| p.is_punct("=")) && next.is_some_and(|n| n.is_punct(";"));
        let is_returned = prev.is_some_and(|p| p.is_keyword("return"));
        if is_argument || is_assigned || is_returned {
            return true;
        }
    }
    false
}

/// Requires pointer parameters to point to `const` data.
#[derive(Debug, Clone)]
pub struct ConstPointers {
    /// Skip parameters the function body writes through.
    pub analyze_writes: bool,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ConstPointers {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstPointers {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            analyze_writes: false,
            severity: Severity::Warning,
        }
    }

    /// Enables write analysis of function bodies.
    #[must_use]
    pub fn analyze_writes(mut self, enabled: bool) -> Self {
        self.analyze_writes = enabled;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn is_written(&self, unit: &TranslationUnit, param: &Declaration) -> bool {
        if !self.analyze_writes {
            return false;
        }
        let written = unit
            .enclosing_function(param)
            .filter(|f| f.has_body)
            .is_some_and(|f| writes_through(unit.body_tokens(f), &param.name));
        if written {
            debug!("'{}' is written through, not reporting", param.name);
        }
        written
    }
}

impl Rule for ConstPointers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Pointer parameters should point to const data when not written through"
    }

    fn category(&self) -> Category {
        Category::Safety
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn configure(&mut self, config: &RuleConfig) {
        self.analyze_writes = config.get_bool("analyze_writes", self.analyze_writes);
    }

    fn check(&self, ctx: &FileContext, unit: &TranslationUnit) -> Vec<Violation> {
        unit.of_kind(DeclKind::Parameter)
            .filter(|p| p.is_pointer && !p.is_const_qualified)
            .filter(|p| !self.is_written(unit, p))
            .map(|param| {
                let function = unit
                    .enclosing_function(param)
                    .map_or("?", |f| f.name.as_str());
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.decl_location(param),
                    format!(
                        "pointer parameter '{}' of '{function}' is not const",
                        param.name
                    ),
                )
                .with_suggestion(Suggestion::new(format!(
                    "declare as 'const {} *{}' if the function does not modify the data",
                    param.base_type, param.name
                )))
                .with_doc_ref("BARR-C:2018 Rule 1.7")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_code(rule: &ConstPointers, code: &str) -> Vec<Violation> {
        let unit = TranslationUnit::parse(code).unwrap();
        rule.check(&FileContext::anonymous(code), &unit)
    }

    fn written(body: &str, name: &str) -> bool {
        let tokens = barrc_lint_core::tokenize(body).unwrap();
        writes_through(&tokens, name)
    }

    #[test]
    fn test_detects_mutable_pointer_parameter() {
        let code = "void LED_SetBrightness(uint8_t *brightness_ptr) {\n}\n";
        let violations = check_code(&ConstPointers::new(), code);
        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.severity, Severity::Warning);
        assert_eq!((v.location.line, v.location.column), (1, 33));
        assert_eq!(
            v.message,
            "pointer parameter 'brightness_ptr' of 'LED_SetBrightness' is not const"
        );
        assert_eq!(
            v.suggestion.as_ref().unwrap().message,
            "declare as 'const uint8_t *brightness_ptr' if the function does not modify the data"
        );
    }

    #[test]
    fn test_allows_const_and_non_pointers() {
        let code = "void UART_Send(const uint8_t *buf, uint8_t const *alt, uint16_t len);";
        assert!(check_code(&ConstPointers::new(), code).is_empty());
    }

    #[test]
    fn test_const_pointer_to_mutable_data_is_reported() {
        let code = "void BUF_Clear(uint8_t * const buf);";
        assert_eq!(check_code(&ConstPointers::new(), code).len(), 1);
    }

    #[test]
    fn test_array_parameter_is_pointer() {
        let code = "void BUF_Sum(uint8_t values[], uint8_t count);";
        let violations = check_code(&ConstPointers::new(), code);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("'values'"));
    }

    #[test]
    fn test_write_detection() {
        assert!(written("*out = 1;", "out"));
        assert!(written("++*out;", "out"));
        assert!(written("out[i + 1] = 0;", "out"));
        assert!(written("out->count += 2;", "out"));
        assert!(written("memset(out, 0, 4);", "out"));
        assert!(written("return out;", "out"));
        assert!(written("saved = out;", "out"));

        assert!(!written("x = *in + 1;", "in"));
        assert!(!written("total = a * in[0];", "in"));
        assert!(!written("if (in->count == 0) { }", "in"));
        assert!(!written("y = in[2];", "in"));
    }

    #[test]
    fn test_analyze_writes_skips_written_parameters() {
        let code = "void ADC_Read(uint16_t *out, uint16_t *scale) {\n    *out = 4U * (*scale);\n}\n";
        let all = check_code(&ConstPointers::new(), code);
        assert_eq!(all.len(), 2);

        let rule = ConstPointers::new().analyze_writes(true);
        let violations = check_code(&rule, code);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("'scale'"));
    }

    #[test]
    fn test_analyze_writes_keeps_prototypes() {
        let rule = ConstPointers::new().analyze_writes(true);
        assert_eq!(check_code(&rule, "void ADC_Read(uint16_t *out);").len(), 1);
    }
}
