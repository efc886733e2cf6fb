//! Rule requiring `lower_snake_case` variable and parameter names.
//!
//! File-scope constants are left to [`crate::ConstantNaming`].

use barrc_lint_core::utils::naming::{is_lower_snake, to_snake_case};
use barrc_lint_core::{
    Category, DeclKind, FileContext, Replacement, Rule, Severity, Suggestion, TranslationUnit,
    Violation,
};

/// Rule code for barrc-naming-variable.
pub const CODE: &str = "NAMING_VARIABLE";

/// Rule name for barrc-naming-variable.
pub const NAME: &str = "barrc-naming-variable";

/// Requires variables and parameters to be `lower_snake_case`.
#[derive(Debug, Clone)]
pub struct VariableNaming {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for VariableNaming {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableNaming {
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

impl Rule for VariableNaming {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Variable and parameter names must be lower_snake_case"
    }

    fn category(&self) -> Category {
        Category::Naming
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, unit: &TranslationUnit) -> Vec<Violation> {
        unit.declarations
            .iter()
            .filter(|d| matches!(d.kind, DeclKind::Variable | DeclKind::Parameter))
            .filter(|d| !is_lower_snake(&d.name))
            .map(|decl| {
                let location = ctx.decl_location(decl);
                let fixed = to_snake_case(&decl.name);
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    location.clone(),
                    format!(
                        "{} '{}' should be lower_snake_case",
                        decl.kind, decl.name
                    ),
                )
                .with_suggestion(Suggestion::with_fix(
                    format!("rename to '{fixed}'"),
                    Replacement::rename(location, fixed, unit.scope_of(decl)),
                ))
                .with_doc_ref("BARR-C:2018 Rule 7.1")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_code(code: &str) -> Vec<Violation> {
        let unit = TranslationUnit::parse(code).unwrap();
        VariableNaming::new().check(&FileContext::anonymous(code), &unit)
    }

    #[test]
    fn test_detects_camel_case_local() {
        let violations = check_code("void LED_Init(void) {\n    int ledPin = 13;\n}\n");
        assert_eq!(violations.len(), 1);
        assert_eq!((violations[0].location.line, violations[0].location.column), (2, 9));
        assert_eq!(
            violations[0].message,
            "variable 'ledPin' should be lower_snake_case"
        );
        assert_eq!(
            violations[0].suggestion.as_ref().unwrap().message,
            "rename to 'led_pin'"
        );
    }

    #[test]
    fn test_detects_parameters_once_each() {
        let violations = check_code("void UART_Send(const uint8_t *txBuf, uint16_t Len, uint8_t ok);");
        let names: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "parameter 'txBuf' should be lower_snake_case",
                "parameter 'Len' should be lower_snake_case",
            ]
        );
    }

    #[test]
    fn test_allows_snake_case_and_ignores_constants() {
        let code = "static const uint8_t MAX_LEVEL = 9;\nuint8_t g_level;\nvoid LED_Init(void) { uint8_t led_pin = 13; }\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_rename_scope_is_enclosing_function() {
        let code = "void A_B(void) { int myVal = 0; myVal++; }\nint other;";
        let violations = check_code(code);
        let replacement = violations[0]
            .suggestion
            .as_ref()
            .unwrap()
            .replacement
            .as_ref()
            .unwrap();
        assert_eq!(
            replacement.scope,
            barrc_lint_core::ReplaceScope::Identifier {
                start: 0,
                end: code.find('\n').unwrap()
            }
        );
    }
}
