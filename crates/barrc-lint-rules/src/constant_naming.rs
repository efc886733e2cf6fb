//! Rule requiring `UPPER_SNAKE_CASE` names for file-scope constants.

use barrc_lint_core::utils::naming::{is_upper_snake, to_upper_snake};
use barrc_lint_core::{
    Category, DeclKind, FileContext, Replacement, Rule, Severity, Suggestion, TranslationUnit,
    Violation,
};

/// Rule code for barrc-naming-constant.
pub const CODE: &str = "NAMING_CONSTANT";

/// Rule name for barrc-naming-constant.
pub const NAME: &str = "barrc-naming-constant";

/// Requires `const` objects at file scope to be `UPPER_SNAKE_CASE`.
#[derive(Debug, Clone)]
pub struct ConstantNaming {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ConstantNaming {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstantNaming {
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

impl Rule for ConstantNaming {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "File-scope constants must be UPPER_SNAKE_CASE"
    }

    fn category(&self) -> Category {
        Category::Naming
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, unit: &TranslationUnit) -> Vec<Violation> {
        unit.of_kind(DeclKind::Constant)
            .filter(|d| !is_upper_snake(&d.name))
            .map(|decl| {
                let location = ctx.decl_location(decl);
                let fixed = to_upper_snake(&decl.name);
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    location.clone(),
                    format!("constant '{}' should be UPPER_SNAKE_CASE", decl.name),
                )
                .with_suggestion(Suggestion::with_fix(
                    format!("rename to '{fixed}'"),
                    Replacement::rename(location, fixed, unit.scope_of(decl)),
                ))
            })
            .collect()
    }
}
