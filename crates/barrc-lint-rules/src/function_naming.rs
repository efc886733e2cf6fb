//! Rule requiring `Module_Action` function names.
//!
//! # Rationale
//!
//! Prefixing every function with its module (`LED_Init`, `UART_SendByte`)
//! makes the owner of a symbol obvious at each call site in a language
//! without namespaces.
//!
//! # Configuration
//!
//! - `exempt`: names never checked (default: `["main"]`)
//! - `allow_digits`: allow digits inside segments, as in `UART2_Send`
//!   (default: true)
//! - `module_prefix`: placeholder module used in suggestions when none can
//!   be inferred from the name (default: `"Module"`)

use barrc_lint_core::utils::naming::{is_module_action, to_module_action, to_pascal_case};
use barrc_lint_core::{
    Category, FileContext, Replacement, Rule, RuleConfig, Severity, Suggestion, TranslationUnit,
    Violation,
};

/// Rule code for barrc-naming-function.
pub const CODE: &str = "NAMING_FUNCTION";

/// Rule name for barrc-naming-function.
pub const NAME: &str = "barrc-naming-function";

/// Requires function names of the form `Module_Action`.
#[derive(Debug, Clone)]
pub struct FunctionNaming {
    /// Function names that are never checked.
    pub exempt: Vec<String>,
    /// Allow digits inside name segments.
    pub allow_digits: bool,
    /// Module placeholder for suggestions.
    pub module_prefix: String,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for FunctionNaming {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionNaming {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            exempt: vec!["main".to_string()],
            allow_digits: true,
            module_prefix: "Module".to_string(),
            severity: Severity::Error,
        }
    }

    /// Sets the exempt names.
    #[must_use]
    pub fn exempt<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exempt = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether digits are allowed inside segments.
    #[must_use]
    pub fn allow_digits(mut self, allow: bool) -> Self {
        self.allow_digits = allow;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for FunctionNaming {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Function names must follow Module_Action (e.g. LED_Init)"
    }

    fn category(&self) -> Category {
        Category::Naming
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn configure(&mut self, config: &RuleConfig) {
        if let Some(exempt) = config.get_str_array("exempt") {
            self.exempt = exempt;
        }
        self.allow_digits = config.get_bool("allow_digits", self.allow_digits);
        self.module_prefix = config
            .get_str("module_prefix", &self.module_prefix)
            .to_string();
    }

    fn check(&self, ctx: &FileContext, unit: &TranslationUnit) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (_, function) in unit.functions() {
            let name = function.name.as_str();
            if self.exempt.iter().any(|e| e == name) || is_module_action(name, self.allow_digits)
            {
                continue;
            }

            let location = ctx.decl_location(function);
            let suggestion = match to_module_action(name) {
                Some(fixed) => Suggestion::with_fix(
                    format!("rename to '{fixed}'"),
                    Replacement::rename(location.clone(), fixed.clone(), unit.scope_of(function)),
                ),
                None => Suggestion::new(format!(
                    "rename to '{}_{}' with the owning module as prefix",
                    self.module_prefix,
                    to_pascal_case(name)
                )),
            };

            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    location,
                    format!(
                        "function '{name}' should be named Module_Action (e.g. LED_Init)"
                    ),
                )
                .with_suggestion(suggestion)
                .with_doc_ref("BARR-C:2018 Rule 6.1"),
            );
        }

        violations
    }
}
