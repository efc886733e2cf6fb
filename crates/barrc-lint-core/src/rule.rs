//! Rule trait for defining lint rules.

use serde::{Deserialize, Serialize};

use crate::config::RuleConfig;
use crate::context::FileContext;
use crate::declaration::TranslationUnit;
use crate::types::{Severity, Violation};

/// Rule family, mirroring the sections of the coding standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Identifier naming conventions.
    Naming,
    /// Data type usage.
    Types,
    /// Const-correctness and literal hygiene.
    Safety,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Naming => write!(f, "naming"),
            Self::Types => write!(f, "types"),
            Self::Safety => write!(f, "safety"),
        }
    }
}

/// A per-file lint rule over extracted declarations and tokens.
///
/// Rules are configured once, before the first check, and are read-only
/// afterwards, so one instance can check many files concurrently.
///
/// # Example
///
/// ```ignore
/// use barrc_lint_core::{Category, FileContext, Rule, TranslationUnit, Violation};
///
/// pub struct NoGoto;
///
/// impl Rule for NoGoto {
///     fn name(&self) -> &'static str { "no-goto" }
///     fn code(&self) -> &'static str { "NO_GOTO" }
///     fn category(&self) -> Category { Category::Safety }
///
///     fn check(&self, ctx: &FileContext, unit: &TranslationUnit) -> Vec<Violation> {
///         unit.tokens
///             .iter()
///             .filter(|t| t.is_keyword("goto"))
///             .map(|t| Violation::new(self.code(), self.name(), self.default_severity(),
///                 ctx.token_location(t), "goto is not allowed"))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "barrc-naming-function").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "`NAMING_FUNCTION`").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the rule family.
    fn category(&self) -> Category;

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Applies rule-specific options from configuration.
    fn configure(&mut self, _config: &RuleConfig) {}

    /// Checks one translation unit and returns any violations found.
    fn check(&self, ctx: &FileContext, unit: &TranslationUnit) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST_RULE"
        }
        fn category(&self) -> Category {
            Category::Safety
        }

        fn check(&self, ctx: &FileContext, unit: &TranslationUnit) -> Vec<Violation> {
            unit.tokens
                .iter()
                .filter(|t| t.is_keyword("goto"))
                .map(|t| {
                    Violation::new(
                        self.code(),
                        self.name(),
                        self.default_severity(),
                        ctx.token_location(t),
                        "goto",
                    )
                })
                .collect()
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.default_severity(), Severity::Error);
        assert_eq!(rule.category().to_string(), "safety");

        let source = "void A_B(void) { goto done; done: ; }";
        let unit = TranslationUnit::parse(source).unwrap();
        let found = rule.check(&FileContext::anonymous(source), &unit);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location.column, 18);
        assert_eq!(found[0].location.length, 4);
    }
}
