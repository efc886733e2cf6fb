//! Rule engine: runs the enabled rules over one translation unit.

use tracing::{debug, warn};

use crate::config::Config;
use crate::context::FileContext;
use crate::declaration::TranslationUnit;
use crate::lexer::LexError;
use crate::rule::{Rule, RuleBox};
use crate::types::Violation;
use crate::utils::allowance::Allowances;

/// Builder for configuring a [`RuleEngine`].
#[derive(Default)]
pub struct RuleEngineBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
    enabled: Option<Vec<String>>,
}

impl RuleEngineBuilder {
    /// Creates a new builder with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds several boxed rules, keeping their order.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration (rule options, severities, enabled set).
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Restricts the engine to the given rule codes or names.
    #[must_use]
    pub fn enable_only<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    /// Builds the engine, passing each rule its configuration table.
    #[must_use]
    pub fn build(self) -> RuleEngine {
        let mut config = self.config.unwrap_or_default();
        if let Some(enabled) = self.enabled {
            config.enabled_rule_codes = Some(enabled);
        }

        let mut rules = self.rules;
        for rule in &mut rules {
            if let Some(rule_config) = config.rule_config(rule.code(), rule.name()) {
                rule.configure(rule_config);
            }
        }

        if let Some(codes) = &config.enabled_rule_codes {
            for code in codes {
                if !rules.iter().any(|r| r.code() == code || r.name() == code) {
                    warn!("Unknown rule in enabled list: {}", code);
                }
            }
        }

        RuleEngine { rules, config }
    }
}

/// Applies an ordered set of rules to a translation unit.
///
/// The engine holds no per-file state; one instance can check many files
/// from many threads.
pub struct RuleEngine {
    rules: Vec<RuleBox>,
    config: Config,
}

impl RuleEngine {
    /// Creates a new builder for configuring an engine.
    #[must_use]
    pub fn builder() -> RuleEngineBuilder {
        RuleEngineBuilder::new()
    }

    /// Returns the registered rules, enabled or not.
    #[must_use]
    pub fn rules(&self) -> &[RuleBox] {
        &self.rules
    }

    /// Returns the configuration the engine was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns true if `rule` runs in this engine.
    #[must_use]
    pub fn is_enabled(&self, rule: &dyn Rule) -> bool {
        self.config.is_rule_enabled(rule.code(), rule.name())
    }

    /// Returns the number of enabled rules.
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.rules
            .iter()
            .filter(|r| self.is_enabled(r.as_ref()))
            .count()
    }

    /// Runs every enabled rule and returns the violations sorted by line,
    /// column, then rule code. Never fails.
    #[must_use]
    pub fn check(&self, ctx: &FileContext, unit: &TranslationUnit) -> Vec<Violation> {
        let allowances = Allowances::scan(ctx.content);
        let mut violations = Vec::new();

        for rule in &self.rules {
            if !self.is_enabled(rule.as_ref()) {
                debug!("Skipping disabled rule: {}", rule.code());
                continue;
            }

            let severity = self.config.rule_severity(rule.code(), rule.name());
            let ids = [rule.code(), rule.name()];
            violations.extend(
                rule.check(ctx, unit)
                    .into_iter()
                    .filter(|v| !allowances.check(v.location.line, &ids).is_allowed())
                    .map(|mut v| {
                        if let Some(severity) = severity {
                            v.severity = severity;
                        }
                        v
                    }),
            );
        }

        violations.sort_by(|a, b| {
            a.location
                .line
                .cmp(&b.location.line)
                .then(a.location.column.cmp(&b.location.column))
                .then_with(|| a.code.cmp(&b.code))
        });
        violations
    }

    /// Tokenizes, extracts and checks the source text of `ctx`.
    ///
    /// # Errors
    ///
    /// Returns the [`LexError`] of an unterminated comment or literal.
    pub fn check_source(&self, ctx: &FileContext) -> Result<Vec<Violation>, LexError> {
        let unit = TranslationUnit::parse(ctx.content)?;
        debug!(
            "{}: {} tokens, {} declarations",
            ctx.path.display(),
            unit.tokens.len(),
            unit.declarations.len()
        );
        Ok(self.check(ctx, &unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::declaration::DeclKind;
    use crate::rule::Category;
    use crate::types::Severity;

    /// Flags every variable, optionally only those named in `names`.
    #[derive(Default)]
    struct FlagVariables {
        only: Option<Vec<String>>,
    }

    impl Rule for FlagVariables {
        fn name(&self) -> &'static str {
            "flag-variables"
        }
        fn code(&self) -> &'static str {
            "FLAG_VARIABLES"
        }
        fn category(&self) -> Category {
            Category::Naming
        }
        fn configure(&mut self, config: &RuleConfig) {
            self.only = config.get_str_array("only");
        }
        fn check(&self, ctx: &FileContext, unit: &TranslationUnit) -> Vec<Violation> {
            unit.of_kind(DeclKind::Variable)
                .filter(|d| self.only.as_ref().map_or(true, |o| o.contains(&d.name)))
                .map(|d| {
                    Violation::new(
                        self.code(),
                        self.name(),
                        self.default_severity(),
                        ctx.decl_location(d),
                        format!("variable '{}'", d.name),
                    )
                })
                .collect()
        }
    }

    /// Flags every function, at the same positions as nothing else.
    struct FlagFunctions;

    impl Rule for FlagFunctions {
        fn name(&self) -> &'static str {
            "flag-functions"
        }
        fn code(&self) -> &'static str {
            "A_FLAG_FUNCTIONS"
        }
        fn category(&self) -> Category {
            Category::Naming
        }
        fn default_severity(&self) -> Severity {
            Severity::Warning
        }
        fn check(&self, ctx: &FileContext, unit: &TranslationUnit) -> Vec<Violation> {
            unit.of_kind(DeclKind::Function)
                .map(|d| {
                    Violation::new(
                        self.code(),
                        self.name(),
                        self.default_severity(),
                        ctx.decl_location(d),
                        "function",
                    )
                })
                .collect()
        }
    }

    const SOURCE: &str = "int g_b;\nvoid LED_Init(void) {\n    int a;\n}\n";

    fn engine() -> RuleEngine {
        RuleEngine::builder()
            .rule(FlagVariables::default())
            .rule(FlagFunctions)
            .build()
    }

    #[test]
    fn test_sorted_by_position() {
        let found = engine()
            .check_source(&FileContext::anonymous(SOURCE))
            .unwrap();
        let order: Vec<_> = found
            .iter()
            .map(|v| (v.location.line, v.location.column, v.code.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (1, 5, "FLAG_VARIABLES"),
                (2, 6, "A_FLAG_FUNCTIONS"),
                (3, 9, "FLAG_VARIABLES"),
            ]
        );
    }

    #[test]
    fn test_idempotent() {
        let engine = engine();
        let ctx = FileContext::anonymous(SOURCE);
        assert_eq!(
            engine.check_source(&ctx).unwrap(),
            engine.check_source(&ctx).unwrap()
        );
    }

    #[test]
    fn test_enable_only_and_severity_override() {
        let config = Config::parse(
            "[rules.flag-variables]\nseverity = \"info\"\nonly = [\"a\"]\n",
        )
        .unwrap();
        let engine = RuleEngine::builder()
            .rule(FlagVariables::default())
            .rule(FlagFunctions)
            .config(config)
            .enable_only(["FLAG_VARIABLES"])
            .build();
        assert_eq!(engine.enabled_count(), 1);

        let found = engine
            .check_source(&FileContext::anonymous(SOURCE))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "variable 'a'");
        assert_eq!(found[0].severity, Severity::Info);
    }

    #[test]
    fn test_allow_comment_suppresses() {
        let source = "// barrc-lint: allow(flag-variables)\nint g_b;\nint g_c;\n";
        let found = engine()
            .check_source(&FileContext::anonymous(source))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location.line, 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(engine()
            .check_source(&FileContext::anonymous(""))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_lex_error() {
        let err = engine()
            .check_source(&FileContext::anonymous("int a; /* never closed"))
            .unwrap_err();
        assert_eq!((err.line, err.column), (1, 8));
    }
}
