//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! // barrc-lint: allow(NAMING_FUNCTION) reason="vendor HAL callback"
//! /* barrc-lint: allow(barrc-safety-magic-numbers, TYPE_PRIMITIVE) */
//! ```
//!
//! A directive applies to its own line and the line below it. `all` matches
//! every rule.

use std::collections::{HashMap, HashSet};

const DIRECTIVE_PREFIX: &str = "barrc-lint:";

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule codes or names that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

impl AllowDirective {
    fn matches(&self, rule_ids: &[&str]) -> bool {
        self.rules.contains("all") || rule_ids.iter().any(|id| self.rules.contains(*id))
    }
}

/// All allowance directives of one file, indexed by line.
#[derive(Debug, Clone, Default)]
pub struct Allowances {
    by_line: HashMap<usize, AllowDirective>,
}

impl Allowances {
    /// Collects every directive in `content`.
    #[must_use]
    pub fn scan(content: &str) -> Self {
        let by_line = content
            .lines()
            .enumerate()
            .filter_map(|(i, line)| parse_allow_directive(line).map(|d| (i + 1, d)))
            .collect();
        Self { by_line }
    }

    /// Returns true if the file has no directives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    /// Checks whether a violation on `line` of a rule known by any of
    /// `rule_ids` is allowed.
    #[must_use]
    pub fn check(&self, line: usize, rule_ids: &[&str]) -> AllowCheck {
        for check_line in [line.saturating_sub(1), line] {
            if let Some(directive) = self.by_line.get(&check_line) {
                if directive.matches(rule_ids) {
                    return AllowCheck::Allowed {
                        reason: directive.reason.clone(),
                    };
                }
            }
        }
        AllowCheck::Denied
    }
}

/// Parses an allowance directive from a line containing a comment.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let comment_start = match (line.find("//"), line.find("/*")) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => return None,
    };
    let comment = line[comment_start + 2..].trim();
    let comment = comment.strip_suffix("*/").unwrap_or(comment).trim();

    let directive = comment.strip_prefix(DIRECTIVE_PREFIX)?.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()));

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_directive() {
        let directive = parse_allow_directive("// barrc-lint: allow(NAMING_FUNCTION)").unwrap();
        assert!(directive.rules.contains("NAMING_FUNCTION"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_block_comment_with_reason() {
        let directive = parse_allow_directive(
            "/* barrc-lint: allow(MAGIC_NUMBER) reason=\"register map\" */",
        )
        .unwrap();
        assert!(directive.rules.contains("MAGIC_NUMBER"));
        assert_eq!(directive.reason.as_deref(), Some("register map"));
    }

    #[test]
    fn test_parse_trailing_comment_and_multiple_rules() {
        let directive = parse_allow_directive(
            "int ledPin; // barrc-lint: allow(NAMING_VARIABLE, barrc-types-stdint)",
        )
        .unwrap();
        assert!(directive.rules.contains("NAMING_VARIABLE"));
        assert!(directive.rules.contains("barrc-types-stdint"));
    }

    #[test]
    fn test_ignores_other_comments() {
        assert!(parse_allow_directive("// allow(NAMING_VARIABLE)").is_none());
        assert!(parse_allow_directive("int x = 1;").is_none());
        assert!(parse_allow_directive("// barrc-lint: allow()").is_none());
    }

    #[test]
    fn test_check_line_above_and_same_line() {
        let content = "void f(void) {\n    // barrc-lint: allow(NAMING_VARIABLE) reason=\"legacy\"\n    int ledPin;\n}";
        let ids = ["NAMING_VARIABLE", "barrc-naming-variable"];

        let allowances = Allowances::scan(content);

        let result = allowances.check(3, &ids);
        assert!(result.is_allowed());
        assert_eq!(result.reason(), Some("legacy"));
        assert!(allowances.check(2, &ids).is_allowed());
        assert!(!allowances.check(4, &ids).is_allowed());
        assert!(!allowances.check(3, &["TYPE_PRIMITIVE"]).is_allowed());
    }

    #[test]
    fn test_allowances_all() {
        let allowances = Allowances::scan("/* barrc-lint: allow(all) */\nint ledPin;\n");
        assert!(!allowances.is_empty());
        assert!(allowances.check(2, &["ANYTHING"]).is_allowed());
        assert_eq!(allowances.check(3, &["ANYTHING"]), AllowCheck::Denied);
    }
}
