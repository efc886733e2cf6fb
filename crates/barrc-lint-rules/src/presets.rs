//! Rule presets for common configurations.

use crate::{ConstPointers, ConstantNaming, FunctionNaming, MagicNumbers, StdintTypes, VariableNaming};
use barrc_lint_core::{RuleBox, Severity};

/// Preset configurations for barrc-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Every rule with its default severity.
    #[default]
    Recommended,
    /// Every rule, with pointer const-correctness raised to an error.
    Strict,
    /// Naming rules only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }

    /// Looks up a preset by its configuration name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Configuration name of the preset.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Minimal => "minimal",
        }
    }
}

/// Returns the recommended set of rules (all of them).
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    all_rules()
}

/// Returns the strict set of rules.
///
/// Same as recommended, but `POINTER_CONST` reports at error severity.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    vec![
        Box::new(FunctionNaming::new()),
        Box::new(VariableNaming::new()),
        Box::new(ConstantNaming::new()),
        Box::new(StdintTypes::new()),
        Box::new(ConstPointers::new().severity(Severity::Error)),
        Box::new(MagicNumbers::new()),
    ]
}

/// Returns the minimal set of rules:
/// - `NAMING_FUNCTION`
/// - `NAMING_VARIABLE`
/// - `NAMING_CONSTANT`
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![
        Box::new(FunctionNaming::new()),
        Box::new(VariableNaming::new()),
        Box::new(ConstantNaming::new()),
    ]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(FunctionNaming::new()),
        Box::new(VariableNaming::new()),
        Box::new(ConstantNaming::new()),
        Box::new(StdintTypes::new()),
        Box::new(ConstPointers::new()),
        Box::new(MagicNumbers::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.code()).collect()
    }

    #[test]
    fn test_preset_rules() {
        assert_eq!(Preset::Recommended.rules().len(), 6);
        assert_eq!(
            codes(&Preset::Minimal.rules()),
            vec!["NAMING_FUNCTION", "NAMING_VARIABLE", "NAMING_CONSTANT"]
        );
    }

    #[test]
    fn test_strict_raises_pointer_const() {
        let strict = Preset::Strict.rules();
        let pointer = strict.iter().find(|r| r.code() == "POINTER_CONST").unwrap();
        assert_eq!(pointer.default_severity(), Severity::Error);

        let recommended = Preset::Recommended.rules();
        let pointer = recommended
            .iter()
            .find(|r| r.code() == "POINTER_CONST")
            .unwrap();
        assert_eq!(pointer.default_severity(), Severity::Warning);
    }

    #[test]
    fn test_preset_names() {
        for preset in [Preset::Recommended, Preset::Strict, Preset::Minimal] {
            assert_eq!(Preset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(Preset::from_name("paranoid"), None);
    }
}
