//! # barrc-lint-rules
//!
//! Built-in BARR-C rules for barrc-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Severity | Description |
//! |------|------|----------|-------------|
//! | `NAMING_FUNCTION` | `barrc-naming-function` | error | Function names follow `Module_Action` |
//! | `NAMING_VARIABLE` | `barrc-naming-variable` | error | Variables and parameters are `lower_snake_case` |
//! | `NAMING_CONSTANT` | `barrc-naming-constant` | error | File-scope constants are `UPPER_SNAKE_CASE` |
//! | `TYPE_PRIMITIVE` | `barrc-types-stdint` | error | Fixed-width integer types instead of `int`, `short`, `long` |
//! | `POINTER_CONST` | `barrc-safety-const-pointers` | warning | Pointer parameters point to `const` data |
//! | `MAGIC_NUMBER` | `barrc-safety-magic-numbers` | warning | No unnamed literals besides `0` and `1` in function bodies |
//!
//! ## Usage
//!
//! ```ignore
//! use barrc_lint_core::Analyzer;
//! use barrc_lint_rules::{FunctionNaming, StdintTypes};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./firmware")
//!     .rule(FunctionNaming::new())
//!     .rule(StdintTypes::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod const_pointers;
pub mod constant_naming;
pub mod function_naming;
pub mod magic_numbers;
mod presets;
pub mod stdint_types;
pub mod variable_naming;

pub use const_pointers::ConstPointers;
pub use constant_naming::ConstantNaming;
pub use function_naming::FunctionNaming;
pub use magic_numbers::MagicNumbers;
pub use presets::{all_rules, minimal_rules, recommended_rules, strict_rules, Preset};
pub use stdint_types::StdintTypes;
pub use variable_naming::VariableNaming;

/// Re-export core types for convenience.
pub use barrc_lint_core::{Rule, RuleBox, Severity, Violation};

/// Finds a built-in rule by code (`NAMING_FUNCTION`) or name
/// (`barrc-naming-function`).
#[must_use]
pub fn find_rule(code_or_name: &str) -> Option<RuleBox> {
    all_rules()
        .into_iter()
        .find(|r| r.code() == code_or_name || r.name() == code_or_name)
}
