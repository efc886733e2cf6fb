//! # barrc-lint-core
//!
//! Core engine for checking C sources against the BARR-C embedded coding
//! standard.
//!
//! The pipeline is `text → tokens → declarations → violations`:
//!
//! - [`lexer`] turns source text into [`Token`]s with line/column/offset
//! - [`TranslationUnit::parse`] extracts function, parameter, variable and
//!   constant [`Declaration`]s with a partial parser
//! - [`RuleEngine`] runs the enabled [`Rule`]s and returns sorted [`Violation`]s
//!
//! The pipeline does no file-system access. [`Analyzer`] drives it over a
//! directory tree in parallel, and [`fix::apply_fixes`] rewrites a file from
//! the replacements attached to its violations.
//!
//! ## Example
//!
//! ```ignore
//! use barrc_lint_core::{FileContext, RuleEngine};
//!
//! let engine = RuleEngine::builder()
//!     .rules(barrc_lint_rules::all_rules())
//!     .build();
//!
//! let source = "void initLED(void) { int ledPin = 13; }";
//! let violations = engine.check_source(&FileContext::anonymous(source))?;
//! for v in &violations {
//!     println!("{v}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod declaration;
mod engine;
mod extractor;
pub mod fix;
pub mod lexer;
mod rule;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, FileOutcome};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{FileContext, ANONYMOUS_FILE};
pub use declaration::{DeclId, DeclKind, Declaration, Position, TranslationUnit};
pub use engine::{RuleEngine, RuleEngineBuilder};
pub use extractor::extract;
pub use lexer::{tokenize, LexError, LexErrorKind, Lexer, LiteralKind, Token, TokenKind};
pub use rule::{Category, Rule, RuleBox};
pub use types::{
    FileError, LintResult, Location, ReplaceScope, Replacement, Severity, Suggestion, Violation,
};
