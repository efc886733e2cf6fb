//! Automatic fixes from violation replacements.
//!
//! Edits are computed against the original text and applied back to front.
//! Type replacements are accepted first, then renames; an edit overlapping
//! one already accepted is skipped.

use tracing::debug;

use crate::lexer::{self, LexError, TokenKind};
use crate::types::{ReplaceScope, Violation};

const STDINT_INCLUDE: &str = "#include <stdint.h>";

/// Result of [`apply_fixes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// The rewritten source.
    pub source: String,
    /// Number of violations whose replacement was applied.
    pub applied: usize,
    /// Number of violations whose replacement conflicted with another.
    pub skipped: usize,
    /// Whether `#include <stdint.h>` was inserted.
    pub added_include: bool,
}

impl FixOutcome {
    /// Returns true if the source changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.applied > 0 || self.added_include
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

impl Edit {
    fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Applies the automatic replacements carried by `violations` to `source`.
///
/// Violations without a replacement are ignored. When a type replacement
/// was applied and the file does not include `<stdint.h>`, the include is
/// added.
///
/// # Errors
///
/// Returns a [`LexError`] if `source` cannot be tokenized.
pub fn apply_fixes(source: &str, violations: &[Violation]) -> Result<FixOutcome, LexError> {
    let tokens = lexer::tokenize(source)?;

    let replacements: Vec<_> = violations
        .iter()
        .filter_map(|v| v.suggestion.as_ref()?.replacement.as_ref())
        .collect();
    let (spans, renames): (Vec<_>, Vec<_>) = replacements
        .into_iter()
        .partition(|r| r.scope == ReplaceScope::Span);

    let mut accepted: Vec<Edit> = Vec::new();
    let mut applied = 0;
    let mut skipped = 0;
    let mut types_fixed = false;

    for replacement in spans.into_iter().chain(renames) {
        let start = replacement.location.offset;
        let end = start + replacement.location.length;
        let Some(old) = source.get(start..end) else {
            skipped += 1;
            continue;
        };

        let edits: Vec<Edit> = match replacement.scope {
            ReplaceScope::Span => vec![Edit {
                start,
                end,
                text: replacement.new_text.clone(),
            }],
            ReplaceScope::Identifier {
                start: region_start,
                end: region_end,
            } => tokens
                .iter()
                .filter(|t| {
                    matches!(t.kind, TokenKind::Identifier | TokenKind::TypeName)
                        && t.text == old
                        && (region_start..region_end).contains(&t.offset)
                })
                .map(|t| Edit {
                    start: t.offset,
                    end: t.end(),
                    text: replacement.new_text.clone(),
                })
                .collect(),
        };

        let fresh: Vec<Edit> = edits
            .into_iter()
            .filter(|e| !accepted.contains(e))
            .collect();
        if fresh.iter().any(|e| accepted.iter().any(|a| a.overlaps(e))) {
            debug!("Skipping conflicting fix '{}' -> '{}'", old, replacement.new_text);
            skipped += 1;
            continue;
        }

        if replacement.scope == ReplaceScope::Span && !fresh.is_empty() {
            types_fixed = true;
        }
        accepted.extend(fresh);
        applied += 1;
    }

    accepted.sort_by(|a, b| b.start.cmp(&a.start));
    let mut fixed = source.to_string();
    for edit in &accepted {
        fixed.replace_range(edit.start..edit.end, &edit.text);
    }

    let mut added_include = false;
    if types_fixed {
        if let Some(with_include) = ensure_stdint_include(&fixed)? {
            fixed = with_include;
            added_include = true;
        }
    }

    Ok(FixOutcome {
        source: fixed,
        applied,
        skipped,
        added_include,
    })
}

/// Inserts `#include <stdint.h>` after the last `#include`, or before the
/// first line of code. Returns `None` when the header is already included.
///
/// The rest of the text is left byte for byte as it was, and the inserted
/// lines use the file's own line ending.
///
/// # Errors
///
/// Returns a [`LexError`] if `source` cannot be tokenized.
pub fn ensure_stdint_include(source: &str) -> Result<Option<String>, LexError> {
    let eol = if source.contains("\r\n") { "\r\n" } else { "\n" };
    let is_include = |line: &str| {
        let trimmed = line.trim_start();
        trimmed.starts_with('#') && trimmed[1..].trim_start().starts_with("include")
    };

    let mut last_include_end = None;
    let mut line_start = 0;
    for line in source.split_inclusive('\n') {
        if is_include(line) {
            if line.contains("stdint.h") {
                return Ok(None);
            }
            last_include_end = Some(line_start + line.len());
        }
        line_start += line.len();
    }

    let mut fixed = source.to_string();
    if let Some(at) = last_include_end {
        if source[..at].ends_with('\n') {
            fixed.insert_str(at, &format!("{STDINT_INCLUDE}{eol}"));
        } else {
            fixed.insert_str(at, &format!("{eol}{STDINT_INCLUDE}"));
        }
        return Ok(Some(fixed));
    }

    // Comments and directives produce no tokens, so the first token is the
    // first line of code.
    let tokens = lexer::tokenize(source)?;
    match tokens.first() {
        Some(first) => {
            let line_start = source[..first.offset].rfind('\n').map_or(0, |i| i + 1);
            if source[line_start..first.offset].trim().is_empty() {
                fixed.insert_str(line_start, &format!("{STDINT_INCLUDE}{eol}{eol}"));
            } else {
                fixed.insert_str(first.offset, &format!("{eol}{STDINT_INCLUDE}{eol}{eol}"));
            }
        }
        None => {
            if !fixed.is_empty() && !fixed.ends_with('\n') {
                fixed.push_str(eol);
            }
            fixed.push_str(STDINT_INCLUDE);
            fixed.push_str(eol);
        }
    }
    Ok(Some(fixed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Replacement, Severity, Suggestion};
    use std::path::PathBuf;

    fn violation(offset: usize, length: usize, replacement: impl FnOnce(Location) -> Replacement) -> Violation {
        let location = Location::new(PathBuf::from("a.c"), 1, 1).with_span(offset, length);
        Violation::new("X", "x", Severity::Error, location.clone(), "m")
            .with_suggestion(Suggestion::with_fix("fix", replacement(location)))
    }

    #[test]
    fn test_type_fix_adds_include() {
        let source = "// led driver\n\nvoid LED_Init(void) {\n    unsigned char level = 0;\n}\n";
        let offset = source.find("unsigned char").unwrap();
        let v = violation(offset, "unsigned char".len(), |l| Replacement::new(l, "uint8_t"));

        let outcome = apply_fixes(source, &[v]).unwrap();
        assert_eq!(
            outcome.source,
            "// led driver\n\n#include <stdint.h>\n\nvoid LED_Init(void) {\n    uint8_t level = 0;\n}\n"
        );
        assert_eq!(outcome.applied, 1);
        assert!(outcome.added_include);
    }

    #[test]
    fn test_rename_all_occurrences_in_region() {
        let source = "void initLED(void);\nvoid initLED(void) {}\nvoid App_Run(void) { initLED(); }\n";
        let offset = source.find("initLED").unwrap();
        let v = violation(offset, 7, |l| Replacement::rename(l, "LED_Init", 0..source.len()));

        let outcome = apply_fixes(source, &[v]).unwrap();
        assert_eq!(
            outcome.source,
            "void LED_Init(void);\nvoid LED_Init(void) {}\nvoid App_Run(void) { LED_Init(); }\n"
        );
        assert!(!outcome.added_include);
    }

    #[test]
    fn test_rename_ignores_comments_strings_and_other_regions() {
        let source = "void A_B(void) { int ledPin = 1; ledPin++; }\n/* ledPin */ int other = ledPin;\n";
        let offset = source.find("ledPin").unwrap();
        let end = source.find('}').unwrap() + 1;
        let v = violation(offset, 6, |l| Replacement::rename(l, "led_pin", 0..end));

        let outcome = apply_fixes(source, &[v]).unwrap();
        assert_eq!(
            outcome.source,
            "void A_B(void) { int led_pin = 1; led_pin++; }\n/* ledPin */ int other = ledPin;\n"
        );
    }

    #[test]
    fn test_conflicting_edit_skipped() {
        let source = "int x;\n";
        let a = violation(0, 3, |l| Replacement::new(l, "int32_t"));
        let b = violation(0, 3, |l| Replacement::new(l, "int16_t"));

        let outcome = apply_fixes(source, &[a, b]).unwrap();
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.skipped, 1);
        assert!(outcome.source.starts_with("#include <stdint.h>\n\nint32_t x;"));
    }

    #[test]
    fn test_include_after_last_include() {
        let source = "#include \"led.h\"\n#include <stdbool.h>\nint x;";
        assert_eq!(
            ensure_stdint_include(source).unwrap().unwrap(),
            "#include \"led.h\"\n#include <stdbool.h>\n#include <stdint.h>\nint x;"
        );
        assert_eq!(ensure_stdint_include("#include <stdint.h>\n").unwrap(), None);
    }

    #[test]
    fn test_include_goes_after_leading_block_comment() {
        let source = "/*\n   Copyright 2024 Acme\n   int x;\n*/\nvoid A_B(void) {\n    unsigned char x = 0;\n}\n";
        let offset = source.find("unsigned char").unwrap();
        let v = violation(offset, "unsigned char".len(), |l| Replacement::new(l, "uint8_t"));

        let outcome = apply_fixes(source, &[v]).unwrap();
        assert_eq!(
            outcome.source,
            "/*\n   Copyright 2024 Acme\n   int x;\n*/\n#include <stdint.h>\n\nvoid A_B(void) {\n    uint8_t x = 0;\n}\n"
        );
    }

    #[test]
    fn test_include_after_header_guard() {
        let source = "#ifndef LED_H\n#define LED_H\nunsigned char LED_Level(void);\n#endif\n";
        assert_eq!(
            ensure_stdint_include(source).unwrap().unwrap(),
            "#ifndef LED_H\n#define LED_H\n#include <stdint.h>\n\nunsigned char LED_Level(void);\n#endif\n"
        );
    }

    #[test]
    fn test_crlf_line_endings_preserved() {
        let source = "// hdr\r\nvoid A_B(void) {\r\n    unsigned char x = 0;\r\n}\r\n";
        let offset = source.find("unsigned char").unwrap();
        let v = violation(offset, "unsigned char".len(), |l| Replacement::new(l, "uint8_t"));

        let outcome = apply_fixes(source, &[v]).unwrap();
        assert_eq!(
            outcome.source,
            "// hdr\r\n#include <stdint.h>\r\n\r\nvoid A_B(void) {\r\n    uint8_t x = 0;\r\n}\r\n"
        );

        let included = "#include \"led.h\"\r\nint x;\r\n";
        assert_eq!(
            ensure_stdint_include(included).unwrap().unwrap(),
            "#include \"led.h\"\r\n#include <stdint.h>\r\nint x;\r\n"
        );
    }

    #[test]
    fn test_no_replacements_no_change() {
        let source = "int x;\n";
        let v = Violation::new(
            "X",
            "x",
            Severity::Error,
            Location::new(PathBuf::from("a.c"), 1, 1),
            "m",
        );
        let outcome = apply_fixes(source, &[v]).unwrap();
        assert!(!outcome.changed());
        assert_eq!(outcome.source, source);
    }
}
