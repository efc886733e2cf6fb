//! Context types for rule execution.

use std::path::{Path, PathBuf};

use crate::declaration::{Declaration, Position};
use crate::lexer::Token;
use crate::types::Location;

/// Placeholder file name for source text that did not come from a file.
pub const ANONYMOUS_FILE: &str = "<input>";

/// Context provided to rules for one source file.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// File identifier used to stamp violation locations.
    pub path: PathBuf,
    /// File contents as a string.
    pub content: &'a str,
}

impl<'a> FileContext<'a> {
    /// Creates a context for `content` read from `path`.
    ///
    /// When `root` is a prefix of `path` the stored path is made relative to it.
    #[must_use]
    pub fn new(path: &Path, content: &'a str, root: &Path) -> Self {
        let relative = path
            .strip_prefix(root)
            .ok()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| path.to_path_buf(), Path::to_path_buf);
        Self {
            path: relative,
            content,
        }
    }

    /// Creates a context for source text with no backing file.
    #[must_use]
    pub fn anonymous(content: &'a str) -> Self {
        Self {
            path: PathBuf::from(ANONYMOUS_FILE),
            content,
        }
    }

    /// Location of a token.
    #[must_use]
    pub fn token_location(&self, token: &Token) -> Location {
        Location::new(self.path.clone(), token.line, token.column)
            .with_span(token.offset, token.text.len())
    }

    /// Location of a declaration's name.
    #[must_use]
    pub fn decl_location(&self, decl: &Declaration) -> Location {
        let Position {
            line,
            column,
            offset,
        } = decl.position;
        Location::new(self.path.clone(), line, column).with_span(offset, decl.name.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path() {
        let ctx = FileContext::new(
            Path::new("/proj/src/led.c"),
            "",
            Path::new("/proj"),
        );
        assert_eq!(ctx.path, PathBuf::from("src/led.c"));
    }

    #[test]
    fn test_single_file_root_keeps_path() {
        let ctx = FileContext::new(Path::new("drv/uart.h"), "", Path::new("drv/uart.h"));
        assert_eq!(ctx.path, PathBuf::from("drv/uart.h"));
    }

    #[test]
    fn test_anonymous() {
        let ctx = FileContext::anonymous("int x;");
        assert_eq!(ctx.path, PathBuf::from(ANONYMOUS_FILE));
    }
}
