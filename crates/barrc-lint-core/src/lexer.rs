//! Tokenizer for C source text.
//!
//! The lexer is deliberately permissive: it only fails on input it cannot
//! skip past safely (an unterminated block comment, string or character
//! literal). Everything else becomes a token, with unknown characters
//! reported as [`TokenKind::Other`]. Preprocessor directives are skipped
//! as whole logical lines.

use miette::{Diagnostic, SourceSpan};
use std::fmt;
use thiserror::Error;

/// Reserved words of C99/C11.
const KEYWORDS: &[&str] = &[
    "auto",
    "break",
    "case",
    "char",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extern",
    "float",
    "for",
    "goto",
    "if",
    "inline",
    "int",
    "long",
    "register",
    "restrict",
    "return",
    "short",
    "signed",
    "sizeof",
    "static",
    "struct",
    "switch",
    "typedef",
    "union",
    "unsigned",
    "void",
    "volatile",
    "while",
    "_Alignas",
    "_Alignof",
    "_Atomic",
    "_Bool",
    "_Complex",
    "_Generic",
    "_Imaginary",
    "_Noreturn",
    "_Static_assert",
    "_Thread_local",
];

/// Typedef names from the standard headers that embedded code leans on.
const KNOWN_TYPE_NAMES: &[&str] = &[
    "bool",
    "int8_t",
    "int16_t",
    "int32_t",
    "int64_t",
    "uint8_t",
    "uint16_t",
    "uint32_t",
    "uint64_t",
    "int_least8_t",
    "int_fast8_t",
    "intptr_t",
    "uintptr_t",
    "intmax_t",
    "uintmax_t",
    "size_t",
    "ptrdiff_t",
    "FILE",
];

/// Operators matched greedily, longest first.
const PUNCTUATORS: &[&str] = &[
    "<<=", ">>=", "...", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "##", "(", ")", "{", "}", "[", "]", ";", ",", ".",
    "*", "&", "+", "-", "~", "!", "/", "%", "<", ">", "^", "|", "?", ":", "=", "#",
];

/// Kind of literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// Integer or floating constant, suffixes included.
    Number,
    /// String literal, quotes and prefix included.
    String,
    /// Character constant, quotes and prefix included.
    Char,
}

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Any identifier that is neither a keyword nor a known type name.
    Identifier,
    /// A C reserved word.
    Keyword,
    /// A well-known typedef name such as `uint8_t` or any `*_t` identifier.
    TypeName,
    /// A literal constant.
    Literal(LiteralKind),
    /// An operator or separator.
    Punct,
    /// A character the lexer does not recognize.
    Other,
}

/// A single lexical token with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lexical class.
    pub kind: TokenKind,
    /// Exact source text.
    pub text: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in characters).
    pub column: usize,
    /// Byte offset of the first character.
    pub offset: usize,
}

impl Token {
    /// Returns true if this is the punctuator `p`.
    #[must_use]
    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == p
    }

    /// Returns true if this is the keyword `kw`.
    #[must_use]
    pub fn is_keyword(&self, kw: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == kw
    }

    /// Returns true for plain identifiers (not keywords or known type names).
    #[must_use]
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    /// Byte offset one past the last character.
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' at {}:{}", self.text, self.line, self.column)
    }
}

/// What went wrong while tokenizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexErrorKind {
    /// A `/*` comment with no closing `*/`.
    UnterminatedComment,
    /// A string literal that reaches a newline or the end of input.
    UnterminatedString,
    /// A character constant that reaches a newline or the end of input.
    UnterminatedChar,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedComment => write!(f, "unterminated block comment"),
            Self::UnterminatedString => write!(f, "unterminated string literal"),
            Self::UnterminatedChar => write!(f, "unterminated character literal"),
        }
    }
}

/// Fatal tokenizer error. Aborts analysis of the current file only.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind} at line {line}, column {column}")]
#[diagnostic(
    code(barrc_lint::lex),
    help("close the comment or literal; nothing after this point can be analyzed")
)]
pub struct LexError {
    /// Error classification.
    pub kind: LexErrorKind,
    /// Line where the offending construct starts (1-indexed).
    pub line: usize,
    /// Column where the offending construct starts (1-indexed).
    pub column: usize,
    /// Byte span of the opening delimiter.
    #[label("opened here")]
    pub span: SourceSpan,
}

/// Lazy tokenizer over a source string.
///
/// The lexer is an iterator of `Result<Token, LexError>`; it stops after the
/// first error. Cloning it (or creating a new one) restarts the sequence.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    at_line_start: bool,
    failed: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            at_line_start: true,
            failed: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.source[self.pos..].starts_with(s)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.at_line_start = true;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, kind: LexErrorKind, start: (usize, usize, usize), len: usize) -> LexError {
        let (offset, line, column) = start;
        LexError {
            kind,
            line,
            column,
            span: SourceSpan::from((offset, len)),
        }
    }

    fn mark(&self) -> (usize, usize, usize) {
        (self.pos, self.line, self.column)
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_nth(1) == Some('/') => self.skip_line_comment(),
                Some('/') if self.peek_nth(1) == Some('*') => self.skip_block_comment()?,
                Some('#') if self.at_line_start => self.skip_directive()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.mark();
        self.bump();
        self.bump();
        loop {
            if self.starts_with("*/") {
                self.bump();
                self.bump();
                return Ok(());
            }
            if self.bump().is_none() {
                return Err(self.error(LexErrorKind::UnterminatedComment, start, 2));
            }
        }
    }

    /// Skips a preprocessor directive up to the end of its logical line.
    fn skip_directive(&mut self) -> Result<(), LexError> {
        while let Some(c) = self.peek() {
            match c {
                '\n' => return Ok(()),
                '\\' if self.peek_nth(1) == Some('\n') => {
                    self.bump();
                    self.bump();
                    self.at_line_start = false;
                }
                '/' if self.peek_nth(1) == Some('*') => {
                    self.skip_block_comment()?;
                    // A comment spanning lines still belongs to the directive.
                    self.at_line_start = false;
                }
                '/' if self.peek_nth(1) == Some('/') => {
                    self.skip_line_comment();
                    return Ok(());
                }
                '"' => {
                    self.bump();
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                        if c == '"' {
                            break;
                        }
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
        Ok(())
    }

    fn token(&self, kind: TokenKind, start: (usize, usize, usize)) -> Token {
        let (offset, line, column) = start;
        Token {
            kind,
            text: self.source[offset..self.pos].to_string(),
            line,
            column,
            offset,
        }
    }

    fn lex_quoted(
        &mut self,
        quote: char,
        start: (usize, usize, usize),
    ) -> Result<Token, LexError> {
        let (kind, literal) = if quote == '"' {
            (LexErrorKind::UnterminatedString, LiteralKind::String)
        } else {
            (LexErrorKind::UnterminatedChar, LiteralKind::Char)
        };
        // Opening quote
        self.bump();
        loop {
            match self.peek() {
                None | Some('\n') => return Err(self.error(kind, start, 1)),
                Some('\\') => {
                    self.bump();
                    if self.bump().is_none() {
                        return Err(self.error(kind, start, 1));
                    }
                }
                Some(c) => {
                    self.bump();
                    if c == quote {
                        return Ok(self.token(TokenKind::Literal(literal), start));
                    }
                }
            }
        }
    }

    fn lex_number(&mut self, start: (usize, usize, usize)) -> Token {
        while let Some(c) = self.peek() {
            if matches!(c, 'e' | 'E' | 'p' | 'P') && matches!(self.peek_nth(1), Some('+' | '-')) {
                self.bump();
                self.bump();
            } else if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.bump();
            } else {
                break;
            }
        }
        self.token(TokenKind::Literal(LiteralKind::Number), start)
    }

    fn lex_word(&mut self, start: (usize, usize, usize)) -> Result<Token, LexError> {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        let text = &self.source[start.0..self.pos];

        // Encoding prefixes: L"..", u8"..", u'..', U".."
        if matches!(text, "L" | "u" | "U" | "u8") {
            if let Some(q @ ('"' | '\'')) = self.peek() {
                return self.lex_quoted(q, start);
            }
        }

        Ok(self.token(classify_word(text), start))
    }

    fn lex_punct(&mut self, start: (usize, usize, usize)) -> Token {
        let rest = &self.source[self.pos..];
        let kind = match PUNCTUATORS.iter().find(|p| rest.starts_with(**p)) {
            Some(p) => {
                for _ in 0..p.len() {
                    self.bump();
                }
                TokenKind::Punct
            }
            None => {
                self.bump();
                TokenKind::Other
            }
        };
        self.token(kind, start)
    }

    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_trivia()?;
        let Some(c) = self.peek() else {
            return Ok(None);
        };
        let start = self.mark();
        self.at_line_start = false;

        let token = match c {
            '"' | '\'' => self.lex_quoted(c, start)?,
            c if c.is_ascii_digit() => self.lex_number(start),
            '.' if self.peek_nth(1).is_some_and(|n| n.is_ascii_digit()) => self.lex_number(start),
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_word(start)?,
            _ => self.lex_punct(start),
        };
        Ok(Some(token))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(token) => token.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Classifies an identifier-shaped word.
#[must_use]
pub fn classify_word(text: &str) -> TokenKind {
    if KEYWORDS.contains(&text) {
        TokenKind::Keyword
    } else if is_type_name(text) {
        TokenKind::TypeName
    } else {
        TokenKind::Identifier
    }
}

/// Returns true for well-known typedef names and the `*_t` convention.
#[must_use]
pub fn is_type_name(text: &str) -> bool {
    KNOWN_TYPE_NAMES.contains(&text) || (text.len() > 2 && text.ends_with("_t"))
}

/// Tokenizes a whole source string.
///
/// # Errors
///
/// Returns the first [`LexError`] encountered.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<String> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_positions_survive_comments() {
        let src = "/* header\n   comment */\nint x; // trailing\n  uint8_t y;";
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens[0].text, "int");
        assert_eq!((tokens[0].line, tokens[0].column), (3, 1));
        assert_eq!(tokens[3].text, "uint8_t");
        assert_eq!((tokens[3].line, tokens[3].column), (4, 3));
        assert_eq!(tokens[3].kind, TokenKind::TypeName);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let tokens = tokenize("const unsigned char constant_value").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword,
                TokenKind::Keyword,
                TokenKind::Keyword,
                TokenKind::Identifier
            ]
        );
    }

    #[test]
    fn test_comment_with_quotes() {
        let src = "// don't \"panic\"\n/* it's */ int a;";
        assert_eq!(texts(src), vec!["int", "a", ";"]);
    }

    #[test]
    fn test_multichar_punctuators() {
        assert_eq!(
            texts("p->x <<= 2; a != b"),
            vec!["p", "->", "x", "<<=", "2", ";", "a", "!=", "b"]
        );
    }

    #[test]
    fn test_unknown_characters_are_other() {
        let tokens = tokenize("int @x;").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Other);
        assert_eq!(tokens[1].text, "@");
    }

    #[test]
    fn test_directives_skipped() {
        let src = "#include <stdint.h>\n#define MAX(a, b) \\\n    ((a) > (b) ? (a) : (b))\nint x;";
        assert_eq!(texts(src), vec!["int", "x", ";"]);
    }

    #[test]
    fn test_hash_inside_line_is_punct() {
        assert_eq!(texts("a # b"), vec!["a", "#", "b"]);
    }

    #[test]
    fn test_literals() {
        let tokens = tokenize(r#"x = 0x1Fu + 1.5e-3 + 'a' + "s\"q" + L"w";"#).unwrap();
        let literals: Vec<_> = tokens
            .iter()
            .filter_map(|t| match t.kind {
                TokenKind::Literal(kind) => Some((kind, t.text.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(
            literals,
            vec![
                (LiteralKind::Number, "0x1Fu"),
                (LiteralKind::Number, "1.5e-3"),
                (LiteralKind::Char, "'a'"),
                (LiteralKind::String, r#""s\"q""#),
                (LiteralKind::String, r#"L"w""#),
            ]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize("int a;\n  /* never closed").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
        assert_eq!((err.line, err.column), (2, 3));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("char *s = \"abc\nint b;").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!((err.line, err.column), (1, 11));
    }

    #[test]
    fn test_unterminated_char() {
        let err = tokenize("x = 'a").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedChar);
    }

    #[test]
    fn test_lexer_stops_after_error() {
        let results: Vec<_> = Lexer::new("a /* b").collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_lexer_is_restartable() {
        let lexer = Lexer::new("int a = 1;");
        let first: Vec<_> = lexer.clone().collect();
        let second: Vec<_> = lexer.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_type_names() {
        assert!(is_type_name("uint8_t"));
        assert!(is_type_name("led_state_t"));
        assert!(is_type_name("bool"));
        assert!(!is_type_name("led_pin"));
        assert!(!is_type_name("_t"));
    }
}
