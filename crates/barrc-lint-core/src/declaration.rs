//! Declaration records extracted from a token stream.

use std::ops::Range;

use crate::extractor;
use crate::lexer::{self, LexError, Token};

/// Index of a declaration inside [`TranslationUnit::declarations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeclId(pub usize);

/// Kind of declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// Function definition or prototype.
    Function,
    /// Object declared at file scope or inside a function body.
    Variable,
    /// Named entry of a function parameter list.
    Parameter,
    /// File-scope object whose own type is `const` qualified.
    Constant,
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Function => write!(f, "function"),
            Self::Variable => write!(f, "variable"),
            Self::Parameter => write!(f, "parameter"),
            Self::Constant => write!(f, "constant"),
        }
    }
}

/// Position of a declaration's name token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in the source.
    pub offset: usize,
}

impl From<&Token> for Position {
    fn from(token: &Token) -> Self {
        Self {
            line: token.line,
            column: token.column,
            offset: token.offset,
        }
    }
}

/// One recognized function, variable, parameter or constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// What was declared.
    pub kind: DeclKind,
    /// Identifier text.
    pub name: String,
    /// Base type as written, specifier words joined by single spaces
    /// (e.g. `unsigned char`). For functions this is the return type.
    pub base_type: String,
    /// Whether the declarator contains a `*` (array parameters count too).
    pub is_pointer: bool,
    /// Whether the pointed-to type is `const`. Only meaningful for pointers.
    pub is_const_qualified: bool,
    /// Whether the declared object itself is `const`.
    pub is_declared_const: bool,
    /// Whether the declarator has an array suffix.
    pub is_array: bool,
    /// Position of the name token.
    pub position: Position,
    /// Function containing this parameter or local variable.
    pub enclosing_function: Option<DeclId>,
    /// Function definitions have a body, prototypes do not.
    pub has_body: bool,
    /// Token indices of a function body, braces excluded.
    pub body: Option<Range<usize>>,
    /// Token indices covered by the whole declaration.
    pub extent: Range<usize>,
    /// Token indices of the initializer expression, if any.
    pub initializer: Option<Range<usize>>,
    /// Byte span `(offset, length)` of the base type, when it is written
    /// as one contiguous run of tokens.
    pub type_span: Option<(usize, usize)>,
}

/// Tokens and declarations of one source file.
#[derive(Debug, Clone, Default)]
pub struct TranslationUnit {
    /// Every token of the file, in order.
    pub tokens: Vec<Token>,
    /// Every recognized declaration, in source order.
    pub declarations: Vec<Declaration>,
}

impl TranslationUnit {
    /// Tokenizes and extracts declarations from `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] for unterminated comments or literals. Malformed
    /// declarations never produce an error; they are skipped.
    pub fn parse(source: &str) -> Result<Self, LexError> {
        let tokens = lexer::tokenize(source)?;
        let declarations = extractor::extract(&tokens);
        Ok(Self {
            tokens,
            declarations,
        })
    }

    /// Looks up a declaration by id.
    #[must_use]
    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        self.declarations.get(id.0)
    }

    /// Iterates declarations of one kind.
    pub fn of_kind(&self, kind: DeclKind) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(move |d| d.kind == kind)
    }

    /// Iterates functions with their ids.
    pub fn functions(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.declarations
            .iter()
            .enumerate()
            .filter(|(_, d)| d.kind == DeclKind::Function)
            .map(|(i, d)| (DeclId(i), d))
    }

    /// Iterates the parameters of a function.
    pub fn parameters_of(&self, function: DeclId) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(move |d| {
            d.kind == DeclKind::Parameter && d.enclosing_function == Some(function)
        })
    }

    /// Returns the function enclosing `decl`, if any.
    #[must_use]
    pub fn enclosing_function(&self, decl: &Declaration) -> Option<&Declaration> {
        decl.enclosing_function.and_then(|id| self.get(id))
    }

    /// Byte range covered by a range of token indices.
    #[must_use]
    pub fn byte_range(&self, tokens: Range<usize>) -> Range<usize> {
        let start = self.tokens.get(tokens.start).map_or(0, |t| t.offset);
        let end = tokens
            .end
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(start, Token::end);
        start..end
    }

    /// Byte range in which `decl` can be referenced: the enclosing function
    /// for locals and parameters, the whole file otherwise.
    #[must_use]
    pub fn scope_of(&self, decl: &Declaration) -> Range<usize> {
        match self.enclosing_function(decl) {
            Some(function) => self.byte_range(function.extent.clone()),
            None => 0..self.tokens.last().map_or(0, Token::end),
        }
    }

    /// Returns the tokens of a function body.
    #[must_use]
    pub fn body_tokens(&self, function: &Declaration) -> &[Token] {
        function
            .body
            .as_ref()
            .and_then(|range| self.tokens.get(range.clone()))
            .unwrap_or(&[])
    }
}
