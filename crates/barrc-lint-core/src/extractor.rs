//! Declaration extractor.
//!
//! A partial parser over the token stream. It recognizes a handful of shapes
//! (function signature, parameter, object declaration) and skips everything
//! else:
//!
//! - `<type> name ( params ) { body }` and `<type> name ( params ) ;`
//! - comma-separated parameters, split on the final identifier
//! - `<type> name [= init], ... ;` at file scope and at statement starts
//!   inside function bodies (including `for (<decl>; ...)`)
//!
//! Extraction never fails. A function whose body braces never balance is
//! dropped entirely, and extraction resumes at the next top-level construct
//! when there is one.

use std::ops::Range;
use tracing::debug;

use crate::declaration::{DeclId, DeclKind, Declaration, Position};
use crate::lexer::{Token, TokenKind};

const TYPE_KEYWORDS: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "_Bool",
    "_Complex",
];

const QUALIFIERS: &[&str] = &["const", "volatile", "restrict", "_Atomic"];

const STORAGE_CLASSES: &[&str] = &[
    "static",
    "extern",
    "register",
    "auto",
    "inline",
    "_Thread_local",
    "_Noreturn",
];

const TAG_KEYWORDS: &[&str] = &["struct", "union", "enum"];

/// Extracts all recognizable declarations from `tokens`, in source order.
#[must_use]
pub fn extract(tokens: &[Token]) -> Vec<Declaration> {
    let mut extractor = Extractor {
        tokens,
        decls: Vec::new(),
    };
    let mut i = 0;
    while i < tokens.len() {
        i = extractor.external_declaration(i).max(i + 1);
    }
    extractor.decls
}

fn is_open(t: &Token) -> bool {
    t.kind == TokenKind::Punct && matches!(t.text.as_str(), "(" | "[" | "{")
}

fn is_close(t: &Token) -> bool {
    t.kind == TokenKind::Punct && matches!(t.text.as_str(), ")" | "]" | "}")
}

fn is_keyword_in(t: &Token, set: &[&str]) -> bool {
    t.kind == TokenKind::Keyword && set.contains(&t.text.as_str())
}

/// Compiler extensions such as `__attribute__` are never names or types.
fn is_extension(t: &Token) -> bool {
    t.text.starts_with("__")
}

fn is_name_like(t: &Token) -> bool {
    matches!(t.kind, TokenKind::Identifier | TokenKind::TypeName) && !is_extension(t)
}

/// Type facts collected from the tokens that precede a declarator name.
#[derive(Debug, Default, Clone)]
struct TypeInfo {
    words: Vec<usize>,
    stars: usize,
    const_before_star: bool,
    const_after_star: bool,
}

impl TypeInfo {
    fn feed(&mut self, index: usize, token: &Token) {
        match token.kind {
            TokenKind::Punct if token.text == "*" => {
                self.stars += 1;
                self.const_after_star = false;
            }
            TokenKind::Keyword if token.text == "const" => {
                if self.stars == 0 {
                    self.const_before_star = true;
                } else {
                    self.const_after_star = true;
                }
            }
            TokenKind::Keyword
                if is_keyword_in(token, TYPE_KEYWORDS) || is_keyword_in(token, TAG_KEYWORDS) =>
            {
                if self.stars == 0 {
                    self.words.push(index);
                }
            }
            TokenKind::Identifier | TokenKind::TypeName if !is_extension(token) => {
                if self.stars == 0 {
                    self.words.push(index);
                }
            }
            _ => {}
        }
    }

    fn has_type(&self) -> bool {
        !self.words.is_empty()
    }

    fn is_pointer(&self) -> bool {
        self.stars > 0
    }

    fn base_type(&self, tokens: &[Token]) -> String {
        self.words
            .iter()
            .map(|&i| tokens[i].text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn type_span(&self, tokens: &[Token]) -> Option<(usize, usize)> {
        let first = *self.words.first()?;
        let last = *self.words.last()?;
        let contiguous = self.words.windows(2).all(|w| w[1] == w[0] + 1);
        contiguous.then(|| {
            let start = tokens[first].offset;
            (start, tokens[last].end() - start)
        })
    }
}

struct Extractor<'t> {
    tokens: &'t [Token],
    decls: Vec<Declaration>,
}

impl Extractor<'_> {
    fn punct(&self, i: usize, p: &str) -> bool {
        self.tokens.get(i).is_some_and(|t| t.is_punct(p))
    }

    /// Index of the bracket closing the one at `open`.
    fn matching(&self, open: usize, limit: usize) -> Option<usize> {
        let mut depth = 0usize;
        for i in open..limit {
            let t = &self.tokens[i];
            if is_open(t) {
                depth += 1;
            } else if is_close(t) {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        None
    }

    /// Index of the `;` ending the statement at `start`. `None` when the
    /// statement runs past `limit` or an enclosing bracket closes first.
    fn statement_end(&self, start: usize, limit: usize) -> Option<usize> {
        let mut depth = 0usize;
        for i in start..limit {
            let t = &self.tokens[i];
            if is_open(t) {
                depth += 1;
            } else if is_close(t) {
                depth = depth.checked_sub(1)?;
            } else if depth == 0 && t.is_punct(";") {
                return Some(i);
            }
        }
        None
    }

    /// Skips to just past the `;` ending the current construct.
    fn skip_statement(&self, start: usize, limit: usize) -> usize {
        let mut depth = 0usize;
        for i in start..limit {
            let t = &self.tokens[i];
            if is_open(t) {
                depth += 1;
            } else if is_close(t) {
                match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => return i + 1,
                }
            } else if depth == 0 && t.is_punct(";") {
                return i + 1;
            }
        }
        limit
    }

    /// Scans the head of a top-level construct up to the first `;`, `{`,
    /// `=` or `,` outside parentheses and brackets.
    fn scan_head(&self, start: usize, limit: usize) -> usize {
        let mut depth = 0usize;
        for i in start..limit {
            let t = &self.tokens[i];
            if t.kind != TokenKind::Punct {
                continue;
            }
            match t.text.as_str() {
                "{" | "}" => return i,
                "(" | "[" => depth += 1,
                ")" | "]" => depth = depth.saturating_sub(1),
                ";" | "=" | "," if depth == 0 => return i,
                _ => {}
            }
        }
        limit
    }

    /// Splits `range` on commas outside any brackets.
    fn split_top_level(&self, range: Range<usize>) -> Vec<Range<usize>> {
        let mut pieces = Vec::new();
        let mut depth = 0usize;
        let mut piece_start = range.start;
        for i in range.clone() {
            let t = &self.tokens[i];
            if is_open(t) {
                depth += 1;
            } else if is_close(t) {
                depth = depth.saturating_sub(1);
            } else if depth == 0 && t.is_punct(",") {
                pieces.push(piece_start..i);
                piece_start = i + 1;
            }
        }
        pieces.push(piece_start..range.end);
        pieces
    }

    /// Collects type facts from depth-0 tokens of `range`.
    fn type_info(&self, range: Range<usize>, info: &mut TypeInfo) {
        let mut depth = 0usize;
        for i in range {
            let t = &self.tokens[i];
            if is_open(t) {
                depth += 1;
            } else if is_close(t) {
                depth = depth.saturating_sub(1);
            } else if depth == 0 {
                info.feed(i, t);
            }
        }
    }

    /// The declarator name of `range`: its last depth-0 identifier that is
    /// not a struct/union/enum tag.
    fn declarator_name(&self, range: Range<usize>) -> Option<usize> {
        let mut depth = 0usize;
        let mut candidate = None;
        for i in range.clone() {
            let t = &self.tokens[i];
            if is_open(t) {
                depth += 1;
            } else if is_close(t) {
                depth = depth.saturating_sub(1);
            } else if depth == 0 && is_name_like(t) {
                let after_tag = i > range.start && is_keyword_in(&self.tokens[i - 1], TAG_KEYWORDS);
                if !after_tag {
                    candidate = Some(i);
                }
            }
        }
        candidate
    }

    /// Finds the function name in a head: the first depth-0 identifier
    /// directly followed by `(` and preceded by a return type.
    fn function_name(&self, start: usize, head_end: usize) -> Option<usize> {
        if !(self.punct(head_end, "{") || self.punct(head_end, ";")) {
            return None;
        }
        let mut depth = 0usize;
        for k in start..head_end {
            let t = &self.tokens[k];
            if depth == 0
                && k > start
                && t.is_identifier()
                && !is_extension(t)
                && self.punct(k + 1, "(")
            {
                let mut info = TypeInfo::default();
                self.type_info(start..k, &mut info);
                if info.has_type() {
                    return Some(k);
                }
            }
            if is_open(t) {
                depth += 1;
            } else if is_close(t) {
                depth = depth.saturating_sub(1);
            }
        }
        None
    }

    fn external_declaration(&mut self, start: usize) -> usize {
        let len = self.tokens.len();
        let t = &self.tokens[start];

        if t.is_punct(";") || t.is_punct("}") {
            return start + 1;
        }
        if t.is_keyword("typedef") || t.is_keyword("_Static_assert") {
            return self.skip_statement(start, len);
        }

        let head_end = self.scan_head(start, len);
        if let Some(name) = self.function_name(start, head_end) {
            return self.function(start, name, head_end);
        }

        if self.punct(head_end, "{") {
            let has_tag = (start..head_end).any(|i| is_keyword_in(&self.tokens[i], TAG_KEYWORDS));
            if has_tag {
                // struct/union/enum definition, possibly with declarators
                return self.skip_statement(start, len);
            }
            return self.matching(head_end, len).map_or(len, |close| close + 1);
        }

        self.object_declaration(start, len, None)
    }

    fn function(&mut self, start: usize, name: usize, head_end: usize) -> usize {
        let len = self.tokens.len();
        let open = name + 1;
        let Some(close) = self.matching(open, head_end) else {
            return self.skip_statement(start, len);
        };

        let body = if self.punct(head_end, "{") {
            if let Some(end) = self.matching(head_end, len) {
                Some(head_end + 1..end)
            } else {
                debug!(
                    "Unbalanced braces in body of '{}', skipping",
                    self.tokens[name].text
                );
                return self.resync(head_end + 1);
            }
        } else {
            None
        };

        let next = body.as_ref().map_or(head_end + 1, |b| b.end + 1);
        let mut info = TypeInfo::default();
        self.type_info(start..name, &mut info);

        let id = DeclId(self.decls.len());
        self.decls.push(Declaration {
            kind: DeclKind::Function,
            name: self.tokens[name].text.clone(),
            base_type: info.base_type(self.tokens),
            is_pointer: info.is_pointer(),
            is_const_qualified: info.is_pointer() && info.const_before_star,
            is_declared_const: false,
            is_array: false,
            position: Position::from(&self.tokens[name]),
            enclosing_function: None,
            has_body: body.is_some(),
            body: body.clone(),
            extent: start..next,
            initializer: None,
            type_span: info.type_span(self.tokens),
        });

        self.parameters(open + 1..close, id);
        if let Some(body) = body {
            self.function_body(body, id);
        }
        next
    }

    /// Index of the next function head that starts in column 1 at or after
    /// `from`, or the end of the stream.
    fn resync(&self, from: usize) -> usize {
        let len = self.tokens.len();
        (from..len)
            .find(|&i| {
                let t = &self.tokens[i];
                t.column == 1
                    && (is_name_like(t)
                        || is_keyword_in(t, TYPE_KEYWORDS)
                        || is_keyword_in(t, QUALIFIERS)
                        || is_keyword_in(t, STORAGE_CLASSES)
                        || is_keyword_in(t, TAG_KEYWORDS))
                    && self.function_name(i, self.scan_head(i, len)).is_some()
            })
            .unwrap_or(len)
    }

    fn parameters(&mut self, range: Range<usize>, function: DeclId) {
        for piece in self.split_top_level(range) {
            if piece.is_empty() {
                continue;
            }
            if piece.len() == 1 {
                let only = &self.tokens[piece.start];
                if only.is_keyword("void") || only.is_punct("...") {
                    continue;
                }
            }
            let Some(name) = self.declarator_name(piece.clone()) else {
                continue;
            };
            let mut info = TypeInfo::default();
            self.type_info(piece.start..name, &mut info);
            if !info.has_type() || self.punct(name + 1, "(") {
                // unnamed parameter, or a function-typed declarator
                continue;
            }

            let is_array = name + 1 < piece.end && self.punct(name + 1, "[");
            let is_pointer = info.is_pointer() || is_array;
            self.decls.push(Declaration {
                kind: DeclKind::Parameter,
                name: self.tokens[name].text.clone(),
                base_type: info.base_type(self.tokens),
                is_pointer,
                is_const_qualified: is_pointer && info.const_before_star,
                is_declared_const: if info.is_pointer() {
                    info.const_after_star
                } else {
                    info.const_before_star && !is_array
                },
                is_array,
                position: Position::from(&self.tokens[name]),
                enclosing_function: Some(function),
                has_body: false,
                body: None,
                extent: piece.clone(),
                initializer: None,
                type_span: info.type_span(self.tokens),
            });
        }
    }

    fn function_body(&mut self, body: Range<usize>, function: DeclId) {
        let mut i = body.start;
        let mut at_statement_start = true;
        while i < body.end {
            if at_statement_start && self.looks_like_declaration(i, body.end) {
                i = self.object_declaration(i, body.end, Some(function));
                continue;
            }

            let t = &self.tokens[i];
            if t.is_keyword("for")
                && self.punct(i + 1, "(")
                && self.looks_like_declaration(i + 2, body.end)
            {
                i = self.object_declaration(i + 2, body.end, Some(function));
                at_statement_start = false;
                continue;
            }

            at_statement_start =
                t.kind == TokenKind::Punct && matches!(t.text.as_str(), "{" | "}" | ";");
            i += 1;
        }
    }

    /// Whether a statement starting at `i` reads like a declaration.
    fn looks_like_declaration(&self, i: usize, limit: usize) -> bool {
        if i >= limit {
            return false;
        }
        let t = &self.tokens[i];
        match t.kind {
            TokenKind::Keyword => {
                is_keyword_in(t, TYPE_KEYWORDS)
                    || is_keyword_in(t, QUALIFIERS)
                    || is_keyword_in(t, STORAGE_CLASSES)
                    || is_keyword_in(t, TAG_KEYWORDS)
            }
            TokenKind::TypeName => !self.punct(i + 1, "("),
            TokenKind::Identifier => {
                // `my_type name` or `my_type *name =`
                let mut j = i + 1;
                while j < limit && self.punct(j, "*") {
                    j += 1;
                }
                if j >= limit || !is_name_like(&self.tokens[j]) {
                    return false;
                }
                j == i + 1
                    || ["=", ";", ",", "["].iter().any(|p| self.punct(j + 1, p))
            }
            _ => false,
        }
    }

    /// Splits a declarator piece at its depth-0 `=`.
    fn split_initializer(&self, piece: Range<usize>) -> (Range<usize>, Option<Range<usize>>) {
        let mut depth = 0usize;
        for i in piece.clone() {
            let t = &self.tokens[i];
            if is_open(t) {
                depth += 1;
            } else if is_close(t) {
                depth = depth.saturating_sub(1);
            } else if depth == 0 && t.is_punct("=") {
                return (piece.start..i, Some(i + 1..piece.end));
            }
        }
        (piece, None)
    }

    /// Parses `<specifiers> declarator [= init], ... ;` starting at `start`.
    /// Returns the index just past the statement.
    fn object_declaration(
        &mut self,
        start: usize,
        limit: usize,
        function: Option<DeclId>,
    ) -> usize {
        let Some(end) = self.statement_end(start, limit) else {
            return limit;
        };

        let pieces = self.split_top_level(start..end);
        let (first_decl, _) = self.split_initializer(pieces[0].clone());
        let Some(first_name) = self.declarator_name(first_decl) else {
            return end + 1;
        };
        let mut specifiers = TypeInfo::default();
        self.type_info(start..first_name, &mut specifiers);
        if !specifiers.has_type() {
            return end + 1;
        }
        // Later declarators share the specifiers but not the pointer markers.
        let spec_end = (start..first_name)
            .find(|&i| self.punct(i, "*"))
            .unwrap_or(first_name);

        for (k, piece) in pieces.into_iter().enumerate() {
            let (decl_range, initializer) = self.split_initializer(piece);
            let name = if k == 0 {
                first_name
            } else {
                match self.declarator_name(decl_range.clone()) {
                    Some(n) => n,
                    None => continue,
                }
            };
            if self.punct(name + 1, "(") {
                // prototype or function pointer
                continue;
            }

            let mut info = TypeInfo::default();
            if k == 0 {
                self.type_info(start..name, &mut info);
            } else {
                self.type_info(start..spec_end, &mut info);
                self.type_info(decl_range.start..name, &mut info);
            }

            let is_array = self.punct(name + 1, "[");
            let is_declared_const = if info.is_pointer() {
                info.const_after_star
            } else {
                info.const_before_star
            };
            let kind = if function.is_none() && is_declared_const {
                DeclKind::Constant
            } else {
                DeclKind::Variable
            };

            self.decls.push(Declaration {
                kind,
                name: self.tokens[name].text.clone(),
                base_type: info.base_type(self.tokens),
                is_pointer: info.is_pointer(),
                is_const_qualified: info.is_pointer() && info.const_before_star,
                is_declared_const,
                is_array,
                position: Position::from(&self.tokens[name]),
                enclosing_function: function,
                has_body: false,
                body: None,
                extent: start..end + 1,
                initializer,
                type_span: info.type_span(self.tokens),
            });
        }

        end + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn decls(source: &str) -> Vec<Declaration> {
        extract(&tokenize(source).unwrap())
    }

    fn summary(source: &str) -> Vec<(DeclKind, String, String)> {
        decls(source)
            .into_iter()
            .map(|d| (d.kind, d.name, d.base_type))
            .collect()
    }

    const FIXTURE: &str = r"
void initLED() {
    int ledPin = 13;
    unsigned char brightness = 255;
}

void processData(uint8_t* data) {
    // Implementation
}

void LED_Init(void) {
    uint8_t led_pin = 13;
    const uint8_t max_brightness = 255;
}

void LED_SetBrightness(const uint8_t* brightness_ptr) {
}
";

    #[test]
    fn test_fixture_shapes() {
        let found = decls(FIXTURE);
        let names: Vec<_> = found.iter().map(|d| (d.kind, d.name.as_str())).collect();
        assert_eq!(
            names,
            vec![
                (DeclKind::Function, "initLED"),
                (DeclKind::Variable, "ledPin"),
                (DeclKind::Variable, "brightness"),
                (DeclKind::Function, "processData"),
                (DeclKind::Parameter, "data"),
                (DeclKind::Function, "LED_Init"),
                (DeclKind::Variable, "led_pin"),
                (DeclKind::Variable, "max_brightness"),
                (DeclKind::Function, "LED_SetBrightness"),
                (DeclKind::Parameter, "brightness_ptr"),
            ]
        );

        let brightness = &found[2];
        assert_eq!(brightness.base_type, "unsigned char");
        assert_eq!(brightness.enclosing_function, Some(DeclId(0)));
        assert_eq!(
            (brightness.position.line, brightness.position.column),
            (4, 19)
        );

        let data = &found[4];
        assert!(data.is_pointer);
        assert!(!data.is_const_qualified);
        assert_eq!(data.base_type, "uint8_t");

        let max = &found[7];
        assert!(max.is_declared_const);
        assert!(!max.is_pointer);

        let ptr = &found[9];
        assert!(ptr.is_pointer);
        assert!(ptr.is_const_qualified);
    }

    #[test]
    fn test_void_parameter_list_is_empty() {
        let found = decls("void LED_Init(void);");
        assert_eq!(found.len(), 1);
        assert!(!found[0].has_body);
    }

    #[test]
    fn test_unnamed_and_variadic_parameters_skipped() {
        let found = summary("int LOG_Printf(const char *fmt, ...); void X_Y(uint8_t, int);");
        assert_eq!(
            found,
            vec![
                (DeclKind::Function, "LOG_Printf".into(), "int".into()),
                (DeclKind::Parameter, "fmt".into(), "char".into()),
                (DeclKind::Function, "X_Y".into(), "void".into()),
            ]
        );
    }

    #[test]
    fn test_const_pointer_positions() {
        let found = decls("void F_G(uint8_t * const p, const uint8_t * const q, char s[]) {}");
        let p = &found[1];
        assert!(p.is_pointer && !p.is_const_qualified && p.is_declared_const);
        let q = &found[2];
        assert!(q.is_const_qualified && q.is_declared_const);
        let s = &found[3];
        assert!(s.is_pointer && s.is_array && !s.is_const_qualified);
    }

    #[test]
    fn test_nested_blocks_do_not_end_body() {
        let src = "void A_B(void) {\n if (x) { while (y) { y--; } }\n uint16_t after = 0;\n}\nint g_count;";
        let found = summary(src);
        assert_eq!(
            found,
            vec![
                (DeclKind::Function, "A_B".into(), "void".into()),
                (DeclKind::Variable, "after".into(), "uint16_t".into()),
                (DeclKind::Variable, "g_count".into(), "int".into()),
            ]
        );
        assert_eq!(decls(src)[1].enclosing_function, Some(DeclId(0)));
        assert_eq!(decls(src)[2].enclosing_function, None);
    }

    #[test]
    fn test_locals_in_nested_blocks_and_for_init() {
        let src = "void A_B(void) { for (int i = 0; i < 4; i++) { uint8_t tmp; } }";
        let found = summary(src);
        assert_eq!(
            found,
            vec![
                (DeclKind::Function, "A_B".into(), "void".into()),
                (DeclKind::Variable, "i".into(), "int".into()),
                (DeclKind::Variable, "tmp".into(), "uint8_t".into()),
            ]
        );
    }

    #[test]
    fn test_multiple_declarators_share_specifiers() {
        let found = decls("void A_B(void) { unsigned char *a, b = 2, c[4]; }");
        let a = &found[1];
        assert!(a.is_pointer);
        assert_eq!(a.base_type, "unsigned char");
        let b = &found[2];
        assert!(!b.is_pointer);
        assert_eq!(b.base_type, "unsigned char");
        assert!(b.initializer.is_some());
        let c = &found[3];
        assert!(c.is_array && !c.is_pointer);
    }

    #[test]
    fn test_expressions_are_not_declarations() {
        let src = "void A_B(void) { count = 3; LED_Write(1); x->y = 2; return; }";
        assert_eq!(decls(src).len(), 1);
    }

    #[test]
    fn test_typedef_and_struct_definitions_skipped() {
        let src = "typedef struct { int x; } point_t;\nstruct led { int pin; };\nenum mode { ON, OFF };\npoint_t origin;";
        assert_eq!(
            summary(src),
            vec![(DeclKind::Variable, "origin".into(), "point_t".into())]
        );
    }

    #[test]
    fn test_user_typedef_locals() {
        let src = "void A_B(void) { led_cfg cfg; led_cfg *p_cfg = &cfg; }";
        let found = summary(src);
        assert_eq!(found[1], (DeclKind::Variable, "cfg".into(), "led_cfg".into()));
        assert_eq!(found[2], (DeclKind::Variable, "p_cfg".into(), "led_cfg".into()));
    }

    #[test]
    fn test_file_scope_const_is_constant() {
        let found = decls("static const uint8_t LED_PIN = 13;\nconst char *g_name;");
        assert_eq!(found[0].kind, DeclKind::Constant);
        // pointee const only: the pointer itself is a variable
        assert_eq!(found[1].kind, DeclKind::Variable);
    }

    #[test]
    fn test_unbalanced_body_emits_nothing_for_function() {
        let src = "uint8_t g_ok;\nvoid A_B(int bad) {\n if (x) {\n uint8_t lost;\n";
        assert_eq!(
            summary(src),
            vec![(DeclKind::Variable, "g_ok".into(), "uint8_t".into())]
        );
    }

    #[test]
    fn test_unbalanced_body_resumes_at_next_function() {
        let src = "void A_B(void) {\n  if (x) {\n    y();\n}\n\nvoid initLED(void) {\n  int ledPin = 1;\n}\n";
        assert_eq!(
            summary(src),
            vec![
                (DeclKind::Function, "initLED".into(), "void".into()),
                (DeclKind::Variable, "ledPin".into(), "int".into()),
            ]
        );
        assert_eq!(decls(src)[1].position.line, 7);
    }

    #[test]
    fn test_truncation_never_panics() {
        let src = FIXTURE;
        for cut in 0..=src.len() {
            if let Ok(tokens) = tokenize(&src[..cut]) {
                let _ = extract(&tokens);
            }
        }
    }

    #[test]
    fn test_attribute_is_not_function_name() {
        let found = decls("void __attribute__((weak)) SYS_Tick(void) {}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "SYS_Tick");
        assert_eq!(found[0].base_type, "void");
    }

    #[test]
    fn test_type_span_covers_contiguous_words() {
        let src = "void A_B(void) { unsigned char level; }";
        let found = decls(src);
        let (offset, length) = found[1].type_span.unwrap();
        assert_eq!(&src[offset..offset + length], "unsigned char");
    }

    #[test]
    fn test_pointer_return_type() {
        let found = decls("uint8_t *BUF_Get(void);");
        assert_eq!(found[0].name, "BUF_Get");
        assert!(found[0].is_pointer);
    }
}
