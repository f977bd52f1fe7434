//! Error-tolerant CST parser for TOML using rowan's GreenNodeBuilder.
//!
//! The parser never gives up: input it cannot make sense of is wrapped in
//! `ERROR` nodes and parsing resumes at the next sensible boundary (the end
//! of the line, or the next `,`/closer inside arrays and inline tables).
//!
//! Scalars and quoted key parts are checked with the strict value parser,
//! so a misspelled boolean or a bad escape ends up in an `ERROR` node just
//! like a missing `=`.

use rowan::{Checkpoint, GreenNode};
use toml_lint_parse::MAX_NESTING_DEPTH;
use toml_lint_tokenizer::{Token, TokenKind, Tokenizer};
use tracing::trace;

use crate::syntax_kind::{SyntaxKind, SyntaxNode};

/// A parsed TOML document.
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Get the root syntax node.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Get the errors recorded while recovering.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Check if parsing succeeded without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A recovery note with location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset where the error occurred.
    pub offset: u32,
    /// Error message.
    pub message: String,
}

impl ParseError {
    fn new(offset: u32, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// Parse TOML source into a CST.
pub fn parse(source: &str) -> Parse {
    let parser = CstParser::new(source);
    parser.parse()
}

/// Where a value or a recovery run lives; decides which tokens end it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// Top-level statement: runs to the end of the line.
    Statement,
    /// Inside `[ ... ]`.
    Array,
    /// Inside `{ ... }`.
    InlineTable,
}

impl Context {
    fn is_stop(self, kind: TokenKind) -> bool {
        match kind {
            TokenKind::Eof | TokenKind::Newline | TokenKind::Comment => true,
            TokenKind::Comma => self != Context::Statement,
            TokenKind::RBracket => self == Context::Array,
            TokenKind::RBrace => self == Context::InlineTable,
            _ => false,
        }
    }
}

/// CST parser that builds a green tree using rowan.
struct CstParser<'src> {
    source: &'src str,
    tokens: Vec<Token<'src>>,
    pos: usize,
    builder: rowan::GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
    /// Arrays and inline tables currently open.
    depth: usize,
}

impl<'src> CstParser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: Tokenizer::new(source).collect(),
            pos: 0,
            builder: rowan::GreenNodeBuilder::new(),
            errors: Vec::new(),
            depth: 0,
        }
    }

    fn parse(mut self) -> Parse {
        self.builder.start_node(SyntaxKind::DOCUMENT.into());
        self.parse_statements();
        while self.peek() == TokenKind::LBracket {
            self.parse_table();
        }
        self.builder.finish_node();

        trace!(errors = self.errors.len(), "built CST");
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    /// Kind of the token `n` positions ahead.
    fn nth(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// Peek at the current token kind.
    fn peek(&self) -> TokenKind {
        self.nth(0)
    }

    /// Kind of the first token that is not horizontal whitespace.
    fn peek_past_whitespace(&self) -> TokenKind {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .map(|t| t.kind)
            .find(|kind| *kind != TokenKind::Whitespace)
            .unwrap_or(TokenKind::Eof)
    }

    /// Kind of the first token that is not trivia.
    fn peek_past_trivia(&self) -> TokenKind {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .map(|t| t.kind)
            .find(|kind| !kind.is_trivia())
            .unwrap_or(TokenKind::Eof)
    }

    /// Byte offset of the current token (or end of input).
    fn current_pos(&self) -> u32 {
        self.tokens
            .get(self.pos)
            .map(|t| t.span.start)
            .unwrap_or(self.source.len() as u32)
    }

    /// Consume and add the current token to the tree.
    fn bump(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder
                .token(SyntaxKind::from(token.kind).into(), token.text);
            self.pos += 1;
        }
    }

    /// Skip horizontal whitespace only.
    fn skip_whitespace(&mut self) {
        while self.peek() == TokenKind::Whitespace {
            self.bump();
        }
    }

    /// Skip trivia (whitespace, newlines and comments), adding them to the tree.
    fn skip_trivia(&mut self) {
        while self.peek().is_trivia() {
            self.bump();
        }
    }

    /// Wrap every token up to the next stop token of `context` in an
    /// `ERROR` node. The node is empty when the current token already stops.
    fn error_until(&mut self, context: Context, message: &str) {
        self.errors.push(ParseError::new(self.current_pos(), message));
        self.builder.start_node(SyntaxKind::ERROR.into());
        while !context.is_stop(self.peek()) {
            self.bump();
        }
        self.builder.finish_node();
    }

    /// Insert an empty `ERROR` node at the current position.
    fn empty_error(&mut self, message: &str) {
        self.errors.push(ParseError::new(self.current_pos(), message));
        self.builder.start_node(SyntaxKind::ERROR.into());
        self.builder.finish_node();
    }

    /// Parse statements until a table header or EOF.
    fn parse_statements(&mut self) {
        loop {
            self.skip_trivia();
            match self.peek() {
                TokenKind::Eof | TokenKind::LBracket => break,
                kind if kind.is_key_start() => self.parse_pair(Context::Statement),
                _ => self.error_until(Context::Statement, "expected a key or a table header"),
            }
        }
    }

    /// After a statement only whitespace and a comment may follow on the line.
    fn parse_line_end(&mut self) {
        if !Context::Statement.is_stop(self.peek_past_whitespace()) {
            self.skip_whitespace();
            self.error_until(Context::Statement, "expected a newline after the statement");
        }
    }

    /// Parse a `[table]` or `[[array.of.tables]]` header and its body.
    fn parse_table(&mut self) {
        let is_array = self.nth(1) == TokenKind::LBracket;
        let kind = if is_array {
            SyntaxKind::ARRAY_TABLE
        } else {
            SyntaxKind::TABLE
        };
        let header_start = self.current_pos();

        self.builder.start_node(kind.into());
        let checkpoint = self.builder.checkpoint();

        // Opening bracket(s)
        self.bump();
        if is_array {
            self.bump();
        }
        self.skip_whitespace();

        let mut ok = self.peek().is_key_start() && self.parse_key();
        self.skip_whitespace();

        if ok {
            if is_array {
                ok = self.peek() == TokenKind::RBracket && self.nth(1) == TokenKind::RBracket;
                if ok {
                    self.bump();
                    self.bump();
                }
            } else {
                ok = self.peek() == TokenKind::RBracket;
                if ok {
                    self.bump();
                }
            }
        }

        if ok {
            self.parse_line_end();
        } else {
            // Wrap the whole malformed header (and the rest of its line).
            let message = if is_array {
                "malformed array of tables header, expected `[[key]]`"
            } else {
                "malformed table header, expected `[key]`"
            };
            self.errors.push(ParseError::new(header_start, message));
            self.builder
                .start_node_at(checkpoint, SyntaxKind::ERROR.into());
            while !Context::Statement.is_stop(self.peek()) {
                self.bump();
            }
            self.builder.finish_node();
        }

        self.parse_statements();
        self.builder.finish_node();
    }

    /// Parse a `key = value` pair.
    fn parse_pair(&mut self, context: Context) {
        self.builder.start_node(SyntaxKind::PAIR.into());

        let key_start = self.current_pos();
        let checkpoint = self.builder.checkpoint();
        if !self.parse_key() {
            self.errors.push(ParseError::new(key_start, "invalid key"));
            self.builder
                .start_node_at(checkpoint, SyntaxKind::ERROR.into());
            self.builder.finish_node();
        }
        self.skip_whitespace();

        if self.peek() == TokenKind::Eq {
            self.bump();
            self.skip_whitespace();
            self.parse_value(context);
        } else {
            self.error_until(context, "expected `=` after a key");
        }

        if context == Context::Statement {
            self.parse_line_end();
        }

        self.builder.finish_node();
    }

    /// Parse a possibly dotted key. The current token must start a key part.
    ///
    /// Returns false when a part is malformed or a dot is not followed by
    /// another part; the caller decides what to wrap in an `ERROR` node.
    fn parse_key(&mut self) -> bool {
        self.builder.start_node(SyntaxKind::KEY.into());
        let mut valid = self.bump_key_part();

        while self.peek_past_whitespace() == TokenKind::Dot {
            self.skip_whitespace();
            self.bump();
            self.skip_whitespace();
            if self.peek().is_key_start() {
                valid &= self.bump_key_part();
            } else {
                valid = false;
                break;
            }
        }

        self.builder.finish_node();
        valid
    }

    /// Consume one key part and report whether it is well formed.
    fn bump_key_part(&mut self) -> bool {
        let valid = self.tokens.get(self.pos).is_some_and(|token| match token.kind {
            TokenKind::Bare => token.text.chars().all(is_bare_key_char),
            _ => toml_lint_parse::parse_value(token.text).is_ok(),
        });
        self.bump();
        valid
    }

    /// Parse a value (scalar, array or inline table).
    fn parse_value(&mut self, context: Context) {
        match self.peek() {
            TokenKind::LBracket | TokenKind::LBrace if self.depth >= MAX_NESTING_DEPTH => {
                self.error_until(context, "arrays and inline tables nested too deeply")
            }
            kind if kind.is_string() => {
                let start = self.current_pos();
                let checkpoint = self.builder.checkpoint();
                self.bump();
                self.finish_scalar(checkpoint, start);
            }
            TokenKind::Bare => self.parse_bare_scalar(),
            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_inline_table(),
            _ => self.error_until(context, "expected a value"),
        }
    }

    /// Parse numbers, booleans and date-times: adjacent bare and dot tokens
    /// are glued into one scalar, and a full date followed by a single space
    /// and a time (`1979-05-27 07:32:00`) is kept together.
    fn parse_bare_scalar(&mut self) {
        let start = self.current_pos();
        let checkpoint = self.builder.checkpoint();

        self.bump();
        self.glue_adjacent();

        let glued = &self.source[start as usize..self.current_pos() as usize];
        if is_full_date(glued) && self.at_time_after_space() {
            self.bump();
            self.bump();
            self.glue_adjacent();
        }

        self.finish_scalar(checkpoint, start);
    }

    /// Wrap the tokens consumed since `checkpoint` in a `SCALAR`, or in an
    /// `ERROR` when their text is not a valid value.
    fn finish_scalar(&mut self, checkpoint: Checkpoint, start: u32) {
        let source = self.source;
        let text = &source[start as usize..self.current_pos() as usize];
        let kind = match toml_lint_parse::parse_value(text) {
            Ok(_) => SyntaxKind::SCALAR,
            Err(err) => {
                self.errors.push(ParseError::new(start, err.kind.to_string()));
                SyntaxKind::ERROR
            }
        };
        self.builder.start_node_at(checkpoint, kind.into());
        self.builder.finish_node();
    }

    fn glue_adjacent(&mut self) {
        while matches!(self.peek(), TokenKind::Bare | TokenKind::Dot) {
            self.bump();
        }
    }

    /// Whether the next tokens are a single space and something shaped like `HH:`.
    fn at_time_after_space(&self) -> bool {
        let (Some(space), Some(time)) = (self.tokens.get(self.pos), self.tokens.get(self.pos + 1))
        else {
            return false;
        };
        let time = time.text.as_bytes();
        space.kind == TokenKind::Whitespace
            && space.text == " "
            && time.len() >= 3
            && time[0].is_ascii_digit()
            && time[1].is_ascii_digit()
            && time[2] == b':'
    }

    /// Parse an array `[ ... ]`.
    fn parse_array(&mut self) {
        self.builder.start_node(SyntaxKind::ARRAY.into());
        self.depth += 1;

        // Consume `[`
        self.bump();

        loop {
            // Report before trailing trivia so the error sits where the array stops.
            if self.peek_past_trivia() == TokenKind::Eof {
                self.empty_error("unclosed array, expected `]`");
                break;
            }
            self.skip_trivia();

            match self.peek() {
                TokenKind::RBracket => {
                    self.bump();
                    break;
                }
                TokenKind::Comma => {
                    self.errors
                        .push(ParseError::new(self.current_pos(), "expected a value before `,`"));
                    self.builder.start_node(SyntaxKind::ERROR.into());
                    self.bump();
                    self.builder.finish_node();
                }
                _ => {
                    self.parse_value(Context::Array);
                    self.parse_array_separator();
                }
            }
        }

        self.depth -= 1;
        self.builder.finish_node();
    }

    /// Consume the `,` after an array element, stopping in front of `]` or EOF.
    fn parse_array_separator(&mut self) {
        loop {
            if self.peek_past_trivia() == TokenKind::Eof {
                return;
            }
            self.skip_trivia();
            match self.peek() {
                TokenKind::Comma => {
                    self.bump();
                    return;
                }
                TokenKind::RBracket => return,
                _ => self.error_until(Context::Array, "expected `,` or `]`"),
            }
        }
    }

    /// Parse an inline table `{ ... }`.
    fn parse_inline_table(&mut self) {
        self.builder.start_node(SyntaxKind::INLINE_TABLE.into());
        self.depth += 1;

        // Consume `{`
        self.bump();
        self.skip_whitespace();

        if self.peek() == TokenKind::RBrace {
            self.bump();
        } else {
            loop {
                if self.peek().is_key_start() {
                    self.parse_pair(Context::InlineTable);
                } else {
                    self.error_until(Context::InlineTable, "expected a key");
                }

                if self.parse_inline_table_separator() {
                    break;
                }
            }
        }

        self.depth -= 1;
        self.builder.finish_node();
    }

    /// Consume what follows an inline table entry. Returns true once the
    /// table is finished (closed or abandoned at the end of the line).
    fn parse_inline_table_separator(&mut self) -> bool {
        loop {
            self.skip_whitespace();
            match self.peek() {
                TokenKind::Comma => {
                    self.bump();
                    self.skip_whitespace();
                    return false;
                }
                TokenKind::RBrace => {
                    self.bump();
                    return true;
                }
                TokenKind::Eof | TokenKind::Newline | TokenKind::Comment => {
                    self.empty_error("unclosed inline table, expected `}`");
                    return true;
                }
                _ => self.error_until(Context::InlineTable, "expected `,` or `}`"),
            }
        }
    }
}

fn is_bare_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// `YYYY-MM-DD`, checked by shape only.
fn is_full_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn parse_ok(source: &str) -> SyntaxNode {
        let parse = parse(source);
        assert!(parse.is_ok(), "parse errors: {:?}", parse.errors());
        parse.syntax()
    }

    fn kinds(node: &SyntaxNode) -> Vec<SyntaxKind> {
        node.children().map(|n| n.kind()).collect()
    }

    fn error_texts(source: &str) -> Vec<String> {
        parse(source)
            .syntax()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::ERROR)
            .map(|n| n.text().to_string())
            .collect()
    }

    #[test]
    fn test_empty_document() {
        let node = parse_ok("");
        assert_eq!(node.kind(), SyntaxKind::DOCUMENT);
        assert_eq!(node.children().count(), 0);
    }

    #[test]
    fn test_simple_pair() {
        let node = parse_ok("name = \"toml\"\n");
        let pair = node.children().next().unwrap();
        assert_eq!(pair.kind(), SyntaxKind::PAIR);
        assert_eq!(kinds(&pair), vec![SyntaxKind::KEY, SyntaxKind::SCALAR]);
        assert_eq!(pair.text().to_string(), "name = \"toml\"");
    }

    #[test]
    fn test_tables() {
        let node = parse_ok("a = 1\n[server]\nhost = \"x\"\n[[items]]\nid = 1\n[[items]]\n");
        assert_eq!(
            kinds(&node),
            vec![
                SyntaxKind::PAIR,
                SyntaxKind::TABLE,
                SyntaxKind::ARRAY_TABLE,
                SyntaxKind::ARRAY_TABLE,
            ]
        );
        let table = node.children().nth(1).unwrap();
        assert_eq!(kinds(&table), vec![SyntaxKind::KEY, SyntaxKind::PAIR]);
    }

    #[test]
    fn test_dotted_keys() {
        let node = parse_ok("a . b.\"c\" = 1");
        let key = node.children().next().unwrap().children().next().unwrap();
        assert_eq!(key.kind(), SyntaxKind::KEY);
        assert_eq!(key.text().to_string(), "a . b.\"c\"");
    }

    #[test]
    fn test_glued_scalars() {
        for (source, value) in [
            ("x = 3.14", "3.14"),
            ("x = -1e+5", "-1e+5"),
            ("x = 1979-05-27T07:32:00.999-07:00", "1979-05-27T07:32:00.999-07:00"),
            ("x = 1979-05-27 07:32:00", "1979-05-27 07:32:00"),
            ("x = 07:32:00.5", "07:32:00.5"),
        ] {
            let node = parse_ok(source);
            let scalar = node.descendants().find(|n| n.kind() == SyntaxKind::SCALAR).unwrap();
            assert_eq!(scalar.text().to_string(), value, "for {source}");
        }
    }

    #[test]
    fn test_arrays_and_inline_tables() {
        let node = parse_ok("x = [\n  1, # one\n  [2, 3],\n  { a = 1, b.c = 'd' },\n]\n");
        let array = node.descendants().find(|n| n.kind() == SyntaxKind::ARRAY).unwrap();
        let children = kinds(&array);
        assert_eq!(
            children,
            vec![SyntaxKind::SCALAR, SyntaxKind::ARRAY, SyntaxKind::INLINE_TABLE]
        );
        let inline = array.children().nth(2).unwrap();
        assert_eq!(kinds(&inline), vec![SyntaxKind::PAIR, SyntaxKind::PAIR]);
    }

    #[test]
    fn test_roundtrip() {
        let sources = [
            "a = 1",
            "[t]\nb = \"s\" # c\r\n",
            "x = [1, 2,\n 3]",
            "y = { a = 1 }",
            "= broken\nb = \nc 1\n[bad\n",
            "a = [1, 2\nb = 3\n",
            "s = \"\"\"\nmulti\n\"\"\"",
            "\u{e9}t\u{e9} = 1",
        ];

        for source in sources {
            let parse = parse(source);
            let reconstructed = parse.syntax().to_string();
            assert_eq!(source, reconstructed, "roundtrip failed for: {}", source);
        }
    }

    #[test]
    fn test_missing_value() {
        let parse = parse("a = 1\nb = \nc = 3\n");
        assert_eq!(parse.errors().len(), 1);
        assert_eq!(parse.errors()[0].offset, 10);

        let root = parse.syntax();
        let error = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::ERROR)
            .unwrap();
        assert_eq!(error.text().to_string(), "");
        let pair = error.parent().unwrap();
        assert_eq!(pair.kind(), SyntaxKind::PAIR);
        assert_eq!(pair.text().to_string(), "b = ");
    }

    #[test]
    fn test_missing_eq() {
        assert_eq!(error_texts("key 1\n"), vec!["1"]);
        let root = parse("key 1\n").syntax();
        assert_eq!(root.children().next().unwrap().kind(), SyntaxKind::PAIR);
    }

    #[test]
    fn test_trailing_content() {
        assert_eq!(error_texts("a = 1 2 # c\nb = 2"), vec!["2 "]);
    }

    #[test]
    fn test_invalid_statement() {
        let root = parse("= 3\n}").syntax();
        assert_eq!(kinds(&root), vec![SyntaxKind::ERROR, SyntaxKind::ERROR]);
        assert_eq!(error_texts("= 3\n}"), vec!["= 3", "}"]);
    }

    #[test]
    fn test_malformed_headers() {
        assert_eq!(error_texts("[a\nx = 1"), vec!["[a"]);
        assert_eq!(error_texts("[[a] # c\n"), vec!["[[a] "]);
        assert_eq!(error_texts("[]\n"), vec!["[]"]);
        assert_eq!(error_texts("[a]]\n"), vec!["]"]);
    }

    #[test]
    fn test_array_errors() {
        assert_eq!(error_texts("x = [1 2]"), vec!["2"]);
        assert_eq!(error_texts("x = [,]"), vec![","]);
        assert_eq!(error_texts("x = [=]"), vec!["="]);
    }

    #[test]
    fn test_unclosed_array_recovers_at_eof() {
        let root = parse("a = [1, 2\nb = 3\n").syntax();
        let errors: Vec<_> = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::ERROR)
            .collect();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].text().to_string(), "b = 3");
        // The empty error sits right after `b = 3`, before the final newline.
        assert_eq!(u32::from(errors[1].text_range().start()), 15);
    }

    #[test]
    fn test_inline_table_errors() {
        assert_eq!(error_texts("x = {a = }"), vec![""]);
        assert_eq!(error_texts("x = {a = 1"), vec![""]);
        assert_eq!(error_texts("x = {a = 1,}"), vec![""]);
        assert_eq!(error_texts("x = {a 1}"), vec!["1"]);

        let root = parse("x = {a = }").syntax();
        let error = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::ERROR)
            .unwrap();
        let pair = error.parent().unwrap();
        assert_eq!(pair.text().to_string(), "a = ");
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(error_texts("a = \"open\nb = 1"), vec!["\"open"]);
    }

    #[test]
    fn test_dangling_dot_in_key() {
        let root = parse("a. = 1").syntax();
        let error = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::ERROR)
            .unwrap();
        assert_eq!(error.text().to_string(), "a.");
        assert_eq!(error.parent().unwrap().kind(), SyntaxKind::PAIR);
        assert_eq!(kinds(&error), vec![SyntaxKind::KEY]);

        assert_eq!(error_texts("[a.]\n"), vec!["[a.]"]);
    }

    #[test]
    fn test_invalid_bare_values() {
        assert_eq!(error_texts("a = tru\nb = fals\n"), vec!["tru", "fals"]);
        assert_eq!(
            error_texts("a = 1__0\nb = 0x\nc = 12:3\nd = 1.\n"),
            vec!["1__0", "0x", "12:3", "1."]
        );
        assert_eq!(error_texts("a = [true, yes]"), vec!["yes"]);

        let root = parse("a = nope\n").syntax();
        let error = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::ERROR)
            .unwrap();
        assert_eq!(error.parent().unwrap().kind(), SyntaxKind::PAIR);
    }

    #[test]
    fn test_valid_scalars_stay_scalars() {
        parse_ok("a = true\nb = -inf\nc = 0xff\nd = 1_000.5e-3\ne = 2024-02-29\n");
    }

    #[test]
    fn test_invalid_strings() {
        assert_eq!(
            error_texts("a = \"\\x\"\nb = \"\\q\"\n"),
            vec!["\"\\x\"", "\"\\q\""]
        );
        assert_eq!(
            error_texts("a = \"\u{1}\"\nb = '\u{2}'\n"),
            vec!["\"\u{1}\"", "'\u{2}'"]
        );
        assert_eq!(error_texts("a = \"\\u12\""), vec!["\"\\u12\""]);
        parse_ok("a = \"\\t\\u00e9\"\nb = \"\"\"\r\nline \\\r\n  next\"\"\"\n");
    }

    #[test]
    fn test_invalid_keys() {
        assert_eq!(error_texts("a+b = 1\nc:d = 2\n"), vec!["a+b", "c:d"]);
        assert_eq!(error_texts("x.\"\\x\" = 1\n"), vec!["x.\"\\x\""]);
        assert_eq!(error_texts("t = { k+ = 1 }"), vec!["k+"]);
        assert_eq!(error_texts("[a:b]\n"), vec!["[a:b]"]);
    }

    #[test]
    fn test_comment_with_control_character() {
        assert_eq!(error_texts("a = 1 # \u{7}\n# \u{0}\n"), vec!["# \u{7}", "# \u{0}"]);
    }

    #[test]
    fn test_nesting_depth() {
        let depth = MAX_NESTING_DEPTH;
        parse_ok(&format!("a = {}{}\n", "[".repeat(depth), "]".repeat(depth)));

        let source = format!("a = {}\n", "[".repeat(200_000));
        let parse = parse(&source);
        assert_eq!(parse.syntax().to_string(), source);
        let errors = error_texts(&source);
        assert_eq!(errors[0], "[".repeat(200_000 - depth));
        assert!(errors[1..].iter().all(|text| text.is_empty()));
    }
}
