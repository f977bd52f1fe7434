//! Tokenizer for TOML documents.

use crate::{Span, Token, TokenKind};
use tracing::trace;

/// A tokenizer that produces lossless tokens from TOML source text.
///
/// The tokenizer never fails: unterminated strings, comments holding
/// control characters and characters that cannot start any token come out
/// as [`TokenKind::Error`] so that the tolerant parser can wrap them in
/// error nodes.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
        }
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Peek at the nth character (0-indexed) without consuming.
    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    /// Advance by n bytes.
    #[inline]
    fn advance_by(&mut self, n: usize) {
        self.pos += n as u32;
        self.remaining = &self.remaining[n..];
    }

    /// Check if the remaining text starts with the given prefix.
    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    /// Whether the remaining text starts with a line break.
    #[inline]
    fn at_line_break(&self) -> bool {
        self.starts_with("\n") || self.starts_with("\r\n")
    }

    /// Create a token from the given start position to current position.
    fn token(&self, kind: TokenKind, start: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = &self.source[start as usize..self.pos as usize];
        trace!("Token {:?} at {:?}: {:?}", kind, span, text);
        Token::new(kind, span, text)
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return self.token(TokenKind::Eof, start);
        };

        match c {
            '[' => {
                self.advance();
                self.token(TokenKind::LBracket, start)
            }
            ']' => {
                self.advance();
                self.token(TokenKind::RBracket, start)
            }
            '{' => {
                self.advance();
                self.token(TokenKind::LBrace, start)
            }
            '}' => {
                self.advance();
                self.token(TokenKind::RBrace, start)
            }
            ',' => {
                self.advance();
                self.token(TokenKind::Comma, start)
            }
            '.' => {
                self.advance();
                self.token(TokenKind::Dot, start)
            }
            '=' => {
                self.advance();
                self.token(TokenKind::Eq, start)
            }

            '"' if self.starts_with("\"\"\"") => self.tokenize_multiline_basic_string(),
            '"' => self.tokenize_basic_string(),
            '\'' if self.starts_with("'''") => self.tokenize_multiline_literal_string(),
            '\'' => self.tokenize_literal_string(),

            '#' => self.tokenize_comment(),

            ' ' | '\t' => self.tokenize_whitespace(),

            '\n' => {
                self.advance();
                self.token(TokenKind::Newline, start)
            }
            '\r' if self.peek_nth(1) == Some('\n') => {
                self.advance_by(2);
                self.token(TokenKind::Newline, start)
            }

            _ if is_bare_char(c) => self.tokenize_bare(),

            // Error: unrecognized character
            _ => {
                self.advance();
                self.token(TokenKind::Error, start)
            }
        }
    }

    /// Tokenize horizontal whitespace (spaces and tabs).
    fn tokenize_whitespace(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(' ' | '\t') = self.peek() {
            self.advance();
        }
        self.token(TokenKind::Whitespace, start)
    }

    /// Tokenize a run of bare characters.
    fn tokenize_bare(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_bare_char(c) {
                self.advance();
            } else {
                break;
            }
        }
        self.token(TokenKind::Bare, start)
    }

    /// Tokenize a comment: `# ...` up to (not including) the line break.
    ///
    /// Control characters other than tab make the whole comment an error.
    fn tokenize_comment(&mut self) -> Token<'src> {
        let start = self.pos;
        let mut kind = TokenKind::Comment;
        while !self.is_eof() && !self.at_line_break() {
            if self.advance().is_some_and(|c| c.is_ascii_control() && c != '\t') {
                kind = TokenKind::Error;
            }
        }
        self.token(kind, start)
    }

    /// Tokenize a single-line basic string: `"..."`.
    ///
    /// A line break or the end of input before the closing quote yields an
    /// error token covering the partial string.
    fn tokenize_basic_string(&mut self) -> Token<'src> {
        let start = self.pos;

        // Consume opening quote
        self.advance();

        loop {
            if self.is_eof() || self.at_line_break() {
                return self.token(TokenKind::Error, start);
            }
            match self.advance() {
                Some('"') => break,
                Some('\\') => {
                    // Escape sequence - consume the escaped char unless it ends the line
                    if !self.is_eof() && !self.at_line_break() {
                        self.advance();
                    }
                }
                _ => {}
            }
        }

        self.token(TokenKind::BasicString, start)
    }

    /// Tokenize a single-line literal string: `'...'`.
    fn tokenize_literal_string(&mut self) -> Token<'src> {
        let start = self.pos;

        // Consume opening apostrophe
        self.advance();

        loop {
            if self.is_eof() || self.at_line_break() {
                return self.token(TokenKind::Error, start);
            }
            if self.advance() == Some('\'') {
                break;
            }
        }

        self.token(TokenKind::LiteralString, start)
    }

    /// Tokenize a multi-line basic string: `"""..."""`.
    fn tokenize_multiline_basic_string(&mut self) -> Token<'src> {
        let start = self.pos;

        // Consume opening `"""`
        self.advance_by(3);

        loop {
            if self.is_eof() {
                return self.token(TokenKind::Error, start);
            }
            if self.starts_with("\"\"\"") {
                self.advance_by(3);
                self.absorb_extra_delimiters('"');
                return self.token(TokenKind::MultilineBasicString, start);
            }
            if self.advance() == Some('\\') && !self.is_eof() {
                self.advance();
            }
        }
    }

    /// Tokenize a multi-line literal string: `'''...'''`.
    fn tokenize_multiline_literal_string(&mut self) -> Token<'src> {
        let start = self.pos;

        // Consume opening `'''`
        self.advance_by(3);

        loop {
            if self.is_eof() {
                return self.token(TokenKind::Error, start);
            }
            if self.starts_with("'''") {
                self.advance_by(3);
                self.absorb_extra_delimiters('\'');
                return self.token(TokenKind::MultilineLiteralString, start);
            }
            self.advance();
        }
    }

    /// A multi-line string may end with up to two extra delimiter characters
    /// that belong to its content (`""""` or `"""""`).
    fn absorb_extra_delimiters(&mut self, delimiter: char) {
        for _ in 0..2 {
            if self.peek() == Some(delimiter) {
                self.advance();
            } else {
                break;
            }
        }
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

/// Check if a character belongs to a bare token.
///
/// This is wider than the bare-key alphabet: `+` and `:` are included so
/// that numbers with signed exponents and times come out as single tokens.
fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | ':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn tokenize(source: &str) -> Vec<(TokenKind, &str)> {
        Tokenizer::new(source).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(tokenize("["), vec![(TokenKind::LBracket, "[")]);
        assert_eq!(tokenize("]"), vec![(TokenKind::RBracket, "]")]);
        assert_eq!(tokenize("{"), vec![(TokenKind::LBrace, "{")]);
        assert_eq!(tokenize("}"), vec![(TokenKind::RBrace, "}")]);
        assert_eq!(tokenize(","), vec![(TokenKind::Comma, ",")]);
        assert_eq!(tokenize("."), vec![(TokenKind::Dot, ".")]);
        assert_eq!(tokenize("="), vec![(TokenKind::Eq, "=")]);
    }

    #[test]
    fn test_bare() {
        assert_eq!(tokenize("key"), vec![(TokenKind::Bare, "key")]);
        assert_eq!(tokenize("-42"), vec![(TokenKind::Bare, "-42")]);
        assert_eq!(tokenize("1e+5"), vec![(TokenKind::Bare, "1e+5")]);
        assert_eq!(
            tokenize("1979-05-27T07:32:00Z"),
            vec![(TokenKind::Bare, "1979-05-27T07:32:00Z")]
        );
    }

    #[test]
    fn test_dotted() {
        assert_eq!(
            tokenize("3.14"),
            vec![
                (TokenKind::Bare, "3"),
                (TokenKind::Dot, "."),
                (TokenKind::Bare, "14"),
            ]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            tokenize(r#""with \"escapes\"""#),
            vec![(TokenKind::BasicString, r#""with \"escapes\"""#)]
        );
        assert_eq!(
            tokenize(r"'C:\path'"),
            vec![(TokenKind::LiteralString, r"'C:\path'")]
        );
        assert_eq!(
            tokenize("\"\"\"a\nb\"\"\"\""),
            vec![(TokenKind::MultilineBasicString, "\"\"\"a\nb\"\"\"\"")]
        );
        assert_eq!(
            tokenize("'''x\n'''"),
            vec![(TokenKind::MultilineLiteralString, "'''x\n'''")]
        );
        assert_eq!(tokenize(r#""""#), vec![(TokenKind::BasicString, r#""""#)]);
    }

    #[test]
    fn test_unterminated_strings() {
        assert_eq!(
            tokenize("\"open\nnext"),
            vec![
                (TokenKind::Error, "\"open"),
                (TokenKind::Newline, "\n"),
                (TokenKind::Bare, "next"),
            ]
        );
        assert_eq!(tokenize("'open"), vec![(TokenKind::Error, "'open")]);
        assert_eq!(
            tokenize("\"\"\"never closed\n"),
            vec![(TokenKind::Error, "\"\"\"never closed\n")]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            tokenize("# comment\r\n"),
            vec![(TokenKind::Comment, "# comment"), (TokenKind::Newline, "\r\n")]
        );
    }

    #[test]
    fn test_comment_with_control_character() {
        assert_eq!(
            tokenize("# bell \u{7}\n# tab\tok"),
            vec![
                (TokenKind::Error, "# bell \u{7}"),
                (TokenKind::Newline, "\n"),
                (TokenKind::Comment, "# tab\tok"),
            ]
        );
        assert_eq!(tokenize("# cr\r"), vec![(TokenKind::Error, "# cr\r")]);
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(tokenize("  \t"), vec![(TokenKind::Whitespace, "  \t")]);
        assert_eq!(tokenize("\n"), vec![(TokenKind::Newline, "\n")]);
        assert_eq!(tokenize("\r\n"), vec![(TokenKind::Newline, "\r\n")]);
    }

    #[test]
    fn test_unknown_character() {
        assert_eq!(
            tokenize("a$"),
            vec![(TokenKind::Bare, "a"), (TokenKind::Error, "$")]
        );
    }

    #[test]
    fn test_pair() {
        assert_eq!(
            tokenize("name = \"toml\" # c"),
            vec![
                (TokenKind::Bare, "name"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Eq, "="),
                (TokenKind::Whitespace, " "),
                (TokenKind::BasicString, "\"toml\""),
                (TokenKind::Whitespace, " "),
                (TokenKind::Comment, "# c"),
            ]
        );
    }

    #[test]
    fn test_lossless() {
        let source = "[a.b]\nx = [1, 2.5, \"s\"] # c\r\ny = {z = 'q'}\n\u{e9}\n";
        let rebuilt: String = Tokenizer::new(source).map(|t| t.text).collect();
        assert_eq!(rebuilt, source);
    }
}
