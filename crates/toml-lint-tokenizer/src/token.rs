//! Token types for the TOML tokenizer.

use crate::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structural tokens
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `=`
    Eq,

    // Atoms
    /// Run of `[A-Za-z0-9_+:-]`: bare keys, numbers, booleans, date-time pieces.
    Bare,
    /// Basic string: `"hello"`
    BasicString,
    /// Literal string: `'C:\path'`
    LiteralString,
    /// Multi-line basic string: `"""..."""`
    MultilineBasicString,
    /// Multi-line literal string: `'''...'''`
    MultilineLiteralString,

    // Trivia
    /// Comment: `# ...` up to the end of the line
    Comment,
    /// Horizontal whitespace: spaces and tabs
    Whitespace,
    /// Newline: `\n` or `\r\n`
    Newline,

    // Special tokens
    /// End of file
    Eof,
    /// Unterminated string, comment with a control character, or
    /// unrecognized character
    Error,
}

impl TokenKind {
    /// Whether this token is trivia (whitespace, newlines or comments).
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Newline | TokenKind::Comment
        )
    }

    /// Whether this token can start a key part.
    pub fn is_key_start(&self) -> bool {
        matches!(
            self,
            TokenKind::Bare | TokenKind::BasicString | TokenKind::LiteralString
        )
    }

    /// Whether this token is any of the four string forms.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            TokenKind::BasicString
                | TokenKind::LiteralString
                | TokenKind::MultilineBasicString
                | TokenKind::MultilineLiteralString
        )
    }
}

/// A token with its kind, span, and source text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in the source text.
    pub span: Span,
    /// The source text of this token.
    pub text: &'src str,
}

impl<'src> Token<'src> {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span, text: &'src str) -> Self {
        Self { kind, span, text }
    }
}
