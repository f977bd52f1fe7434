//! Syntax node and token kinds for the TOML CST.

use toml_lint_tokenizer::TokenKind;

/// The kind of a syntax element (node or token).
///
/// Tokens are terminal elements (leaves), while nodes are non-terminal
/// (contain children). The distinction is made by value: tokens have
/// lower values than `__LAST_TOKEN`.
///
/// The SCREAMING_CASE naming convention is used to match rowan/rust-analyzer
/// conventions for syntax kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
#[allow(clippy::manual_non_exhaustive)] // __LAST_TOKEN is used for token/node distinction
pub enum SyntaxKind {
    // ========== TOKENS (terminals) ==========
    // Structural tokens
    /// `[`
    L_BRACKET = 0,
    /// `]`
    R_BRACKET,
    /// `{`
    L_BRACE,
    /// `}`
    R_BRACE,
    /// `,`
    COMMA,
    /// `.`
    DOT,
    /// `=`
    EQ,

    // Atom tokens
    /// Bare run: keys, numbers, booleans, date-time pieces
    BARE,
    /// Basic string: `"..."`
    BASIC_STRING,
    /// Literal string: `'...'`
    LITERAL_STRING,
    /// Multi-line basic string: `"""..."""`
    MULTILINE_BASIC_STRING,
    /// Multi-line literal string: `'''...'''`
    MULTILINE_LITERAL_STRING,

    // Trivia tokens
    /// Comment: `# ...`
    COMMENT,
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Newline (`\n` or `\r\n`)
    NEWLINE,

    // Special tokens
    /// End of file
    EOF,
    /// Unterminated string or unrecognized character
    ERROR_TOKEN,

    // Marker for end of tokens
    #[doc(hidden)]
    __LAST_TOKEN,

    // ========== NODES (non-terminals) ==========
    /// Root document node
    DOCUMENT,
    /// A `[table]` header together with the statements below it
    TABLE,
    /// A `[[array.of.tables]]` header together with the statements below it
    ARRAY_TABLE,
    /// A key/value association: `key = value`
    PAIR,
    /// A (possibly dotted) key
    KEY,
    /// A scalar value: a string, or glued bare/dot tokens
    SCALAR,
    /// An array `[ ... ]`
    ARRAY,
    /// An inline table `{ ... }`
    INLINE_TABLE,
    /// Input the parser could not make sense of
    ERROR,
}

impl SyntaxKind {
    /// Whether this is a token (terminal) kind.
    pub fn is_token(self) -> bool {
        (self as u16) < (Self::__LAST_TOKEN as u16)
    }

    /// Whether this is a node (non-terminal) kind.
    pub fn is_node(self) -> bool {
        (self as u16) > (Self::__LAST_TOKEN as u16)
    }

    /// Whether this is trivia (whitespace, newlines or comments).
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE | Self::COMMENT)
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::LBracket => Self::L_BRACKET,
            TokenKind::RBracket => Self::R_BRACKET,
            TokenKind::LBrace => Self::L_BRACE,
            TokenKind::RBrace => Self::R_BRACE,
            TokenKind::Comma => Self::COMMA,
            TokenKind::Dot => Self::DOT,
            TokenKind::Eq => Self::EQ,
            TokenKind::Bare => Self::BARE,
            TokenKind::BasicString => Self::BASIC_STRING,
            TokenKind::LiteralString => Self::LITERAL_STRING,
            TokenKind::MultilineBasicString => Self::MULTILINE_BASIC_STRING,
            TokenKind::MultilineLiteralString => Self::MULTILINE_LITERAL_STRING,
            TokenKind::Comment => Self::COMMENT,
            TokenKind::Whitespace => Self::WHITESPACE,
            TokenKind::Newline => Self::NEWLINE,
            TokenKind::Eof => Self::EOF,
            TokenKind::Error => Self::ERROR_TOKEN,
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

/// Language definition for TOML, used by rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TomlLanguage {}

impl rowan::Language for TomlLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        Self::Kind::from_raw(raw.0).expect("invalid SyntaxKind value from rowan")
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

impl SyntaxKind {
    /// Convert from a raw u16 value to SyntaxKind.
    /// Returns None if the value is out of range or corresponds to __LAST_TOKEN.
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0 => Some(Self::L_BRACKET),
            1 => Some(Self::R_BRACKET),
            2 => Some(Self::L_BRACE),
            3 => Some(Self::R_BRACE),
            4 => Some(Self::COMMA),
            5 => Some(Self::DOT),
            6 => Some(Self::EQ),
            7 => Some(Self::BARE),
            8 => Some(Self::BASIC_STRING),
            9 => Some(Self::LITERAL_STRING),
            10 => Some(Self::MULTILINE_BASIC_STRING),
            11 => Some(Self::MULTILINE_LITERAL_STRING),
            12 => Some(Self::COMMENT),
            13 => Some(Self::WHITESPACE),
            14 => Some(Self::NEWLINE),
            15 => Some(Self::EOF),
            16 => Some(Self::ERROR_TOKEN),
            // 17 is __LAST_TOKEN - skip it
            18 => Some(Self::DOCUMENT),
            19 => Some(Self::TABLE),
            20 => Some(Self::ARRAY_TABLE),
            21 => Some(Self::PAIR),
            22 => Some(Self::KEY),
            23 => Some(Self::SCALAR),
            24 => Some(Self::ARRAY),
            25 => Some(Self::INLINE_TABLE),
            26 => Some(Self::ERROR),
            _ => None,
        }
    }
}

/// A syntax node in the TOML CST.
pub type SyntaxNode = rowan::SyntaxNode<TomlLanguage>;

/// A syntax token in the TOML CST.
pub type SyntaxToken = rowan::SyntaxToken<TomlLanguage>;

/// A syntax element (either node or token) in the TOML CST.
pub type SyntaxElement = rowan::SyntaxElement<TomlLanguage>;
