//! Error types for strict TOML parsing.

use std::fmt;

/// The first syntax error found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset into the newline-normalized source.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl ParseError {
    /// Create an error at `offset` in `source`, computing its line and column.
    pub fn at(source: &str, offset: usize, kind: ParseErrorKind) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = source[line_start..offset].chars().count() + 1;
        Self {
            kind,
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (at line {}, column {})",
            self.kind, self.line, self.column
        )
    }
}

impl std::error::Error for ParseError {}

/// Kind of strict parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A line starts with something that is not a key, a header or a comment.
    InvalidStatement,
    /// Content follows a complete statement on the same line.
    ExpectedNewline,
    /// A key is not followed by `=`.
    ExpectedEquals,
    /// A key part starts with a character that cannot start a key.
    InvalidKeyStart,
    /// No value could be recognized.
    InvalidValue,
    /// An array element is followed by something other than `,` or `]`.
    UnclosedArray,
    /// An inline table entry is followed by something other than `,` or `}`.
    UnclosedInlineTable,
    /// End of input inside a basic string.
    UnterminatedString,
    /// A control character inside a basic string.
    IllegalCharacter(char),
    /// A control character inside a literal string or comment.
    InvalidCharacter(char),
    /// End of input before a closing delimiter.
    Expected(&'static str),
    /// A backslash that does not start a valid escape.
    UnescapedBackslash,
    /// `\u`/`\U` not followed by enough hex digits.
    InvalidHex,
    /// `\u`/`\U` naming a surrogate or out-of-range code point.
    NotUnicodeScalar,
    /// A date or date-time with out-of-range components.
    InvalidDatetime,
    /// An integer that does not fit in 64 bits.
    IntegerOutOfRange,
    /// A `[table]` header for a table that already exists.
    DuplicateTable { key: String },
    /// A key that already holds a value, or a path through a non-table.
    OverwriteValue,
    /// A dotted key reaching into an explicitly declared table.
    RedefineNamespace { key: String },
    /// A write into an inline table or a static array.
    ImmutableNamespace { key: String },
    /// The same key twice in one inline table.
    DuplicateInlineKey { key: String },
    /// A table header without its closing `]`.
    UnclosedTableHeader,
    /// An array of tables header without its closing `]]`.
    UnclosedArrayTableHeader,
    /// Arrays and inline tables nested deeper than [`MAX_NESTING_DEPTH`](crate::MAX_NESTING_DEPTH).
    NestingTooDeep,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::InvalidStatement => write!(f, "Invalid statement"),
            ParseErrorKind::ExpectedNewline => {
                write!(f, "Expected newline or end of document after a statement")
            }
            ParseErrorKind::ExpectedEquals => {
                write!(f, "Expected '=' after a key in a key/value pair")
            }
            ParseErrorKind::InvalidKeyStart => {
                write!(f, "Invalid initial character for a key part")
            }
            ParseErrorKind::InvalidValue => write!(f, "Invalid value"),
            ParseErrorKind::UnclosedArray => write!(f, "Unclosed array"),
            ParseErrorKind::UnclosedInlineTable => write!(f, "Unclosed inline table"),
            ParseErrorKind::UnterminatedString => write!(f, "Unterminated string"),
            ParseErrorKind::IllegalCharacter(c) => write!(f, "Illegal character {:?}", c),
            ParseErrorKind::InvalidCharacter(c) => {
                write!(f, "Found invalid character {:?}", c)
            }
            ParseErrorKind::Expected(delimiter) => write!(f, "Expected {:?}", delimiter),
            ParseErrorKind::UnescapedBackslash => write!(f, "Unescaped '\\' in a string"),
            ParseErrorKind::InvalidHex => write!(f, "Invalid hex value"),
            ParseErrorKind::NotUnicodeScalar => {
                write!(f, "Escaped character is not a Unicode scalar value")
            }
            ParseErrorKind::InvalidDatetime => write!(f, "Invalid date or datetime"),
            ParseErrorKind::IntegerOutOfRange => write!(f, "Integer out of range"),
            ParseErrorKind::DuplicateTable { key } => write!(f, "Cannot declare {} twice", key),
            ParseErrorKind::OverwriteValue => write!(f, "Cannot overwrite a value"),
            ParseErrorKind::RedefineNamespace { key } => {
                write!(f, "Cannot redefine namespace {}", key)
            }
            ParseErrorKind::ImmutableNamespace { key } => {
                write!(f, "Cannot mutate immutable namespace {}", key)
            }
            ParseErrorKind::DuplicateInlineKey { key } => {
                write!(f, "Duplicate inline table key {}", key)
            }
            ParseErrorKind::UnclosedTableHeader => {
                write!(f, "Expected ']' at the end of a table declaration")
            }
            ParseErrorKind::UnclosedArrayTableHeader => {
                write!(f, "Expected ']]' at the end of an array declaration")
            }
            ParseErrorKind::NestingTooDeep => write!(f, "Maximum nesting depth exceeded"),
        }
    }
}
