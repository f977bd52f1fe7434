//! Lossless, error-tolerant Concrete Syntax Tree for TOML.
//!
//! This crate parses TOML into a [rowan](https://docs.rs/rowan) tree that
//! preserves all source text, including whitespace and comments. Parsing
//! never fails: malformed regions end up in `ERROR` nodes, so a single pass
//! finds every place in a document that needs attention.
//!
//! # Example
//!
//! ```
//! use toml_lint_cst::{LineIndex, Query, parse};
//!
//! let source = "a = 1\nb = \nc = 3\n";
//! let parsed = parse(source);
//! assert!(!parsed.is_ok());
//!
//! let root = parsed.syntax();
//! let errors = Query::errors().captures(&root);
//! assert_eq!(errors.len(), 1);
//!
//! let index = LineIndex::new(source);
//! let pos = index.line_col(errors[0].text_range().start().into());
//! assert_eq!((pos.line, pos.column), (1, 4));
//!
//! // Roundtrip: source can be exactly reconstructed
//! assert_eq!(root.to_string(), source);
//! ```

pub mod ast;
mod line_index;
pub mod parser;
mod query;
pub mod syntax_kind;

pub use line_index::{LineCol, LineIndex};
pub use parser::{Parse, ParseError, parse};
pub use query::Query;
pub use syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, TomlLanguage};

// Re-export rowan types for convenience
pub use rowan::{TextRange, TextSize};
