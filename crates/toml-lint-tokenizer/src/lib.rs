//! A lossless tokenizer for TOML

mod span;
pub use span::Span;

mod token;
pub use token::{Token, TokenKind};

mod tokenizer;
pub use tokenizer::Tokenizer;
