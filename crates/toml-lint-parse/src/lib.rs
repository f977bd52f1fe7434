//! Strict TOML 1.0 parser.
//!
//! Unlike the tolerant tree in `toml-lint-cst`, this parser stops at the
//! first problem and reports it as a [`ParseError`] whose `Display` form is
//! `<description> (at line <N>, column <M>)`. It also enforces the table
//! rules a syntax tree cannot see, such as duplicate keys and tables
//! declared twice.
//!
//! ```
//! let err = toml_lint_parse::validate("a = 1\na = 2\n").unwrap_err();
//! assert_eq!(err.to_string(), "Cannot overwrite a value (at line 2, column 6)");
//! ```

mod error;
pub use error::{ParseError, ParseErrorKind};

mod namespace;

mod parser;
pub use parser::{MAX_NESTING_DEPTH, parse, parse_value, validate};

mod value;
pub use value::{Date, Datetime, Offset, Table, Time, Value};
