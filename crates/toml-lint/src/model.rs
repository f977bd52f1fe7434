//! Positions and unit-level error records.

use toml_lint_cst::LineCol;

/// Zero-based line and character column in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl From<LineCol> for Position {
    fn from(pos: LineCol) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
        }
    }
}

/// A message from re-validating one unit, tied to the error node it came from.
///
/// The message follows `<description> (at line <N>, column <M>)` with `N`
/// relative to the unit's text until it is reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorItem {
    pub position: Position,
    pub message: String,
}
