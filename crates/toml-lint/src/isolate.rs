//! Picking the smallest unit of text to re-validate for an error node.

use toml_lint_cst::ast::{AstNode, Pair};
use toml_lint_cst::{LineIndex, SyntaxNode};

/// The text around an error node that gets validated on its own.
#[derive(Debug, Clone)]
pub struct Unit {
    pub node: SyntaxNode,
    pub text: String,
    /// Zero-based character column where the unit starts in the document.
    pub column: u32,
}

impl Unit {
    fn new(node: SyntaxNode, index: &LineIndex<'_>) -> Self {
        let column = index.line_col(node.text_range().start().into()).column;
        Self {
            text: node.text().to_string(),
            node,
            column,
        }
    }
}

/// The closest `PAIR` above `error`, or `error` itself when it is not inside one.
pub fn isolate(error: &SyntaxNode, index: &LineIndex<'_>) -> Unit {
    let mut current = error.parent();
    while let Some(node) = current {
        if let Some(pair) = Pair::cast(node.clone()) {
            return Unit::new(pair.syntax().clone(), index);
        }
        current = node.parent();
    }
    Unit::new(error.clone(), index)
}
