//! Kind-based node selection over a syntax tree.

use crate::syntax_kind::{SyntaxKind, SyntaxNode};

/// Selects nodes of the given kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    kinds: Vec<SyntaxKind>,
}

impl Query {
    /// A query matching any of `kinds`.
    pub fn new(kinds: impl IntoIterator<Item = SyntaxKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// A query matching `ERROR` nodes.
    pub fn errors() -> Self {
        Self::new([SyntaxKind::ERROR])
    }

    /// Whether `node` is selected by this query.
    pub fn matches(&self, node: &SyntaxNode) -> bool {
        self.kinds.contains(&node.kind())
    }

    /// All matching nodes under (and including) `root`, in preorder.
    pub fn captures(&self, root: &SyntaxNode) -> Vec<SyntaxNode> {
        root.descendants().filter(|n| self.matches(n)).collect()
    }
}
