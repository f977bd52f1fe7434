//! Typed AST wrappers over CST nodes.

use crate::syntax_kind::{SyntaxKind, SyntaxNode};

/// Trait for AST nodes that wrap CST nodes.
pub trait AstNode: Sized {
    /// Try to cast a syntax node to this AST type.
    fn cast(node: SyntaxNode) -> Option<Self>;

    /// Get the underlying syntax node.
    fn syntax(&self) -> &SyntaxNode;
}

/// Macro for defining simple AST node wrappers.
macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn cast(node: SyntaxNode) -> Option<Self> {
                if node.kind() == $kind {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(
    /// A `key = value` pair, including any malformed parts inside it.
    Pair,
    SyntaxKind::PAIR
);
