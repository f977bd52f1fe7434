//! Finding malformed regions with the tolerant parser.

use toml_lint_cst::{LineIndex, Query, SyntaxNode};
use tracing::debug;

use crate::model::Position;

/// An `ERROR` node and where it starts.
#[derive(Debug, Clone)]
pub struct ErrorLocation {
    pub node: SyntaxNode,
    pub position: Position,
}

/// All `ERROR` nodes of the document's tree, in preorder.
///
/// Nested error nodes are all reported; duplicates are removed later by
/// message.
pub fn locate_errors(source: &str, index: &LineIndex<'_>) -> Vec<ErrorLocation> {
    let parse = toml_lint_cst::parse(source);
    let root = parse.syntax();

    let locations: Vec<_> = Query::errors()
        .captures(&root)
        .into_iter()
        .map(|node| {
            let position = index.line_col(node.text_range().start().into()).into();
            ErrorLocation { node, position }
        })
        .collect();

    debug!(count = locations.len(), "located error nodes");
    locations
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn positions(source: &str) -> Vec<(u32, u32)> {
        let index = LineIndex::new(source);
        locate_errors(source, &index)
            .iter()
            .map(|loc| (loc.position.line, loc.position.column))
            .collect()
    }

    #[test]
    fn test_valid_document_has_no_errors() {
        assert!(positions("key = \"value\"\n[section]\nother = 1\n").is_empty());
    }

    #[test]
    fn test_positions() {
        assert_eq!(positions("a = 1\nb = \nc = 3\n"), vec![(1, 4)]);
        assert_eq!(positions("x = 1\n  = 2\n"), vec![(1, 2)]);
    }

    #[test]
    fn test_preorder() {
        assert_eq!(positions("a = [1 2]\n= 3\n"), vec![(0, 7), (1, 0)]);
    }
}
