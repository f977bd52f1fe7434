//! Syntax diagnostics for TOML documents.
//!
//! A document is checked twice. The strict parser from `toml-lint-parse`
//! validates it as a whole and reports at most one error, including errors
//! a syntax tree cannot see (duplicate keys, tables declared twice). The
//! tolerant parser from `toml-lint-cst` finds every malformed region; each
//! one is narrowed to its enclosing key/value pair, which is validated on
//! its own to get a precise message. Messages from both paths are moved to
//! document lines, deduplicated and sorted.
//!
//! ```
//! let messages = toml_lint::lint("a = 1\nb = \nc = 3\n");
//! assert_eq!(messages, vec!["Invalid value (at line 2, column 5)"]);
//!
//! let mut out = Vec::new();
//! toml_lint::render_plain(&mut out, "config.toml", &messages).unwrap();
//! assert_eq!(out, b"config.toml:2:5 error: Invalid value\n");
//! ```

use toml_lint_cst::LineIndex;
use tracing::debug;

mod isolate;
pub use isolate::{Unit, isolate};

mod locate;
pub use locate::{ErrorLocation, locate_errors};

mod merge;
pub use merge::{merge, sort_messages};

mod message;
pub use message::{Diagnostic, rewrite_line};

mod model;
pub use model::{ErrorItem, Position};

mod reconcile;
pub use reconcile::reconcile;

mod render;
pub use render::{render_plain, render_report};

mod validate;
pub use validate::{revalidate, validate_document};

/// Run every check over `source` and return the final, sorted messages.
pub fn lint(source: &str) -> Vec<String> {
    let document_message = validate_document(source);

    let index = LineIndex::new(source);
    let unit_messages: Vec<String> = locate_errors(source, &index)
        .iter()
        .filter_map(|location| {
            let unit = isolate(&location.node, &index);
            revalidate(&unit, location.position)
        })
        .map(|item| reconcile(&item))
        .collect();
    debug!(
        units = unit_messages.len(),
        document = document_message.is_some(),
        "collected messages"
    );

    let messages = merge(unit_messages, document_message);
    debug!(count = messages.len(), "diagnostics");
    messages
}
