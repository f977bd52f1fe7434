//! Turning unit-relative line numbers into document lines.

use crate::message::rewrite_line;
use crate::model::ErrorItem;

/// The item's message with its line replaced by the error node's 1-based
/// document line. Columns are kept as reported.
pub fn reconcile(item: &ErrorItem) -> String {
    rewrite_line(&item.message, item.position.line + 1)
}
