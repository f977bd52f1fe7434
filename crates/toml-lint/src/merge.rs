//! Combining, deduplicating and ordering diagnostics.

use std::collections::HashSet;

use tracing::debug;

use crate::message::Diagnostic;

/// Merge unit messages with the whole-document message, drop exact
/// duplicates and sort.
pub fn merge(unit_messages: Vec<String>, document_message: Option<String>) -> Vec<String> {
    let unique: HashSet<String> = unit_messages.into_iter().chain(document_message).collect();
    sort_messages(unique)
}

/// Sort messages by line, then column, then text.
///
/// Messages that do not end in a position suffix are dropped.
pub fn sort_messages(messages: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut keyed: Vec<(usize, usize, String)> = messages
        .into_iter()
        .filter_map(|message| match Diagnostic::parse(&message) {
            Some(d) => Some((d.line, d.column, message)),
            None => {
                debug!(%message, "dropping message without position");
                None
            }
        })
        .collect();
    keyed.sort();
    keyed.into_iter().map(|(_, _, message)| message).collect()
}
