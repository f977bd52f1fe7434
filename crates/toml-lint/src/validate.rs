//! Running the strict parser over the whole document and over single units.

use tracing::debug;

use crate::isolate::Unit;
use crate::model::{ErrorItem, Position};

/// The strict parser's message for the whole document, if it is rejected.
pub fn validate_document(source: &str) -> Option<String> {
    match toml_lint_parse::validate(source) {
        Ok(()) => None,
        Err(err) => {
            debug!(%err, "document rejected");
            Some(err.to_string())
        }
    }
}

/// Validate a unit on its own and attach the failure to `position`.
///
/// The unit is indented by its document column, so the reported column of
/// a single-line unit is the document column. A unit that validates on its
/// own yields nothing.
pub fn revalidate(unit: &Unit, position: Position) -> Option<ErrorItem> {
    let padded = format!("{}{}", " ".repeat(unit.column as usize), unit.text);
    match toml_lint_parse::validate(&padded) {
        Ok(()) => {
            debug!(text = %unit.text, "unit validates on its own");
            None
        }
        Err(err) => Some(ErrorItem {
            position,
            message: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isolate::isolate;
    use facet_testhelpers::test;
    use toml_lint_cst::LineIndex;

    fn revalidate_all(source: &str) -> Vec<ErrorItem> {
        let index = LineIndex::new(source);
        crate::locate::locate_errors(source, &index)
            .iter()
            .filter_map(|loc| revalidate(&isolate(&loc.node, &index), loc.position))
            .collect()
    }

    #[test]
    fn test_validate_document() {
        assert_eq!(validate_document("a = 1\n"), None);
        assert_eq!(
            validate_document("a = 1\na = 2\n").as_deref(),
            Some("Cannot overwrite a value (at line 2, column 6)")
        );
    }

    #[test]
    fn test_unit_message_is_relative() {
        let items = revalidate_all("a = 1\nb = \nc = 3\n");
        assert_eq!(
            items,
            vec![ErrorItem {
                position: Position { line: 1, column: 4 },
                message: "Invalid value (at line 1, column 5)".to_string(),
            }]
        );
    }

    #[test]
    fn test_columns_survive_isolation() {
        let items = revalidate_all("x = { y = }\n");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].message, "Invalid value (at line 1, column 11)");
        assert_eq!(
            validate_document("x = { y = }\n").as_deref(),
            Some("Invalid value (at line 1, column 11)")
        );
    }

    #[test]
    fn test_malformed_header() {
        let items = revalidate_all("[a.]\n");
        let messages: Vec<_> = items.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Invalid initial character for a key part (at line 1, column 4)"]
        );
    }

    #[test]
    fn test_unit_that_validates_alone() {
        let unit = Unit {
            node: toml_lint_cst::parse("a = 1").syntax(),
            text: "a = 1".to_string(),
            column: 4,
        };
        assert_eq!(revalidate(&unit, Position { line: 0, column: 4 }), None);
    }
}
