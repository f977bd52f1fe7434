//! The `<description> (at line <N>, column <M>)` message convention.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

static LINE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(at\sline\s\d+,").unwrap());

static MESSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\(at\sline\s(\d+),\scolumn\s(\d+)\)$").unwrap());

/// One diagnostic, parsed back out of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
    /// Text before ` (at line `.
    pub description: String,
}

impl Diagnostic {
    /// Parse a message; `None` when it does not end in a position suffix.
    pub fn parse(message: &str) -> Option<Self> {
        let caps = MESSAGE.captures(message)?;
        Some(Self {
            line: caps[2].parse().ok()?,
            column: caps[3].parse().ok()?,
            description: caps[1].trim_end().to_string(),
        })
    }
}

/// Replace the line number of every `(at line <N>,` in `message`.
pub fn rewrite_line(message: &str, line: u32) -> String {
    let replacement = format!("(at line {},", line);
    LINE_REFERENCE
        .replace_all(message, NoExpand(&replacement))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_parse() {
        let diagnostic = Diagnostic::parse("Invalid value (at line 2, column 5)").unwrap();
        assert_eq!(
            diagnostic,
            Diagnostic {
                line: 2,
                column: 5,
                description: "Invalid value".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_keeps_inner_parentheses() {
        let diagnostic =
            Diagnostic::parse("Illegal character '(' (at line 10, column 12)").unwrap();
        assert_eq!(diagnostic.description, "Illegal character '('");
        assert_eq!((diagnostic.line, diagnostic.column), (10, 12));
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert_eq!(Diagnostic::parse("Invalid value"), None);
        assert_eq!(Diagnostic::parse("Invalid value (at end of document)"), None);
        assert_eq!(Diagnostic::parse("(at line 1, column 1)"), None);
        assert_eq!(
            Diagnostic::parse("Invalid value (at line 1, column 1) trailing"),
            None
        );
    }

    #[test]
    fn test_rewrite_line() {
        assert_eq!(
            rewrite_line("Invalid value (at line 1, column 5)", 2),
            "Invalid value (at line 2, column 5)"
        );
        assert_eq!(rewrite_line("no position here", 7), "no position here");
    }
}
