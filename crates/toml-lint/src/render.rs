//! Writing diagnostics for people.

use std::io;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use toml_lint_cst::{LineCol, LineIndex};

use crate::message::Diagnostic;

/// Write one `<filename>:<line>:<column> error: <description>` line per message.
///
/// Messages without a position suffix are skipped.
pub fn render_plain<W: io::Write>(
    mut writer: W,
    filename: &str,
    messages: &[String],
) -> io::Result<()> {
    for diagnostic in messages.iter().filter_map(|m| Diagnostic::parse(m)) {
        writeln!(
            writer,
            "{}:{}:{} error: {}",
            filename, diagnostic.line, diagnostic.column, diagnostic.description
        )?;
    }
    Ok(())
}

/// Write each message as an annotated source report.
pub fn render_report<W: io::Write>(
    mut writer: W,
    filename: &str,
    source: &str,
    messages: &[String],
) -> io::Result<()> {
    let index = LineIndex::new(source);

    for diagnostic in messages.iter().filter_map(|m| Diagnostic::parse(m)) {
        let start = index.offset(LineCol {
            line: diagnostic.line.saturating_sub(1) as u32,
            column: diagnostic.column.saturating_sub(1) as u32,
        }) as usize;
        // Point at one character; at the end of input, the last one.
        let range = match source[start..].chars().next() {
            Some(c) => start..start + c.len_utf8(),
            None => match source.chars().next_back() {
                Some(c) => start - c.len_utf8()..start,
                None => start..start,
            },
        };

        Report::build(ReportKind::Error, (filename, range.clone()))
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_message(&diagnostic.description)
            .with_label(
                Label::new((filename, range))
                    .with_message(format!(
                        "line {}, column {}",
                        diagnostic.line, diagnostic.column
                    ))
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn plain(filename: &str, messages: &[&str]) -> String {
        let messages: Vec<String> = messages.iter().map(|s| s.to_string()).collect();
        let mut output = Vec::new();
        render_plain(&mut output, filename, &messages).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_plain() {
        insta::assert_snapshot!(
            plain(
                "config.toml",
                &[
                    "Invalid statement (at line 1, column 1)",
                    "Invalid value (at line 2, column 5)",
                ]
            ),
            @r"
        config.toml:1:1 error: Invalid statement
        config.toml:2:5 error: Invalid value
        "
        );
    }

    #[test]
    fn test_plain_skips_malformed() {
        assert_eq!(
            plain("-", &["oops", "Unclosed array (at line 3, column 1)"]),
            "-:3:1 error: Unclosed array\n"
        );
    }

    #[test]
    fn test_plain_empty() {
        assert_eq!(plain("config.toml", &[]), "");
    }

    #[test]
    fn test_report() {
        let source = "[a]\nx = [1 2]\n";
        let messages = vec!["Unclosed array (at line 2, column 8)".to_string()];
        let mut output = Vec::new();
        render_report(&mut output, "config.toml", source, &messages).unwrap();

        let stripped = String::from_utf8(strip_ansi_escapes::strip(&output)).unwrap();
        assert_eq!(stripped.lines().next(), Some("Error: Unclosed array"));
        assert!(stripped.contains("config.toml"), "{stripped}");
        assert!(stripped.contains("x = [1 2]"), "{stripped}");
        assert!(stripped.contains("line 2, column 8"), "{stripped}");
    }

    #[test]
    fn test_report_at_end_of_input() {
        let source = "a = [1,";
        let messages = vec!["Invalid value (at line 1, column 8)".to_string()];
        let mut output = Vec::new();
        render_report(&mut output, "config.toml", source, &messages).unwrap();
        assert!(!output.is_empty());
    }
}
