//! toml-lint: report every syntax error in a TOML file
//!
//! Examples:
//!   toml-lint Cargo.toml                          - check a file
//!   toml-lint - < Cargo.toml                      - check stdin
//!   toml-lint - --stdin-filename Cargo.toml       - check stdin, name it in output
//!   toml-lint Cargo.toml --format report          - annotated source reports

use std::io::{self, Read, Write};

use facet::Facet;
use figue as args;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Exit codes
// ============================================================================

const EXIT_SUCCESS: i32 = 0;
const EXIT_USAGE_ERROR: i32 = 2;
const EXIT_IO_ERROR: i32 = 3;

// ============================================================================
// CLI argument structures
// ============================================================================

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `toml-lint <file> [options]`
#[derive(Facet, Debug)]
struct Args {
    /// Input file path (or "-" for stdin)
    #[facet(args::positional, default)]
    input: Option<String>,

    /// Name shown in diagnostics instead of the input path
    #[facet(args::named, default)]
    stdin_filename: Option<String>,

    /// Output format: plain (default) or report
    #[facet(args::named, default)]
    format: Option<String>,

    /// Show version
    #[facet(args::named, args::short = 'V', default)]
    version: bool,
}

/// How diagnostics are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Plain,
    Report,
}

impl Format {
    fn from_arg(arg: Option<&str>) -> Result<Self, CliError> {
        match arg {
            None | Some("plain") => Ok(Format::Plain),
            Some("report") => Ok(Format::Report),
            Some(other) => Err(CliError::Usage(format!(
                "unknown format '{other}' (expected 'plain' or 'report')"
            ))),
        }
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    init_tracing();

    let raw_args: Vec<String> = std::env::args().skip(1).collect();

    if raw_args.is_empty() {
        print_help();
        std::process::exit(EXIT_SUCCESS);
    }

    if raw_args[0] == "--version" || raw_args[0] == "-V" {
        println!("toml-lint {VERSION}");
        std::process::exit(EXIT_SUCCESS);
    }

    if raw_args[0] == "--help" || raw_args[0] == "-h" {
        print_help();
        std::process::exit(EXIT_SUCCESS);
    }

    let result = parse_args(&raw_args).and_then(|args| {
        if args.version {
            println!("toml-lint {VERSION}");
            return Ok(());
        }
        run(&args, io::stdin().lock(), io::stdout().lock())
    });
    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

fn parse_args(raw_args: &[String]) -> Result<Args, CliError> {
    let args_strs: Vec<&str> = raw_args.iter().map(|s| s.as_str()).collect();
    figue::from_slice(&args_strs).map_err(|e| CliError::Usage(e.to_string()))
}

/// Logs go to stderr; stdout carries only diagnostics.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn print_help() {
    eprintln!("toml-lint {VERSION} - report syntax errors in TOML files\n");
    eprintln!("USAGE:");
    eprintln!("    toml-lint <file> [options]      Check a file ('-' for stdin)\n");
    eprintln!("OPTIONS:");
    eprintln!("        --stdin-filename <NAME>     Name shown in diagnostics for the input");
    eprintln!("        --format <plain|report>     Output format (default: plain)");
    eprintln!("    -V, --version                   Print version");
    eprintln!("    -h, --help                      Print this help\n");
    eprintln!("OUTPUT:");
    eprintln!("    One line per error: <file>:<line>:<column> error: <description>");
    eprintln!("    Nothing is printed for a valid file.\n");
    eprintln!("EXAMPLES:");
    eprintln!("    toml-lint Cargo.toml");
    eprintln!("    cat Cargo.toml | toml-lint - --stdin-filename Cargo.toml");
    eprintln!("    toml-lint Cargo.toml --format report");
}

/// Check one document and write its diagnostics to `out`.
///
/// Without an input path there is nothing to check and help is printed.
fn run<R: Read, W: Write>(args: &Args, stdin: R, mut out: W) -> Result<(), CliError> {
    let Some(input) = args.input.as_deref() else {
        print_help();
        return Ok(());
    };
    let format = Format::from_arg(args.format.as_deref())?;
    let source = read_input(input, stdin)?;
    let filename = args.stdin_filename.as_deref().unwrap_or(input);
    debug!(%filename, bytes = source.len(), ?format, "checking");

    let messages = toml_lint::lint(&source);
    match format {
        Format::Plain => toml_lint::render_plain(&mut out, filename, &messages)?,
        Format::Report => toml_lint::render_report(&mut out, filename, &source, &messages)?,
    }
    out.flush()?;
    Ok(())
}

fn read_input<R: Read>(input: &str, mut stdin: R) -> Result<String, io::Error> {
    match input {
        "-" => {
            let mut buf = String::new();
            stdin.read_to_string(&mut buf)?;
            Ok(buf)
        }
        path => std::fs::read_to_string(path),
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    Usage(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Io(_) => EXIT_IO_ERROR,
            CliError::Usage(_) => EXIT_USAGE_ERROR,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{e}"),
            CliError::Usage(e) => write!(f, "{e}"),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn args(input: &str, stdin_filename: Option<&str>, format: Option<&str>) -> Args {
        Args {
            input: Some(input.to_string()),
            stdin_filename: stdin_filename.map(String::from),
            format: format.map(String::from),
            version: false,
        }
    }

    fn run_to_string(args: &Args, stdin: &str) -> Result<String, CliError> {
        let mut out = Vec::new();
        run(args, stdin.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_stdin_filename_prefix() {
        let output =
            run_to_string(&args("-", Some("name"), None), "a = 1\nb = \nc = 3\n").unwrap();
        assert_eq!(output, "name:2:5 error: Invalid value\n");
    }

    #[test]
    fn test_stdin_without_name() {
        let output = run_to_string(&args("-", None, None), "b = \n").unwrap();
        assert_eq!(output, "-:1:5 error: Invalid value\n");
    }

    #[test]
    fn test_valid_input_prints_nothing() {
        let output = run_to_string(&args("-", None, None), "key = \"value\"\n").unwrap();
        assert_eq!(output, "");
    }

    #[test]
    fn test_stdin_filename_overrides_file_path() {
        let dir = std::env::temp_dir().join(format!("toml-lint-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        std::fs::write(&path, "b = \n").unwrap();

        let path = path.to_string_lossy().into_owned();
        let output = run_to_string(&args(&path, Some("shown.toml"), None), "").unwrap();
        assert_eq!(output, "shown.toml:1:5 error: Invalid value\n");

        let output = run_to_string(&args(&path, None, None), "").unwrap();
        assert_eq!(output, format!("{path}:1:5 error: Invalid value\n"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_filename_prints_help() {
        let parsed = parse_args(&["--stdin-filename".to_string(), "x".to_string()]).unwrap();
        assert_eq!(parsed.input, None);
        assert_eq!(parsed.stdin_filename.as_deref(), Some("x"));
        assert_eq!(run_to_string(&parsed, "b = \n").unwrap(), "");
    }

    #[test]
    fn test_arguments() {
        let parsed = parse_args(&[
            "config.toml".to_string(),
            "--format".to_string(),
            "report".to_string(),
        ])
        .unwrap();
        assert_eq!(parsed.input.as_deref(), Some("config.toml"));
        assert_eq!(parsed.format.as_deref(), Some("report"));
        assert!(!parsed.version);
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let err = parse_args(&["config.toml".to_string(), "--bogus".to_string()]).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
        assert_eq!(err.exit_code(), EXIT_USAGE_ERROR);
    }

    #[test]
    fn test_report_format() {
        let output = run_to_string(&args("-", Some("c.toml"), Some("report")), "b = \n").unwrap();
        assert!(output.contains("Invalid value"), "{output}");
    }

    #[test]
    fn test_unknown_format_is_usage_error() {
        let err = run_to_string(&args("-", None, Some("json")), "").unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
        assert_eq!(err.exit_code(), EXIT_USAGE_ERROR);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = run_to_string(&args("/nonexistent/dir/file.toml", None, None), "").unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
        assert_eq!(err.exit_code(), EXIT_IO_ERROR);
    }

    #[test]
    fn test_invalid_utf8_is_io_error() {
        let mut out = Vec::new();
        let err = run(&args("-", None, None), &[0xff, 0xfe][..], &mut out).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
