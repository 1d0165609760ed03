//! bracefmt CLI
//!
//! Usage:
//!   bracefmt [OPTIONS] [FILE]
//!
//! Options:
//!   -t, --template <TEXT>     Inline template instead of FILE/stdin
//!   -b, --bindings <FILE>     Bindings file (TOML format)
//!   -a, --arg <VALUE>         Append a positional value
//!   -s, --set <NAME=VALUE>    Bind a named value
//!   -p, --percent             Template uses %-directives
//!   -d, --debug               Enable debug logging
//!   -h, --help                Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bracefmt::bindings::{infer_value, parse_assignment};
use bracefmt::BindingsError;
use bracefmt::{render_with_config, Bindings, RenderConfig, Syntax, Value};

#[derive(Parser)]
#[command(name = "bracefmt")]
#[command(about = "Render text templates with named and positional placeholders")]
struct Cli {
    /// Template file (reads from stdin if neither this nor --template is given)
    input: Option<PathBuf>,

    /// Inline template text
    #[arg(short, long, conflicts_with = "input")]
    template: Option<String>,

    /// Bindings file with `positional` and `[named]` values (TOML format)
    #[arg(short, long)]
    bindings: Option<PathBuf>,

    /// Append a positional value (repeatable)
    #[arg(short = 'a', long = "arg", value_name = "VALUE")]
    args: Vec<String>,

    /// Bind a named value, overriding the bindings file (repeatable)
    #[arg(short = 's', long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    set: Vec<(String, Value)>,

    /// Template uses %-directives instead of braces
    #[arg(short, long)]
    percent: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let bindings = match collect_bindings(&cli) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error loading bindings: {}", e);
            std::process::exit(1);
        }
    };

    let (source, filename) = match read_template(&cli) {
        Ok(read) => read,
        Err(e) => {
            eprintln!("Error reading template: {}", e);
            std::process::exit(1);
        }
    };

    let syntax = if cli.percent {
        Syntax::Percent
    } else {
        Syntax::Brace
    };
    let config = RenderConfig::new().with_syntax(syntax);

    match render_with_config(&source, &bindings, &config) {
        Ok(output) => print!("{}", terminated(output)),
        Err(e) => {
            eprint!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    }
}

/// Bindings file first, then `--arg` values appended, then `--set` overrides
fn collect_bindings(cli: &Cli) -> Result<Bindings, BindingsError> {
    let mut bindings = match &cli.bindings {
        Some(path) => Bindings::from_file(path)?,
        None => Bindings::default(),
    };
    for raw in &cli.args {
        bindings.push(infer_value(raw));
    }
    for (name, value) in &cli.set {
        bindings.insert(name.clone(), value.clone());
    }
    Ok(bindings)
}

/// Template text and the name used for it in error reports
fn read_template(cli: &Cli) -> io::Result<(String, String)> {
    match (&cli.template, &cli.input) {
        (Some(text), _) => Ok((text.clone(), "<template>".to_string())),
        (None, Some(path)) => {
            let content = fs::read_to_string(path).map_err(|e| {
                io::Error::new(e.kind(), format!("'{}': {}", path.display(), e))
            })?;
            Ok((content, path.display().to_string()))
        }
        (None, None) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok((buffer, "<stdin>".to_string()))
        }
    }
}

fn terminated(mut output: String) -> String {
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

fn init_tracing(debug: bool) {
    let default = if debug { "bracefmt=debug" } else { "bracefmt=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("bracefmt").chain(args.iter().copied()))
            .expect("Should parse arguments")
    }

    #[test]
    fn test_set_overrides_bindings_file() {
        let file = fixture("comedian.toml");
        let cli = cli(&["-t", "x", "-b", file.as_str(), "-s", "profession=actor"]);
        let bindings = collect_bindings(&cli).expect("Should load");

        assert_eq!(bindings.get("profession"), Some(&Value::from("actor")));
        assert_eq!(bindings.get("last_name"), Some(&Value::from("Idle")));
    }

    #[test]
    fn test_args_append_after_file_positionals() {
        let file = fixture("comedian.toml");
        let cli = cli(&["-t", "x", "-b", file.as_str(), "-a", "comedian", "--arg", "1.5"]);
        let bindings = collect_bindings(&cli).expect("Should load");

        assert_eq!(bindings.positional_len(), 4);
        assert_eq!(bindings.arg(0), Some(&Value::from("Eric")));
        assert_eq!(bindings.arg(2), Some(&Value::from("comedian")));
        assert_eq!(bindings.arg(3), Some(&Value::from(1.5)));
    }

    #[test]
    fn test_missing_bindings_file_is_an_error() {
        let cli = cli(&["-t", "x", "-b", "/nonexistent/bindings.toml"]);
        assert!(matches!(collect_bindings(&cli), Err(BindingsError::IoError(_))));
    }

    #[test]
    fn test_template_sources_are_exclusive() {
        let result = Cli::try_parse_from(["bracefmt", "message.txt", "--template", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_inline_template_wins_over_stdin() {
        let cli = cli(&["--template", "Hello, {name}."]);
        let (source, filename) = read_template(&cli).expect("Should read");
        assert_eq!(source, "Hello, {name}.");
        assert_eq!(filename, "<template>");
    }

    #[test]
    fn test_template_file_is_read() {
        let file = fixture("message.txt");
        let cli = cli(&[file.as_str()]);
        let (source, filename) = read_template(&cli).expect("Should read");
        assert!(source.contains("Hi {name}."));
        assert_eq!(filename, file);
    }

    #[test]
    fn test_bad_assignment_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["bracefmt", "-t", "x", "-s", "no_equals"]).is_err());
    }

    #[test]
    fn test_trailing_newline_added_once() {
        assert_eq!(terminated("Eric".to_string()), "Eric\n");
        assert_eq!(terminated("Eric\n".to_string()), "Eric\n");
        assert_eq!(terminated(String::new()), "\n");
    }
}
