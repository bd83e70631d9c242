//! Command-line argument parsing.
//!
//! Usage:
//!   mex [-e<token>] [-i name=value ...] <source>

use std::path::PathBuf;

/// One-line usage summary for error messages.
pub const USAGE: &str = "usage: mex [-e <token>] [-i name=value ...] <source>";

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug)]
pub struct CliArgs {
    /// File to expand.
    pub source: PathBuf,
    /// Directive escape token (`-e`, default `:`).
    pub escape: String,
    /// Definitions seeded before processing (`-i name=value ...`).
    pub inputs: Vec<(String, String)>,
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(&raw[1..])
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut escape = ":".to_owned();
    let mut inputs: Vec<(String, String)> = Vec::new();
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        // `--` ends flag processing.
        if arg == "--" {
            i += 1;
            positional.extend(argv[i..].iter().cloned());
            break;
        }

        // Non-flag argument.
        if !arg.starts_with('-') || arg == "-" {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        // Embedded form: -e<token>.
        if let Some(embedded) = arg.strip_prefix("-e").filter(|rest| !rest.is_empty()) {
            escape = embedded.to_owned();
            i += 1;
            continue;
        }

        match arg {
            "-e" | "--escape" => {
                i += 1;
                let Some(token) = argv.get(i) else {
                    return Err(format!("{arg} requires a token argument"));
                };
                escape = token.clone();
            }

            "-i" | "--input" => {
                // Consume every following name=value pair.
                let mut j = i + 1;
                while j < argv.len() && !argv[j].starts_with('-') {
                    let Some((name, value)) = argv[j].split_once('=') else {
                        break;
                    };
                    if name.is_empty() {
                        return Err(format!("invalid definition {:?}: missing name", argv[j]));
                    }
                    inputs.push((name.to_owned(), value.to_owned()));
                    j += 1;
                }
                if j == i + 1 {
                    return Err(format!("{arg} requires at least one name=value argument"));
                }
                i = j;
                continue;
            }

            _ => return Err(format!("unknown option: {arg}")),
        }
        i += 1;
    }

    let source = match positional.len() {
        0 => return Err("missing source file".to_owned()),
        1 => PathBuf::from(positional.remove(0)),
        n => return Err(format!("too many arguments ({n})")),
    };

    Ok(CliArgs {
        source,
        escape,
        inputs,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
