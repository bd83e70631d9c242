//! Directive line parsing.
//!
//! A directive line is the escape token followed by a command and
//! whitespace-separated arguments.  The remainder reaching this parser has
//! already been placeholder-substituted; tokenization happens here.

use crate::error::ErrorKind;

/// A parsed directive.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// `begin <name> [param ...]` starts capturing a function body.
    Begin { name: String, params: Vec<String> },
    /// `end` closes the current capture.
    End,
    /// `call <name> [arg ...]` renders a captured function.
    Call { name: String, args: Vec<String> },
    /// `define <name> <value...>` joins its value tokens with no separator.
    Define { name: String, value: String },
    /// `define-eval <name> <expr...>` joins and evaluates its expression tokens.
    DefineEval { name: String, expr: String },
    /// `include <path>` processes another file under the shared state.
    Include { path: String },
}

/// Tokenize the post-escape remainder of a directive line.
pub fn parse_directive(rest: &str) -> Result<Directive, ErrorKind> {
    let mut tokens = rest.split_whitespace();
    let Some(cmd) = tokens.next() else {
        return Err(ErrorKind::UnrecognizedDirective(String::new()));
    };
    let args: Vec<&str> = tokens.collect();

    match cmd {
        "begin" => {
            let Some((name, params)) = args.split_first() else {
                return Err(missing("begin", "a function name"));
            };
            Ok(Directive::Begin {
                name: (*name).to_owned(),
                params: params.iter().map(|p| (*p).to_owned()).collect(),
            })
        }
        // Extra tokens after `end` are ignored on this path.
        "end" => Ok(Directive::End),
        "call" => {
            let Some((name, call_args)) = args.split_first() else {
                return Err(missing("call", "a function name"));
            };
            Ok(Directive::Call {
                name: (*name).to_owned(),
                args: call_args.iter().map(|a| (*a).to_owned()).collect(),
            })
        }
        "define" => {
            if args.len() < 2 {
                return Err(missing("define", "a name and a value"));
            }
            Ok(Directive::Define {
                name: args[0].to_owned(),
                value: args[1..].concat(),
            })
        }
        "define-eval" => {
            if args.len() < 2 {
                return Err(missing("define-eval", "a name and an expression"));
            }
            Ok(Directive::DefineEval {
                name: args[0].to_owned(),
                expr: args[1..].concat(),
            })
        }
        "include" => {
            if args.len() != 1 {
                return Err(missing("include", "one argument"));
            }
            Ok(Directive::Include {
                path: args[0].to_owned(),
            })
        }
        other => Err(ErrorKind::UnrecognizedDirective(other.to_owned())),
    }
}

fn missing(directive: &'static str, expects: &'static str) -> ErrorKind {
    ErrorKind::MissingArguments { directive, expects }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
