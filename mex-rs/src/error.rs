//! Error types surfaced by the engine.
//!
//! Directive-level failures become a [`ParseError`] carrying the originating
//! file and 1-based line; they unwind through every enclosing include and are
//! reported once at the top boundary.  IO failures opening or reading a source
//! keep their own variant so the binary can report them without a fake line
//! number.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::funcs::CallError;
use crate::subst::SubstError;

/// What went wrong on a directive line.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// `end` with no open capture.
    DanglingEnd,
    /// `call` names a function that was never defined.
    UndefinedFunction(String),
    /// `call` argument count differs from the parameter count.
    ArityMismatch {
        name: String,
        given: usize,
        expected: usize,
    },
    /// A directive is missing required tokens.
    MissingArguments {
        directive: &'static str,
        expects: &'static str,
    },
    /// The command token is not one of the six directives.
    UnrecognizedDirective(String),
    /// `define-eval` expression failed to parse or evaluate.
    InvalidExpression(String),
    /// A placeholder named something undefined (directive context).
    UndefinedPlaceholder(String),
    /// A `$` that forms no valid placeholder (1-based column).
    InvalidPlaceholder { col: usize },
    /// `include` named a file that cannot be opened.
    IncludeFailed { path: String, reason: String },
    /// Includes nested past the recursion bound.
    IncludeDepthExceeded { depth: usize },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::DanglingEnd => {
                write!(f, "cannot call `end` without opening a function first")
            }
            ErrorKind::UndefinedFunction(name) => {
                write!(f, "calling undefined function `{name}`")
            }
            ErrorKind::ArityMismatch {
                name,
                given,
                expected,
            } => write!(
                f,
                "wrong arity calling `{name}` (given {given}, takes {expected})"
            ),
            ErrorKind::MissingArguments { directive, expects } => {
                write!(f, "`{directive}` takes {expects}")
            }
            ErrorKind::UnrecognizedDirective(token) => {
                if token.is_empty() {
                    write!(f, "missing command after escape token")
                } else {
                    write!(f, "unrecognized command `{token}`")
                }
            }
            ErrorKind::InvalidExpression(msg) => write!(f, "invalid expression: {msg}"),
            ErrorKind::UndefinedPlaceholder(name) => {
                write!(f, "undefined placeholder `${name}`")
            }
            ErrorKind::InvalidPlaceholder { col } => {
                write!(f, "invalid placeholder at column {col}")
            }
            ErrorKind::IncludeFailed { path, reason } => {
                write!(f, "cannot include `{path}`: {reason}")
            }
            ErrorKind::IncludeDepthExceeded { depth } => {
                write!(f, "include depth limit exceeded ({depth})")
            }
        }
    }
}

impl From<SubstError> for ErrorKind {
    fn from(e: SubstError) -> Self {
        match e {
            SubstError::Undefined { name } => ErrorKind::UndefinedPlaceholder(name),
            SubstError::Invalid { col } => ErrorKind::InvalidPlaceholder { col },
        }
    }
}

impl From<CallError> for ErrorKind {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Undefined { name } => ErrorKind::UndefinedFunction(name),
            CallError::Arity {
                name,
                given,
                expected,
            } => ErrorKind::ArityMismatch {
                name,
                given,
                expected,
            },
            CallError::Subst(e) => e.into(),
        }
    }
}

/// A fatal parse failure, positioned at its originating file and line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub path: PathBuf,
    /// 1-based.
    pub line: usize,
    pub kind: ErrorKind,
}

impl ParseError {
    pub fn new(path: &Path, line: usize, kind: ErrorKind) -> Self {
        ParseError {
            path: path.to_owned(),
            line,
            kind,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.path.display(), self.line, self.kind)
    }
}

impl std::error::Error for ParseError {}

/// Any failure a processing run can end with.
#[derive(Debug)]
pub enum Error {
    Parse(ParseError),
    /// Opening or reading a source file failed.
    Io { path: PathBuf, source: io::Error },
    /// Writing rendered output failed.
    Write(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{e}"),
            Error::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Error::Write(source) => write!(f, "cannot write output: {source}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Io { source, .. } | Error::Write(source) => Some(source),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
