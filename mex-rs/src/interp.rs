//! The expansion engine.
//!
//! [`Expander`] owns the mutable state of a run (defines, captured
//! functions, the capture in progress) and processes input line by line,
//! writing expanded text to a caller-supplied sink.  Lines are kept
//! byte-for-byte apart from placeholder substitution; terminators are
//! never added or removed.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::directive::{parse_directive, Directive};
use crate::env::Env;
use crate::error::{Error, ErrorKind, ParseError};
use crate::expr::evaluate;
use crate::funcs::{FnStore, Function};
use crate::subst::{render, SubstError};

/// Maximum nesting depth for `include` before processing is aborted.
pub const MAX_INCLUDE_DEPTH: usize = 100;

// ── Status ────────────────────────────────────────────────────────────────────

/// How a processing run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// Every line was processed.
    Completed,
    /// A plain line referenced an undefined placeholder; output stops there.
    Halted(Halt),
}

/// Where and why a run stopped early.
#[derive(Debug, Clone, PartialEq)]
pub struct Halt {
    /// File being processed when the run stopped.
    pub path: PathBuf,
    /// 1-based line number of the offending line.
    pub line: usize,
    /// Name of the placeholder that had no definition.
    pub name: String,
}

// ── Expander ──────────────────────────────────────────────────────────────────

/// The macro expansion engine.
///
/// State persists across `process_*` calls, so one `Expander` can feed
/// several sources into the same definition space.  A function capture
/// left open at the end of one source continues in the next.
pub struct Expander {
    /// Named text and number definitions.
    env: Env,
    /// Captured functions.
    funcs: FnStore,
    /// Function body being captured, if a `begin` is open.
    capture: Option<Function>,
    /// Token that marks a directive line.
    escape: String,
    /// Current `include` nesting depth.
    depth: usize,
}

impl Default for Expander {
    fn default() -> Self {
        Self::new(":")
    }
}

impl Expander {
    pub fn new(escape: impl Into<String>) -> Self {
        Expander {
            env: Env::new(),
            funcs: FnStore::new(),
            capture: None,
            escape: escape.into(),
            depth: 0,
        }
    }

    /// The current definitions.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Mutable access to the definitions, e.g. for seeding before a run.
    pub fn env_mut(&mut self) -> &mut Env {
        &mut self.env
    }

    /// The captured functions.
    pub fn functions(&self) -> &FnStore {
        &self.funcs
    }

    /// `true` while a `begin` is open and lines are being captured.
    pub fn in_capture(&self) -> bool {
        self.capture.is_some()
    }

    /// Consume the expander, keeping only its definitions.
    pub fn into_env(self) -> Env {
        self.env
    }

    // ── Processing ────────────────────────────────────────────────────────────

    /// Process a file, writing expanded output to `out`.
    pub fn process_file(&mut self, path: &Path, out: &mut dyn Write) -> Result<Status, Error> {
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        self.run(BufReader::new(file), path, out)
    }

    /// Process in-memory source.  `name` stands in for the file path in
    /// diagnostics.
    pub fn process_str(
        &mut self,
        src: &str,
        name: &str,
        out: &mut dyn Write,
    ) -> Result<Status, Error> {
        self.run(src.as_bytes(), Path::new(name), out)
    }

    fn run<R: BufRead>(
        &mut self,
        mut reader: R,
        path: &Path,
        out: &mut dyn Write,
    ) -> Result<Status, Error> {
        let mut line = String::new();
        let mut line_no = 0;
        loop {
            line.clear();
            let n = reader.read_line(&mut line).map_err(|source| Error::Io {
                path: path.to_owned(),
                source,
            })?;
            if n == 0 {
                break;
            }
            line_no += 1;
            match self.exec_line(&line, path, line_no, out)? {
                Status::Completed => {}
                halted @ Status::Halted(_) => return Ok(halted),
            }
        }
        Ok(Status::Completed)
    }

    /// Execute one raw line (terminator included, if the source had one).
    fn exec_line(
        &mut self,
        raw: &str,
        path: &Path,
        line_no: usize,
        out: &mut dyn Write,
    ) -> Result<Status, Error> {
        // An open capture swallows everything except its closing `end`.
        if self.capture.is_some() {
            let closes = raw
                .strip_prefix(self.escape.as_str())
                .map(|rest| rest.trim() == "end")
                .unwrap_or(false);
            if closes {
                if let Some(func) = self.capture.take() {
                    self.funcs.define(func);
                }
            } else if let Some(func) = self.capture.as_mut() {
                func.body.push_str(raw);
            }
            return Ok(Status::Completed);
        }

        if let Some(rest) = raw.strip_prefix(self.escape.as_str()) {
            // Directive lines are substituted before they are tokenized, so
            // placeholders can form command arguments.  An undefined name
            // here is an error, not a halt.
            let substituted =
                render(rest, &self.env).map_err(|e| ParseError::new(path, line_no, e.into()))?;
            let directive = parse_directive(&substituted)
                .map_err(|kind| ParseError::new(path, line_no, kind))?;
            return self.exec_directive(directive, path, line_no, out);
        }

        match render(raw, &self.env) {
            Ok(expanded) => {
                out.write_all(expanded.as_bytes()).map_err(Error::Write)?;
                Ok(Status::Completed)
            }
            Err(SubstError::Undefined { name }) => Ok(Status::Halted(Halt {
                path: path.to_owned(),
                line: line_no,
                name,
            })),
            Err(e @ SubstError::Invalid { .. }) => {
                Err(ParseError::new(path, line_no, e.into()).into())
            }
        }
    }

    fn exec_directive(
        &mut self,
        directive: Directive,
        path: &Path,
        line_no: usize,
        out: &mut dyn Write,
    ) -> Result<Status, Error> {
        match directive {
            Directive::Begin { name, params } => {
                self.capture = Some(Function::new(name, params));
                Ok(Status::Completed)
            }

            // Reached only with no capture open; `end` inside one is handled
            // in `exec_line`.
            Directive::End => {
                Err(ParseError::new(path, line_no, ErrorKind::DanglingEnd).into())
            }

            Directive::Call { name, args } => {
                let text = self
                    .funcs
                    .call(&name, &args, &self.env)
                    .map_err(|e| ParseError::new(path, line_no, e.into()))?;
                out.write_all(text.as_bytes()).map_err(Error::Write)?;
                Ok(Status::Completed)
            }

            Directive::Define { name, value } => {
                self.env.set(name, value);
                Ok(Status::Completed)
            }

            Directive::DefineEval { name, expr } => {
                let n = evaluate(&expr).map_err(|message| {
                    ParseError::new(path, line_no, ErrorKind::InvalidExpression(message))
                })?;
                self.env.set(name, n);
                Ok(Status::Completed)
            }

            Directive::Include { path: inc } => self.include(&inc, path, line_no, out),
        }
    }

    fn include(
        &mut self,
        inc: &str,
        path: &Path,
        line_no: usize,
        out: &mut dyn Write,
    ) -> Result<Status, Error> {
        if self.depth >= MAX_INCLUDE_DEPTH {
            return Err(ParseError::new(
                path,
                line_no,
                ErrorKind::IncludeDepthExceeded {
                    depth: MAX_INCLUDE_DEPTH,
                },
            )
            .into());
        }
        let file = File::open(inc).map_err(|e| {
            ParseError::new(
                path,
                line_no,
                ErrorKind::IncludeFailed {
                    path: inc.to_owned(),
                    reason: e.to_string(),
                },
            )
        })?;
        self.depth += 1;
        let status = self.run(BufReader::new(file), Path::new(inc), out);
        self.depth -= 1;
        status
    }
}

// ── Define extraction ─────────────────────────────────────────────────────────

/// Process `path` for its definitions only, discarding all output.
///
/// A halt on an undefined placeholder is not an error here; the
/// definitions collected up to that point are returned.
pub fn load_defines(path: &Path, escape: &str) -> Result<Env, Error> {
    let mut expander = Expander::new(escape);
    expander.process_file(path, &mut io::sink())?;
    Ok(expander.into_env())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
