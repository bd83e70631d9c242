//! Runtime value type for defined names.
//!
//! A define holds either verbatim text (`define`) or an evaluated number
//! (`define-eval`).  Substitution only ever needs the textual form, so the
//! numeric variant exists to carry evaluation results losslessly until they
//! are printed.

use std::fmt;

/// The value bound to a defined name.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            // f64 Display is the shortest string that round-trips, so
            // integral results print without a trailing ".0".
            Value::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
