//! Placeholder substitution.
//!
//! Resolves the substitution sequences that appear in plain text lines,
//! directive lines, and function bodies:
//!
//! | Sequence  | Meaning                          |
//! |-----------|----------------------------------|
//! | `$name`   | Value of the define `name`       |
//! | `${name}` | Same, brace-delimited form       |
//! | `$$`      | Literal `$`                      |
//!
//! Names are ASCII: a letter or `_`, then letters, digits, or `_`.  Any other
//! use of `$` is malformed.  Substitution is a single pass; a substituted
//! value's own `$` sequences are not re-expanded.

use std::fmt;

use crate::env::Env;

/// Why a substitution failed.
#[derive(Debug, Clone, PartialEq)]
pub enum SubstError {
    /// A placeholder named something the values mapping does not define.
    Undefined { name: String },
    /// A `$` that is not part of any recognised sequence (1-based column).
    Invalid { col: usize },
}

impl fmt::Display for SubstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstError::Undefined { name } => write!(f, "undefined placeholder `${name}`"),
            SubstError::Invalid { col } => write!(f, "invalid placeholder at column {col}"),
        }
    }
}

/// Expand all placeholder sequences in `src` against `values`.
pub fn render(src: &str, values: &Env) -> Result<String, SubstError> {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();
    let mut col = 0usize;

    while let Some(ch) = chars.next() {
        col += 1;
        if ch != '$' {
            out.push(ch);
            continue;
        }
        let dollar_col = col;
        match chars.peek().copied() {
            Some('$') => {
                // $$ escapes a literal dollar sign
                chars.next();
                col += 1;
                out.push('$');
            }
            Some('{') => {
                // ${name}: consume '{'
                chars.next();
                col += 1;
                let mut name = String::new();
                while matches!(chars.peek(), Some(c) if is_ident_continue(*c)) {
                    name.push(chars.next().unwrap());
                    col += 1;
                }
                let valid_name = name.chars().next().is_some_and(is_ident_start);
                if !valid_name || chars.peek() != Some(&'}') {
                    return Err(SubstError::Invalid { col: dollar_col });
                }
                chars.next(); // consume '}'
                col += 1;
                out.push_str(&lookup(&name, values)?);
            }
            Some(c) if is_ident_start(c) => {
                // $name: bare define name
                let mut name = String::new();
                while matches!(chars.peek(), Some(nc) if is_ident_continue(*nc)) {
                    name.push(chars.next().unwrap());
                    col += 1;
                }
                out.push_str(&lookup(&name, values)?);
            }
            _ => return Err(SubstError::Invalid { col: dollar_col }),
        }
    }

    Ok(out)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn lookup(name: &str, values: &Env) -> Result<String, SubstError> {
    values
        .get(name)
        .map(|v| v.to_string())
        .ok_or_else(|| SubstError::Undefined {
            name: name.to_owned(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn env(pairs: &[(&str, &str)]) -> Env {
        let mut env = Env::new();
        for (k, v) in pairs {
            env.set(*k, *v);
        }
        env
    }

    #[test]
    fn no_substitution() {
        let e = Env::new();
        assert_eq!(render("hello world", &e).unwrap(), "hello world");
        assert_eq!(render("", &e).unwrap(), "");
    }

    #[test]
    fn bare_var() {
        let e = env(&[("who", "world")]);
        assert_eq!(render("hello $who!", &e).unwrap(), "hello world!");
    }

    #[test]
    fn brace_var() {
        let e = env(&[("who", "world")]);
        assert_eq!(render("hello ${who}ly", &e).unwrap(), "hello worldly");
    }

    #[test]
    fn bare_var_stops_at_non_ident() {
        let e = env(&[("a", "1")]);
        assert_eq!(render("$a-$a", &e).unwrap(), "1-1");
        assert_eq!(render("$a.txt", &e).unwrap(), "1.txt");
    }

    #[test]
    fn double_dollar_escape() {
        let e = Env::new();
        assert_eq!(render("$$foo", &e).unwrap(), "$foo");
        assert_eq!(render("a$$b", &e).unwrap(), "a$b");
        assert_eq!(render("$$$$", &e).unwrap(), "$$");
    }

    #[test]
    fn number_value_renders_shortest_form() {
        let mut e = Env::new();
        e.set("n", Value::Number(64.0));
        e.set("h", Value::Number(0.5));
        assert_eq!(render("$n and $h", &e).unwrap(), "64 and 0.5");
    }

    #[test]
    fn single_pass_no_reexpansion() {
        let e = env(&[("a", "$b"), ("b", "x")]);
        assert_eq!(render("$a", &e).unwrap(), "$b");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let e = env(&[("Name", "upper")]);
        assert_eq!(
            render("$name", &e),
            Err(SubstError::Undefined {
                name: "name".into()
            })
        );
    }

    #[test]
    fn undefined_reports_name() {
        let e = Env::new();
        assert_eq!(
            render("see $missing here", &e),
            Err(SubstError::Undefined {
                name: "missing".into()
            })
        );
    }

    #[test]
    fn underscore_names() {
        let e = env(&[("_private", "p"), ("a_b2", "q")]);
        assert_eq!(render("${_private}/$a_b2", &e).unwrap(), "p/q");
    }

    #[test]
    fn invalid_bare_dollar() {
        let e = Env::new();
        assert_eq!(render("cost: $ 5", &e), Err(SubstError::Invalid { col: 7 }));
        assert_eq!(render("$1", &e), Err(SubstError::Invalid { col: 1 }));
    }

    #[test]
    fn invalid_trailing_dollar() {
        let e = Env::new();
        assert_eq!(render("x$", &e), Err(SubstError::Invalid { col: 2 }));
    }

    #[test]
    fn invalid_brace_forms() {
        let e = env(&[("x", "1")]);
        assert!(matches!(render("${}", &e), Err(SubstError::Invalid { .. })));
        assert!(matches!(render("${1x}", &e), Err(SubstError::Invalid { .. })));
        assert!(matches!(render("${x", &e), Err(SubstError::Invalid { .. })));
        assert!(matches!(render("${x-y}", &e), Err(SubstError::Invalid { .. })));
    }

    #[test]
    fn error_display() {
        let err = SubstError::Undefined { name: "who".into() };
        assert_eq!(err.to_string(), "undefined placeholder `$who`");
        let err = SubstError::Invalid { col: 3 };
        assert_eq!(err.to_string(), "invalid placeholder at column 3");
    }
}
