//! Named function templates.
//!
//! A function is the raw text captured between `begin` and `end`, plus the
//! parameter names declared on the `begin` line.  Bodies are stored
//! unsubstituted; placeholders resolve at call time.

use std::collections::HashMap;
use std::fmt;

use crate::env::Env;
use crate::subst::{render, SubstError};

/// A captured function template.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: String,
}

impl Function {
    /// Open a new function with an empty body (capture fills it in).
    pub fn new(name: impl Into<String>, params: Vec<String>) -> Self {
        Function {
            name: name.into(),
            params,
            body: String::new(),
        }
    }
}

/// Why a call failed.
#[derive(Debug, Clone, PartialEq)]
pub enum CallError {
    Undefined {
        name: String,
    },
    Arity {
        name: String,
        given: usize,
        expected: usize,
    },
    Subst(SubstError),
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::Undefined { name } => write!(f, "calling undefined function `{name}`"),
            CallError::Arity {
                name,
                given,
                expected,
            } => write!(
                f,
                "wrong arity calling `{name}` (given {given}, takes {expected})"
            ),
            CallError::Subst(e) => write!(f, "{e}"),
        }
    }
}

/// All functions captured so far, shared across the run like the environment.
#[derive(Debug, Default)]
pub struct FnStore {
    funcs: HashMap<String, Function>,
}

impl FnStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a function, silently replacing any previous one with the name.
    pub fn define(&mut self, func: Function) {
        self.funcs.insert(func.name.clone(), func);
    }

    pub fn lookup(&self, name: &str) -> Option<&Function> {
        self.funcs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    /// Render `name`'s body against its zipped arguments plus the environment.
    ///
    /// The environment is applied second and overwrites any argument bound to
    /// the same name: a global define always beats a parameter.
    pub fn call(&self, name: &str, args: &[String], env: &Env) -> Result<String, CallError> {
        let func = self.lookup(name).ok_or_else(|| CallError::Undefined {
            name: name.to_owned(),
        })?;
        if args.len() != func.params.len() {
            return Err(CallError::Arity {
                name: name.to_owned(),
                given: args.len(),
                expected: func.params.len(),
            });
        }

        let mut values = Env::new();
        for (param, arg) in func.params.iter().zip(args) {
            values.set(param.clone(), arg.clone());
        }
        for (k, v) in env.iter() {
            values.set(k.clone(), v.clone());
        }

        render(&func.body, &values).map_err(CallError::Subst)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
