//! Light-weight general-purpose macro expander.
//!
//! `mex` reads text line by line.  Plain lines have their `$name`
//! placeholders substituted and go straight to the output; lines starting
//! with the escape token (default `:`) are directives that define values,
//! evaluate arithmetic, capture reusable function bodies, and include
//! other files.
//!
//! # Quick start
//!
//! ```
//! use mex::{Expander, Status};
//!
//! let mut out = Vec::new();
//! let mut exp = Expander::new(":");
//! let status = exp
//!     .process_str(":define who world\nhello $who\n", "<demo>", &mut out)
//!     .unwrap();
//! assert_eq!(status, Status::Completed);
//! assert_eq!(String::from_utf8(out).unwrap(), "hello world\n");
//! ```

pub mod cli;
pub mod directive;
pub mod env;
pub mod error;
pub mod expr;
pub mod funcs;
pub mod interp;
pub mod subst;
pub mod value;

// Re-exports for convenience.
pub use env::Env;
pub use error::{Error, ErrorKind, ParseError};
pub use expr::evaluate;
pub use funcs::{FnStore, Function};
pub use interp::{load_defines, Expander, Halt, Status, MAX_INCLUDE_DEPTH};
pub use subst::render;
pub use value::Value;
