use proptest::prelude::*;

use mex::{evaluate, render, Env, Expander};

proptest! {
    /// The expression evaluator returns Ok or Err on arbitrary input; it
    /// must never panic.
    #[test]
    fn evaluate_never_panics(s in "\\PC*") {
        let _ = evaluate(&s);
    }
}

proptest! {
    /// Text without `$` renders unchanged regardless of the environment.
    #[test]
    fn render_is_identity_without_placeholders(s in "[^$]*") {
        let env = Env::new();
        prop_assert_eq!(render(&s, &env).unwrap(), s);
    }
}

proptest! {
    /// `$$` always collapses to a single literal dollar.
    #[test]
    fn doubled_dollar_escapes(prefix in "[a-z ]*", suffix in "[a-z ]*") {
        let env = Env::new();
        let src = format!("{prefix}$${suffix}");
        let want = format!("{prefix}${suffix}");
        prop_assert_eq!(render(&src, &env).unwrap(), want);
    }
}

proptest! {
    /// A defined placeholder expands to exactly its value.
    #[test]
    fn defined_placeholder_expands(value in "[a-zA-Z0-9 ]*") {
        let mut env = Env::new();
        env.set("v", value.clone());
        prop_assert_eq!(render("[$v]", &env).unwrap(), format!("[{value}]"));
    }
}

proptest! {
    /// `a + b * c` follows ordinary precedence and f64 arithmetic.
    #[test]
    fn precedence_matches_f64(a in -1000i32..1000, b in -1000i32..1000, c in -1000i32..1000) {
        let src = format!("{a} + {b} * {c}");
        let want = a as f64 + (b as f64) * (c as f64);
        prop_assert_eq!(evaluate(&src).unwrap(), want);
    }
}

proptest! {
    /// `^` agrees with integer XOR for whole-number operands.
    #[test]
    fn xor_matches_integer_xor(a in 0i64..100_000, b in 0i64..100_000) {
        let src = format!("{a} ^ {b}");
        prop_assert_eq!(evaluate(&src).unwrap(), (a ^ b) as f64);
    }
}

proptest! {
    /// The line processor returns a status or an error on arbitrary
    /// source; it must never panic.
    #[test]
    fn expander_never_panics(src in "\\PC*") {
        let mut out = Vec::new();
        let mut exp = Expander::new(":");
        let _ = exp.process_str(&src, "<fuzz>", &mut out);
    }
}
