//! The environment of defined names.
//!
//! One environment exists per processing run and is shared by every file the
//! run touches, includes included.  Only `define` and `define-eval` write to
//! it; the language has no way to remove a definition.

use std::collections::HashMap;

use crate::value::Value;

/// Shared name → value store.
#[derive(Debug, Clone, Default)]
pub struct Env {
    defines: HashMap<String, Value>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) a definition.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.defines.insert(name.into(), value.into());
    }

    /// Look up a definition.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.defines.get(name)
    }

    /// Returns `true` if the name is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.defines.contains_key(name)
    }

    /// Iterate over all definitions.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.defines.iter()
    }

    pub fn len(&self) -> usize {
        self.defines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut env = Env::new();
        env.set("greeting", "hello");
        assert_eq!(env.get("greeting"), Some(&Value::Text("hello".into())));
    }

    #[test]
    fn overwrite() {
        let mut env = Env::new();
        env.set("x", "old");
        env.set("x", "new");
        assert_eq!(env.get("x"), Some(&Value::Text("new".into())));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn numeric_value() {
        let mut env = Env::new();
        env.set("n", 4.0);
        assert_eq!(env.get("n"), Some(&Value::Number(4.0)));
    }

    #[test]
    fn missing_returns_none() {
        let env = Env::new();
        assert_eq!(env.get("nope"), None);
        assert!(!env.contains("nope"));
        assert!(env.is_empty());
    }

    #[test]
    fn contains() {
        let mut env = Env::new();
        env.set("present", "yes");
        assert!(env.contains("present"));
        assert!(!env.contains("absent"));
    }
}
