//! Default-returning reads over decoded JSON.
//!
//! Tool arguments and Chaos Center payloads are deeply nested and partially
//! optional. Every read here treats a missing key, a value of the wrong
//! type, and a missing or null container the same way: the caller's
//! default comes back.

use serde_json::{Map, Value};

/// Accessor methods over an untyped JSON tree.
pub trait ValueExt {
    /// String at `key`, or `default`.
    fn str_or(&self, key: &str, default: &str) -> String;

    /// Integer at `key`, or `default`. Fractional numbers are truncated.
    fn int_or(&self, key: &str, default: i64) -> i64;

    /// Boolean at `key`, or `default`.
    fn bool_or(&self, key: &str, default: bool) -> bool;

    /// Object at `key`.
    fn object(&self, key: &str) -> Option<&Map<String, Value>>;

    /// Array at `key`.
    fn array(&self, key: &str) -> Option<&Vec<Value>>;

    /// String found by walking `path`, or `""` if any segment misses.
    fn nested_str(&self, path: &[&str]) -> String;

    /// Raw value at `key`, or JSON `null`.
    fn field(&self, key: &str) -> Value;

    /// Array at `key` with every element rendered as a string.
    fn string_list(&self, key: &str) -> Vec<String>;
}

impl ValueExt for Value {
    fn str_or(&self, key: &str, default: &str) -> String {
        self.get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    fn int_or(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(default),
            _ => default,
        }
    }

    fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }

    fn array(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }

    fn nested_str(&self, path: &[&str]) -> String {
        let mut current = self;
        for key in path {
            match current.get(*key) {
                Some(next) => current = next,
                None => return String::new(),
            }
        }
        current.as_str().unwrap_or_default().to_string()
    }

    fn field(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or(Value::Null)
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        self.array(key)
            .map(|items| {
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
