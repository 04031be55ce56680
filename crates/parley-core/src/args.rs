//! Argument lookup handed to handlers.
//!
//! An [`Args`] is built fresh for every match attempt and maps value-element
//! keys to the text captured from the input line. Token elements never appear
//! in it, and an optional value that was absent from the input is simply not
//! present.
//!
//! ```rust,ignore
//! fn say(args: &Args) {
//!     match args.get("text") {
//!         Some(text) => println!("say {text}"),
//!         None => println!("Usage: say <text>"),
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ArgsError, ArgsResult};

/// Captured key → value pairs for one successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    values: HashMap<String, String>,
}

impl Args {
    /// Creates an empty lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a captured value, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns the captured value, or `None` if `key` was not captured.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the captured value, or an empty string if `key` was not captured.
    ///
    /// Never fails. Use [`require_strict`](Self::require_strict) to treat a
    /// missing key as an error.
    pub fn require(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Returns the captured value, failing with [`ArgsError::Missing`] when absent.
    pub fn require_strict(&self, key: &str) -> ArgsResult<&str> {
        self.get(key).ok_or_else(|| ArgsError::Missing {
            key: key.to_string(),
        })
    }

    /// Parses the captured value into `T`.
    ///
    /// Returns `Ok(None)` when the key was not captured.
    pub fn parse<T>(&self, key: &str) -> ArgsResult<Option<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        value.parse().map(Some).map_err(|e: T::Err| ArgsError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
    }

    /// Returns `true` if `key` was captured.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of captured values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the captured pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (key, value) in iter {
            args.insert(key, value);
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_present_and_absent() {
        let args: Args = [("text", "hello world")].into_iter().collect();
        assert_eq!(args.get("text"), Some("hello world"));
        assert_eq!(args.get("other"), None);
        assert!(args.contains("text"));
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_require_degrades_to_empty() {
        let args = Args::new();
        assert_eq!(args.require("text"), "");
        assert!(args.is_empty());
    }

    #[test]
    fn test_require_strict() {
        let args: Args = [("name", "ada")].into_iter().collect();
        assert_eq!(args.require_strict("name"), Ok("ada"));
        assert_eq!(
            args.require_strict("missing"),
            Err(ArgsError::Missing {
                key: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_parse() {
        let args: Args = [("count", "3"), ("bad", "three")].into_iter().collect();
        assert_eq!(args.parse::<u32>("count"), Ok(Some(3)));
        assert_eq!(args.parse::<u32>("absent"), Ok(None));
        assert!(matches!(
            args.parse::<u32>("bad"),
            Err(ArgsError::Invalid { ref key, .. }) if key == "bad"
        ));
    }

    #[test]
    fn test_insert_replaces() {
        let mut args = Args::new();
        args.insert("k", "one");
        args.insert("k", "two");
        assert_eq!(args.get("k"), Some("two"));
        assert_eq!(args.iter().count(), 1);
    }
}
