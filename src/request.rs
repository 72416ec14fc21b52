//! Report request parameters.

use crate::{CompareError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// String-keyed request parameters (`date`, `period`, `segment`, ...).
///
/// Kept sorted so that two requests built from the same inputs compare and
/// print identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestParams(BTreeMap<String, String>);

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// The value of `name` when it is present and not blank.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.trim().is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Read an integer-style boolean flag.
    ///
    /// Missing, blank or unparsable values yield `default`; `true`/`false`
    /// are accepted and any integer other than `1` is false.
    pub fn flag(&self, name: &str, default: bool) -> bool {
        let Some(value) = self.non_empty(name) else {
            return default;
        };
        match value.trim() {
            "true" => true,
            "false" => false,
            other => other.parse::<i64>().map(|n| n == 1).unwrap_or(default),
        }
    }

    /// Whether every `(name, value)` pair in `expected` is present here.
    pub fn matches(&self, expected: &BTreeMap<String, String>) -> bool {
        expected
            .iter()
            .all(|(name, value)| self.get(name) == Some(value.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse command-line style `KEY=VALUE` pairs. Later pairs override
    /// earlier ones.
    pub fn parse_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Self> {
        let mut params = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (name, value) = pair.split_once('=').ok_or_else(|| {
                CompareError::InvalidRequest(format!("expected KEY=VALUE, got '{}'", pair))
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(
                    CompareError::InvalidRequest(format!("empty parameter name in '{}'", pair))
                        .into(),
                );
            }
            params.set(name, value);
        }
        Ok(params)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for RequestParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.0 {
            if !first {
                f.write_str("&")?;
            }
            first = false;
            write!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}
