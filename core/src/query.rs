//! Query-string assembly for read endpoints.
//!
//! Pairs are collected in the order the endpoint adds them, but the encoded
//! string lists keys alphabetically (values of a repeated key keep their
//! insertion order). The API's own tooling produces query strings that way,
//! and the expected request URLs in `test-vectors/` depend on it.

use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except `A-Z a-z 0-9 - _ . ~` is escaped. Space is escaped
/// here too and then written as `+`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Default, Clone)]
pub(crate) struct Query {
    pairs: BTreeMap<&'static str, Vec<String>>,
}

impl Query {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.pairs.entry(key).or_default().push(value.into());
        self
    }

    /// Add the pair only when `value` is present.
    pub(crate) fn add_opt<V: ToString>(&mut self, key: &'static str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.add(key, value.to_string());
        }
        self
    }

    /// Percent-encoded `k=v&k=v`, empty when nothing was added.
    pub(crate) fn encode(&self) -> String {
        let mut pairs = Vec::new();
        for (key, values) in &self.pairs {
            for value in values {
                pairs.push(format!("{}={}", escape(key), escape(value)));
            }
        }
        pairs.join("&")
    }
}

fn escape(component: &str) -> String {
    // A literal `%` is escaped to `%25`, so `%20` can only come from a space.
    utf8_percent_encode(component, COMPONENT)
        .to_string()
        .replace("%20", "+")
}
