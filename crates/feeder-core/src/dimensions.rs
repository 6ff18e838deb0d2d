//! User-entered dimension snapshots.
//!
//! A [`Dimensions`] value maps a short parameter name (by convention a single
//! uppercase letter) to the raw text an operator typed. Nothing is parsed up
//! front: every consumer asks for a number and gets `None` when the text does
//! not start with a finite decimal number.

use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

/// Immutable per-call snapshot of raw dimension values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dimensions {
    values: FnvHashMap<String, String>,
}

impl Dimensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for tests and command-line parsing.
    pub fn with(mut self, name: impl Into<String>, raw: impl Into<String>) -> Self {
        self.values.insert(name.into(), raw.into());
        self
    }

    /// Returns a copy with `name` set to `raw`; a blank value removes the entry.
    pub fn updated(&self, name: &str, raw: &str) -> Self {
        let mut next = self.clone();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            next.values.remove(name);
        } else {
            next.values.insert(name.to_string(), trimmed.to_string());
        }
        next
    }

    /// Raw text as entered, if any.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Parsed numeric value; `None` for missing or unparseable entries.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.raw(name).and_then(parse_measurement)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dimensions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parse the longest leading decimal number of `raw`, ignoring surrounding
/// whitespace. Accepts `[+-]digits[.digits][(e|E)[+-]digits]`; at least one
/// mantissa digit is required and the result must be finite.
pub fn parse_measurement(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0usize;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // exponent only counts when at least one digit follows it
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
