//! Canonical text forms for artifact content
//!
//! Two byte-exact serializations of a generic artifact tree are supported:
//!
//! - [`HashScheme::SortedCompact`]: keys sorted by code point at every level,
//!   `,`/`:` separators, non-ASCII escaped as `\uXXXX`, floats in shortest
//!   round-trip form with a forced fraction or exponent (`1.0`, `1e-05`).
//!   Stored hashes in existing artifact files were produced with this form.
//! - [`HashScheme::Jcs`]: RFC 8785 (JSON Canonicalization Scheme).

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use serde_json::{Map, Value};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::hash::HashError;

/// Canonical serialization used before digesting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashScheme {
    /// Sorted keys, compact separators, ASCII-only output
    #[default]
    SortedCompact,
    /// RFC 8785 JSON Canonicalization Scheme
    Jcs,
}

impl HashScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashScheme::SortedCompact => "sorted-compact",
            HashScheme::Jcs => "jcs",
        }
    }
}

impl fmt::Display for HashScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sorted-compact" => Ok(HashScheme::SortedCompact),
            "jcs" => Ok(HashScheme::Jcs),
            other => Err(format!(
                "unknown hash scheme '{}', expected 'sorted-compact' or 'jcs'",
                other
            )),
        }
    }
}

/// Serialize a value to its canonical bytes under the given scheme
pub fn to_canonical_vec(value: &Value, scheme: HashScheme) -> Result<Vec<u8>, HashError> {
    match scheme {
        HashScheme::SortedCompact => {
            let sorted = sort_keys(value);
            let mut out = Vec::new();
            let mut ser = serde_json::Serializer::with_formatter(&mut out, AsciiCompactFormatter);
            sorted
                .serialize(&mut ser)
                .map_err(|e| HashError::Canonicalize(e.to_string()))?;
            Ok(out)
        }
        HashScheme::Jcs => serde_json_canonicalizer::to_vec(value)
            .map_err(|e| HashError::Canonicalize(e.to_string())),
    }
}

/// Rebuild a value with every mapping's keys in code point order.
///
/// Maps keep insertion order, so inserting sorted keys is enough.
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&map[key.as_str()]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Compact formatter that escapes everything outside ASCII and renders
/// floats the way the historical tooling did.
struct AsciiCompactFormatter;

impl Formatter for AsciiCompactFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }

        let mut start = 0;
        for (pos, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..pos].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = pos + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(format_float(value).as_bytes())
    }

    fn write_f32<W>(&mut self, writer: &mut W, value: f32) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.write_f64(writer, f64::from(value))
    }
}

/// Shortest round-trip float text with fixed notation for decimal exponents
/// in [-4, 16) and `d.ddde±XX` otherwise.
pub(crate) fn format_float(value: f64) -> String {
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    // `{:e}` yields the shortest round-trip digits, e.g. "1.5e-5"
    let sci = format!("{:e}", value.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let decpt = exponent + 1;
    let n = digits.len() as i32;

    if decpt <= -4 || decpt > 16 {
        let (head, tail) = digits.split_at(1);
        let mut out = format!("{}{}", sign, head);
        if !tail.is_empty() {
            out.push('.');
            out.push_str(tail);
        }
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        out.push_str(&format!("e{}{:02}", exp_sign, exponent.abs()));
        out
    } else if decpt <= 0 {
        format!("{}0.{}{}", sign, "0".repeat((-decpt) as usize), digits)
    } else if decpt >= n {
        format!("{}{}{}.0", sign, digits, "0".repeat((decpt - n) as usize))
    } else {
        let (int_part, frac_part) = digits.split_at(decpt as usize);
        format!("{}{}.{}", sign, int_part, frac_part)
    }
}
