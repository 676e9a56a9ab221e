//! Scale value codec
//!
//! Expert estimates are stored as prefixed ordinal strings: `DP3` (direct
//! probability), `Ha2` (human impact, fatalities), `CP2.5` (conditional
//! probability of a cascade), `M4` (motivation of a malicious actor).
//!
//! Values are decoded into [`Scale`] at the input boundary and only
//! re-encoded with [`format_scale`] when results are handed back out.

use crate::error::{Error, Result};
use regex::Regex;

/// A decoded scale value
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    pub prefix: String,
    pub value: f64,
}

fn scale_re() -> &'static Regex {
    static SCALE_RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    SCALE_RE.get_or_init(|| Regex::new(r"(?s)^([A-Za-z]*)(.*)$").unwrap())
}

/// Split a raw value into its letter prefix and the remainder
fn split_prefix(value: &str) -> (&str, &str) {
    match scale_re().captures(value) {
        Some(caps) => {
            let prefix = caps.get(1).map_or("", |m| m.as_str());
            let rest = caps.get(2).map_or("", |m| m.as_str());
            (prefix, rest)
        }
        None => ("", value),
    }
}

/// Parse a scale value into its prefix and numeric part
///
/// The prefix is the longest leading run of ASCII letters. The remainder
/// must parse as a finite, non-negative number.
pub fn parse_scale(value: &str) -> Result<Scale> {
    let malformed = || Error::MalformedScaleValue {
        value: value.to_string(),
    };

    let (prefix, suffix) = split_prefix(value);

    // Signed values are not on any scale
    if suffix.is_empty() || suffix.starts_with(['+', '-']) {
        return Err(malformed());
    }
    let number: f64 = suffix.parse().map_err(|_| malformed())?;
    if !number.is_finite() || number < 0.0 {
        return Err(malformed());
    }

    Ok(Scale {
        prefix: prefix.to_string(),
        value: number,
    })
}

/// Concatenate a prefix and a number using the shortest rendering
///
/// Integers render without a decimal point (`DP3`), half-steps as `CP2.5`.
pub fn format_scale(prefix: &str, number: f64) -> String {
    // f64's Display already drops a trailing ".0"
    format!("{}{}", prefix, number)
}

/// Prefix of the first answered value
///
/// The remaining values are assumed to share it; this is not checked.
pub fn extract_common_prefix<S: AsRef<str>>(values: &[Option<S>]) -> Option<String> {
    values
        .iter()
        .flatten()
        .next()
        .map(|v| split_prefix(v.as_ref()).0.to_string())
}

/// Decode the numeric part of a scale value as a bare integer
///
/// Fractional parts are truncated (`CP2.5` decodes to 2).
pub fn parse_scale_int(value: &str) -> Result<u32> {
    let scale = parse_scale(value)?;
    Ok(scale.value.trunc() as u32)
}
