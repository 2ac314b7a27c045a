//! Donation amounts.
//!
//! Callers send dollars, usually as a JSON number or a string. The value is
//! read the way a browser's `parseFloat` reads it (leading whitespace skipped,
//! trailing garbage ignored) and converted to integer cents with
//! round-half-up. Other JSON values are first turned into the string a
//! browser would produce, so `[5]` reads as `"5"` and `{}` as NaN.

use std::fmt;

use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::Value;

use crate::error::ValidationError;

/// Smallest accepted donation, in cents ($1.00).
pub const MIN_DONATION_CENTS: i64 = 100;

/// Largest accepted donation, in cents ($999,999.00).
pub const MAX_DONATION_CENTS: i64 = 99_999_900;

/// A validated donation amount in cents.
///
/// Always within `MIN_DONATION_CENTS..=MAX_DONATION_CENTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "i64")]
pub struct DonationAmount(i64);

impl DonationAmount {
    /// Convert the unparsed JSON of an `amount` field.
    ///
    /// Number literals are read from their text, so `1e400` is infinite (and
    /// too large) rather than a parse error. A missing field is NaN.
    pub fn from_raw_json(raw: Option<&RawValue>) -> Result<Self, ValidationError> {
        let Some(raw) = raw else {
            return Self::from_float_dollars(f64::NAN);
        };

        let text = raw.get();
        if text.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
            return Self::from_float_dollars(text.parse().unwrap_or(f64::NAN));
        }

        let value: Value = serde_json::from_str(text).unwrap_or(Value::Null);
        Self::from_dollars(&value)
    }

    /// Convert a caller-supplied dollar value to a validated amount.
    ///
    /// Non-numeric input is treated as NaN and reported as too small.
    pub fn from_dollars(raw: &Value) -> Result<Self, ValidationError> {
        let dollars = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_float_prefix(s),
            other => parse_float_prefix(&coerce_to_string(other)),
        };

        Self::from_float_dollars(dollars.unwrap_or(f64::NAN))
    }

    /// Convert a dollar amount held as a float.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_float_dollars(dollars: f64) -> Result<Self, ValidationError> {
        let cents = (dollars * 100.0).round();

        if cents.is_nan() || cents < MIN_DONATION_CENTS as f64 {
            return Err(ValidationError::AmountTooSmall);
        }
        if cents > MAX_DONATION_CENTS as f64 {
            return Err(ValidationError::AmountTooLarge);
        }

        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(cents as i64))
    }

    /// Build an amount directly from cents, applying the same bounds.
    pub fn from_cents(cents: i64) -> Result<Self, ValidationError> {
        if cents < MIN_DONATION_CENTS {
            Err(ValidationError::AmountTooSmall)
        } else if cents > MAX_DONATION_CENTS {
            Err(ValidationError::AmountTooLarge)
        } else {
            Ok(Self(cents))
        }
    }

    /// The amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }
}

impl From<DonationAmount> for i64 {
    fn from(amount: DonationAmount) -> Self {
        amount.0
    }
}

impl fmt::Display for DonationAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// String form of a JSON value as a browser would stringify it.
///
/// Arrays join their elements with `,` and render `null` elements as empty.
fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Parse the longest leading decimal literal of `input`, like `parseFloat`.
///
/// Returns `None` where `parseFloat` would return NaN.
fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let bytes = s.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if s[end..].starts_with("Infinity") {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = leading_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = leading_digits(&bytes[end + 1..]);
        if frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = leading_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

fn leading_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
