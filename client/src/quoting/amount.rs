//! # Decimal Amount Strings
//!
//! Amounts travel the network as decimal strings and are echoed back to
//! the caller byte-for-byte — a quote must never silently rewrite `"10.0"`
//! into `"10"`. So [`Amount`] keeps the original text and implements
//! *numeric* ordering over it: leading zeros in the integer part and
//! trailing zeros in the fraction are insignificant for comparison,
//! significant for display.
//!
//! No arithmetic is performed on amounts anywhere in this crate — the
//! engine only compares and echoes them — so this stays a comparator, not
//! a decimal library.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a string is not a well-formed decimal amount.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid decimal amount: {0:?}")]
pub struct AmountError(pub String);

/// A non-negative decimal amount: digits, optionally a dot and more
/// digits. The original string is preserved exactly.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(String);

impl Amount {
    /// The amount exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer and fraction parts, numerically normalized: integer part
    /// without leading zeros (empty for zero), fraction without trailing
    /// zeros.
    fn normalized(&self) -> (&str, &str) {
        let (int, frac) = match self.0.split_once('.') {
            Some((int, frac)) => (int, frac),
            None => (self.0.as_str(), ""),
        };
        (
            int.trim_start_matches('0'),
            frac.trim_end_matches('0'),
        )
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (int, frac) = match s.split_once('.') {
            Some((int, frac)) => (int, Some(frac)),
            None => (s, None),
        };

        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        let valid = digits(int) && frac.map_or(true, digits);
        if !valid {
            return Err(AmountError(s.to_string()));
        }
        Ok(Amount(s.to_string()))
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> String {
        amount.0
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        let (int_a, frac_a) = self.normalized();
        let (int_b, frac_b) = other.normalized();

        // Longer stripped integer part means strictly larger; equal
        // lengths compare lexicographically (same as numerically, for
        // equal-length digit strings).
        (int_a.len().cmp(&int_b.len()))
            .then_with(|| int_a.cmp(int_b))
            // Fractions compare digit-by-digit with missing digits as
            // zero; with trailing zeros stripped, that is exactly
            // lexicographic order.
            .then_with(|| frac_a.cmp(frac_b))
    }
}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Amount {}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}
