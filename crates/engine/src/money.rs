use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Monetary amount in **whole Uganda shillings** (UGX has no minor unit in
/// practice).
///
/// Contributions and campaign targets are always strictly positive; the type
/// itself is a plain wrapper so that totals and drifts can be represented too.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::new(25_000);
/// assert_eq!(amount.shillings(), 25_000);
/// assert_eq!(amount.to_string(), "UGX 25,000");
/// ```
///
/// Parsing from user input (accepts `,` and `_` as thousands separators,
/// rejects fractions):
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("25,000".parse::<Amount>().unwrap().shillings(), 25_000);
/// assert!("12.5".parse::<Amount>().is_err());
/// assert!("abc".parse::<Amount>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    #[must_use]
    pub const fn new(shillings: i64) -> Self {
        Self(shillings)
    }

    #[must_use]
    pub const fn shillings(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Builds a strictly positive amount, labelling the error with `label`.
    pub fn positive(shillings: i64, label: &str) -> Result<Self, EngineError> {
        if shillings <= 0 {
            return Err(EngineError::Validation(format!("{label} must be > 0")));
        }
        Ok(Self(shillings))
    }

    /// Converts a JSON number that may have been sent as a float.
    ///
    /// `25000.0` is accepted, `25000.5`, `NaN` and out of range values are
    /// not.
    pub fn from_f64(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(EngineError::Validation(
                "amount must be a whole number of shillings".to_string(),
            ));
        }
        // i64::MAX is not representable as f64; 2^63 rounds up to it.
        if value >= 9_223_372_036_854_775_808.0 || value < -9_223_372_036_854_775_808.0 {
            return Err(EngineError::Validation("amount too large".to_string()));
        }
        Ok(Self(value as i64))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "{sign}UGX {grouped}")
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses a whole-shilling amount.
    ///
    /// Accepts an optional leading `+`/`-` and `,`/`_` digit separators.
    /// Rejects empty strings, fractions and anything that is not a digit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::Validation(format!("invalid amount: {:?}", s.trim()));

        let trimmed = s.trim();
        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let digits: String = rest.chars().filter(|c| *c != ',' && *c != '_').collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let value: i64 = digits
            .parse()
            .map_err(|_| EngineError::Validation("amount too large".to_string()))?;
        Ok(Self(if negative { -value } else { value }))
    }
}
