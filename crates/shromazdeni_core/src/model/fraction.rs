//! Exact ownership fractions.
//!
//! # Invariants
//! - Fractions are arbitrary-precision rationals; summing hundreds of shares
//!   never accumulates rounding error.
//! - A zero denominator is rejected at parse time.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Exact share of ownership.
pub type Fraction = BigRational;

/// Parse failure for `"numerator/denominator"` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FractionParseError {
    pub input: String,
    pub reason: &'static str,
}

impl Display for FractionParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid fraction `{}`: {}", self.input, self.reason)
    }
}

impl Error for FractionParseError {}

/// Parses `"n/d"` or a bare integer `"n"` into an exact fraction.
///
/// Surrounding whitespace around either part is ignored.
pub fn parse_fraction(input: &str) -> Result<Fraction, FractionParseError> {
    let error = |reason| FractionParseError {
        input: input.to_string(),
        reason,
    };

    let (numer_text, denom_text) = match input.split_once('/') {
        Some((numer, denom)) => (numer.trim(), denom.trim()),
        None => (input.trim(), "1"),
    };

    let numer: BigInt = numer_text
        .parse()
        .map_err(|_| error("numerator is not an integer"))?;
    let denom: BigInt = denom_text
        .parse()
        .map_err(|_| error("denominator is not an integer"))?;
    if denom.is_zero() {
        return Err(error("denominator is zero"));
    }

    Ok(Fraction::new(numer, denom))
}

/// Returns the whole (`1/1`) fraction.
pub fn whole() -> Fraction {
    Fraction::one()
}

/// Renders `value` as a decimal string with `decimals` places, rounding half
/// away from zero using exact integer arithmetic.
pub fn format_decimal(value: &Fraction, decimals: u32) -> String {
    let scale = BigInt::from(10u32).pow(decimals);
    let scaled = value * Fraction::from_integer(scale);
    let rounded = scaled.round().to_integer();

    let negative = rounded.is_negative();
    let digits = rounded.abs().to_string();
    let sign = if negative { "-" } else { "" };
    if decimals == 0 {
        return format!("{sign}{digits}");
    }

    let width = decimals as usize + 1;
    let padded = format!("{digits:0>width$}");
    let (int_part, frac_part) = padded.split_at(padded.len() - decimals as usize);
    format!("{sign}{int_part}.{frac_part}")
}
