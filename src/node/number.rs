//! Exact decimal numbers
//!
//! JSON number literals are kept digit for digit in a [`Decimal`]. A literal
//! that a `Decimal` cannot hold without rounding is rejected rather than
//! approximated.

use rust_decimal::{Decimal, Error};

/// Largest scale a [`Decimal`] can carry
const MAX_SCALE: u32 = 28;

/// Parse a JSON number literal without losing any written digit.
///
/// The mantissa always goes through `from_str_exact`. An exponent only moves
/// the decimal point or multiplies by ten, and fails instead of rounding.
pub fn parse_decimal(text: &str) -> Result<Decimal, Error> {
    let Some((mantissa, exponent)) = text.split_once(['e', 'E']) else {
        return Decimal::from_str_exact(text);
    };

    let mut value = Decimal::from_str_exact(mantissa)?;
    if value.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let exponent: i64 = exponent
        .parse()
        .map_err(|_| Error::ErrorString(format!("invalid exponent in {text}")))?;

    let scale = i64::from(value.scale());
    if exponent <= scale {
        let new_scale = u32::try_from(scale - exponent)
            .ok()
            .filter(|scale| *scale <= MAX_SCALE)
            .ok_or(Error::Underflow)?;
        value.set_scale(new_scale)?;
        return Ok(value);
    }

    // Digits left of the point grow; every step either fits or overflows.
    value.set_scale(0)?;
    for _ in 0..exponent - scale {
        value = value
            .checked_mul(Decimal::TEN)
            .ok_or(Error::ExceedsMaximumPossibleValue)?;
    }
    Ok(value)
}
