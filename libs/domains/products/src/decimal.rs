//! Exact conversion between [`Decimal`] and BSON `Decimal128`.
//!
//! `Decimal128` uses the IEEE 754-2008 binary integer decimal (BID) layout,
//! stored little-endian:
//!
//! ```text
//! bit 127      sign
//! bits 126-113 exponent, biased by 6176
//! bits 112-0   coefficient
//! ```
//!
//! A combination field starting with `11` marks NaN, infinity, or a
//! coefficient too large to be canonical. None of these fit in a
//! [`Decimal`], so they are rejected.

use mongodb::bson::Decimal128;
use rust_decimal::Decimal;
use thiserror::Error;

const EXPONENT_BIAS: i32 = 6176;
const COEFFICIENT_BITS: u32 = 113;
const COEFFICIENT_MASK: u128 = (1 << COEFFICIENT_BITS) - 1;
const EXPONENT_MASK: u128 = 0x3FFF;
/// Largest scale a `Decimal` can carry
const MAX_SCALE: u32 = 28;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecimalConversionError {
    #[error("Decimal128 value is NaN, infinite or non-canonical")]
    NotFinite,

    #[error("Decimal128 value does not fit in a 96-bit decimal")]
    OutOfRange,
}

pub fn to_decimal128(value: Decimal) -> Decimal128 {
    let sign = u128::from(value.is_sign_negative());
    let exponent = (EXPONENT_BIAS - value.scale() as i32) as u128;
    let coefficient = value.mantissa().unsigned_abs();

    let bits = (sign << 127) | (exponent << COEFFICIENT_BITS) | coefficient;
    Decimal128::from_bytes(bits.to_le_bytes())
}

pub fn from_decimal128(value: Decimal128) -> Result<Decimal, DecimalConversionError> {
    let bits = u128::from_le_bytes(value.bytes());

    if (bits >> 125) & 0b11 == 0b11 {
        return Err(DecimalConversionError::NotFinite);
    }

    let negative = bits >> 127 == 1;
    let exponent = ((bits >> COEFFICIENT_BITS) & EXPONENT_MASK) as i32 - EXPONENT_BIAS;
    let mut coefficient = bits & COEFFICIENT_MASK;

    let scale = if exponent > 0 {
        for _ in 0..exponent {
            coefficient = coefficient
                .checked_mul(10)
                .ok_or(DecimalConversionError::OutOfRange)?;
        }
        0
    } else {
        let mut scale = exponent.unsigned_abs();
        while scale > MAX_SCALE {
            if coefficient % 10 != 0 {
                return Err(DecimalConversionError::OutOfRange);
            }
            coefficient /= 10;
            scale -= 1;
        }
        scale
    };

    let magnitude = i128::try_from(coefficient).map_err(|_| DecimalConversionError::OutOfRange)?;
    let mantissa = if negative { -magnitude } else { magnitude };

    Decimal::try_from_i128_with_scale(mantissa, scale)
        .map_err(|_| DecimalConversionError::OutOfRange)
}
