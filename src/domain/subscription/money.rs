//! Minor-unit to major-unit money conversion.
//!
//! The billing provider reports every amount in minor currency units
//! (e.g. kobo, cents) while local records hold major units. The conversion
//! lives here as one tested function so the scale factor is applied in
//! exactly one place.

use rust_decimal::Decimal;

/// Decimal places between minor and major units (a factor of 100).
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Converts a provider minor-unit amount to major units, exactly.
///
/// `500000` minor units become `5000`; `1999` become `19.99`. No floating
/// point is involved, so no rounding drift is possible.
pub fn minor_to_major(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}
