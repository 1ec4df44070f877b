//! Money helpers.
//!
//! Amounts are stored as `f64` (the order row keeps floating decimals), but every
//! calculation goes through `Decimal` and is rounded back to cents.

use rust_decimal::prelude::*;

const DECIMAL_PLACES: u32 = 2;

/// Half a cent: two stored amounts closer than this are equal.
pub const MONEY_TOLERANCE: f64 = 0.005;

#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or_default()
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Back to `f64`, rounded to 2 decimal places.
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Amount in minor currency units (cents), as the payment gateway expects it.
pub fn to_minor_units(amount: f64) -> i64 {
    (to_decimal(amount) * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .unwrap_or_default()
}

/// `floor(amount × rate)`, clamped at zero.
pub fn floor_points(amount: f64, rate: u32) -> u32 {
    (to_decimal(amount) * Decimal::from(rate))
        .floor()
        .to_u32()
        .unwrap_or_default()
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < MONEY_TOLERANCE
}
