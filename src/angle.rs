//! Angle constants and decomposition of radians into degrees, minutes and
//! seconds.
//!
//! All decompositions work in decimal arithmetic and round the total number of
//! seconds (or minutes) *before* splitting it up. Splitting first and rounding
//! the last field afterwards turns 59.9999996" into a "60" seconds field
//! instead of carrying into the minutes.

use std::{
    f64::consts::{PI, TAU},
    sync::LazyLock,
};

use log::trace;
use rust_decimal::prelude::*;

/// Degrees to radians (nearest `f64` to π/180).
pub const DEGREES_TO_RADIANS: f64 = 0.017_453_292_519_943_295;
/// Radians to degrees (nearest `f64` to 180/π).
pub const RADIANS_TO_DEGREES: f64 = 57.295_779_513_082_32;

/// Significant digits kept when widening an `f64` into a decimal.
const F64_SIGNIFICANT_DIGITS: u32 = 15;

static DECIMAL_DEGREES_TO_RADIANS: LazyLock<Decimal> =
    LazyLock::new(|| Decimal::PI / Decimal::from(180));
static DECIMAL_RADIANS_TO_DEGREES: LazyLock<Decimal> =
    LazyLock::new(|| Decimal::from(180) / Decimal::PI);

/// π/180 in decimal precision.
pub fn decimal_degrees_to_radians() -> Decimal {
    *DECIMAL_DEGREES_TO_RADIANS
}

/// 180/π in decimal precision.
pub fn decimal_radians_to_degrees() -> Decimal {
    *DECIMAL_RADIANS_TO_DEGREES
}

/// Widen an `f64` into a decimal, keeping 15 significant digits.
///
/// Returns `None` for NaN, infinities and values outside the decimal range.
pub fn to_decimal(value: f64) -> Option<Decimal> {
    let decimal = Decimal::from_f64(value)?;
    if decimal.is_zero() {
        return Some(Decimal::ZERO);
    }
    decimal.round_sf(F64_SIGNIFICANT_DIGITS)
}

/// Normalize an angle in radians into (-π, π].
pub fn normalize_radians_pi(radians: f64) -> f64 {
    let mut angle = radians % TAU;
    if angle <= -PI {
        angle += TAU;
    } else if angle > PI {
        angle -= TAU;
    }
    angle
}

/// Decimal variant of [`normalize_radians_pi`].
pub fn normalize_decimal_radians_pi(radians: Decimal) -> Decimal {
    let pi = Decimal::PI;
    let two_pi = Decimal::TWO_PI;
    let mut angle = radians % two_pi;
    if angle <= -pi {
        angle += two_pi;
    } else if angle > pi {
        angle -= two_pi;
    }
    angle
}

/// Absolute angle expressed in `unit_factor` units per degree, rounded to
/// `decimal_places`, or `None` if it does not fit a decimal.
fn rounded_total(radians: f64, unit_factor: Decimal, decimal_places: u32) -> Option<Decimal> {
    let total = unit_factor
        .checked_mul(decimal_radians_to_degrees())?
        .checked_mul(to_decimal(radians)?)?;
    Some(total.abs().round_dp(decimal_places))
}

/// Clear the sign of a zero so that it never prints as "-0".
fn positive_zero(value: Decimal) -> Decimal {
    if value.is_zero() { Decimal::ZERO } else { value }
}

/// An unsigned angle split into whole degrees, whole minutes and decimal
/// seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DegreesMinutesSeconds {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: Decimal,
}

impl DegreesMinutesSeconds {
    /// Decompose the absolute value of `radians`, with the seconds rounded to
    /// `decimal_places`.
    ///
    /// Angles that are not finite or too large to decompose yield zero.
    pub fn from_radians(radians: f64, decimal_places: u32) -> Self {
        Self::try_from_radians(radians, decimal_places).unwrap_or_else(|| {
            trace!("Cannot decompose angle {radians}");
            Self::default()
        })
    }

    fn try_from_radians(radians: f64, decimal_places: u32) -> Option<Self> {
        let total_seconds = rounded_total(radians, Decimal::from(3600), decimal_places)?;
        let total_minutes = (total_seconds / Decimal::from(60)).trunc();
        let seconds = total_seconds - Decimal::from(60) * total_minutes;
        let total_minutes = total_minutes.to_u32()?;
        Some(Self {
            degrees: total_minutes / 60,
            minutes: total_minutes % 60,
            seconds: positive_zero(seconds),
        })
    }
}

/// An unsigned angle split into whole degrees and decimal minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DegreesMinutes {
    pub degrees: u32,
    pub minutes: Decimal,
}

impl DegreesMinutes {
    /// Decompose the absolute value of `radians`, with the minutes rounded to
    /// `decimal_places`.
    ///
    /// Angles that are not finite or too large to decompose yield zero.
    pub fn from_radians(radians: f64, decimal_places: u32) -> Self {
        Self::try_from_radians(radians, decimal_places).unwrap_or_else(|| {
            trace!("Cannot decompose angle {radians}");
            Self::default()
        })
    }

    fn try_from_radians(radians: f64, decimal_places: u32) -> Option<Self> {
        let total_minutes = rounded_total(radians, Decimal::from(60), decimal_places)?;
        let degrees = (total_minutes / Decimal::from(60)).trunc();
        let minutes = total_minutes - Decimal::from(60) * degrees;
        Some(Self {
            degrees: degrees.to_u32()?,
            minutes: positive_zero(minutes),
        })
    }
}
