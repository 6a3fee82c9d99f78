//! Resolution of the raw numbers of one coordinate into an angle.
//!
//! A coordinate is written as up to three numbers (degrees, minutes,
//! seconds). When only one number is given, its magnitude decides which packed
//! layout was used: `DDMM.mm`, `DDMMSS.ss` or thousandths of arc seconds.

use log::trace;
use rust_decimal::prelude::*;

use crate::angle::decimal_degrees_to_radians;

/// Single numbers above this are thousandths of arc seconds.
const MILLISECONDS_THRESHOLD: u32 = 909_090;
/// Single numbers above this are packed `DDMMSS`.
const DEGREES_MINUTES_SECONDS_THRESHOLD: u32 = 9_090;
/// Single numbers above this are packed `DDMM`.
const DEGREES_MINUTES_THRESHOLD: u32 = 360;

/// The layout in which the numbers of a coordinate were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Degrees, optionally followed by minutes and seconds.
    PlainDegrees,
    /// A single number `DDMM.mm`.
    PackedDegreesMinutes,
    /// A single number `DDMMSS.ss`.
    PackedDegreesMinutesSeconds,
    /// A single number of milliseconds of arc (1/3600000 degree).
    Milliseconds,
}

impl Encoding {
    /// Classify unsigned `degrees`, `minutes` and `seconds` fields.
    ///
    /// Only a lone degrees value (zero minutes and seconds) can be packed.
    pub fn classify(degrees: Decimal, minutes: Decimal, seconds: Decimal) -> Self {
        if !minutes.is_zero() || !seconds.is_zero() {
            Self::PlainDegrees
        } else if degrees > Decimal::from(MILLISECONDS_THRESHOLD) {
            Self::Milliseconds
        } else if degrees > Decimal::from(DEGREES_MINUTES_SECONDS_THRESHOLD) {
            Self::PackedDegreesMinutesSeconds
        } else if degrees > Decimal::from(DEGREES_MINUTES_THRESHOLD) {
            Self::PackedDegreesMinutes
        } else {
            Self::PlainDegrees
        }
    }
}

/// The resolved fields of one coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateNumber {
    is_negative: bool,
    degrees: Decimal,
    minutes: Decimal,
    seconds: Decimal,
    milliseconds: Decimal,
}

impl CoordinateNumber {
    /// Resolve the numbers written for one coordinate.
    ///
    /// The first number carries the sign; missing minutes and seconds are zero
    /// and anything after the third number is ignored.
    pub fn new(numbers: &[Decimal]) -> Self {
        let mut fields = [Decimal::ZERO; 3];
        for (field, number) in fields.iter_mut().zip(numbers) {
            *field = *number;
        }
        let [degrees, minutes, seconds] = fields;
        let mut number = Self {
            is_negative: degrees.is_sign_negative(),
            degrees: degrees.abs(),
            minutes,
            seconds,
            milliseconds: Decimal::ZERO,
        };
        number.unpack();
        number
    }

    fn unpack(&mut self) {
        let encoding = Encoding::classify(self.degrees, self.minutes, self.seconds);
        trace!("Coordinate number {} resolved as {encoding:?}", self.degrees);
        let hundred = Decimal::ONE_HUNDRED;
        let ten_thousand = Decimal::from(10_000);
        match encoding {
            Encoding::PlainDegrees => {}
            Encoding::Milliseconds => {
                self.milliseconds = self.degrees;
                self.degrees = Decimal::ZERO;
            }
            Encoding::PackedDegreesMinutesSeconds => {
                let degrees = (self.degrees / ten_thousand).floor();
                let minutes = ((self.degrees - degrees * ten_thousand) / hundred).floor();
                self.seconds = self.degrees - degrees * ten_thousand - minutes * hundred;
                self.minutes = minutes;
                self.degrees = degrees;
            }
            Encoding::PackedDegreesMinutes => {
                let degrees = (self.degrees / hundred).floor();
                self.minutes = self.degrees - degrees * hundred;
                self.degrees = degrees;
            }
        }
    }

    pub fn is_negative(&self) -> bool {
        self.is_negative
    }

    pub fn degrees(&self) -> Decimal {
        self.degrees
    }

    pub fn minutes(&self) -> Decimal {
        self.minutes
    }

    pub fn seconds(&self) -> Decimal {
        self.seconds
    }

    pub fn milliseconds(&self) -> Decimal {
        self.milliseconds
    }

    /// Unsigned total in decimal degrees, or `None` on decimal overflow.
    fn total_degrees(&self) -> Option<Decimal> {
        let minutes = self.minutes.checked_div(Decimal::from(60))?;
        let seconds = self.seconds.checked_div(Decimal::from(3600))?;
        let milliseconds = self.milliseconds.checked_div(Decimal::from(3_600_000))?;
        self.degrees
            .checked_add(minutes)?
            .checked_add(seconds)?
            .checked_add(milliseconds)
    }

    fn signed(&self, value: f64) -> f64 {
        if self.is_negative { -value } else { value }
    }

    /// Signed angle in degrees.
    pub fn to_degrees(&self) -> Option<f64> {
        Some(self.signed(self.total_degrees()?.to_f64()?))
    }

    /// Signed angle in radians, converted in decimal precision.
    pub fn to_radians(&self) -> Option<f64> {
        let radians = self
            .total_degrees()?
            .checked_mul(decimal_degrees_to_radians())?;
        Some(self.signed(radians.to_f64()?))
    }
}
