//! NMEA 0183 `GGA` sentence output.
//!
//! Only the time, position and altitude fields carry data. The fix quality
//! and satellite count are fixed at `8` (simulation mode) and the remaining
//! fields are left empty:
//!
//! ```text
//! $GPGGA,123456.78,4038.388060000,N,07346.734012000,W,8,8,,4.000000,M,,,,*01
//! ```

use std::{num::NonZeroU32, time::Duration};

use iso8601::Time;
use log::trace;

use crate::{Geodetic, angle::DegreesMinutes};

const MAX_SAMPLE_RATE: u32 = 1000;

/// Precision of the fields of a GGA sentence.
///
/// Values out of range are clamped when the sentence is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GgaFormat {
    /// Fractional digits of the timestamp seconds, 0 to 3.
    pub timestamp_decimal_places: usize,
    /// Fractional digits of the latitude and longitude minutes, 1 to 15.
    pub lat_long_decimal_places: usize,
    /// Fractional digits of the altitude, 1 to 15.
    pub altitude_decimal_places: usize,
}

impl Default for GgaFormat {
    /// 10 ms timestamps, about 2 µm horizontal and 1 µm vertical resolution.
    fn default() -> Self {
        Self {
            timestamp_decimal_places: 2,
            lat_long_decimal_places: 9,
            altitude_decimal_places: 6,
        }
    }
}

impl GgaFormat {
    /// Default format with a timestamp precision matching `sample_rate`.
    pub fn for_sample_rate(sample_rate: NonZeroU32) -> Self {
        Self {
            timestamp_decimal_places: gga_timestamp_decimal_places(sample_rate),
            ..Self::default()
        }
    }

    fn clamped(&self) -> Self {
        Self {
            timestamp_decimal_places: self.timestamp_decimal_places.min(3),
            lat_long_decimal_places: self.lat_long_decimal_places.clamp(1, 15),
            altitude_decimal_places: self.altitude_decimal_places.clamp(1, 15),
        }
    }
}

/// Whole milliseconds between samples, for rates up to 1000 Hz.
fn sample_period_millis(sample_rate: NonZeroU32) -> u32 {
    MAX_SAMPLE_RATE / sample_rate.get().min(MAX_SAMPLE_RATE)
}

/// Timestamp decimal places needed to tell apart samples taken at
/// `sample_rate` Hz (1 to 1000, with the period floored to whole
/// milliseconds).
pub fn gga_timestamp_decimal_places(sample_rate: NonZeroU32) -> usize {
    let zeros = sample_period_millis(sample_rate)
        .to_string()
        .chars()
        .filter(|&c| c == '0')
        .count();
    3usize.saturating_sub(zeros)
}

/// Sample period at `sample_rate` Hz, floored to whole milliseconds.
pub fn sample_period(sample_rate: NonZeroU32) -> Duration {
    Duration::from_millis(sample_period_millis(sample_rate).into())
}

/// XOR of all bytes of `payload`.
fn checksum(payload: &str) -> u8 {
    payload.bytes().fold(0, |acc, b| acc ^ b)
}

fn timestamp(time: &Time, decimal_places: usize) -> String {
    let mut text = format!("{:02}{:02}{:02}", time.hour, time.minute, time.second);
    if decimal_places > 0 {
        let divisor = match decimal_places {
            1 => 100,
            2 => 10,
            _ => 1,
        };
        text.push_str(&format!(".{:0decimal_places$}", time.millisecond / divisor));
    }
    text
}

/// Degrees followed by minutes with exactly `decimal_places` fractional
/// digits, as in `4038.388060000`.
fn degrees_minutes(radians: f64, degree_digits: usize, decimal_places: usize) -> String {
    // Clamped to at most 15 places
    let places = decimal_places as u32;
    let DegreesMinutes {
        degrees,
        mut minutes,
    } = DegreesMinutes::from_radians(radians, places);
    minutes.rescale(places);
    let minutes = minutes.to_string();
    let (integer, fraction) = minutes.split_once('.').unwrap_or((&minutes, ""));
    format!("{degrees:0degree_digits$}{integer:0>2}.{fraction}")
}

impl Geodetic {
    /// A GGA sentence at `time` using [`GgaFormat::default`].
    pub fn to_gga_line(&self, time: &Time) -> String {
        self.to_gga_line_with(time, &GgaFormat::default())
    }

    /// A GGA sentence at `time` (the date and zone are not written), without
    /// the trailing CR LF.
    pub fn to_gga_line_with(&self, time: &Time, format: &GgaFormat) -> String {
        let format = format.clamped();
        let places = format.lat_long_decimal_places;
        let north_south = if self.latitude() >= 0.0 { 'N' } else { 'S' };
        let east_west = if self.longitude() > 0.0 { 'E' } else { 'W' };

        let payload = format!(
            "GPGGA,{},{},{north_south},{},{east_west},8,8,,{:.alt_places$},M,,,,",
            timestamp(time, format.timestamp_decimal_places),
            degrees_minutes(self.latitude(), 2, places),
            degrees_minutes(self.longitude(), 3, places),
            self.altitude(),
            alt_places = format.altitude_decimal_places,
        );
        let checksum = checksum(&payload);
        trace!("GGA payload {payload:?} checksum {checksum:02X}");
        format!("${payload}*{checksum:02X}")
    }
}
