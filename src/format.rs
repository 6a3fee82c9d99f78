use std::fmt;

use rust_decimal::Decimal;

use crate::{Geodetic, angle::DegreesMinutesSeconds};

/// Default precision of the seconds in [`Geodetic::to_coordinate_string`].
pub const DEFAULT_SECONDS_DECIMAL_PLACES: u32 = 5;

const MAX_SECONDS_DECIMAL_PLACES: u32 = 10;

/// Pad the integer part of `value` to `width` digits and drop trailing zeros
/// of the fraction, including the separator if nothing remains.
pub(crate) fn pad_integer(value: Decimal, width: usize) -> String {
    let text = value.normalize().to_string();
    match text.split_once('.') {
        Some((integer, fraction)) => format!("{integer:0>width$}.{fraction}"),
        None => format!("{text:0>width$}"),
    }
}

fn angle_text(hemisphere: char, degree_digits: usize, angle: &DegreesMinutesSeconds) -> String {
    format!(
        "{hemisphere} {:0degree_digits$}° {:02}' {}\"",
        angle.degrees,
        angle.minutes,
        pad_integer(angle.seconds, 2),
    )
}

impl Geodetic {
    /// Hemisphere-letter DMS text, e.g. `N 51° 28' 14.16036", W 000° 27' 42.9876"`.
    ///
    /// Seconds are rounded to `seconds_decimal_places` (at most 10) with
    /// trailing zeros removed. A longitude of exactly zero is written as `W`.
    pub fn to_coordinate_string(&self, seconds_decimal_places: u32) -> String {
        let places = seconds_decimal_places.min(MAX_SECONDS_DECIMAL_PLACES);
        let latitude = DegreesMinutesSeconds::from_radians(self.latitude(), places);
        let longitude = DegreesMinutesSeconds::from_radians(self.longitude(), places);
        let north_south = if self.latitude() >= 0.0 { 'N' } else { 'S' };
        let east_west = if self.longitude() > 0.0 { 'E' } else { 'W' };
        format!(
            "{}, {}",
            angle_text(north_south, 2, &latitude),
            angle_text(east_west, 3, &longitude)
        )
    }
}

impl fmt::Display for Geodetic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Lat:{}° Long:{}° Alt:{}m",
            self.latitude_degrees(),
            self.longitude_degrees(),
            self.altitude()
        )
    }
}
