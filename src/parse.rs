//! Free-form coordinate text parsing.
//!
//! Accepted inputs include plain decimal degrees (`40.639801, -73.7789002`),
//! packed degrees and minutes (`4025.0999N 7438.4668W`), packed degrees,
//! minutes and seconds (`402505.994N 743828.008W`) and hemisphere-letter DMS
//! text (`N 51° 59' 22.4" W 000° 59' 29.03"`). Either `.` or `,` may be used
//! as decimal separator.
//!
//! Hemisphere letters are looked up across the whole string: any `S` negates
//! the latitude and any `W` negates the longitude, regardless of where the
//! letter appears relative to the numbers.

use std::{str::FromStr, sync::LazyLock};

use log::{debug, trace};
use regex::Regex;
use rust_decimal::Decimal;

use crate::{CoordinateNumber, Error, Geodetic};

/// A signed number of ASCII digits with an optional fractional part after `.`
/// or `,`.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?[0-9]+([.,][0-9]+)?").expect("Invalid number regex"));

/// Any letter other than the hemisphere letters and `D`.
static FOREIGN_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[a-cf-mo-rtuvx-z]").expect("Invalid letter regex"));

/// At most one of N/S, followed by at most one of E/W.
static HEMISPHERE_ORDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[^nsew]*[ns]?[^nsew]*[ew]?[^nsew]*$").expect("Invalid hemisphere regex")
});

/// Extract all numbers of the string, or `None` if one does not fit a decimal.
fn parse_numbers(text: &str) -> Option<Vec<Decimal>> {
    NUMBER_RE
        .find_iter(text)
        .map(|m| {
            let token = m.as_str().replace(',', ".");
            let number = Decimal::from_str(&token).ok();
            if number.is_none() {
                debug!("Unparseable number \"{}\"", m.as_str());
            }
            number
        })
        .collect()
}

/// Check the letters of the string and the count of numbers.
fn validate(text: &str, number_count: usize) -> bool {
    if FOREIGN_LETTER_RE.is_match(text) {
        debug!("Invalid coordinate \"{text}\": unexpected letter");
        return false;
    }
    if !HEMISPHERE_ORDER_RE.is_match(text) {
        debug!("Invalid coordinate \"{text}\": misplaced hemisphere letters");
        return false;
    }
    if !matches!(number_count, 2 | 4 | 6) {
        debug!("Invalid coordinate \"{text}\": {number_count} numbers");
        return false;
    }
    true
}

fn contains_ci(text: &str, letter: char) -> bool {
    text.chars().any(|c| c.eq_ignore_ascii_case(&letter))
}

impl Geodetic {
    /// Parse a coordinate string into a point at `altitude` metres.
    ///
    /// Returns `None` for empty text, letters other than N, S, E, W and D,
    /// hemisphere letters out of order (N/S must precede E/W) or a count of
    /// numbers other than 2, 4 or 6.
    pub fn parse(text: &str, altitude: f64) -> Option<Self> {
        if text.trim().is_empty() {
            debug!("Invalid coordinate: empty input");
            return None;
        }

        let numbers = parse_numbers(text)?;
        trace!("Numbers in \"{text}\": {numbers:?}");
        if !validate(text, numbers.len()) {
            return None;
        }

        let (latitude, longitude) = numbers.split_at(numbers.len() / 2);
        let mut latitude = CoordinateNumber::new(latitude).to_radians()?;
        let mut longitude = CoordinateNumber::new(longitude).to_radians()?;
        if contains_ci(text, 's') {
            latitude = -latitude;
        }
        if contains_ci(text, 'w') {
            longitude = -longitude;
        }

        Some(Self::new(latitude, longitude, altitude))
    }
}

impl FromStr for Geodetic {
    type Err = Error;

    /// Parse a coordinate string into a point at zero altitude.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text, 0.0).ok_or_else(|| Error::InvalidCoordinate(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use insta::assert_compact_debug_snapshot;

    use super::*;

    fn degrees(text: &str) -> (f64, f64) {
        let point = Geodetic::parse(text, 0.0).unwrap();
        (point.latitude_degrees(), point.longitude_degrees())
    }

    fn assert_degrees(text: &str, latitude: f64, longitude: f64) {
        let (lat, lng) = degrees(text);
        assert_abs_diff_eq!(lat, latitude, epsilon = 1e-9);
        assert_abs_diff_eq!(lng, longitude, epsilon = 1e-9);
    }

    #[test]
    fn numbers() {
        assert_compact_debug_snapshot!(
            parse_numbers("N 51° 59' 22.4\" W 000° 59' 29,03\""),
            @"Some([51, 59, 22.4, 0, 59, 29.03])"
        );
        assert_compact_debug_snapshot!(
            parse_numbers("40.639801,-73.7789002"),
            @"Some([40.639801, -73.7789002])"
        );
        assert_compact_debug_snapshot!(parse_numbers("no numbers"), @"Some([])");
    }

    #[test]
    fn numbers_are_ascii_digits() {
        // Arabic-Indic digits are not numbers
        assert_compact_debug_snapshot!(parse_numbers("40 ٤٥ 73"), @"Some([40, 73])");
        assert_eq!(Geodetic::parse("٤٠ ٧٣", 0.0), None);
        assert_eq!(Geodetic::parse("40 ٤٥ 73", 0.0), Geodetic::parse("40 73", 0.0));
    }

    #[test]
    fn parse_decimal_degrees() {
        assert_degrees("40.639801, -73.7789002", 40.639801, -73.7789002);
        assert_degrees("40.639801,-73.7789002", 40.639801, -73.7789002);
        assert_degrees("-33.9399 151.1753", -33.9399, 151.1753);
    }

    #[test]
    fn parse_comma_separator() {
        assert_degrees("40,639801 -73,7789002", 40.639801, -73.7789002);
        assert_degrees(
            "N 51° 59' 22,4\" W 000° 59' 29,03\"",
            51.989555555555555,
            -0.991397222222222,
        );
    }

    #[test]
    fn parse_degrees_minutes() {
        let (lat, lng) = (40.418331666666667, -74.641113333333333);
        assert_degrees("4025.0999N 7438.4668W", lat, lng);
        assert_degrees("N 40 25.0999 W 74 38.4668", lat, lng);
    }

    #[test]
    fn parse_degrees_minutes_seconds() {
        assert_degrees("402505.994N 743828.008W", 40.418331666666667, -74.641113333333333);
        assert_degrees(
            "N 51° 59' 22.4\" W 000° 59' 29.03\"",
            51.989555555555555,
            -0.991397222222222,
        );
        assert_degrees("s 33 56 23.64 e 151 10 31.08", -33.9399, 151.1753);
    }

    #[test]
    fn parse_milliseconds() {
        assert_degrees("146303283.6 -265604040.72", 40.639801, -73.7789002);
    }

    #[test]
    fn parse_altitude() {
        let point = Geodetic::parse("10 20", 123.5).unwrap();
        assert_eq!(point.altitude(), 123.5);
    }

    #[test]
    fn parse_lowercase_and_degree_letter() {
        assert_degrees("n 10d 30' e 20d 15'", 10.5, 20.25);
    }

    #[test]
    fn hemisphere_sign_is_global() {
        // An S anywhere flips the latitude, even after the longitude
        assert_degrees("10 20 S", -10.0, 20.0);
        // A negative number and a W cancel out
        assert_degrees("10, -20 W", 10.0, 20.0);
    }

    #[test]
    fn parse_invalid() {
        assert_eq!(Geodetic::parse("", 0.0), None);
        assert_eq!(Geodetic::parse("   ", 0.0), None);
        // Foreign letters
        assert_eq!(Geodetic::parse("40.1 N 73.2 X", 0.0), None);
        assert_eq!(Geodetic::parse("lat 40.1 lon 73.2", 0.0), None);
        // Hemisphere letters in the wrong order or repeated
        assert_eq!(Geodetic::parse("E 40.1 N 73.2", 0.0), None);
        assert_eq!(Geodetic::parse("N 40.1 S 73.2", 0.0), None);
        // Wrong count of numbers
        assert_eq!(Geodetic::parse("40.1", 0.0), None);
        assert_eq!(Geodetic::parse("40 1 73", 0.0), None);
        assert_eq!(Geodetic::parse("1 2 3 4 5 6 7 8", 0.0), None);
    }

    #[test]
    fn parse_rejects_oversized_numbers() {
        let text = "1 99999999999999999999999999999999";
        assert_eq!(Geodetic::parse(text, 0.0), None);
    }

    #[test]
    fn from_str() {
        let point: Geodetic = "10 20".parse().unwrap();
        assert_eq!(point, Geodetic::parse("10 20", 0.0).unwrap());
        assert_compact_debug_snapshot!(
            "10 X 20".parse::<Geodetic>(),
            @r#"Err(InvalidCoordinate("10 X 20"))"#
        );
    }
}
