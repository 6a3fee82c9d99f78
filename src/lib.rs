//! Geodetic positions on an ellipsoidal datum.
//!
//! A [`Geodetic`] point holds latitude and longitude in radians and an
//! altitude in metres. Points can be
//!
//! - parsed from free-form text ([`Geodetic::parse`]) in decimal degrees,
//!   packed `DDMM.mm`/`DDMMSS.ss`, milliseconds of arc or hemisphere-letter
//!   DMS notation,
//! - converted to geocentric [`Ecef`] positions and local North-East-Down
//!   frames, optionally with a [`Geoid`] model,
//! - moved along the ellipsoid with a [`GeodesicCache`], either by surface
//!   distance or by straight-line distance,
//! - written as DMS text or as an NMEA `GGA` sentence.
//!
//! ```
//! use geodetic::{Datum, GeodesicCache, Geodetic};
//!
//! let jfk: Geodetic = "40.639801, -73.7789002".parse().unwrap();
//! let lhr: Geodetic = "N 51° 28' 14.16036\" W 000° 27' 42.9876\"".parse().unwrap();
//!
//! let cache: GeodesicCache = GeodesicCache::new();
//! let distance = cache.surface_distance(&jfk, &lhr, &Datum::WGS84);
//! assert!((distance - 5_554_539.949).abs() < 0.01);
//!
//! assert_eq!(
//!     jfk.to_coordinate_string(2),
//!     "N 40° 38' 23.28\", W 073° 46' 44.04\""
//! );
//! ```
//!
//! ## Implementation Notes
//!
//! Angle conversions that feed text output are done in 96-bit decimal
//! arithmetic so that rounding of seconds and minutes is exact and carries
//! correctly (59.999996" at five places becomes a whole minute).
//!
//! Hemisphere letters in parsed text apply to the whole string: an `S`
//! anywhere negates the latitude and a `W` anywhere negates the longitude.
#![deny(clippy::all)]

mod angle;
mod datum;
mod ecef;
mod error;
mod format;
mod geodesic;
mod geodetic;
mod nmea;
mod number;
mod parse;

pub use crate::{
    angle::{
        DEGREES_TO_RADIANS, DegreesMinutes, DegreesMinutesSeconds, RADIANS_TO_DEGREES,
        normalize_radians_pi,
    },
    datum::{Datum, Geoid},
    ecef::{Ecef, LocalTangentPlane},
    error::Error,
    format::DEFAULT_SECONDS_DECIMAL_PLACES,
    geodesic::{DEFAULT_MAX_ITERATIONS, GeodesicCache, GeodesicSolver},
    geodetic::Geodetic,
    nmea::{GgaFormat, gga_timestamp_decimal_places, sample_period},
    number::{CoordinateNumber, Encoding},
};
