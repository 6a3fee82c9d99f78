use std::hash::{Hash, Hasher};

use log::trace;
use rust_decimal::prelude::*;

use crate::{
    Datum, Ecef, Error, Geoid, LocalTangentPlane,
    angle::{
        RADIANS_TO_DEGREES, decimal_degrees_to_radians, normalize_decimal_radians_pi,
        normalize_radians_pi, to_decimal,
    },
};

/// A position on an ellipsoidal datum.
///
/// Latitude and longitude are in radians, altitude in metres above the
/// ellipsoid. The longitude is always normalized into (-π, π]; the latitude is
/// stored as given.
///
/// Two points are equal only if all three fields match exactly, altitude
/// included.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[cfg_attr(feature = "serde", serde(from = "GeodeticFields"))]
pub struct Geodetic {
    latitude: f64,
    longitude: f64,
    altitude: f64,
}

/// Unchecked field layout used to re-normalize deserialized points.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeodeticFields {
    latitude: f64,
    longitude: f64,
    altitude: f64,
}

#[cfg(feature = "serde")]
impl From<GeodeticFields> for Geodetic {
    fn from(fields: GeodeticFields) -> Self {
        Self::new(fields.latitude, fields.longitude, fields.altitude)
    }
}

impl Geodetic {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude: normalize_radians_pi(longitude),
            altitude,
        }
    }

    /// Build a point from decimal radians, normalizing the longitude before
    /// narrowing to `f64`.
    pub fn from_decimal_radians(latitude: Decimal, longitude: Decimal, altitude: f64) -> Self {
        let longitude = normalize_decimal_radians_pi(longitude);
        Self {
            latitude: latitude.to_f64().unwrap_or(f64::NAN),
            longitude: longitude.to_f64().unwrap_or(f64::NAN),
            altitude,
        }
    }

    /// Build a point from degrees. The conversion to radians is done in
    /// decimal arithmetic.
    ///
    /// Non-finite degrees fall back to plain `f64` conversion.
    pub fn from_degrees(latitude: f64, longitude: f64, altitude: f64) -> Self {
        match (to_decimal(latitude), to_decimal(longitude)) {
            (Some(latitude), Some(longitude)) => {
                let d2r = decimal_degrees_to_radians();
                Self::from_decimal_radians(latitude * d2r, longitude * d2r, altitude)
            }
            _ => Self::new(latitude.to_radians(), longitude.to_radians(), altitude),
        }
    }

    /// Latitude in radians.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in radians, within (-π, π].
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Altitude in metres.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn latitude_degrees(&self) -> f64 {
        self.latitude * RADIANS_TO_DEGREES
    }

    pub fn longitude_degrees(&self) -> f64 {
        self.longitude * RADIANS_TO_DEGREES
    }

    /// Same position with a different altitude.
    #[must_use]
    pub fn set_altitude(&self, altitude: f64) -> Self {
        Self { altitude, ..*self }
    }

    /// Distance from the centre of the datum to its surface at this latitude.
    pub fn geocentric_radius(&self, datum: &Datum) -> f64 {
        let a2 = datum.semi_major_axis() * datum.semi_major_axis();
        let b2 = datum.semi_minor_axis() * datum.semi_minor_axis();
        let (sin_lat, cos_lat) = self.latitude.sin_cos();
        let a2_cos_lat2 = a2 * cos_lat * cos_lat;
        let b2_sin_lat2 = b2 * sin_lat * sin_lat;
        ((a2 * a2_cos_lat2 + b2 * b2_sin_lat2) / (a2_cos_lat2 + b2_sin_lat2)).sqrt()
    }

    /// Geocentric position of this point.
    pub fn to_ecef(&self, datum: &Datum) -> Ecef {
        let e2 = datum.first_eccentricity_squared();
        let (sin_lat, cos_lat) = self.latitude.sin_cos();
        let (sin_lon, cos_lon) = self.longitude.sin_cos();
        let n = datum.semi_major_axis() / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let nh_cos_lat = (n + self.altitude) * cos_lat;
        Ecef::new(
            nh_cos_lat * cos_lon,
            nh_cos_lat * sin_lon,
            ((1.0 - e2) * n + self.altitude) * sin_lat,
        )
    }

    /// Geocentric position of this point, treating the altitude as height
    /// above the geoid.
    pub fn to_ecef_with_geoid(&self, datum: &Datum, geoid: &dyn Geoid) -> Ecef {
        let separation = geoid.separation(self);
        trace!("Geoid separation at {self}: {separation}m");
        self.set_altitude(self.altitude + separation).to_ecef(datum)
    }

    /// This point in the North-East-Down frame centred on `reference`.
    pub fn to_ned(&self, reference: &Geodetic, datum: &Datum) -> LocalTangentPlane {
        let relative = self.to_ecef(datum) - reference.to_ecef(datum);
        relative.to_ned(reference)
    }

    /// Like [`to_ned`](Self::to_ned), with a precomputed reference position.
    ///
    /// Fails with [`Error::RelativeReference`] if `reference_ecef` is not an
    /// absolute position.
    pub fn to_ned_from(
        &self,
        reference: &Geodetic,
        reference_ecef: &Ecef,
        datum: &Datum,
        geoid: Option<&dyn Geoid>,
    ) -> Result<LocalTangentPlane, Error> {
        if !reference_ecef.is_absolute() {
            return Err(Error::RelativeReference);
        }
        let ecef = match geoid {
            Some(geoid) => self.to_ecef_with_geoid(datum, geoid),
            None => self.to_ecef(datum),
        };
        Ok((ecef - *reference_ecef).to_ned(reference))
    }

    /// Like [`to_ned`](Self::to_ned), with both altitudes taken relative to
    /// the geoid.
    pub fn to_ned_with_geoid(
        &self,
        reference: &Geodetic,
        datum: &Datum,
        geoid: &dyn Geoid,
    ) -> LocalTangentPlane {
        let relative =
            self.to_ecef_with_geoid(datum, geoid) - reference.to_ecef_with_geoid(datum, geoid);
        relative.to_ned(reference)
    }
}

/// Bit pattern with both zeros folded together, so `Eq` and `Hash` agree.
fn field_bits(value: f64) -> u64 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

impl PartialEq for Geodetic {
    fn eq(&self, other: &Self) -> bool {
        field_bits(self.latitude) == field_bits(other.latitude)
            && field_bits(self.longitude) == field_bits(other.longitude)
            && field_bits(self.altitude) == field_bits(other.altitude)
    }
}

impl Eq for Geodetic {}

impl Hash for Geodetic {
    fn hash<H: Hasher>(&self, state: &mut H) {
        field_bits(self.latitude).hash(state);
        field_bits(self.longitude).hash(state);
        field_bits(self.altitude).hash(state);
    }
}

impl From<Geodetic> for (f64, f64, f64) {
    fn from(point: Geodetic) -> Self {
        (point.latitude, point.longitude, point.altitude)
    }
}
