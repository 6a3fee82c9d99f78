use std::hash::{Hash, Hasher};

use crate::Geodetic;

/// A reference ellipsoid, described by its semi-major axis and flattening.
///
/// Equality and hashing compare the exact bit patterns of both parameters so
/// that a datum can key the geodesic solver cache.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Datum {
    semi_major_axis: f64,
    flattening: f64,
}

impl Datum {
    /// World Geodetic System 1984, the default datum.
    pub const WGS84: Self = Self::new(6_378_137.0, 1.0 / 298.257_223_563);

    /// Geodetic Reference System 1980.
    pub const GRS80: Self = Self::new(6_378_137.0, 1.0 / 298.257_222_101);

    pub const fn new(semi_major_axis: f64, flattening: f64) -> Self {
        Self {
            semi_major_axis,
            flattening,
        }
    }

    /// Equatorial radius in metres.
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    pub fn flattening(&self) -> f64 {
        self.flattening
    }

    /// Polar radius in metres.
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.flattening)
    }

    pub fn first_eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::WGS84
    }
}

impl PartialEq for Datum {
    fn eq(&self, other: &Self) -> bool {
        self.semi_major_axis.to_bits() == other.semi_major_axis.to_bits()
            && self.flattening.to_bits() == other.flattening.to_bits()
    }
}

impl Eq for Datum {}

impl Hash for Datum {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.semi_major_axis.to_bits().hash(state);
        self.flattening.to_bits().hash(state);
    }
}

/// A geoid model giving the separation between the geoid and the ellipsoid.
pub trait Geoid {
    /// Geoid height above the ellipsoid at `location`, in metres.
    fn separation(&self, location: &Geodetic) -> f64;
}

impl<F: Fn(&Geodetic) -> f64> Geoid for F {
    fn separation(&self, location: &Geodetic) -> f64 {
        self(location)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn wgs84_parameters() {
        let datum = Datum::WGS84;
        assert_relative_eq!(datum.semi_minor_axis(), 6_356_752.314_245, epsilon = 1e-6);
        assert_relative_eq!(
            datum.first_eccentricity_squared(),
            0.006_694_379_990_14,
            epsilon = 1e-14
        );
        assert_eq!(Datum::default(), Datum::WGS84);
    }

    #[test]
    fn equality_and_hash() {
        assert_ne!(Datum::WGS84, Datum::GRS80);

        let datums: HashSet<Datum> = [Datum::WGS84, Datum::GRS80, Datum::WGS84]
            .into_iter()
            .collect();
        assert_eq!(datums.len(), 2);
    }

    #[test]
    fn closure_geoid() {
        let geoid = |_: &Geodetic| 47.5;
        assert_eq!(geoid.separation(&Geodetic::new(0.1, 0.2, 0.0)), 47.5);
    }
}
