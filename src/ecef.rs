use std::{fmt, ops::Sub};

use crate::{Datum, Geodetic};

/// Iteration limit of the geocentric to geodetic latitude refinement.
const MAX_LATITUDE_ITERATIONS: usize = 16;

/// An Earth-Centered, Earth-Fixed position or displacement in metres.
///
/// Positions are *absolute*; the difference of two positions is a *relative*
/// vector, which can be rotated into a local tangent plane but cannot itself
/// serve as a reference origin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Ecef {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    absolute: bool,
}

impl Ecef {
    /// An absolute geocentric position.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            absolute: true,
        }
    }

    /// A displacement between two geocentric positions.
    pub fn relative(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            absolute: false,
        }
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Euclidean length of the vector.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Straight-line distance between two positions.
    pub fn distance_from(&self, other: &Ecef) -> f64 {
        (*self - *other).magnitude()
    }

    /// Rotate this vector into the North-East-Down frame at `reference`.
    pub fn to_ned(&self, reference: &Geodetic) -> LocalTangentPlane {
        let (sin_lat, cos_lat) = reference.latitude().sin_cos();
        let (sin_lon, cos_lon) = reference.longitude().sin_cos();
        let (x, y, z) = (self.x, self.y, self.z);
        LocalTangentPlane {
            north: -sin_lat * cos_lon * x - sin_lat * sin_lon * y + cos_lat * z,
            east: -sin_lon * x + cos_lon * y,
            down: -cos_lat * cos_lon * x - cos_lat * sin_lon * y - sin_lat * z,
        }
    }

    /// Convert an absolute position back to geodetic coordinates.
    pub fn to_geodetic(&self, datum: &Datum) -> Geodetic {
        let a = datum.semi_major_axis();
        let e2 = datum.first_eccentricity_squared();
        let p = self.x.hypot(self.y);
        let longitude = self.y.atan2(self.x);

        let mut latitude = self.z.atan2(p * (1.0 - e2));
        for _ in 0..MAX_LATITUDE_ITERATIONS {
            let sin_lat = latitude.sin();
            let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
            let next = (self.z + e2 * n * sin_lat).atan2(p);
            let done = (next - latitude).abs() < 1e-15;
            latitude = next;
            if done {
                break;
            }
        }

        let (sin_lat, cos_lat) = latitude.sin_cos();
        let altitude = p * cos_lat + self.z * sin_lat - a * (1.0 - e2 * sin_lat * sin_lat).sqrt();
        Geodetic::new(latitude, longitude, altitude)
    }
}

impl Sub for Ecef {
    type Output = Ecef;

    fn sub(self, rhs: Ecef) -> Ecef {
        Ecef::relative(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Ecef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "X:{}m Y:{}m Z:{}m", self.x, self.y, self.z)
    }
}

/// A position in the local North-East-Down frame, in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalTangentPlane {
    pub north: f64,
    pub east: f64,
    pub down: f64,
}
