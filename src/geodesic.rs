//! Travel and distance along the ellipsoid.
//!
//! The direct and inverse geodesic problems are delegated to a
//! [`GeodesicSolver`], by default the `geographiclib-rs` implementation of
//! Karney's algorithms. Solvers are created lazily, once per datum, and kept in
//! a [`GeodesicCache`] owned by the caller.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use geographiclib_rs::{DirectGeodesic, Geodesic, InverseGeodesic};
use log::{debug, trace};

use crate::{
    Datum, Error, Geodetic,
    angle::{DEGREES_TO_RADIANS, RADIANS_TO_DEGREES},
};

/// Chord length tolerance of vector travel, in metres.
const VECTOR_TRAVEL_ACCURACY: f64 = 1e-8;

/// Default iteration bound of vector travel.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Solver for the direct and inverse geodesic problems on one ellipsoid.
///
/// All angles are in degrees, distances in metres.
pub trait GeodesicSolver: Send + Sync {
    /// Construct a solver for `datum`.
    fn for_datum(datum: &Datum) -> Self
    where
        Self: Sized;

    /// Travel `distance` metres from (`lat1`, `lon1`) at azimuth `azi1`.
    ///
    /// Returns `(lat2, lon2, azi2)`.
    fn solve_direct(&self, lat1: f64, lon1: f64, azi1: f64, distance: f64) -> (f64, f64, f64);

    /// Shortest path between two points.
    ///
    /// Returns `(distance, azi1, azi2)`.
    fn solve_inverse(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> (f64, f64, f64);
}

impl GeodesicSolver for Geodesic {
    fn for_datum(datum: &Datum) -> Self {
        Geodesic::new(datum.semi_major_axis(), datum.flattening())
    }

    fn solve_direct(&self, lat1: f64, lon1: f64, azi1: f64, distance: f64) -> (f64, f64, f64) {
        DirectGeodesic::direct(self, lat1, lon1, azi1, distance)
    }

    fn solve_inverse(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> (f64, f64, f64) {
        // The three-value form yields (azi1, azi2, a12)
        let (distance, azi1, azi2, _): (f64, f64, f64, f64) =
            InverseGeodesic::inverse(self, lat1, lon1, lat2, lon2);
        (distance, azi1, azi2)
    }
}

/// Convert an azimuth in degrees into a heading in radians within [0, 2π).
fn heading(azimuth: f64) -> f64 {
    let azimuth = if azimuth < 0.0 { azimuth + 360.0 } else { azimuth };
    azimuth * DEGREES_TO_RADIANS
}

/// Geodesic operations backed by one lazily created solver per datum.
///
/// The cache is safe to share between threads; a solver is constructed at
/// most once per datum.
pub struct GeodesicCache<S = Geodesic> {
    solvers: Mutex<HashMap<Datum, Arc<S>>>,
    max_iterations: usize,
}

impl<S: GeodesicSolver> Default for GeodesicCache<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GeodesicSolver> GeodesicCache<S> {
    pub fn new() -> Self {
        Self {
            solvers: Mutex::new(HashMap::new()),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Set the iteration bound of [`vector_travel`](Self::vector_travel).
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Number of solvers created so far.
    pub fn len(&self) -> usize {
        self.solvers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The solver for `datum`, created on first use.
    pub fn solver(&self, datum: &Datum) -> Arc<S> {
        let mut solvers = self.solvers.lock().unwrap_or_else(PoisonError::into_inner);
        let solver = solvers.entry(*datum).or_insert_with(|| {
            debug!("Creating geodesic solver for {datum:?}");
            Arc::new(S::for_datum(datum))
        });
        Arc::clone(solver)
    }

    fn direct(&self, point: &Geodetic, heading: f64, distance: f64, datum: &Datum) -> (Geodetic, f64) {
        let (latitude, longitude, azimuth) = self.solver(datum).solve_direct(
            point.latitude() * RADIANS_TO_DEGREES,
            point.longitude() * RADIANS_TO_DEGREES,
            heading * RADIANS_TO_DEGREES,
            distance,
        );
        let destination = Geodetic::new(
            latitude * DEGREES_TO_RADIANS,
            longitude * DEGREES_TO_RADIANS,
            point.altitude(),
        );
        (destination, azimuth)
    }

    fn inverse(&self, point: &Geodetic, destination: &Geodetic, datum: &Datum) -> (f64, f64, f64) {
        self.solver(datum).solve_inverse(
            point.latitude() * RADIANS_TO_DEGREES,
            point.longitude() * RADIANS_TO_DEGREES,
            destination.latitude() * RADIANS_TO_DEGREES,
            destination.longitude() * RADIANS_TO_DEGREES,
        )
    }

    /// Travel `distance` metres along the surface from `point`, starting at
    /// `heading` radians. The altitude is carried over unchanged.
    pub fn surface_travel(
        &self,
        point: &Geodetic,
        heading: f64,
        distance: f64,
        datum: &Datum,
    ) -> Geodetic {
        self.direct(point, heading, distance, datum).0
    }

    /// Like [`surface_travel`](Self::surface_travel), also returning the
    /// heading at the destination in [0, 2π).
    pub fn surface_travel_with_heading(
        &self,
        point: &Geodetic,
        heading: f64,
        distance: f64,
        datum: &Datum,
    ) -> (Geodetic, f64) {
        let (destination, azimuth) = self.direct(point, heading, distance, datum);
        (destination, self::heading(azimuth))
    }

    /// Surface distance in metres between two points.
    pub fn surface_distance(&self, point: &Geodetic, destination: &Geodetic, datum: &Datum) -> f64 {
        self.inverse(point, destination, datum).0
    }

    /// Surface distance and initial heading in [0, 2π).
    pub fn surface_distance_with_heading(
        &self,
        point: &Geodetic,
        destination: &Geodetic,
        datum: &Datum,
    ) -> (f64, f64) {
        let (distance, initial, _) = self.inverse(point, destination, datum);
        (distance, heading(initial))
    }

    /// Surface distance with initial and final heading, both in [0, 2π).
    pub fn surface_distance_with_headings(
        &self,
        point: &Geodetic,
        destination: &Geodetic,
        datum: &Datum,
    ) -> (f64, f64, f64) {
        let (distance, initial, last) = self.inverse(point, destination, datum);
        (distance, heading(initial), heading(last))
    }

    /// Travel from `point` at `heading` until the straight-line (chord)
    /// distance to the start is `vector_distance` metres.
    ///
    /// Both ends are taken on the ellipsoid surface, so the destination has
    /// zero altitude. Fails with [`Error::ConvergenceFailure`] if the chord
    /// length is not matched within the iteration bound.
    pub fn vector_travel(
        &self,
        point: &Geodetic,
        heading: f64,
        vector_distance: f64,
        datum: &Datum,
    ) -> Result<Geodetic, Error> {
        let origin = point.set_altitude(0.0).to_ecef(datum);
        let mut surface_distance = vector_distance;
        let mut residual = f64::MAX;

        for iteration in 0..self.max_iterations {
            let destination = self
                .surface_travel(point, heading, surface_distance, datum)
                .set_altitude(0.0);
            residual = vector_distance - origin.distance_from(&destination.to_ecef(datum));
            trace!("Vector travel iteration {iteration}: surface {surface_distance}m, residual {residual}m");
            if residual.abs() < VECTOR_TRAVEL_ACCURACY {
                return Ok(destination);
            }
            surface_distance += residual;
        }

        debug!("Vector travel of {vector_distance}m did not converge (residual {residual}m)");
        Err(Error::ConvergenceFailure {
            iterations: self.max_iterations,
            residual,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        f64::consts::PI,
        sync::atomic::{AtomicUsize, Ordering},
        thread,
    };

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn heading_range() {
        assert_eq!(heading(0.0), 0.0);
        assert_abs_diff_eq!(heading(90.0), PI / 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(heading(-90.0), 3.0 * PI / 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(heading(-180.0), PI, epsilon = 1e-15);
        assert!(heading(-1e-12) < 2.0 * PI);
    }

    /// Solver that never moves and reports fixed headings.
    struct StubSolver;

    impl GeodesicSolver for StubSolver {
        fn for_datum(_: &Datum) -> Self {
            StubSolver
        }

        fn solve_direct(&self, lat1: f64, lon1: f64, azi1: f64, _: f64) -> (f64, f64, f64) {
            (lat1, lon1, azi1)
        }

        fn solve_inverse(&self, _: f64, _: f64, _: f64, _: f64) -> (f64, f64, f64) {
            (0.0, -90.0, -45.0)
        }
    }

    static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

    struct CountingSolver(StubSolver);

    impl GeodesicSolver for CountingSolver {
        fn for_datum(datum: &Datum) -> Self {
            CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
            CountingSolver(StubSolver::for_datum(datum))
        }

        fn solve_direct(&self, lat1: f64, lon1: f64, azi1: f64, distance: f64) -> (f64, f64, f64) {
            self.0.solve_direct(lat1, lon1, azi1, distance)
        }

        fn solve_inverse(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> (f64, f64, f64) {
            self.0.solve_inverse(lat1, lon1, lat2, lon2)
        }
    }

    #[test]
    fn solver_created_once_per_datum() {
        let cache: Arc<GeodesicCache<CountingSolver>> = Arc::new(GeodesicCache::new());
        assert!(cache.is_empty());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let datum = if i % 2 == 0 { Datum::WGS84 } else { Datum::GRS80 };
                    cache.solver(&datum);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 2);
        assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn headings_are_normalized() {
        let cache: GeodesicCache<StubSolver> = GeodesicCache::new();
        let a = Geodetic::new(0.1, 0.2, 0.0);
        let (_, initial, last) = cache.surface_distance_with_headings(&a, &a, &Datum::WGS84);
        assert_abs_diff_eq!(initial, 3.0 * PI / 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(last, 7.0 * PI / 4.0, epsilon = 1e-15);
    }

    #[test]
    fn vector_travel_reports_non_convergence() {
        // The stub solver never moves, so the chord stays at zero
        let cache: GeodesicCache<StubSolver> = GeodesicCache::new().with_max_iterations(5);
        let result = cache.vector_travel(&Geodetic::new(0.1, 0.2, 0.0), 1.0, 1000.0, &Datum::WGS84);
        let Err(Error::ConvergenceFailure { iterations, residual }) = result else {
            panic!("unexpected result {result:?}");
        };
        assert_eq!(iterations, 5);
        assert_abs_diff_eq!(residual, 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn geographiclib_inverse_along_equator() {
        let solver = Geodesic::for_datum(&Datum::WGS84);
        let (distance, azi1, azi2) = solver.solve_inverse(0.0, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(distance, 6_378_137.0 * DEGREES_TO_RADIANS, epsilon = 1e-6);
        assert_abs_diff_eq!(azi1, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(azi2, 90.0, epsilon = 1e-9);

        let (distance, azi1, azi2) = solver.solve_inverse(1.0, 0.0, 0.0, 0.0);
        assert!(distance > 110_000.0 && distance < 111_000.0);
        assert_abs_diff_eq!(azi1.abs(), 180.0, epsilon = 1e-9);
        assert_abs_diff_eq!(azi2.abs(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn geographiclib_direct_inverse_agree() {
        let solver = Geodesic::for_datum(&Datum::WGS84);
        let (lat2, lon2, azi2) = solver.solve_direct(40.0, -73.0, 50.0, 1_000_000.0);
        let (distance, azi1, back_azi2) = solver.solve_inverse(40.0, -73.0, lat2, lon2);
        assert_abs_diff_eq!(distance, 1_000_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(azi1, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(back_azi2, azi2, epsilon = 1e-9);
    }

    #[test]
    fn surface_travel_keeps_altitude() {
        let cache = GeodesicCache::<Geodesic>::new();
        let start = Geodetic::from_degrees(47.0, 8.0, 1234.5);
        let end = cache.surface_travel(&start, PI / 2.0, 10_000.0, &Datum::WGS84);
        assert_eq!(end.altitude(), 1234.5);
        assert!(end.longitude() > start.longitude());
    }

    #[test]
    fn zero_distance_travel() {
        let cache = GeodesicCache::<Geodesic>::new();
        let start = Geodetic::from_degrees(-12.5, 130.25, 0.0);
        let end = cache.surface_travel(&start, 1.0, 0.0, &Datum::WGS84);
        assert_abs_diff_eq!(end.latitude(), start.latitude(), epsilon = 1e-15);
        assert_abs_diff_eq!(end.longitude(), start.longitude(), epsilon = 1e-15);
    }
}
