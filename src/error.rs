/// Errors reported by geodetic conversions and geodesic operations.
///
/// Malformed coordinate text is not an error of this type when going through
/// [`Geodetic::parse`](crate::Geodetic::parse), which returns `None` instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A relative ECEF vector was passed where an absolute origin is required.
    #[error("Relative ECEF positions cannot be used as reference origin")]
    RelativeReference,
    /// Vector travel did not reach the requested chord length.
    #[error("Vector travel did not converge after {iterations} iterations (residual {residual} m)")]
    ConvergenceFailure { iterations: usize, residual: f64 },
    /// Coordinate text that could not be parsed (only used by `FromStr`).
    #[error("Invalid coordinate: \"{0}\"")]
    InvalidCoordinate(String),
}
