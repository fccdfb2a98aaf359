use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core.
///
/// Degenerate predictions (zero relative velocity, negative discriminant)
/// are not errors; they resolve to "no event". The variants here cover the
/// fail-fast construction path and numeric anomalies from bad caller input.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid construction or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Numerical anomaly (a NaN or non-finite time reaching the schedule).
    #[error("numerical error: {0}")]
    MathError(String),
}
