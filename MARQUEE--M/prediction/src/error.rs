use thiserror::Error;

/// Reasons a movie record fails strict validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Field must be strictly positive.
    #[error("{field} must be positive (got {value})")]
    NonPositive {
        /// Offending field.
        field: &'static str,
        /// Supplied value.
        value: f64,
    },
    /// Field is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite {
        /// Offending field.
        field: &'static str,
    },
    /// Field lies outside its closed range.
    #[error("{field} must be within {min}..={max} (got {value})")]
    OutOfRange {
        /// Offending field.
        field: &'static str,
        /// Supplied value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// Release month is not a calendar month.
    #[error("release month must be within 1..=12 (got {0})")]
    ReleaseMonth(i32),
}

/// Errors surfaced by the strict prediction path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    /// The movie record was rejected before scoring.
    #[error("invalid movie input: {0}")]
    InvalidInput(#[from] ValidationError),
}

impl PredictionError {
    /// Name of the field that caused the rejection.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidInput(err) => err.field(),
        }
    }
}

impl ValidationError {
    /// Name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NonPositive { field, .. }
            | Self::NotFinite { field }
            | Self::OutOfRange { field, .. } => *field,
            Self::ReleaseMonth(_) => "releaseMonth",
        }
    }
}
