//! Error types for field resolution.

use chrono::{DateTime, Utc};
use thiserror::Error;

use era5_archive::ArchiveError;
use grid_resample::ResampleError;

/// Errors that can occur while resolving a derived field.
///
/// An instant outside archive coverage is not an error; the resolver
/// returns `Ok(None)` so callers can skip silently.
#[derive(Error, Debug)]
pub enum FieldError {
    /// The requested field name is not known. Raised before any I/O.
    #[error("unknown field: {0}")]
    UnsupportedField(String),

    /// Archive-level failure (missing variable, unavailable timestep, I/O).
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Resampling failure.
    #[error("resampling error: {0}")]
    Resample(#[from] ResampleError),

    /// A timestep needed for flux accumulation could not be read.
    #[error("coverage gap accumulating {variable} over {window_hours} h from {start}")]
    CoverageGap {
        variable: String,
        start: DateTime<Utc>,
        window_hours: f64,
    },

    /// Mismatched array shape when assembling a field.
    #[error("field shape error: {0}")]
    Shape(#[from] meteo_common::FieldShapeError),

    /// Invalid sub-window of the target grid.
    #[error("target window error: {0}")]
    Window(#[from] meteo_common::RectangleError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type for field resolution.
pub type FieldResult<T> = std::result::Result<T, FieldError>;
