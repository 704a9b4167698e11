//! ERA5 reanalysis archive reader.
//!
//! This crate provides scoped, decode-on-read access to ERA5 single-level
//! NetCDF archives: a 1-D CF time axis convertible to absolute timestamps
//! and named 2-D-per-timestep variables, each carrying a linear scale,
//! offset and no-data sentinel.
//!
//! # Implementation Notes
//!
//! Uses the `netcdf` crate for direct file reading.
//! System requirements: libhdf5-dev libnetcdf-dev.
//!
//! Missing archive variables surface as a typed [`ArchiveError::VariableNotFound`],
//! and a variable that exists but ends before a requested timestep surfaces
//! as the distinct [`ArchiveError::TimeIndexUnavailable`].

pub mod archive;
pub mod error;
pub mod units;

pub use archive::Era5Archive;
pub use error::{ArchiveError, ArchiveResult};
pub use units::TimeUnits;
