//! Derived surface meteorology from ERA5 reanalysis archives.
//!
//! Produces analysis-ready fields (air temperature at blending height,
//! vapour pressure, surface pressure, wind speed, clear-sky radiation and
//! daily mean irradiance) on an arbitrary target grid, from the raw hourly
//! variables of a reanalysis archive. The pipeline brackets the requested
//! instant on the archive time axis, blends the bracketing layers, derives
//! the physical quantity and warps it onto the target geometry.

pub mod accumulate;
pub mod config;
pub mod error;
pub mod interp;
pub mod physics;
pub mod resolver;

pub use config::ResolverConfig;
pub use error::{FieldError, FieldResult};
pub use resolver::{FieldRequest, FieldResolver, MeteoField};
