//! Spatial resampling and reprojection of physical fields.
//!
//! Reanalysis fields arrive on a coarse geographic grid; the consumers of
//! the derived meteorology work on arbitrary template grids (typically UTM
//! Sentinel-2 tiles), possibly restricted to a pixel sub-window. This crate
//! maps each target pixel back into the source grid through geographic
//! coordinates and interpolates there, with map projections implemented
//! from scratch.

pub mod interpolation;
pub mod transverse_mercator;
pub mod warp;

pub use interpolation::{bilinear_interpolate, cubic_interpolate, nearest_interpolate};
pub use transverse_mercator::TransverseMercator;
pub use warp::{warp_to_template, ResampleError, ResampleMethod};
