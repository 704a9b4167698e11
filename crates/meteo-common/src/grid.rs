//! Physical grid geometry.

use crate::crs::Crs;
use crate::rect::Rectangle;
use serde::{Deserialize, Serialize};

/// Tolerance for comparing grid geometries.
///
/// Covers both degree-valued (geographic) and meter-valued (UTM) grids.
const ALIGN_TOL: f64 = 1e-6;

/// A physical grid descriptor: origin of the top-left cell edge, signed pixel
/// sizes and a spatial reference.
///
/// `pixel_y` is negative for north-up grids (Y decreases with row index),
/// matching the GDAL geotransform convention the archives use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoGrid {
    /// X coordinate of the top-left corner (cell edge, not center).
    pub origin_x: f64,
    /// Y coordinate of the top-left corner (cell edge, not center).
    pub origin_y: f64,
    /// Pixel size in X, signed.
    pub pixel_x: f64,
    /// Pixel size in Y, signed (typically negative).
    pub pixel_y: f64,
    /// Spatial reference of the grid coordinates.
    pub crs: Crs,
}

impl GeoGrid {
    pub fn new(origin_x: f64, origin_y: f64, pixel_x: f64, pixel_y: f64, crs: Crs) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_x,
            pixel_y,
            crs,
        }
    }

    /// Coordinates of the center of pixel (col, row). Indices may be
    /// fractional.
    pub fn pixel_to_coords(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + (col + 0.5) * self.pixel_x,
            self.origin_y + (row + 0.5) * self.pixel_y,
        )
    }

    /// Fractional pixel indices of a coordinate, relative to pixel centers.
    pub fn coords_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.origin_x) / self.pixel_x - 0.5,
            (y - self.origin_y) / self.pixel_y - 0.5,
        )
    }

    /// Two grids are aligned only if origin, pixel size and reference all
    /// match within floating tolerance.
    pub fn aligned_with(&self, other: &GeoGrid) -> bool {
        self.crs == other.crs
            && (self.origin_x - other.origin_x).abs() <= ALIGN_TOL
            && (self.origin_y - other.origin_y).abs() <= ALIGN_TOL
            && (self.pixel_x - other.pixel_x).abs() <= ALIGN_TOL
            && (self.pixel_y - other.pixel_y).abs() <= ALIGN_TOL
    }

    /// The geometry of a pixel sub-window of this grid: same pixel size and
    /// reference, origin shifted to the window's top-left corner.
    pub fn windowed(&self, rect: &Rectangle) -> GeoGrid {
        GeoGrid {
            origin_x: self.origin_x + rect.x_off() as f64 * self.pixel_x,
            origin_y: self.origin_y + rect.y_off() as f64 * self.pixel_y,
            ..*self
        }
    }
}
