//! Resampling of physical fields onto a target grid geometry.

use serde::{Deserialize, Serialize};
use tracing::debug;

use meteo_common::{Crs, GeoGrid, PhysicalField, Rectangle};

use crate::interpolation::{bilinear_interpolate, cubic_interpolate, nearest_interpolate};
use crate::transverse_mercator::TransverseMercator;

/// Resampling algorithm used when warping onto the target grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResampleMethod {
    /// Nearest neighbor (preserves exact values).
    Nearest,
    /// Bilinear interpolation.
    Bilinear,
    /// Bicubic interpolation (smoothest, the archive default).
    #[default]
    Cubic,
}

impl std::str::FromStr for ResampleMethod {
    type Err = ResampleError;

    /// Parse a method name (case-insensitive). "cubicspline" is accepted as
    /// the warp-tool spelling of the cubic kernel.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "bilinear" => Ok(Self::Bilinear),
            "cubic" | "cubicspline" => Ok(Self::Cubic),
            _ => Err(ResampleError::UnknownMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for ResampleMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Bilinear => write!(f, "bilinear"),
            Self::Cubic => write!(f, "cubic"),
        }
    }
}

/// Errors from the resampler.
#[derive(Debug, thiserror::Error)]
pub enum ResampleError {
    #[error("window {window:?} exceeds template grid {width}x{height}")]
    WindowOutOfBounds {
        window: Rectangle,
        width: usize,
        height: usize,
    },

    #[error("source field is empty")]
    EmptySource,

    #[error("unknown resampling method: {0}")]
    UnknownMethod(String),
}

/// Convert a coordinate in `crs` to geographic (lon, lat) degrees.
fn to_geographic(crs: &Crs, x: f64, y: f64) -> (f64, f64) {
    match crs {
        Crs::Geographic => (x, y),
        Crs::Utm { zone, north } => TransverseMercator::utm_zone(*zone, *north).inverse(x, y),
    }
}

/// Convert geographic (lon, lat) degrees to a coordinate in `crs`.
fn from_geographic(crs: &Crs, lon: f64, lat: f64) -> (f64, f64) {
    match crs {
        Crs::Geographic => (lon, lat),
        Crs::Utm { zone, north } => TransverseMercator::utm_zone(*zone, *north).forward(lon, lat),
    }
}

/// Resample a field onto a template grid's geometry, optionally restricted
/// to a pixel window of the template.
///
/// The template geometry is authoritative: the output has the template's
/// pixel size and origin (shifted by the window's pixel offset when a window
/// is given) and the window's extent. Each output pixel is located in the
/// source grid by inverse mapping through geographic coordinates, so sources
/// on a different spatial reference are reprojected, not merely resampled.
///
/// Resampling a field that is already aligned to the template reproduces it
/// within floating tolerance: the inverse mapping then lands on exact source
/// pixel centers and every kernel is exact at grid points.
pub fn warp_to_template(
    source: &PhysicalField,
    template: &GeoGrid,
    template_width: usize,
    template_height: usize,
    window: Option<&Rectangle>,
    method: ResampleMethod,
) -> Result<PhysicalField, ResampleError> {
    if source.is_empty() {
        return Err(ResampleError::EmptySource);
    }

    let (out_grid, out_width, out_height) = match window {
        Some(rect) => {
            if !rect.fits(template_width, template_height) {
                return Err(ResampleError::WindowOutOfBounds {
                    window: *rect,
                    width: template_width,
                    height: template_height,
                });
            }
            (template.windowed(rect), rect.width(), rect.height())
        }
        None => (*template, template_width, template_height),
    };

    debug!(
        method = %method,
        source_crs = %source.grid().crs,
        target_crs = %template.crs,
        out_width,
        out_height,
        "warping field to template grid"
    );

    let same_crs = source.grid().crs == template.crs;
    let data = source.data();
    let src_grid = source.grid();
    let (src_w, src_h) = (source.width(), source.height());

    let mut output = vec![f32::NAN; out_width * out_height];
    for out_y in 0..out_height {
        for out_x in 0..out_width {
            let (tx, ty) = out_grid.pixel_to_coords(out_x as f64, out_y as f64);
            let (sx, sy) = if same_crs {
                (tx, ty)
            } else {
                let (lon, lat) = to_geographic(&template.crs, tx, ty);
                from_geographic(&src_grid.crs, lon, lat)
            };
            let (col, row) = src_grid.coords_to_pixel(sx, sy);

            output[out_y * out_width + out_x] = match method {
                ResampleMethod::Nearest => nearest_interpolate(data, src_w, src_h, col, row),
                ResampleMethod::Bilinear => bilinear_interpolate(data, src_w, src_h, col, row),
                ResampleMethod::Cubic => cubic_interpolate(data, src_w, src_h, col, row),
            };
        }
    }

    Ok(PhysicalField::new(output, out_width, out_height, out_grid)
        .expect("output sized to out_width * out_height"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_field() -> PhysicalField {
        // 4x4 geographic grid, one degree pixels, origin at (0E, 4N).
        let grid = GeoGrid::new(0.0, 4.0, 1.0, -1.0, Crs::Geographic);
        let data: Vec<f32> = (0..16).map(|i| i as f32).collect();
        PhysicalField::new(data, 4, 4, grid).unwrap()
    }

    #[test]
    fn test_identity_warp_is_idempotent() {
        let field = source_field();
        for method in [
            ResampleMethod::Nearest,
            ResampleMethod::Bilinear,
            ResampleMethod::Cubic,
        ] {
            let out = warp_to_template(&field, field.grid(), 4, 4, None, method).unwrap();
            for (a, b) in field.data().iter().zip(out.data()) {
                assert!((a - b).abs() < 1e-4, "{method}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_window_offsets_origin_and_extent() {
        let field = source_field();
        let rect = Rectangle::new(1, 1, 2, 2).unwrap();
        let out =
            warp_to_template(&field, field.grid(), 4, 4, Some(&rect), ResampleMethod::Bilinear)
                .unwrap();

        assert_eq!(out.width(), 2);
        assert_eq!(out.height(), 2);
        assert!((out.grid().origin_x - 1.0).abs() < 1e-12);
        assert!((out.grid().origin_y - 3.0).abs() < 1e-12);
        assert_eq!(out.get(0, 0), Some(5.0));
        assert_eq!(out.get(1, 1), Some(10.0));
    }

    #[test]
    fn test_window_out_of_bounds() {
        let field = source_field();
        let rect = Rectangle::new(3, 3, 2, 2).unwrap();
        let err = warp_to_template(&field, field.grid(), 4, 4, Some(&rect), ResampleMethod::Cubic);
        assert!(matches!(err, Err(ResampleError::WindowOutOfBounds { .. })));
    }

    #[test]
    fn test_reproject_to_utm_template() {
        // A constant field must stay constant through a genuine reprojection.
        let grid = GeoGrid::new(10.0, 50.0, 0.25, -0.25, Crs::Geographic);
        let field = PhysicalField::filled(283.15, 40, 40, grid);

        // A small UTM zone 33N template inside the source footprint.
        let tm = TransverseMercator::utm_zone(33, true);
        let (e, n) = tm.forward(14.0, 47.0);
        let template = GeoGrid::new(
            e,
            n,
            100.0,
            -100.0,
            Crs::Utm {
                zone: 33,
                north: true,
            },
        );

        let out = warp_to_template(&field, &template, 16, 16, None, ResampleMethod::Cubic).unwrap();
        assert_eq!(out.width(), 16);
        for v in out.data() {
            assert!((v - 283.15).abs() < 1e-3, "got {v}");
        }
    }

    #[test]
    fn test_outside_footprint_is_nan() {
        let field = source_field();
        // Template entirely west of the source grid.
        let template = GeoGrid::new(-20.0, 4.0, 1.0, -1.0, Crs::Geographic);
        let out = warp_to_template(&field, &template, 4, 4, None, ResampleMethod::Bilinear).unwrap();
        assert!(out.data().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_nan_not_blended() {
        let grid = GeoGrid::new(0.0, 4.0, 1.0, -1.0, Crs::Geographic);
        let mut data: Vec<f32> = vec![2.0; 16];
        data[5] = f32::NAN;
        let field = PhysicalField::new(data, 4, 4, grid).unwrap();

        // Target pixel centers fall between source centers, adjacent to the
        // missing cell.
        let template = GeoGrid::new(0.5, 3.5, 1.0, -1.0, Crs::Geographic);
        let out = warp_to_template(&field, &template, 3, 3, None, ResampleMethod::Bilinear).unwrap();

        // Neighbors of the hole are NaN, not diluted averages.
        assert!(out.get(0, 0).unwrap().is_nan());
        // Far corner is untouched.
        assert_eq!(out.get(2, 2), Some(2.0));
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!(
            "nearest".parse::<ResampleMethod>().unwrap(),
            ResampleMethod::Nearest
        );
        assert_eq!(
            "BILINEAR".parse::<ResampleMethod>().unwrap(),
            ResampleMethod::Bilinear
        );
        assert_eq!(
            "cubicspline".parse::<ResampleMethod>().unwrap(),
            ResampleMethod::Cubic
        );
        assert!(matches!(
            "lanczos".parse::<ResampleMethod>(),
            Err(ResampleError::UnknownMethod(name)) if name == "lanczos"
        ));
    }
}
