//! Interpolation kernels for grid resampling.
//!
//! All kernels treat NaN as no-data: a missing source cell is never blended
//! into a valid output value as if it were zero.

/// Nearest neighbor interpolation.
///
/// Returns the value of the nearest grid point, or NaN outside the grid.
pub fn nearest_interpolate(data: &[f32], width: usize, height: usize, x: f64, y: f64) -> f32 {
    if x < -0.5 || y < -0.5 {
        return f32::NAN;
    }
    let col = x.round() as usize;
    let row = y.round() as usize;

    if col >= width || row >= height {
        return f32::NAN;
    }

    data[row * width + col]
}

/// Bilinear interpolation.
///
/// Smoothly interpolates between the four nearest grid points. If any of
/// the four corners is NaN the result is NaN.
pub fn bilinear_interpolate(data: &[f32], width: usize, height: usize, x: f64, y: f64) -> f32 {
    if x < 0.0 || y < 0.0 || x > (width - 1) as f64 || y > (height - 1) as f64 {
        return f32::NAN;
    }

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);

    let xf = (x - x0 as f64) as f32;
    let yf = (y - y0 as f64) as f32;

    let v00 = data[y0 * width + x0];
    let v10 = data[y0 * width + x1];
    let v01 = data[y1 * width + x0];
    let v11 = data[y1 * width + x1];

    if v00.is_nan() || v10.is_nan() || v01.is_nan() || v11.is_nan() {
        return f32::NAN;
    }

    let top = v00 * (1.0 - xf) + v10 * xf;
    let bottom = v01 * (1.0 - xf) + v11 * xf;
    top * (1.0 - yf) + bottom * yf
}

/// Bicubic interpolation over a 4x4 neighborhood.
///
/// Falls back to bilinear when any of the 16 samples is NaN, so no-data
/// cells at the edge of a valid region do not poison the whole neighborhood.
pub fn cubic_interpolate(data: &[f32], width: usize, height: usize, x: f64, y: f64) -> f32 {
    if x < 0.0 || y < 0.0 || x > (width - 1) as f64 || y > (height - 1) as f64 {
        return f32::NAN;
    }

    let xi = x.floor() as i32;
    let yi = y.floor() as i32;

    let xf = (x - xi as f64) as f32;
    let yf = (y - yi as f64) as f32;

    let mut values = [[0.0f32; 4]; 4];

    for j in 0..4 {
        for i in 0..4 {
            let px = (xi + i - 1).clamp(0, width as i32 - 1) as usize;
            let py = (yi + j - 1).clamp(0, height as i32 - 1) as usize;
            values[j as usize][i as usize] = data[py * width + px];

            if values[j as usize][i as usize].is_nan() {
                return bilinear_interpolate(data, width, height, x, y);
            }
        }
    }

    let mut row_values = [0.0f32; 4];
    for j in 0..4 {
        row_values[j] = cubic_1d(values[j][0], values[j][1], values[j][2], values[j][3], xf);
    }

    cubic_1d(row_values[0], row_values[1], row_values[2], row_values[3], yf)
}

/// 1D cubic interpolation using Catmull-Rom spline.
fn cubic_1d(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;

    let a = -0.5 * p0 + 1.5 * p1 - 1.5 * p2 + 0.5 * p3;
    let b = p0 - 2.5 * p1 + 2.0 * p2 - 0.5 * p3;
    let c = -0.5 * p0 + 0.5 * p2;
    let d = p1;

    a * t3 + b * t2 + c * t + d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_interpolate() {
        let data: Vec<f32> = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];

        assert_eq!(nearest_interpolate(&data, 3, 3, 0.0, 0.0), 1.0);
        assert_eq!(nearest_interpolate(&data, 3, 3, 1.0, 1.0), 5.0);
        assert_eq!(nearest_interpolate(&data, 3, 3, 0.4, 0.4), 1.0);
        assert_eq!(nearest_interpolate(&data, 3, 3, 0.6, 0.6), 5.0);
        assert!(nearest_interpolate(&data, 3, 3, -1.0, 0.0).is_nan());
        assert!(nearest_interpolate(&data, 3, 3, 3.0, 0.0).is_nan());
    }

    #[test]
    fn test_bilinear_interpolate() {
        let data: Vec<f32> = vec![1.0, 2.0, 3.0, 4.0];

        // Corners are reproduced exactly.
        assert_eq!(bilinear_interpolate(&data, 2, 2, 0.0, 0.0), 1.0);
        assert_eq!(bilinear_interpolate(&data, 2, 2, 1.0, 0.0), 2.0);
        assert_eq!(bilinear_interpolate(&data, 2, 2, 0.0, 1.0), 3.0);
        assert_eq!(bilinear_interpolate(&data, 2, 2, 1.0, 1.0), 4.0);

        let center = bilinear_interpolate(&data, 2, 2, 0.5, 0.5);
        assert!((center - 2.5).abs() < 0.001);
    }

    #[test]
    fn test_bilinear_with_nan() {
        let data: Vec<f32> = vec![1.0, f32::NAN, 3.0, 4.0];

        let result = bilinear_interpolate(&data, 2, 2, 0.5, 0.5);
        assert!(result.is_nan());
    }

    #[test]
    fn test_cubic_exact_at_grid_points() {
        let data: Vec<f32> = (0..16).map(|i| i as f32).collect();
        // Catmull-Rom passes through its control points.
        assert_eq!(cubic_interpolate(&data, 4, 4, 1.0, 1.0), 5.0);
        assert_eq!(cubic_interpolate(&data, 4, 4, 2.0, 2.0), 10.0);
    }

    #[test]
    fn test_cubic_falls_back_near_nan() {
        let mut data: Vec<f32> = (0..16).map(|i| i as f32).collect();
        data[0] = f32::NAN; // outer ring of the 4x4 neighborhood of (1.5, 1.5)

        // Bilinear fallback only uses the inner corners, all valid.
        let v = cubic_interpolate(&data, 4, 4, 1.5, 1.5);
        assert!(!v.is_nan());
        assert!((v - 7.5).abs() < 0.001);
    }
}
