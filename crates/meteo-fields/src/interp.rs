//! Temporal interpolation between bracketing archive layers.

use meteo_common::{PhysicalField, TimeBracket};

/// Linear blend of the two layers bracketing a target instant.
///
/// The earlier layer is weighted by `frac`, the later by `1 - frac`, matching
/// [`TimeBracket`]. A NaN in either layer makes the blended cell NaN.
pub fn blend_layers(
    before: &PhysicalField,
    after: &PhysicalField,
    bracket: &TimeBracket,
) -> PhysicalField {
    let frac = bracket.frac as f32;
    before.zip_map(after, |a, b| a * frac + b * (1.0 - frac))
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_common::{Crs, GeoGrid};

    fn grid() -> GeoGrid {
        GeoGrid::new(0.0, 2.0, 1.0, -1.0, Crs::Geographic)
    }

    fn bracket(frac: f64) -> TimeBracket {
        TimeBracket {
            before: 0,
            after: 1,
            frac,
        }
    }

    #[test]
    fn test_midpoint_blend() {
        let a = PhysicalField::filled(280.0, 2, 2, grid());
        let b = PhysicalField::filled(284.0, 2, 2, grid());
        let mid = blend_layers(&a, &b, &bracket(0.5));
        assert_eq!(mid.get(0, 0), Some(282.0));
    }

    #[test]
    fn test_frac_weights_earlier_layer() {
        let a = PhysicalField::filled(10.0, 2, 2, grid());
        let b = PhysicalField::filled(20.0, 2, 2, grid());
        // Three quarters of the weight on the earlier layer.
        let out = blend_layers(&a, &b, &bracket(0.75));
        assert_eq!(out.get(1, 1), Some(12.5));
    }

    #[test]
    fn test_exact_match_returns_earlier() {
        let a = PhysicalField::filled(1.5, 2, 2, grid());
        let b = PhysicalField::filled(9.0, 2, 2, grid());
        let out = blend_layers(&a, &b, &bracket(1.0));
        assert_eq!(out.get(0, 1), Some(1.5));
    }

    #[test]
    fn test_nan_propagates() {
        let a = PhysicalField::new(vec![1.0, f32::NAN, 3.0, 4.0], 2, 2, grid()).unwrap();
        let b = PhysicalField::filled(5.0, 2, 2, grid());
        let out = blend_layers(&a, &b, &bracket(0.5));
        assert_eq!(out.get(0, 0), Some(3.0));
        assert!(out.get(1, 0).unwrap().is_nan());
    }
}
