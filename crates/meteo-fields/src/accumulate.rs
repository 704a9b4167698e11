//! Accumulated-flux windows reduced to mean rates.

use meteo_common::PhysicalField;

use crate::physics::SECONDS_PER_HOUR;

/// Reduce a window of per-step accumulation layers to a mean flux.
///
/// Each layer holds the amount accumulated since the previous step, so the
/// window total is the difference of every layer against a zero baseline,
/// summed. Missing cells contribute zero to the total rather than voiding
/// it. The sum is divided by the window length in seconds, turning J m-2
/// into mean W m-2.
///
/// Returns `None` for an empty window.
pub fn window_mean_flux(layers: &[PhysicalField], window_hours: f64) -> Option<PhysicalField> {
    let first = layers.first()?;
    let mut total = vec![0.0f32; first.len()];
    for layer in layers {
        for (acc, &v) in total.iter_mut().zip(layer.data()) {
            if !v.is_nan() {
                *acc += v;
            }
        }
    }

    let divisor = (window_hours * SECONDS_PER_HOUR) as f32;
    for v in &mut total {
        *v /= divisor;
    }

    PhysicalField::new(total, first.width(), first.height(), *first.grid()).ok()
}
