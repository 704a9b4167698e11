//! Resolver configuration.

use serde::{Deserialize, Serialize};

use grid_resample::ResampleMethod;

/// Configuration for a [`crate::FieldResolver`].
///
/// Constructed once and passed in explicitly; nothing here is read from the
/// process environment after startup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Resampling algorithm used when warping onto the target grid.
    pub resample_method: ResampleMethod,
    /// Blending height above the target surface for the temperature field
    /// (m).
    pub blending_height_m: f32,
    /// Height of the screen-level temperature above the reanalysis surface
    /// (m).
    pub screen_height_m: f32,
    /// Length of the daily-irradiance integration window (h).
    pub daily_window_hours: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            resample_method: ResampleMethod::Cubic,
            blending_height_m: 100.0,
            screen_height_m: 2.0,
            daily_window_hours: 24.0,
        }
    }
}

impl ResolverConfig {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            resample_method: std::env::var("RESAMPLE_METHOD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.resample_method),
            blending_height_m: std::env::var("BLENDING_HEIGHT_M")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.blending_height_m),
            screen_height_m: std::env::var("SCREEN_HEIGHT_M")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.screen_height_m),
            daily_window_hours: std::env::var("DAILY_WINDOW_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.daily_window_hours),
        }
    }
}
