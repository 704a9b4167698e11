//! Field resolution: per-field recipes over the archive reader, temporal
//! interpolation and spatial resampling.
//!
//! Every field follows the same pipeline: bracket the instant on the archive
//! time axis, read and blend the bracketing layers of each source variable,
//! derive physical quantities, then warp onto the target grid. Only the
//! recipe table differs per field, so there is no bespoke per-field read
//! code.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Duration;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use era5_archive::{ArchiveError, Era5Archive};
use grid_resample::warp_to_template;
use meteo_common::{local_midnight_utc, PhysicalField, Rectangle, TimeBracket, TimeSeries};

use crate::accumulate::window_mean_flux;
use crate::config::ResolverConfig;
use crate::error::{FieldError, FieldResult};
use crate::interp::blend_layers;
use crate::physics;

/// Archive variable holding hourly accumulated surface solar radiation.
const SSRD: &str = "ssrd";

/// The derived surface fields the resolver can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeteoField {
    /// Air temperature at blending height above the terrain (K).
    AirTemperature,
    /// Near-surface vapour pressure (mb).
    VapourPressure,
    /// Surface pressure (mb).
    AirPressure,
    /// 100 m wind speed, floored at 1 m s-1 (m s-1).
    WindSpeed,
    /// Instantaneous clear-sky downward solar radiation (W m-2).
    ClearSkySolarRadiation,
    /// Mean downward solar irradiance over the local day (W m-2).
    AverageDailySolarIrradiance,
}

impl MeteoField {
    pub const ALL: [MeteoField; 6] = [
        MeteoField::AirTemperature,
        MeteoField::VapourPressure,
        MeteoField::AirPressure,
        MeteoField::WindSpeed,
        MeteoField::ClearSkySolarRadiation,
        MeteoField::AverageDailySolarIrradiance,
    ];

    /// Archive variables the field's recipe reads.
    pub fn variables(&self) -> &'static [&'static str] {
        match self {
            Self::AirTemperature => &["t2m", "z", "d2m", "sp"],
            Self::VapourPressure => &["d2m"],
            Self::AirPressure => &["sp"],
            Self::WindSpeed => &["u100", "v100"],
            Self::ClearSkySolarRadiation => &["ssrdc"],
            Self::AverageDailySolarIrradiance => &[SSRD],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AirTemperature => "air_temperature",
            Self::VapourPressure => "vapour_pressure",
            Self::AirPressure => "air_pressure",
            Self::WindSpeed => "wind_speed",
            Self::ClearSkySolarRadiation => "clear_sky_solar_radiation",
            Self::AverageDailySolarIrradiance => "average_daily_solar_irradiance",
        }
    }
}

impl FromStr for MeteoField {
    type Err = FieldError;

    /// Parse a field name. Unknown names fail here, before any archive I/O.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MeteoField::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| FieldError::UnsupportedField(s.to_string()))
    }
}

impl std::fmt::Display for MeteoField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One field resolution request. Consumed by a single [`FieldResolver::resolve`]
/// call and not retained.
#[derive(Debug, Clone)]
pub struct FieldRequest {
    pub field: MeteoField,
    /// UTC instant the field is valid for.
    pub instant: chrono::DateTime<chrono::Utc>,
    /// Fixed local offset in whole hours, anchoring the daily window.
    pub time_zone_hours: i32,
    /// Elevation model on the target grid (m above sea level). Its geometry
    /// is the template every output field is warped onto.
    pub elevation: PhysicalField,
    /// Optional pixel window of the target grid.
    pub window: Option<Rectangle>,
}

/// Resolves derived meteorological fields from a reanalysis archive.
///
/// Holds only the archive path and configuration; each resolution opens its
/// own archive handle and drops it before returning, so a resolver is cheap
/// to share across threads.
pub struct FieldResolver {
    archive_path: PathBuf,
    config: ResolverConfig,
}

impl FieldResolver {
    pub fn new<P: Into<PathBuf>>(archive_path: P, config: ResolverConfig) -> Self {
        Self {
            archive_path: archive_path.into(),
            config,
        }
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Resolve one field on the request's target grid.
    ///
    /// Returns `Ok(None)` when the requested instant falls outside the
    /// archive's time coverage; any other failure is an error.
    pub fn resolve(&self, request: FieldRequest) -> FieldResult<Option<PhysicalField>> {
        let archive = Era5Archive::open(&self.archive_path)?;
        let axis = archive.time_axis()?;

        let Some(bracket) = axis.bracket(request.instant) else {
            info!(
                field = %request.field,
                instant = %request.instant,
                "instant outside archive coverage, skipping"
            );
            return Ok(None);
        };
        debug!(
            field = %request.field,
            before = bracket.before,
            after = bracket.after,
            frac = bracket.frac,
            "resolving field"
        );

        let field = match request.field {
            MeteoField::AirTemperature => self.air_temperature(&archive, &bracket, &request)?,
            MeteoField::VapourPressure => {
                let ea = self
                    .interpolated(&archive, "d2m", &bracket)?
                    .map(physics::vapour_pressure_mb);
                self.to_target(&ea, &request)?
            }
            MeteoField::AirPressure => {
                let p = self
                    .interpolated(&archive, "sp", &bracket)?
                    .map(physics::pressure_mb);
                self.to_target(&p, &request)?
            }
            MeteoField::WindSpeed => {
                let u = self.interpolated(&archive, "u100", &bracket)?;
                let v = self.interpolated(&archive, "v100", &bracket)?;
                self.to_target(&u.zip_map(&v, physics::wind_speed), &request)?
            }
            MeteoField::ClearSkySolarRadiation => {
                // Hourly accumulated J m-2 to mean W m-2 over the hour.
                let flux = self
                    .interpolated(&archive, "ssrdc", &bracket)?
                    .map(|v| v / physics::SECONDS_PER_HOUR as f32);
                self.to_target(&flux, &request)?
            }
            MeteoField::AverageDailySolarIrradiance => {
                self.daily_irradiance(&archive, &axis, &request)?
            }
        };

        Ok(Some(field))
    }

    /// Resolve independent requests in parallel. Each worker opens its own
    /// archive handle.
    pub fn resolve_many(
        &self,
        requests: Vec<FieldRequest>,
    ) -> Vec<FieldResult<Option<PhysicalField>>> {
        requests
            .into_par_iter()
            .map(|request| self.resolve(request))
            .collect()
    }

    /// Read the bracketing layers of a variable and blend them to the target
    /// instant. A single layer is read when the instant hits an axis sample.
    fn interpolated(
        &self,
        archive: &Era5Archive,
        var: &str,
        bracket: &TimeBracket,
    ) -> FieldResult<PhysicalField> {
        let before = archive.read_layer(var, bracket.before)?;
        if bracket.before == bracket.after {
            return Ok(before);
        }
        let after = archive.read_layer(var, bracket.after)?;
        Ok(blend_layers(&before, &after, bracket))
    }

    /// Warp a source-grid field onto the request's target geometry.
    fn to_target(
        &self,
        source: &PhysicalField,
        request: &FieldRequest,
    ) -> FieldResult<PhysicalField> {
        Ok(warp_to_template(
            source,
            request.elevation.grid(),
            request.elevation.width(),
            request.elevation.height(),
            request.window.as_ref(),
            self.config.resample_method,
        )?)
    }

    /// Air temperature at blending height above the terrain.
    ///
    /// The screen-level temperature is first brought down to a sea-level
    /// datum along the moist adiabat, resampled there together with its
    /// vapour pressure and surface pressure, then lifted to the blending
    /// height above the target elevation model. Extrapolating on the datum
    /// keeps the resampling from mixing temperatures of cells at different
    /// reanalysis surface heights.
    fn air_temperature(
        &self,
        archive: &Era5Archive,
        bracket: &TimeBracket,
        request: &FieldRequest,
    ) -> FieldResult<PhysicalField> {
        let t2m = self.interpolated(archive, "t2m", bracket)?;
        // Geopotential to geometric surface height.
        let z = self
            .interpolated(archive, "z", bracket)?
            .map(|v| (v as f64 / physics::GRAVITY) as f32);
        let ea = self
            .interpolated(archive, "d2m", bracket)?
            .map(physics::vapour_pressure_mb);
        let p = self
            .interpolated(archive, "sp", bracket)?
            .map(physics::pressure_mb);

        let mut datum = Vec::with_capacity(t2m.len());
        for i in 0..t2m.len() {
            datum.push(physics::temperature_at_height(
                t2m.data()[i],
                ea.data()[i],
                p.data()[i],
                0.0,
                z.data()[i] + self.config.screen_height_m,
            ));
        }
        let t_datum = PhysicalField::new(datum, t2m.width(), t2m.height(), *t2m.grid())?;

        let ea_t = self.to_target(&ea, request)?;
        let p_t = self.to_target(&p, request)?;
        let t_t = self.to_target(&t_datum, request)?;

        let elevation = match &request.window {
            Some(rect) => request.elevation.crop(rect)?,
            None => request.elevation.clone(),
        };

        let mut out = Vec::with_capacity(t_t.len());
        for i in 0..t_t.len() {
            out.push(physics::temperature_at_height(
                t_t.data()[i],
                ea_t.data()[i],
                p_t.data()[i],
                elevation.data()[i] + self.config.blending_height_m,
                0.0,
            ));
        }
        Ok(PhysicalField::new(out, t_t.width(), t_t.height(), *t_t.grid())?)
    }

    /// Mean downward solar irradiance over the local day containing the
    /// requested instant.
    fn daily_irradiance(
        &self,
        archive: &Era5Archive,
        axis: &TimeSeries,
        request: &FieldRequest,
    ) -> FieldResult<PhysicalField> {
        let window_hours = self.config.daily_window_hours;
        let start = local_midnight_utc(request.instant, request.time_zone_hours);
        let end = start + Duration::seconds((window_hours * physics::SECONDS_PER_HOUR) as i64);

        let coverage_gap = || FieldError::CoverageGap {
            variable: SSRD.to_string(),
            start,
            window_hours,
        };

        // Index at or before each window edge; the accumulation layers are
        // the steps strictly after the start, up to and including the end.
        let first = axis.bracket(start).ok_or_else(coverage_gap)?.before;
        let last = axis.bracket(end).ok_or_else(coverage_gap)?.before;

        debug!(
            start = %start,
            window_hours,
            steps = last.saturating_sub(first),
            "accumulating daily irradiance window"
        );

        let mut layers = Vec::with_capacity(last.saturating_sub(first));
        for index in first + 1..=last {
            let layer = archive.read_layer(SSRD, index).map_err(|e| match e {
                ArchiveError::TimeIndexUnavailable { .. } => coverage_gap(),
                other => FieldError::Archive(other),
            })?;
            layers.push(layer);
        }

        let flux = window_mean_flux(&layers, window_hours).ok_or_else(coverage_gap)?;
        self.to_target(&flux, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_roundtrip() {
        for field in MeteoField::ALL {
            assert_eq!(MeteoField::from_str(field.name()).unwrap(), field);
            assert_eq!(field.to_string(), field.name());
        }
    }

    #[test]
    fn test_unknown_field_is_unsupported() {
        let err = MeteoField::from_str("soil_moisture").unwrap_err();
        assert!(matches!(err, FieldError::UnsupportedField(name) if name == "soil_moisture"));
    }

    #[test]
    fn test_recipe_variables() {
        assert_eq!(
            MeteoField::AirTemperature.variables(),
            &["t2m", "z", "d2m", "sp"]
        );
        assert_eq!(MeteoField::WindSpeed.variables(), &["u100", "v100"]);
        for field in MeteoField::ALL {
            assert!(!field.variables().is_empty());
        }
    }
}
