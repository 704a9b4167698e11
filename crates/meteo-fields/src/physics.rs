//! Derived meteorological quantities and moist-thermodynamic constants.
//!
//! Scalar functions over cell values; NaN inputs flow through every formula
//! unchanged, so missing archive cells stay missing in derived fields.

/// Standard gravity used to convert geopotential to geopotential height
/// (m s-2).
pub const GRAVITY: f64 = 9.80665;
/// Gravity constant of the moist-adiabatic lapse formulation (m s-2).
pub const G_LAPSE: f32 = 9.8;
/// Ratio of the molecular weight of water vapour to dry air.
pub const EPSILON: f32 = 0.622;
/// Specific heat of dry air at constant pressure (J kg-1 K-1).
pub const C_PD: f32 = 1003.5;
/// Specific heat of water vapour at constant pressure (J kg-1 K-1).
pub const C_PV: f32 = 1865.0;
/// Gas constant of dry air (J kg-1 K-1).
pub const R_D: f32 = 287.04;
/// Zero Celsius in Kelvin.
pub const ZERO_CELSIUS: f32 = 273.15;
/// Floor applied to wind speed magnitudes (m s-1).
pub const MIN_WIND_SPEED: f32 = 1.0;
/// Seconds per hour, for converting accumulated J m-2 to mean W m-2.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Saturation vapour pressure at the dew point, in millibars.
///
/// Magnus-type formula over the dew point temperature in Kelvin; at the dew
/// point the saturation pressure equals the actual vapour pressure.
pub fn vapour_pressure_mb(dew_point_k: f32) -> f32 {
    let td_c = dew_point_k - ZERO_CELSIUS;
    6.11 * 10.0_f32.powf(7.5 * td_c / (237.3 + td_c))
}

/// Horizontal wind speed from components, floored at [`MIN_WIND_SPEED`].
///
/// The floor keeps downstream aerodynamic-resistance formulas away from the
/// calm-air singularity.
pub fn wind_speed(u: f32, v: f32) -> f32 {
    let speed = u.hypot(v);
    // f32::max would discard a NaN operand; a missing component must stay
    // missing instead of turning into the floor value.
    if speed.is_nan() {
        return speed;
    }
    speed.max(MIN_WIND_SPEED)
}

/// Surface pressure in millibars from Pascals.
pub fn pressure_mb(pressure_pa: f32) -> f32 {
    pressure_pa / 100.0
}

/// Total column water vapour in centimeters from kg m-2.
pub fn column_water_vapour_cm(tcwv_kg_m2: f32) -> f32 {
    tcwv_kg_m2 / 10.0
}

/// Latent heat of vaporisation of water (J kg-1) at air temperature `ta_k`.
pub fn latent_heat_vaporisation(ta_k: f32) -> f32 {
    1e6 * (2.501 - 0.002361 * (ta_k - ZERO_CELSIUS))
}

/// Water vapour mixing ratio (kg kg-1) from vapour pressure and total
/// pressure, both in millibars.
pub fn mixing_ratio(ea_mb: f32, p_mb: f32) -> f32 {
    EPSILON * ea_mb / (p_mb - ea_mb)
}

/// Specific heat of moist air at constant pressure (J kg-1 K-1).
pub fn moist_heat_capacity(ea_mb: f32, p_mb: f32) -> f32 {
    let q = EPSILON * ea_mb / (p_mb - (1.0 - EPSILON) * ea_mb);
    (1.0 - q) * C_PD + q * C_PV
}

/// Moist-adiabatic (pseudoadiabatic) lapse rate (K m-1).
pub fn moist_lapse_rate(ta_k: f32, ea_mb: f32, p_mb: f32) -> f32 {
    let r = mixing_ratio(ea_mb, p_mb);
    let c_p = moist_heat_capacity(ea_mb, p_mb);
    let lambda_v = latent_heat_vaporisation(ta_k);
    let ta2 = ta_k * ta_k;
    G_LAPSE * (R_D * ta2 + lambda_v * r * ta_k)
        / (c_p * R_D * ta2 + lambda_v * lambda_v * r * EPSILON)
}

/// Extrapolate air temperature from a source height to a target height along
/// the moist adiabat.
///
/// Heights are in meters on a common vertical datum; the lapse rate is
/// evaluated once at the source state.
pub fn temperature_at_height(
    ta_k: f32,
    ea_mb: f32,
    p_mb: f32,
    z_target_m: f32,
    z_source_m: f32,
) -> f32 {
    ta_k - moist_lapse_rate(ta_k, ea_mb, p_mb) * (z_target_m - z_source_m)
}
