//! Scoped read access to an ERA5 reanalysis archive.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use meteo_common::{Crs, GeoGrid, PhysicalField, TimeSeries};

use crate::error::{ArchiveError, ArchiveResult};
use crate::units::{check_calendar, TimeUnits};

/// An open reanalysis archive.
///
/// The handle is a scoped resource: callers open it at the start of a read
/// and drop it before returning, on every exit path. Nothing is cached
/// between opens; repeated access to the same timestep re-reads and
/// re-decodes it.
#[derive(Debug)]
pub struct Era5Archive {
    file: netcdf::File,
    path: PathBuf,
}

impl Era5Archive {
    /// Open an archive file.
    pub fn open<P: AsRef<Path>>(path: P) -> ArchiveResult<Self> {
        let path = path.as_ref();
        let file = netcdf::open(path).map_err(|e| ArchiveError::OpenFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode the archive's time axis into absolute timestamps.
    ///
    /// The axis must be non-decreasing; series positions are used as layer
    /// indices into this archive, so an out-of-order axis is refused rather
    /// than reordered.
    pub fn time_axis(&self) -> ArchiveResult<TimeSeries> {
        let var = self
            .file
            .variable("time")
            .or_else(|| self.file.variable("valid_time"))
            .ok_or_else(|| ArchiveError::MissingData("time coordinate variable".to_string()))?;

        let units_str = get_str_attr(&var, "units")
            .ok_or_else(|| ArchiveError::MissingData("time units attribute".to_string()))?;
        let units = TimeUnits::parse(&units_str)?;
        check_calendar(get_str_attr(&var, "calendar").as_deref())?;

        let values: Vec<f64> = var.get_values(..).map_err(|e| ArchiveError::ReadFailed {
            variable: var.name().to_string(),
            reason: e.to_string(),
        })?;

        let times: Vec<DateTime<Utc>> = values.iter().map(|&v| units.decode(v)).collect();
        debug!(path = %self.path.display(), steps = times.len(), "decoded archive time axis");
        TimeSeries::new(times).map_err(|e| ArchiveError::InvalidFormat(e.to_string()))
    }

    /// Geometry of the archive grid, derived from the longitude/latitude
    /// coordinate variables. The origin is the outer edge of the first cell
    /// (coordinates name cell centers).
    pub fn grid(&self) -> ArchiveResult<GeoGrid> {
        let lons = self.coordinate_values("longitude", "lon")?;
        let lats = self.coordinate_values("latitude", "lat")?;

        let pixel_x = lons[1] - lons[0];
        let pixel_y = lats[1] - lats[0]; // negative for north-up archives
        Ok(GeoGrid::new(
            lons[0] - pixel_x / 2.0,
            lats[0] - pixel_y / 2.0,
            pixel_x,
            pixel_y,
            Crs::Geographic,
        ))
    }

    /// Number of time steps available for a variable.
    pub fn steps(&self, var_name: &str) -> ArchiveResult<usize> {
        let var = self
            .file
            .variable(var_name)
            .ok_or_else(|| ArchiveError::VariableNotFound(var_name.to_string()))?;
        let dims = var.dimensions();
        if dims.is_empty() {
            return Err(ArchiveError::InvalidFormat(format!(
                "variable {var_name} has no time dimension"
            )));
        }
        Ok(dims[0].len())
    }

    /// Read one time slice of a variable and decode it to physical values.
    ///
    /// Scale, offset and no-data metadata are re-read on every call; the
    /// archive may legitimately carry different encodings per timestep.
    /// Cells matching the no-data sentinel become NaN.
    pub fn read_layer(&self, var_name: &str, index: usize) -> ArchiveResult<PhysicalField> {
        let var = self
            .file
            .variable(var_name)
            .ok_or_else(|| ArchiveError::VariableNotFound(var_name.to_string()))?;

        let dims = var.dimensions();
        if dims.len() != 3 {
            return Err(ArchiveError::InvalidFormat(format!(
                "variable {var_name} is not a (time, y, x) stack"
            )));
        }
        let available = dims[0].len();
        if index >= available {
            return Err(ArchiveError::TimeIndexUnavailable {
                variable: var_name.to_string(),
                index,
                available,
            });
        }
        let height = dims[1].len();
        let width = dims[2].len();

        let raw: Vec<f64> =
            var.get_values((index, .., ..))
                .map_err(|e| ArchiveError::ReadFailed {
                    variable: var_name.to_string(),
                    reason: e.to_string(),
                })?;

        let scale = get_f64_attr(&var, "scale_factor").unwrap_or(1.0);
        let offset = get_f64_attr(&var, "add_offset").unwrap_or(0.0);
        let fill = get_f64_attr(&var, "_FillValue").or_else(|| get_f64_attr(&var, "missing_value"));

        let data: Vec<f32> = raw
            .iter()
            .map(|&v| match fill {
                Some(f) if v == f => f32::NAN,
                _ => (v * scale + offset) as f32,
            })
            .collect();

        debug!(
            variable = var_name,
            index,
            width,
            height,
            "decoded archive layer"
        );

        PhysicalField::new(data, width, height, self.grid()?)
            .map_err(|e| ArchiveError::InvalidFormat(e.to_string()))
    }

    fn coordinate_values(&self, name: &str, alias: &str) -> ArchiveResult<Vec<f64>> {
        let var = self
            .file
            .variable(name)
            .or_else(|| self.file.variable(alias))
            .ok_or_else(|| ArchiveError::MissingData(format!("{name} coordinate variable")))?;
        let values: Vec<f64> = var.get_values(..).map_err(|e| ArchiveError::ReadFailed {
            variable: name.to_string(),
            reason: e.to_string(),
        })?;
        if values.len() < 2 {
            return Err(ArchiveError::InvalidFormat(format!(
                "{name} axis needs at least two samples"
            )));
        }
        Ok(values)
    }
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

fn get_str_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
