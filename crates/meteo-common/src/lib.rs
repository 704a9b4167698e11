//! Common value types shared across the ERA5 field-preparation workspace.

pub mod crs;
pub mod field;
pub mod grid;
pub mod rect;
pub mod time;

pub use crs::{Crs, CrsParseError};
pub use field::{FieldShapeError, PhysicalField};
pub use grid::GeoGrid;
pub use rect::{Rectangle, RectangleError};
pub use time::{local_midnight_utc, NonMonotonicTimeAxis, TimeBracket, TimeSeries};
