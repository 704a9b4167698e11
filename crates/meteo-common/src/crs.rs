//! Spatial reference identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Spatial reference systems handled by the resampler.
///
/// ERA5 archives are on a geographic (EPSG:4326) grid; the target templates
/// derived from Sentinel-2 tiles are on UTM grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crs {
    /// WGS84 geographic, degrees (EPSG:4326).
    Geographic,
    /// WGS84 UTM, meters. EPSG:326xx (north) / EPSG:327xx (south).
    Utm { zone: u8, north: bool },
}

impl Crs {
    /// Parse an EPSG-style identifier, e.g. "EPSG:4326" or "EPSG:32633".
    pub fn from_epsg_string(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.to_uppercase();
        let code = normalized
            .strip_prefix("EPSG:")
            .ok_or_else(|| CrsParseError::UnsupportedCrs(s.to_string()))?;
        let code: u32 = code
            .parse()
            .map_err(|_| CrsParseError::UnsupportedCrs(s.to_string()))?;

        match code {
            4326 => Ok(Crs::Geographic),
            32601..=32660 => Ok(Crs::Utm {
                zone: (code - 32600) as u8,
                north: true,
            }),
            32701..=32760 => Ok(Crs::Utm {
                zone: (code - 32700) as u8,
                north: false,
            }),
            _ => Err(CrsParseError::UnsupportedCrs(s.to_string())),
        }
    }

    /// Check if this is a geographic (lat/lon) reference.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Crs::Geographic)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Geographic => write!(f, "EPSG:4326"),
            Crs::Utm { zone, north: true } => write!(f, "EPSG:{}", 32600 + *zone as u32),
            Crs::Utm { zone, north: false } => write!(f, "EPSG:{}", 32700 + *zone as u32),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crs() {
        assert_eq!(Crs::from_epsg_string("EPSG:4326").unwrap(), Crs::Geographic);
        assert_eq!(
            Crs::from_epsg_string("epsg:32633").unwrap(),
            Crs::Utm {
                zone: 33,
                north: true
            }
        );
        assert_eq!(
            Crs::from_epsg_string("EPSG:32719").unwrap(),
            Crs::Utm {
                zone: 19,
                north: false
            }
        );
        assert!(Crs::from_epsg_string("EPSG:3857").is_err());
        assert!(Crs::from_epsg_string("4326").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for s in ["EPSG:4326", "EPSG:32633", "EPSG:32719"] {
            let crs = Crs::from_epsg_string(s).unwrap();
            assert_eq!(crs.to_string(), s);
        }
    }
}
