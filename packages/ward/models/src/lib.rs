#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ward, coordinate, and dataset configuration types.
//!
//! These are the plain data types shared by the ward resolver, the EXIF
//! extractor, the lookup service, and the HTTP server. They carry no
//! geometry; polygons live in `civic_map_spatial`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Property keys reserved for [`WardInfo`]'s own fields. Feature
/// properties with these names are dropped at load time so they cannot
/// shadow the resolved values.
pub const RESERVED_PROPERTY_KEYS: &[&str] = &["wardNumber", "wardName"];

/// Which coordinate axis a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// North/south.
    Latitude,
    /// East/west.
    Longitude,
}

impl Axis {
    /// Largest absolute value allowed on this axis.
    #[must_use]
    pub const fn limit(self) -> f64 {
        match self {
            Self::Latitude => 90.0,
            Self::Longitude => 180.0,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
        })
    }
}

/// A single geographic point (WGS84).
///
/// Note the field order: latitude first. `GeoJSON` geometry uses the
/// opposite `[longitude, latitude]` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Latitude in decimal degrees, `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in decimal degrees, `[-180, 180]`.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate without validating it.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both axes are finite and inside the geographic ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= Axis::Latitude.limit()
            && self.longitude.abs() <= Axis::Longitude.limit()
    }
}

/// The ward a point resolved to.
///
/// Serializes as `{ "wardNumber": 12, "wardName": "...", ...properties }`,
/// with the polygon's remaining feature properties flattened alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardInfo {
    /// 1-based ward number.
    pub ward_number: u32,
    /// Ward name from the zone table, or `None` when the table has no
    /// entry for this ward.
    pub ward_name: Option<String>,
    /// Remaining feature properties, passed through verbatim.
    #[serde(flatten)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// Where a report's coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSource {
    /// The photo's EXIF GPS tags.
    Exif,
    /// Coordinates supplied with the report.
    Provided,
}

/// What to do with a boundary feature whose geometry or ward number
/// cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidFeaturePolicy {
    /// Fail the whole dataset load.
    #[default]
    Reject,
    /// Drop the feature and log a warning.
    Skip,
}

/// Where the boundary dataset lives and how to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the ward boundary `GeoJSON` `FeatureCollection`.
    pub boundaries: PathBuf,
    /// Path to the JSON array of ward names (1-based, positional).
    pub zones: PathBuf,
    /// Feature property holding the ward number.
    pub ward_property: String,
    /// Handling of unparsable features.
    pub invalid_features: InvalidFeaturePolicy,
    /// Run the overlap / unnamed-ward data-quality pass at load time.
    pub check_overlaps: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            boundaries: PathBuf::from("data/gcc-divisions-latest.geojson"),
            zones: PathBuf::from("data/ward-zones.json"),
            ward_property: "Name".to_string(),
            invalid_features: InvalidFeaturePolicy::Reject,
            check_overlaps: false,
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Top-level configuration file (`civic_map.toml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CivicMapConfig {
    /// Boundary dataset settings.
    pub dataset: DatasetConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}
