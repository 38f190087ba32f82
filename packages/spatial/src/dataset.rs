//! Boundary dataset loading.
//!
//! Parses the ward `GeoJSON` `FeatureCollection` and the positional
//! ward-name table into an immutable [`BoundaryDataset`]. Sources are read
//! from disk once ([`DatasetSources::read`]); everything after that is a
//! pure transformation of the source text.

use std::collections::BTreeSet;
use std::path::Path;

use civic_map_ward_models::{
    DatasetConfig, InvalidFeaturePolicy, RESERVED_PROPERTY_KEYS, WardInfo,
};
use geo::{BoundingRect, MultiPolygon, Rect};
use geojson::GeoJson;
use thiserror::Error;

use crate::DatasetLoadError;
use crate::overlap::{WardOverlap, find_overlaps};

/// Raw text of the two dataset sources.
#[derive(Debug, Clone, Default)]
pub struct DatasetSources {
    /// Ward boundary `GeoJSON`.
    pub boundaries: String,
    /// Ward name table (JSON array of strings).
    pub zones: String,
}

impl DatasetSources {
    /// Reads both sources from the paths in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetLoadError::Io`] if either file cannot be read.
    pub fn read(config: &DatasetConfig) -> Result<Self, DatasetLoadError> {
        log::info!(
            "Loading ward boundaries from {} and ward names from {}",
            config.boundaries.display(),
            config.zones.display()
        );
        Ok(Self {
            boundaries: read_source(&config.boundaries)?,
            zones: read_source(&config.zones)?,
        })
    }
}

fn read_source(path: &Path) -> Result<String, DatasetLoadError> {
    std::fs::read_to_string(path).map_err(|source| DatasetLoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Why a ward-number property could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WardNumberError {
    /// The property is absent or `null`.
    #[error("ward number is missing")]
    Missing,

    /// The property is not an integer.
    #[error("'{0}' is not an integer ward number")]
    NotAnInteger(String),

    /// The property is an integer, but not a valid 1-based ward number.
    #[error("ward number {0} is out of range")]
    OutOfRange(String),
}

/// Parses a ward-number feature property.
///
/// Accepts a positive JSON integer, or a string holding one. Strings are
/// trimmed first since source data often pads the number with whitespace
/// or newlines.
///
/// # Errors
///
/// Returns [`WardNumberError`] if the value is missing, not an integer, or
/// not a positive `u32`.
pub fn parse_ward_number(value: Option<&serde_json::Value>) -> Result<u32, WardNumberError> {
    let number = match value {
        None | Some(serde_json::Value::Null) => return Err(WardNumberError::Missing),
        Some(serde_json::Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(WardNumberError::Missing);
            }
            trimmed
                .parse::<u32>()
                .map_err(|_| WardNumberError::NotAnInteger(trimmed.to_string()))?
        }
        Some(serde_json::Value::Number(n)) => {
            let wide = n
                .as_u64()
                .ok_or_else(|| WardNumberError::NotAnInteger(n.to_string()))?;
            u32::try_from(wide).map_err(|_| WardNumberError::OutOfRange(n.to_string()))?
        }
        Some(other) => return Err(WardNumberError::NotAnInteger(other.to_string())),
    };

    if number == 0 {
        return Err(WardNumberError::OutOfRange(number.to_string()));
    }

    Ok(number)
}

/// One ward boundary.
#[derive(Debug, Clone)]
pub struct WardPolygon {
    ward_number: u32,
    geometry: MultiPolygon<f64>,
    bounds: Rect<f64>,
    properties: serde_json::Map<String, serde_json::Value>,
}

impl WardPolygon {
    /// Builds a ward from a `GeoJSON` feature.
    fn from_feature(feature: geojson::Feature, ward_property: &str) -> Result<Self, String> {
        let mut properties = feature.properties.unwrap_or_default();

        let ward_number = parse_ward_number(properties.get(ward_property))
            .map_err(|e| format!("property '{ward_property}': {e}"))?;

        let geometry = feature
            .geometry
            .ok_or_else(|| "missing geometry".to_string())
            .and_then(to_multipolygon)?;

        let bounds = geometry
            .bounding_rect()
            .ok_or_else(|| "empty geometry".to_string())?;

        for key in RESERVED_PROPERTY_KEYS {
            properties.remove(*key);
        }

        Ok(Self {
            ward_number,
            geometry,
            bounds,
            properties,
        })
    }

    /// 1-based ward number.
    #[must_use]
    pub const fn ward_number(&self) -> u32 {
        self.ward_number
    }

    /// Boundary in `[longitude, latitude]` axis order.
    #[must_use]
    pub const fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    /// Bounding box of [`Self::geometry`].
    #[must_use]
    pub const fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    /// Feature properties other than the reserved `wardNumber`/`wardName`.
    #[must_use]
    pub const fn properties(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.properties
    }

    pub(crate) fn to_info(&self, zones: &WardZoneTable) -> WardInfo {
        WardInfo {
            ward_number: self.ward_number,
            ward_name: zones.name_for(self.ward_number).map(ToString::to_string),
            properties: self.properties.clone(),
        }
    }
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn to_multipolygon(geometry: geojson::Geometry) -> Result<MultiPolygon<f64>, String> {
    let geo_geom = geo::Geometry::<f64>::try_from(geometry)
        .map_err(|e| format!("unsupported geometry: {e}"))?;

    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Ok(mp),
        geo::Geometry::Polygon(p) => Ok(MultiPolygon(vec![p])),
        _ => Err("expected a Polygon or MultiPolygon geometry".to_string()),
    }
}

/// Positional ward-name table: ward `n` is named by entry `n - 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WardZoneTable {
    names: Vec<String>,
}

impl WardZoneTable {
    /// Wraps an ordered list of ward names.
    #[must_use]
    pub const fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Parses a JSON array of strings.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetLoadError::Json`] if the source is not JSON, or
    /// [`DatasetLoadError::ZoneTable`] if it is not an array of strings.
    pub fn parse(source: &str) -> Result<Self, DatasetLoadError> {
        let value: serde_json::Value = serde_json::from_str(source)?;

        let entries = value
            .as_array()
            .ok_or_else(|| DatasetLoadError::ZoneTable {
                message: "expected a JSON array of ward names".to_string(),
            })?;

        let names = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry
                    .as_str()
                    .map(ToString::to_string)
                    .ok_or_else(|| DatasetLoadError::ZoneTable {
                        message: format!("entry {i} is not a string: {entry}"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { names })
    }

    /// Name of ward `ward_number`, if the table has a non-blank entry for it.
    #[must_use]
    pub fn name_for(&self, ward_number: u32) -> Option<&str> {
        let index = usize::try_from(ward_number).ok()?.checked_sub(1)?;
        self.names
            .get(index)
            .map(String::as_str)
            .filter(|name| !name.trim().is_empty())
    }

    /// All names in table order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The loaded ward polygons (in source order) and the ward-name table.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct BoundaryDataset {
    polygons: Vec<WardPolygon>,
    zones: WardZoneTable,
}

impl BoundaryDataset {
    /// Reads and parses the dataset described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetLoadError`] if either source is missing or invalid.
    pub fn load(config: &DatasetConfig) -> Result<Self, DatasetLoadError> {
        let sources = DatasetSources::read(config)?;
        Self::parse(&sources, config)
    }

    /// Parses already-read sources.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetLoadError`] if the boundary source is not a
    /// `FeatureCollection`, the zone table is not an array of strings, a
    /// feature is invalid under [`InvalidFeaturePolicy::Reject`], or no
    /// wards remain.
    pub fn parse(sources: &DatasetSources, config: &DatasetConfig) -> Result<Self, DatasetLoadError> {
        let zones = WardZoneTable::parse(&sources.zones)?;
        let polygons = parse_boundaries(
            &sources.boundaries,
            &config.ward_property,
            config.invalid_features,
        )?;

        if polygons.is_empty() {
            return Err(DatasetLoadError::NoWards);
        }

        log::info!(
            "Loaded {} ward boundaries and {} ward names",
            polygons.len(),
            zones.len()
        );

        let dataset = Self { polygons, zones };

        if config.check_overlaps {
            dataset.log_data_quality();
        }

        Ok(dataset)
    }

    /// Ward polygons in load order.
    #[must_use]
    pub fn polygons(&self) -> &[WardPolygon] {
        &self.polygons
    }

    /// Ward-name table.
    #[must_use]
    pub const fn zones(&self) -> &WardZoneTable {
        &self.zones
    }

    /// Number of loaded wards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Always `false` for a dataset produced by [`Self::parse`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Ward numbers with no name in the zone table, ascending.
    #[must_use]
    pub fn unnamed_wards(&self) -> Vec<u32> {
        self.polygons
            .iter()
            .map(WardPolygon::ward_number)
            .filter(|n| self.zones.name_for(*n).is_none())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Pairs of wards whose interiors intersect.
    #[must_use]
    pub fn overlaps(&self) -> Vec<WardOverlap> {
        find_overlaps(&self.polygons)
    }

    fn log_data_quality(&self) {
        for overlap in self.overlaps() {
            log::warn!(
                "Wards {} and {} overlap; points in the shared area resolve to ward {}",
                overlap.first,
                overlap.second,
                overlap.first
            );
        }
        for ward in self.unnamed_wards() {
            log::warn!("Ward {ward} has no entry in the ward name table");
        }
    }
}

fn parse_boundaries(
    source: &str,
    ward_property: &str,
    policy: InvalidFeaturePolicy,
) -> Result<Vec<WardPolygon>, DatasetLoadError> {
    let geojson: GeoJson = source.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(DatasetLoadError::NotFeatureCollection);
    };

    let mut polygons = Vec::with_capacity(collection.features.len());

    for (index, feature) in collection.features.into_iter().enumerate() {
        match WardPolygon::from_feature(feature, ward_property) {
            Ok(polygon) => polygons.push(polygon),
            Err(message) => match policy {
                InvalidFeaturePolicy::Reject => {
                    return Err(DatasetLoadError::InvalidFeature { index, message });
                }
                InvalidFeaturePolicy::Skip => {
                    log::warn!("Skipping boundary feature {index}: {message}");
                }
            },
        }
    }

    Ok(polygons)
}
