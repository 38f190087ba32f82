#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ward lookup service.
//!
//! [`WardLocator`] is the single entry point the request handlers use:
//! it validates incoming coordinates, resolves them against the boundary
//! dataset loaded once at startup, and reports "outside service area" as
//! `None` rather than an error. [`WardLocator::locate_report`] adds the
//! photo-first location fallback used when a report is submitted.
//!
//! The locator owns its dataset and never mutates it, so one instance can
//! be shared (e.g. behind an `Arc`) by any number of request handlers.

pub mod config;
mod report;

use std::path::Path;

use civic_map_spatial::{BoundaryDataset, DatasetLoadError, DatasetSources, WardIndex};
use civic_map_ward_models::{Axis, CivicMapConfig, Coordinate, DatasetConfig, WardInfo};
use thiserror::Error;

pub use civic_map_exif::extract_gps_from_image;
pub use civic_map_ward_models::CoordinateSource;
pub use config::ConfigError;
pub use report::{ReportLocation, ReportLocationError};

/// A latitude or longitude that cannot be looked up.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidCoordinateError {
    /// NaN or infinite.
    #[error("{axis} must be a finite number")]
    NotFinite {
        /// Offending axis.
        axis: Axis,
    },

    /// Outside `[-90, 90]` (latitude) or `[-180, 180]` (longitude).
    #[error("{axis} {value} is out of range")]
    OutOfRange {
        /// Offending axis.
        axis: Axis,
        /// Value received.
        value: f64,
    },
}

/// Startup failures.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The boundary dataset could not be loaded.
    #[error(transparent)]
    Dataset(#[from] DatasetLoadError),
}

/// Checks that `lat`/`lng` are finite and in range.
///
/// # Errors
///
/// Returns [`InvalidCoordinateError`] for the first axis that fails.
pub fn validate_coordinate(lat: f64, lng: f64) -> Result<Coordinate, InvalidCoordinateError> {
    Ok(Coordinate::new(
        check_axis(lat, Axis::Latitude)?,
        check_axis(lng, Axis::Longitude)?,
    ))
}

fn check_axis(value: f64, axis: Axis) -> Result<f64, InvalidCoordinateError> {
    if !value.is_finite() {
        return Err(InvalidCoordinateError::NotFinite { axis });
    }
    if value.abs() > axis.limit() {
        return Err(InvalidCoordinateError::OutOfRange { axis, value });
    }
    Ok(value)
}

/// Resolves coordinates to wards against an immutable boundary dataset.
pub struct WardLocator {
    index: WardIndex,
}

impl WardLocator {
    /// Wraps an already-loaded dataset.
    #[must_use]
    pub fn new(dataset: BoundaryDataset) -> Self {
        Self {
            index: WardIndex::new(dataset),
        }
    }

    /// Parses already-read dataset sources.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetLoadError`] if the sources are invalid.
    pub fn from_sources(
        sources: &DatasetSources,
        config: &DatasetConfig,
    ) -> Result<Self, DatasetLoadError> {
        BoundaryDataset::parse(sources, config).map(Self::new)
    }

    /// Finds the ward containing (`lat`, `lng`).
    ///
    /// Returns `Ok(None)` when the point lies outside every ward.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinateError`] if either value is non-finite or
    /// out of range.
    pub fn locate_ward(&self, lat: f64, lng: f64) -> Result<Option<WardInfo>, InvalidCoordinateError> {
        let coordinate = validate_coordinate(lat, lng)?;
        let ward = self.index.resolve(coordinate.latitude, coordinate.longitude);

        match &ward {
            Some(info) => log::debug!("({lat}, {lng}) resolved to ward {}", info.ward_number),
            None => log::debug!("({lat}, {lng}) is outside every ward"),
        }

        Ok(ward)
    }

    /// The loaded dataset.
    #[must_use]
    pub const fn dataset(&self) -> &BoundaryDataset {
        self.index.dataset()
    }

    /// Number of loaded wards.
    #[must_use]
    pub fn ward_count(&self) -> usize {
        self.index.len()
    }
}

/// Loads configuration and the boundary dataset it names.
///
/// `config_path` falls back as described in [`config::config_path`]. The
/// raw dataset sources are returned alongside the locator for callers that
/// serve them verbatim.
///
/// # Errors
///
/// Returns [`LocatorError`] if the configuration or dataset cannot be
/// loaded.
pub fn bootstrap(
    config_path: Option<&Path>,
) -> Result<(CivicMapConfig, DatasetSources, WardLocator), LocatorError> {
    let path = config::config_path(config_path);
    let config = config::load(&path)?;
    let sources = DatasetSources::read(&config.dataset)?;
    let locator = WardLocator::from_sources(&sources, &config.dataset)?;

    Ok((config, sources, locator))
}
