#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the ward lookup server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the lookup service's own types to allow independent evolution of
//! the API contract.

use civic_map_ward_models::{CoordinateSource, WardInfo};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Always `true` once the server is accepting requests.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Number of loaded wards.
    pub wards: usize,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Body of `POST /api/geo/locate`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocateRequest {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

/// Query parameters for `POST /api/reports/location`.
///
/// Kept as text so that blank or non-numeric form values fall through to
/// "missing location" instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportLocationQuery {
    /// Latitude as entered.
    pub lat: Option<String>,
    /// Longitude as entered.
    pub lng: Option<String>,
}

/// A report location resolved to a ward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReportLocation {
    /// Latitude used for the lookup.
    pub latitude: f64,
    /// Longitude used for the lookup.
    pub longitude: f64,
    /// Where the coordinate came from.
    pub source: CoordinateSource,
    /// The ward containing the point.
    pub ward: WardInfo,
}
