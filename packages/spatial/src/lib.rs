#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ward boundary loading and point-in-ward resolution.
//!
//! [`BoundaryDataset`] parses the ward `GeoJSON` `FeatureCollection` and the
//! positional ward-name table once at startup. [`resolve`] and
//! [`WardIndex`] answer "which ward contains this point" against it.
//!
//! # Boundary rule
//!
//! A point lying exactly on a ward's boundary (edge or vertex, hole rings
//! included) is inside that ward. Wards are tested in load order and the
//! first containing ward wins, so a point on an edge shared by two wards
//! resolves to whichever was loaded first.

mod dataset;
mod overlap;

use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{BoundingRect, Coord, MultiPolygon};
use rstar::{AABB, RTree, RTreeObject};
use thiserror::Error;

use civic_map_ward_models::WardInfo;

pub use dataset::{
    BoundaryDataset, DatasetSources, WardNumberError, WardPolygon, WardZoneTable,
    parse_ward_number,
};
pub use overlap::{WardOverlap, find_overlaps};

/// Errors that can occur while loading the boundary dataset.
///
/// All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum DatasetLoadError {
    /// A source file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The zone table is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The boundary source is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The boundary source parsed, but is not a `FeatureCollection`.
    #[error("Boundary source is not a GeoJSON FeatureCollection")]
    NotFeatureCollection,

    /// The zone table is not an array of strings.
    #[error("Invalid ward zone table: {message}")]
    ZoneTable {
        /// Description of what went wrong.
        message: String,
    },

    /// A feature has no usable geometry or ward number.
    #[error("Invalid boundary feature at index {index}: {message}")]
    InvalidFeature {
        /// Position of the feature in the collection.
        index: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// No ward polygons survived loading.
    #[error("Boundary dataset contains no wards")]
    NoWards,
}

/// Resolves a point to the first ward polygon (in load order) containing it.
///
/// `lat`/`lng` are assumed to be finite and in range; validation belongs to
/// the caller. The point is built in `(longitude, latitude)` order to match
/// the `GeoJSON` axis convention of the polygons.
///
/// Returns `None` when no polygon contains the point.
#[must_use]
pub fn resolve(
    lat: f64,
    lng: f64,
    polygons: &[WardPolygon],
    zones: &WardZoneTable,
) -> Option<WardInfo> {
    let point = Coord { x: lng, y: lat };

    polygons
        .iter()
        .find(|ward| ward.contains(&point))
        .map(|ward| ward.to_info(zones))
}

/// An R-tree entry pointing back into the dataset's polygon list.
struct IndexEntry {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree backed ward lookup over an owned [`BoundaryDataset`].
///
/// Gives the same answers as [`resolve`]: among all wards containing the
/// point, the one loaded first wins. Immutable once built and safe to share
/// across threads.
pub struct WardIndex {
    dataset: BoundaryDataset,
    tree: RTree<IndexEntry>,
}

impl WardIndex {
    /// Builds the index over every ward in `dataset`.
    #[must_use]
    pub fn new(dataset: BoundaryDataset) -> Self {
        let entries: Vec<IndexEntry> = dataset
            .polygons()
            .iter()
            .enumerate()
            .map(|(position, ward)| IndexEntry {
                position,
                envelope: compute_envelope(ward.geometry()),
            })
            .collect();

        let tree = RTree::bulk_load(entries);
        log::debug!("Built ward R-tree with {} entries", tree.size());

        Self { dataset, tree }
    }

    /// The dataset this index was built from.
    #[must_use]
    pub const fn dataset(&self) -> &BoundaryDataset {
        &self.dataset
    }

    /// Number of indexed wards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index holds no wards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Resolves a point to its ward. See [`resolve`] for the contract.
    #[must_use]
    pub fn resolve(&self, lat: f64, lng: f64) -> Option<WardInfo> {
        let point = Coord { x: lng, y: lat };
        let query_env = AABB::from_point([lng, lat]);
        let polygons = self.dataset.polygons();

        self.tree
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| polygons[entry.position].contains(&point))
            .map(|entry| entry.position)
            .min()
            .map(|position| polygons[position].to_info(self.dataset.zones()))
    }
}

impl WardPolygon {
    /// Boundary-inclusive containment test with a bounding-box pre-filter.
    ///
    /// Each part is tested on its own: the multi-polygon mod-2 boundary
    /// rule would put a vertex or edge shared by two parts outside.
    fn contains(&self, point: &Coord<f64>) -> bool {
        let bounds = self.bounds();
        let in_bounds = bounds.min().x <= point.x
            && point.x <= bounds.max().x
            && bounds.min().y <= point.y
            && point.y <= bounds.max().y;

        in_bounds
            && self
                .geometry()
                .iter()
                .any(|part| part.coordinate_position(point) != CoordPos::Outside)
    }
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}
