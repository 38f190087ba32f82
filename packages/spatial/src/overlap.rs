//! Data-quality check for overlapping ward polygons.
//!
//! Resolution is first-match in load order, so two wards whose interiors
//! intersect make the answer for the shared area depend on file order.
//! This pass only reports such pairs; it never changes resolution.

use geo::{Rect, Relate};

use crate::WardPolygon;

/// Two wards whose interiors intersect. `first` precedes `second` in load
/// order and is the one that wins lookups in the shared area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WardOverlap {
    /// Ward number loaded first.
    pub first: u32,
    /// Ward number loaded later.
    pub second: u32,
}

/// Finds every pair of wards whose interiors intersect.
///
/// Wards that only share an edge or a vertex do not count.
#[must_use]
pub fn find_overlaps(polygons: &[WardPolygon]) -> Vec<WardOverlap> {
    let mut overlaps = Vec::new();

    for (i, a) in polygons.iter().enumerate() {
        for b in &polygons[i + 1..] {
            if !rects_intersect(a.bounds(), b.bounds()) {
                continue;
            }

            let matrix = a.geometry().relate(b.geometry());
            if matrix.is_intersects() && !matrix.is_touches() {
                overlaps.push(WardOverlap {
                    first: a.ward_number(),
                    second: b.ward_number(),
                });
            }
        }
    }

    overlaps
}

fn rects_intersect(a: Rect<f64>, b: Rect<f64>) -> bool {
    a.min().x <= b.max().x && b.min().x <= a.max().x && a.min().y <= b.max().y && b.min().y <= a.max().y
}
