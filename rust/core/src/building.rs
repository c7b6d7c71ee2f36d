// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized building records flowing through the pipeline.

use serde::{Deserialize, Serialize};

/// Storey count used when the level tags are absent or unparseable.
pub const DEFAULT_LEVELS: u32 = 3;

/// Latitude/longitude pair, in the field order the elevation wire format
/// uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// One building footprint after parse-time filtering.
///
/// Invariant: `nodes.len() >= 3` and every coordinate is finite. Elements
/// violating either are dropped before they enter the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Footprint ring as `(lon, lat)` pairs, source order preserved. The
    /// first vertex implicitly closes the ring with the last.
    pub nodes: Vec<(f64, f64)>,
    /// Storey count from the building tags, `DEFAULT_LEVELS` when absent.
    pub levels: u32,
    /// Mean of all ring vertices, rounded to 4 decimal places.
    pub centroid: Coordinate,
}

impl Building {
    /// Normalize a raw ring into a building, computing its centroid.
    ///
    /// Returns `None` when the ring has fewer than 3 vertices or any
    /// non-finite coordinate; such elements are dropped, never fatal.
    pub fn from_ring(nodes: Vec<(f64, f64)>, levels: u32) -> Option<Self> {
        if nodes.len() < 3 {
            return None;
        }
        if nodes
            .iter()
            .any(|&(lon, lat)| !lon.is_finite() || !lat.is_finite())
        {
            return None;
        }
        let centroid = centroid_of(&nodes);
        Some(Self {
            nodes,
            levels: levels.max(1),
            centroid,
        })
    }
}

/// Arithmetic mean of all ring vertices, duplicated endpoints included,
/// rounded to 4 decimal places.
pub fn centroid_of(nodes: &[(f64, f64)]) -> Coordinate {
    let count = nodes.len() as f64;
    let (lon_sum, lat_sum) = nodes
        .iter()
        .fold((0.0, 0.0), |(lon, lat), &(l, a)| (lon + l, lat + a));
    Coordinate {
        latitude: round4(lat_sum / count),
        longitude: round4(lon_sum / count),
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Building plus the elevation looked up at its centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevatedBuilding {
    pub building: Building,
    /// `None` when the elevation source produced no value at this index.
    pub elevation: Option<f64>,
}

/// Final pipeline unit, in target-space units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledBuilding {
    /// Footprint ring as `(x, z)` pairs.
    pub nodes: Vec<(f64, f64)>,
    /// Extrusion height.
    pub height: f64,
    /// Base lift above the lowest elevation in the batch, `>= 0`.
    pub elevation_offset: f64,
}
