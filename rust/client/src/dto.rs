// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire DTOs for the Overpass and elevation services.
//!
//! Responses are decoded into these transport shapes first, then mapped
//! into domain records in one pass.

use cityforge_core::{parse_levels, Building, Coordinate, TagMap};
use serde::{Deserialize, Serialize};

/// Decoded Overpass response body.
#[derive(Debug, Default, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

/// One raw Overpass element, owned transiently during normalization.
#[derive(Debug, Default, Deserialize)]
pub struct OverpassElement {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "type", default)]
    pub element_type: String,
    /// Ordered footprint ring; the first vertex implicitly closes with the
    /// last.
    #[serde(default)]
    pub geometry: Vec<GeoPoint>,
    #[serde(default)]
    pub tags: TagMap,
}

/// One `{lon, lat}` vertex of an element's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl OverpassElement {
    /// Normalize into a building record.
    ///
    /// Returns `None` for degenerate elements (short ring, non-finite
    /// coordinate); those are dropped per-entry, never fatal.
    pub fn into_building(self) -> Option<Building> {
        let levels = parse_levels(&self.tags);
        let nodes = self.geometry.iter().map(|p| (p.lon, p.lat)).collect();
        Building::from_ring(nodes, levels)
    }
}

/// Elevation request body: `{"locations": [{latitude, longitude}, ...]}`.
#[derive(Debug, Serialize)]
pub struct ElevationRequest<'a> {
    pub locations: &'a [Coordinate],
}

/// Decoded elevation response body, results in request order.
#[derive(Debug, Default, Deserialize)]
pub struct ElevationResponse {
    #[serde(default)]
    pub results: Vec<ElevationResult>,
}

/// One elevation lookup result.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ElevationResult {
    #[serde(default)]
    pub elevation: Option<f64>,
}
