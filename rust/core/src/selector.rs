// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Area selection shapes, produced by the selection collaborator and
//! consumed once per pipeline run.

use serde::{Deserialize, Serialize};

/// Geographic point in degrees, in the `lat`/`lng` order the map-picker
/// collaborator emits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Rectangle described by its four corners.
///
/// The Overpass bounding-box filter consumes `bottom_left.lat`,
/// `top_left.lng`, `top_right.lat`, `bottom_right.lng` in exactly that
/// order; the corners are kept separate so the contract stays visible at
/// the query-construction site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top_left: LatLng,
    pub top_right: LatLng,
    pub bottom_left: LatLng,
    pub bottom_right: LatLng,
}

/// OSM element kind a named area is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaKind {
    Relation,
    Way,
    Node,
}

/// Area selection for one pipeline run. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AreaSelector {
    /// A named OSM object: a settlement relation, an enclosing way, or a
    /// point node searched by radius.
    NamedArea { id: i64, kind: AreaKind },
    /// A literal rectangle picked on the map.
    BoundingBox(BoundingBox),
}
