// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CityForge Core
//!
//! Shared data model for the building-data-to-mesh pipeline: area
//! selectors, normalized building records, Overpass query construction,
//! tag lookup with ordered fallback keys, the service error taxonomy, and
//! the progress-reporting trait every stage speaks through.
//!
//! This crate holds no I/O; the HTTP clients live in `cityforge-client`
//! and the geometry stages in `cityforge-geometry`.

pub mod building;
pub mod error;
pub mod progress;
pub mod query;
pub mod selector;
pub mod tags;

pub use building::{
    centroid_of, Building, Coordinate, ElevatedBuilding, ScaledBuilding, DEFAULT_LEVELS,
};
pub use error::{Result, ServiceError};
pub use progress::{NullSink, StatusSink, TracingSink};
pub use query::{building_query, place_query};
pub use selector::{AreaKind, AreaSelector, BoundingBox, LatLng};
pub use tags::{first_tag, parse_levels, TagMap, BUILDING_LEVEL_KEYS, ENGLISH_NAME_KEYS};
