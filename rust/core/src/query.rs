// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Overpass query construction.
//!
//! Pure text builders: one deterministic query per selector shape, plus the
//! place-metadata query used by the settlement search. The server-side
//! timeout is embedded in the query text; client-side timeout handling is
//! limited to recognizing HTTP 504 for retries.

use crate::selector::{AreaKind, AreaSelector};

/// Server-side timeout for building-footprint queries, seconds.
const BUILDING_QUERY_TIMEOUT_SECS: u32 = 1200;

/// Server-side timeout for bounding-box and place-metadata queries, seconds.
const METADATA_QUERY_TIMEOUT_SECS: u32 = 60;

/// Search radius around a point selector, meters. Tunable constant, not
/// user-configurable.
const NODE_SEARCH_RADIUS_METERS: u32 = 15_000;

/// Overpass derives a relation's area id by adding this offset.
const RELATION_AREA_OFFSET: i64 = 3_600_000_000;

/// Build the building-footprint query for one selector.
///
/// All four shapes request way-level footprints with full geometry
/// (`out body geom`).
pub fn building_query(selector: &AreaSelector) -> String {
    match selector {
        AreaSelector::NamedArea {
            id,
            kind: AreaKind::Relation,
        } => {
            let area_id = RELATION_AREA_OFFSET + id;
            format!(
                "[out:json][timeout:{BUILDING_QUERY_TIMEOUT_SECS}];
(
  way[\"building\"](area:{area_id});
);
out body geom;"
            )
        }
        AreaSelector::NamedArea {
            id,
            kind: AreaKind::Way,
        } => format!(
            "[out:json][timeout:{BUILDING_QUERY_TIMEOUT_SECS}];
way({id});
map_to_area->.searchArea;
(
  way[\"building\"](area.searchArea);
);
out body geom;"
        ),
        AreaSelector::NamedArea {
            id,
            kind: AreaKind::Node,
        } => format!(
            "[out:json][timeout:{BUILDING_QUERY_TIMEOUT_SECS}];
node({id});
(
  way[\"building\"](around:{NODE_SEARCH_RADIUS_METERS});
);
out body geom;"
        ),
        AreaSelector::BoundingBox(corners) => format!(
            "[out:json][timeout:{METADATA_QUERY_TIMEOUT_SECS}];
(
  way[\"building\"]({south},{west},{north},{east});
);
out body geom;",
            south = corners.bottom_left.lat,
            west = corners.top_left.lng,
            north = corners.top_right.lat,
            east = corners.bottom_right.lng,
        ),
    }
}

/// Build the place-metadata query for settlements in a country.
///
/// Matches city/town relations, ways, and nodes carrying a population tag
/// inside the ISO 3166-1 country area. Population filtering happens
/// client-side.
pub fn place_query(country_code: &str) -> String {
    let code = escape_quoted(country_code);
    format!(
        "[out:json][timeout:{METADATA_QUERY_TIMEOUT_SECS}];
area[\"ISO3166-1\"=\"{code}\"]->.country;
(
  relation[\"place\"~\"city|town\"][\"population\"](area.country);
  way[\"place\"~\"city|town\"][\"population\"](area.country);
  node[\"place\"~\"city|town\"][\"population\"](area.country);
);
out tags center;"
    )
}

fn escape_quoted(raw: &str) -> String {
    raw.replace('\\', r"\\").replace('"', "\\\"")
}
