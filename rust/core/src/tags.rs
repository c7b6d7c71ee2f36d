// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tag lookup with ordered fallback keys.
//!
//! OSM tags are a free-form string map; the interesting values hide behind
//! several candidate keys of varying quality. Lookups here take an ordered
//! key list and the first present key wins.

use rustc_hash::FxHashMap;

use crate::building::DEFAULT_LEVELS;

/// String-keyed OSM tag map.
pub type TagMap = FxHashMap<String, String>;

/// Display-name keys, best first.
pub const ENGLISH_NAME_KEYS: [&str; 5] = [
    "name:en",
    "int_name",
    "name:latin",
    "official_name:en",
    "name",
];

/// Storey-count keys, best first.
pub const BUILDING_LEVEL_KEYS: [&str; 2] = ["building:levels", "levels"];

/// First value present for any of `keys`, in order.
pub fn first_tag<'a>(tags: &'a TagMap, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| tags.get(*key).map(String::as_str))
}

/// Storey count from the level tags.
///
/// Values are parsed as floats (OSM allows half levels) and rounded.
/// Absent, unparseable, or sub-1 values fall back to `DEFAULT_LEVELS`.
pub fn parse_levels(tags: &TagMap) -> u32 {
    first_tag(tags, &BUILDING_LEVEL_KEYS)
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|levels| levels.is_finite() && *levels >= 1.0)
        .map(|levels| levels.round() as u32)
        .unwrap_or(DEFAULT_LEVELS)
}
