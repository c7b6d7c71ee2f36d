// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Settlement metadata lookup for the area-selection collaborator.
//!
//! Resolves the city/town list of a country: one Overpass metadata query,
//! English-name fallback resolution, population filtering, and a stable
//! ordering (relations first, then larger populations).

use cityforge_core::{
    first_tag, place_query, AreaKind, ServiceError, StatusSink, ENGLISH_NAME_KEYS,
};
use rustc_hash::FxHashSet;

use crate::overpass::OverpassTransport;
use crate::retry::{fetch_with_retry, RetryPolicy};

/// Minimum settlement population surfaced to the selector UI.
pub const MIN_PLACE_POPULATION: u64 = 1000;

/// One settlement hit from the place-metadata query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub id: i64,
    pub kind: AreaKind,
    pub name: String,
    pub population: u64,
}

/// Client that resolves the settlement list of a country.
pub struct PlacesClient<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: OverpassTransport> PlacesClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            policy: RetryPolicy::METADATA,
        }
    }

    /// Fetch settlements for an ISO 3166-1 country code.
    ///
    /// Elements without a resolvable name, below the population floor, or
    /// of an unknown kind are dropped. Relations are preferred over ways
    /// over nodes; within a kind larger populations come first, and
    /// duplicate resolved names keep the first hit.
    pub async fn fetch_places(
        &self,
        country_code: &str,
        sink: &dyn StatusSink,
    ) -> Result<Vec<Place>, ServiceError> {
        let query = place_query(country_code);
        let response =
            fetch_with_retry(self.policy, sink, || self.transport.submit(&query)).await?;

        let mut places: Vec<Place> = response
            .elements
            .into_iter()
            .filter_map(|element| {
                let name = first_tag(&element.tags, &ENGLISH_NAME_KEYS)?.to_string();
                let population: u64 = element
                    .tags
                    .get("population")
                    .and_then(|raw| raw.trim().parse().ok())
                    .unwrap_or(0);
                if population < MIN_PLACE_POPULATION {
                    return None;
                }
                let kind = match element.element_type.as_str() {
                    "relation" => AreaKind::Relation,
                    "way" => AreaKind::Way,
                    "node" => AreaKind::Node,
                    _ => return None,
                };
                Some(Place {
                    id: element.id?,
                    kind,
                    name,
                    population,
                })
            })
            .collect();

        places.sort_by(|a, b| {
            kind_rank(a.kind)
                .cmp(&kind_rank(b.kind))
                .then(b.population.cmp(&a.population))
        });

        // First hit per resolved name wins.
        let mut seen = FxHashSet::default();
        places.retain(|place| seen.insert(place.name.clone()));

        tracing::info!(places = places.len(), country = %country_code, "fetched places");
        Ok(places)
    }
}

fn kind_rank(kind: AreaKind) -> u8 {
    match kind {
        AreaKind::Relation => 0,
        AreaKind::Way => 1,
        AreaKind::Node => 2,
    }
}
