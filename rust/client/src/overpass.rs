// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building-footprint retrieval and normalization.

use async_trait::async_trait;
use cityforge_core::{building_query, AreaSelector, Building, ServiceError, StatusSink};

use crate::dto::{OverpassElement, OverpassResponse};
use crate::retry::{fetch_with_retry, RetryPolicy};

/// Transport port for submitting Overpass query text.
#[async_trait]
pub trait OverpassTransport: Send + Sync {
    /// Submit raw query text and decode the response.
    async fn submit(&self, query: &str) -> Result<OverpassResponse, ServiceError>;
}

/// Client that turns an area selector into normalized building records.
pub struct OverpassClient<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: OverpassTransport> OverpassClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_policy(transport, RetryPolicy::BUILDINGS)
    }

    /// Override the retry policy (tests, impatient embedders).
    pub fn with_policy(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Fetch and normalize every building footprint in the selected area.
    ///
    /// Elements with fewer than 3 vertices or a non-finite coordinate are
    /// dropped; the remaining buildings keep their source order. Terminal
    /// failures (after retries, or any non-timeout error) propagate to the
    /// caller, which reports them and keeps the process alive.
    pub async fn fetch_buildings(
        &self,
        selector: &AreaSelector,
        sink: &dyn StatusSink,
    ) -> Result<Vec<Building>, ServiceError> {
        let query = building_query(selector);
        let response =
            fetch_with_retry(self.policy, sink, || self.transport.submit(&query)).await?;

        let total = response.elements.len();
        let buildings: Vec<Building> = response
            .elements
            .into_iter()
            .filter_map(OverpassElement::into_building)
            .collect();

        if buildings.len() < total {
            tracing::debug!(
                dropped = total - buildings.len(),
                "dropped degenerate building footprints"
            );
        }
        tracing::info!(buildings = buildings.len(), "fetched building footprints");

        Ok(buildings)
    }
}
