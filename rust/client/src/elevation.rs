// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batched elevation lookup, index-aligned with its input.

use std::time::Duration;

use async_trait::async_trait;
use cityforge_core::{Coordinate, ServiceError, StatusSink};

use crate::retry::{fetch_with_retry, RetryPolicy};

/// Maximum coordinates per elevation request.
pub const ELEVATION_BATCH_SIZE: usize = 10_000;

/// Courtesy pause between consecutive batches.
const INTER_BATCH_DELAY: Duration = Duration::from_millis(100);

/// Transport port for one elevation batch lookup.
#[async_trait]
pub trait ElevationTransport: Send + Sync {
    /// Look up elevations for one batch, in request order.
    async fn lookup(&self, locations: &[Coordinate]) -> Result<Vec<Option<f64>>, ServiceError>;
}

/// Client that resolves centroid elevations batch by batch.
pub struct ElevationClient<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: ElevationTransport> ElevationClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_policy(transport, RetryPolicy::METADATA)
    }

    /// Override the retry policy (tests, impatient embedders).
    pub fn with_policy(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Fetch the elevation for every centroid, preserving input order.
    ///
    /// Returns one entry per input, or the empty vector when any batch
    /// fails: a partial result would break index alignment, so the whole
    /// step fails closed and callers fall back to zero elevation. Batches
    /// run strictly one after another.
    pub async fn fetch_elevations(
        &self,
        centroids: &[Coordinate],
        sink: &dyn StatusSink,
    ) -> Vec<Option<f64>> {
        if centroids.is_empty() {
            return Vec::new();
        }

        let batch_count = centroids.len().div_ceil(ELEVATION_BATCH_SIZE);
        let mut elevations = Vec::with_capacity(centroids.len());

        for (index, batch) in centroids.chunks(ELEVATION_BATCH_SIZE).enumerate() {
            tracing::debug!(
                batch = index + 1,
                batches = batch_count,
                size = batch.len(),
                "fetching elevation batch"
            );

            match fetch_with_retry(self.policy, sink, || self.transport.lookup(batch)).await {
                Ok(mut results) => {
                    // A short response leaves the tail unmatched, never
                    // misaligned; a long one is clipped.
                    results.truncate(batch.len());
                    results.resize(batch.len(), None);
                    elevations.extend(results);
                }
                Err(err) => {
                    sink.status(&format!("Error {err} while fetching elevations."));
                    tracing::warn!(
                        error = %err,
                        batch = index + 1,
                        "elevation batch failed, discarding elevation data"
                    );
                    return Vec::new();
                }
            }

            if index + 1 < batch_count {
                tokio::time::sleep(INTER_BATCH_DELAY).await;
            }
        }

        tracing::info!(coordinates = elevations.len(), "fetched elevations");
        elevations
    }
}
