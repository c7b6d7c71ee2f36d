// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reqwest adapters for the transport ports.
//!
//! One adapter type implements both ports; construct one per endpoint.
//! Status mapping: 504 becomes the retryable timeout class, every other
//! non-2xx is terminal, request failures without a status map to the
//! transport class, and undecodable bodies to the malformed class.

use std::time::Duration;

use async_trait::async_trait;
use cityforge_core::{Coordinate, ServiceError};
use reqwest::header::CONTENT_TYPE;

use crate::dto::{ElevationRequest, ElevationResponse, OverpassResponse};
use crate::elevation::ElevationTransport;
use crate::overpass::OverpassTransport;

/// Client-side request timeout. Building queries embed a 1200 s server-side
/// timeout, so the socket must stay open at least that long.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(1260);

/// Reqwest-backed adapter implementing both transport ports.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Build an adapter for one endpoint with the default request timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ServiceError> {
        Self::with_timeout(endpoint, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ServiceError::Transport {
                reason: err.to_string(),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl OverpassTransport for HttpTransport {
    async fn submit(&self, query: &str) -> Result<OverpassResponse, ServiceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .body(query.to_string())
            .send()
            .await
            .map_err(map_request_error)?;
        let response = check_status(response)?;

        response
            .json::<OverpassResponse>()
            .await
            .map_err(|err| ServiceError::Malformed {
                reason: err.to_string(),
            })
    }
}

#[async_trait]
impl ElevationTransport for HttpTransport {
    async fn lookup(&self, locations: &[Coordinate]) -> Result<Vec<Option<f64>>, ServiceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ElevationRequest { locations })
            .send()
            .await
            .map_err(map_request_error)?;
        let response = check_status(response)?;

        let decoded: ElevationResponse =
            response.json().await.map_err(|err| ServiceError::Malformed {
                reason: err.to_string(),
            })?;

        Ok(decoded
            .results
            .into_iter()
            .map(|result| result.elevation.filter(|value| value.is_finite()))
            .collect())
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ServiceError::from_status(status.as_u16()))
    }
}

fn map_request_error(err: reqwest::Error) -> ServiceError {
    match err.status() {
        Some(status) => ServiceError::from_status(status.as_u16()),
        None => ServiceError::Transport {
            reason: err.to_string(),
        },
    }
}
