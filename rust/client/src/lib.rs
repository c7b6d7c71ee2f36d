// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CityForge Client
//!
//! HTTP clients for the two external services the pipeline talks to: the
//! Overpass query service (building footprints, place metadata) and the
//! elevation lookup service. Each client sits behind a transport port so
//! tests run against fakes; the reqwest adapter in [`http`] implements
//! both ports for production use.
//!
//! Retry with exponential backoff is a cross-cutting concern implemented
//! once in [`retry`] and shared by every call site.

pub mod dto;
pub mod elevation;
pub mod http;
pub mod overpass;
pub mod places;
pub mod retry;

pub use elevation::{ElevationClient, ElevationTransport, ELEVATION_BATCH_SIZE};
pub use http::HttpTransport;
pub use overpass::{OverpassClient, OverpassTransport};
pub use places::{Place, PlacesClient};
pub use retry::{fetch_with_retry, RetryPolicy};
