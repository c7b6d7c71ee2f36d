// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CityForge Pipeline
//!
//! Orchestrates one building-data-to-mesh run: fetch footprints, look up
//! centroid elevations, project into target space, and assemble the merged
//! city model. Runs are tagged with a monotonically increasing id; starting
//! a new run supersedes the previous one, whose late results are discarded
//! instead of overwriting newer state.

pub mod config;
pub mod observer;
mod pipeline;

pub use config::Config;
pub use observer::{PipelineObserver, Stage, TracingObserver};
pub use pipeline::{Pipeline, PipelineError};
