// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The run orchestrator: sequences footprint fetch, elevation lookup,
//! projection, and mesh assembly for one area selector.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use cityforge_client::{
    ElevationClient, ElevationTransport, HttpTransport, OverpassClient, OverpassTransport,
};
use cityforge_core::{AreaSelector, Coordinate, ElevatedBuilding, ServiceError};
use cityforge_geometry::{build_city_model, project, CityModel, ProjectionOptions};
use thiserror::Error;

use crate::config::Config;
use crate::observer::{PipelineObserver, Stage};

/// Terminal pipeline failure, retaining the failed stage and its cause.
///
/// The display form is the user-facing banner text; the wrapped
/// [`ServiceError`] keeps the machine-readable cause.
#[derive(Debug, Error)]
#[error("Error {code} while {stage}.")]
pub struct PipelineError {
    code: String,
    stage: &'static str,
    #[source]
    pub source: ServiceError,
}

impl PipelineError {
    fn new(stage: &'static str, source: ServiceError) -> Self {
        let code = source
            .status()
            .map(|status| status.to_string())
            .unwrap_or_else(|| source.to_string());
        Self {
            code,
            stage,
            source,
        }
    }
}

/// Orchestrates pipeline runs; one logical task per run, newer runs
/// supersede older ones.
///
/// Every run is tagged with a monotonically increasing id. After each
/// suspension point the run re-checks the id; once superseded it stops
/// touching shared state and resolves to `Ok(None)`, so a stale async
/// continuation can never overwrite a newer result.
pub struct Pipeline<O, E> {
    overpass: OverpassClient<O>,
    elevation: ElevationClient<E>,
    options: ProjectionOptions,
    run_counter: AtomicU64,
    stage: Mutex<Stage>,
}

impl Pipeline<HttpTransport, HttpTransport> {
    /// Build a pipeline against the configured HTTP endpoints.
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        Ok(Self::new(
            OverpassClient::new(HttpTransport::new(&config.overpass_url)?),
            ElevationClient::new(HttpTransport::new(&config.elevation_url)?),
            ProjectionOptions {
                target_size: config.target_size,
                ..ProjectionOptions::default()
            },
        ))
    }
}

impl<O: OverpassTransport, E: ElevationTransport> Pipeline<O, E> {
    pub fn new(
        overpass: OverpassClient<O>,
        elevation: ElevationClient<E>,
        options: ProjectionOptions,
    ) -> Self {
        Self {
            overpass,
            elevation,
            options,
            run_counter: AtomicU64::new(0),
            stage: Mutex::new(Stage::Idle),
        }
    }

    /// Current stage of the most recent run.
    pub fn stage(&self) -> Stage {
        *lock(&self.stage)
    }

    /// Run the pipeline for one selector.
    ///
    /// Resolves to the merged model, to `None` when there was nothing to
    /// build or the run was superseded, or to the failure that stopped the
    /// run. A failure never panics and never clears previously delivered
    /// models; the pipeline stays usable for the next selection.
    pub async fn run<P>(
        &self,
        selector: AreaSelector,
        observer: &P,
    ) -> Result<Option<CityModel>, PipelineError>
    where
        P: PipelineObserver,
    {
        let run_id = self.run_counter.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(run_id, "pipeline run started");

        self.enter(run_id, Stage::FetchingBuildings, observer);
        let buildings = match self.overpass.fetch_buildings(&selector, observer).await {
            Ok(buildings) => buildings,
            Err(err) => {
                let failure = PipelineError::new("generating 3D model", err);
                if self.is_current(run_id) {
                    self.enter(run_id, Stage::Failed, observer);
                    observer.status(&failure.to_string());
                }
                tracing::warn!(run_id, error = %failure.source, "building fetch failed");
                return Err(failure);
            }
        };
        if !self.is_current(run_id) {
            tracing::debug!(run_id, "run superseded, discarding buildings");
            return Ok(None);
        }
        if buildings.is_empty() {
            tracing::info!(run_id, "no buildings in selected area");
            self.enter(run_id, Stage::Done, observer);
            return Ok(None);
        }

        self.enter(run_id, Stage::FetchingElevation, observer);
        let centroids: Vec<Coordinate> = buildings.iter().map(|b| b.centroid).collect();
        let elevations = self.elevation.fetch_elevations(&centroids, observer).await;
        if !self.is_current(run_id) {
            tracing::debug!(run_id, "run superseded, discarding elevations");
            return Ok(None);
        }

        // An empty vector means the elevation step failed closed; every
        // building falls back to no elevation.
        let elevated: Vec<ElevatedBuilding> = buildings
            .into_iter()
            .enumerate()
            .map(|(index, building)| ElevatedBuilding {
                building,
                elevation: elevations.get(index).copied().flatten(),
            })
            .collect();

        self.enter(run_id, Stage::Projecting, observer);
        let scaled = project(&elevated, &self.options);

        self.enter(run_id, Stage::BuildingMesh, observer);
        let model = build_city_model(&scaled);

        if !self.is_current(run_id) {
            tracing::debug!(run_id, "run superseded, discarding model");
            return Ok(None);
        }
        self.enter(run_id, Stage::Done, observer);
        tracing::info!(
            run_id,
            buildings = scaled.len(),
            model = model.is_some(),
            "pipeline run complete"
        );
        Ok(model)
    }

    fn is_current(&self, run_id: u64) -> bool {
        self.run_counter.load(Ordering::SeqCst) == run_id
    }

    fn enter<P: PipelineObserver>(&self, run_id: u64, stage: Stage, observer: &P) {
        if !self.is_current(run_id) {
            return;
        }
        *lock(&self.stage) = stage;
        observer.stage_changed(stage);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
