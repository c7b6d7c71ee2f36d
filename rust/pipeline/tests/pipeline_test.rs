// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orchestrator tests against scripted transports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use cityforge_client::dto::{GeoPoint, OverpassElement, OverpassResponse};
use cityforge_client::{ElevationClient, ElevationTransport, OverpassClient, OverpassTransport};
use cityforge_core::{AreaKind, AreaSelector, Coordinate, ServiceError, StatusSink};
use cityforge_geometry::ProjectionOptions;
use cityforge_pipeline::{Pipeline, PipelineObserver, Stage};
use tokio::sync::Notify;

#[derive(Default)]
struct RecordingObserver {
    stages: Mutex<Vec<Stage>>,
    messages: Mutex<Vec<String>>,
}

impl StatusSink for RecordingObserver {
    fn status(&self, message: &str) {
        self.messages
            .lock()
            .expect("messages lock")
            .push(message.to_string());
    }
}

impl PipelineObserver for RecordingObserver {
    fn stage_changed(&self, stage: Stage) {
        self.stages.lock().expect("stages lock").push(stage);
        self.status(stage.label());
    }
}

fn quad(lon: f64, lat: f64, levels: &str) -> OverpassElement {
    OverpassElement {
        geometry: vec![
            GeoPoint { lon, lat },
            GeoPoint { lon: lon + 0.001, lat },
            GeoPoint { lon: lon + 0.001, lat: lat + 0.001 },
            GeoPoint { lon, lat: lat + 0.001 },
        ],
        tags: [("building:levels".to_string(), levels.to_string())]
            .into_iter()
            .collect(),
        ..OverpassElement::default()
    }
}

fn selector() -> AreaSelector {
    AreaSelector::NamedArea {
        id: 5_997_314,
        kind: AreaKind::Relation,
    }
}

struct ScriptedOverpass {
    responses: Mutex<Vec<Result<OverpassResponse, ServiceError>>>,
}

impl ScriptedOverpass {
    fn new(responses: Vec<Result<OverpassResponse, ServiceError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
        }
    }

    fn once(elements: Vec<OverpassElement>) -> Self {
        Self::new(vec![Ok(OverpassResponse { elements })])
    }
}

#[async_trait]
impl OverpassTransport for ScriptedOverpass {
    async fn submit(&self, _query: &str) -> Result<OverpassResponse, ServiceError> {
        self.responses.lock().expect("responses lock").remove(0)
    }
}

struct FlatElevation {
    /// Elevation handed out per request index, or an error for the batch.
    fail: bool,
}

#[async_trait]
impl ElevationTransport for FlatElevation {
    async fn lookup(&self, locations: &[Coordinate]) -> Result<Vec<Option<f64>>, ServiceError> {
        if self.fail {
            return Err(ServiceError::from_status(500));
        }
        Ok((0..locations.len())
            .map(|i| Some(150.0 + 10.0 * i as f64))
            .collect())
    }
}

fn pipeline(
    overpass: ScriptedOverpass,
    elevation: FlatElevation,
) -> Pipeline<ScriptedOverpass, FlatElevation> {
    Pipeline::new(
        OverpassClient::new(overpass),
        ElevationClient::new(elevation),
        ProjectionOptions::default(),
    )
}

#[tokio::test(start_paused = true)]
async fn happy_path_builds_one_model() {
    let pipeline = pipeline(
        ScriptedOverpass::once(vec![quad(16.30, 48.10, "2"), quad(16.32, 48.12, "5")]),
        FlatElevation { fail: false },
    );
    let observer = RecordingObserver::default();

    let model = pipeline
        .run(selector(), &observer)
        .await
        .expect("run succeeds")
        .expect("model produced");

    // Two extruded quad footprints merged into one mesh.
    assert_eq!(model.mesh.vertex_count(), 2 * 24);
    assert_eq!(model.mesh.triangle_count(), 2 * 12);

    let stages = observer.stages.lock().expect("stages lock").clone();
    assert_eq!(
        stages,
        vec![
            Stage::FetchingBuildings,
            Stage::FetchingElevation,
            Stage::Projecting,
            Stage::BuildingMesh,
            Stage::Done,
        ]
    );
    assert_eq!(pipeline.stage(), Stage::Done);

    // Done clears the transient status message.
    let messages = observer.messages.lock().expect("messages lock").clone();
    assert_eq!(messages.last().map(String::as_str), Some(""));
}

#[tokio::test(start_paused = true)]
async fn second_building_sits_below_datum_when_elevated() {
    let pipeline = pipeline(
        ScriptedOverpass::once(vec![quad(16.30, 48.10, "2"), quad(16.32, 48.12, "2")]),
        FlatElevation { fail: false },
    );

    let model = pipeline
        .run(selector(), &RecordingObserver::default())
        .await
        .expect("run succeeds")
        .expect("model produced");

    // Building 2 is 10 m above the batch minimum; its base is repositioned
    // to minus the scaled offset.
    let (min, _) = model.mesh.bounds();
    assert!(min.y < 0.0);
}

#[tokio::test(start_paused = true)]
async fn terminal_fetch_failure_reports_and_fails() {
    let pipeline = pipeline(
        ScriptedOverpass::new(vec![Err(ServiceError::from_status(500))]),
        FlatElevation { fail: false },
    );
    let observer = RecordingObserver::default();

    let error = pipeline
        .run(selector(), &observer)
        .await
        .expect_err("run fails");

    assert_eq!(error.to_string(), "Error 500 while generating 3D model.");
    assert_eq!(error.source, ServiceError::Status { status: 500 });
    assert_eq!(pipeline.stage(), Stage::Failed);

    let messages = observer.messages.lock().expect("messages lock").clone();
    assert_eq!(
        messages.last().map(String::as_str),
        Some("Error 500 while generating 3D model.")
    );
}

#[tokio::test(start_paused = true)]
async fn retries_timeouts_before_succeeding() {
    let pipeline = pipeline(
        ScriptedOverpass::new(vec![
            Err(ServiceError::from_status(504)),
            Err(ServiceError::from_status(504)),
            Ok(OverpassResponse {
                elements: vec![quad(16.30, 48.10, "3")],
            }),
        ]),
        FlatElevation { fail: false },
    );
    let observer = RecordingObserver::default();

    let model = pipeline
        .run(selector(), &observer)
        .await
        .expect("run succeeds")
        .expect("model produced");

    assert_eq!(model.mesh.vertex_count(), 24);

    let messages = observer.messages.lock().expect("messages lock").clone();
    let retries: Vec<&String> = messages
        .iter()
        .filter(|m| m.contains("Server timeout (504)"))
        .collect();
    assert_eq!(retries.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn empty_area_completes_without_model() {
    let pipeline = pipeline(ScriptedOverpass::once(Vec::new()), FlatElevation { fail: false });

    let result = pipeline
        .run(selector(), &RecordingObserver::default())
        .await
        .expect("run succeeds");

    assert!(result.is_none());
    assert_eq!(pipeline.stage(), Stage::Done);
}

#[tokio::test(start_paused = true)]
async fn elevation_failure_falls_back_to_flat_ground() {
    let pipeline = pipeline(
        ScriptedOverpass::once(vec![quad(16.30, 48.10, "2"), quad(16.32, 48.12, "2")]),
        FlatElevation { fail: true },
    );
    let observer = RecordingObserver::default();

    let model = pipeline
        .run(selector(), &observer)
        .await
        .expect("run succeeds")
        .expect("model still produced");

    // Every base sits on the datum.
    let (min, _) = model.mesh.bounds();
    assert_eq!(min.y, 0.0);

    let messages = observer.messages.lock().expect("messages lock").clone();
    assert!(messages
        .iter()
        .any(|m| m.contains("while fetching elevations")));
}

struct GatedOverpass {
    calls: AtomicUsize,
    gate: Notify,
}

#[async_trait]
impl OverpassTransport for GatedOverpass {
    async fn submit(&self, _query: &str) -> Result<OverpassResponse, ServiceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            // First run stalls until the second run has gone through.
            self.gate.notified().await;
            Ok(OverpassResponse {
                elements: vec![quad(0.0, 0.0, "1")],
            })
        } else {
            self.gate.notify_waiters();
            Ok(OverpassResponse {
                elements: vec![quad(16.30, 48.10, "4")],
            })
        }
    }
}

#[tokio::test(start_paused = true)]
async fn stale_run_is_superseded_by_newer_run() {
    let pipeline = Pipeline::new(
        OverpassClient::new(GatedOverpass {
            calls: AtomicUsize::new(0),
            gate: Notify::new(),
        }),
        ElevationClient::new(FlatElevation { fail: false }),
        ProjectionOptions::default(),
    );
    let observer = RecordingObserver::default();

    let (stale, fresh) = tokio::join!(
        pipeline.run(selector(), &observer),
        pipeline.run(selector(), &observer),
    );

    // The older run resolves without a model; the newer one delivers.
    assert!(stale.expect("stale run resolves cleanly").is_none());
    assert!(fresh.expect("fresh run resolves cleanly").is_some());
    assert_eq!(pipeline.stage(), Stage::Done);
}
