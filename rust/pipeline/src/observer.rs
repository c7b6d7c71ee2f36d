// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Progress reporting for pipeline runs.

use cityforge_core::StatusSink;

/// Pipeline run stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    FetchingBuildings,
    FetchingElevation,
    Projecting,
    BuildingMesh,
    Done,
    Failed,
}

impl Stage {
    /// Human-readable progress label shown while the stage runs. Terminal
    /// stages map to the empty label, which clears the status display.
    pub fn label(self) -> &'static str {
        match self {
            Stage::FetchingBuildings => "Generating 3D model, please wait...",
            Stage::FetchingElevation => "Looking up terrain elevation...",
            Stage::Projecting => "Projecting coordinates...",
            Stage::BuildingMesh => "Building city mesh...",
            Stage::Idle | Stage::Done | Stage::Failed => "",
        }
    }
}

/// Observer for stage transitions and transient status messages.
///
/// The [`StatusSink`] half carries retry waits and error text from the
/// service clients; `stage_changed` adds the coarse run state for progress
/// indicators. The default implementation forwards each stage's label as a
/// status message.
pub trait PipelineObserver: StatusSink {
    fn stage_changed(&self, stage: Stage) {
        self.status(stage.label());
    }
}

/// Observer that forwards everything to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StatusSink for TracingObserver {
    fn status(&self, message: &str) {
        if !message.is_empty() {
            tracing::info!(status = %message, "pipeline status");
        }
    }
}

impl PipelineObserver for TracingObserver {
    fn stage_changed(&self, stage: Stage) {
        tracing::info!(stage = ?stage, "pipeline stage");
    }
}
