// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User-facing progress reporting.

/// Sink for transient, human-readable status messages.
///
/// Retry waits, elevation failures, and pipeline stage labels all go
/// through this trait; the embedding application surfaces them wherever it
/// shows status. An empty message clears the current status.
pub trait StatusSink: Send + Sync {
    fn status(&self, message: &str);
}

/// Sink that discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn status(&self, _message: &str) {}
}

/// Sink that forwards non-empty messages to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn status(&self, message: &str) {
        if !message.is_empty() {
            tracing::info!(status = %message, "status update");
        }
    }
}
