// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded retry with exponential backoff for transient service failures.

use std::future::Future;
use std::time::Duration;

use cityforge_core::{ServiceError, StatusSink};

/// Retry budget and backoff base for one class of service calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Metadata queries: place lookups and elevation batches.
    pub const METADATA: Self = Self {
        max_retries: 3,
        base_delay: Duration::from_millis(2000),
    };

    /// Building-footprint queries, which the server chews on for longer.
    pub const BUILDINGS: Self = Self {
        max_retries: 3,
        base_delay: Duration::from_millis(3000),
    };

    /// Backoff before retry number `attempt` (zero-based): `base * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Run `operation`, retrying transient failures within the policy budget.
///
/// Only [`ServiceError::is_transient`] failures are retried; any other
/// failure, or exhaustion of the budget, propagates unchanged immediately.
/// One status message is emitted per retry before the backoff sleep;
/// success emits nothing.
pub async fn fetch_with_retry<T, F, Fut>(
    policy: RetryPolicy,
    sink: &dyn StatusSink,
    mut operation: F,
) -> Result<T, ServiceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ServiceError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                attempt += 1;
                sink.status(&format!(
                    "Server timeout (504). Retrying in {}s... (attempt {}/{})",
                    delay.as_secs(),
                    attempt,
                    policy.max_retries
                ));
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "transient service timeout, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
