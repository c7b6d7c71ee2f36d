// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration loaded from environment variables.

/// Public Overpass API endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Public Open-Elevation lookup endpoint.
pub const DEFAULT_ELEVATION_URL: &str = "https://api.open-elevation.com/api/v1/lookup";

/// Default target-space size of the projected model.
pub const DEFAULT_TARGET_SIZE: f64 = 3000.0;

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Overpass query endpoint.
    pub overpass_url: String,
    /// Elevation lookup endpoint.
    pub elevation_url: String,
    /// Target-space size the larger geographic span normalizes to.
    pub target_size: f64,
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// public endpoints and a 3000-unit model.
    pub fn from_env() -> Self {
        Self {
            overpass_url: std::env::var("CITYFORGE_OVERPASS_URL")
                .unwrap_or_else(|_| DEFAULT_OVERPASS_URL.into()),
            elevation_url: std::env::var("CITYFORGE_ELEVATION_URL")
                .unwrap_or_else(|_| DEFAULT_ELEVATION_URL.into()),
            target_size: std::env::var("CITYFORGE_TARGET_SIZE")
                .ok()
                .and_then(|raw| raw.parse::<f64>().ok())
                .filter(|size| size.is_finite() && *size > 0.0)
                .unwrap_or(DEFAULT_TARGET_SIZE),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
