// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geodetic-to-planar projection and uniform scaling.
//!
//! Local equirectangular approximation: degrees of longitude/latitude are
//! treated as locally proportional to meters around the batch center. Valid
//! only for areas small relative to Earth's curvature; that accuracy bound
//! is part of the contract, not a defect.

use cityforge_core::{ElevatedBuilding, ScaledBuilding};

/// Meters per degree of latitude.
pub const LAT_DEGREE_METERS: f64 = 111_320.0;

/// Tunables for one projection run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionOptions {
    /// Target-space size the larger geographic span normalizes to.
    pub target_size: f64,
    /// Physical storey height in meters, applied before scaling.
    pub meters_per_level: f64,
    /// Center the output on the origin; otherwise shift both axes by
    /// `target_size / 2` into the positive quadrant.
    pub center_origin: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            target_size: 3000.0,
            meters_per_level: 24.0,
            center_origin: true,
        }
    }
}

/// Projection state derived once per batch.
///
/// Shared read-only by every per-building transform in a run; the scale is
/// identical for both axes and all buildings (uniform, isotropic), so
/// footprint shapes and relative areas survive projection undistorted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionContext {
    pub center_lon: f64,
    pub center_lat: f64,
    pub lon_to_meters: f64,
    pub lat_to_meters: f64,
    pub scale: f64,
    pub min_elevation: f64,
}

impl ProjectionContext {
    /// Derive the context from every vertex and every known elevation in
    /// the batch. Returns `None` for an empty batch.
    pub fn from_buildings(
        buildings: &[ElevatedBuilding],
        options: &ProjectionOptions,
    ) -> Option<Self> {
        if buildings.is_empty() {
            return None;
        }

        let mut min_lon = f64::INFINITY;
        let mut max_lon = f64::NEG_INFINITY;
        let mut min_lat = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        let mut min_elevation = f64::INFINITY;

        for elevated in buildings {
            for &(lon, lat) in &elevated.building.nodes {
                min_lon = min_lon.min(lon);
                max_lon = max_lon.max(lon);
                min_lat = min_lat.min(lat);
                max_lat = max_lat.max(lat);
            }
            if let Some(elevation) = elevated.elevation {
                min_elevation = min_elevation.min(elevation);
            }
        }

        let center_lat = (min_lat + max_lat) / 2.0;
        let lon_to_meters = LAT_DEGREE_METERS * center_lat.to_radians().cos();

        let width_meters = (max_lon - min_lon) * lon_to_meters;
        let height_meters = (max_lat - min_lat) * LAT_DEGREE_METERS;
        let scale = options.target_size / width_meters.max(height_meters);

        Some(Self {
            center_lon: (min_lon + max_lon) / 2.0,
            center_lat,
            lon_to_meters,
            lat_to_meters: LAT_DEGREE_METERS,
            scale,
            min_elevation,
        })
    }
}

/// Project every building into target space.
///
/// Building order and vertex order within each ring are preserved; the
/// transform is deterministic, so re-running it on the same input yields
/// bit-identical output.
pub fn project(buildings: &[ElevatedBuilding], options: &ProjectionOptions) -> Vec<ScaledBuilding> {
    let Some(ctx) = ProjectionContext::from_buildings(buildings, options) else {
        return Vec::new();
    };

    let offset = if options.center_origin {
        0.0
    } else {
        options.target_size / 2.0
    };

    buildings
        .iter()
        .map(|elevated| {
            let nodes = elevated
                .building
                .nodes
                .iter()
                .map(|&(lon, lat)| {
                    let x = (lon - ctx.center_lon) * ctx.lon_to_meters * ctx.scale + offset;
                    let z = (lat - ctx.center_lat) * ctx.lat_to_meters * ctx.scale + offset;
                    (x, z)
                })
                .collect();

            let elevation_offset = elevated
                .elevation
                .map(|elevation| (elevation - ctx.min_elevation) * ctx.scale)
                .unwrap_or(0.0);

            let height =
                f64::from(elevated.building.levels) * options.meters_per_level * ctx.scale;

            ScaledBuilding {
                nodes,
                height,
                elevation_offset,
            }
        })
        .collect()
}
