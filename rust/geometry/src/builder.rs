// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! City model assembly: extrude every valid footprint and merge the solids
//! into one mesh behind a single shared material.

use cityforge_core::ScaledBuilding;

use crate::extrusion::extrude_footprint;
use crate::mesh::{CityModel, Material, Mesh};

/// Build the merged city model from scaled buildings.
///
/// Buildings failing validity (fewer than 3 nodes, any non-finite value)
/// are skipped silently, as are per-building extrusion failures; neither is
/// fatal to the run. Returns `None` when zero valid solids were produced -
/// "no model to display", not an error.
pub fn build_city_model(buildings: &[ScaledBuilding]) -> Option<CityModel> {
    let mut solids: Vec<Mesh> = Vec::with_capacity(buildings.len());

    for building in buildings {
        if !is_valid(building) {
            continue;
        }
        if let Ok(solid) = extrude_footprint(
            &building.nodes,
            building.height,
            -building.elevation_offset,
        ) {
            if !solid.is_empty() {
                solids.push(solid);
            }
        }
    }

    if solids.is_empty() {
        return None;
    }

    let mut mesh = Mesh::new();
    mesh.merge_all(&solids);

    Some(CityModel {
        mesh,
        material: Material::default(),
    })
}

fn is_valid(building: &ScaledBuilding) -> bool {
    building.nodes.len() >= 3
        && building.height.is_finite()
        && building.elevation_offset.is_finite()
        && building
            .nodes
            .iter()
            .all(|&(x, z)| x.is_finite() && z.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (size, 0.0), (size, size), (0.0, size)]
    }

    fn scaled(nodes: Vec<(f64, f64)>, height: f64, elevation_offset: f64) -> ScaledBuilding {
        ScaledBuilding {
            nodes,
            height,
            elevation_offset,
        }
    }

    #[test]
    fn test_empty_input_yields_no_model() {
        assert!(build_city_model(&[]).is_none());
    }

    #[test]
    fn test_single_building_model() {
        let model = build_city_model(&[scaled(square(10.0), 24.0, 0.0)]).unwrap();

        assert!(!model.mesh.is_empty());
        assert_eq!(model.material, Material::default());

        let (min, max) = model.mesh.bounds();
        assert!((min.y - 0.0).abs() < 0.01);
        assert!((max.y - 24.0).abs() < 0.01);
    }

    #[test]
    fn test_base_sits_at_negative_elevation_offset() {
        let model = build_city_model(&[scaled(square(10.0), 24.0, 6.0)]).unwrap();

        let (min, max) = model.mesh.bounds();
        assert!((min.y - -6.0).abs() < 0.01);
        assert!((max.y - 18.0).abs() < 0.01);
    }

    #[test]
    fn test_invalid_buildings_are_skipped_silently() {
        let valid = scaled(square(10.0), 24.0, 0.0);
        let too_short = scaled(vec![(0.0, 0.0), (1.0, 1.0)], 24.0, 0.0);
        let not_finite = scaled(
            vec![(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)],
            24.0,
            0.0,
        );
        let bad_height = scaled(square(5.0), f64::INFINITY, 0.0);

        let solo = build_city_model(std::slice::from_ref(&valid)).unwrap();
        let mixed =
            build_city_model(&[too_short, not_finite, valid, bad_height]).unwrap();

        assert_eq!(mixed.mesh.vertex_count(), solo.mesh.vertex_count());
        assert_eq!(mixed.mesh.triangle_count(), solo.mesh.triangle_count());
    }

    #[test]
    fn test_all_invalid_yields_no_model() {
        let buildings = vec![
            scaled(vec![(0.0, 0.0), (1.0, 1.0)], 24.0, 0.0),
            scaled(square(5.0), 0.0, 0.0),
        ];
        assert!(build_city_model(&buildings).is_none());
    }

    #[test]
    fn test_solids_merge_into_one_mesh() {
        let mut far_square = square(10.0);
        for node in &mut far_square {
            node.0 += 100.0;
        }

        let model = build_city_model(&[
            scaled(square(10.0), 24.0, 0.0),
            scaled(far_square, 48.0, 3.0),
        ])
        .unwrap();

        let single = build_city_model(&[scaled(square(10.0), 24.0, 0.0)]).unwrap();
        assert_eq!(model.mesh.vertex_count(), single.mesh.vertex_count() * 2);

        // Merged indices stay in range of the combined vertex buffer.
        let max_index = *model.mesh.indices.iter().max().unwrap() as usize;
        assert!(max_index < model.mesh.vertex_count());
    }
}
