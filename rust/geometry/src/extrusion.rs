// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion operations - converting 2D footprints to 3D solids
//!
//! Footprints live in the XZ plane and extrude along +Y; the solid's base
//! is placed at `base_y`, its top at `base_y + height`.

use nalgebra::{Point2, Point3, Vector3};

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::triangulation::triangulate_polygon;

/// Extrude a footprint ring into a closed solid.
///
/// `nodes` are `(x, z)` pairs; a ring whose last vertex repeats the first
/// is normalized before triangulation, and the side-wall loop re-closes the
/// boundary by construction.
#[inline]
pub fn extrude_footprint(nodes: &[(f64, f64)], height: f64, base_y: f64) -> Result<Mesh> {
    if !height.is_finite() || height <= 0.0 {
        return Err(Error::InvalidExtrusion(
            "Height must be positive".to_string(),
        ));
    }
    if !base_y.is_finite() {
        return Err(Error::InvalidExtrusion(
            "Base offset must be finite".to_string(),
        ));
    }

    let ring = open_ring(nodes);
    if ring.len() < 3 {
        return Err(Error::InvalidFootprint(
            "Need at least 3 distinct vertices".to_string(),
        ));
    }

    let points: Vec<Point2<f64>> = ring.iter().map(|&(x, z)| Point2::new(x, z)).collect();
    let triangulation = triangulate_polygon(&points)?;

    let cap_vertex_count = points.len() * 2;
    let side_vertex_count = points.len() * 4;
    let mut mesh = Mesh::with_capacity(
        cap_vertex_count + side_vertex_count,
        triangulation.len() * 2 + points.len() * 6,
    );

    // Bottom and top caps
    create_cap(&points, &triangulation, base_y, Vector3::new(0.0, -1.0, 0.0), &mut mesh);
    create_cap(
        &points,
        &triangulation,
        base_y + height,
        Vector3::new(0.0, 1.0, 0.0),
        &mut mesh,
    );

    // Side walls
    create_side_walls(&points, base_y, height, &mut mesh);

    Ok(mesh)
}

/// Strip a duplicated closing vertex; the edge loop re-closes the ring.
fn open_ring(nodes: &[(f64, f64)]) -> &[(f64, f64)] {
    match (nodes.first(), nodes.last()) {
        (Some(first), Some(last)) if nodes.len() > 3 && first == last => &nodes[..nodes.len() - 1],
        _ => nodes,
    }
}

/// Create a cap (top or bottom) from the footprint triangulation
#[inline]
fn create_cap(
    points: &[Point2<f64>],
    triangulation: &[usize],
    y: f64,
    normal: Vector3<f64>,
    mesh: &mut Mesh,
) {
    let base_index = mesh.vertex_count() as u32;

    for point in points {
        mesh.add_vertex(Point3::new(point.x, y, point.y), normal);
    }

    let downward = normal.y < 0.0;
    for triangle in triangulation.chunks_exact(3) {
        let i0 = base_index + triangle[0] as u32;
        let i1 = base_index + triangle[1] as u32;
        let i2 = base_index + triangle[2] as u32;

        // Reverse winding for the bottom cap
        if downward {
            mesh.add_triangle(i0, i2, i1);
        } else {
            mesh.add_triangle(i0, i1, i2);
        }
    }
}

/// Create side walls around the footprint boundary
#[inline]
fn create_side_walls(boundary: &[Point2<f64>], base_y: f64, height: f64, mesh: &mut Mesh) {
    let base_index = mesh.vertex_count() as u32;
    let mut quad_count = 0u32;

    for i in 0..boundary.len() {
        let j = (i + 1) % boundary.len();

        let p0 = &boundary[i];
        let p1 = &boundary[j];

        // Horizontal normal for this edge
        // Use try_normalize to handle degenerate edges (duplicate consecutive points)
        let edge = Vector3::new(p1.x - p0.x, 0.0, p1.y - p0.y);
        let normal = match Vector3::new(edge.z, 0.0, -edge.x).try_normalize(1e-10) {
            Some(n) => n,
            None => continue, // Skip degenerate edge
        };

        let v0_bottom = Point3::new(p0.x, base_y, p0.y);
        let v1_bottom = Point3::new(p1.x, base_y, p1.y);
        let v0_top = Point3::new(p0.x, base_y + height, p0.y);
        let v1_top = Point3::new(p1.x, base_y + height, p1.y);

        let idx = base_index + (quad_count * 4);
        mesh.add_vertex(v0_bottom, normal);
        mesh.add_vertex(v1_bottom, normal);
        mesh.add_vertex(v1_top, normal);
        mesh.add_vertex(v0_top, normal);

        mesh.add_triangle(idx, idx + 1, idx + 2);
        mesh.add_triangle(idx, idx + 2, idx + 3);

        quad_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
    }

    #[test]
    fn test_extrude_square_counts() {
        let mesh = extrude_footprint(&unit_square(), 10.0, 0.0).unwrap();

        // 4 cap vertices per cap + 4 vertices per side quad
        assert_eq!(mesh.vertex_count(), 8 + 16);
        // 2 triangles per cap + 2 per side quad
        assert_eq!(mesh.triangle_count(), 4 + 8);
    }

    #[test]
    fn test_extrude_square_bounds() {
        let mesh = extrude_footprint(&unit_square(), 10.0, 0.0).unwrap();

        let (min, max) = mesh.bounds();
        assert!((min.x - 0.0).abs() < 0.01);
        assert!((max.x - 1.0).abs() < 0.01);
        assert!((min.y - 0.0).abs() < 0.01);
        assert!((max.y - 10.0).abs() < 0.01);
        assert!((min.z - 0.0).abs() < 0.01);
        assert!((max.z - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_extrude_with_base_offset() {
        let mesh = extrude_footprint(&unit_square(), 4.0, -2.5).unwrap();

        let (min, max) = mesh.bounds();
        assert!((min.y - -2.5).abs() < 0.01);
        assert!((max.y - 1.5).abs() < 0.01);
    }

    #[test]
    fn test_extrude_closed_ring_matches_open_ring() {
        let mut closed = unit_square();
        closed.push(closed[0]);

        let from_open = extrude_footprint(&unit_square(), 5.0, 0.0).unwrap();
        let from_closed = extrude_footprint(&closed, 5.0, 0.0).unwrap();

        assert_eq!(from_open, from_closed);
    }

    #[test]
    fn test_invalid_height() {
        assert!(extrude_footprint(&unit_square(), 0.0, 0.0).is_err());
        assert!(extrude_footprint(&unit_square(), -1.0, 0.0).is_err());
        assert!(extrude_footprint(&unit_square(), f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_too_few_vertices() {
        let result = extrude_footprint(&[(0.0, 0.0), (1.0, 0.0)], 5.0, 0.0);
        assert!(result.is_err());
    }
}
