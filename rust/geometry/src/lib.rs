//! CityForge Geometry Processing
//!
//! Geodetic-to-planar projection and solid mesh generation for city models,
//! using earcutr triangulation and nalgebra for the vector math.

pub mod builder;
pub mod error;
pub mod extrusion;
pub mod mesh;
pub mod projection;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};

pub use builder::build_city_model;
pub use error::{Error, Result};
pub use extrusion::extrude_footprint;
pub use mesh::{CityModel, Material, Mesh};
pub use projection::{project, ProjectionContext, ProjectionOptions, LAT_DEGREE_METERS};
pub use triangulation::triangulate_polygon;
