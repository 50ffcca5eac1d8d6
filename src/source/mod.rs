//! Source data handed to the reconstruction: triangle meshes and the
//! organized depth grids they are built from.

pub mod depth_grid;
pub mod mesh;

pub use depth_grid::{BuildSourceMesh, DepthGrid};
pub use mesh::{SourceMesh, SourceTriangle};
