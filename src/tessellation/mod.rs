mod export_mesh;
mod triangulate_cubes;

pub use export_mesh::ExportMesh;
pub use triangulate_cubes::{
    order_pentagon, split_quad, triangulate_polygon, TriangulateCubes, TriangulationReport,
};

use crate::math::triangle::triangle_area;
use crate::math::{Point3, Vector3};
use crate::store::Accessibility;

/// Which triangles an export includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessibilityFilter {
    /// Every triangle, classified or not.
    #[default]
    All,
    /// Only triangles labeled [`Accessibility::Candidate`].
    Candidate,
    /// Only triangles labeled [`Accessibility::Inaccessible`].
    Inaccessible,
}

impl AccessibilityFilter {
    /// Returns `true` if a triangle with this label passes the filter.
    #[must_use]
    pub fn accepts(self, label: Accessibility) -> bool {
        match self {
            Self::All => true,
            Self::Candidate => label == Accessibility::Candidate,
            Self::Inaccessible => label == Accessibility::Inaccessible,
        }
    }
}

/// An indexed triangle mesh of the reconstructed surface.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Unit vertex normals (zero where no direction is defined).
    pub normals: Vec<Vector3>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
    /// Accessibility label of each triangle.
    pub labels: Vec<Accessibility>,
}

impl TriangleMesh {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Total area of all triangles.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.indices
            .iter()
            .map(|[a, b, c]| {
                triangle_area(
                    &self.vertices[*a as usize],
                    &self.vertices[*b as usize],
                    &self.vertices[*c as usize],
                )
            })
            .sum()
    }
}
