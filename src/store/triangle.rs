use crate::math::Vector3;

use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a triangle in the cube store.
    pub struct TriangleId;
}

/// Where a triangle's current tags come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleUse {
    /// Emitted from a cube plane polygon, not yet classified.
    CubePlane,
    /// Classified against the reconstructed surface.
    MeshDerived,
}

/// Traversability label of a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accessibility {
    #[default]
    Unclassified,
    /// Inclined gently enough to walk on.
    Candidate,
    /// Too steep, or without a usable normal.
    Inaccessible,
}

/// Data associated with a triangle of the reconstructed surface.
#[derive(Debug, Clone)]
pub struct TriangleData {
    /// Creation order, unique for the lifetime of the store.
    pub serial: u64,
    /// Corner vertices, borrowed from the cube that emitted the triangle.
    pub vertices: [VertexId; 3],
    /// `(v1 - v0) × (v2 - v0)` with a non-negative Y component.
    pub normal: Vector3,
    pub use_type: TriangleUse,
    pub accessibility: Accessibility,
}

impl TriangleData {
    /// Creates an unclassified cube-plane triangle.
    #[must_use]
    pub fn new(serial: u64, vertices: [VertexId; 3], normal: Vector3) -> Self {
        Self {
            serial,
            vertices,
            normal,
            use_type: TriangleUse::CubePlane,
            accessibility: Accessibility::Unclassified,
        }
    }
}
