use crate::math::Point3;

slotmap::new_key_type! {
    /// Unique identifier for a cross-section vertex in the cube store.
    pub struct VertexId;
}

/// A boundary vertex shared by every cube edge slot that refers to it.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// Creation order, unique for the lifetime of the store.
    pub serial: u64,
    /// The 3D position of the vertex.
    pub point: Point3,
    /// Number of cube edge slots holding this vertex.
    pub owners: usize,
}

impl VertexData {
    /// Creates an unowned vertex at the given point.
    #[must_use]
    pub fn new(serial: u64, point: Point3) -> Self {
        Self {
            serial,
            point,
            owners: 0,
        }
    }
}
