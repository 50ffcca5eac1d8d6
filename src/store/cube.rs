use crate::grid::{Connection, CubeEdge, CubeKey};
use crate::math::{Point3, Vector3};

use super::triangle::TriangleId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a cube in the cube store.
    pub struct CubeId;
}

/// Pipeline progress of a cube.
///
/// A cube that never gets a plane stays at [`CubeStage::New`] and is
/// skipped by every later stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum CubeStage {
    #[default]
    New,
    PlaneFitted,
    NeighborsLinked,
    EdgesStitched,
    Triangulated,
    Classified,
}

/// A plane `dot(normal, p) = constant` fitted inside a cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubePlane {
    pub normal: Vector3,
    pub constant: f64,
}

impl CubePlane {
    /// Creates the plane with the given normal through `point`.
    #[must_use]
    pub fn through(normal: Vector3, point: &Point3) -> Self {
        Self {
            normal,
            constant: normal.dot(&point.coords),
        }
    }

    /// `dot(normal, p) - constant`; zero on the plane.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        self.normal.dot(&point.coords) - self.constant
    }
}

/// One source triangle's contribution to a cube's plane fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneSample {
    /// Index of the triangle in the source mesh.
    pub triangle: usize,
    /// Unit normal of the source triangle.
    pub normal: Vector3,
    /// First vertex of the triangle that fell into the cube.
    pub point: Point3,
}

/// Data associated with one occupied grid cell.
#[derive(Debug, Clone)]
pub struct CubeData {
    pub key: CubeKey,
    pub stage: CubeStage,
    /// Raw points assigned to the cube.
    pub points: Vec<Point3>,
    /// Source-mesh samples, at most one per source triangle.
    pub samples: Vec<PlaneSample>,
    pub plane: Option<CubePlane>,
    /// Cross-section vertex per edge slot.
    pub edges: [Option<VertexId>; CubeEdge::COUNT],
    /// Whether each edge slot has been stitched.
    pub edge_merged: [bool; CubeEdge::COUNT],
    /// Distinct vertices of the cube in creation order.
    pub vertices: Vec<VertexId>,
    pub triangles: Vec<TriangleId>,
    /// Plane-bearing neighbours by connection type.
    pub neighbors: [Option<CubeId>; Connection::COUNT],
    /// Mean normal of the cube's triangles, set by classification.
    pub average_normal: Option<Vector3>,
}

impl CubeData {
    /// Creates an empty cube for the given key.
    #[must_use]
    pub fn new(key: CubeKey) -> Self {
        Self {
            key,
            stage: CubeStage::New,
            points: Vec::new(),
            samples: Vec::new(),
            plane: None,
            edges: [None; CubeEdge::COUNT],
            edge_merged: [false; CubeEdge::COUNT],
            vertices: Vec::new(),
            triangles: Vec::new(),
            neighbors: [None; Connection::COUNT],
            average_normal: None,
        }
    }

    /// Returns `true` once a plane has been fitted.
    #[must_use]
    pub fn has_plane(&self) -> bool {
        self.plane.is_some()
    }

    /// The vertex held by an edge slot.
    #[must_use]
    pub fn edge_vertex(&self, edge: CubeEdge) -> Option<VertexId> {
        self.edges[edge.index()]
    }

    /// Returns `true` if the edge slot has been stitched.
    #[must_use]
    pub fn is_merged(&self, edge: CubeEdge) -> bool {
        self.edge_merged[edge.index()]
    }

    /// The neighbour recorded under a connection type.
    #[must_use]
    pub fn neighbor(&self, connection: Connection) -> Option<CubeId> {
        self.neighbors[connection.index()]
    }

    /// Number of recorded neighbours.
    #[must_use]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.iter().flatten().count()
    }
}
