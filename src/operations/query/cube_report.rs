use std::fmt;

use crate::error::Result;
use crate::grid::{Connection, CubeEdge, CubeKey};
use crate::math::{Point3, Vector3};
use crate::store::{Accessibility, CubeId, CubePlane, CubeStage, CubeStore};

/// A boundary vertex as listed in a [`CubeSummary`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeVertex {
    pub edge: CubeEdge,
    pub serial: u64,
    pub point: Point3,
}

/// A triangle as listed in a [`CubeSummary`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleSummary {
    pub serial: u64,
    pub vertices: [u64; 3],
    pub accessibility: Accessibility,
}

/// Everything known about one cube, resolved to plain values.
///
/// `Display` renders it as a multi-line diagnostic text.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeSummary {
    pub key: CubeKey,
    pub min: Point3,
    pub max: Point3,
    pub stage: CubeStage,
    pub point_count: usize,
    pub sample_count: usize,
    pub plane: Option<CubePlane>,
    pub merged: Vec<CubeEdge>,
    pub average_normal: Option<Vector3>,
    pub vertices: Vec<EdgeVertex>,
    pub triangles: Vec<TriangleSummary>,
    pub neighbors: Vec<(Connection, CubeKey)>,
}

/// Collects the diagnostic summary of one cube.
pub struct CubeReport {
    cube: CubeId,
}

impl CubeReport {
    /// Creates a new report query for a cube.
    #[must_use]
    pub fn new(cube: CubeId) -> Self {
        Self { cube }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the cube or anything it refers to is missing.
    pub fn execute(&self, store: &CubeStore) -> Result<CubeSummary> {
        let cube = store.cube(self.cube)?;
        let size = store.cube_size();

        let mut vertices = Vec::new();
        for edge in CubeEdge::ALL {
            if let Some(v) = cube.edge_vertex(edge) {
                let data = store.vertex(v)?;
                vertices.push(EdgeVertex {
                    edge,
                    serial: data.serial,
                    point: data.point,
                });
            }
        }

        let mut triangles = Vec::with_capacity(cube.triangles.len());
        for t in &cube.triangles {
            let data = store.triangle(*t)?;
            let mut serials = [0u64; 3];
            for (slot, v) in serials.iter_mut().zip(&data.vertices) {
                *slot = store.vertex(*v)?.serial;
            }
            triangles.push(TriangleSummary {
                serial: data.serial,
                vertices: serials,
                accessibility: data.accessibility,
            });
        }

        let mut neighbors = Vec::new();
        for connection in Connection::ALL {
            if let Some(other) = cube.neighbor(connection) {
                neighbors.push((connection, store.cube(other)?.key));
            }
        }

        Ok(CubeSummary {
            key: cube.key,
            min: cube.key.world_min(size),
            max: cube.key.world_max(size),
            stage: cube.stage,
            point_count: cube.points.len(),
            sample_count: cube.samples.len(),
            plane: cube.plane,
            merged: CubeEdge::ALL
                .into_iter()
                .filter(|e| cube.is_merged(*e))
                .collect(),
            average_normal: cube.average_normal,
            vertices,
            triangles,
            neighbors,
        })
    }
}

impl fmt::Display for CubeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cube {}", self.key)?;
        writeln!(
            f,
            "bounds ({:.4}, {:.4}, {:.4}) - ({:.4}, {:.4}, {:.4})",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )?;
        writeln!(f, "stage {:?}", self.stage)?;
        writeln!(f, "points {}, samples {}", self.point_count, self.sample_count)?;
        match &self.plane {
            Some(plane) => writeln!(
                f,
                "plane {:.6}x + {:.6}y + {:.6}z = {:.6}",
                plane.normal.x, plane.normal.y, plane.normal.z, plane.constant
            )?,
            None => writeln!(f, "plane none")?,
        }
        write!(f, "merged")?;
        if self.merged.is_empty() {
            write!(f, " none")?;
        }
        for edge in &self.merged {
            write!(f, " {edge}")?;
        }
        writeln!(f)?;
        if let Some(n) = &self.average_normal {
            writeln!(f, "average normal ({:.6}, {:.6}, {:.6})", n.x, n.y, n.z)?;
        }
        writeln!(f, "vertices {}", self.vertices.len())?;
        for v in &self.vertices {
            writeln!(
                f,
                "  {} #{} ({:.4}, {:.4}, {:.4})",
                v.edge, v.serial, v.point.x, v.point.y, v.point.z
            )?;
        }
        writeln!(f, "triangles {}", self.triangles.len())?;
        for t in &self.triangles {
            writeln!(
                f,
                "  #{} [{}, {}, {}] {:?}",
                t.serial, t.vertices[0], t.vertices[1], t.vertices[2], t.accessibility
            )?;
        }
        writeln!(f, "neighbors {}", self.neighbors.len())?;
        for (connection, key) in &self.neighbors {
            writeln!(f, "  {connection} {key}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn summary_of_bare_cube() {
        let mut store = CubeStore::new(0.5).unwrap();
        let (id, _) = store.get_or_create(CubeKey::new(1, 0, -1));
        store.cube_mut(id).unwrap().points.push(p(0.6, 0.1, -0.2));
        let summary = CubeReport::new(id).execute(&store).unwrap();
        assert_eq!(summary.point_count, 1);
        assert!(summary.plane.is_none());
        let text = summary.to_string();
        assert!(text.starts_with("cube 1/2,0/1,-1/0\n"));
        assert!(text.contains("bounds (0.5000, 0.0000, -0.5000) - (1.0000, 0.5000, 0.0000)"));
        assert!(text.contains("plane none"));
        assert!(text.contains("merged none"));
        assert!(text.contains("neighbors 0"));
    }

    #[test]
    fn summary_lists_vertices_and_neighbors() {
        let mut store = CubeStore::new(1.0).unwrap();
        let (id, _) = store.get_or_create(CubeKey::new(0, 0, 0));
        let (right, _) = store.get_or_create(CubeKey::new(1, 0, 0));
        let v = store.add_vertex(p(1.0, 0.25, 0.0));
        store.attach_edge_vertex(id, CubeEdge::CG, v).unwrap();
        let cube = store.cube_mut(id).unwrap();
        cube.neighbors[Connection::Right.index()] = Some(right);
        cube.edge_merged[CubeEdge::CG.index()] = true;

        let summary = CubeReport::new(id).execute(&store).unwrap();
        assert_eq!(summary.merged, vec![CubeEdge::CG]);
        assert_eq!(summary.vertices.len(), 1);
        assert_eq!(summary.neighbors, vec![(Connection::Right, CubeKey::new(1, 0, 0))]);
        let text = summary.to_string();
        assert!(text.contains("merged CG"));
        assert!(text.contains("  CG #0 (1.0000, 0.2500, 0.0000)"));
        assert!(text.contains("  Right 1/2,0/1,0/1"));
    }
}
