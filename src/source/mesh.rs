use crate::error::InputError;
use crate::math::triangle::unit_normal;
use crate::math::{Point3, Vector3};

/// A source-mesh triangle with its unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceTriangle {
    pub points: [Point3; 3],
    pub normal: Vector3,
}

impl SourceTriangle {
    /// Creates a triangle, computing its normal from the winding.
    ///
    /// Returns `None` for degenerate triangles.
    #[must_use]
    pub fn new(points: [Point3; 3]) -> Option<Self> {
        let normal = unit_normal(&points[0], &points[1], &points[2])?;
        Some(Self { points, normal })
    }

    /// Creates a triangle with a precomputed normal.
    #[must_use]
    pub fn with_normal(points: [Point3; 3], normal: Vector3) -> Self {
        Self { points, normal }
    }
}

/// An ordered list of source triangles.
#[derive(Debug, Clone, Default)]
pub struct SourceMesh {
    pub triangles: Vec<SourceTriangle>,
}

impl SourceMesh {
    /// Creates an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mesh from shared positions and index triples.
    ///
    /// Degenerate triangles are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if an index is out of range.
    pub fn from_indexed(positions: &[Point3], indices: &[[u32; 3]]) -> Result<Self, InputError> {
        let mut mesh = Self::new();
        for (t, tri) in indices.iter().enumerate() {
            let mut points = [Point3::origin(); 3];
            for (slot, &index) in points.iter_mut().zip(tri) {
                *slot = usize::try_from(index)
                    .ok()
                    .and_then(|i| positions.get(i))
                    .copied()
                    .ok_or_else(|| {
                        InputError::Invalid(format!(
                            "triangle {t} refers to vertex {index} of {}",
                            positions.len()
                        ))
                    })?;
            }
            if let Some(triangle) = SourceTriangle::new(points) {
                mesh.push(triangle);
            }
        }
        Ok(mesh)
    }

    /// Appends a triangle.
    pub fn push(&mut self, triangle: SourceTriangle) {
        self.triangles.push(triangle);
    }

    /// Number of triangles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Returns `true` if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

impl FromIterator<SourceTriangle> for SourceMesh {
    fn from_iter<I: IntoIterator<Item = SourceTriangle>>(iter: I) -> Self {
        Self {
            triangles: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn normal_follows_winding() {
        let t = SourceTriangle::new([p(0.0, 0.0, 0.0), p(0.0, 0.0, 2.0), p(3.0, 0.0, 0.0)]).unwrap();
        assert_relative_eq!(t.normal, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn degenerate_triangle_has_no_normal() {
        assert!(SourceTriangle::new([p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0), p(2.0, 2.0, 2.0)]).is_none());
    }

    #[test]
    fn indexed_mesh() {
        let positions = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 0.0, 1.0), p(1.0, 0.0, 1.0)];
        let mesh = SourceMesh::from_indexed(&positions, &[[0, 2, 1], [1, 2, 3], [0, 0, 1]]).unwrap();
        // The repeated-index triangle is dropped.
        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh.triangles[1].points[2], positions[3]);
    }

    #[test]
    fn indexed_mesh_rejects_out_of_range() {
        let positions = [p(0.0, 0.0, 0.0)];
        let err = SourceMesh::from_indexed(&positions, &[[0, 1, 2]]).unwrap_err();
        assert!(matches!(err, InputError::Invalid(_)));
    }
}
