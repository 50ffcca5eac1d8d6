use std::collections::HashMap;

use crate::error::{Result, StoreError};
use crate::math::Vector3;
use crate::store::{CubeStore, TriangleData, VertexId};

use super::{AccessibilityFilter, TriangleMesh};

/// Converts the store's triangle table into an indexed render mesh.
///
/// Triangles are emitted in creation order. Shared vertices appear once,
/// with a normal averaged from the triangles around them.
pub struct ExportMesh {
    filter: AccessibilityFilter,
}

impl ExportMesh {
    /// Creates a new export of the triangles accepted by `filter`.
    #[must_use]
    pub fn new(filter: AccessibilityFilter) -> Self {
        Self { filter }
    }

    /// Executes the export.
    ///
    /// # Errors
    ///
    /// Returns an error if a triangle refers to a missing vertex or the mesh
    /// outgrows 32-bit indices.
    pub fn execute(&self, store: &CubeStore) -> Result<TriangleMesh> {
        let mut triangles: Vec<&TriangleData> = store
            .triangles()
            .map(|(_, t)| t)
            .filter(|t| self.filter.accepts(t.accessibility))
            .collect();
        triangles.sort_by_key(|t| t.serial);

        let mut mesh = TriangleMesh::default();
        let mut index_of: HashMap<VertexId, u32> = HashMap::new();
        for triangle in triangles {
            let mut face = [0u32; 3];
            for (slot, &vertex) in face.iter_mut().zip(&triangle.vertices) {
                let index = if let Some(&index) = index_of.get(&vertex) {
                    index
                } else {
                    let index = u32::try_from(mesh.vertices.len())
                        .map_err(|_| StoreError::TooManyVertices(mesh.vertices.len()))?;
                    mesh.vertices.push(store.point(vertex)?);
                    mesh.normals.push(Vector3::zeros());
                    index_of.insert(vertex, index);
                    index
                };
                mesh.normals[index as usize] += triangle.normal;
                *slot = index;
            }
            mesh.indices.push(face);
            mesh.labels.push(triangle.accessibility);
        }
        for normal in &mut mesh.normals {
            *normal = normal.try_normalize(0.0).unwrap_or_else(Vector3::zeros);
        }
        Ok(mesh)
    }
}
