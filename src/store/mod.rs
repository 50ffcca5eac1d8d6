pub mod cube;
pub mod triangle;
pub mod vertex;

pub use cube::{CubeData, CubeId, CubePlane, CubeStage, PlaneSample};
pub use triangle::{Accessibility, TriangleData, TriangleId, TriangleUse};
pub use vertex::{VertexData, VertexId};

use std::collections::HashMap;

use crate::error::{ConfigError, StoreError};
use crate::grid::{CubeEdge, CubeKey};
use crate::math::{Point3, Vector3};
use slotmap::SlotMap;

/// Central arena that owns all cubes, vertices and triangles of a run.
///
/// Cubes refer to their neighbours, vertices and triangles by typed IDs
/// (generational indices), so the mutual neighbour relation needs no
/// shared references. Cubes are never removed; vertices are removed once
/// no cube edge slot refers to them.
#[derive(Debug)]
pub struct CubeStore {
    cube_size: f64,
    cubes: SlotMap<CubeId, CubeData>,
    order: Vec<CubeId>,
    keys: HashMap<CubeKey, CubeId>,
    vertices: SlotMap<VertexId, VertexData>,
    triangles: SlotMap<TriangleId, TriangleData>,
    next_vertex: u64,
    next_triangle: u64,
}

impl CubeStore {
    /// Creates an empty store for cubes of the given edge length.
    ///
    /// # Errors
    ///
    /// Returns an error if `cube_size` is not finite and positive.
    pub fn new(cube_size: f64) -> Result<Self, ConfigError> {
        if !cube_size.is_finite() {
            return Err(ConfigError::NotFinite {
                parameter: "cube_size",
                value: cube_size,
            });
        }
        if cube_size <= 0.0 {
            return Err(ConfigError::OutOfRange {
                parameter: "cube_size",
                value: cube_size,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        Ok(Self {
            cube_size,
            cubes: SlotMap::with_key(),
            order: Vec::new(),
            keys: HashMap::new(),
            vertices: SlotMap::with_key(),
            triangles: SlotMap::with_key(),
            next_vertex: 0,
            next_triangle: 0,
        })
    }

    /// Edge length of every cube in world units.
    #[must_use]
    pub fn cube_size(&self) -> f64 {
        self.cube_size
    }

    // --- Cube operations ---

    /// Returns the cube for `key`, creating it on first reference.
    ///
    /// The flag is `true` when the cube was created by this call.
    pub fn get_or_create(&mut self, key: CubeKey) -> (CubeId, bool) {
        if let Some(&id) = self.keys.get(&key) {
            return (id, false);
        }
        let id = self.cubes.insert(CubeData::new(key));
        self.order.push(id);
        self.keys.insert(key, id);
        (id, true)
    }

    /// Looks up the cube with the given key.
    #[must_use]
    pub fn cube_id(&self, key: CubeKey) -> Option<CubeId> {
        self.keys.get(&key).copied()
    }

    /// Returns the cube with the given key.
    ///
    /// # Errors
    ///
    /// Returns an error if no cube has that key.
    pub fn cube_by_key(&self, key: CubeKey) -> Result<&CubeData, StoreError> {
        let id = self
            .cube_id(key)
            .ok_or_else(|| StoreError::UnknownKey(key.to_string()))?;
        self.cube(id)
    }

    /// Returns a reference to the cube data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn cube(&self, id: CubeId) -> Result<&CubeData, StoreError> {
        self.cubes
            .get(id)
            .ok_or(StoreError::EntityNotFound("cube"))
    }

    /// Returns a mutable reference to the cube data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn cube_mut(&mut self, id: CubeId) -> Result<&mut CubeData, StoreError> {
        self.cubes
            .get_mut(id)
            .ok_or(StoreError::EntityNotFound("cube"))
    }

    /// Cube IDs in creation order.
    #[must_use]
    pub fn cube_ids(&self) -> &[CubeId] {
        &self.order
    }

    /// Iterates over cubes in creation order.
    pub fn cubes(&self) -> impl Iterator<Item = (CubeId, &CubeData)> {
        self.order
            .iter()
            .filter_map(|&id| self.cubes.get(id).map(|cube| (id, cube)))
    }

    /// Number of cubes.
    #[must_use]
    pub fn cube_count(&self) -> usize {
        self.order.len()
    }

    // --- Vertex operations ---

    /// Inserts an unowned vertex with the next serial and returns its ID.
    pub fn add_vertex(&mut self, point: Point3) -> VertexId {
        let serial = self.next_vertex;
        self.next_vertex += 1;
        self.vertices.insert(VertexData::new(serial, point))
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, StoreError> {
        self.vertices
            .get(id)
            .ok_or(StoreError::EntityNotFound("vertex"))
    }

    /// Returns a mutable reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData, StoreError> {
        self.vertices
            .get_mut(id)
            .ok_or(StoreError::EntityNotFound("vertex"))
    }

    /// Position of a vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn point(&self, id: VertexId) -> Result<Point3, StoreError> {
        Ok(self.vertex(id)?.point)
    }

    /// Iterates over live vertices in arbitrary order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    /// Number of live vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Stores `vertex` in an empty edge slot of `cube`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cube or vertex does not exist.
    pub fn attach_edge_vertex(
        &mut self,
        cube: CubeId,
        edge: CubeEdge,
        vertex: VertexId,
    ) -> Result<(), StoreError> {
        self.vertex_mut(vertex)?.owners += 1;
        let data = self.cube_mut(cube)?;
        data.edges[edge.index()] = Some(vertex);
        if !data.vertices.contains(&vertex) {
            data.vertices.push(vertex);
        }
        Ok(())
    }

    /// Makes an edge slot of `cube` refer to `vertex` instead of its
    /// current vertex, which loses one owner.
    ///
    /// The cube's vertex list keeps its order: the replaced vertex's entry
    /// is overwritten. Returns `true` if the replaced vertex was removed
    /// from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the cube or either vertex does not exist.
    pub fn replace_edge_vertex(
        &mut self,
        cube: CubeId,
        edge: CubeEdge,
        vertex: VertexId,
    ) -> Result<bool, StoreError> {
        self.vertex_mut(vertex)?.owners += 1;
        let data = self.cube_mut(cube)?;
        let previous = data.edges[edge.index()].replace(vertex);
        let still_held = previous.is_some_and(|old| data.edges.contains(&Some(old)));
        match previous {
            Some(old) if !still_held => {
                let already_listed = data.vertices.contains(&vertex);
                if let Some(pos) = data.vertices.iter().position(|v| *v == old) {
                    if already_listed {
                        data.vertices.remove(pos);
                    } else {
                        data.vertices[pos] = vertex;
                    }
                }
            }
            _ => {
                if !data.vertices.contains(&vertex) {
                    data.vertices.push(vertex);
                }
            }
        }
        match previous {
            Some(old) => self.release_vertex(old),
            None => Ok(false),
        }
    }

    /// Drops one owner of a vertex, removing it once no owner remains.
    ///
    /// Returns `true` if the vertex was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn release_vertex(&mut self, id: VertexId) -> Result<bool, StoreError> {
        let data = self.vertex_mut(id)?;
        data.owners = data.owners.saturating_sub(1);
        if data.owners == 0 {
            self.vertices.remove(id);
            return Ok(true);
        }
        Ok(false)
    }

    // --- Triangle operations ---

    /// Inserts an unclassified triangle with the next serial and returns its ID.
    pub fn add_triangle(&mut self, vertices: [VertexId; 3], normal: Vector3) -> TriangleId {
        let serial = self.next_triangle;
        self.next_triangle += 1;
        self.triangles
            .insert(TriangleData::new(serial, vertices, normal))
    }

    /// Returns a reference to the triangle data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn triangle(&self, id: TriangleId) -> Result<&TriangleData, StoreError> {
        self.triangles
            .get(id)
            .ok_or(StoreError::EntityNotFound("triangle"))
    }

    /// Returns a mutable reference to the triangle data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn triangle_mut(&mut self, id: TriangleId) -> Result<&mut TriangleData, StoreError> {
        self.triangles
            .get_mut(id)
            .ok_or(StoreError::EntityNotFound("triangle"))
    }

    /// Iterates over triangles in arbitrary order.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId, &TriangleData)> {
        self.triangles.iter()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}
