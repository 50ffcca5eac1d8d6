use tracing::debug;

use crate::error::Result;
use crate::grid::Connection;
use crate::store::{CubeId, CubeStage, CubeStore};

/// Records, for every plane-bearing cube, which of its 26 surrounding
/// cubes also bear a plane, under the connection type of their offset.
pub struct LinkNeighbors;

impl LinkNeighbors {
    /// Creates a new neighbour-linking operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the operation, returning the number of links recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if a cube cannot be found in the store.
    pub fn execute(&self, store: &mut CubeStore) -> Result<usize> {
        let mut links = 0;
        for id in store.cube_ids().to_vec() {
            let cube = store.cube(id)?;
            if !cube.has_plane() {
                continue;
            }
            let key = cube.key;
            let mut neighbors: [Option<CubeId>; Connection::COUNT] = [None; Connection::COUNT];
            for connection in Connection::ALL {
                let Some(other) = store.cube_id(key.neighbor(connection)) else {
                    continue;
                };
                if store.cube(other)?.has_plane() {
                    neighbors[connection.index()] = Some(other);
                    links += 1;
                }
            }
            let cube = store.cube_mut(id)?;
            cube.neighbors = neighbors;
            cube.stage = cube.stage.max(CubeStage::NeighborsLinked);
        }
        debug!(links, "neighbors linked");
        Ok(links)
    }
}

impl Default for LinkNeighbors {
    fn default() -> Self {
        Self::new()
    }
}
