use tracing::debug;

use crate::error::Result;
use crate::grid::CubeEdge;
use crate::store::{CubeId, CubeStage, CubeStore, VertexId};

/// Summary of a [`StitchEdges`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StitchReport {
    /// Neighbour edge slots switched to a shared vertex.
    pub merges: usize,
    /// Vertices removed because no edge slot referred to them anymore.
    pub vertices_released: usize,
}

/// Merges the cross-section vertices that neighbouring cubes computed on
/// a common geometric edge.
///
/// A single forward sweep visits every plane-bearing cube and each of its
/// unmerged edges. The vertex's free-axis coordinate (the one solved from
/// the plane) is averaged with the neighbours' vertices on the same edge
/// line, written back in place, and every neighbour slot is pointed at the
/// shared vertex and marked merged, so it is skipped when its own cube is
/// visited.
pub struct StitchEdges;

impl StitchEdges {
    /// Creates a new stitching operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if a linked cube or vertex cannot be found in the store.
    pub fn execute(&self, store: &mut CubeStore) -> Result<StitchReport> {
        let mut report = StitchReport::default();
        for id in store.cube_ids().to_vec() {
            if !store.cube(id)?.has_plane() {
                continue;
            }
            for edge in CubeEdge::ALL {
                stitch_edge(store, id, edge, &mut report)?;
            }
            let cube = store.cube_mut(id)?;
            cube.stage = cube.stage.max(CubeStage::EdgesStitched);
        }
        debug!(
            merges = report.merges,
            vertices_released = report.vertices_released,
            vertices = store.vertex_count(),
            "edges stitched"
        );
        Ok(report)
    }
}

impl Default for StitchEdges {
    fn default() -> Self {
        Self::new()
    }
}

fn stitch_edge(
    store: &mut CubeStore,
    id: CubeId,
    edge: CubeEdge,
    report: &mut StitchReport,
) -> Result<()> {
    let cube = store.cube(id)?;
    if cube.is_merged(edge) {
        return Ok(());
    }
    let Some(own) = cube.edge_vertex(edge) else {
        return Ok(());
    };

    let mut participants: Vec<(CubeId, CubeEdge, VertexId)> = Vec::with_capacity(3);
    for (connection, complement) in edge
        .sharing_neighbors()
        .into_iter()
        .zip(edge.complementary_edges())
    {
        let Some(other) = cube.neighbor(connection) else {
            continue;
        };
        if let Some(theirs) = store.cube(other)?.edge_vertex(complement) {
            if theirs != own {
                participants.push((other, complement, theirs));
            }
        }
    }

    let axis = edge.free_axis().index();
    let mut sum = store.point(own)?.coords[axis];
    for &(other, complement, theirs) in &participants {
        store.cube_mut(other)?.edge_merged[complement.index()] = true;
        sum += store.point(theirs)?.coords[axis];
    }
    #[allow(clippy::cast_precision_loss)]
    let average = sum / (participants.len() + 1) as f64;
    store.vertex_mut(own)?.point.coords[axis] = average;

    for &(other, complement, _) in &participants {
        if store.replace_edge_vertex(other, complement, own)? {
            report.vertices_released += 1;
        }
        report.merges += 1;
    }
    store.cube_mut(id)?.edge_merged[edge.index()] = true;
    Ok(())
}
