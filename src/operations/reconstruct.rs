use tracing::{info, info_span};

use crate::error::{ConfigError, Result};
use crate::math::Point3;
use crate::params::{PlaneFitMethod, ReconstructionParams};
use crate::source::SourceMesh;
use crate::store::{Accessibility, CubeStore};
use crate::tessellation::TriangulateCubes;

use super::{ClassifyAccessibility, FitPlanes, LinkNeighbors, StitchEdges, Voxelize};

/// Counts describing a finished reconstruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconstructionStats {
    pub cubes: usize,
    pub planar_cubes: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub candidates: usize,
    pub inaccessible: usize,
    /// Edge slots switched to a shared vertex while stitching.
    pub merges: usize,
}

impl ReconstructionStats {
    /// Counts the current contents of a store.
    ///
    /// Merges are not recorded in the store and are reported as zero.
    #[must_use]
    pub fn collect(store: &CubeStore) -> Self {
        let mut stats = Self {
            cubes: store.cube_count(),
            planar_cubes: store.cubes().filter(|(_, c)| c.has_plane()).count(),
            vertices: store.vertex_count(),
            triangles: store.triangle_count(),
            ..Self::default()
        };
        for (_, t) in store.triangles() {
            match t.accessibility {
                Accessibility::Candidate => stats.candidates += 1,
                Accessibility::Inaccessible => stats.inaccessible += 1,
                Accessibility::Unclassified => {}
            }
        }
        stats
    }
}

/// The store produced by [`Reconstruct`] together with its statistics.
#[derive(Debug)]
pub struct Reconstruction {
    pub store: CubeStore,
    pub stats: ReconstructionStats,
}

#[derive(Debug, Clone, Copy)]
enum Source<'a> {
    Points(&'a [Point3]),
    Mesh(&'a SourceMesh),
}

/// Runs the whole pipeline on a fresh store.
///
/// Voxelize, fit planes and cross-sections, link neighbours, stitch edges,
/// triangulate, classify. Every stage finishes over all cubes before the
/// next one starts.
pub struct Reconstruct<'a> {
    source: Source<'a>,
    params: ReconstructionParams,
}

impl<'a> Reconstruct<'a> {
    /// Reconstructs from a raw point cloud.
    ///
    /// Planes are fitted with [`PlaneFitMethod::PointStrip`] unless other
    /// parameters are set. Parameters passed to [`Self::with_params`] must
    /// select a point method.
    #[must_use]
    pub fn from_points(points: &'a [Point3]) -> Self {
        Self {
            source: Source::Points(points),
            params: ReconstructionParams::default().with_plane_fit(PlaneFitMethod::PointStrip),
        }
    }

    /// Reconstructs from a source mesh.
    #[must_use]
    pub fn from_mesh(mesh: &'a SourceMesh) -> Self {
        Self {
            source: Source::Mesh(mesh),
            params: ReconstructionParams::default(),
        }
    }

    /// Sets custom parameters.
    #[must_use]
    pub fn with_params(mut self, params: ReconstructionParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the reconstruction.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid, or if a point cloud
    /// is paired with a plane fit method that needs source-mesh samples.
    pub fn execute(&self) -> Result<Reconstruction> {
        self.params.validate()?;
        if matches!(self.source, Source::Points(_)) && !self.params.plane_fit.uses_points() {
            return Err(ConfigError::PlaneFitNeedsMesh(self.params.plane_fit).into());
        }
        let span = info_span!("reconstruct", cube_size = self.params.cube_size);
        let _guard = span.enter();

        let mut store = CubeStore::new(self.params.cube_size)?;
        match self.source {
            Source::Points(points) => Voxelize::points(points).execute(&mut store)?,
            Source::Mesh(mesh) => Voxelize::mesh(mesh).execute(&mut store)?,
        };
        FitPlanes::new(self.params).execute(&mut store)?;
        LinkNeighbors::new().execute(&mut store)?;
        let stitched = StitchEdges::new().execute(&mut store)?;
        TriangulateCubes::new().execute(&mut store)?;
        ClassifyAccessibility::new(self.params).execute(&mut store)?;

        let stats = ReconstructionStats {
            merges: stitched.merges,
            ..ReconstructionStats::collect(&store)
        };
        info!(
            cubes = stats.cubes,
            planar_cubes = stats.planar_cubes,
            vertices = stats.vertices,
            triangles = stats.triangles,
            candidates = stats.candidates,
            inaccessible = stats.inaccessible,
            merges = stats.merges,
            "reconstruction finished"
        );
        Ok(Reconstruction { store, stats })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PatchMeshError;
    use crate::source::SourceTriangle;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    /// A flat square of `n × n` cells of size `step` at height `y`,
    /// two triangles per cell.
    fn flat_mesh(n: u32, step: f64, y: f64) -> SourceMesh {
        let mut mesh = SourceMesh::new();
        for i in 0..n {
            for j in 0..n {
                let (x0, z0) = (f64::from(i) * step, f64::from(j) * step);
                let (x1, z1) = (x0 + step, z0 + step);
                mesh.push(SourceTriangle::new([p(x0, y, z0), p(x0, y, z1), p(x1, y, z1)]).unwrap());
                mesh.push(SourceTriangle::new([p(x0, y, z0), p(x1, y, z1), p(x1, y, z0)]).unwrap());
            }
        }
        mesh
    }

    #[test]
    fn flat_floor_is_fully_accessible() {
        let mesh = flat_mesh(6, 0.1, 0.15);
        let result = Reconstruct::from_mesh(&mesh).execute().unwrap();
        let stats = result.stats;
        assert!(stats.planar_cubes > 0);
        assert_eq!(stats.triangles, stats.candidates);
        assert_eq!(stats.inaccessible, 0);
        assert!(stats.merges > 0);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let mesh = flat_mesh(1, 0.1, 0.0);
        let params = ReconstructionParams::default().with_cube_size(-1.0);
        assert!(Reconstruct::from_mesh(&mesh).with_params(params).execute().is_err());
    }

    #[test]
    fn point_cloud_needs_a_point_method() {
        // On the plane y = 0.1 + 0.1x + 0.05z; no three consecutive points are collinear.
        let pts: Vec<Point3> = [(0.02, 0.02), (0.2, 0.05), (0.05, 0.2), (0.25, 0.25), (0.1, 0.12)]
            .iter()
            .map(|&(x, z)| p(x, 0.1 + 0.1 * x + 0.05 * z, z))
            .collect();
        let params = ReconstructionParams::default().with_cube_size(0.3);
        let err = Reconstruct::from_points(&pts).with_params(params).execute();
        assert!(matches!(
            err,
            Err(PatchMeshError::Config(ConfigError::PlaneFitNeedsMesh(
                PlaneFitMethod::MeshNormals
            )))
        ));

        let strip = params.with_plane_fit(PlaneFitMethod::PointStrip);
        let result = Reconstruct::from_points(&pts).with_params(strip).execute().unwrap();
        assert!(result.stats.planar_cubes > 0);
    }

    #[test]
    fn empty_input_gives_empty_store() {
        let result = Reconstruct::from_points(&[]).execute().unwrap();
        assert_eq!(result.stats, ReconstructionStats::default());
    }

    #[test]
    fn collect_counts_store() {
        let mesh = flat_mesh(3, 0.1, 0.15);
        let result = Reconstruct::from_mesh(&mesh).execute().unwrap();
        let collected = ReconstructionStats::collect(&result.store);
        assert_eq!(collected.triangles, result.stats.triangles);
        assert_eq!(collected.merges, 0);
    }
}
