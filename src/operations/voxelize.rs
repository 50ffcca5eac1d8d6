use tracing::{debug, warn};

use crate::error::Result;
use crate::grid::CubeKey;
use crate::math::Point3;
use crate::source::SourceMesh;
use crate::store::{CubeStore, PlaneSample};

/// Summary of a [`Voxelize`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoxelizeReport {
    /// Points assigned to a cube.
    pub assigned: usize,
    /// Points skipped because they could not be located.
    pub skipped: usize,
    /// Cubes created by this run.
    pub cubes_created: usize,
}

#[derive(Debug, Clone, Copy)]
enum VoxelInput<'a> {
    Points(&'a [Point3]),
    Mesh(&'a SourceMesh),
}

/// Assigns source data to the cubes containing it.
///
/// In point mode every point is appended to its cube's raw points. In mesh
/// mode every triangle vertex is, and the first vertex of a triangle that
/// lands in a cube also records that triangle's normal as a plane sample,
/// so each triangle contributes at most one sample per cube.
pub struct Voxelize<'a> {
    input: VoxelInput<'a>,
}

impl<'a> Voxelize<'a> {
    /// Voxelizes a raw point cloud.
    #[must_use]
    pub fn points(points: &'a [Point3]) -> Self {
        Self {
            input: VoxelInput::Points(points),
        }
    }

    /// Voxelizes a source mesh.
    #[must_use]
    pub fn mesh(mesh: &'a SourceMesh) -> Self {
        Self {
            input: VoxelInput::Mesh(mesh),
        }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if a created cube cannot be found in the store.
    pub fn execute(&self, store: &mut CubeStore) -> Result<VoxelizeReport> {
        let mut report = VoxelizeReport::default();
        match self.input {
            VoxelInput::Points(points) => {
                for point in points {
                    assign(store, point, None, &mut report)?;
                }
            }
            VoxelInput::Mesh(mesh) => {
                for (index, triangle) in mesh.triangles.iter().enumerate() {
                    for point in &triangle.points {
                        let sample = PlaneSample {
                            triangle: index,
                            normal: triangle.normal,
                            point: *point,
                        };
                        assign(store, point, Some(sample), &mut report)?;
                    }
                }
            }
        }

        if report.skipped > 0 {
            warn!(skipped = report.skipped, "skipped points with non-finite coordinates");
        }
        debug!(
            assigned = report.assigned,
            cubes_created = report.cubes_created,
            cubes = store.cube_count(),
            "voxelized"
        );
        Ok(report)
    }
}

fn assign(
    store: &mut CubeStore,
    point: &Point3,
    sample: Option<PlaneSample>,
    report: &mut VoxelizeReport,
) -> Result<()> {
    let Some(key) = CubeKey::locate(point, store.cube_size()) else {
        report.skipped += 1;
        return Ok(());
    };
    let (id, created) = store.get_or_create(key);
    if created {
        report.cubes_created += 1;
    }
    let cube = store.cube_mut(id)?;
    cube.points.push(*point);
    if let Some(sample) = sample {
        let seen = cube
            .samples
            .last()
            .is_some_and(|s| s.triangle == sample.triangle);
        if !seen {
            cube.samples.push(sample);
        }
    }
    report.assigned += 1;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::source::SourceTriangle;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn points_are_bucketed_by_cell() {
        let mut store = CubeStore::new(0.3).unwrap();
        let points = [p(0.1, 0.1, 0.1), p(0.2, 0.05, 0.25), p(0.4, 0.1, 0.1), p(f64::NAN, 0.0, 0.0)];
        let report = Voxelize::points(&points).execute(&mut store).unwrap();
        assert_eq!(
            report,
            VoxelizeReport {
                assigned: 3,
                skipped: 1,
                cubes_created: 2
            }
        );
        let origin = store.cube_by_key(CubeKey::new(0, 0, 0)).unwrap();
        assert_eq!(origin.points.len(), 2);
        assert!(origin.samples.is_empty());
        assert_eq!(store.cube_by_key(CubeKey::new(1, 0, 0)).unwrap().points.len(), 1);
    }

    #[test]
    fn triangle_samples_each_cube_once() {
        let mut store = CubeStore::new(0.3).unwrap();
        // Two vertices in the origin cube, one in its +x neighbour.
        let t = SourceTriangle::new([p(0.1, 0.1, 0.1), p(0.1, 0.1, 0.2), p(0.4, 0.1, 0.1)]).unwrap();
        let u = SourceTriangle::new([p(0.2, 0.1, 0.1), p(0.1, 0.1, 0.25), p(0.25, 0.1, 0.25)]).unwrap();
        let mesh: SourceMesh = [t, u].into_iter().collect();
        let report = Voxelize::mesh(&mesh).execute(&mut store).unwrap();
        assert_eq!(report.assigned, 6);
        assert_eq!(report.cubes_created, 2);

        let origin = store.cube_by_key(CubeKey::new(0, 0, 0)).unwrap();
        assert_eq!(origin.points.len(), 5);
        let sampled: Vec<usize> = origin.samples.iter().map(|s| s.triangle).collect();
        assert_eq!(sampled, vec![0, 1]);
        assert_eq!(origin.samples[0].point, p(0.1, 0.1, 0.1));

        let right = store.cube_by_key(CubeKey::new(1, 0, 0)).unwrap();
        assert_eq!(right.samples.len(), 1);
        assert_eq!(right.samples[0].point, p(0.4, 0.1, 0.1));
    }

    #[test]
    fn repeated_runs_reuse_cubes() {
        let mut store = CubeStore::new(1.0).unwrap();
        let points = [p(0.5, 0.5, 0.5)];
        Voxelize::points(&points).execute(&mut store).unwrap();
        let report = Voxelize::points(&points).execute(&mut store).unwrap();
        assert_eq!(report.cubes_created, 0);
        assert_eq!(store.cube_by_key(CubeKey::new(0, 0, 0)).unwrap().points.len(), 2);
    }
}
