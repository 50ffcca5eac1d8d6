use tracing::{debug, trace};

use crate::error::Result;
use crate::math::triangle::{orient_up, unit_normal};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::params::{PlaneFitMethod, ReconstructionParams};
use crate::store::{CubePlane, CubeStage, CubeStore, PlaneSample};

use super::cross_section::CrossSection;

/// Summary of a [`FitPlanes`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitReport {
    /// Cubes that received a plane.
    pub planes: usize,
    /// Cubes left without a plane.
    pub skipped: usize,
    /// Cross-section vertices created.
    pub vertices: usize,
}

/// Fits a plane in every new cube and intersects it with the cube's edges.
///
/// Cubes without enough samples stay at [`CubeStage::New`].
pub struct FitPlanes {
    params: ReconstructionParams,
}

impl FitPlanes {
    /// Creates a new plane-fitting operation.
    #[must_use]
    pub fn new(params: ReconstructionParams) -> Self {
        Self { params }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or their cube size
    /// differs from the store's.
    pub fn execute(&self, store: &mut CubeStore) -> Result<FitReport> {
        self.params.validate_for_store(store.cube_size())?;
        let mut report = FitReport::default();

        for id in store.cube_ids().to_vec() {
            let cube = store.cube(id)?;
            if cube.stage != CubeStage::New {
                continue;
            }
            let Some(plane) = fit_plane(&self.params, &cube.samples, &cube.points) else {
                trace!(key = %cube.key, "cube has no plane");
                report.skipped += 1;
                continue;
            };
            let cube = store.cube_mut(id)?;
            cube.plane = Some(plane);
            cube.stage = CubeStage::PlaneFitted;
            report.planes += 1;
            report.vertices += CrossSection::new(id).execute(store)?;
        }

        debug!(
            planes = report.planes,
            skipped = report.skipped,
            vertices = report.vertices,
            "planes fitted"
        );
        Ok(report)
    }
}

/// Fits a plane with the configured method.
#[must_use]
pub fn fit_plane(
    params: &ReconstructionParams,
    samples: &[PlaneSample],
    points: &[Point3],
) -> Option<CubePlane> {
    let min = params.min_plane_samples;
    let eps = params.plane_epsilon;
    match params.plane_fit {
        PlaneFitMethod::MeshNormals if samples.len() >= min => mesh_normals(samples, eps),
        PlaneFitMethod::PointStrip if points.len() >= min => point_strip(points, eps),
        PlaneFitMethod::PointFan if points.len() >= min => point_fan(points, eps),
        PlaneFitMethod::PointMerge if points.len() >= min => point_merge(points, eps),
        _ => None,
    }
}

/// Mean of the sample normals through the first sample point.
#[must_use]
pub fn mesh_normals(samples: &[PlaneSample], epsilon: f64) -> Option<CubePlane> {
    let first = samples.first()?;
    let sum: Vector3 = samples.iter().map(|s| s.normal).sum();
    finish(sum, samples.len(), &first.point, epsilon)
}

/// Mean normal of consecutive point triples through the last point.
#[must_use]
pub fn point_strip(points: &[Point3], epsilon: f64) -> Option<CubePlane> {
    let anchor = points.last()?;
    let normals: Vec<Vector3> = points
        .windows(3)
        .filter_map(|w| unit_normal(&w[2], &w[1], &w[0]).map(orient_up))
        .collect();
    finish(normals.iter().sum(), normals.len(), anchor, epsilon)
}

/// Mean normal of every triangle fanned around the first point.
#[must_use]
pub fn point_fan(points: &[Point3], epsilon: f64) -> Option<CubePlane> {
    let (anchor, rest) = points.split_first()?;
    let mut sum = Vector3::zeros();
    let mut count = 0;
    for (a, pa) in rest.iter().enumerate() {
        for (b, pb) in rest.iter().enumerate() {
            if a == b {
                continue;
            }
            if let Some(n) = unit_normal(anchor, pa, pb) {
                sum += orient_up(n);
                count += 1;
            }
        }
    }
    finish(sum, count, anchor, epsilon)
}

/// Plane through three representatives of the cloud.
///
/// The first three points seed the representatives; every later point is
/// merged into its nearest representative by taking their midpoint.
#[must_use]
pub fn point_merge(points: &[Point3], epsilon: f64) -> Option<CubePlane> {
    let [r0, r1, r2, ..] = points else {
        return None;
    };
    let mut reps = [*r0, *r1, *r2];
    for point in &points[3..] {
        let nearest = reps
            .iter()
            .enumerate()
            .map(|(i, r)| (i, (r - point).norm_squared()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(0, |(i, _)| i);
        reps[nearest] = nalgebra::center(&reps[nearest], point);
    }
    let normal = (reps[1] - reps[0]).cross(&(reps[2] - reps[0]));
    finish(normal, 1, &reps[1], epsilon)
}

/// Averages `sum` over `count`, applies the axis-alignment guard and
/// anchors the plane at `anchor`.
fn finish(sum: Vector3, count: usize, anchor: &Point3, epsilon: f64) -> Option<CubePlane> {
    if count == 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let normal = sum / count as f64;
    if !normal.iter().all(|c| c.is_finite()) || normal.norm() < TOLERANCE {
        return None;
    }
    Some(CubePlane::through(perturb_axis_aligned(normal, epsilon), anchor))
}

/// Adds `epsilon` to every component when at least two are exactly zero.
///
/// An axis-aligned normal leaves two of the three edge families without a
/// solvable cross-section.
#[must_use]
pub fn perturb_axis_aligned(normal: Vector3, epsilon: f64) -> Vector3 {
    #[allow(clippy::float_cmp)]
    let zeros = normal.iter().filter(|c| **c == 0.0).count();
    if zeros >= 2 {
        normal.add_scalar(epsilon)
    } else {
        normal
    }
}
