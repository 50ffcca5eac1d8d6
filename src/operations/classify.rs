use tracing::debug;

use crate::error::Result;
use crate::math::triangle::inclination_deg;
use crate::math::Vector3;
use crate::params::{AccessibilityRule, ReconstructionParams};
use crate::store::{Accessibility, CubeStage, CubeStore, TriangleUse};

/// Summary of a [`ClassifyAccessibility`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyReport {
    pub candidates: usize,
    pub inaccessible: usize,
}

/// Labels the triangles of every plane-bearing cube as traversable or not.
///
/// Each cube's mean triangle normal is stored on the cube for
/// diagnostics; it does not take part in the labeling.
pub struct ClassifyAccessibility {
    params: ReconstructionParams,
}

impl ClassifyAccessibility {
    /// Creates a new classification operation.
    #[must_use]
    pub fn new(params: ReconstructionParams) -> Self {
        Self { params }
    }

    /// Executes the classification.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or do not match the
    /// store's cube size, or if a cube's triangle or vertex cannot be found.
    pub fn execute(&self, store: &mut CubeStore) -> Result<ClassifyReport> {
        self.params.validate_for_store(store.cube_size())?;
        let mut report = ClassifyReport::default();

        for id in store.cube_ids().to_vec() {
            let cube = store.cube(id)?;
            if !cube.has_plane() {
                continue;
            }
            let triangles = cube.triangles.clone();

            let mut sum = Vector3::zeros();
            for t in &triangles {
                sum += store.triangle(*t)?.normal;
            }
            #[allow(clippy::cast_precision_loss)]
            let average = (!triangles.is_empty()).then(|| sum / triangles.len() as f64);

            let cube_label = match self.params.accessibility {
                AccessibilityRule::Inclination => None,
                AccessibilityRule::HeightSpan => {
                    let mut low = f64::INFINITY;
                    let mut high = f64::NEG_INFINITY;
                    for v in &cube.vertices {
                        let y = store.point(*v)?.y;
                        low = low.min(y);
                        high = high.max(y);
                    }
                    let span = if high >= low { high - low } else { 0.0 };
                    Some(if span < self.params.max_height_span {
                        Accessibility::Candidate
                    } else {
                        Accessibility::Inaccessible
                    })
                }
            };

            for t in &triangles {
                let triangle = store.triangle_mut(*t)?;
                let label = cube_label.unwrap_or_else(|| {
                    classify_normal(&triangle.normal, self.params.max_inclination_deg)
                });
                triangle.accessibility = label;
                triangle.use_type = TriangleUse::MeshDerived;
                match label {
                    Accessibility::Candidate => report.candidates += 1,
                    _ => report.inaccessible += 1,
                }
            }

            let cube = store.cube_mut(id)?;
            cube.average_normal = average;
            cube.stage = cube.stage.max(CubeStage::Classified);
        }
        debug!(
            candidates = report.candidates,
            inaccessible = report.inaccessible,
            "triangles classified"
        );
        Ok(report)
    }
}

/// Labels a normal by its angle from vertical-up.
///
/// Normals too short to define an angle are inaccessible.
#[must_use]
pub fn classify_normal(normal: &Vector3, max_inclination_deg: f64) -> Accessibility {
    match inclination_deg(normal) {
        Some(angle) if angle < max_inclination_deg => Accessibility::Candidate,
        _ => Accessibility::Inaccessible,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::grid::{CubeEdge, CubeKey};
    use crate::math::Point3;
    use crate::store::{CubeId, CubePlane};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    /// A planar cube holding one triangle with the given corners.
    fn cube_with_triangle(store: &mut CubeStore, key: CubeKey, corners: [Point3; 3], normal: Vector3) -> CubeId {
        let (id, _) = store.get_or_create(key);
        store.cube_mut(id).unwrap().plane = Some(CubePlane {
            normal,
            constant: 0.0,
        });
        let mut ids = Vec::new();
        for (edge, point) in [CubeEdge::AE, CubeEdge::BF, CubeEdge::CG].into_iter().zip(corners) {
            let v = store.add_vertex(point);
            store.attach_edge_vertex(id, edge, v).unwrap();
            ids.push(v);
        }
        let t = store.add_triangle([ids[0], ids[1], ids[2]], normal);
        store.cube_mut(id).unwrap().triangles.push(t);
        id
    }

    #[test]
    fn vertical_normal_is_candidate_for_any_threshold() {
        let up = Vector3::new(0.0, 1.0, 0.0);
        for threshold in [0.001, 1.0, 50.0, 179.0] {
            assert_eq!(classify_normal(&up, threshold), Accessibility::Candidate);
        }
    }

    #[test]
    fn horizontal_normal_is_inaccessible_below_right_angle() {
        let side = Vector3::new(1.0, 0.0, 0.0);
        for threshold in [1.0, 50.0, 89.999] {
            assert_eq!(classify_normal(&side, threshold), Accessibility::Inaccessible);
        }
        assert_eq!(classify_normal(&side, 90.5), Accessibility::Candidate);
    }

    #[test]
    fn zero_normal_is_inaccessible() {
        assert_eq!(classify_normal(&Vector3::zeros(), 180.0), Accessibility::Inaccessible);
    }

    #[test]
    fn inclination_rule_labels_each_triangle() {
        let mut store = CubeStore::new(1.0).unwrap();
        let flat = cube_with_triangle(
            &mut store,
            CubeKey::new(0, 0, 0),
            [p(0.0, 0.5, 1.0), p(0.0, 0.5, 0.0), p(1.0, 0.5, 0.0)],
            Vector3::new(0.0, 2.0, 0.0),
        );
        let steep = cube_with_triangle(
            &mut store,
            CubeKey::new(5, 0, 0),
            [p(5.0, 0.0, 6.0), p(5.0, 1.0, 5.0), p(6.0, 1.0, 5.0)],
            Vector3::new(1.0, 0.5, 0.0),
        );
        let report = ClassifyAccessibility::new(ReconstructionParams::default().with_cube_size(1.0))
            .execute(&mut store)
            .unwrap();
        assert_eq!(report, ClassifyReport { candidates: 1, inaccessible: 1 });

        let flat = store.cube(flat).unwrap();
        assert_eq!(flat.stage, CubeStage::Classified);
        assert_relative_eq!(flat.average_normal.unwrap(), Vector3::new(0.0, 2.0, 0.0));
        let t = store.triangle(flat.triangles[0]).unwrap();
        assert_eq!(t.accessibility, Accessibility::Candidate);
        assert_eq!(t.use_type, TriangleUse::MeshDerived);

        let steep = store.cube(steep).unwrap();
        let t = store.triangle(steep.triangles[0]).unwrap();
        assert_eq!(t.accessibility, Accessibility::Inaccessible);
    }

    #[test]
    fn height_span_rule_labels_whole_cube() {
        let mut store = CubeStore::new(1.0).unwrap();
        // Gentle normal but vertices spanning 0.5 in height.
        let id = cube_with_triangle(
            &mut store,
            CubeKey::new(0, 0, 0),
            [p(0.0, 0.2, 1.0), p(0.0, 0.7, 0.0), p(1.0, 0.3, 0.0)],
            Vector3::new(0.0, 1.0, 0.0),
        );
        let params = ReconstructionParams::default()
            .with_cube_size(1.0)
            .with_accessibility(AccessibilityRule::HeightSpan)
            .with_max_height_span(0.29);
        let report = ClassifyAccessibility::new(params).execute(&mut store).unwrap();
        assert_eq!(report.inaccessible, 1);

        let relaxed = params.with_max_height_span(0.6);
        let report = ClassifyAccessibility::new(relaxed).execute(&mut store).unwrap();
        assert_eq!(report.candidates, 1);
        let cube = store.cube(id).unwrap();
        assert_eq!(
            store.triangle(cube.triangles[0]).unwrap().accessibility,
            Accessibility::Candidate
        );
    }

    #[test]
    fn cubes_without_plane_are_untouched() {
        let mut store = CubeStore::new(1.0).unwrap();
        let (id, _) = store.get_or_create(CubeKey::new(0, 0, 0));
        let report = ClassifyAccessibility::new(ReconstructionParams::default().with_cube_size(1.0))
            .execute(&mut store)
            .unwrap();
        assert_eq!(report, ClassifyReport::default());
        let cube = store.cube(id).unwrap();
        assert_eq!(cube.stage, CubeStage::New);
        assert!(cube.average_normal.is_none());
    }
}
