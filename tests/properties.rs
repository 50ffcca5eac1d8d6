#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use patchmesh::grid::{CubeEdge, CubeKey};
use patchmesh::math::{Point3, Vector3};
use patchmesh::operations::{classify_normal, fit_plane, solve_edges, Reconstruct};
use patchmesh::source::{BuildSourceMesh, DepthGrid};
use patchmesh::store::{Accessibility, CubePlane, CubeStore, PlaneSample};
use patchmesh::tessellation::{AccessibilityFilter, ExportMesh};
use patchmesh::{PlaneFitMethod, ReconstructionParams};

fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}

/// Deterministic pseudo-random values in `[0, 1)`.
fn unit_values(seed: u64, count: usize) -> Vec<f64> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            #[allow(clippy::cast_precision_loss)]
            let v = (state >> 11) as f64 / (1u64 << 53) as f64;
            v
        })
        .collect()
}

/// A rolling height field sampled on a regular grid.
fn rolling_store(cube_size: f64) -> CubeStore {
    let grid = DepthGrid::from_fn(40, 40, |r, c| {
        #[allow(clippy::cast_precision_loss)]
        let (x, z) = (c as f64 * 0.05, r as f64 * 0.05);
        Some(p(x, 0.3 * (1.3 * x).sin() + 0.2 * (0.9 * z).cos(), z))
    });
    let mesh = BuildSourceMesh::new(&grid).execute().unwrap();
    let params = ReconstructionParams::default().with_cube_size(cube_size);
    Reconstruct::from_mesh(&mesh)
        .with_params(params)
        .execute()
        .unwrap()
        .store
}

#[test]
fn located_points_lie_in_their_cell() {
    let values = unit_values(7, 3 * 500);
    for size in [0.3, 0.25, 1.7] {
        for xyz in values.chunks_exact(3) {
            let point = p((xyz[0] - 0.5) * 40.0, (xyz[1] - 0.5) * 40.0, (xyz[2] - 0.5) * 40.0);
            let key = CubeKey::locate(&point, size).unwrap();
            assert!(key.contains(&point, size), "{point:?} not in {key}");
        }
    }
}

/// Three distinct, non-collinear points on the plane through `anchor` with normal `n`.
fn points_on_plane(n: &Vector3, anchor: Point3) -> [Point3; 3] {
    let u = n.cross(&Vector3::x()).normalize();
    let w = n.cross(&u).normalize();
    [anchor, anchor + u * 0.05, anchor + w * 0.07 - u * 0.02]
}

#[test]
fn fitted_planes_contain_every_sample() {
    let values = unit_values(11, 3 * 50);
    for xyz in values.chunks_exact(3) {
        let n = Vector3::new(xyz[0] - 0.5, 0.5 + xyz[1], xyz[2] - 0.5).normalize();
        let pts = points_on_plane(&n, p(0.12, 0.15, 0.14));
        let samples: Vec<PlaneSample> = pts
            .iter()
            .enumerate()
            .map(|(triangle, point)| PlaneSample {
                triangle,
                normal: n,
                point: *point,
            })
            .collect();

        for method in [
            PlaneFitMethod::MeshNormals,
            PlaneFitMethod::PointStrip,
            PlaneFitMethod::PointFan,
            PlaneFitMethod::PointMerge,
        ] {
            let params = ReconstructionParams::default().with_plane_fit(method);
            let plane = fit_plane(&params, &samples, &pts).unwrap();
            assert_relative_eq!(plane.normal.normalize().cross(&n).norm(), 0.0, epsilon = 1e-9);
            for point in &pts {
                assert!(
                    plane.signed_distance(point).abs() < 1e-12,
                    "{method:?}: {point:?} off the fitted plane"
                );
            }
        }
    }
}

#[test]
fn cross_sections_stay_on_cube_and_plane() {
    let values = unit_values(23, 4 * 200);
    let size = 0.3;
    let key = CubeKey::new(2, -1, 5);
    let (min, max) = (key.world_min(size), key.world_max(size));
    for v in values.chunks_exact(4) {
        let normal = Vector3::new(v[0] - 0.5, v[1] - 0.5, v[2] - 0.5);
        let inside = min + (max - min) * v[3];
        let plane = CubePlane::through(normal, &inside);
        for point in solve_edges(&plane, key, size).iter().flatten() {
            assert!(key.contains(point, size), "{point:?} outside {key}");
            assert!(plane.signed_distance(point).abs() < 1e-9);
        }
    }
}

#[test]
fn shared_edges_hold_one_vertex() {
    let store = rolling_store(0.3);
    let mut shared = 0;
    for (_, cube) in store.cubes() {
        for edge in CubeEdge::ALL {
            let Some(own) = cube.edge_vertex(edge) else {
                continue;
            };
            for (connection, complement) in edge
                .sharing_neighbors()
                .into_iter()
                .zip(edge.complementary_edges())
            {
                let Some(other) = cube.neighbor(connection) else {
                    continue;
                };
                if let Some(theirs) = store.cube(other).unwrap().edge_vertex(complement) {
                    assert_eq!(own, theirs, "{} {edge} vs {connection}", cube.key);
                    shared += 1;
                }
            }
        }
    }
    assert!(shared > 0);
}

#[test]
fn stitched_vertices_stay_in_every_owner() {
    let store = rolling_store(0.25);
    let size = store.cube_size();
    for (_, cube) in store.cubes() {
        for vertex in cube.edges.iter().flatten() {
            let point = store.point(*vertex).unwrap();
            assert!(cube.key.contains(&point, size), "{point:?} outside {}", cube.key);
        }
    }
}

#[test]
fn every_triangle_is_labeled() {
    let store = rolling_store(0.3);
    assert!(store.triangle_count() > 0);
    for (_, triangle) in store.triangles() {
        assert_ne!(triangle.accessibility, Accessibility::Unclassified);
        assert!(triangle.normal.y >= 0.0);
    }
    let all = ExportMesh::new(AccessibilityFilter::All).execute(&store).unwrap();
    let candidates = ExportMesh::new(AccessibilityFilter::Candidate)
        .execute(&store)
        .unwrap();
    let blocked = ExportMesh::new(AccessibilityFilter::Inaccessible)
        .execute(&store)
        .unwrap();
    assert_eq!(all.triangle_count(), candidates.triangle_count() + blocked.triangle_count());
    assert_relative_eq!(all.area(), candidates.area() + blocked.area(), epsilon = 1e-9);
}

#[test]
fn classifier_boundary() {
    let tilted = |deg: f64| {
        let r = deg.to_radians();
        Vector3::new(r.sin(), r.cos(), 0.0)
    };
    assert_eq!(classify_normal(&tilted(49.9), 50.0), Accessibility::Candidate);
    assert_eq!(classify_normal(&tilted(50.1), 50.0), Accessibility::Inaccessible);
    assert_eq!(classify_normal(&tilted(89.0), 50.0), Accessibility::Inaccessible);
    assert_eq!(classify_normal(&Vector3::zeros(), 50.0), Accessibility::Inaccessible);
    for threshold in [0.5, 50.0, 89.5] {
        assert_eq!(classify_normal(&Vector3::y(), threshold), Accessibility::Candidate);
        assert_eq!(classify_normal(&Vector3::x(), threshold), Accessibility::Inaccessible);
    }
}
