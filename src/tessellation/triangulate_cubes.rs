use tracing::{debug, trace};

use crate::error::Result;
use crate::math::triangle::{separated_by, upward_normal};
use crate::math::{Point3, Vector3};
use crate::store::{CubeStage, CubeStore, VertexId};

/// Summary of a [`TriangulateCubes`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriangulationReport {
    /// Triangles created.
    pub triangles: usize,
    /// Plane-bearing cubes whose vertex count could not be triangulated.
    pub skipped_cubes: usize,
}

/// Converts every plane-bearing cube's boundary polygon into triangles.
///
/// Triangles get the next serial from the store, an upward normal, and
/// are left unclassified.
pub struct TriangulateCubes;

impl TriangulateCubes {
    /// Creates a new triangulation operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the triangulation.
    ///
    /// Cubes that already hold triangles are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if a cube or one of its vertices cannot be found.
    pub fn execute(&self, store: &mut CubeStore) -> Result<TriangulationReport> {
        let mut report = TriangulationReport::default();
        for id in store.cube_ids().to_vec() {
            let cube = store.cube(id)?;
            let Some(plane) = cube.plane else {
                continue;
            };
            if !cube.triangles.is_empty() {
                continue;
            }
            let ids: Vec<VertexId> = cube.vertices.clone();
            let points = ids
                .iter()
                .map(|v| store.point(*v))
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let faces = triangulate_polygon(&points, &plane.normal);
            if faces.is_empty() {
                trace!(key = %cube.key, vertices = points.len(), "polygon not triangulable");
                report.skipped_cubes += 1;
            } else if points.len() == 6 {
                trace!(key = %cube.key, "hexagon reduced to its first three vertices");
            }

            let mut created = Vec::with_capacity(faces.len());
            for [a, b, c] in faces {
                let normal = upward_normal(&points[a], &points[b], &points[c]);
                created.push(store.add_triangle([ids[a], ids[b], ids[c]], normal));
            }
            report.triangles += created.len();

            let cube = store.cube_mut(id)?;
            cube.triangles = created;
            cube.stage = cube.stage.max(CubeStage::Triangulated);
        }
        debug!(
            triangles = report.triangles,
            skipped_cubes = report.skipped_cubes,
            "cubes triangulated"
        );
        Ok(report)
    }
}

impl Default for TriangulateCubes {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a cube polygon into triangles, as index triples into `points`.
///
/// Three and six vertices give one triangle from the first three; four and
/// five are split by nearest-neighbour ordering. Any other count gives
/// nothing.
#[must_use]
pub fn triangulate_polygon(points: &[Point3], plane_normal: &Vector3) -> Vec<[usize; 3]> {
    match points.len() {
        3 | 6 => vec![[0, 1, 2]],
        4 => split_quad(points, plane_normal).to_vec(),
        5 => {
            let o = order_pentagon(points);
            vec![[o[0], o[1], o[2]], [o[0], o[3], o[2]], [o[0], o[3], o[4]]]
        }
        _ => Vec::new(),
    }
}

/// Splits a quadrilateral along one diagonal from vertex 0.
///
/// The diagonal is proposed by nearest-neighbour distances; when the other
/// two vertices do not lie on opposite sides of it, the diagonal that does
/// separate them is used instead.
#[must_use]
pub fn split_quad(points: &[Point3], plane_normal: &Vector3) -> [[usize; 3]; 2] {
    let v0 = 0;
    let v1 = nearest(points, v0, &[1, 2, 3]);
    let others: Vec<usize> = (1..4).filter(|i| *i != v1).collect();
    let (a, b) = (others[0], others[1]);
    let fourth = nearest(points, v1, &others);
    let second = nearest(points, v0, &others);

    let (proposal, diagonal, sides) = if fourth == second {
        let last = if second == a { b } else { a };
        ([[v0, v1, second], [v0, second, last]], second, (v1, last))
    } else {
        ([[v0, v1, fourth], [v0, second, fourth]], fourth, (v1, second))
    };

    let p = |i: usize| &points[i];
    if separated_by(p(v0), p(diagonal), p(sides.0), p(sides.1), plane_normal) {
        return proposal;
    }
    for d in 1..4 {
        let rest: Vec<usize> = (1..4).filter(|i| *i != d).collect();
        if separated_by(p(v0), p(d), p(rest[0]), p(rest[1]), plane_normal) {
            return [[v0, rest[0], d], [v0, d, rest[1]]];
        }
    }
    proposal
}

/// Orders the vertices of a polygon into a cycle by nearest neighbours.
///
/// Every vertex records its two nearest others. The walk starts at a
/// vertex that few others list as nearest, then follows the nearest
/// unvisited link, the second-nearest, any unvisited vertex that lists the
/// current one, and finally the nearest unvisited vertex.
#[must_use]
pub fn order_pentagon(points: &[Point3]) -> Vec<usize> {
    let n = points.len();
    if n < 3 {
        return (0..n).collect();
    }
    let links: Vec<[usize; 2]> = (0..n)
        .map(|i| {
            let others: Vec<usize> = (0..n).filter(|j| *j != i).collect();
            let first = nearest(points, i, &others);
            let rest: Vec<usize> = others.into_iter().filter(|j| *j != first).collect();
            [first, nearest(points, i, &rest)]
        })
        .collect();

    let mut start = 0;
    for candidate in 0..n {
        let as_first = links.iter().filter(|l| l[0] == candidate).count();
        let as_second = links.iter().filter(|l| l[1] == candidate).count();
        match as_first + as_second {
            0 => {
                start = candidate;
                break;
            }
            1 => start = candidate,
            2 if as_first > 0 && as_second > 0 => start = candidate,
            _ => {}
        }
    }

    let mut bank: Vec<usize> = (0..n).filter(|i| *i != start).collect();
    let mut order = vec![start];
    let mut current = start;
    while !bank.is_empty() {
        let [first, second] = links[current];
        let next = if bank.contains(&first) {
            first
        } else if bank.contains(&second) {
            second
        } else if let Some(&k) = bank.iter().find(|k| links[**k].contains(&current)) {
            k
        } else {
            nearest(points, current, &bank)
        };
        bank.retain(|k| *k != next);
        order.push(next);
        current = next;
    }
    order
}

/// Index in `candidates` nearest to `points[from]`; ties go to the earliest.
fn nearest(points: &[Point3], from: usize, candidates: &[usize]) -> usize {
    let mut best = candidates.first().copied().unwrap_or(from);
    let mut best_dist = f64::INFINITY;
    for &c in candidates {
        let d = (points[c] - points[from]).norm_squared();
        if d < best_dist {
            best_dist = d;
            best = c;
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::grid::{CubeEdge, CubeKey};
    use crate::math::triangle::triangle_area;
    use crate::store::{Accessibility, CubePlane, TriangleUse};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn up() -> Vector3 {
        Vector3::new(0.0, 1.0, 0.0)
    }

    fn area(points: &[Point3], faces: &[[usize; 3]]) -> f64 {
        faces
            .iter()
            .map(|[a, b, c]| triangle_area(&points[*a], &points[*b], &points[*c]))
            .sum()
    }

    #[test]
    fn quad_uses_a_true_diagonal() {
        // Convex, non-square; vertex order deliberately not cyclic.
        let quad = [p(0.0, 0.0, 0.0), p(3.0, 0.0, 1.0), p(1.0, 0.0, 0.2), p(2.5, 0.0, 3.0)];
        let faces = split_quad(&quad, &up());
        // Shoelace area of the cycle 0-2-1-3.
        assert_relative_eq!(area(&quad, &faces), 3.45, epsilon = 1e-9);
        let diagonal: Vec<usize> = faces[0]
            .iter()
            .filter(|i| faces[1].contains(i))
            .copied()
            .collect();
        assert_eq!(diagonal.len(), 2);
        assert!(diagonal.contains(&0) && diagonal.contains(&1));
    }

    #[test]
    fn square_quad_covers_area() {
        let quad = [p(0.0, 0.5, 0.0), p(0.0, 0.5, 1.0), p(1.0, 0.5, 1.0), p(1.0, 0.5, 0.0)];
        let faces = split_quad(&quad, &up());
        assert_relative_eq!(area(&quad, &faces), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn pentagon_is_ordered_into_a_cycle() {
        // Regular pentagon listed out of order.
        let ring: Vec<Point3> = (0..5)
            .map(|k| {
                let t = f64::from(k) * std::f64::consts::TAU / 5.0;
                p(t.cos(), 0.0, t.sin())
            })
            .collect();
        let shuffled = [ring[0], ring[2], ring[4], ring[1], ring[3]];
        let order = order_pentagon(&shuffled);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
        // Consecutive vertices in the cycle are ring neighbours.
        let ring_index = [0usize, 2, 4, 1, 3];
        for w in 0..5 {
            let a = ring_index[order[w]];
            let b = ring_index[order[(w + 1) % 5]];
            let step = (a + 5 - b) % 5;
            assert!(step == 1 || step == 4, "{a} and {b} are not adjacent");
        }
    }

    #[test]
    fn pentagon_fan_uses_literal_slots() {
        let ring: Vec<Point3> = (0..5)
            .map(|k| {
                let t = f64::from(k) * std::f64::consts::TAU / 5.0;
                p(t.cos(), 0.0, t.sin())
            })
            .collect();
        let o = order_pentagon(&ring);
        let faces = triangulate_polygon(&ring, &up());
        assert_eq!(
            faces,
            vec![[o[0], o[1], o[2]], [o[0], o[3], o[2]], [o[0], o[3], o[4]]]
        );
    }

    #[test]
    fn unsupported_counts_give_nothing() {
        let pts = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)];
        assert!(triangulate_polygon(&pts, &up()).is_empty());
        let seven = vec![p(0.0, 0.0, 0.0); 7];
        assert!(triangulate_polygon(&seven, &up()).is_empty());
    }

    #[test]
    fn hexagon_keeps_first_three() {
        let six = vec![p(0.0, 0.0, 0.0); 6];
        assert_eq!(triangulate_polygon(&six, &up()), vec![[0, 1, 2]]);
    }

    #[test]
    fn execute_creates_triangles_with_upward_normals() {
        let mut store = CubeStore::new(1.0).unwrap();
        let (id, _) = store.get_or_create(CubeKey::new(0, 0, 0));
        store.cube_mut(id).unwrap().plane = Some(CubePlane {
            normal: up(),
            constant: 0.5,
        });
        for (edge, point) in [
            (CubeEdge::AE, p(0.0, 0.5, 1.0)),
            (CubeEdge::BF, p(0.0, 0.5, 0.0)),
            (CubeEdge::CG, p(1.0, 0.5, 0.0)),
            (CubeEdge::DH, p(1.0, 0.5, 1.0)),
        ] {
            let v = store.add_vertex(point);
            store.attach_edge_vertex(id, edge, v).unwrap();
        }

        let report = TriangulateCubes::new().execute(&mut store).unwrap();
        assert_eq!(report, TriangulationReport { triangles: 2, skipped_cubes: 0 });
        let cube = store.cube(id).unwrap();
        assert_eq!(cube.stage, CubeStage::Triangulated);
        let mut total = 0.0;
        for (serial, t) in cube.triangles.iter().enumerate() {
            let tri = store.triangle(*t).unwrap();
            assert_eq!(tri.serial, serial as u64);
            assert!(tri.normal.y > 0.0);
            assert_eq!(tri.use_type, TriangleUse::CubePlane);
            assert_eq!(tri.accessibility, Accessibility::Unclassified);
            total += tri.normal.norm() * 0.5;
        }
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);

        // Running again leaves the triangles alone.
        let again = TriangulateCubes::new().execute(&mut store).unwrap();
        assert_eq!(again.triangles, 0);
        assert_eq!(store.triangle_count(), 2);
    }

    #[test]
    fn planar_cube_with_two_vertices_is_skipped() {
        let mut store = CubeStore::new(1.0).unwrap();
        let (id, _) = store.get_or_create(CubeKey::new(0, 0, 0));
        store.cube_mut(id).unwrap().plane = Some(CubePlane {
            normal: up(),
            constant: 0.0,
        });
        let report = TriangulateCubes::new().execute(&mut store).unwrap();
        assert_eq!(report.skipped_cubes, 1);
        assert_eq!(report.triangles, 0);
    }
}
