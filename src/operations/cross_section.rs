use crate::error::Result;
use crate::grid::{Axis, CubeEdge, CubeKey};
use crate::math::Point3;
use crate::store::{CubeId, CubePlane, CubeStore};

/// Intersects a cube's plane with its 12 edges.
///
/// Each edge holds two coordinates at the cube's bounds; the plane equation
/// is solved for the third, and the vertex is kept when it lands inside the
/// cube's closed range on that axis. Accepted vertices are created in edge
/// order with consecutive serials and stored in the cube's edge slots.
pub struct CrossSection {
    cube: CubeId,
}

impl CrossSection {
    /// Creates a new cross-section operation for one cube.
    #[must_use]
    pub fn new(cube: CubeId) -> Self {
        Self { cube }
    }

    /// Executes the operation, returning the number of vertices created.
    ///
    /// Cubes without a plane, or whose edges were already solved, get no
    /// new vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if the cube does not exist.
    pub fn execute(&self, store: &mut CubeStore) -> Result<usize> {
        let cube = store.cube(self.cube)?;
        let Some(plane) = cube.plane else {
            return Ok(0);
        };
        if cube.edges.iter().any(Option::is_some) {
            return Ok(0);
        }
        let solved = solve_edges(&plane, cube.key, store.cube_size());

        let mut created = 0;
        for (edge, point) in CubeEdge::ALL.into_iter().zip(solved) {
            if let Some(point) = point {
                let vertex = store.add_vertex(point);
                store.attach_edge_vertex(self.cube, edge, vertex)?;
                created += 1;
            }
        }
        Ok(created)
    }
}

/// Solves the plane against every edge of the cell `key`, in edge order.
#[must_use]
pub fn solve_edges(plane: &CubePlane, key: CubeKey, cube_size: f64) -> [Option<Point3>; 12] {
    CubeEdge::ALL.map(|edge| solve_edge(plane, key, cube_size, edge))
}

/// Solves the plane against one edge of the cell `key`.
///
/// Returns `None` when the plane runs parallel to the edge or crosses its
/// line outside the cube.
#[must_use]
pub fn solve_edge(plane: &CubePlane, key: CubeKey, cube_size: f64, edge: CubeEdge) -> Option<Point3> {
    let free = edge.free_axis();
    let n = &plane.normal;
    let coefficient = n[free.index()];
    #[allow(clippy::float_cmp)]
    let parallel = coefficient == 0.0;
    if parallel {
        return None;
    }

    let mut coords = [0.0; 3];
    let mut rhs = plane.constant;
    for (axis, side) in edge.fixed() {
        let value = key.bound(axis, side, cube_size);
        coords[axis.index()] = value;
        rhs -= value * n[axis.index()];
    }
    let value = rhs / coefficient;
    let (low, high) = key.range(free, cube_size);
    if !(low..=high).contains(&value) {
        return None;
    }
    coords[free.index()] = value;
    Some(Point3::new(coords[Axis::X.index()], coords[Axis::Y.index()], coords[Axis::Z.index()]))
}
