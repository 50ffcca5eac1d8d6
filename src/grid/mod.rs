//! Voxel grid: cube keys and the fixed cube topology.

pub mod topology;

pub use topology::{Axis, Connection, ConnectionKind, Corner, CubeEdge, Side};

use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;
use crate::math::Point3;

/// Integer key of a grid cell.
///
/// The cell `(x, y, z)` spans `[x, x + 1) × [y, y + 1) × [z, z + 1)` in
/// cube-size units. A point on a grid plane belongs to the cell for which
/// that plane is the lower bound, so every finite point has exactly one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CubeKey {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl CubeKey {
    /// Creates a key from its floor bounds.
    #[must_use]
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Locates the cell containing `point` for the given cube size.
    ///
    /// Returns `None` when a coordinate is not finite or falls outside the
    /// representable grid.
    #[must_use]
    pub fn locate(point: &Point3, cube_size: f64) -> Option<Self> {
        Some(Self {
            x: cell(point.x, cube_size)?,
            y: cell(point.y, cube_size)?,
            z: cell(point.z, cube_size)?,
        })
    }

    /// The key shifted by `(dx, dy, dz)` cells, saturating at the ends of
    /// the `i64` range.
    #[must_use]
    pub fn offset(self, dx: i64, dy: i64, dz: i64) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.z.saturating_add(dz),
        )
    }

    /// The key of the neighbour with the given connection type.
    #[must_use]
    pub fn neighbor(self, connection: Connection) -> Self {
        let [dx, dy, dz] = connection.offset();
        self.offset(dx, dy, dz)
    }

    /// Floor bound on `axis` in cube-size units.
    #[must_use]
    pub fn floor(self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Ceiling bound on `axis` in cube-size units, saturating at `i64::MAX`.
    #[must_use]
    pub fn ceiling(self, axis: Axis) -> i64 {
        self.floor(axis).saturating_add(1)
    }

    /// World-space bound of the cell on `axis`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bound(self, axis: Axis, side: Side, cube_size: f64) -> f64 {
        let grid = match side {
            Side::Low => self.floor(axis),
            Side::High => self.ceiling(axis),
        };
        grid as f64 * cube_size
    }

    /// World-space interval `[low, high]` of the cell on `axis`.
    #[must_use]
    pub fn range(self, axis: Axis, cube_size: f64) -> (f64, f64) {
        (
            self.bound(axis, Side::Low, cube_size),
            self.bound(axis, Side::High, cube_size),
        )
    }

    /// Lowest world-space corner of the cell.
    #[must_use]
    pub fn world_min(self, cube_size: f64) -> Point3 {
        self.corner_point(Side::Low, cube_size)
    }

    /// Highest world-space corner of the cell.
    #[must_use]
    pub fn world_max(self, cube_size: f64) -> Point3 {
        self.corner_point(Side::High, cube_size)
    }

    /// World-space position of a labelled cube corner.
    #[must_use]
    pub fn corner(self, corner: Corner, cube_size: f64) -> Point3 {
        let [sx, sy, sz] = corner.sides();
        Point3::new(
            self.bound(Axis::X, sx, cube_size),
            self.bound(Axis::Y, sy, cube_size),
            self.bound(Axis::Z, sz, cube_size),
        )
    }

    /// Returns `true` if `point` lies in the closed world-space box of the
    /// cell, allowing for rounding in the bound computation.
    #[must_use]
    pub fn contains(self, point: &Point3, cube_size: f64) -> bool {
        Axis::ALL.iter().all(|&axis| {
            let (low, high) = self.range(axis, cube_size);
            let v = point.coords[axis.index()];
            let slack = 1e-9 * cube_size.max(v.abs());
            v >= low - slack && v <= high + slack
        })
    }

    fn corner_point(self, side: Side, cube_size: f64) -> Point3 {
        Point3::new(
            self.bound(Axis::X, side, cube_size),
            self.bound(Axis::Y, side, cube_size),
            self.bound(Axis::Z, side, cube_size),
        )
    }
}

#[allow(clippy::cast_possible_truncation)]
fn cell(value: f64, cube_size: f64) -> Option<i64> {
    let scaled = (value / cube_size).floor();
    // i64::MAX is not exactly representable; stay strictly inside.
    if scaled.is_finite() && scaled.abs() < 9.0e18 {
        Some(scaled as i64)
    } else {
        None
    }
}

/// Renders `"x/x+1,y/y+1,z/z+1"`.
impl fmt::Display for CubeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{},{}/{},{}/{}",
            self.x,
            self.ceiling(Axis::X),
            self.y,
            self.ceiling(Axis::Y),
            self.z,
            self.ceiling(Axis::Z)
        )
    }
}

impl FromStr for CubeKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason| StoreError::MalformedKey {
            key: s.to_owned(),
            reason,
        };
        let mut floors = [0i64; 3];
        let mut parts = s.split(',');
        for floor in &mut floors {
            let part = parts.next().ok_or_else(|| malformed("expected three axes"))?;
            let (low, high) = part
                .split_once('/')
                .ok_or_else(|| malformed("expected floor/ceiling"))?;
            let low: i64 = low
                .trim()
                .parse()
                .map_err(|_| malformed("floor is not an integer"))?;
            let high: i64 = high
                .trim()
                .parse()
                .map_err(|_| malformed("ceiling is not an integer"))?;
            if low.checked_add(1) != Some(high) {
                return Err(malformed("ceiling must be floor + 1"));
            }
            *floor = low;
        }
        if parts.next().is_some() {
            return Err(malformed("expected three axes"));
        }
        Ok(Self::new(floors[0], floors[1], floors[2]))
    }
}
