use tracing::debug;

use crate::error::{InputError, Result};
use crate::math::Point3;
use crate::params::DepthGridParams;

use super::mesh::{SourceMesh, SourceTriangle};

/// An organized point cloud: one optional sample per sensor pixel, row-major.
#[derive(Debug, Clone)]
pub struct DepthGrid {
    rows: usize,
    cols: usize,
    samples: Vec<Option<Point3>>,
}

impl DepthGrid {
    /// Creates a grid from row-major samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample count is not `rows * cols`.
    pub fn new(rows: usize, cols: usize, samples: Vec<Option<Point3>>) -> Result<Self> {
        let expected = rows.checked_mul(cols).unwrap_or(usize::MAX);
        if samples.len() != expected {
            return Err(InputError::GridSizeMismatch {
                rows,
                cols,
                expected,
                actual: samples.len(),
            }
            .into());
        }
        Ok(Self {
            rows,
            cols,
            samples,
        })
    }

    /// Creates a grid by evaluating `sample(row, col)` for every pixel.
    #[must_use]
    pub fn from_fn(rows: usize, cols: usize, mut sample: impl FnMut(usize, usize) -> Option<Point3>) -> Self {
        let mut samples = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                samples.push(sample(r, c));
            }
        }
        Self {
            rows,
            cols,
            samples,
        }
    }

    /// Number of sensor rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of sensor columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The sample at `(row, col)`, if present and inside the grid.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Point3> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.samples.get(row * self.cols + col).copied().flatten()
    }

    /// Iterates over the present samples in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point3> + '_ {
        self.samples.iter().flatten().copied()
    }
}

/// Meshes a depth grid into a [`SourceMesh`].
///
/// Every pixel with a right and a lower neighbour contributes up to two
/// triangles, `(base, down, diagonal)` and `(base, diagonal, right)`, each
/// kept only when both edges leaving `base` are shorter than
/// [`DepthGridParams::max_edge_length`]. This keeps depth discontinuities
/// from being bridged.
#[derive(Debug)]
pub struct BuildSourceMesh<'a> {
    grid: &'a DepthGrid,
    params: DepthGridParams,
}

impl<'a> BuildSourceMesh<'a> {
    /// Creates a new mesher with default parameters.
    #[must_use]
    pub fn new(grid: &'a DepthGrid) -> Self {
        Self {
            grid,
            params: DepthGridParams::default(),
        }
    }

    /// Sets custom parameters.
    #[must_use]
    pub fn with_params(mut self, params: DepthGridParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the meshing.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid.
    pub fn execute(&self) -> Result<SourceMesh> {
        self.params.validate()?;
        let limit = self.params.max_edge_length;
        let close = |a: &Point3, b: &Point3| (b - a).norm() < limit;

        let mut mesh = SourceMesh::new();
        for r in 0..self.grid.rows().saturating_sub(1) {
            for c in 0..self.grid.cols().saturating_sub(1) {
                let Some(base) = self.grid.get(r, c) else {
                    continue;
                };
                let down = self.grid.get(r + 1, c);
                let right = self.grid.get(r, c + 1);
                let Some(diag) = self.grid.get(r + 1, c + 1) else {
                    continue;
                };
                if !close(&base, &diag) {
                    continue;
                }
                if let Some(down) = down.filter(|d| close(&base, d)) {
                    if let Some(t) = SourceTriangle::new([base, down, diag]) {
                        mesh.push(t);
                    }
                }
                if let Some(right) = right.filter(|q| close(&base, q)) {
                    if let Some(t) = SourceTriangle::new([base, diag, right]) {
                        mesh.push(t);
                    }
                }
            }
        }
        debug!(
            rows = self.grid.rows(),
            cols = self.grid.cols(),
            triangles = mesh.len(),
            "depth grid meshed"
        );
        Ok(mesh)
    }
}
