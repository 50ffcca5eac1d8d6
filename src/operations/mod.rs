//! Pipeline stages, each a struct with `new(..)` and `execute(..)`.
//!
//! Stages must run in order, each over the whole store:
//! [`Voxelize`], [`FitPlanes`] (which runs [`CrossSection`] per cube),
//! [`LinkNeighbors`], [`StitchEdges`], `TriangulateCubes` from
//! [`crate::tessellation`], and [`ClassifyAccessibility`].
//! [`Reconstruct`] runs all of them on a fresh store.

pub mod classify;
pub mod cross_section;
pub mod fit_planes;
pub mod link_neighbors;
pub mod query;
pub mod reconstruct;
pub mod stitch_edges;
pub mod voxelize;

pub use classify::{classify_normal, ClassifyAccessibility, ClassifyReport};
pub use cross_section::{solve_edge, solve_edges, CrossSection};
pub use fit_planes::{fit_plane, FitPlanes, FitReport};
pub use link_neighbors::LinkNeighbors;
pub use reconstruct::{Reconstruct, Reconstruction, ReconstructionStats};
pub use stitch_edges::{StitchEdges, StitchReport};
pub use voxelize::{Voxelize, VoxelizeReport};
