pub mod error;
pub mod grid;
pub mod math;
pub mod operations;
pub mod params;
pub mod source;
pub mod store;
pub mod tessellation;

pub use error::{PatchMeshError, Result};
pub use params::{AccessibilityRule, DepthGridParams, PlaneFitMethod, ReconstructionParams};
