use thiserror::Error;

use crate::params::PlaneFitMethod;

/// Top-level error type for the patch reconstruction pipeline.
///
/// The pipeline stages themselves degrade silently (cubes without enough
/// data are skipped, rejected cross-sections are dropped); errors are only
/// raised for invalid configuration, dangling ids and malformed input.
#[derive(Debug, Error)]
pub enum PatchMeshError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Input(#[from] InputError),
}

/// Errors related to reconstruction parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parameter {parameter} = {value} is out of range ({min}, {max}]")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("parameter {parameter} must be finite, got {value}")]
    NotFinite { parameter: &'static str, value: f64 },

    #[error("parameters use cube size {params} but the store was built with {store}")]
    CubeSizeMismatch { params: f64, store: f64 },

    #[error("plane fit method {0:?} needs source-mesh samples, not a point cloud")]
    PlaneFitNeedsMesh(PlaneFitMethod),

    #[error("parameter {parameter} must be at least {min}, got {value}")]
    TooSmall {
        parameter: &'static str,
        value: usize,
        min: usize,
    },
}

/// Errors related to lookups in the cube store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("no cube with key {0}")]
    UnknownKey(String),

    #[error("malformed cube key {key:?}: {reason}")]
    MalformedKey { key: String, reason: &'static str },

    #[error("mesh has {0} vertices, more than 32-bit indices can address")]
    TooManyVertices(usize),
}

/// Errors related to source data handed to the pipeline.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("depth grid of {rows}x{cols} needs {expected} samples, got {actual}")]
    GridSizeMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid input: {0}")]
    Invalid(String),
}

/// Convenience type alias for results using [`PatchMeshError`].
pub type Result<T> = std::result::Result<T, PatchMeshError>;
