use crate::error::ConfigError;

/// Strategy used to estimate the plane of a cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaneFitMethod {
    /// Mean of the normals of the source-mesh triangles touching the cube.
    #[default]
    MeshNormals,
    /// Mean normal of consecutive raw point triples.
    PointStrip,
    /// Mean normal of every triangle fanned around the first raw point.
    PointFan,
    /// Plane through three representatives obtained by merging raw points.
    PointMerge,
}

impl PlaneFitMethod {
    /// Returns `true` if the method works from raw points rather than
    /// source-mesh triangle samples.
    #[must_use]
    pub fn uses_points(self) -> bool {
        !matches!(self, Self::MeshNormals)
    }
}

/// Rule used to label triangles as traversable or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessibilityRule {
    /// Per-triangle angle between the normal and the vertical.
    #[default]
    Inclination,
    /// Per-cube spread of vertex heights.
    HeightSpan,
}

/// Parameters controlling the reconstruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructionParams {
    /// Edge length of a cube in world units.
    pub cube_size: f64,
    /// Triangles inclined less than this many degrees from vertical-up are candidates.
    pub max_inclination_deg: f64,
    /// Amount added to every normal component of an axis-aligned plane.
    pub plane_epsilon: f64,
    /// Minimum number of contributing samples (or points) for a plane fit.
    pub min_plane_samples: usize,
    /// How cube planes are estimated.
    pub plane_fit: PlaneFitMethod,
    /// How triangles are labeled.
    pub accessibility: AccessibilityRule,
    /// Largest vertex height difference within a cube for [`AccessibilityRule::HeightSpan`].
    pub max_height_span: f64,
}

impl Default for ReconstructionParams {
    fn default() -> Self {
        Self {
            cube_size: 0.3,
            max_inclination_deg: 50.0,
            plane_epsilon: 1e-4,
            min_plane_samples: 3,
            plane_fit: PlaneFitMethod::MeshNormals,
            accessibility: AccessibilityRule::Inclination,
            max_height_span: 0.29,
        }
    }
}

impl ReconstructionParams {
    /// Sets the cube edge length.
    #[must_use]
    pub fn with_cube_size(mut self, cube_size: f64) -> Self {
        self.cube_size = cube_size;
        self
    }

    /// Sets the accessibility angle threshold in degrees.
    #[must_use]
    pub fn with_max_inclination(mut self, degrees: f64) -> Self {
        self.max_inclination_deg = degrees;
        self
    }

    /// Sets the plane degeneracy epsilon.
    #[must_use]
    pub fn with_plane_epsilon(mut self, epsilon: f64) -> Self {
        self.plane_epsilon = epsilon;
        self
    }

    /// Sets the minimum number of samples required to fit a plane.
    #[must_use]
    pub fn with_min_plane_samples(mut self, samples: usize) -> Self {
        self.min_plane_samples = samples;
        self
    }

    /// Sets the plane estimation strategy.
    #[must_use]
    pub fn with_plane_fit(mut self, method: PlaneFitMethod) -> Self {
        self.plane_fit = method;
        self
    }

    /// Sets the accessibility rule.
    #[must_use]
    pub fn with_accessibility(mut self, rule: AccessibilityRule) -> Self {
        self.accessibility = rule;
        self
    }

    /// Sets the height span threshold used by [`AccessibilityRule::HeightSpan`].
    #[must_use]
    pub fn with_max_height_span(mut self, span: f64) -> Self {
        self.max_height_span = span;
        self
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("cube_size", self.cube_size)?;
        positive("plane_epsilon", self.plane_epsilon)?;
        positive("max_height_span", self.max_height_span)?;
        finite("max_inclination_deg", self.max_inclination_deg)?;
        if self.max_inclination_deg <= 0.0 || self.max_inclination_deg > 180.0 {
            return Err(ConfigError::OutOfRange {
                parameter: "max_inclination_deg",
                value: self.max_inclination_deg,
                min: 0.0,
                max: 180.0,
            });
        }
        if self.min_plane_samples < 1 {
            return Err(ConfigError::TooSmall {
                parameter: "min_plane_samples",
                value: self.min_plane_samples,
                min: 1,
            });
        }
        Ok(())
    }

    /// Checks the parameters for a stage running on a store built with
    /// `store_cube_size`.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is invalid or `cube_size` differs
    /// from the store's.
    pub fn validate_for_store(&self, store_cube_size: f64) -> Result<(), ConfigError> {
        self.validate()?;
        #[allow(clippy::float_cmp)]
        let same_size = self.cube_size == store_cube_size;
        if !same_size {
            return Err(ConfigError::CubeSizeMismatch {
                params: self.cube_size,
                store: store_cube_size,
            });
        }
        Ok(())
    }
}

/// Parameters for meshing an organized depth grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthGridParams {
    /// Longest edge (world units) allowed between neighboring samples of a triangle.
    pub max_edge_length: f64,
}

impl Default for DepthGridParams {
    fn default() -> Self {
        Self {
            max_edge_length: 0.75,
        }
    }
}

impl DepthGridParams {
    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge length is not finite and positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_edge_length", self.max_edge_length)
    }
}

fn finite(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { parameter, value })
    }
}

fn positive(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(parameter, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            parameter,
            value,
            min: 0.0,
            max: f64::INFINITY,
        })
    }
}
