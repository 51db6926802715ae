pub mod geometry;
pub mod topology;
pub mod boolean;
pub mod validation;

// Re-export the algebra entry points at crate root for convenience.
pub use boolean::{
    differentiate, intersect, unify, AlgebraConfig, AlgebraError, BoolOp, DefaultShapeAlgebra,
    ShapeAlgebra, SpatialPosition,
};
pub use geometry::{Edge, Extent, Point2d};
pub use topology::{Boundary, ComplexShape, HoledShape, Orientation, Shape, ShapeError, SimpleShape};

/// Global tolerance configuration for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Points closer than this (on both axes) are considered coincident.
    pub coincidence: f64,
    /// Angles smaller than this (radians) are considered zero.
    pub angular: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-9,
            angular: 1e-10,
        }
    }
}

impl Tolerance {
    /// Default angular tolerance with the given coincidence distance.
    pub fn with_coincidence(coincidence: f64) -> Self {
        Self {
            coincidence,
            ..Self::default()
        }
    }

    /// Areas below the square of the coincidence tolerance are noise.
    pub fn is_zero_area(&self, area: f64) -> bool {
        area.abs() <= self.coincidence * self.coincidence
    }
}

/// Process-wide default tolerance.
pub fn default_tolerance() -> Tolerance {
    Tolerance::default()
}
