pub mod engine;
pub mod classify;
pub mod split;
pub mod walk;
pub mod assemble;
mod compound;

pub use classify::SpatialPosition;
pub use engine::{AlgebraError, BoolOp};

use crate::topology::shape::Shape;

/// Knobs for the set operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgebraConfig {
    /// Merge collinear segments and co-circular arcs in walked boundaries.
    pub simplify_results: bool,
    /// Audit every result before returning it.
    pub validate_results: bool,
}

impl AlgebraConfig {
    /// No post-processing at all.
    pub fn fast() -> Self {
        Self {
            simplify_results: false,
            validate_results: false,
        }
    }

    /// Simplify and audit every result.
    pub fn checked() -> Self {
        Self {
            simplify_results: true,
            validate_results: true,
        }
    }
}

impl Default for AlgebraConfig {
    fn default() -> Self {
        Self {
            simplify_results: true,
            validate_results: false,
        }
    }
}

/// Trait for set operations on planar shapes.
///
/// Provides `differentiate`, `intersect`, and `unify`. Implement this trait
/// to provide alternative backends or mock implementations.
pub trait ShapeAlgebra {
    /// Region of `a` not covered by `b`.
    fn differentiate(&self, a: &Shape, b: &Shape) -> Result<Shape, AlgebraError>;

    /// Region covered by both shapes.
    fn intersect(&self, a: &Shape, b: &Shape) -> Result<Shape, AlgebraError>;

    /// Region covered by either shape.
    fn unify(&self, a: &Shape, b: &Shape) -> Result<Shape, AlgebraError>;
}

/// Default algebra backed by [`engine::boolean_op`].
#[derive(Debug, Clone, Default)]
pub struct DefaultShapeAlgebra {
    pub config: AlgebraConfig,
}

impl DefaultShapeAlgebra {
    pub fn new(config: AlgebraConfig) -> Self {
        Self { config }
    }
}

impl ShapeAlgebra for DefaultShapeAlgebra {
    fn differentiate(&self, a: &Shape, b: &Shape) -> Result<Shape, AlgebraError> {
        engine::boolean_op(a, b, BoolOp::Difference, &self.config)
    }

    fn intersect(&self, a: &Shape, b: &Shape) -> Result<Shape, AlgebraError> {
        engine::boolean_op(a, b, BoolOp::Intersection, &self.config)
    }

    fn unify(&self, a: &Shape, b: &Shape) -> Result<Shape, AlgebraError> {
        engine::boolean_op(a, b, BoolOp::Union, &self.config)
    }
}

pub fn differentiate(a: &Shape, b: &Shape) -> Result<Shape, AlgebraError> {
    DefaultShapeAlgebra::default().differentiate(a, b)
}

pub fn intersect(a: &Shape, b: &Shape) -> Result<Shape, AlgebraError> {
    DefaultShapeAlgebra::default().intersect(a, b)
}

pub fn unify(a: &Shape, b: &Shape) -> Result<Shape, AlgebraError> {
    DefaultShapeAlgebra::default().unify(a, b)
}

impl Shape {
    /// `self − other` with the default configuration.
    pub fn differentiate(&self, other: &Shape) -> Result<Shape, AlgebraError> {
        differentiate(self, other)
    }

    /// `self ∩ other` with the default configuration.
    pub fn intersect(&self, other: &Shape) -> Result<Shape, AlgebraError> {
        intersect(self, other)
    }

    /// `self ∪ other` with the default configuration.
    pub fn unify(&self, other: &Shape) -> Result<Shape, AlgebraError> {
        unify(self, other)
    }
}

#[cfg(test)]
mod trait_tests {
    use super::*;
    use crate::topology::primitives::rectangle;
    use crate::topology::shape::ShapeType;

    fn squares() -> (Shape, Shape) {
        (
            rectangle(0.0, 0.0, 10.0, 10.0).unwrap().into(),
            rectangle(5.0, 5.0, 15.0, 15.0).unwrap().into(),
        )
    }

    #[test]
    fn test_algebra_trait_differentiate() {
        let (a, b) = squares();
        let algebra = DefaultShapeAlgebra::default();
        let result = algebra.differentiate(&a, &b).unwrap();
        assert!((result.area() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_algebra_trait_intersect() {
        let (a, b) = squares();
        let algebra = DefaultShapeAlgebra::new(AlgebraConfig::checked());
        let result = algebra.intersect(&a, &b).unwrap();
        assert_eq!(result.shape_type(), ShapeType::Simple);
        assert_eq!(result.edge_count(), 4);
    }

    #[test]
    fn test_algebra_trait_unify() {
        let (a, b) = squares();
        let result = a.unify(&b).unwrap();
        assert!((result.area() - 175.0).abs() < 1e-9);
        let fast = DefaultShapeAlgebra::new(AlgebraConfig::fast())
            .unify(&a, &b)
            .unwrap();
        assert_eq!(fast.edge_count(), 8);
    }

    #[test]
    fn test_config_presets() {
        assert!(!AlgebraConfig::fast().validate_results);
        assert!(AlgebraConfig::checked().validate_results);
        assert!(AlgebraConfig::default().simplify_results);
    }
}
