use approx::AbsDiffEq;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Displacement between two positions.
pub type Vec2d = Vector2<f64>;

/// A position in the plane.
///
/// Positions are never compared exactly by the algebra; use
/// [`Point2d::is_equal_to`] with the tolerance of the shapes involved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            x: (self.x + other.x) * 0.5,
            y: (self.y + other.y) * 0.5,
        }
    }

    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
        }
    }

    /// Epsilon equality: both coordinates within `tolerance`.
    pub fn is_equal_to(&self, other: &Self, tolerance: f64) -> bool {
        self.abs_diff_eq(other, tolerance)
    }

    pub fn to_vec(&self) -> Vec2d {
        Vec2d::new(self.x, self.y)
    }

    pub fn from_vec(v: Vec2d) -> Self {
        Self { x: v.x, y: v.y }
    }

    pub fn to_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl AbsDiffEq for Point2d {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        crate::default_tolerance().coincidence
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
    }
}

impl Add<Vec2d> for Point2d {
    type Output = Point2d;
    fn add(self, rhs: Vec2d) -> Self::Output {
        Point2d::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2d {
    type Output = Vec2d;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec2d::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub<Vec2d> for Point2d {
    type Output = Point2d;
    fn sub(self, rhs: Vec2d) -> Self::Output {
        Point2d::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Z component of the cross product of two plane vectors.
pub fn cross(a: &Vec2d, b: &Vec2d) -> f64 {
    a.perp(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point2d::new(1.0, 0.0);
        let b = Point2d::new(4.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert!((a.distance_squared_to(&b) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_midpoint() {
        let a = Point2d::ORIGIN;
        let b = Point2d::new(2.0, 4.0);
        let m = a.midpoint(&b);
        assert!((m.x - 1.0).abs() < 1e-12);
        assert!((m.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_sub_gives_vector() {
        let a = Point2d::new(3.0, 4.0);
        let b = Point2d::new(1.0, 1.0);
        let v = a - b;
        assert!((v.x - 2.0).abs() < 1e-12);
        assert!((v.y - 3.0).abs() < 1e-12);
        let back = b + v;
        assert!(back.is_equal_to(&a, 1e-12));
    }

    #[test]
    fn test_equality_is_tolerance_based() {
        let a = Point2d::new(1.0, 1.0);
        let b = Point2d::new(1.0 + 1e-10, 1.0 - 1e-10);
        assert!(a.is_equal_to(&b, 1e-9));
        assert!(!a.is_equal_to(&b, 1e-11));
        assert!(approx::abs_diff_eq!(a, b, epsilon = 1e-9));
    }

    #[test]
    fn test_cross_sign() {
        let x = Vec2d::new(1.0, 0.0);
        let y = Vec2d::new(0.0, 1.0);
        assert!(cross(&x, &y) > 0.0);
        assert!(cross(&y, &x) < 0.0);
    }
}
