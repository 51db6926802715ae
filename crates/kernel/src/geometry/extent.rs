use serde::{Deserialize, Serialize};

use super::point::Point2d;

/// Axis-aligned bounding extent of a planar entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: Point2d,
    pub max: Point2d,
}

impl Extent {
    pub fn new(min: Point2d, max: Point2d) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Point2d::new(f64::INFINITY, f64::INFINITY),
            max: Point2d::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: &[Point2d]) -> Self {
        let mut extent = Self::empty();
        for p in points {
            extent.expand_to_include(p);
        }
        extent
    }

    pub fn expand_to_include(&mut self, p: &Point2d) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Point2d::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2d::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Interiors overlap by more than `tolerance` on both axes.
    pub fn inner_overlaps(&self, other: &Self, tolerance: f64) -> bool {
        self.is_valid()
            && other.is_valid()
            && self.min.x < other.max.x - tolerance
            && self.max.x > other.min.x + tolerance
            && self.min.y < other.max.y - tolerance
            && self.max.y > other.min.y + tolerance
    }

    /// Extents overlap or touch within `tolerance`.
    pub fn outer_overlaps(&self, other: &Self, tolerance: f64) -> bool {
        self.is_valid()
            && other.is_valid()
            && self.min.x <= other.max.x + tolerance
            && self.max.x >= other.min.x - tolerance
            && self.min.y <= other.max.y + tolerance
            && self.max.y >= other.min.y - tolerance
    }

    pub fn contains_point(&self, p: &Point2d, tolerance: f64) -> bool {
        p.x >= self.min.x - tolerance
            && p.x <= self.max.x + tolerance
            && p.y >= self.min.y - tolerance
            && p.y <= self.max.y + tolerance
    }

    /// `other` lies completely within this extent (borders may touch).
    pub fn contains_extent(&self, other: &Self, tolerance: f64) -> bool {
        self.contains_point(&other.min, tolerance) && self.contains_point(&other.max, tolerance)
    }

    pub fn center(&self) -> Point2d {
        self.min.midpoint(&self.max)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: Point2d::new(self.min.x - margin, self.min.y - margin),
            max: Point2d::new(self.max.x + margin, self.max.y + margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext(x0: f64, y0: f64, x1: f64, y1: f64) -> Extent {
        Extent::new(Point2d::new(x0, y0), Point2d::new(x1, y1))
    }

    #[test]
    fn test_from_points() {
        let e = Extent::from_points(&[
            Point2d::new(1.0, 5.0),
            Point2d::new(-2.0, 3.0),
            Point2d::new(4.0, -1.0),
        ]);
        assert_eq!(e, ext(-2.0, -1.0, 4.0, 5.0));
        assert!((e.area() - 36.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_is_invalid_and_never_overlaps() {
        let e = Extent::empty();
        assert!(!e.is_valid());
        assert!(!e.outer_overlaps(&ext(0.0, 0.0, 1.0, 1.0), 1e-9));
    }

    #[test]
    fn test_touching_extents() {
        let a = ext(0.0, 0.0, 1.0, 1.0);
        let b = ext(1.0, 0.0, 2.0, 1.0);
        assert!(a.outer_overlaps(&b, 1e-9));
        assert!(!a.inner_overlaps(&b, 1e-9));
    }

    #[test]
    fn test_overlapping_extents() {
        let a = ext(0.0, 0.0, 2.0, 2.0);
        let b = ext(1.0, 1.0, 3.0, 3.0);
        assert!(a.outer_overlaps(&b, 1e-9));
        assert!(a.inner_overlaps(&b, 1e-9));
        assert!(!a.contains_extent(&b, 1e-9));
        assert!(a.union(&b).contains_extent(&b, 1e-9));
    }

    #[test]
    fn test_disjoint_extents() {
        let a = ext(0.0, 0.0, 1.0, 1.0);
        let b = ext(1.5, 1.5, 3.0, 3.0);
        assert!(!a.outer_overlaps(&b, 1e-9));
        assert!(a.outer_overlaps(&b, 0.6));
    }
}
