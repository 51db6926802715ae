use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::boundary::{Boundary, Orientation};
use crate::boolean::classify::{self, SpatialPosition};
use crate::geometry::edge::Edge;
use crate::geometry::extent::Extent;
use crate::geometry::point::Point2d;
use crate::Tolerance;

/// Reasons a shape cannot be built from the given geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("boundary has {found} edges, at least {required} required")]
    TooFewEdges { found: usize, required: usize },

    #[error("boundary is not closed")]
    NotClosed,

    #[error("boundary encloses no area")]
    ZeroArea,

    #[error("radius must be positive, got {0}")]
    InvalidRadius(f64),

    #[error("hole is not strictly inside the outer boundary (position {0:?})")]
    HoleNotInside(SpatialPosition),

    #[error("a complex shape cannot hold the universe")]
    UnboundedComponent,
}

/// Discriminant of [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    Void,
    Universe,
    Simple,
    Complex,
    Holed,
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeType::Void => "void",
            ShapeType::Universe => "universe",
            ShapeType::Simple => "simple",
            ShapeType::Complex => "complex",
            ShapeType::Holed => "holed",
        };
        f.write_str(name)
    }
}

/// A region bounded by one closed boundary, stored counter-clockwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleShape {
    boundary: Boundary,
    tolerance: f64,
}

/// An outer region with holes punched out of it.
///
/// Holes lie strictly inside the outer region and do not overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoledShape {
    outer: SimpleShape,
    holes: Vec<SimpleShape>,
}

/// A union of disjoint simple or holed components.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComplexShape {
    components: Vec<Shape>,
}

/// A planar region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// The empty region.
    Void,
    /// The whole plane.
    Universe,
    Simple(SimpleShape),
    Complex(ComplexShape),
    Holed(HoledShape),
}

// ─── SimpleShape ─────────────────────────────────────────────────────────────

impl SimpleShape {
    /// Validate and normalise a boundary into a shape with the default tolerance.
    pub fn new(boundary: Boundary) -> Result<Self, ShapeError> {
        let tolerance = crate::default_tolerance().coincidence;
        if boundary.edge_count() < 2 {
            return Err(ShapeError::TooFewEdges {
                found: boundary.edge_count(),
                required: 2,
            });
        }
        if !boundary.is_closed(tolerance) {
            return Err(ShapeError::NotClosed);
        }
        if Tolerance::with_coincidence(tolerance).is_zero_area(boundary.area()) {
            return Err(ShapeError::ZeroArea);
        }
        Ok(Self::from_boundary(boundary, tolerance))
    }

    /// Closed polygon through `points`.
    pub fn polygon(points: &[Point2d]) -> Result<Self, ShapeError> {
        if points.len() < 3 {
            return Err(ShapeError::TooFewEdges {
                found: points.len(),
                required: 3,
            });
        }
        Self::new(Boundary::polygon(points))
    }

    /// Wrap an already closed boundary without checks.
    pub(crate) fn from_boundary(boundary: Boundary, tolerance: f64) -> Self {
        Self {
            boundary: boundary.oriented(Orientation::CounterClockwise),
            tolerance,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn extent(&self) -> Extent {
        self.boundary.extent()
    }

    pub fn area(&self) -> f64 {
        self.boundary.area()
    }

    pub fn perimeter(&self) -> f64 {
        self.boundary.perimeter()
    }

    pub fn vertex_count(&self) -> usize {
        self.boundary.edge_count()
    }
}

// ─── HoledShape ──────────────────────────────────────────────────────────────

impl HoledShape {
    pub fn new(outer: SimpleShape) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Add a hole after checking it lies strictly inside the outer region.
    pub fn with_hole(mut self, hole: SimpleShape) -> Result<Self, ShapeError> {
        let position = classify::spatial_position_of(
            &Shape::Simple(self.outer.clone()),
            &Shape::Simple(hole.clone()),
        );
        if position != SpatialPosition::In {
            return Err(ShapeError::HoleNotInside(position));
        }
        self.holes.push(hole);
        Ok(self)
    }

    pub(crate) fn push_hole(&mut self, hole: SimpleShape) {
        self.holes.push(hole);
    }

    pub fn outer(&self) -> &SimpleShape {
        &self.outer
    }

    pub fn holes(&self) -> &[SimpleShape] {
        &self.holes
    }

    pub fn has_holes(&self) -> bool {
        !self.holes.is_empty()
    }

    pub fn tolerance(&self) -> f64 {
        self.holes
            .iter()
            .map(|h| h.tolerance())
            .fold(self.outer.tolerance(), f64::min)
    }

    pub fn area(&self) -> f64 {
        self.outer.area() - self.holes.iter().map(|h| h.area()).sum::<f64>()
    }
}

// ─── ComplexShape ────────────────────────────────────────────────────────────

impl ComplexShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component. Nested complex shapes are flattened, voids dropped.
    pub fn add(&mut self, shape: Shape) -> Result<(), ShapeError> {
        match shape {
            Shape::Void => Ok(()),
            Shape::Universe => Err(ShapeError::UnboundedComponent),
            Shape::Complex(inner) => {
                self.components.extend(inner.components);
                Ok(())
            }
            other => {
                self.components.push(other);
                Ok(())
            }
        }
    }

    pub fn components(&self) -> &[Shape] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

// ─── Shape ───────────────────────────────────────────────────────────────────

impl From<SimpleShape> for Shape {
    fn from(s: SimpleShape) -> Self {
        Shape::Simple(s)
    }
}

impl From<HoledShape> for Shape {
    fn from(h: HoledShape) -> Self {
        if h.has_holes() {
            Shape::Holed(h)
        } else {
            Shape::Simple(h.outer)
        }
    }
}

impl From<ComplexShape> for Shape {
    fn from(c: ComplexShape) -> Self {
        Shape::from_parts(c.components)
    }
}

impl Shape {
    /// Collapse a list of disjoint parts into the tightest variant.
    ///
    /// Voids vanish, nested complex shapes are flattened and a universe
    /// absorbs everything else.
    pub(crate) fn from_parts(parts: Vec<Shape>) -> Shape {
        let mut components = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Shape::Void => {}
                Shape::Universe => return Shape::Universe,
                Shape::Complex(inner) => components.extend(inner.components),
                other => components.push(other),
            }
        }
        match components.len() {
            0 => Shape::Void,
            1 => components.pop().unwrap_or(Shape::Void),
            _ => Shape::Complex(ComplexShape { components }),
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Void => ShapeType::Void,
            Shape::Universe => ShapeType::Universe,
            Shape::Simple(_) => ShapeType::Simple,
            Shape::Complex(_) => ShapeType::Complex,
            Shape::Holed(_) => ShapeType::Holed,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Shape::Void)
    }

    pub fn is_universe(&self) -> bool {
        matches!(self, Shape::Universe)
    }

    pub fn tolerance(&self) -> f64 {
        match self {
            Shape::Void | Shape::Universe => crate::default_tolerance().coincidence,
            Shape::Simple(s) => s.tolerance(),
            Shape::Holed(h) => h.tolerance(),
            Shape::Complex(c) => c
                .components
                .iter()
                .map(|s| s.tolerance())
                .fold(f64::INFINITY, f64::min),
        }
    }

    pub fn extent(&self) -> Extent {
        match self {
            Shape::Void => Extent::empty(),
            Shape::Universe => Extent::new(
                Point2d::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
                Point2d::new(f64::INFINITY, f64::INFINITY),
            ),
            Shape::Simple(s) => s.extent(),
            Shape::Holed(h) => h.outer.extent(),
            Shape::Complex(c) => c
                .components
                .iter()
                .fold(Extent::empty(), |acc, s| acc.union(&s.extent())),
        }
    }

    pub fn area(&self) -> f64 {
        match self {
            Shape::Void => 0.0,
            Shape::Universe => f64::INFINITY,
            Shape::Simple(s) => s.area(),
            Shape::Holed(h) => h.area(),
            Shape::Complex(c) => c.components.iter().map(|s| s.area()).sum(),
        }
    }

    pub fn perimeter(&self) -> f64 {
        self.boundaries().iter().map(|b| b.perimeter()).sum()
    }

    /// Every boundary of the shape: outers, holes and components alike.
    pub fn boundaries(&self) -> Vec<&Boundary> {
        match self {
            Shape::Void | Shape::Universe => Vec::new(),
            Shape::Simple(s) => vec![s.boundary()],
            Shape::Holed(h) => std::iter::once(h.outer.boundary())
                .chain(h.holes.iter().map(|s| s.boundary()))
                .collect(),
            Shape::Complex(c) => c.components.iter().flat_map(|s| s.boundaries()).collect(),
        }
    }

    pub fn edge_count(&self) -> usize {
        self.boundaries().iter().map(|b| b.edge_count()).sum()
    }

    /// Position of `p` relative to this region.
    pub fn classify_point(&self, p: &Point2d) -> SpatialPosition {
        classify::classify_point_in_shape(self, p, self.tolerance())
    }

    pub fn contains_point(&self, p: &Point2d) -> bool {
        self.classify_point(p) == SpatialPosition::In
    }

    pub fn is_point_on(&self, p: &Point2d) -> bool {
        self.classify_point(p) == SpatialPosition::On
    }

    /// Where `other` lies relative to this shape, judged by `other`'s boundaries.
    pub fn spatial_position_of(&self, other: &Shape) -> SpatialPosition {
        classify::spatial_position_of(self, other)
    }

    /// Points where a boundary of `other` crosses a boundary of this shape.
    pub fn crossing_points(&self, other: &Shape) -> Vec<Point2d> {
        let tolerance = self.tolerance().min(other.tolerance());
        self.boundary_contacts(other, tolerance)
            .into_iter()
            .flat_map(|c| c.crossings)
            .collect()
    }

    /// Points where the boundaries of the two shapes touch without crossing.
    pub fn contact_points(&self, other: &Shape) -> Vec<Point2d> {
        let tolerance = self.tolerance().min(other.tolerance());
        self.boundary_contacts(other, tolerance)
            .into_iter()
            .flat_map(|c| c.touches)
            .collect()
    }

    /// True when the boundaries meet somewhere but never cross.
    pub fn is_contiguous_with(&self, other: &Shape) -> bool {
        let tolerance = self.tolerance().min(other.tolerance());
        let contacts = self.boundary_contacts(other, tolerance);
        contacts.iter().all(|c| c.crossings.is_empty())
            && contacts.iter().any(|c| !c.touches.is_empty())
    }

    fn boundary_contacts(
        &self,
        other: &Shape,
        tolerance: f64,
    ) -> Vec<super::boundary::BoundaryContacts> {
        let theirs = other.boundaries();
        self.boundaries()
            .into_iter()
            .flat_map(|a| theirs.iter().map(move |b| a.contacts_with(b, tolerance)))
            .collect()
    }

    /// Serialised form used in diagnostics.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn write_state(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Shape::Void | Shape::Universe => writeln!(f, "{pad}{}", self.shape_type()),
            Shape::Simple(s) => {
                writeln!(f, "{pad}simple (tolerance {:e}, area {})", s.tolerance, s.area())?;
                write_boundary(f, s.boundary(), depth + 1)
            }
            Shape::Holed(h) => {
                writeln!(
                    f,
                    "{pad}holed ({} holes, tolerance {:e}, area {})",
                    h.holes.len(),
                    h.tolerance(),
                    h.area()
                )?;
                write_boundary(f, h.outer.boundary(), depth + 1)?;
                for hole in &h.holes {
                    write_boundary(f, hole.boundary(), depth + 1)?;
                }
                Ok(())
            }
            Shape::Complex(c) => {
                writeln!(f, "{pad}complex ({} components)", c.components.len())?;
                for component in &c.components {
                    component.write_state(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

fn write_boundary(f: &mut fmt::Formatter<'_>, boundary: &Boundary, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    let direction = match boundary.orientation() {
        Orientation::CounterClockwise => "ccw",
        Orientation::Clockwise => "cw",
    };
    writeln!(f, "{pad}boundary {direction}, {} edges", boundary.edge_count())?;
    for edge in boundary.edges() {
        let (s, e) = (edge.start_point(), edge.end_point());
        match edge {
            Edge::Segment(_) => {
                writeln!(f, "{pad}  segment ({}, {}) -> ({}, {})", s.x, s.y, e.x, e.y)?
            }
            Edge::Arc(a) => writeln!(
                f,
                "{pad}  arc ({}, {}) -> ({}, {}) center ({}, {}) {}",
                s.x,
                s.y,
                e.x,
                e.y,
                a.center.x,
                a.center.y,
                if a.ccw { "ccw" } else { "cw" }
            )?,
        }
    }
    Ok(())
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_state(f, 0)
    }
}
