use std::f64::consts::TAU;

use tracing::{info, instrument};

use super::boundary::Boundary;
use super::shape::{ShapeError, SimpleShape};
use crate::geometry::edge::Edge;
use crate::geometry::point::Point2d;

/// Axis-aligned rectangle spanning the two corners.
#[instrument]
pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<SimpleShape, ShapeError> {
    info!(min = ?[x0, y0], max = ?[x1, y1], "creating rectangle primitive");
    SimpleShape::polygon(&[
        Point2d::new(x0, y0),
        Point2d::new(x1, y0),
        Point2d::new(x1, y1),
        Point2d::new(x0, y1),
    ])
}

/// Circle made of four quarter arcs, the first starting at angle zero.
#[instrument]
pub fn circle(center: Point2d, radius: f64) -> Result<SimpleShape, ShapeError> {
    if radius <= 0.0 || !radius.is_finite() {
        return Err(ShapeError::InvalidRadius(radius));
    }
    info!(center = ?center.to_array(), radius, "creating circle primitive");
    let quadrant = |i: usize| {
        let angle = i as f64 * TAU / 4.0;
        Point2d::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    };
    let edges = (0..4)
        .map(|i| Edge::arc(quadrant(i), quadrant((i + 1) % 4), center, true))
        .collect();
    SimpleShape::new(Boundary::from_edges(edges))
}

/// Regular polygon with `sides` vertices on the circle of `radius`.
#[instrument]
pub fn regular_polygon(center: Point2d, radius: f64, sides: usize) -> Result<SimpleShape, ShapeError> {
    if radius <= 0.0 || !radius.is_finite() {
        return Err(ShapeError::InvalidRadius(radius));
    }
    let points: Vec<Point2d> = (0..sides)
        .map(|i| {
            let angle = i as f64 * TAU / sides as f64;
            Point2d::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect();
    SimpleShape::polygon(&points)
}
