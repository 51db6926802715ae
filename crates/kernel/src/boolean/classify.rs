use serde::{Deserialize, Serialize};

use crate::geometry::edge::Edge;
use crate::geometry::point::Point2d;
use crate::topology::boundary::Boundary;
use crate::topology::shape::Shape;

/// Where a point, edge or shape lies relative to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpatialPosition {
    In,
    Out,
    On,
    /// Partly inside and partly outside; never produced for a single point.
    PartiallyIn,
}

/// Classify a point relative to the region enclosed by `boundary`.
///
/// Points within `tolerance` of an edge are `On`; otherwise the winding
/// number decides, so boundary orientation does not matter.
pub fn classify_point(boundary: &Boundary, point: &Point2d, tolerance: f64) -> SpatialPosition {
    if !boundary.extent().contains_point(point, tolerance) {
        return SpatialPosition::Out;
    }
    if boundary.is_point_on(point, tolerance) {
        return SpatialPosition::On;
    }
    if boundary.winding_number(point) != 0 {
        SpatialPosition::In
    } else {
        SpatialPosition::Out
    }
}

/// Classify a point relative to any shape variant.
pub fn classify_point_in_shape(shape: &Shape, point: &Point2d, tolerance: f64) -> SpatialPosition {
    match shape {
        Shape::Void => SpatialPosition::Out,
        Shape::Universe => SpatialPosition::In,
        Shape::Simple(s) => classify_point(s.boundary(), point, tolerance),
        Shape::Holed(h) => match classify_point(h.outer().boundary(), point, tolerance) {
            SpatialPosition::In => {
                for hole in h.holes() {
                    match classify_point(hole.boundary(), point, tolerance) {
                        SpatialPosition::In => return SpatialPosition::Out,
                        SpatialPosition::On => return SpatialPosition::On,
                        _ => {}
                    }
                }
                SpatialPosition::In
            }
            other => other,
        },
        Shape::Complex(c) => {
            let mut on = false;
            for component in c.components() {
                match classify_point_in_shape(component, point, tolerance) {
                    SpatialPosition::In => return SpatialPosition::In,
                    SpatialPosition::On => on = true,
                    _ => {}
                }
            }
            if on {
                SpatialPosition::On
            } else {
                SpatialPosition::Out
            }
        }
    }
}

/// Classify an edge that crosses no edge of `boundary` in its interior.
///
/// The midpoint decides; if it is on the boundary the end point and then
/// the start point are tried. An edge with all three on the boundary is `On`.
pub fn classify_edge(edge: &Edge, boundary: &Boundary, tolerance: f64) -> SpatialPosition {
    if !edge.extent().outer_overlaps(&boundary.extent(), tolerance) {
        return SpatialPosition::Out;
    }
    classify_by_samples(edge, |p| classify_point(boundary, p, tolerance))
}

/// Same as [`classify_edge`] against every boundary of a shape.
pub fn classify_edge_in_shape(edge: &Edge, shape: &Shape, tolerance: f64) -> SpatialPosition {
    classify_by_samples(edge, |p| classify_point_in_shape(shape, p, tolerance))
}

fn classify_by_samples(edge: &Edge, classify: impl Fn(&Point2d) -> SpatialPosition) -> SpatialPosition {
    for sample in [edge.mid_point(), edge.end_point(), edge.start_point()] {
        let position = classify(&sample);
        if position != SpatialPosition::On {
            return position;
        }
    }
    SpatialPosition::On
}

/// Fold per-edge positions into the position of the whole chain.
pub fn aggregate(positions: impl IntoIterator<Item = SpatialPosition>) -> SpatialPosition {
    let (mut inside, mut outside, mut partial) = (false, false, false);
    for position in positions {
        match position {
            SpatialPosition::In => inside = true,
            SpatialPosition::Out => outside = true,
            SpatialPosition::PartiallyIn => partial = true,
            SpatialPosition::On => {}
        }
    }
    match (inside, outside, partial) {
        (_, _, true) | (true, true, _) => SpatialPosition::PartiallyIn,
        (true, false, _) => SpatialPosition::In,
        (false, true, _) => SpatialPosition::Out,
        (false, false, _) => SpatialPosition::On,
    }
}

/// Position of `candidate` relative to the region enclosed by `container`.
///
/// The candidate is cut wherever it meets the container, then each piece
/// is classified on its own.
pub fn position_of_boundary(container: &Boundary, candidate: &Boundary, tolerance: f64) -> SpatialPosition {
    if !container.extent().outer_overlaps(&candidate.extent(), tolerance) {
        return SpatialPosition::Out;
    }
    let cuts = candidate.contacts_with(container, tolerance).all_points();
    let pieces = candidate.split_at_points(&cuts, tolerance);
    aggregate(
        pieces
            .edges()
            .iter()
            .map(|e| classify_edge(e, container, tolerance)),
    )
}

/// Position of `other` relative to `shape`, judged by `other`'s boundaries.
///
/// An empty `other` is `Out`. The universe has no boundary and is taken as
/// `PartiallyIn` relative to any bounded shape.
pub fn spatial_position_of(shape: &Shape, other: &Shape) -> SpatialPosition {
    match (shape, other) {
        (_, Shape::Void) | (Shape::Void, _) => SpatialPosition::Out,
        (Shape::Universe, _) => SpatialPosition::In,
        (_, Shape::Universe) => SpatialPosition::PartiallyIn,
        _ => {
            let tolerance = shape.tolerance().min(other.tolerance());
            let mine = shape.boundaries();
            let mut positions = Vec::new();
            for boundary in other.boundaries() {
                let cuts: Vec<Point2d> = mine
                    .iter()
                    .flat_map(|m| boundary.contacts_with(m, tolerance).all_points())
                    .collect();
                let pieces = boundary.split_at_points(&cuts, tolerance);
                positions.extend(
                    pieces
                        .edges()
                        .iter()
                        .map(|e| classify_edge_in_shape(e, shape, tolerance)),
                );
            }
            aggregate(positions)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::primitives::{circle, rectangle};
    use crate::topology::shape::HoledShape;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_classify_point_in_square() {
        let sq = rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
        let b = sq.boundary();
        assert_eq!(classify_point(b, &Point2d::new(5.0, 5.0), TOL), SpatialPosition::In);
        assert_eq!(classify_point(b, &Point2d::new(10.0, 5.0), TOL), SpatialPosition::On);
        assert_eq!(classify_point(b, &Point2d::new(0.0, 0.0), TOL), SpatialPosition::On);
        assert_eq!(classify_point(b, &Point2d::new(11.0, 5.0), TOL), SpatialPosition::Out);
        assert_eq!(
            classify_point(&b.reversed(), &Point2d::new(5.0, 5.0), TOL),
            SpatialPosition::In
        );
    }

    #[test]
    fn test_classify_point_in_circle() {
        let c = circle(Point2d::ORIGIN, 5.0).unwrap();
        let b = c.boundary();
        assert_eq!(classify_point(b, &Point2d::new(3.4, 3.4), TOL), SpatialPosition::In);
        assert_eq!(classify_point(b, &Point2d::new(3.6, 3.6), TOL), SpatialPosition::Out);
        assert_eq!(classify_point(b, &Point2d::new(3.0, 4.0), TOL), SpatialPosition::On);
    }

    #[test]
    fn test_classify_point_in_holed_shape() {
        let holed: Shape = HoledShape::new(rectangle(0.0, 0.0, 10.0, 10.0).unwrap())
            .with_hole(rectangle(3.0, 3.0, 7.0, 7.0).unwrap())
            .unwrap()
            .into();
        let at = |x, y| classify_point_in_shape(&holed, &Point2d::new(x, y), TOL);
        assert_eq!(at(1.0, 1.0), SpatialPosition::In);
        assert_eq!(at(5.0, 5.0), SpatialPosition::Out);
        assert_eq!(at(3.0, 5.0), SpatialPosition::On);
        assert_eq!(at(20.0, 5.0), SpatialPosition::Out);
    }

    #[test]
    fn test_classify_edge_falls_back_to_end_points() {
        let sq = rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
        // Midpoint lies on the boundary, end point inside.
        let chord = Edge::segment(Point2d::new(-5.0, 5.0), Point2d::new(5.0, 5.0));
        assert_eq!(classify_edge(&chord, sq.boundary(), TOL), SpatialPosition::In);
        let on = Edge::segment(Point2d::new(2.0, 0.0), Point2d::new(8.0, 0.0));
        assert_eq!(classify_edge(&on, sq.boundary(), TOL), SpatialPosition::On);
        let far = Edge::segment(Point2d::new(20.0, 0.0), Point2d::new(30.0, 0.0));
        assert_eq!(classify_edge(&far, sq.boundary(), TOL), SpatialPosition::Out);
    }

    #[test]
    fn test_aggregate() {
        use SpatialPosition::*;
        assert_eq!(aggregate([In, On, In]), In);
        assert_eq!(aggregate([Out, On]), Out);
        assert_eq!(aggregate([On, On]), On);
        assert_eq!(aggregate([In, Out]), PartiallyIn);
        assert_eq!(aggregate([In, PartiallyIn]), PartiallyIn);
    }

    #[test]
    fn test_spatial_position_of_shapes() {
        let big: Shape = rectangle(0.0, 0.0, 10.0, 10.0).unwrap().into();
        let small: Shape = rectangle(2.0, 2.0, 4.0, 4.0).unwrap().into();
        let crossing: Shape = rectangle(5.0, 5.0, 15.0, 15.0).unwrap().into();
        let far: Shape = rectangle(20.0, 20.0, 30.0, 30.0).unwrap().into();
        let flush: Shape = rectangle(0.0, 0.0, 5.0, 10.0).unwrap().into();

        assert_eq!(big.spatial_position_of(&small), SpatialPosition::In);
        assert_eq!(small.spatial_position_of(&big), SpatialPosition::Out);
        assert_eq!(big.spatial_position_of(&crossing), SpatialPosition::PartiallyIn);
        assert_eq!(big.spatial_position_of(&far), SpatialPosition::Out);
        assert_eq!(big.spatial_position_of(&big.clone()), SpatialPosition::On);
        assert_eq!(big.spatial_position_of(&flush), SpatialPosition::In);
        assert_eq!(big.spatial_position_of(&Shape::Void), SpatialPosition::Out);
        assert_eq!(Shape::Universe.spatial_position_of(&big), SpatialPosition::In);
    }
}
