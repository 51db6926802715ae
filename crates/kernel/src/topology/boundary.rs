use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::geometry::edge::Edge;
use crate::geometry::extent::Extent;
use crate::geometry::intersection::edge_contacts;
use crate::geometry::point::Point2d;

/// Direction of travel of a closed boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
}

impl Orientation {
    pub fn opposite(self) -> Self {
        match self {
            Orientation::Clockwise => Orientation::CounterClockwise,
            Orientation::CounterClockwise => Orientation::Clockwise,
        }
    }
}

/// A closed, ordered chain of edges; each edge ends where the next starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    edges: Vec<Edge>,
}

/// Points shared by two boundaries, sorted by kind.
#[derive(Debug, Clone, Default)]
pub struct BoundaryContacts {
    /// Transversal intersections interior to an edge of each boundary.
    pub crossings: Vec<Point2d>,
    /// Every other shared point: vertices on the other boundary, tangencies.
    pub touches: Vec<Point2d>,
}

impl BoundaryContacts {
    pub fn is_empty(&self) -> bool {
        self.crossings.is_empty() && self.touches.is_empty()
    }

    pub fn all_points(&self) -> Vec<Point2d> {
        self.crossings.iter().chain(self.touches.iter()).copied().collect()
    }
}

impl Boundary {
    pub fn from_edges(edges: Vec<Edge>) -> Self {
        Self { edges }
    }

    /// Closed polyline through `points`; a repeated closing point is ignored.
    pub fn polygon(points: &[Point2d]) -> Self {
        let mut pts = points.to_vec();
        if pts.len() > 1 && pts[0] == pts[pts.len() - 1] {
            pts.pop();
        }
        let n = pts.len();
        let edges = (0..n).map(|i| Edge::segment(pts[i], pts[(i + 1) % n])).collect();
        Self { edges }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn vertices(&self) -> Vec<Point2d> {
        self.edges.iter().map(|e| e.start_point()).collect()
    }

    pub fn start_point(&self) -> Option<Point2d> {
        self.edges.first().map(|e| e.start_point())
    }

    /// Every edge ends where its successor starts, wrapping around.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        let n = self.edges.len();
        n > 0
            && (0..n).all(|i| {
                self.edges[i]
                    .end_point()
                    .is_equal_to(&self.edges[(i + 1) % n].start_point(), tolerance)
            })
    }

    /// Positive for counter-clockwise boundaries.
    pub fn signed_area(&self) -> f64 {
        self.edges.iter().map(|e| e.signed_area_term()).sum()
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn perimeter(&self) -> f64 {
        self.edges.iter().map(|e| e.length()).sum()
    }

    pub fn orientation(&self) -> Orientation {
        if self.signed_area() >= 0.0 {
            Orientation::CounterClockwise
        } else {
            Orientation::Clockwise
        }
    }

    pub fn reversed(&self) -> Self {
        Self {
            edges: self.edges.iter().rev().map(|e| e.reversed()).collect(),
        }
    }

    /// Copy traversed in the requested direction.
    pub fn oriented(&self, orientation: Orientation) -> Self {
        if self.orientation() == orientation {
            self.clone()
        } else {
            self.reversed()
        }
    }

    pub fn extent(&self) -> Extent {
        self.edges
            .iter()
            .fold(Extent::empty(), |acc, e| acc.union(&e.extent()))
    }

    pub fn is_point_on(&self, p: &Point2d, tolerance: f64) -> bool {
        self.edges.iter().any(|e| {
            e.extent().contains_point(p, tolerance) && e.is_point_on(p, tolerance)
        })
    }

    /// Number of turns the boundary makes around `p`, which must be off it.
    pub fn winding_number(&self, p: &Point2d) -> i32 {
        let total: f64 = self.edges.iter().map(|e| e.winding_angle(p)).sum();
        (total / TAU).round() as i32
    }

    /// Insert a vertex at every point of `points` lying inside an edge.
    pub fn split_at_points(&self, points: &[Point2d], tolerance: f64) -> Self {
        let mut edges = Vec::with_capacity(self.edges.len() + points.len());
        for edge in &self.edges {
            let extent = edge.extent();
            let relevant: Vec<Point2d> = points
                .iter()
                .filter(|p| extent.contains_point(p, tolerance))
                .copied()
                .collect();
            edges.extend(edge.split_at(&relevant, tolerance));
        }
        Self { edges }
    }

    /// All points this boundary shares with `other`.
    pub fn contacts_with(&self, other: &Boundary, tolerance: f64) -> BoundaryContacts {
        let mut contacts = BoundaryContacts::default();
        if !self.extent().outer_overlaps(&other.extent(), tolerance) {
            return contacts;
        }

        for a in &self.edges {
            let extent_a = a.extent();
            for b in &other.edges {
                if !extent_a.outer_overlaps(&b.extent(), tolerance) {
                    continue;
                }
                for c in edge_contacts(a, b, tolerance) {
                    let interior = !a.has_extremity(&c.point, tolerance)
                        && !b.has_extremity(&c.point, tolerance);
                    if interior && !c.tangent {
                        push_unique(&mut contacts.crossings, c.point, tolerance);
                    } else {
                        push_unique(&mut contacts.touches, c.point, tolerance);
                    }
                }
            }
        }

        let crossings = &contacts.crossings;
        contacts
            .touches
            .retain(|t| !crossings.iter().any(|c| c.is_equal_to(t, tolerance)));
        contacts
    }

    /// Points where the boundary meets itself other than at shared vertices.
    pub fn self_contact_points(&self, tolerance: f64) -> Vec<Point2d> {
        let n = self.edges.len();
        let mut points = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                for c in edge_contacts(&self.edges[i], &self.edges[j], tolerance) {
                    let shared_vertex = adjacent
                        && self.edges[i].has_extremity(&c.point, tolerance)
                        && self.edges[j].has_extremity(&c.point, tolerance);
                    if !shared_vertex {
                        push_unique(&mut points, c.point, tolerance);
                    }
                }
            }
        }
        points
    }

    /// Merge consecutive collinear segments and co-circular arcs.
    pub fn simplified(&self, tolerance: f64) -> Self {
        let mut edges = self.edges.clone();
        let mut i = 0;
        while edges.len() > 3 && i < edges.len() {
            let j = (i + 1) % edges.len();
            match merge_edges(&edges[i], &edges[j], tolerance) {
                Some(merged) => {
                    edges[i] = merged;
                    edges.remove(j);
                    if j < i {
                        i -= 1;
                    }
                }
                None => i += 1,
            }
        }
        Self { edges }
    }

    /// Move the last edge's end onto the first edge's start.
    pub(crate) fn snap_closed(&mut self) {
        if let (Some(first), Some(last)) = (self.edges.first().copied(), self.edges.last_mut()) {
            *last = last.with_end_point(first.start_point());
        }
    }
}

fn push_unique(points: &mut Vec<Point2d>, p: Point2d, tolerance: f64) {
    if !points.iter().any(|q| q.is_equal_to(&p, tolerance)) {
        points.push(p);
    }
}

fn merge_edges(a: &Edge, b: &Edge, tolerance: f64) -> Option<Edge> {
    match (a, b) {
        (Edge::Segment(s1), Edge::Segment(s2)) => {
            if s1.start.is_equal_to(&s2.end, tolerance) {
                return None;
            }
            let joined = Edge::segment(s1.start, s2.end);
            joined
                .is_point_on(&s1.end, tolerance)
                .then_some(joined)
        }
        (Edge::Arc(c1), Edge::Arc(c2)) => {
            let same_circle = c1.center.is_equal_to(&c2.center, tolerance)
                && (c1.radius() - c2.radius()).abs() <= tolerance
                && c1.ccw == c2.ccw;
            let sweep = c1.sweep() + c2.sweep();
            (same_circle && sweep.abs() < TAU - 1e-6)
                .then(|| Edge::arc(c1.start, c2.end, c1.center, c1.ccw))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn square(x0: f64, y0: f64, size: f64) -> Boundary {
        Boundary::polygon(&[
            Point2d::new(x0, y0),
            Point2d::new(x0 + size, y0),
            Point2d::new(x0 + size, y0 + size),
            Point2d::new(x0, y0 + size),
        ])
    }

    #[test]
    fn test_square_area_and_orientation() {
        let b = square(0.0, 0.0, 10.0);
        assert!(b.is_closed(TOL));
        assert_eq!(b.edge_count(), 4);
        assert!((b.signed_area() - 100.0).abs() < 1e-12);
        assert_eq!(b.orientation(), Orientation::CounterClockwise);
        let r = b.reversed();
        assert!((r.signed_area() + 100.0).abs() < 1e-12);
        assert_eq!(r.orientation(), Orientation::Clockwise);
        assert_eq!(r.oriented(Orientation::CounterClockwise), b);
        assert!((b.perimeter() - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_polygon_ignores_closing_point() {
        let b = Boundary::polygon(&[
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(0.0, 1.0),
            Point2d::new(0.0, 0.0),
        ]);
        assert_eq!(b.edge_count(), 3);
    }

    #[test]
    fn test_winding_number() {
        let b = square(0.0, 0.0, 10.0);
        assert_eq!(b.winding_number(&Point2d::new(5.0, 5.0)), 1);
        assert_eq!(b.reversed().winding_number(&Point2d::new(5.0, 5.0)), -1);
        assert_eq!(b.winding_number(&Point2d::new(15.0, 5.0)), 0);
        assert!(b.is_point_on(&Point2d::new(10.0, 3.0), TOL));
    }

    #[test]
    fn test_crossing_contacts() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 5.0, 10.0);
        let contacts = a.contacts_with(&b, TOL);
        assert_eq!(contacts.crossings.len(), 2);
        assert!(contacts.touches.is_empty());
        assert!(contacts
            .crossings
            .iter()
            .any(|p| p.is_equal_to(&Point2d::new(10.0, 5.0), TOL)));
        assert!(contacts
            .crossings
            .iter()
            .any(|p| p.is_equal_to(&Point2d::new(5.0, 10.0), TOL)));
    }

    #[test]
    fn test_shared_edge_contacts_are_touches() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(10.0, 0.0, 10.0);
        let contacts = a.contacts_with(&b, TOL);
        assert!(contacts.crossings.is_empty());
        assert_eq!(contacts.touches.len(), 2);
    }

    #[test]
    fn test_split_at_points() {
        let a = square(0.0, 0.0, 10.0);
        let split = a.split_at_points(&[Point2d::new(10.0, 5.0), Point2d::new(5.0, 10.0)], TOL);
        assert_eq!(split.edge_count(), 6);
        assert!(split.is_closed(TOL));
        assert!((split.area() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_simplify_merges_collinear_segments() {
        let b = Boundary::polygon(&[
            Point2d::new(0.0, 0.0),
            Point2d::new(5.0, 0.0),
            Point2d::new(10.0, 0.0),
            Point2d::new(10.0, 10.0),
            Point2d::new(0.0, 10.0),
            Point2d::new(0.0, 5.0),
        ]);
        let s = b.simplified(TOL);
        assert_eq!(s.edge_count(), 4);
        assert!(s.is_closed(TOL));
        assert!((s.area() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_self_contact_points() {
        let bowtie = Boundary::polygon(&[
            Point2d::new(0.0, 0.0),
            Point2d::new(10.0, 10.0),
            Point2d::new(10.0, 0.0),
            Point2d::new(0.0, 10.0),
        ]);
        let points = bowtie.self_contact_points(TOL);
        assert_eq!(points.len(), 1);
        assert!(points[0].is_equal_to(&Point2d::new(5.0, 5.0), TOL));
        assert!(square(0.0, 0.0, 1.0).self_contact_points(TOL).is_empty());
    }
}
