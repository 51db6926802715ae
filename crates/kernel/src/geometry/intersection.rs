use nalgebra::{Matrix2, Vector2};

use super::edge::{Arc2d, Edge, Segment2d};
use super::point::{cross, Point2d};
use crate::default_tolerance;

/// A point where two edges meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeContact {
    pub point: Point2d,
    /// The edges touch without crossing (parallel overlap end, tangency).
    pub tangent: bool,
}

impl EdgeContact {
    fn crossing(point: Point2d) -> Self {
        Self {
            point,
            tangent: false,
        }
    }

    fn touching(point: Point2d) -> Self {
        Self {
            point,
            tangent: true,
        }
    }
}

/// All points shared by two edges.
///
/// Besides proper intersections this reports every extremity of one edge
/// lying on the other, so collinear and co-circular overlaps show up as
/// their end points.
pub fn edge_contacts(a: &Edge, b: &Edge, tolerance: f64) -> Vec<EdgeContact> {
    if !a.extent().outer_overlaps(&b.extent(), tolerance) {
        return Vec::new();
    }

    let mut contacts = match (a, b) {
        (Edge::Segment(s1), Edge::Segment(s2)) => segment_segment(s1, s2, tolerance),
        (Edge::Segment(s), Edge::Arc(c)) | (Edge::Arc(c), Edge::Segment(s)) => {
            segment_arc(s, c, tolerance)
        }
        (Edge::Arc(c1), Edge::Arc(c2)) => arc_arc(c1, c2, tolerance),
    };

    for p in [a.start_point(), a.end_point()] {
        if b.is_point_on(&p, tolerance) {
            contacts.push(EdgeContact::touching(p));
        }
    }
    for p in [b.start_point(), b.end_point()] {
        if a.is_point_on(&p, tolerance) {
            contacts.push(EdgeContact::touching(p));
        }
    }

    dedup_contacts(contacts, tolerance)
}

/// Keep one contact per location, preferring extremity reports.
fn dedup_contacts(contacts: Vec<EdgeContact>, tolerance: f64) -> Vec<EdgeContact> {
    let mut unique: Vec<EdgeContact> = Vec::with_capacity(contacts.len());
    for c in contacts {
        match unique.iter_mut().find(|u| u.point.is_equal_to(&c.point, tolerance)) {
            Some(existing) => existing.tangent |= c.tangent,
            None => unique.push(c),
        }
    }
    unique
}

fn segment_segment(s1: &Segment2d, s2: &Segment2d, tolerance: f64) -> Vec<EdgeContact> {
    let d1 = s1.direction();
    let d2 = s2.direction();
    let (l1, l2) = (d1.norm(), d2.norm());
    if l1 <= tolerance || l2 <= tolerance {
        return Vec::new();
    }

    // Parallel segments only meet through their extremities.
    if cross(&(d1 / l1), &(d2 / l2)).abs() < default_tolerance().angular {
        return Vec::new();
    }

    // s1.start + t1 d1 = s2.start + t2 d2
    let m = Matrix2::new(d1.x, -d2.x, d1.y, -d2.y);
    let rhs = s2.start - s1.start;
    let Some(params) = m.lu().solve(&Vector2::new(rhs.x, rhs.y)) else {
        return Vec::new();
    };
    let (t1, t2) = (params[0], params[1]);
    let (e1, e2) = (tolerance / l1, tolerance / l2);
    if t1 < -e1 || t1 > 1.0 + e1 || t2 < -e2 || t2 > 1.0 + e2 {
        return Vec::new();
    }
    vec![EdgeContact::crossing(s1.point_at(t1.clamp(0.0, 1.0)))]
}

fn segment_arc(s: &Segment2d, arc: &Arc2d, tolerance: f64) -> Vec<EdgeContact> {
    let d = s.direction();
    let a = d.norm_squared();
    if a <= tolerance * tolerance {
        return Vec::new();
    }
    let r = arc.radius();
    let f = s.start - arc.center;
    let b = 2.0 * f.dot(&d);
    let c = f.norm_squared() - r * r;

    // Distance from the centre to the supporting line decides tangency.
    let foot_t = -b / (2.0 * a);
    let foot = s.point_at(foot_t);
    let gap = foot.distance_to(&arc.center) - r;

    let mut hits = Vec::new();
    if gap.abs() <= tolerance {
        hits.push((foot_t, true));
    } else if gap < 0.0 {
        let disc = (b * b - 4.0 * a * c).max(0.0).sqrt();
        hits.push(((-b - disc) / (2.0 * a), false));
        hits.push(((-b + disc) / (2.0 * a), false));
    }

    let slack = tolerance / a.sqrt();
    let arc_edge = Edge::Arc(*arc);
    hits.into_iter()
        .filter(|(t, _)| *t >= -slack && *t <= 1.0 + slack)
        .map(|(t, tangent)| (s.point_at(t.clamp(0.0, 1.0)), tangent))
        .filter(|(p, _)| arc_edge.is_point_on(p, tolerance))
        .map(|(p, tangent)| EdgeContact { point: p, tangent })
        .collect()
}

fn arc_arc(c1: &Arc2d, c2: &Arc2d, tolerance: f64) -> Vec<EdgeContact> {
    let (r1, r2) = (c1.radius(), c2.radius());
    let delta = c2.center - c1.center;
    let d = delta.norm();

    // Co-circular arcs overlap along a stretch; its ends are extremities.
    if d <= tolerance {
        return Vec::new();
    }
    if d > r1 + r2 + tolerance || d < (r1 - r2).abs() - tolerance {
        return Vec::new();
    }

    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let unit = delta / d;
    let base = c1.center + unit * a;
    let normal = Vector2::new(-unit.y, unit.x);

    let tangent = (d - (r1 + r2)).abs() <= tolerance || (d - (r1 - r2).abs()).abs() <= tolerance;
    let candidates = if tangent || h <= tolerance {
        vec![EdgeContact::touching(base)]
    } else {
        vec![
            EdgeContact::crossing(base + normal * h),
            EdgeContact::crossing(base - normal * h),
        ]
    };

    let (e1, e2) = (Edge::Arc(*c1), Edge::Arc(*c2));
    candidates
        .into_iter()
        .filter(|c| e1.is_point_on(&c.point, tolerance) && e2.is_point_on(&c.point, tolerance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Edge {
        Edge::segment(Point2d::new(x0, y0), Point2d::new(x1, y1))
    }

    #[test]
    fn test_crossing_segments() {
        let c = edge_contacts(&seg(0.0, 0.0, 10.0, 10.0), &seg(0.0, 10.0, 10.0, 0.0), TOL);
        assert_eq!(c.len(), 1);
        assert!(!c[0].tangent);
        assert!(c[0].point.is_equal_to(&Point2d::new(5.0, 5.0), TOL));
    }

    #[test]
    fn test_non_crossing_segments() {
        let c = edge_contacts(&seg(0.0, 0.0, 1.0, 0.0), &seg(2.0, -1.0, 2.0, 1.0), TOL);
        assert!(c.is_empty());
    }

    #[test]
    fn test_t_junction_is_touching() {
        let c = edge_contacts(&seg(0.0, 0.0, 10.0, 0.0), &seg(5.0, 0.0, 5.0, 5.0), TOL);
        assert_eq!(c.len(), 1);
        assert!(c[0].tangent);
    }

    #[test]
    fn test_collinear_overlap_reports_extremities() {
        let c = edge_contacts(&seg(0.0, 0.0, 10.0, 0.0), &seg(5.0, 0.0, 15.0, 0.0), TOL);
        assert_eq!(c.len(), 2);
        assert!(c.iter().all(|c| c.tangent));
    }

    #[test]
    fn test_segment_through_arc() {
        let arc = Edge::arc(
            Point2d::new(5.0, 0.0),
            Point2d::new(-5.0, 0.0),
            Point2d::ORIGIN,
            true,
        );
        let c = edge_contacts(&seg(-10.0, 3.0, 10.0, 3.0), &arc, TOL);
        assert_eq!(c.len(), 2);
        for contact in &c {
            assert!(!contact.tangent);
            assert!((contact.point.x.abs() - 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_segment_tangent_to_arc() {
        let arc = Edge::arc(
            Point2d::new(5.0, 0.0),
            Point2d::new(-5.0, 0.0),
            Point2d::ORIGIN,
            true,
        );
        let c = edge_contacts(&seg(-10.0, 5.0, 10.0, 5.0), &arc, TOL);
        assert_eq!(c.len(), 1);
        assert!(c[0].tangent);
        assert!(c[0].point.is_equal_to(&Point2d::new(0.0, 5.0), 1e-9));
    }

    #[test]
    fn test_arc_arc_crossing() {
        let upper = Edge::arc(
            Point2d::new(5.0, 0.0),
            Point2d::new(-5.0, 0.0),
            Point2d::ORIGIN,
            true,
        );
        let other = Edge::arc(
            Point2d::new(11.0, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(6.0, 0.0),
            true,
        );
        let c = edge_contacts(&upper, &other, TOL);
        assert_eq!(c.len(), 1);
        assert!(c[0].point.is_equal_to(&Point2d::new(3.0, 4.0), 1e-9));
    }
}
