use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use super::extent::Extent;
use super::point::{cross, Point2d, Vec2d};

/// A boundary edge: a straight segment or a circular arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Edge {
    Segment(Segment2d),
    Arc(Arc2d),
}

/// A straight segment from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment2d {
    pub start: Point2d,
    pub end: Point2d,
}

/// A circular arc from `start` to `end` around `center`.
///
/// The radius is the distance from `center` to `start`. `ccw` selects the
/// direction of travel; a full circle cannot be expressed by a single arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc2d {
    pub start: Point2d,
    pub end: Point2d,
    pub center: Point2d,
    pub ccw: bool,
}

impl Segment2d {
    pub fn new(start: Point2d, end: Point2d) -> Self {
        Self { start, end }
    }

    pub fn direction(&self) -> Vec2d {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn point_at(&self, t: f64) -> Point2d {
        self.start.lerp(&self.end, t)
    }

    /// Parameter of the orthogonal projection of `p` on the supporting line.
    pub fn parameter_of(&self, p: &Point2d) -> f64 {
        let d = self.direction();
        let len2 = d.norm_squared();
        if len2 == 0.0 {
            return 0.0;
        }
        (*p - self.start).dot(&d) / len2
    }

    pub fn closest_point(&self, p: &Point2d) -> Point2d {
        self.point_at(self.parameter_of(p).clamp(0.0, 1.0))
    }

    pub fn distance_to_point(&self, p: &Point2d) -> f64 {
        p.distance_to(&self.closest_point(p))
    }
}

impl Arc2d {
    pub fn new(start: Point2d, end: Point2d, center: Point2d, ccw: bool) -> Self {
        Self {
            start,
            end,
            center,
            ccw,
        }
    }

    pub fn radius(&self) -> f64 {
        self.center.distance_to(&self.start)
    }

    pub fn start_angle(&self) -> f64 {
        angle_of(&self.center, &self.start)
    }

    /// Signed sweep angle: positive for counter-clockwise arcs.
    pub fn sweep(&self) -> f64 {
        let delta = angle_of(&self.center, &self.end) - self.start_angle();
        directed_angle(delta, self.ccw)
    }

    pub fn length(&self) -> f64 {
        self.radius() * self.sweep().abs()
    }

    pub fn point_at(&self, t: f64) -> Point2d {
        let angle = self.start_angle() + t * self.sweep();
        let r = self.radius();
        Point2d::new(self.center.x + r * angle.cos(), self.center.y + r * angle.sin())
    }

    /// Angular parameter of `p` along the arc, in `[0, 1)` scaled by the sweep.
    pub fn parameter_of(&self, p: &Point2d) -> f64 {
        let sweep = self.sweep();
        if sweep == 0.0 {
            return 0.0;
        }
        let delta = directed_angle(angle_of(&self.center, p) - self.start_angle(), self.ccw);
        // A point at the start angle maps to a full turn; bring it back to zero.
        let delta = if (delta.abs() - TAU).abs() < 1e-12 { 0.0 } else { delta };
        delta / sweep
    }

    fn contains_angle_of(&self, p: &Point2d, tolerance: f64) -> bool {
        if p.is_equal_to(&self.start, tolerance) || p.is_equal_to(&self.end, tolerance) {
            return true;
        }
        let r = self.radius();
        let slack = if r > 0.0 { tolerance / (r * self.sweep().abs()) } else { 0.0 };
        let t = self.parameter_of(p);
        t >= -slack && t <= 1.0 + slack
    }

    /// Axis-extreme points of the supporting circle that lie on the arc.
    fn extreme_points(&self) -> Vec<Point2d> {
        let r = self.radius();
        [0.0, PI / 2.0, PI, 3.0 * PI / 2.0]
            .iter()
            .map(|a| Point2d::new(self.center.x + r * a.cos(), self.center.y + r * a.sin()))
            .filter(|p| {
                let t = self.parameter_of(p);
                t > 0.0 && t < 1.0
            })
            .collect()
    }

    /// Area between the arc and its chord (always non-negative).
    pub fn segment_area(&self) -> f64 {
        let theta = self.sweep().abs();
        let r = self.radius();
        0.5 * r * r * (theta - theta.sin())
    }
}

fn angle_of(center: &Point2d, p: &Point2d) -> f64 {
    (p.y - center.y).atan2(p.x - center.x)
}

/// Normalise an angle difference into `(0, 2π]` (ccw) or `[-2π, 0)` (cw).
fn directed_angle(mut delta: f64, ccw: bool) -> f64 {
    if ccw {
        while delta <= 0.0 {
            delta += TAU;
        }
        while delta > TAU {
            delta -= TAU;
        }
    } else {
        while delta >= 0.0 {
            delta -= TAU;
        }
        while delta < -TAU {
            delta += TAU;
        }
    }
    delta
}

impl Edge {
    pub fn segment(start: Point2d, end: Point2d) -> Self {
        Edge::Segment(Segment2d::new(start, end))
    }

    pub fn arc(start: Point2d, end: Point2d, center: Point2d, ccw: bool) -> Self {
        Edge::Arc(Arc2d::new(start, end, center, ccw))
    }

    pub fn start_point(&self) -> Point2d {
        match self {
            Edge::Segment(s) => s.start,
            Edge::Arc(a) => a.start,
        }
    }

    pub fn end_point(&self) -> Point2d {
        match self {
            Edge::Segment(s) => s.end,
            Edge::Arc(a) => a.end,
        }
    }

    /// Evaluate at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point2d {
        match self {
            Edge::Segment(s) => s.point_at(t),
            Edge::Arc(a) => a.point_at(t),
        }
    }

    pub fn mid_point(&self) -> Point2d {
        self.point_at(0.5)
    }

    pub fn parameter_of(&self, p: &Point2d) -> f64 {
        match self {
            Edge::Segment(s) => s.parameter_of(p),
            Edge::Arc(a) => a.parameter_of(p),
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            Edge::Segment(s) => s.length(),
            Edge::Arc(a) => a.length(),
        }
    }

    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        self.length() <= tolerance
    }

    pub fn reversed(&self) -> Self {
        match self {
            Edge::Segment(s) => Edge::segment(s.end, s.start),
            Edge::Arc(a) => Edge::arc(a.end, a.start, a.center, !a.ccw),
        }
    }

    /// Same edge with its end point moved to `p`.
    pub fn with_end_point(&self, p: Point2d) -> Self {
        match self {
            Edge::Segment(s) => Edge::segment(s.start, p),
            Edge::Arc(a) => Edge::arc(a.start, p, a.center, a.ccw),
        }
    }

    pub fn extent(&self) -> Extent {
        match self {
            Edge::Segment(s) => Extent::from_points(&[s.start, s.end]),
            Edge::Arc(a) => {
                let mut extent = Extent::from_points(&[a.start, a.end]);
                for p in a.extreme_points() {
                    extent.expand_to_include(&p);
                }
                extent
            }
        }
    }

    pub fn is_point_on(&self, p: &Point2d, tolerance: f64) -> bool {
        match self {
            Edge::Segment(s) => s.distance_to_point(p) <= tolerance,
            Edge::Arc(a) => {
                (p.distance_to(&a.center) - a.radius()).abs() <= tolerance
                    && a.contains_angle_of(p, tolerance)
            }
        }
    }

    /// Either end coincides with `p` within `tolerance`.
    pub fn has_extremity(&self, p: &Point2d, tolerance: f64) -> bool {
        self.start_point().is_equal_to(p, tolerance) || self.end_point().is_equal_to(p, tolerance)
    }

    /// Geometrically the same edge traversed the other way.
    pub fn is_reverse_of(&self, other: &Edge, tolerance: f64) -> bool {
        self.start_point().is_equal_to(&other.end_point(), tolerance)
            && self.end_point().is_equal_to(&other.start_point(), tolerance)
            && self.mid_point().is_equal_to(&other.mid_point(), tolerance)
    }

    /// Split at every point of `points` lying strictly inside the edge.
    ///
    /// Points within `tolerance` of an extremity or of each other are
    /// ignored; the returned pieces keep the edge direction.
    pub fn split_at(&self, points: &[Point2d], tolerance: f64) -> Vec<Edge> {
        let mut cuts: Vec<(f64, Point2d)> = points
            .iter()
            .filter(|p| !self.has_extremity(p, tolerance) && self.is_point_on(p, tolerance))
            .map(|p| (self.parameter_of(p), *p))
            .collect();

        if cuts.is_empty() {
            return vec![*self];
        }

        cuts.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        cuts.dedup_by(|a, b| a.1.is_equal_to(&b.1, tolerance));

        let mut pieces = Vec::with_capacity(cuts.len() + 1);
        let mut from = self.start_point();
        for (_, cut) in &cuts {
            pieces.push(self.piece(from, *cut));
            from = *cut;
        }
        pieces.push(self.piece(from, self.end_point()));
        pieces
    }

    fn piece(&self, start: Point2d, end: Point2d) -> Edge {
        match self {
            Edge::Segment(_) => Edge::segment(start, end),
            Edge::Arc(a) => Edge::arc(start, end, a.center, a.ccw),
        }
    }

    /// Contribution of this edge to the signed area of a closed boundary.
    pub fn signed_area_term(&self) -> f64 {
        let (s, e) = (self.start_point(), self.end_point());
        let chord = 0.5 * (s.x * e.y - e.x * s.y);
        match self {
            Edge::Segment(_) => chord,
            Edge::Arc(a) => {
                if a.ccw {
                    chord + a.segment_area()
                } else {
                    chord - a.segment_area()
                }
            }
        }
    }

    /// Signed angle swept by the edge as seen from `p`.
    ///
    /// `p` must not lie on the edge. Summed over a closed boundary this is
    /// `2π` times the winding number of the boundary around `p`.
    pub fn winding_angle(&self, p: &Point2d) -> f64 {
        let (s, e) = (self.start_point(), self.end_point());
        let u = s - *p;
        let v = e - *p;
        let chord_angle = cross(&u, &v).atan2(u.dot(&v));
        match self {
            Edge::Segment(_) => chord_angle,
            Edge::Arc(a) => {
                // From inside the circle the bearing to a point running
                // along the arc turns monotonically in the arc's sense, so
                // the sweep is the chord angle taken in that sense.
                if p.distance_to(&a.center) >= a.radius() {
                    chord_angle
                } else if a.ccw && chord_angle < 0.0 {
                    chord_angle + TAU
                } else if !a.ccw && chord_angle > 0.0 {
                    chord_angle - TAU
                } else {
                    chord_angle
                }
            }
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Edge::Segment(_) => "segment",
            Edge::Arc(_) => "arc",
        }
    }
}
