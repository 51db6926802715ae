use tracing::{debug, instrument, trace};

use super::classify::{classify_edge, SpatialPosition};
use super::engine::AlgebraError;
use crate::geometry::edge::Edge;
use crate::geometry::point::Point2d;
use crate::topology::boundary::Boundary;
use crate::Tolerance;

/// Bookkeeping state of one edge during a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeUsage {
    Unvisited,
    Consumed,
    /// Lies along the other chain; may still be taken while tracing.
    OnOther,
}

/// Which of the two chains an edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Own,
    Other,
}

impl Side {
    fn index(self) -> usize {
        match self {
            Side::Own => 0,
            Side::Other => 1,
        }
    }

    fn flipped(self) -> Self {
        match self {
            Side::Own => Side::Other,
            Side::Other => Side::Own,
        }
    }
}

/// Closed boundaries produced by a walk.
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    pub boundaries: Vec<Boundary>,
    /// Every edge of the first chain lies on the second one.
    pub all_self_on: bool,
}

/// Traces result boundaries by following two preconditioned chains,
/// switching from one to the other at their shared vertices.
///
/// Each chain keeps the edges lying on the side of the other chain it asks
/// for: inside when its flag in `want_inside` is set, outside otherwise.
/// The operator is fully described by the chain orientations and these
/// two flags.
pub struct BoundaryWalker<'a> {
    chains: [&'a Boundary; 2],
    want_inside: [bool; 2],
    usage: [Vec<EdgeUsage>; 2],
    positions: [Vec<Option<SpatialPosition>>; 2],
    tolerance: f64,
}

impl<'a> BoundaryWalker<'a> {
    pub fn new(
        self_chain: &'a Boundary,
        other_chain: &'a Boundary,
        want_inside: (bool, bool),
        tolerance: f64,
    ) -> Self {
        let (n0, n1) = (self_chain.edge_count(), other_chain.edge_count());
        Self {
            chains: [self_chain, other_chain],
            want_inside: [want_inside.0, want_inside.1],
            usage: [vec![EdgeUsage::Unvisited; n0], vec![EdgeUsage::Unvisited; n1]],
            positions: [vec![None; n0], vec![None; n1]],
            tolerance,
        }
    }

    /// Scan both chains for unvisited edges on the wanted side and trace a
    /// boundary from each.
    #[instrument(
        skip_all,
        fields(
            self_edges = self.chains[0].edge_count(),
            other_edges = self.chains[1].edge_count()
        )
    )]
    pub fn walk(mut self) -> Result<WalkOutcome, AlgebraError> {
        let mut boundaries = Vec::new();
        for side in [Side::Own, Side::Other] {
            for index in 0..self.chains[side.index()].edge_count() {
                if self.usage[side.index()][index] != EdgeUsage::Unvisited {
                    continue;
                }
                let position = self.position(side, index);
                if position == SpatialPosition::On {
                    self.usage[side.index()][index] = EdgeUsage::OnOther;
                    continue;
                }
                self.usage[side.index()][index] = EdgeUsage::Consumed;
                if self.is_wanted(side, position) {
                    if let Some(boundary) = self.trace_from(side, index)? {
                        boundaries.push(boundary);
                    }
                }
            }
        }

        let all_self_on = (0..self.chains[0].edge_count())
            .all(|i| self.position(Side::Own, i) == SpatialPosition::On);

        debug!(boundaries = boundaries.len(), all_self_on, "walk finished");
        Ok(WalkOutcome {
            boundaries,
            all_self_on,
        })
    }

    fn position(&mut self, side: Side, index: usize) -> SpatialPosition {
        let s = side.index();
        if let Some(position) = self.positions[s][index] {
            return position;
        }
        let edge = &self.chains[s].edges()[index];
        let position = classify_edge(edge, self.chains[side.flipped().index()], self.tolerance);
        self.positions[s][index] = Some(position);
        position
    }

    fn is_wanted(&self, side: Side, position: SpatialPosition) -> bool {
        match position {
            SpatialPosition::In => self.want_inside[side.index()],
            SpatialPosition::Out => !self.want_inside[side.index()],
            _ => false,
        }
    }

    fn is_misplaced(&self, side: Side, position: SpatialPosition) -> bool {
        match position {
            SpatialPosition::In => !self.want_inside[side.index()],
            SpatialPosition::Out => self.want_inside[side.index()],
            _ => false,
        }
    }

    fn trace_from(&mut self, side: Side, index: usize) -> Result<Option<Boundary>, AlgebraError> {
        let limit = self.chains[0].edge_count() + self.chains[1].edge_count();
        let first = self.chains[side.index()].edges()[index];
        let start = first.start_point();
        let mut edges: Vec<Edge> = vec![first];
        let mut current = first.end_point();
        let (mut side, mut index) = (side, index);
        let mut steps = 1;

        while !current.is_equal_to(&start, self.tolerance) {
            if steps > limit {
                return Err(AlgebraError::WalkDiverged { edges: steps });
            }
            let (next_side, next_index) = self.choose_next(side, index, &current)?;
            self.usage[next_side.index()][next_index] = EdgeUsage::Consumed;
            let edge = self.chains[next_side.index()].edges()[next_index];

            // Going straight back along the last edge cancels it.
            if edges.last().is_some_and(|last| last.is_reverse_of(&edge, self.tolerance)) {
                edges.pop();
            } else {
                edges.push(edge);
            }

            current = edge.end_point();
            side = next_side;
            index = next_index;
            steps += 1;
        }

        if edges.len() < 2 {
            return Ok(None);
        }
        let mut boundary = Boundary::from_edges(edges);
        boundary.snap_closed();
        if Tolerance::with_coincidence(self.tolerance).is_zero_area(boundary.area()) {
            debug!(edges = boundary.edge_count(), "dropping zero-area loop");
            return Ok(None);
        }
        trace!(edges = boundary.edge_count(), area = boundary.area(), "closed boundary");
        Ok(Some(boundary))
    }

    /// Pick the edge following `index` on `side`, which ends at `current`.
    fn choose_next(
        &mut self,
        side: Side,
        index: usize,
        current: &Point2d,
    ) -> Result<(Side, usize), AlgebraError> {
        let next = (index + 1) % self.chains[side.index()].edge_count();

        if self.usage[side.index()][next] == EdgeUsage::Consumed {
            trace!(?current, "next edge already used, switching chains");
            return self.resynchronize(side.flipped(), current);
        }

        let position = self.position(side, next);
        if self.is_misplaced(side, position) {
            trace!(?current, ?position, "next edge on wrong side, switching chains");
            self.usage[side.index()][next] = EdgeUsage::Consumed;
            return self.resynchronize(side.flipped(), current);
        }

        if position == SpatialPosition::On {
            // Shared stretch: leave for the other chain if its edge from
            // here is on the side that chain wants.
            let other = side.flipped();
            if let Some(alternative) = self.find_edge_starting_at(other, current) {
                if self.usage[other.index()][alternative] != EdgeUsage::Consumed {
                    let alt_position = self.position(other, alternative);
                    if self.is_wanted(other, alt_position) {
                        self.usage[side.index()][next] = EdgeUsage::Consumed;
                        return Ok((other, alternative));
                    }
                }
            }
        }

        Ok((side, next))
    }

    fn resynchronize(&self, side: Side, current: &Point2d) -> Result<(Side, usize), AlgebraError> {
        self.find_edge_starting_at(side, current)
            .map(|index| (side, index))
            .ok_or(AlgebraError::ResynchronizationFailed { point: *current })
    }

    /// Edge of `side` starting at `point`, preferring one not yet consumed.
    fn find_edge_starting_at(&self, side: Side, point: &Point2d) -> Option<usize> {
        let s = side.index();
        let starts_here = |i: &usize| {
            self.chains[s].edges()[*i]
                .start_point()
                .is_equal_to(point, self.tolerance)
        };
        let n = self.chains[s].edge_count();
        (0..n)
            .filter(starts_here)
            .find(|i| self.usage[s][*i] != EdgeUsage::Consumed)
            .or_else(|| (0..n).find(starts_here))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boolean::split::precondition;
    use crate::topology::boundary::Orientation;
    use crate::topology::primitives::rectangle;
    use crate::topology::shape::SimpleShape;

    const TOL: f64 = 1e-9;

    fn walk(
        a: &SimpleShape,
        b: &SimpleShape,
        orientations: (Orientation, Orientation),
        want_inside: (bool, bool),
    ) -> WalkOutcome {
        let points = a.boundary().contacts_with(b.boundary(), TOL).all_points();
        let chains = precondition(a, b, orientations, &points, TOL);
        BoundaryWalker::new(&chains.self_chain, &chains.other_chain, want_inside, TOL)
            .walk()
            .unwrap()
    }

    fn squares() -> (SimpleShape, SimpleShape) {
        (
            rectangle(0.0, 0.0, 10.0, 10.0).unwrap(),
            rectangle(5.0, 5.0, 15.0, 15.0).unwrap(),
        )
    }

    #[test]
    fn test_walk_intersection() {
        let (a, b) = squares();
        let ccw = Orientation::CounterClockwise;
        let outcome = walk(&a, &b, (ccw, ccw), (true, true));
        assert_eq!(outcome.boundaries.len(), 1);
        assert!((outcome.boundaries[0].area() - 25.0).abs() < 1e-9);
        assert!(outcome.boundaries[0].is_closed(TOL));
        assert!(!outcome.all_self_on);
    }

    #[test]
    fn test_walk_union() {
        let (a, b) = squares();
        let ccw = Orientation::CounterClockwise;
        let outcome = walk(&a, &b, (ccw, ccw), (false, false));
        assert_eq!(outcome.boundaries.len(), 1);
        assert_eq!(outcome.boundaries[0].edge_count(), 8);
        assert!((outcome.boundaries[0].area() - 175.0).abs() < 1e-9);
    }

    #[test]
    fn test_walk_difference() {
        let (a, b) = squares();
        let outcome = walk(
            &a,
            &b,
            (Orientation::CounterClockwise, Orientation::Clockwise),
            (false, true),
        );
        assert_eq!(outcome.boundaries.len(), 1);
        let boundary = &outcome.boundaries[0];
        assert_eq!(boundary.edge_count(), 6);
        assert!((boundary.area() - 75.0).abs() < 1e-9);
        assert!(boundary
            .vertices()
            .iter()
            .any(|v| v.is_equal_to(&Point2d::new(5.0, 5.0), TOL)));
    }

    #[test]
    fn test_walk_shared_edge_union() {
        let a = rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
        let b = rectangle(0.0, 5.0, 10.0, 15.0).unwrap();
        let ccw = Orientation::CounterClockwise;
        let outcome = walk(&a, &b, (ccw, ccw), (false, false));
        assert_eq!(outcome.boundaries.len(), 1);
        assert!((outcome.boundaries[0].area() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_walk_identical_chains_produce_nothing() {
        let a = rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
        let ccw = Orientation::CounterClockwise;
        let outcome = walk(&a, &a.clone(), (ccw, ccw), (true, true));
        assert!(outcome.boundaries.is_empty());
        assert!(outcome.all_self_on);
    }
}
