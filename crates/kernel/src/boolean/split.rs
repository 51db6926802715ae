use tracing::{debug, instrument};

use crate::geometry::point::Point2d;
use crate::topology::boundary::{Boundary, Orientation};
use crate::topology::shape::SimpleShape;

/// Two boundaries cut so that no edge of one crosses or touches the other
/// anywhere but at its extremities.
#[derive(Debug, Clone)]
pub struct PreparedChains {
    pub self_chain: Boundary,
    pub other_chain: Boundary,
}

/// Orient both boundaries and cut them at every shared point.
///
/// `points` are the crossings and contacts found between the two shapes.
/// After the first cut, every vertex of one chain lying on the other chain
/// is inserted there too, so both chains carry identical vertex sets along
/// any stretch they share.
#[instrument(skip(a, b, points), fields(cut_points = points.len()))]
pub fn precondition(
    a: &SimpleShape,
    b: &SimpleShape,
    orientations: (Orientation, Orientation),
    points: &[Point2d],
    tolerance: f64,
) -> PreparedChains {
    debug_assert!(!a.boundary().is_empty() && !b.boundary().is_empty());
    let chain_a = a
        .boundary()
        .oriented(orientations.0)
        .split_at_points(points, tolerance);
    let chain_b = b
        .boundary()
        .oriented(orientations.1)
        .split_at_points(points, tolerance);

    let a_on_b = vertices_on(&chain_a, &chain_b, tolerance);
    let b_on_a = vertices_on(&chain_b, &chain_a, tolerance);
    let self_chain = chain_a.split_at_points(&b_on_a, tolerance);
    let other_chain = chain_b.split_at_points(&a_on_b, tolerance);

    debug!(
        self_edges = self_chain.edge_count(),
        other_edges = other_chain.edge_count(),
        "preconditioned boundaries"
    );

    PreparedChains {
        self_chain,
        other_chain,
    }
}

/// Vertices of `chain` lying on `target`.
fn vertices_on(chain: &Boundary, target: &Boundary, tolerance: f64) -> Vec<Point2d> {
    let extent = target.extent();
    chain
        .vertices()
        .into_iter()
        .filter(|v| extent.contains_point(v, tolerance) && target.is_point_on(v, tolerance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::primitives::rectangle;

    const TOL: f64 = 1e-9;

    fn has_vertex(b: &Boundary, x: f64, y: f64) -> bool {
        b.vertices()
            .iter()
            .any(|v| v.is_equal_to(&Point2d::new(x, y), TOL))
    }

    #[test]
    fn test_crossing_squares_are_cut_at_crossings() {
        let a = rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
        let b = rectangle(5.0, 5.0, 15.0, 15.0).unwrap();
        let points = a.boundary().contacts_with(b.boundary(), TOL).all_points();
        let chains = precondition(
            &a,
            &b,
            (Orientation::CounterClockwise, Orientation::Clockwise),
            &points,
            TOL,
        );
        assert_eq!(chains.self_chain.edge_count(), 6);
        assert_eq!(chains.other_chain.edge_count(), 6);
        assert_eq!(chains.self_chain.orientation(), Orientation::CounterClockwise);
        assert_eq!(chains.other_chain.orientation(), Orientation::Clockwise);
        for chain in [&chains.self_chain, &chains.other_chain] {
            assert!(chain.is_closed(TOL));
            assert!(has_vertex(chain, 10.0, 5.0));
            assert!(has_vertex(chain, 5.0, 10.0));
        }
    }

    #[test]
    fn test_shared_stretch_gets_matching_vertices() {
        // B's left side runs along part of A's right side.
        let a = rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
        let b = rectangle(10.0, 2.0, 20.0, 8.0).unwrap();
        let points = a.boundary().contacts_with(b.boundary(), TOL).all_points();
        let chains = precondition(
            &a,
            &b,
            (Orientation::CounterClockwise, Orientation::CounterClockwise),
            &points,
            TOL,
        );
        assert!(has_vertex(&chains.self_chain, 10.0, 2.0));
        assert!(has_vertex(&chains.self_chain, 10.0, 8.0));
        assert_eq!(chains.self_chain.edge_count(), 6);
        assert_eq!(chains.other_chain.edge_count(), 4);
    }
}
