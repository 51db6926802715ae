use tracing::debug;

use super::classify::{position_of_boundary, SpatialPosition};
use crate::topology::boundary::Boundary;
use crate::topology::shape::{HoledShape, Shape, SimpleShape};

/// Turn the closed boundaries of a walk into a shape.
///
/// A boundary enclosed by an even number of others is an outer boundary;
/// one enclosed by an odd number is a hole of its innermost container.
pub fn assemble(boundaries: Vec<Boundary>, tolerance: f64, simplify: bool) -> Shape {
    let mut pieces: Vec<SimpleShape> = boundaries
        .into_iter()
        .map(|b| if simplify { b.simplified(tolerance) } else { b })
        .map(|b| SimpleShape::from_boundary(b, tolerance))
        .collect();

    match pieces.len() {
        0 => Shape::Void,
        1 => pieces.pop().map(Shape::Simple).unwrap_or(Shape::Void),
        _ => nest(pieces, tolerance),
    }
}

fn nest(pieces: Vec<SimpleShape>, tolerance: f64) -> Shape {
    let n = pieces.len();
    let containers: Vec<Vec<usize>> = (0..n)
        .map(|j| {
            (0..n)
                .filter(|&i| {
                    i != j
                        && pieces[i].extent().contains_extent(&pieces[j].extent(), tolerance)
                        && position_of_boundary(pieces[i].boundary(), pieces[j].boundary(), tolerance)
                            == SpatialPosition::In
                })
                .collect()
        })
        .collect();
    let depth = |j: usize| containers[j].len();

    let mut outers: Vec<(usize, HoledShape)> = (0..n)
        .filter(|&j| depth(j) % 2 == 0)
        .map(|j| (j, HoledShape::new(pieces[j].clone())))
        .collect();

    for j in (0..n).filter(|&j| depth(j) % 2 == 1) {
        let parent = containers[j].iter().copied().max_by_key(|&i| depth(i));
        if let Some((_, holed)) = outers.iter_mut().find(|(i, _)| Some(*i) == parent) {
            holed.push_hole(pieces[j].clone());
        }
    }

    debug!(
        boundaries = n,
        components = outers.len(),
        "assembled result boundaries"
    );
    Shape::from_parts(outers.into_iter().map(|(_, h)| Shape::from(h)).collect())
}
