//! Set operations involving complex or holed operands, reduced to
//! operations on their parts.

use tracing::trace;

use super::engine::{combine, AlgebraError, BoolOp};
use super::AlgebraConfig;
use crate::topology::shape::{HoledShape, Shape};

pub(crate) fn combine_compound(
    a: &Shape,
    b: &Shape,
    op: BoolOp,
    config: &AlgebraConfig,
) -> Result<Shape, AlgebraError> {
    trace!(%op, lhs = %a.shape_type(), rhs = %b.shape_type(), "reducing compound operands");
    match op {
        BoolOp::Difference => differentiate(a, b, config),
        BoolOp::Intersection => intersect(a, b, config),
        BoolOp::Union => unify(a, b, config),
    }
}

// ─── Difference ──────────────────────────────────────────────────────────────

fn differentiate(a: &Shape, b: &Shape, config: &AlgebraConfig) -> Result<Shape, AlgebraError> {
    match (a, b) {
        // (c1 ∪ c2 ∪ …) − B = (c1 − B) ∪ (c2 − B) ∪ …
        (Shape::Complex(c), _) => {
            let parts = c
                .components()
                .iter()
                .map(|component| combine(component, b, BoolOp::Difference, config))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Shape::from_parts(parts))
        }
        // A − (c1 ∪ c2 ∪ …) = ((A − c1) − c2) − …
        (_, Shape::Complex(c)) => subtract_all(a.clone(), c.components().iter().cloned(), config),
        // (O − h…) − B = ((O − B) − h1) − …
        (Shape::Holed(h), _) => {
            let remainder = combine(&outer_of(h), b, BoolOp::Difference, config)?;
            subtract_all(remainder, holes_of(h), config)
        }
        // A − (O − h…) = (A − O) ∪ (A ∩ h1) ∪ …
        // Each A ∩ hi lies strictly inside O, so the pieces never meet.
        (_, Shape::Holed(h)) => {
            let mut parts = parts_of(&combine(a, &outer_of(h), BoolOp::Difference, config)?);
            for hole in holes_of(h) {
                parts.extend(parts_of(&combine(a, &hole, BoolOp::Intersection, config)?));
            }
            Ok(Shape::from_parts(parts))
        }
        _ => combine(a, b, BoolOp::Difference, config),
    }
}

fn subtract_all(
    mut result: Shape,
    parts: impl IntoIterator<Item = Shape>,
    config: &AlgebraConfig,
) -> Result<Shape, AlgebraError> {
    for part in parts {
        if result.is_void() {
            break;
        }
        result = combine(&result, &part, BoolOp::Difference, config)?;
    }
    Ok(result)
}

// ─── Intersection ────────────────────────────────────────────────────────────

fn intersect(a: &Shape, b: &Shape, config: &AlgebraConfig) -> Result<Shape, AlgebraError> {
    match (a, b) {
        // (c1 ∪ c2 ∪ …) ∩ B = (c1 ∩ B) ∪ (c2 ∩ B) ∪ …
        (Shape::Complex(c), other) | (other, Shape::Complex(c)) => {
            let parts = c
                .components()
                .iter()
                .map(|component| combine(component, other, BoolOp::Intersection, config))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Shape::from_parts(parts))
        }
        // (O − h…) ∩ B = ((O ∩ B) − h1) − …
        (Shape::Holed(h), other) | (other, Shape::Holed(h)) => {
            let clipped = combine(&outer_of(h), other, BoolOp::Intersection, config)?;
            subtract_all(clipped, holes_of(h), config)
        }
        _ => combine(a, b, BoolOp::Intersection, config),
    }
}

// ─── Union ───────────────────────────────────────────────────────────────────

fn unify(a: &Shape, b: &Shape, config: &AlgebraConfig) -> Result<Shape, AlgebraError> {
    match (a, b) {
        (Shape::Complex(_), _) | (_, Shape::Complex(_)) => {
            let mut components = parts_of(b);
            for component in parts_of(a) {
                components = merge_into(components, component, config)?;
            }
            Ok(Shape::from_parts(components))
        }
        // (O − h…) ∪ B = (O ∪ B) − ((h1 − B) ∪ …)
        (Shape::Holed(h), other) | (other, Shape::Holed(h)) => {
            let mut result = combine(&outer_of(h), other, BoolOp::Union, config)?;
            for hole in holes_of(h) {
                let uncovered = combine(&hole, other, BoolOp::Difference, config)?;
                if !uncovered.is_void() {
                    result = combine(&result, &uncovered, BoolOp::Difference, config)?;
                }
            }
            Ok(result)
        }
        _ => combine(a, b, BoolOp::Union, config),
    }
}

/// Add `shape` to a set of disjoint components, absorbing every component
/// it overlaps until nothing more merges.
fn merge_into(
    components: Vec<Shape>,
    shape: Shape,
    config: &AlgebraConfig,
) -> Result<Vec<Shape>, AlgebraError> {
    let mut merged = shape;
    let mut pending = components;
    loop {
        let mut untouched = Vec::with_capacity(pending.len());
        let mut changed = false;
        for component in pending {
            let tolerance = merged.tolerance().min(component.tolerance());
            if !merged.extent().outer_overlaps(&component.extent(), tolerance) {
                untouched.push(component);
                continue;
            }
            match combine(&merged, &component, BoolOp::Union, config)? {
                // Still two pieces: they only touch or are apart.
                Shape::Complex(_) => untouched.push(component),
                united => {
                    merged = united;
                    changed = true;
                }
            }
        }
        pending = untouched;
        if !changed {
            break;
        }
    }
    pending.push(merged);
    Ok(pending)
}

fn parts_of(shape: &Shape) -> Vec<Shape> {
    match shape {
        Shape::Complex(c) => c.components().to_vec(),
        Shape::Void => Vec::new(),
        other => vec![other.clone()],
    }
}

fn outer_of(h: &HoledShape) -> Shape {
    Shape::Simple(h.outer().clone())
}

fn holes_of(h: &HoledShape) -> impl Iterator<Item = Shape> + '_ {
    h.holes().iter().cloned().map(Shape::Simple)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boolean::engine::boolean_op;
    use crate::topology::primitives::rectangle;
    use crate::topology::shape::ShapeType;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Shape {
        rectangle(x0, y0, x1, y1).unwrap().into()
    }

    fn run(a: &Shape, b: &Shape, op: BoolOp) -> Shape {
        boolean_op(a, b, op, &AlgebraConfig::default()).unwrap()
    }

    fn frame() -> Shape {
        run(&rect(0.0, 0.0, 10.0, 10.0), &rect(3.0, 3.0, 7.0, 7.0), BoolOp::Difference)
    }

    fn pair() -> Shape {
        run(&rect(0.0, 0.0, 2.0, 2.0), &rect(5.0, 0.0, 7.0, 2.0), BoolOp::Union)
    }

    #[test]
    fn test_complex_minus_simple() {
        let result = run(&pair(), &rect(1.0, -1.0, 6.0, 3.0), BoolOp::Difference);
        assert_eq!(result.shape_type(), ShapeType::Complex);
        assert!((result.area() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_simple_minus_complex() {
        let result = run(&rect(0.0, 0.0, 7.0, 2.0), &pair(), BoolOp::Difference);
        assert_eq!(result.shape_type(), ShapeType::Simple);
        assert!((result.area() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_complex_intersection() {
        let result = run(&pair(), &rect(1.0, 1.0, 6.0, 5.0), BoolOp::Intersection);
        assert_eq!(result.shape_type(), ShapeType::Complex);
        assert!((result.area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_union_bridges_components() {
        let result = run(&pair(), &rect(1.0, 0.5, 6.0, 1.5), BoolOp::Union);
        assert_eq!(result.shape_type(), ShapeType::Simple);
        assert!((result.area() - (8.0 + 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_holed_minus_simple() {
        let result = run(&frame(), &rect(-1.0, -1.0, 11.0, 5.0), BoolOp::Difference);
        // The remaining top part is a U shape.
        assert_eq!(result.shape_type(), ShapeType::Simple);
        assert!((result.area() - (50.0 - 8.0)).abs() < 1e-9);
    }

    #[test]
    fn test_simple_minus_holed() {
        let result = run(&rect(2.0, 2.0, 8.0, 8.0), &frame(), BoolOp::Difference);
        assert!((result.area() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_island_in_hole() {
        let island = rect(4.0, 4.0, 6.0, 6.0);
        let union = run(&frame(), &island, BoolOp::Union);
        assert_eq!(union.shape_type(), ShapeType::Complex);
        assert!((union.area() - 88.0).abs() < 1e-9);
        assert!(run(&frame(), &island, BoolOp::Intersection).is_void());
        assert_eq!(run(&island, &frame(), BoolOp::Difference), island);
    }

    #[test]
    fn test_holed_intersection() {
        let result = run(&frame(), &rect(2.0, 2.0, 8.0, 8.0), BoolOp::Intersection);
        assert_eq!(result.shape_type(), ShapeType::Holed);
        assert!((result.area() - (36.0 - 16.0)).abs() < 1e-9);
    }

    #[test]
    fn test_holed_union_fills_hole() {
        let plug = rect(2.0, 2.0, 8.0, 8.0);
        let result = run(&frame(), &plug, BoolOp::Union);
        assert_eq!(result.shape_type(), ShapeType::Simple);
        assert!((result.area() - 100.0).abs() < 1e-9);
        let partial = run(&frame(), &rect(2.0, 2.0, 5.0, 8.0), BoolOp::Union);
        assert_eq!(partial.shape_type(), ShapeType::Holed);
        assert!((partial.area() - (100.0 - 8.0)).abs() < 1e-9);
    }
}
