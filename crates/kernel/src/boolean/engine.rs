use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::geometry::point::Point2d;
use crate::topology::boundary::Orientation;
use crate::topology::shape::{HoledShape, Shape, SimpleShape};
use crate::validation::{audit_shape, ShapeAudit};

use super::assemble::assemble;
use super::classify::{spatial_position_of, SpatialPosition};
use super::compound::combine_compound;
use super::split::precondition;
use super::walk::BoundaryWalker;
use super::AlgebraConfig;

/// Set operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolOp {
    Union,
    Intersection,
    Difference,
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoolOp::Union => "union",
            BoolOp::Intersection => "intersection",
            BoolOp::Difference => "difference",
        };
        f.write_str(name)
    }
}

/// Structured failure information for set operations.
#[derive(Debug, Error)]
pub enum AlgebraError {
    #[error("difference of the universe and a bounded shape is unbounded")]
    UnboundedResult,

    #[error("shapes share no boundary point yet one is {position:?} relative to the other")]
    InconsistentClassification { position: SpatialPosition },

    #[error("no edge of the other boundary starts at {point:?}")]
    ResynchronizationFailed { point: Point2d },

    #[error("boundary walk did not close after {edges} edges")]
    WalkDiverged { edges: usize },

    #[error("{op} produced no boundary although the shapes cross")]
    MissingBoundary { op: BoolOp },

    #[error("result failed validation with {} errors", .audit.errors.len())]
    InvalidResult { audit: ShapeAudit },
}

/// Chain orientations and wanted sides for one operator.
#[derive(Debug, Clone, Copy)]
struct WalkSetup {
    orientations: (Orientation, Orientation),
    want_inside: (bool, bool),
}

impl BoolOp {
    /// The second chain is reversed for difference so that keeping its inside
    /// edges traces the cut; union keeps both outsides, intersection both insides.
    fn walk_setup(self) -> WalkSetup {
        use Orientation::{Clockwise, CounterClockwise};
        match self {
            BoolOp::Difference => WalkSetup {
                orientations: (CounterClockwise, Clockwise),
                want_inside: (false, true),
            },
            BoolOp::Union => WalkSetup {
                orientations: (CounterClockwise, CounterClockwise),
                want_inside: (false, false),
            },
            BoolOp::Intersection => WalkSetup {
                orientations: (CounterClockwise, CounterClockwise),
                want_inside: (true, true),
            },
        }
    }
}

/// Apply `op` to two shapes.
///
/// The inputs are never modified. On failure both operands are logged as
/// JSON so the case can be replayed.
#[instrument(skip(a, b, config), fields(lhs = %a.shape_type(), rhs = %b.shape_type()))]
pub fn boolean_op(
    a: &Shape,
    b: &Shape,
    op: BoolOp,
    config: &AlgebraConfig,
) -> Result<Shape, AlgebraError> {
    let result = combine(a, b, op, config).and_then(|shape| {
        if config.validate_results {
            let audit = audit_shape(&shape);
            if !audit.is_valid() {
                return Err(AlgebraError::InvalidResult { audit });
            }
        }
        Ok(shape)
    });

    match &result {
        Ok(shape) => info!(result = %shape.shape_type(), area = shape.area(), "set operation complete"),
        Err(error) => warn!(
            %error,
            a = %a.to_json().unwrap_or_default(),
            b = %b.to_json().unwrap_or_default(),
            "set operation failed"
        ),
    }
    result
}

/// Dispatch on the operand variants.
pub(crate) fn combine(
    a: &Shape,
    b: &Shape,
    op: BoolOp,
    config: &AlgebraConfig,
) -> Result<Shape, AlgebraError> {
    match (a, b) {
        (Shape::Void, _) => Ok(match op {
            BoolOp::Union => b.clone(),
            BoolOp::Intersection | BoolOp::Difference => Shape::Void,
        }),
        (_, Shape::Void) => Ok(match op {
            BoolOp::Union | BoolOp::Difference => a.clone(),
            BoolOp::Intersection => Shape::Void,
        }),
        (Shape::Universe, _) => match op {
            BoolOp::Union => Ok(Shape::Universe),
            BoolOp::Intersection => Ok(b.clone()),
            BoolOp::Difference if b.is_universe() => Ok(Shape::Void),
            BoolOp::Difference => Err(AlgebraError::UnboundedResult),
        },
        (_, Shape::Universe) => Ok(match op {
            BoolOp::Union => Shape::Universe,
            BoolOp::Intersection => a.clone(),
            BoolOp::Difference => Shape::Void,
        }),
        (Shape::Simple(x), Shape::Simple(y)) => simple_op(x, y, op, config),
        _ => combine_compound(a, b, op, config),
    }
}

fn simple_op(
    a: &SimpleShape,
    b: &SimpleShape,
    op: BoolOp,
    config: &AlgebraConfig,
) -> Result<Shape, AlgebraError> {
    let tolerance = a.tolerance().min(b.tolerance());

    if !a.extent().outer_overlaps(&b.extent(), tolerance) {
        debug!(%op, "extents apart");
        return Ok(disjoint(a, b, op));
    }

    let contacts = a.boundary().contacts_with(b.boundary(), tolerance);
    if !contacts.crossings.is_empty() {
        debug!(%op, crossings = contacts.crossings.len(), touches = contacts.touches.len(), "boundaries cross");
        return walk(a, b, op, &contacts.all_points(), true, tolerance, config);
    }

    let a_shape = Shape::Simple(a.clone());
    let b_shape = Shape::Simple(b.clone());
    let b_in_a = spatial_position_of(&a_shape, &b_shape);
    let a_in_b = spatial_position_of(&b_shape, &a_shape);

    if !contacts.touches.is_empty() {
        if b_in_a == SpatialPosition::On && a_in_b == SpatialPosition::On {
            debug!(%op, "identical boundaries");
            return Ok(identical(a, op));
        }
        debug!(%op, touches = contacts.touches.len(), "boundaries touch");
        return walk(a, b, op, &contacts.all_points(), false, tolerance, config);
    }

    debug!(%op, ?b_in_a, ?a_in_b, "boundaries apart");
    match (b_in_a, a_in_b) {
        (SpatialPosition::In, _) => Ok(match op {
            BoolOp::Difference => {
                let mut holed = HoledShape::new(a.clone());
                holed.push_hole(b.clone());
                Shape::Holed(holed)
            }
            BoolOp::Intersection => Shape::Simple(b.clone()),
            BoolOp::Union => Shape::Simple(a.clone()),
        }),
        (SpatialPosition::Out, SpatialPosition::In) => Ok(match op {
            BoolOp::Difference => Shape::Void,
            BoolOp::Intersection => Shape::Simple(a.clone()),
            BoolOp::Union => Shape::Simple(b.clone()),
        }),
        (SpatialPosition::Out, SpatialPosition::Out) => Ok(disjoint(a, b, op)),
        (SpatialPosition::Out, position) | (position, _) => {
            Err(AlgebraError::InconsistentClassification { position })
        }
    }
}

fn walk(
    a: &SimpleShape,
    b: &SimpleShape,
    op: BoolOp,
    points: &[Point2d],
    crossing: bool,
    tolerance: f64,
    config: &AlgebraConfig,
) -> Result<Shape, AlgebraError> {
    let setup = op.walk_setup();
    let chains = precondition(a, b, setup.orientations, points, tolerance);
    let outcome = BoundaryWalker::new(
        &chains.self_chain,
        &chains.other_chain,
        setup.want_inside,
        tolerance,
    )
    .walk()?;

    if outcome.boundaries.is_empty() {
        if outcome.all_self_on {
            return Ok(identical(a, op));
        }
        return match op {
            BoolOp::Difference => Ok(Shape::Void),
            BoolOp::Intersection if !crossing => Ok(Shape::Void),
            _ => Err(AlgebraError::MissingBoundary { op }),
        };
    }

    Ok(assemble(outcome.boundaries, tolerance, config.simplify_results))
}

fn identical(a: &SimpleShape, op: BoolOp) -> Shape {
    match op {
        BoolOp::Difference => Shape::Void,
        BoolOp::Intersection | BoolOp::Union => Shape::Simple(a.clone()),
    }
}

fn disjoint(a: &SimpleShape, b: &SimpleShape, op: BoolOp) -> Shape {
    match op {
        BoolOp::Difference => Shape::Simple(a.clone()),
        BoolOp::Intersection => Shape::Void,
        BoolOp::Union => {
            Shape::from_parts(vec![Shape::Simple(a.clone()), Shape::Simple(b.clone())])
        }
    }
}
