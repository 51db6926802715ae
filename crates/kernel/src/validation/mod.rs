pub mod types;
pub mod checks;

pub use types::*;

use tracing::{info, instrument};

use crate::topology::shape::Shape;

/// Audit a shape for structural soundness.
///
/// Checks every boundary (closure, degenerate edges, zero area,
/// self-crossing, orientation), every hole against its outer boundary and
/// its sibling holes, and every pair of complex components for overlap.
#[instrument(skip(shape), fields(shape = %shape.shape_type()))]
pub fn audit_shape(shape: &Shape) -> ShapeAudit {
    let mut audit = ShapeAudit::default();
    checks::check_shape(shape, "", &mut audit);

    info!(
        valid = audit.is_valid(),
        components = audit.counts.components,
        boundaries = audit.counts.boundaries,
        error_count = audit.errors.len(),
        warning_count = audit.warnings.len(),
        "shape audit complete"
    );
    audit
}
