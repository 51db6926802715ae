use super::types::{AuditError, ErrorCode, Severity, ShapeAudit};
use crate::boolean::classify::{position_of_boundary, SpatialPosition};
use crate::geometry::edge::Edge;
use crate::topology::boundary::{Boundary, Orientation};
use crate::topology::shape::{HoledShape, Shape, SimpleShape};
use crate::Tolerance;

fn finding(location: &str, code: ErrorCode, message: String, value: Option<f64>) -> AuditError {
    AuditError {
        location: location.to_string(),
        code,
        message,
        severity: Severity::Error,
        numeric_value: value,
    }
}

fn warning(location: &str, code: ErrorCode, message: String) -> AuditError {
    AuditError {
        location: location.to_string(),
        code,
        message,
        severity: Severity::Warning,
        numeric_value: None,
    }
}

/// Check one boundary on its own.
pub fn check_boundary(boundary: &Boundary, tolerance: f64, location: &str, audit: &mut ShapeAudit) {
    audit.counts.boundaries += 1;
    audit.counts.edges += boundary.edge_count();

    if boundary.edge_count() < 2 {
        audit.push(finding(
            location,
            ErrorCode::TooFewEdges,
            format!("boundary has {} edges", boundary.edge_count()),
            Some(boundary.edge_count() as f64),
        ));
        return;
    }

    let non_finite = boundary.edges().iter().any(|e| !edge_is_finite(e));
    if non_finite {
        audit.push(finding(
            location,
            ErrorCode::NonFiniteCoordinate,
            "boundary has a non-finite coordinate".into(),
            None,
        ));
        return;
    }

    if !boundary.is_closed(tolerance) {
        audit.push(finding(
            location,
            ErrorCode::WireNotClosed,
            "consecutive edges do not meet".into(),
            None,
        ));
    }

    for (i, edge) in boundary.edges().iter().enumerate() {
        if edge.is_degenerate(tolerance) {
            audit.push(finding(
                location,
                ErrorCode::ZeroLengthEdge,
                format!("{} {i} has zero length", edge.kind_name()),
                Some(edge.length()),
            ));
        }
    }

    let area = boundary.area();
    if Tolerance::with_coincidence(tolerance).is_zero_area(area) {
        audit.push(finding(
            location,
            ErrorCode::ZeroArea,
            "boundary encloses no area".into(),
            Some(area),
        ));
    }

    let vertices = boundary.vertices();
    for p in boundary.self_contact_points(tolerance) {
        if vertices.iter().any(|v| v.is_equal_to(&p, tolerance)) {
            audit.push(warning(
                location,
                ErrorCode::PinchedBoundary,
                format!("boundary passes twice through ({}, {})", p.x, p.y),
            ));
        } else {
            audit.push(finding(
                location,
                ErrorCode::SelfIntersection,
                format!("boundary crosses itself at ({}, {})", p.x, p.y),
                None,
            ));
        }
    }
}

fn edge_is_finite(edge: &Edge) -> bool {
    let mut points = vec![edge.start_point(), edge.end_point()];
    if let Edge::Arc(a) = edge {
        points.push(a.center);
    }
    points.iter().all(|p| p.x.is_finite() && p.y.is_finite())
}

pub fn check_simple(shape: &SimpleShape, location: &str, audit: &mut ShapeAudit) {
    check_boundary(shape.boundary(), shape.tolerance(), location, audit);
    if shape.boundary().orientation() != Orientation::CounterClockwise {
        audit.push(warning(
            location,
            ErrorCode::BadOrientation,
            "boundary is stored clockwise".into(),
        ));
    }
}

pub fn check_holed(shape: &HoledShape, location: &str, audit: &mut ShapeAudit) {
    let tolerance = shape.tolerance();
    check_simple(shape.outer(), &format!("{location}outer"), audit);
    audit.counts.holes += shape.holes().len();

    for (i, hole) in shape.holes().iter().enumerate() {
        let hole_location = format!("{location}hole {i}");
        check_simple(hole, &hole_location, audit);

        let position = position_of_boundary(shape.outer().boundary(), hole.boundary(), tolerance);
        if position != SpatialPosition::In {
            audit.push(finding(
                &hole_location,
                ErrorCode::HoleOutsideOuter,
                format!("hole is {position:?} relative to the outer boundary"),
                None,
            ));
        }

        for (j, other) in shape.holes().iter().enumerate().skip(i + 1) {
            if boundaries_overlap(hole.boundary(), other.boundary(), tolerance) {
                audit.push(finding(
                    &hole_location,
                    ErrorCode::HolesOverlap,
                    format!("hole {i} overlaps hole {j}"),
                    None,
                ));
            }
        }
    }
}

/// Interiors share some area, judged from both sides.
fn boundaries_overlap(a: &Boundary, b: &Boundary, tolerance: f64) -> bool {
    position_of_boundary(a, b, tolerance) != SpatialPosition::Out
        || position_of_boundary(b, a, tolerance) != SpatialPosition::Out
}

pub fn check_shape(shape: &Shape, location: &str, audit: &mut ShapeAudit) {
    match shape {
        Shape::Void | Shape::Universe => {}
        Shape::Simple(s) => {
            audit.counts.components += 1;
            check_simple(s, &format!("{location}boundary"), audit);
        }
        Shape::Holed(h) => {
            audit.counts.components += 1;
            check_holed(h, location, audit);
        }
        Shape::Complex(c) => {
            for (i, component) in c.components().iter().enumerate() {
                let component_location = format!("{location}component {i} / ");
                match component {
                    Shape::Simple(_) | Shape::Holed(_) => {
                        check_shape(component, &component_location, audit)
                    }
                    other => audit.push(finding(
                        &component_location,
                        ErrorCode::InvalidComponent,
                        format!("component is {}", other.shape_type()),
                        None,
                    )),
                }
            }
            check_components_disjoint(c.components(), location, audit);
        }
    }
}

fn check_components_disjoint(components: &[Shape], location: &str, audit: &mut ShapeAudit) {
    for (i, a) in components.iter().enumerate() {
        for (j, b) in components.iter().enumerate().skip(i + 1) {
            let tolerance = a.tolerance().min(b.tolerance());
            if !a.extent().inner_overlaps(&b.extent(), tolerance) {
                continue;
            }
            let (Some(outer_a), Some(outer_b)) = (outer_boundary(a), outer_boundary(b)) else {
                continue;
            };
            if !boundaries_overlap(outer_a, outer_b, tolerance) {
                continue;
            }
            // Overlapping outers are fine when one sits in a hole of the other.
            let nested_in_hole = a.spatial_position_of(b) == SpatialPosition::Out
                && b.spatial_position_of(a) == SpatialPosition::Out;
            if !nested_in_hole {
                audit.push(finding(
                    location,
                    ErrorCode::ComponentsOverlap,
                    format!("component {i} overlaps component {j}"),
                    None,
                ));
            }
        }
    }
}

fn outer_boundary(shape: &Shape) -> Option<&Boundary> {
    match shape {
        Shape::Simple(s) => Some(s.boundary()),
        Shape::Holed(h) => Some(h.outer().boundary()),
        _ => None,
    }
}
