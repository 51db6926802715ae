//! Shared types for shape audits.
//!
//! Defines error codes, severity levels, audit findings and the
//! `ShapeAudit` report.

use std::fmt;

/// Severity of an audit finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Must be fixed for a valid shape.
    Error,
    /// Informational; the shape is still usable.
    Warning,
}

/// Enumeration of all audit error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A boundary does not close (last end point != first start point).
    WireNotClosed,
    /// A boundary has fewer edges than can enclose an area.
    TooFewEdges,
    /// Edge has zero or near-zero length.
    ZeroLengthEdge,
    /// A coordinate is NaN or infinite.
    NonFiniteCoordinate,
    /// Boundary encloses zero or near-zero area.
    ZeroArea,
    /// Two edges of one boundary cross.
    SelfIntersection,
    /// A boundary passes twice through the same vertex.
    PinchedBoundary,
    /// Stored boundary is not counter-clockwise.
    BadOrientation,
    /// A hole is not strictly inside its outer boundary.
    HoleOutsideOuter,
    /// Two holes of one shape overlap.
    HolesOverlap,
    /// Two components of a complex shape overlap.
    ComponentsOverlap,
    /// A complex shape holds something other than simple or holed shapes.
    InvalidComponent,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single audit finding (error or warning).
#[derive(Debug, Clone)]
pub struct AuditError {
    /// Path of the offending part, e.g. `component 2 / hole 0`.
    pub location: String,
    /// The error code classifying this issue.
    pub code: ErrorCode,
    /// Human-readable description.
    pub message: String,
    pub severity: Severity,
    /// Measured numeric value (e.g. an edge length or an area).
    pub numeric_value: Option<f64>,
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sev = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
        };
        write!(f, "[{}] {}: {} (code: {})", sev, self.location, self.message, self.code)?;
        if let Some(val) = self.numeric_value {
            write!(f, " value={val:.2e}")?;
        }
        Ok(())
    }
}

/// Counts of the parts of an audited shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeCounts {
    pub components: usize,
    pub boundaries: usize,
    pub holes: usize,
    pub edges: usize,
}

/// The report produced by [`super::audit_shape`].
#[derive(Debug, Clone, Default)]
pub struct ShapeAudit {
    /// All errors (severity = Error).
    pub errors: Vec<AuditError>,
    /// All warnings (severity = Warning).
    pub warnings: Vec<AuditError>,
    pub counts: ShapeCounts,
}

impl ShapeAudit {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Filter errors by a specific error code.
    pub fn errors_of(&self, code: ErrorCode) -> Vec<&AuditError> {
        self.errors.iter().filter(|e| e.code == code).collect()
    }

    /// True if no error carries `code`.
    pub fn no_errors_of(&self, code: ErrorCode) -> bool {
        !self.errors.iter().any(|e| e.code == code)
    }

    pub(crate) fn push(&mut self, finding: AuditError) {
        match finding.severity {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
    }
}

impl fmt::Display for ShapeAudit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "shape audit: {} ({} errors, {} warnings)",
            if self.is_valid() { "VALID" } else { "INVALID" },
            self.errors.len(),
            self.warnings.len()
        )?;
        writeln!(
            f,
            "  components={} boundaries={} holes={} edges={}",
            self.counts.components, self.counts.boundaries, self.counts.holes, self.counts.edges
        )?;
        for e in self.errors.iter().chain(self.warnings.iter()) {
            writeln!(f, "  {e}")?;
        }
        Ok(())
    }
}
