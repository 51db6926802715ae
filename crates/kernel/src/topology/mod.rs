pub mod boundary;
pub mod shape;
pub mod primitives;

pub use boundary::{Boundary, BoundaryContacts, Orientation};
pub use shape::{ComplexShape, HoledShape, Shape, ShapeError, ShapeType, SimpleShape};
