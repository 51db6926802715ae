pub mod point;
pub mod extent;
pub mod edge;
pub mod intersection;

pub use edge::{Arc2d, Edge, Segment2d};
pub use extent::Extent;
pub use point::{Point2d, Vec2d};
