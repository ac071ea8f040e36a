//! Geometry primitives for roisync.
//!
//! - [`Region`]: the canonical area/points/lines an object covers, with union
//! - [`ShapeGeometry`]: the closed set of remote shape kinds and their payloads
//! - [`Rgba`]: colours and their packed 32-bit wire form
//! - [`ImagePlane`]: channel / z / timepoint of a shape

mod color;
mod kinds;
mod plane;
mod region;

pub use color::Rgba;
pub use kinds::{
    EllipseShape, KindGeometry, LabelShape, LineShape, PointShape, PolygonShape, PolylineShape,
    RectangleShape, ShapeGeometry, ShapeKind, format_points, parse_points,
};
pub use plane::ImagePlane;
pub use region::{Bounds, ELLIPSE_SEGMENTS, Region, Vertex};

pub use geo::MultiPolygon;
