//! Simple-features geometry model and algorithms.
//!
//! The crate centers on an arena-backed geometry tree: every node and every
//! vertex ordinate of a query lives in one [`GeomArena`], trees are addressed
//! by [`GeomId`] handles and read through copyable [`Geom`] cursors, and
//! teardown is dropping the arena. On top of the model sit:
//!
//! * metric algorithms — length, area, perimeter, extents, centroids and
//!   euclidean distance over heterogeneous inputs ([`ops`]);
//! * linear referencing — interpolation, substrings and locating by measure
//!   ([`linestring`], [`ops::locate_along`], [`ops::locate_between`]);
//! * vertex transforms — affine maps, dimension coercion, part extraction
//!   ([`ops`]);
//! * prepared geometries — bounding-box hierarchies accelerating repeated
//!   containment and distance queries ([`prepared`]).
//!
//! Parsing of the well-known text and binary formats into this model lives in
//! the companion `mercator-wkio` crate.

pub mod affine;
pub mod arena;
pub mod extent;
pub mod geometry;
pub mod linestring;
pub mod math;
pub mod multi_linestring;
pub mod ops;
pub mod polygon;
pub mod prepared;
pub mod vertex;
pub mod visit;

pub use affine::AffineMatrix;
pub use arena::{CoordRange, GeomArena, GeomId};
pub use extent::{ExtentXy, ExtentXyzm};
pub use geometry::{Geom, GeometryKind};
pub use ops::PointInRing;
pub use vertex::{VertexType, VertexXy, VertexXyzm};
