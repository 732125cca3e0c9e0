//! Polygon construction helpers.

use crate::arena::{GeomArena, GeomId};
use crate::geometry::GeometryKind;

/// Builds a 2D polygon covering the given bounding box.
///
/// The single ring is closed and wound counter-clockwise:
/// (min,min) → (min,max) → (max,max) → (max,min) → (min,min).
pub fn init_from_bbox(arena: &mut GeomArena, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> GeomId {
    let result = arena.make(GeometryKind::Polygon, false, false);

    let ring = arena.make(GeometryKind::LineString, false, false);
    let run = arena.alloc_from(&[
        min_x, min_y, //
        min_x, max_y, //
        max_x, max_y, //
        max_x, min_y, //
        min_x, min_y,
    ]);
    arena.set_vertex_array(ring, run);
    arena.append_part(result, ring);

    result
}
