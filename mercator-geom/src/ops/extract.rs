use crate::arena::{GeomArena, GeomId};
use crate::geometry::GeometryKind;

fn select_points(arena: &GeomArena, _: &GeomId, id: GeomId) -> bool {
    matches!(
        arena.geom(id).kind(),
        GeometryKind::Point | GeometryKind::MultiPoint | GeometryKind::GeometryCollection
    )
}

fn handle_points(arena: &mut GeomArena, out: &mut GeomId, id: GeomId) {
    match arena.geom(id).kind() {
        GeometryKind::Point => arena.append_part(*out, id),
        GeometryKind::MultiPoint | GeometryKind::GeometryCollection => {
            arena.filter_parts(id, out, select_points, handle_points);
        }
        _ => debug_assert!(false, "selected a non-point part"),
    }
}

fn select_lines(arena: &GeomArena, _: &GeomId, id: GeomId) -> bool {
    matches!(
        arena.geom(id).kind(),
        GeometryKind::LineString | GeometryKind::MultiLineString | GeometryKind::GeometryCollection
    )
}

fn handle_lines(arena: &mut GeomArena, out: &mut GeomId, id: GeomId) {
    match arena.geom(id).kind() {
        GeometryKind::LineString => arena.append_part(*out, id),
        GeometryKind::MultiLineString | GeometryKind::GeometryCollection => {
            arena.filter_parts(id, out, select_lines, handle_lines);
        }
        _ => debug_assert!(false, "selected a non-linestring part"),
    }
}

fn select_polygons(arena: &GeomArena, _: &GeomId, id: GeomId) -> bool {
    matches!(
        arena.geom(id).kind(),
        GeometryKind::Polygon | GeometryKind::MultiPolygon | GeometryKind::GeometryCollection
    )
}

fn handle_polygons(arena: &mut GeomArena, out: &mut GeomId, id: GeomId) {
    match arena.geom(id).kind() {
        GeometryKind::Polygon => arena.append_part(*out, id),
        GeometryKind::MultiPolygon | GeometryKind::GeometryCollection => {
            arena.filter_parts(id, out, select_polygons, handle_polygons);
        }
        _ => debug_assert!(false, "selected a non-polygon part"),
    }
}

/// Splices every POINT out of the geometry's child lists into a new
/// MULTI_POINT, descending through nested containers. The source keeps its
/// remaining parts.
pub fn extract_points(arena: &mut GeomArena, id: GeomId) -> GeomId {
    let source = arena.geom(id);
    let result = arena.make(GeometryKind::MultiPoint, source.has_z(), source.has_m());
    let mut out = result;
    arena.filter_parts(id, &mut out, select_points, handle_points);
    result
}

/// Splices every LINESTRING into a new MULTI_LINESTRING.
pub fn extract_linestrings(arena: &mut GeomArena, id: GeomId) -> GeomId {
    let source = arena.geom(id);
    let result = arena.make(GeometryKind::MultiLineString, source.has_z(), source.has_m());
    let mut out = result;
    arena.filter_parts(id, &mut out, select_lines, handle_lines);
    result
}

/// Splices every POLYGON into a new MULTI_POLYGON.
pub fn extract_polygons(arena: &mut GeomArena, id: GeomId) -> GeomId {
    let source = arena.geom(id);
    let result = arena.make(GeometryKind::MultiPolygon, source.has_z(), source.has_m());
    let mut out = result;
    arena.filter_parts(id, &mut out, select_polygons, handle_polygons);
    result
}
