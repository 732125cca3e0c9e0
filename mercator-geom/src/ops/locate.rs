use crate::arena::{GeomArena, GeomId};
use crate::geometry::GeometryKind;
use crate::linestring;
use crate::visit::visit_leaf_geometries;

fn collect_leaves(arena: &GeomArena, id: GeomId) -> Vec<GeomId> {
    let mut leaves = Vec::new();
    visit_leaf_geometries(arena.geom(id), |part| leaves.push(part.id()));
    leaves
}

fn emit_point_alias(arena: &mut GeomArena, part: GeomId, out: GeomId) {
    let geom = arena.geom(part);
    let (has_z, has_m) = (geom.has_z(), geom.has_m());
    let run = geom.vertex_range().sub(0, geom.vertex_width());
    let point = arena.make(GeometryKind::Point, has_z, has_m);
    arena.set_vertex_array(point, run);
    arena.append_part(out, point);
}

/// Collects the locations of the geometry at the given measure into `out`.
///
/// Points are emitted when their measure matches exactly; linestrings emit
/// interpolated points; polygons are located along their outer ring only.
/// Does nothing when the geometry carries no measures.
pub fn locate_along(arena: &mut GeomArena, id: GeomId, measure: f64, offset: f64, out: GeomId) {
    if !arena.geom(id).has_m() {
        return;
    }

    for part in collect_leaves(arena, id) {
        let geom = arena.geom(part);
        if geom.is_empty() {
            continue;
        }
        match geom.kind() {
            GeometryKind::Point => {
                if geom.vertex_xyzm(0).m == measure {
                    emit_point_alias(arena, part, out);
                }
            }
            GeometryKind::LineString => {
                linestring::locate_along(arena, part, measure, offset, out);
            }
            GeometryKind::Polygon => {
                let shell = arena.geom(part).first_part().expect("non-empty polygon").id();
                linestring::locate_along(arena, shell, measure, offset, out);
            }
            _ => debug_assert!(false, "leaf visitor produced a container"),
        }
    }
}

/// Collects the sections of the geometry whose measures fall inside
/// `[measure_lower, measure_upper]` into `out`.
pub fn locate_between(
    arena: &mut GeomArena,
    id: GeomId,
    measure_lower: f64,
    measure_upper: f64,
    offset: f64,
    out: GeomId,
) {
    if !arena.geom(id).has_m() {
        return;
    }

    for part in collect_leaves(arena, id) {
        let geom = arena.geom(part);
        if geom.is_empty() {
            continue;
        }
        match geom.kind() {
            GeometryKind::Point => {
                let m = geom.vertex_xyzm(0).m;
                if m >= measure_lower && m <= measure_upper {
                    emit_point_alias(arena, part, out);
                }
            }
            GeometryKind::LineString => {
                linestring::locate_between(arena, part, measure_lower, measure_upper, offset, out);
            }
            GeometryKind::Polygon => {
                let shell = arena.geom(part).first_part().expect("non-empty polygon").id();
                linestring::locate_between(arena, shell, measure_lower, measure_upper, offset, out);
            }
            _ => debug_assert!(false, "leaf visitor produced a container"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::VertexXyzm;

    fn line_m(arena: &mut GeomArena, coords: &[f64]) -> GeomId {
        let id = arena.make(GeometryKind::LineString, false, true);
        let run = arena.alloc_from(coords);
        arena.set_vertex_array(id, run);
        id
    }

    fn point_m(arena: &mut GeomArena, x: f64, y: f64, m: f64) -> GeomId {
        let id = arena.make(GeometryKind::Point, false, true);
        let run = arena.alloc_from(&[x, y, m]);
        arena.set_vertex_array(id, run);
        id
    }

    #[test]
    fn locate_along_collects_matching_points() {
        let mut arena = GeomArena::new();
        let root = arena.make(GeometryKind::GeometryCollection, false, true);
        let a = point_m(&mut arena, 1.0, 1.0, 5.0);
        let b = point_m(&mut arena, 2.0, 2.0, 7.0);
        arena.append_part(root, a);
        arena.append_part(root, b);

        let out = arena.make(GeometryKind::MultiPoint, false, true);
        locate_along(&mut arena, root, 5.0, 0.0, out);

        let geom = arena.geom(out);
        assert_eq!(geom.part_count(), 1);
        assert_eq!(
            geom.first_part().unwrap().vertex_xyzm(0),
            VertexXyzm::new(1.0, 1.0, 0.0, 5.0)
        );
    }

    #[test]
    fn locate_along_interpolates_linestrings() {
        let mut arena = GeomArena::new();
        let line = line_m(&mut arena, &[0.0, 0.0, 0.0, 4.0, 0.0, 10.0]);

        let out = arena.make(GeometryKind::MultiPoint, false, true);
        locate_along(&mut arena, line, 5.0, 0.0, out);

        let geom = arena.geom(out);
        assert_eq!(geom.part_count(), 1);
        assert_eq!(
            geom.first_part().unwrap().vertex_xyzm(0),
            VertexXyzm::new(2.0, 0.0, 0.0, 5.0)
        );
    }

    #[test]
    fn measureless_geometry_is_ignored() {
        let mut arena = GeomArena::new();
        let id = arena.make(GeometryKind::LineString, false, false);
        let run = arena.alloc_from(&[0.0, 0.0, 1.0, 1.0]);
        arena.set_vertex_array(id, run);

        let out = arena.make(GeometryKind::MultiPoint, false, false);
        locate_along(&mut arena, id, 0.5, 0.0, out);
        locate_between(&mut arena, id, 0.0, 1.0, 0.0, out);
        assert!(arena.geom(out).is_empty());
    }

    #[test]
    fn locate_between_collects_points_in_range() {
        let mut arena = GeomArena::new();
        let root = arena.make(GeometryKind::MultiPoint, false, true);
        for (i, m) in [1.0, 5.0, 9.0].iter().enumerate() {
            let p = point_m(&mut arena, i as f64, 0.0, *m);
            arena.append_part(root, p);
        }

        let out = arena.make(GeometryKind::MultiPoint, false, true);
        locate_between(&mut arena, root, 2.0, 6.0, 0.0, out);
        assert_eq!(arena.geom(out).part_count(), 1);
        assert_eq!(arena.geom(out).first_part().unwrap().vertex_xyzm(0).m, 5.0);
    }
}
