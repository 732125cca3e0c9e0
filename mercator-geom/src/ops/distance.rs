use serde::{Deserialize, Serialize};

use crate::geometry::{Geom, GeometryKind};
use crate::vertex::VertexXy;
use crate::visit::visit_leaf_geometries;

/// Classification of a vertex against a ring.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointInRing {
    /// The ring is degenerate (fewer than three vertices).
    Invalid,
    /// The vertex lies strictly inside the ring.
    Interior,
    /// The vertex lies strictly outside the ring.
    Exterior,
    /// The vertex lies on the ring itself.
    Boundary,
}

/// Sign of the determinant of the triplet (p, q, r): 0 when collinear,
/// positive when clockwise, negative when counter-clockwise.
///
/// Naive double-precision arithmetic; not robust near collinearity.
pub(crate) fn orient2d(p: &VertexXy, q: &VertexXy, r: &VertexXy) -> i32 {
    let det_l = (p.x - r.x) * (q.y - r.y);
    let det_r = (p.y - r.y) * (q.x - r.x);
    let det = det_l - det_r;
    (det > 0.0) as i32 - (det < 0.0) as i32
}

/// Outcome of shooting a horizontal ray from a vertex through one segment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum RaycastHit {
    Miss,
    Cross,
    Boundary,
}

/// Horizontal ray-cast of `vert` against the segment (prev, next).
pub(crate) fn raycast(prev: &VertexXy, next: &VertexXy, vert: &VertexXy) -> RaycastHit {
    if prev.x < vert.x && next.x < vert.x {
        // The segment is entirely to the left of the point.
        return RaycastHit::Miss;
    }

    if next.x == vert.x && next.y == vert.y {
        // The point coincides with the segment end.
        return RaycastHit::Boundary;
    }

    if prev.y == vert.y && next.y == vert.y {
        // Horizontal segment on the ray: boundary when the point is within
        // its x-span, otherwise no contribution.
        let (min_x, max_x) = if prev.x > next.x {
            (next.x, prev.x)
        } else {
            (prev.x, next.x)
        };
        if vert.x >= min_x && vert.x <= max_x {
            return RaycastHit::Boundary;
        }
        return RaycastHit::Miss;
    }

    if (prev.y > vert.y && next.y <= vert.y) || (next.y > vert.y && prev.y <= vert.y) {
        let mut sign = orient2d(prev, next, vert);
        if sign == 0 {
            return RaycastHit::Boundary;
        }
        if next.y < prev.y {
            sign = -sign;
        }
        if sign > 0 {
            return RaycastHit::Cross;
        }
    }

    RaycastHit::Miss
}

/// Even-odd classification of a vertex against a LINESTRING ring.
///
/// Rings carrying a prepared index are classified through it.
pub fn vertex_in_ring(vert: &VertexXy, ring: &Geom) -> PointInRing {
    debug_assert!(ring.kind() == GeometryKind::LineString);

    if ring.vertex_count() < 3 {
        return PointInRing::Invalid;
    }

    if ring.is_prepared() {
        return crate::prepared::contains(ring, vert);
    }

    let count = ring.vertex_count();
    let mut crossings = 0_u32;
    let mut prev = ring.vertex_xy(0);
    for i in 1..count {
        let next = ring.vertex_xy(i);
        match raycast(&prev, &next, vert) {
            RaycastHit::Miss => {}
            RaycastHit::Cross => crossings += 1,
            RaycastHit::Boundary => return PointInRing::Boundary,
        }
        prev = next;
    }

    if crossings % 2 == 0 {
        PointInRing::Exterior
    } else {
        PointInRing::Interior
    }
}

/// Distance from a point to the segment (v, w); endpoint distance when the
/// projection falls outside the segment.
pub(crate) fn vertex_segment_distance(p: &VertexXy, v: &VertexXy, w: &VertexXy) -> f64 {
    let l2 = v.distance_sq(w);
    if l2 == 0.0 {
        return p.distance(v);
    }

    let t = ((p.x - v.x) * (w.x - v.x) + (p.y - v.y) * (w.y - v.y)) / l2;
    let t = t.clamp(0.0, 1.0);
    let closest = VertexXy::new(v.x + t * (w.x - v.x), v.y + t * (w.y - v.y));
    p.distance(&closest)
}

/// Distance between segments (a, b) and (c, d): 0 when they intersect, the
/// endpoint minimum otherwise. Parallel segments take the endpoint branch.
pub(crate) fn segment_segment_distance(
    a: &VertexXy,
    b: &VertexXy,
    c: &VertexXy,
    d: &VertexXy,
) -> f64 {
    if a.x == b.x && a.y == b.y {
        return vertex_segment_distance(a, c, d);
    }
    if c.x == d.x && c.y == d.y {
        return vertex_segment_distance(c, a, b);
    }

    let endpoint_min = |a: &VertexXy, b: &VertexXy, c: &VertexXy, d: &VertexXy| {
        vertex_segment_distance(a, c, d)
            .min(vertex_segment_distance(b, c, d))
            .min(vertex_segment_distance(c, a, b))
            .min(vertex_segment_distance(d, a, b))
    };

    let denominator = (b.x - a.x) * (d.y - c.y) - (b.y - a.y) * (d.x - c.x);
    if denominator == 0.0 {
        return endpoint_min(a, b, c, d);
    }

    let r = ((a.y - c.y) * (d.x - c.x) - (a.x - c.x) * (d.y - c.y)) / denominator;
    let s = ((a.y - c.y) * (b.x - a.x) - (a.x - c.x) * (b.y - a.y)) / denominator;

    if !(0.0..=1.0).contains(&r) || !(0.0..=1.0).contains(&s) {
        return endpoint_min(a, b, c, d);
    }

    0.0
}

/// Running minimum over the distance cases.
struct MinDistance {
    value: f64,
}

impl MinDistance {
    fn note(&mut self, distance: f64) {
        self.value = self.value.min(distance);
    }
}

fn distance_point_point(lhs: &Geom, rhs: &Geom, out: &mut MinDistance) -> bool {
    if lhs.is_empty() || rhs.is_empty() {
        return false;
    }
    out.note(lhs.vertex_xy(0).distance(&rhs.vertex_xy(0)));
    true
}

fn distance_point_lines(lhs: &Geom, rhs: &Geom, out: &mut MinDistance) -> bool {
    if lhs.is_empty() || rhs.is_empty() {
        return false;
    }

    let point = lhs.vertex_xy(0);
    let count = rhs.vertex_count();

    if count == 1 {
        out.note(point.distance(&rhs.vertex_xy(0)));
        return true;
    }

    if rhs.is_prepared() {
        if let Some(distance) = crate::prepared::distance_to_vertex(rhs, &point) {
            out.note(distance);
            return true;
        }
        return false;
    }

    let mut prev = rhs.vertex_xy(0);
    for i in 1..count {
        let next = rhs.vertex_xy(i);
        out.note(vertex_segment_distance(&point, &prev, &next));
        prev = next;
    }
    true
}

fn distance_point_polyg(lhs: &Geom, rhs: &Geom, out: &mut MinDistance) -> bool {
    if lhs.is_empty() || rhs.is_empty() {
        return false;
    }

    let point = lhs.vertex_xy(0);
    let shell = rhs.first_part().expect("non-empty polygon has a shell");

    match vertex_in_ring(&point, &shell) {
        PointInRing::Exterior => distance_point_lines(lhs, &shell, out),
        PointInRing::Interior => {
            // A point can sit in at most one hole when the polygon is valid,
            // so the first non-exterior hole decides.
            for hole in rhs.parts().skip(1) {
                if vertex_in_ring(&point, &hole) != PointInRing::Exterior {
                    return distance_point_lines(lhs, &hole, out);
                }
            }
            out.note(0.0);
            true
        }
        PointInRing::Boundary | PointInRing::Invalid => {
            out.note(0.0);
            true
        }
    }
}

fn distance_lines_lines(lhs: &Geom, rhs: &Geom, out: &mut MinDistance) -> bool {
    if lhs.is_empty() || rhs.is_empty() {
        return false;
    }

    if lhs.is_prepared() && rhs.is_prepared() {
        if let Some(distance) = crate::prepared::distance_between_lines(lhs, rhs) {
            out.note(distance);
            return true;
        }
        return false;
    }

    let lhs_count = lhs.vertex_count();
    let rhs_count = rhs.vertex_count();

    if lhs_count == 1 && rhs_count == 1 {
        out.note(lhs.vertex_xy(0).distance(&rhs.vertex_xy(0)));
        return true;
    }

    if lhs_count == 1 {
        let point = lhs.vertex_xy(0);
        let mut prev = rhs.vertex_xy(0);
        for i in 1..rhs_count {
            let next = rhs.vertex_xy(i);
            out.note(vertex_segment_distance(&point, &prev, &next));
            prev = next;
        }
        return true;
    }

    if rhs_count == 1 {
        let point = rhs.vertex_xy(0);
        let mut prev = lhs.vertex_xy(0);
        for i in 1..lhs_count {
            let next = lhs.vertex_xy(i);
            out.note(vertex_segment_distance(&point, &prev, &next));
            prev = next;
        }
        return true;
    }

    let mut lhs_prev = lhs.vertex_xy(0);
    for i in 1..lhs_count {
        let lhs_next = lhs.vertex_xy(i);
        let mut rhs_prev = rhs.vertex_xy(0);
        for j in 1..rhs_count {
            let rhs_next = rhs.vertex_xy(j);
            out.note(segment_segment_distance(&lhs_prev, &lhs_next, &rhs_prev, &rhs_next));
            rhs_prev = rhs_next;
        }
        lhs_prev = lhs_next;
    }
    true
}

fn distance_lines_polyg(lhs: &Geom, rhs: &Geom, out: &mut MinDistance) -> bool {
    if lhs.is_empty() || rhs.is_empty() {
        return false;
    }

    let lhs_vertex = lhs.vertex_xy(0);
    let shell = rhs.first_part().expect("non-empty polygon has a shell");

    if vertex_in_ring(&lhs_vertex, &shell) == PointInRing::Exterior {
        // The line starts outside; if any part of it were inside, the shell
        // distance is still 0 through the crossing.
        return distance_lines_lines(lhs, &shell, out);
    }

    for hole in rhs.parts().skip(1) {
        if !distance_lines_lines(lhs, &hole, out) {
            return false;
        }
    }

    for hole in rhs.parts().skip(1) {
        // Starting inside a hole, the distance to that hole ring is already
        // the answer whether the line stays inside or crosses its boundary.
        if vertex_in_ring(&lhs_vertex, &hole) != PointInRing::Exterior {
            return true;
        }
    }

    out.note(0.0);
    true
}

fn distance_polyg_polyg(lhs: &Geom, rhs: &Geom, out: &mut MinDistance) -> bool {
    if lhs.is_empty() || rhs.is_empty() {
        return false;
    }

    let lhs_shell = lhs.first_part().expect("non-empty polygon has a shell");
    let rhs_shell = rhs.first_part().expect("non-empty polygon has a shell");

    let lhs_vert = lhs_shell.vertex_xy(0);
    let rhs_vert = rhs_shell.vertex_xy(0);

    let lhs_loc = vertex_in_ring(&lhs_vert, &rhs_shell);
    let rhs_loc = vertex_in_ring(&rhs_vert, &lhs_shell);

    if lhs_loc == PointInRing::Exterior && rhs_loc == PointInRing::Exterior {
        return distance_lines_lines(&lhs_shell, &rhs_shell, out);
    }

    for lhs_ring in lhs.parts().skip(1) {
        if vertex_in_ring(&rhs_vert, &lhs_ring) != PointInRing::Exterior {
            return distance_lines_lines(&lhs_ring, &rhs_shell, out);
        }
    }

    for rhs_ring in rhs.parts().skip(1) {
        if vertex_in_ring(&lhs_vert, &rhs_ring) != PointInRing::Exterior {
            return distance_lines_lines(&lhs_shell, &rhs_ring, out);
        }
    }

    out.note(0.0);
    true
}

fn distance_dispatch(lhs: &Geom, rhs: &Geom, out: &mut MinDistance) -> bool {
    debug_assert!(!lhs.is_multi_geom() && !rhs.is_multi_geom());

    match (lhs.kind(), rhs.kind()) {
        (GeometryKind::Point, GeometryKind::Point) => distance_point_point(lhs, rhs, out),
        (GeometryKind::Point, GeometryKind::LineString) => distance_point_lines(lhs, rhs, out),
        (GeometryKind::Point, GeometryKind::Polygon) => distance_point_polyg(lhs, rhs, out),
        (GeometryKind::LineString, GeometryKind::Point) => distance_point_lines(rhs, lhs, out),
        (GeometryKind::LineString, GeometryKind::LineString) => distance_lines_lines(lhs, rhs, out),
        (GeometryKind::LineString, GeometryKind::Polygon) => distance_lines_polyg(lhs, rhs, out),
        (GeometryKind::Polygon, GeometryKind::Point) => distance_point_polyg(rhs, lhs, out),
        (GeometryKind::Polygon, GeometryKind::LineString) => distance_lines_polyg(rhs, lhs, out),
        (GeometryKind::Polygon, GeometryKind::Polygon) => distance_polyg_polyg(lhs, rhs, out),
        _ => false,
    }
}

/// Minimum euclidean distance between two geometries, over every
/// non-collection leaf pair. `None` when no pair admits an answer (an empty
/// or invalid operand).
pub fn get_euclidean_distance(lhs_geom: Geom, rhs_geom: Geom) -> Option<f64> {
    let mut out = MinDistance {
        value: f64::INFINITY,
    };
    let mut found = false;

    visit_leaf_geometries(lhs_geom, |lhs| {
        visit_leaf_geometries(rhs_geom, |rhs| {
            if distance_dispatch(&lhs, &rhs, &mut out) {
                found = true;
            }
        });
    });

    found.then_some(out.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{GeomArena, GeomId};

    fn leaf(arena: &mut GeomArena, kind: GeometryKind, coords: &[f64]) -> GeomId {
        let id = arena.make(kind, false, false);
        let run = arena.alloc_from(coords);
        arena.set_vertex_array(id, run);
        id
    }

    fn polygon(arena: &mut GeomArena, rings: &[&[f64]]) -> GeomId {
        let id = arena.make(GeometryKind::Polygon, false, false);
        for coords in rings {
            let ring = leaf(arena, GeometryKind::LineString, coords);
            arena.append_part(id, ring);
        }
        id
    }

    fn distance(arena: &GeomArena, a: GeomId, b: GeomId) -> Option<f64> {
        get_euclidean_distance(arena.geom(a), arena.geom(b))
    }

    #[test]
    fn point_to_point() {
        let mut arena = GeomArena::new();
        let a = leaf(&mut arena, GeometryKind::Point, &[1.0, 2.0]);
        let b = leaf(&mut arena, GeometryKind::Point, &[1.0, 2.0]);
        let c = leaf(&mut arena, GeometryKind::Point, &[1.0, 4.0]);
        assert_eq!(distance(&arena, a, b), Some(0.0));
        assert_eq!(distance(&arena, a, c), Some(2.0));
        assert_eq!(distance(&arena, c, a), Some(2.0));
    }

    #[test]
    fn point_to_line() {
        let mut arena = GeomArena::new();
        let p = leaf(&mut arena, GeometryKind::Point, &[1.0, 2.0]);

        let on = leaf(&mut arena, GeometryKind::LineString, &[1.0, 2.0, 1.0, 4.0]);
        assert_eq!(distance(&arena, p, on), Some(0.0));

        let off = leaf(&mut arena, GeometryKind::LineString, &[1.0, 6.0, 1.0, 8.0]);
        assert_eq!(distance(&arena, p, off), Some(4.0));
        assert_eq!(distance(&arena, off, p), Some(4.0));

        // Zero-length and single-vertex lines degrade to points.
        let collapsed = leaf(&mut arena, GeometryKind::LineString, &[1.0, 6.0, 1.0, 6.0]);
        assert_eq!(distance(&arena, p, collapsed), Some(4.0));
        let single = leaf(&mut arena, GeometryKind::LineString, &[1.0, 6.0]);
        assert_eq!(distance(&arena, p, single), Some(4.0));
        assert_eq!(distance(&arena, single, p), Some(4.0));
    }

    #[test]
    fn point_to_polygon() {
        let mut arena = GeomArena::new();
        let p = leaf(&mut arena, GeometryKind::Point, &[1.0, 2.0]);

        let outside = polygon(
            &mut arena,
            &[&[2.0, 2.0, 2.0, 4.0, 4.0, 4.0, 4.0, 2.0, 2.0, 2.0]],
        );
        assert_eq!(distance(&arena, p, outside), Some(1.0));

        let inside = polygon(
            &mut arena,
            &[&[0.0, 0.0, 0.0, 4.0, 4.0, 4.0, 4.0, 0.0, 0.0, 0.0]],
        );
        assert_eq!(distance(&arena, p, inside), Some(0.0));

        let border = polygon(
            &mut arena,
            &[&[1.0, 2.0, 1.0, 4.0, 4.0, 4.0, 4.0, 2.0, 1.0, 2.0]],
        );
        assert_eq!(distance(&arena, p, border), Some(0.0));

        // Degenerate shell classifies as invalid and collapses to contact.
        let degenerate = polygon(&mut arena, &[&[0.0, 0.0, 0.0, 0.0]]);
        assert_eq!(distance(&arena, p, degenerate), Some(0.0));
    }

    #[test]
    fn point_inside_hole() {
        let mut arena = GeomArena::new();
        let p = leaf(&mut arena, GeometryKind::Point, &[1.0, 1.0]);
        let donut = polygon(
            &mut arena,
            &[
                &[-1.0, -1.0, -1.0, 4.0, 4.0, 4.0, 4.0, -1.0, -1.0, -1.0],
                &[0.0, 0.0, 0.0, 3.0, 3.0, 3.0, 3.0, 0.0, 0.0, 0.0],
            ],
        );
        assert_eq!(distance(&arena, p, donut), Some(1.0));
        assert_eq!(distance(&arena, donut, p), Some(1.0));
    }

    #[test]
    fn line_to_line() {
        let mut arena = GeomArena::new();
        let a = leaf(
            &mut arena,
            GeometryKind::LineString,
            &[0.0, 0.0, 0.0, 2.0, 0.0, 4.0, 4.0, 4.0],
        );

        let crossing = leaf(
            &mut arena,
            GeometryKind::LineString,
            &[0.0, 2.0, 2.0, 2.0, 2.0, 4.0, 2.0, 6.0],
        );
        assert_eq!(distance(&arena, a, crossing), Some(0.0));

        let touching = leaf(&mut arena, GeometryKind::LineString, &[0.0, 3.0, 3.0, 3.0]);
        assert_eq!(distance(&arena, a, touching), Some(0.0));

        let apart = leaf(&mut arena, GeometryKind::LineString, &[3.0, 0.0, 3.0, 3.0]);
        assert_eq!(distance(&arena, a, apart), Some(1.0));

        let collapsed = leaf(&mut arena, GeometryKind::LineString, &[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(distance(&arena, a, collapsed), Some(0.0));
        assert_eq!(distance(&arena, collapsed, a), Some(0.0));
    }

    #[test]
    fn degenerate_line_pairs() {
        let mut arena = GeomArena::new();
        let a = leaf(&mut arena, GeometryKind::LineString, &[1.0, 1.0]);
        let b = leaf(&mut arena, GeometryKind::LineString, &[1.0, 3.0]);
        assert_eq!(distance(&arena, a, b), Some(2.0));

        let c = leaf(&mut arena, GeometryKind::LineString, &[1.0, 1.0, 1.0, 2.0]);
        assert_eq!(distance(&arena, c, b), Some(1.0));
        assert_eq!(distance(&arena, b, c), Some(1.0));
    }

    #[test]
    fn line_to_polygon() {
        let mut arena = GeomArena::new();
        let line = leaf(
            &mut arena,
            GeometryKind::LineString,
            &[0.0, 0.0, 2.0, 0.0, 4.0, 0.0],
        );

        let through = polygon(
            &mut arena,
            &[&[0.0, 0.0, 0.0, 4.0, 4.0, 4.0, 4.0, 0.0, 0.0, 0.0]],
        );
        assert_eq!(distance(&arena, line, through), Some(0.0));

        let holed = polygon(
            &mut arena,
            &[
                &[0.0, 0.0, 0.0, 4.0, 4.0, 4.0, 4.0, 0.0, 0.0, 0.0],
                &[1.0, 1.0, 1.0, 3.0, 3.0, 3.0, 3.0, 1.0, 1.0, 1.0],
            ],
        );
        assert_eq!(distance(&arena, line, holed), Some(0.0));

        let crossing = polygon(
            &mut arena,
            &[&[3.0, -1.0, 3.0, 4.0, 4.0, 4.0, 4.0, -1.0, 3.0, -1.0]],
        );
        assert_eq!(distance(&arena, line, crossing), Some(0.0));

        // Line entirely inside a big hole.
        let around = polygon(
            &mut arena,
            &[
                &[
                    -10.0, -10.0, -10.0, 10.0, 10.0, 10.0, 10.0, -10.0, -10.0, -10.0,
                ],
                &[-5.0, -5.0, -5.0, 5.0, 5.0, 5.0, 5.0, -5.0, -5.0, -5.0],
            ],
        );
        assert_eq!(distance(&arena, line, around), Some(1.0));
        assert_eq!(distance(&arena, around, line), Some(1.0));
    }

    #[test]
    fn polygon_to_polygon() {
        let mut arena = GeomArena::new();
        let small = polygon(
            &mut arena,
            &[&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0]],
        );

        let overlapping = polygon(
            &mut arena,
            &[&[0.0, 0.0, 0.0, 4.0, 4.0, 4.0, 4.0, 0.0, 0.0, 0.0]],
        );
        assert_eq!(distance(&arena, small, overlapping), Some(0.0));

        let apart = polygon(
            &mut arena,
            &[&[0.0, 3.0, 0.0, 4.0, 4.0, 4.0, 4.0, 3.0, 0.0, 3.0]],
        );
        assert_eq!(distance(&arena, small, apart), Some(2.0));

        // The small square sits inside the second hole of the big polygon.
        let donut = polygon(
            &mut arena,
            &[
                &[
                    -10.0, -10.0, -10.0, 10.0, 10.0, 10.0, 10.0, -10.0, -10.0, -10.0,
                ],
                &[6.0, 6.0, 6.0, 7.0, 7.0, 7.0, 7.0, 6.0, 6.0, 6.0],
                &[-5.0, -5.0, -5.0, 5.0, 5.0, 5.0, 5.0, -5.0, -5.0, -5.0],
            ],
        );
        assert_eq!(distance(&arena, small, donut), Some(4.0));
        assert_eq!(distance(&arena, donut, small), Some(4.0));
    }

    #[test]
    fn multi_geometries_take_the_minimum_pair() {
        let mut arena = GeomArena::new();
        let a = arena.make(GeometryKind::MultiPoint, false, false);
        for coords in [[5.0, 5.0], [10.0, 8.0]] {
            let p = leaf(&mut arena, GeometryKind::Point, &coords);
            arena.append_part(a, p);
        }
        let b = arena.make(GeometryKind::MultiPoint, false, false);
        for coords in [[8.0, 8.0], [15.0, 15.0]] {
            let p = leaf(&mut arena, GeometryKind::Point, &coords);
            arena.append_part(b, p);
        }
        assert_eq!(distance(&arena, a, b), Some(2.0));
    }

    #[test]
    fn empty_operands_have_no_distance() {
        let mut arena = GeomArena::new();
        let empty_point = arena.make(GeometryKind::Point, false, false);
        let empty_poly = arena.make(GeometryKind::Polygon, false, false);
        let empty_line = arena.make(GeometryKind::LineString, false, false);
        let invalid = arena.make(GeometryKind::Invalid, false, false);
        let point = leaf(&mut arena, GeometryKind::Point, &[1.0, 1.0]);

        assert_eq!(distance(&arena, empty_point, point), None);
        assert_eq!(distance(&arena, point, empty_point), None);
        assert_eq!(distance(&arena, empty_poly, empty_poly), None);
        assert_eq!(distance(&arena, empty_line, point), None);
        assert_eq!(distance(&arena, invalid, point), None);
        assert_eq!(distance(&arena, point, invalid), None);
    }

    #[test]
    fn ring_classification_trichotomy_survives_reversal() {
        let mut arena = GeomArena::new();
        let ring = leaf(
            &mut arena,
            GeometryKind::LineString,
            &[0.0, 0.0, 0.0, 4.0, 4.0, 4.0, 4.0, 0.0, 0.0, 0.0],
        );
        let reversed = leaf(
            &mut arena,
            GeometryKind::LineString,
            &[0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0, 0.0, 0.0],
        );

        let cases = [
            (VertexXy::new(2.0, 2.0), PointInRing::Interior),
            (VertexXy::new(5.0, 2.0), PointInRing::Exterior),
            (VertexXy::new(0.0, 2.0), PointInRing::Boundary),
            (VertexXy::new(4.0, 4.0), PointInRing::Boundary),
            (VertexXy::new(2.0, 0.0), PointInRing::Boundary),
        ];
        for (vert, expected) in cases {
            assert_eq!(vertex_in_ring(&vert, &arena.geom(ring)), expected);
            assert_eq!(vertex_in_ring(&vert, &arena.geom(reversed)), expected);
        }

        let degenerate = leaf(&mut arena, GeometryKind::LineString, &[0.0, 0.0, 1.0, 1.0]);
        assert_eq!(
            vertex_in_ring(&VertexXy::new(0.0, 0.0), &arena.geom(degenerate)),
            PointInRing::Invalid
        );
    }

    #[test]
    fn segment_distance_cases() {
        let a = VertexXy::new(0.0, 0.0);
        let b = VertexXy::new(4.0, 0.0);
        let c = VertexXy::new(2.0, -1.0);
        let d = VertexXy::new(2.0, 1.0);
        assert_eq!(segment_segment_distance(&a, &b, &c, &d), 0.0);

        let e = VertexXy::new(0.0, 3.0);
        let f = VertexXy::new(4.0, 3.0);
        assert_eq!(segment_segment_distance(&a, &b, &e, &f), 3.0);

        // Parallel overlapping x-spans.
        assert_eq!(segment_segment_distance(&e, &f, &a, &b), 3.0);
    }
}
