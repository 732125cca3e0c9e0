//! Linear referencing over single linestrings.
//!
//! The dispatching variants that walk whole trees live in [`crate::ops`];
//! everything here operates on one LINESTRING leaf.

use crate::arena::{GeomArena, GeomId};
use crate::geometry::{Geom, GeometryKind};
use crate::ops::ring_length;
use crate::vertex::VertexXyzm;

/// True when the first and last vertex agree in every ordinate the geometry
/// carries. Lines with fewer than two vertices are not closed.
pub fn is_closed(geom: Geom) -> bool {
    debug_assert!(geom.kind() == GeometryKind::LineString);

    let count = geom.vertex_count();
    if count < 2 {
        return false;
    }
    geom.vertex_xyzm(0) == geom.vertex_xyzm(count - 1)
}

fn lerp_at(prev: &VertexXyzm, next: &VertexXyzm, segment_length: f64, remaining: f64) -> VertexXyzm {
    let sfrac = if segment_length == 0.0 {
        0.0
    } else {
        remaining / segment_length
    };
    *prev + (*next - *prev) * sfrac
}

/// The location at fraction `frac` of the line's length, linearly
/// interpolated over all four ordinates. The fraction is clamped to [0, 1].
///
/// `None` when the geometry is not a linestring or is empty.
pub fn interpolate(geom: Geom, frac: f64) -> Option<VertexXyzm> {
    if geom.kind() != GeometryKind::LineString || geom.is_empty() {
        return None;
    }

    let count = geom.vertex_count();
    if count == 1 {
        return Some(geom.vertex_xyzm(0));
    }

    let frac = frac.clamp(0.0, 1.0);
    if frac == 0.0 {
        return Some(geom.vertex_xyzm(0));
    }
    if frac == 1.0 {
        return Some(geom.vertex_xyzm(count - 1));
    }

    let target_length = ring_length(&geom) * frac;

    let mut length = 0.0;
    let mut prev = geom.vertex_xyzm(0);
    for i in 1..count {
        let next = geom.vertex_xyzm(i);
        let dx = next.x - prev.x;
        let dy = next.y - prev.y;
        let segment_length = (dx * dx + dy * dy).sqrt();

        if length + segment_length >= target_length {
            return Some(lerp_at(&prev, &next, segment_length, target_length - length));
        }
        length += segment_length;
        prev = next;
    }

    None
}

/// Builds the geometry holding the locations at fractions `frac`, `2·frac`,
/// `3·frac`, … of the line's length.
///
/// The result is a MULTI_POINT in the general case. Degenerate inputs
/// produce a POINT: an empty or non-linestring source yields an empty point,
/// a single-vertex line or a fraction of exactly 0 or 1 yields a point
/// aliasing the matching source vertex.
pub fn interpolate_points(arena: &mut GeomArena, id: GeomId, frac: f64) -> GeomId {
    let geom = arena.geom(id);
    let (has_z, has_m) = (geom.has_z(), geom.has_m());
    let usable = geom.kind() == GeometryKind::LineString && !geom.is_empty();
    let result = arena.make(GeometryKind::Point, has_z, has_m);

    if !usable {
        return result;
    }

    let geom = arena.geom(id);
    let count = geom.vertex_count();
    let width = geom.vertex_width();
    let vertex_type = geom.vertex_type();
    let run = geom.vertex_range();

    if count == 1 {
        arena.set_vertex_array(result, run.sub(0, width));
        return result;
    }

    let frac = frac.clamp(0.0, 1.0);
    if frac == 0.0 {
        arena.set_vertex_array(result, run.sub(0, width));
        return result;
    }
    if frac == 1.0 {
        arena.set_vertex_array(result, run.sub((count as usize - 1) * width, width));
        return result;
    }

    arena.set_kind(result, GeometryKind::MultiPoint);

    let vertices: Vec<VertexXyzm> = (0..count).map(|i| arena.geom(id).vertex_xyzm(i)).collect();
    let actual_length = ring_length(&arena.geom(id));
    let mut total_length = 0.0;
    let mut next_target = frac * actual_length;

    for window in vertices.windows(2) {
        let (prev, next) = (window[0], window[1]);
        let dx = next.x - prev.x;
        let dy = next.y - prev.y;
        let segment_length = (dx * dx + dy * dy).sqrt();
        if segment_length == 0.0 {
            continue;
        }

        // Several targets can land on the same segment.
        while total_length + segment_length >= next_target {
            let point = lerp_at(&prev, &next, segment_length, next_target - total_length);

            let new_run = arena.alloc(width);
            point.write_packed(arena.coords_mut(new_run), vertex_type);
            let part = arena.make(GeometryKind::Point, has_z, has_m);
            arena.set_vertex_array(part, new_run);
            arena.append_part(result, part);

            next_target += frac * actual_length;
        }
        total_length += segment_length;
    }

    result
}

/// The interpolated measure of the line at the location closest to the
/// point. Ties between equally close segments go to the first segment
/// encountered.
///
/// `None` when either operand is not of the right kind or empty, when the
/// line carries no measures, or when it has fewer than two vertices.
pub fn interpolate_point(line: Geom, point: Geom) -> Option<f64> {
    if line.kind() != GeometryKind::LineString || point.kind() != GeometryKind::Point {
        return None;
    }
    if line.is_empty() || point.is_empty() {
        return None;
    }
    if !line.has_m() {
        return None;
    }

    let count = line.vertex_count();
    if count < 2 {
        return None;
    }

    let target = point.vertex_xy(0);

    let mut min_distance_sq = f64::MAX;
    let mut measure = 0.0;

    let mut prev = line.vertex_xyzm(0);
    for i in 1..count {
        let next = line.vertex_xyzm(i);
        let dx = next.x - prev.x;
        let dy = next.y - prev.y;

        let segment_length_sq = dx * dx + dy * dy;
        if segment_length_sq == 0.0 {
            prev = next;
            continue;
        }

        let t = ((target.x - prev.x) * dx + (target.y - prev.y) * dy) / segment_length_sq;
        let t = t.clamp(0.0, 1.0);

        let closest_x = prev.x + t * dx;
        let closest_y = prev.y + t * dy;
        let distance_sq =
            (closest_x - target.x) * (closest_x - target.x) + (closest_y - target.y) * (closest_y - target.y);

        if distance_sq < min_distance_sq {
            min_distance_sq = distance_sq;
            measure = prev.m + t * (next.m - prev.m);
        }

        prev = next;
    }

    Some(measure)
}

/// The arc-length position of the point's projection onto the line,
/// normalized into [0, 1].
pub fn line_locate_point(line: Geom, point: Geom) -> f64 {
    debug_assert!(line.kind() == GeometryKind::LineString);
    debug_assert!(point.kind() == GeometryKind::Point);
    debug_assert!(!line.is_empty() && !point.is_empty());

    let target = point.vertex_xy(0);
    let count = line.vertex_count();

    let mut length = 0.0;
    let mut closest_distance_sq = f64::MAX;
    let mut closest_length = 0.0;

    let mut prev = line.vertex_xy(0);
    for i in 1..count {
        let next = line.vertex_xy(i);

        let segment_length_sq = prev.distance_sq(&next);
        if segment_length_sq == 0.0 {
            let distance_sq = prev.distance_sq(&target);
            if distance_sq < closest_distance_sq {
                closest_distance_sq = distance_sq;
                closest_length = length;
            }
            prev = next;
            continue;
        }

        let t = ((target.x - prev.x) * (next.x - prev.x) + (target.y - prev.y) * (next.y - prev.y))
            / segment_length_sq;
        let t = t.clamp(0.0, 1.0);
        let closest_x = prev.x + t * (next.x - prev.x);
        let closest_y = prev.y + t * (next.y - prev.y);
        let distance_sq = (closest_x - target.x) * (closest_x - target.x)
            + (closest_y - target.y) * (closest_y - target.y);

        let segment_length = segment_length_sq.sqrt();
        if distance_sq < closest_distance_sq {
            closest_distance_sq = distance_sq;
            closest_length = length + t * segment_length;
        }

        length += segment_length;
        prev = next;
    }

    if closest_length == 0.0 || length == 0.0 {
        return 0.0;
    }
    closest_length / length
}

fn emit_point(
    arena: &mut GeomArena,
    out: GeomId,
    vertex: &VertexXyzm,
    has_z: bool,
    has_m: bool,
) {
    let vertex_type = crate::vertex::VertexType::from_flags(has_z, has_m);
    let run = arena.alloc(vertex_type.width());
    vertex.write_packed(arena.coords_mut(run), vertex_type);
    let point = arena.make(GeometryKind::Point, has_z, has_m);
    arena.set_vertex_array(point, run);
    arena.append_part(out, point);
}

fn offset_vertex(vertex: &VertexXyzm, dx: f64, dy: f64, segment_length: f64, offset: f64) -> VertexXyzm {
    if offset == 0.0 {
        return *vertex;
    }
    let mut out = *vertex;
    out.x += offset * dy / segment_length;
    out.y += -offset * dx / segment_length;
    out
}

/// Appends to `out` a POINT for every location of the line at the given
/// measure, perpendicular-offset by `offset`.
///
/// A segment contributes its start vertex when the measures match exactly,
/// an interpolated location when the measure falls strictly between its
/// endpoints, and the final vertex when the last segment ends on the
/// measure. Zero-length segments are skipped.
pub fn locate_along(arena: &mut GeomArena, id: GeomId, measure: f64, offset: f64, out: GeomId) {
    let geom = arena.geom(id);
    if geom.kind() != GeometryKind::LineString || geom.is_empty() || !geom.has_m() {
        return;
    }

    let count = geom.vertex_count();
    if count < 2 {
        return;
    }

    let (has_z, has_m) = (geom.has_z(), geom.has_m());
    let vertices: Vec<VertexXyzm> = (0..count).map(|i| geom.vertex_xyzm(i)).collect();

    for (i, window) in vertices.windows(2).enumerate() {
        let (prev, next) = (window[0], window[1]);
        let dx = next.x - prev.x;
        let dy = next.y - prev.y;

        let segment_length = (dx * dx + dy * dy).sqrt();
        if segment_length == 0.0 {
            continue;
        }

        if measure == prev.m {
            let point = offset_vertex(&prev, dx, dy, segment_length, offset);
            emit_point(arena, out, &point, has_z, has_m);
            continue;
        }

        if prev.m < measure && next.m > measure {
            let t = (measure - prev.m) / (next.m - prev.m);
            let mut point = VertexXyzm::new(
                prev.x + t * dx,
                prev.y + t * dy,
                prev.z + t * (next.z - prev.z),
                measure,
            );
            point = offset_vertex(&point, dx, dy, segment_length, offset);
            emit_point(arena, out, &point, has_z, has_m);
            continue;
        }

        if i + 2 == vertices.len() && next.m == measure {
            let point = offset_vertex(&next, dx, dy, segment_length, offset);
            emit_point(arena, out, &point, has_z, has_m);
        }
    }
}

/// Appends to `out` the sections of the line whose measures fall inside
/// `[measure_lower, measure_upper]`.
///
/// Range boundaries crossing a segment are interpolated; a collected section
/// of a single vertex is emitted as a POINT, longer sections as LINESTRINGs.
pub fn locate_between(
    arena: &mut GeomArena,
    id: GeomId,
    measure_lower: f64,
    measure_upper: f64,
    offset: f64,
    out: GeomId,
) {
    let geom = arena.geom(id);
    if geom.kind() != GeometryKind::LineString || geom.is_empty() || !geom.has_m() {
        return;
    }
    if measure_lower > measure_upper {
        return;
    }

    let count = geom.vertex_count();
    if count < 2 {
        return;
    }

    let (has_z, has_m) = (geom.has_z(), geom.has_m());
    let vertex_type = geom.vertex_type();
    let width = geom.vertex_width();
    let vertices: Vec<VertexXyzm> = (0..count).map(|i| geom.vertex_xyzm(i)).collect();

    let mut collected: Vec<VertexXyzm> = Vec::new();

    let flush = |arena: &mut GeomArena, collected: &mut Vec<VertexXyzm>| {
        let kind = if collected.len() == 1 {
            GeometryKind::Point
        } else {
            GeometryKind::LineString
        };
        let run = arena.alloc(collected.len() * width);
        let slice = arena.coords_mut(run);
        for (i, vertex) in collected.iter().enumerate() {
            vertex.write_packed(&mut slice[i * width..(i + 1) * width], vertex_type);
        }
        let part = arena.make(kind, has_z, has_m);
        arena.set_vertex_array(part, run);
        arena.append_part(out, part);
        collected.clear();
    };

    for (i, window) in vertices.windows(2).enumerate() {
        let (prev, next) = (window[0], window[1]);
        let dx = next.x - prev.x;
        let dy = next.y - prev.y;

        let segment_length = (dx * dx + dy * dy).sqrt();
        if segment_length == 0.0 {
            continue;
        }

        if prev.m < measure_lower && next.m > measure_lower {
            // The segment enters the range: start a new section at the
            // interpolated lower bound.
            let t = (measure_lower - prev.m) / (next.m - prev.m);
            let point = VertexXyzm::new(
                prev.x + t * dx,
                prev.y + t * dy,
                prev.z + t * (next.z - prev.z),
                measure_lower,
            );
            collected.push(offset_vertex(&point, dx, dy, segment_length, offset));
        }

        if prev.m >= measure_lower && prev.m <= measure_upper {
            collected.push(offset_vertex(&prev, dx, dy, segment_length, offset));
        }

        if prev.m < measure_upper && next.m > measure_upper {
            // The segment leaves the range: close the section at the
            // interpolated upper bound.
            let t = (measure_upper - prev.m) / (next.m - prev.m);
            let point = VertexXyzm::new(
                prev.x + t * dx,
                prev.y + t * dy,
                prev.z + t * (next.z - prev.z),
                measure_upper,
            );
            collected.push(offset_vertex(&point, dx, dy, segment_length, offset));
            flush(arena, &mut collected);
        } else if i + 2 == vertices.len() && next.m >= measure_lower && next.m <= measure_upper {
            collected.push(offset_vertex(&next, dx, dy, segment_length, offset));
        }
    }

    if !collected.is_empty() {
        flush(arena, &mut collected);
    }
}

/// Builds the section of the line between the two length fractions.
///
/// Both fractions are clamped to [0, 1]. Equal fractions produce a POINT at
/// that location; an inverted range produces an empty LINESTRING; the full
/// range aliases the source's vertex array. Otherwise the result is a new
/// LINESTRING with interpolated end vertices and the intermediate source
/// vertices preserved.
pub fn substring(arena: &mut GeomArena, id: GeomId, beg_frac: f64, end_frac: f64) -> GeomId {
    let geom = arena.geom(id);
    let (has_z, has_m) = (geom.has_z(), geom.has_m());
    let is_linestring = geom.kind() == GeometryKind::LineString;
    let result = arena.make(GeometryKind::LineString, has_z, has_m);

    if !is_linestring {
        return result;
    }
    let geom = arena.geom(id);
    if geom.is_empty() {
        if beg_frac == end_frac {
            arena.set_kind(result, GeometryKind::Point);
        }
        return result;
    }
    if beg_frac > end_frac {
        return result;
    }

    let beg_frac = beg_frac.clamp(0.0, 1.0);
    let end_frac = end_frac.clamp(0.0, 1.0);

    let count = geom.vertex_count();
    let width = geom.vertex_width();
    let vertex_type = geom.vertex_type();
    let run = geom.vertex_range();

    if beg_frac == 0.0 && end_frac == 1.0 {
        arena.set_vertex_array(result, run);
        return result;
    }

    if beg_frac == end_frac {
        arena.set_kind(result, GeometryKind::Point);
        if let Some(point) = interpolate(arena.geom(id), beg_frac) {
            let new_run = arena.alloc(width);
            point.write_packed(arena.coords_mut(new_run), vertex_type);
            arena.set_vertex_array(result, new_run);
        }
        return result;
    }

    if count == 1 {
        arena.set_vertex_array(result, run);
        return result;
    }

    let vertices: Vec<VertexXyzm> = (0..count).map(|i| arena.geom(id).vertex_xyzm(i)).collect();
    let total_length = ring_length(&arena.geom(id));
    let beg_length = total_length * beg_frac;
    let end_length = total_length * end_frac;

    let count = count as usize;
    let mut length = 0.0;
    let mut index = 1;
    let mut prev = vertices[0];

    let mut beg = VertexXyzm::default();
    let mut beg_idx = 0;
    while index < count {
        let next = vertices[index];
        let dx = next.x - prev.x;
        let dy = next.y - prev.y;
        let segment_length = (dx * dx + dy * dy).sqrt();

        if length + segment_length >= beg_length {
            beg = lerp_at(&prev, &next, segment_length, beg_length - length);
            beg_idx = index - 1;
            break;
        }
        length += segment_length;
        prev = next;
        index += 1;
    }

    let mut end = vertices[count - 1];
    let mut end_idx = count - 2;
    while index < count {
        let next = vertices[index];
        let dx = next.x - prev.x;
        let dy = next.y - prev.y;
        let segment_length = (dx * dx + dy * dy).sqrt();

        if length + segment_length >= end_length {
            end = lerp_at(&prev, &next, segment_length, end_length - length);
            end_idx = index - 1;
            break;
        }
        length += segment_length;
        prev = next;
        index += 1;
    }

    let new_count = end_idx - beg_idx + 2;
    let new_run = arena.alloc(new_count * width);
    let slice = arena.coords_mut(new_run);
    beg.write_packed(&mut slice[..width], vertex_type);
    for (slot, vertex) in vertices[beg_idx + 1..=end_idx].iter().enumerate() {
        vertex.write_packed(&mut slice[(slot + 1) * width..(slot + 2) * width], vertex_type);
    }
    end.write_packed(&mut slice[(new_count - 1) * width..], vertex_type);
    arena.set_vertex_array(result, new_run);

    result
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::ops::get_length;

    fn line(arena: &mut GeomArena, coords: &[f64], has_z: bool, has_m: bool) -> GeomId {
        let id = arena.make(GeometryKind::LineString, has_z, has_m);
        let run = arena.alloc_from(coords);
        arena.set_vertex_array(id, run);
        id
    }

    fn point(arena: &mut GeomArena, x: f64, y: f64) -> GeomId {
        let id = arena.make(GeometryKind::Point, false, false);
        let run = arena.alloc_from(&[x, y]);
        arena.set_vertex_array(id, run);
        id
    }

    #[test]
    fn closed_detection() {
        let mut arena = GeomArena::new();
        let closed = line(
            &mut arena,
            &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0],
            false,
            false,
        );
        assert!(is_closed(arena.geom(closed)));

        let open = line(&mut arena, &[0.0, 0.0, 1.0, 0.0], false, false);
        assert!(!is_closed(arena.geom(open)));

        let single = line(&mut arena, &[0.0, 0.0], false, false);
        assert!(!is_closed(arena.geom(single)));

        // Matching XY but diverging M keeps the line open.
        let measured = line(&mut arena, &[0.0, 0.0, 1.0, 1.0, 0.0, 2.0, 0.0, 0.0, 9.0], false, true);
        assert!(!is_closed(arena.geom(measured)));
    }

    #[test]
    fn interpolate_midpoint() {
        let mut arena = GeomArena::new();
        let id = line(&mut arena, &[0.0, 0.0, 0.0, 4.0, 4.0, 4.0], false, false);

        let mid = interpolate(arena.geom(id), 0.5).unwrap();
        assert_eq!(mid.xy(), crate::vertex::VertexXy::new(0.0, 4.0));

        assert_eq!(
            interpolate(arena.geom(id), 0.0).unwrap().xy(),
            crate::vertex::VertexXy::new(0.0, 0.0)
        );
        assert_eq!(
            interpolate(arena.geom(id), 1.0).unwrap().xy(),
            crate::vertex::VertexXy::new(4.0, 4.0)
        );
        // Out-of-range fractions clamp.
        assert_eq!(
            interpolate(arena.geom(id), 7.0).unwrap().xy(),
            crate::vertex::VertexXy::new(4.0, 4.0)
        );

        let empty = arena.make(GeometryKind::LineString, false, false);
        assert!(interpolate(arena.geom(empty), 0.5).is_none());
    }

    #[test]
    fn interpolate_carries_z_and_m() {
        let mut arena = GeomArena::new();
        let id = line(
            &mut arena,
            &[0.0, 0.0, 0.0, 10.0, 4.0, 0.0, 8.0, 30.0],
            true,
            true,
        );
        let mid = interpolate(arena.geom(id), 0.5).unwrap();
        assert_eq!(mid, VertexXyzm::new(2.0, 0.0, 4.0, 20.0));
    }

    #[test]
    fn interpolate_points_emits_every_step() {
        let mut arena = GeomArena::new();
        let id = line(&mut arena, &[0.0, 0.0, 4.0, 0.0], false, false);

        let result = interpolate_points(&mut arena, id, 0.25);
        let geom = arena.geom(result);
        assert_eq!(geom.kind(), GeometryKind::MultiPoint);
        assert_eq!(geom.part_count(), 4);
        let xs: Vec<f64> = geom.parts().map(|p| p.vertex_xy(0).x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn interpolate_points_degenerate_cases() {
        let mut arena = GeomArena::new();

        let empty = arena.make(GeometryKind::LineString, false, false);
        let result = interpolate_points(&mut arena, empty, 0.5);
        assert_eq!(arena.geom(result).kind(), GeometryKind::Point);
        assert!(arena.geom(result).is_empty());

        let single = line(&mut arena, &[3.0, 4.0], false, false);
        let result = interpolate_points(&mut arena, single, 0.5);
        assert_eq!(arena.geom(result).kind(), GeometryKind::Point);
        assert_eq!(arena.geom(result).vertex_xy(0).x, 3.0);

        let id = line(&mut arena, &[0.0, 0.0, 4.0, 0.0], false, false);
        let result = interpolate_points(&mut arena, id, 0.0);
        assert_eq!(arena.geom(result).kind(), GeometryKind::Point);
        assert_eq!(arena.geom(result).vertex_xy(0).x, 0.0);

        let result = interpolate_points(&mut arena, id, 1.0);
        assert_eq!(arena.geom(result).kind(), GeometryKind::Point);
        assert_eq!(arena.geom(result).vertex_xy(0).x, 4.0);
    }

    #[test]
    fn interpolate_point_returns_closest_measure() {
        let mut arena = GeomArena::new();
        let id = line(&mut arena, &[0.0, 0.0, 0.0, 4.0, 0.0, 10.0], false, true);

        let probe = point(&mut arena, 1.0, 0.0);
        assert_eq!(interpolate_point(arena.geom(id), arena.geom(probe)), Some(2.5));

        let at_end = point(&mut arena, 9.0, 0.0);
        assert_eq!(interpolate_point(arena.geom(id), arena.geom(at_end)), Some(10.0));

        // Without measures there is nothing to interpolate.
        let plain = line(&mut arena, &[0.0, 0.0, 4.0, 0.0], false, false);
        assert!(interpolate_point(arena.geom(plain), arena.geom(probe)).is_none());
    }

    #[test]
    fn line_locate_point_normalizes() {
        let mut arena = GeomArena::new();
        let id = line(&mut arena, &[0.0, 0.0, 4.0, 0.0], false, false);

        let quarter = point(&mut arena, 1.0, 3.0);
        assert_abs_diff_eq!(line_locate_point(arena.geom(id), arena.geom(quarter)), 0.25);

        let before = point(&mut arena, -5.0, 0.0);
        assert_eq!(line_locate_point(arena.geom(id), arena.geom(before)), 0.0);

        let past = point(&mut arena, 9.0, 1.0);
        assert_eq!(line_locate_point(arena.geom(id), arena.geom(past)), 1.0);
    }

    #[test]
    fn locate_along_hits_vertices_and_interpolates() {
        let mut arena = GeomArena::new();
        let id = line(&mut arena, &[0.0, 0.0, 0.0, 2.0, 0.0, 10.0, 4.0, 0.0, 20.0], false, true);

        let out = arena.make(GeometryKind::MultiPoint, false, true);
        locate_along(&mut arena, id, 15.0, 0.0, out);
        let geom = arena.geom(out);
        assert_eq!(geom.part_count(), 1);
        assert_eq!(
            geom.first_part().unwrap().vertex_xyzm(0),
            VertexXyzm::new(3.0, 0.0, 0.0, 15.0)
        );

        let out = arena.make(GeometryKind::MultiPoint, false, true);
        locate_along(&mut arena, id, 20.0, 0.0, out);
        assert_eq!(arena.geom(out).part_count(), 1);
        assert_eq!(arena.geom(out).first_part().unwrap().vertex_xy(0).x, 4.0);
    }

    #[test]
    fn locate_along_applies_perpendicular_offset() {
        let mut arena = GeomArena::new();
        let id = line(&mut arena, &[0.0, 0.0, 0.0, 4.0, 0.0, 10.0], false, true);

        let out = arena.make(GeometryKind::MultiPoint, false, true);
        locate_along(&mut arena, id, 5.0, 1.0, out);
        // The segment runs +x, so a positive offset shifts toward -y.
        assert_eq!(
            arena.geom(out).first_part().unwrap().vertex_xyzm(0),
            VertexXyzm::new(2.0, -1.0, 0.0, 5.0)
        );
    }

    #[test]
    fn locate_between_cuts_range() {
        let mut arena = GeomArena::new();
        let id = line(
            &mut arena,
            &[0.0, 0.0, 0.0, 4.0, 0.0, 40.0, 8.0, 0.0, 80.0],
            false,
            true,
        );

        let out = arena.make(GeometryKind::GeometryCollection, false, true);
        locate_between(&mut arena, id, 10.0, 60.0, 0.0, out);

        let geom = arena.geom(out);
        assert_eq!(geom.part_count(), 1);
        let section = geom.first_part().unwrap();
        assert_eq!(section.kind(), GeometryKind::LineString);
        assert_eq!(section.vertex_count(), 3);
        assert_eq!(section.vertex_xyzm(0), VertexXyzm::new(1.0, 0.0, 0.0, 10.0));
        assert_eq!(section.vertex_xyzm(1), VertexXyzm::new(4.0, 0.0, 0.0, 40.0));
        assert_eq!(section.vertex_xyzm(2), VertexXyzm::new(6.0, 0.0, 0.0, 60.0));
    }

    #[test]
    fn locate_between_emits_single_vertex_as_point() {
        let mut arena = GeomArena::new();
        let id = line(&mut arena, &[0.0, 0.0, 0.0, 4.0, 0.0, 40.0], false, true);

        let out = arena.make(GeometryKind::GeometryCollection, false, true);
        locate_between(&mut arena, id, 40.0, 50.0, 0.0, out);

        let geom = arena.geom(out);
        assert_eq!(geom.part_count(), 1);
        assert_eq!(geom.first_part().unwrap().kind(), GeometryKind::Point);
        assert_eq!(geom.first_part().unwrap().vertex_xyzm(0).m, 40.0);
    }

    #[test]
    fn substring_cuts_and_preserves_interior_vertices() {
        let mut arena = GeomArena::new();
        let id = line(&mut arena, &[0.0, 0.0, 4.0, 0.0, 4.0, 4.0], false, false);

        let result = substring(&mut arena, id, 0.25, 0.75);
        let geom = arena.geom(result);
        assert_eq!(geom.kind(), GeometryKind::LineString);
        assert_eq!(geom.vertex_count(), 3);
        assert_eq!(geom.vertex_xy(0).x, 2.0);
        assert_eq!(geom.vertex_xy(1).x, 4.0);
        assert_eq!(geom.vertex_xy(2).y, 2.0);

        assert_abs_diff_eq!(get_length(arena.geom(result)), 4.0);
    }

    #[test]
    fn substring_length_is_proportional() {
        let mut arena = GeomArena::new();
        let id = line(
            &mut arena,
            &[0.0, 0.0, 1.0, 2.0, 3.0, 1.0, 5.0, 5.0, 6.0, 5.0],
            false,
            false,
        );
        let total = get_length(arena.geom(id));

        for (a, b) in [(0.0, 1.0), (0.1, 0.6), (0.5, 0.5), (0.3, 0.9)] {
            let result = substring(&mut arena, id, a, b);
            assert_abs_diff_eq!(
                get_length(arena.geom(result)),
                (b - a) * total,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn substring_degenerate_cases() {
        let mut arena = GeomArena::new();
        let id = line(&mut arena, &[0.0, 0.0, 4.0, 0.0], false, false);

        // Whole range aliases the source array.
        let whole = substring(&mut arena, id, 0.0, 1.0);
        assert_eq!(arena.geom(whole).vertex_range(), arena.geom(id).vertex_range());

        // Equal fractions produce a point.
        let mid = substring(&mut arena, id, 0.5, 0.5);
        assert_eq!(arena.geom(mid).kind(), GeometryKind::Point);
        assert_eq!(arena.geom(mid).vertex_xy(0).x, 2.0);

        // Inverted range produces an empty line.
        let inverted = substring(&mut arena, id, 0.8, 0.2);
        assert_eq!(arena.geom(inverted).kind(), GeometryKind::LineString);
        assert!(arena.geom(inverted).is_empty());

        // An empty source with equal fractions degrades to an empty point.
        let empty = arena.make(GeometryKind::LineString, false, false);
        let result = substring(&mut arena, empty, 0.5, 0.5);
        assert_eq!(arena.geom(result).kind(), GeometryKind::Point);
        assert!(arena.geom(result).is_empty());
    }
}
