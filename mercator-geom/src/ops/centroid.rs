use crate::geometry::Geom;
use crate::ops::measure::{get_max_surface_dimension, signed_area};
use crate::vertex::VertexXyzm;

/// Arithmetic mean of every point vertex, over all four ordinates.
pub fn get_centroid_from_points(geom: Geom) -> Option<VertexXyzm> {
    let mut sum = VertexXyzm::default();
    let mut count = 0_u32;

    crate::visit::visit_points(geom, |part| {
        if part.is_empty() {
            return;
        }
        sum = sum + part.vertex_xyzm(0);
        count += 1;
    });

    if count == 0 {
        return None;
    }
    Some(sum / count as f64)
}

/// Length-weighted midpoint sum over every line segment.
pub fn get_centroid_from_linestrings(geom: Geom) -> Option<VertexXyzm> {
    let mut sum = VertexXyzm::default();
    let mut total_length = 0.0;

    crate::visit::visit_lines(geom, |part| {
        if part.is_empty() {
            return;
        }
        let count = part.vertex_count();
        let mut prev = part.vertex_xyzm(0);
        for i in 1..count {
            let next = part.vertex_xyzm(i);
            let dx = next.x - prev.x;
            let dy = next.y - prev.y;
            let segment_length = (dx * dx + dy * dy).sqrt();

            sum = sum + (next + prev) * segment_length;
            total_length += segment_length;
            prev = next;
        }
    });

    if total_length == 0.0 {
        return None;
    }
    Some(sum / 2.0 / total_length)
}

/// Twice-signed-area-weighted fan-triangle centroid sum over every polygon.
///
/// Each ring is fanned from the first shell vertex; the sign flips when the
/// ring's winding disagrees with its role, so holes subtract from shells.
pub fn get_centroid_from_polygons(geom: Geom) -> Option<VertexXyzm> {
    let mut sum = VertexXyzm::default();
    let mut total_area2 = 0.0;

    crate::visit::visit_polygons(geom, |polygon| {
        let mut base = VertexXyzm::default();

        for (ring_index, ring) in polygon.parts().enumerate() {
            if ring.is_empty() {
                continue;
            }

            let is_shell = ring_index == 0;
            let is_clockwise = signed_area(&ring) >= 0.0;
            let sign = if is_shell != is_clockwise { -1.0 } else { 1.0 };

            if is_shell {
                base = ring.vertex_xyzm(0);
            }

            let count = ring.vertex_count();
            let mut prev = ring.vertex_xyzm(0);
            for i in 1..count {
                let next = ring.vertex_xyzm(i);

                let area2 =
                    (prev.x - base.x) * (next.y - base.y) - (next.x - base.x) * (prev.y - base.y);

                sum = sum + (base + prev + next) * (sign * area2);
                total_area2 += sign * area2;

                prev = next;
            }
        }
    });

    if total_area2 == 0.0 {
        return None;
    }
    Some(sum / 3.0 / total_area2)
}

/// The centroid of the geometry, computed with the algorithm for the highest
/// surface dimension present among non-empty parts.
pub fn get_centroid(geom: Geom) -> Option<VertexXyzm> {
    if geom.is_empty() {
        return None;
    }
    match get_max_surface_dimension(geom, true) {
        0 => get_centroid_from_points(geom),
        1 => get_centroid_from_linestrings(geom),
        2 => get_centroid_from_polygons(geom),
        _ => None,
    }
}
