use crate::extent::{ExtentXy, ExtentXyzm};
use crate::geometry::{Geom, GeometryKind};
use crate::visit::{visit_lines, visit_polygons, visit_vertex_arrays};

/// Length of a vertex chain, summing the 2D euclidean segment lengths.
///
/// Chains with fewer than two vertices have length 0.
pub(crate) fn ring_length(line: &Geom) -> f64 {
    let count = line.vertex_count();
    if count < 2 {
        return 0.0;
    }

    let mut length = 0.0;
    let mut prev = line.vertex_xy(0);
    for i in 1..count {
        let next = line.vertex_xy(i);
        length += (next - prev).norm_sq().sqrt();
        prev = next;
    }
    length
}

/// Shoelace sum over a ring, referenced to the first vertex and halved at the
/// end. Rings with fewer than three vertices have area 0.
pub(crate) fn signed_area(ring: &Geom) -> f64 {
    let count = ring.vertex_count();
    if count < 3 {
        return 0.0;
    }

    let x0 = ring.vertex_xy(0).x;
    let mut area = 0.0;
    for i in 1..count - 1 {
        let x1 = ring.vertex_xy(i).x;
        let y1 = ring.vertex_xy(i + 1).y;
        let y2 = ring.vertex_xy(i - 1).y;
        area += (x1 - x0) * (y2 - y1);
    }
    area * 0.5
}

/// Area of all polygonal parts: per polygon, the absolute shell area minus
/// the absolute area of every hole.
pub fn get_area(geom: Geom) -> f64 {
    let mut area = 0.0;
    visit_polygons(geom, |polygon| {
        let mut rings = polygon.parts();
        let Some(shell) = rings.next() else {
            return;
        };
        area += signed_area(&shell).abs();
        for hole in rings {
            area -= signed_area(&hole).abs();
        }
    });
    area
}

/// Summed 2D length of every LINESTRING part.
pub fn get_length(geom: Geom) -> f64 {
    let mut length = 0.0;
    visit_lines(geom, |line| length += ring_length(&line));
    length
}

/// Summed length of every polygon ring, shells and holes alike.
pub fn get_perimeter(geom: Geom) -> f64 {
    let mut perimeter = 0.0;
    visit_polygons(geom, |polygon| {
        for ring in polygon.parts() {
            perimeter += ring_length(&ring);
        }
    });
    perimeter
}

/// Total number of vertices over every leaf.
pub fn get_total_vertex_count(geom: Geom) -> u32 {
    let mut count = 0;
    visit_vertex_arrays(geom, |part| count += part.vertex_count());
    count
}

/// Folds every leaf vertex into `ext` and returns the number of vertices
/// folded. The caller seeds the extent, typically with
/// [`ExtentXy::smallest`].
pub fn get_total_extent_xy(geom: Geom, ext: &mut ExtentXy) -> u32 {
    let mut count = 0;
    visit_vertex_arrays(geom, |part| {
        let vertex_count = part.vertex_count();
        for i in 0..vertex_count {
            ext.expand(&part.vertex_xy(i));
        }
        count += vertex_count;
    });
    count
}

/// Folds every leaf vertex into `ext` over all four ordinates and returns the
/// number of vertices folded. Missing Z or M ordinates fold as 0.
pub fn get_total_extent_xyzm(geom: Geom, ext: &mut ExtentXyzm) -> u32 {
    let mut count = 0;
    visit_vertex_arrays(geom, |part| {
        let vertex_count = part.vertex_count();
        for i in 0..vertex_count {
            ext.expand(&part.vertex_xyzm(i));
        }
        count += vertex_count;
    });
    count
}

/// The highest surface dimension present in the geometry: 0 for points, 1 for
/// lines, 2 for polygons, −1 when nothing qualifies.
///
/// Empty parts are skipped only when `ignore_empty` is set. MULTI_* parts
/// classify directly; only collections are descended.
pub fn get_max_surface_dimension(geom: Geom, ignore_empty: bool) -> i32 {
    let mut max_dim = -1;
    let mut stack: Vec<(Geom, usize)> = Vec::new();
    let mut current = geom;

    loop {
        if !(current.is_empty() && ignore_empty) {
            match current.kind() {
                GeometryKind::Point | GeometryKind::MultiPoint => max_dim = max_dim.max(0),
                GeometryKind::LineString | GeometryKind::MultiLineString => {
                    max_dim = max_dim.max(1)
                }
                GeometryKind::Polygon | GeometryKind::MultiPolygon => max_dim = max_dim.max(2),
                GeometryKind::GeometryCollection => {
                    if !current.is_empty() {
                        stack.push((current, 0));
                    }
                }
                GeometryKind::Invalid => {}
            }
        }

        loop {
            match stack.last_mut() {
                None => return max_dim,
                Some((parent, cursor)) => {
                    let parts = parent.part_ids();
                    if *cursor < parts.len() {
                        current = parent.arena().geom(parts[*cursor]);
                        *cursor += 1;
                        break;
                    }
                    stack.pop();
                }
            }
        }
    }
}
