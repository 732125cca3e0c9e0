use crate::affine::AffineMatrix;
use crate::arena::{GeomArena, GeomId};
use crate::geometry::{Geom, GeometryKind};
use crate::vertex::{VertexType, VertexXy, VertexXyzm};
use crate::visit::{visit_all_parts, visit_vertex_arrays};

/// Read-only iteration over the XY ordinates of every leaf vertex.
pub fn visit_vertices_xy(geom: Geom, mut f: impl FnMut(&VertexXy)) {
    visit_vertex_arrays(geom, |part| {
        for i in 0..part.vertex_count() {
            f(&part.vertex_xy(i));
        }
    });
}

/// Read-only iteration over all four logical ordinates of every leaf vertex.
pub fn visit_vertices_xyzm(geom: Geom, mut f: impl FnMut(&VertexXyzm)) {
    visit_vertex_arrays(geom, |part| {
        for i in 0..part.vertex_count() {
            f(&part.vertex_xyzm(i));
        }
    });
}

fn collect_vertex_leaves(arena: &GeomArena, id: GeomId) -> Vec<GeomId> {
    let mut leaves = Vec::new();
    visit_vertex_arrays(arena.geom(id), |part| leaves.push(part.id()));
    leaves
}

/// Rewrites every leaf vertex through the callback.
///
/// The callback sees the logical four-ordinate vertex; the result is packed
/// into a freshly allocated array of the leaf's own width, so ordinates the
/// leaf does not carry are dropped again on write-back. The old arrays stay
/// in the arena, which keeps aliased sub-ranges elsewhere valid.
pub fn transform_vertices(arena: &mut GeomArena, id: GeomId, mut f: impl FnMut(&mut VertexXyzm)) {
    for leaf in collect_vertex_leaves(arena, id) {
        let geom = arena.geom(leaf);
        let count = geom.vertex_count();
        let vertex_type = geom.vertex_type();
        let width = geom.vertex_width();

        let mut vertices: Vec<VertexXyzm> = (0..count).map(|i| geom.vertex_xyzm(i)).collect();
        for vertex in &mut vertices {
            f(vertex);
        }

        let new_run = arena.alloc(count as usize * width);
        let out = arena.coords_mut(new_run);
        for (i, vertex) in vertices.iter().enumerate() {
            vertex.write_packed(&mut out[i * width..(i + 1) * width], vertex_type);
        }
        arena.set_vertex_array(leaf, new_run);
    }
}

/// Swaps the X and Y ordinate of every vertex.
pub fn flip_vertices(arena: &mut GeomArena, id: GeomId) {
    transform_vertices(arena, id, |vertex| {
        std::mem::swap(&mut vertex.x, &mut vertex.y);
    });
}

/// Applies an affine transformation to the XYZ ordinates of every vertex.
pub fn affine_transform(arena: &mut GeomArena, id: GeomId, matrix: &AffineMatrix) {
    transform_vertices(arena, id, |vertex| {
        *vertex = matrix.apply_xyz(vertex);
    });
}

/// Builds a MULTI_POINT whose POINT children alias one-vertex sub-ranges of
/// the source's vertex arrays.
pub fn collect_vertices(arena: &mut GeomArena, id: GeomId) -> GeomId {
    let source = arena.geom(id);
    let result = arena.make(GeometryKind::MultiPoint, source.has_z(), source.has_m());

    for leaf in collect_vertex_leaves(arena, id) {
        let geom = arena.geom(leaf);
        let count = geom.vertex_count();
        let width = geom.vertex_width();
        let run = geom.vertex_range();
        let has_z = geom.has_z();
        let has_m = geom.has_m();

        for i in 0..count as usize {
            let point = arena.make(GeometryKind::Point, has_z, has_m);
            arena.set_vertex_array(point, run.sub(i * width, width));
            arena.append_part(result, point);
        }
    }
    result
}

/// Re-packs every leaf vertex array to the requested dimensions and rewrites
/// the Z/M flags on every node of the tree.
///
/// Added ordinates fill with the defaults; dropped ordinates are truncated.
/// Applying the same call twice is equivalent to applying it once.
pub fn force_zm(
    arena: &mut GeomArena,
    id: GeomId,
    set_z: bool,
    set_m: bool,
    default_z: f64,
    default_m: f64,
) {
    let mut nodes = Vec::new();
    visit_all_parts(arena.geom(id), |part| nodes.push(part.id()), |_| {});

    let target_type = VertexType::from_flags(set_z, set_m);
    let width = target_type.width();

    for node in &nodes {
        let geom = arena.geom(*node);
        if geom.is_multi_part() || geom.is_empty() {
            continue;
        }
        debug_assert!(matches!(
            geom.kind(),
            GeometryKind::Point | GeometryKind::LineString | GeometryKind::Invalid
        ));

        let source_type = geom.vertex_type();
        if source_type == target_type {
            continue;
        }

        let count = geom.vertex_count();
        let source_has_z = geom.has_z();
        let source_has_m = geom.has_m();
        let mut vertices: Vec<VertexXyzm> = (0..count).map(|i| geom.vertex_xyzm(i)).collect();
        for vertex in &mut vertices {
            if !source_has_z {
                vertex.z = default_z;
            }
            if !source_has_m {
                vertex.m = default_m;
            }
        }

        arena.set_has_z(*node, set_z);
        arena.set_has_m(*node, set_m);

        let new_run = arena.alloc(count as usize * width);
        let out = arena.coords_mut(new_run);
        for (i, vertex) in vertices.iter().enumerate() {
            vertex.write_packed(&mut out[i * width..(i + 1) * width], target_type);
        }
        arena.set_vertex_array(*node, new_run);
    }

    for node in &nodes {
        arena.set_has_z(*node, set_z);
        arena.set_has_m(*node, set_m);
    }
}
