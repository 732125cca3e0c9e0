//! Iterative walks over geometry trees.
//!
//! All visitors drive an explicit `(node, child index)` stack over the child
//! vectors; none of them recurses. Empty multi-parts are never descended,
//! while empty leaves of the requested kind are still reported so that
//! callers decide how to treat them.

use crate::geometry::{Geom, GeometryKind};

/// Generic walk: `descends` selects the kinds whose children are entered,
/// `is_target` selects the kinds handed to the callback.
fn visit_filtered<'a>(
    geom: Geom<'a>,
    is_target: impl Fn(GeometryKind) -> bool,
    descends: impl Fn(GeometryKind) -> bool,
    mut f: impl FnMut(Geom<'a>),
) {
    let mut stack: Vec<(Geom<'a>, usize)> = Vec::new();
    let mut current = geom;

    loop {
        let kind = current.kind();
        if descends(kind) && !current.is_empty() {
            stack.push((current, 0));
        } else if is_target(kind) {
            f(current);
        }

        loop {
            match stack.last_mut() {
                None => return,
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

/// Invokes the callback on every POINT leaf, descending through MULTI_POINT
/// and GEOMETRY_COLLECTION.
pub fn visit_points<'a>(geom: Geom<'a>, f: impl FnMut(Geom<'a>)) {
    visit_filtered(
        geom,
        |k| k == GeometryKind::Point,
        |k| matches!(k, GeometryKind::MultiPoint | GeometryKind::GeometryCollection),
        f,
    );
}

/// Invokes the callback on every LINESTRING leaf, descending through
/// MULTI_LINESTRING and GEOMETRY_COLLECTION.
pub fn visit_lines<'a>(geom: Geom<'a>, f: impl FnMut(Geom<'a>)) {
    visit_filtered(
        geom,
        |k| k == GeometryKind::LineString,
        |k| matches!(k, GeometryKind::MultiLineString | GeometryKind::GeometryCollection),
        f,
    );
}

/// Invokes the callback on every POLYGON, descending through MULTI_POLYGON
/// and GEOMETRY_COLLECTION.
pub fn visit_polygons<'a>(geom: Geom<'a>, f: impl FnMut(Geom<'a>)) {
    visit_filtered(
        geom,
        |k| k == GeometryKind::Polygon,
        |k| matches!(k, GeometryKind::MultiPolygon | GeometryKind::GeometryCollection),
        f,
    );
}

/// Invokes the callback on every vertex-carrying leaf: POINT, LINESTRING and
/// polygon rings.
pub fn visit_vertex_arrays<'a>(geom: Geom<'a>, f: impl FnMut(Geom<'a>)) {
    visit_filtered(
        geom,
        |k| matches!(k, GeometryKind::Point | GeometryKind::LineString),
        |k| {
            matches!(
                k,
                GeometryKind::Polygon
                    | GeometryKind::MultiPoint
                    | GeometryKind::MultiLineString
                    | GeometryKind::MultiPolygon
                    | GeometryKind::GeometryCollection
            )
        },
        f,
    );
}

/// Invokes the callback on every non-collection geometry: POINT, LINESTRING
/// and POLYGON.
pub fn visit_leaf_geometries<'a>(geom: Geom<'a>, f: impl FnMut(Geom<'a>)) {
    visit_filtered(
        geom,
        |k| {
            matches!(
                k,
                GeometryKind::Point | GeometryKind::LineString | GeometryKind::Polygon
            )
        },
        |k| {
            matches!(
                k,
                GeometryKind::MultiPoint
                    | GeometryKind::MultiLineString
                    | GeometryKind::MultiPolygon
                    | GeometryKind::GeometryCollection
            )
        },
        f,
    );
}

/// Pre- and post-order callbacks over every node of the tree.
pub fn visit_all_parts<'a>(
    geom: Geom<'a>,
    mut enter: impl FnMut(Geom<'a>),
    mut leave: impl FnMut(Geom<'a>),
) {
    let mut stack: Vec<(Geom<'a>, usize)> = Vec::new();
    let mut current = geom;

    loop {
        enter(current);

        if current.is_multi_part() && !current.is_empty() {
            stack.push((current, 0));
        } else {
            leave(current);
        }

        loop {
            match stack.last_mut() {
                None => return,
                Some((parent, cursor)) => {
                    let parts = parent.part_ids();
                    if *cursor < parts.len() {
                        current = parent.arena().geom(parts[*cursor]);
                        *cursor += 1;
                        break;
                    }
                    let done = *parent;
                    stack.pop();
                    leave(done);
                }
            }
        }
    }
}
