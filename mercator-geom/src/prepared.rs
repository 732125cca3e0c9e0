//! Hierarchical bounding-box indexes for repeated queries against the same
//! geometry.
//!
//! Preparing a geometry walks its tree and attaches an index to every
//! non-empty LINESTRING leaf (polygon rings included). The index is a list of
//! levels from root to leaves; each box covers a block of up to [`NODE_SIZE`]
//! boxes below it, and leaf boxes cover one extra vertex so that no segment
//! falls between adjacent blocks. Consumers holding a [`Geom`] pick the
//! accelerated paths up automatically through the prepared flag.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::arena::{GeomArena, GeomId};
use crate::extent::ExtentXy;
use crate::geometry::{Geom, GeometryKind};
use crate::ops::{orient2d, raycast, vertex_segment_distance, PointInRing, RaycastHit};
use crate::vertex::VertexXy;

/// Branching factor of the index.
pub const NODE_SIZE: u32 = 32;

/// Upper bound on the number of levels; 32^8 exceeds any u32 vertex count.
pub const MAX_DEPTH: usize = 8;

/// The bounding-box hierarchy attached to one linestring leaf.
#[derive(Debug)]
pub struct PreparedIndex {
    /// Per-level boxes, root level first.
    levels: Vec<Vec<ExtentXy>>,
    /// Number of source vertices, for recomputing leaf block bounds.
    items: u32,
}

impl PreparedIndex {
    /// The bounding box of the whole indexed linestring.
    pub fn extent(&self) -> ExtentXy {
        self.levels[0][0]
    }

    /// Number of levels in the hierarchy.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Number of indexed vertices.
    pub fn items(&self) -> u32 {
        self.items
    }
}

fn build_index(geom: &Geom) -> PreparedIndex {
    let items = geom.vertex_count();
    debug_assert!(items > 0);

    // Level sizes, leaves first: each level holds a block of up to NODE_SIZE
    // entries of the one below, up to a single root box.
    let mut bounds = Vec::new();
    let mut bound = items.div_ceil(NODE_SIZE);
    loop {
        bounds.push(bound as usize);
        if bound <= 1 {
            break;
        }
        bound = bound.div_ceil(NODE_SIZE);
    }
    bounds.reverse();
    debug_assert!(bounds.len() <= MAX_DEPTH);

    let mut levels: Vec<Vec<ExtentXy>> = bounds
        .iter()
        .map(|count| vec![ExtentXy::smallest(); *count])
        .collect();
    let depth = levels.len();

    // Leaf boxes span one vertex past their block so that the segment
    // crossing into the next block is covered on both sides.
    let leaf_level = &mut levels[depth - 1];
    for (i, entry) in leaf_level.iter_mut().enumerate() {
        let beg = i as u32 * NODE_SIZE;
        let end = (beg + NODE_SIZE + 1).min(items);
        for j in beg..end {
            entry.expand(&geom.vertex_xy(j));
        }
    }

    for i in (0..depth - 1).rev() {
        let (head, tail) = levels.split_at_mut(i + 1);
        let curr = &mut head[i];
        let below = &tail[0];
        for (j, entry) in curr.iter_mut().enumerate() {
            let beg = j * NODE_SIZE as usize;
            let end = (beg + NODE_SIZE as usize).min(below.len());
            for child in &below[beg..end] {
                entry.merge(child);
            }
        }
    }

    PreparedIndex { levels, items }
}

/// Builds indexes over every non-empty LINESTRING in the tree, recursing
/// through polygons and collections, and marks the indexed leaves prepared.
/// Already-prepared leaves keep their index.
pub fn prepare(arena: &mut GeomArena, id: GeomId) {
    let geom = arena.geom(id);

    if geom.is_multi_part() {
        let parts = geom.part_ids().to_vec();
        for part in parts {
            prepare(arena, part);
        }
        return;
    }

    if geom.kind() != GeometryKind::LineString || geom.is_empty() || geom.is_prepared() {
        return;
    }

    let index = build_index(&geom);
    log::trace!(
        "prepared linestring index: {} vertices, {} levels",
        index.items,
        index.levels.len()
    );
    arena.set_prepared_index(id, index);
}

/// The root box of a prepared linestring.
pub fn try_get_extent(geom: &Geom) -> Option<ExtentXy> {
    let index = geom.prepared_index()?;
    if index.items == 0 {
        return None;
    }
    Some(index.extent())
}

/// Even-odd classification of a vertex against a prepared ring.
///
/// Depth-first over the hierarchy with a fixed cursor stack, descending only
/// into nodes whose y-slice contains the vertex; crossings are counted over
/// the leaf segments with the shared raycast primitive.
pub(crate) fn contains(ring: &Geom, vert: &VertexXy) -> PointInRing {
    let Some(index) = ring.prepared_index() else {
        return PointInRing::Invalid;
    };

    let depth_count = index.levels.len();
    let mut stack = [0_u32; MAX_DEPTH];
    let mut depth = 0_usize;
    let mut crossings = 0_u32;

    loop {
        let entry = stack[depth];
        let node = &index.levels[depth][entry as usize];

        debug_assert!(node.min.y <= node.max.y);
        if node.min.y <= vert.y && node.max.y >= vert.y {
            if depth != depth_count - 1 {
                depth += 1;
                stack[depth] = entry * NODE_SIZE;
                continue;
            }

            let beg = entry * NODE_SIZE;
            let end = (beg + NODE_SIZE + 1).min(index.items);

            let mut prev = ring.vertex_xy(beg);
            for i in beg + 1..end {
                let next = ring.vertex_xy(i);
                match raycast(&prev, &next, vert) {
                    RaycastHit::Miss => {}
                    RaycastHit::Cross => crossings += 1,
                    RaycastHit::Boundary => return PointInRing::Boundary,
                }
                prev = next;
            }
        }

        loop {
            if depth == 0 {
                return if crossings % 2 == 0 {
                    PointInRing::Exterior
                } else {
                    PointInRing::Interior
                };
            }

            // Sideways until the end of the parent's block or the level.
            let node_end = (stack[depth - 1] + 1) * NODE_SIZE - 1;
            let level_end = index.levels[depth].len() as u32 - 1;
            let end = node_end.min(level_end);

            if stack[depth] != end {
                stack[depth] += 1;
                break;
            }
            depth -= 1;
        }
    }
}

/// Squared MINDIST: the smallest possible distance from the vertex to
/// anything inside the box.
fn min_distance_sq(r: &ExtentXy, q: &VertexXy) -> f64 {
    let dx = if q.x < r.min.x {
        r.min.x - q.x
    } else if q.x > r.max.x {
        q.x - r.max.x
    } else {
        0.0
    };
    let dy = if q.y < r.min.y {
        r.min.y - q.y
    } else if q.y > r.max.y {
        q.y - r.max.y
    } else {
        0.0
    };
    (dx * dx + dy * dy).max(0.0)
}

/// Squared MINMAXDIST: the tightest upper bound on the distance to the
/// nearest item guaranteed to lie inside the box, taken over the two k-axis
/// candidates.
fn min_max_distance_sq(r: &ExtentXy, q: &VertexXy) -> f64 {
    let sq = |x: f64| x * x;

    // k = x
    let rm_x = if q.x <= (r.min.x + r.max.x) / 2.0 { r.min.x } else { r.max.x };
    let rm_far_y = if q.y <= (r.min.y + r.max.y) / 2.0 { r.max.y } else { r.min.y };
    let term1 = sq(rm_x - q.x) + sq(rm_far_y - q.y);

    // k = y
    let rm_y = if q.y <= (r.min.y + r.max.y) / 2.0 { r.min.y } else { r.max.y };
    let rm_far_x = if q.x <= (r.min.x + r.max.x) / 2.0 { r.max.x } else { r.min.x };
    let term2 = sq(rm_y - q.y) + sq(rm_far_x - q.x);

    term1.min(term2).max(0.0)
}

// Branch and bound instead of best-first search: the stack stays shallow
// thanks to the fan-out of the tree, and no heap has to be maintained. A
// child is only expanded when its MINDIST does not exceed the smallest
// MINMAXDIST among its siblings, with a small epsilon so a too-tight bound
// never prunes the true nearest segment.
fn distance_to_vertex_recursive(
    line: &Geom,
    index: &PreparedIndex,
    level: usize,
    entry: usize,
    vertex: &VertexXy,
    distance: &mut f64,
) -> bool {
    if level == index.levels.len() - 1 || level == MAX_DEPTH {
        let beg = entry as u32 * NODE_SIZE;
        let end = (beg + NODE_SIZE + 1).min(index.items);
        if beg >= end {
            return false;
        }

        let mut prev = line.vertex_xy(beg);
        for i in beg + 1..end {
            let next = line.vertex_xy(i);
            *distance = distance.min(vertex_segment_distance(vertex, &prev, &next));
            prev = next;
        }
        return true;
    }

    let children = &index.levels[level + 1];
    let beg = entry * NODE_SIZE as usize;
    let end = (beg + NODE_SIZE as usize).min(children.len());
    if beg >= end {
        return false;
    }

    let mut min_max_dist = f64::INFINITY;
    for node in &children[beg..end] {
        min_max_dist = min_max_dist.min(min_max_distance_sq(node, vertex));
    }

    let mut found_any = false;
    for (offset, node) in children[beg..end].iter().enumerate() {
        if min_distance_sq(node, vertex) > min_max_dist + 1e-6 {
            continue;
        }
        found_any |=
            distance_to_vertex_recursive(line, index, level + 1, beg + offset, vertex, distance);
    }
    found_any
}

/// Distance from a vertex to the nearest segment of a prepared linestring.
pub(crate) fn distance_to_vertex(line: &Geom, vertex: &VertexXy) -> Option<f64> {
    let index = line.prepared_index()?;
    let mut distance = f64::INFINITY;
    distance_to_vertex_recursive(line, index, 0, 0, vertex, &mut distance).then_some(distance)
}

/// True when `q` lies within the bounding box of the segment (p, r).
fn on_segment(p: &VertexXy, q: &VertexXy, r: &VertexXy) -> bool {
    q.x >= p.x.min(r.x) && q.x <= p.x.max(r.x) && q.y >= p.y.min(r.y) && q.y <= p.y.max(r.y)
}

fn segments_intersect(a1: &VertexXy, a2: &VertexXy, b1: &VertexXy, b2: &VertexXy) -> bool {
    let a_is_point = a1 == a2;
    let b_is_point = b1 == b2;

    if a_is_point && b_is_point {
        return a1 == b1;
    }
    if a_is_point {
        return orient2d(b1, b2, a1) == 0 && on_segment(b1, a1, b2);
    }
    if b_is_point {
        return orient2d(a1, a2, b1) == 0 && on_segment(a1, b1, a2);
    }

    let o1 = orient2d(a1, a2, b1);
    let o2 = orient2d(a1, a2, b2);
    let o3 = orient2d(b1, b2, a1);
    let o4 = orient2d(b1, b2, a2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    if o1 == 0 && on_segment(a1, b1, a2) {
        return true;
    }
    if o2 == 0 && on_segment(a1, b2, a2) {
        return true;
    }
    if o3 == 0 && on_segment(b1, a1, b2) {
        return true;
    }
    if o4 == 0 && on_segment(b1, a2, b2) {
        return true;
    }

    false
}

fn point_segment_dist_sq(p: &VertexXy, a: &VertexXy, b: &VertexXy) -> f64 {
    let ab = *b - *a;
    let ap = *p - *a;

    let ab_len_sq = ab.norm_sq();
    if ab_len_sq == 0.0 {
        return ap.norm_sq();
    }

    let t = (ap.dot(&ab) / ab_len_sq).clamp(0.0, 1.0);
    let proj = *a + ab * t;
    (*p - proj).norm_sq()
}

fn segment_segment_dist_sq(a1: &VertexXy, a2: &VertexXy, b1: &VertexXy, b2: &VertexXy) -> f64 {
    if segments_intersect(a1, a2, b1, b2) {
        return 0.0;
    }

    point_segment_dist_sq(a1, b1, b2)
        .min(point_segment_dist_sq(a2, b1, b2))
        .min(point_segment_dist_sq(b1, a1, a2))
        .min(point_segment_dist_sq(b2, a1, a2))
}

/// A node pair in the best-first queue, ordered by increasing squared
/// box-to-box distance (the comparison is reversed to turn the max-heap into
/// a min-heap).
struct PairEntry {
    distance_sq: f64,
    lhs_level: usize,
    lhs_entry: usize,
    rhs_level: usize,
    rhs_entry: usize,
}

impl PartialEq for PairEntry {
    fn eq(&self, other: &Self) -> bool {
        self.distance_sq == other.distance_sq
    }
}

impl Eq for PairEntry {}

impl PartialOrd for PairEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PairEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance_sq
            .partial_cmp(&self.distance_sq)
            .unwrap_or(Ordering::Equal)
    }
}

fn segment_bbox(a: &VertexXy, b: &VertexXy) -> ExtentXy {
    ExtentXy::new(
        VertexXy::new(a.x.min(b.x), a.y.min(b.y)),
        VertexXy::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

/// Distance between the nearest segments of two prepared linestrings.
///
/// Best-first search over node pairs keyed by squared box distance: the
/// search terminates as soon as the cheapest remaining pair cannot beat the
/// best segment distance found. Zero-length segments are skipped; a line
/// needs at least one proper segment to contribute.
pub(crate) fn distance_between_lines(lhs: &Geom, rhs: &Geom) -> Option<f64> {
    let lhs_index = lhs.prepared_index()?;
    let rhs_index = rhs.prepared_index()?;

    if lhs.is_empty() || rhs.is_empty() {
        return None;
    }

    let mut queue = BinaryHeap::new();
    queue.push(PairEntry {
        distance_sq: 0.0,
        lhs_level: 0,
        lhs_entry: 0,
        rhs_level: 0,
        rhs_entry: 0,
    });

    let mut min_dist_sq = f64::INFINITY;
    let mut found_any = false;

    while min_dist_sq > 0.0 {
        let Some(pair) = queue.pop() else {
            break;
        };
        if pair.distance_sq >= min_dist_sq && found_any {
            // Everything still queued is at least this far away.
            break;
        }

        let lhs_is_leaf = pair.lhs_level == lhs_index.levels.len() - 1;
        let rhs_is_leaf = pair.rhs_level == rhs_index.levels.len() - 1;

        if lhs_is_leaf && rhs_is_leaf {
            let lhs_beg = pair.lhs_entry as u32 * NODE_SIZE;
            let lhs_end = (lhs_beg + NODE_SIZE + 1).min(lhs_index.items);
            let rhs_beg = pair.rhs_entry as u32 * NODE_SIZE;
            let rhs_end = (rhs_beg + NODE_SIZE + 1).min(rhs_index.items);

            if lhs_beg >= lhs_end || rhs_beg >= rhs_end {
                continue;
            }

            let rhs_box = rhs_index.levels[pair.rhs_level][pair.rhs_entry];

            let mut lhs_prev = lhs.vertex_xy(lhs_beg);
            for i in lhs_beg + 1..lhs_end {
                let lhs_next = lhs.vertex_xy(i);

                // A zero-length segment is covered again as the start point
                // of the next proper segment.
                if lhs_prev == lhs_next {
                    continue;
                }

                let lhs_seg = segment_bbox(&lhs_prev, &lhs_next);
                if lhs_seg.distance_to_sq(&rhs_box) > min_dist_sq {
                    lhs_prev = lhs_next;
                    continue;
                }

                let mut rhs_prev = rhs.vertex_xy(rhs_beg);
                for j in rhs_beg + 1..rhs_end {
                    let rhs_next = rhs.vertex_xy(j);
                    if rhs_prev == rhs_next {
                        continue;
                    }

                    let rhs_seg = segment_bbox(&rhs_prev, &rhs_next);
                    if rhs_seg.distance_to_sq(&lhs_seg) > min_dist_sq {
                        rhs_prev = rhs_next;
                        continue;
                    }

                    let dist = segment_segment_dist_sq(&lhs_prev, &lhs_next, &rhs_prev, &rhs_next);
                    if dist < min_dist_sq {
                        min_dist_sq = dist;
                        found_any = true;
                    }

                    rhs_prev = rhs_next;
                }

                lhs_prev = lhs_next;
            }
        } else if lhs_is_leaf {
            let lhs_box = lhs_index.levels[pair.lhs_level][pair.lhs_entry];
            let rhs_beg = pair.rhs_entry * NODE_SIZE as usize;
            let rhs_end =
                (rhs_beg + NODE_SIZE as usize).min(rhs_index.levels[pair.rhs_level + 1].len());

            for i in rhs_beg..rhs_end {
                let rhs_box = &rhs_index.levels[pair.rhs_level + 1][i];
                let dist = lhs_box.distance_to_sq(rhs_box);
                if dist < min_dist_sq {
                    queue.push(PairEntry {
                        distance_sq: dist,
                        lhs_level: pair.lhs_level,
                        lhs_entry: pair.lhs_entry,
                        rhs_level: pair.rhs_level + 1,
                        rhs_entry: i,
                    });
                }
            }
        } else if rhs_is_leaf {
            let rhs_box = rhs_index.levels[pair.rhs_level][pair.rhs_entry];
            let lhs_beg = pair.lhs_entry * NODE_SIZE as usize;
            let lhs_end =
                (lhs_beg + NODE_SIZE as usize).min(lhs_index.levels[pair.lhs_level + 1].len());

            for i in lhs_beg..lhs_end {
                let lhs_box = &lhs_index.levels[pair.lhs_level + 1][i];
                let dist = rhs_box.distance_to_sq(lhs_box);
                if dist < min_dist_sq {
                    queue.push(PairEntry {
                        distance_sq: dist,
                        lhs_level: pair.lhs_level + 1,
                        lhs_entry: i,
                        rhs_level: pair.rhs_level,
                        rhs_entry: pair.rhs_entry,
                    });
                }
            }
        } else {
            let lhs_box = lhs_index.levels[pair.lhs_level][pair.lhs_entry];
            let rhs_box = rhs_index.levels[pair.rhs_level][pair.rhs_entry];

            // Expand the larger box toward the smaller one.
            if lhs_box.area() > rhs_box.area() {
                let lhs_beg = pair.lhs_entry * NODE_SIZE as usize;
                let lhs_end =
                    (lhs_beg + NODE_SIZE as usize).min(lhs_index.levels[pair.lhs_level + 1].len());

                for i in lhs_beg..lhs_end {
                    let child = &lhs_index.levels[pair.lhs_level + 1][i];
                    let dist = child.distance_to_sq(&rhs_box);
                    if dist < min_dist_sq {
                        queue.push(PairEntry {
                            distance_sq: dist,
                            lhs_level: pair.lhs_level + 1,
                            lhs_entry: i,
                            rhs_level: pair.rhs_level,
                            rhs_entry: pair.rhs_entry,
                        });
                    }
                }
            } else {
                let rhs_beg = pair.rhs_entry * NODE_SIZE as usize;
                let rhs_end =
                    (rhs_beg + NODE_SIZE as usize).min(rhs_index.levels[pair.rhs_level + 1].len());

                for i in rhs_beg..rhs_end {
                    let child = &rhs_index.levels[pair.rhs_level + 1][i];
                    let dist = child.distance_to_sq(&lhs_box);
                    if dist < min_dist_sq {
                        queue.push(PairEntry {
                            distance_sq: dist,
                            lhs_level: pair.lhs_level,
                            lhs_entry: pair.lhs_entry,
                            rhs_level: pair.rhs_level + 1,
                            rhs_entry: i,
                        });
                    }
                }
            }
        }
    }

    found_any.then(|| min_dist_sq.sqrt())
}
