//! Algorithms over geometry trees.

mod centroid;
mod distance;
mod extract;
mod locate;
mod measure;
mod vertex_ops;

pub use centroid::{
    get_centroid, get_centroid_from_linestrings, get_centroid_from_points,
    get_centroid_from_polygons,
};
pub use distance::{get_euclidean_distance, vertex_in_ring, PointInRing};
pub use extract::{extract_linestrings, extract_points, extract_polygons};
pub use locate::{locate_along, locate_between};
pub use measure::{
    get_area, get_length, get_max_surface_dimension, get_perimeter, get_total_extent_xy,
    get_total_extent_xyzm, get_total_vertex_count,
};
pub use vertex_ops::{
    affine_transform, collect_vertices, flip_vertices, force_zm, transform_vertices,
    visit_vertices_xy, visit_vertices_xyzm,
};

pub(crate) use distance::{orient2d, raycast, vertex_segment_distance, RaycastHit};
pub(crate) use measure::ring_length;
