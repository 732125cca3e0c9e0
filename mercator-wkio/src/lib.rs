//! Readers for the OGC simple-features wire formats.
//!
//! [`WktReader`] and [`WkbReader`] decode well-known text and well-known
//! binary into `mercator-geom` trees, allocating everything from the caller's
//! arena. The WKB reader additionally offers a stats-only scan
//! ([`WkbReader::try_parse_stats`]) that folds a payload's extent and vertex
//! count without materializing a tree.

pub mod error;
pub mod wkb;
pub mod wkt;

pub use error::{WkbError, WktError};
pub use wkb::{WkbReader, WkbStats};
pub use wkt::WktReader;

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use mercator_geom::arena::{GeomArena, GeomId};
    use mercator_geom::extent::ExtentXy;
    use mercator_geom::ops;
    use mercator_geom::prepared;

    use crate::WktReader;

    const BIG_DONUT: &str = "POLYGON(\
        (0 0, 0 2, 0 4, 0 6, 0 8, 0 10, 2 10, 4 10, 6 10, 8 10, 10 10, \
         10 8, 10 6, 10 4, 10 2, 10 0, 8 0, 6 0, 4 0, 2 0, 0 0),\
        (1 1, 1 3, 1 5, 1 7, 1 9, 3 9, 5 9, 7 9, 9 9, 9 7, 9 5, 9 3, 9 1, \
         7 1, 5 1, 3 1, 1 1))";

    const BIG_DONUT_REVERSED: &str = "POLYGON(\
        (0 0, 0 2, 0 4, 0 6, 0 8, 0 10, 2 10, 4 10, 6 10, 8 10, 10 10, \
         10 8, 10 6, 10 4, 10 2, 10 0, 8 0, 6 0, 4 0, 2 0, 0 0),\
        (1 1, 3 1, 5 1, 7 1, 9 1, 9 3, 9 5, 9 7, 9 9, 7 9, 5 9, 3 9, 1 9, \
         1 7, 1 5, 1 3, 1 1))";

    fn parse(arena: &mut GeomArena, wkt: &str) -> GeomId {
        WktReader::new(arena).try_parse(wkt).unwrap()
    }

    /// Parses both operands, measures the plain distance, then prepares both
    /// and checks the accelerated path agrees.
    fn compare_prepared(lhs_wkt: &str, rhs_wkt: &str, expected: Option<f64>) {
        let mut arena = GeomArena::new();
        let lhs = parse(&mut arena, lhs_wkt);
        let rhs = parse(&mut arena, rhs_wkt);

        let plain = ops::get_euclidean_distance(arena.geom(lhs), arena.geom(rhs));
        match (plain, expected) {
            (Some(value), Some(want)) => assert_abs_diff_eq!(value, want, epsilon = 1e-12),
            (None, None) => {}
            other => panic!("unprepared distance mismatch: {other:?}"),
        }

        prepare_twice(&mut arena, lhs, rhs);
        let fast = ops::get_euclidean_distance(arena.geom(lhs), arena.geom(rhs));
        match (fast, expected) {
            (Some(value), Some(want)) => assert_abs_diff_eq!(value, want, epsilon = 1e-12),
            (None, None) => {}
            other => panic!("prepared distance mismatch: {other:?}"),
        }
    }

    fn prepare_twice(arena: &mut GeomArena, lhs: GeomId, rhs: GeomId) {
        prepared::prepare(arena, lhs);
        prepared::prepare(arena, rhs);
    }

    #[test]
    fn prepared_parity_point_cases() {
        for donut in [BIG_DONUT, BIG_DONUT_REVERSED] {
            // In the polygon surface.
            compare_prepared(donut, "POINT(0.5 0.5)", Some(0.0));
            compare_prepared("POINT(0.5 0.5)", donut, Some(0.0));

            // Outside.
            compare_prepared("POINT(15 0)", donut, Some(5.0));
            compare_prepared(donut, "POINT(15 0)", Some(5.0));

            // In the hole: distance to the hole ring.
            compare_prepared("POINT(5 5)", donut, Some(4.0));
            compare_prepared(donut, "POINT(5 5)", Some(4.0));

            // On the outer border and on the hole border.
            compare_prepared("POINT(2 10)", donut, Some(0.0));
            compare_prepared(donut, "POINT(2 10)", Some(0.0));
            compare_prepared("POINT(9 5)", donut, Some(0.0));
            compare_prepared(donut, "POINT(9 5)", Some(0.0));
        }
    }

    #[test]
    fn prepared_parity_line_cases() {
        let crossing_a = "LINESTRING(0 0, 0 10, 10 10, 10 0)";
        let crossing_b = "LINESTRING(0 5, 5 5, 5 10, 10 10)";
        compare_prepared(crossing_a, crossing_b, Some(0.0));
        compare_prepared(crossing_b, crossing_a, Some(0.0));

        let apart_a = "LINESTRING(0 0, 0 5, 0 10)";
        let apart_b = "LINESTRING(5 0, 5 10)";
        compare_prepared(apart_a, apart_b, Some(5.0));
        compare_prepared(apart_b, apart_a, Some(5.0));
    }

    #[test]
    fn prepared_parity_collections() {
        let collection = "GEOMETRYCOLLECTION(\
            POINT(0 0), \
            LINESTRING(0 0, 0 10, 10 10, 10 0), \
            POLYGON((0 0, 0 2, 2 2, 2 0, 0 0)), \
            MULTIPOINT(5 5, 6 6))";

        compare_prepared(collection, "POINT(0 0)", Some(0.0));
        compare_prepared("POINT(0 0)", collection, Some(0.0));
        compare_prepared("POINT(5 5)", collection, Some(0.0));
        compare_prepared(collection, "POINT(5 5)", Some(0.0));
    }

    #[test]
    fn prepared_parity_empty_operands() {
        compare_prepared("POLYGON EMPTY", "POINT(1 1)", None);
        compare_prepared("POINT EMPTY", "LINESTRING EMPTY", None);
    }

    #[test]
    fn prepared_extent_matches_folded_extent() {
        let mut arena = GeomArena::new();
        let id = parse(&mut arena, BIG_DONUT);
        prepared::prepare(&mut arena, id);

        let mut folded = ExtentXy::smallest();
        ops::get_total_extent_xy(arena.geom(id), &mut folded);

        let shell = arena.geom(id).first_part().unwrap();
        let indexed = prepared::try_get_extent(&shell).unwrap();
        assert_eq!(indexed, folded);
    }

    #[test]
    fn parsed_trees_satisfy_roundtrip_invariants() {
        let inputs = [
            "POINT(1 2)",
            "LINESTRING(1 1, 1 3, 3 3)",
            BIG_DONUT,
            "MULTIPOLYGON(((1 1, 1 3, 3 3, 3 1, 1 1)), ((4 4, 4 6, 6 6, 6 4, 4 4)))",
            "GEOMETRYCOLLECTION(POINT(1 2), LINESTRING(3 4, 5 6))",
        ];

        for wkt in inputs {
            let mut arena = GeomArena::new();
            let id = parse(&mut arena, wkt);
            let geom = arena.geom(id);

            let mut extent = ExtentXy::smallest();
            let folded = ops::get_total_extent_xy(geom, &mut extent);
            assert_eq!(folded, ops::get_total_vertex_count(geom), "{wkt}");

            let mut inside = 0;
            ops::visit_vertices_xy(geom, |vertex| {
                assert!(extent.contains(vertex), "{wkt}");
                inside += 1;
            });
            assert_eq!(inside, folded, "{wkt}");

            assert!(ops::get_area(geom) >= 0.0, "{wkt}");

            // The centroid cannot leave the extent of its geometry.
            let centroid = ops::get_centroid(geom).unwrap();
            assert!(extent.contains(&centroid.xy()), "{wkt}");

            // Distance to self is zero for anything non-empty.
            assert_eq!(ops::get_euclidean_distance(geom, geom), Some(0.0), "{wkt}");
        }
    }

    #[test]
    fn perimeter_equals_summed_ring_lengths() {
        let mut arena = GeomArena::new();
        let id = parse(&mut arena, BIG_DONUT);

        let mut ring_lengths = 0.0;
        for ring in arena.geom(id).parts() {
            ring_lengths += ops::get_length(ring);
        }
        assert_abs_diff_eq!(ops::get_perimeter(arena.geom(id)), ring_lengths);
    }
}
