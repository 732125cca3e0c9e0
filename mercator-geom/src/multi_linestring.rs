//! Operations over MULTI_LINESTRING geometries.

use crate::geometry::{Geom, GeometryKind};
use crate::linestring;

/// True when every member linestring is closed. An empty multi-linestring is
/// not closed.
pub fn is_closed(geom: Geom) -> bool {
    debug_assert!(geom.kind() == GeometryKind::MultiLineString);

    if geom.is_empty() {
        return false;
    }
    geom.parts().all(linestring::is_closed)
}
