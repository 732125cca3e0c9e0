use serde::{Deserialize, Serialize};

use crate::arena::{CoordRange, GeomArena, GeomId, NodeData, FLAG_HAS_M, FLAG_HAS_Z, FLAG_PREPARED};
use crate::prepared::PreparedIndex;
use crate::vertex::{VertexType, VertexXy, VertexXyzm};

/// The kind tag of a geometry node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GeometryKind {
    /// Sentinel used while a node is under construction.
    Invalid = 0,
    /// A single vertex, possibly empty.
    Point = 1,
    /// A chain of vertices.
    LineString = 2,
    /// Rings: the first child is the shell, the rest are holes.
    Polygon = 3,
    /// A set of points.
    MultiPoint = 4,
    /// A set of linestrings.
    MultiLineString = 5,
    /// A set of polygons.
    MultiPolygon = 6,
    /// A heterogeneous set of geometries.
    GeometryCollection = 7,
}

impl GeometryKind {
    /// Returns true for every kind whose payload is a child list, polygons
    /// included.
    pub fn is_multi_part(&self) -> bool {
        matches!(
            self,
            GeometryKind::Polygon
                | GeometryKind::MultiPoint
                | GeometryKind::MultiLineString
                | GeometryKind::MultiPolygon
                | GeometryKind::GeometryCollection
        )
    }

    /// Returns true for the MULTI_* kinds and collections, but not polygons.
    pub fn is_multi_geom(&self) -> bool {
        matches!(
            self,
            GeometryKind::MultiPoint
                | GeometryKind::MultiLineString
                | GeometryKind::MultiPolygon
                | GeometryKind::GeometryCollection
        )
    }
}

/// A copyable read cursor over one geometry node.
///
/// The cursor borrows its arena, so it can hand out sibling and child cursors
/// with the same lifetime.
#[derive(Copy, Clone)]
pub struct Geom<'a> {
    arena: &'a GeomArena,
    id: GeomId,
}

impl<'a> Geom<'a> {
    pub(crate) fn new(arena: &'a GeomArena, id: GeomId) -> Self {
        Self { arena, id }
    }

    /// The handle of this node.
    pub fn id(&self) -> GeomId {
        self.id
    }

    /// The arena this cursor reads from.
    pub fn arena(&self) -> &'a GeomArena {
        self.arena
    }

    /// The kind tag.
    pub fn kind(&self) -> GeometryKind {
        self.arena.node(self.id).kind
    }

    /// Whether vertices carry a Z ordinate.
    pub fn has_z(&self) -> bool {
        self.arena.node(self.id).flags & FLAG_HAS_Z != 0
    }

    /// Whether vertices carry an M ordinate.
    pub fn has_m(&self) -> bool {
        self.arena.node(self.id).flags & FLAG_HAS_M != 0
    }

    /// Whether a prepared index has been built over this node.
    pub fn is_prepared(&self) -> bool {
        self.arena.node(self.id).flags & FLAG_PREPARED != 0
    }

    /// A leaf with no vertices, or a multi-part with no children.
    pub fn is_empty(&self) -> bool {
        match &self.arena.node(self.id).data {
            NodeData::Leaf { verts, .. } => verts.is_empty(),
            NodeData::Multi { parts } => parts.is_empty(),
        }
    }

    /// See [`GeometryKind::is_multi_part`].
    pub fn is_multi_part(&self) -> bool {
        self.kind().is_multi_part()
    }

    /// See [`GeometryKind::is_multi_geom`].
    pub fn is_multi_geom(&self) -> bool {
        self.kind().is_multi_geom()
    }

    //------------------------------------------------------------------
    // Multi-part access
    //------------------------------------------------------------------

    /// Child handles of a multi-part node; empty for leaves.
    pub fn part_ids(&self) -> &'a [GeomId] {
        match &self.arena.node(self.id).data {
            NodeData::Multi { parts } => parts,
            NodeData::Leaf { .. } => &[],
        }
    }

    /// Number of children.
    pub fn part_count(&self) -> u32 {
        self.part_ids().len() as u32
    }

    /// Cursors over the children in order.
    pub fn parts(&self) -> impl Iterator<Item = Geom<'a>> + 'a {
        let arena = self.arena;
        self.part_ids().iter().map(move |id| arena.geom(*id))
    }

    /// The first child, if any.
    pub fn first_part(&self) -> Option<Geom<'a>> {
        self.part_ids().first().map(|id| self.arena.geom(*id))
    }

    /// The last child, if any.
    pub fn last_part(&self) -> Option<Geom<'a>> {
        self.part_ids().last().map(|id| self.arena.geom(*id))
    }

    /// The parent node, if this node is linked into a tree.
    pub fn parent(&self) -> Option<Geom<'a>> {
        self.arena.node(self.id).parent.map(|id| self.arena.geom(id))
    }

    //------------------------------------------------------------------
    // Leaf access
    //------------------------------------------------------------------

    /// The dimension tag of the packed vertex run.
    pub fn vertex_type(&self) -> VertexType {
        VertexType::from_flags(self.has_z(), self.has_m())
    }

    /// Ordinates per vertex.
    pub fn vertex_width(&self) -> usize {
        2 + self.has_z() as usize + self.has_m() as usize
    }

    /// The coordinate run of a leaf; the empty run for multi-parts.
    pub fn vertex_range(&self) -> CoordRange {
        match &self.arena.node(self.id).data {
            NodeData::Leaf { verts, .. } => *verts,
            NodeData::Multi { .. } => {
                debug_assert!(false, "vertex array of a multi-part node");
                CoordRange::default()
            }
        }
    }

    /// The packed ordinates of a leaf.
    pub fn vertex_array(&self) -> &'a [f64] {
        self.arena.coords(self.vertex_range())
    }

    /// Number of vertices in a leaf.
    pub fn vertex_count(&self) -> u32 {
        (self.vertex_range().len() / self.vertex_width()) as u32
    }

    /// The XY ordinates of vertex `index`.
    pub fn vertex_xy(&self, index: u32) -> VertexXy {
        let width = self.vertex_width();
        let run = self.vertex_array();
        let at = index as usize * width;
        VertexXy::new(run[at], run[at + 1])
    }

    /// All four logical ordinates of vertex `index`; Z and M read as 0 when
    /// the leaf does not carry them.
    pub fn vertex_xyzm(&self, index: u32) -> VertexXyzm {
        let width = self.vertex_width();
        let run = self.vertex_array();
        let at = index as usize * width;
        VertexXyzm::from_packed(&run[at..at + width], self.vertex_type())
    }

    /// The prepared index attached to this leaf, if one was built.
    pub fn prepared_index(&self) -> Option<&'a PreparedIndex> {
        match &self.arena.node(self.id).data {
            NodeData::Leaf { index, .. } => index.as_deref(),
            NodeData::Multi { .. } => None,
        }
    }
}

impl std::fmt::Debug for Geom<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Geom");
        s.field("kind", &self.kind())
            .field("has_z", &self.has_z())
            .field("has_m", &self.has_m());
        if self.is_multi_part() {
            s.field("parts", &self.part_count());
        } else {
            s.field("vertices", &self.vertex_count());
        }
        s.finish()
    }
}
