use crate::geometry::{Geom, GeometryKind};
use crate::prepared::PreparedIndex;

pub(crate) const FLAG_HAS_Z: u8 = 0x01;
pub(crate) const FLAG_HAS_M: u8 = 0x02;
pub(crate) const FLAG_PREPARED: u8 = 0x04;

/// Handle of a geometry node inside a [`GeomArena`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GeomId(u32);

impl GeomId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A run of `f64` ordinates inside the arena's coordinate store.
///
/// Ranges are plain indices: several leaves may alias overlapping runs, and a
/// range stays valid until its arena is dropped.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CoordRange {
    start: u32,
    len: u32,
}

impl CoordRange {
    /// Number of ordinates in the run.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns true for the zero-length run.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A sub-run of this run.
    pub fn sub(&self, offset: usize, len: usize) -> CoordRange {
        debug_assert!(offset + len <= self.len as usize);
        CoordRange {
            start: self.start + offset as u32,
            len: len as u32,
        }
    }

    fn as_range(&self) -> std::ops::Range<usize> {
        self.start as usize..(self.start + self.len) as usize
    }
}

#[derive(Debug)]
pub(crate) enum NodeData {
    Leaf {
        verts: CoordRange,
        index: Option<Box<PreparedIndex>>,
    },
    Multi {
        parts: Vec<GeomId>,
    },
}

impl NodeData {
    fn empty_leaf() -> Self {
        NodeData::Leaf {
            verts: CoordRange::default(),
            index: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct GeomNode {
    pub(crate) kind: GeometryKind,
    pub(crate) flags: u8,
    pub(crate) parent: Option<GeomId>,
    pub(crate) data: NodeData,
}

/// The per-query arena that owns every geometry node and every vertex
/// ordinate.
///
/// Nodes are addressed by [`GeomId`] and children are growable id vectors with
/// a parent back-link, so appending a part is O(1) and traversals walk
/// `(node, child index)` pairs with an explicit stack. Nothing is released
/// individually; dropping the arena releases every tree built in it.
///
/// Mutation requires `&mut` access, so exclusive ownership of a tree under
/// mutation is enforced by the borrow checker. Two arenas may be used from
/// two threads independently.
#[derive(Debug, Default)]
pub struct GeomArena {
    nodes: Vec<GeomNode>,
    coords: Vec<f64>,
}

impl GeomArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new node of the given kind and dimension flags.
    pub fn make(&mut self, kind: GeometryKind, has_z: bool, has_m: bool) -> GeomId {
        let mut flags = 0;
        if has_z {
            flags |= FLAG_HAS_Z;
        }
        if has_m {
            flags |= FLAG_HAS_M;
        }
        let data = if kind.is_multi_part() {
            NodeData::Multi { parts: Vec::new() }
        } else {
            NodeData::empty_leaf()
        };
        let id = GeomId(self.nodes.len() as u32);
        self.nodes.push(GeomNode {
            kind,
            flags,
            parent: None,
            data,
        });
        id
    }

    /// Read-only cursor over the node.
    pub fn geom(&self, id: GeomId) -> Geom<'_> {
        Geom::new(self, id)
    }

    pub(crate) fn node(&self, id: GeomId) -> &GeomNode {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: GeomId) -> &mut GeomNode {
        &mut self.nodes[id.index()]
    }

    //------------------------------------------------------------------
    // Coordinate allocator
    //------------------------------------------------------------------

    /// Allocates a zero-initialized run of `len` ordinates.
    pub fn alloc(&mut self, len: usize) -> CoordRange {
        let start = self.coords.len() as u32;
        self.coords.resize(self.coords.len() + len, 0.0);
        CoordRange {
            start,
            len: len as u32,
        }
    }

    /// Allocates a run holding a copy of `data`.
    pub fn alloc_from(&mut self, data: &[f64]) -> CoordRange {
        let start = self.coords.len() as u32;
        self.coords.extend_from_slice(data);
        CoordRange {
            start,
            len: data.len() as u32,
        }
    }

    /// Resizes a run, preserving its prefix.
    ///
    /// The most recent allocation grows or shrinks in place; any other run
    /// shrinks by narrowing or grows by copying to the end of the store. The
    /// abandoned ordinates stay allocated until the arena is dropped.
    pub fn realloc(&mut self, range: CoordRange, new_len: usize) -> CoordRange {
        if range.start as usize + range.len as usize == self.coords.len() {
            self.coords.resize(range.start as usize + new_len, 0.0);
            CoordRange {
                start: range.start,
                len: new_len as u32,
            }
        } else if new_len <= range.len as usize {
            CoordRange {
                start: range.start,
                len: new_len as u32,
            }
        } else {
            let start = self.coords.len() as u32;
            self.coords.extend_from_within(range.as_range());
            self.coords.resize(start as usize + new_len, 0.0);
            CoordRange {
                start,
                len: new_len as u32,
            }
        }
    }

    /// Releasing a single run is a no-op; the arena frees wholesale on drop.
    pub fn dealloc(&mut self, _range: CoordRange) {}

    /// The ordinates of a run.
    pub fn coords(&self, range: CoordRange) -> &[f64] {
        &self.coords[range.as_range()]
    }

    /// The ordinates of a run, mutable.
    pub fn coords_mut(&mut self, range: CoordRange) -> &mut [f64] {
        &mut self.coords[range.as_range()]
    }

    //------------------------------------------------------------------
    // Node mutation
    //------------------------------------------------------------------

    /// Retags a node.
    ///
    /// The payload follows the tag: an empty leaf becomes an empty container
    /// when retagged to a multi-part kind and vice versa. Retagging a
    /// non-empty node across the leaf/multi-part divide is a caller error.
    pub fn set_kind(&mut self, id: GeomId, kind: GeometryKind) {
        let node = self.node_mut(id);
        match (&mut node.data, kind.is_multi_part()) {
            (NodeData::Leaf { verts, .. }, true) => {
                debug_assert!(verts.is_empty());
                node.data = NodeData::Multi { parts: Vec::new() };
            }
            (NodeData::Multi { parts }, false) if kind != GeometryKind::Invalid => {
                debug_assert!(parts.is_empty());
                node.data = NodeData::empty_leaf();
            }
            _ => {}
        }
        node.kind = kind;
    }

    /// Sets the Z flag.
    pub fn set_has_z(&mut self, id: GeomId, value: bool) {
        let node = self.node_mut(id);
        if value {
            node.flags |= FLAG_HAS_Z;
        } else {
            node.flags &= !FLAG_HAS_Z;
        }
    }

    /// Sets the M flag.
    pub fn set_has_m(&mut self, id: GeomId, value: bool) {
        let node = self.node_mut(id);
        if value {
            node.flags |= FLAG_HAS_M;
        } else {
            node.flags &= !FLAG_HAS_M;
        }
    }

    pub(crate) fn set_prepared_index(&mut self, id: GeomId, index: PreparedIndex) {
        let node = self.node_mut(id);
        node.flags |= FLAG_PREPARED;
        match &mut node.data {
            NodeData::Leaf { index: slot, .. } => *slot = Some(Box::new(index)),
            NodeData::Multi { .. } => unreachable!("prepared index on a multi-part node"),
        }
    }

    /// Returns a node to its default state: invalid kind, no flags, no
    /// parent, no data.
    pub fn reset(&mut self, id: GeomId) {
        let node = self.node_mut(id);
        node.kind = GeometryKind::Invalid;
        node.flags = 0;
        node.parent = None;
        node.data = NodeData::empty_leaf();
    }

    /// Points a leaf at a coordinate run.
    ///
    /// The run length must be a multiple of the leaf's vertex width.
    pub fn set_vertex_array(&mut self, id: GeomId, range: CoordRange) {
        let width = self.geom(id).vertex_width();
        debug_assert!(range.len() % width == 0);
        match &mut self.node_mut(id).data {
            NodeData::Leaf { verts, .. } => *verts = range,
            NodeData::Multi { .. } => {
                debug_assert!(false, "vertex array on a multi-part node");
            }
        }
    }

    /// Appends a child to a multi-part node in O(1).
    pub fn append_part(&mut self, parent: GeomId, part: GeomId) {
        debug_assert!(
            self.node(parent).kind.is_multi_part() || self.node(parent).kind == GeometryKind::Invalid
        );
        debug_assert!(parent != part);
        self.node_mut(part).parent = Some(parent);
        let node = self.node_mut(parent);
        match &mut node.data {
            NodeData::Multi { parts } => parts.push(part),
            NodeData::Leaf { verts, .. } => {
                debug_assert!(verts.is_empty());
                node.data = NodeData::Multi { parts: vec![part] };
            }
        }
    }

    /// Walks the child list once, unlinking every child `select` approves and
    /// forwarding it to `handle` with parent and sibling links cleared. The
    /// remaining children keep their order.
    ///
    /// The callbacks are plain function items so that `handle` can recurse
    /// through the arena, which is how the geometry-kind extractors splice
    /// nested parts out of collections.
    pub fn filter_parts<S>(
        &mut self,
        id: GeomId,
        state: &mut S,
        select: fn(&GeomArena, &S, GeomId) -> bool,
        handle: fn(&mut GeomArena, &mut S, GeomId),
    ) {
        let parts = match &mut self.node_mut(id).data {
            NodeData::Multi { parts } => std::mem::take(parts),
            NodeData::Leaf { .. } => return,
        };

        let mut kept = Vec::with_capacity(parts.len());
        for part in parts {
            if select(self, state, part) {
                self.node_mut(part).parent = None;
                handle(self, state, part);
            } else {
                kept.push(part);
            }
        }

        if let NodeData::Multi { parts } = &mut self.node_mut(id).data {
            let added = std::mem::take(parts);
            *parts = kept;
            parts.extend(added);
        }
    }
}
