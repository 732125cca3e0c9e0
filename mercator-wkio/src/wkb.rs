//! Iterative reader for OGC well-known binary, ISO and EWKB flavored.

use bytes::Buf;
use mercator_geom::arena::{GeomArena, GeomId};
use mercator_geom::extent::ExtentXy;
use mercator_geom::geometry::GeometryKind;
use mercator_geom::vertex::VertexXy;

use crate::error::WkbError;

/// Depth cap for nested multi-geometries.
pub const MAX_DEPTH: usize = 32;

/// Extent and vertex count of a payload, gathered without building a tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WkbStats {
    /// 2D extent over every vertex; [`ExtentXy::smallest`] when the payload
    /// holds no vertices.
    pub extent: ExtentXy,
    /// Total number of vertices.
    pub vertex_count: usize,
}

/// Reader handle that parses WKB into geometry trees inside one arena.
///
/// Both byte orders are handled per the leading byte of each geometry. The
/// dimension flags are read from the ISO thousand-offset of the type tag as
/// well as from the EWKB high bits; an EWKB SRID is consumed and discarded.
/// Vertex payloads are always decoded into arena-owned coordinate runs.
pub struct WkbReader<'a> {
    arena: &'a mut GeomArena,
    allow_mixed_zm: bool,
    nan_as_empty: bool,
    has_mixed_zm: bool,
    has_any_z: bool,
    has_any_m: bool,
}

impl<'a> WkbReader<'a> {
    /// Creates a reader allocating from the given arena.
    pub fn new(arena: &'a mut GeomArena) -> Self {
        Self {
            arena,
            allow_mixed_zm: false,
            nan_as_empty: false,
            has_mixed_zm: false,
            has_any_z: false,
            has_any_m: false,
        }
    }

    /// Accept nested geometries whose Z/M flags differ from the root's
    /// instead of failing with [`WkbError::MixedZm`].
    pub fn set_allow_mixed_zm(&mut self, value: bool) {
        self.allow_mixed_zm = value;
    }

    /// Materialize a POINT whose ordinates are all NaN as an empty point.
    pub fn set_nan_as_empty(&mut self, value: bool) {
        self.nan_as_empty = value;
    }

    /// Whether the last parse saw nested geometries with diverging Z/M flags.
    pub fn parsed_mixed_zm(&self) -> bool {
        self.has_mixed_zm
    }

    /// Whether a diverging nested geometry carried Z.
    pub fn parsed_any_z(&self) -> bool {
        self.has_any_z
    }

    /// Whether a diverging nested geometry carried M.
    pub fn parsed_any_m(&self) -> bool {
        self.has_any_m
    }

    /// Parses one geometry.
    ///
    /// On failure the nodes built so far stay in the arena unreachable; they
    /// are reclaimed when the arena is dropped.
    pub fn try_parse(&mut self, input: &[u8]) -> Result<GeomId, WkbError> {
        let result = self.parse_tree(input);
        if let Err(error) = &result {
            log::debug!("WKB parse rejected: {error}");
        }
        result
    }

    fn parse_tree(&mut self, input: &[u8]) -> Result<GeomId, WkbError> {
        self.has_mixed_zm = false;
        self.has_any_z = false;
        self.has_any_m = false;

        let mut cursor = Cursor {
            buf: input,
            le: false,
        };

        // Remaining sibling counts per open multi-geometry.
        let mut stack: Vec<u32> = Vec::new();

        let root = self.arena.make(GeometryKind::Invalid, false, false);
        let mut geom = root;

        loop {
            cursor.le = cursor.read_u8()? != 0;
            let type_id = cursor.read_u32()?;

            let header = TypeHeader::decode(type_id);
            let srid = if header.has_srid { cursor.read_u32()? } else { 0 };

            let Some(kind) = header.kind else {
                return Err(WkbError::UnsupportedType { type_id, srid });
            };

            self.arena.set_kind(geom, kind);
            self.arena.set_has_z(geom, header.has_z);
            self.arena.set_has_m(geom, header.has_m);

            let (root_z, root_m) = {
                let g = self.arena.geom(root);
                (g.has_z(), g.has_m())
            };
            if !self.has_mixed_zm && (root_z != header.has_z || root_m != header.has_m) {
                self.has_any_z |= header.has_z;
                self.has_any_m |= header.has_m;
                self.has_mixed_zm = true;
                if !self.allow_mixed_zm {
                    return Err(WkbError::MixedZm);
                }
            }

            match kind {
                GeometryKind::Point => {
                    self.read_point(&mut cursor, geom)?;
                }
                GeometryKind::LineString => {
                    self.read_line(&mut cursor, geom)?;
                }
                GeometryKind::Polygon => {
                    let ring_count = cursor.read_u32()?;
                    for _ in 0..ring_count {
                        let ring =
                            self.arena
                                .make(GeometryKind::LineString, header.has_z, header.has_m);
                        self.read_line(&mut cursor, ring)?;
                        self.arena.append_part(geom, ring);
                    }
                }
                GeometryKind::MultiPoint
                | GeometryKind::MultiLineString
                | GeometryKind::MultiPolygon
                | GeometryKind::GeometryCollection => {
                    if stack.len() >= MAX_DEPTH {
                        return Err(WkbError::RecursionLimit);
                    }

                    let count = cursor.read_u32()?;
                    if count != 0 {
                        stack.push(count);

                        let part =
                            self.arena
                                .make(GeometryKind::Invalid, header.has_z, header.has_m);
                        self.arena.append_part(geom, part);
                        geom = part;
                        continue;
                    }
                }
                GeometryKind::Invalid => {
                    return Err(WkbError::UnsupportedType { type_id, srid });
                }
            }

            loop {
                let Some(remaining) = stack.last_mut() else {
                    debug_assert!(self.arena.geom(geom).parent().is_none());
                    return Ok(root);
                };

                let parent = self
                    .arena
                    .geom(geom)
                    .parent()
                    .expect("open multi-geometry has a parent")
                    .id();

                let parent_kind = self.arena.geom(parent).kind();
                let child_kind = self.arena.geom(geom).kind();
                let child_ok = match parent_kind {
                    GeometryKind::MultiPoint => child_kind == GeometryKind::Point,
                    GeometryKind::MultiLineString => child_kind == GeometryKind::LineString,
                    GeometryKind::MultiPolygon => child_kind == GeometryKind::Polygon,
                    _ => true,
                };
                if !child_ok {
                    return Err(WkbError::InvalidChildType);
                }

                *remaining -= 1;
                if *remaining > 0 {
                    // More siblings follow: open the next one.
                    let part =
                        self.arena
                            .make(GeometryKind::Invalid, header.has_z, header.has_m);
                    self.arena.append_part(parent, part);
                    geom = part;
                    break;
                }

                stack.pop();
                geom = parent;
            }
        }
    }

    fn read_point(&mut self, cursor: &mut Cursor<'_>, geom: GeomId) -> Result<(), WkbError> {
        let dims = self.arena.geom(geom).vertex_width();

        let mut coords = [0.0_f64; 4];
        let mut all_nan = true;
        for slot in coords.iter_mut().take(dims) {
            *slot = cursor.read_f64()?;
            if !slot.is_nan() {
                all_nan = false;
            }
        }

        if self.nan_as_empty && all_nan {
            return Ok(());
        }

        let run = self.arena.alloc_from(&coords[..dims]);
        self.arena.set_vertex_array(geom, run);
        Ok(())
    }

    fn read_line(&mut self, cursor: &mut Cursor<'_>, geom: GeomId) -> Result<(), WkbError> {
        let vertex_count = cursor.read_u32()?;
        let width = self.arena.geom(geom).vertex_width();

        let ordinates = vertex_count as usize * width;
        if (cursor.buf.remaining() as u64) < ordinates as u64 * 8 {
            return Err(WkbError::OutOfBounds);
        }

        let mut run = Vec::with_capacity(ordinates);
        for _ in 0..ordinates {
            run.push(cursor.read_f64()?);
        }

        let run = self.arena.alloc_from(&run);
        self.arena.set_vertex_array(geom, run);
        Ok(())
    }

    /// Walks the payload without building any tree, folding every vertex
    /// into an extent and counting vertices, to support predicate pushdown.
    pub fn try_parse_stats(&mut self, input: &[u8]) -> Result<WkbStats, WkbError> {
        let mut cursor = Cursor {
            buf: input,
            le: false,
        };
        let mut stack: Vec<u32> = Vec::new();

        let mut extent = ExtentXy::smallest();
        let mut vertex_count = 0_usize;

        loop {
            cursor.le = cursor.read_u8()? != 0;
            let type_id = cursor.read_u32()?;

            let header = TypeHeader::decode(type_id);
            let srid = if header.has_srid { cursor.read_u32()? } else { 0 };

            let Some(kind) = header.kind else {
                return Err(WkbError::UnsupportedType { type_id, srid });
            };

            let extra = header.has_z as usize + header.has_m as usize;

            match kind {
                GeometryKind::Point => {
                    let x = cursor.read_f64()?;
                    let y = cursor.read_f64()?;
                    let mut all_nan = x.is_nan() && y.is_nan();
                    for _ in 0..extra {
                        all_nan &= cursor.read_f64()?.is_nan();
                    }
                    if !(self.nan_as_empty && all_nan) {
                        extent.expand(&VertexXy::new(x, y));
                        vertex_count += 1;
                    }
                }
                GeometryKind::LineString => {
                    let count = cursor.read_u32()?;
                    for _ in 0..count {
                        let x = cursor.read_f64()?;
                        let y = cursor.read_f64()?;
                        cursor.skip(extra * 8)?;
                        extent.expand(&VertexXy::new(x, y));
                    }
                    vertex_count += count as usize;
                }
                GeometryKind::Polygon => {
                    let ring_count = cursor.read_u32()?;
                    for _ in 0..ring_count {
                        let count = cursor.read_u32()?;
                        for _ in 0..count {
                            let x = cursor.read_f64()?;
                            let y = cursor.read_f64()?;
                            cursor.skip(extra * 8)?;
                            extent.expand(&VertexXy::new(x, y));
                        }
                        vertex_count += count as usize;
                    }
                }
                GeometryKind::MultiPoint
                | GeometryKind::MultiLineString
                | GeometryKind::MultiPolygon
                | GeometryKind::GeometryCollection => {
                    if stack.len() >= MAX_DEPTH {
                        return Err(WkbError::RecursionLimit);
                    }
                    let count = cursor.read_u32()?;
                    if count != 0 {
                        stack.push(count);
                        continue;
                    }
                }
                GeometryKind::Invalid => {
                    return Err(WkbError::UnsupportedType { type_id, srid });
                }
            }

            loop {
                let Some(remaining) = stack.last_mut() else {
                    return Ok(WkbStats {
                        extent,
                        vertex_count,
                    });
                };
                *remaining -= 1;
                if *remaining > 0 {
                    break;
                }
                stack.pop();
            }
        }
    }
}

/// The decoded 32-bit type tag.
struct TypeHeader {
    kind: Option<GeometryKind>,
    has_z: bool,
    has_m: bool,
    has_srid: bool,
}

impl TypeHeader {
    fn decode(type_id: u32) -> Self {
        let code = (type_id & 0xffff) % 1000;
        let offset = (type_id & 0xffff) / 1000;

        let has_z = offset == 1 || offset == 3 || (type_id & 0x8000_0000) != 0;
        let has_m = offset == 2 || offset == 3 || (type_id & 0x4000_0000) != 0;
        let has_srid = (type_id & 0x2000_0000) != 0;

        let kind = match code {
            1 => Some(GeometryKind::Point),
            2 => Some(GeometryKind::LineString),
            3 => Some(GeometryKind::Polygon),
            4 => Some(GeometryKind::MultiPoint),
            5 => Some(GeometryKind::MultiLineString),
            6 => Some(GeometryKind::MultiPolygon),
            7 => Some(GeometryKind::GeometryCollection),
            _ => None,
        };

        Self {
            kind,
            has_z,
            has_m,
            has_srid,
        }
    }
}

/// Byte cursor with the endianness of the current geometry.
struct Cursor<'a> {
    buf: &'a [u8],
    le: bool,
}

impl Cursor<'_> {
    fn read_u8(&mut self) -> Result<u8, WkbError> {
        if !self.buf.has_remaining() {
            return Err(WkbError::OutOfBounds);
        }
        Ok(self.buf.get_u8())
    }

    fn read_u32(&mut self) -> Result<u32, WkbError> {
        if self.buf.remaining() < 4 {
            return Err(WkbError::OutOfBounds);
        }
        Ok(if self.le {
            self.buf.get_u32_le()
        } else {
            self.buf.get_u32()
        })
    }

    fn read_f64(&mut self) -> Result<f64, WkbError> {
        if self.buf.remaining() < 8 {
            return Err(WkbError::OutOfBounds);
        }
        Ok(if self.le {
            self.buf.get_f64_le()
        } else {
            self.buf.get_f64()
        })
    }

    fn skip(&mut self, bytes: usize) -> Result<(), WkbError> {
        if self.buf.remaining() < bytes {
            return Err(WkbError::OutOfBounds);
        }
        self.buf.advance(bytes);
        Ok(())
    }
}
