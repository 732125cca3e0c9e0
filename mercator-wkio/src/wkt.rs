//! Recursive-descent reader for OGC well-known text.

use mercator_geom::arena::{CoordRange, GeomArena, GeomId};
use mercator_geom::geometry::GeometryKind;

use crate::error::WktError;

/// Reader handle that parses WKT into geometry trees inside one arena.
///
/// Accepted grammar: an optional `SRID=<n>;` prefix (consumed and
/// discarded), the standard geometry type keywords with optional `Z` and `M`
/// suffixes, `EMPTY`, and parenthesized coordinate lists carrying 2–4
/// numbers per vertex to match the dimension suffixes. MULTIPOINT members
/// may optionally be parenthesized individually. Keywords are matched
/// case-insensitively; mixed Z/M between nesting levels is rejected.
pub struct WktReader<'a> {
    arena: &'a mut GeomArena,
}

impl<'a> WktReader<'a> {
    /// Creates a reader allocating from the given arena.
    pub fn new(arena: &'a mut GeomArena) -> Self {
        Self { arena }
    }

    /// Parses one geometry.
    ///
    /// On failure the nodes built so far stay in the arena unreachable; they
    /// are reclaimed when the arena is dropped.
    pub fn try_parse(&mut self, input: &str) -> Result<GeomId, WktError> {
        let mut parser = Parser {
            arena: self.arena,
            buf: input.as_bytes(),
            pos: 0,
        };
        let result = parser.parse();
        if let Err(error) = &result {
            log::debug!("WKT parse rejected: {error}");
        }
        result
    }
}

/// Growable vertex scratch buffer backed by the arena, doubled on demand and
/// shrunk to fit before being handed to the leaf.
struct VertexBuf {
    run: CoordRange,
    width: usize,
    count: usize,
    capacity: usize,
}

impl VertexBuf {
    fn new(arena: &mut GeomArena, width: usize) -> Self {
        let run = arena.alloc(width);
        Self {
            run,
            width,
            count: 0,
            capacity: 1,
        }
    }

    fn push(&mut self, arena: &mut GeomArena, vertex: &[f64; 4]) {
        if self.count >= self.capacity {
            let capacity = (self.capacity * 2).max(8);
            self.run = arena.realloc(self.run, capacity * self.width);
            self.capacity = capacity;
        }
        let at = self.count * self.width;
        arena
            .coords_mut(self.run)[at..at + self.width]
            .copy_from_slice(&vertex[..self.width]);
        self.count += 1;
    }

    fn assign_to(&mut self, arena: &mut GeomArena, geom: GeomId) {
        if self.count < self.capacity {
            self.run = arena.realloc(self.run, self.count * self.width);
        }
        arena.set_vertex_array(geom, self.run);
    }
}

struct Parser<'a, 'b> {
    arena: &'b mut GeomArena,
    buf: &'a [u8],
    pos: usize,
}

impl Parser<'_, '_> {
    fn error(&self, message: impl Into<String>) -> WktError {
        const WINDOW: usize = 32;
        let beg = self.pos.saturating_sub(WINDOW);
        let end = (self.pos + 1).min(self.buf.len());
        let mut near = String::from_utf8_lossy(&self.buf[beg..end]).into_owned();
        if beg != 0 {
            near.insert_str(0, "...");
        }
        WktError {
            message: message.into(),
            position: self.pos,
            near,
        }
    }

    fn match_ws(&mut self) {
        while self.pos < self.buf.len() && self.buf[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Case-insensitive keyword match; trailing whitespace is consumed.
    fn match_str(&mut self, keyword: &str) -> bool {
        let bytes = keyword.as_bytes();
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            return false;
        }
        if !self.buf[self.pos..end].eq_ignore_ascii_case(bytes) {
            return false;
        }
        self.pos = end;
        self.match_ws();
        true
    }

    fn match_char(&mut self, c: u8) -> bool {
        if self.pos < self.buf.len() && self.buf[self.pos].eq_ignore_ascii_case(&c) {
            self.pos += 1;
            self.match_ws();
            return true;
        }
        false
    }

    fn expect_char(&mut self, c: u8) -> Result<(), WktError> {
        if self.match_char(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected character: '{}'", c as char)))
        }
    }

    /// Scans a number span within the buffer bounds and converts it.
    fn match_number(&mut self) -> Option<f64> {
        let buf = self.buf;
        let mut ptr = self.pos;

        if ptr < buf.len() && (buf[ptr] == b'+' || buf[ptr] == b'-') {
            ptr += 1;
        }
        while ptr < buf.len() && buf[ptr].is_ascii_digit() {
            ptr += 1;
        }
        if ptr < buf.len() && buf[ptr] == b'.' {
            ptr += 1;
            while ptr < buf.len() && buf[ptr].is_ascii_digit() {
                ptr += 1;
            }
        }
        if ptr < buf.len() && (buf[ptr] == b'e' || buf[ptr] == b'E') {
            ptr += 1;
            if ptr < buf.len() && (buf[ptr] == b'+' || buf[ptr] == b'-') {
                ptr += 1;
            }
            while ptr < buf.len() && buf[ptr].is_ascii_digit() {
                ptr += 1;
            }
        }

        if ptr == self.pos {
            return None;
        }

        let span = std::str::from_utf8(&buf[self.pos..ptr]).ok()?;
        let value: f64 = span.parse().ok()?;
        self.pos = ptr;
        self.match_ws();
        Some(value)
    }

    fn expect_number(&mut self) -> Result<f64, WktError> {
        self.match_number().ok_or_else(|| self.error("expected number"))
    }

    fn expect_vertex(&mut self, stride: usize) -> Result<[f64; 4], WktError> {
        let mut vertex = [0.0; 4];
        for slot in vertex.iter_mut().take(stride) {
            *slot = self.expect_number()?;
        }
        Ok(vertex)
    }

    /// `( v, v, ... )` assigned to the leaf.
    fn expect_coord_seq(&mut self, geom: GeomId, stride: usize) -> Result<(), WktError> {
        self.expect_char(b'(')?;
        let mut verts = VertexBuf::new(self.arena, stride);
        loop {
            let vertex = self.expect_vertex(stride)?;
            verts.push(self.arena, &vertex);
            if !self.match_char(b',') {
                break;
            }
        }
        verts.assign_to(self.arena, geom);
        self.expect_char(b')')
    }

    fn parse(&mut self) -> Result<GeomId, WktError> {
        let root = self.arena.make(GeometryKind::Invalid, false, false);
        let mut geom = root;

        self.match_ws();

        // A leading SRID is consumed and discarded.
        if self.match_str("SRID") {
            while self.pos < self.buf.len() && self.buf[self.pos] != b';' {
                self.pos += 1;
            }
            self.expect_char(b';')?;
        }

        loop {
            let kind = if self.match_str("POINT") {
                GeometryKind::Point
            } else if self.match_str("LINESTRING") {
                GeometryKind::LineString
            } else if self.match_str("POLYGON") {
                GeometryKind::Polygon
            } else if self.match_str("MULTIPOINT") {
                GeometryKind::MultiPoint
            } else if self.match_str("MULTILINESTRING") {
                GeometryKind::MultiLineString
            } else if self.match_str("MULTIPOLYGON") {
                GeometryKind::MultiPolygon
            } else if self.match_str("GEOMETRYCOLLECTION") {
                GeometryKind::GeometryCollection
            } else if self.match_str("INVALID") {
                GeometryKind::Invalid
            } else {
                return Err(self.error("expected geometry type"));
            };
            self.arena.set_kind(geom, kind);

            if self.match_char(b'z') {
                self.arena.set_has_z(geom, true);
            }
            if self.match_char(b'm') {
                self.arena.set_has_m(geom, true);
            }

            let (has_z, has_m) = {
                let g = self.arena.geom(geom);
                (g.has_z(), g.has_m())
            };
            let (root_z, root_m) = {
                let g = self.arena.geom(root);
                (g.has_z(), g.has_m())
            };
            if has_z != root_z || has_m != root_m {
                return Err(self.error("mixed Z and M values are not supported"));
            }

            let stride = 2 + has_z as usize + has_m as usize;

            if !self.match_str("EMPTY") {
                match kind {
                    GeometryKind::Point => {
                        self.expect_char(b'(')?;
                        let mut verts = VertexBuf::new(self.arena, stride);
                        let vertex = self.expect_vertex(stride)?;
                        verts.push(self.arena, &vertex);
                        verts.assign_to(self.arena, geom);
                        self.expect_char(b')')?;
                    }
                    GeometryKind::LineString => {
                        self.expect_coord_seq(geom, stride)?;
                    }
                    GeometryKind::Polygon => {
                        self.expect_char(b'(')?;
                        loop {
                            let ring = self.arena.make(GeometryKind::LineString, has_z, has_m);
                            if !self.match_str("EMPTY") {
                                self.expect_coord_seq(ring, stride)?;
                            }
                            self.arena.append_part(geom, ring);
                            if !self.match_char(b',') {
                                break;
                            }
                        }
                        self.expect_char(b')')?;
                    }
                    GeometryKind::MultiPoint => {
                        self.expect_char(b'(')?;
                        // Parens around individual points are optional.
                        loop {
                            let has_paren = self.match_char(b'(');
                            let point = self.arena.make(GeometryKind::Point, has_z, has_m);
                            if !self.match_str("EMPTY") {
                                let mut verts = VertexBuf::new(self.arena, stride);
                                let vertex = self.expect_vertex(stride)?;
                                verts.push(self.arena, &vertex);
                                verts.assign_to(self.arena, point);
                            }
                            if has_paren {
                                self.expect_char(b')')?;
                            }
                            self.arena.append_part(geom, point);
                            if !self.match_char(b',') {
                                break;
                            }
                        }
                        self.expect_char(b')')?;
                    }
                    GeometryKind::MultiLineString => {
                        self.expect_char(b'(')?;
                        loop {
                            let line = self.arena.make(GeometryKind::LineString, has_z, has_m);
                            if !self.match_str("EMPTY") {
                                self.expect_coord_seq(line, stride)?;
                            }
                            self.arena.append_part(geom, line);
                            if !self.match_char(b',') {
                                break;
                            }
                        }
                        self.expect_char(b')')?;
                    }
                    GeometryKind::MultiPolygon => {
                        self.expect_char(b'(')?;
                        loop {
                            let polygon = self.arena.make(GeometryKind::Polygon, has_z, has_m);
                            if !self.match_str("EMPTY") {
                                self.expect_char(b'(')?;
                                loop {
                                    let ring =
                                        self.arena.make(GeometryKind::LineString, has_z, has_m);
                                    if !self.match_str("EMPTY") {
                                        self.expect_coord_seq(ring, stride)?;
                                    }
                                    self.arena.append_part(polygon, ring);
                                    if !self.match_char(b',') {
                                        break;
                                    }
                                }
                                self.expect_char(b')')?;
                            }
                            self.arena.append_part(geom, polygon);
                            if !self.match_char(b',') {
                                break;
                            }
                        }
                        self.expect_char(b')')?;
                    }
                    GeometryKind::GeometryCollection => {
                        self.expect_char(b'(')?;

                        // The collection is parsed breadth-less: an invalid
                        // placeholder child is appended and typed by the next
                        // round of the outer loop.
                        let child = self.arena.make(GeometryKind::Invalid, false, false);
                        self.arena.append_part(geom, child);
                        geom = child;
                        continue;
                    }
                    GeometryKind::Invalid => {
                        return Err(self.error("unsupported geometry type"));
                    }
                }
            }

            loop {
                let parent = match self.arena.geom(geom).parent() {
                    None => return Ok(root),
                    Some(parent) => parent.id(),
                };
                debug_assert!(
                    self.arena.geom(parent).kind() == GeometryKind::GeometryCollection
                );

                if self.match_char(b',') {
                    // The collection goes on: open the next sibling.
                    let child = self.arena.make(GeometryKind::Invalid, false, false);
                    self.arena.append_part(parent, child);
                    geom = child;
                    break;
                }

                self.expect_char(b')')?;
                geom = parent;
            }
        }
    }
}
