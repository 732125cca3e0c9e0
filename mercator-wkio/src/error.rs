use thiserror::Error;

/// A WKT parse failure, carrying the byte offset of the failure and a window
/// of the input around it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position '{position}' near: '{near}'|<---")]
pub struct WktError {
    /// What the parser expected or rejected.
    pub message: String,
    /// Byte offset into the input where parsing stopped.
    pub position: usize,
    /// Up to 32 characters of input leading up to the failure, prefixed with
    /// `...` when truncated.
    pub near: String,
}

/// Geometry kind names for the extended WKB type table, used when reporting
/// an unsupported type tag.
fn guessed_type_name(type_id: &u32) -> String {
    let kind = (type_id & 0xffff) % 1000;
    let flags = (type_id & 0xffff) / 1000;
    let has_z = flags == 1 || flags == 3 || (type_id & 0x8000_0000) != 0;
    let has_m = flags == 2 || flags == 3 || (type_id & 0x4000_0000) != 0;

    let base = match kind {
        1 => "POINT",
        2 => "LINESTRING",
        3 => "POLYGON",
        4 => "MULTIPOINT",
        5 => "MULTILINESTRING",
        6 => "MULTIPOLYGON",
        7 => "GEOMETRYCOLLECTION",
        8 => "CIRCULARSTRING",
        9 => "COMPOUNDCURVE",
        10 => "CURVEPOLYGON",
        11 => "MULTICURVE",
        12 => "MULTISURFACE",
        13 => "CURVE",
        14 => "SURFACE",
        15 => "POLYHEDRALSURFACE",
        16 => "TIN",
        17 => "TRIANGLE",
        18 => "CIRCLE",
        19 => "GEODESICSTRING",
        20 => "ELLIPTICALCURVE",
        21 => "NURBSCURVE",
        22 => "CLOTHOID",
        23 => "SPIRALCURVE",
        24 => "COMPOUNDSURFACE",
        25 => "ORIENTABLESURFACE",
        102 => "AFFINEPLACEMENT",
        _ => "UNKNOWN",
    };

    match (has_z, has_m) {
        (false, false) => base.to_string(),
        (true, false) => format!("{base} Z"),
        (false, true) => format!("{base} M"),
        (true, true) => format!("{base} ZM"),
    }
}

/// A WKB parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WkbError {
    /// The payload ended before the structure it promised.
    #[error("out of bounds read (is the WKB corrupt?)")]
    OutOfBounds,
    /// The type tag names a geometry kind outside the supported set.
    #[error(
        "WKB type '{}' is not supported! (type id: {type_id}, SRID: {srid})",
        guessed_type_name(.type_id)
    )]
    UnsupportedType {
        /// The raw 32-bit type tag.
        type_id: u32,
        /// The SRID read from the payload, 0 when absent.
        srid: u32,
    },
    /// Nesting exceeded the depth cap.
    #[error("recursion limit '{}' reached", crate::wkb::MAX_DEPTH)]
    RecursionLimit,
    /// Nested geometries disagree on their Z/M dimensions.
    #[error("mixed Z and M values are not allowed")]
    MixedZm,
    /// A typed multi-geometry holds a child of the wrong kind.
    #[error("invalid child type")]
    InvalidChildType,
}
