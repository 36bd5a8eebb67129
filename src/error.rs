//! Errors reported by the tessellator.

use derive_more::Display;
use failure::Fail;


/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong when creating a context or drawing.
///
/// No error is ever reported after output buffers were modified: if a draw
/// call returns an error, the mesh of the previous call is left intact.
#[derive(Debug, Fail)]
pub enum Error {
    /// The input spines cannot be turned into a ribbon.
    #[fail(display = "invalid spine geometry: {}", _0)]
    InvalidSpineGeometry(GeometryDefect),

    #[fail(display = "invalid configuration: {}", reason)]
    InvalidConfig {
        reason: String,
    },

    /// The resulting mesh would have more vertices than can be addressed
    /// with `u32` indices.
    #[fail(display = "mesh would have {} vertices, but at most {} are addressable", num_vertices, max)]
    TooManyVertices {
        num_vertices: u64,
        max: u64,
    },

    /// The operation is a producer that is not built into this crate. Use
    /// `Context::draw_spines_from` with an external `SpineSource` instead.
    #[fail(display = "'{}' is not supported by this crate", operation)]
    Unsupported {
        operation: &'static str,
    },

    /// A `SpineSource` failed to produce spines.
    #[fail(display = "spine source error: {}", _0)]
    Source(failure::Error),
}

impl Error {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Error::InvalidConfig { reason: reason.into() }
    }

    /// Returns the geometry defect if this is an `InvalidSpineGeometry`
    /// error.
    pub fn defect(&self) -> Option<&GeometryDefect> {
        match self {
            Error::InvalidSpineGeometry(d) => Some(d),
            _ => None,
        }
    }
}

impl From<GeometryDefect> for Error {
    fn from(src: GeometryDefect) -> Self {
        Error::InvalidSpineGeometry(src)
    }
}

/// Describes where and why a spine list cannot be tessellated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(fmt = "{} (spine {}, vertex {})", kind, spine, vertex)]
pub struct GeometryDefect {
    /// Index of the offending spine within the spine list.
    pub spine: usize,

    /// Index of the offending vertex, relative to the start of its spine.
    /// For `TooShort` this is `0`, for segments it is the start vertex of
    /// the segment.
    pub vertex: usize,

    pub kind: DefectKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DefectKind {
    /// A spine has fewer than two vertices.
    #[display(fmt = "spine has {} vertices, but at least 2 are required", _0)]
    TooShort(usize),

    /// Two consecutive vertices coincide. For closed spines this includes
    /// the segment from the last vertex back to the first one.
    #[display(fmt = "zero-length segment")]
    ZeroLengthSegment,

    /// A coordinate is NaN or infinite.
    #[display(fmt = "non-finite coordinate")]
    NonFinite,

    /// The spine lengths don't add up to the number of vertices.
    #[display(fmt = "spine lengths sum to {}, but there are {} vertices", expected, actual)]
    CountMismatch {
        expected: usize,
        actual: usize,
    },
}
