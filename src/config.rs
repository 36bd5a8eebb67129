//! Configuration of a tessellation [`Context`](crate::Context).

use std::{
    fmt,
    str::FromStr,
};

use crate::{
    error::{Error, Result},
    mesh::IndexLayout,
};


/// How the `u_along_curve` annotation is parameterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UMode {
    /// Distance along the spine divided by the spine's total arc length, i.e.
    /// `u` runs from 0 to 1 on every spine. This is the default.
    NormalizedDistance,

    /// Raw distance along the spine.
    Distance,

    /// The index of the vertex pair within its spine: 0, 1, 2, ...
    SegmentIndex,

    /// The vertex pair index divided by the spine length: 0, 1/n, 2/n, ...
    SegmentFraction,
}

impl Default for UMode {
    fn default() -> Self {
        UMode::NormalizedDistance
    }
}

impl UMode {
    /// All modes, in declaration order.
    pub const ALL: [UMode; 4] = [
        UMode::NormalizedDistance,
        UMode::Distance,
        UMode::SegmentIndex,
        UMode::SegmentFraction,
    ];

    fn name(&self) -> &'static str {
        match self {
            UMode::NormalizedDistance => "normalized-distance",
            UMode::Distance => "distance",
            UMode::SegmentIndex => "segment-index",
            UMode::SegmentFraction => "segment-fraction",
        }
    }
}

impl fmt::Display for UMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.name().fmt(f)
    }
}

impl FromStr for UMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        UMode::ALL.iter()
            .copied()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| Error::config(format!("unknown u-mode '{}'", s)))
    }
}

/// Parameters of a tessellation context.
///
/// The `curves_*` and `streamlines_*` fields are meant for spine producers
/// (see [`SpineSource`](crate::SpineSource)); the line tessellator itself
/// only looks at `thickness`, `wireframe`, `u_mode` and `miter_limit`.
///
/// ```
/// use streamlines::{Config, UMode};
///
/// let config = Config {
///     thickness: 3.0,
///     u_mode: UMode::Distance,
///     .. Config::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Width of the ribbon, measured across the spine. Must be positive.
    pub thickness: f32,

    pub curves_level_of_detail: u32,
    pub streamlines_seed_spacing: f32,

    /// `[left, top, right, bottom]` of the area in which streamlines are
    /// seeded.
    pub streamlines_seed_viewport: [f32; 4],
    pub streamlines_num_frames: u32,

    /// Emit 4 indices per quad outline instead of 3 per triangle.
    pub wireframe: bool,

    pub u_mode: UMode,

    /// Upper bound for the distance between a spine vertex and its offset
    /// vertices, as a multiple of half the thickness. Joins sharper than
    /// this are cut off. Must be at least 1.
    pub miter_limit: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            curves_level_of_detail: 1,
            streamlines_seed_spacing: 1.0,
            streamlines_seed_viewport: [0.0, 0.0, 1.0, 1.0],
            streamlines_num_frames: 1,
            wireframe: false,
            u_mode: UMode::default(),
            miter_limit: 4.0,
        }
    }
}

impl Config {
    pub fn with_thickness(self, thickness: f32) -> Self {
        Self { thickness, ..self }
    }

    pub fn with_wireframe(self, wireframe: bool) -> Self {
        Self { wireframe, ..self }
    }

    pub fn with_u_mode(self, u_mode: UMode) -> Self {
        Self { u_mode, ..self }
    }

    pub fn with_miter_limit(self, miter_limit: f32) -> Self {
        Self { miter_limit, ..self }
    }

    /// Number of entries in the index buffer per primitive.
    pub fn indices_per_primitive(&self) -> usize {
        IndexLayout::from_wireframe(self.wireframe).indices_per_primitive()
    }

    /// Checks that all values the tessellator depends on are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.thickness > 0.0 && self.thickness.is_finite()) {
            return Err(Error::config(
                format!("thickness must be positive and finite, but is {}", self.thickness),
            ));
        }

        if !(self.miter_limit >= 1.0 && self.miter_limit.is_finite()) {
            return Err(Error::config(
                format!("miter limit must be finite and at least 1, but is {}", self.miter_limit),
            ));
        }

        Ok(())
    }
}
