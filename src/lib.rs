//! Triangulates thick lines.
//!
//! This crate turns zero-width polylines ("spines") into triangulated
//! ribbons of a configurable thickness, ready to be uploaded to the GPU. At
//! every interior vertex, the two adjacent ribbon segments meet in a miter
//! join, so the ribbon has no gaps or overlaps at bends. Besides positions
//! and indices, each output vertex carries an [`Annotation`] with the
//! distance along the spine, the side of the spine and the vector from the
//! spine to the vertex, which shaders can use for texturing and
//! anti-aliasing.
//!
//! ```
//! use streamlines::{Config, Context, SpineList, UMode};
//!
//! let mut ctx = Context::new(Config {
//!     thickness: 0.5,
//!     u_mode: UMode::Distance,
//!     .. Config::default()
//! })?;
//!
//! let mut spines = SpineList::new(false);
//! spines.push_spine(vec![[0.0f32, 0.0], [3.0, 4.0], [6.0, 0.0]]);
//!
//! let mesh = ctx.draw_lines(&spines)?;
//! assert_eq!(mesh.num_vertices(), 6);
//! assert_eq!(mesh.annotations()[5].u_along_curve, 10.0);
//! # Ok::<(), streamlines::Error>(())
//! ```
//!
//! Drawing is single threaded and synchronous. A [`Context`] reuses its
//! output buffers across calls; the returned [`Mesh`] borrows them until the
//! next call.

pub mod buffer;
pub mod config;
pub mod context;
pub mod error;
pub mod math;
pub mod mesh;
pub mod param;
pub mod prelude;
pub mod spine;
pub mod tessellate;

pub use self::{
    config::{Config, UMode},
    context::Context,
    error::{DefectKind, Error, GeometryDefect, Result},
    math::Position,
    mesh::{Annotation, IndexLayout, Mesh, OwnedMesh},
    spine::{FnSource, SpineList, SpineSource},
};
