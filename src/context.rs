//! The long-lived tessellation context.

use log::{debug, warn};

use crate::{
    buffer::{Capacity, MeshBuffers},
    config::Config,
    error::{Error, Result},
    mesh::Mesh,
    spine::{SpineList, SpineSource},
    tessellate::{self, Params},
};


/// Owns the configuration and the output buffers of a tessellator.
///
/// Each draw call overwrites the buffers of the previous call, which is why
/// the returned [`Mesh`] borrows the context. Buffers grow as needed but are
/// reused across calls, so drawing similar amounts of lines every frame
/// doesn't allocate. Dropping the context releases all buffers.
///
/// Contexts are independent of each other: to tessellate on several threads,
/// give each thread its own context.
///
/// ```
/// use streamlines::{Config, Context, SpineList};
///
/// let mut ctx = Context::new(Config { thickness: 3.0, ..Config::default() })?;
/// let spines = SpineList::from_spines(vec![vec![[0.0f32, 0.0], [2.0, 1.0], [4.0, 0.0]]], false);
///
/// let mesh = ctx.draw_lines(&spines)?;
/// assert_eq!(mesh.num_vertices(), 6);
/// assert_eq!(mesh.num_triangles(), 4);
/// # Ok::<(), streamlines::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    config: Config,
    buffers: MeshBuffers,
}

impl Context {
    /// Creates a context after validating `config`.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        debug!(
            "created tessellation context (thickness {}, u-mode {}, wireframe: {})",
            config.thickness,
            config.u_mode,
            config.wireframe,
        );

        Ok(Self {
            config,
            buffers: MeshBuffers::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the configuration. The new configuration is only used if it
    /// is valid; otherwise the old one is kept and an error is returned.
    pub fn set_config(&mut self, config: Config) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Tessellates the given spines into a ribbon mesh.
    ///
    /// The spines are validated first (see [`SpineList::validate`]). On
    /// error, nothing is written and [`Context::mesh`] still returns the
    /// result of the previous call.
    pub fn draw_lines(&mut self, spines: &SpineList) -> Result<Mesh<'_>> {
        spines.validate()?;
        self.tessellate(spines)
    }

    /// Like [`Context::draw_lines`], but skips validating the geometry.
    ///
    /// Only use this for spines that are known to be valid, e.g. because
    /// they were validated before and didn't change. Invalid input doesn't
    /// cause undefined behavior, but the output is unspecified (NaN
    /// positions for zero-length segments) and spines with fewer than two
    /// vertices cause a panic. Spine lengths that don't add up to the number
    /// of vertices are still rejected with
    /// [`Error::InvalidSpineGeometry`].
    pub fn draw_lines_trusted(&mut self, spines: &SpineList) -> Result<Mesh<'_>> {
        self.tessellate(spines)
    }

    /// Lets `source` produce spines with this context's configuration and
    /// tessellates them like [`Context::draw_lines`].
    ///
    /// This is the way to feed curve flatteners or streamline integrators
    /// into the tessellator.
    pub fn draw_spines_from<S: SpineSource>(&mut self, mut source: S) -> Result<Mesh<'_>> {
        let spines = source.build_spines(&self.config)
            .map_err(|e| Error::Source(e.into()))?;
        self.draw_lines(&spines)
    }

    /// Cubic Bézier curves need to be flattened into polylines before they
    /// can be tessellated, which this crate doesn't do. Always returns
    /// [`Error::Unsupported`]; use [`Context::draw_spines_from`] with a
    /// flattening [`SpineSource`] instead.
    pub fn draw_curves_cubic(&mut self, _spines: &SpineList) -> Result<Mesh<'_>> {
        self.unsupported("draw_curves_cubic")
    }

    /// Like [`Context::draw_curves_cubic`], for quadratic curves.
    pub fn draw_curves_quadratic(&mut self, _spines: &SpineList) -> Result<Mesh<'_>> {
        self.unsupported("draw_curves_quadratic")
    }

    /// Streamlines need to be seeded and integrated from the vector field
    /// before they can be tessellated, which this crate doesn't do. Always
    /// returns [`Error::Unsupported`]; use [`Context::draw_spines_from`]
    /// with an integrating [`SpineSource`] instead.
    pub fn draw_streamlines<F>(&mut self, _field: F, _frame_index: u32) -> Result<Mesh<'_>>
    where
        F: FnMut([f32; 2]) -> [f32; 2],
    {
        self.unsupported("draw_streamlines")
    }

    /// Returns the mesh of the last successful draw call (empty if there
    /// was none).
    pub fn mesh(&self) -> Mesh<'_> {
        self.buffers.mesh()
    }

    /// How many vertices and indices fit into the buffers without growing
    /// them.
    pub fn capacity(&self) -> Capacity {
        self.buffers.capacity()
    }

    /// Releases buffer memory not needed by the current mesh. Buffers never
    /// shrink on their own.
    pub fn shrink_buffers(&mut self) {
        self.buffers.shrink_to_fit();
    }

    fn tessellate(&mut self, spines: &SpineList) -> Result<Mesh<'_>> {
        let params = Params::from(&self.config);
        let size = tessellate::tessellate(spines, &params, &mut self.buffers)?;

        let mesh = self.buffers.mesh();
        debug!(
            "tessellated {} spines into {} vertices and {} triangles ({} clamped joins)",
            spines.num_spines(),
            size.num_vertices,
            size.num_triangles,
            mesh.num_clamped_joins(),
        );

        Ok(mesh)
    }

    fn unsupported(&mut self, operation: &'static str) -> Result<Mesh<'_>> {
        warn!("{} is not supported, nothing was drawn", operation);
        Err(Error::Unsupported { operation })
    }
}
