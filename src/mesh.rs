//! The tessellation result: vertex positions, per-vertex annotations and
//! the index buffer.

use std::slice::ChunksExact;

use static_assertions::assert_eq_size;

use crate::math::Position;


/// Per-vertex data for shaders, stored next to each output position.
///
/// The layout is fixed (`#[repr(C)]`, four `f32`) so that the annotation
/// buffer can be uploaded to the GPU as is.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Annotation {
    /// Position along the spine, parameterized according to the context's
    /// [`UMode`](crate::UMode).
    pub u_along_curve: f32,

    /// `+1` for the left vertex of a pair, `-1` for the right one.
    pub v_across_curve: f32,

    /// Vector from the spine vertex to this output vertex. Its length is the
    /// actual distance, so it reflects the stretching at miter joins.
    pub spine_to_edge_x: f32,
    pub spine_to_edge_y: f32,
}

assert_eq_size!(Annotation, [f32; 4]);

/// How the index buffer is organized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexLayout {
    /// Three indices per triangle.
    Triangles,

    /// Four indices per triangle, forming a closed outline `[a, b, c, a]`.
    /// Meant to be drawn as line strips or with a geometry shader.
    Wireframe,
}

impl IndexLayout {
    pub fn from_wireframe(wireframe: bool) -> Self {
        if wireframe { IndexLayout::Wireframe } else { IndexLayout::Triangles }
    }

    pub fn indices_per_primitive(&self) -> usize {
        match self {
            IndexLayout::Triangles => 3,
            IndexLayout::Wireframe => 4,
        }
    }
}

/// A view into the buffers of a [`Context`](crate::Context).
///
/// The view borrows the context, so it has to be dropped before the next
/// draw call: each call overwrites the buffers of the previous one. Use
/// [`Mesh::to_owned_mesh`] to keep a result around.
#[derive(Debug, Clone, Copy)]
pub struct Mesh<'a> {
    pub(crate) positions: &'a [Position],
    pub(crate) annotations: &'a [Annotation],
    pub(crate) lengths: &'a [f32],
    pub(crate) indices: &'a [u32],
    pub(crate) num_triangles: usize,
    pub(crate) layout: IndexLayout,
    pub(crate) num_spines: usize,
    pub(crate) num_clamped_joins: usize,
}

impl<'a> Mesh<'a> {
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.num_triangles
    }

    /// Number of spines this mesh was created from.
    pub fn num_spines(&self) -> usize {
        self.num_spines
    }

    /// Number of joins whose miter extent was cut off at the miter limit.
    pub fn num_clamped_joins(&self) -> usize {
        self.num_clamped_joins
    }

    pub fn positions(&self) -> &'a [Position] {
        self.positions
    }

    pub fn annotations(&self) -> &'a [Annotation] {
        self.annotations
    }

    /// Total arc length of the spine each vertex belongs to.
    pub fn vertex_lengths(&self) -> &'a [f32] {
        self.lengths
    }

    pub fn indices(&self) -> &'a [u32] {
        self.indices
    }

    pub fn layout(&self) -> IndexLayout {
        self.layout
    }

    pub fn indices_per_primitive(&self) -> usize {
        self.layout.indices_per_primitive()
    }

    /// Iterates over the index chunks of all primitives (one per triangle).
    pub fn primitives(&self) -> ChunksExact<'a, u32> {
        self.indices.chunks_exact(self.indices_per_primitive())
    }

    /// Returns `true` if nothing was drawn.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Copies all buffers into a mesh that doesn't borrow the context.
    pub fn to_owned_mesh(&self) -> OwnedMesh {
        OwnedMesh {
            positions: self.positions.to_vec(),
            annotations: self.annotations.to_vec(),
            vertex_lengths: self.lengths.to_vec(),
            indices: self.indices.to_vec(),
            num_triangles: self.num_triangles,
            layout: self.layout,
        }
    }
}

/// A tessellation result that owns its buffers. See [`Mesh`] for the
/// meaning of the fields.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedMesh {
    pub positions: Vec<Position>,
    pub annotations: Vec<Annotation>,
    pub vertex_lengths: Vec<f32>,
    pub indices: Vec<u32>,
    pub num_triangles: usize,
    pub layout: IndexLayout,
}

impl OwnedMesh {
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn primitives(&self) -> ChunksExact<'_, u32> {
        self.indices.chunks_exact(self.layout.indices_per_primitive())
    }
}
