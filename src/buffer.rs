//! Reusable output storage.
//!
//! A context draws many times over its lifetime, usually once per frame.
//! Instead of allocating new buffers each time, [`MeshBuffers`] keeps its
//! vectors around: they are cleared and resized per call, but never shrink
//! unless explicitly asked to.

use cgmath::prelude::*;

use crate::{
    math::Position,
    mesh::{Annotation, IndexLayout, Mesh},
};


/// Number of elements the buffers can hold without reallocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub vertices: usize,
    pub indices: usize,
}

/// The four parallel per-vertex arrays and the index array of a mesh.
#[derive(Debug, Clone)]
pub struct MeshBuffers {
    pub(crate) positions: Vec<Position>,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) lengths: Vec<f32>,
    pub(crate) indices: Vec<u32>,
    pub(crate) num_triangles: usize,
    pub(crate) layout: IndexLayout,
    pub(crate) num_spines: usize,
    pub(crate) num_clamped_joins: usize,
}

impl MeshBuffers {
    /// Creates empty buffers without allocating.
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            annotations: Vec::new(),
            lengths: Vec::new(),
            indices: Vec::new(),
            num_triangles: 0,
            layout: IndexLayout::Triangles,
            num_spines: 0,
            num_clamped_joins: 0,
        }
    }

    /// Discards the previous contents and resizes all arrays to exactly the
    /// given sizes. The per-vertex arrays get `num_vertices` elements, the
    /// index array gets `num_triangles * layout.indices_per_primitive()`
    /// elements. All elements are zeroed and meant to be overwritten.
    pub fn reset_and_reserve(
        &mut self,
        num_vertices: usize,
        num_triangles: usize,
        layout: IndexLayout,
    ) {
        let num_indices = num_triangles * layout.indices_per_primitive();

        self.positions.clear();
        self.annotations.clear();
        self.lengths.clear();
        self.indices.clear();

        self.positions.resize(num_vertices, Position::origin());
        self.annotations.resize(num_vertices, Annotation::default());
        self.lengths.resize(num_vertices, 0.0);
        self.indices.resize(num_indices, 0);

        self.num_triangles = num_triangles;
        self.layout = layout;
        self.num_spines = 0;
        self.num_clamped_joins = 0;
    }

    /// Empties all arrays, keeping their memory.
    pub fn clear(&mut self) {
        self.reset_and_reserve(0, 0, self.layout);
    }

    pub fn capacity(&self) -> Capacity {
        let vertices = self.positions.capacity()
            .min(self.annotations.capacity())
            .min(self.lengths.capacity());

        Capacity {
            vertices,
            indices: self.indices.capacity(),
        }
    }

    /// Releases memory that isn't needed for the current contents.
    pub fn shrink_to_fit(&mut self) {
        self.positions.shrink_to_fit();
        self.annotations.shrink_to_fit();
        self.lengths.shrink_to_fit();
        self.indices.shrink_to_fit();
    }

    pub fn mesh(&self) -> Mesh<'_> {
        Mesh {
            positions: &self.positions,
            annotations: &self.annotations,
            lengths: &self.lengths,
            indices: &self.indices,
            num_triangles: self.num_triangles,
            layout: self.layout,
            num_spines: self.num_spines,
            num_clamped_joins: self.num_clamped_joins,
        }
    }
}

impl Default for MeshBuffers {
    fn default() -> Self {
        Self::new()
    }
}
