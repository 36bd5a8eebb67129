//! The line tessellator: turns spines into mitered ribbons.
//!
//! Every input vertex becomes a *pair* of output vertices, offset to the
//! left and to the right of the spine. Pair `k` of a spine lives at the
//! indices `base + 2k` (left) and `base + 2k + 1` (right). Two consecutive
//! pairs are connected by two triangles. Closed spines get one additional
//! pair at the end which is an exact copy of the first pair, so that the
//! ribbon closes without a seam.

use log::trace;

use crate::{
    buffer::MeshBuffers,
    config::{Config, UMode},
    error::{DefectKind, Error, GeometryDefect, Result},
    math::{self, Offset, Position, Segment},
    mesh::{Annotation, IndexLayout},
    param,
    spine::SpineList,
};


#[cfg(test)]
mod tests;


/// Output sizes of a spine list, computed before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshSize {
    pub num_vertices: usize,
    pub num_triangles: usize,
}

impl MeshSize {
    /// Sizes of the ribbon of a single spine with `spine_length` vertices.
    pub fn of_spine(spine_length: usize, closed: bool) -> Self {
        let pairs = num_pairs(spine_length, closed);
        Self {
            num_vertices: 2 * pairs,
            num_triangles: 2 * pairs.saturating_sub(1),
        }
    }

    /// Sizes of the whole mesh. Fails if the vertices could not be addressed
    /// by `u32` indices or if the spine lengths don't add up to the number
    /// of input vertices.
    pub fn of(spines: &SpineList) -> Result<Self> {
        let mut num_inputs = 0u64;
        let mut num_vertices = 0u64;
        let mut num_triangles = 0u64;
        for &len in spines.spine_lengths() {
            let size = Self::of_spine(len, spines.is_closed());
            num_inputs = num_inputs.saturating_add(len as u64);
            num_vertices = num_vertices.saturating_add(size.num_vertices as u64);
            num_triangles = num_triangles.saturating_add(size.num_triangles as u64);
        }

        let max = u64::from(u32::max_value());
        if num_vertices > max {
            return Err(Error::TooManyVertices { num_vertices, max });
        }

        // Below the vertex limit, so the sum fits into `usize`.
        let expected = num_inputs as usize;
        if expected != spines.num_vertices() {
            let kind = DefectKind::CountMismatch { expected, actual: spines.num_vertices() };
            return Err(GeometryDefect { spine: 0, vertex: 0, kind }.into());
        }

        // Triangles never outnumber vertices, so both fit into `usize` now.
        Ok(Self {
            num_vertices: num_vertices as usize,
            num_triangles: num_triangles as usize,
        })
    }

    pub fn num_indices(&self, layout: IndexLayout) -> usize {
        self.num_triangles * layout.indices_per_primitive()
    }
}

/// Number of output vertex pairs of a spine.
fn num_pairs(spine_length: usize, closed: bool) -> usize {
    if closed { spine_length + 1 } else { spine_length }
}

/// The values of [`Config`] the tessellator works with.
#[derive(Debug, Clone, Copy)]
pub struct Params {
    pub thickness: f32,
    pub miter_limit: f32,
    pub layout: IndexLayout,
    pub u_mode: UMode,
}

impl From<&Config> for Params {
    fn from(config: &Config) -> Self {
        Self {
            thickness: config.thickness,
            miter_limit: config.miter_limit,
            layout: IndexLayout::from_wireframe(config.wireframe),
            u_mode: config.u_mode,
        }
    }
}

/// Tessellates all spines into `out`.
///
/// The spine list is expected to be valid (see [`SpineList::validate`]):
/// this function doesn't check the geometry. Degenerate segments result in
/// NaN positions and spines shorter than two vertices cause a panic. Output
/// sizes and the total vertex count are checked before `out` is touched, so
/// on error the previous contents of `out` are kept.
pub fn tessellate(spines: &SpineList, params: &Params, out: &mut MeshBuffers) -> Result<MeshSize> {
    let size = MeshSize::of(spines)?;
    out.reset_and_reserve(size.num_vertices, size.num_triangles, params.layout);

    let closed = spines.is_closed();
    let mut vertex_base = 0;
    let mut index_base = 0;
    let mut clamped = 0;

    for (spine_idx, points) in spines.spines().enumerate() {
        let spine_size = MeshSize::of_spine(points.len(), closed);
        let vertices = vertex_base..vertex_base + spine_size.num_vertices;
        let indices = index_base..index_base + spine_size.num_indices(params.layout);

        let mut walk = SpineWalk {
            params,
            positions: &mut out.positions[vertices.clone()],
            annotations: &mut out.annotations[vertices.clone()],
            clamped: 0,
        };
        let arc_length = walk.run(points, closed);
        clamped += walk.clamped;

        for l in &mut out.lengths[vertices.clone()] {
            *l = arc_length;
        }

        param::apply(
            params.u_mode,
            &mut out.annotations[vertices.clone()],
            points.len(),
            arc_length,
        );

        // `MeshSize::of` made sure all vertex indices fit into `u32`.
        write_indices(&mut out.indices[indices], vertex_base as u32, params.layout);

        trace!(
            "spine {}: {} vertices, closed: {}, arc length {}",
            spine_idx,
            points.len(),
            closed,
            arc_length,
        );

        vertex_base = vertices.end;
        index_base += spine_size.num_indices(params.layout);
    }

    debug_assert_eq!(vertex_base, size.num_vertices);
    debug_assert_eq!(index_base, size.num_indices(params.layout));
    debug_assert!(out.indices.iter().all(|&i| (i as usize) < size.num_vertices));

    out.num_spines = spines.num_spines();
    out.num_clamped_joins = clamped;

    Ok(size)
}

/// Writes the vertices and annotations of a single spine.
struct SpineWalk<'a> {
    params: &'a Params,
    positions: &'a mut [Position],
    annotations: &'a mut [Annotation],
    clamped: usize,
}

impl SpineWalk<'_> {
    /// Walks the spine once from start to end and returns its arc length
    /// (including the closing segment for closed spines). `u_along_curve`
    /// holds the raw distance afterwards.
    fn run(&mut self, points: &[Position], closed: bool) -> f32 {
        let last = points.len() - 1;
        let first = Segment::between(points[0], points[1]);
        let closing = if closed {
            Some(Segment::between(points[last], points[0]))
        } else {
            None
        };

        let start = match closing {
            Some(closing) => self.join(&closing, &first),
            None => math::cap(first.normal, self.params.thickness),
        };
        self.write_pair(0, points[0], start, 0.0);

        let mut prev = first;
        let mut distance = first.length;
        for i in 1..last {
            let next = Segment::between(points[i], points[i + 1]);
            let offset = self.join(&prev, &next);
            self.write_pair(i, points[i], offset, distance);

            distance += next.length;
            prev = next;
        }

        let end = match closing {
            Some(closing) => self.join(&prev, &closing),
            None => math::cap(prev.normal, self.params.thickness),
        };
        self.write_pair(last, points[last], end, distance);

        if let Some(closing) = closing {
            distance += closing.length;

            // The closing pair duplicates the first one bit for bit, only the
            // distance differs.
            let k = last + 1;
            self.positions[2 * k] = self.positions[0];
            self.positions[2 * k + 1] = self.positions[1];
            self.annotations[2 * k] = self.annotations[0];
            self.annotations[2 * k + 1] = self.annotations[1];
            self.annotations[2 * k].u_along_curve = distance;
            self.annotations[2 * k + 1].u_along_curve = distance;
        }

        distance
    }

    fn join(&mut self, prev: &Segment<f32>, next: &Segment<f32>) -> Offset {
        let miter = math::miter(
            prev.normal,
            next.normal,
            self.params.thickness,
            self.params.miter_limit,
        );
        if miter.clamped {
            self.clamped += 1;
        }

        miter.offset
    }

    fn write_pair(&mut self, k: usize, spine: Position, offset: Offset, distance: f32) {
        self.positions[2 * k] = spine + offset;
        self.positions[2 * k + 1] = spine - offset;

        self.annotations[2 * k] = Annotation {
            u_along_curve: distance,
            v_across_curve: 1.0,
            spine_to_edge_x: offset.x,
            spine_to_edge_y: offset.y,
        };
        self.annotations[2 * k + 1] = Annotation {
            u_along_curve: distance,
            v_across_curve: -1.0,
            spine_to_edge_x: -offset.x,
            spine_to_edge_y: -offset.y,
        };
    }
}

/// Fills the index buffer of one spine: two triangles between every two
/// consecutive vertex pairs. `indices` must be exactly as long as the
/// spine's share of the index buffer.
fn write_indices(indices: &mut [u32], base: u32, layout: IndexLayout) {
    let per_quad = 2 * layout.indices_per_primitive();

    for (k, quad) in (1u32..).zip(indices.chunks_exact_mut(per_quad)) {
        let prev_left = base + 2 * (k - 1);
        let prev_right = prev_left + 1;
        let left = base + 2 * k;
        let right = left + 1;

        match layout {
            IndexLayout::Triangles => quad.copy_from_slice(&[
                prev_left, prev_right, left,
                left, prev_right, right,
            ]),
            IndexLayout::Wireframe => quad.copy_from_slice(&[
                prev_left, prev_right, left, prev_left,
                left, prev_right, right, left,
            ]),
        }
    }
}
