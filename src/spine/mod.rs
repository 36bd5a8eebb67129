//! Input polylines ("spines") and the interface of things that produce them.

use failure::Fail;

use crate::{
    config::Config,
    error::{DefectKind, GeometryDefect},
    math::{Position, Segment},
};




/// A list of spines sharing one flat vertex buffer.
///
/// The vertices of all spines are stored consecutively: the first
/// `spine_lengths()[0]` vertices belong to the first spine, the next
/// `spine_lengths()[1]` vertices to the second one, and so on. Either all
/// spines are closed loops or none is.
///
/// ```
/// use streamlines::SpineList;
///
/// let mut spines = SpineList::new(false);
/// spines.push_spine(vec![[0.0f32, 0.0], [2.0, 1.0], [4.0, 0.0]]);
/// spines.push_spine(vec![(0.0f32, 5.0), (4.0, 5.0)]);
///
/// assert_eq!(spines.num_spines(), 2);
/// assert_eq!(spines.num_vertices(), 5);
/// assert!(spines.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpineList {
    vertices: Vec<Position>,
    spine_lengths: Vec<usize>,
    closed: bool,
}

impl SpineList {
    /// Creates an empty spine list.
    pub fn new(closed: bool) -> Self {
        Self {
            vertices: Vec::new(),
            spine_lengths: Vec::new(),
            closed,
        }
    }

    /// Creates a spine list from its raw parts. Nothing is checked here; see
    /// [`SpineList::validate`].
    pub fn from_raw(vertices: Vec<Position>, spine_lengths: Vec<usize>, closed: bool) -> Self {
        Self { vertices, spine_lengths, closed }
    }

    /// Creates a spine list with one spine per item of `spines`.
    pub fn from_spines<I, S, P>(spines: I, closed: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = P>,
        P: Into<Position>,
    {
        let mut out = Self::new(closed);
        for spine in spines {
            out.push_spine(spine);
        }
        out
    }

    /// Appends a spine and returns its length.
    pub fn push_spine<I, P>(&mut self, points: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<Position>,
    {
        let before = self.vertices.len();
        self.vertices.extend(points.into_iter().map(Into::into));
        let len = self.vertices.len() - before;
        self.spine_lengths.push(len);

        len
    }

    /// Removes all spines but keeps the allocated memory.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.spine_lengths.clear();
    }

    pub fn vertices(&self) -> &[Position] {
        &self.vertices
    }

    pub fn spine_lengths(&self) -> &[usize] {
        &self.spine_lengths
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_spines(&self) -> usize {
        self.spine_lengths.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Returns an iterator over the vertices of each spine.
    ///
    /// If the spine lengths add up to more than the number of vertices, the
    /// iterator stops at the first spine that doesn't fit.
    pub fn spines(&self) -> Spines<'_> {
        Spines {
            vertices: &self.vertices,
            lengths: self.spine_lengths.iter(),
        }
    }

    /// Checks that this list can be tessellated and returns the first defect
    /// otherwise.
    ///
    /// A valid list has spine lengths that sum up to the number of vertices,
    /// at least two vertices per spine, only finite coordinates and no
    /// zero-length segments. For closed lists, the implicit segment from the
    /// last vertex of a spine back to its first vertex counts as well.
    pub fn validate(&self) -> Result<(), GeometryDefect> {
        let expected = self.spine_lengths.iter().fold(0usize, |acc, &l| acc.saturating_add(l));
        if expected != self.vertices.len() {
            return Err(GeometryDefect {
                spine: 0,
                vertex: 0,
                kind: DefectKind::CountMismatch { expected, actual: self.vertices.len() },
            });
        }

        for (spine, points) in self.spines().enumerate() {
            let defect = |vertex, kind| GeometryDefect { spine, vertex, kind };

            if points.len() < 2 {
                return Err(defect(0, DefectKind::TooShort(points.len())));
            }

            if let Some(vertex) = points.iter().position(|p| !(p.x.is_finite() && p.y.is_finite())) {
                return Err(defect(vertex, DefectKind::NonFinite));
            }

            let closing = if self.closed {
                Some((points.len() - 1, points[points.len() - 1], points[0]))
            } else {
                None
            };
            let segments = points.windows(2)
                .enumerate()
                .map(|(i, w)| (i, w[0], w[1]))
                .chain(closing);

            for (vertex, from, to) in segments {
                let segment = Segment::between(from, to);
                if segment.length == 0.0 {
                    return Err(defect(vertex, DefectKind::ZeroLengthSegment));
                }
                if !segment.is_proper() {
                    return Err(defect(vertex, DefectKind::NonFinite));
                }
            }
        }

        Ok(())
    }
}

/// Iterator over the spines of a [`SpineList`], see [`SpineList::spines`].
#[derive(Debug, Clone)]
pub struct Spines<'a> {
    vertices: &'a [Position],
    lengths: std::slice::Iter<'a, usize>,
}

impl<'a> Iterator for Spines<'a> {
    type Item = &'a [Position];

    fn next(&mut self) -> Option<Self::Item> {
        let len = *self.lengths.next()?;
        if len > self.vertices.len() {
            self.vertices = &[];
            self.lengths = [].iter();
            return None;
        }

        let (head, tail) = self.vertices.split_at(len);
        self.vertices = tail;
        Some(head)
    }
}


/// Something that produces spines to be tessellated, like a curve flattener
/// or a streamline integrator.
///
/// Producers get to see the context's configuration so they can honor the
/// `curves_*` and `streamlines_*` parameters. The produced list is validated
/// like any other input before it is tessellated; in particular every spine
/// must have at least two vertices.
pub trait SpineSource {
    type Error: Fail;

    fn build_spines(&mut self, config: &Config) -> Result<SpineList, Self::Error>;
}

impl SpineSource for SpineList {
    type Error = std::convert::Infallible;

    fn build_spines(&mut self, _: &Config) -> Result<SpineList, Self::Error> {
        Ok(self.clone())
    }
}

impl SpineSource for &SpineList {
    type Error = std::convert::Infallible;

    fn build_spines(&mut self, _: &Config) -> Result<SpineList, Self::Error> {
        Ok((*self).clone())
    }
}

/// Adapter to use a closure as [`SpineSource`].
///
/// ```
/// use streamlines::{Config, Context, FnSource, SpineList};
///
/// let mut ctx = Context::new(Config::default()).unwrap();
/// let source = FnSource(|config: &Config| {
///     let n = config.curves_level_of_detail as usize + 1;
///     let points = (0..=n).map(|i| [i as f32, (i % 2) as f32]);
///     Ok::<_, std::convert::Infallible>(SpineList::from_spines(vec![points], false))
/// });
///
/// let mesh = ctx.draw_spines_from(source).unwrap();
/// assert_eq!(mesh.num_vertices(), 6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnSource<F>(pub F);

impl<F, E> SpineSource for FnSource<F>
where
    F: FnMut(&Config) -> Result<SpineList, E>,
    E: Fail,
{
    type Error = E;

    fn build_spines(&mut self, config: &Config) -> Result<SpineList, Self::Error> {
        (self.0)(config)
    }
}
