//! The geometry kernel: the few 2D vector operations the tessellator is
//! built from.
//!
//! All functions are generic over the scalar type (see [`PrimitiveFloat`]),
//! but the rest of the crate works with `f32` exclusively, as that's what
//! ends up in GPU buffers. The aliases [`Position`] and [`Offset`] fix the
//! scalar to `f32`.

use std::fmt::Debug;

use cgmath::{
    prelude::*,
    BaseFloat, Point2, Vector2,
};
use num_traits::{Float, FloatConst};




/// A point in the plane. Used for spine vertices as well as for output
/// vertices.
pub type Position = Point2<f32>;

/// A vector from a spine vertex to one of its offset vertices.
pub type Offset = Vector2<f32>;

/// Primitive floating point types, like `f32` and `f64`.
///
/// This trait is automatically implemented for all types that satisfy the
/// super-trait constraints.
pub trait PrimitiveFloat: 'static + Copy + Debug + BaseFloat + FloatConst {}

impl<T> PrimitiveFloat for T
where
    T: 'static + Copy + Debug + BaseFloat + FloatConst,
{}

fn half<S: PrimitiveFloat>() -> S {
    S::one() / (S::one() + S::one())
}

/// A single segment of a spine: its length and its unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<S> {
    pub length: S,
    pub normal: Vector2<S>,
}

impl<S: PrimitiveFloat> Segment<S> {
    /// Computes length and normal of the segment `from -> to`.
    ///
    /// No checks are performed: for a zero-length segment, the normal
    /// contains NaNs. Use [`normal`] if the segment might be degenerate.
    #[inline]
    pub fn between(from: Point2<S>, to: Point2<S>) -> Self {
        let d = to - from;
        let length = d.magnitude();

        Self {
            length,
            normal: Vector2::new(-d.y / length, d.x / length),
        }
    }

    /// Returns `true` if the segment has a positive, finite length.
    pub fn is_proper(&self) -> bool {
        self.length > S::zero() && self.length.is_finite()
    }
}

/// Returns the unit vector perpendicular to the segment `p0 -> p1`.
///
/// The normal is the direction of travel rotated by 90° counter clockwise,
/// i.e. it always points to the left of the segment. Returns `None` if the
/// segment has zero length (or the coordinates are not finite) since the
/// normal is undefined in that case.
pub fn normal<S: PrimitiveFloat>(p0: Point2<S>, p1: Point2<S>) -> Option<Vector2<S>> {
    let segment = Segment::between(p0, p1);
    if segment.is_proper() {
        Some(segment.normal)
    } else {
        None
    }
}

/// Returns the direction of travel that belongs to the given normal. This is
/// the inverse of the rotation performed by [`normal`].
#[inline]
pub fn direction_of<S: PrimitiveFloat>(normal: Vector2<S>) -> Vector2<S> {
    Vector2::new(normal.y, -normal.x)
}

/// Computes the miter join between two consecutive segments with the unit
/// normals `prev` and `next`.
///
/// Returns the unit bisector of both normals and the extent along the
/// bisector such that `vertex ± bisector * extent` lies on both offset edges
/// of a ribbon that is `thickness` wide. The extent is
/// `thickness / (2 * sin(θ))` where `θ = 90° - acos(prev · next) / 2`.
///
/// The extent is not bounded: it grows towards infinity as the turn
/// approaches 180°. For an exact reversal the normals cancel each other out,
/// and the bisector falls back to the direction of travel of `prev`. Use
/// [`miter`] to get a clamped join.
pub fn miter_extent<S: PrimitiveFloat>(
    prev: Vector2<S>,
    next: Vector2<S>,
    thickness: S,
) -> (Vector2<S>, S) {
    // Rounding can push the dot product of two unit vectors slightly outside
    // of [-1, 1], which would make `acos` return NaN.
    let cos = Float::min(Float::max(prev.dot(next), -S::one()), S::one());
    let phi = cos.acos() * half::<S>();
    let theta = S::FRAC_PI_2() - phi;
    let extent = thickness * half::<S>() / theta.sin();

    let sum = prev + next;
    let len = sum.magnitude();
    let bisector = if len > S::epsilon().sqrt() {
        sum / len
    } else {
        direction_of(prev)
    };

    (bisector, extent)
}

/// A miter join with its extent already clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Miter<S> {
    /// The vector from the spine vertex to its left offset vertex. The right
    /// offset vertex is at `-offset`.
    pub offset: Vector2<S>,

    /// Whether the extent had to be reduced to the miter limit.
    pub clamped: bool,
}

/// Like [`miter_extent`], but clamps the extent to `limit` times half the
/// thickness and returns the final offset vector.
pub fn miter<S: PrimitiveFloat>(
    prev: Vector2<S>,
    next: Vector2<S>,
    thickness: S,
    limit: S,
) -> Miter<S> {
    let (bisector, extent) = miter_extent(prev, next, thickness);
    let max_extent = limit * thickness * half::<S>();

    // `!(a <= b)` also catches NaN and infinity.
    if !(extent <= max_extent) {
        Miter { offset: bisector * max_extent, clamped: true }
    } else {
        Miter { offset: bisector * extent, clamped: false }
    }
}

/// The offset of an open spine's end cap: the segment normal scaled to half
/// the thickness.
#[inline]
pub fn cap<S: PrimitiveFloat>(normal: Vector2<S>, thickness: S) -> Vector2<S> {
    normal * (thickness * half::<S>())
}
