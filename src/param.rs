//! Rewrites the `u_along_curve` annotation of a freshly tessellated spine
//! according to the configured [`UMode`].

use crate::{
    config::UMode,
    mesh::Annotation,
};


/// Reparameterizes `u_along_curve` of one spine.
///
/// `annotations` are the annotations of exactly one spine, two per vertex
/// pair, with `u_along_curve` holding the raw distance from the start of the
/// spine. `spine_length` is the number of input vertices of the spine and
/// `arc_length` its total length.
pub fn apply(mode: UMode, annotations: &mut [Annotation], spine_length: usize, arc_length: f32) {
    let pairs = annotations.chunks_exact_mut(2).enumerate();

    match mode {
        UMode::Distance => {}
        UMode::NormalizedDistance => {
            for (_, pair) in pairs {
                for a in pair {
                    a.u_along_curve /= arc_length;
                }
            }
        }
        UMode::SegmentIndex => {
            for (i, pair) in pairs {
                for a in pair {
                    a.u_along_curve = i as f32;
                }
            }
        }
        UMode::SegmentFraction => {
            let count = spine_length as f32;
            for (i, pair) in pairs {
                for a in pair {
                    a.u_along_curve = i as f32 / count;
                }
            }
        }
    }
}
