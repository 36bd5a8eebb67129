use std::collections::HashMap;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use cgmath::{prelude::*, Vector2};

use crate::{
    buffer::MeshBuffers,
    config::{Config, UMode},
    mesh::{IndexLayout, Mesh},
};
use super::*;


fn zigzag(closed: bool) -> SpineList {
    SpineList::from_spines(vec![vec![[0.0f32, 0.0], [2.0, 1.0], [4.0, 0.0]]], closed)
}

fn params(config: Config) -> Params {
    Params::from(&config)
}

fn run(spines: &SpineList, config: Config) -> MeshBuffers {
    let mut out = MeshBuffers::new();
    tessellate(spines, &params(config), &mut out).unwrap();
    out
}

/// Counts how many triangles use each edge, identifying vertices by their
/// exact position (so that the closing pair of a loop is the same vertex as
/// the first pair). Returns `(edge, count, is_rung)` where rungs connect a
/// left and a right vertex.
fn edge_usage(mesh: &Mesh<'_>) -> Vec<((u64, u64), usize, bool)> {
    let key = |i: u32| {
        let p = mesh.positions()[i as usize];
        (u64::from(p.x.to_bits()) << 32) | u64::from(p.y.to_bits())
    };
    let side = |i: u32| mesh.annotations()[i as usize].v_across_curve;

    let mut edges: HashMap<(u64, u64), (usize, bool)> = HashMap::new();
    for tri in mesh.primitives() {
        for &(a, b) in &[(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let (ka, kb) = (key(a), key(b));
            let edge = if ka < kb { (ka, kb) } else { (kb, ka) };
            let entry = edges.entry(edge).or_insert((0, side(a) != side(b)));
            entry.0 += 1;
        }
    }

    edges.into_iter().map(|(e, (count, rung))| (e, count, rung)).collect()
}


// ===========================================================================
// ===== Sizes
// ===========================================================================

#[test]
fn spine_sizes() {
    assert_eq!(MeshSize::of_spine(2, false), MeshSize { num_vertices: 4, num_triangles: 2 });
    assert_eq!(MeshSize::of_spine(3, false), MeshSize { num_vertices: 6, num_triangles: 4 });
    assert_eq!(MeshSize::of_spine(3, true), MeshSize { num_vertices: 8, num_triangles: 6 });
    assert_eq!(MeshSize::of_spine(10, true), MeshSize { num_vertices: 22, num_triangles: 20 });
}

#[test]
fn list_sizes() {
    let spines = SpineList::from_spines(
        vec![
            vec![[0.0f32, 0.0], [1.0, 0.0]],
            vec![[0.0, 1.0], [1.0, 1.0], [2.0, 1.0], [3.0, 1.0]],
        ],
        true,
    );

    let size = MeshSize::of(&spines).unwrap();
    assert_eq!(size.num_vertices, (2 * 2 + 2) + (2 * 4 + 2));
    assert_eq!(size.num_triangles, (2 * 1 + 2) + (2 * 3 + 2));
    assert_eq!(size.num_indices(IndexLayout::Triangles), 3 * size.num_triangles);
    assert_eq!(size.num_indices(IndexLayout::Wireframe), 4 * size.num_triangles);
}

#[test]
fn too_many_vertices() {
    let huge = u32::max_value() as usize / 2 + 1;
    let spines = SpineList::from_raw(vec![], vec![huge], false);

    match MeshSize::of(&spines) {
        Err(Error::TooManyVertices { num_vertices, .. }) => {
            assert_eq!(num_vertices, 2 * huge as u64);
        }
        other => panic!("expected TooManyVertices, got {:?}", other),
    }
}

#[test]
fn count_mismatch_is_caught_while_sizing() {
    let spines = SpineList::from_raw(
        vec![Position::new(0.0, 0.0), Position::new(1.0, 0.0)],
        vec![2, 3],
        false,
    );

    let mut out = MeshBuffers::new();
    match tessellate(&spines, &params(Config::default()), &mut out) {
        Err(Error::InvalidSpineGeometry(defect)) => {
            assert_eq!(defect.kind, DefectKind::CountMismatch { expected: 5, actual: 2 });
        }
        other => panic!("expected a count mismatch, got {:?}", other),
    }
    assert!(out.mesh().is_empty());
}


// ===========================================================================
// ===== Geometry
// ===========================================================================

#[test]
fn open_zigzag() {
    let out = run(&zigzag(false), Config::default().with_thickness(3.0));
    let mesh = out.mesh();

    assert_eq!(mesh.num_vertices(), 6);
    assert_eq!(mesh.num_triangles(), 4);
    assert_eq!(mesh.num_clamped_joins(), 0);

    let s5 = 5.0f32.sqrt();
    let p = mesh.positions();

    // Start cap: normal of (0,0)->(2,1) is (-1,2)/√5, scaled by 1.5.
    assert_relative_eq!(p[0], Position::new(-1.5 / s5, 3.0 / s5), epsilon = 1e-6);
    assert_relative_eq!(p[1], Position::new(1.5 / s5, -3.0 / s5), epsilon = 1e-6);

    // The join at (2,1) points straight up, stretched by 1/cos(φ).
    let extent = 1.5 / 0.8f32.sqrt();
    assert_relative_eq!(p[2], Position::new(2.0, 1.0 + extent), epsilon = 1e-5);
    assert_relative_eq!(p[3], Position::new(2.0, 1.0 - extent), epsilon = 1e-5);

    // End cap: normal of (2,1)->(4,0) is (1,2)/√5.
    assert_relative_eq!(p[4], Position::new(4.0 + 1.5 / s5, 3.0 / s5), epsilon = 1e-6);
    assert_relative_eq!(p[5], Position::new(4.0 - 1.5 / s5, -3.0 / s5), epsilon = 1e-6);

    assert_eq!(mesh.indices(), &[0, 1, 2, 2, 1, 3, 2, 3, 4, 4, 3, 5]);
}

#[test]
fn collinear_spine_keeps_half_thickness() {
    let spines = SpineList::from_spines(
        vec![vec![[1.0f32, 1.0], [2.0, 2.0], [3.5, 3.5], [7.0, 7.0], [7.5, 7.5]]],
        false,
    );
    let out = run(&spines, Config::default().with_thickness(2.5));
    let mesh = out.mesh();

    let dir = Vector2::new(1.0f32, 1.0).normalize();
    for (pair, spine) in mesh.positions().chunks(2).zip(spines.vertices()) {
        for p in pair {
            let v = *p - *spine;
            assert_abs_diff_eq!(v.magnitude(), 1.25, epsilon = 1e-5);
            assert_abs_diff_eq!(v.dot(dir), 0.0, epsilon = 1e-5);
        }
    }
}

#[test]
fn joins_touch_both_offset_edges() {
    let spines = SpineList::from_spines(
        vec![vec![[0.0f32, 0.0], [3.0, 0.0], [4.0, 2.0], [1.0, 5.0], [-1.0, 4.0]]],
        false,
    );
    let thickness = 0.75;
    let out = run(&spines, Config::default().with_thickness(thickness));
    let mesh = out.mesh();
    let v = spines.vertices();

    for i in 1..v.len() - 1 {
        let n_prev = math::normal(v[i - 1], v[i]).unwrap();
        let n_next = math::normal(v[i], v[i + 1]).unwrap();
        let offset = mesh.positions()[2 * i] - v[i];

        assert_abs_diff_eq!(offset.dot(n_prev), thickness / 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(offset.dot(n_next), thickness / 2.0, epsilon = 1e-5);
    }
}

#[test]
fn sharp_turns_are_clamped() {
    // Goes right, then comes back almost exactly the same way.
    let spines = SpineList::from_spines(
        vec![vec![[0.0f32, 0.0], [10.0, 0.0], [0.0, 0.01]]],
        false,
    );
    let config = Config::default().with_thickness(2.0).with_miter_limit(3.0);
    let out = run(&spines, config);
    let mesh = out.mesh();

    assert_eq!(mesh.num_clamped_joins(), 1);
    let offset = mesh.positions()[2] - Position::new(10.0, 0.0);
    assert_relative_eq!(offset.magnitude(), 3.0, epsilon = 1e-5);
    assert!(mesh.positions().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
}

#[test]
fn exact_reversal_is_clamped() {
    let spines = SpineList::from_spines(
        vec![vec![[0.0f32, 0.0], [4.0, 0.0], [1.0, 0.0]]],
        false,
    );
    let out = run(&spines, Config::default().with_thickness(1.0));
    let mesh = out.mesh();

    assert_eq!(mesh.num_clamped_joins(), 1);
    assert_relative_eq!(mesh.positions()[2], Position::new(6.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(mesh.positions()[3], Position::new(2.0, 0.0), epsilon = 1e-5);
}


// ===========================================================================
// ===== Annotations and lengths
// ===========================================================================

#[test]
fn annotations_follow_offsets() {
    let spines = zigzag(false);
    let out = run(&spines, Config::default().with_thickness(3.0));
    let mesh = out.mesh();

    for (k, spine) in spines.vertices().iter().enumerate() {
        let left = mesh.annotations()[2 * k];
        let right = mesh.annotations()[2 * k + 1];
        assert_eq!(left.v_across_curve, 1.0);
        assert_eq!(right.v_across_curve, -1.0);

        let l = mesh.positions()[2 * k] - *spine;
        let r = mesh.positions()[2 * k + 1] - *spine;
        assert_relative_eq!(l, Vector2::new(left.spine_to_edge_x, left.spine_to_edge_y), epsilon = 1e-6);
        assert_relative_eq!(r, Vector2::new(right.spine_to_edge_x, right.spine_to_edge_y), epsilon = 1e-6);
    }
}

#[test]
fn raw_distances() {
    let spines = SpineList::from_spines(
        vec![vec![[0.0f32, 0.0], [3.0, 4.0], [3.0, 6.0], [0.0, 6.0]]],
        false,
    );
    let out = run(&spines, Config::default().with_u_mode(UMode::Distance));
    let mesh = out.mesh();

    let us: Vec<_> = mesh.annotations().iter().map(|a| a.u_along_curve).collect();
    assert_eq!(us, vec![0.0, 0.0, 5.0, 5.0, 7.0, 7.0, 10.0, 10.0]);
    assert!(mesh.vertex_lengths().iter().all(|&l| l == 10.0));
}

#[test]
fn lengths_are_per_spine() {
    let spines = SpineList::from_spines(
        vec![
            vec![[0.0f32, 0.0], [3.0, 0.0]],
            vec![[0.0, 5.0], [0.0, 6.0], [0.0, 8.0]],
        ],
        false,
    );
    let out = run(&spines, Config::default());
    assert_eq!(out.mesh().vertex_lengths(), &[3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0]);

    let spines = SpineList::from_spines(
        vec![
            vec![[0.0f32, 0.0], [3.0, 0.0]],
            vec![[0.0, 5.0], [0.0, 6.0], [0.0, 9.0]],
        ],
        false,
    );
    let out = run(&spines, Config::default());
    assert_eq!(&out.mesh().vertex_lengths()[..4], &[3.0; 4]);
    assert_eq!(&out.mesh().vertex_lengths()[4..], &[4.0; 6]);
}

#[test]
fn closed_distances_cover_the_whole_loop() {
    // A 3x4 right triangle, perimeter 12.
    let spines = SpineList::from_spines(
        vec![vec![[0.0f32, 0.0], [3.0, 0.0], [3.0, 4.0]]],
        true,
    );
    let out = run(&spines, Config::default().with_u_mode(UMode::Distance));
    let mesh = out.mesh();

    let us: Vec<_> = mesh.annotations().iter().step_by(2).map(|a| a.u_along_curve).collect();
    assert_eq!(us, vec![0.0, 3.0, 7.0, 12.0]);
    assert!(mesh.vertex_lengths().iter().all(|&l| l == 12.0));
}


// ===========================================================================
// ===== Closed spines and topology
// ===========================================================================

#[test]
fn closed_zigzag() {
    let out = run(&zigzag(true), Config::default().with_thickness(3.0));
    let mesh = out.mesh();

    assert_eq!(mesh.num_vertices(), 8);
    assert_eq!(mesh.num_triangles(), 6);

    let p = mesh.positions();
    assert_eq!(p[0].x.to_bits(), p[6].x.to_bits());
    assert_eq!(p[0].y.to_bits(), p[6].y.to_bits());
    assert_eq!(p[1].x.to_bits(), p[7].x.to_bits());
    assert_eq!(p[1].y.to_bits(), p[7].y.to_bits());
}

#[test]
fn closed_ribbon_is_a_manifold() {
    let spines = SpineList::from_spines(
        vec![vec![[0.0f32, 0.0], [4.0, 0.0], [5.0, 3.0], [2.0, 5.0], [-1.0, 3.0]]],
        true,
    );
    let out = run(&spines, Config::default().with_thickness(0.5));
    let usage = edge_usage(&out.mesh());

    for &(_, count, rung) in &usage {
        if rung {
            assert_eq!(count, 2, "every edge between the two sides is interior");
        } else {
            assert_eq!(count, 1, "edges along the sides are on the boundary");
        }
    }
}

#[test]
fn open_ribbon_has_boundary_caps() {
    let out = run(&zigzag(false), Config::default());
    let usage = edge_usage(&out.mesh());

    let caps = usage.iter().filter(|&&(_, count, rung)| rung && count == 1).count();
    assert_eq!(caps, 2);
    assert!(usage.iter().all(|&(_, count, _)| count == 1 || count == 2));
}

#[test]
fn spines_do_not_share_indices() {
    let spines = SpineList::from_spines(
        vec![
            vec![[0.0f32, 0.0], [1.0, 0.0], [2.0, 0.0]],
            vec![[0.0, 3.0], [1.0, 3.0]],
        ],
        true,
    );
    let out = run(&spines, Config::default());
    let mesh = out.mesh();

    // First spine: 4 pairs (8 vertices), 6 triangles.
    let (first, second) = mesh.indices().split_at(6 * 3);
    assert!(first.iter().all(|&i| i < 8));
    assert!(second.iter().all(|&i| i >= 8 && i < 14));
    assert_eq!(&second[..6], &[8, 9, 10, 10, 9, 11]);
}

#[test]
fn wireframe_outlines_each_triangle() {
    let spines = zigzag(false);
    let filled = run(&spines, Config::default());
    let wire = run(&spines, Config::default().with_wireframe(true));

    let (filled, wire) = (filled.mesh(), wire.mesh());
    assert_eq!(wire.layout(), IndexLayout::Wireframe);
    assert_eq!(wire.indices().len(), 4 * wire.num_triangles());

    for (tri, outline) in filled.primitives().zip(wire.primitives()) {
        assert_eq!(&outline[..3], tri);
        assert_eq!(outline[3], tri[0]);
    }

    assert_eq!(filled.positions(), wire.positions());
    assert_eq!(filled.annotations(), wire.annotations());
    assert_eq!(filled.vertex_lengths(), wire.vertex_lengths());
}

#[test]
fn empty_list() {
    let out = run(&SpineList::new(false), Config::default());
    let mesh = out.mesh();
    assert!(mesh.is_empty());
    assert_eq!(mesh.num_triangles(), 0);
    assert!(mesh.indices().is_empty());
}
