/// Property-based tests for coordinate arrays, generators and transforms

use std::collections::BTreeSet;
use std::f64::consts::TAU;

use approx::assert_relative_eq;
use proptest::prelude::*;
use topos_core::generators::{
    cylindrical_faces, cylindrical_vertices, planar_faces, planar_vertices,
};
use topos_core::{
    CoordinateArray, Displace, Geometry, Mesh, PlaneParams, Rotate, Scale, System, Translate,
    TubeParams, VertexTransform,
};

// =============================================================================
// Strategies
// =============================================================================

/// A Cartesian point at least `0.01` away from the `z` axis.
fn arb_off_axis_point() -> impl Strategy<Value = [f64; 3]> {
    (0.01..100.0f64, 0.0..TAU, -100.0..100.0f64)
        .prop_map(|(r, t, z)| [r * t.cos(), r * t.sin(), z])
}

fn arb_cartesian(max_len: usize) -> impl Strategy<Value = CoordinateArray> {
    prop::collection::vec(arb_off_axis_point(), 1..=max_len).prop_map(CoordinateArray::new_cartesian)
}

/// Cylindrical `(θ, z, r)` rows with `θ` in `(-π, π]` and `r > 0`.
fn arb_cylindrical(max_len: usize) -> impl Strategy<Value = CoordinateArray> {
    let row = (-3.14..3.14f64, -100.0..100.0f64, 0.01..100.0f64).prop_map(|(t, z, r)| [t, z, r]);
    prop::collection::vec(row, 1..=max_len).prop_map(CoordinateArray::new_cylindrical)
}

// =============================================================================
// Coordinate conversions
// =============================================================================

proptest! {
    #[test]
    fn proptest_cartesian_round_trip(vs in arb_cartesian(32)) {
        let back = vs.to_system(System::Cylindrical).to_system(System::Cartesian);
        prop_assert_eq!(back.len(), vs.len());
        for (a, b) in back.data().iter().zip(vs.data()) {
            prop_assert!((a - b).norm() <= 1e-9 * (1.0 + b.norm()));
        }
    }

    #[test]
    fn proptest_cylindrical_round_trip(vs in arb_cylindrical(32)) {
        let back = vs.to_system(System::Cartesian).to_system(System::Cylindrical);
        for (a, b) in back.data().iter().zip(vs.data()) {
            prop_assert!((a[0] - b[0]).abs() < 1e-9);
            prop_assert!((a[1] - b[1]).abs() < 1e-9);
            prop_assert!((a[2] - b[2]).abs() < 1e-9 * (1.0 + b[2]));
        }
    }

    #[test]
    fn proptest_axis_reads_agree_across_systems(vs in arb_cartesian(16)) {
        let cyl = vs.to_system(System::Cylindrical);
        for (a, b) in cyl.r().iter().zip(vs.r()) {
            prop_assert!((a - b).abs() < 1e-9 * (1.0 + b));
        }
        for (a, b) in cyl.x().iter().zip(vs.x()) {
            prop_assert!((a - b).abs() < 1e-9 * (1.0 + b.abs()));
        }
        prop_assert_eq!(cyl.z(), vs.z());
    }
}

// =============================================================================
// Generators
// =============================================================================

proptest! {
    #[test]
    fn proptest_grid_cardinality(n in 1usize..40) {
        let vertices = planar_vertices(n, &PlaneParams::default()).unwrap();
        let faces = planar_faces(n).unwrap();

        prop_assert_eq!(vertices.len(), n * n);
        prop_assert_eq!(faces.len(), (n - 1) * (n - 1));
        prop_assert_eq!(faces.arity(), 4);
        faces.check_bounds(vertices.len()).unwrap();
    }

    #[test]
    fn proptest_face_adjacency_law(n in 2usize..40) {
        for row in planar_faces(n).unwrap().rows() {
            let (ll, lr, ur, ul) = (row[0], row[1], row[2], row[3]);
            prop_assert_eq!(lr - ll, 1);
            prop_assert_eq!(ur - ul, 1);
            prop_assert_eq!(ul - ll, n);
            prop_assert_eq!(ur - lr, n);
        }
    }

    #[test]
    fn proptest_tube_loop_closure(n_theta in 1usize..30, n_z in 1usize..12) {
        let closed = cylindrical_faces(n_theta, n_z, true).unwrap();
        let open = cylindrical_faces(n_theta, n_z, false).unwrap();

        prop_assert_eq!(closed.len(), n_theta * (n_z - 1));
        prop_assert_eq!(open.len(), (n_theta - 1) * (n_z - 1));

        // 1-based: the largest valid index is the vertex count itself.
        if let Some(max) = closed.max_index() {
            prop_assert!(max <= n_theta * n_z);
        }
        closed.check_bounds(n_theta * n_z).unwrap();
    }

    #[test]
    fn proptest_closing_face_shares_band(n_theta in 2usize..30, n_z in 2usize..12) {
        let closed = cylindrical_faces(n_theta, n_z, true).unwrap();
        for (j, band) in closed.indices().chunks(4 * n_theta).enumerate() {
            let last = &band[band.len() - 4..];
            // Closing face joins the last column of the band to its first.
            let expected = [
                (j + 1) * n_theta,
                j * n_theta + 1,
                (j + 1) * n_theta + 1,
                (j + 2) * n_theta,
            ];
            prop_assert_eq!(last, &expected[..]);
        }
    }

    #[test]
    fn proptest_full_turn_theta_range(n_theta in 1usize..64, n_z in 1usize..5) {
        let tube = cylindrical_vertices(n_theta, n_z, &TubeParams::default()).unwrap();
        let thetas = tube.t();

        prop_assert!(thetas.iter().all(|&t| (0.0..TAU).contains(&t)));
        let distinct: BTreeSet<u64> = thetas.iter().map(|t| t.to_bits()).collect();
        prop_assert_eq!(distinct.len(), n_theta);
    }

    #[test]
    fn proptest_partial_turn_includes_endpoint(n_theta in 2usize..64, theta_max in 0.1..6.2f64) {
        let params = TubeParams { theta_max, ..TubeParams::default() };
        let tube = cylindrical_vertices(n_theta, 1, &params).unwrap();
        let thetas = tube.t();
        prop_assert_eq!(thetas[n_theta - 1], theta_max);
        prop_assert_eq!(thetas[0], 0.0);
    }
}

// =============================================================================
// Transforms
// =============================================================================

proptest! {
    #[test]
    fn proptest_transforms_do_not_mutate_source(
        n_theta in 3usize..16,
        n_z in 2usize..6,
        factor in -4.0..4.0f64,
        angle in -3.0..3.0f64,
    ) {
        let tube = Mesh::tube(n_theta, n_z, true).unwrap();
        let before = tube.vertices().unwrap().into_owned();

        let transforms: Vec<Box<dyn VertexTransform>> = vec![
            Box::new(Scale::new().r(factor).z(factor)),
            Box::new(Displace::new().t(angle).x(factor)),
            Box::new(Translate::new(factor, angle, factor)),
            Box::new(Rotate::new(angle, 0.0, angle)),
        ];
        for transform in &transforms {
            let derived = transform.apply(&tube).unwrap();
            prop_assert_eq!(derived.faces(), tube.faces());
            prop_assert_eq!(derived.name(), tube.name());
        }

        let after = tube.vertices().unwrap();
        prop_assert_eq!(before.system(), after.system());
        for (a, b) in before.data().iter().zip(after.data()) {
            for k in 0..3 {
                prop_assert_eq!(a[k].to_bits(), b[k].to_bits());
            }
        }
    }
}

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn plane_of_three() {
    let vertices = planar_vertices(3, &PlaneParams::default()).unwrap();
    let faces = planar_faces(3).unwrap();

    assert_eq!(vertices.len(), 9);
    assert!(vertices.z().iter().all(|&z| z == 0.0));
    assert_eq!(vertices.x().iter().cloned().fold(f64::INFINITY, f64::min), 0.0);
    assert_eq!(vertices.y().iter().cloned().fold(f64::NEG_INFINITY, f64::max), 1.0);

    assert_eq!(faces.len(), 4);
    assert_eq!(faces.row(0), Some(&[1, 2, 5, 4][..]));
}

#[test]
fn unit_x_to_cylindrical() {
    let vs = CoordinateArray::new_cartesian([[1.0, 0.0, 0.0]]);
    let cyl = vs.cylindrical();

    assert_relative_eq!(cyl[0][0], 0.0);
    assert_relative_eq!(cyl[0][1], 0.0);
    assert_relative_eq!(cyl[0][2], 1.0);
}

#[test]
fn origin_angle_is_zero() {
    let vs = CoordinateArray::new_cartesian([[0.0, 0.0, 2.0]]);
    assert_eq!(vs.t(), vec![0.0]);
    assert_eq!(vs.r(), vec![0.0]);
}
