use super::plane_cutter;
use incise3d::cut::{CutFlags, MeshIntersection, Options};
use incise3d::math::Real;
use incise3d::na::Point3;
use incise3d::parallel::{package_cut_state, synchronize, InProcessExchange};
use incise3d::shape::CellShape;

fn column_hex(base_z: Real) -> (Vec<i32>, Vec<Point3<Real>>) {
    let nids: Vec<i32> = if base_z == 0.0 {
        (0..8).collect()
    } else {
        (4..12).collect()
    };
    let coords = vec![
        Point3::new(0.0, 0.0, base_z),
        Point3::new(1.0, 0.0, base_z),
        Point3::new(1.0, 1.0, base_z),
        Point3::new(0.0, 1.0, base_z),
        Point3::new(0.0, 0.0, base_z + 1.0),
        Point3::new(1.0, 0.0, base_z + 1.0),
        Point3::new(1.0, 1.0, base_z + 1.0),
        Point3::new(0.0, 1.0, base_z + 1.0),
    ];
    (nids, coords)
}

fn options() -> Options {
    let mut options = Options::default();
    options.flags |= CutFlags::INCLUDE_INNER;
    options
}

/// Two ranks own one element each of a column of two stacked hexes; the
/// cutter plane at z = 1 is the side shared by both. Both ranks must compute
/// the same cut points and the same dof-set counts for the shared nodes.
fn rank_cut(rank: usize) -> MeshIntersection {
    let mut intersection = MeshIntersection::with_options(options());
    let (cids, ccoords) = plane_cutter(1.0);
    let _ = intersection
        .add_cut_side(42, &cids, &ccoords, CellShape::Quad4)
        .unwrap();
    let (nids, ncoords) = column_hex(if rank == 0 { 0.0 } else { 1.0 });
    let _ = intersection
        .add_element(rank as i32 + 1, &nids, &ncoords, CellShape::Hex8)
        .unwrap();
    let _ = intersection.cut().unwrap();
    intersection
}

#[test]
fn shared_side_is_cut_identically_on_both_ranks() {
    let exchanges = InProcessExchange::for_ranks(2);
    let mut handles = Vec::new();
    for (rank, mut exchange) in exchanges.into_iter().enumerate() {
        handles.push(std::thread::spawn(move || {
            let intersection = rank_cut(rank);
            synchronize(intersection.mesh(), rank, &[42], &mut exchange)
        }));
    }
    for handle in handles {
        handle.join().expect("rank thread panicked").unwrap();
    }
}

#[test]
fn diverging_dofset_counts_are_fatal() {
    let a = rank_cut(0);
    let b = rank_cut(1);

    let mut package_a = package_cut_state(a.mesh(), 0, &[42]);
    let package_b = package_cut_state(b.mesh(), 1, &[42]);

    // tamper with a shared node's count
    for entry in package_a.node_dofsets.iter_mut() {
        if entry.0 == 4 {
            entry.1 += 1;
        }
    }
    let result = incise3d::parallel::verify_agreement(
        &package_a,
        &package_b,
        a.mesh().snap_tolerance(),
    );
    assert!(matches!(
        result,
        Err(incise3d::error::CutError::Consistency { .. })
    ));
}

#[test]
fn agreeing_ranks_pass_verification() {
    let a = rank_cut(0);
    let b = rank_cut(1);
    let package_a = package_cut_state(a.mesh(), 0, &[42]);
    let package_b = package_cut_state(b.mesh(), 1, &[42]);
    incise3d::parallel::verify_agreement(&package_a, &package_b, a.mesh().snap_tolerance())
        .unwrap();
}
