use super::unit_hex;
use approx::assert_relative_eq;
use incise3d::cut::{CutFlags, LevelSetIntersection, Options};
use incise3d::math::Real;
use incise3d::mesh::Position;
use incise3d::shape::CellShape;

fn options() -> Options {
    let mut options = Options::default();
    options.flags |= CutFlags::INCLUDE_INNER | CutFlags::STRICT_VOLUME;
    options
}

fn plane_values(coords: &[incise3d::na::Point3<Real>], z0: Real) -> Vec<Real> {
    coords.iter().map(|x| x.z - z0).collect()
}

#[test]
fn hex8_bisected_by_a_level_set_plane() {
    let mut intersection = LevelSetIntersection::with_options(options());
    let (nids, ncoords) = unit_hex();
    let lsv = plane_values(&ncoords, 0.5);
    let added = intersection
        .add_element(1, &nids, &ncoords, CellShape::Hex8, &lsv, true)
        .unwrap();
    assert!(added.is_some());

    let report = intersection.cut().unwrap();
    assert_eq!(report.cut_elements, 1);

    let handle = intersection.element_handle(1).unwrap();
    assert_eq!(handle.num_cut_cells(), 2);

    let mut volumes = [0.0, 0.0];
    for cell in handle.cells() {
        match cell.position() {
            Position::Inside => volumes[0] += cell.volume(),
            Position::Outside => volumes[1] += cell.volume(),
            other => panic!("unexpected cell position {other:?}"),
        }
    }
    assert_relative_eq!(volumes[0], 0.5, epsilon = 1e-9);
    assert_relative_eq!(volumes[1], 0.5, epsilon = 1e-9);
}

#[test]
fn all_plus_element_is_not_admitted_with_check_lsv() {
    let mut intersection = LevelSetIntersection::with_options(options());
    let (nids, ncoords) = unit_hex();
    // strictly positive values everywhere: no sign change
    let lsv = vec![1.0; 8];
    let added = intersection
        .add_element(1, &nids, &ncoords, CellShape::Hex8, &lsv, true)
        .unwrap();
    assert!(added.is_none());
    assert!(intersection.element_handle(1).is_none());
}

#[test]
fn admitted_but_untouched_element_reports_zero_cut_cells() {
    let mut intersection = LevelSetIntersection::with_options(options());
    let (nids, ncoords) = unit_hex();
    let lsv = vec![2.0; 8];
    let added = intersection
        .add_element(1, &nids, &ncoords, CellShape::Hex8, &lsv, false)
        .unwrap();
    assert!(added.is_some());

    let _ = intersection.cut().unwrap();
    let handle = intersection.element_handle(1).unwrap();
    assert!(!handle.is_cut());
    assert_eq!(handle.num_cut_cells(), 0);
    // the whole-element cell still exists and fills the element
    assert_eq!(handle.num_cells(), 1);
    assert_relative_eq!(handle.cell_volume_sum(), 1.0, epsilon = 1e-9);
}

#[test]
fn all_minus_element_is_admitted_in_plus_domain_mode() {
    let mut opts = options();
    opts.lsv_only_plus_domain = true;
    let mut intersection = LevelSetIntersection::with_options(opts);
    let (nids, ncoords) = unit_hex();
    let lsv = vec![-1.0; 8];
    let added = intersection
        .add_element(1, &nids, &ncoords, CellShape::Hex8, &lsv, true)
        .unwrap();
    assert!(added.is_some());

    let _ = intersection.cut().unwrap();
    let handle = intersection.element_handle(1).unwrap();
    assert!(!handle.is_cut());
    for cell in handle.cells() {
        assert_eq!(cell.position(), Position::Inside);
    }
    // the minus domain carries no dofs
    let mut intersection_dofs = LevelSetIntersection::new();
    let added = intersection_dofs
        .add_element(1, &nids, &ncoords, CellShape::Hex8, &lsv, false)
        .unwrap();
    assert!(added.is_some());
    let _ = intersection_dofs.cut().unwrap();
    for nid in 0..8 {
        assert_eq!(intersection_dofs.node_dofsets(nid), Some(0));
    }
}

fn run_plane_cut(z0: Real) -> (usize, usize, Vec<Real>, Vec<[Real; 3]>) {
    let mut intersection = LevelSetIntersection::with_options(options());
    let (nids, ncoords) = unit_hex();
    let lsv = plane_values(&ncoords, z0);
    let _ = intersection
        .add_element(1, &nids, &ncoords, CellShape::Hex8, &lsv, true)
        .unwrap();
    let _ = intersection.cut().unwrap();

    let mesh = intersection.mesh();
    let handle = intersection.element_handle(1).unwrap();
    let mut volumes: Vec<Real> = handle.cells().map(|c| c.volume()).collect();
    volumes.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut points: Vec<[Real; 3]> = Vec::new();
    for f in mesh.facet_ids() {
        for &p in mesh.facet(f).points() {
            let x = mesh.point(p).coords();
            points.push([x.x, x.y, x.z]);
        }
    }

    let facet_count = mesh.facet_ids().count();
    (handle.num_cells(), facet_count, volumes, points)
}

#[test]
fn cutting_twice_is_idempotent() {
    let first = run_plane_cut(0.3);
    let second = run_plane_cut(0.3);
    assert_eq!(first.0, second.0);
    assert_eq!(first.1, second.1);
    assert_eq!(first.2.len(), second.2.len());
    for (a, b) in first.2.iter().zip(second.2.iter()) {
        assert_eq!(a, b, "cell volumes must reproduce bit for bit");
    }
    // identical facet cycles point-for-point, in identical id order
    assert_eq!(first.3, second.3);
}

#[test]
fn positions_are_consistent_between_points_and_facets() {
    let mut intersection = LevelSetIntersection::with_options(options());
    let (nids, ncoords) = unit_hex();
    let lsv = plane_values(&ncoords, 0.4);
    let _ = intersection
        .add_element(1, &nids, &ncoords, CellShape::Hex8, &lsv, true)
        .unwrap();
    let _ = intersection.cut().unwrap();

    let mesh = intersection.mesh();
    for f in mesh.facet_ids() {
        let facet = mesh.facet(f);
        match facet.position() {
            Position::Inside | Position::Outside => {
                for &p in facet.points() {
                    let pp = mesh.point(p).position();
                    assert!(
                        pp == facet.position() || pp == Position::OnCutSurface,
                        "facet {f} is {:?} but contains a {pp:?} point",
                        facet.position()
                    );
                }
            }
            Position::OnCutSurface => {
                for &p in facet.points() {
                    assert_eq!(mesh.point(p).position(), Position::OnCutSurface);
                }
            }
            Position::Undecided => panic!("facet {f} stayed undecided"),
        }
    }
    for c in mesh.cell_ids() {
        let cell = mesh.cell(c);
        for &f in cell.facets() {
            let fp = mesh.facet(f).position();
            assert!(
                fp == cell.position() || fp == Position::OnCutSurface,
                "cell {c} is {:?} but bounded by a {fp:?} facet",
                cell.position()
            );
        }
    }
}
