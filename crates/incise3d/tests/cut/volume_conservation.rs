use super::unit_hex;
use approx::assert_relative_eq;
use incise3d::cut::{CutFlags, LevelSetIntersection, Options, VolumeRuleKind};
use incise3d::math::Real;
use incise3d::na::{Point3, Vector3};
use incise3d::shape::CellShape;

fn options() -> Options {
    let mut options = Options::default();
    options.flags |= CutFlags::INCLUDE_INNER | CutFlags::STRICT_VOLUME;
    options
}

fn cut_unit_hex_with(lsv: &[Real], options: Options) -> LevelSetIntersection {
    let mut intersection = LevelSetIntersection::with_options(options);
    let (nids, ncoords) = unit_hex();
    let _ = intersection
        .add_element(1, &nids, &ncoords, CellShape::Hex8, lsv, true)
        .unwrap();
    let _ = intersection.cut().unwrap();
    intersection
}

#[test]
fn random_planes_conserve_the_hex_volume() {
    let mut rng = oorandom::Rand64::new(0x9e3779b97f4a7c15);
    let (_, ncoords) = unit_hex();

    for _ in 0..40 {
        let normal = Vector3::new(
            rng.rand_float() - 0.5,
            rng.rand_float() - 0.5,
            rng.rand_float() - 0.5,
        );
        if normal.norm() < 1e-3 {
            continue;
        }
        let normal = normal.normalize();
        let offset = 0.2 + 0.6 * rng.rand_float();
        let anchor = Point3::new(offset, offset, offset);
        let lsv: Vec<Real> = ncoords
            .iter()
            .map(|x| normal.dot(&(x - anchor)))
            .collect();
        if !(lsv.iter().any(|&v| v > 1e-6) && lsv.iter().any(|&v| v < -1e-6)) {
            continue;
        }

        let intersection = cut_unit_hex_with(&lsv, options());
        let handle = intersection.element_handle(1).unwrap();
        assert_eq!(handle.num_cells(), 2, "a plane bisects the hex in two");
        assert_relative_eq!(handle.cell_volume_sum(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn sphere_cut_conserves_the_hex_volume() {
    let (_, ncoords) = unit_hex();
    // sphere around a corner: a curved, non-planar cut through the element
    let center = Point3::new(0.0, 0.0, 0.0);
    let lsv: Vec<Real> = ncoords.iter().map(|x| (x - center).norm() - 0.8).collect();

    let intersection = cut_unit_hex_with(&lsv, options());
    let handle = intersection.element_handle(1).unwrap();
    assert!(handle.is_cut());
    assert_eq!(handle.num_cells(), 2);
    assert_relative_eq!(handle.cell_volume_sum(), 1.0, epsilon = 1e-9);
}

#[test]
fn direct_divergence_agrees_with_the_facet_volumes() {
    let (_, ncoords) = unit_hex();
    let lsv: Vec<Real> = ncoords.iter().map(|x| x.z - 0.37).collect();

    let mut dd_options = options();
    dd_options.volume_rule = VolumeRuleKind::DirectDivergence;
    let intersection = cut_unit_hex_with(&lsv, dd_options);

    let handle = intersection.element_handle(1).unwrap();
    for cell in handle.cells() {
        let rule = cell.direct_rule().expect("direct rule was requested");
        let weight_sum: Real = rule.points.iter().map(|&(_, w)| w).sum();
        assert_relative_eq!(weight_sum, cell.volume(), epsilon = 1e-9);
        // the rule can also integrate a linear function: z over a slab
        let z_integral: Real = rule.points.iter().map(|&(p, w)| w * p.z).sum();
        let expected = match cell.position() {
            incise3d::mesh::Position::Inside => 0.37 * 0.37 / 2.0,
            _ => (1.0 - 0.37 * 0.37) / 2.0,
        };
        assert_relative_eq!(z_integral, expected, epsilon = 1e-9);
    }
}

#[test]
fn tet4_cut_by_a_plane_conserves_volume() {
    let mut intersection = LevelSetIntersection::with_options(options());
    let coords = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
    ];
    let lsv: Vec<Real> = coords.iter().map(|x| x.z - 0.25).collect();
    let _ = intersection
        .add_element(1, &[0, 1, 2, 3], &coords, CellShape::Tet4, &lsv, true)
        .unwrap();
    let _ = intersection.cut().unwrap();

    let handle = intersection.element_handle(1).unwrap();
    assert_eq!(handle.num_cells(), 2);
    assert_relative_eq!(handle.cell_volume_sum(), 1.0 / 6.0, epsilon = 1e-9);
}

#[test]
fn wedge6_cut_by_a_plane_conserves_volume() {
    let mut intersection = LevelSetIntersection::with_options(options());
    let coords = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    let lsv: Vec<Real> = coords.iter().map(|x| x.z - 0.5).collect();
    let _ = intersection
        .add_element(1, &[0, 1, 2, 3, 4, 5], &coords, CellShape::Wedge6, &lsv, true)
        .unwrap();
    let _ = intersection.cut().unwrap();

    let handle = intersection.element_handle(1).unwrap();
    assert_eq!(handle.num_cells(), 2);
    assert_relative_eq!(handle.cell_volume_sum(), 0.5, epsilon = 1e-9);
}
