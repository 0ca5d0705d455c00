use super::unit_hex;
use incise3d::cut::{CutFlags, LevelSetIntersection, Options};
use incise3d::integrate::IntegrationCell;
use incise3d::math::Real;
use incise3d::mesh::Position;
use incise3d::na::Point3;
use incise3d::shape::CellShape;

fn reference_tet() -> IntegrationCell {
    IntegrationCell::new(
        CellShape::Tet4,
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ],
        Position::Outside,
    )
}

#[test]
fn tet4_cubature_degrees_round_trip() {
    let tet = reference_tet();
    assert_eq!(tet.cubature_degree(CellShape::Hex8).unwrap(), 6);
    assert_eq!(tet.cubature_degree(CellShape::Hex20).unwrap(), 15);
    assert_eq!(tet.cubature_degree(CellShape::Hex27).unwrap(), 15);
    assert_eq!(tet.cubature_degree(CellShape::Tet10).unwrap(), 7);
}

#[test]
fn unsupported_background_shape_is_a_configuration_error() {
    let tet = reference_tet();
    assert!(tet.cubature_degree(CellShape::Quad4).is_err());
}

#[test]
fn generated_cells_carry_the_tabulated_degree() {
    let mut options = Options::default();
    options.flags |= CutFlags::INCLUDE_INNER;
    let mut intersection = LevelSetIntersection::with_options(options);
    let (nids, ncoords) = unit_hex();
    let lsv: Vec<Real> = ncoords.iter().map(|x| x.z - 0.5).collect();
    let _ = intersection
        .add_element(1, &nids, &ncoords, CellShape::Hex8, &lsv, true)
        .unwrap();
    let _ = intersection.cut().unwrap();

    let handle = intersection.element_handle(1).unwrap();
    for cell in handle.cells() {
        assert!(!cell.integration_cells().is_empty());
        for ic in cell.integration_cells() {
            assert_eq!(ic.shape(), CellShape::Tet4);
            assert_eq!(ic.cubature_degree(CellShape::Hex8).unwrap(), 6);
            // the matching reference rule must exist and integrate degree 6
            let rule = ic.gauss_rule(CellShape::Hex8).unwrap();
            assert!(!rule.is_empty());
        }
    }
}
