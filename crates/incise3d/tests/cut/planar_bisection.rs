use super::{plane_cutter, unit_hex};
use approx::assert_relative_eq;
use incise3d::cut::{CutFlags, MeshIntersection, Options};
use incise3d::math::Real;
use incise3d::mesh::Position;
use incise3d::shape::CellShape;

fn bisection_options() -> Options {
    let mut options = Options::default();
    options.flags |= CutFlags::INCLUDE_INNER | CutFlags::STRICT_VOLUME;
    options
}

#[test]
fn hex8_bisected_by_a_plane() {
    let mut intersection = MeshIntersection::with_options(bisection_options());
    let (cids, ccoords) = plane_cutter(0.5);
    let _ = intersection
        .add_cut_side(0, &cids, &ccoords, CellShape::Quad4)
        .unwrap();
    let (nids, ncoords) = unit_hex();
    let _ = intersection
        .add_element(1, &nids, &ncoords, CellShape::Hex8)
        .unwrap();

    let report = intersection.cut().unwrap();
    assert!(report.unresolved.is_empty());
    assert_eq!(report.cut_elements, 1);

    let handle = intersection.element_handle(1).unwrap();
    assert!(handle.is_cut());
    assert_eq!(handle.num_cells(), 2);

    let mut inside_volume = 0.0;
    let mut outside_volume = 0.0;
    for cell in handle.cells() {
        match cell.position() {
            Position::Inside => inside_volume += cell.volume(),
            Position::Outside => outside_volume += cell.volume(),
            other => panic!("cell with unexpected position {other:?}"),
        }
    }
    // the plane z = 0.5 halves the unit cube; the plus domain is above
    assert_relative_eq!(inside_volume, 0.5, epsilon = 1e-9);
    assert_relative_eq!(outside_volume, 0.5, epsilon = 1e-9);
    assert_relative_eq!(handle.cell_volume_sum(), 1.0, epsilon = 1e-9);
}

#[test]
fn bisection_boundary_cells_cover_the_section() {
    let mut intersection = MeshIntersection::with_options(bisection_options());
    let (cids, ccoords) = plane_cutter(0.5);
    let _ = intersection
        .add_cut_side(7, &cids, &ccoords, CellShape::Quad4)
        .unwrap();
    let (nids, ncoords) = unit_hex();
    let _ = intersection
        .add_element(1, &nids, &ncoords, CellShape::Hex8)
        .unwrap();
    let _ = intersection.cut().unwrap();

    let handle = intersection.element_handle(1).unwrap();
    let bcells = handle.boundary_cells();
    // one boundary cell per volume cell, both tessellating the same 1x1
    // section of the cutter side
    assert_eq!(bcells.len(), 2);
    for bc in &bcells {
        assert_eq!(bc.shape(), CellShape::Quad4);
        assert_relative_eq!(bc.area(), 1.0, epsilon = 1e-9);
        assert_eq!(
            handle.mesh().side(bc.cut_side()).external_id(),
            7,
            "boundary cell must know its originating cutter side"
        );
    }
}

#[test]
fn integration_cells_reproduce_the_cell_volumes() {
    let mut intersection = MeshIntersection::with_options(bisection_options());
    let (cids, ccoords) = plane_cutter(0.25);
    let _ = intersection
        .add_cut_side(0, &cids, &ccoords, CellShape::Quad4)
        .unwrap();
    let (nids, ncoords) = unit_hex();
    let _ = intersection
        .add_element(1, &nids, &ncoords, CellShape::Hex8)
        .unwrap();
    let _ = intersection.cut().unwrap();

    let handle = intersection.element_handle(1).unwrap();
    let mut total = 0.0;
    for cell in handle.cells() {
        let tessellated: Real = cell
            .integration_cells()
            .iter()
            .map(|ic| ic.volume().unwrap())
            .sum();
        assert_relative_eq!(tessellated, cell.volume(), epsilon = 1e-9);
        total += tessellated;
    }
    assert_relative_eq!(total, 1.0, epsilon = 1e-9);
}

#[test]
fn dofsets_of_a_bisected_element() {
    let mut intersection = MeshIntersection::with_options(bisection_options());
    let (cids, ccoords) = plane_cutter(0.5);
    let _ = intersection
        .add_cut_side(0, &cids, &ccoords, CellShape::Quad4)
        .unwrap();
    let (nids, ncoords) = unit_hex();
    let _ = intersection
        .add_element(1, &nids, &ncoords, CellShape::Hex8)
        .unwrap();
    let _ = intersection.cut().unwrap();

    // every node touches exactly one volume cell of its own side
    for nid in 0..8 {
        assert_eq!(intersection.node_dofsets(nid), Some(1));
    }
}
