//! Tessellation of volume cells into integration cells and of interface
//! facets into boundary cells.

use crate::classify::cell_representative;
use crate::cut::facet_graph::{cutter_normal, facet_triangulation, newell_normal};
use crate::cut::Options;
use crate::error::CutError;
use crate::integrate::IntegrationCell;
use crate::math::{Point3, Real};
use crate::mesh::{BoundaryCell, CellId, ElementId, FacetId, Mesh, PointId};
use crate::quadrature::{cell_area, cubature_degree, GaussRule};
use crate::shape::CellShape;
use smallvec::SmallVec;

const HEX8_TO_TET4: [[usize; 4]; 5] = [
    [0, 1, 3, 4],
    [1, 2, 3, 6],
    [4, 5, 1, 6],
    [6, 7, 3, 4],
    [1, 6, 3, 4],
];

const WEDGE6_TO_TET4: [[usize; 4]; 3] = [[0, 1, 2, 3], [3, 4, 1, 5], [1, 5, 2, 3]];

const PYRAMID5_TO_TET4: [[usize; 4]; 2] = [[0, 1, 3, 4], [1, 2, 3, 4]];

/// Tessellates one volume cell into integration cells.
///
/// The whole-element cell of an uncut element becomes a single cell of the
/// element's corner shape (split into tet4 cells when the matching `gen_*`
/// option is off); a cut cell is tessellated by the centroid fan over its
/// facet triangulations.
pub fn tessellate_cell(
    mesh: &mut Mesh,
    element: ElementId,
    cell: CellId,
    options: &Options,
) -> Result<(), CutError> {
    let position = mesh.cell(cell).position();
    let is_whole_element = mesh
        .cell(cell)
        .facets()
        .iter()
        .all(|&f| !mesh.facet(f).on_cut_side());

    let mut cells: Vec<IntegrationCell> = Vec::new();

    if is_whole_element {
        let shape = mesh.element(element).shape().corner_shape();
        let corners: Vec<Point3<Real>> = mesh
            .element(element)
            .corner_nodes()
            .iter()
            .map(|&n| mesh.node_coords(n))
            .collect();

        let split: Option<&[[usize; 4]]> = match shape {
            CellShape::Hex8 if !options.gen_hex8 => Some(&HEX8_TO_TET4),
            CellShape::Wedge6 if !options.gen_wedge6 => Some(&WEDGE6_TO_TET4),
            CellShape::Pyramid5 if !options.gen_pyramid5 => Some(&PYRAMID5_TO_TET4),
            _ => None,
        };
        match split {
            Some(table) => {
                for tet in table {
                    let points = tet.iter().map(|&k| corners[k]).collect();
                    cells.push(IntegrationCell::new(CellShape::Tet4, points, position));
                }
            }
            None => {
                cells.push(IntegrationCell::new(shape, corners, position));
            }
        }
    } else {
        let apex = cell_representative(mesh, cell);
        let sliver = sliver_volume(mesh, element);
        let facets = mesh.cell(cell).facets().to_vec();
        for f in facets {
            let triangles = facet_triangulation(mesh, f)?;
            for tri in triangles {
                let a = mesh.point(tri[0]).coords();
                let b = mesh.point(tri[1]).coords();
                let c = mesh.point(tri[2]).coords();
                let signed = (b - a).cross(&(c - a)).dot(&(apex - a)) / 6.0;
                if signed.abs() <= sliver {
                    continue;
                }
                let points = if signed > 0.0 {
                    vec![a, b, c, apex]
                } else {
                    vec![a, c, b, apex]
                };
                cells.push(IntegrationCell::new(CellShape::Tet4, points, position));
            }
        }
        if cells.is_empty() {
            return Err(CutError::Topology {
                element: mesh.element(element).external_id(),
                reason: format!("tessellation of cell {cell} produced no integration cell"),
            });
        }
    }

    mesh.cell_mut(cell).integration_cells = cells;
    Ok(())
}

fn sliver_volume(mesh: &Mesh, element: ElementId) -> Real {
    let corners: Vec<Point3<Real>> = mesh
        .element(element)
        .corner_nodes()
        .iter()
        .map(|&n| mesh.node_coords(n))
        .collect();
    let aabb = crate::bounding_volume::Aabb::from_points(&corners);
    let e = aabb.extents();
    1e-12 * e.x.max(e.y).max(e.z).powi(3)
}

/// Builds the boundary cells of every interface facet of `cell`.
///
/// Triangular facets become tri3 cells, quadrilateral ones quad4 cells (or
/// two tri3 cells when `gen_quad4` is off); anything larger is split through
/// the facet triangulation. Boundary-cell cycles are oriented so that their
/// normal points from the inside region to the outside region.
pub fn create_boundary_cells(
    mesh: &mut Mesh,
    element: ElementId,
    cell: CellId,
    options: &Options,
) -> Result<(), CutError> {
    let facets: Vec<FacetId> = mesh
        .cell(cell)
        .facets()
        .iter()
        .copied()
        .filter(|&f| mesh.facet(f).on_cut_side())
        .collect();

    for f in facets {
        let n_cut = cutter_normal(mesh, element, f)?;
        let points = mesh.facet(f).points().to_vec();
        let cut_side = mesh.facet(f).parent_side();

        let mut polygons: Vec<(CellShape, SmallVec<[PointId; 4]>)> = Vec::new();
        if points.len() == 3 {
            polygons.push((CellShape::Tri3, SmallVec::from_slice(&points)));
        } else if points.len() == 4 && options.gen_quad4 {
            polygons.push((CellShape::Quad4, SmallVec::from_slice(&points)));
        } else if points.len() == 4 {
            polygons.push((CellShape::Tri3, SmallVec::from_slice(&points[..3])));
            polygons.push((
                CellShape::Tri3,
                SmallVec::from_slice(&[points[0], points[2], points[3]]),
            ));
        } else {
            for tri in facet_triangulation(mesh, f)? {
                polygons.push((CellShape::Tri3, SmallVec::from_slice(&tri)));
            }
        }

        for (shape, mut cycle) in polygons {
            let mut coords: Vec<Point3<Real>> =
                cycle.iter().map(|&p| mesh.point(p).coords()).collect();
            if newell_normal(&coords).dot(&n_cut) < 0.0 {
                cycle.reverse();
                coords.reverse();
            }
            let area = cell_area(shape, &coords)?;
            if area <= Real::EPSILON * 100.0 {
                continue;
            }
            let rule = GaussRule::reference(shape, cubature_degree(shape, mesh.element(element).shape())?)?;
            let _ = mesh.push_boundary_cell(BoundaryCell {
                shape,
                points: cycle,
                facet: f,
                cell,
                cut_side,
                rule,
                area,
            });
        }
    }

    Ok(())
}
