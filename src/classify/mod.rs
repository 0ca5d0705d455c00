//! Position classification: every point, facet and volume cell ends up
//! `Inside`, `Outside` or `OnCutSurface`.
//!
//! Points on the interface are positioned at facet creation. Nodal points are
//! classified directly — from the level-set sign, or from the signed normal
//! distance to the nearest cutter side — and the result is propagated through
//! the point/facet/cell adjacency without ever crossing an interface facet.
//! An ambiguous classification is retried once with a widened tolerance
//! before a [`CutError::Classification`] is reported.

use crate::error::CutError;
use crate::kernel::{element_local_coords, side_local_coords};
use crate::math::{Point3, Real};
use crate::mesh::{CellId, ElementId, Mesh, Position, SideId};
use crate::shape::shape_values;
use crate::utils::tolerances::REFERENCE_TOL;

/// Classifies the nodes of every element from the level-set values and
/// propagates positions through the cut topology.
pub fn classify_level_set(mesh: &mut Mesh, elements: &[ElementId]) -> Result<(), CutError> {
    let node_ids: Vec<_> = mesh.node_ids().collect();
    for n in node_ids {
        let node = mesh.node(n);
        let lsv = node.level_set_value();
        let point = node.point();
        let position = if lsv.abs() <= REFERENCE_TOL {
            Position::OnCutSurface
        } else if lsv > 0.0 {
            Position::Outside
        } else {
            Position::Inside
        };
        mesh.set_point_position(point, position);
    }

    propagate(mesh, elements);
    resolve_undecided_cells(mesh, elements, &LevelSetOracle)
}

/// Classifies the nodes of the cut elements against the explicit cutter
/// sides and propagates positions through the cut topology.
pub fn classify_mesh_cut(mesh: &mut Mesh, elements: &[ElementId]) -> Result<(), CutError> {
    let all_cut_sides = explicit_cut_sides(mesh);
    for &e in elements {
        if mesh.element(e).is_unresolved() {
            continue;
        }
        let corner_nodes: Vec<_> = mesh.element(e).corner_nodes().to_vec();
        let mut candidates: Vec<SideId> = mesh.element(e).candidate_cut_sides.to_vec();
        if candidates.is_empty() {
            // far away from every cutter side: classify against the whole
            // cutter
            candidates = all_cut_sides.clone();
        }
        if candidates.is_empty() {
            continue;
        }
        for n in corner_nodes {
            let point = mesh.node(n).point();
            if mesh.point(point).position().is_decided() {
                continue;
            }
            let x = mesh.point(point).coords();
            if let Some(d) = nearest_signed_distance(mesh, &x, &candidates) {
                let position = if d.abs() <= mesh.snap_tolerance() {
                    Position::OnCutSurface
                } else if d > 0.0 {
                    Position::Outside
                } else {
                    Position::Inside
                };
                mesh.set_point_position(point, position);
            }
        }
    }

    propagate(mesh, elements);
    resolve_undecided_cells(mesh, elements, &MeshCutOracle)
}

fn explicit_cut_sides(mesh: &Mesh) -> Vec<SideId> {
    mesh.side_ids()
        .filter(|&s| mesh.side(s).is_cut_side() && !mesh.side(s).is_level_set())
        .collect()
}

/// Signed distance of `x` to the nearest of the given cutter sides, positive
/// on the outside (the side normals point from inside to outside).
pub(crate) fn nearest_signed_distance(
    mesh: &Mesh,
    x: &Point3<Real>,
    sides: &[SideId],
) -> Option<Real> {
    let mut best: Option<(Real, Real)> = None; // (|d|, d)
    for &s in sides {
        let side = mesh.side(s);
        let shape = side.shape?;
        let nodes = mesh.side_node_coords(s);
        let position = side_local_coords(shape, &nodes, x);
        let (abs_d, d) = if position.within_limits(shape, 0.1) {
            (position.distance.abs(), position.distance)
        } else {
            // projection fell off the side; fall back to the plane through
            // the nearest corner, keeping the normal's sign
            let mut corner_d = Real::MAX;
            for c in &nodes {
                corner_d = corner_d.min((x - c).norm());
            }
            if !position.converged {
                continue;
            }
            (corner_d, position.distance.signum() * corner_d)
        };
        match best {
            Some((b, _)) if b <= abs_d => {}
            _ => best = Some((abs_d, d)),
        }
    }
    best.map(|(_, d)| d)
}

/// One fixpoint sweep: facets learn from their points, points from their
/// facets, volume cells from their facets and vice versa. Interface facets
/// never take part, so positions cannot leak across the interface.
pub(crate) fn propagate(mesh: &mut Mesh, elements: &[ElementId]) {
    let facets: Vec<_> = elements
        .iter()
        .flat_map(|&e| mesh.element(e).facets().to_vec())
        .collect();
    let cells: Vec<CellId> = elements
        .iter()
        .flat_map(|&e| mesh.element(e).cells().to_vec())
        .collect();

    loop {
        let mut changed = false;

        for &f in &facets {
            if mesh.facet(f).on_cut_side() || mesh.facet(f).position().is_decided() {
                continue;
            }
            let points = mesh.facet(f).points().to_vec();
            let decided = points
                .iter()
                .map(|&p| mesh.point(p).position())
                .find(|&p| matches!(p, Position::Inside | Position::Outside));
            if let Some(position) = decided {
                mesh.facet_mut(f).position = position;
                changed = true;
            }
        }

        for &f in &facets {
            let position = mesh.facet(f).position();
            if !matches!(position, Position::Inside | Position::Outside) {
                continue;
            }
            let points = mesh.facet(f).points().to_vec();
            for p in points {
                if !mesh.point(p).position().is_decided() {
                    mesh.set_point_position(p, position);
                    changed = true;
                }
            }
        }

        for &c in &cells {
            if mesh.cell(c).position().is_decided() {
                continue;
            }
            let facet_position = mesh
                .cell(c)
                .facets()
                .iter()
                .map(|&f| mesh.facet(f))
                .filter(|f| !f.on_cut_side())
                .map(|f| f.position())
                .find(|&p| matches!(p, Position::Inside | Position::Outside));
            if let Some(position) = facet_position {
                set_cell_position(mesh, c, position);
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }
}

/// Sets a cell position and pushes it onto the cell's undecided facets.
pub(crate) fn set_cell_position(mesh: &mut Mesh, cell: CellId, position: Position) {
    mesh.cell_mut(cell).position = position;
    let facets = mesh.cell(cell).facets().to_vec();
    for f in facets {
        if !mesh.facet(f).on_cut_side() && !mesh.facet(f).position().is_decided() {
            mesh.facet_mut(f).position = position;
        }
    }
}

trait PositionOracle {
    fn classify(
        &self,
        mesh: &Mesh,
        element: ElementId,
        x: &Point3<Real>,
        tol: Real,
    ) -> Option<Position>;
}

struct LevelSetOracle;

impl PositionOracle for LevelSetOracle {
    fn classify(
        &self,
        mesh: &Mesh,
        element: ElementId,
        x: &Point3<Real>,
        tol: Real,
    ) -> Option<Position> {
        let value = level_set_value_at(mesh, element, x)?;
        if value.abs() <= tol {
            None
        } else if value > 0.0 {
            Some(Position::Outside)
        } else {
            Some(Position::Inside)
        }
    }
}

struct MeshCutOracle;

impl PositionOracle for MeshCutOracle {
    fn classify(
        &self,
        mesh: &Mesh,
        element: ElementId,
        x: &Point3<Real>,
        tol: Real,
    ) -> Option<Position> {
        let mut candidates = mesh.element(element).candidate_cut_sides.to_vec();
        if candidates.is_empty() {
            candidates = explicit_cut_sides(mesh);
        }
        let d = nearest_signed_distance(mesh, x, &candidates)?;
        if d.abs() <= tol {
            None
        } else if d > 0.0 {
            Some(Position::Outside)
        } else {
            Some(Position::Inside)
        }
    }
}

/// Interpolates the nodal level-set values of `element` at the global point
/// `x`.
pub(crate) fn level_set_value_at(
    mesh: &Mesh,
    element: ElementId,
    x: &Point3<Real>,
) -> Option<Real> {
    let shape = mesh.element(element).shape();
    let nodes = mesh.element_node_coords(element);
    let position = element_local_coords(shape, &nodes, x);
    if !position.converged {
        return None;
    }
    let values = shape_values(shape, &position.xi);
    let mut lsv = 0.0;
    for (k, n) in mesh.element(element).nodes().iter().enumerate() {
        lsv += values[k] * mesh.node(*n).level_set_value();
    }
    Some(lsv)
}

fn resolve_undecided_cells(
    mesh: &mut Mesh,
    elements: &[ElementId],
    oracle: &dyn PositionOracle,
) -> Result<(), CutError> {
    let cells: Vec<(ElementId, CellId)> = elements
        .iter()
        .flat_map(|&e| {
            mesh.element(e)
                .cells()
                .iter()
                .map(move |&c| (e, c))
                .collect::<Vec<_>>()
        })
        .collect();

    for (e, c) in cells {
        if mesh.cell(c).position().is_decided() {
            continue;
        }
        let representative = cell_representative(mesh, c);
        let base_tol = mesh.snap_tolerance();

        // tolerance relaxation: one retry with a 10x wider on-surface band
        let mut decided = None;
        for tol in [base_tol, 10.0 * base_tol] {
            if let Some(position) = oracle.classify(mesh, e, &representative, tol) {
                decided = Some(position);
                break;
            }
        }
        match decided {
            Some(position) => {
                set_cell_position(mesh, c, position);
                // another sweep may now decide neighboring entities
                propagate(mesh, elements);
            }
            None => {
                // ambiguous even after the retry: report the element and
                // keep cutting the others
                mesh.mark_unresolved(
                    e,
                    format!(
                        "position of volume cell {c} stayed ambiguous at \
                         ({:.3e}, {:.3e}, {:.3e})",
                        representative.x, representative.y, representative.z
                    ),
                );
            }
        }
    }
    Ok(())
}

/// A representative interior point of a volume cell: the average of all
/// distinct facet points.
pub(crate) fn cell_representative(mesh: &Mesh, cell: CellId) -> Point3<Real> {
    let mut sum = crate::math::Vector::zeros();
    let mut count = 0;
    let mut seen: Vec<crate::mesh::PointId> = Vec::new();
    for &f in mesh.cell(cell).facets() {
        for &p in mesh.facet(f).points() {
            let p = mesh.resolve(p);
            if !seen.contains(&p) {
                seen.push(p);
                sum += mesh.point(p).coords().coords;
                count += 1;
            }
        }
    }
    Point3::from(sum / (count.max(1) as Real))
}
