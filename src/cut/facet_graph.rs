//! Volume-cell construction: flood fill over the facet dual graph, facet
//! orientation, and the divergence-theorem cell volumes.

use crate::error::CutError;
use crate::math::{Point3, Real, Vector};
use crate::mesh::{CellId, ElementId, FacetId, Mesh, PointId, Position};
use crate::shape::{jacobian, shape_derivs};
use crate::utils::tolerances::MINIMAL_TOL;
use crate::utils::SortedPair;
use std::collections::{BTreeMap, BTreeSet};

/// Groups the element's facets into volume cells.
///
/// Element-surface facets sharing a boundary segment that no interface facet
/// runs through belong to the same cell; interface facets bound the cells on
/// both of their sides. An uncut element yields the single whole-element
/// cell.
pub fn make_volume_cells(mesh: &mut Mesh, element: ElementId) -> Result<(), CutError> {
    let facets: Vec<FacetId> = mesh.element(element).facets().to_vec();
    if facets.is_empty() {
        return Ok(());
    }
    let (side_facets, cut_facets): (Vec<FacetId>, Vec<FacetId>) = facets
        .iter()
        .copied()
        .partition(|&f| !mesh.facet(f).on_cut_side());

    if cut_facets.is_empty() {
        let _ = mesh.new_cell(element, side_facets, Position::Undecided)?;
        return Ok(());
    }

    // boundary segment -> facets of this element sharing it
    let mut line_map: BTreeMap<SortedPair<PointId>, Vec<FacetId>> = BTreeMap::new();
    for &f in &facets {
        for pair in facet_boundary_pairs(mesh, f) {
            line_map.entry(pair).or_default().push(f);
        }
    }

    let mut assigned: BTreeSet<FacetId> = BTreeSet::new();
    let mut groups: Vec<(Vec<FacetId>, Vec<FacetId>)> = Vec::new(); // (sides, cuts)

    for &seed in &side_facets {
        if assigned.contains(&seed) {
            continue;
        }
        let mut group = Vec::new();
        let mut adjacent_cuts: BTreeSet<FacetId> = BTreeSet::new();
        let mut stack = vec![seed];
        while let Some(f) = stack.pop() {
            if !assigned.insert(f) {
                continue;
            }
            group.push(f);
            for pair in facet_boundary_pairs(mesh, f) {
                let at_line = &line_map[&pair];
                let blocked = at_line
                    .iter()
                    .any(|&g| mesh.facet(g).on_cut_side());
                for &g in at_line {
                    if g == f {
                        continue;
                    }
                    if mesh.facet(g).on_cut_side() {
                        let _ = adjacent_cuts.insert(g);
                    } else if !blocked && !assigned.contains(&g) {
                        stack.push(g);
                    }
                }
            }
        }
        group.sort_unstable();
        groups.push((group, adjacent_cuts.into_iter().collect()));
    }

    // interface facets reachable from no surface facet bound an enclosed
    // region (a bubble fully inside the element)
    let reached: BTreeSet<FacetId> = groups
        .iter()
        .flat_map(|(_, cuts)| cuts.iter().copied())
        .collect();
    let mut leftover: Vec<FacetId> = cut_facets
        .iter()
        .copied()
        .filter(|f| !reached.contains(f))
        .collect();
    leftover.sort_unstable();

    if !leftover.is_empty() {
        let bubbles = connected_components(mesh, &leftover);
        for bubble in bubbles {
            // the enclosed region becomes its own cell...
            let _ = mesh.new_cell(element, bubble.clone(), Position::Undecided)?;
            // ...and also bounds the surrounding cell
            if let Some((_, cuts)) = groups.first_mut() {
                cuts.extend(bubble);
            }
        }
    }

    for (sides, cuts) in groups {
        let mut cell_facets = sides;
        cell_facets.extend(cuts);
        let _ = mesh.new_cell(element, cell_facets, Position::Undecided)?;
    }
    Ok(())
}

fn facet_boundary_pairs(mesh: &Mesh, f: FacetId) -> Vec<SortedPair<PointId>> {
    let facet = mesh.facet(f);
    let mut pairs: Vec<SortedPair<PointId>> = facet.boundary_pairs().collect();
    for &h in facet.holes() {
        pairs.extend(mesh.facet(h).boundary_pairs());
    }
    pairs
}

fn connected_components(mesh: &Mesh, facets: &[FacetId]) -> Vec<Vec<FacetId>> {
    let mut line_map: BTreeMap<SortedPair<PointId>, Vec<FacetId>> = BTreeMap::new();
    for &f in facets {
        for pair in facet_boundary_pairs(mesh, f) {
            line_map.entry(pair).or_default().push(f);
        }
    }
    let mut components = Vec::new();
    let mut seen: BTreeSet<FacetId> = BTreeSet::new();
    for &seed in facets {
        if seen.contains(&seed) {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![seed];
        while let Some(f) = stack.pop() {
            if !seen.insert(f) {
                continue;
            }
            component.push(f);
            for pair in facet_boundary_pairs(mesh, f) {
                for &g in &line_map[&pair] {
                    if !seen.contains(&g) {
                        stack.push(g);
                    }
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }
    components
}

/*
 * Orientation and volumes.
 */

/// The area-weighted normal of a polygon (Newell's method).
pub(crate) fn newell_normal(points: &[Point3<Real>]) -> Vector<Real> {
    let mut n = Vector::zeros();
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        n.x += (a.y - b.y) * (a.z + b.z);
        n.y += (a.z - b.z) * (a.x + b.x);
        n.z += (a.x - b.x) * (a.y + b.y);
    }
    n * 0.5
}

/// Centroid of the element's corner nodes.
pub(crate) fn element_centroid(mesh: &Mesh, element: ElementId) -> Point3<Real> {
    let mut sum = Vector::zeros();
    let corners = mesh.element(element).corner_nodes().to_vec();
    for &n in &corners {
        sum += mesh.node_coords(n).coords;
    }
    Point3::from(sum / corners.len() as Real)
}

fn facet_cycle_coords(mesh: &Mesh, f: FacetId) -> Vec<Point3<Real>> {
    mesh.facet(f)
        .points()
        .iter()
        .map(|&p| mesh.point(p).coords())
        .collect()
}

fn facet_centroid(coords: &[Point3<Real>]) -> Point3<Real> {
    let mut sum = Vector::zeros();
    for c in coords {
        sum += c.coords;
    }
    Point3::from(sum / coords.len() as Real)
}

/// The interface normal at `facet`, pointing from the inside region to the
/// outside region.
///
/// Explicit cutter sides carry this orientation in their node order; the
/// level-set side uses the field gradient at the facet centroid.
pub(crate) fn cutter_normal(
    mesh: &Mesh,
    element: ElementId,
    facet: FacetId,
) -> Result<Vector<Real>, CutError> {
    let side = mesh.facet(facet).parent_side();
    if !mesh.side(side).is_level_set() {
        let coords = mesh.side_node_coords(side);
        return Ok(newell_normal(&coords));
    }

    let shape = mesh.element(element).shape();
    let nodes = mesh.element_node_coords(element);
    let coords = facet_cycle_coords(mesh, facet);
    let centroid = facet_centroid(&coords);
    let local = crate::kernel::element_local_coords(shape, &nodes, &centroid);
    if !local.converged {
        return Err(CutError::Classification {
            element: mesh.element(element).external_id(),
            reason: format!("no local coordinates for the centroid of facet {facet}"),
        });
    }
    let derivs = shape_derivs(shape, &local.xi);
    let mut grad_xi = Vector::zeros();
    for (k, n) in mesh.element(element).nodes().iter().enumerate() {
        let lsv = mesh.node(*n).level_set_value();
        grad_xi += Vector::new(derivs[k][0], derivs[k][1], derivs[k][2]) * lsv;
    }
    let jac = jacobian(shape, &nodes, &local.xi);
    let grad_x = match jac.try_inverse() {
        Some(inv) => inv.transpose() * grad_xi,
        None => {
            return Err(CutError::Classification {
                element: mesh.element(element).external_id(),
                reason: format!("singular jacobian at the centroid of facet {facet}"),
            })
        }
    };
    Ok(grad_x)
}

/// `+1` if the facet's own cycle orientation is outward for `cell`, `-1`
/// otherwise.
pub(crate) fn facet_outward_sign(
    mesh: &Mesh,
    cell: CellId,
    facet: FacetId,
) -> Result<Real, CutError> {
    let coords = facet_cycle_coords(mesh, facet);
    let n_facet = newell_normal(&coords);
    let element = mesh.cell(cell).element();

    let outward = if mesh.facet(facet).on_cut_side() {
        let n_cut = cutter_normal(mesh, element, facet)?;
        match mesh.cell(cell).position() {
            Position::Outside => -n_cut,
            _ => n_cut,
        }
    } else {
        facet_centroid(&coords) - element_centroid(mesh, element)
    };

    Ok(if n_facet.dot(&outward) >= 0.0 { 1.0 } else { -1.0 })
}

// flux of F = x/3 through the polygon fan, signed by the cycle orientation
fn cycle_flux(coords: &[Point3<Real>]) -> Real {
    let mut flux = 0.0;
    for i in 1..coords.len() - 1 {
        flux += coords[0]
            .coords
            .dot(&coords[i].coords.cross(&coords[i + 1].coords))
            / 6.0;
    }
    flux
}

/// Volume of one cell from the divergence theorem over its bounding facets.
pub(crate) fn cell_volume_from_facets(mesh: &Mesh, cell: CellId) -> Result<Real, CutError> {
    let mut volume = 0.0;
    let facets = mesh.cell(cell).facets().to_vec();
    for f in facets {
        let sign = facet_outward_sign(mesh, cell, f)?;
        let coords = facet_cycle_coords(mesh, f);
        let n_facet = newell_normal(&coords);
        let mut flux = cycle_flux(&coords);
        for &h in mesh.facet(f).holes() {
            let hole_coords = facet_cycle_coords(mesh, h);
            let aligned = newell_normal(&hole_coords).dot(&n_facet) > 0.0;
            let hole_flux = cycle_flux(&hole_coords);
            flux -= if aligned { hole_flux } else { -hole_flux };
        }
        volume += sign * flux;
    }
    Ok(volume)
}

/// Computes and stores the volumes of every cell of `element`; a cell with a
/// non-positive volume is a [`CutError::VolumeMismatch`].
pub(crate) fn compute_cell_volumes(
    mesh: &mut Mesh,
    element: ElementId,
    element_volume: Real,
) -> Result<(), CutError> {
    let cells = mesh.element(element).cells().to_vec();
    for c in cells {
        let volume = cell_volume_from_facets(mesh, c)?;
        if volume <= MINIMAL_TOL.max(1e-12 * element_volume) {
            return Err(CutError::VolumeMismatch {
                element: mesh.element(element).external_id(),
                cells: volume,
                element_volume,
            });
        }
        mesh.cell_mut(c).volume = volume;
    }
    Ok(())
}

/// Midpoint-fan triangulation of a facet, creating the midpoint on first use.
///
/// Exact for star-shaped facets, which is what the greedy cycle extraction
/// produces in practice; triangles keep the cycle's orientation.
pub(crate) fn facet_triangulation(
    mesh: &mut Mesh,
    facet: FacetId,
) -> Result<Vec<[PointId; 3]>, CutError> {
    if !mesh.facet(facet).triangulation.is_empty() {
        return Ok(mesh.facet(facet).triangulation.clone());
    }
    let points: Vec<PointId> = mesh.facet(facet).points().to_vec();
    if points.len() == 3 {
        let tri = vec![[points[0], points[1], points[2]]];
        mesh.facet_mut(facet).triangulation = tri.clone();
        return Ok(tri);
    }

    let coords: Vec<Point3<Real>> = points.iter().map(|&p| mesh.point(p).coords()).collect();
    let mid = facet_centroid(&coords);
    let mid_point = mesh.new_point(mid, None, None)?;
    let position = mesh.facet(facet).position();
    if position.is_decided() {
        mesh.set_point_position(mid_point, position);
    }

    let mut triangulation = Vec::with_capacity(points.len());
    if points.contains(&mesh.resolve(mid_point)) {
        // degenerate facet, fall back to a vertex fan
        for i in 1..points.len() - 1 {
            triangulation.push([points[0], points[i], points[i + 1]]);
        }
    } else {
        for i in 0..points.len() {
            triangulation.push([
                mid_point,
                points[i],
                points[(i + 1) % points.len()],
            ]);
        }
    }
    mesh.facet_mut(facet).triangulation = triangulation.clone();
    Ok(triangulation)
}
