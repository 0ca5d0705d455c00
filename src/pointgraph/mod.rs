//! Per-face point graphs and their resolution into facet cycles.
//!
//! For every cut face of a background element, the graph's vertices are the
//! face's nodal and intersection points and its edges are the face-boundary
//! segments plus the cut lines crossing the face. The graph is resolved into
//! closed cycles by planar face tracing in the face's 2-D frame; every traced
//! cycle becomes one facet. Cut-side (interface) facets are built separately
//! by chaining each cutter side's lines within one element.

use crate::error::CutError;
use crate::math::{Point2, Point3, Real, Vector};
use crate::mesh::{ElementId, LineId, Mesh, PointId, SideId};
use crate::utils::point_in_poly2d;
use crate::utils::SortedPair;
use ordered_float::OrderedFloat;
use std::collections::{BTreeMap, BTreeSet};

/// The facet cycles of one element face.
#[derive(Debug, Default)]
pub struct FacetCycles {
    /// Closed cycles, counter-clockwise around the face normal handed to
    /// [`side_facet_cycles`].
    pub cycles: Vec<Vec<PointId>>,
    /// Hole cycles nested inside a cycle: `(index into cycles, hole cycle)`.
    pub holes: Vec<(usize, Vec<PointId>)>,
    /// Isolated points inside a cycle: `(index into cycles, point)`.
    pub free_points: Vec<(usize, PointId)>,
}

/// Builds the ordered boundary point cycle of an element side: nodal corner
/// points and edge cut points, walked along the side's edges.
pub fn side_boundary_cycle(mesh: &Mesh, side: SideId) -> Vec<PointId> {
    let side_ref = mesh.side(side);
    let nodes = side_ref.nodes().to_vec();
    let edges = side_ref.edges().to_vec();
    let mut cycle = Vec::new();
    for (k, edge) in edges.iter().enumerate() {
        let from = nodes[k];
        let to = nodes[(k + 1) % nodes.len()];
        let points = mesh.ordered_edge_points(*edge, from, to);
        // the closing point of each edge run is the first of the next
        for p in &points[..points.len() - 1] {
            if cycle.last() != Some(p) {
                cycle.push(*p);
            }
        }
    }
    cycle.dedup();
    cycle
}

/// Resolves the point graph of one element face into facet cycles.
///
/// `normal` must be the face normal pointing out of the element; the returned
/// cycles are counter-clockwise around it. A face whose cut lines cannot be
/// resolved into any cycle is a [`CutError::Topology`].
pub fn side_facet_cycles(
    mesh: &Mesh,
    element: ElementId,
    side: SideId,
    normal: &Vector<Real>,
) -> Result<FacetCycles, CutError> {
    let boundary = side_boundary_cycle(mesh, side);
    let eid = mesh.element(element).external_id();

    let mut graph_edges: BTreeSet<SortedPair<PointId>> = BTreeSet::new();
    for k in 0..boundary.len() {
        let pair = SortedPair::new(boundary[k], boundary[(k + 1) % boundary.len()]);
        let _ = graph_edges.insert(pair);
    }

    let mut has_cut_lines = false;
    for &line in mesh.side(side).cut_lines() {
        let l = mesh.line(line);
        if l.is_cut(element) && l.is_on_side(side) {
            let [p1, p2] = l.points();
            let pair = SortedPair::new(mesh.resolve(p1), mesh.resolve(p2));
            if graph_edges.insert(pair) {
                has_cut_lines = true;
            }
        }
    }

    // free candidates: interface points registered on this side that no
    // graph edge reaches
    let mut candidates: BTreeSet<PointId> = BTreeSet::new();
    for &p in mesh.side(side).cut_points() {
        let p = mesh.resolve(p);
        let on_interface = mesh
            .point(p)
            .cut_sides
            .iter()
            .any(|&s| mesh.side(s).is_cut_side());
        if on_interface {
            let _ = candidates.insert(p);
        }
    }

    if !has_cut_lines {
        let mut result = FacetCycles {
            cycles: vec![boundary.clone()],
            holes: Vec::new(),
            free_points: Vec::new(),
        };
        for p in candidates {
            if !boundary.contains(&p) {
                result.free_points.push((0, p));
            }
        }
        return Ok(result);
    }

    // prune dangling branches; their tips become free points
    let mut degree: BTreeMap<PointId, usize> = BTreeMap::new();
    for pair in &graph_edges {
        let (a, b) = **pair;
        *degree.entry(a).or_insert(0) += 1;
        *degree.entry(b).or_insert(0) += 1;
    }
    loop {
        let dangling: Vec<PointId> = degree
            .iter()
            .filter(|&(_, d)| *d == 1)
            .map(|(&p, _)| p)
            .collect();
        if dangling.is_empty() {
            break;
        }
        for p in dangling {
            let incident: Vec<SortedPair<PointId>> = graph_edges
                .iter()
                .filter(|pair| {
                    let (a, b) = ***pair;
                    a == p || b == p
                })
                .copied()
                .collect();
            for pair in incident {
                let _ = graph_edges.remove(&pair);
                let (a, b) = *pair;
                let other = if a == p { b } else { a };
                *degree.get_mut(&p).expect("degree entry exists") -= 1;
                *degree.get_mut(&other).expect("degree entry exists") -= 1;
            }
            let _ = candidates.insert(p);
        }
    }

    if graph_edges.is_empty() {
        return Err(CutError::Topology {
            element: eid,
            reason: format!("face graph of side {side} lost every edge"),
        });
    }

    let frame = Frame2d::new(mesh, &boundary, normal);
    let coords: BTreeMap<PointId, Point2<Real>> = degree
        .keys()
        .map(|&p| (p, frame.project(&mesh.point(p).coords())))
        .collect();

    // CCW-sorted neighbor rings, ties broken lexicographically
    let mut rings: BTreeMap<PointId, Vec<PointId>> = BTreeMap::new();
    for pair in &graph_edges {
        let (a, b) = **pair;
        rings.entry(a).or_default().push(b);
        rings.entry(b).or_default().push(a);
    }
    for (&p, ring) in rings.iter_mut() {
        let origin = coords[&p];
        ring.sort_by_key(|q| {
            let d = coords[q] - origin;
            (OrderedFloat(d.y.atan2(d.x)), *q)
        });
    }

    // planar face tracing over directed edges
    let mut directed: BTreeSet<(PointId, PointId)> = BTreeSet::new();
    for pair in &graph_edges {
        let (a, b) = **pair;
        let _ = directed.insert((a, b));
        let _ = directed.insert((b, a));
    }

    let mut faces: Vec<(Real, Vec<PointId>)> = Vec::new();
    let mut visited: BTreeSet<(PointId, PointId)> = BTreeSet::new();
    for &start in &directed {
        if visited.contains(&start) {
            continue;
        }
        let mut face = Vec::new();
        let mut current = start;
        loop {
            let _ = visited.insert(current);
            face.push(current.0);
            let (u, v) = current;
            let ring = &rings[&v];
            let idx = ring
                .iter()
                .position(|&w| w == u)
                .expect("incoming edge is in the ring");
            let next = ring[(idx + ring.len() - 1) % ring.len()];
            current = (v, next);
            if current == start {
                break;
            }
            if face.len() > directed.len() {
                return Err(CutError::Topology {
                    element: eid,
                    reason: format!("face tracing on side {side} does not close"),
                });
            }
        }
        let area = signed_area(&face, &coords);
        faces.push((area, face));
    }

    let area_tol = mesh.snap_tolerance() * mesh.snap_tolerance();
    let mut cycles: Vec<Vec<PointId>> = Vec::new();
    for (area, face) in faces {
        if area > area_tol {
            cycles.push(face);
        }
    }
    if cycles.is_empty() {
        return Err(CutError::Topology {
            element: eid,
            reason: format!("no closed facet cycle on side {side}"),
        });
    }

    // nesting: a cycle strictly inside another one is recorded as its hole
    let mut holes = Vec::new();
    let polys: Vec<Vec<Point2<Real>>> = cycles
        .iter()
        .map(|c| c.iter().map(|p| coords[p]).collect())
        .collect();
    for i in 0..cycles.len() {
        for j in 0..cycles.len() {
            if i == j {
                continue;
            }
            if cycles[j].iter().any(|p| cycles[i].contains(p)) {
                continue;
            }
            if point_in_poly2d(&polys[j][0], &polys[i]) {
                holes.push((i, cycles[j].clone()));
            }
        }
    }

    let mut result = FacetCycles {
        cycles,
        holes,
        free_points: Vec::new(),
    };
    for p in candidates {
        if result.cycles.iter().any(|c| c.contains(&p)) {
            continue;
        }
        let xp = frame.project(&mesh.point(p).coords());
        for (i, c) in result.cycles.iter().enumerate() {
            let poly: Vec<Point2<Real>> = c.iter().map(|q| coords.get(q).copied().unwrap_or_else(|| frame.project(&mesh.point(*q).coords()))).collect();
            if point_in_poly2d(&xp, &poly) {
                result.free_points.push((i, p));
                break;
            }
        }
    }
    Ok(result)
}

/// Chains the cut lines of one cutter side within one element into closed
/// cycles. Open chains (cuts running along element edges) are ignored; a
/// fork (a point with more than two incident lines that cannot be paired) is
/// a [`CutError::Topology`].
pub fn chain_lines(
    mesh: &Mesh,
    element: ElementId,
    lines: &[LineId],
) -> Result<Vec<Vec<PointId>>, CutError> {
    let eid = mesh.element(element).external_id();
    let mut adjacency: BTreeMap<PointId, Vec<PointId>> = BTreeMap::new();
    for &line in lines {
        let [p1, p2] = mesh.line(line).points();
        let p1 = mesh.resolve(p1);
        let p2 = mesh.resolve(p2);
        adjacency.entry(p1).or_default().push(p2);
        adjacency.entry(p2).or_default().push(p1);
    }
    for neighbors in adjacency.values_mut() {
        neighbors.sort_unstable();
        neighbors.dedup();
    }

    for (p, neighbors) in &adjacency {
        if neighbors.len() > 2 {
            return Err(CutError::Topology {
                element: eid,
                reason: format!("fork at point {p} while chaining interface lines"),
            });
        }
    }

    let mut used: BTreeSet<SortedPair<PointId>> = BTreeSet::new();
    let mut cycles = Vec::new();

    let starts: Vec<PointId> = adjacency.keys().copied().collect();
    for start in starts {
        if adjacency[&start].len() != 2 {
            continue; // open chain end
        }
        if adjacency[&start]
            .iter()
            .all(|&n| used.contains(&SortedPair::new(start, n)))
        {
            continue;
        }
        let mut cycle = vec![start];
        let mut prev = start;
        let mut current = adjacency[&start][0];
        let _ = used.insert(SortedPair::new(prev, current));
        let mut closed = false;
        while cycle.len() <= adjacency.len() {
            if current == start {
                closed = true;
                break;
            }
            cycle.push(current);
            let neighbors = &adjacency[&current];
            if neighbors.len() != 2 {
                break; // runs into an open end
            }
            let next = if neighbors[0] == prev {
                neighbors[1]
            } else {
                neighbors[0]
            };
            prev = current;
            current = next;
            let _ = used.insert(SortedPair::new(prev, current));
        }
        if closed && cycle.len() >= 3 {
            cycles.push(cycle);
        }
    }
    Ok(cycles)
}

struct Frame2d {
    origin: Point3<Real>,
    e1: Vector<Real>,
    e2: Vector<Real>,
}

impl Frame2d {
    fn new(mesh: &Mesh, boundary: &[PointId], normal: &Vector<Real>) -> Self {
        let origin = mesh.point(boundary[0]).coords();
        let n = normal.normalize();
        let span = mesh.point(boundary[1]).coords() - origin;
        let e1 = (span - n * span.dot(&n)).normalize();
        let e2 = n.cross(&e1);
        Frame2d { origin, e1, e2 }
    }

    fn project(&self, x: &Point3<Real>) -> Point2<Real> {
        let d = x - self.origin;
        Point2::new(d.dot(&self.e1), d.dot(&self.e2))
    }
}

fn signed_area(face: &[PointId], coords: &BTreeMap<PointId, Point2<Real>>) -> Real {
    let mut area = 0.0;
    for i in 0..face.len() {
        let a = coords[&face[i]];
        let b = coords[&face[(i + 1) % face.len()]];
        area += a.x * b.y - b.x * a.y;
    }
    0.5 * area
}
