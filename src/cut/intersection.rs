//! The cut drivers: [`MeshIntersection`] for explicit boundary-mesh cutters
//! and [`LevelSetIntersection`] for implicit scalar fields.
//!
//! Both run the same pass over the background mesh: find cut points, build
//! cut lines, resolve facets, group volume cells, classify positions, check
//! volumes, generate integration rules and count nodal dof-sets. Topology
//! failures mark the affected element unresolved and the pass continues;
//! configuration errors abort the pass.

use crate::bounding_volume::Aabb;
use crate::classify;
use crate::cut::element_handle::ElementHandle;
use crate::cut::facet_graph;
use crate::cut::{CutFlags, Options};
use crate::error::CutError;
use crate::kernel::{intersect_edge_side, level_set_edge_roots, IntersectionStatus};
use crate::math::{Point3, Real, Vector};
use crate::mesh::{ElementId, Mesh, NodeId, PointId, SideId};
use crate::parallel;
use crate::pointgraph;
use crate::quadrature::cell_volume;
use crate::shape::CellShape;
use crate::utils::tolerances::REFERENCE_TOL;

/// Summary of one cut pass.
#[derive(Clone, Debug, Default)]
pub struct CutReport {
    /// Number of background elements in the pass.
    pub elements: usize,
    /// Number of elements actually crossed by the interface.
    pub cut_elements: usize,
    /// Total number of volume cells.
    pub cells: usize,
    /// External ids of elements whose cut could not be resolved.
    pub unresolved: Vec<i32>,
    /// `(element id, cell volume sum, element volume)` of elements that
    /// failed the conservation check in non-strict mode.
    pub volume_warnings: Vec<(i32, Real, Real)>,
}

/// Cuts a background mesh with an explicit boundary surface mesh.
pub struct MeshIntersection {
    mesh: Mesh,
    options: Options,
}

impl MeshIntersection {
    /// Creates a driver with default options.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Creates a driver with explicit options.
    pub fn with_options(options: Options) -> Self {
        MeshIntersection {
            mesh: Mesh::new(),
            options,
        }
    }

    /// Registers one cutter side. Node ids live in the cutter mesh's own id
    /// space; the node cycle must be oriented so that its right-hand normal
    /// points from the inside region to the outside region.
    pub fn add_cut_side(
        &mut self,
        sid: i32,
        node_ids: &[i32],
        coords: &[Point3<Real>],
        shape: CellShape,
    ) -> Result<SideId, CutError> {
        for (nid, x) in node_ids.iter().zip(coords.iter()) {
            let _ = self.mesh.get_cut_node(*nid, *x)?;
        }
        self.mesh.add_cut_side(sid, node_ids, shape)
    }

    /// Registers one background element.
    pub fn add_element(
        &mut self,
        eid: i32,
        node_ids: &[i32],
        coords: &[Point3<Real>],
        shape: CellShape,
    ) -> Result<ElementId, CutError> {
        for (nid, x) in node_ids.iter().zip(coords.iter()) {
            let _ = self.mesh.get_node(*nid, *x, 0.0)?;
        }
        self.mesh.create_element(eid, node_ids, shape)
    }

    /// Runs the cut pass.
    pub fn cut(&mut self) -> Result<CutReport, CutError> {
        let elements: Vec<ElementId> = self.mesh.element_ids().collect();

        find_candidate_sides(&mut self.mesh);
        for &e in &elements {
            if let Err(err) = find_mesh_cut_points(&mut self.mesh, e) {
                handle_element_error(&mut self.mesh, e, err)?;
            }
        }
        for &e in &elements {
            if self.mesh.element(e).is_unresolved() {
                continue;
            }
            if let Err(err) = find_mesh_cut_lines(&mut self.mesh, e) {
                handle_element_error(&mut self.mesh, e, err)?;
            }
        }

        finish_cut(&mut self.mesh, &self.options, false, &elements)
    }

    /// The mesh of this pass.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// The cut state of one background element.
    pub fn element_handle(&self, eid: i32) -> Option<ElementHandle<'_>> {
        let id = self.mesh.element_by_external_id(eid)?;
        Some(ElementHandle::new(&self.mesh, id))
    }

    /// Number of independent dof-sets a background node must carry.
    pub fn node_dofsets(&self, nid: i32) -> Option<u32> {
        let n = self.mesh.node_by_external_id(nid)?;
        Some(self.mesh.node(n).dofsets())
    }
}

impl Default for MeshIntersection {
    fn default() -> Self {
        Self::new()
    }
}

/// Cuts a background mesh with the zero level set of a nodal scalar field.
pub struct LevelSetIntersection {
    mesh: Mesh,
    options: Options,
    side: SideId,
}

impl LevelSetIntersection {
    /// Creates a driver with default options.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Creates a driver with explicit options.
    pub fn with_options(options: Options) -> Self {
        let mut mesh = Mesh::new();
        let side = mesh.add_level_set_side(1);
        LevelSetIntersection {
            mesh,
            options,
            side,
        }
    }

    /// Registers one background element with its nodal level-set values.
    ///
    /// With `check_lsv` the element is admitted only if its values change
    /// sign (or, with `lsv_only_plus_domain`, if it reaches into the minus
    /// domain, since such elements must not carry dofs). Returns the element
    /// id when the element was admitted.
    pub fn add_element(
        &mut self,
        eid: i32,
        node_ids: &[i32],
        coords: &[Point3<Real>],
        shape: CellShape,
        lsv: &[Real],
        check_lsv: bool,
    ) -> Result<Option<ElementId>, CutError> {
        debug_assert_eq!(node_ids.len(), lsv.len());

        let mut ltz = false;
        let mut gtz = false;
        if check_lsv {
            for &v in lsv {
                if v <= REFERENCE_TOL {
                    ltz = true;
                }
                if v >= -REFERENCE_TOL {
                    gtz = true;
                }
            }
        }

        if !check_lsv || (ltz && gtz) || (self.options.lsv_only_plus_domain && ltz) {
            for ((nid, x), v) in node_ids.iter().zip(coords.iter()).zip(lsv.iter()) {
                let _ = self.mesh.get_node(*nid, *x, *v)?;
            }
            return self.mesh.create_element(eid, node_ids, shape).map(Some);
        }
        Ok(None)
    }

    /// Runs the cut pass.
    pub fn cut(&mut self) -> Result<CutReport, CutError> {
        let elements: Vec<ElementId> = self.mesh.element_ids().collect();
        let side = self.side;

        for &e in &elements {
            if let Err(err) = find_level_set_cut_points(&mut self.mesh, e, side) {
                handle_element_error(&mut self.mesh, e, err)?;
            }
        }
        for &e in &elements {
            if self.mesh.element(e).is_unresolved() {
                continue;
            }
            if let Err(err) = find_level_set_cut_lines(&mut self.mesh, e, side) {
                handle_element_error(&mut self.mesh, e, err)?;
            }
        }

        finish_cut(&mut self.mesh, &self.options, true, &elements)
    }

    /// The mesh of this pass.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// The cut state of one background element.
    pub fn element_handle(&self, eid: i32) -> Option<ElementHandle<'_>> {
        let id = self.mesh.element_by_external_id(eid)?;
        Some(ElementHandle::new(&self.mesh, id))
    }

    /// Number of independent dof-sets a background node must carry.
    pub fn node_dofsets(&self, nid: i32) -> Option<u32> {
        let n = self.mesh.node_by_external_id(nid)?;
        Some(self.mesh.node(n).dofsets())
    }
}

impl Default for LevelSetIntersection {
    fn default() -> Self {
        Self::new()
    }
}

/*
 * Shared pipeline.
 */

fn handle_element_error(mesh: &mut Mesh, e: ElementId, err: CutError) -> Result<(), CutError> {
    if err.is_fatal() {
        return Err(err);
    }
    mesh.mark_unresolved(e, err.to_string());
    Ok(())
}

fn finish_cut(
    mesh: &mut Mesh,
    options: &Options,
    level_set: bool,
    elements: &[ElementId],
) -> Result<CutReport, CutError> {
    let mut report = CutReport {
        elements: elements.len(),
        ..CutReport::default()
    };

    for &e in elements {
        if mesh.element(e).is_unresolved() {
            continue;
        }
        let result = build_facets(mesh, e).and_then(|_| facet_graph::make_volume_cells(mesh, e));
        if let Err(err) = result {
            handle_element_error(mesh, e, err)?;
        }
    }

    if !options.flags.contains(CutFlags::FIND_POSITIONS) {
        // geometric decomposition only: cut-facet orientation (and with it
        // volumes, rules and dof-sets) needs resolved positions
        for &e in elements {
            let element = mesh.element(e);
            if element.is_unresolved() {
                report.unresolved.push(element.external_id());
            } else {
                report.cells += element.cells().len();
            }
        }
        return Ok(report);
    }

    if level_set {
        classify::classify_level_set(mesh, elements)?;
    } else {
        classify::classify_mesh_cut(mesh, elements)?;
    }

    for &e in elements {
        if mesh.element(e).is_unresolved() {
            continue;
        }
        let nominal = element_nominal_volume(mesh, e)?;
        if let Err(err) = facet_graph::compute_cell_volumes(mesh, e, nominal) {
            if options.strict() || err.is_fatal() {
                return Err(err);
            }
            handle_element_error(mesh, e, err)?;
        }
    }

    for &e in elements {
        if mesh.element(e).is_unresolved() {
            continue;
        }
        match crate::integrate::create_cell_rules(mesh, e, options) {
            Ok(()) => {}
            Err(err) => handle_element_error(mesh, e, err)?,
        }
    }

    if options.flags.contains(CutFlags::CHECK_VOLUMES) {
        for &e in elements {
            if mesh.element(e).is_unresolved() {
                continue;
            }
            let nominal = element_nominal_volume(mesh, e)?;
            let sum: Real = mesh.element(e).cells().iter().map(|&c| mesh.cell(c).volume()).sum();
            if (sum - nominal).abs() > crate::utils::tolerances::VOLUME_TOL * nominal {
                let err = CutError::VolumeMismatch {
                    element: mesh.element(e).external_id(),
                    cells: sum,
                    element_volume: nominal,
                };
                if options.strict() {
                    return Err(err);
                }
                log::warn!("{err}");
                report
                    .volume_warnings
                    .push((mesh.element(e).external_id(), sum, nominal));
            }
        }
    }

    parallel::find_nodal_dofsets(mesh, options.flags.contains(CutFlags::INCLUDE_INNER));

    for &e in elements {
        let element = mesh.element(e);
        if element.is_unresolved() {
            report.unresolved.push(element.external_id());
        } else {
            report.cells += element.cells().len();
            if element
                .facets()
                .iter()
                .any(|&f| mesh.facet(f).on_cut_side())
            {
                report.cut_elements += 1;
            }
        }
    }
    Ok(report)
}

/// Nominal volume of the element's linearized (corner) geometry — the
/// reference value of the conservation check.
fn element_nominal_volume(mesh: &Mesh, e: ElementId) -> Result<Real, CutError> {
    let shape = mesh.element(e).shape().corner_shape();
    let corners: Vec<Point3<Real>> = mesh
        .element(e)
        .corner_nodes()
        .iter()
        .map(|&n| mesh.node_coords(n))
        .collect();
    cell_volume(shape, &corners)
}

/// The outward normal of one element side.
fn side_outward_normal(mesh: &Mesh, element: ElementId, side: SideId) -> Vector<Real> {
    let coords = mesh.side_node_coords(side);
    let n = facet_graph::newell_normal(&coords);
    let mut centroid = Vector::zeros();
    for c in &coords {
        centroid += c.coords;
    }
    centroid /= coords.len() as Real;
    let to_side = Point3::from(centroid) - facet_graph::element_centroid(mesh, element);
    if n.dot(&to_side) >= 0.0 {
        n
    } else {
        -n
    }
}

/// Builds the element-side facets and the interface facets of one element.
fn build_facets(mesh: &mut Mesh, element: ElementId) -> Result<(), CutError> {
    let sides = mesh.element(element).sides().to_vec();
    let mut facets = Vec::new();

    for side in sides {
        let normal = side_outward_normal(mesh, element, side);
        let cycles = pointgraph::side_facet_cycles(mesh, element, side, &normal)?;

        let mut created = Vec::with_capacity(cycles.cycles.len());
        for cycle in &cycles.cycles {
            let f = mesh.new_facet(cycle.clone(), side, false);
            created.push(f);
            if !facets.contains(&f) {
                facets.push(f);
            }
        }
        for (owner, hole) in &cycles.holes {
            let h = mesh.new_facet(hole.clone(), side, false);
            mesh.add_facet_hole(created[*owner], h);
        }
        for (owner, p) in &cycles.free_points {
            mesh.add_facet_free_point(created[*owner], *p);
        }
    }

    // one interface facet per closed line cycle of each cutter side
    let mut cut_sides: Vec<SideId> = Vec::new();
    for &line in collect_element_lines(mesh, element).iter() {
        let side = mesh.line(line).cut_side();
        if !cut_sides.contains(&side) {
            cut_sides.push(side);
        }
    }
    cut_sides.sort_unstable();

    for side in cut_sides {
        let lines: Vec<_> = collect_element_lines(mesh, element)
            .into_iter()
            .filter(|&l| mesh.line(l).cut_side() == side)
            .collect();
        let cycles = pointgraph::chain_lines(mesh, element, &lines)?;
        for cycle in cycles {
            // a cutter side coinciding with an element face is a touch, not
            // a cut: the face facet already covers it
            if facets.iter().any(|&sf| mesh.facet(sf).equals_cycle(&cycle)) {
                log::debug!("interface cycle coincides with an element face, skipping");
                continue;
            }
            let f = mesh.new_facet(cycle, side, true);
            if !facets.contains(&f) {
                facets.push(f);
            }
        }
    }

    mesh.element_mut(element).facets = facets;
    Ok(())
}

fn collect_element_lines(mesh: &Mesh, element: ElementId) -> Vec<crate::mesh::LineId> {
    let mut lines = Vec::new();
    for side in mesh.element(element).sides() {
        for &l in mesh.side(*side).cut_lines() {
            if mesh.line(l).is_cut(element) && !lines.contains(&l) {
                lines.push(l);
            }
        }
    }
    // interior lines (along cutter edges) are registered on the cutter side
    // only
    for &e in &mesh.element(element).candidate_cut_sides {
        for &l in mesh.side(e).cut_lines() {
            if mesh.line(l).is_cut(element) && !lines.contains(&l) {
                lines.push(l);
            }
        }
    }
    lines.sort_unstable();
    lines
}

/*
 * Mesh-cutter specific steps.
 */

fn find_candidate_sides(mesh: &mut Mesh) {
    let cut_sides: Vec<SideId> = mesh
        .side_ids()
        .filter(|&s| mesh.side(s).is_cut_side() && !mesh.side(s).is_level_set())
        .collect();
    let side_boxes: Vec<(SideId, Aabb)> = cut_sides
        .iter()
        .map(|&s| {
            let coords = mesh.side_node_coords(s);
            (s, Aabb::from_points(&coords))
        })
        .collect();

    let elements: Vec<ElementId> = mesh.element_ids().collect();
    let margin = mesh.snap_tolerance().max(1e-9);

    let filter = |&e: &ElementId| {
        let coords = mesh.element_node_coords(e);
        let element_box = Aabb::from_points(&coords).loosened(margin);
        let mut candidates = Vec::new();
        for (s, b) in &side_boxes {
            if element_box.intersects(b) {
                candidates.push(*s);
            }
        }
        candidates
    };

    #[cfg(feature = "parallel")]
    let all_candidates: Vec<Vec<SideId>> = {
        use rayon::prelude::*;
        elements.par_iter().map(filter).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let all_candidates: Vec<Vec<SideId>> = elements.iter().map(filter).collect();

    for (e, candidates) in elements.into_iter().zip(all_candidates) {
        mesh.element_mut(e).candidate_cut_sides = candidates.into_iter().collect();
    }
}

fn find_mesh_cut_points(mesh: &mut Mesh, element: ElementId) -> Result<(), CutError> {
    let candidates = mesh.element(element).candidate_cut_sides.to_vec();
    if candidates.is_empty() {
        return Ok(());
    }
    let local_tol = mesh.tolerances.local;

    for cs in candidates {
        let cs_shape = mesh
            .side(cs)
            .shape
            .expect("explicit cutter sides have a shape");
        let cs_coords = mesh.side_node_coords(cs);
        let cs_box = Aabb::from_points(&cs_coords).loosened(mesh.snap_tolerance().max(1e-9));

        // background edges against the cutter side
        let edges = mesh.element(element).edges().to_vec();
        for edge in edges {
            let [n1, n2] = mesh.edge(edge).nodes();
            let x1 = mesh.node_coords(n1);
            let x2 = mesh.node_coords(n2);
            if !Aabb::from_points(&[x1, x2]).intersects(&cs_box) {
                continue;
            }
            if let IntersectionStatus::CutPoint { x, .. } =
                intersect_edge_side(cs_shape, &cs_coords, [&x1, &x2], local_tol)
            {
                let _ = mesh.new_point(x, Some(edge), Some(cs))?;
            }
        }

        // cutter edges against the background element sides
        let cutter_edges = mesh.side(cs).edges().to_vec();
        let element_sides = mesh.element(element).sides().to_vec();
        for ce in cutter_edges {
            let [m1, m2] = mesh.edge(ce).nodes();
            let y1 = mesh.node_coords(m1);
            let y2 = mesh.node_coords(m2);
            for &es in &element_sides {
                let es_shape = mesh
                    .side(es)
                    .shape
                    .expect("element sides have a shape");
                let es_coords = mesh.side_node_coords(es);
                if !Aabb::from_points(&es_coords)
                    .loosened(mesh.snap_tolerance().max(1e-9))
                    .intersects(&Aabb::from_points(&[y1, y2]))
                {
                    continue;
                }
                if let IntersectionStatus::CutPoint { x, .. } =
                    intersect_edge_side(es_shape, &es_coords, [&y1, &y2], local_tol)
                {
                    let p = mesh.new_point(x, Some(ce), Some(es))?;
                    mesh.add_point_to_side(p, cs);
                }
            }
        }
    }
    Ok(())
}

fn point_in_element(mesh: &Mesh, element: ElementId, x: &Point3<Real>, tol: Real) -> bool {
    let shape = mesh.element(element).shape();
    let nodes = mesh.element_node_coords(element);
    crate::kernel::element_local_coords(shape, &nodes, x).within_limits(shape, tol)
}

fn find_mesh_cut_lines(mesh: &mut Mesh, element: ElementId) -> Result<(), CutError> {
    let candidates = mesh.element(element).candidate_cut_sides.to_vec();
    let element_sides = mesh.element(element).sides().to_vec();

    for cs in candidates {
        // lines on the element surface
        for &es in &element_sides {
            let mut common: Vec<PointId> = mesh
                .side(es)
                .cut_points()
                .iter()
                .map(|&p| mesh.resolve(p))
                .filter(|&p| mesh.point(p).is_cut_by_side(cs))
                .collect();
            common.sort_unstable();
            common.dedup();

            match common.len() {
                0 | 1 => {}
                2 => {
                    let _ = mesh.new_line(common[0], common[1], cs, Some(es), element);
                }
                n => {
                    let node_points: Vec<PointId> = mesh
                        .side(es)
                        .nodes()
                        .iter()
                        .map(|&nd| mesh.resolve(mesh.node(nd).point()))
                        .collect();
                    let all_nodal = common.iter().all(|p| node_points.contains(p));
                    if all_nodal && n == node_points.len() {
                        // the cutter side coincides with this element face:
                        // keep the face's own edges as cut lines
                        for k in 0..node_points.len() {
                            let _ = mesh.new_line(
                                node_points[k],
                                node_points[(k + 1) % node_points.len()],
                                cs,
                                Some(es),
                                element,
                            );
                        }
                    } else {
                        // collinear chain: the cut grazes this face, connect
                        // consecutive points along the dominant direction
                        let mut with_key: Vec<(ordered_float::OrderedFloat<Real>, PointId)> =
                            chain_key(mesh, &common);
                        with_key.sort();
                        for pair in with_key.windows(2) {
                            let _ =
                                mesh.new_line(pair[0].1, pair[1].1, cs, Some(es), element);
                        }
                    }
                }
            }
        }

        // lines along the cutter edges inside the element
        let cutter_edges = mesh.side(cs).edges().to_vec();
        for ce in cutter_edges {
            let [m1, m2] = mesh.edge(ce).nodes();
            let ordered = mesh.ordered_edge_points(ce, m1, m2);
            let inside: Vec<PointId> = ordered
                .into_iter()
                .filter(|&p| {
                    let x = mesh.point(p).coords();
                    point_in_element(mesh, element, &x, 1e-8)
                })
                .collect();
            for pair in inside.windows(2) {
                let a = mesh.point(pair[0]).coords();
                let b = mesh.point(pair[1]).coords();
                let mid = na::center(&a, &b);
                if point_in_element(mesh, element, &mid, 1e-8) {
                    let _ = mesh.new_line(pair[0], pair[1], cs, None, element);
                }
            }
        }
    }
    Ok(())
}

fn chain_key(
    mesh: &Mesh,
    points: &[PointId],
) -> Vec<(ordered_float::OrderedFloat<Real>, PointId)> {
    let first = mesh.point(points[0]).coords();
    let mut dir = Vector::zeros();
    for &p in &points[1..] {
        let d = mesh.point(p).coords() - first;
        if d.norm() > dir.norm() {
            dir = d;
        }
    }
    points
        .iter()
        .map(|&p| {
            let d = (mesh.point(p).coords() - first).dot(&dir);
            (ordered_float::OrderedFloat(d), p)
        })
        .collect()
}

/*
 * Level-set specific steps.
 */

fn find_level_set_cut_points(
    mesh: &mut Mesh,
    element: ElementId,
    ls_side: SideId,
) -> Result<(), CutError> {
    let edges = mesh.element(element).edges().to_vec();
    for edge in edges {
        let [n1, n2] = mesh.edge(edge).nodes();
        let v1 = mesh.node(n1).level_set_value();
        let v2 = mesh.node(n2).level_set_value();
        let x1 = mesh.node_coords(n1);
        let x2 = mesh.node_coords(n2);

        for t in level_set_edge_roots(v1, v2, None, REFERENCE_TOL) {
            let x = Point3::from(x1.coords * 0.5 * (1.0 - t) + x2.coords * 0.5 * (1.0 + t));
            let _ = mesh.new_point(x, Some(edge), Some(ls_side))?;
        }
        // nodes sitting on the interface own the cut as well
        for (n, v) in [(n1, v1), (n2, v2)] {
            if v.abs() <= REFERENCE_TOL {
                let p = mesh.node(n).point();
                mesh.add_point_to_edge(p, edge)?;
                mesh.add_point_to_side(p, ls_side);
            }
        }
    }
    // register the element's sides as candidates of the level-set cut
    mesh.element_mut(element).candidate_cut_sides = std::iter::once(ls_side).collect();
    Ok(())
}

fn find_level_set_cut_lines(
    mesh: &mut Mesh,
    element: ElementId,
    ls_side: SideId,
) -> Result<(), CutError> {
    let sides = mesh.element(element).sides().to_vec();
    for side in sides {
        level_set_face_lines(mesh, element, side, ls_side)?;
    }
    Ok(())
}

/// Marching pattern on one element face: the interface points along the face
/// boundary are paired so that each line cuts off a boundary arc whose sign
/// is opposite to the face center, which disambiguates the saddle cases.
fn level_set_face_lines(
    mesh: &mut Mesh,
    element: ElementId,
    side: SideId,
    ls_side: SideId,
) -> Result<(), CutError> {
    let cycle = pointgraph::side_boundary_cycle(mesh, side);

    // level-set value per cycle point: nodal values at nodes, zero at cut
    // points (they sit on the interface by construction)
    let side_nodes: Vec<NodeId> = mesh.side(side).nodes().to_vec();
    let node_points: Vec<PointId> = side_nodes
        .iter()
        .map(|&n| mesh.resolve(mesh.node(n).point()))
        .collect();
    let value_of = |mesh: &Mesh, p: PointId| -> Real {
        match node_points.iter().position(|&q| q == p) {
            Some(k) => mesh.node(side_nodes[k]).level_set_value(),
            None => 0.0,
        }
    };

    let is_interface: Vec<bool> = cycle
        .iter()
        .map(|&p| {
            let v = value_of(mesh, p);
            v.abs() <= REFERENCE_TOL && mesh.point(p).is_cut_by_side(ls_side)
                || (!node_points.contains(&p))
        })
        .collect();

    let interface_idx: Vec<usize> = (0..cycle.len()).filter(|&i| is_interface[i]).collect();
    if interface_idx.len() < 2 {
        return Ok(());
    }

    if interface_idx.len() == cycle.len() {
        // the whole face lies on the interface
        for k in 0..cycle.len() {
            let _ = mesh.new_line(
                cycle[k],
                cycle[(k + 1) % cycle.len()],
                ls_side,
                Some(side),
                element,
            );
        }
        return Ok(());
    }

    let center: Real = side_nodes
        .iter()
        .map(|&n| mesh.node(n).level_set_value())
        .sum::<Real>()
        / side_nodes.len() as Real;
    // cut off the arcs whose sign is opposite to the face center
    let cutoff = if center > 0.0 { -1.0 } else { 1.0 };

    let m = interface_idx.len();
    for k in 0..m {
        let a = interface_idx[k];
        let b = interface_idx[(k + 1) % m];
        let mut arc_sign = 0.0;
        let mut i = (a + 1) % cycle.len();
        while i != b {
            let v = value_of(mesh, cycle[i]);
            if v.abs() > REFERENCE_TOL {
                arc_sign = v.signum();
                break;
            }
            i = (i + 1) % cycle.len();
        }
        if arc_sign == cutoff {
            let _ = mesh.new_line(cycle[a], cycle[b], ls_side, Some(side), element);
        }
    }
    Ok(())
}
