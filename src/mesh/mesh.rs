use crate::error::CutError;
use crate::math::{Point3, Real};
use crate::mesh::{
    BcellId, BoundaryCell, CellId, Edge, EdgeId, Element, ElementId, Facet, FacetId, Line, LineId,
    Node, NodeId, Point, PointId, Position, Side, SideId, VolumeCell,
};
use crate::shape::{self, CellShape};
use crate::utils::tolerances::Tolerances;
use crate::utils::SortedPair;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use smallvec::SmallVec;
use std::collections::HashMap;

type PoolEntry = GeomWithData<[Real; 3], PointId>;

/// The container of one cut pass: all points, topological entities and
/// derived cells live in its arenas.
pub struct Mesh {
    pub(crate) tolerances: Tolerances,

    points: Vec<Point>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    sides: Vec<Side>,
    lines: Vec<Line>,
    facets: Vec<Facet>,
    cells: Vec<VolumeCell>,
    bcells: Vec<BoundaryCell>,
    elements: Vec<Element>,

    /// `(is_cut_node, external id)` -> node.
    node_registry: HashMap<(bool, i32), NodeId>,
    element_registry: HashMap<i32, ElementId>,
    edge_registry: HashMap<SortedPair<u32>, EdgeId>,
    side_registry: HashMap<SmallVec<[u32; 4]>, SideId>,
    line_registry: HashMap<(SortedPair<u32>, u32), LineId>,

    /// Spatial pool of every point ever created, queried by the snapping
    /// radius. Entries of merged points stay in the tree and are mapped to
    /// their survivor on lookup.
    pool: RTree<PoolEntry>,
}

impl Default for Mesh {
    fn default() -> Self {
        Mesh::with_tolerances(Tolerances::default())
    }
}

impl Mesh {
    /// Creates an empty mesh with the default tolerance policy.
    pub fn new() -> Self {
        Mesh::default()
    }

    /// Creates an empty mesh with an explicit tolerance policy.
    pub fn with_tolerances(tolerances: Tolerances) -> Self {
        Mesh {
            tolerances,
            points: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            sides: Vec::new(),
            lines: Vec::new(),
            facets: Vec::new(),
            cells: Vec::new(),
            bcells: Vec::new(),
            elements: Vec::new(),
            node_registry: HashMap::new(),
            element_registry: HashMap::new(),
            edge_registry: HashMap::new(),
            side_registry: HashMap::new(),
            line_registry: HashMap::new(),
            pool: RTree::new(),
        }
    }

    /// The absolute snap tolerance of this pass.
    pub fn snap_tolerance(&self) -> Real {
        self.tolerances.snap
    }

    /*
     * Accessors.
     */

    /// The point with the given id (ids of merged points are transparently
    /// mapped to their survivor).
    pub fn point(&self, id: PointId) -> &Point {
        &self.points[self.resolve(id).index()]
    }

    /// The node with the given id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// The edge with the given id.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// The side with the given id.
    pub fn side(&self, id: SideId) -> &Side {
        &self.sides[id.index()]
    }

    /// The line with the given id.
    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id.index()]
    }

    /// The facet with the given id.
    pub fn facet(&self, id: FacetId) -> &Facet {
        &self.facets[id.index()]
    }

    pub(crate) fn facet_mut(&mut self, id: FacetId) -> &mut Facet {
        &mut self.facets[id.index()]
    }

    /// The volume cell with the given id.
    pub fn cell(&self, id: CellId) -> &VolumeCell {
        &self.cells[id.index()]
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut VolumeCell {
        &mut self.cells[id.index()]
    }

    /// The boundary cell with the given id.
    pub fn boundary_cell(&self, id: BcellId) -> &BoundaryCell {
        &self.bcells[id.index()]
    }

    /// The element with the given id.
    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.index()]
    }

    /// Looks an element up by its caller-visible id.
    pub fn element_by_external_id(&self, eid: i32) -> Option<ElementId> {
        self.element_registry.get(&eid).copied()
    }

    /// Looks a background node up by its caller-visible id.
    pub fn node_by_external_id(&self, nid: i32) -> Option<NodeId> {
        self.node_registry.get(&(false, nid)).copied()
    }

    /// Ids of all elements, in creation order.
    pub fn element_ids(&self) -> impl Iterator<Item = ElementId> {
        (0..self.elements.len() as u32).map(ElementId)
    }

    /// Ids of all background nodes, in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Ids of all sides, in creation order.
    pub fn side_ids(&self) -> impl Iterator<Item = SideId> {
        (0..self.sides.len() as u32).map(SideId)
    }

    /// Ids of all facets, in creation order.
    pub fn facet_ids(&self) -> impl Iterator<Item = FacetId> {
        (0..self.facets.len() as u32).map(FacetId)
    }

    /// Ids of all volume cells, in creation order.
    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> {
        (0..self.cells.len() as u32).map(CellId)
    }

    /// Number of points (merged identities excluded).
    pub fn num_points(&self) -> usize {
        self.points.iter().filter(|p| p.merged_into.is_none()).count()
    }

    /*
     * Nodes, elements, sides.
     */

    /// Returns the background node with the given external id, creating it
    /// (and its point) on first use.
    pub fn get_node(
        &mut self,
        external_id: i32,
        x: Point3<Real>,
        lsv: Real,
    ) -> Result<NodeId, CutError> {
        self.make_node(false, external_id, x, lsv)
    }

    /// Returns the cutter-mesh node with the given external id, creating it
    /// on first use. Cutter nodes live in their own id space.
    pub fn get_cut_node(&mut self, external_id: i32, x: Point3<Real>) -> Result<NodeId, CutError> {
        self.make_node(true, external_id, x, 0.0)
    }

    fn make_node(
        &mut self,
        is_cut_node: bool,
        external_id: i32,
        x: Point3<Real>,
        lsv: Real,
    ) -> Result<NodeId, CutError> {
        if let Some(&nid) = self.node_registry.get(&(is_cut_node, external_id)) {
            return Ok(nid);
        }
        let point = self.new_point(x, None, None)?;
        let nid = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            external_id,
            point,
            lsv,
            is_cut_node,
            elements: SmallVec::new(),
            dofsets: 0,
        });
        let _ = self.node_registry.insert((is_cut_node, external_id), nid);
        Ok(nid)
    }

    fn get_edge(&mut self, n1: NodeId, n2: NodeId) -> EdgeId {
        let key = SortedPair::new(n1.0, n2.0);
        if let Some(&eid) = self.edge_registry.get(&key) {
            return eid;
        }
        let eid = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge {
            nodes: [n1, n2],
            sides: SmallVec::new(),
            cut_points: SmallVec::new(),
        });
        let _ = self.edge_registry.insert(key, eid);
        eid
    }

    fn get_side(
        &mut self,
        external_id: i32,
        shape: CellShape,
        nodes: &[NodeId],
    ) -> SideId {
        let mut key: SmallVec<[u32; 4]> = nodes.iter().map(|n| n.0).collect();
        key.sort_unstable();
        if let Some(&sid) = self.side_registry.get(&key) {
            return sid;
        }
        let sid = SideId(self.sides.len() as u32);
        let mut edges = SmallVec::new();
        for k in 0..nodes.len() {
            let eid = self.get_edge(nodes[k], nodes[(k + 1) % nodes.len()]);
            edges.push(eid);
            if !self.edges[eid.index()].sides.contains(&sid) {
                self.edges[eid.index()].sides.push(sid);
            }
        }
        self.sides.push(Side {
            external_id,
            shape: Some(shape),
            nodes: nodes.iter().copied().collect(),
            edges,
            cut_points: SmallVec::new(),
            cut_lines: SmallVec::new(),
            facets: SmallVec::new(),
        });
        let _ = self.side_registry.insert(key, sid);
        sid
    }

    /// Creates a background element; its nodes must have been registered
    /// through [`Mesh::get_node`] first.
    pub fn create_element(
        &mut self,
        external_id: i32,
        node_ids: &[i32],
        shape: CellShape,
    ) -> Result<ElementId, CutError> {
        if let Some(&eid) = self.element_registry.get(&external_id) {
            return Ok(eid);
        }
        if node_ids.len() != shape.num_nodes() {
            return Err(CutError::Topology {
                element: external_id,
                reason: format!(
                    "element has {} nodes but shape {:?} needs {}",
                    node_ids.len(),
                    shape,
                    shape.num_nodes()
                ),
            });
        }
        if shape.base_dim() != 3 {
            return Err(CutError::UnsupportedCellType {
                shape,
                context: "background element creation",
            });
        }

        let mut nodes: SmallVec<[NodeId; 27]> = SmallVec::new();
        for nid in node_ids {
            match self.node_registry.get(&(false, *nid)) {
                Some(&n) => nodes.push(n),
                None => {
                    return Err(CutError::Topology {
                        element: external_id,
                        reason: format!("unknown node {nid}"),
                    })
                }
            }
        }

        let corner = shape.corner_shape();
        let eid = ElementId(self.elements.len() as u32);

        let mut sides: SmallVec<[SideId; 6]> = SmallVec::new();
        for def in shape::sides(corner) {
            let side_nodes: SmallVec<[NodeId; 4]> =
                def.nodes.iter().map(|&k| nodes[k]).collect();
            sides.push(self.get_side(-1, def.shape, &side_nodes));
        }

        let mut edges: SmallVec<[EdgeId; 12]> = SmallVec::new();
        for def in shape::edges(corner) {
            edges.push(self.get_edge(nodes[def[0]], nodes[def[1]]));
        }

        for n in &nodes {
            self.nodes[n.index()].elements.push(eid);
        }

        self.elements.push(Element {
            external_id,
            shape,
            nodes,
            sides,
            edges,
            candidate_cut_sides: SmallVec::new(),
            facets: Vec::new(),
            cells: SmallVec::new(),
            unresolved: None,
        });
        let _ = self.element_registry.insert(external_id, eid);
        Ok(eid)
    }

    /// Creates a cutter side; its nodes must have been registered through
    /// [`Mesh::get_cut_node`] first.
    pub fn add_cut_side(
        &mut self,
        external_id: i32,
        node_ids: &[i32],
        shape: CellShape,
    ) -> Result<SideId, CutError> {
        debug_assert!(external_id >= 0, "cutter sides carry non-negative ids");
        if shape.base_dim() != 2 {
            return Err(CutError::UnsupportedCellType {
                shape,
                context: "cutter side creation",
            });
        }
        let mut nodes: SmallVec<[NodeId; 4]> = SmallVec::new();
        for nid in &node_ids[..shape.num_corners()] {
            match self.node_registry.get(&(true, *nid)) {
                Some(&n) => nodes.push(n),
                None => {
                    return Err(CutError::Topology {
                        element: external_id,
                        reason: format!("unknown cutter node {nid}"),
                    })
                }
            }
        }
        Ok(self.get_side(external_id, shape.corner_shape(), &nodes))
    }

    /// Creates the implicit level-set side.
    pub fn add_level_set_side(&mut self, external_id: i32) -> SideId {
        let sid = SideId(self.sides.len() as u32);
        self.sides.push(Side {
            external_id,
            shape: None,
            nodes: SmallVec::new(),
            edges: SmallVec::new(),
            cut_points: SmallVec::new(),
            cut_lines: SmallVec::new(),
            facets: SmallVec::new(),
        });
        sid
    }

    /*
     * Points and snapping.
     */

    /// Follows merge links to the surviving identity of `id`.
    pub fn resolve(&self, id: PointId) -> PointId {
        let mut current = id;
        while let Some(next) = self.points[current.index()].merged_into {
            current = next;
        }
        current
    }

    /// Creates a point at `x`, snapping it onto any existing point within the
    /// snap tolerance, and records the edge/side that produced it.
    ///
    /// Snapping is transitive: if `x` bridges two previously distinct points,
    /// they are merged into the smallest id and all ownership is transferred.
    /// A merge whose edge parameters disagree (the signature of a
    /// self-intersecting cutter) is a [`CutError::Topology`].
    pub fn new_point(
        &mut self,
        x: Point3<Real>,
        cut_edge: Option<EdgeId>,
        cut_side: Option<SideId>,
    ) -> Result<PointId, CutError> {
        let r = self.tolerances.snap;
        let mut hits: Vec<PointId> = self
            .pool
            .locate_within_distance([x.x, x.y, x.z], r * r)
            .map(|e| self.resolve(e.data))
            .collect();
        hits.sort_unstable();
        hits.dedup();

        let pid = if hits.is_empty() {
            let pid = PointId(self.points.len() as u32);
            self.points.push(Point::new(x));
            self.pool.insert(PoolEntry::new([x.x, x.y, x.z], pid));
            pid
        } else {
            let survivor = hits[0];
            for &loser in &hits[1..] {
                self.merge_into(survivor, loser)?;
            }
            survivor
        };

        if let Some(edge) = cut_edge {
            self.add_point_to_edge(pid, edge)?;
        }
        if let Some(side) = cut_side {
            self.add_point_to_side(pid, side);
        }
        Ok(pid)
    }

    fn merge_into(&mut self, survivor: PointId, loser: PointId) -> Result<(), CutError> {
        debug_assert!(survivor < loser);
        if self.points[loser.index()].merged_into.is_some() {
            return Ok(());
        }

        // a merge across inconsistent edge parameters means the cutter
        // intersects itself in this neighborhood
        let loser_ts = self.points[loser.index()].edge_t.clone();
        for &(edge, t_loser) in &loser_ts {
            if let Some(t_survivor) = self.points[survivor.index()].t(edge) {
                let half_len = self.edge_half_length(edge);
                if (t_survivor - t_loser).abs() * half_len > 10.0 * self.tolerances.snap {
                    return Err(CutError::Topology {
                        element: -1,
                        reason: format!(
                            "snapping points {survivor} and {loser} disagrees on edge {edge} \
                             parameters ({t_survivor} vs {t_loser})"
                        ),
                    });
                }
            }
        }

        let loser_x = self.points[loser.index()].x;
        let loser_entity = std::mem::replace(&mut self.points[loser.index()], Point::new(loser_x));
        self.points[loser.index()].merged_into = Some(survivor);

        for edge in &loser_entity.cut_edges {
            replace_in_list(&mut self.edges[edge.index()].cut_points, loser, survivor);
            if !self.points[survivor.index()].cut_edges.contains(edge) {
                self.points[survivor.index()].cut_edges.push(*edge);
            }
        }
        for &(edge, t) in &loser_entity.edge_t {
            if self.points[survivor.index()].t(edge).is_none() {
                self.points[survivor.index()].edge_t.push((edge, t));
            }
        }
        for side in &loser_entity.cut_sides {
            replace_in_list(&mut self.sides[side.index()].cut_points, loser, survivor);
            if !self.points[survivor.index()].cut_sides.contains(side) {
                self.points[survivor.index()].cut_sides.push(*side);
            }
        }
        for line in &loser_entity.lines {
            for p in self.lines[line.index()].points.iter_mut() {
                if *p == loser {
                    *p = survivor;
                }
            }
            if !self.points[survivor.index()].lines.contains(line) {
                self.points[survivor.index()].lines.push(*line);
            }
        }
        for facet in &loser_entity.facets {
            for p in self.facets[facet.index()].points.iter_mut() {
                if *p == loser {
                    *p = survivor;
                }
            }
            if !self.points[survivor.index()].facets.contains(facet) {
                self.points[survivor.index()].facets.push(*facet);
            }
        }

        if loser_entity.position.is_decided()
            && !self.points[survivor.index()].position.is_decided()
        {
            self.points[survivor.index()].position = loser_entity.position;
        }
        Ok(())
    }

    fn edge_half_length(&self, edge: EdgeId) -> Real {
        let [n1, n2] = self.edges[edge.index()].nodes;
        let x1 = self.point(self.nodes[n1.index()].point).coords();
        let x2 = self.point(self.nodes[n2.index()].point).coords();
        0.5 * (x2 - x1).norm()
    }

    pub(crate) fn add_point_to_edge(&mut self, p: PointId, edge: EdgeId) -> Result<(), CutError> {
        let p = self.resolve(p);
        if self.points[p.index()].t(edge).is_some() {
            return Ok(());
        }

        let [n1, n2] = self.edges[edge.index()].nodes;
        let x1 = self.point(self.nodes[n1.index()].point).coords();
        let x2 = self.point(self.nodes[n2.index()].point).coords();
        let x = self.points[p.index()].x;

        let dir = x2 - x1;
        let len = dir.norm();
        if len < crate::utils::tolerances::MINIMAL_TOL {
            return Err(CutError::Topology {
                element: -1,
                reason: format!("edge {edge} has no length"),
            });
        }
        let z = (x - x1).norm() / len;
        let off = (x - x1) - dir * z;
        if off.norm() > 1e4 * self.tolerances.snap.max(crate::utils::tolerances::MINIMAL_TOL) {
            return Err(CutError::Topology {
                element: -1,
                reason: format!("point {p} is not on edge {edge}"),
            });
        }
        let t = 2.0 * z - 1.0;

        self.points[p.index()].edge_t.push((edge, t));
        if !self.points[p.index()].cut_edges.contains(&edge) {
            self.points[p.index()].cut_edges.push(edge);
        }
        if !self.edges[edge.index()].cut_points.contains(&p) {
            self.edges[edge.index()].cut_points.push(p);
        }

        // every side at the edge is cut by this point as well
        let sides: SmallVec<[SideId; 4]> = self.edges[edge.index()].sides.clone();
        for side in sides {
            self.add_point_to_side(p, side);
        }
        Ok(())
    }

    pub(crate) fn add_point_to_side(&mut self, p: PointId, side: SideId) {
        let p = self.resolve(p);
        if !self.points[p.index()].cut_sides.contains(&side) {
            self.points[p.index()].cut_sides.push(side);
        }
        if !self.sides[side.index()].cut_points.contains(&p) {
            self.sides[side.index()].cut_points.push(p);
        }
    }

    /// Sets a point position; positions only ever move away from
    /// `Undecided`, a decided position is never overwritten.
    pub(crate) fn set_point_position(&mut self, p: PointId, position: Position) {
        let p = self.resolve(p);
        let current = self.points[p.index()].position;
        if !current.is_decided() {
            self.points[p.index()].position = position;
        } else if current != position {
            log::debug!(
                "ignoring position change of point {p} from {current:?} to {position:?}"
            );
        }
    }

    /*
     * Lines.
     */

    /// Creates (or reuses) the line between `p1` and `p2` produced by
    /// `cut_side`, registering it with the element and the element side it
    /// lies on. Returns `None` for degenerate (zero-length) candidates.
    pub fn new_line(
        &mut self,
        p1: PointId,
        p2: PointId,
        cut_side: SideId,
        element_side: Option<SideId>,
        element: ElementId,
    ) -> Option<LineId> {
        let p1 = self.resolve(p1);
        let p2 = self.resolve(p2);
        if p1 == p2 {
            return None;
        }
        let key = (SortedPair::new(p1.0, p2.0), cut_side.0);
        let lid = match self.line_registry.get(&key) {
            Some(&lid) => lid,
            None => {
                let lid = LineId(self.lines.len() as u32);
                self.lines.push(Line {
                    points: [p1, p2],
                    cut_side,
                    sides: SmallVec::new(),
                    elements: SmallVec::new(),
                });
                let _ = self.line_registry.insert(key, lid);
                for p in [p1, p2] {
                    self.points[p.index()].lines.push(lid);
                }
                if !self.sides[cut_side.index()].cut_lines.contains(&lid) {
                    self.sides[cut_side.index()].cut_lines.push(lid);
                }
                lid
            }
        };
        if !self.lines[lid.index()].elements.contains(&element) {
            self.lines[lid.index()].elements.push(element);
        }
        if let Some(side) = element_side {
            if !self.lines[lid.index()].sides.contains(&side) {
                self.lines[lid.index()].sides.push(side);
            }
            if !self.sides[side.index()].cut_lines.contains(&lid) {
                self.sides[side.index()].cut_lines.push(lid);
            }
        }
        Some(lid)
    }

    /*
     * Facets and cells.
     */

    /// Creates a facet from a point cycle on `parent_side`, reusing an
    /// existing facet with the same cycle. Facets on the interface move all
    /// their points to the on-cut-surface position.
    pub fn new_facet(
        &mut self,
        points: Vec<PointId>,
        parent_side: SideId,
        on_cut_side: bool,
    ) -> FacetId {
        let points: SmallVec<[PointId; 8]> =
            points.into_iter().map(|p| self.resolve(p)).collect();
        debug_assert!(points.len() >= 3 || !on_cut_side);

        for &existing in &self.sides[parent_side.index()].facets {
            if self.facets[existing.index()].equals_cycle(&points) {
                return existing;
            }
        }

        let fid = FacetId(self.facets.len() as u32);
        self.facets.push(Facet {
            points: points.clone(),
            parent_side,
            on_cut_side,
            position: if on_cut_side {
                Position::OnCutSurface
            } else {
                Position::Undecided
            },
            holes: SmallVec::new(),
            free_points: SmallVec::new(),
            cells: SmallVec::new(),
            triangulation: Vec::new(),
        });
        self.sides[parent_side.index()].facets.push(fid);

        for &p in &points {
            self.points[p.index()].facets.push(fid);
            if on_cut_side {
                self.set_point_position(p, Position::OnCutSurface);
            }
        }
        fid
    }

    /// Attaches `hole` to `facet`.
    pub(crate) fn add_facet_hole(&mut self, facet: FacetId, hole: FacetId) {
        let hole_points = self.facets[hole.index()].points.clone();
        for p in hole_points {
            if !self.points[p.index()].facets.contains(&facet) {
                self.points[p.index()].facets.push(facet);
            }
        }
        self.facets[facet.index()].holes.push(hole);
    }

    /// Attaches an isolated interface point to `facet` as a degenerate
    /// annotation.
    pub(crate) fn add_facet_free_point(&mut self, facet: FacetId, point: PointId) {
        let point = self.resolve(point);
        if !self.facets[facet.index()].free_points.contains(&point) {
            self.facets[facet.index()].free_points.push(point);
            self.points[point.index()].facets.push(facet);
        }
    }

    /// Creates a volume cell bounded by `facets`; every facet may bound at
    /// most two cells.
    pub fn new_cell(
        &mut self,
        element: ElementId,
        facets: Vec<FacetId>,
        position: Position,
    ) -> Result<CellId, CutError> {
        let cid = CellId(self.cells.len() as u32);
        for &f in &facets {
            let cells = &mut self.facets[f.index()].cells;
            if cells.len() >= 2 {
                return Err(CutError::Topology {
                    element: self.elements[element.index()].external_id,
                    reason: format!("facet {f} already bounds two volume cells"),
                });
            }
            cells.push(cid);
        }
        self.cells.push(VolumeCell {
            element,
            position,
            facets,
            integration_cells: Vec::new(),
            boundary_cells: Vec::new(),
            direct_rule: None,
            volume: 0.0,
        });
        self.elements[element.index()].cells.push(cid);
        Ok(cid)
    }

    pub(crate) fn push_boundary_cell(&mut self, bcell: BoundaryCell) -> BcellId {
        let bid = BcellId(self.bcells.len() as u32);
        let cell = bcell.cell;
        self.bcells.push(bcell);
        self.cells[cell.index()].boundary_cells.push(bid);
        bid
    }

    /*
     * Geometry helpers.
     */

    /// Global coordinates of a node.
    pub fn node_coords(&self, n: NodeId) -> Point3<Real> {
        self.point(self.nodes[n.index()].point).coords()
    }

    /// Global coordinates of the element's nodes, in element order.
    pub fn element_node_coords(&self, e: ElementId) -> Vec<Point3<Real>> {
        self.elements[e.index()]
            .nodes
            .iter()
            .map(|&n| self.node_coords(n))
            .collect()
    }

    /// Global coordinates of a side's corner nodes.
    pub fn side_node_coords(&self, s: SideId) -> Vec<Point3<Real>> {
        self.sides[s.index()]
            .nodes
            .iter()
            .map(|&n| self.node_coords(n))
            .collect()
    }

    /// All points on `edge` between the nodes `from` and `to`, ordered along
    /// the edge (end nodal points included).
    pub(crate) fn ordered_edge_points(
        &self,
        edge: EdgeId,
        from: NodeId,
        to: NodeId,
    ) -> Vec<PointId> {
        let e = &self.edges[edge.index()];
        debug_assert!(
            (e.nodes[0] == from && e.nodes[1] == to) || (e.nodes[0] == to && e.nodes[1] == from)
        );
        let forward = e.nodes[0] == from;

        let mut with_t: Vec<(Real, PointId)> = Vec::with_capacity(e.cut_points.len() + 2);
        with_t.push((-1.0, self.resolve(self.nodes[from.index()].point)));
        with_t.push((1.0, self.resolve(self.nodes[to.index()].point)));
        for &p in &e.cut_points {
            let p = self.resolve(p);
            if let Some(t) = self.point(p).t(edge) {
                let t = if forward { t } else { -t };
                if !with_t.iter().any(|&(_, q)| q == p) {
                    with_t.push((t, p));
                }
            }
        }
        with_t.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .expect("edge parameter is NaN")
                .then(a.1.cmp(&b.1))
        });
        with_t.into_iter().map(|(_, p)| p).collect()
    }

    /// Marks an element unresolved with a diagnostic reason.
    pub(crate) fn mark_unresolved(&mut self, element: ElementId, reason: String) {
        log::warn!(
            "element {} left unresolved: {reason}",
            self.elements[element.index()].external_id
        );
        self.elements[element.index()].unresolved = Some(reason);
    }
}

fn replace_in_list<A: smallvec::Array<Item = PointId>>(
    list: &mut SmallVec<A>,
    from: PointId,
    to: PointId,
) {
    if list.contains(&to) {
        list.retain(|p| *p != from);
    } else {
        for p in list.iter_mut() {
            if *p == from {
                *p = to;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shape::CellShape;

    fn unit_hex(mesh: &mut Mesh) -> ElementId {
        let coords = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ];
        for (i, c) in coords.iter().enumerate() {
            let _ = mesh
                .get_node(i as i32, Point3::new(c[0], c[1], c[2]), 0.0)
                .unwrap();
        }
        mesh.create_element(1, &[0, 1, 2, 3, 4, 5, 6, 7], CellShape::Hex8)
            .unwrap()
    }

    #[test]
    fn element_topology_is_shared() {
        let mut mesh = Mesh::new();
        let e = unit_hex(&mut mesh);
        assert_eq!(mesh.element(e).sides().len(), 6);
        assert_eq!(mesh.element(e).edges().len(), 12);

        // second element on top of the hex shares four nodes, one side
        for (i, c) in [
            [0.0, 0.0, 2.0],
            [1.0, 0.0, 2.0],
            [1.0, 1.0, 2.0],
            [0.0, 1.0, 2.0],
        ]
        .iter()
        .enumerate()
        {
            let _ = mesh
                .get_node(8 + i as i32, Point3::new(c[0], c[1], c[2]), 0.0)
                .unwrap();
        }
        let e2 = mesh
            .create_element(2, &[4, 5, 6, 7, 8, 9, 10, 11], CellShape::Hex8)
            .unwrap();
        let shared: Vec<_> = mesh
            .element(e)
            .sides()
            .iter()
            .filter(|s| mesh.element(e2).sides().contains(s))
            .collect();
        assert_eq!(shared.len(), 1);
    }

    #[test]
    fn snapping_is_transitive_and_keeps_the_smallest_id() {
        let mut mesh = Mesh::new();
        let a = mesh
            .new_point(Point3::new(0.0, 0.0, 0.0), None, None)
            .unwrap();
        let b = mesh
            .new_point(Point3::new(1.0, 0.0, 0.0), None, None)
            .unwrap();
        assert_ne!(a, b);

        let c = mesh
            .new_point(Point3::new(0.0, 0.0, 1e-14), None, None)
            .unwrap();
        assert_eq!(mesh.resolve(c), a);
        assert_eq!(mesh.num_points(), 2);
    }

    #[test]
    fn edge_points_are_ordered() {
        let mut mesh = Mesh::new();
        let e = unit_hex(&mut mesh);
        let edge = mesh.element(e).edges()[0];
        // walk from the node at the origin towards (1, 0, 0)
        let from = mesh.node_by_external_id(0).unwrap();
        let to = mesh.node_by_external_id(1).unwrap();

        let p = mesh
            .new_point(Point3::new(0.75, 0.0, 0.0), Some(edge), None)
            .unwrap();
        let q = mesh
            .new_point(Point3::new(0.25, 0.0, 0.0), Some(edge), None)
            .unwrap();

        let fwd = mesh.ordered_edge_points(edge, from, to);
        assert_eq!(fwd.len(), 4);
        assert_eq!(fwd[1], q);
        assert_eq!(fwd[2], p);

        let rev = mesh.ordered_edge_points(edge, to, from);
        assert_eq!(rev[1], p);
        assert_eq!(rev[2], q);
    }

    #[test]
    fn point_off_the_edge_is_rejected() {
        let mut mesh = Mesh::new();
        let e = unit_hex(&mut mesh);
        let edge = mesh.element(e).edges()[0];
        assert!(mesh
            .new_point(Point3::new(0.5, 0.3, 0.0), Some(edge), None)
            .is_err());
    }
}
