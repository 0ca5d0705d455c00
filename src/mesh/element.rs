use crate::mesh::{CellId, EdgeId, FacetId, NodeId, SideId};
use crate::shape::CellShape;
use smallvec::SmallVec;

/// A background element of the mesh being cut.
#[derive(Clone, Debug)]
pub struct Element {
    pub(crate) external_id: i32,
    pub(crate) shape: CellShape,
    /// All nodes, corner nodes first (standard numbering).
    pub(crate) nodes: SmallVec<[NodeId; 27]>,
    pub(crate) sides: SmallVec<[SideId; 6]>,
    pub(crate) edges: SmallVec<[EdgeId; 12]>,
    /// Cutter sides whose loosened bounding box overlaps this element.
    pub(crate) candidate_cut_sides: SmallVec<[SideId; 8]>,
    pub(crate) facets: Vec<FacetId>,
    pub(crate) cells: SmallVec<[CellId; 4]>,
    /// Reason this element could not be cut, if topology reconstruction
    /// failed; such elements are skipped and reported.
    pub(crate) unresolved: Option<String>,
}

impl Element {
    /// The id this element carries in the caller's mesh.
    pub fn external_id(&self) -> i32 {
        self.external_id
    }

    /// Shape of this element.
    pub fn shape(&self) -> CellShape {
        self.shape
    }

    /// All nodes of this element, corner nodes first.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The corner nodes of this element.
    pub fn corner_nodes(&self) -> &[NodeId] {
        &self.nodes[..self.shape.num_corners()]
    }

    /// The element's own sides.
    pub fn sides(&self) -> &[SideId] {
        &self.sides
    }

    /// The element's own edges.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// All facets of this element's cut.
    pub fn facets(&self) -> &[FacetId] {
        &self.facets
    }

    /// The volume cells of this element's cut; empty when the element is not
    /// cut.
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    /// Is this element marked unresolved (topology failure)?
    pub fn is_unresolved(&self) -> bool {
        self.unresolved.is_some()
    }
}
