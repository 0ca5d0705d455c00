use crate::mesh::{EdgeId, FacetId, LineId, NodeId, PointId};
use crate::shape::CellShape;
use smallvec::SmallVec;

/// A topological face: either one side of a background element, one side of
/// the cutter surface mesh, or the single implicit level-set side.
#[derive(Clone, Debug)]
pub struct Side {
    /// Caller-visible id for cutter sides; `-1` for element sides.
    pub(crate) external_id: i32,
    /// Geometric shape; `None` for the implicit level-set side.
    pub(crate) shape: Option<CellShape>,
    pub(crate) nodes: SmallVec<[NodeId; 4]>,
    pub(crate) edges: SmallVec<[EdgeId; 4]>,
    pub(crate) cut_points: SmallVec<[PointId; 8]>,
    pub(crate) cut_lines: SmallVec<[LineId; 8]>,
    pub(crate) facets: SmallVec<[FacetId; 4]>,
}

impl Side {
    /// Is this a cutter side (explicit or level-set), as opposed to a
    /// background element side?
    pub fn is_cut_side(&self) -> bool {
        self.external_id >= 0
    }

    /// Is this the implicit level-set side?
    pub fn is_level_set(&self) -> bool {
        self.shape.is_none()
    }

    /// The id this side carries in the caller's cutter mesh, `-1` for
    /// element sides.
    pub fn external_id(&self) -> i32 {
        self.external_id
    }

    /// Corner nodes of this side (empty for the level-set side).
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Edges of this side.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Intersection points registered on this side.
    pub fn cut_points(&self) -> &[PointId] {
        &self.cut_points
    }

    /// Cut lines registered on this side.
    pub fn cut_lines(&self) -> &[LineId] {
        &self.cut_lines
    }

    /// Facets built on this side.
    pub fn facets(&self) -> &[FacetId] {
        &self.facets
    }
}
