use crate::math::{Point3, Real};
use crate::mesh::{EdgeId, FacetId, LineId, SideId};
use smallvec::SmallVec;

/// Position of a point, facet or volume cell relative to the interface.
///
/// A point starts `Undecided` and is moved exactly once to one of the
/// terminal states by the classifier (or at facet creation for points lying
/// on the interface).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Position {
    /// Not classified yet.
    Undecided,
    /// Inside the cut-out domain (minus level-set side).
    Inside,
    /// Outside the cut-out domain (plus level-set side).
    Outside,
    /// Exactly on the interface.
    OnCutSurface,
}

impl Position {
    /// Has this position left the `Undecided` state?
    pub fn is_decided(self) -> bool {
        self != Position::Undecided
    }

    /// The opposite domain side; on-surface and undecided stay unchanged.
    pub fn flipped(self) -> Position {
        match self {
            Position::Inside => Position::Outside,
            Position::Outside => Position::Inside,
            other => other,
        }
    }
}

/// An intersection or nodal point, shared by every entity that produced it.
///
/// Identity is unique within one cut pass: candidate points closer than the
/// snap tolerance are merged into one `Point` and all ownership is
/// transferred to the survivor.
#[derive(Clone, Debug)]
pub struct Point {
    pub(crate) x: Point3<Real>,
    pub(crate) position: Position,
    pub(crate) cut_edges: SmallVec<[EdgeId; 4]>,
    pub(crate) cut_sides: SmallVec<[SideId; 4]>,
    pub(crate) lines: SmallVec<[LineId; 4]>,
    pub(crate) facets: SmallVec<[FacetId; 8]>,
    /// Edge parameter of this point along each edge that owns it.
    pub(crate) edge_t: SmallVec<[(EdgeId, Real); 2]>,
    /// Set on the loser of a merge; the survivor keeps `None`.
    pub(crate) merged_into: Option<super::PointId>,
}

impl Point {
    pub(crate) fn new(x: Point3<Real>) -> Self {
        Point {
            x,
            position: Position::Undecided,
            cut_edges: SmallVec::new(),
            cut_sides: SmallVec::new(),
            lines: SmallVec::new(),
            facets: SmallVec::new(),
            edge_t: SmallVec::new(),
            merged_into: None,
        }
    }

    /// Global coordinates of this point.
    pub fn coords(&self) -> Point3<Real> {
        self.x
    }

    /// Position of this point relative to the interface.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Is this point an intersection with the given cutter or element side?
    pub fn is_cut_by_side(&self, side: SideId) -> bool {
        self.cut_sides.contains(&side)
    }

    /// Is this point an intersection on the given edge?
    pub fn is_cut_by_edge(&self, edge: EdgeId) -> bool {
        self.cut_edges.contains(&edge)
    }

    /// The facets referencing this point.
    pub fn facets(&self) -> &[FacetId] {
        &self.facets
    }

    /// Edge parameter of this point along `edge`, if it lies on it.
    pub fn t(&self, edge: EdgeId) -> Option<Real> {
        self.edge_t
            .iter()
            .find(|(e, _)| *e == edge)
            .map(|&(_, t)| t)
    }
}
