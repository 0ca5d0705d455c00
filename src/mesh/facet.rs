use crate::mesh::{CellId, FacetId, PointId, Position, SideId};
use crate::utils::SortedPair;
use smallvec::SmallVec;

/// An ordered polygon bounding part of a cut element face or part of the
/// interface inside an element.
#[derive(Clone, Debug)]
pub struct Facet {
    /// The point cycle, in the orientation produced by the face tracing
    /// (counter-clockwise around the parent side's outward normal for
    /// element-side facets).
    pub(crate) points: SmallVec<[PointId; 8]>,
    pub(crate) parent_side: SideId,
    /// Does this facet lie on the interface?
    pub(crate) on_cut_side: bool,
    pub(crate) position: Position,
    /// Interior cycles re-attached as holes of this facet.
    pub(crate) holes: SmallVec<[FacetId; 2]>,
    /// Isolated interface points inside this facet, kept as degenerate
    /// annotations instead of being dropped.
    pub(crate) free_points: SmallVec<[PointId; 2]>,
    /// The volume cells this facet bounds; at most two.
    pub(crate) cells: SmallVec<[CellId; 2]>,
    /// Midpoint-fan triangulation, built lazily for facets with more than
    /// three corners.
    pub(crate) triangulation: Vec<[PointId; 3]>,
}

impl Facet {
    /// The point cycle of this facet.
    pub fn points(&self) -> &[PointId] {
        &self.points
    }

    /// The side this facet was built on.
    pub fn parent_side(&self) -> SideId {
        self.parent_side
    }

    /// Does this facet lie on the interface?
    pub fn on_cut_side(&self) -> bool {
        self.on_cut_side
    }

    /// Position of this facet.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Hole facets of this facet.
    pub fn holes(&self) -> &[FacetId] {
        &self.holes
    }

    /// Free interface points attached to this facet.
    pub fn free_points(&self) -> &[PointId] {
        &self.free_points
    }

    /// The volume cells this facet bounds.
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    /// Does the facet cycle (holes included) reference `point`?
    pub fn contains(&self, point: PointId) -> bool {
        self.points.contains(&point) || self.free_points.contains(&point)
    }

    /// The boundary segments of the cycle as unordered point pairs.
    pub fn boundary_pairs(&self) -> impl Iterator<Item = SortedPair<PointId>> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| SortedPair::new(self.points[i], self.points[(i + 1) % n]))
    }

    /// Does the facet's point cycle match `other` up to rotation and
    /// direction?
    pub fn equals_cycle(&self, other: &[PointId]) -> bool {
        let n = self.points.len();
        if n != other.len() || self.holes.len() > 0 {
            return false;
        }
        let Some(shift) = self.points.iter().position(|p| *p == other[0]) else {
            return false;
        };
        let forward = (0..n).all(|i| self.points[(i + shift) % n] == other[i]);
        if forward {
            return true;
        }
        (0..n).all(|i| self.points[(shift + n - i) % n] == other[i])
    }
}
