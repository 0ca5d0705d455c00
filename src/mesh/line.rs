use crate::mesh::{ElementId, PointId, SideId};
use smallvec::SmallVec;

/// A segment between two points, produced by the intersection of a cutter
/// side with an element side (or running along a cutter edge inside an
/// element).
#[derive(Clone, Debug)]
pub struct Line {
    pub(crate) points: [PointId; 2],
    /// The cutter side that produced this line.
    pub(crate) cut_side: SideId,
    /// Element sides this line lies on (empty for a line in the element
    /// interior, e.g. along a cutter edge).
    pub(crate) sides: SmallVec<[SideId; 2]>,
    pub(crate) elements: SmallVec<[ElementId; 2]>,
}

impl Line {
    /// The two end points.
    pub fn points(&self) -> [PointId; 2] {
        self.points
    }

    /// The cutter side that produced this line.
    pub fn cut_side(&self) -> SideId {
        self.cut_side
    }

    /// Does this line belong to the cut of the given element?
    pub fn is_cut(&self, element: ElementId) -> bool {
        self.elements.contains(&element)
    }

    /// Does this line lie on the given element side?
    pub fn is_on_side(&self, side: SideId) -> bool {
        self.sides.contains(&side)
    }
}
