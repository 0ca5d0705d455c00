use crate::integrate::IntegrationCell;
use crate::math::Real;
use crate::mesh::{BcellId, CellId, ElementId, FacetId, PointId, Position, SideId};
use crate::quadrature::GaussRule;
use smallvec::SmallVec;

/// A maximal connected 3-D sub-region of a cut element lying entirely on one
/// side of the interface.
#[derive(Clone, Debug)]
pub struct VolumeCell {
    pub(crate) element: ElementId,
    pub(crate) position: Position,
    pub(crate) facets: Vec<FacetId>,
    pub(crate) integration_cells: Vec<IntegrationCell>,
    pub(crate) boundary_cells: Vec<BcellId>,
    /// Quadrature rule computed by the direct-divergence generator, if that
    /// strategy was selected.
    pub(crate) direct_rule: Option<DirectRule>,
    /// Volume from the divergence theorem over the bounding facets.
    pub(crate) volume: Real,
}

/// A direct-divergence quadrature rule in global coordinates.
#[derive(Clone, Debug)]
pub struct DirectRule {
    /// Global quadrature points and weights; integrating `f = 1` yields the
    /// cell volume.
    pub points: Vec<(crate::math::Point3<Real>, Real)>,
}

impl VolumeCell {
    /// The background element this cell belongs to.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Position of this cell relative to the interface.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The facets bounding this cell.
    pub fn facets(&self) -> &[FacetId] {
        &self.facets
    }

    /// The integration cells tessellating this cell (empty if the
    /// direct-divergence rule was generated instead).
    pub fn integration_cells(&self) -> &[IntegrationCell] {
        &self.integration_cells
    }

    /// The boundary cells of this cell on the interface.
    pub fn boundary_cells(&self) -> &[BcellId] {
        &self.boundary_cells
    }

    /// The direct-divergence rule, when that strategy was selected.
    pub fn direct_rule(&self) -> Option<&DirectRule> {
        self.direct_rule.as_ref()
    }

    /// Volume of this cell.
    pub fn volume(&self) -> Real {
        self.volume
    }
}

/// A 2-D piece of the interface inside one cut element, used for
/// interface-flux integration.
#[derive(Clone, Debug)]
pub struct BoundaryCell {
    pub(crate) shape: crate::shape::CellShape,
    pub(crate) points: SmallVec<[PointId; 4]>,
    pub(crate) facet: FacetId,
    pub(crate) cell: CellId,
    /// The originating cutter side.
    pub(crate) cut_side: SideId,
    /// Quadrature rule on the reference domain of `shape`; weights must be
    /// combined with the area jacobian of the cell's geometry.
    pub(crate) rule: GaussRule,
    pub(crate) area: Real,
}

impl BoundaryCell {
    /// Shape of this boundary cell.
    pub fn shape(&self) -> crate::shape::CellShape {
        self.shape
    }

    /// The point cycle spanning this boundary cell.
    pub fn points(&self) -> &[PointId] {
        &self.points
    }

    /// The interface facet this boundary cell tessellates.
    pub fn facet(&self) -> FacetId {
        self.facet
    }

    /// The volume cell this boundary cell belongs to.
    pub fn cell(&self) -> CellId {
        self.cell
    }

    /// The originating cutter side.
    pub fn cut_side(&self) -> SideId {
        self.cut_side
    }

    /// The reference quadrature rule of this boundary cell.
    pub fn rule(&self) -> &GaussRule {
        &self.rule
    }

    /// Area of this boundary cell.
    pub fn area(&self) -> Real {
        self.area
    }
}
