use crate::error::CutError;
use crate::math::{Point3, Real};
use crate::mesh::Position;
use crate::quadrature::{cell_volume, cubature_degree, GaussRule};
use crate::shape::CellShape;

/// An elementary cell of the tessellation of a volume cell, carrying global
/// nodal coordinates and a tabulated cubature degree.
///
/// There is no per-shape type: the shape tag plus the pure degree lookup in
/// [`cubature_degree`] replace any dispatch hierarchy.
#[derive(Clone, Debug)]
pub struct IntegrationCell {
    shape: CellShape,
    points: Vec<Point3<Real>>,
    position: Position,
}

impl IntegrationCell {
    /// Creates an integration cell from its global nodal coordinates.
    pub fn new(shape: CellShape, points: Vec<Point3<Real>>, position: Position) -> Self {
        debug_assert_eq!(points.len(), shape.num_nodes());
        IntegrationCell {
            shape,
            points,
            position,
        }
    }

    /// Shape of this cell.
    pub fn shape(&self) -> CellShape {
        self.shape
    }

    /// Global nodal coordinates.
    pub fn points(&self) -> &[Point3<Real>] {
        &self.points
    }

    /// Position inherited from the owning volume cell.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Volume of this cell.
    pub fn volume(&self) -> Result<Real, CutError> {
        cell_volume(self.shape, &self.points)
    }

    /// The cubature degree this cell must be integrated with inside a
    /// background element of the given shape.
    pub fn cubature_degree(&self, background: CellShape) -> Result<u32, CutError> {
        cubature_degree(self.shape, background)
    }

    /// The reference quadrature rule matching [`Self::cubature_degree`].
    pub fn gauss_rule(&self, background: CellShape) -> Result<GaussRule, CutError> {
        GaussRule::reference(self.shape, self.cubature_degree(background)?)
    }
}
