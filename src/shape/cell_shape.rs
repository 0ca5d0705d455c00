use crate::math::{Real, Vector};

/// The shapes a background element, cutter side, or derived cell can take.
///
/// The numbering of nodes, edges and sides follows the usual finite-element
/// conventions: corner nodes first, then edge mid-nodes, then face centers and
/// the body center (hex27). Reference domains are `[-1, 1]^d` for the
/// line/quad/hex families, the unit simplex for tri/tet, the unit-triangle ×
/// `[-1, 1]` prism for wedges and the `[-1, 1]^2 × [0, 1]` collapsed box for
/// pyramids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum CellShape {
    /// 2-node line.
    Line2,
    /// 3-node quadratic line.
    Line3,
    /// 3-node triangle.
    Tri3,
    /// 6-node quadratic triangle.
    Tri6,
    /// 4-node quadrilateral.
    Quad4,
    /// 8-node serendipity quadrilateral.
    Quad8,
    /// 9-node biquadratic quadrilateral.
    Quad9,
    /// 4-node tetrahedron.
    Tet4,
    /// 10-node quadratic tetrahedron.
    Tet10,
    /// 8-node hexahedron.
    Hex8,
    /// 20-node serendipity hexahedron.
    Hex20,
    /// 27-node triquadratic hexahedron.
    Hex27,
    /// 6-node wedge (triangular prism).
    Wedge6,
    /// 15-node quadratic wedge.
    Wedge15,
    /// 5-node pyramid.
    Pyramid5,
}

impl CellShape {
    /// Number of nodes of this shape.
    pub fn num_nodes(self) -> usize {
        match self {
            CellShape::Line2 => 2,
            CellShape::Line3 => 3,
            CellShape::Tri3 => 3,
            CellShape::Tri6 => 6,
            CellShape::Quad4 => 4,
            CellShape::Quad8 => 8,
            CellShape::Quad9 => 9,
            CellShape::Tet4 => 4,
            CellShape::Tet10 => 10,
            CellShape::Hex8 => 8,
            CellShape::Hex20 => 20,
            CellShape::Hex27 => 27,
            CellShape::Wedge6 => 6,
            CellShape::Wedge15 => 15,
            CellShape::Pyramid5 => 5,
        }
    }

    /// Dimension of the reference domain (1, 2 or 3).
    pub fn base_dim(self) -> usize {
        match self {
            CellShape::Line2 | CellShape::Line3 => 1,
            CellShape::Tri3
            | CellShape::Tri6
            | CellShape::Quad4
            | CellShape::Quad8
            | CellShape::Quad9 => 2,
            _ => 3,
        }
    }

    /// Number of corner nodes.
    pub fn num_corners(self) -> usize {
        self.corner_shape().num_nodes()
    }

    /// The linear shape spanned by the corner nodes of this shape.
    ///
    /// Cutting always operates on the corner topology; quadratic elements are
    /// intersected through their linearized geometry.
    pub fn corner_shape(self) -> CellShape {
        match self {
            CellShape::Line3 => CellShape::Line2,
            CellShape::Tri6 => CellShape::Tri3,
            CellShape::Quad8 | CellShape::Quad9 => CellShape::Quad4,
            CellShape::Tet10 => CellShape::Tet4,
            CellShape::Hex20 | CellShape::Hex27 => CellShape::Hex8,
            CellShape::Wedge15 => CellShape::Wedge6,
            other => other,
        }
    }

    /// Is this shape its own corner shape?
    pub fn is_linear(self) -> bool {
        self.corner_shape() == self
    }

    /// The center of the reference domain, used to seed Newton iterations.
    pub fn center(self) -> Vector<Real> {
        match self.corner_shape() {
            CellShape::Tri3 => Vector::new(1.0 / 3.0, 1.0 / 3.0, 0.0),
            CellShape::Tet4 => Vector::new(0.25, 0.25, 0.25),
            CellShape::Wedge6 => Vector::new(1.0 / 3.0, 1.0 / 3.0, 0.0),
            CellShape::Pyramid5 => Vector::new(0.0, 0.0, 0.5),
            _ => Vector::zeros(),
        }
    }

    /// The measure (length/area/volume) of the reference domain.
    pub fn reference_volume(self) -> Real {
        match self.corner_shape() {
            CellShape::Line2 => 2.0,
            CellShape::Tri3 => 0.5,
            CellShape::Quad4 => 4.0,
            CellShape::Tet4 => 1.0 / 6.0,
            CellShape::Hex8 => 8.0,
            CellShape::Wedge6 => 1.0,
            // the collapsed box [-1, 1]^2 x [0, 1] maps onto a pyramid of
            // volume 4/3 with jacobian (1 - t)^2
            CellShape::Pyramid5 => 4.0 / 3.0,
            _ => unreachable!(),
        }
    }

    /// Local coordinates of the corner nodes.
    pub fn corner_local_coords(self) -> &'static [[Real; 3]] {
        match self.corner_shape() {
            CellShape::Line2 => &[[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            CellShape::Tri3 => &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            CellShape::Quad4 => &[
                [-1.0, -1.0, 0.0],
                [1.0, -1.0, 0.0],
                [1.0, 1.0, 0.0],
                [-1.0, 1.0, 0.0],
            ],
            CellShape::Tet4 => &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            CellShape::Hex8 => &[
                [-1.0, -1.0, -1.0],
                [1.0, -1.0, -1.0],
                [1.0, 1.0, -1.0],
                [-1.0, 1.0, -1.0],
                [-1.0, -1.0, 1.0],
                [1.0, -1.0, 1.0],
                [1.0, 1.0, 1.0],
                [-1.0, 1.0, 1.0],
            ],
            CellShape::Wedge6 => &[
                [0.0, 0.0, -1.0],
                [1.0, 0.0, -1.0],
                [0.0, 1.0, -1.0],
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
                [0.0, 1.0, 1.0],
            ],
            CellShape::Pyramid5 => &[
                [-1.0, -1.0, 0.0],
                [1.0, -1.0, 0.0],
                [1.0, 1.0, 0.0],
                [-1.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            _ => unreachable!(),
        }
    }

    /// Is `xi` inside the reference domain, up to `tol` in every parametric
    /// direction?
    pub fn within_limits(self, xi: &Vector<Real>, tol: Real) -> bool {
        match self.corner_shape() {
            CellShape::Line2 => xi.x.abs() <= 1.0 + tol,
            CellShape::Tri3 => {
                xi.x >= -tol && xi.y >= -tol && xi.x + xi.y <= 1.0 + tol
            }
            CellShape::Quad4 => xi.x.abs() <= 1.0 + tol && xi.y.abs() <= 1.0 + tol,
            CellShape::Tet4 => {
                xi.x >= -tol && xi.y >= -tol && xi.z >= -tol && xi.x + xi.y + xi.z <= 1.0 + tol
            }
            CellShape::Hex8 => {
                xi.x.abs() <= 1.0 + tol && xi.y.abs() <= 1.0 + tol && xi.z.abs() <= 1.0 + tol
            }
            CellShape::Wedge6 => {
                xi.x >= -tol && xi.y >= -tol && xi.x + xi.y <= 1.0 + tol && xi.z.abs() <= 1.0 + tol
            }
            CellShape::Pyramid5 => {
                xi.z >= -tol
                    && xi.z <= 1.0 + tol
                    && xi.x.abs() <= 1.0 + tol
                    && xi.y.abs() <= 1.0 + tol
            }
            _ => unreachable!(),
        }
    }
}
