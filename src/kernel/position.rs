//! Point-location solves: natural coordinates of a global point inside a 3-D
//! cell, or on a 2-D side together with the signed normal distance.

use crate::math::{Matrix, Point, Real, Vector};
use crate::shape::{jacobian, shape_derivs, shape_values, CellShape};

const MAX_ITER: usize = 30;
const RESIDUAL_TOL: Real = 1e-13;

/// Result of a point-in-element solve.
#[derive(Copy, Clone, Debug)]
pub struct LocalPosition {
    /// Natural coordinates of the point.
    pub xi: Vector<Real>,
    /// Did the Newton iteration converge?
    pub converged: bool,
    /// Iterations spent.
    pub iterations: usize,
}

impl LocalPosition {
    /// Is the located point inside the reference domain of `shape`, within
    /// `tol` in every parametric direction?
    pub fn within_limits(&self, shape: CellShape, tol: Real) -> bool {
        self.converged && shape.within_limits(&self.xi, tol)
    }
}

fn characteristic_length(nodes: &[Point<Real>]) -> Real {
    let mut len: Real = 0.0;
    for n in nodes {
        for k in 0..3 {
            len = len.max(n[k].abs());
        }
    }
    len.max(1.0)
}

/// Computes the natural coordinates of `x` with respect to a 3-D cell by
/// Newton iteration, seeded at the reference center.
pub fn element_local_coords(
    shape: CellShape,
    nodes: &[Point<Real>],
    x: &Point<Real>,
) -> LocalPosition {
    debug_assert_eq!(shape.base_dim(), 3);
    let tol = RESIDUAL_TOL * characteristic_length(nodes);
    let mut xi = shape.center();

    for iteration in 0..MAX_ITER {
        let values = shape_values(shape, &xi);
        let mut residual = -x.coords;
        for (node, v) in nodes.iter().zip(values.iter()) {
            residual += node.coords * *v;
        }
        if residual.norm() < tol {
            return LocalPosition {
                xi,
                converged: true,
                iterations: iteration,
            };
        }
        let jac = jacobian(shape, nodes, &xi);
        let update = match jac.try_inverse() {
            Some(inv) => inv * residual,
            None => break,
        };
        xi -= update;
        if !xi.iter().all(|v| v.is_finite()) {
            break;
        }
    }
    LocalPosition {
        xi,
        converged: false,
        iterations: MAX_ITER,
    }
}

/// Result of a point-on-side solve.
#[derive(Copy, Clone, Debug)]
pub struct SidePosition {
    /// Side-parametric coordinates of the projection (third component unused).
    pub rs: Vector<Real>,
    /// Signed distance of the point along the side normal.
    ///
    /// The normal follows the right-hand rule over the side's node cycle.
    pub distance: Real,
    /// Did the Newton iteration converge?
    pub converged: bool,
}

impl SidePosition {
    /// Is the projection inside the side's reference domain, within `tol`?
    pub fn within_limits(&self, shape: CellShape, tol: Real) -> bool {
        self.converged && shape.within_limits(&self.rs, tol)
    }
}

/// Computes side-parametric coordinates and the signed normal distance of a
/// global point with respect to a 2-D side embedded in 3-D space.
pub fn side_local_coords(
    shape: CellShape,
    nodes: &[Point<Real>],
    x: &Point<Real>,
) -> SidePosition {
    debug_assert_eq!(shape.base_dim(), 2);
    let tol = RESIDUAL_TOL * characteristic_length(nodes);
    let mut rs = shape.center();
    let mut distance = 0.0;

    for _ in 0..MAX_ITER {
        let values = shape_values(shape, &rs);
        let derivs = shape_derivs(shape, &rs);
        let mut xr = Vector::zeros();
        let mut xs = Vector::zeros();
        let mut pos = Vector::zeros();
        for ((node, v), d) in nodes.iter().zip(values.iter()).zip(derivs.iter()) {
            pos += node.coords * *v;
            xr += node.coords * d[0];
            xs += node.coords * d[1];
        }
        let normal = xr.cross(&xs);
        let normal = match normal.try_normalize(Real::EPSILON) {
            Some(n) => n,
            None => break,
        };
        let residual = pos + normal * distance - x.coords;
        if residual.norm() < tol {
            return SidePosition {
                rs,
                distance,
                converged: true,
            };
        }
        let jac = Matrix::from_columns(&[xr, xs, normal]);
        let update = match jac.try_inverse() {
            Some(inv) => inv * residual,
            None => break,
        };
        rs.x -= update.x;
        rs.y -= update.y;
        distance -= update.z;
        if !(rs.x.is_finite() && rs.y.is_finite() && distance.is_finite()) {
            break;
        }
    }
    SidePosition {
        rs,
        distance,
        converged: false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Point;
    use crate::shape::CellShape;

    #[test]
    fn hex_local_coords_roundtrip() {
        let nodes: Vec<_> = CellShape::Hex8
            .corner_local_coords()
            .iter()
            .map(|c| Point::new(2.0 * c[0] + 1.0, 3.0 * c[1], 0.5 * c[2] - 2.0))
            .collect();
        let pos = element_local_coords(CellShape::Hex8, &nodes, &Point::new(1.0, 0.0, -2.0));
        assert!(pos.converged);
        assert!(pos.within_limits(CellShape::Hex8, 1e-10));
        assert_relative_eq!(pos.xi.x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(pos.xi.y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(pos.xi.z, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn point_outside_tet_is_detected() {
        let nodes = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        ];
        let pos = element_local_coords(CellShape::Tet4, &nodes, &Point::new(0.9, 0.9, 0.9));
        assert!(pos.converged);
        assert!(!pos.within_limits(CellShape::Tet4, 1e-10));
    }

    #[test]
    fn side_distance_is_signed() {
        // quad in the z = 1 plane, normal along +z
        let nodes = [
            Point::new(0.0, 0.0, 1.0),
            Point::new(1.0, 0.0, 1.0),
            Point::new(1.0, 1.0, 1.0),
            Point::new(0.0, 1.0, 1.0),
        ];
        let above = side_local_coords(CellShape::Quad4, &nodes, &Point::new(0.5, 0.5, 1.25));
        assert!(above.converged);
        assert_relative_eq!(above.distance, 0.25, epsilon = 1e-10);

        let below = side_local_coords(CellShape::Quad4, &nodes, &Point::new(0.5, 0.5, 0.75));
        assert!(below.converged);
        assert_relative_eq!(below.distance, -0.25, epsilon = 1e-10);
    }
}
