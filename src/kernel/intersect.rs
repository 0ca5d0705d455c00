//! The edge × side intersection solve and the level-set edge roots.

use crate::math::{Matrix, Point, Real, Vector};
use crate::shape::{shape_derivs, shape_values, CellShape};
use smallvec::SmallVec;

const MAX_ITER: usize = 30;
const RESIDUAL_TOL: Real = 1e-13;

/// Outcome of intersecting one background edge with one cutter side.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum IntersectionStatus {
    /// No intersection point inside the parametric bounds.
    NoCutPoint,
    /// A single intersection point.
    CutPoint {
        /// Side-parametric coordinates of the intersection.
        rs: Vector<Real>,
        /// Edge parameter of the intersection, in `[-1, 1]`.
        t: Real,
        /// Global coordinates of the intersection.
        x: Point<Real>,
    },
    /// The Newton iteration failed from every seed; treated as "no
    /// intersection" by the callers (typically a parallel or grazing
    /// configuration).
    NewtonFailed,
}

/// Intersects the segment `edge` with the 2-D cell spanned by `side_nodes`.
///
/// The solve runs in the side's parametric coordinates augmented by the edge
/// parameter, seeded at the side center first and at shrunk corner seeds on
/// non-convergence. A root is accepted only if it lies within
/// `[-1 - tol, 1 + tol]` (barycentric bounds for triangles) in both side
/// directions and within the same bound on the edge parameter.
pub fn intersect_edge_side(
    side_shape: CellShape,
    side_nodes: &[Point<Real>],
    edge: [&Point<Real>; 2],
    tol: Real,
) -> IntersectionStatus {
    debug_assert_eq!(side_shape.base_dim(), 2);
    let half_dir = (edge[1] - edge[0]) * 0.5;
    let mid = na::center(edge[0], edge[1]);
    let scale = side_nodes
        .iter()
        .chain(edge.iter().copied())
        .fold(1.0_f64, |acc, p| {
            acc.max(p.coords.abs().max())
        });
    let residual_tol = RESIDUAL_TOL * scale;

    let mut seeds: SmallVec<[Vector<Real>; 5]> = SmallVec::new();
    seeds.push(side_shape.center());
    for c in side_shape.corner_local_coords() {
        let corner = Vector::new(c[0], c[1], 0.0);
        seeds.push(side_shape.center() * 0.5 + corner * 0.5);
    }

    let mut failed = true;
    for seed in seeds {
        let mut rs = seed;
        let mut t = 0.0;
        let mut converged = false;

        for _ in 0..MAX_ITER {
            let values = shape_values(side_shape, &rs);
            let derivs = shape_derivs(side_shape, &rs);
            let mut pos = Vector::zeros();
            let mut xr = Vector::zeros();
            let mut xs = Vector::zeros();
            for ((node, v), d) in side_nodes.iter().zip(values.iter()).zip(derivs.iter()) {
                pos += node.coords * *v;
                xr += node.coords * d[0];
                xs += node.coords * d[1];
            }
            let residual = pos - (mid.coords + half_dir * t);
            if residual.norm() < residual_tol {
                converged = true;
                break;
            }
            let jac = Matrix::from_columns(&[xr, xs, -half_dir]);
            let update = match jac.try_inverse() {
                Some(inv) => inv * residual,
                None => break,
            };
            rs.x -= update.x;
            rs.y -= update.y;
            t -= update.z;
            if !(rs.x.is_finite() && rs.y.is_finite() && t.is_finite()) {
                break;
            }
        }

        if converged {
            failed = false;
            if side_shape.within_limits(&rs, tol) && t.abs() <= 1.0 + tol {
                let x = Point::from(mid.coords + half_dir * t.clamp(-1.0, 1.0));
                return IntersectionStatus::CutPoint { rs, t, x };
            }
        }
    }

    if failed {
        IntersectionStatus::NewtonFailed
    } else {
        IntersectionStatus::NoCutPoint
    }
}

/// Roots of the level-set field interpolated along one background edge.
///
/// `v0`/`v1` are the nodal values at the edge ends, `vm` the mid-node value
/// of a quadratic edge when present. Returned parameters lie in `[-1, 1]`;
/// sign changes milder than `tol` at the end nodes are left to the nodal
/// classification instead of producing a root.
pub fn level_set_edge_roots(
    v0: Real,
    v1: Real,
    vm: Option<Real>,
    tol: Real,
) -> SmallVec<[Real; 2]> {
    let mut roots = SmallVec::new();

    match vm {
        None => {
            if v0.abs() <= tol || v1.abs() <= tol {
                // an end node sits on the interface; the node itself carries it
            } else if v0 * v1 < 0.0 {
                roots.push((v0 + v1) / (v0 - v1));
            }
        }
        Some(vm) => {
            // quadratic interpolation a t^2 + b t + c through the three values
            let a = 0.5 * (v0 + v1) - vm;
            let b = 0.5 * (v1 - v0);
            let c = vm;
            if a.abs() < 1e-30 {
                for r in level_set_edge_roots(v0, v1, None, tol) {
                    roots.push(r);
                }
            } else {
                let disc = b * b - 4.0 * a * c;
                if disc >= 0.0 {
                    let sq = disc.sqrt();
                    for r in [(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)] {
                        if r.abs() < 1.0 - tol
                            && !roots.iter().any(|&q: &Real| (q - r).abs() <= tol)
                        {
                            roots.push(r);
                        }
                    }
                }
            }
        }
    }
    roots.sort_unstable_by(|a, b| a.partial_cmp(b).expect("level-set root is NaN"));
    roots
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Point;
    use crate::shape::CellShape;

    #[test]
    fn edge_pierces_quad() {
        let side = [
            Point::new(0.0, 0.0, 0.5),
            Point::new(1.0, 0.0, 0.5),
            Point::new(1.0, 1.0, 0.5),
            Point::new(0.0, 1.0, 0.5),
        ];
        let p0 = Point::new(0.25, 0.25, 0.0);
        let p1 = Point::new(0.25, 0.25, 1.0);
        match intersect_edge_side(CellShape::Quad4, &side, [&p0, &p1], 1e-10) {
            IntersectionStatus::CutPoint { t, x, .. } => {
                assert_relative_eq!(t, 0.0, epsilon = 1e-10);
                assert_relative_eq!(x.z, 0.5, epsilon = 1e-10);
            }
            other => panic!("expected a cut point, got {other:?}"),
        }
    }

    #[test]
    fn edge_missing_the_side_reports_no_cut() {
        let side = [
            Point::new(0.0, 0.0, 0.5),
            Point::new(1.0, 0.0, 0.5),
            Point::new(0.0, 1.0, 0.5),
        ];
        let p0 = Point::new(2.0, 2.0, 0.0);
        let p1 = Point::new(2.0, 2.0, 1.0);
        assert_eq!(
            intersect_edge_side(CellShape::Tri3, &side, [&p0, &p1], 1e-10),
            IntersectionStatus::NoCutPoint
        );
    }

    #[test]
    fn parallel_edge_does_not_converge() {
        let side = [
            Point::new(0.0, 0.0, 0.5),
            Point::new(1.0, 0.0, 0.5),
            Point::new(1.0, 1.0, 0.5),
            Point::new(0.0, 1.0, 0.5),
        ];
        // runs inside the plane of the side
        let p0 = Point::new(-1.0, 0.4, 0.5);
        let p1 = Point::new(2.0, 0.4, 0.5);
        let status = intersect_edge_side(CellShape::Quad4, &side, [&p0, &p1], 1e-10);
        assert!(matches!(
            status,
            IntersectionStatus::NewtonFailed | IntersectionStatus::NoCutPoint
        ));
    }

    #[test]
    fn linear_level_set_root() {
        let roots = level_set_edge_roots(-1.0, 3.0, None, 1e-10);
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], -0.5, epsilon = 1e-14);
    }

    #[test]
    fn same_sign_has_no_root() {
        assert!(level_set_edge_roots(1.0, 2.0, None, 1e-10).is_empty());
        assert!(level_set_edge_roots(-0.3, -2.0, None, 1e-10).is_empty());
    }

    #[test]
    fn quadratic_level_set_roots() {
        // v(t) = t^2 - 0.25: v0 = v1 = 0.75, vm = -0.25
        let roots = level_set_edge_roots(0.75, 0.75, Some(-0.25), 1e-10);
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots[0], -0.5, epsilon = 1e-12);
        assert_relative_eq!(roots[1], 0.5, epsilon = 1e-12);
    }
}
