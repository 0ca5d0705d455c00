use crate::error::CutError;
use crate::math::{Point, Real, Vector};
use crate::quadrature::gauss::{gauss_legendre, points_for_degree};
use crate::shape::{jacobian, shape_derivs, CellShape};

/// Degree used when integrating jacobian determinants (element and cell
/// volumes); high enough for every shape of the catalogue.
const VOLUME_DEGREE: u32 = 13;

/// A quadrature rule on the reference domain of one cell shape.
#[derive(Clone, Debug)]
pub struct GaussRule {
    /// Shape whose reference domain the rule lives on.
    pub shape: CellShape,
    /// Local quadrature points and weights.
    pub points: Vec<(Vector<Real>, Real)>,
}

impl GaussRule {
    /// Builds a rule on the reference domain of `shape` that integrates
    /// polynomials of the given `degree` exactly.
    ///
    /// Quadratic shapes use the rule of their corner shape (the reference
    /// domain is the same). Only the shapes of the integration-cell catalogue
    /// plus their quadratic variants are supported.
    pub fn reference(shape: CellShape, degree: u32) -> Result<GaussRule, CutError> {
        let n = points_for_degree(degree);
        let points = match shape.corner_shape() {
            CellShape::Line2 => line_rule(n),
            CellShape::Quad4 => quad_rule(n),
            CellShape::Hex8 => hex_rule(n),
            CellShape::Tri3 => tri_rule(points_for_degree(degree + 1)),
            CellShape::Tet4 => tet_rule(points_for_degree(degree + 2)),
            CellShape::Wedge6 => wedge_rule(points_for_degree(degree + 1), n),
            CellShape::Pyramid5 => pyramid_rule(points_for_degree(degree + 2)),
            _ => {
                return Err(CutError::UnsupportedCellType {
                    shape,
                    context: "reference quadrature rule",
                })
            }
        };
        Ok(GaussRule { shape, points })
    }

    /// Number of quadrature points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Is the rule empty?
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn line_rule(n: usize) -> Vec<(Vector<Real>, Real)> {
    gauss_legendre(n)
        .iter()
        .map(|&(x, w)| (Vector::new(x, 0.0, 0.0), w))
        .collect()
}

fn quad_rule(n: usize) -> Vec<(Vector<Real>, Real)> {
    let gl = gauss_legendre(n);
    let mut points = Vec::with_capacity(n * n);
    for &(x, wx) in gl {
        for &(y, wy) in gl {
            points.push((Vector::new(x, y, 0.0), wx * wy));
        }
    }
    points
}

fn hex_rule(n: usize) -> Vec<(Vector<Real>, Real)> {
    let gl = gauss_legendre(n);
    let mut points = Vec::with_capacity(n * n * n);
    for &(x, wx) in gl {
        for &(y, wy) in gl {
            for &(z, wz) in gl {
                points.push((Vector::new(x, y, z), wx * wy * wz));
            }
        }
    }
    points
}

// collapsed square: r = a(1 - b), s = b, jacobian (1 - b)
fn tri_rule(n: usize) -> Vec<(Vector<Real>, Real)> {
    let gl = gauss_legendre(n);
    let mut points = Vec::with_capacity(n * n);
    for &(u, wu) in gl {
        for &(v, wv) in gl {
            let a = 0.5 * (1.0 + u);
            let b = 0.5 * (1.0 + v);
            points.push((Vector::new(a * (1.0 - b), b, 0.0), wu * wv * (1.0 - b) / 4.0));
        }
    }
    points
}

// collapsed cube: r = a, s = b(1 - a), t = c(1 - a)(1 - b),
// jacobian (1 - a)^2 (1 - b)
fn tet_rule(n: usize) -> Vec<(Vector<Real>, Real)> {
    let gl = gauss_legendre(n);
    let mut points = Vec::with_capacity(n * n * n);
    for &(u, wu) in gl {
        for &(v, wv) in gl {
            for &(w, ww) in gl {
                let a = 0.5 * (1.0 + u);
                let b = 0.5 * (1.0 + v);
                let c = 0.5 * (1.0 + w);
                let jac = (1.0 - a) * (1.0 - a) * (1.0 - b);
                points.push((
                    Vector::new(a, b * (1.0 - a), c * (1.0 - a) * (1.0 - b)),
                    wu * wv * ww * jac / 8.0,
                ));
            }
        }
    }
    points
}

fn wedge_rule(n_tri: usize, n_line: usize) -> Vec<(Vector<Real>, Real)> {
    let tri = tri_rule(n_tri);
    let gl = gauss_legendre(n_line);
    let mut points = Vec::with_capacity(tri.len() * n_line);
    for &(p, wp) in &tri {
        for &(t, wt) in gl {
            points.push((Vector::new(p.x, p.y, t), wp * wt));
        }
    }
    points
}

// tensor rule on the collapsed box [-1, 1]^2 x [0, 1]; the pyramid measure
// enters through the geometric map's jacobian, which vanishes at the apex
fn pyramid_rule(n: usize) -> Vec<(Vector<Real>, Real)> {
    let gl = gauss_legendre(n);
    let mut points = Vec::with_capacity(n * n * n);
    for &(x, wx) in gl {
        for &(y, wy) in gl {
            for &(z, wz) in gl {
                points.push((Vector::new(x, y, 0.5 * (1.0 + z)), wx * wy * wz * 0.5));
            }
        }
    }
    points
}

/// Volume of a 3-D cell given its global node coordinates, by quadrature of
/// the jacobian determinant.
pub fn cell_volume(shape: CellShape, nodes: &[Point<Real>]) -> Result<Real, CutError> {
    debug_assert_eq!(nodes.len(), shape.num_nodes());
    let rule = GaussRule::reference(shape, VOLUME_DEGREE)?;
    let mut volume = 0.0;
    for (xi, w) in &rule.points {
        volume += w * jacobian(shape, nodes, xi).determinant().abs();
    }
    Ok(volume)
}

/// Area of a 2-D cell embedded in 3-D space.
pub fn cell_area(shape: CellShape, nodes: &[Point<Real>]) -> Result<Real, CutError> {
    debug_assert_eq!(nodes.len(), shape.num_nodes());
    debug_assert_eq!(shape.base_dim(), 2);
    let rule = GaussRule::reference(shape, VOLUME_DEGREE)?;
    let mut area = 0.0;
    for (xi, w) in &rule.points {
        let derivs = shape_derivs(shape, xi);
        let mut xr = Vector::zeros();
        let mut xs = Vector::zeros();
        for (node, d) in nodes.iter().zip(derivs.iter()) {
            xr += node.coords * d[0];
            xs += node.coords * d[1];
        }
        area += w * xr.cross(&xs).norm();
    }
    Ok(area)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::{Point, Real};
    use crate::shape::CellShape;

    fn reference_nodes(shape: CellShape) -> Vec<Point<Real>> {
        shape
            .corner_local_coords()
            .iter()
            .map(|c| Point::new(c[0], c[1], c[2]))
            .collect()
    }

    #[test]
    fn rules_reproduce_reference_volumes() {
        for shape in [
            CellShape::Tet4,
            CellShape::Hex8,
            CellShape::Wedge6,
            CellShape::Pyramid5,
        ] {
            let volume = cell_volume(shape, &reference_nodes(shape)).unwrap();
            assert_relative_eq!(volume, shape.reference_volume(), epsilon = 1e-12);
        }
    }

    #[test]
    fn rule_weights_sum_to_domain_measure() {
        for (shape, measure) in [
            (CellShape::Line2, 2.0),
            (CellShape::Tri3, 0.5),
            (CellShape::Quad4, 4.0),
            (CellShape::Tet4, 1.0 / 6.0),
            (CellShape::Hex8, 8.0),
            (CellShape::Wedge6, 1.0),
        ] {
            let rule = GaussRule::reference(shape, 6).unwrap();
            let sum: Real = rule.points.iter().map(|&(_, w)| w).sum();
            assert_relative_eq!(sum, measure, epsilon = 1e-12);
        }
    }

    #[test]
    fn tet_rule_integrates_polynomials() {
        // r^2 s over the unit tetrahedron = 2! 1! / (2 + 1 + 3)! = 2 / 720
        let rule = GaussRule::reference(CellShape::Tet4, 5).unwrap();
        let num: Real = rule
            .points
            .iter()
            .map(|&(p, w)| w * p.x * p.x * p.y)
            .sum();
        assert_relative_eq!(num, 2.0 / 720.0, epsilon = 1e-14);
    }

    #[test]
    fn area_of_stretched_quad() {
        let nodes = [
            Point::new(0.0, 0.0, 1.0),
            Point::new(2.0, 0.0, 1.0),
            Point::new(2.0, 3.0, 1.0),
            Point::new(0.0, 3.0, 1.0),
        ];
        let area = cell_area(CellShape::Quad4, &nodes).unwrap();
        assert_relative_eq!(area, 6.0, epsilon = 1e-12);
    }
}
