//! Direct divergence-theorem quadrature: a volume integral over a cell is
//! converted into facet integrals of an x-antiderivative, evaluated along
//! internal integration lines running back to a reference plane.
//!
//! For each Gauss point on each (outward-oriented) bounding facet, one
//! internal line connects the reference plane `x = x0` to the point; the rule
//! weights carry the facet normal's x-component and the half-length of the
//! line, so that integrating `f = 1` reproduces the cell volume exactly.

use crate::cut::facet_graph::{facet_outward_sign, facet_triangulation, newell_normal};
use crate::error::CutError;
use crate::math::{Point3, Real, Vector};
use crate::mesh::{CellId, DirectRule, ElementId, FacetId, Mesh};
use crate::quadrature::{cubature_degree, gauss_legendre, GaussRule};
use crate::shape::CellShape;

/// Builds the direct-divergence rule of one volume cell.
pub fn direct_divergence_rule(
    mesh: &mut Mesh,
    element: ElementId,
    cell: CellId,
) -> Result<DirectRule, CutError> {
    let element_shape = mesh.element(element).shape();
    let degree = cubature_degree(CellShape::Tet4, element_shape)?;
    let facet_rule = GaussRule::reference(CellShape::Tri3, degree)?;
    let line_rule = gauss_legendre((degree as usize / 2 + 1).clamp(1, 10));

    // reference plane left of the element
    let corners: Vec<Point3<Real>> = mesh
        .element(element)
        .corner_nodes()
        .iter()
        .map(|&n| mesh.node_coords(n))
        .collect();
    let x0 = corners
        .iter()
        .map(|c| c.x)
        .fold(Real::MAX, Real::min);

    let facets = mesh.cell(cell).facets().to_vec();
    let mut points: Vec<(Point3<Real>, Real)> = Vec::new();

    for f in facets {
        let sign = facet_outward_sign(mesh, cell, f)?;
        push_facet_lines(mesh, f, sign, x0, &facet_rule, line_rule, &mut points)?;

        let holes = mesh.facet(f).holes().to_vec();
        if !holes.is_empty() {
            let outer_normal = facet_normal(mesh, f);
            for h in holes {
                let aligned = facet_normal(mesh, h).dot(&outer_normal) > 0.0;
                let hole_sign = if aligned { -sign } else { sign };
                push_facet_lines(mesh, h, hole_sign, x0, &facet_rule, line_rule, &mut points)?;
            }
        }
    }

    Ok(DirectRule { points })
}

fn facet_normal(mesh: &Mesh, f: FacetId) -> Vector<Real> {
    let coords: Vec<Point3<Real>> = mesh
        .facet(f)
        .points()
        .iter()
        .map(|&p| mesh.point(p).coords())
        .collect();
    newell_normal(&coords)
}

fn push_facet_lines(
    mesh: &mut Mesh,
    f: FacetId,
    sign: Real,
    x0: Real,
    facet_rule: &GaussRule,
    line_rule: &'static [(Real, Real)],
    points: &mut Vec<(Point3<Real>, Real)>,
) -> Result<(), CutError> {
    let triangles = facet_triangulation(mesh, f)?;
    for tri in triangles {
        let a = mesh.point(tri[0]).coords();
        let b = mesh.point(tri[1]).coords();
        let c = mesh.point(tri[2]).coords();
        // unnormalized normal carries twice the triangle area
        let n = (b - a).cross(&(c - a)) * sign;
        if n.norm() <= Real::EPSILON {
            continue;
        }
        for &(xi, w) in &facet_rule.points {
            let gp = a + (b - a) * xi.x + (c - a) * xi.y;
            // the unit-simplex weights sum to 1/2, |n| carries twice the
            // area, so w * n.x is the exact flux weight
            let flux_weight = w * n.x;
            if flux_weight == 0.0 {
                continue;
            }
            let half_span = 0.5 * (gp.x - x0);
            for &(t, wt) in line_rule {
                let x = x0 + half_span * (1.0 + t);
                points.push((Point3::new(x, gp.y, gp.z), flux_weight * half_span * wt));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::math::Real;

    // the weight algebra of one internal line: integrating f = 1 over the
    // line contributes (x_gp - x0) * n_x * w_facet
    #[test]
    fn line_weights_reproduce_the_span() {
        let line = crate::quadrature::gauss_legendre(4);
        let x0 = -1.5;
        let x_gp = 2.0;
        let half_span = 0.5 * (x_gp - x0);
        let total: Real = line.iter().map(|&(_, w)| w * half_span).sum();
        assert_relative_eq!(total, x_gp - x0, epsilon = 1e-14);
    }
}
