//! Shape functions and derivatives of the cell catalogue.
//!
//! Everything is table-driven: a node either has an explicit closed-form
//! basis function (serendipity families) or is evaluated through 1-D
//! quadratic Lagrange factors keyed by its local coordinates (tensor
//! families). The node orderings match [`crate::shape::topology`]: corners
//! first, then edge mid-nodes, then face/body centers.

use crate::math::{Matrix, Point, Real, Vector};
use crate::shape::CellShape;
use arrayvec::ArrayVec;

/// Shape function values, at most 27 of them.
pub type ShapeValues = ArrayVec<Real, 27>;

/// Shape function gradients w.r.t. the local coordinates.
pub type ShapeDerivs = ArrayVec<[Real; 3], 27>;

// 1-D quadratic Lagrange factor attached to a node coordinate -1, 0 or 1.
fn l2(x: Real, c: Real) -> Real {
    if c < -0.5 {
        0.5 * x * (x - 1.0)
    } else if c > 0.5 {
        0.5 * x * (x + 1.0)
    } else {
        1.0 - x * x
    }
}

fn dl2(x: Real, c: Real) -> Real {
    if c < -0.5 {
        x - 0.5
    } else if c > 0.5 {
        x + 0.5
    } else {
        -2.0 * x
    }
}

static LINE3_NODES: [[Real; 3]; 3] = [[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]];

static TRI6_NODES: [[Real; 3]; 6] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.5, 0.0, 0.0],
    [0.5, 0.5, 0.0],
    [0.0, 0.5, 0.0],
];

static QUAD8_NODES: [[Real; 3]; 8] = [
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [-1.0, 0.0, 0.0],
];

static QUAD9_NODES: [[Real; 3]; 9] = [
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0],
];

static TET10_NODES: [[Real; 3]; 10] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.5, 0.0, 0.0],
    [0.5, 0.5, 0.0],
    [0.0, 0.5, 0.0],
    [0.0, 0.0, 0.5],
    [0.5, 0.0, 0.5],
    [0.0, 0.5, 0.5],
];

static HEX20_NODES: [[Real; 3]; 20] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [0.0, -1.0, -1.0],
    [1.0, 0.0, -1.0],
    [0.0, 1.0, -1.0],
    [-1.0, 0.0, -1.0],
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [-1.0, 0.0, 1.0],
];

static HEX27_NODES: [[Real; 3]; 27] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [0.0, -1.0, -1.0],
    [1.0, 0.0, -1.0],
    [0.0, 1.0, -1.0],
    [-1.0, 0.0, -1.0],
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [-1.0, 0.0, 1.0],
    [0.0, 0.0, 0.0],
    [0.0, 0.0, -1.0],
    [0.0, -1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
];

static WEDGE15_NODES: [[Real; 3]; 15] = [
    [0.0, 0.0, -1.0],
    [1.0, 0.0, -1.0],
    [0.0, 1.0, -1.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [0.5, 0.0, -1.0],
    [0.5, 0.5, -1.0],
    [0.0, 0.5, -1.0],
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.5, 0.0, 1.0],
    [0.5, 0.5, 1.0],
    [0.0, 0.5, 1.0],
];

/// Local coordinates of every node of `shape`.
pub fn node_local_coords(shape: CellShape) -> &'static [[Real; 3]] {
    match shape {
        CellShape::Line3 => &LINE3_NODES,
        CellShape::Tri6 => &TRI6_NODES,
        CellShape::Quad8 => &QUAD8_NODES,
        CellShape::Quad9 => &QUAD9_NODES,
        CellShape::Tet10 => &TET10_NODES,
        CellShape::Hex20 => &HEX20_NODES,
        CellShape::Hex27 => &HEX27_NODES,
        CellShape::Wedge15 => &WEDGE15_NODES,
        linear => linear.corner_local_coords(),
    }
}

/// Evaluates the shape functions of `shape` at the local coordinates `xi`.
pub fn shape_values(shape: CellShape, xi: &Vector<Real>) -> ShapeValues {
    let (r, s, t) = (xi.x, xi.y, xi.z);
    let mut out = ShapeValues::new();

    match shape {
        CellShape::Line2 => {
            out.push(0.5 * (1.0 - r));
            out.push(0.5 * (1.0 + r));
        }
        CellShape::Line3 => {
            out.push(0.5 * r * (r - 1.0));
            out.push(0.5 * r * (r + 1.0));
            out.push(1.0 - r * r);
        }
        CellShape::Tri3 => {
            out.push(1.0 - r - s);
            out.push(r);
            out.push(s);
        }
        CellShape::Tri6 => {
            let l = [1.0 - r - s, r, s];
            for li in l {
                out.push(li * (2.0 * li - 1.0));
            }
            out.push(4.0 * l[0] * l[1]);
            out.push(4.0 * l[1] * l[2]);
            out.push(4.0 * l[2] * l[0]);
        }
        CellShape::Quad4 | CellShape::Hex8 | CellShape::Pyramid5 => {
            for c in shape.corner_local_coords() {
                out.push(linear_tensor_value(shape, c, r, s, t));
            }
            if shape == CellShape::Pyramid5 {
                // the last entry written by the loop is the collapsed apex
                out[4] = t;
            }
        }
        CellShape::Quad8 => {
            for c in &QUAD8_NODES {
                let (ri, si) = (c[0], c[1]);
                if ri == 0.0 {
                    out.push(0.5 * (1.0 - r * r) * (1.0 + s * si));
                } else if si == 0.0 {
                    out.push(0.5 * (1.0 + r * ri) * (1.0 - s * s));
                } else {
                    out.push(0.25 * (1.0 + r * ri) * (1.0 + s * si) * (r * ri + s * si - 1.0));
                }
            }
        }
        CellShape::Quad9 => {
            for c in &QUAD9_NODES {
                out.push(l2(r, c[0]) * l2(s, c[1]));
            }
        }
        CellShape::Tet4 => {
            out.push(1.0 - r - s - t);
            out.push(r);
            out.push(s);
            out.push(t);
        }
        CellShape::Tet10 => {
            let l = [1.0 - r - s - t, r, s, t];
            for li in l {
                out.push(li * (2.0 * li - 1.0));
            }
            for [a, b] in TET10_EDGE_PAIRS {
                out.push(4.0 * l[a] * l[b]);
            }
        }
        CellShape::Hex20 => {
            for c in &HEX20_NODES {
                let (ri, si, ti) = (c[0], c[1], c[2]);
                if ri == 0.0 {
                    out.push(0.25 * (1.0 - r * r) * (1.0 + s * si) * (1.0 + t * ti));
                } else if si == 0.0 {
                    out.push(0.25 * (1.0 + r * ri) * (1.0 - s * s) * (1.0 + t * ti));
                } else if ti == 0.0 {
                    out.push(0.25 * (1.0 + r * ri) * (1.0 + s * si) * (1.0 - t * t));
                } else {
                    out.push(
                        0.125
                            * (1.0 + r * ri)
                            * (1.0 + s * si)
                            * (1.0 + t * ti)
                            * (r * ri + s * si + t * ti - 2.0),
                    );
                }
            }
        }
        CellShape::Hex27 => {
            for c in &HEX27_NODES {
                out.push(l2(r, c[0]) * l2(s, c[1]) * l2(t, c[2]));
            }
        }
        CellShape::Wedge6 => {
            let l = [1.0 - r - s, r, s];
            for li in l {
                out.push(0.5 * li * (1.0 - t));
            }
            for li in l {
                out.push(0.5 * li * (1.0 + t));
            }
        }
        CellShape::Wedge15 => {
            let l = [1.0 - r - s, r, s];
            let tm = 1.0 - t;
            let tp = 1.0 + t;
            let tq = 1.0 - t * t;
            for li in l {
                out.push(0.5 * li * ((2.0 * li - 1.0) * tm - tq));
            }
            for li in l {
                out.push(0.5 * li * ((2.0 * li - 1.0) * tp - tq));
            }
            for [a, b] in WEDGE_TRI_EDGES {
                out.push(2.0 * l[a] * l[b] * tm);
            }
            for li in l {
                out.push(li * tq);
            }
            for [a, b] in WEDGE_TRI_EDGES {
                out.push(2.0 * l[a] * l[b] * tp);
            }
        }
    }
    out
}

const TET10_EDGE_PAIRS: [[usize; 2]; 6] = [[0, 1], [1, 2], [2, 0], [0, 3], [1, 3], [2, 3]];
const WEDGE_TRI_EDGES: [[usize; 2]; 3] = [[0, 1], [1, 2], [2, 0]];

fn linear_tensor_value(shape: CellShape, c: &[Real; 3], r: Real, s: Real, t: Real) -> Real {
    match shape {
        CellShape::Quad4 => 0.25 * (1.0 + r * c[0]) * (1.0 + s * c[1]),
        CellShape::Hex8 => 0.125 * (1.0 + r * c[0]) * (1.0 + s * c[1]) * (1.0 + t * c[2]),
        // base nodes of the collapsed box; the apex is overwritten by the caller
        CellShape::Pyramid5 => 0.25 * (1.0 + r * c[0]) * (1.0 + s * c[1]) * (1.0 - t),
        _ => unreachable!(),
    }
}

/// Evaluates the shape function gradients of `shape` at `xi`.
pub fn shape_derivs(shape: CellShape, xi: &Vector<Real>) -> ShapeDerivs {
    let (r, s, t) = (xi.x, xi.y, xi.z);
    let mut out = ShapeDerivs::new();

    match shape {
        CellShape::Line2 => {
            out.push([-0.5, 0.0, 0.0]);
            out.push([0.5, 0.0, 0.0]);
        }
        CellShape::Line3 => {
            out.push([r - 0.5, 0.0, 0.0]);
            out.push([r + 0.5, 0.0, 0.0]);
            out.push([-2.0 * r, 0.0, 0.0]);
        }
        CellShape::Tri3 => {
            out.push([-1.0, -1.0, 0.0]);
            out.push([1.0, 0.0, 0.0]);
            out.push([0.0, 1.0, 0.0]);
        }
        CellShape::Tri6 => {
            let l = [1.0 - r - s, r, s];
            let dl = [[-1.0, -1.0], [1.0, 0.0], [0.0, 1.0]];
            for i in 0..3 {
                let f = 4.0 * l[i] - 1.0;
                out.push([f * dl[i][0], f * dl[i][1], 0.0]);
            }
            for [a, b] in WEDGE_TRI_EDGES {
                out.push([
                    4.0 * (l[a] * dl[b][0] + l[b] * dl[a][0]),
                    4.0 * (l[a] * dl[b][1] + l[b] * dl[a][1]),
                    0.0,
                ]);
            }
        }
        CellShape::Quad4 => {
            for c in shape.corner_local_coords() {
                out.push([
                    0.25 * c[0] * (1.0 + s * c[1]),
                    0.25 * c[1] * (1.0 + r * c[0]),
                    0.0,
                ]);
            }
        }
        CellShape::Quad8 => {
            for c in &QUAD8_NODES {
                let (ri, si) = (c[0], c[1]);
                if ri == 0.0 {
                    out.push([-r * (1.0 + s * si), 0.5 * si * (1.0 - r * r), 0.0]);
                } else if si == 0.0 {
                    out.push([0.5 * ri * (1.0 - s * s), -s * (1.0 + r * ri), 0.0]);
                } else {
                    out.push([
                        0.25 * ri * (1.0 + s * si) * (2.0 * r * ri + s * si),
                        0.25 * si * (1.0 + r * ri) * (2.0 * s * si + r * ri),
                        0.0,
                    ]);
                }
            }
        }
        CellShape::Quad9 => {
            for c in &QUAD9_NODES {
                out.push([dl2(r, c[0]) * l2(s, c[1]), l2(r, c[0]) * dl2(s, c[1]), 0.0]);
            }
        }
        CellShape::Tet4 => {
            out.push([-1.0, -1.0, -1.0]);
            out.push([1.0, 0.0, 0.0]);
            out.push([0.0, 1.0, 0.0]);
            out.push([0.0, 0.0, 1.0]);
        }
        CellShape::Tet10 => {
            let l = [1.0 - r - s - t, r, s, t];
            let dl = [
                [-1.0, -1.0, -1.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ];
            for i in 0..4 {
                let f = 4.0 * l[i] - 1.0;
                out.push([f * dl[i][0], f * dl[i][1], f * dl[i][2]]);
            }
            for [a, b] in TET10_EDGE_PAIRS {
                let mut g = [0.0; 3];
                for k in 0..3 {
                    g[k] = 4.0 * (l[a] * dl[b][k] + l[b] * dl[a][k]);
                }
                out.push(g);
            }
        }
        CellShape::Hex8 => {
            for c in shape.corner_local_coords() {
                out.push([
                    0.125 * c[0] * (1.0 + s * c[1]) * (1.0 + t * c[2]),
                    0.125 * c[1] * (1.0 + r * c[0]) * (1.0 + t * c[2]),
                    0.125 * c[2] * (1.0 + r * c[0]) * (1.0 + s * c[1]),
                ]);
            }
        }
        CellShape::Hex20 => {
            for c in &HEX20_NODES {
                let (ri, si, ti) = (c[0], c[1], c[2]);
                if ri == 0.0 {
                    out.push([
                        -0.5 * r * (1.0 + s * si) * (1.0 + t * ti),
                        0.25 * si * (1.0 - r * r) * (1.0 + t * ti),
                        0.25 * ti * (1.0 - r * r) * (1.0 + s * si),
                    ]);
                } else if si == 0.0 {
                    out.push([
                        0.25 * ri * (1.0 - s * s) * (1.0 + t * ti),
                        -0.5 * s * (1.0 + r * ri) * (1.0 + t * ti),
                        0.25 * ti * (1.0 + r * ri) * (1.0 - s * s),
                    ]);
                } else if ti == 0.0 {
                    out.push([
                        0.25 * ri * (1.0 + s * si) * (1.0 - t * t),
                        0.25 * si * (1.0 + r * ri) * (1.0 - t * t),
                        -0.5 * t * (1.0 + r * ri) * (1.0 + s * si),
                    ]);
                } else {
                    out.push([
                        0.125 * ri * (1.0 + s * si) * (1.0 + t * ti) * (2.0 * r * ri + s * si + t * ti - 1.0),
                        0.125 * si * (1.0 + r * ri) * (1.0 + t * ti) * (2.0 * s * si + r * ri + t * ti - 1.0),
                        0.125 * ti * (1.0 + r * ri) * (1.0 + s * si) * (2.0 * t * ti + r * ri + s * si - 1.0),
                    ]);
                }
            }
        }
        CellShape::Hex27 => {
            for c in &HEX27_NODES {
                out.push([
                    dl2(r, c[0]) * l2(s, c[1]) * l2(t, c[2]),
                    l2(r, c[0]) * dl2(s, c[1]) * l2(t, c[2]),
                    l2(r, c[0]) * l2(s, c[1]) * dl2(t, c[2]),
                ]);
            }
        }
        CellShape::Wedge6 => {
            let dl = [[-1.0, -1.0], [1.0, 0.0], [0.0, 1.0]];
            let l = [1.0 - r - s, r, s];
            for i in 0..3 {
                out.push([
                    0.5 * dl[i][0] * (1.0 - t),
                    0.5 * dl[i][1] * (1.0 - t),
                    -0.5 * l[i],
                ]);
            }
            for i in 0..3 {
                out.push([
                    0.5 * dl[i][0] * (1.0 + t),
                    0.5 * dl[i][1] * (1.0 + t),
                    0.5 * l[i],
                ]);
            }
        }
        CellShape::Wedge15 => {
            let l = [1.0 - r - s, r, s];
            let dl = [[-1.0, -1.0], [1.0, 0.0], [0.0, 1.0]];
            let tm = 1.0 - t;
            let tp = 1.0 + t;
            let tq = 1.0 - t * t;
            for i in 0..3 {
                let f = 0.5 * ((4.0 * l[i] - 1.0) * tm - tq);
                out.push([
                    f * dl[i][0],
                    f * dl[i][1],
                    -0.5 * l[i] * (2.0 * l[i] - 1.0) + l[i] * t,
                ]);
            }
            for i in 0..3 {
                let f = 0.5 * ((4.0 * l[i] - 1.0) * tp - tq);
                out.push([
                    f * dl[i][0],
                    f * dl[i][1],
                    0.5 * l[i] * (2.0 * l[i] - 1.0) + l[i] * t,
                ]);
            }
            for [a, b] in WEDGE_TRI_EDGES {
                out.push([
                    2.0 * tm * (l[a] * dl[b][0] + l[b] * dl[a][0]),
                    2.0 * tm * (l[a] * dl[b][1] + l[b] * dl[a][1]),
                    -2.0 * l[a] * l[b],
                ]);
            }
            for i in 0..3 {
                out.push([tq * dl[i][0], tq * dl[i][1], -2.0 * t * l[i]]);
            }
            for [a, b] in WEDGE_TRI_EDGES {
                out.push([
                    2.0 * tp * (l[a] * dl[b][0] + l[b] * dl[a][0]),
                    2.0 * tp * (l[a] * dl[b][1] + l[b] * dl[a][1]),
                    2.0 * l[a] * l[b],
                ]);
            }
        }
        CellShape::Pyramid5 => {
            for c in &CellShape::Pyramid5.corner_local_coords()[..4] {
                out.push([
                    0.25 * c[0] * (1.0 + s * c[1]) * (1.0 - t),
                    0.25 * c[1] * (1.0 + r * c[0]) * (1.0 - t),
                    -0.25 * (1.0 + r * c[0]) * (1.0 + s * c[1]),
                ]);
            }
            out.push([0.0, 0.0, 1.0]);
        }
    }
    out
}

/// Maps local coordinates through the element geometry: `x(xi) = Σ Nᵢ(xi) xᵢ`.
pub fn local_to_global(shape: CellShape, nodes: &[Point<Real>], xi: &Vector<Real>) -> Point<Real> {
    let values = shape_values(shape, xi);
    let mut x = Vector::zeros();
    for (n, v) in nodes.iter().zip(values.iter()) {
        x += n.coords * *v;
    }
    x.into()
}

/// The 3×3 jacobian `∂x/∂xi` of a 3-D cell's geometric map.
///
/// Column `k` holds `Σ ∂Nᵢ/∂xiₖ xᵢ`. Only meaningful for shapes with
/// `base_dim() == 3`.
pub fn jacobian(shape: CellShape, nodes: &[Point<Real>], xi: &Vector<Real>) -> Matrix<Real> {
    let derivs = shape_derivs(shape, xi);
    let mut j = Matrix::zeros();
    for (n, d) in nodes.iter().zip(derivs.iter()) {
        for k in 0..3 {
            j.column_mut(k).axpy(d[k], &n.coords, 1.0);
        }
    }
    j
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::{Real, Vector};
    use crate::shape::CellShape;

    const ALL: [CellShape; 15] = [
        CellShape::Line2,
        CellShape::Line3,
        CellShape::Tri3,
        CellShape::Tri6,
        CellShape::Quad4,
        CellShape::Quad8,
        CellShape::Quad9,
        CellShape::Tet4,
        CellShape::Tet10,
        CellShape::Hex8,
        CellShape::Hex20,
        CellShape::Hex27,
        CellShape::Wedge6,
        CellShape::Wedge15,
        CellShape::Pyramid5,
    ];

    fn sample_point(shape: CellShape) -> Vector<Real> {
        // strictly interior and away from any symmetry
        let c = shape.center();
        c + (shape.center() * 0.1) + Vector::new(0.013, -0.02, 0.017) * (shape.base_dim() as Real / 3.0)
    }

    #[test]
    fn partition_of_unity() {
        for shape in ALL {
            let xi = sample_point(shape);
            let sum: Real = shape_values(shape, &xi).iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);

            let mut dsum = [0.0; 3];
            for d in shape_derivs(shape, &xi) {
                for k in 0..3 {
                    dsum[k] += d[k];
                }
            }
            for v in dsum {
                assert_relative_eq!(v, 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn nodal_interpolation() {
        for shape in ALL {
            for (i, c) in node_local_coords(shape).iter().enumerate() {
                let xi = Vector::new(c[0], c[1], c[2]);
                for (j, v) in shape_values(shape, &xi).iter().enumerate() {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert_relative_eq!(*v, expected, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let h = 1e-6;
        for shape in ALL {
            let xi = sample_point(shape);
            let derivs = shape_derivs(shape, &xi);
            for k in 0..shape.base_dim() {
                let mut xp = xi;
                let mut xm = xi;
                xp[k] += h;
                xm[k] -= h;
                let vp = shape_values(shape, &xp);
                let vm = shape_values(shape, &xm);
                for i in 0..shape.num_nodes() {
                    let fd = (vp[i] - vm[i]) / (2.0 * h);
                    assert_relative_eq!(derivs[i][k], fd, epsilon = 1e-6);
                }
            }
        }
    }
}
