//! Reference topology of the corner shapes: edge and side node lists.
//!
//! The node orderings are chosen so that every side's node cycle runs
//! counter-clockwise when seen from outside the element (right-hand normals
//! point outward). Quadratic shapes share the topology of their corner shape.

use crate::shape::CellShape;

/// One side of a reference cell: its shape and the element-local node indices
/// spanning it, in outward orientation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SideDef {
    /// Shape of the side.
    pub shape: CellShape,
    /// Element-local corner node indices of the side, outward-oriented.
    pub nodes: &'static [usize],
}

const fn quad(nodes: &'static [usize]) -> SideDef {
    SideDef {
        shape: CellShape::Quad4,
        nodes,
    }
}

const fn tri(nodes: &'static [usize]) -> SideDef {
    SideDef {
        shape: CellShape::Tri3,
        nodes,
    }
}

static HEX8_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
];

static HEX8_SIDES: [SideDef; 6] = [
    quad(&[0, 3, 2, 1]),
    quad(&[0, 1, 5, 4]),
    quad(&[1, 2, 6, 5]),
    quad(&[2, 3, 7, 6]),
    quad(&[0, 4, 7, 3]),
    quad(&[4, 5, 6, 7]),
];

static TET4_EDGES: [[usize; 2]; 6] = [[0, 1], [1, 2], [2, 0], [0, 3], [1, 3], [2, 3]];

static TET4_SIDES: [SideDef; 4] = [
    tri(&[0, 2, 1]),
    tri(&[0, 1, 3]),
    tri(&[1, 2, 3]),
    tri(&[0, 3, 2]),
];

static WEDGE6_EDGES: [[usize; 2]; 9] = [
    [0, 1],
    [1, 2],
    [2, 0],
    [0, 3],
    [1, 4],
    [2, 5],
    [3, 4],
    [4, 5],
    [5, 3],
];

static WEDGE6_SIDES: [SideDef; 5] = [
    quad(&[0, 1, 4, 3]),
    quad(&[1, 2, 5, 4]),
    quad(&[2, 0, 3, 5]),
    tri(&[0, 2, 1]),
    tri(&[3, 4, 5]),
];

static PYRAMID5_EDGES: [[usize; 2]; 8] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [0, 4],
    [1, 4],
    [2, 4],
    [3, 4],
];

static PYRAMID5_SIDES: [SideDef; 5] = [
    quad(&[0, 3, 2, 1]),
    tri(&[0, 1, 4]),
    tri(&[1, 2, 4]),
    tri(&[2, 3, 4]),
    tri(&[3, 0, 4]),
];

static TRI3_EDGES: [[usize; 2]; 3] = [[0, 1], [1, 2], [2, 0]];
static QUAD4_EDGES: [[usize; 2]; 4] = [[0, 1], [1, 2], [2, 3], [3, 0]];
static LINE2_EDGES: [[usize; 2]; 1] = [[0, 1]];

/// The corner edges of a shape, as pairs of element-local node indices.
pub fn edges(shape: CellShape) -> &'static [[usize; 2]] {
    match shape.corner_shape() {
        CellShape::Line2 => &LINE2_EDGES,
        CellShape::Tri3 => &TRI3_EDGES,
        CellShape::Quad4 => &QUAD4_EDGES,
        CellShape::Tet4 => &TET4_EDGES,
        CellShape::Hex8 => &HEX8_EDGES,
        CellShape::Wedge6 => &WEDGE6_EDGES,
        CellShape::Pyramid5 => &PYRAMID5_EDGES,
        _ => unreachable!(),
    }
}

/// The sides of a 3-D shape, in outward orientation.
///
/// For 2-D shapes the "sides" are the edges, as line2 segments.
pub fn sides(shape: CellShape) -> &'static [SideDef] {
    static TRI3_SIDES: [SideDef; 3] = [
        SideDef {
            shape: CellShape::Line2,
            nodes: &[0, 1],
        },
        SideDef {
            shape: CellShape::Line2,
            nodes: &[1, 2],
        },
        SideDef {
            shape: CellShape::Line2,
            nodes: &[2, 0],
        },
    ];
    static QUAD4_SIDES: [SideDef; 4] = [
        SideDef {
            shape: CellShape::Line2,
            nodes: &[0, 1],
        },
        SideDef {
            shape: CellShape::Line2,
            nodes: &[1, 2],
        },
        SideDef {
            shape: CellShape::Line2,
            nodes: &[2, 3],
        },
        SideDef {
            shape: CellShape::Line2,
            nodes: &[3, 0],
        },
    ];

    match shape.corner_shape() {
        CellShape::Tri3 => &TRI3_SIDES,
        CellShape::Quad4 => &QUAD4_SIDES,
        CellShape::Tet4 => &TET4_SIDES,
        CellShape::Hex8 => &HEX8_SIDES,
        CellShape::Wedge6 => &WEDGE6_SIDES,
        CellShape::Pyramid5 => &PYRAMID5_SIDES,
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::{Point, Real, Vector};
    use crate::shape::CellShape;

    fn corners(shape: CellShape) -> Vec<Point<Real>> {
        shape
            .corner_local_coords()
            .iter()
            .map(|c| Point::new(c[0], c[1], c[2]))
            .collect()
    }

    // every side normal must point away from the reference cell center
    fn check_outward(shape: CellShape) {
        let pts = corners(shape);
        let center = shape.center();
        for side in sides(shape) {
            let a = pts[side.nodes[0]];
            let b = pts[side.nodes[1]];
            let c = pts[side.nodes[2]];
            let n = (b - a).cross(&(c - b));
            let mid: Vector<Real> = side
                .nodes
                .iter()
                .fold(Vector::zeros(), |acc, &i| acc + pts[i].coords)
                / side.nodes.len() as Real;
            assert!(
                n.dot(&(mid - center)) > 0.0,
                "inward side normal on {:?}",
                shape
            );
        }
    }

    #[test]
    fn side_normals_point_outward() {
        check_outward(CellShape::Hex8);
        check_outward(CellShape::Tet4);
        check_outward(CellShape::Wedge6);
        check_outward(CellShape::Pyramid5);
    }

    #[test]
    fn every_side_node_is_an_edge_node() {
        for shape in [
            CellShape::Hex8,
            CellShape::Tet4,
            CellShape::Wedge6,
            CellShape::Pyramid5,
        ] {
            let edge_list = edges(shape);
            for side in sides(shape) {
                for k in 0..side.nodes.len() {
                    let a = side.nodes[k];
                    let b = side.nodes[(k + 1) % side.nodes.len()];
                    assert!(
                        edge_list
                            .iter()
                            .any(|e| (e[0] == a && e[1] == b) || (e[0] == b && e[1] == a)),
                        "side segment ({a}, {b}) of {:?} is not an element edge",
                        shape
                    );
                }
            }
        }
    }
}
