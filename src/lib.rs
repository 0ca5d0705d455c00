/*!
incise3d
========

**incise3d** is a 3-dimensional mesh-cutting library written with
the rust programming language. It decomposes the elements of a background
finite-element mesh that are crossed by an embedded interface — an explicit
boundary surface mesh or an implicit level-set field — into volume cells and
boundary cells, and equips every cell with a numerical integration rule.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![allow(clippy::type_complexity)]

#[macro_use]
extern crate approx;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod classify;
pub mod cut;
pub mod error;
pub mod integrate;
pub mod kernel;
pub mod mesh;
pub mod parallel;
pub mod pointgraph;
pub mod quadrature;
pub mod shape;
pub mod utils;

/// Aliases for the mathematical types used throughout this crate.
pub mod math {
    /// The scalar type used throughout this crate.
    ///
    /// Cut tolerances live at 1e-12 and below, so the whole crate is `f64`.
    pub use f64 as Real;
    pub use na::{Matrix3, Point2, Point3, Vector2, Vector3};

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The matrix type.
    pub use Matrix3 as Matrix;
}
