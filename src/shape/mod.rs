//! The closed catalogue of background and cutter cell shapes.
//!
//! Every cell kind the engine understands is a variant of [`CellShape`];
//! reference topology (edge and side node lists), shape functions and their
//! derivatives are plain lookup tables keyed by the enum, replacing any kind
//! of per-shape type registry.

pub use self::cell_shape::CellShape;
pub use self::functions::{
    jacobian, local_to_global, node_local_coords, shape_derivs, shape_values,
};
pub use self::topology::{edges, sides, SideDef};

mod cell_shape;
mod functions;
mod topology;
