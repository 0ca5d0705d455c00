//! Local Newton solves: point location inside cells and on sides, and the
//! edge × side intersection at the heart of the cut.

pub use self::intersect::{intersect_edge_side, level_set_edge_roots, IntersectionStatus};
pub use self::position::{element_local_coords, side_local_coords, LocalPosition, SidePosition};

mod intersect;
mod position;
