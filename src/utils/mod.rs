//! Various unsorted geometrical and logical operators.

pub use self::sorted_pair::SortedPair;

pub(crate) use self::point_in_poly2d::point_in_poly2d;

mod point_in_poly2d;
mod sorted_pair;
pub mod tolerances;
