//! Axis-aligned bounding boxes used to prune element/cutter pairs.

pub use self::aabb::Aabb;

mod aabb;
