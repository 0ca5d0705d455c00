mod consistency;
mod cubature;
mod level_set;
mod planar_bisection;
mod snapping;
mod volume_conservation;

use incise3d::math::Real;
use incise3d::na::Point3;

/// The unit cube as a hex8: node ids 0..8, standard ordering.
pub fn unit_hex() -> (Vec<i32>, Vec<Point3<Real>>) {
    let coords = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    ((0..8).collect(), coords)
}

/// A large quad4 cutter in the plane `z = z0`, normal along `+z` (plus
/// domain above the plane).
pub fn plane_cutter(z0: Real) -> (Vec<i32>, Vec<Point3<Real>>) {
    let coords = vec![
        Point3::new(-1.0, -1.0, z0),
        Point3::new(2.0, -1.0, z0),
        Point3::new(2.0, 2.0, z0),
        Point3::new(-1.0, 2.0, z0),
    ];
    ((0..4).collect(), coords)
}
