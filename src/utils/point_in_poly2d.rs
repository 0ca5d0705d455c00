use crate::math::Real;
use na::Point2;

/// Tests if the given point is inside an arbitrary closed polygon with arbitrary
/// orientation, using a counting winding strategy.
///
/// The polygon is assumed to be closed, i.e., first and last point of the polygon
/// are implicitly assumed to be connected by an edge. Concave polygons are handled.
pub fn point_in_poly2d(pt: &Point2<Real>, poly: &[Point2<Real>]) -> bool {
    if poly.is_empty() {
        return false;
    }

    let mut winding = 0i32;

    for (i, a) in poly.iter().enumerate() {
        let b = poly[(i + 1) % poly.len()];
        let seg_dir = b - a;
        let dpt = pt - a;
        let perp = dpt.perp(&seg_dir);
        winding += match (dpt.y >= 0.0, b.y > pt.y) {
            (true, true) if perp < 0.0 => 1,
            (false, false) if perp > 0.0 => 1,
            _ => 0,
        };
    }

    winding % 2 == 1
}
