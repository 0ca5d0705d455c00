use incise3d::mesh::Mesh;
use incise3d::na::Point3;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Snapping must produce the same point identities no matter in which order
/// the candidates arrive.
#[test]
fn snap_count_is_insertion_order_independent() {
    let clusters = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.5, 0.0, 0.0),
        Point3::new(0.0, 0.5, 0.0),
        Point3::new(0.25, 0.25, 0.75),
    ];
    let mut candidates = Vec::new();
    for (k, c) in clusters.iter().enumerate() {
        for j in 0..4 {
            // jitter well below the snap tolerance
            let eps = 1e-14 * (j as f64 - 1.5) * (k as f64 + 1.0);
            candidates.push(Point3::new(c.x + eps, c.y - eps, c.z + eps));
        }
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let mut counts = Vec::new();
    for _ in 0..8 {
        candidates.shuffle(&mut rng);
        let mut mesh = Mesh::new();
        for x in &candidates {
            let _ = mesh.new_point(*x, None, None).unwrap();
        }
        counts.push(mesh.num_points());
    }
    assert!(counts.iter().all(|&c| c == clusters.len()));
}

/// A candidate bridging two existing points merges them into one identity
/// (transitive closure of the snap relation).
#[test]
fn snap_chains_collapse_transitively() {
    let mut mesh = Mesh::new();
    let a = mesh
        .new_point(Point3::new(0.0, 0.0, 0.0), None, None)
        .unwrap();
    let b = mesh
        .new_point(Point3::new(1.8e-12, 0.0, 0.0), None, None)
        .unwrap();
    assert_ne!(a, b);
    assert_eq!(mesh.num_points(), 2);

    // within tolerance of both: a and b become one point
    let c = mesh
        .new_point(Point3::new(0.9e-12, 0.0, 0.0), None, None)
        .unwrap();
    assert_eq!(mesh.resolve(c), mesh.resolve(a));
    assert_eq!(mesh.resolve(b), mesh.resolve(a));
    assert_eq!(mesh.num_points(), 1);
}
