//! The cross-process ghost exchange.
//!
//! Every rank packages the resolved cut of the cutter sides lying on a
//! process boundary — point coordinates, facet cycles, per-node dof-set
//! counts — and gathers the packages of all other ranks at one barrier-like
//! synchronization point per pass. Each rank then verifies that every shared
//! side was cut identically everywhere; any disagreement is a fatal
//! [`CutError::Consistency`], because proceeding would corrupt the global
//! dof numbering.

use crate::error::CutError;
use crate::math::Real;
use crate::mesh::Mesh;
use std::sync::{Arc, Barrier, Mutex};

/// The resolved cut of one cutter side, in wire form.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SideCut {
    /// External id of the cutter side.
    pub side_id: i32,
    /// Coordinates of the cut points on this side, lexicographically sorted.
    pub points: Vec<[Real; 3]>,
    /// Facet cycles on this side, as indices into `points`.
    pub cycles: Vec<Vec<u32>>,
}

/// Everything one rank contributes to the consistency exchange.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SidePackage {
    /// The sending rank.
    pub rank: usize,
    /// Cut state of every boundary cutter side owned or ghosted here.
    pub sides: Vec<SideCut>,
    /// `(node id, dof-set count)` for the rank's background nodes.
    pub node_dofsets: Vec<(i32, u32)>,
}

/// Transport abstraction of the gather step.
///
/// `exchange` must behave like an all-gather with a barrier: it returns the
/// packages of every participating rank (the local one included) and only
/// returns once all ranks have contributed. There is no partial completion;
/// a pass either synchronizes globally or fails.
pub trait CutExchange {
    /// Contributes `local` and gathers the packages of all ranks.
    fn exchange(&mut self, local: SidePackage) -> Result<Vec<SidePackage>, CutError>;
}

/// Packages the cut state of the given boundary cutter sides.
pub fn package_cut_state(mesh: &Mesh, rank: usize, boundary_side_ids: &[i32]) -> SidePackage {
    let mut sides = Vec::new();
    for &sid in boundary_side_ids {
        for s in mesh.side_ids() {
            let side = mesh.side(s);
            if !side.is_cut_side() || side.external_id() != sid {
                continue;
            }
            let mut points: Vec<[Real; 3]> = side
                .cut_points()
                .iter()
                .map(|&p| {
                    let x = mesh.point(p).coords();
                    [x.x, x.y, x.z]
                })
                .collect();
            points.sort_by(|a, b| a.partial_cmp(b).expect("point coordinate is NaN"));
            points.dedup_by(|a, b| a == b);

            let mut cycles = Vec::new();
            for &f in side.facets() {
                let cycle: Vec<u32> = mesh
                    .facet(f)
                    .points()
                    .iter()
                    .filter_map(|&p| {
                        let x = mesh.point(p).coords();
                        points
                            .iter()
                            .position(|q| *q == [x.x, x.y, x.z])
                            .map(|i| i as u32)
                    })
                    .collect();
                cycles.push(cycle);
            }
            sides.push(SideCut {
                side_id: sid,
                points,
                cycles,
            });
        }
    }

    let mut node_dofsets = Vec::new();
    for n in mesh.node_ids() {
        let node = mesh.node(n);
        if !node.is_cut_node {
            node_dofsets.push((node.external_id(), node.dofsets()));
        }
    }
    node_dofsets.sort_unstable();

    SidePackage {
        rank,
        sides,
        node_dofsets,
    }
}

/// Runs the exchange and verifies that all ranks agree on the shared cut.
pub fn synchronize(
    mesh: &Mesh,
    rank: usize,
    boundary_side_ids: &[i32],
    exchange: &mut dyn CutExchange,
) -> Result<(), CutError> {
    let local = package_cut_state(mesh, rank, boundary_side_ids);
    let all = exchange.exchange(local.clone())?;
    for remote in &all {
        if remote.rank == rank {
            continue;
        }
        verify_agreement(&local, remote, mesh.snap_tolerance())?;
    }
    Ok(())
}

/// Checks that two ranks computed the same points (by coordinate, within
/// `tol`) on every shared side and the same dof-set count for every shared
/// node.
pub fn verify_agreement(
    local: &SidePackage,
    remote: &SidePackage,
    tol: Real,
) -> Result<(), CutError> {
    for ls in &local.sides {
        let Some(rs) = remote.sides.iter().find(|s| s.side_id == ls.side_id) else {
            continue;
        };
        if ls.points.len() != rs.points.len() {
            return Err(CutError::Consistency {
                reason: format!(
                    "side {}: rank {} has {} cut points, rank {} has {}",
                    ls.side_id,
                    local.rank,
                    ls.points.len(),
                    remote.rank,
                    rs.points.len()
                ),
            });
        }
        for p in &ls.points {
            let matched = rs.points.iter().any(|q| {
                let d = [(p[0] - q[0]), (p[1] - q[1]), (p[2] - q[2])];
                (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt() <= tol * 10.0
            });
            if !matched {
                return Err(CutError::Consistency {
                    reason: format!(
                        "side {}: point ({:.6e}, {:.6e}, {:.6e}) of rank {} has no match on rank {}",
                        ls.side_id, p[0], p[1], p[2], local.rank, remote.rank
                    ),
                });
            }
        }
    }

    // shared nodes must carry identical dof-set counts
    let mut ri = remote.node_dofsets.iter().peekable();
    for &(nid, count) in &local.node_dofsets {
        while ri.peek().is_some_and(|&&(rn, _)| rn < nid) {
            let _ = ri.next();
        }
        if let Some(&&(rn, rcount)) = ri.peek() {
            if rn == nid && rcount != count {
                return Err(CutError::Consistency {
                    reason: format!(
                        "node {nid}: rank {} counts {count} dof-sets, rank {} counts {rcount}",
                        local.rank, remote.rank
                    ),
                });
            }
        }
    }
    Ok(())
}

/// An all-gather over threads of one process, for tests and single-machine
/// runs: every rank deposits its package and blocks on a barrier until all
/// ranks contributed.
pub struct InProcessExchange {
    rank: usize,
    slots: Arc<Mutex<Vec<Option<SidePackage>>>>,
    barrier: Arc<Barrier>,
}

impl InProcessExchange {
    /// Creates one connected exchange endpoint per rank.
    pub fn for_ranks(num_ranks: usize) -> Vec<InProcessExchange> {
        let slots = Arc::new(Mutex::new(vec![None; num_ranks]));
        let barrier = Arc::new(Barrier::new(num_ranks));
        (0..num_ranks)
            .map(|rank| InProcessExchange {
                rank,
                slots: Arc::clone(&slots),
                barrier: Arc::clone(&barrier),
            })
            .collect()
    }
}

impl CutExchange for InProcessExchange {
    fn exchange(&mut self, local: SidePackage) -> Result<Vec<SidePackage>, CutError> {
        {
            let mut slots = self.slots.lock().expect("exchange lock poisoned");
            slots[self.rank] = Some(local);
        }
        let _ = self.barrier.wait();
        let slots = self.slots.lock().expect("exchange lock poisoned");
        let mut all = Vec::with_capacity(slots.len());
        for (rank, slot) in slots.iter().enumerate() {
            match slot {
                Some(package) => all.push(package.clone()),
                None => {
                    return Err(CutError::Consistency {
                        reason: format!("rank {rank} contributed no package"),
                    })
                }
            }
        }
        Ok(all)
    }
}
