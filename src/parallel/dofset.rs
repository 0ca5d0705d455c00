//! Per-node dof-set multiplicity.
//!
//! A node touched by several volume-cell groups that are not connected to
//! each other (without crossing the interface) needs one independent set of
//! degrees of freedom per group. Two cells at a node belong to the same group
//! iff they share the node's position side and at least one point identity.

use crate::mesh::{CellId, Mesh, PointId, Position};
use ena::unify::{InPlaceUnificationTable, UnifyKey};
use std::collections::BTreeSet;

#[derive(Copy, Clone, Debug, PartialEq)]
struct CellKey(u32);

impl UnifyKey for CellKey {
    type Value = ();

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        CellKey(u)
    }

    fn tag() -> &'static str {
        "CellKey"
    }
}

/// Counts, for every background node, the number of independent volume-cell
/// partitions touching it, and stores the count on the node.
///
/// With `include_inner == false` only outside cells carry dofs (the usual
/// one-sided level-set physics); inside partitions are not counted.
pub fn find_nodal_dofsets(mesh: &mut Mesh, include_inner: bool) {
    let node_ids: Vec<_> = mesh.node_ids().collect();
    for n in node_ids {
        if mesh.node(n).is_cut_node {
            continue;
        }
        let point = mesh.resolve(mesh.node(n).point());

        // all cells of the elements at this node that actually touch the
        // node's point
        let mut cells: Vec<CellId> = Vec::new();
        let elements = mesh.node(n).elements.clone();
        for e in elements {
            for &c in mesh.element(e).cells() {
                let touches = mesh
                    .cell(c)
                    .facets()
                    .iter()
                    .any(|&f| mesh.facet(f).contains(point));
                if touches && !cells.contains(&c) {
                    cells.push(c);
                }
            }
        }
        cells.sort_unstable();

        let kept: Vec<CellId> = cells
            .into_iter()
            .filter(|&c| {
                let position = mesh.cell(c).position();
                if include_inner {
                    matches!(position, Position::Inside | Position::Outside)
                } else {
                    position == Position::Outside
                }
            })
            .collect();

        let point_sets: Vec<BTreeSet<PointId>> =
            kept.iter().map(|&c| cell_point_set(mesh, c)).collect();

        let mut table: InPlaceUnificationTable<CellKey> = InPlaceUnificationTable::new();
        for _ in &kept {
            let _ = table.new_key(());
        }
        for i in 0..kept.len() {
            for j in (i + 1)..kept.len() {
                if mesh.cell(kept[i]).position() != mesh.cell(kept[j]).position() {
                    continue;
                }
                if !point_sets[i].is_disjoint(&point_sets[j]) {
                    table.union(CellKey(i as u32), CellKey(j as u32));
                }
            }
        }

        let mut roots: BTreeSet<u32> = BTreeSet::new();
        for i in 0..kept.len() {
            let _ = roots.insert(table.find(CellKey(i as u32)).0);
        }
        mesh.node_mut(n).dofsets = roots.len() as u32;
    }
}

fn cell_point_set(mesh: &Mesh, cell: CellId) -> BTreeSet<PointId> {
    let mut set = BTreeSet::new();
    for &f in mesh.cell(cell).facets() {
        for &p in mesh.facet(f).points() {
            let _ = set.insert(mesh.resolve(p));
        }
    }
    set
}
