// simulation/aggregation.rs
// Chain detection over the bond graph, promotion of qualifying chains to
// cells, and the removal/pruning pass.

use std::collections::{HashSet, VecDeque};

use super::simulation::Simulation;
use crate::config;

/// Promote qualifying chains to cell state. Every non-cell body not yet
/// visited seeds a breadth-first traversal over the bond graph (edges span
/// all bodies, cells included); a component with enough members and enough
/// pooled resources is promoted wholesale. The component is marked visited
/// either way so it is not traversed again within the step.
pub fn form_cells(sim: &mut Simulation) {
    crate::profile_scope!("cell_formation");
    let id_index = sim.id_index();
    let mut visited: HashSet<u64> = HashSet::new();

    for i in 0..sim.bodies.len() {
        if sim.bodies[i].is_cell || visited.contains(&sim.bodies[i].id) {
            continue;
        }

        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(sim.bodies[i].id);
        while let Some(id) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            let idx = id_index[&id];
            component.push(idx);
            for &partner in &sim.bodies[idx].bonds {
                if !visited.contains(&partner) {
                    queue.push_back(partner);
                }
            }
        }

        let total: f32 = component.iter().map(|&idx| sim.bodies[idx].resources).sum();
        if component.len() >= config::CHAIN_MIN_LEN && total > config::CHAIN_MIN_RESOURCES {
            log::debug!(
                "promoting chain of {} bodies (total resources {:.1}) to cells",
                component.len(),
                total
            );
            for idx in component {
                sim.bodies[idx].promote_to_cell();
            }
        }
    }
}

/// Apply the removals collected during bonding. Dead ids are stripped from
/// every survivor's bond set in the same pass that drops the bodies, so a
/// bond can never outlive its partner. Runs before cluster enforcement.
pub fn prune_removed(sim: &mut Simulation) {
    crate::profile_scope!("pruning");
    if sim.removals.is_empty() {
        return;
    }
    let removals = std::mem::take(&mut sim.removals);

    for body in &mut sim.bodies {
        if removals.contains(&body.id) {
            // A removed body may carry a cluster tag (a starved ex-cell that
            // later got absorbed); keep the side table honest.
            if let Some(cid) = body.cluster_id {
                if let Some(count) = sim.cluster_sizes.get_mut(&cid) {
                    *count -= 1;
                    if *count == 0 {
                        sim.cluster_sizes.remove(&cid);
                    }
                }
            }
        } else {
            body.bonds.retain(|id| !removals.contains(id));
        }
    }
    sim.bodies.retain(|b| !removals.contains(&b.id));
}
