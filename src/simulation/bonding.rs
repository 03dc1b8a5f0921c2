// simulation/bonding.rs
// Pairwise interaction pass: nucleotide pairing, cell-cell fusion, predation.

use rand::Rng;

use super::clusters;
use super::simulation::Simulation;
use crate::config;
use crate::species;

/// One bonding pass over the soup. Bodies are visited in collection order and
/// each body takes part in at most one interaction per step: the first rule
/// that fires for a neighbor ends the neighbor scan for that body. Rule
/// priority is pairing, then fusion, then predation. Predation is asymmetric
/// on purpose: only the body in the outer position preys.
pub fn run(sim: &mut Simulation) {
    crate::profile_scope!("bonding");
    for i in 0..sim.bodies.len() {
        if sim.removals.contains(&sim.bodies[i].id) {
            continue;
        }
        let radius = sim.bodies[i].interaction_radius();
        let neighbors = sim.cell_list.find_neighbors_within(&sim.bodies, i, radius);
        for j in neighbors {
            if sim.removals.contains(&sim.bodies[j].id) {
                continue;
            }
            if try_pair(sim, i, j) || try_fuse(sim, i, j) || try_prey(sim, i, j) {
                break;
            }
        }
    }
}

/// Complementary nucleotide pairing. Shallow water pairs more readily and at
/// a lower resource threshold; the threshold doubles as the bonding cost paid
/// by both partners.
fn try_pair(sim: &mut Simulation, i: usize, j: usize) -> bool {
    let p = &sim.bodies[i];
    let q = &sim.bodies[j];
    if p.is_cell || q.is_cell {
        return false;
    }
    let (Some(a), Some(b)) = (p.base, q.base) else {
        return false;
    };
    if !species::complements(a, b) {
        return false;
    }
    let (prob, cost) = if p.pos.y < config::SHALLOW_DEPTH {
        (config::PAIR_PROB_SHALLOW, config::PAIR_COST_SHALLOW)
    } else {
        (config::PAIR_PROB_DEEP, config::PAIR_COST_DEEP)
    };
    if p.resources <= cost || q.resources <= cost {
        return false;
    }
    if p.bonds.contains(&q.id) {
        return false;
    }
    if !sim.rng.random_bool(prob) {
        return false;
    }

    let (pid, qid) = (sim.bodies[i].id, sim.bodies[j].id);
    sim.bodies[i].bonds.push(qid);
    sim.bodies[j].bonds.push(pid);
    sim.bodies[i].add_resources(-cost);
    sim.bodies[j].add_resources(-cost);
    sim.bond_events += 1;
    true
}

/// Cell-cell fusion: bond two well-fed cells and pull both into one cluster.
/// The cluster id resolves to the initiator's, else the neighbor's, else a
/// freshly allocated one.
fn try_fuse(sim: &mut Simulation, i: usize, j: usize) -> bool {
    let p = &sim.bodies[i];
    let q = &sim.bodies[j];
    if !(p.is_cell && q.is_cell) {
        return false;
    }
    if p.resources <= config::FUSION_MIN_RESOURCES || q.resources <= config::FUSION_MIN_RESOURCES {
        return false;
    }
    if p.bonds.contains(&q.id) {
        return false;
    }
    if p.bonds.len() >= config::FUSION_MAX_BONDS {
        return false;
    }
    if !sim.rng.random_bool(config::FUSION_PROB) {
        return false;
    }

    let (pid, qid) = (sim.bodies[i].id, sim.bodies[j].id);
    sim.bodies[i].bonds.push(qid);
    sim.bodies[j].bonds.push(pid);
    let cluster = sim.bodies[i]
        .cluster_id
        .or(sim.bodies[j].cluster_id)
        .unwrap_or_else(|| sim.alloc_cluster_id());
    clusters::assign(sim, i, cluster);
    clusters::assign(sim, j, cluster);
    sim.bond_events += 1;
    true
}

/// Predation: a well-fed body absorbs a starving non-cell neighbor, taking
/// its resources and half its mass. The prey is only marked here; structural
/// removal happens in the pruning pass. Not a bond event.
fn try_prey(sim: &mut Simulation, i: usize, j: usize) -> bool {
    let p = &sim.bodies[i];
    let q = &sim.bodies[j];
    if !(p.resources > config::PREDATOR_MIN_RESOURCES
        && q.resources < config::PREY_MAX_RESOURCES
        && !q.is_cell)
    {
        return false;
    }

    let loot = sim.bodies[j].resources;
    let half_mass = sim.bodies[j].mass * 0.5;
    sim.bodies[i].add_resources(loot);
    sim.bodies[i].mass += half_mass;
    sim.bodies[j].resources = 0.0;
    let qid = sim.bodies[j].id;
    sim.removals.insert(qid);
    log::debug!("body {} absorbed body {}", sim.bodies[i].id, qid);
    true
}
