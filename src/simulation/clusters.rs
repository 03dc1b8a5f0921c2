// simulation/clusters.rs
// Cluster membership bookkeeping and invariant enforcement.

use std::collections::HashMap;

use super::simulation::Simulation;
use crate::config;

/// Move body `idx` into `cluster`, keeping the size side table consistent
/// with live membership counts.
pub fn assign(sim: &mut Simulation, idx: usize, cluster: u64) {
    let old = sim.bodies[idx].cluster_id;
    if old == Some(cluster) {
        return;
    }
    if let Some(previous) = old {
        if let Some(count) = sim.cluster_sizes.get_mut(&previous) {
            *count -= 1;
            if *count == 0 {
                sim.cluster_sizes.remove(&previous);
            }
        }
    }
    sim.bodies[idx].cluster_id = Some(cluster);
    *sim.cluster_sizes.entry(cluster).or_insert(0) += 1;
}

/// Enforce the cluster invariants: a group whose mean resources fall below
/// the floor, or whose membership exceeds the cap, is dissolved outright.
/// Dissolution clears every member's whole bond set; bonds reaching outside
/// the group are detached on the partner side too so the relation stays
/// symmetric.
pub fn enforce(sim: &mut Simulation) {
    crate::profile_scope!("cluster_maintenance");
    let mut groups: HashMap<u64, Vec<usize>> = HashMap::new();
    for (i, body) in sim.bodies.iter().enumerate() {
        if let Some(cid) = body.cluster_id {
            groups.entry(cid).or_default().push(i);
        }
    }

    let id_index = sim.id_index();
    for (cid, members) in groups {
        let mean: f32 = members
            .iter()
            .map(|&i| sim.bodies[i].resources)
            .sum::<f32>()
            / members.len() as f32;
        if mean >= config::CLUSTER_MIN_MEAN_RESOURCES && members.len() <= config::CLUSTER_MAX_SIZE {
            continue;
        }

        log::debug!(
            "dissolving cluster {} ({} members, mean resources {:.2})",
            cid,
            members.len(),
            mean
        );
        for &i in &members {
            let member_id = sim.bodies[i].id;
            let partners = std::mem::take(&mut sim.bodies[i].bonds);
            for partner in partners {
                let j = id_index[&partner];
                if sim.bodies[j].cluster_id != Some(cid) {
                    sim.bodies[j].bonds.retain(|id| *id != member_id);
                }
            }
            sim.bodies[i].cluster_id = None;
        }
        sim.cluster_sizes.remove(&cid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BaseType, Body};
    use crate::config::SimConfig;
    use std::collections::HashSet;
    use ultraviolet::Vec2;

    fn empty_sim() -> Simulation {
        Simulation::new(SimConfig {
            particle_count: 0,
            gravity: 0.0,
            seed: Some(0),
        })
    }

    fn cell_at(x: f32, y: f32, resources: f32) -> Body {
        let mut b = Body::new(Vec2::new(x, y), BaseType::A);
        b.promote_to_cell();
        b.resources = resources;
        b
    }

    fn bond(sim: &mut Simulation, i: usize, j: usize) {
        let (a, b) = (sim.bodies[i].id, sim.bodies[j].id);
        sim.bodies[i].bonds.push(b);
        sim.bodies[j].bonds.push(a);
    }

    #[test]
    fn assign_tracks_sizes_across_moves() {
        let mut sim = empty_sim();
        sim.bodies.push(cell_at(1.0, 1.0, 20.0));
        sim.bodies.push(cell_at(2.0, 1.0, 20.0));
        assign(&mut sim, 0, 0);
        assign(&mut sim, 1, 0);
        assert_eq!(sim.cluster_sizes[&0], 2);
        assign(&mut sim, 1, 1);
        assert_eq!(sim.cluster_sizes[&0], 1);
        assert_eq!(sim.cluster_sizes[&1], 1);
    }

    #[test]
    fn oversized_cluster_is_fully_dissolved() {
        let mut sim = empty_sim();
        for k in 0..11 {
            sim.bodies.push(cell_at(1.0 + k as f32, 1.0, 30.0));
            assign(&mut sim, k, 5);
        }
        for k in 1..11 {
            bond(&mut sim, 0, k);
        }
        enforce(&mut sim);
        for body in &sim.bodies {
            assert!(body.bonds.is_empty());
            assert_eq!(body.cluster_id, None);
        }
        assert!(sim.cluster_sizes.is_empty());
    }

    #[test]
    fn starving_cluster_is_dissolved() {
        let mut sim = empty_sim();
        sim.bodies.push(cell_at(1.0, 1.0, 9.0));
        sim.bodies.push(cell_at(2.0, 1.0, 9.0));
        assign(&mut sim, 0, 0);
        assign(&mut sim, 1, 0);
        bond(&mut sim, 0, 1);
        enforce(&mut sim);
        assert_eq!(sim.bodies[0].cluster_id, None);
        assert_eq!(sim.bodies[1].cluster_id, None);
        assert!(sim.bodies[0].bonds.is_empty());
        assert!(sim.bodies[1].bonds.is_empty());
    }

    #[test]
    fn healthy_cluster_survives_enforcement() {
        let mut sim = empty_sim();
        sim.bodies.push(cell_at(1.0, 1.0, 20.0));
        sim.bodies.push(cell_at(2.0, 1.0, 20.0));
        assign(&mut sim, 0, 0);
        assign(&mut sim, 1, 0);
        bond(&mut sim, 0, 1);
        enforce(&mut sim);
        assert_eq!(sim.bodies[0].cluster_id, Some(0));
        assert_eq!(sim.bodies[0].bonds.len(), 1);
        assert_eq!(sim.cluster_sizes[&0], 2);
    }

    #[test]
    fn dissolution_detaches_out_of_group_bonds_symmetrically() {
        let mut sim = empty_sim();
        // Cluster 0 is starving; body 2 sits in a separate healthy cluster
        // but holds a chain-era bond into the dying group.
        sim.bodies.push(cell_at(1.0, 1.0, 5.0));
        sim.bodies.push(cell_at(2.0, 1.0, 5.0));
        sim.bodies.push(cell_at(3.0, 1.0, 40.0));
        sim.bodies.push(cell_at(4.0, 1.0, 40.0));
        assign(&mut sim, 0, 0);
        assign(&mut sim, 1, 0);
        assign(&mut sim, 2, 1);
        assign(&mut sim, 3, 1);
        bond(&mut sim, 0, 1);
        bond(&mut sim, 1, 2);
        bond(&mut sim, 2, 3);
        enforce(&mut sim);

        // Group 0 gone entirely.
        assert!(sim.bodies[0].bonds.is_empty());
        assert!(sim.bodies[1].bonds.is_empty());
        // Body 2 lost only the edge into the dissolved group.
        let b2: HashSet<u64> = sim.bodies[2].bonds.iter().copied().collect();
        assert_eq!(b2, HashSet::from([sim.bodies[3].id]));
        assert_eq!(sim.bodies[2].cluster_id, Some(1));
    }
}
