// simulation/simulation.rs
// Contains the Simulation struct and the step orchestration.

use rand::SeedableRng;
use std::collections::{HashMap, HashSet};

use super::{aggregation, bonding, clusters};
use crate::body::Body;
use crate::cell_list::CellList;
use crate::config::{self, SimConfig};
use crate::profile_scope;
use crate::utils::{self, SimRng};

/// The main simulation state: the particle soup, the spatial index and the
/// bookkeeping for bonds, clusters and pending removals.
pub struct Simulation {
    pub frame: usize,
    pub bodies: Vec<Body>,
    pub cell_list: CellList,
    pub gravity: f32,
    pub bond_events: u64,
    /// Ids scheduled for removal during this step; applied in one pruning
    /// pass, never while iterating the live collection.
    pub removals: HashSet<u64>,
    next_cluster_id: u64,
    /// Live member count per cluster id, kept in sync on join, leave,
    /// dissolve and removal so per-particle updates avoid a full scan.
    pub cluster_sizes: HashMap<u64, usize>,
    pub rng: SimRng,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => SimRng::seed_from_u64(seed),
            None => SimRng::from_os_rng(),
        };
        let bodies = utils::spawn_soup(config.particle_count, &mut rng);
        let cell_list = CellList::new(config::DOMAIN_SIZE, config::CELL_INTERACTION_RADIUS);
        Self {
            frame: 0,
            bodies,
            cell_list,
            gravity: config.gravity,
            bond_events: 0,
            removals: HashSet::new(),
            next_cluster_id: 0,
            cluster_sizes: HashMap::new(),
            rng,
        }
    }

    /// Construct a model from bare parameters with an OS-seeded stream.
    pub fn with_params(particle_count: usize, gravity: f32) -> Self {
        Self::new(SimConfig {
            particle_count,
            gravity,
            seed: None,
        })
    }

    /// Advance the soup by one step. The phase order is fixed: later phases
    /// depend on the state produced by earlier ones, and cluster enforcement
    /// must run after pruning so it never sees a dangling bond id.
    pub fn step(&mut self) {
        profile_scope!("step");

        {
            profile_scope!("particle_updates");
            let gravity = self.gravity;
            for i in 0..self.bodies.len() {
                let cluster_size = match self.bodies[i].cluster_id {
                    Some(cid) => self.cluster_sizes.get(&cid).copied().unwrap_or(0),
                    None => 0,
                };
                self.bodies[i].update(gravity, cluster_size, &mut self.rng);
            }
        }

        {
            profile_scope!("spatial_rebuild");
            self.cell_list.rebuild(&self.bodies);
        }

        bonding::run(self);
        aggregation::form_cells(self);
        aggregation::prune_removed(self);
        clusters::enforce(self);

        self.frame += 1;
    }

    pub fn alloc_cluster_id(&mut self) -> u64 {
        let id = self.next_cluster_id;
        self.next_cluster_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bond_events(&self) -> u64 {
        self.bond_events
    }

    /// Map from body id to index in the live collection. Valid until the
    /// collection is mutated; callers build it fresh per pass.
    pub fn id_index(&self) -> HashMap<u64, usize> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id, i))
            .collect()
    }
}
