// Defines the body struct (position, base type, mass, resources, bond partners)
// and its per-step update: gravity drift, Brownian jitter, resource uptake and
// cell metabolism.

use rand::Rng;
use serde::Serialize;
use smallvec::SmallVec;
use ultraviolet::Vec2;

use crate::config;
use crate::species;
use crate::utils::SimRng;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum BaseType {
    A,
    G,
    C,
    U,
}

/// A single particle in the soup: either a free nucleotide (carrying a base
/// type) or a cell (base cleared on promotion). Bond partners are stored by id;
/// the relation is kept symmetric and irreflexive by the bonding pass.
#[derive(Clone, Debug)]
pub struct Body {
    pub id: u64,
    pub pos: Vec2,
    pub base: Option<BaseType>,
    pub mass: f32,
    pub resources: f32,
    pub bonds: SmallVec<[u64; 4]>,
    pub is_cell: bool,
    pub radius: f32,
    pub cluster_id: Option<u64>,
}

use std::sync::atomic::{AtomicU64, Ordering};
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl Body {
    pub fn new(pos: Vec2, base: BaseType) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            pos,
            base: Some(base),
            mass: species::base_mass(base),
            resources: 0.0,
            bonds: SmallVec::new(),
            is_cell: false,
            radius: 0.0,
            cluster_id: None,
        }
    }

    /// Radius used when querying the spatial index; derived from the cell
    /// flag, not from the stored body radius.
    pub fn interaction_radius(&self) -> f32 {
        if self.is_cell {
            config::CELL_INTERACTION_RADIUS
        } else {
            config::NUCLEOTIDE_INTERACTION_RADIUS
        }
    }

    pub fn add_resources(&mut self, amount: f32) {
        self.resources = (self.resources + amount).clamp(0.0, config::RESOURCE_MAX);
    }

    pub fn clamp_position(&mut self) {
        self.pos.x = self.pos.x.clamp(0.0, config::DOMAIN_MAX);
        self.pos.y = self.pos.y.clamp(0.0, config::DOMAIN_MAX);
    }

    /// Downward drift from gravity. Clustered bodies sink faster because the
    /// aggregate drags its members along.
    pub fn apply_gravity(&mut self, gravity: f32) {
        if gravity == 0.0 {
            return;
        }
        let drag = if self.cluster_id.is_some() {
            config::CLUSTER_DRAG_FACTOR
        } else {
            1.0
        };
        self.pos.y += gravity * self.mass * drag;
    }

    /// Isotropic Brownian jitter, damped by the local fluid density and
    /// halved for cells. Clamps the result into the domain square.
    pub fn apply_jitter(&mut self, density: f32, rng: &mut SimRng) {
        let mut scale = config::JITTER_SCALE / density.sqrt();
        if self.is_cell {
            scale *= 0.5;
        }
        self.pos.x += rng.random_range(-1.0..1.0f32) * scale;
        self.pos.y += rng.random_range(-1.0..1.0f32) * scale;
        self.clamp_position();
    }

    /// Resource uptake rate at the current depth. Under zero gravity the
    /// water column is unstratified and a flat base rate applies.
    pub fn uptake_rate(&self, gravity: f32, density: f32, cluster_size: usize) -> f32 {
        let base = if gravity == 0.0 {
            config::UPTAKE_FLAT
        } else {
            let t = (self.pos.y / config::DOMAIN_SIZE).clamp(0.0, 1.0);
            config::UPTAKE_SURFACE + (config::UPTAKE_BOTTOM - config::UPTAKE_SURFACE) * t
        };
        let mut rate = base * (density / config::DENSITY_SURFACE);
        if self.is_cell {
            rate *= 2.0;
        }
        if self.cluster_id.is_some() {
            rate *= 1.0 + config::CLUSTER_UPTAKE_BONUS * cluster_size as f32;
        }
        rate
    }

    /// Burn the per-step metabolism cost; a cell that drops below the
    /// starvation threshold reverts to nucleotide state. Base type and bonds
    /// are not restored by reversion.
    pub fn metabolize(&mut self) {
        if !self.is_cell {
            return;
        }
        self.resources = (self.resources - config::CELL_METABOLISM).max(0.0);
        if self.resources < config::CELL_STARVE_THRESHOLD {
            self.revert_to_nucleotide();
        }
    }

    fn revert_to_nucleotide(&mut self) {
        self.is_cell = false;
        self.radius = 0.0;
        self.mass = species::NUCLEOTIDE_MEAN_MASS;
    }

    /// One full particle update. Ordering matters: uptake reads the position
    /// produced by the movement phase.
    pub fn update(&mut self, gravity: f32, cluster_size: usize, rng: &mut SimRng) {
        let density = config::fluid_density(self.pos.y);
        self.apply_gravity(gravity);
        self.apply_jitter(density, rng);
        let density = config::fluid_density(self.pos.y);
        let uptake = self.uptake_rate(gravity, density, cluster_size);
        self.add_resources(uptake);
        self.metabolize();
    }

    pub fn promote_to_cell(&mut self) {
        self.is_cell = true;
        self.radius = config::CELL_INTERACTION_RADIUS;
        self.base = None;
        self.mass = species::CELL_MASS;
    }
}
