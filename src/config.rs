// Centralized configuration for simulation parameters

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ====================
// Domain
// ====================
/// Side length of the square simulation domain.
pub const DOMAIN_SIZE: f32 = 100.0;
/// Largest coordinate a particle may occupy on either axis.
pub const DOMAIN_MAX: f32 = 99.999;
/// Depth (y) below which the water column counts as "shallow".
pub const SHALLOW_DEPTH: f32 = 10.0;

// ====================
// Fluid column
// ====================
/// Fluid density at the surface (y = 0).
pub const DENSITY_SURFACE: f32 = 1.0;
/// Fluid density at the bottom of the domain (y = DOMAIN_SIZE).
pub const DENSITY_BOTTOM: f32 = 1.5;

/// Local fluid density at depth `y`, linear between the surface and bottom values.
pub fn fluid_density(y: f32) -> f32 {
    let t = (y / DOMAIN_SIZE).clamp(0.0, 1.0);
    DENSITY_SURFACE + (DENSITY_BOTTOM - DENSITY_SURFACE) * t
}

// ====================
// Movement
// ====================
/// Base Brownian jitter amplitude; the realized step is scaled by 1/sqrt(density).
pub const JITTER_SCALE: f32 = 1.0;
/// Gravity drag multiplier for particles that belong to a cluster.
pub const CLUSTER_DRAG_FACTOR: f32 = 1.5;

// ====================
// Resources
// ====================
/// Hard cap on per-particle resources.
pub const RESOURCE_MAX: f32 = 50.0;
/// Flat uptake base rate used when the gravity constant is zero.
pub const UPTAKE_FLAT: f32 = 0.5;
/// Uptake base rate at the surface under non-zero gravity.
pub const UPTAKE_SURFACE: f32 = 0.4;
/// Uptake base rate at the bottom under non-zero gravity.
pub const UPTAKE_BOTTOM: f32 = 0.8;
/// Per-member uptake bonus factor inside a cluster.
pub const CLUSTER_UPTAKE_BONUS: f32 = 0.1;

// ====================
// Cell metabolism
// ====================
/// Resources a cell burns every step.
pub const CELL_METABOLISM: f32 = 0.3;
/// Below this resource level a cell reverts to a plain nucleotide.
pub const CELL_STARVE_THRESHOLD: f32 = 5.0;

// ====================
// Bonding
// ====================
/// Pairing success probability in shallow water.
pub const PAIR_PROB_SHALLOW: f64 = 1.0;
/// Pairing success probability below the shallow band.
pub const PAIR_PROB_DEEP: f64 = 0.8;
/// Resource threshold (and cost) for pairing in shallow water.
pub const PAIR_COST_SHALLOW: f32 = 4.0;
/// Resource threshold (and cost) for pairing in deep water.
pub const PAIR_COST_DEEP: f32 = 5.0;
/// Minimum resources on both sides for cell-cell fusion.
pub const FUSION_MIN_RESOURCES: f32 = 10.0;
/// Fusion success probability.
pub const FUSION_PROB: f64 = 0.5;
/// A cell stops initiating fusion once it holds this many bonds.
pub const FUSION_MAX_BONDS: usize = 3;
/// Minimum resources a predator needs to absorb a neighbor.
pub const PREDATOR_MIN_RESOURCES: f32 = 10.0;
/// Prey must be below this resource level to be absorbed.
pub const PREY_MAX_RESOURCES: f32 = 3.0;

// ====================
// Interaction radii
// ====================
/// Neighbor query radius for nucleotide particles.
pub const NUCLEOTIDE_INTERACTION_RADIUS: f32 = 1.0;
/// Neighbor query radius (and stored body radius) for cell particles.
pub const CELL_INTERACTION_RADIUS: f32 = 2.0;

// ====================
// Chain promotion
// ====================
/// Minimum connected-component size for promotion to cell state.
pub const CHAIN_MIN_LEN: usize = 10;
/// Summed component resources must exceed this for promotion.
pub const CHAIN_MIN_RESOURCES: f32 = 100.0;

// ====================
// Cluster invariants
// ====================
/// Hard cap on cluster membership.
pub const CLUSTER_MAX_SIZE: usize = 10;
/// Clusters below this mean resource level are dissolved.
pub const CLUSTER_MIN_MEAN_RESOURCES: f32 = 10.0;

/// Runtime knobs for constructing a simulation. Loadable from TOML so runs
/// can be reproduced from a small config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default = "default_particle_count")]
    pub particle_count: usize,
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Seed for the random stream. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_particle_count() -> usize {
    200
}

fn default_gravity() -> f32 {
    0.05
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            particle_count: default_particle_count(),
            gravity: default_gravity(),
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: SimConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_interpolates_between_surface_and_bottom() {
        assert_eq!(fluid_density(0.0), DENSITY_SURFACE);
        assert_eq!(fluid_density(DOMAIN_SIZE), DENSITY_BOTTOM);
        let mid = fluid_density(DOMAIN_SIZE / 2.0);
        assert!(mid > DENSITY_SURFACE && mid < DENSITY_BOTTOM);
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let config = SimConfig {
            particle_count: 64,
            gravity: 0.0,
            seed: Some(7),
        };
        let text = toml::to_string(&config).unwrap();
        let back: SimConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.particle_count, 64);
        assert_eq!(back.gravity, 0.0);
        assert_eq!(back.seed, Some(7));
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: SimConfig = toml::from_str("gravity = 0.1").unwrap();
        assert_eq!(config.particle_count, default_particle_count());
        assert_eq!(config.seed, None);
    }
}
