// simulation/mod.rs
// Module declarations and re-exports for the simulation submodules

pub mod aggregation;
pub mod bonding;
pub mod clusters;
pub mod simulation;
pub use simulation::*;
