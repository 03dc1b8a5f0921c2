use rand::Rng;
use ultraviolet::Vec2;

use crate::body::Body;
use crate::config;
use crate::species;

pub type SimRng = rand::rngs::StdRng;

/// Spawn `n` nucleotides at uniform random positions, with base types assigned
/// by index rotation over {A, G, C, U}.
pub fn spawn_soup(n: usize, rng: &mut SimRng) -> Vec<Body> {
    let mut bodies = Vec::with_capacity(n);
    for i in 0..n {
        let pos = Vec2::new(
            rng.random_range(0.0..config::DOMAIN_MAX),
            rng.random_range(0.0..config::DOMAIN_MAX),
        );
        bodies.push(Body::new(pos, species::rotation(i)));
    }
    bodies
}
