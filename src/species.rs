use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::body::BaseType;

/// Mass a body takes on when promoted to cell state.
pub const CELL_MASS: f32 = 2.0;
/// Mass assigned when a starved cell reverts to nucleotide state.
pub const NUCLEOTIDE_MEAN_MASS: f32 = 0.975;

#[derive(Clone, Copy, Debug)]
pub struct BaseProps {
    pub mass: f32,
}

pub static BASE_PROPERTIES: Lazy<HashMap<BaseType, BaseProps>> = Lazy::new(|| {
    use BaseType::*;
    let mut m = HashMap::new();
    m.insert(A, BaseProps { mass: 1.0 });
    m.insert(G, BaseProps { mass: 1.2 });
    m.insert(C, BaseProps { mass: 0.8 });
    m.insert(U, BaseProps { mass: 0.9 });
    m
});

pub fn base_mass(base: BaseType) -> f32 {
    BASE_PROPERTIES[&base].mass
}

/// Watson-Crick style complementarity: A pairs with U, G pairs with C.
pub fn complements(a: BaseType, b: BaseType) -> bool {
    use BaseType::*;
    matches!((a, b), (A, U) | (U, A) | (G, C) | (C, G))
}

/// Deterministic base assignment for the i-th spawned particle.
pub fn rotation(index: usize) -> BaseType {
    use BaseType::*;
    match index % 4 {
        0 => A,
        1 => G,
        2 => C,
        _ => U,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BaseType::*;

    #[test]
    fn complement_relation_is_symmetric() {
        assert!(complements(A, U));
        assert!(complements(U, A));
        assert!(complements(G, C));
        assert!(complements(C, G));
        assert!(!complements(A, G));
        assert!(!complements(A, A));
    }

    #[test]
    fn rotation_cycles_over_all_bases() {
        assert_eq!(rotation(0), A);
        assert_eq!(rotation(1), G);
        assert_eq!(rotation(2), C);
        assert_eq!(rotation(3), U);
        assert_eq!(rotation(4), A);
    }

    #[test]
    fn every_base_has_properties() {
        for base in [A, G, C, U] {
            assert!(base_mass(base) > 0.0);
        }
    }
}
