//! ArrivalGenerator - injects new packages on a timer

use tracing::{debug, info};

use super::registry::PackageRegistry;
use crate::dice::Dice;
use crate::domain::PackageId;

/// Result of one arrival tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arrival {
    /// No package this tick
    None,
    /// A package arrived but the registry was full
    Refused,
    /// A new unshipped package was admitted
    Admitted(PackageId),
}

/// Probabilistic package source
#[derive(Debug, Clone, Copy)]
pub struct ArrivalGenerator {
    threshold: f64,
}

impl ArrivalGenerator {
    /// A package arrives whenever a draw exceeds `threshold`
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn tick(&self, registry: &mut PackageRegistry, dice: &mut dyn Dice) -> Arrival {
        if dice.roll() <= self.threshold {
            return Arrival::None;
        }

        match registry.admit() {
            Some(id) => {
                info!(package = %id, live = registry.len(), "New package arrived");
                Arrival::Admitted(id)
            }
            None => {
                debug!(capacity = registry.capacity(), "ArrivalGenerator::tick: registry full, package refused");
                Arrival::Refused
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{ScriptedDice, dice_from_seed};
    use proptest::prelude::*;

    #[test]
    fn test_no_arrival_below_threshold() {
        let mut registry = PackageRegistry::new(10);
        let mut dice = ScriptedDice::always(0.99);

        assert_eq!(ArrivalGenerator::new(0.99).tick(&mut registry, &mut dice), Arrival::None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_arrival_above_threshold() {
        let mut registry = PackageRegistry::new(10);
        let mut dice = ScriptedDice::always(0.995);

        let arrival = ArrivalGenerator::new(0.99).tick(&mut registry, &mut dice);
        assert!(matches!(arrival, Arrival::Admitted(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_full_registry_refuses() {
        let mut registry = PackageRegistry::new(1);
        let mut dice = ScriptedDice::always(1.0);
        let generator = ArrivalGenerator::new(0.0);

        generator.tick(&mut registry, &mut dice);
        assert_eq!(generator.tick(&mut registry, &mut dice), Arrival::Refused);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_thousand_ticks_stay_within_capacity() {
        let mut registry = PackageRegistry::new(10);
        let mut dice = dice_from_seed(Some(1));
        let generator = ArrivalGenerator::new(0.99);

        for _ in 0..1000 {
            generator.tick(&mut registry, dice.as_mut());
            assert!(registry.len() <= 10);
        }
    }

    proptest! {
        #[test]
        fn prop_registry_never_exceeds_capacity(
            capacity in 1usize..20,
            threshold in 0.0f64..1.0,
            seed in any::<u64>(),
        ) {
            let mut registry = PackageRegistry::new(capacity);
            let mut dice = dice_from_seed(Some(seed));
            let generator = ArrivalGenerator::new(threshold);

            for _ in 0..200 {
                generator.tick(&mut registry, dice.as_mut());
                prop_assert!(registry.len() <= capacity);
            }
        }
    }
}
