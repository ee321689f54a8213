//! Task assignment and completion reconciliation

use tracing::debug;

use super::registry::PackageRegistry;
use crate::dice::Dice;
use crate::domain::{AgentId, Package, PackageId, PackageStatus};
use crate::protocol::Directive;

/// Coordinator decision for a task request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// Random quality-control diversion; nothing is bound to the unit
    Diverted,

    /// Oldest unowned package bound to the unit
    Assigned(PackageId),

    /// No unowned package; the request goes unanswered
    Unavailable,
}

impl Assignment {
    /// Reply to send, if any
    pub fn directive(&self) -> Option<Directive> {
        match self {
            Self::Diverted => Some(Directive::GoToInspection),
            Self::Assigned(_) => Some(Directive::GoToTerminal),
            Self::Unavailable => None,
        }
    }
}

/// Decide what `unit` should do next
///
/// The diversion draw happens first and wins regardless of whether any
/// package exists.
pub fn assign(
    registry: &mut PackageRegistry,
    unit: &AgentId,
    diversion_probability: f64,
    dice: &mut dyn Dice,
) -> Assignment {
    let roll = dice.roll();
    if roll < diversion_probability {
        debug!(%unit, roll, "assign: diverted to inspection");
        return Assignment::Diverted;
    }

    match registry.assign_next(unit) {
        Some(id) => Assignment::Assigned(id),
        None => Assignment::Unavailable,
    }
}

/// Remove everything `unit` owns after it reports `outcome`
pub fn reconcile(registry: &mut PackageRegistry, unit: &AgentId, outcome: PackageStatus) -> Vec<Package> {
    let released = registry.release_owned_by(unit, outcome);
    debug!(%unit, %outcome, released = released.len(), "reconcile: done");
    released
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    #[test]
    fn test_empty_registry_without_diversion_is_unavailable() {
        let mut registry = PackageRegistry::new(10);
        let mut dice = ScriptedDice::always(0.5);

        let decision = assign(&mut registry, &AgentId::from("unit-1"), 0.3, &mut dice);

        assert_eq!(decision, Assignment::Unavailable);
        assert_eq!(decision.directive(), None);
    }

    #[test]
    fn test_assigns_to_terminal() {
        let mut registry = PackageRegistry::new(10);
        let id = registry.admit().unwrap();
        let unit = AgentId::from("unit-1");
        let mut dice = ScriptedDice::always(0.3);

        let decision = assign(&mut registry, &unit, 0.3, &mut dice);

        assert_eq!(decision, Assignment::Assigned(id.clone()));
        assert_eq!(decision.directive(), Some(Directive::GoToTerminal));
        let package = registry.get(&id).unwrap();
        assert_eq!(package.status, PackageStatus::Moving);
        assert!(package.is_owned_by(&unit));
    }

    #[test]
    fn test_diversion_wins_and_binds_nothing() {
        let mut registry = PackageRegistry::new(10);
        let id = registry.admit().unwrap();
        let mut dice = ScriptedDice::always(0.29);

        let decision = assign(&mut registry, &AgentId::from("unit-1"), 0.3, &mut dice);

        assert_eq!(decision.directive(), Some(Directive::GoToInspection));
        assert!(!registry.get(&id).unwrap().is_assigned());
    }

    #[test]
    fn test_diversion_on_empty_registry() {
        let mut registry = PackageRegistry::new(10);
        let mut dice = ScriptedDice::always(0.0);

        let decision = assign(&mut registry, &AgentId::from("unit-1"), 0.3, &mut dice);
        assert_eq!(decision, Assignment::Diverted);
    }

    #[test]
    fn test_reconcile_leaves_nothing_owned() {
        let mut registry = PackageRegistry::new(10);
        let unit = AgentId::from("unit-1");
        registry.admit();
        registry.admit();
        registry.assign_next(&unit);
        registry.assign_next(&unit);

        let removed = reconcile(&mut registry, &unit, PackageStatus::Inspected);

        assert_eq!(removed.len(), 2);
        assert_eq!(registry.owned_by(&unit).count(), 0);
        assert!(registry.is_empty());
    }
}
