//! PackageRegistry - ordered, capacity-bounded package store
//!
//! Packages are kept in insertion order so the oldest unassigned package is
//! always the first one handed out.

use crate::domain::{AgentId, Package, PackageId, PackageStatus};

/// Live packages owned by the coordinator
#[derive(Debug, Clone)]
pub struct PackageRegistry {
    packages: Vec<Package>,
    capacity: usize,
}

impl PackageRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            packages: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.packages.len() >= self.capacity
    }

    /// Create a new unshipped package, or `None` when the registry is full
    pub fn admit(&mut self) -> Option<PackageId> {
        if self.is_full() {
            return None;
        }

        let mut id = PackageId::generate();
        while self.get(&id).is_some() {
            id = PackageId::generate();
        }

        self.packages.push(Package::new(id.clone()));
        Some(id)
    }

    pub fn get(&self, id: &PackageId) -> Option<&Package> {
        self.packages.iter().find(|p| &p.id == id)
    }

    /// Packages in insertion order
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Packages currently owned by `unit`
    pub fn owned_by<'a>(&'a self, unit: &'a AgentId) -> impl Iterator<Item = &'a Package> + 'a {
        self.packages.iter().filter(move |p| p.is_owned_by(unit))
    }

    /// Bind the oldest unowned package to `unit`
    ///
    /// Owned packages are never touched.
    pub fn assign_next(&mut self, unit: &AgentId) -> Option<PackageId> {
        let package = self.packages.iter_mut().find(|p| !p.is_assigned())?;
        package.executor = Some(unit.clone());
        package.status = PackageStatus::Moving;
        Some(package.id.clone())
    }

    /// Remove every package owned by `unit`, stamping `outcome` on the removed records
    pub fn release_owned_by(&mut self, unit: &AgentId, outcome: PackageStatus) -> Vec<Package> {
        let (mut released, kept): (Vec<Package>, Vec<Package>) =
            self.packages.drain(..).partition(|p| p.is_owned_by(unit));
        self.packages = kept;

        for package in &mut released {
            package.status = outcome;
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admit_until_full() {
        let mut registry = PackageRegistry::new(3);
        for _ in 0..3 {
            assert!(registry.admit().is_some());
        }
        assert!(registry.is_full());
        assert!(registry.admit().is_none());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_admitted_package_is_unshipped() {
        let mut registry = PackageRegistry::new(5);
        let id = registry.admit().unwrap();
        let package = registry.get(&id).unwrap();
        assert_eq!(package.status, PackageStatus::Unshipped);
        assert!(package.executor.is_none());
    }

    #[test]
    fn test_assign_oldest_first() {
        let mut registry = PackageRegistry::new(5);
        let first = registry.admit().unwrap();
        let second = registry.admit().unwrap();
        let unit = AgentId::from("unit-1");

        assert_eq!(registry.assign_next(&unit), Some(first.clone()));
        let package = registry.get(&first).unwrap();
        assert_eq!(package.status, PackageStatus::Moving);
        assert_eq!(package.executor.as_ref(), Some(&unit));

        assert_eq!(registry.assign_next(&AgentId::from("unit-2")), Some(second));
    }

    #[test]
    fn test_owned_package_never_reassigned() {
        let mut registry = PackageRegistry::new(5);
        let only = registry.admit().unwrap();
        let first_unit = AgentId::from("unit-1");

        registry.assign_next(&first_unit);
        assert_eq!(registry.assign_next(&AgentId::from("unit-2")), None);
        assert!(registry.get(&only).unwrap().is_owned_by(&first_unit));
    }

    #[test]
    fn test_release_removes_every_owned_package() {
        let mut registry = PackageRegistry::new(5);
        let unit = AgentId::from("unit-1");
        let other = AgentId::from("unit-2");
        registry.admit();
        registry.admit();
        registry.admit();
        registry.assign_next(&unit);
        registry.assign_next(&unit);
        registry.assign_next(&other);

        let released = registry.release_owned_by(&unit, PackageStatus::Delivered);

        assert_eq!(released.len(), 2);
        assert!(released.iter().all(|p| p.status == PackageStatus::Delivered));
        assert_eq!(registry.owned_by(&unit).count(), 0);
        assert_eq!(registry.owned_by(&other).count(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_release_with_nothing_owned() {
        let mut registry = PackageRegistry::new(5);
        registry.admit();

        let released = registry.release_owned_by(&AgentId::from("unit-1"), PackageStatus::Inspected);
        assert!(released.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_release_preserves_order_of_remaining() {
        let mut registry = PackageRegistry::new(5);
        let a = registry.admit().unwrap();
        let b = registry.admit().unwrap();
        let c = registry.admit().unwrap();
        let unit = AgentId::from("unit-1");
        registry.assign_next(&unit);

        registry.release_owned_by(&unit, PackageStatus::Dropped);

        let ids: Vec<_> = registry.packages().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![b, c]);
        assert!(registry.get(&a).is_none());
    }
}
