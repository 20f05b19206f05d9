//! Public type inventories.

use std::collections::HashSet;

use crate::canonical::{CanonicalTypeName, canonicalize};
use crate::metadata::Assembly;

/// Canonical names of every public type an assembly declares.
///
/// Keeps both the discovery order (modules in order, then table order within
/// each module) and a set for membership tests.
#[derive(Debug, Clone, Default)]
pub struct TypeInventory {
    ordered: Vec<CanonicalTypeName>,
    names: HashSet<CanonicalTypeName>,
}

impl TypeInventory {
    /// Collect the public types declared directly by `assembly`.
    ///
    /// Visibility is taken from each type's own flags; enclosing types are not
    /// consulted.
    #[must_use]
    pub fn extract(assembly: &Assembly) -> Self {
        let mut inventory = Self::default();
        for module in assembly.modules() {
            let before = inventory.ordered.len();
            for ty in module.types().iter().filter(|ty| ty.is_public()) {
                inventory.push(canonicalize(&ty.full_name()));
            }
            tracing::debug!(
                target: "pipeline",
                stage = "inventory.module",
                module = module.name(),
                declared = module.types().len(),
                public = inventory.ordered.len() - before
            );
        }
        inventory
    }

    fn push(&mut self, name: CanonicalTypeName) {
        self.names.insert(name.clone());
        self.ordered.push(name);
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Names in discovery order. May repeat a name when two raw names
    /// canonicalize identically.
    pub fn iter(&self) -> impl Iterator<Item = &CanonicalTypeName> {
        self.ordered.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Number of distinct names.
    #[must_use]
    pub fn distinct_len(&self) -> usize {
        self.names.len()
    }
}

impl FromIterator<CanonicalTypeName> for TypeInventory {
    fn from_iter<I: IntoIterator<Item = CanonicalTypeName>>(iter: I) -> Self {
        let mut inventory = Self::default();
        for name in iter {
            inventory.push(name);
        }
        inventory
    }
}
