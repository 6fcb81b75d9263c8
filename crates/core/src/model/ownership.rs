use std::collections::HashSet;

use crate::model::ids::PackageId;

/// The set of packages the current user has purchased.
///
/// Ownership is an external fact: the UI never mutates it, it only
/// re-reads a fresh set after a purchase completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipSet(HashSet<PackageId>);

impl OwnershipSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn owns(&self, id: PackageId) -> bool {
        self.0.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PackageId> for OwnershipSet {
    fn from_iter<I: IntoIterator<Item = PackageId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
