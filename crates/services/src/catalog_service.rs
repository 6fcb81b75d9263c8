use std::sync::Arc;

use packs_core::model::{OwnershipSet, Package, PackageId};
use storage::{OwnershipRepository, PackageRepository};

use crate::error::CatalogServiceError;

/// Packages plus the ownership facts that go with them, read together so
/// a render never mixes a new catalog with stale ownership.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    pub packages: Vec<Package>,
    pub owned: OwnershipSet,
}

impl CatalogSnapshot {
    #[must_use]
    pub fn package(&self, id: PackageId) -> Option<&Package> {
        self.packages.iter().find(|package| package.id() == id)
    }

    #[must_use]
    pub fn owns(&self, id: PackageId) -> bool {
        self.owned.owns(id)
    }
}

/// Reads the package catalog and the user's ownership.
#[derive(Clone)]
pub struct CatalogService {
    packages: Arc<dyn PackageRepository>,
    ownership: Arc<dyn OwnershipRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(
        packages: Arc<dyn PackageRepository>,
        ownership: Arc<dyn OwnershipRepository>,
    ) -> Self {
        Self {
            packages,
            ownership,
        }
    }

    /// Load the catalog in display order along with current ownership.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::Storage` if either repository fails.
    pub async fn snapshot(&self) -> Result<CatalogSnapshot, CatalogServiceError> {
        let packages = self.packages.list_packages().await?;
        let owned = self.ownership.owned_packages().await?;
        tracing::debug!(
            packages = packages.len(),
            owned = owned.len(),
            "loaded catalog snapshot"
        );
        Ok(CatalogSnapshot { packages, owned })
    }
}
