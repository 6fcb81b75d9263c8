//! JSON catalog files: the package list plus the user's starting state.

use std::path::Path;

use packs_core::model::PackageId;
use serde::{Deserialize, Serialize};

use crate::repository::{InMemoryRepository, PackageRecord, Storage, StorageError};

/// On-disk catalog shape.
///
/// ```json
/// {"packages": [{"id": 1, "name": "Math", "tests": [{"id": "a", "name": "Algebra"}]}],
///  "owned": [1], "balance": 500}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    pub packages: Vec<PackageRecord>,
    #[serde(default)]
    pub owned: Vec<PackageId>,
    #[serde(default)]
    pub balance: u32,
}

impl CatalogFile {
    /// Parse a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed JSON.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the file cannot be read, or
    /// `StorageError::Serialization` for malformed JSON.
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StorageError::Connection(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    /// Validate every record and build in-memory storage from it.
    ///
    /// Owned ids that do not name a catalog package are rejected so the UI
    /// never shows ownership of something it cannot render.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Invalid` for invalid packages, duplicate ids,
    /// or unknown owned ids.
    pub fn into_storage(self) -> Result<Storage, StorageError> {
        let packages = self
            .packages
            .into_iter()
            .map(PackageRecord::into_package)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(unknown) = self
            .owned
            .iter()
            .find(|id| !packages.iter().any(|package| package.id() == **id))
        {
            return Err(StorageError::Invalid(format!(
                "owned package {unknown} is not in the catalog"
            )));
        }

        let repo = InMemoryRepository::seeded(packages, self.owned, self.balance)?;
        Ok(Storage::from_repository(repo))
    }
}
