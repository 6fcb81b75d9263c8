use async_trait::async_trait;
use packs_core::model::{OwnershipSet, Package, PackageError, PackageId, Test, TestId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid catalog data: {0}")]
    Invalid(String),
}

impl From<PackageError> for StorageError {
    fn from(err: PackageError) -> Self {
        StorageError::Invalid(err.to_string())
    }
}

/// Serialized shape of a test inside a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub id: TestId,
    pub name: String,
}

/// Serialized shape of a package.
///
/// This mirrors the domain `Package` so catalogs can be read without
/// leaking serde concerns into the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub id: PackageId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub guide: String,
    #[serde(default)]
    pub tests: Vec<TestRecord>,
    #[serde(default)]
    pub price: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
}

impl PackageRecord {
    #[must_use]
    pub fn from_package(package: &Package) -> Self {
        Self {
            id: package.id(),
            name: package.name().to_owned(),
            description: package.description().to_owned(),
            guide: package.guide().to_owned(),
            tests: package
                .tests()
                .iter()
                .map(|test| TestRecord {
                    id: test.id().clone(),
                    name: test.name().to_owned(),
                })
                .collect(),
            price: package.price(),
            estimated_time: package.estimated_time().map(str::to_owned),
        }
    }

    /// Convert the record back into a domain `Package`.
    ///
    /// # Errors
    ///
    /// Returns `PackageError` if the package or one of its tests fails validation.
    pub fn into_package(self) -> Result<Package, PackageError> {
        let tests = self
            .tests
            .into_iter()
            .map(|test| Test::new(test.id, test.name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(
            Package::new(self.id, self.name, self.description, self.guide, tests)?
                .with_price(self.price)
                .with_estimated_time(self.estimated_time),
        )
    }
}

/// Read access to the package catalog.
#[async_trait]
pub trait PackageRepository: Send + Sync {
    /// List packages in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn list_packages(&self) -> Result<Vec<Package>, StorageError>;

    /// Fetch a package by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_package(&self, id: PackageId) -> Result<Package, StorageError>;
}

/// Which packages the user owns.
#[async_trait]
pub trait OwnershipRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if ownership cannot be read.
    async fn owned_packages(&self) -> Result<OwnershipSet, StorageError>;

    /// Record ownership. Returns `false` if the package was already owned.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if ownership cannot be written.
    async fn grant(&self, id: PackageId) -> Result<bool, StorageError>;
}

/// The user's wallet balance, in whole currency units.
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the balance cannot be read.
    async fn balance(&self) -> Result<u32, StorageError>;

    /// Apply a signed delta and return the new balance.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Invalid` if the balance would go negative or overflow.
    async fn adjust_balance(&self, delta: i64) -> Result<u32, StorageError>;
}

/// Simple in-memory repository for tests/dev and catalog-file startup.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    packages: Arc<Mutex<Vec<Package>>>,
    owned: Arc<Mutex<HashSet<PackageId>>>,
    balance: Arc<Mutex<u32>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository seeded with packages, owned ids, and a balance.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Invalid` if two packages share an id.
    pub fn seeded(
        packages: Vec<Package>,
        owned: impl IntoIterator<Item = PackageId>,
        balance: u32,
    ) -> Result<Self, StorageError> {
        let mut seen = HashSet::with_capacity(packages.len());
        for package in &packages {
            if !seen.insert(package.id()) {
                return Err(StorageError::Invalid(format!(
                    "package {} appears more than once",
                    package.id()
                )));
            }
        }

        Ok(Self {
            packages: Arc::new(Mutex::new(packages)),
            owned: Arc::new(Mutex::new(owned.into_iter().collect())),
            balance: Arc::new(Mutex::new(balance)),
        })
    }
}

#[async_trait]
impl PackageRepository for InMemoryRepository {
    async fn list_packages(&self) -> Result<Vec<Package>, StorageError> {
        let guard = self
            .packages
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn get_package(&self, id: PackageId) -> Result<Package, StorageError> {
        let guard = self
            .packages
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|package| package.id() == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl OwnershipRepository for InMemoryRepository {
    async fn owned_packages(&self) -> Result<OwnershipSet, StorageError> {
        let guard = self
            .owned
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().copied().collect())
    }

    async fn grant(&self, id: PackageId) -> Result<bool, StorageError> {
        let mut guard = self
            .owned
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.insert(id))
    }
}

#[async_trait]
impl WalletRepository for InMemoryRepository {
    async fn balance(&self) -> Result<u32, StorageError> {
        let guard = self
            .balance
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn adjust_balance(&self, delta: i64) -> Result<u32, StorageError> {
        let mut guard = self
            .balance
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let next = i64::from(*guard) + delta;
        let next = u32::try_from(next)
            .map_err(|_| StorageError::Invalid(format!("balance out of range: {next}")))?;
        *guard = next;
        Ok(next)
    }
}

/// Aggregates catalog, ownership, and wallet repositories behind trait objects.
#[derive(Clone)]
pub struct Storage {
    pub packages: Arc<dyn PackageRepository>,
    pub ownership: Arc<dyn OwnershipRepository>,
    pub wallet: Arc<dyn WalletRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_repository(repo: InMemoryRepository) -> Self {
        let packages: Arc<dyn PackageRepository> = Arc::new(repo.clone());
        let ownership: Arc<dyn OwnershipRepository> = Arc::new(repo.clone());
        let wallet: Arc<dyn WalletRepository> = Arc::new(repo);
        Self {
            packages,
            ownership,
            wallet,
        }
    }
}
