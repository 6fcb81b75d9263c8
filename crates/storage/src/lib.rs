#![forbid(unsafe_code)]

pub mod catalog;
pub mod repository;

pub use catalog::CatalogFile;
pub use repository::{
    InMemoryRepository, OwnershipRepository, PackageRecord, PackageRepository, Storage,
    StorageError, TestRecord, WalletRepository,
};
