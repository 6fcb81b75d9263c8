//! Shared error types for the services crate.

use thiserror::Error;

use packs_core::model::PackageId;
use storage::StorageError;

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by purchase gateways.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PurchaseError {
    #[error("package {0} does not exist")]
    UnknownPackage(PackageId),
    #[error("package {0} is already owned")]
    AlreadyOwned(PackageId),
    #[error("wallet balance {balance} is below the package price {price}")]
    InsufficientBalance { balance: u32, price: u32 },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `PaymentLinkService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PaymentLinkError {
    #[error("payment links are not configured")]
    Disabled,
    #[error("amount must be greater than zero")]
    InvalidAmount,
    #[error("payment authority is missing")]
    MissingAuthority,
    #[error("payment provider returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("payment provider rejected the request: {0}")]
    Rejected(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `WalletService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WalletError {
    #[error("payment {0} was already credited")]
    AlreadyCredited(String),
    #[error(transparent)]
    Payment(#[from] PaymentLinkError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
