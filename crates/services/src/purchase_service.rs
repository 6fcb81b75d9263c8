use std::sync::Arc;

use async_trait::async_trait;
use packs_core::model::PackageId;
use storage::{OwnershipRepository, PackageRepository, StorageError, WalletRepository};

use crate::error::PurchaseError;

/// Result of a successful purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub package_id: PackageId,
    pub charged: u32,
    pub balance: u32,
}

/// External purchase backend.
///
/// The UI fires a purchase and then re-reads ownership; it never grants
/// ownership itself.
#[async_trait]
pub trait PurchaseGateway: Send + Sync {
    /// # Errors
    ///
    /// Returns `PurchaseError` when the purchase cannot be completed.
    async fn purchase(&self, package_id: PackageId) -> Result<PurchaseReceipt, PurchaseError>;
}

/// Pays for packages from the local wallet balance.
#[derive(Clone)]
pub struct WalletPurchaseGateway {
    packages: Arc<dyn PackageRepository>,
    ownership: Arc<dyn OwnershipRepository>,
    wallet: Arc<dyn WalletRepository>,
}

impl WalletPurchaseGateway {
    #[must_use]
    pub fn new(
        packages: Arc<dyn PackageRepository>,
        ownership: Arc<dyn OwnershipRepository>,
        wallet: Arc<dyn WalletRepository>,
    ) -> Self {
        Self {
            packages,
            ownership,
            wallet,
        }
    }

    async fn refund(&self, package_id: PackageId, price: u32) {
        if let Err(err) = self.wallet.adjust_balance(i64::from(price)).await {
            tracing::error!(%package_id, price, error = %err, "refund failed");
        }
    }
}

#[async_trait]
impl PurchaseGateway for WalletPurchaseGateway {
    async fn purchase(&self, package_id: PackageId) -> Result<PurchaseReceipt, PurchaseError> {
        let package = match self.packages.get_package(package_id).await {
            Ok(package) => package,
            Err(StorageError::NotFound) => return Err(PurchaseError::UnknownPackage(package_id)),
            Err(err) => return Err(err.into()),
        };

        if self.ownership.owned_packages().await?.owns(package_id) {
            return Err(PurchaseError::AlreadyOwned(package_id));
        }

        let price = package.price();
        let balance = self.wallet.balance().await?;
        if balance < price {
            return Err(PurchaseError::InsufficientBalance { balance, price });
        }

        let remaining = match self.wallet.adjust_balance(-i64::from(price)).await {
            Ok(remaining) => remaining,
            // Another purchase drained the wallet since the check above.
            Err(StorageError::Invalid(_)) => {
                let balance = self.wallet.balance().await?;
                return Err(PurchaseError::InsufficientBalance { balance, price });
            }
            Err(err) => return Err(err.into()),
        };

        // Ownership may have been granted by an overlapping purchase; only the
        // call that actually records it keeps the charge.
        match self.ownership.grant(package_id).await {
            Ok(true) => {}
            Ok(false) => {
                self.refund(package_id, price).await;
                return Err(PurchaseError::AlreadyOwned(package_id));
            }
            Err(err) => {
                self.refund(package_id, price).await;
                return Err(err.into());
            }
        }

        Ok(PurchaseReceipt {
            package_id,
            charged: price,
            balance: remaining,
        })
    }
}

/// UI-facing purchase entry point.
#[derive(Clone)]
pub struct PurchaseService {
    gateway: Arc<dyn PurchaseGateway>,
}

impl PurchaseService {
    #[must_use]
    pub fn new(gateway: Arc<dyn PurchaseGateway>) -> Self {
        Self { gateway }
    }

    /// Buy a package through the configured gateway.
    ///
    /// # Errors
    ///
    /// Returns whatever `PurchaseError` the gateway reports.
    pub async fn buy(&self, package_id: PackageId) -> Result<PurchaseReceipt, PurchaseError> {
        tracing::info!(%package_id, "purchase requested");
        match self.gateway.purchase(package_id).await {
            Ok(receipt) => {
                tracing::info!(
                    %package_id,
                    charged = receipt.charged,
                    balance = receipt.balance,
                    "purchase completed"
                );
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(%package_id, error = %err, "purchase failed");
                Err(err)
            }
        }
    }
}
