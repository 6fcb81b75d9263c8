use std::sync::Arc;

use storage::{CatalogFile, Storage};

use crate::catalog_service::CatalogService;
use crate::error::AppServicesError;
use crate::payment_link::PaymentLinkService;
use crate::purchase_service::{PurchaseService, WalletPurchaseGateway};
use crate::test_launcher::{NoopTestLauncher, TestLauncher};
use crate::wallet_service::WalletService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<CatalogService>,
    purchases: Arc<PurchaseService>,
    test_launcher: Arc<dyn TestLauncher>,
    wallet: Arc<WalletService>,
}

impl AppServices {
    /// Wire services over `storage`, paying for packages from its wallet and
    /// topping it up through `payment_links`.
    #[must_use]
    pub fn new(storage: &Storage, payment_links: PaymentLinkService) -> Self {
        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&storage.packages),
            Arc::clone(&storage.ownership),
        ));
        let gateway = WalletPurchaseGateway::new(
            Arc::clone(&storage.packages),
            Arc::clone(&storage.ownership),
            Arc::clone(&storage.wallet),
        );
        let purchases = Arc::new(PurchaseService::new(Arc::new(gateway)));
        let wallet = Arc::new(WalletService::new(
            Arc::clone(&storage.wallet),
            Arc::new(payment_links),
        ));

        Self {
            catalog,
            purchases,
            test_launcher: Arc::new(NoopTestLauncher),
            wallet,
        }
    }

    /// Build services from a parsed catalog file.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Storage` if the catalog is invalid.
    pub fn from_catalog(
        catalog: CatalogFile,
        payment_links: PaymentLinkService,
    ) -> Result<Self, AppServicesError> {
        let storage = catalog.into_storage()?;
        Ok(Self::new(&storage, payment_links))
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn purchases(&self) -> Arc<PurchaseService> {
        Arc::clone(&self.purchases)
    }

    #[must_use]
    pub fn test_launcher(&self) -> Arc<dyn TestLauncher> {
        Arc::clone(&self.test_launcher)
    }

    #[must_use]
    pub fn wallet(&self) -> Arc<WalletService> {
        Arc::clone(&self.wallet)
    }
}
