use std::sync::Arc;

use packs_core::ProgressPolicy;
use services::{CatalogService, PurchaseService, TestLauncher, WalletService};

pub trait UiApp: Send + Sync {
    fn progress_policy(&self) -> ProgressPolicy;

    fn catalog(&self) -> Arc<CatalogService>;
    fn purchases(&self) -> Arc<PurchaseService>;
    fn test_launcher(&self) -> Arc<dyn TestLauncher>;
    fn wallet(&self) -> Arc<WalletService>;
}

#[derive(Clone)]
pub struct AppContext {
    progress_policy: ProgressPolicy,

    catalog: Arc<CatalogService>,
    purchases: Arc<PurchaseService>,
    test_launcher: Arc<dyn TestLauncher>,
    wallet: Arc<WalletService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            progress_policy: app.progress_policy(),
            catalog: app.catalog(),
            purchases: app.purchases(),
            test_launcher: app.test_launcher(),
            wallet: app.wallet(),
        }
    }

    #[must_use]
    pub fn progress_policy(&self) -> ProgressPolicy {
        self.progress_policy
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

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
