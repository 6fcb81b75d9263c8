#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod payment_link;
pub mod purchase_service;
pub mod test_launcher;
pub mod wallet_service;

pub use app_services::AppServices;
pub use catalog_service::{CatalogService, CatalogSnapshot};
pub use error::{
    AppServicesError, CatalogServiceError, PaymentLinkError, PurchaseError, WalletError,
};
pub use payment_link::{PaymentLinkConfig, PaymentLinkService};
pub use purchase_service::{
    PurchaseGateway, PurchaseReceipt, PurchaseService, WalletPurchaseGateway,
};
pub use test_launcher::{NoopTestLauncher, TestLauncher};
pub use wallet_service::{TopupReceipt, WalletService};
