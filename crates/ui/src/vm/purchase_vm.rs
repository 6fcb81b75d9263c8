use packs_core::model::PackageId;
use services::PurchaseError;

/// Where an in-flight purchase stands, as far as the UI can tell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PurchaseStatus {
    #[default]
    Idle,
    Pending(PackageId),
    Failed { package_id: PackageId, message: String },
}

impl PurchaseStatus {
    #[must_use]
    pub fn is_pending_for(&self, id: PackageId) -> bool {
        matches!(self, Self::Pending(pending) if *pending == id)
    }

    #[must_use]
    pub fn failure_for(&self, id: PackageId) -> Option<&str> {
        match self {
            Self::Failed {
                package_id,
                message,
            } if *package_id == id => Some(message),
            _ => None,
        }
    }
}

#[must_use]
pub fn purchase_failure_message(err: &PurchaseError) -> String {
    match err {
        PurchaseError::InsufficientBalance { balance, price } => format!(
            "Your wallet balance ({balance}) is below the package price ({price}). Top up your wallet first."
        ),
        PurchaseError::AlreadyOwned(_) => "You already own this package.".to_string(),
        PurchaseError::UnknownPackage(_) => "This package is no longer available.".to_string(),
        _ => "Purchase failed. Please try again.".to_string(),
    }
}
