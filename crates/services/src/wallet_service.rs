use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use storage::{StorageError, WalletRepository};

use crate::error::WalletError;
use crate::payment_link::PaymentLinkService;

/// Outcome of a confirmed top-up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopupReceipt {
    pub ref_id: String,
    pub credited: u32,
    pub balance: u32,
}

/// Wallet balance plus online top-ups through the payment provider.
///
/// The wallet is kept in toman, the same unit as package prices.
pub struct WalletService {
    wallet: Arc<dyn WalletRepository>,
    links: Arc<PaymentLinkService>,
    credited: Mutex<HashSet<String>>,
}

impl WalletService {
    #[must_use]
    pub fn new(wallet: Arc<dyn WalletRepository>, links: Arc<PaymentLinkService>) -> Self {
        Self {
            wallet,
            links,
            credited: Mutex::new(HashSet::new()),
        }
    }

    /// # Errors
    ///
    /// Returns `WalletError::Storage` if the balance cannot be read.
    pub async fn balance(&self) -> Result<u32, WalletError> {
        Ok(self.wallet.balance().await?)
    }

    #[must_use]
    pub fn topups_enabled(&self) -> bool {
        self.links.enabled()
    }

    /// Ask the provider for a link that charges `amount_toman`.
    ///
    /// # Errors
    ///
    /// Returns `WalletError::Payment` when the link cannot be created.
    pub async fn topup_link(&self, amount_toman: u32) -> Result<String, WalletError> {
        let description = format!("Wallet top-up of {amount_toman} toman");
        Ok(self.links.create_link(amount_toman, &description).await?)
    }

    /// Verify a paid top-up with the provider, then credit the wallet.
    ///
    /// Each authority is credited at most once per session.
    ///
    /// # Errors
    ///
    /// Returns `WalletError::AlreadyCredited` for a repeated authority,
    /// `WalletError::Payment` when verification fails, and
    /// `WalletError::Storage` if the wallet cannot be updated.
    pub async fn confirm_topup(
        &self,
        authority: &str,
        amount_toman: u32,
    ) -> Result<TopupReceipt, WalletError> {
        let authority = authority.trim().to_string();
        if !self.reserve(&authority)? {
            return Err(WalletError::AlreadyCredited(authority));
        }

        let verified = self.links.verify_payment(&authority, amount_toman).await;
        let ref_id = match verified {
            Ok(ref_id) => ref_id,
            Err(err) => {
                self.release(&authority);
                return Err(err.into());
            }
        };

        let balance = match self.wallet.adjust_balance(i64::from(amount_toman)).await {
            Ok(balance) => balance,
            Err(err) => {
                tracing::error!(
                    %ref_id,
                    amount_toman,
                    error = %err,
                    "verified top-up not credited"
                );
                self.release(&authority);
                return Err(err.into());
            }
        };

        tracing::info!(%ref_id, amount_toman, balance, "wallet topped up");
        Ok(TopupReceipt {
            ref_id,
            credited: amount_toman,
            balance,
        })
    }

    fn reserve(&self, authority: &str) -> Result<bool, WalletError> {
        let mut guard = self
            .credited
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.insert(authority.to_string()))
    }

    fn release(&self, authority: &str) {
        if let Ok(mut guard) = self.credited.lock() {
            guard.remove(authority);
        }
    }
}
