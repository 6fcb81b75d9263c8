use services::{PaymentLinkError, WalletError};

/// A payment link waiting for the user to pay and confirm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTopup {
    pub link: String,
    pub amount: u32,
}

/// Progress of the top-up form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TopupStatus {
    #[default]
    Idle,
    Working,
    Credited {
        ref_id: String,
        amount: u32,
    },
    Failed(String),
}

impl TopupStatus {
    #[must_use]
    pub fn is_working(&self) -> bool {
        matches!(self, Self::Working)
    }
}

#[must_use]
pub fn balance_label(balance: Option<u32>) -> String {
    match balance {
        Some(balance) => format!("Wallet balance: {balance}"),
        None => "Wallet balance: ...".to_string(),
    }
}

/// Parse the amount typed into the top-up form.
///
/// # Errors
///
/// Returns a user-facing message for blank, non-numeric, or zero input.
pub fn parse_topup_amount(raw: &str) -> Result<u32, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Enter an amount to top up.".to_string());
    }
    match raw.parse::<u32>() {
        Ok(amount) if amount > 0 => Ok(amount),
        _ => Err("Enter a whole amount greater than zero.".to_string()),
    }
}

#[must_use]
pub fn wallet_failure_message(err: &WalletError) -> String {
    match err {
        WalletError::AlreadyCredited(_) => {
            "This payment was already added to your wallet.".to_string()
        }
        WalletError::Payment(PaymentLinkError::Disabled) => {
            "Online top-up is not configured.".to_string()
        }
        WalletError::Payment(PaymentLinkError::Rejected(_)) => {
            "The payment provider did not accept this request.".to_string()
        }
        _ => "Top-up failed. Please try again.".to_string(),
    }
}
