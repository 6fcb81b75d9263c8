use std::env;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::PaymentLinkError;

/// Provider status code meaning "request accepted".
const CODE_OK: i64 = 100;

#[derive(Clone, Debug)]
pub struct PaymentLinkConfig {
    pub base_url: String,
    pub merchant_id: String,
    pub callback_url: String,
}

impl PaymentLinkConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let merchant_id = env::var("PACKS_PAYMENT_MERCHANT_ID").ok()?;
        if merchant_id.trim().is_empty() {
            return None;
        }
        let base_url = env::var("PACKS_PAYMENT_BASE_URL")
            .unwrap_or_else(|_| "https://api.zarinpal.com/pg/v4".into());
        let callback_url = env::var("PACKS_PAYMENT_CALLBACK_URL")
            .unwrap_or_else(|_| "http://localhost/payment_callback".into());
        Some(Self {
            base_url,
            merchant_id,
            callback_url,
        })
    }
}

/// Creates wallet top-up links with an external payment provider.
#[derive(Clone)]
pub struct PaymentLinkService {
    client: Client,
    config: Option<PaymentLinkConfig>,
}

impl PaymentLinkService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(PaymentLinkConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<PaymentLinkConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Request a payment link for topping up `amount_toman`.
    ///
    /// The provider bills in rial, so the amount is multiplied by ten.
    ///
    /// # Errors
    ///
    /// Returns `PaymentLinkError` when links are disabled, the amount is zero,
    /// the request fails, or the provider rejects it.
    pub async fn create_link(
        &self,
        amount_toman: u32,
        description: &str,
    ) -> Result<String, PaymentLinkError> {
        let config = self.config.as_ref().ok_or(PaymentLinkError::Disabled)?;
        if amount_toman == 0 {
            return Err(PaymentLinkError::InvalidAmount);
        }

        let payload = LinkRequest {
            merchant_id: &config.merchant_id,
            amount: to_rial(amount_toman),
            description,
            callback_url: format!("{}?amount={amount_toman}", config.callback_url),
        };

        tracing::info!(amount_toman, "requesting payment link");
        let body = self.post(config, "payment/link", &payload).await?;
        accepted_field(&body, "link")
    }

    /// Confirm a finished payment and return the provider's reference id.
    ///
    /// # Errors
    ///
    /// Returns `PaymentLinkError` when links are disabled, the authority is
    /// blank, the request fails, or the provider does not confirm it.
    pub async fn verify_payment(
        &self,
        authority: &str,
        amount_toman: u32,
    ) -> Result<String, PaymentLinkError> {
        let config = self.config.as_ref().ok_or(PaymentLinkError::Disabled)?;
        let authority = authority.trim();
        if authority.is_empty() {
            return Err(PaymentLinkError::MissingAuthority);
        }
        if amount_toman == 0 {
            return Err(PaymentLinkError::InvalidAmount);
        }

        let payload = VerifyRequest {
            merchant_id: &config.merchant_id,
            authority,
            amount: to_rial(amount_toman),
        };

        tracing::info!(amount_toman, "verifying payment");
        let body = self.post(config, "payment/verify", &payload).await?;
        accepted_field(&body, "ref_id")
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        config: &PaymentLinkConfig,
        path: &str,
        payload: &T,
    ) -> Result<Value, PaymentLinkError> {
        let url = format!("{}/{path}", config.base_url.trim_end_matches('/'));
        let response = self.client.post(url).json(payload).send().await?;
        let status = response.status();
        let raw = response.text().await?;

        // Error statuses usually still carry a JSON `errors` object.
        match serde_json::from_str::<Value>(&raw) {
            Ok(body) if status.is_success() => Ok(body),
            Ok(body) => Err(PaymentLinkError::Rejected(error_detail(&body))),
            Err(_) if status.is_success() => Err(PaymentLinkError::Rejected(raw)),
            Err(_) => Err(PaymentLinkError::HttpStatus(status)),
        }
    }
}

fn to_rial(amount_toman: u32) -> u64 {
    u64::from(amount_toman) * 10
}

/// Pull `field` out of an accepted (`code == 100`) response.
fn accepted_field(body: &Value, field: &str) -> Result<String, PaymentLinkError> {
    let data = body.get("data");
    let code = data.and_then(|data| data.get("code")).and_then(Value::as_i64);
    let value = data.and_then(|data| data.get(field)).and_then(|value| match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    });

    match (code, value) {
        (Some(CODE_OK), Some(value)) if !value.is_empty() => Ok(value),
        _ => Err(PaymentLinkError::Rejected(error_detail(body))),
    }
}

fn error_detail(body: &Value) -> String {
    body.get("errors")
        .filter(|errors| !errors.is_null())
        .unwrap_or(body)
        .to_string()
}

#[derive(Debug, Serialize)]
struct LinkRequest<'a> {
    merchant_id: &'a str,
    amount: u64,
    description: &'a str,
    callback_url: String,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    merchant_id: &'a str,
    authority: &'a str,
    amount: u64,
}
