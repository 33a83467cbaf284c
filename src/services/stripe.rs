use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Accepted clock skew between the signature timestamp and now
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Errors that can occur when talking to the payment processor
#[derive(Debug, Error)]
pub enum StripeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Webhook signature verification failed: {0}")]
    InvalidSignature(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

/// Webhook event envelope; only the fields the sync cares about
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    pub object: SubscriptionObject,
}

/// Subscription object carried by the lifecycle events
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionObject {
    pub id: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl SubscriptionObject {
    /// App user carried in the subscription metadata, set at checkout
    pub fn user_id(&self) -> Option<&str> {
        self.metadata.get("user_id").map(|s| s.as_str())
    }

    pub fn period_end(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.current_period_end
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
    }
}

/// Parameters for a subscription Checkout session
#[derive(Debug, Clone)]
pub struct CheckoutSessionParams {
    pub user_id: String,
    pub email: Option<String>,
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Stripe API client plus webhook signature verification.
///
/// The API base is configurable so tests can point it at a local mock.
pub struct StripeClient {
    api_base: String,
    secret_key: String,
    webhook_secret: String,
    client: Client,
}

impl StripeClient {
    pub fn new(api_base: String, secret_key: String, webhook_secret: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_base,
            secret_key,
            webhook_secret,
            client,
        }
    }

    /// Verify the `Stripe-Signature` header against the raw payload.
    ///
    /// The header carries `t=<unix>,v1=<hex>[,v1=<hex>...]`; the expected
    /// signature is HMAC-SHA256 of `"{t}.{payload}"` under the webhook
    /// secret. Timestamps outside the tolerance window are rejected even
    /// with a valid signature.
    pub fn verify_signature(&self, payload: &[u8], header: &str) -> Result<(), StripeError> {
        self.verify_signature_at(payload, header, chrono::Utc::now())
    }

    pub fn verify_signature_at(
        &self,
        payload: &[u8],
        header: &str,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), StripeError> {
        let mut timestamp: Option<i64> = None;
        let mut candidates: Vec<Vec<u8>> = Vec::new();

        for part in header.split(',') {
            let mut kv = part.trim().splitn(2, '=');
            match (kv.next(), kv.next()) {
                (Some("t"), Some(value)) => {
                    timestamp = value.parse().ok();
                }
                (Some("v1"), Some(value)) => {
                    if let Ok(sig) = hex::decode(value) {
                        candidates.push(sig);
                    }
                }
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| StripeError::InvalidSignature("missing timestamp".to_string()))?;
        if candidates.is_empty() {
            return Err(StripeError::InvalidSignature(
                "no v1 signatures in header".to_string(),
            ));
        }
        if (now.timestamp() - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
            return Err(StripeError::InvalidSignature(
                "timestamp outside tolerance".to_string(),
            ));
        }

        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())
            .map_err(|e| StripeError::InvalidSignature(e.to_string()))?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);

        // verify_slice is constant-time
        let matched = candidates
            .iter()
            .any(|sig| mac.clone().verify_slice(sig).is_ok());
        if matched {
            Ok(())
        } else {
            Err(StripeError::InvalidSignature(
                "signature mismatch".to_string(),
            ))
        }
    }

    /// Verify the signature, then deserialize the event
    pub fn parse_event(&self, payload: &[u8], header: &str) -> Result<WebhookEvent, StripeError> {
        self.verify_signature(payload, header)?;
        serde_json::from_slice(payload).map_err(|e| StripeError::InvalidPayload(e.to_string()))
    }

    /// Create a subscription-mode Checkout session and return its URL
    pub async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<String, StripeError> {
        let url = format!(
            "{}/v1/checkout/sessions",
            self.api_base.trim_end_matches('/')
        );

        let mut form: Vec<(String, String)> = vec![
            ("mode".to_string(), "subscription".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("line_items[0][price]".to_string(), params.price_id.clone()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("metadata[user_id]".to_string(), params.user_id.clone()),
            (
                "subscription_data[metadata][user_id]".to_string(),
                params.user_id.clone(),
            ),
            ("success_url".to_string(), params.success_url.clone()),
            ("cancel_url".to_string(), params.cancel_url.clone()),
        ];
        if let Some(email) = &params.email {
            form.push(("customer_email".to_string(), email.clone()));
            form.push(("metadata[email]".to_string(), email.clone()));
            form.push((
                "subscription_data[metadata][email]".to_string(),
                email.clone(),
            ));
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Checkout session creation failed: {} - {}", status, body);
            return Err(StripeError::ApiError(format!(
                "Failed to create checkout session: {}",
                status
            )));
        }

        #[derive(Deserialize)]
        struct SessionResponse {
            url: Option<String>,
        }

        let session: SessionResponse = response.json().await?;
        session.url.ok_or_else(|| {
            StripeError::InvalidPayload("checkout session has no url".to_string())
        })
    }
}
