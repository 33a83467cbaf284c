use crate::models::domain::{DiscoverCard, Message, SwipeKind, VerificationRequest};
use serde::{Deserialize, Serialize};

/// Response for the like endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeResponse {
    #[serde(rename = "match")]
    pub matched: bool,
}

/// Generic success/denial response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Response for the rewind endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewindResponse {
    pub success: bool,
    #[serde(rename = "undoneType")]
    pub undone_type: Option<SwipeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response for the rewind status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewindStatusResponse {
    #[serde(rename = "rewindsAvailable")]
    pub rewinds_available: i64,
}

/// Admin list of verification requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRequestsResponse {
    pub requests: Vec<VerificationRequest>,
}

/// Chat history for a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

/// Discovery candidates for the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverResponse {
    pub profiles: Vec<DiscoverCard>,
}

/// Checkout session creation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSessionResponse {
    pub url: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
