use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to record a like or a pass
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwipeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
}

/// Admin decision on a verification request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerificationDecisionRequest {
    #[serde(alias = "request_id", rename = "requestId")]
    pub request_id: i64,
    #[validate(length(min = 1))]
    pub status: String,
}

/// Request to send a chat message
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

/// Editable profile fields; absent fields are left untouched
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default, alias = "full_name", rename = "fullName")]
    pub full_name: Option<String>,
    #[validate(length(min = 1, max = 40))]
    #[serde(default)]
    pub username: Option<String>,
    #[validate(length(max = 500))]
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub birthdate: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, alias = "photo_url", rename = "photoUrl")]
    pub photo_url: Option<String>,
    #[validate(range(min = 1, max = 500))]
    #[serde(default, alias = "distance_preference", rename = "distancePreference")]
    pub distance_preference: Option<i32>,
    #[validate(range(min = 18, max = 120))]
    #[serde(default, alias = "min_age", rename = "minAge")]
    pub min_age: Option<i32>,
    #[validate(range(min = 18, max = 120))]
    #[serde(default, alias = "max_age", rename = "maxAge")]
    pub max_age: Option<i32>,
}
