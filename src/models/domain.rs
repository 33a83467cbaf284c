use serde::{Deserialize, Serialize};

/// Profile row in the managed store, keyed by the auth user id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub birthdate: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub distance_preference: Option<i32>,
    #[serde(default)]
    pub min_age: Option<i32>,
    #[serde(default)]
    pub max_age: Option<i32>,
    #[serde(default)]
    pub onboarded: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A recorded swipe edge (row in `likes` or `passes`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeRecord {
    pub id: i64,
    pub user_id: String,
    pub target_user_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Which swipe table a record lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeKind {
    Like,
    Pass,
}

/// Mutual match between two users; user1_id < user2_id by construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: i64,
    pub user1_id: String,
    pub user2_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl MatchRecord {
    /// Whether the given user is one of the two members of this match
    pub fn involves(&self, user_id: &str) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }
}

/// Chat message belonging to a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub match_id: i64,
    pub sender_id: String,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

/// Identity verification request, one per user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub id: i64,
    pub user_id: String,
    pub status: VerificationStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Joined profile name fields for the admin list view
    #[serde(default)]
    pub profiles: Option<ProfileName>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileName {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Mirror of payment-processor subscription state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub user_id: String,
    #[serde(default)]
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: String,
    pub status: String,
    #[serde(default)]
    pub current_period_end: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Candidate card returned by the `get_next_profiles` remote procedure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverCard {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub birthdate: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}
