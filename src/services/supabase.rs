use crate::core::normalize_pair;
use crate::models::{
    DiscoverCard, MatchRecord, Message, Profile, SwipeRecord, UpdateProfileRequest,
    VerificationRequest, VerificationStatus,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the managed store
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Client for the managed backend-as-a-service REST data plane.
///
/// All rows live in the remote store; this client wraps its table
/// endpoints and remote procedures with the service-role key. Uniqueness
/// and dedup are enforced by the store's constraints together with the
/// conflict-resolution `Prefer` headers sent here.
pub struct SupabaseClient {
    base_url: String,
    service_key: String,
    client: Client,
}

impl SupabaseClient {
    pub fn new(base_url: String, service_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            service_key,
            client,
        }
    }

    fn table_url(&self, table: &str, query: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            table
        );
        if !query.is_empty() {
            let qs = query
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&qs);
        }
        url
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", &self.service_key))
    }

    async fn check_status(
        response: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, SupabaseError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("{} failed: {} - {}", context, status, body);
        Err(SupabaseError::ApiError(format!("{}: {}", context, status)))
    }

    /// Fetch rows matching the given PostgREST filter pairs
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, SupabaseError> {
        let url = self.table_url(table, query);
        tracing::debug!("Selecting from: {}", url);

        let response = self.authed(self.client.get(&url)).send().await?;
        let response = Self::check_status(response, &format!("select {}", table)).await?;

        let rows: Vec<T> = response.json().await.map_err(|e| {
            SupabaseError::InvalidResponse(format!("Failed to parse {} rows: {}", table, e))
        })?;
        Ok(rows)
    }

    /// Fetch at most one row; absent rows are not an error
    async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, SupabaseError> {
        let mut query = query.to_vec();
        query.push(("limit", "1".to_string()));
        let mut rows = self.select::<T>(table, &query).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    /// Insert a row, ignoring a duplicate on the given conflict columns
    async fn insert_ignoring_duplicates(
        &self,
        table: &str,
        conflict_columns: &str,
        body: Value,
    ) -> Result<(), SupabaseError> {
        let url = self.table_url(table, &[("on_conflict", conflict_columns.to_string())]);

        let response = self
            .authed(self.client.post(&url))
            .header("Prefer", "resolution=ignore-duplicates,return=minimal")
            .json(&body)
            .send()
            .await?;
        Self::check_status(response, &format!("insert {}", table)).await?;
        Ok(())
    }

    /// Insert a row, overwriting a duplicate on the given conflict columns
    async fn upsert(
        &self,
        table: &str,
        conflict_columns: &str,
        body: Value,
    ) -> Result<(), SupabaseError> {
        let url = self.table_url(table, &[("on_conflict", conflict_columns.to_string())]);

        let response = self
            .authed(self.client.post(&url))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&body)
            .send()
            .await?;
        Self::check_status(response, &format!("upsert {}", table)).await?;
        Ok(())
    }

    /// Plain insert with no conflict handling
    async fn insert(&self, table: &str, body: Value) -> Result<(), SupabaseError> {
        let url = self.table_url(table, &[]);

        let response = self
            .authed(self.client.post(&url))
            .header("Prefer", "return=minimal")
            .json(&body)
            .send()
            .await?;
        Self::check_status(response, &format!("insert {}", table)).await?;
        Ok(())
    }

    /// Update matching rows, returning the updated representations
    async fn update(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: Value,
    ) -> Result<Vec<Value>, SupabaseError> {
        let url = self.table_url(table, query);

        let response = self
            .authed(self.client.patch(&url))
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;
        let response = Self::check_status(response, &format!("update {}", table)).await?;

        let rows: Vec<Value> = response.json().await.map_err(|e| {
            SupabaseError::InvalidResponse(format!("Failed to parse {} rows: {}", table, e))
        })?;
        Ok(rows)
    }

    /// Delete a single row by primary key
    async fn delete_by_id(&self, table: &str, id: i64) -> Result<(), SupabaseError> {
        let url = self.table_url(table, &[("id", format!("eq.{}", id))]);

        let response = self.authed(self.client.delete(&url)).send().await?;
        Self::check_status(response, &format!("delete {}", table)).await?;
        Ok(())
    }

    /// Invoke a remote procedure and return its raw JSON result
    async fn rpc(&self, function: &str, args: Value) -> Result<Value, SupabaseError> {
        let url = format!(
            "{}/rest/v1/rpc/{}",
            self.base_url.trim_end_matches('/'),
            function
        );

        let response = self
            .authed(self.client.post(&url))
            .json(&args)
            .send()
            .await?;
        let response = Self::check_status(response, &format!("rpc {}", function)).await?;

        let value: Value = response.json().await.map_err(|e| {
            SupabaseError::InvalidResponse(format!("Failed to parse rpc {} result: {}", function, e))
        })?;
        Ok(value)
    }

    async fn rpc_bool(&self, function: &str, args: Value) -> Result<bool, SupabaseError> {
        let value = self.rpc(function, args).await?;
        value.as_bool().ok_or_else(|| {
            SupabaseError::InvalidResponse(format!("rpc {} did not return a boolean", function))
        })
    }

    // ---- swipes ----

    /// Record a like edge; a repeat like is a no-op
    pub async fn record_like(&self, user_id: &str, target_user_id: &str) -> Result<(), SupabaseError> {
        self.insert_ignoring_duplicates(
            "likes",
            "user_id,target_user_id",
            json!({ "user_id": user_id, "target_user_id": target_user_id }),
        )
        .await
    }

    /// Record a pass edge; a repeat pass is a no-op
    pub async fn record_pass(&self, user_id: &str, target_user_id: &str) -> Result<(), SupabaseError> {
        self.insert_ignoring_duplicates(
            "passes",
            "user_id,target_user_id",
            json!({ "user_id": user_id, "target_user_id": target_user_id }),
        )
        .await
    }

    /// Whether target has already liked the actor back
    pub async fn reciprocal_like_exists(
        &self,
        user_id: &str,
        target_user_id: &str,
    ) -> Result<bool, SupabaseError> {
        let row: Option<SwipeRecord> = self
            .select_one(
                "likes",
                &[
                    ("select", "*".to_string()),
                    ("user_id", format!("eq.{}", target_user_id)),
                    ("target_user_id", format!("eq.{}", user_id)),
                ],
            )
            .await?;
        Ok(row.is_some())
    }

    /// Create the match row for a pair; duplicate pairs are no-ops
    pub async fn record_match(&self, a: &str, b: &str) -> Result<(), SupabaseError> {
        let (user1, user2) = normalize_pair(a, b);
        self.insert_ignoring_duplicates(
            "matches",
            "user1_id,user2_id",
            json!({ "user1_id": user1, "user2_id": user2 }),
        )
        .await
    }

    /// Find the match row for a pair of users, if any
    pub async fn find_match_between(
        &self,
        a: &str,
        b: &str,
    ) -> Result<Option<MatchRecord>, SupabaseError> {
        let (user1, user2) = normalize_pair(a, b);
        self.select_one(
            "matches",
            &[
                ("select", "*".to_string()),
                ("user1_id", format!("eq.{}", user1)),
                ("user2_id", format!("eq.{}", user2)),
            ],
        )
        .await
    }

    pub async fn get_match(&self, match_id: i64) -> Result<Option<MatchRecord>, SupabaseError> {
        self.select_one(
            "matches",
            &[
                ("select", "*".to_string()),
                ("id", format!("eq.{}", match_id)),
            ],
        )
        .await
    }

    pub async fn delete_match(&self, match_id: i64) -> Result<(), SupabaseError> {
        self.delete_by_id("matches", match_id).await
    }

    async fn latest_swipe(
        &self,
        table: &str,
        user_id: &str,
    ) -> Result<Option<SwipeRecord>, SupabaseError> {
        self.select_one(
            table,
            &[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", user_id)),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    /// The actor's most recent like, if any
    pub async fn latest_like(&self, user_id: &str) -> Result<Option<SwipeRecord>, SupabaseError> {
        self.latest_swipe("likes", user_id).await
    }

    /// The actor's most recent pass, if any
    pub async fn latest_pass(&self, user_id: &str) -> Result<Option<SwipeRecord>, SupabaseError> {
        self.latest_swipe("passes", user_id).await
    }

    pub async fn delete_like(&self, id: i64) -> Result<(), SupabaseError> {
        self.delete_by_id("likes", id).await
    }

    pub async fn delete_pass(&self, id: i64) -> Result<(), SupabaseError> {
        self.delete_by_id("passes", id).await
    }

    /// Consume one rewind from the caller's quota if any remains
    pub async fn use_rewind_if_available(&self, user_id: &str) -> Result<bool, SupabaseError> {
        self.rpc_bool("use_rewind_if_available", json!({ "p_user_id": user_id }))
            .await
    }

    // ---- verification ----

    /// File a pending verification request; one per user, repeats ignored
    pub async fn create_verification_request(&self, user_id: &str) -> Result<(), SupabaseError> {
        self.insert_ignoring_duplicates(
            "verification_requests",
            "user_id",
            json!({ "user_id": user_id, "status": "pending" }),
        )
        .await
    }

    /// All verification requests, newest first, with profile names joined
    pub async fn list_verification_requests(
        &self,
    ) -> Result<Vec<VerificationRequest>, SupabaseError> {
        self.select(
            "verification_requests",
            &[
                (
                    "select",
                    "id,user_id,status,created_at,reviewed_at,profiles(full_name,username)"
                        .to_string(),
                ),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    /// Apply an admin decision; returns the subject user id, or None when
    /// the request does not exist
    pub async fn decide_verification(
        &self,
        request_id: i64,
        status: VerificationStatus,
    ) -> Result<Option<String>, SupabaseError> {
        let rows = self
            .update(
                "verification_requests",
                &[("id", format!("eq.{}", request_id))],
                json!({
                    "status": status,
                    "reviewed_at": chrono::Utc::now(),
                }),
            )
            .await?;

        Ok(rows
            .first()
            .and_then(|row| row.get("user_id"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()))
    }

    /// Flip the verified flag on a profile
    pub async fn set_profile_verified(
        &self,
        user_id: &str,
        verified: bool,
    ) -> Result<(), SupabaseError> {
        self.update(
            "profiles",
            &[("id", format!("eq.{}", user_id))],
            json!({ "is_verified": verified }),
        )
        .await?;
        Ok(())
    }

    // ---- subscriptions ----

    /// Mirror a payment-processor subscription, keyed by its external id
    pub async fn upsert_subscription(
        &self,
        user_id: &str,
        customer_id: Option<&str>,
        subscription_id: &str,
        status: &str,
        current_period_end: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<(), SupabaseError> {
        self.upsert(
            "subscriptions",
            "stripe_subscription_id",
            json!({
                "user_id": user_id,
                "stripe_customer_id": customer_id,
                "stripe_subscription_id": subscription_id,
                "status": status,
                "current_period_end": current_period_end,
                "updated_at": chrono::Utc::now(),
            }),
        )
        .await
    }

    /// Mark a mirrored subscription canceled
    pub async fn cancel_subscription(
        &self,
        subscription_id: &str,
        current_period_end: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<(), SupabaseError> {
        self.update(
            "subscriptions",
            &[("stripe_subscription_id", format!("eq.{}", subscription_id))],
            json!({
                "status": "canceled",
                "current_period_end": current_period_end,
                "updated_at": chrono::Utc::now(),
            }),
        )
        .await?;
        Ok(())
    }

    /// Whether the user holds any non-canceled subscription
    pub async fn has_active_subscription(&self, user_id: &str) -> Result<bool, SupabaseError> {
        #[derive(Deserialize)]
        struct StatusRow {
            #[allow(dead_code)]
            status: String,
        }

        let row: Option<StatusRow> = self
            .select_one(
                "subscriptions",
                &[
                    ("select", "status".to_string()),
                    ("user_id", format!("eq.{}", user_id)),
                    ("status", "neq.canceled".to_string()),
                ],
            )
            .await?;
        Ok(row.is_some())
    }

    /// Premium feature uses recorded for today (the quota RPC writes these)
    pub async fn premium_usage_today(
        &self,
        user_id: &str,
        usage_type: &str,
    ) -> Result<i64, SupabaseError> {
        #[derive(Deserialize)]
        struct UsageRow {
            count: i64,
        }

        let today = chrono::Utc::now().date_naive().to_string();
        let row: Option<UsageRow> = self
            .select_one(
                "premium_usage",
                &[
                    ("select", "count".to_string()),
                    ("user_id", format!("eq.{}", user_id)),
                    ("type", format!("eq.{}", usage_type)),
                    ("used_at", format!("eq.{}", today)),
                ],
            )
            .await?;
        Ok(row.map(|r| r.count).unwrap_or(0))
    }

    // ---- profiles & discovery ----

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, SupabaseError> {
        self.select_one(
            "profiles",
            &[
                ("select", "*".to_string()),
                ("id", format!("eq.{}", user_id)),
            ],
        )
        .await
    }

    /// Upsert the caller's editable profile fields and mark it onboarded
    pub async fn upsert_profile(
        &self,
        user_id: &str,
        updates: &UpdateProfileRequest,
    ) -> Result<(), SupabaseError> {
        let mut body = json!({
            "id": user_id,
            "onboarded": true,
            "updated_at": chrono::Utc::now(),
        });
        let obj = body.as_object_mut().expect("body is an object");
        if let Some(v) = &updates.full_name {
            obj.insert("full_name".to_string(), json!(v));
        }
        if let Some(v) = &updates.username {
            obj.insert("username".to_string(), json!(v));
        }
        if let Some(v) = &updates.bio {
            obj.insert("bio".to_string(), json!(v));
        }
        if let Some(v) = &updates.birthdate {
            obj.insert("birthdate".to_string(), json!(v));
        }
        if let Some(v) = &updates.gender {
            obj.insert("gender".to_string(), json!(v));
        }
        if let Some(v) = &updates.photo_url {
            obj.insert("photo_url".to_string(), json!(v));
        }
        if let Some(v) = &updates.distance_preference {
            obj.insert("distance_preference".to_string(), json!(v));
        }
        if let Some(v) = &updates.min_age {
            obj.insert("min_age".to_string(), json!(v));
        }
        if let Some(v) = &updates.max_age {
            obj.insert("max_age".to_string(), json!(v));
        }

        self.upsert("profiles", "id", body).await
    }

    /// Next swipe candidates for the caller; ranking happens remotely
    pub async fn get_next_profiles(&self, user_id: &str) -> Result<Vec<DiscoverCard>, SupabaseError> {
        let value = self
            .rpc("get_next_profiles", json!({ "p_user_id": user_id }))
            .await?;
        serde_json::from_value(value).map_err(|e| {
            SupabaseError::InvalidResponse(format!("Failed to parse discover cards: {}", e))
        })
    }

    // ---- chat ----

    /// Messages for a match, oldest first
    pub async fn messages_for_match(&self, match_id: i64) -> Result<Vec<Message>, SupabaseError> {
        self.select(
            "messages",
            &[
                ("select", "*".to_string()),
                ("match_id", format!("eq.{}", match_id)),
                ("order", "created_at.asc".to_string()),
            ],
        )
        .await
    }

    pub async fn insert_message(
        &self,
        match_id: i64,
        sender_id: &str,
        content: &str,
    ) -> Result<(), SupabaseError> {
        self.insert(
            "messages",
            json!({
                "match_id": match_id,
                "sender_id": sender_id,
                "content": content,
            }),
        )
        .await
    }

    /// Whether the caller may send another message right now
    pub async fn can_send_message(&self, user_id: &str) -> Result<bool, SupabaseError> {
        self.rpc_bool("can_send_message", json!({ "p_user_id": user_id }))
            .await
    }

    // ---- health ----

    /// Probe the store's REST root
    pub async fn health_check(&self) -> Result<bool, SupabaseError> {
        let url = format!("{}/rest/v1/", self.base_url.trim_end_matches('/'));
        let response = self.authed(self.client.get(&url)).send().await?;
        Ok(response.status().is_success())
    }
}
