//! Amora API - backend service for the Amora dating app
//!
//! Thin HTTP handlers over a managed backend-as-a-service: swipes and
//! matching, rewind, chat, identity verification, and subscription billing
//! synced from the payment processor.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{choose_rewind_target, normalize_pair, rewinds_remaining};
pub use models::{MatchRecord, Profile, SwipeKind, SwipeRecord};
pub use services::{SessionVerifier, StripeClient, SupabaseClient};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        assert_eq!(normalize_pair("b", "a"), ("a", "b"));
    }
}
