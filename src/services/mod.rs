// Service exports
pub mod auth;
pub mod stripe;
pub mod supabase;

pub use auth::{is_admin, AuthError, AuthUser, SessionVerifier};
pub use stripe::{
    CheckoutSessionParams, StripeClient, StripeError, SubscriptionObject, WebhookEvent,
};
pub use supabase::{SupabaseClient, SupabaseError};
