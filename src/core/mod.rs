// Core swipe/billing decision logic
pub mod billing;
pub mod swipes;

pub use billing::{action_for_event, SubscriptionAction};
pub use swipes::{
    choose_rewind_target, normalize_pair, rewinds_remaining, DAILY_REWIND_ALLOWANCE,
};
