// Unit tests for Amora API

use amora_api::core::{
    action_for_event, choose_rewind_target, normalize_pair, rewinds_remaining, SubscriptionAction,
    DAILY_REWIND_ALLOWANCE,
};
use amora_api::models::{SwipeKind, SwipeRecord, VerificationStatus};
use chrono::{Duration, Utc};

fn swipe(id: i64, target: &str, offset_secs: i64) -> SwipeRecord {
    SwipeRecord {
        id,
        user_id: "actor".to_string(),
        target_user_id: target.to_string(),
        created_at: Utc::now() + Duration::seconds(offset_secs),
    }
}

#[test]
fn test_rewind_prefers_strictly_later_pass() {
    let like = swipe(1, "a", 0);
    let pass = swipe(2, "b", 1);

    let (kind, record) = choose_rewind_target(Some(&like), Some(&pass)).unwrap();
    assert_eq!(kind, SwipeKind::Pass);
    assert_eq!(record.id, 2);
}

#[test]
fn test_rewind_prefers_strictly_later_like() {
    let like = swipe(1, "a", 1);
    let pass = swipe(2, "b", 0);

    let (kind, record) = choose_rewind_target(Some(&like), Some(&pass)).unwrap();
    assert_eq!(kind, SwipeKind::Like);
    assert_eq!(record.id, 1);
}

#[test]
fn test_rewind_tie_goes_to_the_like() {
    let now = Utc::now();
    let mut like = swipe(1, "a", 0);
    let mut pass = swipe(2, "b", 0);
    like.created_at = now;
    pass.created_at = now;

    let (kind, _) = choose_rewind_target(Some(&like), Some(&pass)).unwrap();
    assert_eq!(kind, SwipeKind::Like);
}

#[test]
fn test_rewind_with_single_history_entry() {
    let like = swipe(1, "a", 0);
    assert_eq!(
        choose_rewind_target(Some(&like), None).unwrap().0,
        SwipeKind::Like
    );

    let pass = swipe(2, "b", 0);
    assert_eq!(
        choose_rewind_target(None, Some(&pass)).unwrap().0,
        SwipeKind::Pass
    );
}

#[test]
fn test_rewind_with_empty_history() {
    assert!(choose_rewind_target(None, None).is_none());
}

#[test]
fn test_pair_normalization_is_order_independent() {
    assert_eq!(normalize_pair("alice", "bob"), normalize_pair("bob", "alice"));
    assert_eq!(normalize_pair("alice", "bob"), ("alice", "bob"));
}

#[test]
fn test_rewind_allowance_math() {
    assert_eq!(DAILY_REWIND_ALLOWANCE, 1);
    assert_eq!(rewinds_remaining(false, 0), 0);
    assert_eq!(rewinds_remaining(true, 0), 1);
    assert_eq!(rewinds_remaining(true, 1), 0);
    // Usage beyond the allowance never goes negative
    assert_eq!(rewinds_remaining(true, 7), 0);
}

#[test]
fn test_subscription_event_dispatch() {
    assert_eq!(
        action_for_event("customer.subscription.created"),
        SubscriptionAction::Upsert
    );
    assert_eq!(
        action_for_event("customer.subscription.updated"),
        SubscriptionAction::Upsert
    );
    assert_eq!(
        action_for_event("customer.subscription.deleted"),
        SubscriptionAction::Cancel
    );
    assert_eq!(
        action_for_event("checkout.session.completed"),
        SubscriptionAction::Ignore
    );
    assert_eq!(
        action_for_event("payment_intent.succeeded"),
        SubscriptionAction::Ignore
    );
}

#[test]
fn test_swipe_kind_wire_format() {
    assert_eq!(serde_json::to_string(&SwipeKind::Like).unwrap(), "\"like\"");
    let parsed: SwipeKind = serde_json::from_str("\"pass\"").unwrap();
    assert_eq!(parsed, SwipeKind::Pass);
}

#[test]
fn test_verification_status_wire_format() {
    assert_eq!(
        serde_json::to_string(&VerificationStatus::Approved).unwrap(),
        "\"approved\""
    );
    let parsed: VerificationStatus = serde_json::from_str("\"pending\"").unwrap();
    assert_eq!(parsed, VerificationStatus::Pending);
}
