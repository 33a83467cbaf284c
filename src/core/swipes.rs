use crate::models::{SwipeKind, SwipeRecord};

/// Rewinds granted per day to subscribed users
pub const DAILY_REWIND_ALLOWANCE: i64 = 1;

/// Pick which swipe a rewind should undo.
///
/// The most recent of the two candidates wins; on an exact timestamp tie
/// the like is undone (the pass only wins when strictly later).
pub fn choose_rewind_target<'a>(
    last_like: Option<&'a SwipeRecord>,
    last_pass: Option<&'a SwipeRecord>,
) -> Option<(SwipeKind, &'a SwipeRecord)> {
    match (last_like, last_pass) {
        (None, None) => None,
        (Some(like), None) => Some((SwipeKind::Like, like)),
        (None, Some(pass)) => Some((SwipeKind::Pass, pass)),
        (Some(like), Some(pass)) => {
            if pass.created_at > like.created_at {
                Some((SwipeKind::Pass, pass))
            } else {
                Some((SwipeKind::Like, like))
            }
        }
    }
}

/// Order a pair of user ids so match rows are unique per unordered pair
pub fn normalize_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Remaining rewinds for today, never negative.
///
/// Users without an active subscription have no allowance at all.
pub fn rewinds_remaining(has_active_subscription: bool, used_today: i64) -> i64 {
    if !has_active_subscription {
        return 0;
    }
    (DAILY_REWIND_ALLOWANCE - used_today).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn swipe(id: i64, offset_secs: i64) -> SwipeRecord {
        SwipeRecord {
            id,
            user_id: "actor".to_string(),
            target_user_id: format!("target-{}", id),
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn test_no_swipes_no_target() {
        assert!(choose_rewind_target(None, None).is_none());
    }

    #[test]
    fn test_only_like_is_undone() {
        let like = swipe(1, 0);
        let (kind, record) = choose_rewind_target(Some(&like), None).unwrap();
        assert_eq!(kind, SwipeKind::Like);
        assert_eq!(record.id, 1);
    }

    #[test]
    fn test_only_pass_is_undone() {
        let pass = swipe(2, 0);
        let (kind, record) = choose_rewind_target(None, Some(&pass)).unwrap();
        assert_eq!(kind, SwipeKind::Pass);
        assert_eq!(record.id, 2);
    }

    #[test]
    fn test_later_pass_wins() {
        let like = swipe(1, 0);
        let pass = swipe(2, 10);
        let (kind, record) = choose_rewind_target(Some(&like), Some(&pass)).unwrap();
        assert_eq!(kind, SwipeKind::Pass);
        assert_eq!(record.id, 2);
    }

    #[test]
    fn test_later_like_wins() {
        let like = swipe(1, 10);
        let pass = swipe(2, 0);
        let (kind, record) = choose_rewind_target(Some(&like), Some(&pass)).unwrap();
        assert_eq!(kind, SwipeKind::Like);
        assert_eq!(record.id, 1);
    }

    #[test]
    fn test_timestamp_tie_favors_like() {
        let now = Utc::now();
        let mut like = swipe(1, 0);
        let mut pass = swipe(2, 0);
        like.created_at = now;
        pass.created_at = now;
        let (kind, _) = choose_rewind_target(Some(&like), Some(&pass)).unwrap();
        assert_eq!(kind, SwipeKind::Like);
    }

    #[test]
    fn test_normalize_pair_orders_lexicographically() {
        assert_eq!(normalize_pair("b", "a"), ("a", "b"));
        assert_eq!(normalize_pair("a", "b"), ("a", "b"));
        assert_eq!(normalize_pair("x", "x"), ("x", "x"));
    }

    #[test]
    fn test_rewinds_remaining_without_subscription() {
        assert_eq!(rewinds_remaining(false, 0), 0);
    }

    #[test]
    fn test_rewinds_remaining_clamps_at_zero() {
        assert_eq!(rewinds_remaining(true, 0), 1);
        assert_eq!(rewinds_remaining(true, 1), 0);
        assert_eq!(rewinds_remaining(true, 5), 0);
    }
}
