//! End-to-end ledger scenarios driven through the public service API.

#![allow(clippy::panic)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use runmatch_core::domain::{
    ManualClock, QuotaLimits, SharedClock, SwipeDirection, UserId,
};
use runmatch_core::error::SwipeError;
use runmatch_core::service::SwipeService;

const LIKE: SwipeDirection = SwipeDirection::Like;
const PASS: SwipeDirection = SwipeDirection::Pass;

fn day_one() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).single().unwrap_or_default()
}

fn service() -> (SwipeService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(day_one()));
    let service = SwipeService::in_memory(
        Arc::clone(&clock) as SharedClock,
        QuotaLimits::default(),
    );
    (service, clock)
}

fn uid(raw: u64) -> UserId {
    UserId::new(raw)
}

#[tokio::test]
async fn free_user_hits_like_limit_and_resets_next_day() {
    let (service, clock) = service();
    let me = uid(1);

    for target in 2..=5 {
        assert!(service.swipe(me, uid(target), LIKE, false).await.is_ok());
    }
    assert_eq!(
        service.swipe(me, uid(6), LIKE, false).await,
        Err(SwipeError::LikeLimitReached { limit: 4 })
    );
    // Passes still fit under the total-action limit.
    assert!(service.swipe(me, uid(6), PASS, false).await.is_ok());

    clock.advance(Duration::days(1));
    assert!(service.swipe(me, uid(6), LIKE, false).await.is_ok());

    let status = service.quota_status(me, false).await;
    assert_eq!(status.likes_used, 1);
    assert_eq!(status.total_actions_used, 1);
    assert_eq!(status.likes_remaining, Some(3));
}

#[tokio::test]
async fn alternating_swipes_hit_total_limit() {
    let (service, _) = service();
    let me = uid(1);

    let mut target = 10;
    let mut direction = LIKE;
    while service.quota_status(me, false).await.total_actions_used < 10 {
        direction = if direction == LIKE { PASS } else { LIKE };
        match service.swipe(me, uid(target), direction, false).await {
            Ok(_) | Err(SwipeError::LikeLimitReached { .. }) => {}
            Err(other) => panic!("unexpected rejection: {other}"),
        }
        target += 1;
    }

    assert_eq!(
        service.swipe(me, uid(99), PASS, false).await,
        Err(SwipeError::TotalActionLimitReached { limit: 10 })
    );
    // The total-action check runs before the like check.
    assert_eq!(
        service.swipe(me, uid(99), LIKE, false).await,
        Err(SwipeError::TotalActionLimitReached { limit: 10 })
    );

    let status = service.quota_status(me, false).await;
    assert_eq!(status.total_actions_used, 10);
    assert_eq!(status.likes_used, 4);
    assert_eq!(status.actions_remaining, Some(0));
}

#[tokio::test]
async fn premium_likes_are_visible_to_targets() {
    let (service, _) = service();
    let a = uid(100);

    for target in 1..=3 {
        assert!(service.swipe(a, uid(target), LIKE, true).await.is_ok());
    }
    for target in 1..=3 {
        let Ok(likers) = service.who_liked_me(uid(target), true).await else {
            panic!("premium caller rejected");
        };
        assert_eq!(likers, vec![a]);
    }

    let status = service.quota_status(a, true).await;
    assert_eq!(status.likes_used, 0);
    assert_eq!(status.likes_remaining, None);
}

#[tokio::test]
async fn undo_restores_previous_state() {
    let (service, _) = service();
    let me = uid(7);

    assert!(service.swipe(me, uid(1), PASS, false).await.is_ok());
    let before_history = service.history(me, true).await;
    let before_quota = service.quota_status(me, false).await;

    assert!(service.swipe(me, uid(2), LIKE, false).await.is_ok());
    let Ok(undone) = service.undo_last_swipe(me, true).await else {
        panic!("undo rejected");
    };
    assert_eq!(undone.target_id, uid(2));
    assert_eq!(undone.direction, LIKE);

    assert_eq!(service.history(me, true).await, before_history);
    assert_eq!(service.quota_status(me, false).await, before_quota);
}

#[tokio::test]
async fn undo_past_midnight_leaves_new_day_untouched() {
    let (service, clock) = service();
    let me = uid(3);

    assert!(service.swipe(me, uid(1), LIKE, false).await.is_ok());
    clock.advance(Duration::days(1));
    assert!(service.swipe(me, uid(2), PASS, false).await.is_ok());
    assert!(service.undo_last_swipe(me, true).await.is_ok());
    // Yesterday's like belongs to a bucket that has already rolled over.
    assert!(service.undo_last_swipe(me, true).await.is_ok());

    let status = service.quota_status(me, false).await;
    assert_eq!(status.likes_used, 0);
    assert_eq!(status.total_actions_used, 0);
    assert!(matches!(
        service.undo_last_swipe(me, true).await,
        Err(SwipeError::NoSwipeToUndo { .. })
    ));
}

#[tokio::test]
async fn clock_stepping_back_keeps_each_day_capped() {
    let (service, clock) = service();
    let me = uid(4);
    let day_two = day_one() + Duration::days(1);

    clock.set(day_two);
    for target in 10..14 {
        assert!(service.swipe(me, uid(target), LIKE, false).await.is_ok());
    }
    clock.set(day_one());
    assert!(service.swipe(me, uid(20), PASS, false).await.is_ok());
    assert_eq!(service.quota_status(me, false).await.total_actions_used, 1);

    clock.set(day_two + Duration::hours(1));
    assert_eq!(
        service.swipe(me, uid(21), LIKE, false).await,
        Err(SwipeError::LikeLimitReached { limit: 4 })
    );

    let Ok(history) = service.history(me, true).await else {
        panic!("history rejected");
    };
    let likes_on_day_two = history
        .events
        .iter()
        .filter(|e| e.is_like() && e.date() == day_two.date_naive())
        .count();
    assert_eq!(likes_on_day_two, 4);
    assert_eq!(service.quota_status(me, false).await.likes_used, 4);
}

#[tokio::test]
async fn premium_gate_rejections_change_nothing() {
    let (service, _) = service();
    let me = uid(8);
    assert!(service.swipe(me, uid(1), LIKE, false).await.is_ok());
    let before = service.quota_status(me, false).await;

    assert!(service.who_liked_me(me, false).await.is_err());
    assert!(service.history(me, false).await.is_err());
    assert!(service.undo_last_swipe(me, false).await.is_err());

    assert_eq!(service.quota_status(me, false).await, before);
    let Ok(history) = service.history(me, true).await else {
        panic!("history rejected");
    };
    assert_eq!(history.likes, vec![uid(1)]);
}
