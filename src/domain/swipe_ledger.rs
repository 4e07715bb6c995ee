//! Swipe ledger: quota enforcement, premium gating and single-step undo.
//!
//! [`SwipeLedger`] records like/pass swipes per user on top of a
//! [`LedgerStore`]. Free-tier callers are held to daily like and
//! total-action quotas; premium callers are recorded but never counted.
//!
//! # Invariant
//!
//! For every user and date `d`, the stored [`DailyCounter`] for `(user, d)`
//! equals the number of quota-counted events (resp. quota-counted likes)
//! in that user's sequence timestamped on `d`, whatever order the clock
//! produced them in. Every mutation checks first and writes last, so a
//! rejected call leaves the store untouched.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use mockable::Clock;
use serde::Serialize;

use super::{DailyCounter, QuotaLimits, SharedClock, SwipeDirection, SwipeEvent, UserId};
use crate::error::SwipeError;
use crate::store::{InMemoryLedgerStore, LedgerStore};

/// A user's swipe history, split by direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwipeHistory {
    /// Liked targets in chronological order.
    pub likes: Vec<UserId>,
    /// Passed targets in chronological order.
    pub passes: Vec<UserId>,
    /// Full event trail, oldest first.
    pub events: Vec<SwipeEvent>,
}

/// Snapshot of a user's quota usage for today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaStatus {
    /// The quota bucket date.
    pub date: NaiveDate,
    /// Counted likes today.
    pub likes_used: u32,
    /// Counted swipes today.
    pub total_actions_used: u32,
    /// Likes left today; `None` means unlimited.
    pub likes_remaining: Option<u32>,
    /// Swipes left today; `None` means unlimited.
    pub actions_remaining: Option<u32>,
}

pub(crate) const WHO_LIKED_ME: &str = "see who liked you";
pub(crate) const HISTORY: &str = "access swipe history";
pub(crate) const UNDO: &str = "undo the last swipe";

/// Fails with [`SwipeError::PremiumRequired`] unless the caller is premium.
pub(crate) fn require_premium(
    is_premium: bool,
    operation: &'static str,
) -> Result<(), SwipeError> {
    if is_premium {
        Ok(())
    } else {
        Err(SwipeError::PremiumRequired { operation })
    }
}

/// Per-user swipe sequences plus daily quota counters.
///
/// Mutations take `&mut self`; wrap the ledger in a lock (see
/// [`crate::service::SwipeService`]) to share it between tasks.
pub struct SwipeLedger<S: LedgerStore = InMemoryLedgerStore> {
    store: S,
    clock: SharedClock,
    limits: QuotaLimits,
}

impl<S: LedgerStore> fmt::Debug for SwipeLedger<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeLedger")
            .field("store", &self.store)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl<S: LedgerStore> SwipeLedger<S> {
    /// Creates a ledger over `store`, reading time from `clock`.
    #[must_use]
    pub fn new(store: S, clock: SharedClock, limits: QuotaLimits) -> Self {
        Self {
            store,
            clock,
            limits,
        }
    }

    /// Returns the configured free-tier limits.
    #[must_use]
    pub const fn limits(&self) -> QuotaLimits {
        self.limits
    }

    /// Returns a reference to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    fn counter_for(&self, user_id: UserId, date: NaiveDate) -> DailyCounter {
        self.store.counter(user_id, date).unwrap_or_default()
    }

    /// Records a swipe by `user_id` on `target_id`.
    ///
    /// Free-tier callers are checked against the total-action limit first,
    /// then (for likes) against the like limit. Premium swipes are
    /// recorded but not counted.
    ///
    /// # Errors
    ///
    /// Returns [`SwipeError::TotalActionLimitReached`] or
    /// [`SwipeError::LikeLimitReached`] when a free-tier quota for today
    /// is exhausted.
    pub fn swipe(
        &mut self,
        user_id: UserId,
        target_id: UserId,
        direction: SwipeDirection,
        is_premium: bool,
    ) -> Result<SwipeEvent, SwipeError> {
        let now = self.clock.utc();
        let today = now.date_naive();
        let mut counter = self.counter_for(user_id, today);

        if !is_premium {
            if counter.total_actions >= self.limits.total_action_limit {
                return Err(SwipeError::TotalActionLimitReached {
                    limit: self.limits.total_action_limit,
                });
            }
            if direction.is_like() && counter.likes >= self.limits.like_limit {
                return Err(SwipeError::LikeLimitReached {
                    limit: self.limits.like_limit,
                });
            }
        }

        let event = SwipeEvent {
            user_id,
            target_id,
            direction,
            timestamp: now,
            quota_counted: !is_premium,
        };
        self.store.append_event(event.clone());

        if !is_premium {
            counter.record(direction);
            self.store.put_counter(user_id, today, counter);
        }

        Ok(event)
    }

    /// Returns the users who liked `me_id` at least once.
    ///
    /// Users are reported in the order the store first saw them, each
    /// once, never including `me_id` itself.
    ///
    /// # Errors
    ///
    /// Returns [`SwipeError::PremiumRequired`] for free-tier callers.
    pub fn who_liked_me(
        &self,
        me_id: UserId,
        is_premium: bool,
    ) -> Result<Vec<UserId>, SwipeError> {
        require_premium(is_premium, WHO_LIKED_ME)?;

        let mut seen = HashSet::new();
        let likers = self
            .store
            .users()
            .into_iter()
            .filter(|uid| *uid != me_id)
            .filter(|uid| self.has_liked(*uid, me_id))
            .filter(|uid| seen.insert(*uid))
            .collect();
        Ok(likers)
    }

    /// Whether `liker`'s sequence holds a like on `target`.
    #[must_use]
    pub fn has_liked(&self, liker: UserId, target: UserId) -> bool {
        self.store
            .events(liker)
            .iter()
            .any(|e| e.target_id == target && e.is_like())
    }

    /// Returns the user's swipe history as owned copies.
    ///
    /// # Errors
    ///
    /// Returns [`SwipeError::PremiumRequired`] for free-tier callers.
    pub fn history(&self, user_id: UserId, is_premium: bool) -> Result<SwipeHistory, SwipeError> {
        require_premium(is_premium, HISTORY)?;

        let events = self.store.events(user_id);
        let targets = |like: bool| -> Vec<UserId> {
            events
                .iter()
                .filter(|e| e.is_like() == like)
                .map(|e| e.target_id)
                .collect()
        };
        let likes = targets(true);
        let passes = targets(false);
        Ok(SwipeHistory {
            likes,
            passes,
            events,
        })
    }

    /// Removes the user's most recent swipe and restores its quota.
    ///
    /// Gating uses the caller's current tier. Counters are adjusted in the
    /// bucket of the undone event's own date, never today's, and only if
    /// that event was counted in the first place.
    ///
    /// # Errors
    ///
    /// Returns [`SwipeError::PremiumRequired`] for free-tier callers and
    /// [`SwipeError::NoSwipeToUndo`] when the sequence is empty.
    pub fn undo_last_swipe(
        &mut self,
        user_id: UserId,
        is_premium: bool,
    ) -> Result<SwipeEvent, SwipeError> {
        require_premium(is_premium, UNDO)?;

        let last = self
            .store
            .pop_event(user_id)
            .ok_or(SwipeError::NoSwipeToUndo { user_id })?;

        let date = last.date();
        if last.quota_counted
            && let Some(mut counter) = self.store.counter(user_id, date)
        {
            counter.revert(last.direction);
            self.store.put_counter(user_id, date, counter);
        }

        Ok(last)
    }

    /// Reports today's quota usage without touching the store.
    #[must_use]
    pub fn quota_status(&self, user_id: UserId, is_premium: bool) -> QuotaStatus {
        let today = self.today();
        let counter = self.counter_for(user_id, today);
        let remaining = |limit: u32, used: u32| (!is_premium).then(|| limit.saturating_sub(used));
        QuotaStatus {
            date: today,
            likes_used: counter.likes,
            total_actions_used: counter.total_actions,
            likes_remaining: remaining(self.limits.like_limit, counter.likes),
            actions_remaining: remaining(self.limits.total_action_limit, counter.total_actions),
        }
    }
}
