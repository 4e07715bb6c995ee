//! Daily quota counters and the free-tier limits they are checked against.

use serde::{Deserialize, Serialize};

use super::SwipeDirection;

/// Free-tier daily limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaLimits {
    /// Maximum accepted likes per calendar day.
    pub like_limit: u32,
    /// Maximum accepted swipes of any direction per calendar day.
    pub total_action_limit: u32,
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            like_limit: 4,
            total_action_limit: 10,
        }
    }
}

/// Tallies of a user's quota-counted swipes on one calendar date.
///
/// Stores keep one counter per (user, date). A date with no stored counter
/// reads as zero, which is how a new day starts fresh; nothing sweeps old
/// counters away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCounter {
    /// Counted likes.
    pub likes: u32,
    /// Counted swipes (likes + passes).
    pub total_actions: u32,
}

impl DailyCounter {
    /// Counts one accepted swipe.
    pub const fn record(&mut self, direction: SwipeDirection) {
        self.total_actions = self.total_actions.saturating_add(1);
        if direction.is_like() {
            self.likes = self.likes.saturating_add(1);
        }
    }

    /// Reverts one counted swipe, flooring both tallies at zero.
    pub const fn revert(&mut self, direction: SwipeDirection) {
        self.total_actions = self.total_actions.saturating_sub(1);
        if direction.is_like() {
            self.likes = self.likes.saturating_sub(1);
        }
    }
}
