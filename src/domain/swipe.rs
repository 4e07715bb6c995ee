//! Swipe directions and the immutable swipe event record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;
use crate::error::SwipeError;

/// Direction of a swipe against a target user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    /// Interest in the target ("right" swipe). Counted against the like quota.
    Like,
    /// No interest ("left" swipe). Only counted against the total quota.
    Pass,
}

impl SwipeDirection {
    /// Returns the direction as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Pass => "pass",
        }
    }

    /// Returns `true` for [`SwipeDirection::Like`].
    #[must_use]
    pub const fn is_like(self) -> bool {
        matches!(self, Self::Like)
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwipeDirection {
    type Err = SwipeError;

    /// Accepts `like`/`right` and `pass`/`left`, case-insensitively.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "like" | "right" => Ok(Self::Like),
            "pass" | "left" => Ok(Self::Pass),
            _ => Err(SwipeError::InvalidDirection(raw.to_string())),
        }
    }
}

/// A recorded swipe. Never mutated once created; only removed by undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeEvent {
    /// User who swiped.
    pub user_id: UserId,
    /// User who was swiped on.
    pub target_id: UserId,
    /// Like or pass.
    pub direction: SwipeDirection,
    /// Instant the swipe was accepted.
    pub timestamp: DateTime<Utc>,
    /// Whether the swipe was recorded on the free tier and therefore
    /// counted toward the daily counters.
    #[serde(default)]
    pub quota_counted: bool,
}

impl SwipeEvent {
    /// Calendar date (UTC) of the swipe, i.e. its quota bucket.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Returns `true` if this event is a like.
    #[must_use]
    pub const fn is_like(&self) -> bool {
        self.direction.is_like()
    }
}
