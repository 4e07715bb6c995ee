//! Domain layer: identifiers, swipe records, quota counters and the ledger.
//!
//! This module contains the swipe model (directions, immutable events),
//! the per-date quota counters, the shared clock handle, and the
//! [`SwipeLedger`] that enforces free-tier quotas and premium gating.

pub mod clock;
pub mod daily_counter;
pub mod swipe;
pub mod swipe_ledger;
pub mod user_id;

pub use clock::{ManualClock, SharedClock};
pub use daily_counter::{DailyCounter, QuotaLimits};
pub use swipe::{SwipeDirection, SwipeEvent};
pub use swipe_ledger::{QuotaStatus, SwipeHistory, SwipeLedger};
pub use user_id::UserId;
