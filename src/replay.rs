//! Deterministic replay of scripted ledger commands.
//!
//! A script is a JSON array of commands tagged by `op`. Each command may
//! pin the clock with an `at` timestamp before it runs, which makes
//! quota rollover reproducible:
//!
//! ```json
//! [
//!   { "op": "swipe", "user_id": 1, "target_id": 2, "direction": "like",
//!     "at": "2024-05-01T09:00:00Z" },
//!   { "op": "quota", "user_id": 1 },
//!   { "op": "undo", "user_id": 1, "is_premium": true }
//! ]
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ManualClock, UserId};
use crate::error::{ErrorBody, ErrorResponse, SwipeError};
use crate::service::SwipeService;
use crate::store::LedgerStore;

/// One scripted ledger call.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ReplayCommand {
    /// Record a swipe.
    Swipe {
        /// Swiping user.
        user_id: UserId,
        /// Swiped user.
        target_id: UserId,
        /// Raw direction text, parsed like any caller input.
        direction: String,
        /// Caller's tier.
        #[serde(default)]
        is_premium: bool,
        /// Clock instant to set before running.
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
    /// Undo the user's last swipe.
    Undo {
        /// Calling user.
        user_id: UserId,
        /// Caller's tier.
        #[serde(default)]
        is_premium: bool,
        /// Clock instant to set before running.
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
    /// List users who liked the caller.
    WhoLikedMe {
        /// Calling user.
        user_id: UserId,
        /// Caller's tier.
        #[serde(default)]
        is_premium: bool,
        /// Clock instant to set before running.
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
    /// Fetch the caller's swipe history.
    History {
        /// Calling user.
        user_id: UserId,
        /// Caller's tier.
        #[serde(default)]
        is_premium: bool,
        /// Clock instant to set before running.
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
    /// Report the caller's quota usage.
    Quota {
        /// Calling user.
        user_id: UserId,
        /// Caller's tier.
        #[serde(default)]
        is_premium: bool,
        /// Clock instant to set before running.
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
}

impl ReplayCommand {
    /// Returns the command tag as a static string slice.
    #[must_use]
    pub const fn op(&self) -> &'static str {
        match self {
            Self::Swipe { .. } => "swipe",
            Self::Undo { .. } => "undo",
            Self::WhoLikedMe { .. } => "who_liked_me",
            Self::History { .. } => "history",
            Self::Quota { .. } => "quota",
        }
    }

    const fn at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Swipe { at, .. }
            | Self::Undo { at, .. }
            | Self::WhoLikedMe { at, .. }
            | Self::History { at, .. }
            | Self::Quota { at, .. } => *at,
        }
    }
}

/// Result of one replayed command.
#[derive(Debug, Serialize)]
pub struct ReplayOutcome {
    /// Command tag.
    pub op: &'static str,
    /// Successful result, serialised.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<serde_json::Value>,
    /// Rejection, in the shared error envelope shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ReplayOutcome {
    fn from_result<T: Serialize>(op: &'static str, result: Result<T, SwipeError>) -> Self {
        match result {
            Ok(value) => Self {
                op,
                ok: Some(serde_json::to_value(value).unwrap_or_default()),
                error: None,
            },
            Err(err) => Self {
                op,
                ok: None,
                error: Some(ErrorResponse::from(&err).error),
            },
        }
    }
}

/// Runs `commands` in order against `service`, driving `clock`.
///
/// Rejections are reported per command and never stop the script.
pub async fn run_script<S: LedgerStore + Default>(
    service: &SwipeService<S>,
    clock: &ManualClock,
    commands: Vec<ReplayCommand>,
) -> Vec<ReplayOutcome> {
    let mut outcomes = Vec::with_capacity(commands.len());
    for command in commands {
        if let Some(at) = command.at() {
            clock.set(at);
        }
        let op = command.op();
        let outcome = match command {
            ReplayCommand::Swipe {
                user_id,
                target_id,
                direction,
                is_premium,
                ..
            } => ReplayOutcome::from_result(
                op,
                service
                    .swipe_raw(user_id, target_id, &direction, is_premium)
                    .await,
            ),
            ReplayCommand::Undo {
                user_id,
                is_premium,
                ..
            } => ReplayOutcome::from_result(op, service.undo_last_swipe(user_id, is_premium).await),
            ReplayCommand::WhoLikedMe {
                user_id,
                is_premium,
                ..
            } => ReplayOutcome::from_result(op, service.who_liked_me(user_id, is_premium).await),
            ReplayCommand::History {
                user_id,
                is_premium,
                ..
            } => ReplayOutcome::from_result(op, service.history(user_id, is_premium).await),
            ReplayCommand::Quota {
                user_id,
                is_premium,
                ..
            } => ReplayOutcome::from_result(
                op,
                Ok::<_, SwipeError>(service.quota_status(user_id, is_premium).await),
            ),
        };
        outcomes.push(outcome);
    }
    outcomes
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{QuotaLimits, SharedClock};
    use chrono::TimeZone;
    use std::sync::Arc;

    fn parse(json: &str) -> Vec<ReplayCommand> {
        let Ok(commands) = serde_json::from_str(json) else {
            panic!("script should parse");
        };
        commands
    }

    #[tokio::test]
    async fn replays_rollover_script() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).single().unwrap_or_default();
        let clock = Arc::new(ManualClock::new(start));
        let service = SwipeService::in_memory(
            Arc::clone(&clock) as SharedClock,
            QuotaLimits {
                like_limit: 1,
                total_action_limit: 10,
            },
        );

        let commands = parse(
            r#"[
                {"op": "swipe", "user_id": 1, "target_id": 2, "direction": "like"},
                {"op": "swipe", "user_id": 1, "target_id": 3, "direction": "right"},
                {"op": "swipe", "user_id": 1, "target_id": 3, "direction": "like",
                 "at": "2024-05-02T08:00:00Z"},
                {"op": "history", "user_id": 1},
                {"op": "quota", "user_id": 1},
                {"op": "swipe", "user_id": 1, "target_id": 4, "direction": "up"}
            ]"#,
        );
        let outcomes = run_script(&service, &clock, commands).await;

        let kinds: Vec<Option<&str>> = outcomes
            .iter()
            .map(|o| o.error.as_ref().map(|e| e.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                None,
                Some("LikeLimitReached"),
                None,
                Some("PremiumRequired"),
                None,
                Some("InvalidDirection"),
            ]
        );

        let quota = outcomes.get(4).and_then(|o| o.ok.clone()).unwrap_or_default();
        assert_eq!(quota.get("likes_used"), Some(&serde_json::json!(1)));
        assert_eq!(quota.get("date"), Some(&serde_json::json!("2024-05-02")));
    }

    #[tokio::test]
    async fn backwards_timestamps_keep_buckets_apart() {
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).single().unwrap_or_default();
        let clock = Arc::new(ManualClock::new(start));
        let service = SwipeService::in_memory(
            Arc::clone(&clock) as SharedClock,
            QuotaLimits {
                like_limit: 1,
                total_action_limit: 10,
            },
        );

        let commands = parse(
            r#"[
                {"op": "swipe", "user_id": 1, "target_id": 2, "direction": "like"},
                {"op": "swipe", "user_id": 1, "target_id": 3, "direction": "pass",
                 "at": "2024-05-01T09:00:00Z"},
                {"op": "swipe", "user_id": 1, "target_id": 4, "direction": "like",
                 "at": "2024-05-02T10:00:00Z"}
            ]"#,
        );
        let outcomes = run_script(&service, &clock, commands).await;

        let last = outcomes.last().and_then(|o| o.error.as_ref()).map(|e| e.kind);
        assert_eq!(last, Some("LikeLimitReached"));
    }

    #[test]
    fn op_tags_round_trip() {
        let commands = parse(r#"[{"op": "who_liked_me", "user_id": 3, "is_premium": true}]"#);
        assert_eq!(commands.first().map(ReplayCommand::op), Some("who_liked_me"));
    }
}
