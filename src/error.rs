//! Error types for the ledger and configuration.
//!
//! [`SwipeError`] is the closed set of business-rule rejections the ledger
//! can produce. Each variant carries a stable numeric code, a stable tag
//! the front end keys on, and a suggested HTTP status for the embedding
//! web layer. The core itself never speaks HTTP.

use serde::Serialize;

use crate::domain::UserId;

/// Structured JSON error body for callers that relay ledger errors.
///
/// ```json
/// {
///   "error": {
///     "code": 4001,
///     "kind": "LikeLimitReached",
///     "message": "free daily like limit (4) reached"
///   }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code, tag and human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Numeric error code (see [`SwipeError::error_code`]).
    pub code: u32,
    /// Stable variant tag, e.g. `"LikeLimitReached"`.
    pub kind: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Business-rule rejection raised by the swipe ledger.
///
/// All variants are caller-recoverable. None is retried internally, and a
/// rejected call never leaves partial state behind.
///
/// # Error Code Ranges
///
/// | Range     | Category      | Suggested HTTP status |
/// |-----------|---------------|-----------------------|
/// | 1000–1999 | Validation    | 400 Bad Request       |
/// | 2000–2999 | State         | 409 Conflict          |
/// | 3000–3999 | Entitlement   | 403 Forbidden         |
/// | 4000–4999 | Quota         | 429 Too Many Requests |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwipeError {
    /// Swipe direction outside like/pass.
    #[error("invalid swipe direction: {0:?} (expected like/right or pass/left)")]
    InvalidDirection(String),

    /// Free daily like quota exhausted.
    #[error("free daily like limit ({limit}) reached")]
    LikeLimitReached {
        /// The configured like limit.
        limit: u32,
    },

    /// Free daily total-action quota exhausted.
    #[error("free daily total action limit ({limit}) reached")]
    TotalActionLimitReached {
        /// The configured total-action limit.
        limit: u32,
    },

    /// A premium-only operation was called by a free-tier caller.
    #[error("premium is required to {operation}")]
    PremiumRequired {
        /// Short description of the gated operation.
        operation: &'static str,
    },

    /// Undo was requested with an empty swipe sequence.
    #[error("no swipe to undo for user {user_id}")]
    NoSwipeToUndo {
        /// User whose sequence was empty.
        user_id: UserId,
    },
}

impl SwipeError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidDirection(_) => 1001,
            Self::NoSwipeToUndo { .. } => 2001,
            Self::PremiumRequired { .. } => 3001,
            Self::LikeLimitReached { .. } => 4001,
            Self::TotalActionLimitReached { .. } => 4002,
        }
    }

    /// Returns the stable tag of this variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDirection(_) => "InvalidDirection",
            Self::NoSwipeToUndo { .. } => "NoSwipeToUndo",
            Self::PremiumRequired { .. } => "PremiumRequired",
            Self::LikeLimitReached { .. } => "LikeLimitReached",
            Self::TotalActionLimitReached { .. } => "TotalActionLimitReached",
        }
    }

    /// Returns the HTTP status an embedding web layer should use.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidDirection(_) => 400,
            Self::NoSwipeToUndo { .. } => 409,
            Self::PremiumRequired { .. } => 403,
            Self::LikeLimitReached { .. } | Self::TotalActionLimitReached { .. } => 429,
        }
    }

    /// Returns `true` for the two quota variants.
    #[must_use]
    pub const fn is_quota(&self) -> bool {
        matches!(
            self,
            Self::LikeLimitReached { .. } | Self::TotalActionLimitReached { .. }
        )
    }
}

impl From<&SwipeError> for ErrorResponse {
    fn from(err: &SwipeError) -> Self {
        Self {
            error: ErrorBody {
                code: err.error_code(),
                kind: err.kind(),
                message: err.to_string(),
                details: None,
            },
        }
    }
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A numeric setting is outside its accepted range.
    #[error("{key} = {value} is out of range: {reason}")]
    OutOfRange {
        /// Environment key of the setting.
        key: &'static str,
        /// Offending value.
        value: f64,
        /// What the value must satisfy.
        reason: &'static str,
    },

    /// A setting could not be recognised.
    #[error("{key} has unsupported value {value:?}")]
    Unsupported {
        /// Environment key of the setting.
        key: &'static str,
        /// Offending raw value.
        value: String,
    },
}
