//! # runmatch-core
//!
//! Swipe ledger and runner similarity scoring for a running-partner
//! matching service.
//!
//! The ledger records like/pass swipes, enforces the free tier's daily
//! quotas (which reset lazily on the first action of a new UTC day) and
//! gates the premium features: who-liked-me, swipe history and undo.
//! The scorer compares two runner profiles through bounded feature
//! vectors and a handful of rule-of-thumb checks.
//!
//! ## Architecture
//!
//! ```text
//! Callers (CLI, replay scripts)
//!     │
//!     ├── SwipeService (service/)        SimilarityScorer (similarity/)
//!     │                                      │
//!     ├── SwipeLedger + Clock (domain/)      ├── FeatureVector
//!     │                                      └── race-time parsing
//!     └── LedgerStore (store/)
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod replay;
pub mod service;
pub mod similarity;
pub mod store;
