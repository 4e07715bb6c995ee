//! Service layer: shared, logged access to the swipe ledger.
//!
//! [`SwipeService`] owns a [`crate::domain::SwipeLedger`] behind a
//! `tokio` read-write lock and traces every accepted or rejected call.

pub mod swipe_service;

pub use swipe_service::SwipeService;
