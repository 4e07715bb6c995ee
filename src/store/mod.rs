//! Storage layer: the key-value interface behind the swipe ledger.
//!
//! [`LedgerStore`] is everything the ledger needs from storage: per-user
//! event sequences and daily counters keyed by (user, date). [`InMemoryLedgerStore`]
//! backs it with process memory; durable backends implement the same
//! trait without touching the ledger algorithm.

pub mod memory;

pub use memory::InMemoryLedgerStore;

use std::fmt;

use chrono::NaiveDate;

use crate::domain::{DailyCounter, SwipeEvent, UserId};

/// Key-value storage for swipe sequences and daily counters.
///
/// Sequences are append-only except for [`LedgerStore::pop_event`].
pub trait LedgerStore: fmt::Debug + Send + Sync {
    /// Returns a copy of the user's event sequence, oldest first.
    fn events(&self, user_id: UserId) -> Vec<SwipeEvent>;

    /// Appends an event to the sequence of `event.user_id`.
    fn append_event(&mut self, event: SwipeEvent);

    /// Removes and returns the user's most recent event.
    fn pop_event(&mut self, user_id: UserId) -> Option<SwipeEvent>;

    /// Users that own a sequence, in the order they were first seen.
    fn users(&self) -> Vec<UserId>;

    /// Returns the user's counter for `date`, if one was ever stored.
    fn counter(&self, user_id: UserId, date: NaiveDate) -> Option<DailyCounter>;

    /// Replaces the user's counter for `date`.
    fn put_counter(&mut self, user_id: UserId, date: NaiveDate, counter: DailyCounter);
}
