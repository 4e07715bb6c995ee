//! Process-memory implementation of [`LedgerStore`].

use std::collections::HashMap;

use chrono::NaiveDate;

use super::LedgerStore;
use crate::domain::{DailyCounter, SwipeEvent, UserId};

/// In-memory ledger storage.
///
/// Keeps a separate `order` list so that [`LedgerStore::users`] reports
/// users in first-seen order, which `who_liked_me` relies on.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    sequences: HashMap<UserId, Vec<SwipeEvent>>,
    order: Vec<UserId>,
    counters: HashMap<(UserId, NaiveDate), DailyCounter>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn events(&self, user_id: UserId) -> Vec<SwipeEvent> {
        self.sequences.get(&user_id).cloned().unwrap_or_default()
    }

    fn append_event(&mut self, event: SwipeEvent) {
        let user_id = event.user_id;
        if !self.sequences.contains_key(&user_id) {
            self.order.push(user_id);
        }
        self.sequences.entry(user_id).or_default().push(event);
    }

    fn pop_event(&mut self, user_id: UserId) -> Option<SwipeEvent> {
        self.sequences.get_mut(&user_id).and_then(Vec::pop)
    }

    fn users(&self) -> Vec<UserId> {
        self.order.clone()
    }

    fn counter(&self, user_id: UserId, date: NaiveDate) -> Option<DailyCounter> {
        self.counters.get(&(user_id, date)).copied()
    }

    fn put_counter(&mut self, user_id: UserId, date: NaiveDate, counter: DailyCounter) {
        self.counters.insert((user_id, date), counter);
    }
}
