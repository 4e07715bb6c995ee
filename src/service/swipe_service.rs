//! Swipe service: per-user locking around the ledger, with every outcome
//! traced.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::swipe_ledger::{WHO_LIKED_ME, require_premium};
use crate::domain::{
    QuotaLimits, QuotaStatus, SharedClock, SwipeDirection, SwipeEvent, SwipeHistory, SwipeLedger,
    UserId,
};
use crate::error::SwipeError;
use crate::store::{InMemoryLedgerStore, LedgerStore};

type Entry<S> = Arc<RwLock<SwipeLedger<S>>>;

#[derive(Debug)]
struct UserTable<S: LedgerStore> {
    entries: HashMap<UserId, Entry<S>>,
    order: Vec<UserId>,
}

/// Shared entry point to the swipe ledger.
///
/// Each user owns a ledger entry behind its own `tokio` read-write lock,
/// held in a map that is itself behind a lock.
///
/// # Concurrency
///
/// - Swipe and undo take the user's write lock, so "check quota, append
///   event, update counters" runs as one unit per user.
/// - Different users never wait on each other beyond the brief map lookup.
/// - Queries take read locks and may run concurrently.
pub struct SwipeService<S: LedgerStore = InMemoryLedgerStore> {
    users: RwLock<UserTable<S>>,
    clock: SharedClock,
    limits: QuotaLimits,
}

impl<S: LedgerStore> fmt::Debug for SwipeService<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeService")
            .field("users", &self.users)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl SwipeService<InMemoryLedgerStore> {
    /// Creates a service whose users are kept in process memory.
    #[must_use]
    pub fn in_memory(clock: SharedClock, limits: QuotaLimits) -> Self {
        Self::new(clock, limits)
    }
}

impl<S: LedgerStore + Default> SwipeService<S> {
    /// Creates an empty service; each user's ledger starts from `S::default()`.
    #[must_use]
    pub fn new(clock: SharedClock, limits: QuotaLimits) -> Self {
        Self {
            users: RwLock::new(UserTable {
                entries: HashMap::new(),
                order: Vec::new(),
            }),
            clock,
            limits,
        }
    }

    /// Returns the free-tier limits applied to every user.
    #[must_use]
    pub const fn limits(&self) -> QuotaLimits {
        self.limits
    }

    /// Returns the user's entry if they have ever swiped.
    async fn entry(&self, user_id: UserId) -> Option<Entry<S>> {
        self.users.read().await.entries.get(&user_id).map(Arc::clone)
    }

    /// Returns the user's entry, registering the user on first sight.
    async fn entry_or_insert(&self, user_id: UserId) -> Entry<S> {
        if let Some(entry) = self.entry(user_id).await {
            return entry;
        }

        let mut table = self.users.write().await;
        if let Some(entry) = table.entries.get(&user_id) {
            return Arc::clone(entry);
        }
        let entry = Arc::new(RwLock::new(self.detached()));
        table.entries.insert(user_id, Arc::clone(&entry));
        table.order.push(user_id);
        entry
    }

    /// An empty ledger, used to answer for users nobody has seen yet.
    fn detached(&self) -> SwipeLedger<S> {
        SwipeLedger::new(S::default(), Arc::clone(&self.clock), self.limits)
    }

    /// Records a swipe.
    ///
    /// # Errors
    ///
    /// Returns a quota [`SwipeError`] when a free-tier limit is exhausted.
    pub async fn swipe(
        &self,
        user_id: UserId,
        target_id: UserId,
        direction: SwipeDirection,
        is_premium: bool,
    ) -> Result<SwipeEvent, SwipeError> {
        let entry = self.entry_or_insert(user_id).await;
        let result = entry
            .write()
            .await
            .swipe(user_id, target_id, direction, is_premium);

        match &result {
            Ok(_) => {
                tracing::info!(%user_id, %target_id, %direction, is_premium, "swipe recorded");
            }
            Err(err) => {
                tracing::debug!(
                    %user_id,
                    %target_id,
                    %direction,
                    kind = err.kind(),
                    "swipe rejected"
                );
            }
        }
        result
    }

    /// Parses `direction` and records the swipe.
    ///
    /// # Errors
    ///
    /// Returns [`SwipeError::InvalidDirection`] when `direction` is not
    /// like/right or pass/left, otherwise as [`SwipeService::swipe`].
    pub async fn swipe_raw(
        &self,
        user_id: UserId,
        target_id: UserId,
        direction: &str,
        is_premium: bool,
    ) -> Result<SwipeEvent, SwipeError> {
        let direction = direction.parse::<SwipeDirection>().inspect_err(|err| {
            tracing::debug!(%user_id, kind = err.kind(), "swipe rejected");
        })?;
        self.swipe(user_id, target_id, direction, is_premium).await
    }

    /// Lists users who liked `me_id`, in the order they first swiped.
    ///
    /// # Errors
    ///
    /// Returns [`SwipeError::PremiumRequired`] for free-tier callers.
    pub async fn who_liked_me(
        &self,
        me_id: UserId,
        is_premium: bool,
    ) -> Result<Vec<UserId>, SwipeError> {
        require_premium(is_premium, WHO_LIKED_ME)?;

        let candidates: Vec<(UserId, Entry<S>)> = {
            let table = self.users.read().await;
            table
                .order
                .iter()
                .filter(|uid| **uid != me_id)
                .filter_map(|uid| table.entries.get(uid).map(|e| (*uid, Arc::clone(e))))
                .collect()
        };

        let mut likers = Vec::new();
        for (uid, entry) in candidates {
            if entry.read().await.has_liked(uid, me_id) {
                likers.push(uid);
            }
        }
        tracing::debug!(user_id = %me_id, likers = likers.len(), "who-liked-me served");
        Ok(likers)
    }

    /// Returns a user's swipe history.
    ///
    /// # Errors
    ///
    /// Returns [`SwipeError::PremiumRequired`] for free-tier callers.
    pub async fn history(
        &self,
        user_id: UserId,
        is_premium: bool,
    ) -> Result<SwipeHistory, SwipeError> {
        match self.entry(user_id).await {
            Some(entry) => entry.read().await.history(user_id, is_premium),
            None => self.detached().history(user_id, is_premium),
        }
    }

    /// Undoes the user's most recent swipe.
    ///
    /// # Errors
    ///
    /// Returns [`SwipeError::PremiumRequired`] for free-tier callers and
    /// [`SwipeError::NoSwipeToUndo`] when there is nothing to undo.
    pub async fn undo_last_swipe(
        &self,
        user_id: UserId,
        is_premium: bool,
    ) -> Result<SwipeEvent, SwipeError> {
        let result = match self.entry(user_id).await {
            Some(entry) => entry.write().await.undo_last_swipe(user_id, is_premium),
            None => self.detached().undo_last_swipe(user_id, is_premium),
        };
        match &result {
            Ok(event) => {
                tracing::info!(
                    %user_id,
                    target_id = %event.target_id,
                    direction = %event.direction,
                    "swipe undone"
                );
            }
            Err(err) => tracing::debug!(%user_id, kind = err.kind(), "undo rejected"),
        }
        result
    }

    /// Reports today's quota usage.
    pub async fn quota_status(&self, user_id: UserId, is_premium: bool) -> QuotaStatus {
        match self.entry(user_id).await {
            Some(entry) => entry.read().await.quota_status(user_id, is_premium),
            None => self.detached().quota_status(user_id, is_premium),
        }
    }
}
