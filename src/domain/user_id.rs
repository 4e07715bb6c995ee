//! Type-safe user identifier.
//!
//! [`UserId`] wraps the integer primary key handed to the core by the
//! embedding system so that swipers and targets cannot be confused with
//! counters or other integers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a user, as supplied by the caller.
///
/// The core never allocates ids; it trusts whatever the authentication
/// layer resolved. Serialises as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Creates a `UserId` from a raw integer key.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer key.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<UserId> for u64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn display_is_plain_integer() {
        assert_eq!(UserId::new(42).to_string(), "42");
    }

    #[test]
    fn serializes_transparently() {
        let Ok(json) = serde_json::to_string(&UserId::new(7)) else {
            panic!("serialization failed");
        };
        assert_eq!(json, "7");

        let Ok(id) = serde_json::from_str::<UserId>("19") else {
            panic!("deserialization failed");
        };
        assert_eq!(id.get(), 19);
    }

    #[test]
    fn works_as_hashmap_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(UserId::from(3), "runner");
        assert_eq!(map.get(&UserId::new(3)), Some(&"runner"));
    }
}
