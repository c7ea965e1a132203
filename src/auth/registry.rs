//! Process-wide set of live session tokens.
//!
//! Membership is driven purely by issuance and failed validation. Expired
//! tokens that are never presented again stay in the set until restart.

use parking_lot::Mutex;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct SessionRegistry {
    tokens: Mutex<HashSet<String>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token: &str) {
        self.tokens.lock().insert(token.to_string());
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.lock().contains(token)
    }

    /// Removing an absent token is a no-op.
    pub fn remove(&self, token: &str) {
        self.tokens.lock().remove(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.lock().is_empty()
    }
}
