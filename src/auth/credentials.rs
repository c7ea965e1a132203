//! In-memory user records and password checks.

use parking_lot::Mutex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::error::DuplicateEmail;

/// Users present in every fresh store: `(email, first name, last name, password)`.
const SEED_USERS: [(&str, &str, &str, &str); 3] = [
    ("kari.karttinen@foo.com", "Kari", "Karttinen", "Kari"),
    ("timo.tillinen@foo.com", "Timo", "Tillinen", "Timo"),
    ("erkka.erkkila@foo.com", "Erkka", "Erkkila", "Erkka"),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub user_id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    password_hash: String,
}

/// What signup echoes back to the caller.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct UserSummary {
    pub user_id: u64,
    pub email: String,
}

#[derive(Debug)]
struct Users {
    next_id: u64,
    by_id: BTreeMap<u64, User>,
}

impl Users {
    fn email_exists(&self, email: &str) -> bool {
        self.by_id.values().any(|user| user.email == email)
    }
}

/// Owns every user record. Email is unique across entries.
#[derive(Debug)]
pub struct CredentialStore {
    users: Mutex<Users>,
}

impl CredentialStore {
    /// Empty store, identifiers start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Users {
                next_id: 1,
                by_id: BTreeMap::new(),
            }),
        }
    }

    /// Store pre-populated with the three fixed test users (ids 1..=3).
    #[must_use]
    pub fn with_seed_users() -> Self {
        let store = Self::new();
        for (email, first_name, last_name, password) in SEED_USERS {
            // A fresh store has no duplicates.
            let _ = store.add_user(email, first_name, last_name, password);
        }
        store
    }

    pub fn email_exists(&self, email: &str) -> bool {
        self.users.lock().email_exists(email)
    }

    /// Register a new user.
    ///
    /// The uniqueness check, identifier allocation and insertion happen under a
    /// single lock, and the identifier is only allocated once the email is known
    /// to be free.
    ///
    /// # Errors
    /// Returns [`DuplicateEmail`] if a user with this exact email already exists.
    pub fn add_user(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<UserSummary, DuplicateEmail> {
        let mut users = self.users.lock();

        if users.email_exists(email) {
            warn!("Email already exists: {email}");
            return Err(DuplicateEmail {
                email: email.to_string(),
            });
        }

        let user_id = users.next_id;
        users.next_id += 1;
        users.by_id.insert(
            user_id,
            User {
                user_id,
                email: email.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                password_hash: hash_password(password),
            },
        );

        debug!(user_id, "user added");

        Ok(UserSummary {
            user_id,
            email: email.to_string(),
        })
    }

    pub fn check_credentials(&self, email: &str, password: &str) -> bool {
        let password_hash = hash_password(password);
        self.users
            .lock()
            .by_id
            .values()
            .any(|user| user.email == email && user.password_hash == password_hash)
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .by_id
            .values()
            .find(|user| user.email == email)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.users.lock().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identifier the next successful signup will receive.
    pub fn next_id(&self) -> u64 {
        self.users.lock().next_id
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::with_seed_users()
    }
}

/// One-way, deterministic password digest (hex encoded SHA-256).
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
