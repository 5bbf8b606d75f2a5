//! User collection and session pointer persistence.
//!
//! # Invariants
//! - All users live in one JSON array under [`USERS_KEY`].
//! - The session is the plain normalized email under [`SESSION_KEY`].

use crate::model::user::User;
use crate::repo::kv_repo::{read_json_list, write_json_list, KvStore, RepoResult};

pub const USERS_KEY: &str = "peak_users";
pub const SESSION_KEY: &str = "peak_session";

/// Typed access to account keys of a [`KvStore`].
#[derive(Clone, Copy)]
pub struct AccountRepository<S: KvStore> {
    store: S,
}

impl<S: KvStore> AccountRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn load_users(&self) -> RepoResult<Vec<User>> {
        read_json_list(&self.store, USERS_KEY)
    }

    pub fn save_users(&self, users: &[User]) -> RepoResult<()> {
        write_json_list(&self.store, USERS_KEY, users)
    }

    /// Finds a user by an already-normalized email.
    pub fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .load_users()?
            .into_iter()
            .find(|user| user.email == email))
    }

    pub fn session_email(&self) -> RepoResult<Option<String>> {
        Ok(self
            .store
            .get(SESSION_KEY)?
            .filter(|email| !email.is_empty()))
    }

    pub fn set_session(&self, email: &str) -> RepoResult<()> {
        self.store.set(SESSION_KEY, email)
    }

    /// Removes the session pointer. Returns whether one was set.
    pub fn clear_session(&self) -> RepoResult<bool> {
        self.store.remove(SESSION_KEY)
    }

    /// Resolves the session pointer to its user.
    ///
    /// A pointer to an email with no user record resolves to `None`.
    pub fn session_user(&self) -> RepoResult<Option<User>> {
        match self.session_email()? {
            Some(email) => self.find_by_email(&email),
            None => Ok(None),
        }
    }
}
