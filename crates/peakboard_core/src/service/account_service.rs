//! Account use-case service: registration, login, password reset, logout.
//!
//! # Responsibility
//! - Own email normalization and password hashing for every account path.
//! - Maintain the single session pointer.
//!
//! # Invariants
//! - No two users share a normalized email.
//! - Only SHA-256 digests are persisted, never plaintext passwords.
//! - Logs carry user ids only, never emails or digests.
//!
//! Password reset only checks that the email exists. This matches the
//! existing product behavior and is not a real identity check.

use crate::model::user::User;
use crate::repo::account_repo::AccountRepository;
use crate::repo::card_repo::CardRepository;
use crate::repo::kv_repo::{KvStore, RepoError};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Account use-case error, shown to the user as-is.
#[derive(Debug)]
pub enum AccountError {
    /// A form field is missing or malformed.
    InvalidInput(&'static str),
    /// Another user already registered this email.
    DuplicateEmail,
    /// No user has this email.
    UserNotFound,
    /// Password digest does not match.
    BadPassword,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for AccountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(details) => write!(f, "invalid input: {details}"),
            Self::DuplicateEmail => write!(f, "email already registered"),
            Self::UserNotFound => write!(f, "user not found"),
            Self::BadPassword => write!(f, "incorrect password"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AccountError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Trims and lowercases an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns the lowercase hex SHA-256 digest of `password`.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password) == stored_hash
}

fn validate_email(email: &str) -> Result<(), AccountError> {
    if !EMAIL_RE.is_match(email) {
        return Err(AccountError::InvalidInput("email is not a valid address"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.is_empty() {
        return Err(AccountError::InvalidInput("password cannot be empty"));
    }
    Ok(())
}

/// Account store over a local key-value space.
pub struct AccountStore<S: KvStore> {
    accounts: AccountRepository<S>,
    cards: CardRepository<S>,
}

impl<S: KvStore + Clone> AccountStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            accounts: AccountRepository::new(store.clone()),
            cards: CardRepository::new(store),
        }
    }
}

impl<S: KvStore> AccountStore<S> {
    /// Registers a new user and signs them in.
    ///
    /// The user starts with an empty card collection.
    ///
    /// # Errors
    /// - `InvalidInput` for a blank name, malformed email or empty password.
    /// - `DuplicateEmail` when the normalized email is already taken.
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AccountError> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() {
            return Err(AccountError::InvalidInput("name cannot be empty"));
        }
        validate_email(&email)?;
        validate_password(password)?;

        let mut users = self.accounts.load_users()?;
        if users.iter().any(|user| user.email == email) {
            warn!("event=account_register module=account status=error error_code=duplicate_email");
            return Err(AccountError::DuplicateEmail);
        }

        let user = User::new(name, email.as_str(), hash_password(password));
        users.push(user.clone());
        self.accounts.save_users(&users)?;
        self.cards.save_cards(&user.email, &[])?;
        self.accounts.set_session(&user.email)?;

        info!(
            "event=account_register module=account status=ok user_id={} user_count={}",
            user.id,
            users.len()
        );
        Ok(user)
    }

    /// Verifies credentials and points the session at the user.
    ///
    /// # Errors
    /// - `UserNotFound` when no user has the normalized email.
    /// - `BadPassword` when the digest does not match.
    pub fn login(&self, email: &str, password: &str) -> Result<User, AccountError> {
        let email = normalize_email(email);
        let Some(user) = self.accounts.find_by_email(&email)? else {
            warn!("event=account_login module=account status=error error_code=user_not_found");
            return Err(AccountError::UserNotFound);
        };

        if !verify_password(password, &user.password_hash) {
            warn!(
                "event=account_login module=account status=error error_code=bad_password user_id={}",
                user.id
            );
            return Err(AccountError::BadPassword);
        }

        self.accounts.set_session(&user.email)?;
        info!(
            "event=account_login module=account status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    /// Replaces the stored digest for `email`. The session is untouched.
    ///
    /// # Errors
    /// - `UserNotFound` when no user has the normalized email. Checked first.
    /// - `InvalidInput` for an empty new password.
    pub fn reset_password(&self, email: &str, new_password: &str) -> Result<(), AccountError> {
        let email = normalize_email(email);

        let mut users = self.accounts.load_users()?;
        let Some(user) = users.iter_mut().find(|user| user.email == email) else {
            warn!("event=account_reset module=account status=error error_code=user_not_found");
            return Err(AccountError::UserNotFound);
        };
        validate_password(new_password)?;
        user.password_hash = hash_password(new_password);
        let user_id = user.id;
        self.accounts.save_users(&users)?;

        info!("event=account_reset module=account status=ok user_id={user_id}");
        Ok(())
    }

    /// Clears the session. Calling it without a session is a no-op.
    pub fn logout(&self) -> Result<(), AccountError> {
        let had_session = self.accounts.clear_session()?;
        info!("event=account_logout module=account status=ok had_session={had_session}");
        Ok(())
    }

    /// Returns the signed-in user, if the session resolves to one.
    pub fn current_user(&self) -> Result<Option<User>, AccountError> {
        Ok(self.accounts.session_user()?)
    }
}
