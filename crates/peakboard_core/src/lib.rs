//! Core domain logic for PeakBoard.
//! Accounts, sessions and per-user kanban cards over a local key-value store.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::card::{Card, CardDraft, CardId, CardStatus, CardValidationError, UnknownStatus};
pub use model::user::{User, UserId};
pub use repo::kv_repo::{KvStore, RepoError, RepoResult, SqliteKvStore};
pub use service::account_service::{hash_password, normalize_email, AccountError, AccountStore};
pub use service::board_service::{Board, BoardColumn, BoardEvent, BoardView};
pub use service::card_service::{CardError, CardStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
