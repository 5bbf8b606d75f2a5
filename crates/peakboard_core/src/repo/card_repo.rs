//! Per-user card collection persistence.
//!
//! # Invariants
//! - Each user's cards live in one JSON array under `peak_cards_<email>`.
//! - No API reads or writes cards across two owners.

use crate::model::card::Card;
use crate::repo::kv_repo::{read_json_list, write_json_list, KvStore, RepoResult};

pub const CARDS_KEY_PREFIX: &str = "peak_cards_";

/// Returns the storage key owning `email`'s cards.
pub fn cards_key(email: &str) -> String {
    format!("{CARDS_KEY_PREFIX}{email}")
}

/// Typed access to card keys of a [`KvStore`].
#[derive(Clone, Copy)]
pub struct CardRepository<S: KvStore> {
    store: S,
}

impl<S: KvStore> CardRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn load_cards(&self, owner_email: &str) -> RepoResult<Vec<Card>> {
        read_json_list(&self.store, &cards_key(owner_email))
    }

    pub fn save_cards(&self, owner_email: &str, cards: &[Card]) -> RepoResult<()> {
        write_json_list(&self.store, &cards_key(owner_email), cards)
    }
}
