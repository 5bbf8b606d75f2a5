//! Card use-case service: per-user CRUD and column moves.
//!
//! # Responsibility
//! - Scope every read and write to the session user's collection.
//! - Keep edits in place so column order stays stable.
//!
//! # Invariants
//! - Without a session, `list` is empty and mutations fail with `NoSession`.
//! - Unknown ids on `upsert`/`remove`/`move_status` are no-ops, never errors.
//! - Editing a card keeps its status unless the draft sets one.

use crate::model::card::{Card, CardDraft, CardId, CardStatus, CardValidationError};
use crate::repo::account_repo::AccountRepository;
use crate::repo::card_repo::CardRepository;
use crate::repo::kv_repo::{KvStore, RepoError};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Card use-case error.
#[derive(Debug)]
pub enum CardError {
    /// Draft failed field validation.
    Validation(CardValidationError),
    /// Mutation attempted while nobody is signed in.
    NoSession,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for CardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoSession => write!(f, "no active session"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NoSession => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<CardValidationError> for CardError {
    fn from(value: CardValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CardError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Card store bound to whoever holds the session at call time.
pub struct CardStore<S: KvStore> {
    accounts: AccountRepository<S>,
    cards: CardRepository<S>,
}

impl<S: KvStore + Clone> CardStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            accounts: AccountRepository::new(store.clone()),
            cards: CardRepository::new(store),
        }
    }
}

impl<S: KvStore> CardStore<S> {
    /// Lists the session user's cards in stored order.
    pub fn list(&self) -> Result<Vec<Card>, CardError> {
        match self.owner()? {
            Some(owner) => Ok(self.cards.load_cards(&owner)?),
            None => Ok(Vec::new()),
        }
    }

    /// Gets one of the session user's cards by id.
    pub fn get(&self, id: CardId) -> Result<Option<Card>, CardError> {
        Ok(self.list()?.into_iter().find(|card| card.id == id))
    }

    /// Inserts a new card or replaces the card with the same id in place.
    ///
    /// # Contract
    /// - `draft.id = None`: appended with a fresh id and `draft.status`
    ///   (or [`CardStatus::New`]).
    /// - Matching id: fields replaced, status kept unless `draft.status` is set.
    /// - Id with no matching card: nothing is written, returns `Ok(None)`.
    pub fn upsert(&self, draft: CardDraft) -> Result<Option<Card>, CardError> {
        draft.validate()?;
        let owner = self.require_owner()?;
        let mut cards = self.cards.load_cards(&owner)?;

        let saved = match draft.id {
            Some(id) => {
                let Some(slot) = cards.iter_mut().find(|card| card.id == id) else {
                    debug!(
                        "event=card_update module=card status=skipped card_id={id} reason=not_found"
                    );
                    return Ok(None);
                };
                *slot = draft.into_card(slot.id, slot.status);
                info!("event=card_update module=card status=ok card_id={id}");
                slot.clone()
            }
            None => {
                let card = draft.into_card(Uuid::new_v4(), CardStatus::default());
                cards.push(card.clone());
                info!(
                    "event=card_create module=card status=ok card_id={} card_count={}",
                    card.id,
                    cards.len()
                );
                card
            }
        };

        self.cards.save_cards(&owner, &cards)?;
        Ok(Some(saved))
    }

    /// Deletes a card. Returns `false` when no card has this id.
    pub fn remove(&self, id: CardId) -> Result<bool, CardError> {
        let owner = self.require_owner()?;
        let mut cards = self.cards.load_cards(&owner)?;
        let before = cards.len();
        cards.retain(|card| card.id != id);

        if cards.len() == before {
            debug!("event=card_delete module=card status=skipped card_id={id} reason=not_found");
            return Ok(false);
        }

        self.cards.save_cards(&owner, &cards)?;
        info!("event=card_delete module=card status=ok card_id={id}");
        Ok(true)
    }

    /// Moves a card to another column, leaving every other field alone.
    ///
    /// Returns `false` when no card has this id.
    pub fn move_status(&self, id: CardId, status: CardStatus) -> Result<bool, CardError> {
        let owner = self.require_owner()?;
        let mut cards = self.cards.load_cards(&owner)?;
        let Some(card) = cards.iter_mut().find(|card| card.id == id) else {
            debug!("event=card_move module=card status=skipped card_id={id} reason=not_found");
            return Ok(false);
        };

        if card.status == status {
            return Ok(true);
        }

        let from = card.status;
        card.status = status;
        self.cards.save_cards(&owner, &cards)?;
        info!("event=card_move module=card status=ok card_id={id} from={from} to={status}");
        Ok(true)
    }

    fn owner(&self) -> Result<Option<String>, CardError> {
        Ok(self.accounts.session_user()?.map(|user| user.email))
    }

    fn require_owner(&self) -> Result<String, CardError> {
        self.owner()?.ok_or(CardError::NoSession)
    }
}
