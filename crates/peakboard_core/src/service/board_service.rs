//! Board projection and UI event routing.
//!
//! # Responsibility
//! - Group the session user's cards into fixed status columns.
//! - Route UI events (drop, form submit, delete) to the card store.
//!
//! # Invariants
//! - A view always contains every column of [`CardStatus::ALL`], in order.
//! - Cards keep stored order inside their column.

use crate::model::card::{Card, CardDraft, CardId, CardStatus};
use crate::repo::kv_repo::KvStore;
use crate::service::card_service::{CardError, CardStore};
use log::debug;

/// One board column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn {
    pub status: CardStatus,
    pub cards: Vec<Card>,
}

/// Render snapshot of the whole board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub columns: Vec<BoardColumn>,
}

impl BoardView {
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let mut columns = CardStatus::ALL
            .into_iter()
            .map(|status| BoardColumn {
                status,
                cards: Vec::new(),
            })
            .collect::<Vec<_>>();

        for card in cards {
            if let Some(column) = columns.iter_mut().find(|column| column.status == card.status) {
                column.cards.push(card);
            }
        }

        Self { columns }
    }

    /// Returns the cards in one column.
    pub fn column(&self, status: CardStatus) -> &[Card] {
        self.columns
            .iter()
            .find(|column| column.status == status)
            .map(|column| column.cards.as_slice())
            .unwrap_or_default()
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|column| column.cards.len()).sum()
    }
}

/// UI interaction routed into the card store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// A card was dropped onto a column.
    Drop { card_id: CardId, status: CardStatus },
    /// The card form was submitted (create or edit).
    Submit(CardDraft),
    /// The delete button was pressed in the card form.
    Delete(CardId),
}

/// Board handler wrapping an explicit card store.
pub struct Board<S: KvStore> {
    cards: CardStore<S>,
}

impl<S: KvStore> Board<S> {
    pub fn new(cards: CardStore<S>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &CardStore<S> {
        &self.cards
    }

    /// Builds the current board snapshot for the session user.
    pub fn view(&self) -> Result<BoardView, CardError> {
        Ok(BoardView::from_cards(self.cards.list()?))
    }

    /// Applies one UI event and returns the refreshed snapshot.
    pub fn dispatch(&self, event: BoardEvent) -> Result<BoardView, CardError> {
        match event {
            BoardEvent::Drop { card_id, status } => {
                self.cards.move_status(card_id, status)?;
            }
            BoardEvent::Submit(draft) => {
                self.cards.upsert(draft)?;
            }
            BoardEvent::Delete(card_id) => {
                self.cards.remove(card_id)?;
            }
        }
        debug!("event=board_dispatch module=board status=ok");
        self.view()
    }
}
