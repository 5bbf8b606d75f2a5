//! Kanban card model.
//!
//! # Responsibility
//! - Define the customer record tracked across board columns.
//! - Define the form payload (`CardDraft`) used for create and edit.
//!
//! # Invariants
//! - `status` is always one of the fixed board columns.
//! - A persisted card always has a non-blank `name`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

pub type CardId = Uuid;

/// Board column a card currently occupies.
///
/// Serialized in kebab-case, which is also the drop-target identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardStatus {
    /// Freshly captured customer.
    #[default]
    New,
    /// First contact made.
    Contacted,
    /// Negotiation or onboarding under way.
    InProgress,
    /// Deal finished.
    Closed,
}

impl CardStatus {
    /// All columns in board display order.
    pub const ALL: [CardStatus; 4] = [
        CardStatus::New,
        CardStatus::Contacted,
        CardStatus::InProgress,
        CardStatus::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::InProgress => "in-progress",
            Self::Closed => "closed",
        }
    }
}

impl Display for CardStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a column identifier is not one of [`CardStatus::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl Display for UnknownStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown card status `{}`", self.0)
    }
}

impl Error for UnknownStatus {}

impl FromStr for CardStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == trimmed)
            .ok_or_else(|| UnknownStatus(trimmed.to_string()))
    }
}

/// Persisted customer card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub name: String,
    /// Company tax registration number, free-form.
    pub tax_id: String,
    /// Expected ticket value as typed by the user.
    pub ticket_value: String,
    pub city: String,
    pub phone: String,
    pub status: CardStatus,
}

/// Card form payload.
///
/// `id = None` means "new card". `status = None` means "keep the current
/// column" on edit and [`CardStatus::New`] on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDraft {
    pub id: Option<CardId>,
    pub name: String,
    pub tax_id: String,
    pub ticket_value: String,
    pub city: String,
    pub phone: String,
    pub status: Option<CardStatus>,
}

/// Field validation failures for card drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    EmptyName,
}

impl Display for CardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "card name cannot be empty"),
        }
    }
}

impl Error for CardValidationError {}

impl CardDraft {
    /// Starts a draft for a new card with only a name filled in.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CardValidationError> {
        if self.name.trim().is_empty() {
            return Err(CardValidationError::EmptyName);
        }
        Ok(())
    }

    /// Builds the stored card, taking `status` from the draft or `fallback`.
    pub(crate) fn into_card(self, id: CardId, fallback: CardStatus) -> Card {
        Card {
            id,
            name: self.name.trim().to_string(),
            tax_id: self.tax_id,
            ticket_value: self.ticket_value,
            city: self.city,
            phone: self.phone,
            status: self.status.unwrap_or(fallback),
        }
    }
}

impl From<&Card> for CardDraft {
    fn from(card: &Card) -> Self {
        Self {
            id: Some(card.id),
            name: card.name.clone(),
            tax_id: card.tax_id.clone(),
            ticket_value: card.ticket_value.clone(),
            city: card.city.clone(),
            phone: card.phone.clone(),
            status: Some(card.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CardDraft, CardStatus, CardValidationError};
    use uuid::Uuid;

    #[test]
    fn status_parses_drop_target_identifiers() {
        assert_eq!("in-progress".parse::<CardStatus>(), Ok(CardStatus::InProgress));
        assert_eq!(" closed ".parse::<CardStatus>(), Ok(CardStatus::Closed));
        let err = "archived".parse::<CardStatus>().unwrap_err();
        assert_eq!(err.0, "archived");
    }

    #[test]
    fn status_serializes_as_kebab_case() {
        let json = serde_json::to_string(&CardStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn blank_name_is_rejected() {
        let draft = CardDraft::new("   ");
        assert_eq!(draft.validate(), Err(CardValidationError::EmptyName));
    }

    #[test]
    fn into_card_falls_back_to_given_status() {
        let id = Uuid::new_v4();
        let card = CardDraft::new(" Acme ").into_card(id, CardStatus::Contacted);
        assert_eq!(card.id, id);
        assert_eq!(card.name, "Acme");
        assert_eq!(card.status, CardStatus::Contacted);
    }
}
