//! Domain model for accounts and kanban cards.
//!
//! # Responsibility
//! - Define the records persisted in the local key-value space.
//! - Own field-level validation for card drafts.
//!
//! # Invariants
//! - Every user and card is identified by a stable UUID.
//! - User emails are stored in normalized (trimmed, lowercase) form.

pub mod card;
pub mod user;
