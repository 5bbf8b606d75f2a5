//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into account and board use-cases.
//! - Keep UI/FFI layers decoupled from storage keys and blob formats.

pub mod account_service;
pub mod board_service;
pub mod card_service;
